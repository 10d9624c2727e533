use crate::error::PollError;
use crate::models::{Poll, PollView};
use crate::voting::{calculate_results, validate_ballot};
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory table of polls shared by all request handlers.
///
/// The table lock only guards membership; each poll sits behind its own lock
/// so ballots and the summary of one poll never contend with another.
#[derive(Default)]
pub struct Store {
    polls: RwLock<HashMap<Uuid, Arc<RwLock<Poll>>>>,
    tally_runs: AtomicUsize,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // Create a poll, open until `closes_at`
    pub async fn create_poll(
        &self,
        title: String,
        options: Vec<String>,
        closes_at: DateTime<Utc>,
    ) -> Result<Uuid, PollError> {
        if options.len() < 2 {
            return Err(PollError::InvalidOptionCount {
                count: options.len(),
            });
        }

        let mut seen = HashSet::new();
        for option in &options {
            if option.is_empty() {
                return Err(PollError::EmptyOption);
            }
            if !seen.insert(option.as_str()) {
                return Err(PollError::DuplicateOption(option.clone()));
            }
        }

        let poll = Poll::new(title, options, closes_at);
        let id = poll.id;
        info!("Storing new poll with id: {}", id);

        self.polls
            .write()
            .await
            .insert(id, Arc::new(RwLock::new(poll)));
        Ok(id)
    }

    pub async fn submit_vote(
        &self,
        poll_id: Uuid,
        voter: &str,
        ranking: &HashMap<String, u32>,
    ) -> Result<(), PollError> {
        self.submit_vote_at(poll_id, voter, ranking, Utc::now()).await
    }

    // Admit a ballot, judging openness against the single `now` given
    pub async fn submit_vote_at(
        &self,
        poll_id: Uuid,
        voter: &str,
        ranking: &HashMap<String, u32>,
        now: DateTime<Utc>,
    ) -> Result<(), PollError> {
        let poll = self.poll(poll_id).await?;
        let mut poll = poll.write().await;

        if poll.ballots.contains_key(voter) {
            debug!("Rejecting second ballot from {} in poll {}", voter, poll_id);
            return Err(PollError::AlreadyVoted(voter.to_string()));
        }

        if !poll.is_open(now) {
            debug!("Rejecting ballot from {}: poll {} has ended", voter, poll_id);
            return Err(PollError::PollClosed);
        }

        let ballot = validate_ballot(&poll.options, voter, ranking)?;
        poll.ballots.insert(voter.to_string(), ballot);
        debug!("Admitted ballot from {} in poll {}", voter, poll_id);

        Ok(())
    }

    pub async fn get_poll(&self, poll_id: Uuid) -> Result<PollView, PollError> {
        self.get_poll_at(poll_id, Utc::now()).await
    }

    // Read a poll, tallying it first if it has closed without a summary
    pub async fn get_poll_at(
        &self,
        poll_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<PollView, PollError> {
        let poll = self.poll(poll_id).await?;

        {
            let poll = poll.read().await;
            if !poll.needs_summary(now) {
                return Ok(poll.view(now));
            }
        }

        let mut poll = poll.write().await;
        // Another reader may have tallied between the two locks.
        if poll.needs_summary(now) {
            info!(
                "Computing summary for poll {} with {} ballot(s)",
                poll_id,
                poll.ballots.len()
            );
            let summary = calculate_results(&poll.options, poll.ballots.values());
            self.tally_runs.fetch_add(1, Ordering::SeqCst);
            poll.summary = Some(summary);
        }

        Ok(poll.view(now))
    }

    /// How many times the tally engine has run across all polls.
    pub fn tally_runs(&self) -> usize {
        self.tally_runs.load(Ordering::SeqCst)
    }

    async fn poll(&self, poll_id: Uuid) -> Result<Arc<RwLock<Poll>>, PollError> {
        self.polls
            .read()
            .await
            .get(&poll_id)
            .cloned()
            .ok_or(PollError::PollNotFound(poll_id))
    }
}
