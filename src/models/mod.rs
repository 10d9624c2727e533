use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::HashMap;
use uuid::Uuid;

/// A poll ("room") as held by the store. Only the store mutates it.
#[derive(Debug, Clone)]
pub struct Poll {
    pub id: Uuid,
    pub title: String,
    pub options: Vec<String>,
    pub closes_at: DateTime<Utc>,
    pub ballots: HashMap<String, Ballot>,
    pub summary: Option<Summary>,
}

/// One option placed at a 1-based position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Rank {
    pub option: String,
    pub position: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ballot {
    pub voter: String,
    /// One entry per poll option, in the poll's declared option order.
    pub ranking: Vec<Rank>,
}

/// Votes an option collected in a single round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VoteCount {
    pub option: String,
    pub votes: u32,
}

/// Per-option tallies of one round, in declared option order.
pub type Round = Vec<VoteCount>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Summary {
    pub rounds: Vec<Round>,
    pub winner: Option<String>,
    pub winner_vote_count: u32,
    pub total_vote_count: u32,
}

/// Read-only snapshot of a poll handed out by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollView {
    pub id: Uuid,
    pub title: String,
    pub options: Vec<String>,
    pub ballots: BTreeMap<String, Ballot>,
    pub summary: Option<Summary>,
    pub closes_at: DateTime<Utc>,
    pub is_open: bool,
}

impl Poll {
    pub fn new(title: String, options: Vec<String>, closes_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            options,
            closes_at,
            ballots: HashMap::new(),
            summary: None,
        }
    }

    /// Open while `now < closes_at`.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        now < self.closes_at
    }

    /// Closed and not yet tallied.
    pub fn needs_summary(&self, now: DateTime<Utc>) -> bool {
        self.summary.is_none() && !self.is_open(now)
    }

    pub fn view(&self, now: DateTime<Utc>) -> PollView {
        PollView {
            id: self.id,
            title: self.title.clone(),
            options: self.options.clone(),
            ballots: self
                .ballots
                .iter()
                .map(|(voter, ballot)| (voter.clone(), ballot.clone()))
                .collect(),
            summary: self.summary.clone(),
            closes_at: self.closes_at,
            is_open: self.is_open(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn poll_closes_exactly_at_deadline() {
        let now = Utc::now();
        let poll = Poll::new("t".into(), vec!["a".into(), "b".into()], now);

        assert!(!poll.is_open(now));
        assert!(poll.is_open(now - Duration::milliseconds(1)));
        assert!(poll.needs_summary(now));
    }

    #[test]
    fn view_lists_ballots_by_voter() {
        let now = Utc::now();
        let mut poll = Poll::new("t".into(), vec!["a".into(), "b".into()], now + Duration::hours(1));
        for voter in ["zoe", "adam"] {
            poll.ballots.insert(
                voter.to_string(),
                Ballot { voter: voter.to_string(), ranking: Vec::new() },
            );
        }

        let view = poll.view(now);
        assert!(view.is_open);
        assert_eq!(view.ballots.keys().collect::<Vec<_>>(), vec!["adam", "zoe"]);
    }
}
