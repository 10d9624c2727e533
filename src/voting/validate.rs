use crate::error::PollError;
use crate::models::{Ballot, Rank};
use std::collections::HashMap;

/// Checks a submitted ranking against the poll's options and builds the ballot.
///
/// Options are checked in declared order; for each one the ranking must
/// contain it, with a position in `1..=N`. Positions are not required to be
/// distinct, and keys naming unknown options are ignored.
pub fn validate_ballot(
    options: &[String],
    voter: &str,
    submitted: &HashMap<String, u32>,
) -> Result<Ballot, PollError> {
    let max = options.len();
    let mut ranking = Vec::with_capacity(max);

    for option in options {
        let position = *submitted
            .get(option)
            .ok_or_else(|| PollError::IncompleteRanking(option.clone()))?;

        if position == 0 {
            return Err(PollError::InvalidPosition(option.clone()));
        }

        if position as usize > max {
            return Err(PollError::PositionOutOfRange {
                option: option.clone(),
                position,
                max,
            });
        }

        ranking.push(Rank {
            option: option.clone(),
            position,
        });
    }

    Ok(Ballot {
        voter: voter.to_string(),
        ranking,
    })
}
