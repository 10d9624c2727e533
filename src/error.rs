use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PollError {
    #[error("{}", option_count_message(*count))]
    InvalidOptionCount { count: usize },

    #[error("poll options can't be empty")]
    EmptyOption,

    #[error("option {0} appears more than once")]
    DuplicateOption(String),

    #[error("the poll {0} was not found")]
    PollNotFound(Uuid),

    #[error("user {0} has already voted")]
    AlreadyVoted(String),

    #[error("the poll has ended")]
    PollClosed,

    #[error("no option {0} found")]
    IncompleteRanking(String),

    #[error("option {0} has 0 rank")]
    InvalidPosition(String),

    #[error("option {option} has rank {position}, greater than {max}")]
    PositionOutOfRange {
        option: String,
        position: u32,
        max: usize,
    },
}

fn option_count_message(count: usize) -> String {
    match count {
        0 => "can't have a poll with 0 options".to_string(),
        1 => "can't have a poll with only 1 option".to_string(),
        n => format!("can't have a poll with {} options", n),
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("password/username don't match for {0}")]
    CredentialMismatch(String),
}
