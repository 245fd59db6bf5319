//! Practice sessions: drawing, answering, advancing, scoring.

mod engine;
mod practice;
mod score;

use thiserror::Error;

pub use engine::{SessionEngine, SessionState};
pub use practice::{AnswerOutcome, PracticeSession, RecordedAnswer};
pub use score::ScoreCard;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions match the current selection")]
    EmptyPool,

    #[error("a session needs at least one question")]
    InvalidCount,

    #[error("no practice session is active")]
    NoActiveSession,

    #[error("a practice session is already active")]
    AlreadyActive,

    #[error("the practice session has already finished")]
    Finished,

    #[error("option {choice} does not exist, the question has {len} options")]
    OptionOutOfRange { choice: usize, len: usize },
}
