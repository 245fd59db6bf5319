mod service;
mod view;

// Public API of the practice subsystem.
pub use crate::error::PracticeError;
pub use service::{DEFAULT_SESSION_SIZE, PracticeService};
pub use view::{AnswerFeedback, OptionView, QuestionView, SessionResults};
