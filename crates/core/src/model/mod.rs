mod ids;
mod question;
mod quiz_set;
mod tag;
mod validation;

pub use ids::{ParseIdError, QuestionId, SetId};
pub use question::{AnswerOption, Question, QuestionDraft, ValidatedQuestion};
pub use quiz_set::{QuizSet, canonical_set_name};
pub use tag::{TagName, parse_tags};
pub use validation::ValidationError;
