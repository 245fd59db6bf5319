use thiserror::Error;

/// User input that breaks a model invariant.
///
/// Raised before any state is touched; callers surface it and keep the
/// previous state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("a question needs at least 2 non-empty options, found {found}")]
    TooFewOptions { found: usize },

    #[error("option {index} is blank")]
    BlankOption { index: usize },

    #[error("option text {text:?} appears more than once")]
    DuplicateOption { text: String },

    #[error("correct option {index} does not address one of the {len} options")]
    CorrectIndexOutOfRange { index: usize, len: usize },

    #[error("option {index} does not exist, the question has {len} options")]
    OptionOutOfRange { index: usize, len: usize },

    #[error("the correct option cannot be removed")]
    RemovesCorrectOption,

    #[error("option order must be a permutation of 0..{len}")]
    InvalidPermutation { len: usize },

    #[error("set name cannot be empty")]
    EmptySetName,

    #[error("tag name cannot be empty")]
    EmptyTag,
}
