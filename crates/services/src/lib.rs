#![forbid(unsafe_code)]

pub mod app_services;
pub mod bank_service;
pub mod error;
pub mod practice;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use bank_service::{BankService, ExportedDocument};
pub use error::{AppServicesError, BankServiceError, PracticeError};
pub use practice::{
    AnswerFeedback, DEFAULT_SESSION_SIZE, OptionView, PracticeService, QuestionView,
    SessionResults,
};
