use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use quiz_core::bank::Bank;
use thiserror::Error;

use crate::document::{decode_document, encode_document};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the quiz bank.
///
/// The bank is stored as one snapshot; every save overwrites the previous one.
#[async_trait]
pub trait BankRepository: Send + Sync {
    /// Load the last saved bank. An empty bank when nothing was ever saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored snapshot is
    /// malformed, or `StorageError::Connection` if the backend is unreachable.
    async fn load_bank(&self) -> Result<Bank, StorageError>;

    /// Persist the full bank, replacing whatever was stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bank cannot be stored.
    async fn save_bank(&self, bank: &Bank) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// Holds the encoded snapshot text, so loads go through the same decoding as
/// the `SQLite` backend.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    snapshot: Arc<Mutex<Option<String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            snapshot: Arc::new(Mutex::new(None)),
        }
    }

    /// Start with a raw stored snapshot, valid or not.
    #[must_use]
    pub fn with_snapshot(raw: impl Into<String>) -> Self {
        Self {
            snapshot: Arc::new(Mutex::new(Some(raw.into()))),
        }
    }

    /// The raw snapshot text, if anything was saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn snapshot(&self) -> Result<Option<String>, StorageError> {
        let guard = self
            .snapshot
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl BankRepository for InMemoryRepository {
    async fn load_bank(&self) -> Result<Bank, StorageError> {
        match self.snapshot()? {
            None => Ok(Bank::new()),
            Some(raw) => decode_snapshot(&raw),
        }
    }

    async fn save_bank(&self, bank: &Bank) -> Result<(), StorageError> {
        let encoded = encode_snapshot(bank)?;
        let mut guard = self
            .snapshot
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(encoded);
        Ok(())
    }
}

pub(crate) fn encode_snapshot(bank: &Bank) -> Result<String, StorageError> {
    encode_document(bank.sets()).map_err(|e| StorageError::Serialization(e.to_string()))
}

pub(crate) fn decode_snapshot(raw: &str) -> Result<Bank, StorageError> {
    decode_document(raw, Utc::now())
        .map(Bank::from_sets)
        .map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub bank: Arc<dyn BankRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let bank: Arc<dyn BankRepository> = Arc::new(InMemoryRepository::new());
        Self { bank }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Question, QuestionDraft, QuizSet, SetId};
    use quiz_core::time::fixed_now;

    fn build_bank() -> Bank {
        let mut bank = Bank::new();
        let set_id = bank.add_set(QuizSet::new(SetId::generate(), "Civile", None, fixed_now()).unwrap());
        let question =
            Question::create(QuestionDraft::new("Q", ["A", "B"], 1).with_tags("obbligazioni"), fixed_now())
                .unwrap();
        bank.add_question(set_id, question).unwrap();
        bank
    }

    #[tokio::test]
    async fn empty_repository_loads_empty_bank() {
        let repo = InMemoryRepository::new();
        assert!(repo.load_bank().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn round_trips_bank() {
        let repo = InMemoryRepository::new();
        let bank = build_bank();
        repo.save_bank(&bank).await.unwrap();
        assert_eq!(repo.load_bank().await.unwrap(), bank);
    }

    #[tokio::test]
    async fn save_overwrites_previous_snapshot() {
        let repo = InMemoryRepository::new();
        repo.save_bank(&build_bank()).await.unwrap();
        repo.save_bank(&Bank::new()).await.unwrap();
        assert!(repo.load_bank().await.unwrap().is_empty());
        assert_eq!(repo.snapshot().unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn malformed_snapshot_is_a_serialization_error() {
        let repo = InMemoryRepository::with_snapshot("{ definitely not a bank");
        let err = repo.load_bank().await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[tokio::test]
    async fn storage_handle_shares_trait_object() {
        let storage = Storage::in_memory();
        storage.bank.save_bank(&build_bank()).await.unwrap();
        assert_eq!(storage.bank.load_bank().await.unwrap().question_count(), 1);
    }
}
