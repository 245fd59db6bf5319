use std::sync::Arc;

use quiz_core::bank::{Bank, BankError};
use quiz_core::model::{QuestionDraft, QuestionId, QuizSet, SetId};
use quiz_core::reconcile::ReconcileReport;
use storage::document::{decode_document, encode_document, export_file_name};
use storage::repository::BankRepository;
use tracing::{debug, info, warn};

use crate::Clock;
use crate::error::BankServiceError;

/// A rendered export, ready to be written wherever the caller wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub file_name: String,
    pub contents: String,
}

/// Owns the in-memory bank and persists it after every change.
///
/// Mutations take `&mut self`: there is exactly one writer. When a save
/// fails the change stays applied in memory and `Persist` is returned, so the
/// caller can report it and retry with the next mutation.
pub struct BankService {
    clock: Clock,
    repo: Arc<dyn BankRepository>,
    bank: Bank,
}

impl BankService {
    /// Load the stored bank. Unreadable storage degrades to an empty bank.
    pub async fn load(clock: Clock, repo: Arc<dyn BankRepository>) -> Self {
        let bank = match repo.load_bank().await {
            Ok(bank) => {
                info!(
                    sets = bank.sets().len(),
                    questions = bank.question_count(),
                    "loaded bank"
                );
                bank
            }
            Err(err) => {
                warn!(error = %err, "stored bank is unreadable, starting empty");
                Bank::new()
            }
        };
        Self { clock, repo, bank }
    }

    #[must_use]
    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    /// Create an empty set.
    ///
    /// # Errors
    ///
    /// Returns `BankServiceError::Validation` for a blank name and
    /// `BankServiceError::Persist` if the save fails.
    pub async fn create_set(
        &mut self,
        name: &str,
        description: Option<String>,
    ) -> Result<SetId, BankServiceError> {
        let set = QuizSet::new(SetId::generate(), name, description, self.clock.now())?;
        if self.bank.set_by_name(set.name()).is_some() {
            warn!(name = set.name(), "a set with this name already exists");
        }
        let set_id = self.bank.add_set(set);
        debug!(%set_id, "created set");
        self.persist().await?;
        Ok(set_id)
    }

    /// Validate a draft and append it to a set.
    ///
    /// # Errors
    ///
    /// Returns `BankServiceError::Validation` for an invalid draft,
    /// `BankServiceError::Bank` for an unknown set, and
    /// `BankServiceError::Persist` if the save fails.
    pub async fn add_question(
        &mut self,
        set_id: SetId,
        draft: QuestionDraft,
    ) -> Result<QuestionId, BankServiceError> {
        if self.bank.set(set_id).is_none() {
            return Err(BankError::UnknownSet(set_id).into());
        }
        let question = draft.validate(self.clock.now())?.assign_id(QuestionId::generate());
        let question_id = self.bank.add_question(set_id, question)?;
        debug!(%set_id, %question_id, "added question");
        self.persist().await?;
        Ok(question_id)
    }

    /// Replace a question's content, keeping its id and creation time.
    ///
    /// # Errors
    ///
    /// Returns `BankServiceError::Bank` for unknown ids,
    /// `BankServiceError::Validation` for an invalid draft, and
    /// `BankServiceError::Persist` if the save fails.
    pub async fn update_question(
        &mut self,
        set_id: SetId,
        question_id: QuestionId,
        draft: QuestionDraft,
    ) -> Result<(), BankServiceError> {
        let existing = self
            .bank
            .set(set_id)
            .ok_or(BankError::UnknownSet(set_id))?
            .question(question_id)
            .ok_or(BankError::UnknownQuestion {
                set: set_id,
                question: question_id,
            })?;
        let revised = existing.revise(draft)?;
        self.bank.replace_question(set_id, revised)?;
        debug!(%set_id, %question_id, "updated question");
        self.persist().await
    }

    /// # Errors
    ///
    /// Returns `BankServiceError::Bank` for unknown ids and
    /// `BankServiceError::Persist` if the save fails.
    pub async fn remove_question(
        &mut self,
        set_id: SetId,
        question_id: QuestionId,
    ) -> Result<(), BankServiceError> {
        self.bank.remove_question(set_id, question_id)?;
        debug!(%set_id, %question_id, "removed question");
        self.persist().await
    }

    /// Remove a set and every question in it.
    ///
    /// # Errors
    ///
    /// Returns `BankServiceError::Bank` for an unknown set and
    /// `BankServiceError::Persist` if the save fails.
    pub async fn remove_set(&mut self, set_id: SetId) -> Result<(), BankServiceError> {
        let removed = self.bank.remove_set(set_id)?;
        debug!(%set_id, questions = removed.question_count(), "removed set");
        self.persist().await
    }

    /// Drop every set.
    ///
    /// # Errors
    ///
    /// Returns `BankServiceError::Persist` if the save fails.
    pub async fn reset(&mut self) -> Result<(), BankServiceError> {
        self.bank.clear();
        info!("bank reset");
        self.persist().await
    }

    /// Parse a document and merge it into the bank.
    ///
    /// A document that does not parse leaves the bank untouched.
    ///
    /// # Errors
    ///
    /// Returns `BankServiceError::MalformedImport` for a bad document and
    /// `BankServiceError::Persist` if the save fails.
    pub async fn import_document(&mut self, text: &str) -> Result<ReconcileReport, BankServiceError> {
        let incoming = decode_document(text, self.clock.now()).inspect_err(|err| {
            warn!(error = %err, "rejected import");
        })?;
        let report = self.bank.reconcile(incoming);
        info!(
            sets_added = report.sets_added,
            sets_merged = report.sets_merged,
            questions_added = report.questions_added,
            duplicates_skipped = report.duplicates_skipped,
            "imported document"
        );
        self.persist().await?;
        Ok(report)
    }

    /// Render the whole bank as an export document.
    ///
    /// # Errors
    ///
    /// Returns `BankServiceError::Export` if encoding fails.
    pub fn export_document(&self) -> Result<ExportedDocument, BankServiceError> {
        let contents = encode_document(self.bank.sets()).map_err(BankServiceError::Export)?;
        Ok(ExportedDocument {
            file_name: export_file_name(self.clock.now()),
            contents,
        })
    }

    async fn persist(&self) -> Result<(), BankServiceError> {
        self.repo.save_bank(&self.bank).await.map_err(|err| {
            warn!(error = %err, "failed to save bank");
            BankServiceError::Persist(err)
        })
    }
}
