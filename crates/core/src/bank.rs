use std::collections::BTreeSet;

use thiserror::Error;

use crate::model::{Question, QuestionId, QuizSet, SetId, TagName};
use crate::reconcile::{ReconcileReport, merge_sets};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("no set with id {0}")]
    UnknownSet(SetId),

    #[error("no question with id {question} in set {set}")]
    UnknownQuestion { set: SetId, question: QuestionId },
}

/// The user's whole collection of sets, in insertion order.
///
/// All mutation goes through `&mut self`; the owner decides when to persist.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bank {
    sets: Vec<QuizSet>,
}

impl Bank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_sets(sets: Vec<QuizSet>) -> Self {
        Self { sets }
    }

    #[must_use]
    pub fn sets(&self) -> &[QuizSet] {
        &self.sets
    }

    #[must_use]
    pub fn into_sets(self) -> Vec<QuizSet> {
        self.sets
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    #[must_use]
    pub fn set(&self, id: SetId) -> Option<&QuizSet> {
        self.sets.iter().find(|s| s.id() == id)
    }

    #[must_use]
    pub fn set_by_name(&self, name: &str) -> Option<&QuizSet> {
        self.sets.iter().find(|s| s.name() == name)
    }

    /// Total number of questions across all sets.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.sets.iter().map(QuizSet::question_count).sum()
    }

    /// Every tag used in the bank, sorted and de-duplicated.
    #[must_use]
    pub fn tag_catalog(&self) -> Vec<TagName> {
        self.sets
            .iter()
            .flat_map(QuizSet::questions)
            .flat_map(|q| q.tags().iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn add_set(&mut self, set: QuizSet) -> SetId {
        let id = set.id();
        self.sets.push(set);
        id
    }

    /// Append a question to the end of a set.
    ///
    /// # Errors
    ///
    /// Returns `BankError::UnknownSet` if the set does not exist.
    pub fn add_question(
        &mut self,
        set_id: SetId,
        question: Question,
    ) -> Result<QuestionId, BankError> {
        let id = question.id();
        self.set_mut(set_id)?.push_question(question);
        Ok(id)
    }

    /// Replace the question with the same id, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns `BankError::UnknownSet` or `BankError::UnknownQuestion`.
    pub fn replace_question(&mut self, set_id: SetId, question: Question) -> Result<(), BankError> {
        let question_id = question.id();
        if self.set_mut(set_id)?.replace_question(question) {
            Ok(())
        } else {
            Err(BankError::UnknownQuestion {
                set: set_id,
                question: question_id,
            })
        }
    }

    /// # Errors
    ///
    /// Returns `BankError::UnknownSet` or `BankError::UnknownQuestion`.
    pub fn remove_question(
        &mut self,
        set_id: SetId,
        question_id: QuestionId,
    ) -> Result<Question, BankError> {
        self.set_mut(set_id)?
            .remove_question(question_id)
            .ok_or(BankError::UnknownQuestion {
                set: set_id,
                question: question_id,
            })
    }

    /// Remove a set together with all of its questions.
    ///
    /// # Errors
    ///
    /// Returns `BankError::UnknownSet` if the set does not exist.
    pub fn remove_set(&mut self, set_id: SetId) -> Result<QuizSet, BankError> {
        let index = self
            .sets
            .iter()
            .position(|s| s.id() == set_id)
            .ok_or(BankError::UnknownSet(set_id))?;
        Ok(self.sets.remove(index))
    }

    pub fn clear(&mut self) {
        self.sets.clear();
    }

    /// Merge an incoming collection into this bank.
    pub fn reconcile(&mut self, incoming: Vec<QuizSet>) -> ReconcileReport {
        let (sets, report) = merge_sets(&self.sets, incoming);
        self.sets = sets;
        report
    }

    fn set_mut(&mut self, set_id: SetId) -> Result<&mut QuizSet, BankError> {
        self.sets
            .iter_mut()
            .find(|s| s.id() == set_id)
            .ok_or(BankError::UnknownSet(set_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionDraft;
    use crate::time::fixed_now;

    fn set(name: &str) -> QuizSet {
        QuizSet::new(SetId::generate(), name, None, fixed_now()).unwrap()
    }

    fn question(prompt: &str, tags: &str) -> Question {
        Question::create(
            QuestionDraft::new(prompt, ["a", "b"], 0).with_tags(tags),
            fixed_now(),
        )
        .unwrap()
    }

    #[test]
    fn add_question_to_unknown_set_fails() {
        let mut bank = Bank::new();
        let missing = SetId::generate();
        let err = bank.add_question(missing, question("Q", "")).unwrap_err();
        assert_eq!(err, BankError::UnknownSet(missing));
    }

    #[test]
    fn counts_questions_across_sets() {
        let mut bank = Bank::new();
        let a = bank.add_set(set("a"));
        let b = bank.add_set(set("b"));
        bank.add_question(a, question("Q1", "")).unwrap();
        bank.add_question(b, question("Q2", "")).unwrap();
        bank.add_question(b, question("Q3", "")).unwrap();
        assert_eq!(bank.question_count(), 3);
        assert_eq!(bank.set(b).unwrap().question_count(), 2);
    }

    #[test]
    fn tag_catalog_is_sorted_and_unique() {
        let mut bank = Bank::new();
        let a = bank.add_set(set("a"));
        let b = bank.add_set(set("b"));
        bank.add_question(a, question("Q1", "prove, penale")).unwrap();
        bank.add_question(b, question("Q2", "amministrativo, penale")).unwrap();

        let tags: Vec<String> = bank.tag_catalog().iter().map(ToString::to_string).collect();
        assert_eq!(tags, vec!["amministrativo", "penale", "prove"]);
    }

    #[test]
    fn replace_and_remove_question() {
        let mut bank = Bank::new();
        let a = bank.add_set(set("a"));
        let q = question("Q1", "");
        let qid = bank.add_question(a, q.clone()).unwrap();

        let revised = q.revise(QuestionDraft::new("Q1 edited", ["a", "b"], 1)).unwrap();
        bank.replace_question(a, revised).unwrap();
        assert_eq!(bank.set(a).unwrap().questions()[0].prompt(), "Q1 edited");

        let removed = bank.remove_question(a, qid).unwrap();
        assert_eq!(removed.id(), qid);
        assert!(matches!(
            bank.remove_question(a, qid),
            Err(BankError::UnknownQuestion { .. })
        ));
    }

    #[test]
    fn remove_set_drops_its_questions() {
        let mut bank = Bank::new();
        let a = bank.add_set(set("a"));
        bank.add_question(a, question("Q1", "")).unwrap();
        bank.remove_set(a).unwrap();
        assert!(bank.is_empty());
        assert_eq!(bank.question_count(), 0);
    }
}
