//! Import reconciliation.
//!
//! Sets are matched by name, questions inside a matched set by trimmed
//! prompt. The two keys are separate functions.

use std::collections::{HashMap, HashSet};

use crate::model::{Question, QuizSet};

/// Key that decides whether an incoming set is the same set as an existing one.
#[must_use]
pub fn same_set_key(set: &QuizSet) -> &str {
    set.name()
}

/// Key that decides whether an incoming question duplicates an existing one.
///
/// Options, answer and tags are ignored: two differently answered versions of
/// one prompt collapse into whichever arrived first.
#[must_use]
pub fn same_question_key(question: &Question) -> &str {
    question.prompt().trim()
}

/// What a reconciliation changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Incoming sets appended as new sets.
    pub sets_added: usize,
    /// Incoming sets folded into an existing set of the same name.
    pub sets_merged: usize,
    /// Questions that ended up in the result and were not there before.
    pub questions_added: usize,
    /// Incoming questions dropped because their prompt was already present.
    pub duplicates_skipped: usize,
}

impl ReconcileReport {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.sets_added == 0 && self.questions_added == 0
    }
}

/// Merge `incoming` into `existing` without duplicating content.
///
/// Existing sets keep their position, id, name, description and timestamp;
/// a matched set only grows. Unmatched incoming sets are appended unchanged.
/// Merging the same input twice changes nothing the second time.
#[must_use]
pub fn merge_sets(existing: &[QuizSet], incoming: Vec<QuizSet>) -> (Vec<QuizSet>, ReconcileReport) {
    let mut result = existing.to_vec();
    let by_name: HashMap<&str, usize> = existing
        .iter()
        .enumerate()
        .map(|(index, set)| (same_set_key(set), index))
        .collect();

    let mut report = ReconcileReport::default();
    for set in incoming {
        let Some(index) = by_name.get(same_set_key(&set)).copied() else {
            report.sets_added += 1;
            report.questions_added += set.question_count();
            result.push(set);
            continue;
        };

        report.sets_merged += 1;
        let target = &mut result[index];
        let mut known: HashSet<String> = target
            .questions()
            .iter()
            .map(|q| same_question_key(q).to_owned())
            .collect();

        for question in set.into_questions() {
            if known.insert(same_question_key(&question).to_owned()) {
                target.push_question(question);
                report.questions_added += 1;
            } else {
                report.duplicates_skipped += 1;
            }
        }
    }

    (result, report)
}
