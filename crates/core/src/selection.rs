use std::collections::BTreeSet;

use crate::bank::Bank;
use crate::model::{Question, QuizSet, SetId, TagName};

/// Which sets contribute questions to a practice pool.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SetSelection {
    #[default]
    All,
    Only(BTreeSet<SetId>),
}

impl SetSelection {
    #[must_use]
    pub fn includes(&self, id: SetId) -> bool {
        match self {
            Self::All => true,
            Self::Only(ids) => ids.contains(&id),
        }
    }
}

/// Set and tag filters applied before a session is drawn.
///
/// Tags narrow the pool with OR semantics: a question qualifies if it carries
/// any selected tag. No selected tags means no tag filtering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionFilter {
    sets: SetSelection,
    tags: BTreeSet<TagName>,
}

impl SelectionFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_sets(mut self, ids: impl IntoIterator<Item = SetId>) -> Self {
        self.sets = SetSelection::Only(ids.into_iter().collect());
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = TagName>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    #[must_use]
    pub fn sets(&self) -> &SetSelection {
        &self.sets
    }

    #[must_use]
    pub fn tags(&self) -> &BTreeSet<TagName> {
        &self.tags
    }

    pub fn select_all_sets(&mut self) {
        self.sets = SetSelection::All;
    }

    /// Include or exclude one set.
    ///
    /// Excluding from `All` first expands the selection to every known set.
    pub fn set_included(&mut self, id: SetId, included: bool, known: &[QuizSet]) {
        if let SetSelection::All = self.sets {
            if included {
                return;
            }
            self.sets = SetSelection::Only(known.iter().map(QuizSet::id).collect());
        }
        if let SetSelection::Only(ids) = &mut self.sets {
            if included {
                ids.insert(id);
            } else {
                ids.remove(&id);
            }
        }
    }

    /// Flip a tag in or out of the filter. Returns whether it is now selected.
    pub fn toggle_tag(&mut self, tag: TagName) -> bool {
        if self.tags.remove(&tag) {
            false
        } else {
            self.tags.insert(tag);
            true
        }
    }

    pub fn clear_tags(&mut self) {
        self.tags.clear();
    }

    #[must_use]
    pub fn matches(&self, question: &Question) -> bool {
        self.tags.is_empty() || question.has_any_tag(&self.tags)
    }

    /// Every question that passes both filters, in bank order.
    #[must_use]
    pub fn pool<'a>(&self, bank: &'a Bank) -> Vec<&'a Question> {
        bank.sets()
            .iter()
            .filter(|set| self.sets.includes(set.id()))
            .flat_map(QuizSet::questions)
            .filter(|q| self.matches(q))
            .collect()
    }

    #[must_use]
    pub fn available_count(&self, bank: &Bank) -> usize {
        self.pool(bank).len()
    }
}
