use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};

use crate::model::{QuestionId, TagName, ValidationError, parse_tags};
use crate::random::{RandomSource, permutation};

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// Raw question input as collected from a form.
///
/// `correct_index` addresses `options` as entered, blanks included.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuestionDraft {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub explanation: Option<String>,
    /// Comma-separated tag list.
    pub tags: String,
}

impl QuestionDraft {
    #[must_use]
    pub fn new<I, S>(prompt: impl Into<String>, options: I, correct_index: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prompt: prompt.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct_index,
            explanation: None,
            tags: String::new(),
        }
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    /// Validate the draft.
    ///
    /// Blank options are stripped and the correct option is remapped to its
    /// position among the survivors.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyPrompt` if the trimmed prompt is empty.
    /// Returns `ValidationError::TooFewOptions` if fewer than two options survive.
    /// Returns `ValidationError::CorrectIndexOutOfRange` if the designated option
    /// is missing or blank.
    /// Returns `ValidationError::DuplicateOption` if two options share a text.
    pub fn validate(self, now: DateTime<Utc>) -> Result<ValidatedQuestion, ValidationError> {
        let prompt = self.prompt.trim();
        if prompt.is_empty() {
            return Err(ValidationError::EmptyPrompt);
        }

        let mut texts = Vec::with_capacity(self.options.len());
        let mut correct = None;
        for (index, raw) in self.options.iter().enumerate() {
            let text = raw.trim();
            if text.is_empty() {
                continue;
            }
            if index == self.correct_index {
                correct = Some(texts.len());
            }
            texts.push(text.to_owned());
        }

        if texts.len() < 2 {
            return Err(ValidationError::TooFewOptions { found: texts.len() });
        }
        let correct = correct.ok_or(ValidationError::CorrectIndexOutOfRange {
            index: self.correct_index,
            len: texts.len(),
        })?;

        Ok(ValidatedQuestion {
            prompt: prompt.to_owned(),
            options: build_options(texts, correct)?,
            explanation: clean_optional(self.explanation),
            tags: parse_tags(&self.tags),
            created_at: now,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuestion {
    prompt: String,
    options: Vec<AnswerOption>,
    explanation: Option<String>,
    tags: BTreeSet<TagName>,
    created_at: DateTime<Utc>,
}

impl ValidatedQuestion {
    #[must_use]
    pub fn assign_id(self, id: QuestionId) -> Question {
        Question {
            id,
            prompt: self.prompt,
            options: self.options,
            explanation: self.explanation,
            tags: self.tags,
            created_at: self.created_at,
        }
    }
}

/// One displayed choice. The correct answer is carried by the option itself,
/// so reordering never loses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    text: String,
    correct: bool,
}

impl AnswerOption {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.correct
    }
}

/// A multiple-choice question with exactly one correct option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<AnswerOption>,
    explanation: Option<String>,
    tags: BTreeSet<TagName>,
    created_at: DateTime<Utc>,
}

impl Question {
    /// Validate a draft and give it a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the draft breaks a question invariant.
    pub fn create(draft: QuestionDraft, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        Ok(draft.validate(now)?.assign_id(QuestionId::generate()))
    }

    /// Rehydrate a question from stored or imported data.
    ///
    /// Unlike drafts, blank options are rejected instead of stripped.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the data breaks a question invariant.
    pub fn from_persisted(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
        explanation: Option<String>,
        tags: Vec<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let raw_prompt: String = prompt.into();
        let prompt = raw_prompt.trim();
        if prompt.is_empty() {
            return Err(ValidationError::EmptyPrompt);
        }

        let mut texts = Vec::with_capacity(options.len());
        for (index, raw) in options.iter().enumerate() {
            let text = raw.trim();
            if text.is_empty() {
                return Err(ValidationError::BlankOption { index });
            }
            texts.push(text.to_owned());
        }
        if texts.len() < 2 {
            return Err(ValidationError::TooFewOptions { found: texts.len() });
        }
        if correct_index >= texts.len() {
            return Err(ValidationError::CorrectIndexOutOfRange {
                index: correct_index,
                len: texts.len(),
            });
        }

        Ok(Self {
            id,
            prompt: prompt.to_owned(),
            options: build_options(texts, correct_index)?,
            explanation: clean_optional(explanation),
            tags: tags.into_iter().filter_map(|t| TagName::new(t).ok()).collect(),
            created_at,
        })
    }

    /// Apply an edited draft, keeping this question's id and creation time.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the draft breaks a question invariant.
    pub fn revise(&self, draft: QuestionDraft) -> Result<Self, ValidationError> {
        Ok(draft.validate(self.created_at)?.assign_id(self.id))
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    pub fn option_texts(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(AnswerOption::text)
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(AnswerOption::text)
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// Position of the correct option in the current order.
    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.options
            .iter()
            .position(AnswerOption::is_correct)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        self.options[self.correct_index()].text()
    }

    #[must_use]
    pub fn is_correct_choice(&self, choice: usize) -> bool {
        self.options.get(choice).is_some_and(AnswerOption::is_correct)
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Tags in display (sorted) order.
    #[must_use]
    pub fn tags(&self) -> &BTreeSet<TagName> {
        &self.tags
    }

    #[must_use]
    pub fn has_any_tag(&self, wanted: &BTreeSet<TagName>) -> bool {
        !self.tags.is_disjoint(wanted)
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    //
    // ─── STRUCTURAL OPTION EDITS ───────────────────────────────────────────
    //

    /// Reorder options so that new position `i` shows old option `order[i]`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidPermutation` unless `order` is a
    /// permutation of `0..option_count()`.
    pub fn reorder_options(&mut self, order: &[usize]) -> Result<(), ValidationError> {
        let len = self.options.len();
        let mut seen = vec![false; len];
        let valid = order.len() == len
            && order
                .iter()
                .all(|&i| i < len && !std::mem::replace(&mut seen[i], true));
        if !valid {
            return Err(ValidationError::InvalidPermutation { len });
        }

        let reordered = order.iter().map(|&i| self.options[i].clone()).collect();
        self.options = reordered;
        Ok(())
    }

    /// Randomly reorder the options; the correct answer follows its text.
    pub fn shuffle_options<R>(&mut self, rng: &mut R)
    where
        R: RandomSource + ?Sized,
    {
        let order = permutation(self.options.len(), rng);
        let reordered = order.iter().map(|&i| self.options[i].clone()).collect();
        self.options = reordered;
    }

    /// Remove an incorrect option.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::RemovesCorrectOption` for the correct option,
    /// `ValidationError::TooFewOptions` if fewer than two would remain, and
    /// `ValidationError::OptionOutOfRange` for an unknown index.
    pub fn remove_option(&mut self, index: usize) -> Result<(), ValidationError> {
        let len = self.options.len();
        let Some(option) = self.options.get(index) else {
            return Err(ValidationError::OptionOutOfRange { index, len });
        };
        if option.is_correct() {
            return Err(ValidationError::RemovesCorrectOption);
        }
        if len <= 2 {
            return Err(ValidationError::TooFewOptions { found: len - 1 });
        }
        self.options.remove(index);
        Ok(())
    }

    /// Append an incorrect option.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::BlankOption` or `ValidationError::DuplicateOption`.
    pub fn push_option(&mut self, text: impl Into<String>) -> Result<(), ValidationError> {
        let raw: String = text.into();
        let text = raw.trim();
        if text.is_empty() {
            return Err(ValidationError::BlankOption {
                index: self.options.len(),
            });
        }
        if self.options.iter().any(|o| o.text == text) {
            return Err(ValidationError::DuplicateOption {
                text: text.to_owned(),
            });
        }
        self.options.push(AnswerOption {
            text: text.to_owned(),
            correct: false,
        });
        Ok(())
    }
}

fn build_options(texts: Vec<String>, correct: usize) -> Result<Vec<AnswerOption>, ValidationError> {
    let mut seen = HashSet::with_capacity(texts.len());
    for text in &texts {
        if !seen.insert(text.as_str()) {
            return Err(ValidationError::DuplicateOption { text: text.clone() });
        }
    }

    Ok(texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| AnswerOption {
            text,
            correct: i == correct,
        })
        .collect())
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
