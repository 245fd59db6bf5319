use chrono::{DateTime, Utc};

use crate::model::{Question, QuestionId, SetId, ValidationError};

/// Canonical display form of a set name.
///
/// Whitespace runs collapse to a single space, the ends are trimmed, and the
/// first letter of every word is upper-cased. The rest of each word is kept
/// as typed, so acronyms survive.
#[must_use]
pub fn canonical_set_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A named collection of questions.
///
/// The set owns its questions; a question never appears in two sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSet {
    id: SetId,
    name: String,
    description: Option<String>,
    questions: Vec<Question>,
    created_at: DateTime<Utc>,
}

impl QuizSet {
    /// Creates an empty set with a canonicalized name.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptySetName` if the canonical name is empty.
    pub fn new(
        id: SetId,
        name: &str,
        description: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let name = canonical_set_name(name);
        if name.is_empty() {
            return Err(ValidationError::EmptySetName);
        }

        Ok(Self {
            id,
            name,
            description: clean_description(description),
            questions: Vec::new(),
            created_at,
        })
    }

    /// Rehydrate a set from stored or imported data.
    ///
    /// The name is only trimmed, never re-cased: it is the reconciliation key
    /// and must match what was exported.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptySetName` if the name is blank.
    pub fn from_persisted(
        id: SetId,
        name: impl Into<String>,
        description: Option<String>,
        questions: Vec<Question>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let name: String = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptySetName);
        }

        Ok(Self {
            id,
            name: name.to_owned(),
            description: clean_description(description),
            questions,
            created_at,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> SetId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // Mutators used by the bank; identity and metadata never change here.
    pub(crate) fn push_question(&mut self, question: Question) {
        self.questions.push(question);
    }

    pub(crate) fn replace_question(&mut self, question: Question) -> bool {
        match self.questions.iter_mut().find(|q| q.id() == question.id()) {
            Some(slot) => {
                *slot = question;
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove_question(&mut self, id: QuestionId) -> Option<Question> {
        let index = self.questions.iter().position(|q| q.id() == id)?;
        Some(self.questions.remove(index))
    }

    pub(crate) fn into_questions(self) -> Vec<Question> {
        self.questions
    }
}

fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_owned())
        .filter(|d| !d.is_empty())
}
