//! JSON document format shared by export, import and the stored snapshot.
//!
//! A document is a JSON array of sets, each with its questions nested inline.
//! Timestamps are epoch milliseconds.

use chrono::{DateTime, Utc};
use quiz_core::model::{ParseIdError, Question, QuestionId, QuizSet, SetId, ValidationError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DocumentError {
    #[error("document is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("document must be an array of sets")]
    NotACollection,

    #[error("document does not have the expected shape: {0}")]
    Shape(#[source] serde_json::Error),

    #[error(transparent)]
    InvalidId(#[from] ParseIdError),

    #[error("timestamp {0} is out of range")]
    InvalidTimestamp(i64),

    #[error("set {set:?} is invalid: {source}")]
    InvalidSet {
        set: String,
        #[source]
        source: ValidationError,
    },

    #[error("question {prompt:?} in set {set:?} is invalid: {source}")]
    InvalidQuestion {
        set: String,
        prompt: String,
        #[source]
        source: ValidationError,
    },
}

/// Serialized form of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            id: Some(question.id().to_string()),
            prompt: question.prompt().to_owned(),
            options: question.option_texts().map(str::to_owned).collect(),
            correct_index: question.correct_index(),
            explanation: question.explanation().map(str::to_owned),
            tags: question.tags().iter().map(ToString::to_string).collect(),
            created_at: Some(question.created_at().timestamp_millis()),
        }
    }
}

/// Serialized form of a set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<QuestionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

impl SetRecord {
    #[must_use]
    pub fn from_set(set: &QuizSet) -> Self {
        Self {
            id: Some(set.id().to_string()),
            name: set.name().to_owned(),
            description: set.description().map(str::to_owned),
            questions: set.questions().iter().map(QuestionRecord::from_question).collect(),
            created_at: Some(set.created_at().timestamp_millis()),
        }
    }

    /// Convert the record back into a domain `QuizSet`.
    ///
    /// Missing ids are generated and missing timestamps default to `now`, so
    /// hand-written documents import cleanly.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError` if an id, timestamp, set or question is invalid.
    pub fn into_set(self, now: DateTime<Utc>) -> Result<QuizSet, DocumentError> {
        let mut questions = Vec::with_capacity(self.questions.len());
        for record in self.questions {
            let id = match record.id.as_deref() {
                Some(raw) => raw.parse::<QuestionId>()?,
                None => QuestionId::generate(),
            };
            let created_at = timestamp(record.created_at, now)?;
            let question = Question::from_persisted(
                id,
                record.prompt.clone(),
                record.options,
                record.correct_index,
                record.explanation,
                record.tags,
                created_at,
            )
            .map_err(|source| DocumentError::InvalidQuestion {
                set: self.name.clone(),
                prompt: record.prompt,
                source,
            })?;
            questions.push(question);
        }

        let id = match self.id.as_deref() {
            Some(raw) => raw.parse::<SetId>()?,
            None => SetId::generate(),
        };
        let created_at = timestamp(self.created_at, now)?;
        QuizSet::from_persisted(id, self.name.clone(), self.description, questions, created_at)
            .map_err(|source| DocumentError::InvalidSet {
                set: self.name,
                source,
            })
    }
}

fn timestamp(millis: Option<i64>, now: DateTime<Utc>) -> Result<DateTime<Utc>, DocumentError> {
    match millis {
        Some(ms) => DateTime::from_timestamp_millis(ms).ok_or(DocumentError::InvalidTimestamp(ms)),
        None => Ok(now),
    }
}

/// Render sets as a pretty-printed JSON document.
///
/// # Errors
///
/// Returns `DocumentError::Json` if serialization fails.
pub fn encode_document(sets: &[QuizSet]) -> Result<String, DocumentError> {
    let records: Vec<SetRecord> = sets.iter().map(SetRecord::from_set).collect();
    serde_json::to_string_pretty(&records).map_err(DocumentError::Json)
}

/// Parse a document into sets. Nothing is returned unless every entry is valid.
///
/// # Errors
///
/// Returns `DocumentError` when the text is not JSON, is not an array, or any
/// entry violates the model.
pub fn decode_document(text: &str, now: DateTime<Utc>) -> Result<Vec<QuizSet>, DocumentError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(DocumentError::Json)?;
    if !value.is_array() {
        return Err(DocumentError::NotACollection);
    }
    let records: Vec<SetRecord> = serde_json::from_value(value).map_err(DocumentError::Shape)?;
    records.into_iter().map(|r| r.into_set(now)).collect()
}

/// Suggested file name for an export made on `date`.
#[must_use]
pub fn export_file_name(date: DateTime<Utc>) -> String {
    format!("quiz_bank_{}.json", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::bank::Bank;
    use quiz_core::model::QuestionDraft;
    use quiz_core::time::fixed_now;

    fn sample_sets() -> Vec<QuizSet> {
        let mut bank = Bank::new();
        let set_id = bank.add_set(
            QuizSet::new(
                SetId::generate(),
                "diritto penale",
                Some("Parte generale".into()),
                fixed_now(),
            )
            .unwrap(),
        );
        let question = Question::create(
            QuestionDraft::new(
                "Qual è l'art. 1 c.p.?",
                ["Legalità", "Analogia", "Retroattività"],
                0,
            )
            .with_explanation("Principio di legalità")
            .with_tags("penale, principi"),
            fixed_now(),
        )
        .unwrap();
        bank.add_question(set_id, question).unwrap();
        bank.into_sets()
    }

    #[test]
    fn export_uses_camel_case_and_epoch_millis() {
        let text = encode_document(&sample_sets()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let set = &value[0];
        assert_eq!(set["name"], "Diritto Penale");
        assert_eq!(set["createdAt"], fixed_now().timestamp_millis());
        let question = &set["questions"][0];
        assert_eq!(question["correctIndex"], 0);
        assert_eq!(question["tags"], serde_json::json!(["penale", "principi"]));
        assert_eq!(question["explanation"], "Principio di legalità");
    }

    #[test]
    fn decode_restores_what_encode_wrote() {
        let sets = sample_sets();
        let decoded = decode_document(&encode_document(&sets).unwrap(), fixed_now()).unwrap();
        assert_eq!(decoded, sets);
    }

    #[test]
    fn rejects_non_json() {
        let err = decode_document("not json {", fixed_now()).unwrap_err();
        assert!(matches!(err, DocumentError::Json(_)));
    }

    #[test]
    fn rejects_single_set_object() {
        let err = decode_document(r#"{"name": "Solo", "questions": []}"#, fixed_now()).unwrap_err();
        assert!(matches!(err, DocumentError::NotACollection));
    }

    #[test]
    fn rejects_wrong_shape() {
        let err = decode_document(r#"[{"title": "x"}]"#, fixed_now()).unwrap_err();
        assert!(matches!(err, DocumentError::Shape(_)));
    }

    #[test]
    fn rejects_question_breaking_the_model() {
        let text = r#"[{"name": "A", "questions": [
            {"prompt": "Q", "options": ["only one"], "correctIndex": 0}
        ]}]"#;
        let err = decode_document(text, fixed_now()).unwrap_err();
        assert!(matches!(
            err,
            DocumentError::InvalidQuestion {
                source: ValidationError::TooFewOptions { found: 1 },
                ..
            }
        ));
    }

    #[test]
    fn rejects_bad_ids() {
        let err = decode_document(r#"[{"id": "abc", "name": "A"}]"#, fixed_now()).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidId(_)));
    }

    #[test]
    fn missing_ids_and_timestamps_are_filled_in() {
        let text = r#"[{"name": "A", "questions": [
            {"prompt": "Q", "options": ["x", "y"], "correctIndex": 1}
        ]}]"#;
        let sets = decode_document(text, fixed_now()).unwrap();
        assert_eq!(sets[0].created_at(), fixed_now());
        assert_eq!(sets[0].questions()[0].correct_option(), "y");
    }

    #[test]
    fn empty_array_is_an_empty_collection() {
        assert!(decode_document("[]", fixed_now()).unwrap().is_empty());
    }

    #[test]
    fn file_name_carries_the_date() {
        assert_eq!(export_file_name(fixed_now()), "quiz_bank_2023-11-14.json");
    }
}
