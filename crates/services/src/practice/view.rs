use chrono::{DateTime, Utc};
use quiz_core::model::QuestionId;
use quiz_core::session::{PracticeSession, ScoreCard};
use quiz_core::time::Elapsed;

/// Presentation-agnostic snapshot of the current question.
///
/// Correctness is only revealed once the question has been answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    /// 1-based position in the queue.
    pub position: usize,
    pub total: usize,
    pub question_id: QuestionId,
    pub prompt: String,
    pub options: Vec<OptionView>,
    pub feedback: Option<AnswerFeedback>,
    pub is_last: bool,
    pub is_complete: bool,
    pub correct_so_far: usize,
    pub elapsed: Elapsed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub letter: char,
    pub text: String,
    pub chosen: bool,
    /// `None` until the question is answered.
    pub correct: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub chosen: usize,
    pub is_correct: bool,
    pub correct_text: String,
    pub explanation: Option<String>,
}

/// Final numbers for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResults {
    pub score: ScoreCard,
    pub percent: u32,
    pub elapsed: Elapsed,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl QuestionView {
    #[must_use]
    pub fn from_session(session: &PracticeSession, now: DateTime<Utc>) -> Self {
        let question = session.current();
        let answer = session.current_answer();

        let options = question
            .options()
            .iter()
            .enumerate()
            .map(|(index, option)| OptionView {
                letter: option_letter(index),
                text: option.text().to_owned(),
                chosen: answer.is_some_and(|a| a.chosen == index),
                correct: answer.map(|_| option.is_correct()),
            })
            .collect();

        let feedback = answer.map(|a| AnswerFeedback {
            chosen: a.chosen,
            is_correct: a.is_correct(),
            correct_text: question.correct_option().to_owned(),
            explanation: question.explanation().map(str::to_owned),
        });

        Self {
            position: session.index() + 1,
            total: session.len(),
            question_id: question.id(),
            prompt: question.prompt().to_owned(),
            options,
            feedback,
            is_last: session.is_last(),
            is_complete: session.is_complete(),
            correct_so_far: session.correct_count(),
            elapsed: session.elapsed(now),
        }
    }
}

impl SessionResults {
    #[must_use]
    pub fn from_session(session: &PracticeSession, now: DateTime<Utc>) -> Self {
        let score = session.score();
        Self {
            score,
            percent: score.percent(),
            elapsed: session.elapsed(now),
            started_at: session.started_at(),
            finished_at: session.finished_at(),
        }
    }
}

/// `A`, `B`, `C`, ... for the first 26 options, `?` beyond.
#[must_use]
pub fn option_letter(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map_or('?', |i| char::from(b'A' + i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::model::{Question, QuestionDraft};
    use quiz_core::random::ScriptedRandom;
    use quiz_core::time::fixed_now;

    fn session() -> PracticeSession {
        let question = Question::create(
            QuestionDraft::new("Q", ["uno", "due", "tre"], 1).with_explanation("perché"),
            fixed_now(),
        )
        .unwrap();
        PracticeSession::start([&question], 1, &mut ScriptedRandom::identity(), fixed_now())
            .unwrap()
    }

    #[test]
    fn letters_options() {
        assert_eq!(option_letter(0), 'A');
        assert_eq!(option_letter(25), 'Z');
        assert_eq!(option_letter(26), '?');
    }

    #[test]
    fn hides_correctness_until_answered() {
        let view = QuestionView::from_session(&session(), fixed_now());
        assert_eq!(view.position, 1);
        assert_eq!(view.total, 1);
        assert!(view.feedback.is_none());
        assert!(view.options.iter().all(|o| o.correct.is_none() && !o.chosen));
        assert!(!view.is_complete);
    }

    #[test]
    fn shows_feedback_after_answering() {
        let mut session = session();
        session.answer(0).unwrap();
        let view = QuestionView::from_session(&session, fixed_now() + Duration::seconds(61));

        let feedback = view.feedback.unwrap();
        assert!(!feedback.is_correct);
        assert_eq!(feedback.correct_text, "due");
        assert_eq!(feedback.explanation.as_deref(), Some("perché"));
        assert!(view.options[0].chosen);
        assert_eq!(view.options[1].correct, Some(true));
        assert_eq!(view.elapsed.to_string(), "1m 1s");
        assert!(view.is_complete);
    }
}
