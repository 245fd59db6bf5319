use chrono::{DateTime, Utc};

use crate::model::{Question, QuestionId};
use crate::random::{RandomSource, shuffle_in_place};
use crate::session::{ScoreCard, SessionError};
use crate::time::Elapsed;

/// The first answer given to a question, with the correct index at that moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedAnswer {
    pub question_id: QuestionId,
    pub chosen: usize,
    pub correct: usize,
}

impl RecordedAnswer {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.chosen == self.correct
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Recorded(RecordedAnswer),
    /// The question was already answered; carries the answer that stands.
    AlreadyAnswered(RecordedAnswer),
}

impl AnswerOutcome {
    #[must_use]
    pub fn answer(&self) -> &RecordedAnswer {
        match self {
            Self::Recorded(answer) | Self::AlreadyAnswered(answer) => answer,
        }
    }

    #[must_use]
    pub fn is_new(&self) -> bool {
        matches!(self, Self::Recorded(_))
    }
}

/// One practice run over an owned snapshot of drawn questions.
///
/// The queue is never empty. `index` only moves forward and answers are
/// immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeSession {
    queue: Vec<Question>,
    index: usize,
    answers: Vec<RecordedAnswer>,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl PracticeSession {
    /// Draw up to `requested` questions from `pool` in uniformly random order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyPool` when the pool has no questions and
    /// `SessionError::InvalidCount` when `requested` is zero.
    pub fn start<'a, I, R>(
        pool: I,
        requested: usize,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = &'a Question>,
        R: RandomSource + ?Sized,
    {
        let mut queue: Vec<Question> = pool.into_iter().cloned().collect();
        if queue.is_empty() {
            return Err(SessionError::EmptyPool);
        }
        if requested == 0 {
            return Err(SessionError::InvalidCount);
        }

        shuffle_in_place(&mut queue, rng);
        queue.truncate(requested);

        Ok(Self {
            queue,
            index: 0,
            answers: Vec::new(),
            started_at: now,
            finished_at: None,
        })
    }

    #[must_use]
    pub fn queue(&self) -> &[Question] {
        &self.queue
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn current(&self) -> &Question {
        &self.queue[self.index]
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.queue.len()
    }

    /// Recorded answers in the order they were given.
    #[must_use]
    pub fn answers(&self) -> &[RecordedAnswer] {
        &self.answers
    }

    #[must_use]
    pub fn answer_for(&self, id: QuestionId) -> Option<&RecordedAnswer> {
        self.answers.iter().find(|a| a.question_id == id)
    }

    #[must_use]
    pub fn current_answer(&self) -> Option<&RecordedAnswer> {
        self.answer_for(self.current().id())
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Done when explicitly finished, or when the last question is answered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.finished_at.is_some() || (self.is_last() && self.current_answer().is_some())
    }

    /// Record an answer for the current question. Does not advance.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Finished` after `finish`, and
    /// `SessionError::OptionOutOfRange` for a choice the question does not have.
    pub fn answer(&mut self, choice: usize) -> Result<AnswerOutcome, SessionError> {
        if self.finished_at.is_some() {
            return Err(SessionError::Finished);
        }
        if let Some(existing) = self.current_answer() {
            return Ok(AnswerOutcome::AlreadyAnswered(*existing));
        }

        let question = self.current();
        let len = question.option_count();
        if choice >= len {
            return Err(SessionError::OptionOutOfRange { choice, len });
        }

        let recorded = RecordedAnswer {
            question_id: question.id(),
            chosen: choice,
            correct: question.correct_index(),
        };
        self.answers.push(recorded);
        Ok(AnswerOutcome::Recorded(recorded))
    }

    /// Move to the next question, staying put on the last one.
    pub fn advance(&mut self) -> usize {
        if !self.is_last() {
            self.index += 1;
        }
        self.index
    }

    /// Shuffle the current question's options. Recorded answers are left as is.
    pub fn reshuffle_current<R>(&mut self, rng: &mut R) -> &Question
    where
        R: RandomSource + ?Sized,
    {
        let question = &mut self.queue[self.index];
        question.shuffle_options(rng);
        question
    }

    pub fn finish(&mut self, now: DateTime<Utc>) {
        if self.finished_at.is_none() {
            self.finished_at = Some(now);
        }
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct()).count()
    }

    #[must_use]
    pub fn score(&self) -> ScoreCard {
        ScoreCard::new(self.correct_count(), self.answers.len(), self.queue.len())
    }

    /// Time since start; frozen at the finish time once finished.
    #[must_use]
    pub fn elapsed(&self, now: DateTime<Utc>) -> Elapsed {
        Elapsed::between(self.started_at, self.finished_at.unwrap_or(now))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::Duration;

    use super::*;
    use crate::model::QuestionDraft;
    use crate::random::{ScriptedRandom, SeededRandom};
    use crate::time::fixed_now;

    fn pool(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| {
                Question::create(
                    QuestionDraft::new(format!("Q{i}"), ["a", "b", "c"], i % 3),
                    fixed_now(),
                )
                .unwrap()
            })
            .collect()
    }

    fn identity_session(pool: &[Question], requested: usize) -> PracticeSession {
        PracticeSession::start(pool, requested, &mut ScriptedRandom::identity(), fixed_now())
            .unwrap()
    }

    #[test]
    fn draws_at_most_pool_size_each_question_once() {
        let pool = pool(4);
        let session =
            PracticeSession::start(&pool, 10, &mut SeededRandom::new(7), fixed_now()).unwrap();

        assert_eq!(session.len(), 4);
        let drawn: HashSet<QuestionId> = session.queue().iter().map(Question::id).collect();
        let expected: HashSet<QuestionId> = pool.iter().map(Question::id).collect();
        assert_eq!(drawn, expected);
        assert_eq!(session.index(), 0);
        assert!(session.answers().is_empty());
        assert_eq!(session.started_at(), fixed_now());
    }

    #[test]
    fn takes_prefix_of_the_permutation() {
        let pool = pool(4);
        // Fisher-Yates with draws 0,0,0 over [Q0..Q3] yields [Q1, Q2, Q3, Q0].
        let session =
            PracticeSession::start(&pool, 2, &mut ScriptedRandom::new([0, 0, 0]), fixed_now())
                .unwrap();
        let prompts: Vec<&str> = session.queue().iter().map(Question::prompt).collect();
        assert_eq!(prompts, vec!["Q1", "Q2"]);
    }

    #[test]
    fn empty_pool_is_rejected() {
        let err = PracticeSession::start(
            &Vec::<Question>::new(),
            10,
            &mut ScriptedRandom::identity(),
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, SessionError::EmptyPool);
    }

    #[test]
    fn zero_count_is_rejected() {
        let pool = pool(2);
        let err = PracticeSession::start(&pool, 0, &mut ScriptedRandom::identity(), fixed_now())
            .unwrap_err();
        assert_eq!(err, SessionError::InvalidCount);
    }

    #[test]
    fn first_answer_is_final() {
        let pool = pool(2);
        let mut session = identity_session(&pool, 2);

        let first = session.answer(1).unwrap();
        assert!(first.is_new());
        let second = session.answer(0).unwrap();
        assert_eq!(second, AnswerOutcome::AlreadyAnswered(*first.answer()));
        assert_eq!(session.answers().len(), 1);
        assert_eq!(session.answers()[0].chosen, 1);
        assert_eq!(session.index(), 0);
    }

    #[test]
    fn answer_out_of_range_is_rejected() {
        let pool = pool(1);
        let mut session = identity_session(&pool, 1);
        assert_eq!(
            session.answer(3),
            Err(SessionError::OptionOutOfRange { choice: 3, len: 3 })
        );
        assert!(session.answers().is_empty());
    }

    #[test]
    fn advance_clamps_at_last_question() {
        let pool = pool(2);
        let mut session = identity_session(&pool, 2);
        assert_eq!(session.advance(), 1);
        assert!(session.is_last());
        assert_eq!(session.advance(), 1);
    }

    #[test]
    fn completes_when_last_question_answered() {
        let pool = pool(2);
        let mut session = identity_session(&pool, 2);
        session.answer(0).unwrap();
        assert!(!session.is_complete());
        session.advance();
        session.answer(0).unwrap();
        assert!(session.is_complete());
    }

    #[test]
    fn three_of_five_correct_scores_sixty() {
        let pool = pool(5);
        let mut session = identity_session(&pool, 5);
        for i in 0..5 {
            let correct = session.current().correct_index();
            let choice = if i < 3 { correct } else { (correct + 1) % 3 };
            session.answer(choice).unwrap();
            session.advance();
        }
        assert_eq!(session.correct_count(), 3);
        assert_eq!(session.score().percent(), 60);
    }

    #[test]
    fn reshuffle_keeps_correct_text_and_leaves_answers_and_pool_alone() {
        let pool = pool(1);
        let mut session = identity_session(&pool, 1);
        let correct_text = session.current().correct_option().to_owned();
        session.answer(0).unwrap();
        let recorded = session.answers()[0];

        let question = session.reshuffle_current(&mut ScriptedRandom::new([0, 0]));
        assert_eq!(question.correct_option(), correct_text);
        assert_eq!(session.answers()[0], recorded);
        assert_eq!(session.score().correct(), 1);
        assert_eq!(pool[0].option(0), Some("a"));
        assert_ne!(session.current().option(0), Some("a"));
    }

    #[test]
    fn finish_blocks_answers_and_freezes_elapsed() {
        let pool = pool(3);
        let mut session = identity_session(&pool, 3);
        let end = fixed_now() + Duration::seconds(75);
        session.finish(end);

        assert!(session.is_complete());
        assert_eq!(session.answer(0), Err(SessionError::Finished));
        assert_eq!(session.elapsed(end + Duration::hours(1)).to_string(), "1m 15s");
        assert_eq!(session.score().percent(), 0);
    }
}
