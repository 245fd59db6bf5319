use chrono::{DateTime, Utc};

use crate::model::Question;
use crate::random::RandomSource;
use crate::session::{AnswerOutcome, PracticeSession, ScoreCard, SessionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session; filters are being chosen.
    Configuring,
    InProgress,
    Completed,
}

/// Owns at most one practice session and enforces the lifecycle around it.
#[derive(Debug, Clone, Default)]
pub struct SessionEngine {
    session: Option<PracticeSession>,
}

impl SessionEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        match &self.session {
            None => SessionState::Configuring,
            Some(session) if session.is_complete() => SessionState::Completed,
            Some(_) => SessionState::InProgress,
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&PracticeSession> {
        self.session.as_ref()
    }

    /// # Errors
    ///
    /// Returns `SessionError::AlreadyActive` if a session exists, otherwise
    /// whatever `PracticeSession::start` rejects.
    pub fn start<'a, I, R>(
        &mut self,
        pool: I,
        requested: usize,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<&PracticeSession, SessionError>
    where
        I: IntoIterator<Item = &'a Question>,
        R: RandomSource + ?Sized,
    {
        if self.session.is_some() {
            return Err(SessionError::AlreadyActive);
        }
        let session = PracticeSession::start(pool, requested, rng, now)?;
        Ok(self.session.insert(session))
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` before `start`.
    pub fn answer(&mut self, choice: usize) -> Result<AnswerOutcome, SessionError> {
        self.active_mut()?.answer(choice)
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` before `start`.
    pub fn advance(&mut self) -> Result<usize, SessionError> {
        Ok(self.active_mut()?.advance())
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` before `start` and
    /// `SessionError::Finished` after an explicit finish.
    pub fn reshuffle_current<R>(&mut self, rng: &mut R) -> Result<&Question, SessionError>
    where
        R: RandomSource + ?Sized,
    {
        let session = self.active_mut()?;
        if session.finished_at().is_some() {
            return Err(SessionError::Finished);
        }
        Ok(session.reshuffle_current(rng))
    }

    /// End the run early. Results stay readable until `restart`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` before `start`.
    pub fn finish(&mut self, now: DateTime<Utc>) -> Result<ScoreCard, SessionError> {
        let session = self.active_mut()?;
        session.finish(now);
        Ok(session.score())
    }

    /// Drop the session, whatever its state, and return to configuring.
    pub fn restart(&mut self) -> Option<PracticeSession> {
        self.session.take()
    }

    fn active_mut(&mut self) -> Result<&mut PracticeSession, SessionError> {
        self.session.as_mut().ok_or(SessionError::NoActiveSession)
    }
}
