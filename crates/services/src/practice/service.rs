use std::fmt;

use quiz_core::bank::Bank;
use quiz_core::model::{SetId, TagName};
use quiz_core::random::{RandomSource, ThreadRandom};
use quiz_core::selection::SelectionFilter;
use quiz_core::session::{PracticeSession, SessionEngine, SessionError, SessionState};
use tracing::{debug, info};

use super::view::{QuestionView, SessionResults};
use crate::Clock;
use crate::error::PracticeError;

/// Questions drawn per session unless configured otherwise.
pub const DEFAULT_SESSION_SIZE: usize = 10;

/// Drives practice sessions for a shell.
///
/// This service owns:
/// - the selection filters and requested session size
/// - the time source (`Clock`) and randomness
/// - at most one session, through `SessionEngine`
///
/// The bank is borrowed only when drawing; sessions never write back to it.
pub struct PracticeService {
    clock: Clock,
    rng: Box<dyn RandomSource + Send>,
    filter: SelectionFilter,
    requested: usize,
    engine: SessionEngine,
}

impl PracticeService {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            rng: Box::new(ThreadRandom),
            filter: SelectionFilter::new(),
            requested: DEFAULT_SESSION_SIZE,
            engine: SessionEngine::new(),
        }
    }

    /// Replace the random source, e.g. with a seeded or scripted one.
    #[must_use]
    pub fn with_random(mut self, rng: impl RandomSource + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    //
    // ─── CONFIGURATION ─────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn filter(&self) -> &SelectionFilter {
        &self.filter
    }

    #[must_use]
    pub fn requested_count(&self) -> usize {
        self.requested
    }

    /// # Errors
    ///
    /// Returns `SessionError::InvalidCount` for zero.
    pub fn set_requested_count(&mut self, count: usize) -> Result<(), PracticeError> {
        if count == 0 {
            return Err(SessionError::InvalidCount.into());
        }
        self.requested = count;
        Ok(())
    }

    pub fn include_set(&mut self, bank: &Bank, set_id: SetId, included: bool) {
        self.filter.set_included(set_id, included, bank.sets());
    }

    pub fn select_sets(&mut self, set_ids: impl IntoIterator<Item = SetId>) {
        self.filter = self.filter.clone().with_sets(set_ids);
    }

    pub fn select_all_sets(&mut self) {
        self.filter.select_all_sets();
    }

    pub fn toggle_tag(&mut self, tag: TagName) -> bool {
        self.filter.toggle_tag(tag)
    }

    pub fn clear_tags(&mut self) {
        self.filter.clear_tags();
    }

    #[must_use]
    pub fn available_count(&self, bank: &Bank) -> usize {
        self.filter.available_count(bank)
    }

    #[must_use]
    pub fn tag_catalog(&self, bank: &Bank) -> Vec<TagName> {
        bank.tag_catalog()
    }

    //
    // ─── SESSION LIFECYCLE ─────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.engine.state()
    }

    #[must_use]
    pub fn session(&self) -> Option<&PracticeSession> {
        self.engine.session()
    }

    /// Draw a session from the filtered pool.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyPool` when nothing matches the filters and
    /// `SessionError::AlreadyActive` while a session exists.
    pub fn start(&mut self, bank: &Bank) -> Result<QuestionView, PracticeError> {
        let pool = self.filter.pool(bank);
        let pool_size = pool.len();
        let now = self.clock.now();
        let session = self
            .engine
            .start(pool, self.requested, self.rng.as_mut(), now)?;
        info!(
            drawn = session.len(),
            pool = pool_size,
            requested = self.requested,
            "practice session started"
        );
        self.view()
    }

    /// # Errors
    ///
    /// Returns `PracticeError` without an active session, after finishing, or
    /// for an option the question does not have.
    pub fn answer(&mut self, choice: usize) -> Result<QuestionView, PracticeError> {
        let outcome = self.engine.answer(choice)?;
        debug!(
            chosen = outcome.answer().chosen,
            correct = outcome.answer().correct,
            new = outcome.is_new(),
            "answer"
        );
        self.view()
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` before `start`.
    pub fn advance(&mut self) -> Result<QuestionView, PracticeError> {
        self.engine.advance()?;
        self.view()
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` before `start` and
    /// `SessionError::Finished` after `finish`.
    pub fn reshuffle_options(&mut self) -> Result<QuestionView, PracticeError> {
        self.engine.reshuffle_current(self.rng.as_mut())?;
        self.view()
    }

    /// End the session now and return its results.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` before `start`.
    pub fn finish(&mut self) -> Result<SessionResults, PracticeError> {
        let score = self.engine.finish(self.clock.now())?;
        info!(
            correct = score.correct(),
            total = score.total(),
            percent = score.percent(),
            "practice session finished"
        );
        self.results()
    }

    /// Discard the session and go back to configuring.
    pub fn restart(&mut self) {
        if self.engine.restart().is_some() {
            debug!("practice session discarded");
        }
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` before `start`.
    pub fn view(&self) -> Result<QuestionView, PracticeError> {
        let session = self.active()?;
        Ok(QuestionView::from_session(session, self.clock.now()))
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` before `start`.
    pub fn results(&self) -> Result<SessionResults, PracticeError> {
        let session = self.active()?;
        Ok(SessionResults::from_session(session, self.clock.now()))
    }

    fn active(&self) -> Result<&PracticeSession, SessionError> {
        self.engine.session().ok_or(SessionError::NoActiveSession)
    }
}

impl fmt::Debug for PracticeService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticeService")
            .field("clock", &self.clock)
            .field("filter", &self.filter)
            .field("requested", &self.requested)
            .field("state", &self.engine.state())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
