/// Correct-answer tally for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreCard {
    correct: usize,
    answered: usize,
    total: usize,
}

impl ScoreCard {
    #[must_use]
    pub fn new(correct: usize, answered: usize, total: usize) -> Self {
        Self {
            correct,
            answered,
            total,
        }
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn answered(&self) -> usize {
        self.answered
    }

    #[must_use]
    pub fn wrong(&self) -> usize {
        self.answered - self.correct
    }

    /// Questions in the queue, answered or not.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// `round(100 * correct / total)`, halves rounded up. Zero for an empty queue.
    #[must_use]
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let rounded = (200 * self.correct + self.total) / (2 * self.total);
        u32::try_from(rounded).unwrap_or(u32::MAX)
    }
}
