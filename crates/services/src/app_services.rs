use storage::repository::Storage;

use crate::Clock;
use crate::bank_service::BankService;
use crate::error::AppServicesError;
use crate::practice::PracticeService;

/// Assembles the services a shell needs over one storage backend.
pub struct AppServices {
    bank: BankService,
    practice: PracticeService,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or migrated.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(storage, clock).await)
    }

    /// Build services over an already assembled storage handle.
    pub async fn from_storage(storage: Storage, clock: Clock) -> Self {
        let bank = BankService::load(clock, storage.bank).await;
        let practice = PracticeService::new(clock);
        Self { bank, practice }
    }

    #[must_use]
    pub fn bank(&self) -> &BankService {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut BankService {
        &mut self.bank
    }

    pub fn practice_mut(&mut self) -> &mut PracticeService {
        &mut self.practice
    }

    /// Borrow the bank for reading while driving the practice service.
    pub fn split_mut(&mut self) -> (&BankService, &mut PracticeService) {
        (&self.bank, &mut self.practice)
    }

    /// Swap in a different practice service, e.g. one with a seeded random source.
    #[must_use]
    pub fn with_practice(mut self, practice: PracticeService) -> Self {
        self.practice = practice;
        self
    }
}
