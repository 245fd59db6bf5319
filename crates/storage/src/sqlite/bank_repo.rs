use async_trait::async_trait;
use chrono::Utc;
use quiz_core::bank::Bank;
use sqlx::Row;

use crate::repository::{BankRepository, StorageError, decode_snapshot, encode_snapshot};

use super::SqliteRepository;

#[async_trait]
impl BankRepository for SqliteRepository {
    async fn load_bank(&self) -> Result<Bank, StorageError> {
        let row = sqlx::query("SELECT payload FROM bank_snapshot WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(Bank::new());
        };

        let payload: String = row
            .try_get("payload")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        decode_snapshot(&payload)
    }

    async fn save_bank(&self, bank: &Bank) -> Result<(), StorageError> {
        let payload = encode_snapshot(bank)?;

        sqlx::query(
            r"
            INSERT INTO bank_snapshot (id, payload, saved_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                payload = excluded.payload,
                saved_at = excluded.saved_at
            ",
        )
        .bind(1_i64)
        .bind(&payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        tracing::debug!(
            sets = bank.sets().len(),
            questions = bank.question_count(),
            "saved bank snapshot"
        );
        Ok(())
    }
}
