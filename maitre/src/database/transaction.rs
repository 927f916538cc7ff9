//! Transaction management utilities.
//!
//! Every write in the engine goes through [`Database::with_transaction`]. It
//! opens an IMMEDIATE transaction, which takes the write lock up front, so the
//! availability re-check performed inside `work` cannot race another writer.

use std::time::Duration;

use rusqlite::{Transaction, TransactionBehavior};

use crate::error::{Error, Result};

use super::connection::Database;

/// Base delay between attempts; attempt `n` waits `n` times this.
const RETRY_BACKOFF: Duration = Duration::from_millis(50);

impl Database {
    /// Runs `work` inside an IMMEDIATE transaction and commits it.
    ///
    /// If `work` returns an error the transaction is rolled back and the
    /// error is returned unchanged. If `SQLite` reports BUSY or LOCKED
    /// (while beginning, running or committing), the whole unit is retried up
    /// to `max_retries` times with a linear backoff; `work` must therefore be
    /// safe to call more than once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockTimeout`] once the retry budget is exhausted, or
    /// whatever error `work` produced.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use maitre::database::{Database, DatabaseConfig};
    /// use maitre::NewTable;
    ///
    /// let mut db = Database::open(DatabaseConfig::new("/tmp/maitre.db")).unwrap();
    /// let table = db
    ///     .with_transaction(|tx| Database::insert_table(tx, 1, &NewTable::new(1, 4)))
    ///     .unwrap();
    /// ```
    pub fn with_transaction<T, F>(&mut self, mut work: F) -> Result<T>
    where
        F: FnMut(&Transaction<'_>) -> Result<T>,
    {
        let max_attempts = self.config.max_retries.saturating_add(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.run_transaction(&mut work) {
                Err(err) if err.is_busy() => {
                    if attempt >= max_attempts {
                        log::warn!("giving up on write after {attempt} attempt(s): {err}");
                        return Err(Error::LockTimeout { attempts: attempt });
                    }
                    log::debug!("database busy on attempt {attempt}, retrying");
                    std::thread::sleep(RETRY_BACKOFF * attempt);
                }
                result => return result,
            }
        }
    }

    fn run_transaction<T, F>(&mut self, work: &mut F) -> Result<T>
    where
        F: FnMut(&Transaction<'_>) -> Result<T>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = work(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Runs `PRAGMA integrity_check`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseCorruption`] if the check reports problems.
    pub fn verify_integrity(&self) -> Result<()> {
        let result: String = self
            .conn
            .query_row("PRAGMA integrity_check", [], |row| row.get(0))?;

        if result == "ok" {
            Ok(())
        } else {
            Err(Error::DatabaseCorruption {
                details: format!("integrity check failed: {result}"),
            })
        }
    }
}
