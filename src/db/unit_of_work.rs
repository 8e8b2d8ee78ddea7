// src/db/unit_of_work.rs
//
// Transaction boundary for multi-entity mutations.
//
// Work receives repositories bound to one transaction. Returning `Ok`
// commits everything, returning `Err` rolls everything back; nothing is
// visible to other connections before the commit.

use rusqlite::TransactionBehavior;

use crate::db::connection::{get_connection, ConnectionPool};
use crate::error::{AppError, AppResult};
use crate::repositories::{RepositoryFactory, SqliteRepositoryFactory};

pub trait UnitOfWork: Send + Sync {
    fn execute(
        &self,
        work: &mut dyn FnMut(&dyn RepositoryFactory) -> AppResult<()>,
    ) -> AppResult<()>;
}

impl dyn UnitOfWork {
    /// `execute` for work that produces a value
    pub fn run<T, F>(&self, mut work: F) -> AppResult<T>
    where
        F: FnMut(&dyn RepositoryFactory) -> AppResult<T>,
    {
        let mut output = None;
        self.execute(&mut |repos| {
            output = Some(work(repos)?);
            Ok(())
        })?;
        output.ok_or_else(|| AppError::Other("Unit of work produced no result".to_string()))
    }
}

/// SQLite unit of work
///
/// Each call takes a pooled connection and opens an IMMEDIATE transaction,
/// so concurrent writers are serialised by the database write lock rather
/// than racing on positions.
pub struct SqliteUnitOfWork {
    pool: ConnectionPool,
}

impl SqliteUnitOfWork {
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }
}

impl UnitOfWork for SqliteUnitOfWork {
    fn execute(
        &self,
        work: &mut dyn FnMut(&dyn RepositoryFactory) -> AppResult<()>,
    ) -> AppResult<()> {
        let mut conn = get_connection(&self.pool)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let result = {
            let repos = SqliteRepositoryFactory::new(&tx);
            work(&repos)
        };

        match result {
            Ok(()) => {
                tx.commit()?;
                log::debug!("Unit of work committed");
                Ok(())
            }
            Err(e) => {
                if let Err(rollback_error) = tx.rollback() {
                    log::error!("Rollback failed after '{}': {}", e, rollback_error);
                } else {
                    log::warn!("Unit of work rolled back: {}", e);
                }
                Err(e)
            }
        }
    }
}
