//! Transaction helper
//!
//! Runs a closure inside a database transaction: committed when the closure
//! returns `Ok`, rolled back when it returns `Err` or the future is dropped.

use metrics::counter;
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionError, TransactionTrait};
use std::future::Future;
use std::pin::Pin;
use tracing::debug;

/// Type alias for boxed future used in transactions
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Execute a function within a database transaction
///
/// ```rust,ignore
/// let removed = with_transaction::<_, _, ServiceError>(&db, |txn| {
///     Box::pin(async move { WarehouseRepository::delete_with_products(txn, id).await })
/// })
/// .await?;
/// ```
pub async fn with_transaction<F, T, E>(db: &DatabaseConnection, f: F) -> Result<T, E>
where
    F: for<'c> FnOnce(&'c DatabaseTransaction) -> BoxFuture<'c, Result<T, E>> + Send,
    T: Send,
    E: std::error::Error + From<DbErr> + Send,
{
    let start = std::time::Instant::now();
    debug!("Starting database transaction");

    let result = db.transaction(f).await;

    let elapsed = start.elapsed();
    match &result {
        Ok(_) => {
            counter!("warehouse_manager_db.transaction.committed", 1);
            debug!("Transaction committed in {:?}", elapsed);
        }
        Err(_) => {
            counter!("warehouse_manager_db.transaction.rolled_back", 1);
            debug!("Transaction rolled back after {:?}", elapsed);
        }
    }

    result.map_err(|e| match e {
        TransactionError::Connection(db_err) => E::from(db_err),
        TransactionError::Transaction(err) => err,
    })
}
