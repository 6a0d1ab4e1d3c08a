use std::future::Future;
use std::sync::Arc;

use evently_result::Result;
use futures::future::{BoxFuture, FutureExt, Shared};
use futures::lock::Mutex;
use once_cell::sync::Lazy;

use crate::{Database, DatabaseInfo};

type Attempt<T> = Shared<BoxFuture<'static, Result<Arc<T>>>>;

/// Memoised connection with single-flight semantics
///
/// Every caller that arrives while an attempt is in flight awaits that same
/// attempt and observes the same outcome. A successful attempt is kept
/// forever; a failed one is forgotten so the next caller starts afresh.
pub struct ConnectionCache<T> {
    attempt: Mutex<Option<Attempt<T>>>,
}

impl<T: Send + Sync + 'static> Default for ConnectionCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync + 'static> ConnectionCache<T> {
    /// Create an empty cache
    pub fn new() -> Self {
        ConnectionCache {
            attempt: Mutex::new(None),
        }
    }

    /// Get the cached connection or establish it using `connect`
    ///
    /// `connect` is only invoked when there is neither a finished connection
    /// nor an attempt in flight.
    pub async fn get_or_connect<F, Fut>(&self, connect: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let attempt = {
            let mut slot = self.attempt.lock().await;
            match slot.as_ref() {
                Some(attempt) => {
                    debug!("Reusing existing connection attempt.");
                    attempt.clone()
                }
                None => {
                    let attempt = connect().map(|result| result.map(Arc::new)).boxed().shared();
                    *slot = Some(attempt.clone());
                    attempt
                }
            }
        };

        let result = attempt.clone().await;
        if result.is_err() {
            let mut slot = self.attempt.lock().await;
            if slot
                .as_ref()
                .is_some_and(|current| current.ptr_eq(&attempt))
            {
                *slot = None;
            }
        }

        result
    }

    /// Get the connection if it has already been established
    pub async fn get(&self) -> Option<Arc<T>> {
        self.attempt
            .lock()
            .await
            .as_ref()
            .and_then(|attempt| attempt.peek())
            .and_then(|result| result.as_ref().ok())
            .cloned()
    }
}

static DATABASE: Lazy<ConnectionCache<Database>> = Lazy::new(ConnectionCache::new);

/// Connect to the configured database, reusing the connection if one exists
///
/// The first successful call also makes sure all collections and indexes
/// exist. Fails with `MissingConfiguration` if no connection string was set.
pub async fn connect() -> Result<Arc<Database>> {
    DATABASE
        .get_or_connect(|| async {
            info!("Connecting to the database.");

            let db = DatabaseInfo::Auto.connect().await.map_err(|error| {
                warn!("Failed to connect to the database: {error}");
                error
            })?;

            db.migrate_database().await.map_err(|error| {
                warn!("Failed to prepare the database: {error}");
                error
            })?;

            info!("Connected to the database.");
            Ok(db)
        })
        .await
}

/// Get the process-wide database if `connect` has already succeeded
pub async fn get_db() -> Option<Arc<Database>> {
    DATABASE.get().await
}
