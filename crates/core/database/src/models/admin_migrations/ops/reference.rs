use evently_result::Result;

use crate::ReferenceDb;

use super::AbstractMigrations;

#[async_trait]
impl AbstractMigrations for ReferenceDb {
    #[cfg(test)]
    /// Drop the database
    async fn drop_database(&self) {
        self.events.lock().await.clear();
        self.bookings.lock().await.clear();
    }

    /// Make sure all collections and indexes exist
    async fn migrate_database(&self) -> Result<()> {
        // Uniqueness is checked by the collection operations themselves.
        Ok(())
    }
}
