use evently_result::Result;

use crate::MongoDb;

use super::AbstractMigrations;

mod init;

#[async_trait]
impl AbstractMigrations for MongoDb {
    #[cfg(test)]
    /// Drop the database
    async fn drop_database(&self) {
        self.db().drop().await.ok();
    }

    /// Make sure all collections and indexes exist
    async fn migrate_database(&self) -> Result<()> {
        info!("Migrating the database.");
        init::create_database(self).await
    }
}
