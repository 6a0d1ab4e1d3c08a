#[cfg(feature = "mongodb")]
mod mongodb;
mod reference;

use evently_config::config;
use evently_result::Result;

#[cfg(feature = "mongodb")]
pub use self::mongodb::*;
pub use self::reference::*;

/// Database information to use to create a client
pub enum DatabaseInfo {
    /// Auto-detect the database in use
    Auto,
    /// Auto-detect the database in use and create an empty testing database
    Test(String),
    /// Use the mock database
    Reference,
    /// Connect to MongoDB
    #[cfg(feature = "mongodb")]
    MongoDb { uri: String, database_name: String },
    /// Use existing MongoDB connection
    #[cfg(feature = "mongodb")]
    MongoDbFromClient(::mongodb::Client, String),
}

/// Database
#[derive(Clone)]
pub enum Database {
    /// Mock database
    Reference(ReferenceDb),
    /// MongoDB database
    #[cfg(feature = "mongodb")]
    MongoDb(MongoDb),
}

impl DatabaseInfo {
    /// Create a database client from the given database information
    #[async_recursion]
    pub async fn connect(self) -> Result<Database> {
        match self {
            DatabaseInfo::Auto => {
                if std::env::var("TEST_DB").is_ok() {
                    DatabaseInfo::Test(format!(
                        "evently_test_{}",
                        ulid::Ulid::new().to_string().to_lowercase()
                    ))
                    .connect()
                    .await
                } else {
                    let config = config().await;
                    let uri = config.require_mongodb()?;

                    // A database named in the connection string wins over the configured one
                    #[cfg(feature = "mongodb")]
                    return {
                        let options = MongoDb::parse_options(&uri).await?;
                        let database_name = options
                            .default_database
                            .clone()
                            .unwrap_or(config.database.name);

                        let db = MongoDb::from_options(options, database_name)?;
                        db.ping().await?;
                        Ok(Database::MongoDb(db))
                    };

                    #[cfg(not(feature = "mongodb"))]
                    return {
                        let _ = uri;
                        Err(create_error!(ConnectionFailed {
                            reason: "MongoDB not enabled.".to_string()
                        }))
                    };
                }
            }
            DatabaseInfo::Test(database_name) => {
                // Tests run against the reference implementation unless asked otherwise
                match std::env::var("TEST_DB")
                    .unwrap_or_else(|_| "REFERENCE".to_string())
                    .as_str()
                {
                    "REFERENCE" => DatabaseInfo::Reference.connect().await,
                    "MONGODB" => {
                        let uri = config().await.require_mongodb()?;

                        #[cfg(feature = "mongodb")]
                        return DatabaseInfo::MongoDb { uri, database_name }
                            .connect()
                            .await;

                        #[cfg(not(feature = "mongodb"))]
                        return {
                            let _ = (uri, database_name);
                            Err(create_error!(ConnectionFailed {
                                reason: "MongoDB not enabled.".to_string()
                            }))
                        };
                    }
                    other => Err(create_error!(ConnectionFailed {
                        reason: format!("`TEST_DB` must be REFERENCE or MONGODB, got `{other}`")
                    })),
                }
            }
            DatabaseInfo::Reference => Ok(Database::Reference(Default::default())),
            #[cfg(feature = "mongodb")]
            DatabaseInfo::MongoDb { uri, database_name } => {
                MongoDb::connect(&uri, database_name).await.map(Database::MongoDb)
            }
            #[cfg(feature = "mongodb")]
            DatabaseInfo::MongoDbFromClient(client, database_name) => {
                Ok(Database::MongoDb(MongoDb(client, database_name)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DatabaseInfo};

    #[async_std::test]
    async fn reference_connects_without_configuration() {
        let db = DatabaseInfo::Reference.connect().await.unwrap();
        assert!(matches!(db, Database::Reference(_)));
    }
}
