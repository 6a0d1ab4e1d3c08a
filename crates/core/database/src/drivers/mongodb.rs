use std::ops::Deref;

use evently_result::Result;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, FindOneOptions, FindOptions};
use mongodb::results::{DeleteResult, InsertOneResult, UpdateResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Server error code for a unique index violation
const DUPLICATE_KEY: i32 = 11000;

database_derived!(
    /// MongoDB implementation
    pub struct MongoDb(pub ::mongodb::Client, pub String);
);

impl Deref for MongoDb {
    type Target = mongodb::Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl MongoDb {
    /// Parse a connection string into client options
    pub async fn parse_options(uri: &str) -> Result<ClientOptions> {
        ClientOptions::parse(uri).await.map_err(|error| {
            create_error!(ConnectionFailed {
                reason: error.to_string()
            })
        })
    }

    /// Create a client for the given database without touching the network
    pub fn from_options(options: ClientOptions, database_name: String) -> Result<MongoDb> {
        let client = mongodb::Client::with_options(options).map_err(|error| {
            create_error!(ConnectionFailed {
                reason: error.to_string()
            })
        })?;

        Ok(MongoDb(client, database_name))
    }

    /// Make sure the deployment is reachable
    ///
    /// The driver connects lazily, so a `ping` is issued to surface bad hosts
    /// or credentials here rather than on the first query.
    pub async fn ping(&self) -> Result<()> {
        self.database("admin")
            .run_command(doc! { "ping": 1_i32 })
            .await
            .map(|_| ())
            .map_err(|error| {
                create_error!(ConnectionFailed {
                    reason: error.to_string()
                })
            })
    }

    /// Connect to the named database
    pub async fn connect(uri: &str, database_name: String) -> Result<MongoDb> {
        let db = MongoDb::from_options(MongoDb::parse_options(uri).await?, database_name)?;
        db.ping().await?;
        Ok(db)
    }

    /// Get the Evently database
    pub fn db(&self) -> mongodb::Database {
        self.database(&self.1)
    }

    /// Get a collection by its name
    pub fn col<T: Send + Sync>(&self, collection: &str) -> mongodb::Collection<T> {
        self.db().collection(collection)
    }

    /// Insert one document into a collection
    pub async fn insert_one<T: Serialize + Send + Sync>(
        &self,
        collection: &'static str,
        document: T,
    ) -> mongodb::error::Result<InsertOneResult> {
        self.col::<T>(collection).insert_one(document).await
    }

    /// Count documents by projection
    pub async fn count_documents(
        &self,
        collection: &'static str,
        projection: Document,
    ) -> mongodb::error::Result<u64> {
        self.col::<Document>(collection)
            .count_documents(projection)
            .await
    }

    /// Find multiple documents in a collection with options
    pub async fn find_with_options<O, T: DeserializeOwned + Unpin + Send + Sync>(
        &self,
        collection: &'static str,
        projection: Document,
        options: O,
    ) -> mongodb::error::Result<Vec<T>>
    where
        O: Into<Option<FindOptions>>,
    {
        self.col::<T>(collection)
            .find(projection)
            .with_options(options)
            .await?
            .try_collect()
            .await
    }

    /// Find one document with options
    pub async fn find_one_with_options<O, T: DeserializeOwned + Unpin + Send + Sync>(
        &self,
        collection: &'static str,
        projection: Document,
        options: O,
    ) -> mongodb::error::Result<Option<T>>
    where
        O: Into<Option<FindOneOptions>>,
    {
        self.col::<T>(collection)
            .find_one(projection)
            .with_options(options)
            .await
    }

    /// Find one document
    pub async fn find_one<T: DeserializeOwned + Unpin + Send + Sync>(
        &self,
        collection: &'static str,
        projection: Document,
    ) -> mongodb::error::Result<Option<T>> {
        self.find_one_with_options(collection, projection, None)
            .await
    }

    /// Find one document by its ID
    pub async fn find_one_by_id<T: DeserializeOwned + Unpin + Send + Sync>(
        &self,
        collection: &'static str,
        id: &str,
    ) -> mongodb::error::Result<Option<T>> {
        self.find_one(
            collection,
            doc! {
                "_id": id
            },
        )
        .await
    }

    /// Check whether a document with the given ID exists
    ///
    /// Only the `_id` is projected so this stays a single cheap lookup.
    pub async fn exists_by_id(
        &self,
        collection: &'static str,
        id: &str,
    ) -> mongodb::error::Result<bool> {
        self.find_one_with_options::<_, DocumentId>(
            collection,
            doc! {
                "_id": id
            },
            FindOneOptions::builder()
                .projection(doc! { "_id": 1_i32 })
                .build(),
        )
        .await
        .map(|document| document.is_some())
    }

    /// Replace one document given its ID with a full document
    pub async fn replace_one_by_id<T: Serialize + Send + Sync>(
        &self,
        collection: &'static str,
        id: &str,
        document: T,
    ) -> mongodb::error::Result<UpdateResult> {
        self.col::<T>(collection)
            .replace_one(
                doc! {
                    "_id": id
                },
                document,
            )
            .await
    }

    /// Delete one document by the given projection
    pub async fn delete_one(
        &self,
        collection: &'static str,
        projection: Document,
    ) -> mongodb::error::Result<DeleteResult> {
        self.col::<Document>(collection)
            .delete_one(projection)
            .await
    }

    /// Delete one document by the given ID
    pub async fn delete_one_by_id(
        &self,
        collection: &'static str,
        id: &str,
    ) -> mongodb::error::Result<DeleteResult> {
        self.delete_one(
            collection,
            doc! {
                "_id": id
            },
        )
        .await
    }
}

/// Just a string ID struct
#[derive(Deserialize)]
pub struct DocumentId {
    #[serde(rename = "_id")]
    pub id: String,
}

/// Whether the error was caused by a unique index violation
pub fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(failure)) => failure.code == DUPLICATE_KEY,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use crate::MongoDb;

    #[async_std::test]
    async fn keeps_the_requested_database_name() {
        let options = MongoDb::parse_options("mongodb://localhost:27017/evently")
            .await
            .unwrap();
        assert_eq!(options.default_database.as_deref(), Some("evently"));

        let db = MongoDb::from_options(options, "evently_test_isolated".to_string()).unwrap();
        assert_eq!(db.1, "evently_test_isolated");
        assert_eq!(db.db().name(), "evently_test_isolated");
    }
}
