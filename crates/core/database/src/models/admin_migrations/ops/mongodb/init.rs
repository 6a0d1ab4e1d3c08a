use evently_result::Result;

use crate::mongodb::bson::doc;
use crate::MongoDb;

const COLLECTIONS: [&str; 2] = ["events", "bookings"];

pub async fn create_database(db: &MongoDb) -> Result<()> {
    let db = db.db();

    let existing = db
        .list_collection_names()
        .await
        .map_err(log_database_error!("list_collection_names", "database"))?;

    for collection in COLLECTIONS {
        if !existing.iter().any(|name| name == collection) {
            info!("Creating {collection} collection.");
            db.create_collection(collection)
                .await
                .map_err(log_database_error!("create_collection", collection))?;
        }
    }

    db.run_command(doc! {
        "createIndexes": "events",
        "indexes": [
            {
                "key": {
                    "slug": 1_i32
                },
                "name": "slug",
                "unique": true
            },
            {
                "key": {
                    "tags": 1_i32
                },
                "name": "tags"
            },
            {
                "key": {
                    "createdAt": -1_i32
                },
                "name": "created_at"
            }
        ]
    })
    .await
    .map_err(log_database_error!("create_indexes", "events"))?;

    db.run_command(doc! {
        "createIndexes": "bookings",
        "indexes": [
            {
                "key": {
                    "eventId": 1_i32
                },
                "name": "event_id"
            }
        ]
    })
    .await
    .map_err(log_database_error!("create_indexes", "bookings"))?;

    info!("Collections and indexes are up to date.");
    Ok(())
}
