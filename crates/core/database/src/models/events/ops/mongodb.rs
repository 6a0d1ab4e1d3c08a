use evently_result::Result;
use mongodb::bson::doc;
use mongodb::options::FindOptions;

use crate::{is_duplicate_key, Event, MongoDb};

use super::AbstractEvents;

static COL: &str = "events";

#[async_trait]
impl AbstractEvents for MongoDb {
    /// Insert new event into the database
    async fn insert_event(&self, event: &Event) -> Result<()> {
        self.insert_one(COL, event)
            .await
            .map(|_| ())
            .map_err(|error| {
                if is_duplicate_key(&error) {
                    create_error!(SlugTaken)
                } else {
                    warn!("insert_one on {COL} failed: {error}");
                    create_database_error!("insert_one", COL)
                }
            })
    }

    /// Fetch an event by its id
    async fn fetch_event(&self, id: &str) -> Result<Event> {
        self.find_one_by_id(COL, id)
            .await
            .map_err(log_database_error!("find_one", COL))?
            .ok_or_else(|| create_error!(NotFound))
    }

    /// Fetch an event by its slug
    async fn fetch_event_by_slug(&self, slug: &str) -> Result<Event> {
        self.find_one(
            COL,
            doc! {
                "slug": slug
            },
        )
        .await
        .map_err(log_database_error!("find_one", COL))?
        .ok_or_else(|| create_error!(NotFound))
    }

    /// Fetch all events, newest first
    async fn fetch_events(&self) -> Result<Vec<Event>> {
        self.find_with_options(
            COL,
            doc! {},
            FindOptions::builder()
                .sort(doc! { "createdAt": -1_i32 })
                .build(),
        )
        .await
        .map_err(log_database_error!("find", COL))
    }

    /// Fetch events carrying any of the given tags, excluding one event
    async fn fetch_events_by_tags(&self, tags: &[String], exclude_id: &str) -> Result<Vec<Event>> {
        self.find_with_options(
            COL,
            doc! {
                "_id": {
                    "$ne": exclude_id
                },
                "tags": {
                    "$in": tags
                }
            },
            FindOptions::builder()
                .sort(doc! { "createdAt": -1_i32 })
                .build(),
        )
        .await
        .map_err(log_database_error!("find", COL))
    }

    /// Check whether an event exists
    async fn event_exists(&self, id: &str) -> Result<bool> {
        self.exists_by_id(COL, id)
            .await
            .map_err(log_database_error!("find_one", COL))
    }

    /// Save an already validated event over its stored copy
    async fn update_event(&self, event: &Event) -> Result<()> {
        let result = self
            .replace_one_by_id(COL, &event.id, event)
            .await
            .map_err(|error| {
                if is_duplicate_key(&error) {
                    create_error!(SlugTaken)
                } else {
                    warn!("replace_one on {COL} failed: {error}");
                    create_database_error!("replace_one", COL)
                }
            })?;

        if result.matched_count == 0 {
            Err(create_error!(NotFound))
        } else {
            Ok(())
        }
    }

    /// Delete an event from the database
    async fn delete_event(&self, id: &str) -> Result<()> {
        let result = self
            .delete_one_by_id(COL, id)
            .await
            .map_err(log_database_error!("delete_one", COL))?;

        if result.deleted_count == 0 {
            Err(create_error!(NotFound))
        } else {
            Ok(())
        }
    }
}
