use evently_result::Result;

use crate::Event;

#[cfg(feature = "mongodb")]
mod mongodb;
mod reference;

#[async_trait]
pub trait AbstractEvents: Sync + Send {
    /// Insert new event into the database
    async fn insert_event(&self, event: &Event) -> Result<()>;

    /// Fetch an event by its id
    async fn fetch_event(&self, id: &str) -> Result<Event>;

    /// Fetch an event by its slug
    async fn fetch_event_by_slug(&self, slug: &str) -> Result<Event>;

    /// Fetch all events, newest first
    async fn fetch_events(&self) -> Result<Vec<Event>>;

    /// Fetch events carrying any of the given tags, excluding one event
    async fn fetch_events_by_tags(&self, tags: &[String], exclude_id: &str) -> Result<Vec<Event>>;

    /// Check whether an event exists
    async fn event_exists(&self, id: &str) -> Result<bool>;

    /// Save an already validated event over its stored copy
    async fn update_event(&self, event: &Event) -> Result<()>;

    /// Delete an event from the database
    async fn delete_event(&self, id: &str) -> Result<()>;
}
