use evently_result::Result;

use crate::Event;
use crate::ReferenceDb;

use super::AbstractEvents;

#[async_trait]
impl AbstractEvents for ReferenceDb {
    /// Insert new event into the database
    async fn insert_event(&self, event: &Event) -> Result<()> {
        let mut events = self.events.lock().await;
        if events.contains_key(&event.id) {
            Err(create_database_error!("insert", "event"))
        } else if events.values().any(|existing| existing.slug == event.slug) {
            Err(create_error!(SlugTaken))
        } else {
            events.insert(event.id.to_string(), event.clone());
            Ok(())
        }
    }

    /// Fetch an event by its id
    async fn fetch_event(&self, id: &str) -> Result<Event> {
        let events = self.events.lock().await;
        events.get(id).cloned().ok_or_else(|| create_error!(NotFound))
    }

    /// Fetch an event by its slug
    async fn fetch_event_by_slug(&self, slug: &str) -> Result<Event> {
        let events = self.events.lock().await;
        events
            .values()
            .find(|event| event.slug == slug)
            .cloned()
            .ok_or_else(|| create_error!(NotFound))
    }

    /// Fetch all events, newest first
    async fn fetch_events(&self) -> Result<Vec<Event>> {
        let events = self.events.lock().await;
        let mut events: Vec<Event> = events.values().cloned().collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(events)
    }

    /// Fetch events carrying any of the given tags, excluding one event
    async fn fetch_events_by_tags(&self, tags: &[String], exclude_id: &str) -> Result<Vec<Event>> {
        let events = self.events.lock().await;
        let mut events: Vec<Event> = events
            .values()
            .filter(|event| event.id != exclude_id)
            .filter(|event| event.tags.iter().any(|tag| tags.contains(tag)))
            .cloned()
            .collect();

        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(events)
    }

    /// Check whether an event exists
    async fn event_exists(&self, id: &str) -> Result<bool> {
        let events = self.events.lock().await;
        Ok(events.contains_key(id))
    }

    /// Save an already validated event over its stored copy
    async fn update_event(&self, event: &Event) -> Result<()> {
        let mut events = self.events.lock().await;
        if events
            .values()
            .any(|existing| existing.id != event.id && existing.slug == event.slug)
        {
            return Err(create_error!(SlugTaken));
        }

        if let Some(existing) = events.get_mut(&event.id) {
            *existing = event.clone();
            Ok(())
        } else {
            Err(create_error!(NotFound))
        }
    }

    /// Delete an event from the database
    async fn delete_event(&self, id: &str) -> Result<()> {
        let mut events = self.events.lock().await;
        if events.remove(id).is_some() {
            Ok(())
        } else {
            Err(create_error!(NotFound))
        }
    }
}
