use crate::{Database, Event, PartialEvent};

/// Complete and valid event data for the given title
pub fn event(title: &str) -> PartialEvent {
    event_with_tags(title, &["rust", "meetup"])
}

/// Complete and valid event data with the given tags
pub fn event_with_tags(title: &str, tags: &[&str]) -> PartialEvent {
    PartialEvent {
        title: Some(title.to_string()),
        description: Some("An evening of talks and conversation.".to_string()),
        overview: Some("Talks, demos and pizza.".to_string()),
        image: Some("/images/event.png".to_string()),
        venue: Some("Community Hall".to_string()),
        location: Some("London, UK".to_string()),
        date: Some("2024-03-05T10:00:00Z".to_string()),
        time: Some("18:30".to_string()),
        mode: Some("offline".to_string()),
        audience: Some("Developers".to_string()),
        agenda: Some(vec![
            "Doors open".to_string(),
            "Talks".to_string(),
            "Networking".to_string(),
        ]),
        organizer: Some("Evently".to_string()),
        tags: Some(tags.iter().map(|tag| tag.to_string()).collect()),
        ..Default::default()
    }
}

/// Create an event with the given title and tags
pub async fn create_event(db: &Database, title: &str, tags: &[&str]) -> Event {
    Event::create(db, event_with_tags(title, tags))
        .await
        .expect("Failed to create fixture event")
}
