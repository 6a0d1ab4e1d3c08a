use bson::DateTime;
use evently_result::Result;
use ulid::Ulid;

use crate::util::normalise::{normalise_date, normalise_time, slugify};
use crate::Database;

auto_derived_partial!(
    /// Event
    pub struct Event {
        /// Unique Id
        #[serde(rename = "_id")]
        pub id: String,
        /// Event title
        pub title: String,
        /// URL-safe identifier, derived from the title
        pub slug: String,
        /// Full description
        pub description: String,
        /// Short overview
        pub overview: String,
        /// Cover image URL
        pub image: String,
        /// Venue name
        pub venue: String,
        /// Where the venue is
        pub location: String,
        /// Calendar date, `YYYY-MM-DD`
        pub date: String,
        /// Start time, `HH:MM` (24h)
        pub time: String,
        /// Attendance mode (e.g. online, offline, hybrid)
        pub mode: String,
        /// Intended audience
        pub audience: String,
        /// Ordered agenda items
        pub agenda: Vec<String>,
        /// Organiser name
        pub organizer: String,
        /// Tags used for discovery
        pub tags: Vec<String>,

        /// Time at which this event was created
        #[serde(rename = "createdAt")]
        pub created_at: DateTime,
        /// Time at which this event was last saved
        #[serde(rename = "updatedAt")]
        pub updated_at: DateTime,
    },
    "PartialEvent"
);

impl Default for Event {
    fn default() -> Self {
        let now = DateTime::now();
        Self {
            id: Default::default(),
            title: Default::default(),
            slug: Default::default(),
            description: Default::default(),
            overview: Default::default(),
            image: Default::default(),
            venue: Default::default(),
            location: Default::default(),
            date: Default::default(),
            time: Default::default(),
            mode: Default::default(),
            audience: Default::default(),
            agenda: Default::default(),
            organizer: Default::default(),
            tags: Default::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

fn require_text(field: &'static str, value: &mut String) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(create_error!(MissingField {
            field: field.to_string()
        }));
    }

    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }

    Ok(())
}

fn require_list(field: &'static str, values: &mut [String]) -> Result<()> {
    if values.is_empty() {
        return Err(create_error!(MissingField {
            field: field.to_string()
        }));
    }

    for value in values.iter_mut() {
        require_text(field, value)?;
    }

    Ok(())
}

impl Event {
    /// Create a new event
    ///
    /// The slug is derived from the title unless `data` sets one.
    pub async fn create(db: &Database, data: PartialEvent) -> Result<Event> {
        let mut event = Event::default();
        event.apply_options(data);

        let now = DateTime::now();
        event.id = Ulid::new().to_string();
        event.created_at = now;
        event.updated_at = now;
        event.pre_save(true)?;

        db.insert_event(&event).await?;
        Ok(event)
    }

    /// Validate and normalise this event before it is persisted
    ///
    /// `title_changed` forces the slug to be derived from the title again.
    pub fn pre_save(&mut self, title_changed: bool) -> Result<()> {
        require_text("title", &mut self.title)?;
        require_text("description", &mut self.description)?;
        require_text("overview", &mut self.overview)?;
        require_text("image", &mut self.image)?;
        require_text("venue", &mut self.venue)?;
        require_text("location", &mut self.location)?;
        require_text("date", &mut self.date)?;
        require_text("time", &mut self.time)?;
        require_text("mode", &mut self.mode)?;
        require_text("audience", &mut self.audience)?;
        require_list("agenda", &mut self.agenda)?;
        require_text("organizer", &mut self.organizer)?;
        require_list("tags", &mut self.tags)?;

        self.date = normalise_date(&self.date)?;
        self.time = normalise_time(&self.time)?;

        if title_changed || self.slug.trim().is_empty() {
            self.slug = slugify(&self.title);
        } else {
            self.slug = self.slug.trim().to_string();
        }

        if self.slug.is_empty() {
            return Err(create_error!(InvalidSlug));
        }

        Ok(())
    }

    /// Update this event
    ///
    /// Changes are validated on a copy first so a rejected update leaves this
    /// event untouched.
    pub async fn update(&mut self, db: &Database, partial: PartialEvent) -> Result<()> {
        let title_changed = partial
            .title
            .as_ref()
            .is_some_and(|title| title.trim() != self.title);
        let explicit_slug = partial.slug.is_some();

        let mut event = self.clone();
        event.apply_options(partial);
        event.id = self.id.clone();
        event.created_at = self.created_at;
        event.updated_at = DateTime::now();
        event.pre_save(title_changed && !explicit_slug)?;

        db.update_event(&event).await?;

        *self = event;
        Ok(())
    }

    /// Delete this event
    ///
    /// Bookings referencing it are left in place.
    pub async fn delete(&self, db: &Database) -> Result<()> {
        db.delete_event(&self.id).await
    }

    /// Find other events sharing at least one tag with this one
    pub async fn similar(&self, db: &Database) -> Result<Vec<Event>> {
        db.fetch_events_by_tags(&self.tags, &self.id).await
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bson::DateTime;
    use evently_result::ErrorType;

    use crate::util::reference::Reference;
    use crate::util::test_fixtures::{create_event, event};
    use crate::{Event, PartialEvent};

    #[test]
    fn pre_save_normalises_fields() {
        let mut data = event("  Hello, World!  Foo ");
        data.date = Some("2024-03-05T10:00:00Z".to_string());
        data.time = Some("9:5".to_string());

        let mut candidate = Event::default();
        candidate.apply_options(data);
        candidate.pre_save(true).unwrap();

        assert_eq!(candidate.title, "Hello, World!  Foo");
        assert_eq!(candidate.slug, "hello-world-foo");
        assert_eq!(candidate.date, "2024-03-05");
        assert_eq!(candidate.time, "09:05");
    }

    #[test]
    fn pre_save_names_missing_fields() {
        let fields = [
            "title",
            "description",
            "overview",
            "image",
            "venue",
            "location",
            "date",
            "time",
            "mode",
            "audience",
            "agenda",
            "organizer",
            "tags",
        ];

        for field in fields {
            let mut data = event("Rust Nation");
            match field {
                "title" => data.title = Some("   ".to_string()),
                "description" => data.description = None,
                "overview" => data.overview = Some(String::new()),
                "image" => data.image = None,
                "venue" => data.venue = None,
                "location" => data.location = Some("\t".to_string()),
                "date" => data.date = None,
                "time" => data.time = None,
                "mode" => data.mode = None,
                "audience" => data.audience = None,
                "agenda" => data.agenda = Some(vec![]),
                "organizer" => data.organizer = None,
                "tags" => data.tags = Some(vec!["rust".to_string(), " ".to_string()]),
                _ => unreachable!(),
            }

            let mut candidate = Event::default();
            candidate.apply_options(data);

            let error = candidate.pre_save(true).unwrap_err();
            assert_eq!(
                error.error_type,
                ErrorType::MissingField {
                    field: field.to_string()
                }
            );
        }
    }

    #[test]
    fn pre_save_trims_list_entries() {
        let mut candidate = Event::default();
        let mut data = event("Rust Nation");
        data.agenda = Some(vec!["  Intro ".to_string(), "Outro".to_string()]);

        candidate.apply_options(data);
        candidate.pre_save(true).unwrap();

        assert_eq!(candidate.agenda, vec!["Intro", "Outro"]);
    }

    #[async_std::test]
    async fn create_normalises_and_persists() {
        database_test!(|db| async move {
            let mut data = event("Hello, World!  Foo");
            data.time = Some("9:5".to_string());

            let event = Event::create(&db, data).await.unwrap();
            assert_eq!(event.slug, "hello-world-foo");
            assert_eq!(event.date, "2024-03-05");
            assert_eq!(event.time, "09:05");

            let fetched = db.fetch_event(&event.id).await.unwrap();
            assert_eq!(fetched, event);
        });
    }

    #[async_std::test]
    async fn create_ignores_system_managed_fields() {
        database_test!(|db| async move {
            let mut data = event("Rust Nation");
            data.id = Some("not-a-ulid".to_string());
            data.created_at = Some(DateTime::from_millis(0));
            data.updated_at = Some(DateTime::from_millis(0));

            let event = Event::create(&db, data).await.unwrap();
            assert_ne!(event.id, "not-a-ulid");
            assert!(ulid::Ulid::from_str(&event.id).is_ok());
            assert_ne!(event.created_at, DateTime::from_millis(0));
            assert_eq!(event.created_at, event.updated_at);

            let fetched = Reference::from_unchecked(&event.id)
                .as_event(&db)
                .await
                .unwrap();
            assert_eq!(fetched, event);
        });
    }

    #[async_std::test]
    async fn create_rejects_invalid_date_and_time() {
        database_test!(|db| async move {
            let mut data = event("Rust Nation");
            data.date = Some("the fifth of march".to_string());
            let error = Event::create(&db, data).await.unwrap_err();
            assert!(matches!(error.error_type, ErrorType::InvalidDate { .. }));

            let mut data = event("Rust Nation");
            data.time = Some("24:00".to_string());
            let error = Event::create(&db, data).await.unwrap_err();
            assert_eq!(
                error.error_type,
                ErrorType::InvalidTime {
                    value: "24:00".to_string()
                }
            );

            assert!(db.fetch_events().await.unwrap().is_empty());
        });
    }

    #[async_std::test]
    async fn create_rejects_title_without_slug() {
        database_test!(|db| async move {
            let error = Event::create(&db, event("!!!")).await.unwrap_err();
            assert_eq!(error.error_type, ErrorType::InvalidSlug);
        });
    }

    #[async_std::test]
    async fn create_keeps_explicit_slug() {
        database_test!(|db| async move {
            let mut data = event("Rust Nation");
            data.slug = Some("rust-nation-2024".to_string());

            let event = Event::create(&db, data).await.unwrap();
            assert_eq!(event.slug, "rust-nation-2024");
        });
    }

    #[async_std::test]
    async fn duplicate_slug_is_rejected() {
        database_test!(|db| async move {
            create_event(&db, "Rust Nation", &["rust"]).await;

            let error = Event::create(&db, event("Rust   Nation!")).await.unwrap_err();
            assert_eq!(error.error_type, ErrorType::SlugTaken);
            assert_eq!(db.fetch_events().await.unwrap().len(), 1);
        });
    }

    #[async_std::test]
    async fn update_regenerates_slug_only_when_title_changes() {
        database_test!(|db| async move {
            let mut event = create_event(&db, "Rust Nation", &["rust"]).await;
            let created_at = event.created_at;

            event
                .update(
                    &db,
                    PartialEvent {
                        venue: Some("The Brewery".to_string()),
                        time: Some("7:00".to_string()),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();

            assert_eq!(event.slug, "rust-nation");
            assert_eq!(event.time, "07:00");

            event
                .update(
                    &db,
                    PartialEvent {
                        title: Some("Rust Nation UK".to_string()),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();

            assert_eq!(event.slug, "rust-nation-uk");
            assert_eq!(event.created_at, created_at);

            let fetched = db.fetch_event_by_slug("rust-nation-uk").await.unwrap();
            assert_eq!(fetched, event);
            assert_eq!(fetched.venue, "The Brewery");
        });
    }

    #[async_std::test]
    async fn rejected_update_leaves_event_untouched() {
        database_test!(|db| async move {
            let mut event = create_event(&db, "Rust Nation", &["rust"]).await;
            let before = event.clone();

            let error = event
                .update(
                    &db,
                    PartialEvent {
                        title: Some("Rust Nation UK".to_string()),
                        agenda: Some(vec![]),
                        ..Default::default()
                    },
                )
                .await
                .unwrap_err();

            assert_eq!(
                error.error_type,
                ErrorType::MissingField {
                    field: "agenda".to_string()
                }
            );
            assert_eq!(event, before);
            assert_eq!(db.fetch_event(&event.id).await.unwrap(), before);
        });
    }

    #[async_std::test]
    async fn update_into_existing_slug_is_rejected() {
        database_test!(|db| async move {
            create_event(&db, "Rust Nation", &["rust"]).await;
            let mut other = create_event(&db, "Go Time", &["go"]).await;

            let error = other
                .update(
                    &db,
                    PartialEvent {
                        title: Some("Rust Nation".to_string()),
                        ..Default::default()
                    },
                )
                .await
                .unwrap_err();

            assert_eq!(error.error_type, ErrorType::SlugTaken);
            assert_eq!(other.slug, "go-time");
        });
    }

    #[async_std::test]
    async fn similar_events_share_tags() {
        database_test!(|db| async move {
            let rust = create_event(&db, "Rust Nation", &["rust", "systems"]).await;
            let embedded = create_event(&db, "Embedded Rust", &["embedded", "rust"]).await;
            create_event(&db, "Go Time", &["go"]).await;

            let similar = rust.similar(&db).await.unwrap();
            assert_eq!(similar, vec![embedded]);
        });
    }

    #[async_std::test]
    async fn delete_removes_event() {
        database_test!(|db| async move {
            let event = create_event(&db, "Rust Nation", &["rust"]).await;
            event.delete(&db).await.unwrap();

            let error = db.fetch_event(&event.id).await.unwrap_err();
            assert_eq!(error.error_type, ErrorType::NotFound);
            assert!(!db.event_exists(&event.id).await.unwrap());
        });
    }
}
