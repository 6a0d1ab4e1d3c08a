use bson::DateTime;
use evently_result::Result;
use ulid::Ulid;

use crate::util::normalise::{is_valid_email, normalise_email};
use crate::Database;

auto_derived_partial!(
    /// Booking of a seat at an event
    pub struct Booking {
        /// Unique Id
        #[serde(rename = "_id")]
        pub id: String,
        /// Id of the event being booked
        #[serde(rename = "eventId")]
        pub event_id: String,
        /// Attendee email, stored lowercase
        pub email: String,

        /// Time at which this booking was created
        #[serde(rename = "createdAt")]
        pub created_at: DateTime,
        /// Time at which this booking was last saved
        #[serde(rename = "updatedAt")]
        pub updated_at: DateTime,
    },
    "PartialBooking"
);

impl Default for Booking {
    fn default() -> Self {
        let now = DateTime::now();
        Self {
            id: Default::default(),
            event_id: Default::default(),
            email: Default::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Booking {
    /// Create a new booking
    pub async fn create(db: &Database, data: PartialBooking) -> Result<Booking> {
        let mut booking = Booking::default();
        booking.apply_options(data);

        let now = DateTime::now();
        booking.id = Ulid::new().to_string();
        booking.created_at = now;
        booking.updated_at = now;
        booking.pre_save(db).await?;

        db.insert_booking(&booking).await?;
        Ok(booking)
    }

    /// Validate and normalise this booking before it is persisted
    ///
    /// The event lookup runs last so malformed input never hits the database.
    pub async fn pre_save(&mut self, db: &Database) -> Result<()> {
        self.event_id = self.event_id.trim().to_string();
        if self.event_id.is_empty() {
            return Err(create_error!(MissingField {
                field: "eventId".to_string()
            }));
        }

        self.email = normalise_email(&self.email);
        if self.email.is_empty() {
            return Err(create_error!(MissingField {
                field: "email".to_string()
            }));
        }

        if !is_valid_email(&self.email) {
            return Err(create_error!(InvalidEmail));
        }

        if !db.event_exists(&self.event_id).await? {
            debug!(
                "Rejected booking {} for unknown event {}.",
                self.id, self.event_id
            );
            return Err(create_error!(UnknownEvent));
        }

        Ok(())
    }

    /// Update this booking
    pub async fn update(&mut self, db: &Database, partial: PartialBooking) -> Result<()> {
        let mut booking = self.clone();
        booking.apply_options(partial);
        booking.id = self.id.clone();
        booking.created_at = self.created_at;
        booking.updated_at = DateTime::now();
        booking.pre_save(db).await?;

        db.update_booking(&booking).await?;

        *self = booking;
        Ok(())
    }

    /// Delete this booking
    pub async fn delete(&self, db: &Database) -> Result<()> {
        db.delete_booking(&self.id).await
    }
}
