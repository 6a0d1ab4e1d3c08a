use std::str::FromStr;

use evently_result::Result;

use crate::{Booking, Database, Event};

/// Reference to some object in the database
pub struct Reference<'a> {
    /// Id of object
    pub id: &'a str,
}

impl<'a> Reference<'a> {
    /// Create a Ref from an unchecked string
    pub fn from_unchecked(id: &'a str) -> Reference<'a> {
        Reference { id }
    }

    /// Fetch event from Ref
    ///
    /// Anything that is not a ULID is treated as a slug.
    pub async fn as_event(&self, db: &Database) -> Result<Event> {
        if ulid::Ulid::from_str(self.id).is_ok() {
            db.fetch_event(self.id).await
        } else {
            db.fetch_event_by_slug(self.id).await
        }
    }

    /// Fetch booking from Ref and validate event
    pub async fn as_booking_for_event(&self, db: &Database, event: &str) -> Result<Booking> {
        let booking = db.fetch_booking(self.id).await?;
        if booking.event_id != event {
            return Err(create_error!(NotFound));
        }

        Ok(booking)
    }
}
