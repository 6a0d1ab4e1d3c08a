use evently_result::Result;
use mongodb::bson::doc;
use mongodb::options::FindOptions;

use crate::{Booking, MongoDb};

use super::AbstractBookings;

static COL: &str = "bookings";

#[async_trait]
impl AbstractBookings for MongoDb {
    /// Insert new booking into the database
    async fn insert_booking(&self, booking: &Booking) -> Result<()> {
        self.insert_one(COL, booking)
            .await
            .map(|_| ())
            .map_err(log_database_error!("insert_one", COL))
    }

    /// Fetch a booking by its id
    async fn fetch_booking(&self, id: &str) -> Result<Booking> {
        self.find_one_by_id(COL, id)
            .await
            .map_err(log_database_error!("find_one", COL))?
            .ok_or_else(|| create_error!(NotFound))
    }

    /// Fetch bookings made for an event
    async fn fetch_bookings_by_event(&self, event_id: &str) -> Result<Vec<Booking>> {
        self.find_with_options(
            COL,
            doc! {
                "eventId": event_id
            },
            FindOptions::builder()
                .sort(doc! { "createdAt": 1_i32 })
                .build(),
        )
        .await
        .map_err(log_database_error!("find", COL))
    }

    /// Get the number of bookings made for an event
    async fn count_bookings_by_event(&self, event_id: &str) -> Result<usize> {
        self.count_documents(
            COL,
            doc! {
                "eventId": event_id
            },
        )
        .await
        .map(|count| count as usize)
        .map_err(log_database_error!("count", COL))
    }

    /// Save an already validated booking over its stored copy
    async fn update_booking(&self, booking: &Booking) -> Result<()> {
        let result = self
            .replace_one_by_id(COL, &booking.id, booking)
            .await
            .map_err(log_database_error!("replace_one", COL))?;

        if result.matched_count == 0 {
            Err(create_error!(NotFound))
        } else {
            Ok(())
        }
    }

    /// Delete a booking from the database
    async fn delete_booking(&self, id: &str) -> Result<()> {
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
