use evently_result::Result;

use crate::Booking;

#[cfg(feature = "mongodb")]
mod mongodb;
mod reference;

#[async_trait]
pub trait AbstractBookings: Sync + Send {
    /// Insert new booking into the database
    async fn insert_booking(&self, booking: &Booking) -> Result<()>;

    /// Fetch a booking by its id
    async fn fetch_booking(&self, id: &str) -> Result<Booking>;

    /// Fetch bookings made for an event
    async fn fetch_bookings_by_event(&self, event_id: &str) -> Result<Vec<Booking>>;

    /// Get the number of bookings made for an event
    async fn count_bookings_by_event(&self, event_id: &str) -> Result<usize>;

    /// Save an already validated booking over its stored copy
    async fn update_booking(&self, booking: &Booking) -> Result<()>;

    /// Delete a booking from the database
    async fn delete_booking(&self, id: &str) -> Result<()>;
}
