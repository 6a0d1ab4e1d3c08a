use evently_result::Result;

use crate::Booking;
use crate::ReferenceDb;

use super::AbstractBookings;

#[async_trait]
impl AbstractBookings for ReferenceDb {
    /// Insert new booking into the database
    async fn insert_booking(&self, booking: &Booking) -> Result<()> {
        let mut bookings = self.bookings.lock().await;
        if bookings.contains_key(&booking.id) {
            Err(create_database_error!("insert", "booking"))
        } else {
            bookings.insert(booking.id.to_string(), booking.clone());
            Ok(())
        }
    }

    /// Fetch a booking by its id
    async fn fetch_booking(&self, id: &str) -> Result<Booking> {
        let bookings = self.bookings.lock().await;
        bookings
            .get(id)
            .cloned()
            .ok_or_else(|| create_error!(NotFound))
    }

    /// Fetch bookings made for an event
    async fn fetch_bookings_by_event(&self, event_id: &str) -> Result<Vec<Booking>> {
        let bookings = self.bookings.lock().await;
        let mut bookings: Vec<Booking> = bookings
            .values()
            .filter(|booking| booking.event_id == event_id)
            .cloned()
            .collect();

        bookings.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(bookings)
    }

    /// Get the number of bookings made for an event
    async fn count_bookings_by_event(&self, event_id: &str) -> Result<usize> {
        let bookings = self.bookings.lock().await;
        Ok(bookings
            .values()
            .filter(|booking| booking.event_id == event_id)
            .count())
    }

    /// Save an already validated booking over its stored copy
    async fn update_booking(&self, booking: &Booking) -> Result<()> {
        let mut bookings = self.bookings.lock().await;
        if let Some(existing) = bookings.get_mut(&booking.id) {
            *existing = booking.clone();
            Ok(())
        } else {
            Err(create_error!(NotFound))
        }
    }

    /// Delete a booking from the database
    async fn delete_booking(&self, id: &str) -> Result<()> {
        let mut bookings = self.bookings.lock().await;
        if bookings.remove(id).is_some() {
            Ok(())
        } else {
            Err(create_error!(NotFound))
        }
    }
}
