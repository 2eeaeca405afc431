use crate::error::BookingResult;
use crate::types::{Booking, Employee, Haircut, Status};
use chrono::{DateTime, NaiveDate, Utc};
use tokio_stream::wrappers::WatchStream;
use uuid::Uuid;

/// Persistence seam of the shop. Implementations own their synchronization;
/// `insert_booking` in particular must be an atomic check-and-claim of the
/// (employee, slot) key, and `transition_booking` a guarded update, so that
/// two racing requests can never both succeed.
pub trait ScheduleBackend: Clone + Send + Sync + 'static {
    fn employees(&self) -> BookingResult<Vec<Employee>>;
    fn employee_by_name(&self, name: &str) -> BookingResult<Option<Employee>>;
    fn add_employee(&self, name: String) -> BookingResult<Employee>;

    fn haircuts(&self) -> BookingResult<Vec<Haircut>>;
    fn haircut(&self, id: Uuid) -> BookingResult<Option<Haircut>>;
    fn add_haircut(&self, name: String, price: f64, description: String)
        -> BookingResult<Haircut>;
    fn update_haircut(&self, haircut: Haircut) -> BookingResult<()>;

    /// The active booking occupying (employee, slot), if any.
    fn booking_at(&self, employee_id: Uuid, slot_at: DateTime<Utc>)
        -> BookingResult<Option<Booking>>;
    fn bookings_on(&self, employee_id: Uuid, date: NaiveDate) -> BookingResult<Vec<Booking>>;
    fn bookings_with_status(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
        status: Status,
    ) -> BookingResult<Vec<Booking>>;
    fn insert_booking(&self, booking: Booking) -> BookingResult<()>;
    fn transition_booking(&self, booking_id: Uuid, to: Status) -> BookingResult<Booking>;

    /// Update feed: the current booking list, re-sent after every mutation.
    fn booking_stream(&self) -> WatchStream<Vec<Booking>>;
}
