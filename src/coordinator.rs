use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::{
    backend::ScheduleBackend,
    error::{BookingError, BookingResult},
    session::Session,
    types::{Booking, Employee, PaymentMethod, Status},
    validator::{BookingRules, BookingValidator},
};

/// The single write path for the schedule. Every mutation funnels through
/// here so the validate-then-insert step hits the backend as one guarded
/// operation per slot.
#[derive(Debug, Clone)]
pub struct BookingCoordinator<B> {
    backend: B,
    validator: BookingValidator<B>,
}

impl<B: ScheduleBackend> BookingCoordinator<B> {
    pub fn new(backend: B, rules: BookingRules) -> Self {
        let validator = BookingValidator::new(backend.clone(), rules);
        Self { backend, validator }
    }

    /// Book a slot with an employee for the session's client.
    pub fn book(
        &self,
        session: Option<&Session>,
        employee_name: &str,
        haircut_id: Uuid,
        slot_at: DateTime<Utc>,
        payment_method: PaymentMethod,
    ) -> BookingResult<Booking> {
        let session = session.ok_or(BookingError::Unauthenticated)?;
        let employee = self.employee_named(employee_name)?;
        if self.backend.haircut(haircut_id)?.is_none() {
            return Err(BookingError::UnknownHaircut(haircut_id));
        }
        self.validator.validate(Some(session), employee.id, slot_at)?;

        let booking = Booking::for_client(
            employee.id,
            session.client_id,
            session.client_name.clone(),
            haircut_id,
            slot_at,
            payment_method,
        );
        self.backend.insert_booking(booking.clone())?;
        info!(
            "booked {} with {} at {} for {}",
            booking.id, employee.name, slot_at, session.client_name
        );
        Ok(booking)
    }

    /// Block a slot with a BREAK entry so no client can book it.
    pub fn block_slot(&self, employee_name: &str, slot_at: DateTime<Utc>) -> BookingResult<Booking> {
        let employee = self.employee_named(employee_name)?;
        self.validator.check_range(slot_at)?;

        let blocker = Booking::blocker(employee.id, slot_at);
        self.backend.insert_booking(blocker.clone())?;
        info!("blocked {} at {} ({})", employee.name, slot_at, blocker.id);
        Ok(blocker)
    }

    /// Settle a pending booking.
    pub fn pay(&self, booking_id: Uuid) -> BookingResult<Booking> {
        let booking = self.backend.transition_booking(booking_id, Status::Paid)?;
        info!("booking {} paid", booking.id);
        Ok(booking)
    }

    /// Cancel a booking or a break, freeing its slot. The entry itself
    /// stays on record.
    pub fn cancel(&self, booking_id: Uuid) -> BookingResult<Booking> {
        let booking = self
            .backend
            .transition_booking(booking_id, Status::Canceled)?;
        info!("booking {} canceled, slot {} is free again", booking.id, booking.slot_at);
        Ok(booking)
    }

    fn employee_named(&self, name: &str) -> BookingResult<Employee> {
        self.backend
            .employee_by_name(name)?
            .ok_or_else(|| BookingError::UnknownEmployee(name.to_string()))
    }
}
