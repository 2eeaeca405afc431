use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use uuid::Uuid;

use crate::{
    backend::ScheduleBackend,
    error::{BookingError, BookingResult},
    session::Session,
    types,
};

/// Rules a slot must satisfy before anyone may claim it.
#[derive(Debug, Clone, Copy)]
pub struct BookingRules {
    /// First bookable hour of the day.
    pub opening_hour: u32,
    /// End of the working day; the last slot starts one hour earlier.
    pub closing_hour: u32,
    /// How far ahead clients may book.
    pub horizon_days: i64,
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            opening_hour: 9,
            closing_hour: 18,
            horizon_days: 30,
        }
    }
}

impl BookingRules {
    pub fn working_hours(&self) -> std::ops::Range<u32> {
        self.opening_hour..self.closing_hour
    }

    /// Every slot of a working day, in order.
    pub fn day_slots(&self, date: NaiveDate) -> Vec<DateTime<Utc>> {
        self.working_hours()
            .filter_map(|hour| types::slot_start(date, hour))
            .collect()
    }
}

/// Checks a requested slot against the session, the calendar and the
/// employee's existing bookings. The backend has the final word on
/// conflicts when the booking is inserted; the check here exists to
/// answer early with a precise error.
#[derive(Debug, Clone)]
pub struct BookingValidator<B> {
    backend: B,
    rules: BookingRules,
}

impl<B: ScheduleBackend> BookingValidator<B> {
    pub fn new(backend: B, rules: BookingRules) -> Self {
        Self { backend, rules }
    }

    pub fn rules(&self) -> &BookingRules {
        &self.rules
    }

    /// Full client-booking check: session, calendar range, then conflicts.
    pub fn validate(
        &self,
        session: Option<&Session>,
        employee_id: Uuid,
        slot_at: DateTime<Utc>,
    ) -> BookingResult<()> {
        self.validate_at(session, employee_id, slot_at, Utc::now())
    }

    /// Calendar rules alone, for staff-made blockers which need no session.
    pub fn check_range(&self, slot_at: DateTime<Utc>) -> BookingResult<()> {
        self.check_range_at(slot_at, Utc::now())
    }

    fn validate_at(
        &self,
        session: Option<&Session>,
        employee_id: Uuid,
        slot_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> BookingResult<()> {
        if session.is_none() {
            return Err(BookingError::Unauthenticated);
        }
        self.check_range_at(slot_at, now)?;
        if self.backend.booking_at(employee_id, slot_at)?.is_some() {
            return Err(BookingError::Conflict { slot: slot_at });
        }
        Ok(())
    }

    fn check_range_at(&self, slot_at: DateTime<Utc>, now: DateTime<Utc>) -> BookingResult<()> {
        if !types::is_slot_aligned(slot_at) {
            return Err(BookingError::out_of_range(slot_at, "slots start on the hour"));
        }
        if slot_at < now {
            return Err(BookingError::out_of_range(slot_at, "slot already passed"));
        }
        if slot_at > now + Duration::days(self.rules.horizon_days) {
            return Err(BookingError::out_of_range(
                slot_at,
                format!("more than {} days ahead", self.rules.horizon_days),
            ));
        }
        if !self.rules.working_hours().contains(&slot_at.hour()) {
            return Err(BookingError::out_of_range(
                slot_at,
                format!(
                    "outside working hours ({}:00-{}:00)",
                    self.rules.opening_hour, self.rules.closing_hour
                ),
            ));
        }
        Ok(())
    }
}
