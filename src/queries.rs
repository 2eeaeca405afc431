use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::{
    backend::ScheduleBackend,
    error::{BookingError, BookingResult},
    types::{Booking, Status},
    validator::BookingRules,
};

/// Read side of the schedule: availability and dashboard listings.
#[derive(Debug, Clone)]
pub struct ScheduleQueries<B> {
    backend: B,
    rules: BookingRules,
}

impl<B: ScheduleBackend> ScheduleQueries<B> {
    pub fn new(backend: B, rules: BookingRules) -> Self {
        Self { backend, rules }
    }

    /// Free, still-bookable slots for an employee on a day. A slot shows
    /// up here exactly when no PENDING, PAID or BREAK entry holds it and
    /// it lies between now and the booking horizon.
    pub fn available_slots(
        &self,
        employee_name: &str,
        date: NaiveDate,
    ) -> BookingResult<Vec<DateTime<Utc>>> {
        self.available_slots_at(employee_name, date, Utc::now())
    }

    /// Day listing for the dashboard, earliest slot first. Canceled
    /// entries stay on record and show up when asked for by status.
    pub fn bookings_for(
        &self,
        employee_name: &str,
        date: NaiveDate,
        status: Option<Status>,
    ) -> BookingResult<Vec<Booking>> {
        let employee = self.employee_named(employee_name)?;
        match status {
            Some(status) => self.backend.bookings_with_status(employee.id, date, status),
            None => self.backend.bookings_on(employee.id, date),
        }
    }

    fn available_slots_at(
        &self,
        employee_name: &str,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> BookingResult<Vec<DateTime<Utc>>> {
        let employee = self.employee_named(employee_name)?;
        let occupied: HashSet<DateTime<Utc>> = self
            .backend
            .bookings_on(employee.id, date)?
            .into_iter()
            .filter(|booking| booking.status.occupies_slot())
            .map(|booking| booking.slot_at)
            .collect();
        let horizon = now + Duration::days(self.rules.horizon_days);

        Ok(self
            .rules
            .day_slots(date)
            .into_iter()
            .filter(|slot| *slot >= now && *slot <= horizon && !occupied.contains(slot))
            .collect())
    }

    fn employee_named(&self, name: &str) -> BookingResult<crate::types::Employee> {
        self.backend
            .employee_by_name(name)?
            .ok_or_else(|| BookingError::UnknownEmployee(name.to_string()))
    }
}
