use crate::error::{BookingError, BookingResult};
use crate::types::{Booking, Status};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SlotKey {
    employee_id: Uuid,
    slot_at: DateTime<Utc>,
}

impl SlotKey {
    fn of(booking: &Booking) -> Self {
        Self {
            employee_id: booking.employee_id,
            slot_at: booking.slot_at,
        }
    }
}

/// Per-employee, per-day index mapping each hour slot to at most one active
/// booking.
///
/// Every booking ever inserted stays in `bookings`; freeing a slot is a
/// status transition to CANCELED, never a deletion, so the record set doubles
/// as the audit trail. `occupied` only tracks non-canceled entries and gives
/// O(1) conflict lookups.
#[derive(Debug, Clone, Default)]
pub struct SlotIndex {
    bookings: HashMap<Uuid, Booking>,
    occupied: HashMap<SlotKey, Uuid>,
}

impl SlotIndex {
    /// The active booking holding this slot, if any.
    pub fn lookup(&self, employee_id: Uuid, slot_at: DateTime<Utc>) -> Option<&Booking> {
        let key = SlotKey {
            employee_id,
            slot_at,
        };
        self.occupied
            .get(&key)
            .and_then(|id| self.bookings.get(id))
    }

    pub fn is_occupied(&self, employee_id: Uuid, slot_at: DateTime<Utc>) -> bool {
        self.lookup(employee_id, slot_at).is_some()
    }

    pub fn get(&self, booking_id: Uuid) -> Option<&Booking> {
        self.bookings.get(&booking_id)
    }

    /// Insert a booking, claiming its slot when the status occupies one.
    /// Fails with `Conflict` if another active booking already holds it.
    pub fn insert(&mut self, booking: Booking) -> BookingResult<()> {
        if booking.status.occupies_slot() {
            let key = SlotKey::of(&booking);
            if self.occupied.contains_key(&key) {
                return Err(BookingError::Conflict {
                    slot: booking.slot_at,
                });
            }
            self.occupied.insert(key, booking.id);
        }
        self.bookings.insert(booking.id, booking);
        Ok(())
    }

    /// Move a booking through its lifecycle. Transitioning to CANCELED frees
    /// the slot for future inserts; the record itself is kept.
    pub fn transition(&mut self, booking_id: Uuid, to: Status) -> BookingResult<Booking> {
        let booking = self
            .bookings
            .get_mut(&booking_id)
            .ok_or(BookingError::UnknownBooking(booking_id))?;

        let from = booking.status;
        if !from.can_transition_to(to) {
            return Err(BookingError::InvalidTransition { from, to });
        }
        booking.status = to;
        let updated = booking.clone();

        if !to.occupies_slot() {
            let key = SlotKey::of(&updated);
            if self.occupied.get(&key) == Some(&updated.id) {
                self.occupied.remove(&key);
            }
        }
        Ok(updated)
    }

    /// Every booking of an employee on a day, any status, ordered by slot.
    pub fn bookings_on(&self, employee_id: Uuid, date: NaiveDate) -> Vec<Booking> {
        let mut day: Vec<Booking> = self
            .bookings
            .values()
            .filter(|b| b.employee_id == employee_id && b.slot_at.date_naive() == date)
            .cloned()
            .collect();
        day.sort_unstable_by(|a, b| a.slot_at.cmp(&b.slot_at));
        day
    }

    /// Dashboard view: one employee, one day, one status.
    pub fn filtered(&self, employee_id: Uuid, date: NaiveDate, status: Status) -> Vec<Booking> {
        let mut day = self.bookings_on(employee_id, date);
        day.retain(|b| b.status == status);
        day
    }

    /// Every booking in the index, ordered by slot.
    pub fn all(&self) -> Vec<Booking> {
        let mut all: Vec<Booking> = self.bookings.values().cloned().collect();
        all.sort_unstable_by(|a, b| a.slot_at.cmp(&b.slot_at));
        all
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}
