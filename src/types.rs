use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Employee,
    Client,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Employee => "EMPLOYEE",
            Role::Client => "CLIENT",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EMPLOYEE" => Ok(Role::Employee),
            "CLIENT" => Ok(Role::Client),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Haircut {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub description: String,
}

/// A scheduled (or blocking) occupation of one hour slot. BREAK entries are
/// staff-initiated blockers and carry no client, haircut or payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub client_id: Option<Uuid>,
    pub client_name: Option<String>,
    pub haircut_id: Option<Uuid>,
    pub slot_at: DateTime<Utc>,
    pub payment_method: Option<PaymentMethod>,
    pub status: Status,
}

impl Booking {
    pub fn for_client(
        employee_id: Uuid,
        client_id: Uuid,
        client_name: String,
        haircut_id: Uuid,
        slot_at: DateTime<Utc>,
        payment_method: PaymentMethod,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id,
            client_id: Some(client_id),
            client_name: Some(client_name),
            haircut_id: Some(haircut_id),
            slot_at,
            payment_method: Some(payment_method),
            status: Status::Pending,
        }
    }

    pub fn blocker(employee_id: Uuid, slot_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id,
            client_id: None,
            client_name: None,
            haircut_id: None,
            slot_at,
            payment_method: None,
            status: Status::Break,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Pending,
    Paid,
    Break,
    Canceled,
}

impl Status {
    /// A booking in this status occupies its slot.
    pub fn occupies_slot(self) -> bool {
        self != Status::Canceled
    }

    /// Allowed lifecycle moves. Bookings are never deleted, so freeing a
    /// slot always goes through CANCELED.
    pub fn can_transition_to(self, to: Status) -> bool {
        matches!(
            (self, to),
            (Status::Pending, Status::Paid)
                | (Status::Pending, Status::Canceled)
                | (Status::Break, Status::Canceled)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "PENDING",
            Status::Paid => "PAID",
            Status::Break => "BREAK",
            Status::Canceled => "CANCELED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Status::Pending),
            "PAID" => Ok(Status::Paid),
            "BREAK" => Ok(Status::Break),
            "CANCELED" => Ok(Status::Canceled),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Card,
    Cash,
    Pix,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Card => "CARD",
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Pix => "PIX",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CARD" => Ok(PaymentMethod::Card),
            "CASH" => Ok(PaymentMethod::Cash),
            "PIX" => Ok(PaymentMethod::Pix),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

/// Build the slot datetime for an hour of a given day.
pub fn slot_start(date: NaiveDate, hour: u32) -> Option<DateTime<Utc>> {
    date.and_hms_opt(hour, 0, 0).map(|naive| naive.and_utc())
}

/// Slots have hour granularity: minutes and below must be zero.
pub fn is_slot_aligned(at: DateTime<Utc>) -> bool {
    at.minute() == 0 && at.second() == 0 && at.nanosecond() == 0
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for status in [Status::Pending, Status::Paid, Status::Break, Status::Canceled] {
            assert_eq!(status.as_str().parse::<Status>().unwrap(), status);
        }
        assert!("WAITING".parse::<Status>().is_err());
    }

    #[test]
    fn only_canceled_frees_a_slot() {
        assert!(Status::Pending.occupies_slot());
        assert!(Status::Paid.occupies_slot());
        assert!(Status::Break.occupies_slot());
        assert!(!Status::Canceled.occupies_slot());
    }

    #[test]
    fn lifecycle_transitions() {
        assert!(Status::Pending.can_transition_to(Status::Paid));
        assert!(Status::Pending.can_transition_to(Status::Canceled));
        assert!(Status::Break.can_transition_to(Status::Canceled));

        assert!(!Status::Paid.can_transition_to(Status::Canceled));
        assert!(!Status::Canceled.can_transition_to(Status::Pending));
        assert!(!Status::Break.can_transition_to(Status::Paid));
        assert!(!Status::Pending.can_transition_to(Status::Break));
    }

    #[test]
    fn slot_start_is_hour_aligned() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let slot = slot_start(date, 14).unwrap();
        assert!(is_slot_aligned(slot));
        assert_eq!(slot.to_rfc3339(), "2024-06-10T14:00:00+00:00");

        assert!(slot_start(date, 24).is_none());
    }

    #[test]
    fn misaligned_datetimes_are_detected() {
        let aligned = "2024-06-10T14:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let misaligned = "2024-06-10T14:30:00Z".parse::<DateTime<Utc>>().unwrap();
        assert!(is_slot_aligned(aligned));
        assert!(!is_slot_aligned(misaligned));
    }
}
