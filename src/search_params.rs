use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::{
    error::{BookingError, BookingResult},
    types::{Employee, PaymentMethod, Status},
};

/// Filter state carried in the URL by the shop and dashboard pages. All
/// fields are optional: a missing or unusable value falls back to its
/// default instead of failing the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleParams {
    pub employee: Option<String>,
    pub date: Option<String>,
    pub status: Option<String>,
}

/// The requested employee when the shop knows them, otherwise the first
/// employee on the roster.
pub fn resolve_employee(requested: Option<&str>, employees: &[Employee]) -> BookingResult<String> {
    if let Some(name) = requested {
        if employees.iter().any(|employee| employee.name == name) {
            return Ok(name.to_string());
        }
    }
    employees
        .first()
        .map(|employee| employee.name.clone())
        .ok_or_else(|| BookingError::UnknownEmployee(requested.unwrap_or("any").to_string()))
}

/// `YYYY-MM-DD`, today when absent or malformed.
pub fn resolve_date(requested: Option<&str>) -> NaiveDate {
    requested
        .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
        .unwrap_or_else(|| Utc::now().date_naive())
}

/// Dashboard listings default to the bookings still awaiting payment.
pub fn resolve_status(requested: Option<&str>) -> Status {
    requested
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(Status::Pending)
}

/// Clients pay by card unless they picked something else.
pub fn resolve_payment(requested: Option<&str>) -> PaymentMethod {
    requested
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(PaymentMethod::Card)
}
