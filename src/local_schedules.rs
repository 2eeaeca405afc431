use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    backend::ScheduleBackend,
    error::{BookingError, BookingResult},
    slot_index::SlotIndex,
    types::{Booking, Employee, Haircut, Role, Status},
};

#[derive(Debug, Default)]
struct ShopData {
    employees: Vec<Employee>,
    haircuts: HashMap<Uuid, Haircut>,
    bookings: SlotIndex,
}

/// In-memory backend. One mutex guards the whole shop, so a booking's
/// check-then-insert runs under a single lock and concurrent requests
/// for the same slot serialize on it.
#[derive(Debug, Clone)]
pub struct LocalSchedules {
    data: Arc<Mutex<ShopData>>,
    sender: Arc<watch::Sender<Vec<Booking>>>,
}

impl Default for LocalSchedules {
    fn default() -> Self {
        let (sender, _receiver) = watch::channel(vec![]);
        Self {
            data: Arc::new(Mutex::new(ShopData::default())),
            sender: Arc::new(sender),
        }
    }
}

impl LocalSchedules {
    /// Demo roster and price list for running without a database.
    pub(crate) fn insert_example_shop(&self) {
        info!("inserting example roster and price list");
        for name in ["Barber1", "Barber2", "Barber3"] {
            if let Err(error) = self.add_employee(name.into()) {
                error!("failed to add example employee: {error}");
            }
        }
        for (name, price, description) in [
            ("Buzz Cut", 25.0, "All over with the clippers"),
            ("Classic Cut", 35.0, "Scissor cut with a hot towel finish"),
            ("Mid Fade", 40.0, "Faded sides, textured top"),
            ("Beard Trim", 20.0, "Shape and line-up"),
        ] {
            if let Err(error) = self.add_haircut(name.into(), price, description.into()) {
                error!("failed to add example haircut: {error}");
            }
        }
    }

    fn publish(&self) {
        let bookings = self.data.lock().unwrap().bookings.all();
        self.sender.send_replace(bookings);
    }
}

impl ScheduleBackend for LocalSchedules {
    fn employees(&self) -> BookingResult<Vec<Employee>> {
        Ok(self.data.lock().unwrap().employees.clone())
    }

    fn employee_by_name(&self, name: &str) -> BookingResult<Option<Employee>> {
        let data = self.data.lock().unwrap();
        Ok(data
            .employees
            .iter()
            .find(|employee| employee.name == name)
            .cloned())
    }

    fn add_employee(&self, name: String) -> BookingResult<Employee> {
        let mut data = self.data.lock().unwrap();
        if data.employees.iter().any(|employee| employee.name == name) {
            return Err(BookingError::DuplicateEmployee(name));
        }
        let employee = Employee {
            id: Uuid::new_v4(),
            name,
            role: Role::Employee,
        };
        data.employees.push(employee.clone());
        Ok(employee)
    }

    fn haircuts(&self) -> BookingResult<Vec<Haircut>> {
        let data = self.data.lock().unwrap();
        let mut haircuts: Vec<Haircut> = data.haircuts.values().cloned().collect();
        haircuts.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        Ok(haircuts)
    }

    fn haircut(&self, id: Uuid) -> BookingResult<Option<Haircut>> {
        Ok(self.data.lock().unwrap().haircuts.get(&id).cloned())
    }

    fn add_haircut(&self, name: String, price: f64, description: String) -> BookingResult<Haircut> {
        let haircut = Haircut {
            id: Uuid::new_v4(),
            name,
            price,
            description,
        };
        self.data
            .lock()
            .unwrap()
            .haircuts
            .insert(haircut.id, haircut.clone());
        Ok(haircut)
    }

    fn update_haircut(&self, haircut: Haircut) -> BookingResult<()> {
        let mut data = self.data.lock().unwrap();
        match data.haircuts.get_mut(&haircut.id) {
            Some(existing) => {
                *existing = haircut;
                Ok(())
            }
            None => Err(BookingError::UnknownHaircut(haircut.id)),
        }
    }

    fn booking_at(
        &self,
        employee_id: Uuid,
        slot_at: DateTime<Utc>,
    ) -> BookingResult<Option<Booking>> {
        let data = self.data.lock().unwrap();
        Ok(data.bookings.lookup(employee_id, slot_at).cloned())
    }

    fn bookings_on(&self, employee_id: Uuid, date: NaiveDate) -> BookingResult<Vec<Booking>> {
        Ok(self.data.lock().unwrap().bookings.bookings_on(employee_id, date))
    }

    fn bookings_with_status(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
        status: Status,
    ) -> BookingResult<Vec<Booking>> {
        let data = self.data.lock().unwrap();
        Ok(data.bookings.filtered(employee_id, date, status))
    }

    fn insert_booking(&self, booking: Booking) -> BookingResult<()> {
        {
            let mut data = self.data.lock().unwrap();
            if !data
                .employees
                .iter()
                .any(|employee| employee.id == booking.employee_id)
            {
                return Err(BookingError::UnknownEmployee(booking.employee_id.to_string()));
            }
            data.bookings.insert(booking)?;
        }
        self.publish();
        Ok(())
    }

    fn transition_booking(&self, booking_id: Uuid, to: Status) -> BookingResult<Booking> {
        let booking = {
            let mut data = self.data.lock().unwrap();
            data.bookings.transition(booking_id, to)?
        };
        self.publish();
        Ok(booking)
    }

    fn booking_stream(&self) -> WatchStream<Vec<Booking>> {
        WatchStream::new(self.sender.subscribe())
    }
}
