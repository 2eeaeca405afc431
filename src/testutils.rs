use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex,
    },
};

use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use uuid::Uuid;

use crate::{
    backend::ScheduleBackend,
    configuration::Configuration,
    error::{BookingError, BookingResult},
    types::{Booking, Employee, Haircut, Role, Status},
    validator::BookingRules,
};

pub struct MockScheduleBackendInner {
    pub success: AtomicBool,
    pub calls_to_employees: AtomicU64,
    pub calls_to_add_employee: AtomicU64,
    pub calls_to_haircuts: AtomicU64,
    pub calls_to_add_haircut: AtomicU64,
    pub calls_to_update_haircut: AtomicU64,
    pub calls_to_bookings_on: AtomicU64,
    pub calls_to_bookings_with_status: AtomicU64,
    pub calls_to_insert_booking: AtomicU64,
    pub calls_to_transition_booking: AtomicU64,
    pub employees: Mutex<Vec<Employee>>,
    pub haircuts: Mutex<Vec<Haircut>>,
    pub bookings: Mutex<Vec<Booking>>,
    pub sender: watch::Sender<Vec<Booking>>,
}

#[derive(Clone)]
pub struct MockScheduleBackend(pub Arc<MockScheduleBackendInner>);

impl MockScheduleBackendInner {
    fn new() -> Self {
        let (sender, _receiver) = watch::channel(vec![]);
        Self {
            success: AtomicBool::new(true),
            calls_to_employees: AtomicU64::default(),
            calls_to_add_employee: AtomicU64::default(),
            calls_to_haircuts: AtomicU64::default(),
            calls_to_add_haircut: AtomicU64::default(),
            calls_to_update_haircut: AtomicU64::default(),
            calls_to_bookings_on: AtomicU64::default(),
            calls_to_bookings_with_status: AtomicU64::default(),
            calls_to_insert_booking: AtomicU64::default(),
            calls_to_transition_booking: AtomicU64::default(),
            employees: Mutex::new(vec![Employee {
                id: Uuid::new_v4(),
                name: "Barber1".into(),
                role: Role::Employee,
            }]),
            haircuts: Mutex::new(vec![Haircut {
                id: Uuid::new_v4(),
                name: "Buzz Cut".into(),
                price: 25.0,
                description: "Clipper only".into(),
            }]),
            bookings: Mutex::default(),
            sender,
        }
    }
}

impl MockScheduleBackend {
    pub fn new() -> Self {
        Self(Arc::new(MockScheduleBackendInner::new()))
    }

    pub fn example_employee(&self) -> Employee {
        self.0.employees.lock().unwrap()[0].clone()
    }

    pub fn example_haircut(&self) -> Haircut {
        self.0.haircuts.lock().unwrap()[0].clone()
    }

    fn result(&self) -> BookingResult<()> {
        match self.0.success.load(Ordering::SeqCst) {
            true => Ok(()),
            false => Err(BookingError::backend("supposed to fail")),
        }
    }

    fn publish(&self) {
        self.0.sender.send_replace(self.0.bookings.lock().unwrap().clone());
    }
}

impl ScheduleBackend for MockScheduleBackend {
    fn employees(&self) -> BookingResult<Vec<Employee>> {
        self.0.calls_to_employees.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(self.0.employees.lock().unwrap().clone())
    }

    fn employee_by_name(&self, name: &str) -> BookingResult<Option<Employee>> {
        self.result()?;
        Ok(self
            .0
            .employees
            .lock()
            .unwrap()
            .iter()
            .find(|employee| employee.name == name)
            .cloned())
    }

    fn add_employee(&self, name: String) -> BookingResult<Employee> {
        self.0.calls_to_add_employee.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        let employee = Employee {
            id: Uuid::new_v4(),
            name,
            role: Role::Employee,
        };
        self.0.employees.lock().unwrap().push(employee.clone());
        Ok(employee)
    }

    fn haircuts(&self) -> BookingResult<Vec<Haircut>> {
        self.0.calls_to_haircuts.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(self.0.haircuts.lock().unwrap().clone())
    }

    fn haircut(&self, id: Uuid) -> BookingResult<Option<Haircut>> {
        self.result()?;
        Ok(self
            .0
            .haircuts
            .lock()
            .unwrap()
            .iter()
            .find(|haircut| haircut.id == id)
            .cloned())
    }

    fn add_haircut(&self, name: String, price: f64, description: String) -> BookingResult<Haircut> {
        self.0.calls_to_add_haircut.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        let haircut = Haircut {
            id: Uuid::new_v4(),
            name,
            price,
            description,
        };
        self.0.haircuts.lock().unwrap().push(haircut.clone());
        Ok(haircut)
    }

    fn update_haircut(&self, haircut: Haircut) -> BookingResult<()> {
        self.0.calls_to_update_haircut.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        let mut haircuts = self.0.haircuts.lock().unwrap();
        match haircuts.iter_mut().find(|existing| existing.id == haircut.id) {
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
        self.result()?;
        Ok(self
            .0
            .bookings
            .lock()
            .unwrap()
            .iter()
            .find(|booking| {
                booking.employee_id == employee_id
                    && booking.slot_at == slot_at
                    && booking.status.occupies_slot()
            })
            .cloned())
    }

    fn bookings_on(&self, employee_id: Uuid, date: NaiveDate) -> BookingResult<Vec<Booking>> {
        self.0.calls_to_bookings_on.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        let mut day: Vec<Booking> = self
            .0
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|booking| {
                booking.employee_id == employee_id && booking.slot_at.date_naive() == date
            })
            .cloned()
            .collect();
        day.sort_unstable_by(|a, b| a.slot_at.cmp(&b.slot_at));
        Ok(day)
    }

    fn bookings_with_status(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
        status: Status,
    ) -> BookingResult<Vec<Booking>> {
        self.0
            .calls_to_bookings_with_status
            .fetch_add(1, Ordering::SeqCst);
        let mut day = self.bookings_on(employee_id, date)?;
        day.retain(|booking| booking.status == status);
        Ok(day)
    }

    fn insert_booking(&self, booking: Booking) -> BookingResult<()> {
        self.0.calls_to_insert_booking.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        {
            let mut bookings = self.0.bookings.lock().unwrap();
            let taken = bookings.iter().any(|existing| {
                existing.employee_id == booking.employee_id
                    && existing.slot_at == booking.slot_at
                    && existing.status.occupies_slot()
            });
            if taken {
                return Err(BookingError::Conflict {
                    slot: booking.slot_at,
                });
            }
            bookings.push(booking);
        }
        self.publish();
        Ok(())
    }

    fn transition_booking(&self, booking_id: Uuid, to: Status) -> BookingResult<Booking> {
        self.0
            .calls_to_transition_booking
            .fetch_add(1, Ordering::SeqCst);
        self.result()?;
        let updated = {
            let mut bookings = self.0.bookings.lock().unwrap();
            let booking = bookings
                .iter_mut()
                .find(|booking| booking.id == booking_id)
                .ok_or(BookingError::UnknownBooking(booking_id))?;
            if !booking.status.can_transition_to(to) {
                return Err(BookingError::InvalidTransition {
                    from: booking.status,
                    to,
                });
            }
            booking.status = to;
            booking.clone()
        };
        self.publish();
        Ok(updated)
    }

    fn booking_stream(&self) -> WatchStream<Vec<Booking>> {
        WatchStream::new(self.0.sender.subscribe())
    }
}

#[derive(Clone, Debug)]
pub struct TestConfiguration {
    pub frontend_path: PathBuf,
}

impl Default for TestConfiguration {
    fn default() -> Self {
        Self {
            frontend_path: PathBuf::from("missing.html"),
        }
    }
}

impl Configuration for TestConfiguration {
    fn shop_name(&self) -> String {
        "Test Shop".into()
    }

    fn password(&self) -> String {
        "123".into()
    }

    fn frontend_path(&self) -> PathBuf {
        self.frontend_path.clone()
    }

    fn booking_rules(&self) -> BookingRules {
        BookingRules::default()
    }

    fn database_url(&self) -> Option<String> {
        None
    }

    fn port(&self) -> String {
        "0".into()
    }
}
