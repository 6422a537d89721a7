use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
};

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::backend::{BackendError, ScheduleBackend};
use crate::configuration::Configuration;
use crate::types::{Appointment, Availability, Role, SlotKey, User};

pub struct MockScheduleBackendInner {
    pub failure: Mutex<Option<BackendError>>,
    pub calls_to_availability: AtomicU64,
    pub calls_to_set_availability: AtomicU64,
    pub calls_to_appointments: AtomicU64,
    pub calls_to_book_slot: AtomicU64,
    pub calls_to_cancel_appointment: AtomicU64,
    pub calls_to_users: AtomicU64,
    pub calls_to_create_user: AtomicU64,
    pub calls_to_update_user_role: AtomicU64,
    pub calls_to_authenticate: AtomicU64,
    pub availability: Mutex<Vec<Availability>>,
    pub appointments: Mutex<Vec<Appointment>>,
    pub users: Mutex<Vec<User>>,
    pub passwords: Mutex<HashMap<String, String>>,
}

#[derive(Clone)]
pub struct MockScheduleBackend(pub Arc<MockScheduleBackendInner>);

impl MockScheduleBackendInner {
    fn new() -> Self {
        Self {
            failure: Mutex::default(),
            calls_to_availability: AtomicU64::default(),
            calls_to_set_availability: AtomicU64::default(),
            calls_to_appointments: AtomicU64::default(),
            calls_to_book_slot: AtomicU64::default(),
            calls_to_cancel_appointment: AtomicU64::default(),
            calls_to_users: AtomicU64::default(),
            calls_to_create_user: AtomicU64::default(),
            calls_to_update_user_role: AtomicU64::default(),
            calls_to_authenticate: AtomicU64::default(),
            availability: Mutex::default(),
            appointments: Mutex::default(),
            users: Mutex::default(),
            passwords: Mutex::default(),
        }
    }
}

impl MockScheduleBackend {
    pub fn new() -> Self {
        Self(Arc::new(MockScheduleBackendInner::new()))
    }

    pub fn fail_with(&self, error: BackendError) {
        *self.0.failure.lock().unwrap() = Some(error);
    }

    fn result(&self) -> Result<(), BackendError> {
        match self.0.failure.lock().unwrap().clone() {
            None => Ok(()),
            Some(error) => Err(error),
        }
    }
}

impl ScheduleBackend for MockScheduleBackend {
    fn availability(&self, _date: NaiveDate) -> Result<Vec<Availability>, BackendError> {
        self.0.calls_to_availability.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(self.0.availability.lock().unwrap().clone())
    }

    fn set_availability(&self, _key: SlotKey, _available: bool) -> Result<(), BackendError> {
        self.0
            .calls_to_set_availability
            .fetch_add(1, Ordering::SeqCst);
        self.result()
    }

    fn appointments(&self, _date: NaiveDate) -> Result<Vec<Appointment>, BackendError> {
        self.0.calls_to_appointments.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(self.0.appointments.lock().unwrap().clone())
    }

    fn book_slot(
        &self,
        key: SlotKey,
        ticket_id: &str,
        comment: Option<String>,
    ) -> Result<Appointment, BackendError> {
        self.0.calls_to_book_slot.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(Appointment {
            id: Uuid::new_v4(),
            date: key.date,
            period: key.period,
            slot: key.slot,
            ticket_id: ticket_id.to_string(),
            comment,
            created_at: Utc::now(),
        })
    }

    fn cancel_appointment(&self, _id: Uuid) -> Result<(), BackendError> {
        self.0
            .calls_to_cancel_appointment
            .fetch_add(1, Ordering::SeqCst);
        self.result()
    }

    fn users(&self) -> Result<Vec<User>, BackendError> {
        self.0.calls_to_users.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(self.0.users.lock().unwrap().clone())
    }

    fn create_user(
        &self,
        email: &str,
        _password: &str,
        role: Option<Role>,
    ) -> Result<User, BackendError> {
        self.0.calls_to_create_user.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(User {
            id: 1,
            email: email.to_string(),
            role,
            created_at: Utc::now(),
        })
    }

    fn update_user_role(&self, _email: &str, _role: Role) -> Result<(), BackendError> {
        self.0
            .calls_to_update_user_role
            .fetch_add(1, Ordering::SeqCst);
        self.result()
    }

    fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>, BackendError> {
        self.0.calls_to_authenticate.fetch_add(1, Ordering::SeqCst);
        self.result()?;

        let passwords = self.0.passwords.lock().unwrap();
        if passwords.get(email).map(String::as_str) != Some(password) {
            return Ok(None);
        }
        let users = self.0.users.lock().unwrap();
        Ok(users.iter().find(|user| user.email == email).cloned())
    }
}

#[derive(Clone)]
pub struct TestConfiguration;

impl Configuration for TestConfiguration {
    fn admin_password(&self) -> String {
        "123".into()
    }

    fn port(&self) -> String {
        "0".into()
    }

    fn database_url(&self) -> Option<String> {
        None
    }
}
