use crate::backend::{BackendError, ScheduleBackend};
use crate::types::{Appointment, Availability, Role, SlotKey, User};
use chrono::{NaiveDate, Utc};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tracing::error;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password: String,
}

#[derive(Debug, Default)]
struct Records {
    availability: HashMap<SlotKey, bool>,
    appointments: HashMap<Uuid, Appointment>,
    // Occupancy index keyed by slot key. Checked and updated under the same
    // lock as `appointments`, which is what makes booking atomic here.
    occupied: HashMap<SlotKey, Uuid>,
    users: Vec<StoredUser>,
    next_user_id: i32,
}

/// In-memory backend used when no database is configured. State does not
/// survive a restart.
#[derive(Debug, Clone, Default)]
pub struct LocalSchedule {
    records: Arc<Mutex<Records>>,
}

impl ScheduleBackend for LocalSchedule {
    fn availability(&self, date: NaiveDate) -> Result<Vec<Availability>, BackendError> {
        let records = self.records.lock().unwrap();
        let mut entries: Vec<Availability> = records
            .availability
            .iter()
            .filter(|(key, _)| key.date == date)
            .map(|(key, available)| Availability {
                date: key.date,
                period: key.period,
                slot: key.slot,
                available: *available,
            })
            .collect();
        entries.sort_by_key(|entry| (entry.period, entry.slot));
        Ok(entries)
    }

    fn set_availability(&self, key: SlotKey, available: bool) -> Result<(), BackendError> {
        let mut records = self.records.lock().unwrap();
        records.availability.insert(key, available);
        Ok(())
    }

    fn appointments(&self, date: NaiveDate) -> Result<Vec<Appointment>, BackendError> {
        let records = self.records.lock().unwrap();
        let mut entries: Vec<Appointment> = records
            .appointments
            .values()
            .filter(|appointment| appointment.date == date)
            .cloned()
            .collect();
        entries.sort_by_key(|entry| (entry.period, entry.slot));
        Ok(entries)
    }

    fn book_slot(
        &self,
        key: SlotKey,
        ticket_id: &str,
        comment: Option<String>,
    ) -> Result<Appointment, BackendError> {
        if ticket_id.is_empty() {
            return Err(BackendError::Validation(
                "ticket id must not be empty".into(),
            ));
        }

        let mut records = self.records.lock().unwrap();
        if records.occupied.contains_key(&key) {
            error!("Slot is already booked");
            return Err(BackendError::Conflict);
        }

        let appointment = Appointment {
            id: Uuid::new_v4(),
            date: key.date,
            period: key.period,
            slot: key.slot,
            ticket_id: ticket_id.to_string(),
            comment,
            created_at: Utc::now(),
        };
        records.occupied.insert(key, appointment.id);
        records
            .appointments
            .insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    fn cancel_appointment(&self, id: Uuid) -> Result<(), BackendError> {
        let mut records = self.records.lock().unwrap();
        match records.appointments.remove(&id) {
            Some(appointment) => {
                records.occupied.remove(&appointment.key());
                Ok(())
            }
            None => {
                error!("Appointment does not exist and can therefore not be cancelled");
                Err(BackendError::NotFound)
            }
        }
    }

    fn users(&self) -> Result<Vec<User>, BackendError> {
        let records = self.records.lock().unwrap();
        let mut users: Vec<User> = records
            .users
            .iter()
            .map(|stored| stored.user.clone())
            .collect();
        users.sort_by_key(|user| user.id);
        Ok(users)
    }

    fn create_user(
        &self,
        email: &str,
        password: &str,
        role: Option<Role>,
    ) -> Result<User, BackendError> {
        if email.is_empty() || password.is_empty() {
            return Err(BackendError::Validation(
                "email and password are required".into(),
            ));
        }

        let mut records = self.records.lock().unwrap();
        if records.users.iter().any(|stored| stored.user.email == email) {
            return Err(BackendError::Conflict);
        }

        records.next_user_id += 1;
        let user = User {
            id: records.next_user_id,
            email: email.to_string(),
            role,
            created_at: Utc::now(),
        };
        records.users.push(StoredUser {
            user: user.clone(),
            password: password.to_string(),
        });
        Ok(user)
    }

    fn update_user_role(&self, email: &str, role: Role) -> Result<(), BackendError> {
        let mut records = self.records.lock().unwrap();
        match records
            .users
            .iter_mut()
            .find(|stored| stored.user.email == email)
        {
            Some(stored) => {
                stored.user.role = Some(role);
                Ok(())
            }
            None => Err(BackendError::NotFound),
        }
    }

    fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>, BackendError> {
        let records = self.records.lock().unwrap();
        let user = records
            .users
            .iter()
            .find(|stored| stored.user.email == email && stored.password == password)
            .map(|stored| stored.user.clone());
        Ok(user)
    }
}
