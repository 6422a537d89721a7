use crate::types::{Appointment, Availability, Role, SlotKey, User};
use chrono::NaiveDate;
use std::{error::Error, fmt};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    Validation(String),
    Conflict,
    NotFound,
    Storage(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Validation(reason) => write!(formatter, "Invalid request: {reason}"),
            BackendError::Conflict => write!(formatter, "Record already exists"),
            BackendError::NotFound => write!(formatter, "Record does not exist"),
            BackendError::Storage(reason) => write!(formatter, "Storage failure: {reason}"),
        }
    }
}

impl Error for BackendError {}

/// Storage contract shared by the database backend and the in-memory
/// fallback. Booking must be atomic with respect to the slot-key uniqueness
/// constraint: of two concurrent bookings for the same key exactly one
/// succeeds, the other fails with `Conflict`.
pub trait ScheduleBackend: Clone + Send + Sync + 'static {
    fn availability(&self, date: NaiveDate) -> Result<Vec<Availability>, BackendError>;
    fn set_availability(&self, key: SlotKey, available: bool) -> Result<(), BackendError>;
    fn appointments(&self, date: NaiveDate) -> Result<Vec<Appointment>, BackendError>;
    fn book_slot(
        &self,
        key: SlotKey,
        ticket_id: &str,
        comment: Option<String>,
    ) -> Result<Appointment, BackendError>;
    fn cancel_appointment(&self, id: Uuid) -> Result<(), BackendError>;
    fn users(&self) -> Result<Vec<User>, BackendError>;
    fn create_user(
        &self,
        email: &str,
        password: &str,
        role: Option<Role>,
    ) -> Result<User, BackendError>;
    fn update_user_role(&self, email: &str, role: Role) -> Result<(), BackendError>;
    fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>, BackendError>;
}
