//! Records exchanged with the backend
//!
//! Field names follow the backend's JSON (camelCase, `_id`). Every field
//! apart from the identifier has a default so partial records still decode.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Postal address of a doctor's practice
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoctorAddress {
    pub line1: String,
    pub line2: String,
}

/// A doctor as listed in the admin roster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Doctor {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub image: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub available: bool,
    pub fees: f64,
    pub address: DoctorAddress,
    /// Creation time in milliseconds since the epoch
    pub date: i64,
    /// Booked slot times keyed by slot date
    #[serde(rename = "slots_booked")]
    pub slots_booked: HashMap<String, Vec<String>>,
}

/// The authenticated doctor's own profile
pub type ProfileData = Doctor;

/// Patient details embedded in an appointment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserData {
    #[serde(rename = "_id", alias = "id", skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub image: String,
    pub phone: String,
    pub gender: String,
    pub dob: String,
}

/// A booked appointment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Appointment {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub user_id: String,
    pub doc_id: String,
    pub slot_date: String,
    pub slot_time: String,
    pub user_data: UserData,
    pub doc_data: Doctor,
    pub amount: f64,
    /// Booking time in milliseconds since the epoch
    pub date: i64,
    pub cancelled: bool,
    pub payment: bool,
    pub is_completed: bool,
}

impl Appointment {
    /// Neither cancelled nor completed
    pub fn is_pending(&self) -> bool {
        !self.cancelled && !self.is_completed
    }
}

/// Aggregate counts shown on the admin dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdminDashboard {
    pub doctors: u64,
    pub appointments: u64,
    pub patients: u64,
    pub latest_appointments: Vec<Appointment>,
}

/// Aggregate figures shown on a doctor's dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DoctorDashboard {
    pub earnings: f64,
    pub appointments: u64,
    pub patients: u64,
    pub latest_appointments: Vec<Appointment>,
}

/// Body of the change-availability request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    pub doc_id: String,
}

/// Body of the cancel and complete appointment requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub appointment_id: String,
}
