//! Overview counters for the landing page.

use chrono::NaiveDate;

use crate::types::{Appointment, AppointmentStatus, Doctor, Patient, Prescription};

/// How many entries `recent` and `recent_prescriptions` keep.
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub patients: usize,
    pub doctors: usize,
    pub scheduled: usize,
    pub completed: usize,
    /// Appointments whose naive timestamp falls on `today`.
    pub today: usize,
    pub prescriptions: usize,
    /// First appointments in server order.
    pub recent: Vec<Appointment>,
    /// First prescriptions in server order.
    pub recent_prescriptions: Vec<Prescription>,
}

impl DashboardSummary {
    pub fn compute(
        patients: &[Patient],
        doctors: &[Doctor],
        appointments: &[Appointment],
        prescriptions: &[Prescription],
        today: NaiveDate,
    ) -> Self {
        let count_status = |status: AppointmentStatus| appointments.iter().filter(|a| a.status == status).count();
        let today_prefix = today.format("%Y-%m-%d").to_string();
        Self {
            patients: patients.len(),
            doctors: doctors.len(),
            scheduled: count_status(AppointmentStatus::Scheduled),
            completed: count_status(AppointmentStatus::Completed),
            today: appointments
                .iter()
                .filter(|a| a.date_time.starts_with(&today_prefix))
                .count(),
            prescriptions: prescriptions.len(),
            recent: appointments.iter().take(RECENT_LIMIT).cloned().collect(),
            recent_prescriptions: prescriptions.iter().take(RECENT_LIMIT).cloned().collect(),
        }
    }
}
