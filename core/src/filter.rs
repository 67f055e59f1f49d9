//! Client-side filtering of fetched lists.
//!
//! Text criteria are trimmed and matched case-insensitively as substrings; an
//! empty criterion matches everything. Date bounds are inclusive and `to`
//! covers the whole day.

use chrono::NaiveDate;

use crate::datetime;
use crate::types::{Appointment, Doctor, Id, Patient, Prescription};

fn matches_text(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    needle.is_empty() || haystack.to_lowercase().contains(&needle)
}

#[derive(Debug, Clone, Default)]
pub struct PatientFilter {
    pub name: String,
    pub email: String,
}

impl PatientFilter {
    pub fn matches(&self, patient: &Patient) -> bool {
        matches_text(&patient.name, &self.name) && matches_text(&patient.email, &self.email)
    }

    pub fn apply<'a>(&self, items: &'a [Patient]) -> Vec<&'a Patient> {
        items.iter().filter(|p| self.matches(p)).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DoctorFilter {
    pub name: String,
    pub email: String,
    pub license: String,
}

impl DoctorFilter {
    pub fn matches(&self, doctor: &Doctor) -> bool {
        matches_text(&doctor.name, &self.name)
            && matches_text(&doctor.email, &self.email)
            && matches_text(&doctor.license_number, &self.license)
    }

    pub fn apply<'a>(&self, items: &'a [Doctor]) -> Vec<&'a Doctor> {
        items.iter().filter(|d| self.matches(d)).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    /// Matched against the patient name, or the id when no name was resolved.
    pub patient: String,
    /// Matched against the doctor name, or the id when no name was resolved.
    pub doctor: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl AppointmentFilter {
    pub fn matches(&self, appointment: &Appointment) -> bool {
        let patient = display_or_id(appointment.patient_name.as_deref(), appointment.patient_id);
        let doctor = display_or_id(appointment.doctor_name.as_deref(), appointment.doctor_id);
        if !matches_text(&patient, &self.patient) || !matches_text(&doctor, &self.doctor) {
            return false;
        }
        if self.from.is_none() && self.to.is_none() {
            return true;
        }
        // Unparseable timestamps never satisfy a date bound.
        let Some(when) = datetime::parse_naive(&appointment.date_time) else {
            return false;
        };
        let date = when.date();
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }

    pub fn apply<'a>(&self, items: &'a [Appointment]) -> Vec<&'a Appointment> {
        items.iter().filter(|a| self.matches(a)).collect()
    }
}

fn display_or_id(name: Option<&str>, id: Id) -> String {
    match name {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => id.to_string(),
    }
}

/// Prescriptions belonging to `appointment_id`, in their original order.
pub fn prescriptions_for_appointment(items: &[Prescription], appointment_id: Id) -> Vec<&Prescription> {
    items.iter().filter(|p| p.appointment_id == appointment_id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AppointmentStatus;

    fn patient(id: Id, name: &str, email: &str) -> Patient {
        Patient {
            id,
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            birth_date: None,
            address: None,
        }
    }

    fn appointment(id: Id, patient_name: Option<&str>, date_time: &str) -> Appointment {
        Appointment {
            id,
            patient_id: 100 + id,
            patient_name: patient_name.map(str::to_string),
            doctor_id: 7,
            doctor_name: Some("Dr. Souza".to_string()),
            date_time: date_time.to_string(),
            notes: None,
            status: AppointmentStatus::Scheduled,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn patient_filter_is_case_insensitive_and_trimmed() {
        let items = vec![patient(1, "Ana Lima", "ana@x.com"), patient(2, "Bruno", "bruno@y.com")];
        let filter = PatientFilter {
            name: "  LIMA ".to_string(),
            ..Default::default()
        };
        let found = filter.apply(&items);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1);
    }

    #[test]
    fn empty_filter_matches_everything() {
        let items = vec![patient(1, "Ana", "a@x.com"), patient(2, "Bruno", "b@y.com")];
        assert_eq!(PatientFilter::default().apply(&items).len(), 2);
    }

    #[test]
    fn doctor_filter_checks_license() {
        let doctor = Doctor {
            id: 1,
            name: "Dr. Souza".to_string(),
            email: "s@x.com".to_string(),
            license_number: "CRM-SP 1234".to_string(),
            specialty: None,
            phone: None,
        };
        let hit = DoctorFilter {
            license: "sp 12".to_string(),
            ..Default::default()
        };
        let miss = DoctorFilter {
            license: "RJ".to_string(),
            ..Default::default()
        };
        assert!(hit.matches(&doctor));
        assert!(!miss.matches(&doctor));
    }

    #[test]
    fn appointment_filter_falls_back_to_patient_id() {
        let unnamed = appointment(1, None, "2024-03-05T14:30:00");
        let filter = AppointmentFilter {
            patient: "101".to_string(),
            ..Default::default()
        };
        assert!(filter.matches(&unnamed));
    }

    #[test]
    fn date_range_is_inclusive_of_whole_end_day() {
        let items = vec![
            appointment(1, Some("Ana"), "2024-03-04T23:59:00"),
            appointment(2, Some("Ana"), "2024-03-05T00:00:00"),
            appointment(3, Some("Ana"), "2024-03-06T23:59:59"),
            appointment(4, Some("Ana"), "2024-03-07T00:00:00"),
        ];
        let filter = AppointmentFilter {
            from: Some(date(2024, 3, 5)),
            to: Some(date(2024, 3, 6)),
            ..Default::default()
        };
        let ids: Vec<Id> = filter.apply(&items).iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn unparseable_date_only_excluded_when_bounded() {
        let broken = appointment(1, Some("Ana"), "not a date");
        assert!(AppointmentFilter::default().matches(&broken));
        let bounded = AppointmentFilter {
            from: Some(date(2024, 1, 1)),
            ..Default::default()
        };
        assert!(!bounded.matches(&broken));
    }

    #[test]
    fn prescriptions_for_missing_appointment_is_empty() {
        let items = vec![Prescription {
            id: 1,
            appointment_id: 5,
            medication_name: "Dipirona".to_string(),
            dosage: None,
            instructions: None,
        }];
        assert_eq!(prescriptions_for_appointment(&items, 5).len(), 1);
        assert!(prescriptions_for_appointment(&items, 6).is_empty());
    }
}
