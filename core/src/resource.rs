//! Resource descriptors tying a collection path to its entity and request types.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::{
    Appointment, AppointmentRequest, Doctor, DoctorRequest, Patient, PatientRequest, Prescription,
    PrescriptionRequest,
};

/// A REST collection supporting list, create and delete.
pub trait Resource {
    /// Collection path relative to the base URL, with a leading `/`.
    const PATH: &'static str;
    /// Human-readable name used in log lines.
    const NAME: &'static str;

    type Entity: DeserializeOwned;
    type Request: Serialize;
}

/// Collections whose items may be fully replaced with `PUT /{id}`.
pub trait Replace: Resource {}

pub struct Patients;
pub struct Doctors;
/// Appointments are not `Replace`: status and date change only through
/// their dedicated operations.
pub struct Appointments;
pub struct Prescriptions;

impl Resource for Patients {
    const PATH: &'static str = "/pacientes";
    const NAME: &'static str = "patients";
    type Entity = Patient;
    type Request = PatientRequest;
}

impl Replace for Patients {}

impl Resource for Doctors {
    const PATH: &'static str = "/medicos";
    const NAME: &'static str = "doctors";
    type Entity = Doctor;
    type Request = DoctorRequest;
}

impl Replace for Doctors {}

impl Resource for Appointments {
    const PATH: &'static str = "/consultas";
    const NAME: &'static str = "appointments";
    type Entity = Appointment;
    type Request = AppointmentRequest;
}

impl Resource for Prescriptions {
    const PATH: &'static str = "/receitas";
    const NAME: &'static str = "prescriptions";
    type Entity = Prescription;
    type Request = PrescriptionRequest;
}

impl Replace for Prescriptions {}
