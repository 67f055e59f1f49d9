//! Domain DTOs for the clinic API.
//!
//! # Design
//! These types mirror the server's JSON but are defined independently from the
//! mock-server crate; integration tests catch schema drift. Field names on the
//! wire follow the server (`nome`, `dataHora`, ...). Request types carry every
//! mutable field and never an `id`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub type Id = i64;

/// A status string that matches neither vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid status '{0}': must be one of SCHEDULED, CANCELLED, COMPLETED")]
pub struct InvalidStatus(pub String);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Patient {
    pub id: Id,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "dataNascimento", default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(rename = "endereco", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Payload for creating or replacing a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientRequest {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "dataNascimento", default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(rename = "endereco", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Doctor {
    pub id: Id,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    /// Professional license (CRM). An identifying string, not a number.
    #[serde(rename = "crm")]
    pub license_number: String,
    #[serde(rename = "especialidade", default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(rename = "telefone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DoctorRequest {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "crm")]
    pub license_number: String,
    #[serde(rename = "especialidade", default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(rename = "telefone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Lifecycle state of an appointment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AppointmentStatus {
    #[serde(rename = "AGENDADA")]
    Scheduled,
    #[serde(rename = "CANCELADA")]
    Cancelled,
    #[serde(rename = "CONCLUIDA")]
    Completed,
}

impl AppointmentStatus {
    /// Value transmitted on the wire.
    pub fn as_wire(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "AGENDADA",
            AppointmentStatus::Cancelled => "CANCELADA",
            AppointmentStatus::Completed => "CONCLUIDA",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for AppointmentStatus {
    type Err = InvalidStatus;

    /// Accepts the wire value or the English name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AGENDADA" | "SCHEDULED" => Ok(AppointmentStatus::Scheduled),
            "CANCELADA" | "CANCELLED" => Ok(AppointmentStatus::Cancelled),
            "CONCLUIDA" | "COMPLETED" => Ok(AppointmentStatus::Completed),
            _ => Err(InvalidStatus(s.to_string())),
        }
    }
}

/// An appointment. `date_time` is a naive wall-clock timestamp
/// (`YYYY-MM-DDTHH:mm[:ss]`) and never carries an offset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Appointment {
    pub id: Id,
    #[serde(rename = "pacienteId")]
    pub patient_id: Id,
    #[serde(rename = "pacienteNome", default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(rename = "medicoId")]
    pub doctor_id: Id,
    #[serde(rename = "medicoNome", default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(rename = "dataHora")]
    pub date_time: String,
    #[serde(rename = "observacoes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: AppointmentStatus,
}

/// Payload for booking an appointment. `status` is only an initial value;
/// later changes go through the dedicated status operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppointmentRequest {
    #[serde(rename = "pacienteId")]
    pub patient_id: Id,
    #[serde(rename = "medicoId")]
    pub doctor_id: Id,
    #[serde(rename = "dataHora")]
    pub date_time: String,
    #[serde(rename = "observacoes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Prescription {
    pub id: Id,
    #[serde(rename = "consultaId")]
    pub appointment_id: Id,
    #[serde(rename = "medicamento")]
    pub medication_name: String,
    #[serde(rename = "dosagem", default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(rename = "instrucoes", default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrescriptionRequest {
    #[serde(rename = "consultaId")]
    pub appointment_id: Id,
    #[serde(rename = "medicamento")]
    pub medication_name: String,
    #[serde(rename = "dosagem", default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(rename = "instrucoes", default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}
