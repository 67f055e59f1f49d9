//! API access layer for the clinic management service.
//!
//! # Overview
//! Typed clients for patients, doctors, appointments and prescriptions over
//! the clinic REST API, with one normalized error (`RequestFailure`) for every
//! failure.
//!
//! # Design
//! - `ClinicClient` is stateless and sans-IO: `build_*` produces an
//!   `HttpRequest`, `parse_*` consumes an `HttpResponse`.
//! - `ClinicApi` pairs one `ClinicClient` with one `Transport` and exposes
//!   async `ResourceApi` handles (`api.appointments().set_status(..)`).
//! - CRUD is generic over `Resource`; full-replace updates require `Replace`,
//!   which appointments deliberately do not implement.
//! - Timestamps are naive wall-clock strings end to end (`datetime`).
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod confirm;
pub mod dashboard;
pub mod datetime;
pub mod error;
pub mod filter;
pub mod http;
pub mod resource;
pub mod transport;
pub mod types;

pub use api::{ClinicApi, ResourceApi};
pub use client::ClinicClient;
pub use config::ClientConfig;
pub use confirm::{Always, Confirm};
pub use dashboard::DashboardSummary;
pub use error::{FailureCause, RequestFailure, FALLBACK_MESSAGE};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use resource::{Appointments, Doctors, Patients, Prescriptions, Replace, Resource};
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    Appointment, AppointmentRequest, AppointmentStatus, Doctor, DoctorRequest, Id, InvalidStatus, Patient,
    PatientRequest, Prescription, PrescriptionRequest,
};
