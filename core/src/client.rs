//! Stateless HTTP request builder and response parser for the clinic API.
//!
//! # Design
//! `ClinicClient` holds only its `ClientConfig` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! CRUD operations are generic over `Resource`, so the four collections share
//! one implementation; `build_update` is only available for `Replace`
//! resources.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::RequestFailure;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::resource::{Appointments, Prescriptions, Replace, Resource};
use crate::types::{AppointmentStatus, Id, Prescription};

/// Query parameter carrying the new value in appointment PATCH operations.
const VALUE_PARAM: &str = "valor";

/// Synchronous, stateless client for the clinic API.
#[derive(Debug, Clone)]
pub struct ClinicClient {
    config: ClientConfig,
}

impl ClinicClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn build_list<R: Resource>(&self) -> HttpRequest {
        self.request(HttpMethod::Get, R::PATH.to_string())
    }

    pub fn build_create<R: Resource>(&self, input: &R::Request) -> Result<HttpRequest, RequestFailure> {
        self.json_request(HttpMethod::Post, R::PATH.to_string(), input)
    }

    pub fn build_update<R: Replace>(&self, id: Id, input: &R::Request) -> Result<HttpRequest, RequestFailure> {
        self.json_request(HttpMethod::Put, format!("{}/{id}", R::PATH), input)
    }

    pub fn build_delete<R: Resource>(&self, id: Id) -> HttpRequest {
        self.request(HttpMethod::Delete, format!("{}/{id}", R::PATH))
    }

    /// `PATCH /consultas/{id}/status?valor=`. Only the status is transmitted.
    pub fn build_set_status(&self, id: Id, status: AppointmentStatus) -> HttpRequest {
        let mut req = self.request(HttpMethod::Patch, format!("{}/{id}/status", Appointments::PATH));
        req.query.push((VALUE_PARAM.to_string(), status.as_wire().to_string()));
        req
    }

    /// `PATCH /consultas/{id}/data-hora?valor=`. Expects a wire-format naive
    /// timestamp; see `datetime::to_wire`.
    pub fn build_reschedule(&self, id: Id, date_time: &str) -> HttpRequest {
        let mut req = self.request(HttpMethod::Patch, format!("{}/{id}/data-hora", Appointments::PATH));
        req.query.push((VALUE_PARAM.to_string(), date_time.to_string()));
        req
    }

    /// `GET /consultas/{id}/receitas`.
    pub fn build_list_by_appointment(&self, appointment_id: Id) -> HttpRequest {
        self.request(
            HttpMethod::Get,
            format!("{}/{appointment_id}{}", Appointments::PATH, Prescriptions::PATH),
        )
    }

    pub fn parse_list<R: Resource>(&self, response: HttpResponse) -> Result<Vec<R::Entity>, RequestFailure> {
        parse_json(response)
    }

    /// Parse the entity echoed back by create and update.
    pub fn parse_entity<R: Resource>(&self, response: HttpResponse) -> Result<R::Entity, RequestFailure> {
        parse_json(response)
    }

    /// Parse a response whose body is irrelevant (delete, status, reschedule).
    pub fn parse_empty(&self, response: HttpResponse) -> Result<(), RequestFailure> {
        check_status(&response)
    }

    /// Parse a by-appointment listing, keeping only items that belong to
    /// `appointment_id` even if the server returns extra rows.
    pub fn parse_list_by_appointment(
        &self,
        appointment_id: Id,
        response: HttpResponse,
    ) -> Result<Vec<Prescription>, RequestFailure> {
        let items: Vec<Prescription> = parse_json(response)?;
        Ok(items
            .into_iter()
            .filter(|p| p.appointment_id == appointment_id)
            .collect())
    }

    fn request(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.config.base_url),
            query: Vec::new(),
            headers: self.config.default_headers.clone(),
            body: None,
        }
    }

    fn json_request<B: Serialize>(
        &self,
        method: HttpMethod,
        path: String,
        input: &B,
    ) -> Result<HttpRequest, RequestFailure> {
        let body = serde_json::to_string(input).map_err(|e| RequestFailure::serialization(e.to_string()))?;
        let mut req = self.request(method, path);
        req.body = Some(body);
        Ok(req)
    }
}

/// Map non-2xx responses to the normalized failure.
fn check_status(response: &HttpResponse) -> Result<(), RequestFailure> {
    if response.is_success() {
        Ok(())
    } else {
        Err(RequestFailure::from_response(response))
    }
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, RequestFailure> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| RequestFailure::deserialization(response.status, e.to_string()))
}
