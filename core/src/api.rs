//! Async resource clients over a shared transport.
//!
//! # Design
//! `ClinicApi` is built once and borrowed by every resource handle, so all
//! calls share one `ClinicClient` and one transport. Each operation builds a
//! request, hands it to the transport and parses the response; failures are
//! always `RequestFailure` and are never retried.

use std::marker::PhantomData;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::client::ClinicClient;
use crate::config::ClientConfig;
use crate::confirm::{Confirm, DEFAULT_PROMPT};
use crate::dashboard::DashboardSummary;
use crate::datetime;
use crate::error::RequestFailure;
use crate::http::{HttpRequest, HttpResponse};
use crate::resource::{Appointments, Doctors, Patients, Prescriptions, Replace, Resource};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{AppointmentStatus, Doctor, Id, Patient, Prescription};

/// Entry point: one configured client plus one transport.
#[derive(Debug, Clone)]
pub struct ClinicApi<T = ReqwestTransport> {
    client: ClinicClient,
    transport: T,
}

impl ClinicApi<ReqwestTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }

    /// Configure from `CLINIC_API_URL` (see `ClientConfig::from_env`).
    pub fn from_env() -> Result<Self, RequestFailure> {
        Ok(Self::new(ClientConfig::from_env()?))
    }
}

impl<T: Transport> ClinicApi<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            client: ClinicClient::new(config),
            transport,
        }
    }

    pub fn client(&self) -> &ClinicClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn patients(&self) -> ResourceApi<'_, Patients, T> {
        ResourceApi::new(self)
    }

    pub fn doctors(&self) -> ResourceApi<'_, Doctors, T> {
        ResourceApi::new(self)
    }

    pub fn appointments(&self) -> ResourceApi<'_, Appointments, T> {
        ResourceApi::new(self)
    }

    pub fn prescriptions(&self) -> ResourceApi<'_, Prescriptions, T> {
        ResourceApi::new(self)
    }

    /// Fetch patients and doctors concurrently. Fails as a whole if either
    /// fetch fails.
    pub async fn load_catalog(&self) -> Result<(Vec<Patient>, Vec<Doctor>), RequestFailure> {
        let (patients, doctors) = (self.patients(), self.doctors());
        futures::try_join!(patients.list(), doctors.list())
    }

    /// Fetch all four collections concurrently and summarize them.
    pub async fn dashboard(&self, today: NaiveDate) -> Result<DashboardSummary, RequestFailure> {
        let (patients, doctors, appointments, prescriptions) =
            (self.patients(), self.doctors(), self.appointments(), self.prescriptions());
        let (patients, doctors, appointments, prescriptions) = futures::try_join!(
            patients.list(),
            doctors.list(),
            appointments.list(),
            prescriptions.list(),
        )?;
        Ok(DashboardSummary::compute(
            &patients,
            &doctors,
            &appointments,
            &prescriptions,
            today,
        ))
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RequestFailure> {
        debug!(method = %request.method, url = %request.path, "sending request");
        let result = self.transport.execute(request).await;
        if let Err(e) = &result {
            warn!(error = %e, cause = %e.cause, "request did not complete");
        }
        result
    }
}

/// Typed operations on one collection.
pub struct ResourceApi<'a, R, T> {
    api: &'a ClinicApi<T>,
    _resource: PhantomData<R>,
}

impl<'a, R: Resource, T: Transport> ResourceApi<'a, R, T> {
    fn new(api: &'a ClinicApi<T>) -> Self {
        Self {
            api,
            _resource: PhantomData,
        }
    }

    /// The full collection, in server order.
    pub async fn list(&self) -> Result<Vec<R::Entity>, RequestFailure> {
        let req = self.api.client.build_list::<R>();
        let resp = self.api.send(req).await?;
        self.logged(self.api.client.parse_list::<R>(resp), "list")
    }

    /// Create an item; the returned entity carries the server-assigned id.
    pub async fn create(&self, input: &R::Request) -> Result<R::Entity, RequestFailure> {
        let req = self.api.client.build_create::<R>(input)?;
        let resp = self.api.send(req).await?;
        self.logged(self.api.client.parse_entity::<R>(resp), "create")
    }

    /// Delete by id. Referential rejections from the server surface as the
    /// normalized failure.
    pub async fn delete(&self, id: Id) -> Result<(), RequestFailure> {
        let req = self.api.client.build_delete::<R>(id);
        let resp = self.api.send(req).await?;
        self.logged(self.api.client.parse_empty(resp), "delete")
    }

    /// Delete only after `confirm` agrees. Returns whether a delete was issued.
    pub async fn delete_confirmed<C: Confirm + ?Sized>(
        &self,
        id: Id,
        confirm: &C,
        prompt: &str,
    ) -> Result<bool, RequestFailure> {
        if !confirm.confirm(prompt) {
            debug!(resource = R::NAME, id, "delete declined");
            return Ok(false);
        }
        self.delete(id).await?;
        Ok(true)
    }

    /// `delete_confirmed` with the generic prompt.
    pub async fn delete_after_confirm<C: Confirm + ?Sized>(&self, id: Id, confirm: &C) -> Result<bool, RequestFailure> {
        self.delete_confirmed(id, confirm, DEFAULT_PROMPT).await
    }

    fn logged<V>(&self, result: Result<V, RequestFailure>, operation: &str) -> Result<V, RequestFailure> {
        if let Err(e) = &result {
            warn!(resource = R::NAME, operation, status = ?e.status, "{}", e.message);
        }
        result
    }
}

impl<R: Replace, T: Transport> ResourceApi<'_, R, T> {
    /// Replace every mutable field of an existing item.
    pub async fn update(&self, id: Id, input: &R::Request) -> Result<R::Entity, RequestFailure> {
        let req = self.api.client.build_update::<R>(id, input)?;
        let resp = self.api.send(req).await?;
        self.logged(self.api.client.parse_entity::<R>(resp), "update")
    }
}

impl<T: Transport> ResourceApi<'_, Appointments, T> {
    /// Move an appointment to `status`. Any transition is sent as-is; the
    /// server decides whether it is legal.
    pub async fn set_status(&self, id: Id, status: AppointmentStatus) -> Result<(), RequestFailure> {
        let req = self.api.client.build_set_status(id, status);
        let resp = self.api.send(req).await?;
        self.logged(self.api.client.parse_empty(resp), "set_status")
    }

    /// Move an appointment to a new wire-format naive timestamp.
    pub async fn reschedule(&self, id: Id, date_time: &str) -> Result<(), RequestFailure> {
        let req = self.api.client.build_reschedule(id, date_time);
        let resp = self.api.send(req).await?;
        self.logged(self.api.client.parse_empty(resp), "reschedule")
    }

    /// Reschedule from an editable local value (`YYYY-MM-DDTHH:mm[:ss]`).
    /// Empty input is rejected without contacting the server.
    pub async fn reschedule_local(&self, id: Id, local: &str) -> Result<(), RequestFailure> {
        let wire = datetime::to_wire(local.trim());
        if wire.is_empty() {
            return Err(RequestFailure::invalid_input("a new date and time is required"));
        }
        self.reschedule(id, &wire).await
    }
}

impl<T: Transport> ResourceApi<'_, Prescriptions, T> {
    /// Prescriptions issued during one appointment.
    pub async fn list_by_appointment(&self, appointment_id: Id) -> Result<Vec<Prescription>, RequestFailure> {
        let req = self.api.client.build_list_by_appointment(appointment_id);
        let resp = self.api.send(req).await?;
        self.logged(
            self.api.client.parse_list_by_appointment(appointment_id, resp),
            "list_by_appointment",
        )
    }
}
