use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, put},
    Json, Router,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "dataNascimento", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(rename = "endereco", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Deserialize)]
pub struct PatientInput {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    #[serde(rename = "dataNascimento")]
    pub birth_date: Option<String>,
    #[serde(rename = "endereco")]
    pub address: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    pub crm: String,
    #[serde(rename = "especialidade", skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(rename = "telefone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct DoctorInput {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    pub crm: String,
    #[serde(rename = "especialidade")]
    pub specialty: Option<String>,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "AGENDADA")]
    Scheduled,
    #[serde(rename = "CANCELADA")]
    Cancelled,
    #[serde(rename = "CONCLUIDA")]
    Completed,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    #[serde(rename = "pacienteId")]
    pub patient_id: i64,
    #[serde(rename = "pacienteNome", skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(rename = "medicoId")]
    pub doctor_id: i64,
    #[serde(rename = "medicoNome", skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(rename = "dataHora")]
    pub date_time: String,
    #[serde(rename = "observacoes", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: Status,
}

#[derive(Deserialize)]
pub struct AppointmentInput {
    #[serde(rename = "pacienteId")]
    pub patient_id: i64,
    #[serde(rename = "medicoId")]
    pub doctor_id: i64,
    #[serde(rename = "dataHora")]
    pub date_time: String,
    #[serde(rename = "observacoes")]
    pub notes: Option<String>,
    pub status: Option<Status>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Prescription {
    pub id: i64,
    #[serde(rename = "consultaId")]
    pub appointment_id: i64,
    #[serde(rename = "medicamento")]
    pub medication: String,
    #[serde(rename = "dosagem", skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(rename = "instrucoes", skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

#[derive(Deserialize)]
pub struct PrescriptionInput {
    #[serde(rename = "consultaId")]
    pub appointment_id: i64,
    #[serde(rename = "medicamento")]
    pub medication: String,
    #[serde(rename = "dosagem")]
    pub dosage: Option<String>,
    #[serde(rename = "instrucoes")]
    pub instructions: Option<String>,
}

/// `?valor=` query parameter of the appointment PATCH endpoints.
#[derive(Deserialize)]
pub struct ValueParam<T> {
    pub valor: T,
}

/// In-memory tables. Appointments are stored without resolved names; names
/// are filled in on the way out.
#[derive(Default)]
pub struct Store {
    next_id: i64,
    patients: BTreeMap<i64, Patient>,
    doctors: BTreeMap<i64, Doctor>,
    appointments: BTreeMap<i64, Appointment>,
    prescriptions: BTreeMap<i64, Prescription>,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn resolve(&self, appointment: &Appointment) -> Appointment {
        let mut out = appointment.clone();
        out.patient_name = self.patients.get(&appointment.patient_id).map(|p| p.name.clone());
        out.doctor_name = self.doctors.get(&appointment.doctor_id).map(|d| d.name.clone());
        out
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Error rendered as `{"message": ...}`.
#[derive(Debug)]
pub struct ServerError {
    pub status: StatusCode,
    pub message: String,
}

impl ServerError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn not_found(what: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{what} not found"))
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "message": self.message }))).into_response()
    }
}

type ApiResult<T> = Result<T, ServerError>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/pacientes", get(list_patients).post(create_patient))
        .route("/pacientes/{id}", put(update_patient).delete(delete_patient))
        .route("/medicos", get(list_doctors).post(create_doctor))
        .route("/medicos/{id}", put(update_doctor).delete(delete_doctor))
        .route("/consultas", get(list_appointments).post(create_appointment))
        .route("/consultas/{id}", delete(delete_appointment))
        .route("/consultas/{id}/status", patch(set_status))
        .route("/consultas/{id}/data-hora", patch(reschedule))
        .route("/consultas/{id}/receitas", get(list_prescriptions_by_appointment))
        .route("/receitas", get(list_prescriptions).post(create_prescription))
        .route("/receitas/{id}", put(update_prescription).delete(delete_prescription))
        .with_state(db)
}

/// Serve the API under `/api`, matching the client's default base URL.
pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, Router::new().nest("/api", app())).await
}

fn require(field: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ServerError::bad_request(format!("{field} is required")));
    }
    Ok(())
}

/// Naive `YYYY-MM-DDTHH:mm[:ss]`; offsets and `Z` are rejected.
fn validate_date_time(value: &str) -> ApiResult<()> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .map(|_| ())
        .map_err(|_| ServerError::bad_request(format!("invalid date/time: {value}")))
}

// --- patients ---

async fn list_patients(State(db): State<Db>) -> Json<Vec<Patient>> {
    Json(db.read().await.patients.values().cloned().collect())
}

fn check_patient(input: &PatientInput) -> ApiResult<()> {
    require("name", &input.name)?;
    require("email", &input.email)
}

async fn create_patient(
    State(db): State<Db>,
    Json(input): Json<PatientInput>,
) -> ApiResult<(StatusCode, Json<Patient>)> {
    check_patient(&input)?;
    let mut store = db.write().await;
    let patient = Patient {
        id: store.next_id(),
        name: input.name,
        email: input.email,
        phone: input.phone,
        birth_date: input.birth_date,
        address: input.address,
    };
    store.patients.insert(patient.id, patient.clone());
    Ok((StatusCode::CREATED, Json(patient)))
}

async fn update_patient(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<PatientInput>,
) -> ApiResult<Json<Patient>> {
    check_patient(&input)?;
    let mut store = db.write().await;
    let patient = store.patients.get_mut(&id).ok_or_else(|| ServerError::not_found("patient"))?;
    *patient = Patient {
        id,
        name: input.name,
        email: input.email,
        phone: input.phone,
        birth_date: input.birth_date,
        address: input.address,
    };
    Ok(Json(patient.clone()))
}

async fn delete_patient(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    if !store.patients.contains_key(&id) {
        return Err(ServerError::not_found("patient"));
    }
    if store.appointments.values().any(|a| a.patient_id == id) {
        return Err(ServerError::conflict("patient has linked appointments"));
    }
    store.patients.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

// --- doctors ---

async fn list_doctors(State(db): State<Db>) -> Json<Vec<Doctor>> {
    Json(db.read().await.doctors.values().cloned().collect())
}

fn check_doctor(input: &DoctorInput) -> ApiResult<()> {
    require("name", &input.name)?;
    require("email", &input.email)?;
    require("crm", &input.crm)
}

async fn create_doctor(
    State(db): State<Db>,
    Json(input): Json<DoctorInput>,
) -> ApiResult<(StatusCode, Json<Doctor>)> {
    check_doctor(&input)?;
    let mut store = db.write().await;
    if store.doctors.values().any(|d| d.crm == input.crm) {
        return Err(ServerError::conflict(format!("crm {} already registered", input.crm)));
    }
    let doctor = Doctor {
        id: store.next_id(),
        name: input.name,
        email: input.email,
        crm: input.crm,
        specialty: input.specialty,
        phone: input.phone,
    };
    store.doctors.insert(doctor.id, doctor.clone());
    Ok((StatusCode::CREATED, Json(doctor)))
}

async fn update_doctor(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<DoctorInput>,
) -> ApiResult<Json<Doctor>> {
    check_doctor(&input)?;
    let mut store = db.write().await;
    let doctor = store.doctors.get_mut(&id).ok_or_else(|| ServerError::not_found("doctor"))?;
    *doctor = Doctor {
        id,
        name: input.name,
        email: input.email,
        crm: input.crm,
        specialty: input.specialty,
        phone: input.phone,
    };
    Ok(Json(doctor.clone()))
}

async fn delete_doctor(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    if !store.doctors.contains_key(&id) {
        return Err(ServerError::not_found("doctor"));
    }
    if store.appointments.values().any(|a| a.doctor_id == id) {
        return Err(ServerError::conflict("doctor has linked appointments"));
    }
    store.doctors.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

// --- appointments ---

async fn list_appointments(State(db): State<Db>) -> Json<Vec<Appointment>> {
    let store = db.read().await;
    Json(store.appointments.values().map(|a| store.resolve(a)).collect())
}

async fn create_appointment(
    State(db): State<Db>,
    Json(input): Json<AppointmentInput>,
) -> ApiResult<(StatusCode, Json<Appointment>)> {
    validate_date_time(&input.date_time)?;
    let mut store = db.write().await;
    if !store.patients.contains_key(&input.patient_id) {
        return Err(ServerError::bad_request("patient not found"));
    }
    if !store.doctors.contains_key(&input.doctor_id) {
        return Err(ServerError::bad_request("doctor not found"));
    }
    let appointment = Appointment {
        id: store.next_id(),
        patient_id: input.patient_id,
        patient_name: None,
        doctor_id: input.doctor_id,
        doctor_name: None,
        date_time: input.date_time,
        notes: input.notes,
        status: input.status.unwrap_or(Status::Scheduled),
    };
    store.appointments.insert(appointment.id, appointment.clone());
    Ok((StatusCode::CREATED, Json(store.resolve(&appointment))))
}

async fn set_status(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Query(param): Query<ValueParam<Status>>,
) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    let appointment = store
        .appointments
        .get_mut(&id)
        .ok_or_else(|| ServerError::not_found("appointment"))?;
    appointment.status = param.valor;
    Ok(StatusCode::NO_CONTENT)
}

async fn reschedule(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Query(param): Query<ValueParam<String>>,
) -> ApiResult<StatusCode> {
    validate_date_time(&param.valor)?;
    let mut store = db.write().await;
    let appointment = store
        .appointments
        .get_mut(&id)
        .ok_or_else(|| ServerError::not_found("appointment"))?;
    appointment.date_time = param.valor;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_appointment(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    if !store.appointments.contains_key(&id) {
        return Err(ServerError::not_found("appointment"));
    }
    if store.prescriptions.values().any(|p| p.appointment_id == id) {
        return Err(ServerError::conflict("appointment has prescriptions"));
    }
    store.appointments.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

// --- prescriptions ---

async fn list_prescriptions(State(db): State<Db>) -> Json<Vec<Prescription>> {
    Json(db.read().await.prescriptions.values().cloned().collect())
}

/// Unknown appointments yield an empty list rather than 404.
async fn list_prescriptions_by_appointment(State(db): State<Db>, Path(id): Path<i64>) -> Json<Vec<Prescription>> {
    let store = db.read().await;
    Json(
        store
            .prescriptions
            .values()
            .filter(|p| p.appointment_id == id)
            .cloned()
            .collect(),
    )
}

fn check_prescription(store: &Store, input: &PrescriptionInput) -> ApiResult<()> {
    require("medication", &input.medication)?;
    if !store.appointments.contains_key(&input.appointment_id) {
        return Err(ServerError::bad_request("appointment not found"));
    }
    Ok(())
}

async fn create_prescription(
    State(db): State<Db>,
    Json(input): Json<PrescriptionInput>,
) -> ApiResult<(StatusCode, Json<Prescription>)> {
    let mut store = db.write().await;
    check_prescription(&store, &input)?;
    let prescription = Prescription {
        id: store.next_id(),
        appointment_id: input.appointment_id,
        medication: input.medication,
        dosage: input.dosage,
        instructions: input.instructions,
    };
    store.prescriptions.insert(prescription.id, prescription.clone());
    Ok((StatusCode::CREATED, Json(prescription)))
}

async fn update_prescription(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<PrescriptionInput>,
) -> ApiResult<Json<Prescription>> {
    let mut store = db.write().await;
    check_prescription(&store, &input)?;
    let prescription = store
        .prescriptions
        .get_mut(&id)
        .ok_or_else(|| ServerError::not_found("prescription"))?;
    *prescription = Prescription {
        id,
        appointment_id: input.appointment_id,
        medication: input.medication,
        dosage: input.dosage,
        instructions: input.instructions,
    };
    Ok(Json(prescription.clone()))
}

async fn delete_prescription(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store
        .prescriptions
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| ServerError::not_found("prescription"))
}
