//! Host-does-IO lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every sans-IO
//! `build_*`/`parse_*` pair over real HTTP using ureq as the host. Validates
//! that request building and response parsing agree with the server.

use clinic_core::{
    AppointmentRequest, AppointmentStatus, Appointments, ClientConfig, ClinicClient, DoctorRequest, Doctors,
    HttpMethod, HttpRequest, HttpResponse, PatientRequest, Patients, PrescriptionRequest, Prescriptions,
    FALLBACK_MESSAGE,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let HttpRequest {
        method,
        path,
        query,
        headers,
        body,
    } = req;

    let result = match method {
        HttpMethod::Get | HttpMethod::Delete => {
            let mut builder = if method == HttpMethod::Get {
                agent.get(&path)
            } else {
                agent.delete(&path)
            };
            for (name, value) in &query {
                builder = builder.query(name, value);
            }
            for (name, value) in &headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.call()
        }
        HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch => {
            let mut builder = match method {
                HttpMethod::Post => agent.post(&path),
                HttpMethod::Put => agent.put(&path),
                _ => agent.patch(&path),
            };
            for (name, value) in &query {
                builder = builder.query(name, value);
            }
            for (name, value) in &headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            match body {
                Some(body) => builder.send(body.as_bytes()),
                None => builder.send_empty(),
            }
        }
    };
    let mut response = result.expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

fn start_server() -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

#[test]
fn clinic_lifecycle() {
    // Step 1: start mock server on a random port.
    let addr = start_server();
    let client = ClinicClient::new(ClientConfig::new(&format!("http://{addr}/api")));

    // Step 2: empty collections.
    let patients = client.parse_list::<Patients>(execute(client.build_list::<Patients>())).unwrap();
    assert!(patients.is_empty(), "expected no patients");

    // Step 3: register a patient and a doctor.
    let patient_input = PatientRequest {
        name: "Ana Lima".to_string(),
        email: "ana@example.com".to_string(),
        phone: Some("555-0100".to_string()),
        birth_date: Some("1990-04-01".to_string()),
        address: None,
    };
    let req = client.build_create::<Patients>(&patient_input).unwrap();
    let patient = client.parse_entity::<Patients>(execute(req)).unwrap();
    assert_eq!(patient.name, "Ana Lima");
    assert_eq!(patient.birth_date.as_deref(), Some("1990-04-01"));

    let doctor_input = DoctorRequest {
        name: "Dr. Souza".to_string(),
        email: "souza@example.com".to_string(),
        license_number: "012345-SP".to_string(),
        specialty: Some("Cardiology".to_string()),
        phone: None,
    };
    let req = client.build_create::<Doctors>(&doctor_input).unwrap();
    let doctor = client.parse_entity::<Doctors>(execute(req)).unwrap();
    assert_eq!(doctor.license_number, "012345-SP");

    // Step 4: full replace of the patient.
    let replaced = PatientRequest {
        address: Some("Rua A, 10".to_string()),
        ..patient_input.clone()
    };
    let req = client.build_update::<Patients>(patient.id, &replaced).unwrap();
    let updated = client.parse_entity::<Patients>(execute(req)).unwrap();
    assert_eq!(updated.id, patient.id);
    assert_eq!(updated.address.as_deref(), Some("Rua A, 10"));

    // Step 5: book an appointment.
    let booking = AppointmentRequest {
        patient_id: patient.id,
        doctor_id: doctor.id,
        date_time: "2024-03-05T14:30:00".to_string(),
        notes: Some("checkup".to_string()),
        status: None,
    };
    let req = client.build_create::<Appointments>(&booking).unwrap();
    let appointment = client.parse_entity::<Appointments>(execute(req)).unwrap();
    assert_eq!(appointment.status, AppointmentStatus::Scheduled);
    assert_eq!(appointment.patient_name.as_deref(), Some("Ana Lima"));

    // Step 6: status and reschedule.
    let req = client.build_set_status(appointment.id, AppointmentStatus::Cancelled);
    client.parse_empty(execute(req)).unwrap();
    let req = client.build_reschedule(appointment.id, "2024-03-08T10:00:00");
    client.parse_empty(execute(req)).unwrap();

    let appointments = client
        .parse_list::<Appointments>(execute(client.build_list::<Appointments>()))
        .unwrap();
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0].status, AppointmentStatus::Cancelled);
    assert_eq!(appointments[0].date_time, "2024-03-08T10:00:00");
    assert_eq!(appointments[0].notes.as_deref(), Some("checkup"));

    // Step 7: prescription scoped to the appointment.
    let prescription_input = PrescriptionRequest {
        appointment_id: appointment.id,
        medication_name: "Losartana".to_string(),
        dosage: Some("50mg".to_string()),
        instructions: Some("once a day".to_string()),
    };
    let req = client.build_create::<Prescriptions>(&prescription_input).unwrap();
    let prescription = client.parse_entity::<Prescriptions>(execute(req)).unwrap();

    let req = client.build_list_by_appointment(appointment.id);
    let scoped = client.parse_list_by_appointment(appointment.id, execute(req)).unwrap();
    assert_eq!(scoped, vec![prescription.clone()]);

    // Step 8: deleting a patient with appointments is refused.
    let req = client.build_delete::<Patients>(patient.id);
    let err = client.parse_empty(execute(req)).unwrap_err();
    assert_eq!(err.status, Some(409));
    assert_eq!(err.message, "patient has linked appointments");

    // Step 9: invalid status value yields the fallback message.
    let mut req = client.build_set_status(appointment.id, AppointmentStatus::Completed);
    req.query = vec![("valor".to_string(), "DONE".to_string())];
    let err = client.parse_empty(execute(req)).unwrap_err();
    assert_eq!(err.status, Some(400));
    assert_eq!(err.message, FALLBACK_MESSAGE);

    // Step 10: unwind in dependency order.
    client.parse_empty(execute(client.build_delete::<Prescriptions>(prescription.id))).unwrap();
    client.parse_empty(execute(client.build_delete::<Appointments>(appointment.id))).unwrap();
    client.parse_empty(execute(client.build_delete::<Patients>(patient.id))).unwrap();
    client.parse_empty(execute(client.build_delete::<Doctors>(doctor.id))).unwrap();

    // Step 11: second delete reports not found.
    let err = client
        .parse_empty(execute(client.build_delete::<Patients>(patient.id)))
        .unwrap_err();
    assert_eq!(err.status, Some(404));
    assert_eq!(err.message, "patient not found");
}
