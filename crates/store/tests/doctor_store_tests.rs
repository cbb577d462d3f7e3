//! Doctor store behaviour against a mocked backend

use prescripto_core::{Cached, ProfileData};
use prescripto_http::client::ApiClient;
use prescripto_store::{
    ClientSettings, DoctorStore, MemoryStorage, Notification, RecordingNotifier,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_for(server: &MockServer, notifier: &Arc<RecordingNotifier>) -> DoctorStore {
    let client = ApiClient::new(server.uri()).unwrap();
    let storage = Arc::new(MemoryStorage::with_entry("dToken", "doctor-token"));
    DoctorStore::new(client, storage, notifier.clone())
}

async fn mount_reloads(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/doctor/appointments"))
        .and(header("dtoken", "doctor-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "appointments": [
                {"_id": "A1", "isCompleted": true},
                {"_id": "A2"}
            ]
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/doctor/dashboard"))
        .and(header("dtoken", "doctor-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "dashData": {"earnings": 150, "appointments": 2, "patients": 2, "latestAppointments": []}
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_complete_refreshes_appointments_and_dashboard() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/doctor/complete-appointment"))
        .and(body_json(json!({"appointmentId": "A1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Appointment Completed"
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_reloads(&server).await;

    let notifier = Arc::new(RecordingNotifier::new());
    let store = store_for(&server, &notifier);
    store.complete_appointment("A1").await;

    assert_eq!(
        notifier.take(),
        vec![Notification::success("Appointment Completed")]
    );
    let appointments = store.appointments().get().unwrap_or_default();
    assert_eq!(appointments[0].id, "A2");
    assert!(appointments[1].is_completed);
    assert_eq!(store.dash_data().get().unwrap_or_default().earnings, 150.0);
}

#[tokio::test]
async fn test_cancel_refreshes_appointments_and_dashboard() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/doctor/cancel-appointment"))
        .and(body_json(json!({"appointmentId": "A2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Appointment Cancelled"
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_reloads(&server).await;

    let notifier = Arc::new(RecordingNotifier::new());
    let store = store_for(&server, &notifier);
    store.cancel_appointment("A2").await;

    assert_eq!(
        notifier.take(),
        vec![Notification::success("Appointment Cancelled")]
    );
    assert!(store.appointments().get().is_loaded());
    assert!(store.dash_data().get().is_loaded());
}

#[tokio::test]
async fn test_write_without_message_reports_generic_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/doctor/complete-appointment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;
    mount_reloads(&server).await;

    let notifier = Arc::new(RecordingNotifier::new());
    let store = store_for(&server, &notifier);
    store.complete_appointment("A1").await;

    assert_eq!(notifier.take(), vec![Notification::success("Success")]);
}

#[tokio::test]
async fn test_failed_write_reports_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/doctor/cancel-appointment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
        .mount(&server)
        .await;

    let notifier = Arc::new(RecordingNotifier::new());
    let store = store_for(&server, &notifier);
    store.cancel_appointment("A1").await;

    assert_eq!(
        notifier.take(),
        vec![Notification::error("Failed to cancel appointment")]
    );
    assert_eq!(store.appointments().get(), Cached::Unloaded);
    assert_eq!(store.dash_data().get(), Cached::Unloaded);
}

#[tokio::test]
async fn test_profile_is_fetched_and_replaceable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/doctor/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "profileData": {
                "_id": "D1",
                "name": "Dr. Richard James",
                "fees": 50,
                "available": true,
                "address": {"line1": "17th Cross", "line2": "Richmond"}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = Arc::new(RecordingNotifier::new());
    let store = store_for(&server, &notifier);
    store.get_profile_data().await;

    let mut profile: ProfileData = store.profile_data().get().unwrap_or_default();
    assert_eq!(profile.address.line1, "17th Cross");

    let mut rx = store.profile_data().subscribe();
    profile.fees = 75.0;
    store.set_profile_data(profile.clone());

    assert!(rx.has_changed().unwrap());
    assert_eq!(store.profile_data().get(), Cached::Loaded(profile));
}

#[tokio::test]
async fn test_local_edit_outranks_in_flight_profile_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/doctor/profile"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "profileData": {"_id": "D1", "fees": 50}}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let notifier = Arc::new(RecordingNotifier::new());
    let store = store_for(&server, &notifier);
    let edited = ProfileData {
        id: "D1".to_string(),
        fees: 80.0,
        ..ProfileData::default()
    };

    tokio::join!(store.get_profile_data(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.set_profile_data(edited.clone());
    });

    assert_eq!(store.profile_data().get(), Cached::Loaded(edited));
}

#[tokio::test]
async fn test_store_from_settings_reads_credential_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/doctor/dashboard"))
        .and(header("dtoken", "persisted-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "dashData": {"earnings": 0}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let credentials_path = dir.path().join("credentials.json");
    std::fs::write(&credentials_path, r#"{"dToken": "persisted-token"}"#).unwrap();

    let settings = ClientSettings {
        backend_url: format!("{}/", server.uri()),
        credentials_path,
        request_timeout: Some(Duration::from_secs(5)),
    };
    let notifier = Arc::new(RecordingNotifier::new());
    let store = DoctorStore::from_settings(&settings, notifier.clone()).unwrap();

    assert_eq!(store.backend_url(), server.uri());
    assert_eq!(store.credential().get(), "persisted-token");

    store.get_dash_data().await;
    assert!(store.dash_data().get().is_loaded());
    assert!(notifier.notifications().is_empty());
}
