//! End-to-end tests for the HTTP API over the in-memory backend

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use medigram::adapters::database::{BlobStore, DocumentStore};
use medigram::adapters::memory::MemoryStore;
use medigram::api::{api_router, AppContext};
use medigram::config::ServerConfig;
use medigram::core::aggregation::Pipeline;
use medigram::core::records::Records;
use medigram::domain::{BlobId, Collection, MedigramError, Result, StoreError};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::Document;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "medigram-test-boundary";
const AVATAR_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

fn app_over(store: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Router {
    let records = Records::new(store, blobs);
    api_router(AppContext::new(records), &ServerConfig::default())
}

fn app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (app_over(store.clone(), store.clone()), store)
}

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File(name, filename, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: image/jpeg\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::delete(uri).body(Body::empty()).unwrap()
}

fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::put(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn patient_parts<'a>(name: &'a str) -> Vec<Part<'a>> {
    vec![
        Part::Text("name", name),
        Part::Text("street", "1 Main Rd"),
        Part::Text("city", "Cape Town"),
        Part::Text("province", "Western Cape"),
        Part::Text("postalCode", "8001"),
    ]
}

fn physician_parts<'a>(name: &'a str) -> Vec<Part<'a>> {
    vec![
        Part::Text("name", name),
        Part::Text("specialization", "Cardiology"),
        Part::Text("licenseNumber", "MP-0042"),
        Part::Text("street", "9 Long St"),
        Part::Text("city", "Durban"),
        Part::Text("province", "KwaZulu-Natal"),
        Part::Text("postalCode", "4001"),
    ]
}

async fn create(app: &Router, uri: &str, parts: &[Part<'_>]) -> String {
    let (status, body) = send(app, multipart_request(uri, parts)).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
    body["id"].as_str().unwrap().to_string()
}

fn avatar_id(avatar_url: &str) -> &str {
    avatar_url.rsplit('/').next().unwrap()
}

#[tokio::test]
async fn test_create_and_fetch_patient() {
    let (app, store) = app();

    let id = create(&app, "/api/patients", &patient_parts("Jane Doe")).await;
    assert_eq!(id.len(), 24);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));

    let (status, patient) = send(&app, get(&format!("/api/patients/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patient["_id"], id);
    assert_eq!(patient["name"], "Jane Doe");
    assert_eq!(patient["address"]["street"], "1 Main Rd");
    assert_eq!(patient["address"]["postalCode"], "8001");
    assert_eq!(patient["requisitions"], json!([]));
    assert_eq!(patient["tests"], json!([]));
    assert!(patient["createdAt"].as_str().is_some());

    assert_eq!(store.count(Collection::Patients).await, 1);
    assert_eq!(store.count(Collection::Addresses).await, 1);
    assert_eq!(store.blob_count().await, 0);
}

#[tokio::test]
async fn test_patient_listing_includes_addresses() {
    let (app, _store) = app();
    create(&app, "/api/patients", &patient_parts("Jane Doe")).await;
    create(&app, "/api/patients", &patient_parts("John Roe")).await;

    let (status, patients) = send(&app, get("/api/patients")).await;
    assert_eq!(status, StatusCode::OK);
    let patients = patients.as_array().unwrap();
    assert_eq!(patients.len(), 2);
    assert_eq!(patients[0]["name"], "Jane Doe");
    assert_eq!(patients[1]["address"]["city"], "Cape Town");
}

#[tokio::test]
async fn test_missing_form_field_rejected() {
    let (app, store) = app();
    let parts = vec![Part::Text("name", "Jane Doe"), Part::Text("city", "Cape Town")];

    let (status, body) = send(&app, multipart_request("/api/patients", &parts)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "street is required");
    assert_eq!(store.count(Collection::Addresses).await, 0);
}

#[tokio::test]
async fn test_avatar_round_trip() {
    let (app, store) = app();
    let mut parts = patient_parts("Jane Doe");
    parts.push(Part::File("avatar", "jane.jpg", AVATAR_BYTES));

    let id = create(&app, "/api/patients", &parts).await;
    let (_, patient) = send(&app, get(&format!("/api/patients/{id}"))).await;
    let avatar_url = patient["avatarUrl"].as_str().unwrap().to_string();
    assert!(avatar_url.starts_with("/api/avatars/"));

    let blob = BlobId::parse(avatar_id(&avatar_url)).unwrap();
    assert_eq!(store.blob_filename(&blob).await.as_deref(), Some("jane.jpg"));

    let response = app.clone().oneshot(get(&avatar_url)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers().clone();
    assert_eq!(headers[header::CONTENT_TYPE], "image/jpeg");
    assert_eq!(
        headers[header::CACHE_CONTROL],
        "public, max-age=31536000, immutable"
    );
    assert_eq!(
        headers[header::CONTENT_LENGTH],
        AVATAR_BYTES.len().to_string().as_str()
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(bytes.as_ref(), AVATAR_BYTES);
}

#[tokio::test]
async fn test_empty_avatar_part_is_ignored() {
    let (app, store) = app();
    let mut parts = patient_parts("Jane Doe");
    parts.push(Part::File("avatar", "", b""));

    let id = create(&app, "/api/patients", &parts).await;
    let (_, patient) = send(&app, get(&format!("/api/patients/{id}"))).await;
    assert!(patient["avatarUrl"].is_null());
    assert_eq!(store.blob_count().await, 0);
}

#[tokio::test]
async fn test_unknown_avatar_is_not_found() {
    let (app, _store) = app();

    for uri in [
        format!("/api/avatars/{}", ObjectId::new().to_hex()),
        "/api/avatars/not-an-id".to_string(),
    ] {
        let (status, body) = send(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Avatar not found");
    }
}

#[tokio::test]
async fn test_delete_patient_cascades() {
    let (app, store) = app();
    let mut parts = patient_parts("Jane Doe");
    parts.push(Part::File("avatar", "jane.jpg", AVATAR_BYTES));
    let id = create(&app, "/api/patients", &parts).await;
    let (_, patient) = send(&app, get(&format!("/api/patients/{id}"))).await;
    let avatar_url = patient["avatarUrl"].as_str().unwrap().to_string();

    let (status, body) = send(&app, delete(&format!("/api/patients?id={id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Patient deleted successfully");

    assert_eq!(store.count(Collection::Patients).await, 0);
    assert_eq!(store.count(Collection::Addresses).await, 0);
    assert_eq!(store.blob_count().await, 0);

    let (status, body) = send(&app, get(&format!("/api/patients/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Patient not found");
    let (status, _) = send(&app, get(&avatar_url)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_succeeds_when_avatar_already_gone() {
    let (app, store) = app();
    let mut parts = patient_parts("Jane Doe");
    parts.push(Part::File("avatar", "jane.jpg", AVATAR_BYTES));
    let id = create(&app, "/api/patients", &parts).await;

    let (_, patient) = send(&app, get(&format!("/api/patients/{id}"))).await;
    let blob = BlobId::parse(avatar_id(patient["avatarUrl"].as_str().unwrap())).unwrap();
    BlobStore::delete(store.as_ref(), &blob).await.unwrap();

    let (status, _) = send(&app, delete(&format!("/api/patients/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.count(Collection::Patients).await, 0);
    assert_eq!(store.count(Collection::Addresses).await, 0);
}

#[tokio::test]
async fn test_delete_patient_id_errors() {
    let (app, _store) = app();

    let (status, body) = send(&app, delete("/api/patients")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Patient ID is required");

    let (status, body) = send(&app, delete("/api/patients?id=123")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid patient ID");

    let unknown = ObjectId::new().to_hex();
    let (status, body) = send(&app, delete(&format!("/api/patients?id={unknown}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Patient not found");

    let (status, body) = send(&app, delete("/api/physicians?id=")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Physician ID is required");
}

#[tokio::test]
async fn test_requisition_joins_patient_and_physician() {
    let (app, store) = app();
    let patient_id = create(&app, "/api/patients", &patient_parts("Jane Doe")).await;
    let physician_id = create(&app, "/api/physicians", &physician_parts("Dr Grey")).await;

    let parts = vec![
        Part::Text("patientId", &patient_id),
        Part::Text("physicianId", &physician_id),
        Part::Text("testNames[1]", "Lipid Panel"),
        Part::Text("testNames[0]", "CBC"),
        Part::Text("samples[0]", "S-001"),
    ];
    let requisition_id = create(&app, "/api/requisitions", &parts).await;
    assert_eq!(store.count(Collection::Requisitions).await, 1);
    assert_eq!(store.count(Collection::Tests).await, 2);

    let (_, patient) = send(&app, get(&format!("/api/patients/{patient_id}"))).await;
    let requisitions = patient["requisitions"].as_array().unwrap();
    assert_eq!(requisitions.len(), 1);
    assert_eq!(requisitions[0]["_id"], requisition_id);
    assert_eq!(requisitions[0]["status"], "Pending");
    assert_eq!(requisitions[0]["samples"], json!(["S-001"]));
    assert_eq!(requisitions[0]["physician"]["name"], "Dr Grey");
    assert!(patient.get("physicianDetails").is_none());

    let tests = patient["tests"].as_array().unwrap();
    let names: Vec<&str> = tests.iter().filter_map(|t| t["name"].as_str()).collect();
    assert_eq!(names, vec!["CBC", "Lipid Panel"]);

    let (_, physician) = send(&app, get(&format!("/api/physicians/{physician_id}"))).await;
    assert_eq!(physician["address"]["city"], "Durban");
    assert_eq!(physician["requisitions"][0]["patient"]["name"], "Jane Doe");
    assert!(physician.get("patientDetails").is_none());

    let (_, physicians) = send(&app, get("/api/physicians")).await;
    assert_eq!(physicians[0]["requisitions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_requisitions_embed_their_own_physician() {
    let (app, _store) = app();
    let patient_id = create(&app, "/api/patients", &patient_parts("Jane Doe")).await;
    let first = create(&app, "/api/physicians", &physician_parts("Dr Grey")).await;
    let second = create(&app, "/api/physicians", &physician_parts("Dr Grey")).await;

    for (physician_id, sample) in [(&first, "S-001"), (&second, "S-002")] {
        let parts = vec![
            Part::Text("patientId", &patient_id),
            Part::Text("physicianId", physician_id),
            Part::Text("testNames[0]", "CBC"),
            Part::Text("samples[0]", sample),
        ];
        create(&app, "/api/requisitions", &parts).await;
    }

    let (_, patient) = send(&app, get(&format!("/api/patients/{patient_id}"))).await;
    let requisitions = patient["requisitions"].as_array().unwrap();
    assert_eq!(requisitions.len(), 2);
    for requisition in requisitions {
        assert_eq!(requisition["physician"]["_id"], requisition["physicianId"]);
    }

    let embedded: Vec<&str> = requisitions
        .iter()
        .filter_map(|r| r["physician"]["_id"].as_str())
        .collect();
    assert!(embedded.contains(&first.as_str()));
    assert!(embedded.contains(&second.as_str()));
}

#[tokio::test]
async fn test_requisition_input_errors() {
    let (app, store) = app();
    let patient_id = create(&app, "/api/patients", &patient_parts("Jane Doe")).await;
    let physician_id = create(&app, "/api/physicians", &physician_parts("Dr Grey")).await;
    let unknown = ObjectId::new().to_hex();

    let no_samples = vec![
        Part::Text("patientId", &patient_id),
        Part::Text("physicianId", &physician_id),
        Part::Text("testNames[0]", "CBC"),
    ];
    let (status, body) = send(&app, multipart_request("/api/requisitions", &no_samples)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields or empty arrays");

    let no_tests = vec![
        Part::Text("patientId", &patient_id),
        Part::Text("physicianId", &physician_id),
        Part::Text("samples[0]", "S-001"),
    ];
    let (status, body) = send(&app, multipart_request("/api/requisitions", &no_tests)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields or empty arrays");

    let no_patient = vec![
        Part::Text("physicianId", &physician_id),
        Part::Text("testNames[0]", "CBC"),
        Part::Text("samples[0]", "S-001"),
    ];
    let (status, body) = send(&app, multipart_request("/api/requisitions", &no_patient)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields or empty arrays");

    let bad_patient = vec![
        Part::Text("patientId", "bogus"),
        Part::Text("physicianId", &physician_id),
        Part::Text("testNames[0]", "CBC"),
        Part::Text("samples[0]", "S-001"),
    ];
    let (status, body) = send(&app, multipart_request("/api/requisitions", &bad_patient)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid patient ID");

    let unknown_physician = vec![
        Part::Text("patientId", &patient_id),
        Part::Text("physicianId", &unknown),
        Part::Text("testNames[0]", "CBC"),
        Part::Text("samples[0]", "S-001"),
    ];
    let (status, body) =
        send(&app, multipart_request("/api/requisitions", &unknown_physician)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Physician not found");

    let unknown_patient = vec![
        Part::Text("patientId", &unknown),
        Part::Text("physicianId", &physician_id),
        Part::Text("testNames[0]", "CBC"),
        Part::Text("samples[0]", "S-001"),
    ];
    let (status, body) =
        send(&app, multipart_request("/api/requisitions", &unknown_patient)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Patient not found");

    assert_eq!(store.count(Collection::Requisitions).await, 0);
    assert_eq!(store.count(Collection::Tests).await, 0);
}

#[tokio::test]
async fn test_update_physician() {
    let (app, _store) = app();
    let id = create(&app, "/api/physicians", &physician_parts("Dr Grey")).await;
    let uri = format!("/api/physicians/{id}");

    let (status, body) = send(&app, put_json(&uri, json!({ "specialization": "Neurology" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Physician updated successfully");

    let (_, physician) = send(&app, get(&uri)).await;
    assert_eq!(physician["specialization"], "Neurology");
    assert_eq!(physician["licenseNumber"], "MP-0042");

    let (status, _) = send(&app, put_json(&uri, json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, put_json(&uri, json!({ "name": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, put_json(&uri, json!({ "addressId": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let unknown = format!("/api/physicians/{}", ObjectId::new().to_hex());
    let (status, body) = send(&app, put_json(&unknown, json!({ "name": "Dr Who" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Physician not found");
}

#[tokio::test]
async fn test_delete_physician_by_path() {
    let (app, store) = app();
    let id = create(&app, "/api/physicians", &physician_parts("Dr Grey")).await;

    let (status, body) = send(&app, delete(&format!("/api/physicians/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Physician deleted successfully");
    assert_eq!(store.count(Collection::Physicians).await, 0);
    assert_eq!(store.count(Collection::Addresses).await, 0);
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let (app, _store) = app();
    let (status, body) = send(&app, get("/api/unknown")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_health_reports_database() {
    let (app, _store) = app();
    let (status, body) = send(&app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "memory");
}

/// Memory store whose inserts into one collection always fail
struct FailingInserts {
    inner: Arc<MemoryStore>,
    fail_on: Collection,
}

#[async_trait]
impl DocumentStore for FailingInserts {
    async fn test_connection(&self) -> Result<()> {
        self.inner.test_connection().await
    }

    async fn insert_one(&self, collection: Collection, document: Document) -> Result<ObjectId> {
        if collection == self.fail_on {
            return Err(MedigramError::Store(StoreError::InsertFailed {
                collection: collection.name(),
                message: "simulated outage".to_string(),
            }));
        }
        self.inner.insert_one(collection, document).await
    }

    async fn find_by_id(&self, collection: Collection, id: &ObjectId) -> Result<Option<Document>> {
        self.inner.find_by_id(collection, id).await
    }

    async fn update_by_id(
        &self,
        collection: Collection,
        id: &ObjectId,
        changes: Document,
    ) -> Result<bool> {
        self.inner.update_by_id(collection, id, changes).await
    }

    async fn delete_by_id(&self, collection: Collection, id: &ObjectId) -> Result<bool> {
        self.inner.delete_by_id(collection, id).await
    }

    async fn aggregate(&self, pipeline: &Pipeline) -> Result<Vec<Document>> {
        self.inner.aggregate(pipeline).await
    }

    fn database_name(&self) -> &str {
        self.inner.database_name()
    }
}

#[tokio::test]
async fn test_failed_patient_insert_rolls_back_address_and_avatar() {
    let memory = Arc::new(MemoryStore::new());
    let failing = Arc::new(FailingInserts {
        inner: memory.clone(),
        fail_on: Collection::Patients,
    });
    let app = app_over(failing, memory.clone());

    let mut parts = patient_parts("Jane Doe");
    parts.push(Part::File("avatar", "jane.jpg", AVATAR_BYTES));
    let (status, body) = send(&app, multipart_request("/api/patients", &parts)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal Server Error");
    assert!(body["details"].as_str().unwrap().contains("simulated outage"));
    assert_eq!(memory.count(Collection::Addresses).await, 0);
    assert_eq!(memory.blob_count().await, 0);
}

#[tokio::test]
async fn test_failed_test_insert_rolls_back_requisition() {
    let memory = Arc::new(MemoryStore::new());
    let healthy = app_over(memory.clone(), memory.clone());
    let patient_id = create(&healthy, "/api/patients", &patient_parts("Jane Doe")).await;
    let physician_id = create(&healthy, "/api/physicians", &physician_parts("Dr Grey")).await;

    let failing = Arc::new(FailingInserts {
        inner: memory.clone(),
        fail_on: Collection::Tests,
    });
    let app = app_over(failing, memory.clone());

    let parts = vec![
        Part::Text("patientId", &patient_id),
        Part::Text("physicianId", &physician_id),
        Part::Text("testNames[0]", "CBC"),
        Part::Text("samples[0]", "S-001"),
    ];
    let (status, _) = send(&app, multipart_request("/api/requisitions", &parts)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(memory.count(Collection::Requisitions).await, 0);
    assert_eq!(memory.count(Collection::Tests).await, 0);
}
