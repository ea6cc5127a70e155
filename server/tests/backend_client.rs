use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use reqwest::multipart::{Form, Part};
use secrecy::SecretString;
use serde_json::{Value, json};
use server::{BackendClient, UserSession, config::Config};
use types::{
    CurrentUser, Role,
    models::{ServiceCenterForm, center_fields},
    upload::UploadKind,
};
use url::Url;
use uuid::Uuid;

const TOKEN: &str = "good-token";
const SECRET: &str = "0123456789abcdef0123456789abcdef";
const STATION: Uuid = Uuid::from_u128(0x5eed);
const NEW_CENTER: Uuid = Uuid::from_u128(0xce);

/// Multipart parts the fake backend received, as (field name, byte length).
type Received = Arc<Mutex<Vec<(String, usize)>>>;

struct FakeBackend {
    url: Url,
    received: Received,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(format!("Bearer {TOKEN}").as_str())
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["email"] == "quiet@example.com" {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if body["password"] != "correct horse" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid email or password" })),
        )
            .into_response();
    }

    Json(json!({
        "token": TOKEN,
        "userId": "42",
        "role": "Cashier",
        "roleId": 4,
        "stationId": STATION,
        "serviceCenterName": "Colombo North",
    }))
    .into_response()
}

async fn users(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    Json(json!([{
        "id": Uuid::from_u128(1),
        "firstName": "Nimal",
        "lastName": "Perera",
        "email": "nimal@example.com",
        "role": "Admin",
    }]))
    .into_response()
}

async fn service_centers() -> &'static str {
    "<html>maintenance</html>"
}

async fn register_center(
    State(received): State<Received>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let len = field.bytes().await.unwrap().len();
        parts.push((name, len));
    }
    received.lock().unwrap().extend(parts);

    Json(json!({
        "id": NEW_CENTER,
        "name": "Downtown Auto",
        "address": "12 Main St",
        "ownerName": "Sam Perera",
        "vatNumber": "VAT-123",
        "registrationNumber": "REG-9",
        "contactNumber": "+94 11 234 5678",
        "email": "ops@downtown.example",
        "openingHours": "08:00:00",
        "closingHours": "18:00:00",
        "isActive": true,
    }))
    .into_response()
}

async fn set_availability(Path((station, _service)): Path<(Uuid, Uuid)>) -> Response {
    if station != STATION {
        return StatusCode::FORBIDDEN.into_response();
    }
    (
        StatusCode::CONFLICT,
        Json(json!({ "title": "Service is locked" })),
    )
        .into_response()
}

async fn serve(app: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/").parse().unwrap()
}

/// Serve a fake backend under `/api` on an ephemeral port.
async fn spawn_backend() -> FakeBackend {
    let received = Received::default();
    let routes = Router::new()
        .route("/Auth/login", post(login))
        .route("/Admin", get(users))
        .route(
            "/ServiceCenter",
            get(service_centers)
                .post(register_center)
                .layer(DefaultBodyLimit::disable()),
        )
        .route("/Service/ServiceCenter/{station}/{service}", put(set_availability))
        .with_state(received.clone());
    let app = Router::new().nest("/api", routes);

    let url = serve(app).await.join("api").unwrap();
    FakeBackend { url, received }
}

fn config(backend_url: Url) -> Config {
    Config {
        backend_url,
        signing_secret: SecretString::from(SECRET),
        secure_cookies: false,
        request_timeout_secs: 5,
        timezone: "UTC".to_string(),
    }
}

fn client(backend_url: Url) -> BackendClient {
    BackendClient::new(&config(backend_url)).unwrap()
}

/// Serve the console's own routes in front of `backend_url`.
async fn spawn_console(backend_url: Url) -> Url {
    let config: &'static Config = Box::leak(Box::new(config(backend_url)));
    let backend = BackendClient::new(config).unwrap();
    serve(server::routes(config, backend)).await
}

fn token() -> SecretString {
    SecretString::from(TOKEN)
}

fn cookie_header(role: Role) -> String {
    let session = UserSession::new(
        CurrentUser {
            user_id: "7".into(),
            role,
            station_id: role.is_station_scoped().then_some(STATION),
            service_center_name: None,
        },
        token(),
    )
    .unwrap();

    session
        .to_cookies(&SecretString::from(SECRET), false)
        .unwrap()
        .iter()
        .map(|c| c.encoded().stripped().to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

fn registration(photo: Vec<u8>) -> Form {
    let document = Part::bytes(vec![1u8; 2048])
        .file_name("certificate.pdf")
        .mime_str("application/pdf")
        .unwrap();
    let photo = Part::bytes(photo)
        .file_name("front.png")
        .mime_str("image/png")
        .unwrap();

    Form::new()
        .text(center_fields::NAME, "Downtown Auto")
        .text(center_fields::ADDRESS, "12 Main St")
        .text(center_fields::OWNER_NAME, "Sam Perera")
        .text(center_fields::VAT_NUMBER, "VAT-123")
        .text(center_fields::REGISTRATION_NUMBER, "REG-9")
        .text(center_fields::CONTACT_NUMBER, "+94 11 234 5678")
        .text(center_fields::EMAIL, "ops@downtown.example")
        .text(center_fields::OPENING_HOURS, "08:00")
        .text(center_fields::CLOSING_HOURS, "18:00")
        .part(center_fields::PHOTO, photo)
        .part(center_fields::DOCUMENTS, document)
}

async fn submit(console: &Url, cookies: Option<String>, form: Form) -> reqwest::Response {
    let browser = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();
    let url = console
        .join(ServiceCenterForm::SUBMIT_PATH.trim_start_matches('/'))
        .unwrap();

    let mut request = browser.post(url).multipart(form);
    if let Some(cookies) = cookies {
        request = request.header(header::COOKIE, cookies);
    }
    request.send().await.unwrap()
}

fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn login_yields_a_station_scoped_session() {
    let backend = client(spawn_backend().await.url);

    let response = backend
        .login("cashier@example.com", &SecretString::from("correct horse"))
        .await
        .unwrap();
    let session = UserSession::from_login(response).unwrap();

    assert_eq!(session.role(), Role::Cashier);
    assert_eq!(session.station().unwrap(), STATION);
    assert_eq!(session.dashboard_path(), "/cashier/dashboard");
}

#[tokio::test]
async fn wrong_password_reports_the_backend_message() {
    let backend = client(spawn_backend().await.url);

    let error = backend
        .login("cashier@example.com", &SecretString::from("wrong"))
        .await
        .unwrap_err();

    assert_eq!(error.status, 401);
    assert_eq!(error.message, "Invalid email or password");
}

#[tokio::test]
async fn bare_login_rejection_is_not_an_expired_session() {
    let backend = client(spawn_backend().await.url);

    let error = backend
        .login("quiet@example.com", &SecretString::from("anything"))
        .await
        .unwrap_err();

    assert_eq!(error.status, 401);
    assert_eq!(error.message, "invalid email or password");
}

#[tokio::test]
async fn requests_carry_the_bearer_token() {
    let backend = client(spawn_backend().await.url);

    let users = backend.list_users(&token()).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].full_name(), "Nimal Perera");
    assert_eq!(users[0].role, Role::Admin);

    let error = backend
        .list_users(&SecretString::from("stale"))
        .await
        .unwrap_err();
    assert!(error.is_unauthorized());
    assert_eq!(error.message, "your session has expired");
}

#[tokio::test]
async fn unparseable_bodies_keep_their_cause_chain() {
    let backend = client(spawn_backend().await.url);

    let error = backend.list_service_centers(&token()).await.unwrap_err();

    assert_eq!(error.status, 500);
    assert_eq!(error.message, "unexpected response from backend");
    assert!(error.chain.len() > 1, "{:?}", error.chain);
}

#[tokio::test]
async fn error_titles_are_used_when_there_is_no_message() {
    let backend = client(spawn_backend().await.url);

    let error = backend
        .set_service_availability(&token(), STATION, Uuid::from_u128(7), false)
        .await
        .unwrap_err();
    assert_eq!(error.status, 409);
    assert_eq!(error.message, "Service is locked");

    let error = backend
        .set_service_availability(&token(), Uuid::from_u128(8), Uuid::from_u128(7), false)
        .await
        .unwrap_err();
    assert_eq!(error.status, 403);
}

#[tokio::test]
async fn registration_accepts_a_photo_at_the_size_ceiling() {
    let fake = spawn_backend().await;
    let console = spawn_console(fake.url.clone()).await;
    let photo = vec![0u8; UploadKind::Photo.max_bytes() as usize];

    let response = submit(&console, Some(cookie_header(Role::Admin)), registration(photo)).await;

    assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/service-centers/{NEW_CENTER}"));

    let received = fake.received.lock().unwrap().clone();
    assert!(received.contains(&("photo".to_string(), 3 * 1024 * 1024)), "{received:?}");
    assert!(received.contains(&("documents".to_string(), 2048)), "{received:?}");
    assert!(received.contains(&("ownerName".to_string(), "Sam Perera".len())));
}

#[tokio::test]
async fn oversized_photos_go_back_to_the_form() {
    let fake = spawn_backend().await;
    let console = spawn_console(fake.url.clone()).await;
    let photo = vec![0u8; UploadKind::Photo.max_bytes() as usize + 1];

    let response = submit(&console, Some(cookie_header(Role::Admin)), registration(photo)).await;

    assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/service-centers/new?error="));
    assert!(fake.received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn registration_needs_a_permitted_session() {
    let fake = spawn_backend().await;
    let console = spawn_console(fake.url.clone()).await;

    let response = submit(&console, None, registration(vec![0u8; 16])).await;
    assert_eq!(location(&response), "/login?error=not%20signed%20in");

    let response = submit(&console, Some(cookie_header(Role::Cashier)), registration(vec![0u8; 16])).await;
    assert!(location(&response).starts_with("/service-centers/new?error=access%20denied"));

    assert!(fake.received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn logout_only_answers_posts() {
    let console = spawn_console(spawn_backend().await.url).await;
    let browser = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();
    let url = console.join("auth/logout").unwrap();

    let response = browser.get(url.clone()).send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);

    let response = browser.post(url).send().await.unwrap();
    assert_eq!(location(&response), "/login");
    assert!(response.headers().get_all(header::SET_COOKIE).iter().count() > 1);
}
