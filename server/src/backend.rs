use anyhow::Context;
use reqwest::{
    Client, Method, RequestBuilder, StatusCode, Url,
    multipart::{Form, Part},
};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::json;
use types::{
    Error, Result,
    models::{
        Appointment, CustomerPoints, Feedback, ServiceAvailability, ServiceCenter,
        ServiceCenterForm, User, UserForm,
    },
    upload::{Upload, UploadKind},
};
use uuid::Uuid;

use crate::{config::Config, session::LoginResponse};

const SESSION_EXPIRED: &str = "your session has expired";

trait ReqwestExt {
    async fn checked_send(self) -> Result<reqwest::Response>;
    async fn try_send<T: DeserializeOwned>(self) -> Result<T>;
    async fn send_empty(self) -> Result<()>;
}

impl ReqwestExt for RequestBuilder {
    async fn checked_send(self) -> Result<reqwest::Response> {
        let response = self.send().await.context("backend request failed")?;
        let status = response.status();
        let url = response.url().path().to_string();

        if status.is_success() {
            return Ok(response);
        }

        tracing::warn!(%status, path = %url, "backend returned an error");

        let body = response.text().await.unwrap_or_default();
        let message = backend_message(&body);

        Err(match status {
            StatusCode::UNAUTHORIZED => {
                Error::unauthorized(message.unwrap_or_else(|| SESSION_EXPIRED.to_string()))
            }
            StatusCode::FORBIDDEN => Error::forbidden(
                message.unwrap_or_else(|| "the backend refused this request".to_string()),
            ),
            _ => Error::with_status(
                message.unwrap_or_else(|| format!("backend error ({status})")),
                status.as_u16(),
            ),
        })
    }

    async fn try_send<T: DeserializeOwned>(self) -> Result<T> {
        let body = self
            .checked_send()
            .await?
            .bytes()
            .await
            .context("failed to read backend response")?;

        match serde_json::from_slice(&body) {
            Ok(r) => Ok(r),
            Err(error) => {
                // Bodies can carry personal data, keep them out of normal logs.
                tracing::debug!(?error, body = %String::from_utf8_lossy(&body), "failed to parse response");
                Err(anyhow::Error::from(error)
                    .context("unexpected response from backend")
                    .into())
            }
        }
    }

    async fn send_empty(self) -> Result<()> {
        self.checked_send().await?;
        Ok(())
    }
}

/// Pull `message` / `title` out of a JSON error body, if there is one.
fn backend_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "title", "error"]
        .iter()
        .find_map(|key| value.get(key)?.as_str().map(String::from))
}

/// Client for the service-center REST backend.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("failed to build HTTP client")?;

        // `Url::join` replaces the last segment unless the path ends in `/`
        let mut base_url = config.backend_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    fn request(&self, method: Method, path: &str, token: &SecretString) -> Result<RequestBuilder> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;

        Ok(self
            .client
            .request(method, url)
            .bearer_auth(token.expose_secret()))
    }

    fn get(&self, path: impl AsRef<str>, token: &SecretString) -> Result<RequestBuilder> {
        self.request(Method::GET, path.as_ref(), token)
    }

    fn post(&self, path: impl AsRef<str>, token: &SecretString) -> Result<RequestBuilder> {
        self.request(Method::POST, path.as_ref(), token)
    }

    fn put(&self, path: impl AsRef<str>, token: &SecretString) -> Result<RequestBuilder> {
        self.request(Method::PUT, path.as_ref(), token)
    }

    fn delete(&self, path: impl AsRef<str>, token: &SecretString) -> Result<RequestBuilder> {
        self.request(Method::DELETE, path.as_ref(), token)
    }

    pub async fn login(&self, email: &str, password: &SecretString) -> Result<LoginResponse> {
        let url = self.base_url.join("Auth/login")?;

        let result = self
            .client
            .post(url)
            .json(&json!({
                "email": email,
                "password": password.expose_secret(),
            }))
            .try_send()
            .await;

        // No session exists yet, so a bare 401 means bad credentials
        result.map_err(|error| match error.status {
            401 if error.message == SESSION_EXPIRED => {
                Error::unauthorized("invalid email or password")
            }
            _ => error,
        })
    }

    pub async fn list_users(&self, token: &SecretString) -> Result<Vec<User>> {
        self.get("/Admin", token)?.try_send().await
    }

    pub async fn get_user(&self, token: &SecretString, id: Uuid) -> Result<User> {
        self.get(format!("/Admin/{id}"), token)?.try_send().await
    }

    pub async fn create_user(&self, token: &SecretString, form: &UserForm) -> Result<User> {
        self.post("/Admin", token)?.json(form).try_send().await
    }

    pub async fn update_user(&self, token: &SecretString, id: Uuid, form: &UserForm) -> Result<()> {
        self.put(format!("/Admin/{id}"), token)?
            .json(form)
            .send_empty()
            .await
    }

    pub async fn delete_user(&self, token: &SecretString, id: Uuid) -> Result<()> {
        self.delete(format!("/Admin/{id}"), token)?
            .send_empty()
            .await
    }

    pub async fn list_service_centers(&self, token: &SecretString) -> Result<Vec<ServiceCenter>> {
        self.get("/ServiceCenter", token)?.try_send().await
    }

    pub async fn get_service_center(&self, token: &SecretString, id: Uuid) -> Result<ServiceCenter> {
        self.get(format!("/ServiceCenter/{id}"), token)?
            .try_send()
            .await
    }

    pub async fn register_service_center(
        &self,
        token: &SecretString,
        form: ServiceCenterForm,
    ) -> Result<ServiceCenter> {
        let multipart = registration_form(form)?;

        self.post("/ServiceCenter", token)?
            .multipart(multipart)
            .try_send()
            .await
    }

    pub async fn set_service_center_status(
        &self,
        token: &SecretString,
        id: Uuid,
        active: bool,
    ) -> Result<()> {
        self.put(format!("/ServiceCenter/{id}/status"), token)?
            .json(&json!({ "isActive": active }))
            .send_empty()
            .await
    }

    pub async fn list_appointments(&self, token: &SecretString, station: Uuid) -> Result<Vec<Appointment>> {
        self.get(format!("/Appointment/ServiceCenter/{station}"), token)?
            .try_send()
            .await
    }

    pub async fn list_feedback(&self, token: &SecretString, station: Uuid) -> Result<Vec<Feedback>> {
        self.get(format!("/Feedback/ServiceCenter/{station}"), token)?
            .try_send()
            .await
    }

    pub async fn list_loyalty(&self, token: &SecretString, station: Uuid) -> Result<Vec<CustomerPoints>> {
        self.get(format!("/Loyalty/ServiceCenter/{station}"), token)?
            .try_send()
            .await
    }

    pub async fn list_services(
        &self,
        token: &SecretString,
        station: Uuid,
    ) -> Result<Vec<ServiceAvailability>> {
        self.get(format!("/Service/ServiceCenter/{station}"), token)?
            .try_send()
            .await
    }

    pub async fn set_service_availability(
        &self,
        token: &SecretString,
        station: Uuid,
        service_id: Uuid,
        available: bool,
    ) -> Result<()> {
        self.put(format!("/Service/ServiceCenter/{station}/{service_id}"), token)?
            .json(&json!({ "available": available }))
            .send_empty()
            .await
    }
}

fn file_part(upload: Upload) -> Result<Part> {
    Ok(Part::bytes(upload.bytes)
        .file_name(upload.file_name)
        .mime_str(&upload.content_type)
        .context("invalid upload content type")?)
}

/// Build the multipart body for `POST /ServiceCenter`. Uploads are checked
/// again here since the browser's checks can be bypassed.
fn registration_form(form: ServiceCenterForm) -> Result<Form> {
    form.validate()?;

    let time = |t: Option<jiff::civil::Time>| {
        t.map(|t| t.strftime("%H:%M").to_string()).unwrap_or_default()
    };

    let mut multipart = Form::new()
        .text("name", form.name)
        .text("address", form.address)
        .text("ownerName", form.owner_name)
        .text("vatNumber", form.vat_number)
        .text("registrationNumber", form.registration_number)
        .text("contactNumber", form.contact_number)
        .text("email", form.email)
        .text("openingHours", time(form.opening_hours))
        .text("closingHours", time(form.closing_hours));

    if let Some(photo) = form.photo {
        photo.validate(UploadKind::Photo)?;
        multipart = multipart.part("photo", file_part(photo)?);
    }

    for document in form.documents {
        document.validate(UploadKind::Document)?;
        multipart = multipart.part("documents", file_part(document)?);
    }

    Ok(multipart)
}
