//! `POST /service-centers/register`: the registration form posts here as
//! `multipart/form-data` so photos and documents stream in at full size
//! instead of riding inside a server-function JSON body.

use axum::{
    Router,
    extract::{
        DefaultBodyLimit, Multipart, State,
        multipart::{Field, MultipartError},
    },
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    routing::post,
};
use jiff::civil::Time;
use types::{
    Error, Result, Section,
    models::{ServiceCenterForm, center_fields as fields},
    upload::{Upload, guess_content_type},
};
use uuid::Uuid;

use crate::{
    auth_routes::{RouteState, redirect_with_error},
    session::UserSession,
};

const FORM_PATH: &str = "/service-centers/new";

pub fn register_router(state: RouteState) -> Router {
    let limit = ServiceCenterForm::max_body_bytes() as usize;

    Router::new()
        .route(ServiceCenterForm::SUBMIT_PATH, post(register).layer(DefaultBodyLimit::max(limit)))
        .with_state(state)
}

async fn register(State(state): State<RouteState>, headers: HeaderMap, multipart: Multipart) -> Response {
    match register_inner(&state, &headers, multipart).await {
        Ok(center_id) => Redirect::to(&format!("/service-centers/{center_id}")).into_response(),
        Err(error) if error.is_unauthorized() => redirect_with_error("/login", &error.message),
        Err(error) => {
            tracing::warn!(%error, status = error.status, "service center registration failed");
            redirect_with_error(FORM_PATH, &error.message)
        }
    }
}

async fn register_inner(state: &RouteState, headers: &HeaderMap, multipart: Multipart) -> Result<Uuid> {
    let session = UserSession::from_headers(headers, &state.config.signing_secret)?;
    session.require(Section::ServiceCenters)?;

    let form = read_form(multipart).await?;
    let center = state
        .backend
        .register_service_center(&session.token, form)
        .await?;

    tracing::info!(by = %session.user.user_id, center_id = %center.id, "service center registered");
    Ok(center.id)
}

async fn read_form(mut multipart: Multipart) -> Result<ServiceCenterForm> {
    let mut form = ServiceCenterForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            fields::PHOTO => {
                if let Some(photo) = read_file(field).await? {
                    form.photo = Some(photo);
                }
            }
            fields::DOCUMENTS => form.documents.extend(read_file(field).await?),
            _ => {
                let value = field.text().await.map_err(multipart_error)?;
                set_text(&mut form, &name, value)?;
            }
        }
    }

    form.validate()?;
    Ok(form)
}

/// An untouched file input still sends a part, with an empty file name.
async fn read_file(field: Field<'_>) -> Result<Option<Upload>> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    if file_name.is_empty() {
        return Ok(None);
    }

    let content_type = field
        .content_type()
        .filter(|ct| !ct.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| guess_content_type(&file_name).to_string());
    let bytes = field.bytes().await.map_err(multipart_error)?;

    Ok(Some(Upload {
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    }))
}

fn set_text(form: &mut ServiceCenterForm, name: &str, value: String) -> Result<()> {
    match name {
        fields::NAME => form.name = value,
        fields::ADDRESS => form.address = value,
        fields::OWNER_NAME => form.owner_name = value,
        fields::VAT_NUMBER => form.vat_number = value,
        fields::REGISTRATION_NUMBER => form.registration_number = value,
        fields::CONTACT_NUMBER => form.contact_number = value,
        fields::EMAIL => form.email = value,
        fields::OPENING_HOURS => form.opening_hours = parse_time(&value)?,
        fields::CLOSING_HOURS => form.closing_hours = parse_time(&value)?,
        other => tracing::debug!(field = other, "ignoring unknown registration field"),
    }
    Ok(())
}

fn parse_time(value: &str) -> Result<Option<Time>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|e| Error::bad_request(format!("invalid time {value:?}: {e}")))
}

fn multipart_error(error: MultipartError) -> Error {
    Error::with_status(error.body_text(), error.status().as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::time;

    #[test]
    fn text_fields_use_backend_names() {
        let mut form = ServiceCenterForm::default();
        set_text(&mut form, "ownerName", "Sam Perera".into()).unwrap();
        set_text(&mut form, "openingHours", "08:30".into()).unwrap();
        set_text(&mut form, "closingHours", "".into()).unwrap();
        set_text(&mut form, "unexpected", "x".into()).unwrap();

        assert_eq!(form.owner_name, "Sam Perera");
        assert_eq!(form.opening_hours, Some(time(8, 30, 0, 0)));
        assert_eq!(form.closing_hours, None);
    }

    #[test]
    fn malformed_times_are_bad_requests() {
        let mut form = ServiceCenterForm::default();
        let error = set_text(&mut form, "openingHours", "half past eight".into()).unwrap_err();
        assert_eq!(error.status, 400);
    }
}
