use dioxus::prelude::*;
use types::{
    CurrentUser,
    models::{
        Appointment, CustomerPoints, Feedback, ServiceAvailability, ServiceCenter, User,
        UserForm,
    },
};
use uuid::Uuid;

#[cfg(feature = "server")]
use types::Section;

/// Turn a console error into a server function error, keeping its status
/// code and cause chain for the error banner.
#[cfg(feature = "server")]
trait OrServerError<T> {
    fn or_server_error(self) -> ServerFnResult<T>;
}

#[cfg(feature = "server")]
impl<T> OrServerError<T> for types::Result<T> {
    fn or_server_error(self) -> ServerFnResult<T> {
        self.map_err(|error| ServerFnError::ServerError {
            message: error.message,
            code: error.status,
            details: Some(serde_json::json!({ "chain": error.chain })),
        })
    }
}

#[post("/api/current-user")]
pub async fn get_current_user() -> ServerFnResult<Option<CurrentUser>> {
    match server::get_session_from_cookie().await {
        Ok(session) => Ok(Some(session.user)),
        Err(_) => Ok(None),
    }
}

/// IANA zone the console renders timestamps in.
#[post("/api/display-timezone")]
pub async fn display_timezone() -> ServerFnResult<String> {
    let config = server::config::get().or_server_error()?;
    Ok(config.timezone.clone())
}

#[post("/api/users")]
pub async fn list_users() -> ServerFnResult<Vec<User>> {
    let session = server::require_section(Section::Users).await.or_server_error()?;
    server::backend()
        .or_server_error()?
        .list_users(&session.token)
        .await
        .or_server_error()
}

#[post("/api/users/get")]
pub async fn get_user(user_id: Uuid) -> ServerFnResult<User> {
    let session = server::require_section(Section::Users).await.or_server_error()?;
    server::backend()
        .or_server_error()?
        .get_user(&session.token, user_id)
        .await
        .or_server_error()
}

#[post("/api/users/create")]
pub async fn create_user(form: UserForm) -> ServerFnResult<User> {
    let session = server::require_section(Section::Users).await.or_server_error()?;
    form.validate(true).map_err(types::Error::from).or_server_error()?;

    let user = server::backend()
        .or_server_error()?
        .create_user(&session.token, &form)
        .await
        .or_server_error()?;

    tracing::info!(by = %session.user.user_id, user_id = %user.id, role = %user.role, "user created");
    Ok(user)
}

#[post("/api/users/update")]
pub async fn update_user(user_id: Uuid, form: UserForm) -> ServerFnResult<()> {
    let session = server::require_section(Section::Users).await.or_server_error()?;
    form.validate(false).map_err(types::Error::from).or_server_error()?;

    server::backend()
        .or_server_error()?
        .update_user(&session.token, user_id, &form)
        .await
        .or_server_error()?;

    tracing::info!(by = %session.user.user_id, %user_id, "user updated");
    Ok(())
}

#[post("/api/users/delete")]
pub async fn delete_user(user_id: Uuid) -> ServerFnResult<()> {
    let session = server::require_section(Section::Users).await.or_server_error()?;

    if session.user.user_id == user_id.to_string() {
        return Err(types::Error::bad_request("you cannot delete your own account"))
            .or_server_error();
    }

    server::backend()
        .or_server_error()?
        .delete_user(&session.token, user_id)
        .await
        .or_server_error()?;

    tracing::info!(by = %session.user.user_id, %user_id, "user deleted");
    Ok(())
}

#[post("/api/service-centers")]
pub async fn list_service_centers() -> ServerFnResult<Vec<ServiceCenter>> {
    let session = server::require_section(Section::ServiceCenters)
        .await
        .or_server_error()?;
    server::backend()
        .or_server_error()?
        .list_service_centers(&session.token)
        .await
        .or_server_error()
}

#[post("/api/service-centers/get")]
pub async fn get_service_center(id: Uuid) -> ServerFnResult<ServiceCenter> {
    let session = server::require_section(Section::ServiceCenters)
        .await
        .or_server_error()?;
    server::backend()
        .or_server_error()?
        .get_service_center(&session.token, id)
        .await
        .or_server_error()
}

#[post("/api/service-centers/status")]
pub async fn set_service_center_status(id: Uuid, active: bool) -> ServerFnResult<()> {
    let session = server::require_section(Section::ServiceCenters)
        .await
        .or_server_error()?;
    server::backend()
        .or_server_error()?
        .set_service_center_status(&session.token, id, active)
        .await
        .or_server_error()
}

#[post("/api/appointments")]
pub async fn list_appointments() -> ServerFnResult<Vec<Appointment>> {
    let session = server::require_section(Section::Appointments)
        .await
        .or_server_error()?;
    let station = session.station().or_server_error()?;
    server::backend()
        .or_server_error()?
        .list_appointments(&session.token, station)
        .await
        .or_server_error()
}

#[post("/api/feedback")]
pub async fn list_feedback() -> ServerFnResult<Vec<Feedback>> {
    let session = server::require_section(Section::Feedback)
        .await
        .or_server_error()?;
    let station = session.station().or_server_error()?;
    server::backend()
        .or_server_error()?
        .list_feedback(&session.token, station)
        .await
        .or_server_error()
}

#[post("/api/loyalty")]
pub async fn list_loyalty() -> ServerFnResult<Vec<CustomerPoints>> {
    let session = server::require_section(Section::Loyalty)
        .await
        .or_server_error()?;
    let station = session.station().or_server_error()?;
    server::backend()
        .or_server_error()?
        .list_loyalty(&session.token, station)
        .await
        .or_server_error()
}

#[post("/api/services")]
pub async fn list_services() -> ServerFnResult<Vec<ServiceAvailability>> {
    let session = server::require_section(Section::Services)
        .await
        .or_server_error()?;
    let station = session.station().or_server_error()?;
    server::backend()
        .or_server_error()?
        .list_services(&session.token, station)
        .await
        .or_server_error()
}

#[post("/api/services/availability")]
pub async fn set_service_availability(service_id: Uuid, available: bool) -> ServerFnResult<()> {
    let session = server::require_section(Section::Services)
        .await
        .or_server_error()?;
    let station = session.station().or_server_error()?;

    server::backend()
        .or_server_error()?
        .set_service_availability(&session.token, station, service_id, available)
        .await
        .or_server_error()?;

    tracing::info!(%station, %service_id, available, "service availability changed");
    Ok(())
}
