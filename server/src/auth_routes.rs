use axum::{
    Form, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, header},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use cookie::Cookie;
use secrecy::SecretString;
use serde::Deserialize;
use types::Result;

use crate::{
    backend::BackendClient,
    config::Config,
    session::{self, UserSession},
};

/// Shared by the console's own axum routes.
#[derive(Clone)]
pub struct RouteState {
    pub config: &'static Config,
    pub backend: BackendClient,
}

pub fn auth_router(state: RouteState) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/home", get(home))
        .with_state(state)
}

#[derive(Deserialize)]
struct LoginForm {
    email: String,
    password: SecretString,
}

async fn login(State(state): State<RouteState>, Form(form): Form<LoginForm>) -> Response {
    let email = form.email.trim().to_string();

    match login_inner(&state, &email, &form.password).await {
        Ok(response) => response,
        Err(error) => {
            tracing::warn!(%email, %error, status = error.status, "login failed");
            redirect_with_error("/login", &error.message)
        }
    }
}

async fn login_inner(state: &RouteState, email: &str, password: &SecretString) -> Result<Response> {
    let response = state.backend.login(email, password).await?;
    let session = UserSession::from_login(response)?;

    tracing::info!(
        %email,
        role = %session.role(),
        station_id = ?session.user.station_id,
        "login succeeded"
    );

    let cookies = session.to_cookies(&state.config.signing_secret, state.config.secure_cookies)?;
    with_cookies(Redirect::to(session.dashboard_path()), cookies)
}

async fn logout(State(state): State<RouteState>, headers: HeaderMap) -> Response {
    if !same_origin(&headers) {
        tracing::warn!(origin = ?headers.get(header::ORIGIN), "ignoring cross-site logout");
        return Redirect::to("/login").into_response();
    }

    tracing::info!("logout");

    let cookies = session::clear_cookies(state.config.secure_cookies);
    with_cookies(Redirect::to("/login"), cookies)
        .unwrap_or_else(|_| Redirect::to("/login").into_response())
}

/// Send an existing session to its dashboard, anyone else to the login page.
async fn home(State(state): State<RouteState>, headers: HeaderMap) -> Redirect {
    match UserSession::from_headers(&headers, &state.config.signing_secret) {
        Ok(session) => Redirect::to(session.dashboard_path()),
        Err(_) => Redirect::to("/login"),
    }
}

/// Browsers send `Origin` on form posts; a request without one is not
/// cross-site.
fn same_origin(headers: &HeaderMap) -> bool {
    let Some(origin) = headers.get(header::ORIGIN) else {
        return true;
    };
    let host = headers.get(header::HOST).and_then(|v| v.to_str().ok());

    let origin_host = origin
        .to_str()
        .ok()
        .and_then(|o| url::Url::parse(o).ok())
        .and_then(|url| {
            let host = url.host_str()?.to_string();
            Some(match url.port() {
                Some(port) => format!("{host}:{port}"),
                None => host,
            })
        });

    origin_host.is_some() && origin_host.as_deref() == host
}

/// Redirect to `path` with the message in its `?error=` query. The router
/// percent-decodes queries but leaves `+` alone, so spaces go out as `%20`.
pub(crate) fn redirect_with_error(path: &str, message: &str) -> Response {
    let encoded = url::form_urlencoded::byte_serialize(message.as_bytes())
        .collect::<String>()
        .replace('+', "%20");
    Redirect::to(&format!("{path}?error={encoded}")).into_response()
}

fn with_cookies(redirect: Redirect, cookies: Vec<Cookie<'static>>) -> Result<Response> {
    let mut response = redirect.into_response();

    for cookie in cookies {
        let value = HeaderValue::from_str(&cookie.encoded().to_string())
            .map_err(|e| types::err!("invalid cookie {}: {e}", cookie.name()))?;
        response.headers_mut().append(header::SET_COOKIE, value);
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_errors_are_url_encoded() {
        let response = redirect_with_error("/login", "invalid email + password");
        let location = response.headers().get(header::LOCATION).unwrap();
        assert_eq!(location, "/login?error=invalid%20email%20%2B%20password");
    }

    #[test]
    fn logout_rejects_foreign_origins() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("console.example:8080"));
        assert!(same_origin(&headers));

        headers.insert(header::ORIGIN, HeaderValue::from_static("http://console.example:8080"));
        assert!(same_origin(&headers));

        headers.insert(header::ORIGIN, HeaderValue::from_static("https://evil.example"));
        assert!(!same_origin(&headers));

        headers.insert(header::ORIGIN, HeaderValue::from_static("null"));
        assert!(!same_origin(&headers));
    }

    #[test]
    fn sets_one_header_per_cookie() {
        let cookies = session::clear_cookies(false);
        let count = cookies.len();
        let response = with_cookies(Redirect::to("/login"), cookies).unwrap();
        assert_eq!(response.headers().get_all(header::SET_COOKIE).iter().count(), count);
    }
}
