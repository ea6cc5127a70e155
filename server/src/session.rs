//! Cookie-backed session.
//!
//! The backend's login response is spread over the plain flag cookies
//! (`userId`, `userRole`, ...) plus an `HttpOnly` `token` cookie. A
//! `session_sig` cookie carries an HMAC over all of them so a flag edited in
//! the browser invalidates the whole session.

use std::collections::HashMap;

use axum::http::{HeaderMap, header};
use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};
use cookie::{Cookie, SameSite};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::Sha256;
use types::{CurrentUser, Error, Result, Role, Section, err, session::cookie_keys};
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Body of the backend's `POST /Auth/login` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: SecretString,
    pub user_id: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub role_id: Option<serde_json::Value>,
    #[serde(default)]
    pub station_id: Option<Uuid>,
    #[serde(default)]
    pub service_center_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UserSession {
    pub user: CurrentUser,
    pub token: SecretString,
}

impl UserSession {
    pub fn from_login(response: LoginResponse) -> Result<Self> {
        // Some backends send the role id as a number, others as a string.
        let role_id = response.role_id.map(|id| match id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        });

        let role = Role::resolve(response.role.as_deref(), role_id.as_deref())?;

        Self::new(
            CurrentUser {
                user_id: response.user_id,
                role,
                station_id: response.station_id,
                service_center_name: response.service_center_name,
            },
            response.token,
        )
    }

    pub fn new(user: CurrentUser, token: SecretString) -> Result<Self> {
        let station = user.station_id.map(|id| id.to_string());
        types::dashboard_path(Some(user.role.name()), None, station.as_deref())?;
        Ok(Self { user, token })
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    /// Station the session is bound to. Station-scoped endpoints never take
    /// the station from the request.
    pub fn station(&self) -> Result<Uuid> {
        self.user
            .station_id
            .ok_or_else(|| Error::forbidden("no service center is assigned to this account"))
    }

    /// Fail with 403 unless the role may use `section`.
    pub fn require(&self, section: Section) -> Result<()> {
        if self.user.can_access(section) {
            return Ok(());
        }

        tracing::warn!(
            user_id = %self.user.user_id,
            role = %self.role(),
            ?section,
            "access denied"
        );
        Err(Error::forbidden(format!(
            "access denied: the {} role cannot use {}",
            self.role().label(),
            section.title()
        )))
    }

    pub fn dashboard_path(&self) -> &'static str {
        self.user.role.dashboard_path()
    }

    fn flag_values(&self) -> [(&'static str, String); 5] {
        [
            (cookie_keys::USER_ID, self.user.user_id.clone()),
            (cookie_keys::USER_ROLE, self.user.role.name().to_string()),
            (cookie_keys::USER_ROLE_ID, self.user.role.id().to_string()),
            (
                cookie_keys::STATION_ID,
                self.user
                    .station_id
                    .map(|id| id.to_string())
                    .unwrap_or_default(),
            ),
            (
                cookie_keys::SERVICE_CENTER_NAME,
                self.user.service_center_name.clone().unwrap_or_default(),
            ),
        ]
    }

    /// Every cookie needed to persist this session in the browser.
    pub fn to_cookies(&self, secret: &SecretString, secure: bool) -> Result<Vec<Cookie<'static>>> {
        let flags = self.flag_values();
        let token = self.token.expose_secret().to_string();
        let signature = sign(secret, &signed_fields(&flags, &token))?;

        let mut cookies: Vec<_> = flags
            .into_iter()
            .map(|(name, value)| base_cookie(name, value, secure).build())
            .collect();

        cookies.push(base_cookie(cookie_keys::TOKEN, token, secure).http_only(true).build());
        cookies.push(
            base_cookie(cookie_keys::SIGNATURE, signature, secure)
                .http_only(true)
                .build(),
        );

        Ok(cookies)
    }

    /// Read the session from a request's `Cookie:` header.
    pub fn from_headers(headers: &HeaderMap, secret: &SecretString) -> Result<Self> {
        let cookie_header = headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| Error::unauthorized("not signed in"))?;

        Self::from_cookies(&parse_cookie_header(cookie_header), secret).inspect_err(|error| {
            tracing::debug!(%error, "rejected session cookie");
        })
    }

    /// Rebuild and verify a session from the request's cookies.
    pub fn from_cookies(cookies: &HashMap<String, String>, secret: &SecretString) -> Result<Self> {
        let get = |name: &str| cookies.get(name).map(String::as_str);

        let token = get(cookie_keys::TOKEN)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::unauthorized("not signed in"))?;
        let signature = get(cookie_keys::SIGNATURE)
            .ok_or_else(|| Error::unauthorized("session signature missing"))?;

        let flags = [
            cookie_keys::USER_ID,
            cookie_keys::USER_ROLE,
            cookie_keys::USER_ROLE_ID,
            cookie_keys::STATION_ID,
            cookie_keys::SERVICE_CENTER_NAME,
        ]
        .map(|name| (name, get(name).unwrap_or_default().to_string()));

        verify(secret, &signed_fields(&flags, token), signature)
            .map_err(|_| Error::unauthorized("session signature is invalid"))?;

        let role = Role::resolve(get(cookie_keys::USER_ROLE), get(cookie_keys::USER_ROLE_ID))?;
        let station_id = match get(cookie_keys::STATION_ID).filter(|s| !s.is_empty()) {
            Some(id) => Some(Uuid::parse_str(id)?),
            None => None,
        };

        Self::new(
            CurrentUser {
                user_id: get(cookie_keys::USER_ID).unwrap_or_default().to_string(),
                role,
                station_id,
                service_center_name: get(cookie_keys::SERVICE_CENTER_NAME)
                    .filter(|s| !s.is_empty())
                    .map(String::from),
            },
            token.to_string().into(),
        )
    }
}

fn base_cookie(
    name: &'static str,
    value: String,
    secure: bool,
) -> cookie::CookieBuilder<'static> {
    Cookie::build((name, value))
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure)
}

/// Expired copies of every session cookie.
pub fn clear_cookies(secure: bool) -> Vec<Cookie<'static>> {
    cookie_keys::ALL
        .into_iter()
        .map(|name| {
            base_cookie(name, String::new(), secure)
                .max_age(cookie::time::Duration::ZERO)
                .build()
        })
        .collect()
}

/// Parse a `Cookie:` request header into name/value pairs.
pub fn parse_cookie_header(header: &str) -> HashMap<String, String> {
    Cookie::split_parse_encoded(header.to_string())
        .filter_map(|c| c.ok())
        .map(|c| (c.name().to_string(), c.value().to_string()))
        .collect()
}

fn signed_fields(flags: &[(&'static str, String)], token: &str) -> String {
    let mut fields: Vec<&str> = flags.iter().map(|(_, value)| value.as_str()).collect();
    fields.push(token);
    fields.join("\u{1f}")
}

fn sign(secret: &SecretString, payload: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .map_err(|e| err!("invalid signing key: {e}"))?;
    mac.update(payload.as_bytes());
    Ok(BASE64_URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
}

fn verify(secret: &SecretString, payload: &str, signature_b64: &str) -> Result<()> {
    let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .map_err(|e| err!("invalid signing key: {e}"))?;
    mac.update(payload.as_bytes());

    let signature = BASE64_URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|e| err!("malformed signature: {e}"))?;

    mac.verify_slice(&signature)
        .map_err(|_| err!("signature mismatch"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> SecretString {
        "0123456789abcdef0123456789abcdef".into()
    }

    fn station_session() -> UserSession {
        UserSession::new(
            CurrentUser {
                user_id: "42".into(),
                role: Role::Cashier,
                station_id: Some(Uuid::from_u128(7)),
                service_center_name: Some("Lake Road; Auto Care".into()),
            },
            "backend-token".into(),
        )
        .unwrap()
    }

    fn jar(cookies: &[Cookie<'static>]) -> HashMap<String, String> {
        let header = cookies
            .iter()
            .map(|c| c.encoded().stripped().to_string())
            .collect::<Vec<_>>()
            .join("; ");
        parse_cookie_header(&header)
    }

    #[test]
    fn round_trips_through_cookies() {
        let session = station_session();
        let cookies = session.to_cookies(&secret(), true).unwrap();
        let restored = UserSession::from_cookies(&jar(&cookies), &secret()).unwrap();

        assert_eq!(restored.user, session.user);
        assert_eq!(restored.token.expose_secret(), "backend-token");
        assert_eq!(restored.dashboard_path(), "/cashier/dashboard");
    }

    #[test]
    fn token_and_signature_are_http_only() {
        let cookies = station_session().to_cookies(&secret(), true).unwrap();
        for cookie in &cookies {
            let expected = matches!(cookie.name(), "token" | "session_sig");
            assert_eq!(cookie.http_only().unwrap_or(false), expected, "{}", cookie.name());
            assert_eq!(cookie.secure(), Some(true));
        }
    }

    #[test]
    fn edited_role_is_rejected() {
        let cookies = station_session().to_cookies(&secret(), false).unwrap();
        let mut jar = jar(&cookies);
        jar.insert("userRole".into(), "SuperAdmin".into());

        let error = UserSession::from_cookies(&jar, &secret()).unwrap_err();
        assert!(error.is_unauthorized());
    }

    #[test]
    fn other_secret_is_rejected() {
        let cookies = station_session().to_cookies(&secret(), false).unwrap();
        let other: SecretString = "ffffffffffffffffffffffffffffffff".into();
        assert!(UserSession::from_cookies(&jar(&cookies), &other).is_err());
    }

    #[test]
    fn missing_token_is_unauthorized() {
        let error = UserSession::from_cookies(&HashMap::new(), &secret()).unwrap_err();
        assert!(error.is_unauthorized());
    }

    #[test]
    fn station_roles_need_a_station() {
        let result = UserSession::new(
            CurrentUser {
                user_id: "1".into(),
                role: Role::DataOperator,
                station_id: None,
                service_center_name: None,
            },
            "t".into(),
        );
        assert!(result.unwrap_err().is_unauthorized());
    }

    #[test]
    fn login_accepts_numeric_role_ids() {
        let response: LoginResponse = serde_json::from_value(serde_json::json!({
            "token": "abc",
            "userId": "9",
            "roleId": 2,
        }))
        .unwrap();

        let session = UserSession::from_login(response).unwrap();
        assert_eq!(session.role(), Role::Admin);
        assert_eq!(session.dashboard_path(), "/admin/dashboard");
    }

    #[test]
    fn clearing_expires_every_cookie() {
        let cookies = clear_cookies(true);
        assert_eq!(cookies.len(), cookie_keys::ALL.len());
        assert!(cookies.iter().all(|c| c.max_age() == Some(cookie::time::Duration::ZERO)));
    }

    #[test]
    fn reads_the_session_from_request_headers() {
        let cookies = station_session().to_cookies(&secret(), false).unwrap();
        let header = cookies
            .iter()
            .map(|c| c.encoded().stripped().to_string())
            .collect::<Vec<_>>()
            .join("; ");
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, header.parse().unwrap());

        let session = UserSession::from_headers(&headers, &secret()).unwrap();
        assert_eq!(session.station().unwrap(), Uuid::from_u128(7));

        let missing = UserSession::from_headers(&HeaderMap::new(), &secret()).unwrap_err();
        assert!(missing.is_unauthorized());
    }

    #[test]
    fn cashiers_cannot_register_service_centers() {
        let session = station_session();
        assert_eq!(session.require(Section::Loyalty), Ok(()));
        assert_eq!(session.require(Section::ServiceCenters).unwrap_err().status, 403);
    }
}
