use std::{sync::OnceLock, time::Duration};

use anyhow::Context;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use types::{Result, err};
use url::Url;

const MIN_SECRET_LEN: usize = 32;

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Console settings, read from `console.toml` (optional) and `CONSOLE_*`
/// environment variables, the latter taking precedence.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub backend_url: Url,
    pub signing_secret: SecretString,
    #[serde(default = "default_secure_cookies")]
    pub secure_cookies: bool,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_secure_cookies() -> bool {
    true
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Config {
    pub fn load() -> Result<Self> {
        let config: Self = config::Config::builder()
            .add_source(config::File::with_name("console").required(false))
            .add_source(config::Environment::with_prefix("CONSOLE"))
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !matches!(self.backend_url.scheme(), "http" | "https") {
            return Err(err!(
                "backend_url must be http or https, got {}",
                self.backend_url
            ));
        }

        if self.signing_secret.expose_secret().len() < MIN_SECRET_LEN {
            return Err(err!(
                "signing_secret must be at least {MIN_SECRET_LEN} bytes"
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(err!("request_timeout_secs must be positive"));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Load the configuration once at startup.
pub fn init() -> Result<&'static Config> {
    let config = Config::load()?;
    Ok(CONFIG.get_or_init(|| config))
}

pub fn get() -> Result<&'static Config> {
    CONFIG
        .get()
        .ok_or_else(|| err!("configuration has not been loaded"))
}
