use std::{env, fmt::Display, str::FromStr};

use chrono_tz::Tz;
use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub bind_address: String,
    pub poi_api_url: String,
    pub timezone: Option<Tz>,
    pub user_agent: String,
}

impl Config {
    pub fn load() -> Result<Self, String> {
        Ok(Self {
            port: try_load("PORT", "7878")?,
            bind_address: try_load("BIND_ADDRESS", "127.0.0.1")?,
            poi_api_url: try_load::<String>("POI_API_URL", "http://127.0.0.1:8000")?
                .trim_end_matches('/')
                .to_string(),
            timezone: load_timezone("POI_TIMEZONE"),
            user_agent: try_load("USER_AGENT", "poi-hours/0.1")?,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, String>
where
    T::Err: Display,
{
    let value = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    value
        .parse()
        .map_err(|err| format!("Invalid {key} value '{value}': {err}"))
}

/// An unknown zone is not fatal, the host's local time is used instead.
fn load_timezone(key: &str) -> Option<Tz> {
    let Some(name) = var(key) else {
        info!("{key} not set, using host local time");
        return None;
    };
    match name.parse::<Tz>() {
        Ok(timezone) => Some(timezone),
        Err(err) => {
            warn!("Invalid {key} value '{name}': {err}. Using host local time");
            None
        }
    }
}
