use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{server::error::AppError, timing::schedule::Schedule};

/// The slice of a backend POI record that matters here.
#[derive(Debug)]
pub struct Poi {
    pub id: String,
    pub name: Option<String>,
    pub open_hours: Option<Schedule>,
}

#[derive(Deserialize, Debug)]
struct APIResponse {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    open_hours: serde_json::Value,
}

impl Poi {
    /// Decodes a `GET /api/v1/pois/{id}` body. A bad `open_hours` field never fails the
    /// record, it just leaves the schedule absent.
    pub fn from_body(requested_id: &str, body: &str) -> Result<Self, AppError> {
        let response: APIResponse = serde_json::from_str(body)
            .map_err(|err| AppError::Upstream(format!("Could not decode POI record. {}", err)))?;

        let id = match response.id {
            Some(serde_json::Value::String(id)) => id,
            Some(serde_json::Value::Number(id)) => id.to_string(),
            _ => requested_id.to_string(),
        };
        let open_hours = Schedule::from_json(&response.open_hours);
        if open_hours.is_none() && !response.open_hours.is_null() {
            warn!("POI {} has unusable open_hours: {}", id, response.open_hours);
        }

        Ok(Self {
            id,
            name: response.name,
            open_hours,
        })
    }
}

#[derive(Clone)]
pub struct PoiClient {
    base_url: String,
    user_agent: String,
    client: Client,
}

impl PoiClient {
    pub fn new(base_url: &str, user_agent: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: user_agent.to_string(),
            client: Client::new(),
        }
    }

    /// `id` must already be sanitized by the caller.
    pub fn poi_url(&self, id: &str) -> String {
        format!("{}/api/v1/pois/{}", self.base_url, id)
    }

    fn get_request(&self, id: &str) -> RequestBuilder {
        self.client
            .request(Method::GET, self.poi_url(id))
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
    }

    pub async fn fetch(&self, id: &str) -> Result<Poi, AppError> {
        debug!("Fetching POI {}", id);
        let response = self.get_request(id).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(AppError::PoiNotFound(id.to_string())),
            status if !status.is_success() => {
                return Err(AppError::Upstream(format!(
                    "POI API answered {} for {}",
                    status, id
                )))
            }
            _ => (),
        }

        let body = response.text().await?;
        Poi::from_body(id, &body)
    }
}
