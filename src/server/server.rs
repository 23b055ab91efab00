use bytes::Bytes;
use chrono::NaiveDateTime;
use chrono_tz::Tz;
use http_body_util::{BodyExt, Full};
use hyper::{
    body::Incoming, header, header::HeaderValue, service::Service, Method, Request, Response,
    StatusCode,
};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};
use url_escape::decode;

use std::{collections::HashMap, future::Future, pin::Pin};

use crate::{
    timing::{
        clock::{local_now, parse_timestamp},
        schedule::Schedule,
        status::OpenStatus,
    },
    upstream::poi_client::PoiClient,
};

use super::{error::AppError, myresponse::MyResponse};

/// The Server
///
/// Handles every API endpoint. Looking up POI records is delegated to `PoiClient`, the
/// open/closed decision to `OpenStatus::resolve`.
///
/// Implements hyper's `Service` trait and is cloned for every accepted connection, so it
/// only holds cheap, immutable state.
#[derive(Clone)]
pub struct Server {
    poi_client: PoiClient,
    timezone: Option<Tz>,
    id_sanitizer: Regex,
}

impl Server {
    pub fn setup(poi_client: PoiClient, timezone: Option<Tz>) -> Result<Self, String> {
        let id_sanitizer = Regex::new(r"^[A-Za-z0-9_-]+$")
            .map_err(|err| format!("Could not build id sanitizer.\n{}", err))?;
        Ok(Self {
            poi_client,
            timezone,
            id_sanitizer,
        })
    }

    /// Parses the query parameters and returns a `hashmap` of key pair values
    /// Returns `None` if the parameters are malformed. Empty pairs (`a=1&&b=2`, a trailing
    /// `&`) are skipped.
    fn parse_params(text: &str) -> Option<HashMap<String, String>> {
        let mut map: HashMap<String, String> = HashMap::new();
        for pairs in text.split('&') {
            if pairs.is_empty() {
                continue;
            }
            let mut iterator = pairs.split('=');
            map.insert(
                iterator.next()?.to_string(),
                decode(iterator.next()?).to_string(),
            );
        }
        Some(map)
    }

    fn query_params(req: &Request<Incoming>) -> Result<HashMap<String, String>, AppError> {
        match req.uri().query() {
            None => Ok(HashMap::new()),
            Some(query) => Self::parse_params(query)
                .ok_or_else(|| AppError::BadRequest("Malformed Parameters.".to_string())),
        }
    }

    /// The time to resolve against: the `at` parameter when given, otherwise the clock.
    fn now(&self, params: &HashMap<String, String>) -> Result<NaiveDateTime, AppError> {
        match params.get("at") {
            Some(at) => parse_timestamp(at)
                .ok_or_else(|| AppError::BadRequest("Malformed Date".to_string())),
            None => Ok(local_now(self.timezone)),
        }
    }

    /// Only ids made of letters, digits, `_` and `-` are forwarded to the POI API.
    fn sanitize_id<'a>(&self, id: &'a str) -> Result<&'a str, AppError> {
        if self.id_sanitizer.is_match(id) {
            Ok(id)
        } else {
            Err(AppError::BadRequest("Malformed id".to_string()))
        }
    }

    /// The GET /api/status API endpoint.
    ///
    /// Requires an `id`, optionally an `at` timestamp. Fetches the POI record from the
    /// backend and resolves its open hours.
    async fn poi_status(&self, req: Request<Incoming>) -> Result<Response<Full<Bytes>>, AppError> {
        let params = Self::query_params(&req)?;

        let Some(id) = params.get("id") else {
            return Err(AppError::BadRequest(
                "id not provided. Required id + Optional at.".to_string(),
            ));
        };
        let id = self.sanitize_id(id)?;
        let now = self.now(&params)?;

        let poi = self.poi_client.fetch(id).await?;
        let status = OpenStatus::resolve(poi.open_hours.as_ref(), &now);
        debug!("POI {} at {}: {}", poi.id, now, status.status_text);

        Self::ok_data(MyResponse::new(poi, status))
    }

    /// The POST /api/status API endpoint.
    ///
    /// Resolves a schedule sent in the body, for clients that already hold the record.
    async fn schedule_status(
        &self,
        req: Request<Incoming>,
    ) -> Result<Response<Full<Bytes>>, AppError> {
        let params = Self::query_params(&req)?;
        let now = self.now(&params)?;

        let body = req
            .into_body()
            .collect()
            .await
            .map_err(|err| AppError::BadRequest(format!("Could not read body. {}", err)))?
            .to_bytes();

        Self::ok_data(Self::status_from_body(&body, &now)?)
    }

    /// Decodes `{ "open_hours": {...} }` and resolves it.
    fn status_from_body(body: &[u8], now: &NaiveDateTime) -> Result<OpenStatus, AppError> {
        let payload: serde_json::Value = serde_json::from_slice(body)
            .map_err(|err| AppError::BadRequest(format!("Malformed payload. {}", err)))?;
        let schedule = payload.get("open_hours").and_then(Schedule::from_json);
        Ok(OpenStatus::resolve(schedule.as_ref(), now))
    }

    async fn route(&self, req: Request<Incoming>) -> Response<Full<Bytes>> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let result = match (&method, path.as_str()) {
            (&Method::GET, "/health") => Self::ok_data(serde_json::json!({ "status": "ok" })),
            (&Method::GET, "/api/status") => self.poi_status(req).await,
            (&Method::POST, "/api/status") => self.schedule_status(req).await,
            _ => return Self::not_found(),
        };

        match result {
            Ok(res) => res,
            Err(err) => {
                warn!("{} {} failed: {}", method, path, err);
                Self::error_response(&err)
            }
        }
    }

    fn json_response(status: StatusCode, body: String) -> Response<Full<Bytes>> {
        let mut res = Response::new(Full::new(Bytes::from(body)));
        *res.status_mut() = status;
        res.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        res
    }

    /// Return a 200 OK response with the data provided.
    fn ok_data<T: Serialize>(body: T) -> Result<Response<Full<Bytes>>, AppError> {
        let data = serde_json::to_string(&body).map_err(|err| AppError::Internal(err.to_string()))?;
        Ok(Self::json_response(StatusCode::OK, data))
    }

    /// Return the status code of `err` with an `{"error": ...}` body.
    fn error_response(err: &AppError) -> Response<Full<Bytes>> {
        let body = serde_json::json!({ "error": err.to_string() }).to_string();
        Self::json_response(err.status(), body)
    }

    /// Return an empty 404 Not Found response.
    fn not_found() -> Response<Full<Bytes>> {
        let mut res = Response::new(Full::new(Bytes::new()));
        *res.status_mut() = StatusCode::NOT_FOUND;
        res
    }
}

impl Service<Request<Incoming>> for Server {
    type Response = Response<Full<Bytes>>;
    type Error = hyper::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let server = self.clone();
        Box::pin(async move { Ok(server.route(req).await) })
    }
}
