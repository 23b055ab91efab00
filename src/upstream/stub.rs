//! A stand-in for the POI backend, served on an ephemeral port.

use std::convert::Infallible;

use bytes::Bytes;
use http_body_util::Full;
use hyper::{
    body::Incoming, server::conn::http1, service::service_fn, Request, Response, StatusCode,
};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

pub const CAFE_RECORD: &str = r#"{
    "id": "cafe-1",
    "name": "Corner Cafe",
    "category": "cafe",
    "open_hours": {
        "monday": { "open": "09:00", "close": "17:00" },
        "friday": { "open": "18:00", "close": "02:00" }
    }
}"#;

/// `cafe-1` answers with `CAFE_RECORD`, `broken` with a 500, anything else with a 404.
async fn respond(req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    let (status, body) = match req.uri().path() {
        "/api/v1/pois/cafe-1" => (StatusCode::OK, CAFE_RECORD),
        "/api/v1/pois/broken" => (StatusCode::INTERNAL_SERVER_ERROR, "database is down"),
        _ => (StatusCode::NOT_FOUND, ""),
    };
    let mut res = Response::new(Full::new(Bytes::from(body)));
    *res.status_mut() = status;
    Ok(res)
}

/// Starts the stub and returns its base url.
pub async fn spawn_backend() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service_fn(respond))
                    .await;
            });
        }
    });
    format!("http://{}", address)
}
