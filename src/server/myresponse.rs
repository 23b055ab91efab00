use serde::Serialize;

use crate::{
    timing::{schedule::Schedule, status::OpenStatus},
    upstream::poi_client::Poi,
};

/// The body sent back for `GET /api/status`.
///
/// The schedule is echoed back so the client can render the full week next to the
/// status line without a second request.
#[derive(Serialize, Clone, Debug)]
pub struct MyResponse {
    id: String,
    name: Option<String>,
    status: OpenStatus,
    open_hours: Option<Schedule>,
}

impl MyResponse {
    pub fn new(poi: Poi, status: OpenStatus) -> Self {
        Self {
            id: poi.id,
            name: poi.name,
            status,
            open_hours: poi.open_hours,
        }
    }
}
