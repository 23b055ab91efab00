//! Open/closed status for points of interest.
//!
//! `timing` holds the weekly schedule model and the resolver, which is a pure function
//! of a schedule and a wall-clock timestamp. `upstream` fetches POI records from the
//! backend and `server` exposes the resolver over HTTP.

pub mod config;
pub mod server;
pub mod timing;
pub mod upstream;

pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
pub const ISO_FORMAT_MINUTES: &str = "%Y-%m-%dT%H:%M";
