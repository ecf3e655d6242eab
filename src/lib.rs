//! yelpcamp - campgrounds and their reviews over a JSON API
//!
//! - [`schema`]: declarative payload validation
//! - [`storage`]: document store trait and the snapshot-backed memory store
//! - [`repository`]: typed records, cascade delete, consistency checks
//! - [`http_server`]: routes, failure adapter, server bootstrap
//! - [`errors`]: the error envelope every failure is rendered as

pub mod cli;
pub mod errors;
pub mod http_server;
pub mod repository;
pub mod schema;
pub mod storage;
