//! HTTP request layer
//!
//! Plain tokio networking, no framework: `server` accepts connections,
//! `http` frames requests and responses, `routes` maps them onto the roster
//! and status services.

pub mod http;
pub mod routes;
pub mod server;

pub use http::{Request, Response};
pub use routes::Router;
pub use server::serve;
