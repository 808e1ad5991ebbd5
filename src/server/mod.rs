//! HTTP interface for the word counter
//!
//! Exposes a single `POST /counter` route accepting a JSON body naming a
//! directory and a word. Each request resolves the directory under the
//! configured corpus root, runs one scan with a fresh session, and
//! answers with the final count. Malformed bodies and invalid words get
//! a 400; lookup and scan failures get a 500 with the error message.

pub mod routes;

pub use routes::{build_router, serve, AppState, CountRequest, CountResponse, ServerConfig};
