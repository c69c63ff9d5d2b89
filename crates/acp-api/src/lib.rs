//! API server for the ACP job dispatcher.
//!
//! Provides the HTTP submission endpoint and the WebSocket broadcast
//! endpoint.

pub mod error;
pub mod executor;
pub mod routes;
pub mod state;
pub mod ws;

pub use state::AppState;
