//! Job dispatch for the ACP server.
//!
//! Manages the in-memory job store, the broadcast event bus, and the
//! single-worker dispatcher that drains pending jobs in submission order.

pub mod bus;
pub mod store;
pub mod worker;

pub use bus::EventBus;
pub use store::JobStore;
pub use worker::Dispatcher;
