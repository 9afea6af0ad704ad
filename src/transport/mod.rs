//! Transport module - async adapters over established streams.
//!
//! TLS setup and certificates belong to the caller; these adapters take any
//! `tokio` stream:
//! - [`GatewayConnection`] writes frames and surfaces error responses
//! - [`FeedbackReader`] yields feedback records until EOF

mod feedback;
mod gateway;

pub use feedback::FeedbackReader;
pub use gateway::GatewayConnection;
