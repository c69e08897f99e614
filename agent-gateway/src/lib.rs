// Wire types shared between client and server
pub mod common;

// Client library for the gateway's JSON API
mod client;
mod error;

pub use client::{GatewayClient, Settings};
pub use common::{AgentType, JobStatus};
pub use error::ClientError;

// Server modules (public for binary, internal for library)
#[cfg(feature = "server")]
pub mod server;
