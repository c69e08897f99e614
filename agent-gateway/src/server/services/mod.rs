pub mod job_backend;
pub mod provider_client;
pub mod session_guard;
pub mod session_store;

pub use job_backend::JobBackendClient;
pub use provider_client::ProviderClient;
pub use session_guard::{guard, load_session, Access, DenyReason};
pub use session_store::{MemorySessionStore, SessionStore};
