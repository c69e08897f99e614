mod config;
pub mod gateway_client;

pub use config::Settings;
pub use gateway_client::GatewayClient;
