pub mod api_client;
pub mod checks;
pub mod configuration;
pub mod domain;
pub mod scenario;
pub mod telemetry;
pub mod utils;
