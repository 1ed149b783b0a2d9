pub mod app_state;
pub mod configuration;
pub mod domain;
pub mod request_id;
pub mod routes;
pub mod service;
pub mod startup;
pub mod store;
pub mod telemetry;
