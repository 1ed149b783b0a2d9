mod error;
pub mod health_check;
pub mod subscriptions;

pub use error::ApiError;
