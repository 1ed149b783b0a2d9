use crate::service::SubscriptionService;
use crate::store::PostgresStore;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub service: SubscriptionService<PostgresStore>,
    pub operation_timeout: Duration,
}
