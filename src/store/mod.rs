mod postgres;

pub use postgres::PostgresStore;

use crate::domain::{BillingMonth, ServiceName, Subscription, UserId};
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("subscription already exists")]
    AlreadyExists,
    #[error("subscription not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// The storage capability set the service layer is written against. Records
/// carry already-normalized billing months; implementations never see a
/// mid-month date.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn insert(&self, subscription: &Subscription) -> Result<(), StoreError>;

    async fn get(
        &self,
        user_id: &UserId,
        service_name: &ServiceName,
    ) -> Result<Subscription, StoreError>;

    async fn update(&self, subscription: &Subscription) -> Result<(), StoreError>;

    async fn delete(&self, user_id: &UserId, service_name: &ServiceName)
        -> Result<(), StoreError>;

    async fn list(
        &self,
        user_id: &UserId,
        service_name: Option<&ServiceName>,
    ) -> Result<Vec<Subscription>, StoreError>;

    async fn summary(
        &self,
        from: BillingMonth,
        to: BillingMonth,
        user_id: Option<&UserId>,
        service_name: Option<&ServiceName>,
    ) -> Result<i64, StoreError>;
}
