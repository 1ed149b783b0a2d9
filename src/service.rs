use crate::domain::{BillingMonth, ServiceName, Subscription, UserId};
use crate::store::{StoreError, SubscriptionStore};
use time::OffsetDateTime;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("end date cannot be before start date")]
    InvalidDateRange,
    #[error("from date cannot be after to date")]
    InvalidRange,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Stateless validating façade over the store. Business-rule failures are
/// raised here; everything else passes through unchanged.
#[derive(Clone)]
pub struct SubscriptionService<S> {
    store: S,
}

impl<S: SubscriptionStore> SubscriptionService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[tracing::instrument(
        skip(self, subscription),
        fields(
            user_id = %subscription.user_id,
            service_name = %subscription.service_name,
        )
    )]
    pub async fn subscribe(&self, subscription: &Subscription) -> Result<(), ServiceError> {
        validate_date_range(subscription)?;
        tracing::info!("Creating a new subscription");
        Ok(self.store.insert(subscription).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_subscription(
        &self,
        user_id: &UserId,
        service_name: &ServiceName,
    ) -> Result<Subscription, ServiceError> {
        Ok(self.store.get(user_id, service_name).await?)
    }

    #[tracing::instrument(
        skip(self, subscription),
        fields(
            user_id = %subscription.user_id,
            service_name = %subscription.service_name,
        )
    )]
    pub async fn update_subscription(
        &self,
        subscription: &Subscription,
    ) -> Result<(), ServiceError> {
        validate_date_range(subscription)?;
        tracing::info!("Updating the subscription");
        Ok(self.store.update(subscription).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn unsubscribe(
        &self,
        user_id: &UserId,
        service_name: &ServiceName,
    ) -> Result<(), ServiceError> {
        tracing::info!("Deleting the subscription");
        Ok(self.store.delete(user_id, service_name).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_subscriptions(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Subscription>, ServiceError> {
        Ok(self.store.list(user_id, None).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_summary(
        &self,
        from: OffsetDateTime,
        to: OffsetDateTime,
        user_id: Option<&UserId>,
        service_name: Option<&ServiceName>,
    ) -> Result<i64, ServiceError> {
        if from > to {
            return Err(ServiceError::InvalidRange);
        }

        let from = BillingMonth::from_timestamp(from);
        let to = BillingMonth::from_timestamp(to);
        Ok(self.store.summary(from, to, user_id, service_name).await?)
    }
}

fn validate_date_range(subscription: &Subscription) -> Result<(), ServiceError> {
    match subscription.end_date {
        Some(end) if end < subscription.start_date => Err(ServiceError::InvalidDateRange),
        _ => Ok(()),
    }
}
