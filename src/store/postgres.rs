use super::{StoreError, SubscriptionStore};
use crate::domain::{BillingMonth, ServiceName, Subscription, UserId};
use async_trait::async_trait;
use sqlx::PgPool;

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionStore for PostgresStore {
    #[tracing::instrument(
        skip(self, subscription),
        fields(
            user_id = %subscription.user_id,
            service_name = %subscription.service_name,
        )
    )]
    async fn insert(&self, subscription: &Subscription) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions (user_id, service_name, price, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(subscription.user_id.as_uuid())
        .bind(subscription.service_name.as_ref())
        .bind(subscription.price.as_i64())
        .bind(subscription.start_date.first_day())
        .bind(subscription.end_date.map(|end| end.first_day()))
        .execute(&self.pool)
        .await
        .map_err(into_store_error)?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn get(
        &self,
        user_id: &UserId,
        service_name: &ServiceName,
    ) -> Result<Subscription, StoreError> {
        sqlx::query_as::<_, Subscription>(
            r#"
            SELECT user_id, service_name, price, start_date, end_date
            FROM subscriptions
            WHERE user_id = $1 AND service_name = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(service_name.as_ref())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    #[tracing::instrument(
        skip(self, subscription),
        fields(
            user_id = %subscription.user_id,
            service_name = %subscription.service_name,
        )
    )]
    async fn update(&self, subscription: &Subscription) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE subscriptions
            SET price = $1,
                start_date = $2,
                end_date = $3
            WHERE user_id = $4 AND service_name = $5
            "#,
        )
        .bind(subscription.price.as_i64())
        .bind(subscription.start_date.first_day())
        .bind(subscription.end_date.map(|end| end.first_day()))
        .bind(subscription.user_id.as_uuid())
        .bind(subscription.service_name.as_ref())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(
        &self,
        user_id: &UserId,
        service_name: &ServiceName,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM subscriptions
            WHERE user_id = $1 AND service_name = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(service_name.as_ref())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn list(
        &self,
        user_id: &UserId,
        service_name: Option<&ServiceName>,
    ) -> Result<Vec<Subscription>, StoreError> {
        let subscriptions = sqlx::query_as::<_, Subscription>(
            r#"
            SELECT user_id, service_name, price, start_date, end_date
            FROM subscriptions
            WHERE user_id = $1
              AND ($2::TEXT IS NULL OR service_name = $2)
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(service_name.map(|name| name.as_ref()))
        .fetch_all(&self.pool)
        .await?;

        Ok(subscriptions)
    }

    // Pushes the billing-month activation rule down as a join against a
    // generated first-of-month series; both bounds are first-of-month by
    // construction, so the series is the exact sequence of billing months.
    #[tracing::instrument(skip(self))]
    async fn summary(
        &self,
        from: BillingMonth,
        to: BillingMonth,
        user_id: Option<&UserId>,
        service_name: Option<&ServiceName>,
    ) -> Result<i64, StoreError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(s.price), 0)::BIGINT
            FROM subscriptions s
            JOIN generate_series($1::DATE, $2::DATE, INTERVAL '1 month') m
                ON m >= s.start_date
               AND (s.end_date IS NULL OR m <= s.end_date)
            WHERE ($3::UUID IS NULL OR s.user_id = $3)
              AND ($4::TEXT IS NULL OR s.service_name = $4)
            "#,
        )
        .bind(from.first_day())
        .bind(to.first_day())
        .bind(user_id.map(UserId::as_uuid))
        .bind(service_name.map(|name| name.as_ref()))
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}

fn into_store_error(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
            StoreError::AlreadyExists
        }
        _ => StoreError::Database(e),
    }
}
