use super::ApiError;
use crate::{
    app_state::AppState,
    domain::{BillingMonth, Price, ServiceName, Subscription, UserId},
    service::ServiceError,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::{future::Future, time::Duration};
use time::OffsetDateTime;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/subscriptions",
            post(subscribe)
                .get(get_subscription)
                .put(update_subscription)
                .delete(unsubscribe),
        )
        .route("/subscriptions/summary", get(get_summary))
        .route("/subscriptions/:user_id", get(list_subscriptions))
}

#[tracing::instrument(skip(app_state, payload))]
async fn subscribe(
    State(app_state): State<AppState>,
    payload: Result<Json<SubscriptionPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    let subscription = Subscription::try_from(payload).map_err(ApiError::Validation)?;

    with_deadline(
        app_state.operation_timeout,
        app_state.service.subscribe(&subscription),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "status": "success" }))))
}

#[tracing::instrument(skip(app_state, params))]
async fn get_subscription(
    State(app_state): State<AppState>,
    params: Result<Query<IdentityParams>, QueryRejection>,
) -> Result<Json<SubscriptionResponse>, ApiError> {
    let (user_id, service_name) = parse_identity(params)?;

    let subscription = with_deadline(
        app_state.operation_timeout,
        app_state.service.get_subscription(&user_id, &service_name),
    )
    .await?;

    Ok(Json(subscription.into()))
}

#[tracing::instrument(skip(app_state, payload))]
async fn update_subscription(
    State(app_state): State<AppState>,
    payload: Result<Json<SubscriptionPayload>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    let subscription = Subscription::try_from(payload).map_err(ApiError::Validation)?;

    with_deadline(
        app_state.operation_timeout,
        app_state.service.update_subscription(&subscription),
    )
    .await?;

    Ok(Json(json!({ "status": "success" })))
}

#[tracing::instrument(skip(app_state, params))]
async fn unsubscribe(
    State(app_state): State<AppState>,
    params: Result<Query<IdentityParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let (user_id, service_name) = parse_identity(params)?;

    with_deadline(
        app_state.operation_timeout,
        app_state.service.unsubscribe(&user_id, &service_name),
    )
    .await?;

    Ok(Json(json!({ "status": "success" })))
}

#[tracing::instrument(skip(app_state))]
async fn list_subscriptions(
    State(app_state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<SubscriptionResponse>>, ApiError> {
    let user_id = UserId::parse(&user_id).map_err(ApiError::Validation)?;

    let subscriptions = with_deadline(
        app_state.operation_timeout,
        app_state.service.list_subscriptions(&user_id),
    )
    .await?;

    Ok(Json(subscriptions.into_iter().map(Into::into).collect()))
}

#[tracing::instrument(skip(app_state, params))]
async fn get_summary(
    State(app_state): State<AppState>,
    params: Result<Query<SummaryParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::Validation(e.body_text()))?;

    // Empty optional filters mean "no filter".
    let user_id = params
        .user_id
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(UserId::parse)
        .transpose()
        .map_err(ApiError::Validation)?;
    let service_name = params
        .service_name
        .filter(|s| !s.is_empty())
        .map(ServiceName::parse)
        .transpose()
        .map_err(ApiError::Validation)?;

    let total = with_deadline(
        app_state.operation_timeout,
        app_state.service.get_summary(
            params.from,
            params.to,
            user_id.as_ref(),
            service_name.as_ref(),
        ),
    )
    .await?;

    Ok(Json(json!({ "total_price": total })))
}

async fn with_deadline<T>(
    deadline: Duration,
    operation: impl Future<Output = Result<T, ServiceError>>,
) -> Result<T, ApiError> {
    match tokio::time::timeout(deadline, operation).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(_) => Err(ApiError::Timeout),
    }
}

fn parse_identity(
    params: Result<Query<IdentityParams>, QueryRejection>,
) -> Result<(UserId, ServiceName), ApiError> {
    let Query(params) = params.map_err(|e| ApiError::Validation(e.body_text()))?;
    let user_id = UserId::parse(&params.user_id).map_err(ApiError::Validation)?;
    let service_name = ServiceName::parse(params.service_name).map_err(ApiError::Validation)?;
    Ok((user_id, service_name))
}

#[derive(Debug, Deserialize)]
struct IdentityParams {
    user_id: String,
    service_name: String,
}

#[derive(Debug, Deserialize)]
struct SummaryParams {
    #[serde(with = "time::serde::rfc3339")]
    from: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    to: OffsetDateTime,
    user_id: Option<String>,
    service_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubscriptionPayload {
    user_id: String,
    service_name: String,
    price: i64,
    #[serde(with = "time::serde::rfc3339")]
    start_date: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    end_date: Option<OffsetDateTime>,
}

impl TryFrom<SubscriptionPayload> for Subscription {
    type Error = String;

    fn try_from(payload: SubscriptionPayload) -> Result<Self, Self::Error> {
        let user_id = UserId::parse(&payload.user_id)?;
        let service_name = ServiceName::parse(payload.service_name)?;
        let price = Price::parse(payload.price)?;
        let start_date = BillingMonth::from_timestamp(payload.start_date);
        let end_date = payload.end_date.map(BillingMonth::from_timestamp);

        Ok(Self {
            user_id,
            service_name,
            price,
            start_date,
            end_date,
        })
    }
}

#[derive(Debug, Serialize)]
struct SubscriptionResponse {
    user_id: uuid::Uuid,
    service_name: String,
    price: i64,
    #[serde(with = "time::serde::rfc3339")]
    start_date: OffsetDateTime,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    end_date: Option<OffsetDateTime>,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(subscription: Subscription) -> Self {
        Self {
            user_id: subscription.user_id.as_uuid(),
            service_name: subscription.service_name.as_ref().to_string(),
            price: subscription.price.as_i64(),
            start_date: subscription.start_date.midnight_utc(),
            end_date: subscription.end_date.map(|end| end.midnight_utc()),
        }
    }
}
