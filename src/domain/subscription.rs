use super::{BillingMonth, Price, ServiceName, UserId};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Subscription {
    pub user_id: UserId,
    pub service_name: ServiceName,
    pub price: Price,
    pub start_date: BillingMonth,
    pub end_date: Option<BillingMonth>,
}

impl Subscription {
    /// The activation predicate: a subscription is billed for `month` when
    /// the month is not before its start and, for closed subscriptions, not
    /// after its end.
    pub fn is_active_in(&self, month: BillingMonth) -> bool {
        month >= self.start_date && self.end_date.map_or(true, |end| month <= end)
    }
}
