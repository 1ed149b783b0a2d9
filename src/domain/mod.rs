mod billing_month;
mod price;
mod service_name;
mod subscription;
mod user_id;

pub use billing_month::BillingMonth;
pub use price::Price;
pub use service_name::ServiceName;
pub use subscription::Subscription;
pub use user_id::UserId;
