use sqlx::{
    error::BoxDynError,
    postgres::{PgTypeInfo, PgValueRef},
    Decode, Postgres, Type,
};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
    pub fn parse(s: &str) -> Result<UserId, String> {
        let id = Uuid::parse_str(s).map_err(|_| format!("`{s}` is not a valid user id"))?;
        if id.is_nil() {
            return Err("user id cannot be the nil UUID".into());
        }
        Ok(Self(id))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Type<Postgres> for UserId {
    fn type_info() -> PgTypeInfo {
        Uuid::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for UserId {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let id = Uuid::decode(value)?;
        if id.is_nil() {
            return Err("user id cannot be the nil UUID".into());
        }
        Ok(Self(id))
    }
}
