use sqlx::{
    error::BoxDynError,
    postgres::{PgTypeInfo, PgValueRef},
    Decode, Postgres, Type,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price(i64);

impl Price {
    pub fn parse(amount: i64) -> Result<Price, String> {
        if amount < 0 {
            return Err("price cannot be negative".into());
        }
        Ok(Self(amount))
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Type<Postgres> for Price {
    fn type_info() -> PgTypeInfo {
        i64::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for Price {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let amount = i64::decode(value)?;
        Self::parse(amount).map_err(|e| e.into())
    }
}
