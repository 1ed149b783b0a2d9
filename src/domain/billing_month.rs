use sqlx::{
    error::BoxDynError,
    postgres::{PgTypeInfo, PgValueRef},
    Decode, Postgres, Type,
};
use std::fmt;
use time::{Date, Month, OffsetDateTime};

/// A calendar month represented by its first day, the unit of
/// activation-based charging. Day-of-month information never survives
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BillingMonth(Date);

impl BillingMonth {
    pub fn containing(date: Date) -> BillingMonth {
        let first = Date::from_calendar_date(date.year(), date.month(), 1)
            .expect("every month has a first day");
        Self(first)
    }

    pub fn from_timestamp(at: OffsetDateTime) -> BillingMonth {
        Self::containing(at.date())
    }

    pub fn first_day(&self) -> Date {
        self.0
    }

    pub fn midnight_utc(&self) -> OffsetDateTime {
        self.0.midnight().assume_utc()
    }

    pub fn next(self) -> BillingMonth {
        let (year, month) = match self.0.month() {
            Month::December => (self.0.year() + 1, Month::January),
            month => (self.0.year(), month.next()),
        };
        let first = Date::from_calendar_date(year, month, 1).expect("every month has a first day");
        Self(first)
    }

    /// Months from `self` through `last`, inclusive. Empty when `last`
    /// precedes `self`.
    pub fn through(self, last: BillingMonth) -> impl Iterator<Item = BillingMonth> {
        let mut upcoming = self;
        std::iter::from_fn(move || {
            if upcoming > last {
                return None;
            }
            let current = upcoming;
            upcoming = upcoming.next();
            Some(current)
        })
    }
}

impl fmt::Display for BillingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Type<Postgres> for BillingMonth {
    fn type_info() -> PgTypeInfo {
        Date::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for BillingMonth {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let date = Date::decode(value)?;
        if date.day() != 1 {
            return Err(format!("`{date}` is not the first day of a month").into());
        }
        Ok(Self(date))
    }
}
