//! Calendar-month windows for scoping queries and aggregations.

use time::{Date, Month, OffsetDateTime};

use crate::Error;

/// A calendar month in a specific year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    /// The month number, 1 (January) through 12 (December).
    pub month: u8,
    /// The calendar year.
    pub year: i32,
}

impl Period {
    /// The current wall-clock month and year.
    pub fn current() -> Self {
        let today = OffsetDateTime::now_utc().date();

        Self {
            month: u8::from(today.month()),
            year: today.year(),
        }
    }
}

/// The inclusive calendar bounds of a month: its first and last day.
///
/// Month lengths come from the calendar via [Month::length], so leap-year
/// February is handled without a fixed day count.
///
/// # Errors
/// Returns [Error::InvalidMonth] if `month` is outside 1-12, or
/// [Error::InvalidYear] if `year` is outside the range of representable dates.
pub fn month_bounds(month: u8, year: i32) -> Result<(Date, Date), Error> {
    let month_enum = Month::try_from(month).map_err(|_| Error::InvalidMonth(month))?;

    let start =
        Date::from_calendar_date(year, month_enum, 1).map_err(|_| Error::InvalidYear(year))?;
    let end = Date::from_calendar_date(year, month_enum, month_enum.length(year))
        .map_err(|_| Error::InvalidYear(year))?;

    Ok((start, end))
}

/// The inclusive calendar bounds of a whole year: January 1 to December 31.
///
/// # Errors
/// Returns [Error::InvalidYear] if `year` is outside the range of
/// representable dates.
pub fn year_bounds(year: i32) -> Result<(Date, Date), Error> {
    let start =
        Date::from_calendar_date(year, Month::January, 1).map_err(|_| Error::InvalidYear(year))?;
    let end = Date::from_calendar_date(year, Month::December, 31)
        .map_err(|_| Error::InvalidYear(year))?;

    Ok((start, end))
}
