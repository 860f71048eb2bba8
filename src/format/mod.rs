//! Danish Display Formatting
//!
//! Pure helpers used by templates and scripts to render values the way the
//! dashboard shows them:
//! - `format_price`: Danish krone amounts (`1.234,50 kr.`)
//! - `format_date_time`: Danish date plus hour and minute (`15.01.2024, 10.05`)
//!
//! Both are side-effect free. Invalid input is reported as a `FormatError`
//! instead of being rendered as placeholder text.

mod datetime;
mod price;
mod zone;

pub use datetime::{DateTimeFormatter, DateTimeInput, DATE_TIME_PATTERN};
pub use price::{format_price, format_price_str, CURRENCY_SYMBOL};
pub use zone::DisplayZone;

use thiserror::Error;

/// Errors produced by the formatters
#[derive(Error, Debug, Clone)]
pub enum FormatError {
    /// NaN or infinite price
    #[error("Price is not a finite number: {0}")]
    NonFinitePrice(f64),

    /// Price text could not be parsed as a number
    #[error("Invalid price: {0:?}")]
    InvalidPrice(String),

    /// Date-time text in an unsupported or malformed format
    #[error("Invalid date-time: {0:?}")]
    InvalidDateTime(String),

    /// Unknown timezone name or malformed offset
    #[error("Invalid timezone: {0:?}")]
    InvalidTimezone(String),
}

/// Format a date-time in the default display zone (Europe/Copenhagen)
pub fn format_date_time(input: impl Into<DateTimeInput>) -> Result<String, FormatError> {
    DateTimeFormatter::default().format(input)
}
