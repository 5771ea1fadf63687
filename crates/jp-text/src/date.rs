//! ISO date decomposition
//!
//! The form has three separate boxes for year, month, and day, so dates are
//! carried as three independently positioned tokens rather than one
//! formatted string.

use crate::{JpTextError, Result};
use chrono::NaiveDate;

/// A date split into the three tokens the form boxes expect
///
/// Month and day are unpadded ("4", not "04"), matching how the boxes are
/// filled in by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTokens {
    pub year: String,
    pub month: String,
    pub day: String,
}

impl DateTokens {
    /// Parse an ISO `YYYY-MM-DD` string into tokens
    pub fn parse(iso: &str) -> Result<Self> {
        let date = NaiveDate::parse_from_str(iso, "%Y-%m-%d")
            .map_err(|_| JpTextError::InvalidDate(iso.to_string()))?;

        Ok(Self::from_date(date))
    }

    /// Build tokens from an already parsed date
    pub fn from_date(date: NaiveDate) -> Self {
        use chrono::Datelike;

        Self {
            year: date.year().to_string(),
            month: date.month().to_string(),
            day: date.day().to_string(),
        }
    }
}
