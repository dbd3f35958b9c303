use chrono::NaiveDate;

/// Failures raised while working with dates of birth.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgeError {
    #[error("date of birth {dob} is after the reference date {as_of}")]
    InvalidDate { dob: NaiveDate, as_of: NaiveDate },
    #[error("failed to parse '{raw}' as YYYY-MM-DD")]
    Malformed { raw: String },
}

/// Whole years elapsed between `dob` and `as_of`.
///
/// The year only counts once the birthday has been reached in `as_of`'s calendar year, so
/// someone born 2010-06-15 is still 13 on 2024-06-14.
pub fn age_in_years(dob: NaiveDate, as_of: NaiveDate) -> Result<u32, AgeError> {
    as_of
        .years_since(dob)
        .ok_or(AgeError::InvalidDate { dob, as_of })
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, AgeError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| AgeError::Malformed {
        raw: raw.to_string(),
    })
}
