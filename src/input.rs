use chrono::{Datelike, NaiveDate};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("invalid date '{0}': expected DD.MM.YYYY")]
    InvalidDate(String),
    #[error("invalid priority '{0}': must be an integer")]
    InvalidPriority(String),
}

/// Parse a deadline typed as `DD.MM.YYYY`. Blank input means no deadline.
pub fn parse_due_date(raw: &str) -> Result<Option<NaiveDate>, InputError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let invalid = || InputError::InvalidDate(raw.to_string());

    let mut parts = raw.split('.');
    let (Some(day), Some(month), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };
    let day: u32 = parse_digits(day, 2).ok_or_else(invalid)?;
    let month: u32 = parse_digits(month, 2).ok_or_else(invalid)?;
    if year.len() != 4 {
        return Err(invalid());
    }
    let year: i32 = parse_digits(year, 4)
        .and_then(|y| i32::try_from(y).ok())
        .ok_or_else(invalid)?;

    NaiveDate::from_ymd_opt(year, month, day)
        .map(Some)
        .ok_or_else(invalid)
}

fn parse_digits(s: &str, max_len: usize) -> Option<u32> {
    if s.is_empty() || s.len() > max_len || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parse a priority level. Blank input means priority 0.
pub fn parse_priority(raw: &str) -> Result<i64, InputError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse()
        .map_err(|_| InputError::InvalidPriority(raw.to_string()))
}

/// `D.M.YYYY`, without zero padding.
pub fn format_due_date(date: NaiveDate) -> String {
    format!("{}.{}.{}", date.day(), date.month(), date.year())
}
