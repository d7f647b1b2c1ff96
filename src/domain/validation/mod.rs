//! Pure field validators for conversation input.
//!
//! Each validator checks raw text or a selection payload against one
//! field's constraints and normalizes it to a semantic value. Validators
//! never touch session state; on rejection the caller re-prompts with the
//! error's message and the state machine stays put.

use chrono::{Days, NaiveDate};

use crate::domain::foundation::ValidationError;
use crate::domain::search::Currency;

/// How far into the future either trip date may lie, in days.
pub const MAX_ADVANCE_DAYS: u64 = 365;

/// The field a collecting state expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    City,
    EnterDate,
    ExitDate,
    Adults,
    Children,
    Infants,
    Pets,
    Currency,
    MaxPrice,
}

/// A validated, normalized field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    City(String),
    Date(NaiveDate),
    Count(u32),
    Currency(Currency),
}

/// Date bounds for the two calendar fields.
#[derive(Debug, Clone, Copy)]
pub struct DateContext {
    /// Today's calendar date (injected so validation stays pure).
    pub today: NaiveDate,
    /// Days in the past a check-in may still start.
    pub grace_days: u64,
    /// Already collected check-in date, required to validate check-out.
    pub enter_date: Option<NaiveDate>,
}

/// Validates `raw` as the value of `kind`.
///
/// Thin dispatcher over the per-field validators below; the conversation
/// engine uses this to keep the transition table uniform.
pub fn validate_field(
    kind: FieldKind,
    raw: &str,
    ctx: &DateContext,
) -> Result<FieldValue, ValidationError> {
    match kind {
        FieldKind::City => parse_city(raw).map(FieldValue::City),
        FieldKind::EnterDate => {
            parse_enter_date(raw, ctx.today, ctx.grace_days).map(FieldValue::Date)
        }
        FieldKind::ExitDate => {
            let enter = ctx
                .enter_date
                .ok_or_else(|| ValidationError::empty_field("enter_date"))?;
            parse_exit_date(raw, enter).map(FieldValue::Date)
        }
        FieldKind::Adults => parse_adults(raw).map(FieldValue::Count),
        FieldKind::Children => parse_count("children", raw).map(FieldValue::Count),
        FieldKind::Infants => parse_count("infants", raw).map(FieldValue::Count),
        FieldKind::Pets => parse_count("pets", raw).map(FieldValue::Count),
        FieldKind::Currency => parse_currency(raw).map(FieldValue::Currency),
        FieldKind::MaxPrice => parse_max_price(raw).map(FieldValue::Count),
    }
}

/// City names are deliberately permissive: anything non-blank passes.
pub fn parse_city(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field("city"));
    }
    Ok(trimmed.to_string())
}

/// Non-negative integer literal: digits only, no sign, no decimal point.
pub fn parse_count(field: &str, raw: &str) -> Result<u32, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::invalid_format(
            field,
            "must be a whole non-negative number",
        ));
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| ValidationError::invalid_format(field, "number is too large"))
}

/// Adults must be a whole number of at least 1.
pub fn parse_adults(raw: &str) -> Result<u32, ValidationError> {
    let count = parse_count("adults", raw).map_err(|_| {
        ValidationError::invalid_format("adults", "must be a whole number of at least 1")
    })?;
    if count == 0 {
        return Err(ValidationError::invalid_format(
            "adults",
            "must be a whole number of at least 1",
        ));
    }
    Ok(count)
}

/// Price ceiling must be a whole positive number.
pub fn parse_max_price(raw: &str) -> Result<u32, ValidationError> {
    let price = parse_count("max_price", raw).map_err(|_| {
        ValidationError::invalid_format("max_price", "must be a whole positive number")
    })?;
    if price == 0 {
        return Err(ValidationError::invalid_format(
            "max_price",
            "must be a whole positive number",
        ));
    }
    Ok(price)
}

/// Currency comes from an explicit selection payload; only exact enum
/// codes are accepted, free text never is.
pub fn parse_currency(payload: &str) -> Result<Currency, ValidationError> {
    payload.parse()
}

/// Check-in date: a valid calendar date within
/// `[today - grace_days, today + MAX_ADVANCE_DAYS]`.
pub fn parse_enter_date(
    raw: &str,
    today: NaiveDate,
    grace_days: u64,
) -> Result<NaiveDate, ValidationError> {
    let date = parse_date("enter_date", raw)?;
    let min = today - Days::new(grace_days);
    let max = today + Days::new(MAX_ADVANCE_DAYS);
    if date < min || date > max {
        return Err(ValidationError::date_out_of_range("enter_date", min, max));
    }
    Ok(date)
}

/// Check-out date: a valid calendar date within
/// `[enter + 1, enter + MAX_ADVANCE_DAYS]`, which makes `exit > enter`
/// hold by construction.
pub fn parse_exit_date(raw: &str, enter_date: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let date = parse_date("exit_date", raw)?;
    let min = enter_date + Days::new(1);
    let max = enter_date + Days::new(MAX_ADVANCE_DAYS);
    if date < min || date > max {
        return Err(ValidationError::date_out_of_range("exit_date", min, max));
    }
    Ok(date)
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::invalid_format(field, "expected a date as YYYY-MM-DD"))
}
