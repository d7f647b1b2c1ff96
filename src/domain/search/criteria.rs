//! Search criteria value objects and the per-flow draft accumulator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

use super::CommandKind;

/// Currency accepted by the search provider.
///
/// Only these three are offered; the value is set exclusively through an
/// explicit selection, never parsed from free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    RUB,
}

impl Currency {
    /// All selectable currencies, in presentation order.
    pub const ALL: [Currency; 3] = [Currency::USD, Currency::EUR, Currency::RUB];

    /// The provider-facing code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::RUB => "RUB",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "RUB" => Ok(Currency::RUB),
            other => Err(ValidationError::invalid_format(
                "currency",
                format!("'{}' is not a supported currency", other),
            )),
        }
    }
}

/// Complete, validated input for one provider search.
///
/// # Invariants
///
/// - `city` is non-empty
/// - `enter_date < exit_date`
/// - `adult_count > 0`
/// - `max_price` is present only for [`CommandKind::Custom`] flows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    city: String,
    enter_date: NaiveDate,
    exit_date: NaiveDate,
    adult_count: u32,
    child_count: u32,
    infant_count: u32,
    pet_count: u32,
    currency: Currency,
    max_price: Option<u32>,
}

impl SearchCriteria {
    /// Creates criteria from the required fields; optional counts default
    /// to zero and currency to USD.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if city is blank
    /// - `InvalidFormat` if adults is zero or the dates are not ordered
    pub fn new(
        city: impl Into<String>,
        enter_date: NaiveDate,
        exit_date: NaiveDate,
        adult_count: u32,
    ) -> Result<Self, ValidationError> {
        let city = city.into();
        if city.trim().is_empty() {
            return Err(ValidationError::empty_field("city"));
        }
        if adult_count == 0 {
            return Err(ValidationError::invalid_format(
                "adults",
                "must be a positive integer",
            ));
        }
        if enter_date >= exit_date {
            return Err(ValidationError::invalid_format(
                "exit_date",
                "check-out must be after check-in",
            ));
        }
        Ok(Self {
            city,
            enter_date,
            exit_date,
            adult_count,
            child_count: 0,
            infant_count: 0,
            pet_count: 0,
            currency: Currency::default(),
            max_price: None,
        })
    }

    /// Sets the optional guest counts collected on the custom path.
    pub fn with_counts(mut self, children: u32, infants: u32, pets: u32) -> Self {
        self.child_count = children;
        self.infant_count = infants;
        self.pet_count = pets;
        self
    }

    /// Sets the currency.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Sets the price ceiling for custom-filter flows.
    pub fn with_max_price(mut self, max_price: u32) -> Self {
        self.max_price = Some(max_price);
        self
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn enter_date(&self) -> NaiveDate {
        self.enter_date
    }

    pub fn exit_date(&self) -> NaiveDate {
        self.exit_date
    }

    pub fn adult_count(&self) -> u32 {
        self.adult_count
    }

    pub fn child_count(&self) -> u32 {
        self.child_count
    }

    pub fn infant_count(&self) -> u32 {
        self.infant_count
    }

    pub fn pet_count(&self) -> u32 {
        self.pet_count
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn max_price(&self) -> Option<u32> {
        self.max_price
    }
}

/// Per-flow accumulator of collected fields.
///
/// The conversation machine fills this one field at a time; `complete`
/// turns it into validated [`SearchCriteria`] once the flow confirms.
/// Setting one field never resets another.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaDraft {
    pub city: Option<String>,
    pub enter_date: Option<NaiveDate>,
    pub exit_date: Option<NaiveDate>,
    pub adult_count: Option<u32>,
    pub child_count: Option<u32>,
    pub infant_count: Option<u32>,
    pub pet_count: Option<u32>,
    pub currency: Option<Currency>,
    pub max_price: Option<u32>,
}

impl CriteriaDraft {
    /// Builds final criteria for the given command kind.
    ///
    /// # Errors
    ///
    /// - `EmptyField` for any required field not yet collected (including
    ///   `max_price` on custom flows)
    /// - invariant failures from [`SearchCriteria::new`]
    pub fn complete(&self, kind: CommandKind) -> Result<SearchCriteria, ValidationError> {
        let city = self
            .city
            .clone()
            .ok_or_else(|| ValidationError::empty_field("city"))?;
        let enter_date = self
            .enter_date
            .ok_or_else(|| ValidationError::empty_field("enter_date"))?;
        let exit_date = self
            .exit_date
            .ok_or_else(|| ValidationError::empty_field("exit_date"))?;
        let adults = self
            .adult_count
            .ok_or_else(|| ValidationError::empty_field("adults"))?;

        let mut criteria = SearchCriteria::new(city, enter_date, exit_date, adults)?
            .with_counts(
                self.child_count.unwrap_or(0),
                self.infant_count.unwrap_or(0),
                self.pet_count.unwrap_or(0),
            )
            .with_currency(self.currency.unwrap_or_default());

        if kind.is_custom() {
            let max_price = self
                .max_price
                .ok_or_else(|| ValidationError::empty_field("max_price"))?;
            criteria = criteria.with_max_price(max_price);
        }

        Ok(criteria)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn filled_draft() -> CriteriaDraft {
        CriteriaDraft {
            city: Some("Lisbon".to_string()),
            enter_date: Some(date(2026, 9, 1)),
            exit_date: Some(date(2026, 9, 8)),
            adult_count: Some(2),
            ..Default::default()
        }
    }

    #[test]
    fn new_criteria_defaults_optional_fields() {
        let criteria =
            SearchCriteria::new("Lisbon", date(2026, 9, 1), date(2026, 9, 8), 2).unwrap();
        assert_eq!(criteria.child_count(), 0);
        assert_eq!(criteria.infant_count(), 0);
        assert_eq!(criteria.pet_count(), 0);
        assert_eq!(criteria.currency(), Currency::USD);
        assert_eq!(criteria.max_price(), None);
    }

    #[test]
    fn rejects_blank_city() {
        let result = SearchCriteria::new("   ", date(2026, 9, 1), date(2026, 9, 8), 2);
        assert!(matches!(result, Err(ValidationError::EmptyField { .. })));
    }

    #[test]
    fn rejects_zero_adults() {
        let result = SearchCriteria::new("Lisbon", date(2026, 9, 1), date(2026, 9, 8), 0);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_unordered_dates() {
        let result = SearchCriteria::new("Lisbon", date(2026, 9, 8), date(2026, 9, 8), 2);
        assert!(result.is_err());
        let result = SearchCriteria::new("Lisbon", date(2026, 9, 9), date(2026, 9, 8), 2);
        assert!(result.is_err());
    }

    #[test]
    fn draft_completes_simple_flow_without_optionals() {
        let criteria = filled_draft().complete(CommandKind::LowPrice).unwrap();
        assert_eq!(criteria.city(), "Lisbon");
        assert_eq!(criteria.adult_count(), 2);
        assert_eq!(criteria.max_price(), None);
    }

    #[test]
    fn draft_requires_max_price_for_custom() {
        let result = filled_draft().complete(CommandKind::Custom);
        assert!(matches!(result, Err(ValidationError::EmptyField { field }) if field == "max_price"));
    }

    #[test]
    fn draft_carries_custom_fields_through() {
        let mut draft = filled_draft();
        draft.child_count = Some(1);
        draft.infant_count = Some(0);
        draft.pet_count = Some(2);
        draft.currency = Some(Currency::EUR);
        draft.max_price = Some(250);

        let criteria = draft.complete(CommandKind::Custom).unwrap();
        assert_eq!(criteria.child_count(), 1);
        assert_eq!(criteria.pet_count(), 2);
        assert_eq!(criteria.currency(), Currency::EUR);
        assert_eq!(criteria.max_price(), Some(250));
    }

    #[test]
    fn draft_reports_first_missing_required_field() {
        let result = CriteriaDraft::default().complete(CommandKind::LowPrice);
        assert!(matches!(result, Err(ValidationError::EmptyField { field }) if field == "city"));
    }

    #[test]
    fn currency_parses_only_enum_members() {
        assert_eq!("USD".parse::<Currency>().unwrap(), Currency::USD);
        assert_eq!("EUR".parse::<Currency>().unwrap(), Currency::EUR);
        assert_eq!("RUB".parse::<Currency>().unwrap(), Currency::RUB);
        assert!("usd".parse::<Currency>().is_err());
        assert!("GBP".parse::<Currency>().is_err());
    }
}
