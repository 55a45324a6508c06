//! Raw registry rows -> records returned to clients.
//!
//! Mapping is all-or-nothing: a field that cannot be interpreted fails the
//! row, and the pipeline fails the request. Nothing is defaulted to zero.

use crate::address::normalize_address;
use crate::age::age_from_partial_birth_date;
use crate::errors::PipelineError;
use crate::models::{
    CompanyRecord, PersonRecord, RawCompanyRow, RawPscRow, COMPANIES_HOUSE_COMPANY_URL,
};
use crate::person_kind::person_type;
use crate::size_classifier::classify;
use chrono::{Datelike, NaiveDate};
use std::fmt::Display;
use std::str::FromStr;

/// Birth years before this are treated as corrupt registry data.
pub const EARLIEST_BIRTH_YEAR: i32 = 1800;

/// Builds the [`CompanyRecord`] for one selected company.
pub fn map_company_row(row: RawCompanyRow) -> Result<CompanyRecord, PipelineError> {
    let category = row.account_category.as_deref().ok_or_else(|| {
        PipelineError::MissingAccountCategory {
            company_number: row.company_number.clone(),
        }
    })?;
    let size = classify(&row.company_number, category)?;

    let address = normalize_address(&[
        row.address_line_1.as_deref(),
        row.address_line_2.as_deref(),
        row.post_town.as_deref(),
        row.post_code.as_deref(),
    ]);

    Ok(CompanyRecord {
        companies_house_url: companies_house_url(&row.company_number),
        address,
        size: size.label().to_string(),
        mortgage_charges: parse_number("mortgage charges", &row.mortgage_charges)?,
        mortgages_outstanding: parse_number("mortgages outstanding", &row.mortgages_outstanding)?,
        mortgages_part_satisfied: parse_number(
            "mortgages part satisfied",
            &row.mortgages_part_satisfied,
        )?,
        mortgages_satisfied: parse_number("mortgages satisfied", &row.mortgages_satisfied)?,
        name: row.company_name,
        company_number: row.company_number,
        incorporation_date: row.incorporation_date,
        last_accounts_date: row.last_accounts_date,
        next_accounts_date: row.next_accounts_date,
    })
}

/// Builds the [`PersonRecord`] for one PSC, deriving the age as of `today`.
pub fn map_psc_row(row: RawPscRow, today: NaiveDate) -> Result<PersonRecord, PipelineError> {
    let birth_month = parse_optional_number::<u32>("birth month", row.birth_month.as_deref())?;
    if let Some(month) = birth_month {
        if !(1..=12).contains(&month) {
            return Err(PipelineError::MalformedField {
                field: "birth month",
                value: month.to_string(),
                reason: "month must be between 1 and 12".to_string(),
            });
        }
    }
    let birth_year = parse_optional_number::<i32>("birth year", row.birth_year.as_deref())?;
    if let Some(year) = birth_year {
        if !(EARLIEST_BIRTH_YEAR..=today.year()).contains(&year) {
            return Err(PipelineError::MalformedField {
                field: "birth year",
                value: year.to_string(),
                reason: format!(
                    "year must be between {} and {}",
                    EARLIEST_BIRTH_YEAR,
                    today.year()
                ),
            });
        }
    }

    let person_type = person_type(&row.company_number, &row.kind)?;

    let address = normalize_address(&[
        row.premises.as_deref(),
        row.address_line_1.as_deref(),
        row.address_line_2.as_deref(),
        row.locality.as_deref(),
        row.postal_code.as_deref(),
        row.country_of_residence.as_deref(),
    ]);

    Ok(PersonRecord {
        company_number: row.company_number,
        name: row.name.unwrap_or_default(),
        address,
        nationality: row.nationality.unwrap_or_default(),
        notified_on: row.notified_on.unwrap_or_default(),
        person_type: person_type.to_string(),
        nature_of_control: row.nature_of_control,
        age: age_from_partial_birth_date(birth_month, birth_year, today),
    })
}

/// Public Companies House profile page of a company.
pub fn companies_house_url(company_number: &str) -> String {
    format!("{}/{}", COMPANIES_HOUSE_COMPANY_URL, company_number)
}

fn parse_number<T>(field: &'static str, value: &str) -> Result<T, PipelineError>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| PipelineError::MalformedField {
            field,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Blank text counts as absent.
fn parse_optional_number<T>(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<T>, PipelineError>
where
    T: FromStr,
    T::Err: Display,
{
    match value.filter(|v| !v.trim().is_empty()) {
        Some(v) => parse_number(field, v).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_trims() {
        assert_eq!(parse_number::<i64>("mortgage charges", " 3 ").unwrap(), 3);
    }

    #[test]
    fn test_parse_number_rejects_empty() {
        assert!(matches!(
            parse_number::<i64>("mortgage charges", ""),
            Err(PipelineError::MalformedField {
                field: "mortgage charges",
                ..
            })
        ));
    }

    #[test]
    fn test_parse_optional_number_blank_is_absent() {
        assert_eq!(parse_optional_number::<u32>("birth month", Some("  ")).unwrap(), None);
        assert_eq!(parse_optional_number::<u32>("birth month", None).unwrap(), None);
        assert_eq!(parse_optional_number::<u32>("birth month", Some("11")).unwrap(), Some(11));
    }

    #[test]
    fn test_companies_house_url() {
        assert_eq!(
            companies_house_url("SC123456"),
            "https://find-and-update.company-information.service.gov.uk/company/SC123456"
        );
    }
}
