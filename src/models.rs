use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, Row};

/// Longest industry description accepted at the HTTP edge, in characters.
pub const MAX_INDUSTRY_DESCRIPTION_CHARS: usize = 200;

/// Base of the public Companies House profile URL.
pub const COMPANIES_HOUSE_COMPANY_URL: &str =
    "https://find-and-update.company-information.service.gov.uk/company";

// ============ Query ============

/// Whether to return a bounded random sample or every eligible company.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    Sample,
    Full,
}

/// A validated request for the companies of one industry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndustryQuery {
    /// SIC description, matched exactly against the four SIC text columns.
    pub description: String,
    pub mode: QueryMode,
}

impl IndustryQuery {
    pub fn new(description: impl Into<String>, sample: bool) -> Self {
        Self {
            description: description.into(),
            mode: if sample {
                QueryMode::Sample
            } else {
                QueryMode::Full
            },
        }
    }

    /// Validates a raw description from a request and builds the query.
    ///
    /// The description must hold between 1 and
    /// [`MAX_INDUSTRY_DESCRIPTION_CHARS`] characters.
    pub fn parse(description: &str, mode: QueryMode) -> Result<Self, AppError> {
        let length = description.chars().count();
        if length == 0 || length > MAX_INDUSTRY_DESCRIPTION_CHARS {
            return Err(AppError::BadRequest(format!(
                "Invalid industry: {}",
                description
            )));
        }

        Ok(Self {
            description: description.to_string(),
            mode,
        })
    }

    pub fn is_sample(&self) -> bool {
        self.mode == QueryMode::Sample
    }
}

/// JSON body of the company routes.
#[derive(Debug, Deserialize)]
pub struct IndustryRequestBody {
    #[serde(rename = "SicDescription", alias = "sicDescription", default)]
    pub sic_description: String,
}

/// Query string of the company routes.
#[derive(Debug, Deserialize)]
pub struct IndustryQueryParams {
    #[serde(rename = "sicDescription", alias = "SicDescription", default)]
    pub sic_description: String,
}

// ============ Raw registry rows ============

/// One row of the company selection, decoded positionally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCompanyRow {
    pub company_name: String,
    pub company_number: String,
    pub address_line_1: Option<String>,
    pub address_line_2: Option<String>,
    pub post_town: Option<String>,
    pub post_code: Option<String>,
    pub incorporation_date: String,
    pub account_category: Option<String>,
    /// Mortgage counters are stored as text in the registry import.
    pub mortgage_charges: String,
    pub mortgages_outstanding: String,
    pub mortgages_part_satisfied: String,
    pub mortgages_satisfied: String,
    pub last_accounts_date: String,
    pub next_accounts_date: String,
}

impl RawCompanyRow {
    /// Decodes the columns in the order of the company selection SELECT.
    pub fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            company_name: row.try_get(0)?,
            company_number: row.try_get(1)?,
            address_line_1: row.try_get(2)?,
            address_line_2: row.try_get(3)?,
            post_town: row.try_get(4)?,
            post_code: row.try_get(5)?,
            incorporation_date: row.try_get(6)?,
            account_category: row.try_get(7)?,
            mortgage_charges: row.try_get(8)?,
            mortgages_outstanding: row.try_get(9)?,
            mortgages_part_satisfied: row.try_get(10)?,
            mortgages_satisfied: row.try_get(11)?,
            last_accounts_date: row.try_get(12)?,
            next_accounts_date: row.try_get(13)?,
        })
    }
}

/// One active PSC of a selected company, decoded positionally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPscRow {
    pub company_number: String,
    pub premises: Option<String>,
    pub address_line_1: Option<String>,
    pub address_line_2: Option<String>,
    pub locality: Option<String>,
    pub postal_code: Option<String>,
    pub country_of_residence: Option<String>,
    pub birth_month: Option<String>,
    pub birth_year: Option<String>,
    pub kind: String,
    pub name: Option<String>,
    pub nationality: Option<String>,
    pub nature_of_control: Option<String>,
    pub notified_on: Option<String>,
}

impl RawPscRow {
    /// Decodes the columns in the order of the staged PSC SELECT.
    pub fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            company_number: row.try_get(0)?,
            premises: row.try_get(1)?,
            address_line_1: row.try_get(2)?,
            address_line_2: row.try_get(3)?,
            locality: row.try_get(4)?,
            postal_code: row.try_get(5)?,
            country_of_residence: row.try_get(6)?,
            birth_month: row.try_get(7)?,
            birth_year: row.try_get(8)?,
            kind: row.try_get(9)?,
            name: row.try_get(10)?,
            nationality: row.try_get(11)?,
            nature_of_control: row.try_get(12)?,
            notified_on: row.try_get(13)?,
        })
    }
}

// ============ Derived records ============

/// A company as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRecord {
    pub name: String,
    pub company_number: String,
    pub companies_house_url: String,
    pub address: String,
    pub size: String,
    pub incorporation_date: String,
    pub mortgage_charges: i64,
    pub mortgages_outstanding: i64,
    pub mortgages_part_satisfied: i64,
    pub mortgages_satisfied: i64,
    pub last_accounts_date: String,
    pub next_accounts_date: String,
}

/// A person with significant control over a returned company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    /// Joins to [`CompanyRecord::company_number`].
    pub company_number: String,
    pub name: String,
    pub address: String,
    pub nationality: String,
    pub notified_on: String,
    #[serde(rename = "type")]
    pub person_type: String,
    pub nature_of_control: Option<String>,
    /// Approximate age; absent unless both birth month and year are known.
    pub age: Option<i32>,
}

/// Companies of an industry and their PSCs, as two flat lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompaniesAndOwnership {
    pub companies: Vec<CompanyRecord>,
    #[serde(rename = "personsWithSignificantControl")]
    pub persons: Vec<PersonRecord>,
}
