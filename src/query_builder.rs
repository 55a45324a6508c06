//! SQL for selecting the companies of one industry.
//!
//! The eligibility predicate is fixed text. The only parts that vary are the
//! three sampling slots, which are filled together in sample mode and left
//! empty in full mode. The industry description is always bound as `$1`.

use crate::models::QueryMode;

/// Companies House company snapshot.
pub const COMPANY_TABLE: &str = "ch_company_2023_05_01";
/// Companies House PSC snapshot.
pub const PSC_TABLE: &str = "ch_psc_2023_05_03";
/// Per-connection temporary table holding the selected companies.
pub const STAGED_TABLE: &str = "selected_companies";

pub const SAMPLE_TABLESAMPLE: &str = "TABLESAMPLE SYSTEM (10)";
pub const SAMPLE_ORDER_BY: &str = "ORDER BY RANDOM()";
pub const SAMPLE_LIMIT: &str = "LIMIT 10";

/// Column order must match `RawCompanyRow::from_row`.
const COMPANY_COLUMNS: &str = r#"co."CompanyName",
    co."CompanyNumber",
    co."RegAddress.AddressLine1",
    co."RegAddress.AddressLine2",
    co."RegAddress.PostTown",
    co."RegAddress.PostCode",
    co."IncorporationDate",
    co."Accounts.AccountCategory",
    co."Mortgages.NumMortCharges",
    co."Mortgages.NumMortOutstanding",
    co."Mortgages.NumMortPartSatisfied",
    co."Mortgages.NumMortSatisfied",
    co."Accounts.LastMadeUpDate",
    co."Accounts.NextDueDate""#;

/// Industry match on any of the four SIC text columns, active status, and
/// a category outside rank 0 of the size table.
pub const ELIGIBILITY_PREDICATE: &str = r#"$1 IN (
        co."SICCode.SicText_1", co."SICCode.SicText_2", co."SICCode.SicText_3", co."SICCode.SicText_4"
    )
    AND co."CompanyStatus" = 'Active'
    AND co."Accounts.AccountCategory" NOT IN ('ACCOUNTS TYPE NOT AVAILABLE', 'DORMANT', 'NO ACCOUNTS FILED')"#;

/// The three optional clauses that turn a full scan into a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingClauses {
    pub table_sample: &'static str,
    pub order_by: &'static str,
    pub limit: &'static str,
}

impl SamplingClauses {
    pub fn for_mode(mode: QueryMode) -> Self {
        match mode {
            QueryMode::Sample => Self {
                table_sample: SAMPLE_TABLESAMPLE,
                order_by: SAMPLE_ORDER_BY,
                limit: SAMPLE_LIMIT,
            },
            QueryMode::Full => Self {
                table_sample: "",
                order_by: "",
                limit: "",
            },
        }
    }
}

/// SELECT returning one raw company row per eligible company.
pub fn company_selection_sql(mode: QueryMode) -> String {
    let clauses = SamplingClauses::for_mode(mode);

    format!(
        "SELECT\n    {columns}\nFROM \"{table}\" co\n{table_sample}\nWHERE\n    {predicate}\n{order_by}\n{limit}",
        columns = COMPANY_COLUMNS,
        table = COMPANY_TABLE,
        table_sample = clauses.table_sample,
        predicate = ELIGIBILITY_PREDICATE,
        order_by = clauses.order_by,
        limit = clauses.limit,
    )
}

/// Stores the selection in [`STAGED_TABLE`] so PSC rows can be joined to it.
pub fn staged_company_selection_sql(mode: QueryMode) -> String {
    format!(
        "CREATE TEMPORARY TABLE {} AS\n{}",
        STAGED_TABLE,
        company_selection_sql(mode)
    )
}

/// Drops a staged selection left on a reused connection.
pub fn drop_staged_companies_sql() -> String {
    format!("DROP TABLE IF EXISTS pg_temp.{}", STAGED_TABLE)
}

/// Reads the staged selection back, in the column order of the SELECT.
pub fn select_staged_companies_sql() -> String {
    format!("SELECT * FROM {}", STAGED_TABLE)
}

/// Column order must match `RawPscRow::from_row`.
const PSC_COLUMNS: &str = r#"psc.company_number,
    psc."data.address.premises",
    psc."data.address.address_line_1",
    psc."data.address.address_line_2",
    psc."data.address.locality",
    psc."data.address.postal_code",
    psc."data.country_of_residence",
    psc."data.date_of_birth.month",
    psc."data.date_of_birth.year",
    psc."data.kind",
    psc."data.name",
    psc."data.nationality",
    psc."data.natures_of_control.0",
    psc."data.notified_on""#;

/// Active PSCs of the staged companies.
pub fn select_staged_pscs_sql() -> String {
    format!(
        "SELECT\n    {columns}\nFROM \"{psc_table}\" psc\nJOIN {staged} sc ON psc.company_number = sc.\"CompanyNumber\"\nWHERE\n    psc.\"data.ceased\" IS NULL\n    AND psc.\"data.ceased_on\" IS NULL",
        columns = PSC_COLUMNS,
        psc_table = PSC_TABLE,
        staged = STAGED_TABLE,
    )
}
