//! Company & ownership enrichment pipeline.
//!
//! A request moves through fixed stages:
//!
//! 1. Building the query for the requested mode.
//! 2. Executing it: one SELECT for the companies-only variant, or a staged
//!    selection in a temporary table followed by reads of the companies and
//!    of their PSCs.
//! 3. Mapping every fetched row into a client record.
//!
//! The first failure ends the request. Nothing is retried and no partial
//! result is returned. The connection belongs to the request and is closed
//! on every exit path.

use crate::db::RegistryDatabase;
use crate::errors::PipelineError;
use crate::mappers::{map_company_row, map_psc_row};
use crate::models::{
    CompaniesAndOwnership, CompanyRecord, IndustryQuery, PersonRecord, RawCompanyRow, RawPscRow,
};
use crate::query_builder::{
    company_selection_sql, drop_staged_companies_sql, select_staged_companies_sql,
    select_staged_pscs_sql, staged_company_selection_sql,
};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::postgres::{PgConnection, PgRow};
use sqlx::Connection;

/// Read access to the company registry, as used by the HTTP handlers.
#[async_trait]
pub trait CompanyRegistry: Send + Sync {
    /// Companies of one industry, without ownership data.
    async fn companies_for_industry(
        &self,
        query: &IndustryQuery,
    ) -> Result<Vec<CompanyRecord>, PipelineError>;

    /// Companies of one industry and their active PSCs.
    async fn companies_and_ownership_for_industry(
        &self,
        query: &IndustryQuery,
    ) -> Result<CompaniesAndOwnership, PipelineError>;
}

/// Registry backed by PostgreSQL, one connection per call.
pub struct EnrichmentPipeline {
    database: RegistryDatabase,
}

impl EnrichmentPipeline {
    pub fn new(database: RegistryDatabase) -> Self {
        Self { database }
    }
}

#[async_trait]
impl CompanyRegistry for EnrichmentPipeline {
    async fn companies_for_industry(
        &self,
        query: &IndustryQuery,
    ) -> Result<Vec<CompanyRecord>, PipelineError> {
        let mut conn = self.database.connect().await?;
        let result = fetch_companies(&mut conn, query).await;
        release(conn).await;
        result
    }

    async fn companies_and_ownership_for_industry(
        &self,
        query: &IndustryQuery,
    ) -> Result<CompaniesAndOwnership, PipelineError> {
        let mut conn = self.database.connect().await?;
        let today = Utc::now().date_naive();
        let result = fetch_companies_and_ownership(&mut conn, query, today).await;
        release(conn).await;
        result
    }
}

async fn release(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        tracing::warn!("Error closing database connection: {}", e);
    }
}

/// Runs the companies-only variant on an open connection.
pub async fn fetch_companies(
    conn: &mut PgConnection,
    query: &IndustryQuery,
) -> Result<Vec<CompanyRecord>, PipelineError> {
    tracing::debug!("Building company query (mode: {:?})", query.mode);
    let sql = company_selection_sql(query.mode);

    tracing::debug!("Executing company query for sic \"{}\"", query.description);
    let rows = sqlx::query(&sql)
        .bind(&query.description)
        .fetch_all(&mut *conn)
        .await
        .map_err(|source| PipelineError::QueryExecution {
            stage: "selecting companies",
            source,
        })?;

    tracing::debug!("Mapping {} company rows", rows.len());
    map_company_rows(&rows)
}

/// Runs the staged companies + PSC variant on an open connection.
///
/// The selection is kept in a temporary table so the PSC query joins exactly
/// the companies returned, which matters for random samples. The table lives
/// only as long as the connection. `today` is the reference date for ages.
pub async fn fetch_companies_and_ownership(
    conn: &mut PgConnection,
    query: &IndustryQuery,
    today: NaiveDate,
) -> Result<CompaniesAndOwnership, PipelineError> {
    tracing::debug!("Building staged company query (mode: {:?})", query.mode);
    let staging_sql = staged_company_selection_sql(query.mode);

    tracing::debug!("Staging companies for sic \"{}\"", query.description);
    sqlx::query(&drop_staged_companies_sql())
        .execute(&mut *conn)
        .await
        .map_err(|source| PipelineError::QueryExecution {
            stage: "clearing staged companies",
            source,
        })?;
    sqlx::query(&staging_sql)
        .bind(&query.description)
        .execute(&mut *conn)
        .await
        .map_err(|source| PipelineError::QueryExecution {
            stage: "staging companies",
            source,
        })?;

    let company_rows = sqlx::query(&select_staged_companies_sql())
        .fetch_all(&mut *conn)
        .await
        .map_err(|source| PipelineError::QueryExecution {
            stage: "reading staged companies",
            source,
        })?;
    let psc_rows = sqlx::query(&select_staged_pscs_sql())
        .fetch_all(&mut *conn)
        .await
        .map_err(|source| PipelineError::QueryExecution {
            stage: "reading PSCs",
            source,
        })?;

    tracing::debug!(
        "Mapping {} company rows and {} PSC rows",
        company_rows.len(),
        psc_rows.len()
    );
    Ok(CompaniesAndOwnership {
        companies: map_company_rows(&company_rows)?,
        persons: map_psc_rows(&psc_rows, today)?,
    })
}

fn map_company_rows(rows: &[PgRow]) -> Result<Vec<CompanyRecord>, PipelineError> {
    rows.iter()
        .map(|row| {
            let raw = RawCompanyRow::from_row(row).map_err(|source| {
                PipelineError::RowDecoding {
                    stage: "company",
                    source,
                }
            })?;
            map_company_row(raw)
        })
        .collect()
}

fn map_psc_rows(rows: &[PgRow], today: NaiveDate) -> Result<Vec<PersonRecord>, PipelineError> {
    rows.iter()
        .map(|row| {
            let raw = RawPscRow::from_row(row).map_err(|source| PipelineError::RowDecoding {
                stage: "PSC",
                source,
            })?;
            map_psc_row(raw, today)
        })
        .collect()
}
