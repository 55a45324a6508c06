//! Lists the account categories present in the registry and reports the ones
//! the size classifier does not know.

use company_data_api::config::Config;
use company_data_api::db::RegistryDatabase;
use company_data_api::query_builder::COMPANY_TABLE;
use company_data_api::size_classifier::rank_of;
use sqlx::Connection;

/// Main entry point for the category audit.
///
/// Exits with an error when any category would fail classification, so the
/// tool can gate a registry snapshot import.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let mut conn = RegistryDatabase::new(config.database).connect().await?;

    tracing::info!("Connected to database. Auditing account categories...");

    let sql = format!(
        r#"SELECT "Accounts.AccountCategory", COUNT(*)
        FROM "{}"
        WHERE "CompanyStatus" = 'Active'
        GROUP BY 1
        ORDER BY 2 DESC"#,
        COMPANY_TABLE
    );
    let categories: Vec<(Option<String>, i64)> =
        sqlx::query_as(&sql).fetch_all(&mut conn).await?;

    let mut unknown = 0;
    for (category, count) in &categories {
        match category.as_deref().map(|c| (c, rank_of(c))) {
            Some((c, Some(rank))) => println!("  {:<32} {:>9}  {}", c, count, rank.label()),
            Some((c, None)) => {
                unknown += 1;
                println!("  {:<32} {:>9}  UNKNOWN", c, count);
            }
            None => {
                unknown += 1;
                println!("  {:<32} {:>9}  MISSING", "(null)", count);
            }
        }
    }

    conn.close().await?;

    if unknown > 0 {
        anyhow::bail!("{} account categories cannot be classified", unknown);
    }

    tracing::info!(
        "Audit complete. All {} account categories are classified.",
        categories.len()
    );
    Ok(())
}
