//! Company size classification from the filed account category.
//!
//! Companies House records the type of accounts each company last filed. The
//! filing type follows the statutory size thresholds, so it is the best size
//! signal the registry exposes:
//!
//! - Micro entity: turnover up to £632k, balance sheet up to £316k, up to 10
//!   employees (two of three must apply).
//! - Small (and the abridged / total exemption variants): turnover up to
//!   £10.2m, balance sheet up to £5.1m, up to 50 employees.
//! - Full: above the small thresholds. Group accounts cover a parent and
//!   its subsidiaries.
//! - Dormant / no accounts: not trading, or nothing filed yet.
//!
//! Classification goes raw category -> [`SizeRank`] -> label. The tables are
//! fixed; a category outside them is a data-quality error and is never
//! defaulted.

use crate::errors::PipelineError;
use std::fmt;

/// Ordinal size tier. Rank 0 is "no accounts available / dormant".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SizeRank(u8);

impl SizeRank {
    pub const NO_ACCOUNTS: SizeRank = SizeRank(0);
    pub const MICRO: SizeRank = SizeRank(1);
    pub const SMALL: SizeRank = SizeRank(2);
    pub const MEDIUM: SizeRank = SizeRank(3);
    pub const LARGE: SizeRank = SizeRank(4);
    pub const VERY_LARGE: SizeRank = SizeRank(5);

    /// Human-readable size label for this rank.
    pub fn label(self) -> &'static str {
        RANK_LABELS[self.0 as usize]
    }
}

impl fmt::Display for SizeRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rank -> label, indexed by rank value.
const RANK_LABELS: [&str; 6] = [
    "no accounts available / dormant",
    "micro",
    "small",
    "medium",
    "large",
    "very large",
];

/// Every account category the registry uses, with its rank.
pub const ACCOUNT_CATEGORY_RANKS: &[(&str, SizeRank)] = &[
    ("ACCOUNTS TYPE NOT AVAILABLE", SizeRank::NO_ACCOUNTS),
    ("DORMANT", SizeRank::NO_ACCOUNTS),
    ("NO ACCOUNTS FILED", SizeRank::NO_ACCOUNTS),
    ("MICRO ENTITY", SizeRank::MICRO),
    ("SMALL", SizeRank::SMALL),
    ("TOTAL EXEMPTION SMALL", SizeRank::SMALL),
    ("TOTAL EXEMPTION FULL", SizeRank::SMALL),
    ("UNAUDITED ABRIDGED", SizeRank::SMALL),
    ("PARTIAL EXEMPTION", SizeRank::SMALL),
    ("INITIAL", SizeRank::SMALL),
    ("MEDIUM", SizeRank::MEDIUM),
    ("AUDITED ABRIDGED", SizeRank::MEDIUM),
    ("FULL", SizeRank::LARGE),
    ("AUDIT EXEMPTION SUBSIDIARY", SizeRank::LARGE),
    ("FILING EXEMPTION SUBSIDIARY", SizeRank::LARGE),
    ("GROUP", SizeRank::VERY_LARGE),
];

/// Looks up the rank of a known account category.
///
/// Surrounding whitespace is ignored; case is not.
pub fn rank_of(category: &str) -> Option<SizeRank> {
    let category = category.trim();
    ACCOUNT_CATEGORY_RANKS
        .iter()
        .find(|(known, _)| *known == category)
        .map(|(_, rank)| *rank)
}

/// Classifies the account category filed by `company_number`.
///
/// # Errors
///
/// [`PipelineError::UnknownAccountCategory`] when the category is not in
/// [`ACCOUNT_CATEGORY_RANKS`].
pub fn classify(company_number: &str, category: &str) -> Result<SizeRank, PipelineError> {
    rank_of(category).ok_or_else(|| PipelineError::UnknownAccountCategory {
        company_number: company_number.to_string(),
        category: category.to_string(),
    })
}

/// Categories that mean the company has no usable accounts (rank 0).
pub fn no_accounts_categories() -> impl Iterator<Item = &'static str> {
    ACCOUNT_CATEGORY_RANKS
        .iter()
        .filter(|(_, rank)| *rank == SizeRank::NO_ACCOUNTS)
        .map(|(category, _)| *category)
}
