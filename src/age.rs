use chrono::{Datelike, NaiveDate};

/// Approximate age in whole years from a birth month and year.
///
/// The registry only publishes month and year of birth, so the day of the
/// month is ignored: someone born in June counts as having had their birthday
/// on any day of June. Returns `None` unless both parts are known, or when
/// the year is too far out for the difference to fit in an `i32`.
pub fn age_from_partial_birth_date(
    birth_month: Option<u32>,
    birth_year: Option<i32>,
    today: NaiveDate,
) -> Option<i32> {
    let (month, year) = (birth_month?, birth_year?);

    let age = today.year().checked_sub(year)?;
    if today.month() < month {
        return age.checked_sub(1);
    }

    Some(age)
}
