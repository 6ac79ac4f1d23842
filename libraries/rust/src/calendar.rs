use chrono::{Datelike, Duration, FixedOffset, NaiveDate, Utc, Weekday};

const KST_OFFSET_SECONDS: i32 = 9 * 60 * 60;

/// Today's date on the exchange (KST, UTC+9).
pub fn today() -> NaiveDate {
    match FixedOffset::east_opt(KST_OFFSET_SECONDS) {
        Some(kst) => Utc::now().with_timezone(&kst).date_naive(),
        None => Utc::now().date_naive(),
    }
}

/// Steps back over weekends. Exchange holidays are not known here.
pub fn latest_weekday(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date - Duration::days(1),
        Weekday::Sun => date - Duration::days(2),
        _ => date,
    }
}

/// January 1st of the year `date` falls in.
pub fn start_of_year(date: NaiveDate) -> NaiveDate {
    date.with_ordinal(1).unwrap_or(date)
}
