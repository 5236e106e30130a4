use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};

use crate::i18n::Language;

/// Past this age an article shows its date instead of a relative time.
pub const RELATIVE_DAYS_LIMIT: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeTime {
    JustNow,
    Minutes(i64),
    Hours(i64),
    Days(i64),
    On(NaiveDate),
}

impl RelativeTime {
    pub fn between(then: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let gap = now.signed_duration_since(then);

        if gap < Duration::minutes(1) {
            RelativeTime::JustNow
        } else if gap < Duration::hours(1) {
            RelativeTime::Minutes(gap.num_minutes())
        } else if gap < Duration::days(1) {
            RelativeTime::Hours(gap.num_hours())
        } else if gap < Duration::days(RELATIVE_DAYS_LIMIT) {
            RelativeTime::Days(gap.num_days())
        } else {
            RelativeTime::On(then.date_naive())
        }
    }
}

/// Parses a backend timestamp. Accepts RFC 3339 and naive ISO-8601, the
/// latter read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Relative description of `raw` as seen from `now`. Missing or unparseable
/// timestamps render as an empty string.
pub fn describe(raw: Option<&str>, now: DateTime<Utc>, lang: Language) -> String {
    match raw.and_then(parse_timestamp) {
        Some(then) => lang.relative(&RelativeTime::between(then, now)),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calendar {
    Gregorian,
    Jalali,
}

const JALALI_MONTHS: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

impl Calendar {
    /// Formats a date with ASCII digits; callers localize digits.
    pub fn format(self, date: NaiveDate) -> String {
        match self {
            Calendar::Gregorian => date.format("%b %-d, %Y").to_string(),
            Calendar::Jalali => {
                let (y, m, d) = to_jalali(date);
                format!("{} {} {}", d, JALALI_MONTHS[(m - 1) as usize], y)
            }
        }
    }
}

/// Converts a Gregorian date to the Solar Hijri (Jalali) calendar as
/// `(year, month, day)`, months 1-based.
pub fn to_jalali(date: NaiveDate) -> (i32, u32, u32) {
    const MONTH_OFFSETS: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

    let gm = date.month() as i64;
    let gd = date.day() as i64;
    let (mut jy, gy) = if date.year() > 1600 {
        (979i64, date.year() as i64 - 1600)
    } else {
        (0i64, date.year() as i64 - 621)
    };
    let gy2 = if gm > 2 { gy + 1 } else { gy };

    let mut days = 365 * gy + (gy2 + 3) / 4 - (gy2 + 99) / 100 + (gy2 + 399) / 400 - 80
        + gd
        + MONTH_OFFSETS[(gm - 1) as usize];

    jy += 33 * (days / 12053);
    days %= 12053;
    jy += 4 * (days / 1461);
    days %= 1461;
    if days > 365 {
        jy += (days - 1) / 365;
        days = (days - 1) % 365;
    }

    let (jm, jd) = if days < 186 {
        (1 + days / 31, 1 + days % 31)
    } else {
        (7 + (days - 186) / 30, 1 + (days - 186) % 30)
    };

    (jy as i32, jm as u32, jd as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_now_is_just_now() {
        assert_eq!(RelativeTime::between(now(), now()), RelativeTime::JustNow);
        assert_eq!(
            RelativeTime::between(now() - Duration::seconds(59), now()),
            RelativeTime::JustNow
        );
    }

    #[test]
    fn test_future_timestamps_are_just_now() {
        assert_eq!(
            RelativeTime::between(now() + Duration::hours(2), now()),
            RelativeTime::JustNow
        );
    }

    #[test]
    fn test_units_grow_with_gap() {
        let cases = [
            (Duration::minutes(1), RelativeTime::Minutes(1)),
            (Duration::minutes(59), RelativeTime::Minutes(59)),
            (Duration::minutes(60), RelativeTime::Hours(1)),
            (Duration::hours(23), RelativeTime::Hours(23)),
            (Duration::hours(24), RelativeTime::Days(1)),
            (Duration::days(29), RelativeTime::Days(29)),
        ];
        for (gap, expected) in cases {
            assert_eq!(RelativeTime::between(now() - gap, now()), expected, "{gap:?}");
        }
    }

    #[test]
    fn test_old_articles_show_date() {
        let then = now() - Duration::days(45);
        assert_eq!(
            RelativeTime::between(then, now()),
            RelativeTime::On(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
        );
    }

    #[test]
    fn test_parse_rfc3339_and_naive() {
        let expected = Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-06-15T09:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-06-15T12:30:00+03:30"), Some(expected));
        assert_eq!(parse_timestamp("2024-06-15T09:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-06-15T09:00:00.000123"), Some(expected + Duration::microseconds(123)));
        assert_eq!(parse_timestamp("2024-06-15 09:00:00"), Some(expected));
    }

    #[test]
    fn test_invalid_timestamps_render_nothing() {
        assert_eq!(describe(None, now(), Language::En), "");
        assert_eq!(describe(Some(""), now(), Language::En), "");
        assert_eq!(describe(Some("yesterday-ish"), now(), Language::Fa), "");
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            describe(Some("2024-06-15T09:00:00"), now(), Language::En),
            "3 hours ago"
        );
        assert_eq!(
            describe(Some("2024-06-15T12:00:00Z"), now(), Language::En),
            "just now"
        );
    }

    #[test]
    fn test_jalali_new_year() {
        let nowruz = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        assert_eq!(to_jalali(nowruz), (1403, 1, 1));

        let nowruz = NaiveDate::from_ymd_opt(2021, 3, 21).unwrap();
        assert_eq!(to_jalali(nowruz), (1400, 1, 1));
    }

    #[test]
    fn test_jalali_month_boundaries() {
        // Last day of the 31-day months
        let d = NaiveDate::from_ymd_opt(2024, 9, 21).unwrap();
        assert_eq!(to_jalali(d), (1403, 6, 31));
        let d = NaiveDate::from_ymd_opt(2024, 9, 22).unwrap();
        assert_eq!(to_jalali(d), (1403, 7, 1));
    }

    #[test]
    fn test_calendar_format() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        assert_eq!(Calendar::Gregorian.format(d), "Mar 20, 2024");
        assert_eq!(Calendar::Jalali.format(d), "1 فروردین 1403");

        let d = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(Calendar::Gregorian.format(d), "Dec 31, 2024");
        assert_eq!(Calendar::Jalali.format(d), "11 دی 1403");
    }
}
