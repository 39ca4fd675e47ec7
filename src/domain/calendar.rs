// Calendar convention used to turn timestamps into bucket keys and labels
use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};
use serde::{Deserialize, Serialize};

/// Label used for points whose timestamp cannot be parsed.
pub const INVALID_DATE_LABEL: &str = "Invalid Date";

/// Offset-less date-time shapes, tried in order.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Largest accepted distance from UTC, in minutes.
pub const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// Locale that decides label order, weekday names and KPI wording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Locale {
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "en-US")]
    EnUs,
}

/// Localized KPI wording
#[derive(Debug, Clone, Copy)]
pub struct KpiLabels {
    pub average: &'static str,
    pub max: &'static str,
    pub min: &'static str,
    pub variation: &'static str,
    pub no_data: &'static str,
}

impl Locale {
    /// Abbreviated weekday names, Sunday first
    fn weekdays(&self) -> [&'static str; 7] {
        match self {
            Self::PtBr => ["dom.", "seg.", "ter.", "qua.", "qui.", "sex.", "sáb."],
            Self::EnUs => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
        }
    }

    fn day_format(&self) -> &'static str {
        match self {
            Self::PtBr => "%d/%m",
            Self::EnUs => "%m/%d",
        }
    }

    fn tick_format(&self) -> &'static str {
        match self {
            Self::PtBr => "%d/%m %H:%M",
            Self::EnUs => "%m/%d %H:%M",
        }
    }

    pub fn kpi_labels(&self) -> KpiLabels {
        match self {
            Self::PtBr => KpiLabels {
                average: "Média",
                max: "Máximo",
                min: "Mínimo",
                variation: "Variação %",
                no_data: "Sem dados",
            },
            Self::EnUs => KpiLabels {
                average: "Average",
                max: "Max",
                min: "Min",
                variation: "Variation %",
                no_data: "No data",
            },
        }
    }
}

/// Fixed locale and UTC offset. Bucket keys never depend on the host's
/// locale or time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalendarConvention {
    pub locale: Locale,
    pub utc_offset_minutes: i32,
}

impl CalendarConvention {
    pub fn new(locale: Locale, utc_offset_minutes: i32) -> Self {
        Self {
            locale,
            utc_offset_minutes,
        }
    }

    /// Zone used for offset-less timestamps and for rendering labels.
    /// Out-of-range offsets fall back to UTC; configuration rejects them earlier.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    /// Parse an ISO-8601 timestamp into an instant.
    ///
    /// - RFC 3339 with `Z` or an explicit offset is absolute
    /// - `YYYY-MM-DDTHH:MM[:SS[.fff]]` is wall-clock time in this convention's zone
    /// - `YYYY-MM-DD` is midnight UTC
    pub fn parse_timestamp(&self, raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();

        if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
            return Some(instant.with_timezone(&Utc));
        }

        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return self
                    .offset()
                    .from_local_datetime(&naive)
                    .single()
                    .map(|local| local.with_timezone(&Utc));
            }
        }

        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// Epoch milliseconds, `None` when the timestamp is unparseable
    pub fn epoch_millis(&self, raw: &str) -> Option<i64> {
        self.parse_timestamp(raw).map(|instant| instant.timestamp_millis())
    }

    fn local(&self, raw: &str) -> Option<DateTime<FixedOffset>> {
        self.parse_timestamp(raw)
            .map(|instant| instant.with_timezone(&self.offset()))
    }

    /// Two-digit day and month in locale order, no year ("05/03")
    pub fn day_label(&self, raw: &str) -> String {
        self.local(raw)
            .map(|local| local.format(self.locale.day_format()).to_string())
            .unwrap_or_else(|| INVALID_DATE_LABEL.to_string())
    }

    /// Abbreviated weekday name ("seg.")
    pub fn weekday_label(&self, raw: &str) -> String {
        self.local(raw)
            .map(|local| {
                let index = local.weekday().num_days_from_sunday() as usize;
                self.locale.weekdays()[index].to_string()
            })
            .unwrap_or_else(|| INVALID_DATE_LABEL.to_string())
    }

    /// Day, month, hour and minute for time-series axis ticks ("05/03 14:00")
    pub fn tick_label(&self, raw: &str) -> String {
        self.local(raw)
            .map(|local| local.format(self.locale.tick_format()).to_string())
            .unwrap_or_else(|| INVALID_DATE_LABEL.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let calendar = CalendarConvention::default();
        let millis = calendar.epoch_millis("2024-01-01T03:00:00-03:00");
        assert_eq!(millis, calendar.epoch_millis("2024-01-01T06:00:00Z"));
        assert!(millis.is_some());
    }

    #[test]
    fn test_parse_naive_uses_convention_offset() {
        let utc = CalendarConvention::default();
        let sao_paulo = CalendarConvention::new(Locale::PtBr, -180);

        let naive = "2024-01-01T00:00";
        let utc_millis = utc.epoch_millis(naive).unwrap();
        let local_millis = sao_paulo.epoch_millis(naive).unwrap();

        assert_eq!(local_millis - utc_millis, 3 * 3_600_000);
    }

    #[test]
    fn test_parse_date_only_is_utc_midnight() {
        let calendar = CalendarConvention::new(Locale::PtBr, -180);
        assert_eq!(
            calendar.epoch_millis("2024-01-01"),
            calendar.epoch_millis("2024-01-01T00:00:00Z")
        );
    }

    #[test]
    fn test_parse_invalid() {
        let calendar = CalendarConvention::default();
        assert_eq!(calendar.epoch_millis("not a date"), None);
        assert_eq!(calendar.epoch_millis(""), None);
        assert_eq!(calendar.epoch_millis("2024-13-45T00:00"), None);
    }

    #[test]
    fn test_day_label_locale_order() {
        let pt = CalendarConvention::default();
        let en = CalendarConvention::new(Locale::EnUs, 0);

        assert_eq!(pt.day_label("2024-03-05T10:00:00Z"), "05/03");
        assert_eq!(en.day_label("2024-03-05T10:00:00Z"), "03/05");
    }

    #[test]
    fn test_day_label_shifts_with_offset() {
        let sao_paulo = CalendarConvention::new(Locale::PtBr, -180);
        assert_eq!(sao_paulo.day_label("2024-03-05T01:00:00Z"), "04/03");
    }

    #[test]
    fn test_weekday_label() {
        let pt = CalendarConvention::default();
        let en = CalendarConvention::new(Locale::EnUs, 0);

        // 2024-01-01 was a Monday
        assert_eq!(pt.weekday_label("2024-01-01T12:00:00Z"), "seg.");
        assert_eq!(pt.weekday_label("2024-01-06T12:00:00Z"), "sáb.");
        assert_eq!(en.weekday_label("2024-01-07T12:00:00Z"), "Sun");
    }

    #[test]
    fn test_invalid_labels() {
        let calendar = CalendarConvention::default();
        assert_eq!(calendar.day_label("garbage"), INVALID_DATE_LABEL);
        assert_eq!(calendar.weekday_label("garbage"), INVALID_DATE_LABEL);
        assert_eq!(calendar.tick_label("garbage"), INVALID_DATE_LABEL);
    }

    #[test]
    fn test_tick_label() {
        let calendar = CalendarConvention::default();
        assert_eq!(calendar.tick_label("2024-03-05T14:30"), "05/03 14:30");
    }

    #[test]
    fn test_out_of_range_offset_falls_back_to_utc() {
        let calendar = CalendarConvention::new(Locale::PtBr, 100 * 60);
        assert_eq!(calendar.offset(), Utc.fix());
    }
}
