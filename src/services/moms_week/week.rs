use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

/// Monday–Sunday span of one ISO week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekRange {
    pub iso_year: i32,
    pub week: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekRange {
    /// The week that contains `date`. Weeks always start on Monday.
    pub fn containing(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        let start = date - Duration::days(date.weekday().num_days_from_monday() as i64);
        Self {
            iso_year: iso.year(),
            week: iso.week(),
            start,
            end: start + Duration::days(6),
        }
    }

    /// `None` when the year has no such week (e.g. week 53 of a 52-week year).
    pub fn from_iso(year: i32, week: u32) -> Option<Self> {
        NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).map(Self::containing)
    }

    /// The seven dates of the week, Monday first.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(7)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%d/%m/%Y"),
            self.end.format("%d/%m/%Y")
        )
    }
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Lunes",
        Weekday::Tue => "Martes",
        Weekday::Wed => "Miércoles",
        Weekday::Thu => "Jueves",
        Weekday::Fri => "Viernes",
        Weekday::Sat => "Sábado",
        Weekday::Sun => "Domingo",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sunday_reference_date() {
        let sunday = date(2026, 2, 15);
        let range = WeekRange::containing(sunday);
        assert_eq!(range.start, sunday - Duration::days(6));
        assert_eq!(range.end, sunday);
        assert_eq!(range.start.weekday(), Weekday::Mon);
    }

    #[test]
    fn test_monday_reference_date() {
        let monday = date(2026, 2, 9);
        let range = WeekRange::containing(monday);
        assert_eq!(range.start, monday);
        assert_eq!(range.end, date(2026, 2, 15));
        assert_eq!(range.week, 7);
    }

    #[test]
    fn test_week_spanning_new_year_belongs_to_next_iso_year() {
        // Tuesday 2024-12-31 is in ISO week 1 of 2025.
        let range = WeekRange::containing(date(2024, 12, 31));
        assert_eq!(range.iso_year, 2025);
        assert_eq!(range.week, 1);
        assert_eq!(range.start, date(2024, 12, 30));
        assert_eq!(range.end, date(2025, 1, 5));
        assert_eq!(WeekRange::containing(date(2025, 1, 5)), range);
    }

    #[test]
    fn test_week_spanning_new_year_belongs_to_previous_iso_year() {
        // Sunday 2021-01-03 closes ISO week 53 of 2020.
        let range = WeekRange::containing(date(2021, 1, 3));
        assert_eq!(range.iso_year, 2020);
        assert_eq!(range.week, 53);
        assert_eq!(range.start, date(2020, 12, 28));
        assert_eq!(range.end, date(2021, 1, 3));
    }

    #[test]
    fn test_from_iso() {
        let range = WeekRange::from_iso(2026, 7).unwrap();
        assert_eq!(range.start, date(2026, 2, 9));
        assert!(WeekRange::from_iso(2025, 53).is_none());
        assert!(WeekRange::from_iso(2020, 53).is_some());
        assert!(WeekRange::from_iso(2026, 0).is_none());
    }

    #[test]
    fn test_days_are_ordered_monday_to_sunday() {
        let range = WeekRange::containing(date(2026, 2, 11));
        let days: Vec<_> = range.days().collect();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].weekday(), Weekday::Mon);
        assert_eq!(days[6].weekday(), Weekday::Sun);
        assert!(days.windows(2).all(|w| w[1] == w[0] + Duration::days(1)));
        assert!(days.iter().all(|d| range.contains(*d)));
        assert!(!range.contains(range.end + Duration::days(1)));
    }

    #[test]
    fn test_label() {
        let range = WeekRange::containing(date(2026, 2, 11));
        assert_eq!(range.label(), "09/02/2026 - 15/02/2026");
    }
}
