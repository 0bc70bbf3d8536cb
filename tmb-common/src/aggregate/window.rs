//! Calendar month reporting window

use crate::{Error, Result};
use chrono::{Datelike, NaiveDate};

/// Inclusive `[first day, last day]` range of one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthWindow {
    /// Parse a `YYYY-MM` month key
    pub fn parse(month: &str) -> Result<MonthWindow> {
        let (year_s, month_s) = month
            .split_once('-')
            .ok_or_else(|| Error::InvalidInput(format!("Invalid month key: {}", month)))?;

        let year: i32 = year_s
            .parse()
            .map_err(|_| Error::InvalidInput(format!("Invalid month key: {}", month)))?;
        let mon: u32 = month_s
            .parse()
            .map_err(|_| Error::InvalidInput(format!("Invalid month key: {}", month)))?;

        let start = NaiveDate::from_ymd_opt(year, mon, 1)
            .ok_or_else(|| Error::InvalidInput(format!("Invalid month key: {}", month)))?;

        let next_month = if mon == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, mon + 1, 1)
        }
        .ok_or_else(|| Error::InvalidInput(format!("Invalid month key: {}", month)))?;

        let end = next_month.pred_opt().unwrap_or(start);

        Ok(MonthWindow { start, end })
    }

    /// Does an ISO `YYYY-MM-DD` date string fall inside the window?
    ///
    /// Unparseable stored dates fall outside every window.
    pub fn contains(&self, date: &str) -> bool {
        match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            Ok(d) => d >= self.start && d <= self.end,
            Err(_) => false,
        }
    }

    /// The `YYYY-MM` key this window was parsed from
    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.start.year(), self.start.month())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_regular_month() {
        let w = MonthWindow::parse("2024-03").unwrap();
        assert_eq!(w.start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(w.end, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
    }

    #[test]
    fn test_parse_february_leap_year() {
        let w = MonthWindow::parse("2024-02").unwrap();
        assert_eq!(w.end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_parse_december_rolls_year() {
        let w = MonthWindow::parse("2023-12").unwrap();
        assert_eq!(w.end, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(MonthWindow::parse("2024").is_err());
        assert!(MonthWindow::parse("2024-13").is_err());
        assert!(MonthWindow::parse("abcd-ef").is_err());
    }

    #[test]
    fn test_contains_edges() {
        let w = MonthWindow::parse("2024-03").unwrap();
        assert!(w.contains("2024-03-01"));
        assert!(w.contains("2024-03-31"));
        assert!(!w.contains("2024-02-29"));
        assert!(!w.contains("2024-04-01"));
        assert!(!w.contains("not-a-date"));
    }

    #[test]
    fn test_key_round_trips() {
        assert_eq!(MonthWindow::parse("2024-03").unwrap().key(), "2024-03");
    }
}
