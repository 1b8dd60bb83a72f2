use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// An academic year / semester pair, e.g. "2025-2026" semester 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicPeriod {
    pub academic_year: String,
    pub semester: i32,
}

/// Resolve the academic period a calendar date falls in.
///
/// June through December belong to semester 1 of the academic year starting
/// that calendar year; January through May belong to semester 2 of the
/// academic year that started the previous calendar year.
pub fn period_for(date: NaiveDate) -> AcademicPeriod {
    let year = date.year();
    if date.month() >= 6 {
        AcademicPeriod {
            academic_year: format!("{}-{}", year, year + 1),
            semester: 1,
        }
    } else {
        AcademicPeriod {
            academic_year: format!("{}-{}", year - 1, year),
            semester: 2,
        }
    }
}

/// The academic period containing today.
pub fn current_period() -> AcademicPeriod {
    period_for(Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_june_starts_first_semester() {
        let period = period_for(date(2025, 6, 1));
        assert_eq!(period.academic_year, "2025-2026");
        assert_eq!(period.semester, 1);
    }

    #[test]
    fn test_december_still_first_semester() {
        let period = period_for(date(2025, 12, 31));
        assert_eq!(period.academic_year, "2025-2026");
        assert_eq!(period.semester, 1);
    }

    #[test]
    fn test_january_is_second_semester_of_previous_year() {
        let period = period_for(date(2026, 1, 1));
        assert_eq!(period.academic_year, "2025-2026");
        assert_eq!(period.semester, 2);
    }

    #[test]
    fn test_may_is_second_semester() {
        let period = period_for(date(2026, 5, 31));
        assert_eq!(period.academic_year, "2025-2026");
        assert_eq!(period.semester, 2);
    }
}
