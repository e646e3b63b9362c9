use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Combine a calendar date with a naive time-of-day. Meeting times are
/// kept on a local-time basis, so no zone conversion happens here.
pub fn combine(date: NaiveDate, time: NaiveTime) -> NaiveDateTime {
    date.and_time(time)
}

/// Start/end pair for a meeting beginning at `date` ∧ `start_time` and
/// running for `duration_minutes`.
pub fn slot_bounds(
    date: NaiveDate,
    start_time: NaiveTime,
    duration_minutes: i64,
) -> (NaiveDateTime, NaiveDateTime) {
    let start = combine(date, start_time);
    let end = start + Duration::minutes(duration_minutes);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn time(s: &str) -> NaiveTime {
        s.parse().unwrap()
    }

    #[test]
    fn sixty_minutes_from_nine() {
        let (start, end) = slot_bounds(date("2024-06-01"), time("09:00:00"), 60);
        assert_eq!(start.to_string(), "2024-06-01 09:00:00");
        assert_eq!(end.to_string(), "2024-06-01 10:00:00");
    }

    #[test]
    fn duration_crossing_midnight_lands_on_next_day() {
        let (start, end) = slot_bounds(date("2024-06-01"), time("23:30:00"), 60);
        assert_eq!(start.date(), date("2024-06-01"));
        assert_eq!(end.date(), date("2024-06-02"));
        assert_eq!(end.time(), time("00:30:00"));
    }
}
