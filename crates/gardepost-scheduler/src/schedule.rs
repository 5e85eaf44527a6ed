use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};

use gardepost_core::config::{GENERATION_START_HOUR, PUBLICATION_HOUR};

/// Compute the next publication slot on `weekday` at the fixed 06:00 slot
/// hour, starting from `reference_start` and strictly after `now`.
///
/// The weekday offset wraps 0–6; when `reference_start` already falls on
/// the target weekday the offset is zero. A slot that is not strictly in
/// the future gets pushed exactly one week — this covers the case where
/// this week's slot has already elapsed.
///
/// Pure and deterministic: no global clock, standard calendar arithmetic.
pub fn next_occurrence(
    reference_start: DateTime<Utc>,
    weekday: Weekday,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let start_dow = reference_start.weekday().num_days_from_monday() as i64;
    let target_dow = weekday.num_days_from_monday() as i64;
    let mut offset = target_dow - start_dow;
    if offset < 0 {
        offset += 7;
    }

    let slot_day = reference_start.date_naive() + Duration::days(offset);
    let slot = slot_day.and_time(NaiveTime::MIN).and_utc()
        + Duration::hours(PUBLICATION_HOUR as i64);

    if slot <= now {
        slot + Duration::days(7)
    } else {
        slot
    }
}

/// Pin a generation start date to the fixed 08:00 reference hour.
///
/// All window math for one run derives from this instant.
pub fn pinned_start(start_date: NaiveDate) -> DateTime<Utc> {
    start_date.and_time(NaiveTime::MIN).and_utc()
        + Duration::hours(GENERATION_START_HOUR as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn always_future_on_target_weekday_at_slot_hour() {
        let weekdays = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];
        // 2024-05-06 is a Monday; sweep a few reference days around it.
        for day in 1..=14 {
            let reference = at(2024, 5, day, 8);
            let now = at(2024, 5, 3, 12);
            for weekday in weekdays {
                let slot = next_occurrence(reference, weekday, now);
                assert!(slot > now, "slot {slot} not after now {now}");
                assert_eq!(slot.weekday(), weekday);
                assert_eq!(slot.hour(), 6);
                assert_eq!((slot.minute(), slot.second()), (0, 0));
            }
        }
    }

    #[test]
    fn same_weekday_reference_uses_zero_offset() {
        // Monday reference, Monday target, now well before the slot.
        let reference = at(2024, 5, 6, 8);
        let now = at(2024, 5, 1, 12);
        let slot = next_occurrence(reference, Weekday::Mon, now);
        assert_eq!(slot, at(2024, 5, 6, 6));
    }

    #[test]
    fn elapsed_slot_this_week_bumps_seven_days() {
        // Monday reference, Monday target, but the 06:00 slot already
        // passed: the bump lands exactly one week out.
        let reference = at(2024, 5, 6, 8);
        let now = at(2024, 5, 6, 9);
        let slot = next_occurrence(reference, Weekday::Mon, now);
        assert_eq!(slot, at(2024, 5, 13, 6));
    }

    #[test]
    fn slot_equal_to_now_is_not_accepted() {
        let reference = at(2024, 5, 6, 8);
        let now = at(2024, 5, 6, 6); // exactly the slot instant
        let slot = next_occurrence(reference, Weekday::Mon, now);
        assert_eq!(slot, at(2024, 5, 13, 6));
    }

    #[test]
    fn offset_wraps_backwards_weekdays_forward() {
        // Wednesday reference targeting Tuesday: six days ahead.
        let reference = at(2024, 5, 8, 8);
        let now = at(2024, 5, 1, 12);
        let slot = next_occurrence(reference, Weekday::Tue, now);
        assert_eq!(slot, at(2024, 5, 14, 6));
    }

    #[test]
    fn month_boundary_is_plain_calendar_arithmetic() {
        // Friday 2024-05-31 targeting Saturday: lands on June 1st.
        let reference = at(2024, 5, 31, 8);
        let now = at(2024, 5, 30, 12);
        let slot = next_occurrence(reference, Weekday::Sat, now);
        assert_eq!(slot, at(2024, 6, 1, 6));
    }

    #[test]
    fn pinned_start_is_eight_oclock() {
        let start = pinned_start(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());
        assert_eq!(start, at(2024, 5, 6, 8));
    }
}
