//! Delivery Time Slots
//!
//! Deliveries are booked into one of four fixed daily windows. On the day of
//! delivery a window is offered only while its end hour is still ahead of the
//! current hour.

use std::{fmt, str::FromStr};

use jiff::civil::{Date, DateTime};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// Errors raised while parsing a slot label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown delivery slot {0:?}, expected one of 09:00-12:00, 12:00-15:00, 15:00-18:00, 18:00-21:00")]
pub struct UnknownSlot(pub String);

/// A fixed delivery window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeSlot {
    /// 09:00-12:00
    Morning,

    /// 12:00-15:00
    Midday,

    /// 15:00-18:00
    Afternoon,

    /// 18:00-21:00
    Evening,
}

/// Slots available on a day with no time restriction, in display order.
pub const ALL_SLOTS: [TimeSlot; 4] = [
    TimeSlot::Morning,
    TimeSlot::Midday,
    TimeSlot::Afternoon,
    TimeSlot::Evening,
];

/// Slot list; never longer than [`ALL_SLOTS`].
pub type SlotList = SmallVec<[TimeSlot; 4]>;

impl TimeSlot {
    /// Hour the window opens.
    pub const fn start_hour(self) -> i8 {
        match self {
            Self::Morning => 9,
            Self::Midday => 12,
            Self::Afternoon => 15,
            Self::Evening => 18,
        }
    }

    /// Hour the window closes.
    pub const fn end_hour(self) -> i8 {
        self.start_hour() + 3
    }

    /// Whether the slot can still be booked for `date`, given the current time.
    ///
    /// Past dates have no slots. On `now`'s own date, slots whose end hour is
    /// at or before the current hour are gone.
    pub fn is_available(self, date: Date, now: DateTime) -> bool {
        let today = now.date();

        if date < today {
            return false;
        }

        date > today || self.end_hour() > now.hour()
    }

    /// Label in `HH:00-HH:00` form.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Morning => "09:00-12:00",
            Self::Midday => "12:00-15:00",
            Self::Afternoon => "15:00-18:00",
            Self::Evening => "18:00-21:00",
        }
    }
}

/// Slots that can be booked for `date`.
pub fn available_slots(date: Date, now: DateTime) -> SlotList {
    ALL_SLOTS
        .into_iter()
        .filter(|slot| slot.is_available(date, now))
        .collect()
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeSlot {
    type Err = UnknownSlot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| !c.is_whitespace()).collect();

        ALL_SLOTS
            .into_iter()
            .find(|slot| slot.label() == wanted)
            .ok_or_else(|| UnknownSlot(s.to_string()))
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = UnknownSlot;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeSlot> for String {
    fn from(value: TimeSlot) -> Self {
        value.label().to_string()
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn at_four_pm_only_slots_ending_by_four_are_gone() {
        let today = date(2026, 10, 19);
        let now = today.at(16, 0, 0, 0);

        let slots = available_slots(today, now);

        assert_eq!(slots.as_slice(), &[TimeSlot::Afternoon, TimeSlot::Evening]);
    }

    #[test]
    fn slot_ending_at_current_hour_is_excluded() {
        let today = date(2026, 10, 19);
        let now = today.at(15, 30, 0, 0);

        assert!(!TimeSlot::Midday.is_available(today, now));
        assert!(TimeSlot::Afternoon.is_available(today, now));
    }

    #[test]
    fn future_dates_offer_every_slot() {
        let now = date(2026, 10, 19).at(23, 0, 0, 0);

        assert_eq!(available_slots(date(2026, 10, 20), now).as_slice(), &ALL_SLOTS);
    }

    #[test]
    fn past_dates_offer_nothing() {
        let now = date(2026, 10, 19).at(8, 0, 0, 0);

        assert!(available_slots(date(2026, 10, 18), now).is_empty());
    }

    #[test]
    fn late_evening_leaves_nothing_today() {
        let today = date(2026, 10, 19);

        assert!(available_slots(today, today.at(21, 0, 0, 0)).is_empty());
    }

    #[test]
    fn labels_round_trip_through_parse() -> TestResult {
        assert_eq!("15:00 - 18:00".parse::<TimeSlot>()?, TimeSlot::Afternoon);
        assert_eq!(TimeSlot::Morning.to_string(), "09:00-12:00");
        assert!("10:00-13:00".parse::<TimeSlot>().is_err());

        Ok(())
    }
}
