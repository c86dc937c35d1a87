//! Time-zone conversion and send-time planning.
//!
//! Zones carry a fixed standard UTC offset. Daylight-saving shifts are not
//! modelled, so conversions are exact only outside DST periods.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::{GenError, Result};

/// A named zone with a fixed offset from UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Zone {
    pub id: &'static str,
    pub abbreviation: &'static str,
    pub label: &'static str,
    /// Minutes east of UTC
    pub offset_minutes: i32,
}

pub const ZONES: &[Zone] = &[
    Zone { id: "UTC", abbreviation: "UTC", label: "Coordinated Universal Time", offset_minutes: 0 },
    Zone { id: "America/Los_Angeles", abbreviation: "PST", label: "Pacific Time", offset_minutes: -480 },
    Zone { id: "America/Denver", abbreviation: "MST", label: "Mountain Time", offset_minutes: -420 },
    Zone { id: "America/Chicago", abbreviation: "CST", label: "Central Time", offset_minutes: -360 },
    Zone { id: "America/New_York", abbreviation: "EST", label: "Eastern Time", offset_minutes: -300 },
    Zone { id: "America/Sao_Paulo", abbreviation: "BRT", label: "Brasilia Time", offset_minutes: -180 },
    Zone { id: "Europe/London", abbreviation: "GMT", label: "Greenwich Mean Time", offset_minutes: 0 },
    Zone { id: "Europe/Berlin", abbreviation: "CET", label: "Central European Time", offset_minutes: 60 },
    Zone { id: "Europe/Athens", abbreviation: "EET", label: "Eastern European Time", offset_minutes: 120 },
    Zone { id: "Asia/Dubai", abbreviation: "GST", label: "Gulf Standard Time", offset_minutes: 240 },
    Zone { id: "Asia/Kolkata", abbreviation: "IST", label: "India Standard Time", offset_minutes: 330 },
    Zone { id: "Asia/Singapore", abbreviation: "SGT", label: "Singapore Time", offset_minutes: 480 },
    Zone { id: "Asia/Tokyo", abbreviation: "JST", label: "Japan Standard Time", offset_minutes: 540 },
    Zone { id: "Australia/Sydney", abbreviation: "AEST", label: "Australian Eastern Time", offset_minutes: 600 },
    Zone { id: "Pacific/Auckland", abbreviation: "NZST", label: "New Zealand Time", offset_minutes: 720 },
];

/// Case-insensitive lookup by IANA id or abbreviation
pub fn find_zone(name: &str) -> Result<Zone> {
    let name = name.trim();
    ZONES
        .iter()
        .find(|z| z.id.eq_ignore_ascii_case(name) || z.abbreviation.eq_ignore_ascii_case(name))
        .copied()
        .ok_or_else(|| GenError::UnknownTimezone(name.to_string()))
}

const MINUTES_PER_DAY: i32 = 24 * 60;

/// Wall-clock time without a date
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(GenError::InvalidTime(format!("{}:{:02}", hour, minute)));
        }
        Ok(TimeOfDay { hour, minute })
    }

    /// Accepts `14:30`, `9:05`, `2pm`, `2:30 PM`
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || GenError::InvalidTime(input.to_string());
        let lower = input.trim().to_ascii_lowercase();

        let (clock, meridiem) = if let Some(rest) = lower.strip_suffix("am") {
            (rest.trim(), Some(false))
        } else if let Some(rest) = lower.strip_suffix("pm") {
            (rest.trim(), Some(true))
        } else {
            (lower.as_str(), None)
        };

        let (hour, minute) = match clock.split_once(':') {
            Some((h, m)) if m.len() == 2 => (h, m),
            Some(_) => return Err(invalid()),
            None if meridiem.is_some() => (clock, "00"),
            None => return Err(invalid()),
        };
        let mut hour: u8 = hour.parse().map_err(|_| invalid())?;
        let minute: u8 = minute.parse().map_err(|_| invalid())?;

        if let Some(pm) = meridiem {
            if hour == 0 || hour > 12 {
                return Err(invalid());
            }
            hour = match (hour, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, true) => h + 12,
                (h, false) => h,
            };
        }
        TimeOfDay::new(hour, minute).map_err(|_| invalid())
    }

    fn minutes(self) -> i32 {
        self.hour as i32 * 60 + self.minute as i32
    }

    /// Wrap `minutes` into a day, returning the time and how many days it moved
    fn from_minutes(minutes: i32) -> (Self, i32) {
        let day_offset = minutes.div_euclid(MINUTES_PER_DAY);
        let m = minutes.rem_euclid(MINUTES_PER_DAY);
        (
            TimeOfDay {
                hour: (m / 60) as u8,
                minute: (m % 60) as u8,
            },
            day_offset,
        )
    }

    /// 12-hour rendering, e.g. `2:30 PM`
    pub fn to_12h(self) -> String {
        let (h, suffix) = match self.hour {
            0 => (12, "AM"),
            1..=11 => (self.hour, "AM"),
            12 => (12, "PM"),
            h => (h - 12, "PM"),
        };
        format!("{}:{:02} {}", h, self.minute, suffix)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// A converted time and the day shift it incurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Converted {
    pub time: TimeOfDay,
    /// -1 previous day, 0 same day, +1 next day
    pub day_offset: i32,
}

/// Convert a wall-clock time from one zone to another
pub fn convert(time: TimeOfDay, from: &Zone, to: &Zone) -> Converted {
    let minutes = time.minutes() - from.offset_minutes + to.offset_minutes;
    let (time, day_offset) = TimeOfDay::from_minutes(minutes);
    Converted { time, day_offset }
}

/// Convert using zone names
pub fn convert_named(time: &str, from: &str, to: &str) -> Result<Converted> {
    let time = TimeOfDay::parse(time)?;
    Ok(convert(time, &find_zone(from)?, &find_zone(to)?))
}

/// A time window considered good for cold email
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SendWindow {
    pub days: &'static str,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub note: &'static str,
}

/// When to send, in the sender's zone, to land at a local time for a recipient
#[derive(Debug, Clone, Serialize)]
pub struct SendSlot {
    pub recipient_zone: &'static str,
    pub recipient_local: TimeOfDay,
    pub sender_local: TimeOfDay,
    /// Day shift from the recipient's day to the sender's
    pub day_offset: i32,
    pub business_hours: bool,
}

const BUSINESS_START: TimeOfDay = TimeOfDay { hour: 9, minute: 0 };
const BUSINESS_END: TimeOfDay = TimeOfDay { hour: 17, minute: 0 };

/// Plans sends so they arrive at the same local time in every recipient zone
#[derive(Debug, Clone)]
pub struct SendTimeCalculator {
    sender: Zone,
}

impl SendTimeCalculator {
    pub fn new(sender: Zone) -> Self {
        SendTimeCalculator { sender }
    }

    pub fn for_zone(name: &str) -> Result<Self> {
        Ok(SendTimeCalculator::new(find_zone(name)?))
    }

    pub fn sender(&self) -> &Zone {
        &self.sender
    }

    /// One slot per recipient zone, in the order given
    pub fn schedule(&self, recipients: &[Zone], target_local: TimeOfDay) -> Vec<SendSlot> {
        recipients
            .iter()
            .map(|zone| {
                let at_sender = convert(target_local, zone, &self.sender);
                SendSlot {
                    recipient_zone: zone.id,
                    recipient_local: target_local,
                    sender_local: at_sender.time,
                    day_offset: at_sender.day_offset,
                    business_hours: is_business_hours(at_sender.time),
                }
            })
            .collect()
    }

    /// Schedule with zone names, failing on the first unknown one
    pub fn schedule_named(&self, recipients: &[&str], target_local: &str) -> Result<Vec<SendSlot>> {
        let zones = recipients
            .iter()
            .map(|name| find_zone(name))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.schedule(&zones, TimeOfDay::parse(target_local)?))
    }
}

/// 09:00 up to (not including) 17:00
pub fn is_business_hours(time: TimeOfDay) -> bool {
    time >= BUSINESS_START && time < BUSINESS_END
}

/// Best-practice windows for cold outreach, in the recipient's local time
pub fn recommended_windows() -> Vec<SendWindow> {
    vec![
        SendWindow {
            days: "Tue-Thu",
            start: TimeOfDay { hour: 9, minute: 0 },
            end: TimeOfDay { hour: 11, minute: 0 },
            note: "Inbox triage after the morning start",
        },
        SendWindow {
            days: "Tue-Thu",
            start: TimeOfDay { hour: 13, minute: 0 },
            end: TimeOfDay { hour: 15, minute: 0 },
            note: "After lunch, before late-day meetings",
        },
        SendWindow {
            days: "Mon",
            start: TimeOfDay { hour: 10, minute: 0 },
            end: TimeOfDay { hour: 12, minute: 0 },
            note: "Once the Monday backlog is cleared",
        },
    ]
}
