//! Packed FAT time and date fields
//!
//! Time: bits 11-15 hour, 5-10 minute, 0-4 second / 2.
//! Date: bits 9-15 year - 1980, 5-8 month, 0-4 day.

use core::fmt;

use chrono::{Datelike, NaiveDateTime, Timelike};

/// Earliest year a FAT date can hold
pub const MIN_YEAR: i32 = 1980;
/// Latest year a FAT date can hold
pub const MAX_YEAR: i32 = 2107;

/// Decoded FAT time (2-second resolution)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FatTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl FatTime {
    /// Decode a raw 16-bit time field
    pub fn from_raw(value: u16) -> Self {
        FatTime {
            hour: ((value >> 11) & 0x1F) as u8,
            minute: ((value >> 5) & 0x3F) as u8,
            second: ((value & 0x1F) * 2) as u8,
        }
    }

    /// Encode into the raw 16-bit field. Odd seconds are truncated.
    pub fn to_raw(&self) -> u16 {
        ((self.hour as u16 & 0x1F) << 11)
            | ((self.minute as u16 & 0x3F) << 5)
            | ((self.second as u16 / 2) & 0x1F)
    }
}

/// Clamped to 00:00:00 before 1980 and 23:59:58 after 2107
impl From<&NaiveDateTime> for FatTime {
    fn from(dt: &NaiveDateTime) -> Self {
        if dt.year() < MIN_YEAR {
            return FatTime { hour: 0, minute: 0, second: 0 };
        }
        if dt.year() > MAX_YEAR {
            return FatTime { hour: 23, minute: 59, second: 58 };
        }
        FatTime {
            hour: dt.hour() as u8,
            minute: dt.minute() as u8,
            second: (dt.second() / 2 * 2) as u8,
        }
    }
}

impl fmt::Display for FatTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

/// Decoded FAT date
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FatDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl FatDate {
    /// Decode a raw 16-bit date field
    pub fn from_raw(value: u16) -> Self {
        FatDate {
            year: ((value >> 9) & 0x7F) + 1980,
            month: ((value >> 5) & 0x0F) as u8,
            day: (value & 0x1F) as u8,
        }
    }

    /// Encode into the raw 16-bit field. Fields are masked, not validated.
    pub fn to_raw(&self) -> u16 {
        let year = self.year.wrapping_sub(1980) & 0x7F;
        (year << 9) | ((self.month as u16 & 0x0F) << 5) | (self.day as u16 & 0x1F)
    }
}

/// Clamped to 1980-01-01 and 2107-12-31
impl From<&NaiveDateTime> for FatDate {
    fn from(dt: &NaiveDateTime) -> Self {
        if dt.year() < MIN_YEAR {
            return FatDate { year: MIN_YEAR as u16, month: 1, day: 1 };
        }
        if dt.year() > MAX_YEAR {
            return FatDate { year: MAX_YEAR as u16, month: 12, day: 31 };
        }
        FatDate {
            year: dt.year() as u16,
            month: dt.month() as u8,
            day: dt.day() as u8,
        }
    }
}

impl fmt::Display for FatDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_time_roundtrip_whole_day() {
        for t in (0..86400u32).step_by(2) {
            let time = FatTime {
                hour: (t / 3600) as u8,
                minute: (t / 60 % 60) as u8,
                second: (t % 60) as u8,
            };
            assert_eq!(FatTime::from_raw(time.to_raw()), time);
        }
    }

    #[test]
    fn test_date_roundtrip() {
        for year in 1980..=2107u16 {
            for month in 1..=12u8 {
                for day in 1..=31u8 {
                    let date = FatDate { year, month, day };
                    assert_eq!(FatDate::from_raw(date.to_raw()), date);
                }
            }
        }
    }

    #[test]
    fn test_known_values() {
        // odd second truncates to :30
        let dt = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(13, 45, 31)
            .unwrap();
        let time = FatTime::from(&dt);
        let date = FatDate::from(&dt);
        assert_eq!(time.to_raw(), (13 << 11) | (45 << 5) | 15);
        assert_eq!(date.to_raw(), (44 << 9) | (3 << 5) | 15);
        assert_eq!(time.to_string(), "13:45:30");
        assert_eq!(date.to_string(), "2024-03-15");
    }

    #[test]
    fn test_out_of_range_clamped() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        assert_eq!(FatDate::from(&epoch).to_string(), "1980-01-01");
        assert_eq!(FatTime::from(&epoch).to_string(), "00:00:00");
        assert_eq!(FatDate::from_raw(FatDate::from(&epoch).to_raw()).year, 1980);

        let far = NaiveDate::from_ymd_opt(2200, 6, 1)
            .unwrap()
            .and_hms_opt(1, 2, 3)
            .unwrap();
        assert_eq!(FatDate::from(&far).to_string(), "2107-12-31");
        assert_eq!(FatTime::from(&far).to_string(), "23:59:58");

        let edge = NaiveDate::from_ymd_opt(2107, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert_eq!(FatDate::from_raw(FatDate::from(&edge).to_raw()).to_string(), "2107-12-31");
    }

    #[test]
    fn test_zero_fields() {
        assert_eq!(FatTime::from_raw(0).to_string(), "00:00:00");
        assert_eq!(FatDate::from_raw(0).to_string(), "1980-00-00");
    }
}
