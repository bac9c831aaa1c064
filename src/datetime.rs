/// All variants allowed by the [toml spec](https://toml.io/en/v1.0.0#offset-date-time).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateTime {
    OffsetDateTime(Date, Time, Offset),
    LocalDateTime(Date, Time),
    LocalDate(Date),
    LocalTime(Time),
}

impl DateTime {
    pub fn from_optional_offset(date: Date, time: Time, offset: Option<Offset>) -> Self {
        match offset {
            Some(o) => Self::OffsetDateTime(date, time, o),
            None => Self::LocalDateTime(date, time),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl Date {
    pub fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Structural validity: month in `1..=12` and day within the month,
    /// accounting for leap years.
    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
            && self.day >= 1
            && self.day <= days_in_month(self.year, self.month)
    }

    /// A leap second (second 60) is only ever inserted at the end of
    /// 30 June or 31 December.
    pub fn permits_leap_second(&self) -> bool {
        matches!((self.month, self.day), (6, 30) | (12, 31))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub nanos: u32,
}

impl Time {
    pub fn new(hour: u8, minute: u8, second: u8, nanos: u32) -> Self {
        Self {
            hour,
            minute,
            second,
            nanos,
        }
    }

    /// Structural validity. `leap_second` permits second 60, which is only
    /// valid in combination with a date satisfying
    /// [`Date::permits_leap_second`].
    pub fn is_valid(&self, leap_second: bool) -> bool {
        let max_second = if leap_second { 60 } else { 59 };
        self.hour <= 23
            && self.minute <= 59
            && self.second <= max_second
            && self.nanos <= 999_999_999
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Offset {
    /// Z
    Utc,
    /// Minutes
    Custom(i16),
}

impl Offset {
    /// Offsets decompose into `hh:mm` with hours in `0..=23` and minutes in
    /// `0..=59`, in either direction.
    pub fn is_valid(&self) -> bool {
        match self {
            Offset::Utc => true,
            Offset::Custom(minutes) => minutes.unsigned_abs() <= 23 * 60 + 59,
        }
    }
}

pub(crate) fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub(crate) fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateTimeField {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Subsec,
    OffsetHour,
    OffsetMinute,
}

impl std::fmt::Display for DateTimeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateTimeField::Year => f.write_str("year"),
            DateTimeField::Month => f.write_str("month"),
            DateTimeField::Day => f.write_str("day"),
            DateTimeField::Hour => f.write_str("hour"),
            DateTimeField::Minute => f.write_str("minute"),
            DateTimeField::Second => f.write_str("second"),
            DateTimeField::Subsec => f.write_str("fractional second"),
            DateTimeField::OffsetHour => f.write_str("offset-hour"),
            DateTimeField::OffsetMinute => f.write_str("offset-minute"),
        }
    }
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
        if self.nanos > 0 {
            let frac = format!("{:09}", self.nanos);
            write!(f, ".{}", frac.trim_end_matches('0'))?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Offset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Offset::Utc => f.write_str("Z"),
            Offset::Custom(minutes) => {
                let sign = if *minutes < 0 { '-' } else { '+' };
                let abs = minutes.unsigned_abs();
                write!(f, "{}{:02}:{:02}", sign, abs / 60, abs % 60)
            }
        }
    }
}

impl std::fmt::Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateTime::OffsetDateTime(date, time, offset) => {
                write!(f, "{date}T{time}{offset}")
            }
            DateTime::LocalDateTime(date, time) => write!(f, "{date}T{time}"),
            DateTime::LocalDate(date) => date.fmt(f),
            DateTime::LocalTime(time) => time.fmt(f),
        }
    }
}
