use crate::datetime::{days_in_month, Date, DateTimeField, Offset, Time};
use crate::error::{Error, ErrorKind};
use crate::lex::{Lexer, Span, TokenType};

/// Scans a date, entered on the `dddd-` lookahead. The date may continue
/// into a local or offset date-time, with `T`, `t`, or a single space
/// separating date and time.
pub(super) fn scan_date_time<'a>(lx: &mut Lexer<'_>) -> Result<TokenType<'a>, Error> {
    let start = lx.cur_pos();

    let year = read_digits(lx, 4, DateTimeField::Year)? as u16;
    expect_char(lx, b'-', DateTimeField::Month)?;
    let month = read_digits(lx, 2, DateTimeField::Month)? as u8;
    expect_char(lx, b'-', DateTimeField::Day)?;
    let day = read_digits(lx, 2, DateTimeField::Day)? as u8;

    let date = Date { year, month, day };
    let date_span = Span::new(start, lx.cur_pos());
    if !(1..=12).contains(&month) {
        return Err(Error::new(
            ErrorKind::DateTimeOutOfBounds(DateTimeField::Month),
            date_span,
        ));
    }
    if day < 1 || day > days_in_month(year, month) {
        return Err(Error::new(
            ErrorKind::DateTimeOutOfBounds(DateTimeField::Day),
            date_span,
        ));
    }

    match lx.byte() {
        Some(b'T' | b't') => lx.pos += 1,
        // A space is only a separator if a time follows.
        Some(b' ') if lx.byte_at(1).is_some_and(|b| b.is_ascii_digit()) => lx.pos += 1,
        _ => return Ok(TokenType::LocalDate(date)),
    }

    let time = scan_time(lx, Some(date))?;
    match scan_offset(lx)? {
        Some(offset) => Ok(TokenType::OffsetDateTime(date, time, offset)),
        None => Ok(TokenType::LocalDateTime(date, time)),
    }
}

/// Scans a bare time, entered on the `dd:` lookahead. Local times don't
/// permit an offset.
pub(super) fn scan_local_time<'a>(lx: &mut Lexer<'_>) -> Result<TokenType<'a>, Error> {
    let time = scan_time(lx, None)?;
    if matches!(lx.byte(), Some(b'Z' | b'z' | b'+' | b'-')) {
        return Err(Error::new(
            ErrorKind::LocalTimeOffset,
            Span::pos(lx.cur_pos()),
        ));
    }
    Ok(TokenType::LocalTime(time))
}

fn scan_time(lx: &mut Lexer<'_>, date: Option<Date>) -> Result<Time, Error> {
    let start = lx.cur_pos();

    let hour = read_digits(lx, 2, DateTimeField::Hour)? as u8;
    expect_char(lx, b':', DateTimeField::Minute)?;
    let minute = read_digits(lx, 2, DateTimeField::Minute)? as u8;
    expect_char(lx, b':', DateTimeField::Second)?;
    let second = read_digits(lx, 2, DateTimeField::Second)? as u8;

    let time_span = Span::new(start, lx.cur_pos());
    if hour > 23 {
        return Err(Error::new(
            ErrorKind::DateTimeOutOfBounds(DateTimeField::Hour),
            time_span,
        ));
    }
    if minute > 59 {
        return Err(Error::new(
            ErrorKind::DateTimeOutOfBounds(DateTimeField::Minute),
            time_span,
        ));
    }
    let max_second = match date {
        Some(d) if d.permits_leap_second() => 60,
        _ => 59,
    };
    if second > max_second {
        return Err(Error::new(
            ErrorKind::DateTimeOutOfBounds(DateTimeField::Second),
            time_span,
        ));
    }

    let mut nanos = 0;
    if lx.byte() == Some(b'.') {
        lx.pos += 1;
        let mut digits = 0u32;
        while let Some(b @ b'0'..=b'9') = lx.byte() {
            // Truncate past nanosecond precision.
            if digits < 9 {
                nanos = nanos * 10 + (b - b'0') as u32;
                digits += 1;
            }
            lx.pos += 1;
        }
        if digits == 0 {
            return Err(Error::new(
                ErrorKind::DateTimeIncomplete(DateTimeField::Subsec),
                Span::pos(lx.cur_pos()),
            ));
        }
        nanos *= 10u32.pow(9 - digits.min(9));
    }

    Ok(Time {
        hour,
        minute,
        second,
        nanos,
    })
}

fn scan_offset(lx: &mut Lexer<'_>) -> Result<Option<Offset>, Error> {
    let sign = match lx.byte() {
        Some(b'Z' | b'z') => {
            lx.pos += 1;
            return Ok(Some(Offset::Utc));
        }
        Some(b'+') => 1,
        Some(b'-') => -1,
        _ => return Ok(None),
    };
    lx.pos += 1;

    let start = lx.cur_pos();
    let hour = read_digits(lx, 2, DateTimeField::OffsetHour)? as i16;
    expect_char(lx, b':', DateTimeField::OffsetMinute)?;
    let minute = read_digits(lx, 2, DateTimeField::OffsetMinute)? as i16;

    let span = Span::new(start, lx.cur_pos());
    if hour > 23 {
        return Err(Error::new(
            ErrorKind::DateTimeOutOfBounds(DateTimeField::OffsetHour),
            span,
        ));
    }
    if minute > 59 {
        return Err(Error::new(
            ErrorKind::DateTimeOutOfBounds(DateTimeField::OffsetMinute),
            span,
        ));
    }

    Ok(Some(Offset::Custom(sign * (60 * hour + minute))))
}

fn read_digits(lx: &mut Lexer<'_>, n: u32, field: DateTimeField) -> Result<u32, Error> {
    let mut val = 0;
    for _ in 0..n {
        match lx.byte() {
            Some(b @ b'0'..=b'9') => {
                val = 10 * val + (b - b'0') as u32;
                lx.pos += 1;
            }
            Some(_) => {
                return Err(Error::new(
                    ErrorKind::InvalidCharInDateTime(lx.char_at(lx.pos)),
                    Span::pos(lx.cur_pos()),
                ));
            }
            None => {
                return Err(Error::new(
                    ErrorKind::DateTimeIncomplete(field),
                    Span::pos(lx.cur_pos()),
                ));
            }
        }
    }
    Ok(val)
}

fn expect_char(lx: &mut Lexer<'_>, expected: u8, field: DateTimeField) -> Result<(), Error> {
    match lx.byte() {
        Some(b) if b == expected => {
            lx.pos += 1;
            Ok(())
        }
        Some(_) => Err(Error::new(
            ErrorKind::InvalidCharInDateTime(lx.char_at(lx.pos)),
            Span::pos(lx.cur_pos()),
        )),
        None => Err(Error::new(
            ErrorKind::DateTimeIncomplete(field),
            Span::pos(lx.cur_pos()),
        )),
    }
}
