use crate::error::{Error, ErrorKind};
use crate::lex::{Span, TokenType};

/// Commits a value-mode bare run to a typed scalar: boolean, float special
/// value, integer in one of the four radices, or decimal float.
pub(super) fn classify<'a>(lit: &'a str, span: Span) -> Result<TokenType<'a>, Error> {
    match lit {
        "true" => return Ok(TokenType::Bool(true)),
        "false" => return Ok(TokenType::Bool(false)),
        "inf" | "+inf" => return Ok(TokenType::Float(f64::INFINITY)),
        "-inf" => return Ok(TokenType::Float(f64::NEG_INFINITY)),
        "nan" | "+nan" => return Ok(TokenType::Float(f64::NAN)),
        "-nan" => return Ok(TokenType::Float(-f64::NAN)),
        _ => (),
    }

    let signed = matches!(lit.as_bytes().first(), Some(b'+' | b'-'));
    let sign = if lit.starts_with('-') { -1 } else { 1 };
    let unsigned = if signed { &lit[1..] } else { lit };
    if unsigned.is_empty() {
        return Err(Error::new(ErrorKind::MissingDigits, span));
    }

    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        if let Some(digits) = unsigned.strip_prefix(prefix) {
            if signed {
                return Err(Error::new(ErrorKind::PrefixedIntSign, span));
            }
            return parse_radix(digits, radix, span).map(TokenType::Integer);
        }
    }
    if let Some(c) = unsigned.strip_prefix('0').and_then(|r| r.chars().next()) {
        if matches!(c, 'X' | 'O' | 'B') {
            return Err(Error::new(ErrorKind::UppercaseRadix(c), span));
        }
    }

    if unsigned.contains(['.', 'e', 'E']) {
        return parse_float(lit, unsigned, span).map(TokenType::Float);
    }
    parse_decimal(unsigned, sign, span).map(TokenType::Integer)
}

fn parse_decimal(digits: &str, sign: i64, span: Span) -> Result<i64, Error> {
    let bytes = digits.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return Err(Error::new(ErrorKind::LeadingZero, span));
    }

    // The sign is multiplied into the accumulator so that i64::MIN parses.
    let mut accum: i64 = 0;
    let mut prev_digit = false;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'0'..=b'9' => {
                let digit = (b - b'0') as i64;
                accum = accum
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(sign * digit))
                    .ok_or_else(|| Error::new(ErrorKind::IntOverflow, span))?;
                prev_digit = true;
            }
            b'_' => {
                if !prev_digit || !matches!(bytes.get(i + 1), Some(b'0'..=b'9')) {
                    return Err(Error::new(ErrorKind::UnderscorePlacement, span));
                }
                prev_digit = false;
            }
            _ => {
                return Err(Error::new(ErrorKind::InvalidCharInNum(b as char), span));
            }
        }
    }
    Ok(accum)
}

fn parse_radix(digits: &str, radix: u32, span: Span) -> Result<i64, Error> {
    let bytes = digits.as_bytes();
    if bytes.is_empty() {
        return Err(Error::new(ErrorKind::EmptyPrefixedInt, span));
    }

    let mut accum: i64 = 0;
    let mut prev_digit = false;
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'_' {
            let next_is_digit = bytes
                .get(i + 1)
                .is_some_and(|&n| (n as char).to_digit(radix).is_some());
            if !prev_digit || !next_is_digit {
                return Err(Error::new(ErrorKind::UnderscorePlacement, span));
            }
            prev_digit = false;
            continue;
        }
        // The run only ever contains ascii, so `b as char` is exact.
        let digit = (b as char)
            .to_digit(radix)
            .ok_or_else(|| Error::new(ErrorKind::DigitOutOfRange(b as char, radix), span))?;
        accum = accum
            .checked_mul(radix as i64)
            .and_then(|v| v.checked_add(digit as i64))
            .ok_or_else(|| Error::new(ErrorKind::IntOverflow, span))?;
        prev_digit = true;
    }
    Ok(accum)
}

fn parse_float(lit: &str, unsigned: &str, span: Span) -> Result<f64, Error> {
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(i) => (&unsigned[..i], Some(&unsigned[i + 1..])),
        None => (unsigned, None),
    };
    let (integral, fraction) = match mantissa.find('.') {
        Some(i) => (&mantissa[..i], Some(&mantissa[i + 1..])),
        None => (mantissa, None),
    };

    check_digit_run(integral, false, span)?;
    if let Some(fraction) = fraction {
        check_digit_run(fraction, true, span)?;
    }
    if let Some(exponent) = exponent {
        // Exponents may have leading zeros.
        let exponent = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
        check_digit_run(exponent, true, span)?;
    }

    // Every character has been validated at this point, and `f64` parsing
    // saturates to infinity or zero on out-of-range exponents instead of
    // failing, so this cannot error.
    Ok(lit.replace('_', "").parse().unwrap_or(f64::NAN))
}

fn check_digit_run(part: &str, allow_leading_zero: bool, span: Span) -> Result<(), Error> {
    let bytes = part.as_bytes();
    if bytes.is_empty() {
        return Err(Error::new(ErrorKind::MissingDigits, span));
    }
    if !allow_leading_zero && bytes.len() > 1 && bytes[0] == b'0' {
        return Err(Error::new(ErrorKind::LeadingZero, span));
    }

    let mut prev_digit = false;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'0'..=b'9' => prev_digit = true,
            b'_' => {
                if !prev_digit || !matches!(bytes.get(i + 1), Some(b'0'..=b'9')) {
                    return Err(Error::new(ErrorKind::UnderscorePlacement, span));
                }
                prev_digit = false;
            }
            _ => {
                return Err(Error::new(ErrorKind::InvalidCharInNum(b as char), span));
            }
        }
    }
    Ok(())
}
