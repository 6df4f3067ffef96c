//! Oracle NUMBER codec.
//!
//! Oracle NUMBER is a variable-length format where:
//! - First byte is exponent (with sign info in high bit)
//! - Remaining bytes are base-100 digits of mantissa
//! - Negative numbers store complemented digits and end with byte 102

use crate::error::{Error, Result};
use crate::protocol::constants::{TNS_NUMBER_MAX_DIGITS, TNS_NUMBER_NEGATIVE_TERMINATOR};

/// Decode Oracle NUMBER format to its decimal text.
///
/// Preserves full precision by returning the number as a string.
pub fn decode_oracle_number(bytes: &[u8]) -> Result<String> {
    let Some((&exp_byte, mantissa)) = bytes.split_first() else {
        return Err(Error::type_conversion("empty NUMBER value"));
    };
    let is_positive = (exp_byte & 0x80) != 0;

    if mantissa.is_empty() {
        return Ok(if is_positive { "0" } else { "-1e126" }.to_string());
    }

    let exponent: i16 = if is_positive {
        exp_byte as i16 - 193
    } else {
        (!exp_byte) as i16 - 193
    };

    let mantissa = match mantissa.split_last() {
        Some((&TNS_NUMBER_NEGATIVE_TERMINATOR, rest)) if !is_positive => rest,
        _ => mantissa,
    };

    let mut digits: Vec<u8> = Vec::with_capacity(mantissa.len() * 2);
    for &byte in mantissa {
        let pair = if is_positive {
            byte.wrapping_sub(1)
        } else {
            101u8.wrapping_sub(byte)
        };
        if pair > 99 {
            return Err(Error::type_conversion(format!(
                "invalid NUMBER mantissa byte: {byte:#04x}"
            )));
        }
        digits.push(pair / 10);
        digits.push(pair % 10);
    }

    // Digits are 0.d1d2... scaled by 100^(exponent + 1)
    let mut decimal_point_index: i16 = (exponent + 1) * 2;

    let leading = digits.iter().take_while(|&&d| d == 0).count();
    digits.drain(..leading);
    decimal_point_index -= leading as i16;
    while digits.last() == Some(&0) {
        digits.pop();
    }

    if digits.is_empty() {
        return Ok("0".to_string());
    }

    let mut result = String::with_capacity(digits.len() + 4);
    if !is_positive {
        result.push('-');
    }

    let num_digits = digits.len() as i16;
    let push_digits = |out: &mut String, ds: &[u8]| {
        for d in ds {
            out.push((b'0' + d) as char);
        }
    };

    if decimal_point_index <= 0 {
        result.push_str("0.");
        for _ in decimal_point_index..0 {
            result.push('0');
        }
        push_digits(&mut result, &digits);
    } else if decimal_point_index >= num_digits {
        push_digits(&mut result, &digits);
        for _ in num_digits..decimal_point_index {
            result.push('0');
        }
    } else {
        let (int_part, frac_part) = digits.split_at(decimal_point_index as usize);
        push_digits(&mut result, int_part);
        result.push('.');
        push_digits(&mut result, frac_part);
    }

    Ok(result)
}

/// Encode decimal text (optionally signed, optionally fractional) as Oracle NUMBER.
///
/// Returns `None` when the text is not a plain decimal literal.
pub fn encode_oracle_number(text: &str) -> Result<Option<Vec<u8>>> {
    let Some((is_negative, digits, mut decimal_point_index)) = parse_decimal(text) else {
        return Ok(None);
    };

    if digits.is_empty() {
        return Ok(Some(vec![0x80]));
    }
    if digits.len() > TNS_NUMBER_MAX_DIGITS {
        return Err(Error::type_conversion(format!(
            "NUMBER value {text} exceeds {TNS_NUMBER_MAX_DIGITS} significant digits"
        )));
    }

    // Align to base-100 pairs
    let mut digits = digits;
    if decimal_point_index % 2 != 0 {
        digits.insert(0, 0);
        decimal_point_index += 1;
    }
    if digits.len() % 2 != 0 {
        digits.push(0);
    }

    let exponent = decimal_point_index / 2 - 1;
    if !(-64..=62).contains(&exponent) {
        return Err(Error::type_conversion(format!(
            "NUMBER value {text} is out of range"
        )));
    }

    let exp_byte = (193 + exponent) as u8;
    let mut out = Vec::with_capacity(digits.len() / 2 + 2);
    out.push(if is_negative { !exp_byte } else { exp_byte });
    for pair in digits.chunks(2) {
        let value = pair[0] * 10 + pair[1];
        out.push(if is_negative { 101 - value } else { value + 1 });
    }
    if is_negative && out.len() <= TNS_NUMBER_MAX_DIGITS / 2 {
        out.push(TNS_NUMBER_NEGATIVE_TERMINATOR);
    }

    Ok(Some(out))
}

/// Split a decimal literal into sign, significant digits and decimal point index.
///
/// The decimal point index counts digits before the point relative to the first
/// significant digit. Zero yields an empty digit list.
fn parse_decimal(text: &str) -> Option<(bool, Vec<u8>, i16)> {
    let text = text.trim();
    let (is_negative, body) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i, f),
        None => (body, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes())
        .map(|b| b - b'0')
        .collect();
    let mut decimal_point_index = int_part.len() as i16;

    let leading = digits.iter().take_while(|&&d| d == 0).count();
    digits.drain(..leading);
    decimal_point_index -= leading as i16;
    while digits.last() == Some(&0) {
        digits.pop();
    }

    Some((is_negative && !digits.is_empty(), digits, decimal_point_index))
}
