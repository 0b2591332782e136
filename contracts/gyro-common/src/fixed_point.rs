//! Checked 18-decimal fixed point arithmetic on non-negative `i128` values.
//!
//! Products that overflow 128 bits are carried in a host `U256`, so `a * b`
//! cannot overflow before the division by `ONE` brings it back into range.
//! Results that do not fit in an `i128` are reported as errors and never wrap.

use crate::Error;
use soroban_sdk::{Env, U256};

pub const DECIMALS: u32 = 18;
pub const ONE: i128 = 1_000_000_000_000_000_000;

const ONE_U: u128 = ONE as u128;

fn to_unsigned(value: i128) -> Result<u128, Error> {
    if value < 0 {
        return Err(Error::OutOfBounds);
    }
    Ok(value as u128)
}

fn to_signed(value: u128, err: Error) -> Result<i128, Error> {
    i128::try_from(value).map_err(|_| err)
}

/// `a * b / divisor`, rounded as asked. Products that do not fit in 128
/// bits are finished in the host's 256-bit integers. `None` when the quotient
/// does not fit in 128 bits.
fn mul_div(env: &Env, a: u128, b: u128, divisor: u128, round_up: bool) -> Option<u128> {
    let (quot, rem) = match a.checked_mul(b) {
        Some(product) => (product / divisor, product % divisor),
        None => {
            let divisor = U256::from_u128(env, divisor);
            let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
            let quot = product.div(&divisor).to_u128()?;
            let rem = product.rem_euclid(&divisor).to_u128()?;
            (quot, rem)
        }
    };
    if round_up && rem > 0 {
        quot.checked_add(1)
    } else {
        Some(quot)
    }
}

pub fn add(a: i128, b: i128) -> Result<i128, Error> {
    to_unsigned(a)?;
    to_unsigned(b)?;
    a.checked_add(b).ok_or(Error::AddOverflow)
}

pub fn sub(a: i128, b: i128) -> Result<i128, Error> {
    to_unsigned(a)?;
    to_unsigned(b)?;
    if b > a {
        return Err(Error::SubOverflow);
    }
    Ok(a - b)
}

/// `|a - b|` for non-negative operands.
pub fn abs_diff(a: i128, b: i128) -> Result<i128, Error> {
    to_unsigned(a)?;
    to_unsigned(b)?;
    Ok(if a >= b { a - b } else { b - a })
}

/// `floor(a * b / ONE)`
pub fn mul_down(env: &Env, a: i128, b: i128) -> Result<i128, Error> {
    let product = mul_div(env, to_unsigned(a)?, to_unsigned(b)?, ONE_U, false)
        .ok_or(Error::MulOverflow)?;
    to_signed(product, Error::MulOverflow)
}

/// `ceil(a * b / ONE)`
pub fn mul_up(env: &Env, a: i128, b: i128) -> Result<i128, Error> {
    let product = mul_div(env, to_unsigned(a)?, to_unsigned(b)?, ONE_U, true)
        .ok_or(Error::MulOverflow)?;
    to_signed(product, Error::MulOverflow)
}

/// `floor(a * ONE / b)`
pub fn div_down(env: &Env, a: i128, b: i128) -> Result<i128, Error> {
    let (a, b) = (to_unsigned(a)?, to_unsigned(b)?);
    if b == 0 {
        return Err(Error::ZeroDivision);
    }
    let quotient = mul_div(env, a, ONE_U, b, false).ok_or(Error::DivInternal)?;
    to_signed(quotient, Error::DivInternal)
}

/// Rescales a value quoted with `decimals` decimals to 18 decimals.
/// Rescaling down truncates toward zero.
pub fn scale_to_one(value: i128, decimals: u32) -> Result<i128, Error> {
    if decimals == DECIMALS {
        return Ok(value);
    }
    if decimals < DECIMALS {
        let factor = 10i128.pow(DECIMALS - decimals);
        return value.checked_mul(factor).ok_or(Error::MulOverflow);
    }
    match 10i128.checked_pow(decimals - DECIMALS) {
        Some(factor) => Ok(value / factor),
        // More than 38 extra decimals: every representable value rounds to zero.
        None => Ok(0),
    }
}
