//! Order statistics used to combine several observations of one price.

use gyro_common::Error;
use gyro_common::fixed_point;
use soroban_sdk::{Env, Vec, contracttype};

/// Which way the mean of the two middle values is rounded for even-length input
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MedianRounding {
    Down,
    Up,
}

/// Ascending copy of `values`
fn sorted(values: &Vec<i128>) -> Vec<i128> {
    let mut sorted: Vec<i128> = Vec::new(values.env());
    for value in values.iter() {
        let position = sorted
            .iter()
            .position(|other| other > value)
            .unwrap_or(sorted.len() as usize);
        sorted.insert(position as u32, value);
    }
    sorted
}

/// Median of non-negative `values`. For an even number of values the two
/// middle ones are averaged and the result rounded as requested.
pub fn median(values: &Vec<i128>, rounding: MedianRounding) -> Result<i128, Error> {
    if values.is_empty() {
        return Err(Error::InvalidArgument);
    }
    if values.iter().any(|value| value < 0) {
        return Err(Error::OutOfBounds);
    }

    let sorted = sorted(values);
    let middle = sorted.len() / 2;
    let upper = sorted.get_unchecked(middle);
    if sorted.len() % 2 == 1 {
        return Ok(upper);
    }

    let lower = sorted.get_unchecked(middle - 1);
    // halves first so the sum cannot overflow
    let halves = lower / 2 + upper / 2;
    let remainder = lower % 2 + upper % 2;
    Ok(match rounding {
        MedianRounding::Down => halves + remainder / 2,
        MedianRounding::Up => halves + (remainder + 1) / 2,
    })
}

/// The single value, the smaller of two, or the second smallest of three or
/// more, so a single low outlier is ignored once there are enough observations.
pub fn compute_min_or_second_min(values: &Vec<i128>) -> Result<i128, Error> {
    let mut min = i128::MAX;
    let mut second_min = i128::MAX;
    for value in values.iter() {
        if value < min {
            second_min = min;
            min = value;
        } else if value < second_min {
            second_min = value;
        }
    }

    match values.len() {
        0 => Err(Error::InvalidArgument),
        1 | 2 => Ok(min),
        _ => Ok(second_min),
    }
}

/// `|actual - expected| / expected`
pub fn relative_deviation(env: &Env, actual: i128, expected: i128) -> Result<i128, Error> {
    fixed_point::div_down(env, fixed_point::abs_diff(actual, expected)?, expected)
}
