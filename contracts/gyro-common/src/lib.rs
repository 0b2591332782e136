#![no_std]

#[cfg(test)]
extern crate std;

mod error;
pub mod fixed_point;
pub mod interfaces;
pub mod types;

pub use error::Error;
pub use types::*;
