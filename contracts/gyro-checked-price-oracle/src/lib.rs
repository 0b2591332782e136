#![no_std]

pub mod aggregation;
pub mod checked_oracle;
mod events;
mod sources;

pub use aggregation::MedianRounding;
pub use checked_oracle::{CheckedPriceOracle, CheckedPriceOracleClient};
pub use gyro_common::{Error, OracleConfig};
