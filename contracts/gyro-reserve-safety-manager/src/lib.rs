#![no_std]

mod events;
pub mod metadata;
pub mod price_safety;
pub mod reserve_safety;
pub mod weights;

pub use gyro_common::{Error, Metadata, Order, SafetyConfig, VaultMetadata};
pub use reserve_safety::{ReserveSafetyManager, ReserveSafetyManagerClient};
