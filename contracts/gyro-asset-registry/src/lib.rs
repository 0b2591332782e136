#![no_std]

mod events;
pub mod registry;

pub use gyro_common::Error;
pub use registry::{AssetRegistry, AssetRegistryClient};
