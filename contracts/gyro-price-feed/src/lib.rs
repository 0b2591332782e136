#![no_std]

mod events;
pub mod price_feed;
mod sep40;

pub use gyro_common::{Asset, Error, PriceData};
pub use price_feed::{PriceFeed, PriceFeedClient};
pub use sep40::{IsSep40, IsSep40Admin};

mod test;
