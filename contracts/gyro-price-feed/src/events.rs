use gyro_common::Asset;
use soroban_sdk::{Vec, contractevent};

#[contractevent(topics = ["price_posted"])]
pub struct PricePosted {
    #[topic]
    pub asset: Asset,
    pub price: i128,
    pub timestamp: u64,
}

#[contractevent(topics = ["assets_added"], data_format = "single-value")]
pub struct AssetsAdded {
    pub assets: Vec<Asset>,
}
