use gyro_common::OracleConfig;
use soroban_sdk::{Address, contractevent};

#[contractevent(topics = ["signed_source_added"], data_format = "single-value")]
pub struct SignedSourceAdded {
    pub source: Address,
}

#[contractevent(topics = ["signed_source_removed"], data_format = "single-value")]
pub struct SignedSourceRemoved {
    pub source: Address,
}

#[contractevent(topics = ["quote_asset_added"], data_format = "single-value")]
pub struct QuoteAssetAdded {
    pub asset: Address,
}

#[contractevent(topics = ["quote_asset_removed"], data_format = "single-value")]
pub struct QuoteAssetRemoved {
    pub asset: Address,
}

#[contractevent(topics = ["usd_feed_set"], data_format = "single-value")]
pub struct UsdFeedSet {
    pub feed: Address,
}

#[contractevent(topics = ["relative_oracle_set"], data_format = "single-value")]
pub struct RelativeOracleSet {
    pub oracle: Address,
}

#[contractevent(topics = ["oracle_config"], data_format = "single-value")]
pub struct OracleConfigUpdated {
    pub config: OracleConfig,
}
