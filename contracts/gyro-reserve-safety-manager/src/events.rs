use gyro_common::SafetyConfig;
use soroban_sdk::{Address, contractevent};

#[contractevent(topics = ["safety_config"], data_format = "single-value")]
pub struct SafetyConfigUpdated {
    pub config: SafetyConfig,
}

#[contractevent(topics = ["price_oracle_set"], data_format = "single-value")]
pub struct PriceOracleSet {
    pub oracle: Address,
}

#[contractevent(topics = ["pool_provider_set"], data_format = "single-value")]
pub struct PoolProviderSet {
    pub provider: Address,
}

#[contractevent(topics = ["asset_registry_set"], data_format = "single-value")]
pub struct AssetRegistrySet {
    pub registry: Address,
}
