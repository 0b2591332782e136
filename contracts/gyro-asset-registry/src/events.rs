use soroban_sdk::{Address, Symbol, contractevent};

#[contractevent(topics = ["asset_set"], data_format = "single-value")]
pub struct AssetAddressSet {
    #[topic]
    pub symbol: Symbol,
    pub address: Address,
}

#[contractevent(topics = ["stable_added"], data_format = "single-value")]
pub struct StableAssetAdded {
    pub asset: Address,
}

#[contractevent(topics = ["stable_removed"], data_format = "single-value")]
pub struct StableAssetRemoved {
    pub asset: Address,
}
