use soroban_sdk::{Address, BytesN, Symbol, Vec, contracttype};

/// Quoted asset definition (SEP-40 compatible)
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Asset {
    /// Can be a Stellar Classic or Soroban asset
    Stellar(Address),
    /// For any external tokens/assets/symbols
    Other(Symbol),
}

/// Price record definition (SEP-40 compatible)
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceData {
    pub price: i128,    // asset price at given point in time
    pub timestamp: u64, // recording timestamp
}

/// A USD price for an asset, normalized to 18 decimals.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssetPrice {
    pub asset: Address,
    pub price: i128,
    pub timestamp: u64,
}

/// Vault parameters fixed when the vault was registered with the reserve.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PersistedVaultMetadata {
    /// Vault share price (USD, 18 decimals) at registration
    pub initial_price: i128,
    /// Target share of the reserve at registration (18 decimals)
    pub initial_weight: i128,
    /// Underlying pool in the pool provider
    pub pool_id: BytesN<32>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VaultInfo {
    pub vault: Address,
    /// Current USD price per vault share (18 decimals)
    pub price: i128,
    pub persisted_metadata: PersistedVaultMetadata,
    /// Vault shares currently held by the reserve
    pub reserve_balance: i128,
    /// Current share of total reserve value (18 decimals)
    pub current_weight: i128,
}

/// One leg of an order. `amount` is never negative; the order's `mint` flag
/// decides whether it is added to or removed from the reserve.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VaultWithAmount {
    pub vault_info: VaultInfo,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Order {
    pub vaults_with_amount: Vec<VaultWithAmount>,
    pub mint: bool,
}

/// Per-vault evaluation record for a single order.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VaultMetadata {
    pub pool_id: BytesN<32>,
    pub ideal_weight: i128,
    pub current_weight: i128,
    pub resulting_weight: i128,
    /// `|resulting_weight - ideal_weight|`
    pub delta_weight: i128,
    pub price: i128,
    pub all_stablecoins_on_peg: bool,
    pub all_token_prices_large_enough: bool,
    pub vault_within_epsilon: bool,
}

/// Order-level aggregate over every vault in the order, in order.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Metadata {
    pub vault_metadata: Vec<VaultMetadata>,
    pub all_vaults_within_epsilon: bool,
    pub all_stablecoins_on_peg: bool,
    pub all_prices_large_enough: bool,
    pub mint: bool,
}

/// Reserve safety thresholds, all 18-decimal fractions or USD prices.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SafetyConfig {
    /// Allowed distance from the ideal weight, relative to the ideal weight
    pub max_allowed_vault_deviation: i128,
    /// Allowed distance of a stablecoin price from $1
    pub stablecoin_max_deviation: i128,
    /// Smallest token price considered safe to compute with
    pub min_token_price: i128,
}

/// Checked price oracle tolerances.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OracleConfig {
    /// Allowed relative disagreement between two estimates of the same price
    pub max_relative_deviation: i128,
    /// Maximum age in seconds of a feed price
    pub max_price_age: u64,
}
