use soroban_sdk::contracterror;

/// Protocol-wide error codes. The numeric values are part of the wire format
/// and must not be renumbered.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Pool token list and balance list have different lengths
    TokenAndAmountsLengthDiffer = 1,

    /// Order would push the reserve weights further from their ideal values
    WouldUnbalanceGyroscope = 5,

    /// Operand outside the domain of the fixed point function
    OutOfBounds = 24,

    /// Division by zero
    ZeroDivision = 25,

    /// Addition overflow
    AddOverflow = 26,

    /// Subtraction underflow
    SubOverflow = 27,

    /// Multiplication overflow
    MulOverflow = 28,

    /// Fixed point division result does not fit
    DivInternal = 29,

    /// Caller is not allowed to perform this action
    NotAuthorized = 30,

    /// Malformed or empty input
    InvalidArgument = 31,

    /// Lookup key is not registered
    KeyNotFound = 32,

    /// No price or reference point is available for an asset
    AssetNotSupported = 40,

    /// Price is too old, could not be fetched, or deviates from its cross-check
    StalePrice = 41,

    /// Price is zero or negative
    NegativePrice = 42,

    /// At least one vault has a stablecoin outside the peg band
    AVaultHasAllStablecoinsOffPeg = 51,

    /// Order is not a mint order or cannot be minted
    NotSafeToMint = 52,

    /// Order is not a redeem order or cannot be redeemed
    NotSafeToRedeem = 53,

    /// Amounts and prices have different lengths
    AmountAndPriceLengthDiffer = 54,

    /// A vault relies on token prices below the configured floor
    TokenPricesTooSmall = 55,

    /// Redeem amount exceeds the vault's reserve balance
    TryingToRedeemMoreThanVaultContains = 56,
}
