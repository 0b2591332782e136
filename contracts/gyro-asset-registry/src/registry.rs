use soroban_sdk::{
    Address, BytesN, Env, Map, Symbol, Vec, contract, contractimpl, contracttype, log,
    symbol_short,
};

use crate::Error;
use crate::events::{AssetAddressSet, StableAssetAdded, StableAssetRemoved};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Storage {
    /// Token contract of every protocol asset, keyed by its symbol
    pub assets: Map<Symbol, Address>,
    /// Registered assets whose price is expected to stay at the $1 peg
    pub stable_assets: Vec<Address>,
}

impl Storage {
    /// Get current state of the contract
    pub fn get_state(env: &Env) -> Storage {
        env.storage()
            .instance()
            .get(&STORAGE)
            .expect("registry not initialized")
    }

    pub fn set_state(env: &Env, storage: &Storage) {
        env.storage().instance().set(&STORAGE, storage);
    }

    fn is_registered(&self, asset: &Address) -> bool {
        self.assets.values().contains(asset)
    }
}

const ADMIN_KEY: Symbol = symbol_short!("ADMIN");
const STORAGE: Symbol = symbol_short!("STORAGE");

#[contract]
pub struct AssetRegistry;

#[contractimpl]
impl AssetRegistry {
    pub fn __constructor(env: &Env, admin: Address) {
        Self::set_admin(env, &admin);
        Storage::set_state(
            env,
            &Storage {
                assets: Map::new(env),
                stable_assets: Vec::new(env),
            },
        );
    }

    /// Point `symbol` at a token contract, replacing any previous address. Admin-only.
    pub fn set_asset_address(env: &Env, symbol: Symbol, address: Address) {
        Self::require_admin(env);
        let mut storage = Storage::get_state(env);
        storage.assets.set(symbol.clone(), address.clone());
        Storage::set_state(env, &storage);
        AssetAddressSet { symbol, address }.publish(env);
    }

    /// Get the token contract registered for `symbol`.
    pub fn get_asset_address(env: &Env, symbol: Symbol) -> Result<Address, Error> {
        Storage::get_state(env)
            .assets
            .get(symbol)
            .ok_or(Error::KeyNotFound)
    }

    /// Mark a registered asset as a stablecoin. Admin-only.
    pub fn add_stable_asset(env: &Env, asset: Address) -> Result<(), Error> {
        Self::require_admin(env);
        let mut storage = Storage::get_state(env);
        if !storage.is_registered(&asset) {
            log!(env, "stable asset must be registered first", asset);
            return Err(Error::AssetNotSupported);
        }
        if storage.stable_assets.contains(&asset) {
            return Err(Error::InvalidArgument);
        }
        storage.stable_assets.push_back(asset.clone());
        Storage::set_state(env, &storage);
        StableAssetAdded { asset }.publish(env);
        Ok(())
    }

    /// Stop treating `asset` as a stablecoin. Admin-only.
    pub fn remove_stable_asset(env: &Env, asset: Address) -> Result<(), Error> {
        Self::require_admin(env);
        let mut storage = Storage::get_state(env);
        let index = storage
            .stable_assets
            .first_index_of(&asset)
            .ok_or(Error::KeyNotFound)?;
        storage.stable_assets.remove(index);
        Storage::set_state(env, &storage);
        StableAssetRemoved { asset }.publish(env);
        Ok(())
    }

    pub fn is_stable_asset(env: &Env, asset: Address) -> bool {
        Storage::get_state(env).stable_assets.contains(&asset)
    }

    pub fn get_stable_assets(env: &Env) -> Vec<Address> {
        Storage::get_state(env).stable_assets
    }

    /// Every registered token contract, in symbol order.
    pub fn get_registered_assets(env: &Env) -> Vec<Address> {
        Storage::get_state(env).assets.values()
    }

    /// Upgrade the contract to new wasm. Admin-only.
    pub fn upgrade(env: &Env, new_wasm_hash: BytesN<32>) {
        Self::require_admin(env);
        env.deployer().update_current_contract_wasm(new_wasm_hash);
    }

    fn admin(env: &Env) -> Option<Address> {
        env.storage().instance().get(&ADMIN_KEY)
    }

    /// Set the admin address. Can only be called once.
    fn set_admin(env: &Env, admin: &Address) {
        if env.storage().instance().has(&ADMIN_KEY) {
            panic!("admin already set");
        }
        env.storage().instance().set(&ADMIN_KEY, admin);
    }

    fn require_admin(env: &Env) {
        let admin = Self::admin(env).expect("admin not set");
        admin.require_auth();
    }
}
