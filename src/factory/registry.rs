//! Pair registry: one pair per unordered asset pair.

use std::collections::HashMap;

use alloy_primitives::{b256, keccak256, Address, B256};
use tracing::{debug, instrument};

use crate::config::{PairConfig, RegistryConfig};
use crate::domain::{Amount, AssetPair, PivotSelector};
use crate::error::AmmError;
use crate::pair::{MinimumSizeGuard, Pair};
use crate::traits::{AssetLedger, FromConfig};

/// Digest mixed into every derived pair address unless overridden.
pub const PAIR_INIT_CODE_DIGEST: B256 =
    b256!("96e8ac4277198ff8b6f785478aa9a39f403cb768dd02cbee326c3e7da348845f");

/// Derives the address of the pair for `assets` created by `registry`.
///
/// CREATE2 rule: the last 20 bytes of
/// `keccak256(0xff ++ registry ++ keccak256(token0 ++ token1) ++ digest)`.
#[must_use]
pub fn pair_address(registry: Address, assets: &AssetPair, init_code_digest: B256) -> Address {
    let salt = {
        let mut buffer = Vec::with_capacity(40);
        buffer.extend_from_slice(assets.token0().as_slice());
        buffer.extend_from_slice(assets.token1().as_slice());
        keccak256(buffer)
    };
    let mut preimage = Vec::with_capacity(85);
    preimage.push(0xff);
    preimage.extend_from_slice(registry.as_slice());
    preimage.extend_from_slice(salt.as_slice());
    preimage.extend_from_slice(init_code_digest.as_slice());
    Address::from_word(keccak256(preimage))
}

/// Creates and owns pairs, at most one per unordered asset pair.
///
/// Pairs live as long as the registry and are handed out by shared
/// reference; all their entry points take `&self`.
///
/// # Example
///
/// ```rust
/// use alloy_primitives::Address;
/// use pivot_amm::domain::{Amount, PivotSelector};
/// use pivot_amm::error::AmmError;
/// use pivot_amm::factory::PairRegistry;
///
/// let usd = Address::repeat_byte(0xee);
/// let wise = Address::repeat_byte(0x11);
///
/// let mut registry = PairRegistry::new(Address::repeat_byte(0xfa));
/// let address = registry
///     .create_pair(usd, wise, Amount::new(1_000), PivotSelector::AssetA)
///     .expect("created");
///
/// assert_eq!(registry.get_pair(wise, usd), Some(address));
/// assert_eq!(
///     registry.create_pair(wise, usd, Amount::ZERO, PivotSelector::AssetA),
///     Err(AmmError::PairExists)
/// );
/// ```
#[derive(Debug)]
pub struct PairRegistry {
    address: Address,
    init_code_digest: B256,
    pairs: Vec<Pair>,
    by_assets: HashMap<AssetPair, usize>,
    by_address: HashMap<Address, usize>,
}

impl PairRegistry {
    /// Creates an empty registry at `address`.
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self::with_init_code_digest(address, PAIR_INIT_CODE_DIGEST)
    }

    /// Creates an empty registry that derives pair addresses with a
    /// custom digest.
    #[must_use]
    pub fn with_init_code_digest(address: Address, init_code_digest: B256) -> Self {
        Self {
            address,
            init_code_digest,
            pairs: Vec::new(),
            by_assets: HashMap::new(),
            by_address: HashMap::new(),
        }
    }

    /// Returns the registry's own address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Creates the pair for `asset_a`/`asset_b` and returns its address.
    ///
    /// `pivot` names the guarded asset by argument position; it is
    /// resolved against the sorted pair and fixed for the pair's lifetime,
    /// as is `min_trade_size`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::IdenticalAddresses`] if both assets are the same.
    /// - [`AmmError::ZeroAddress`] if either asset is zero.
    /// - [`AmmError::PairExists`] if the pair was already created, in
    ///   either order.
    #[instrument(level = "debug", skip_all, fields(registry = %self.address))]
    pub fn create_pair(
        &mut self,
        asset_a: Address,
        asset_b: Address,
        min_trade_size: Amount,
        pivot: PivotSelector,
    ) -> Result<Address, AmmError> {
        let assets = AssetPair::new(asset_a, asset_b)?;
        if self.by_assets.contains_key(&assets) {
            return Err(AmmError::PairExists);
        }
        let pivot = pivot.resolve(asset_a, asset_b, &assets)?;
        let address = pair_address(self.address, &assets, self.init_code_digest);

        let index = self.pairs.len();
        self.pairs.push(Pair::new(
            address,
            self.address,
            assets,
            MinimumSizeGuard::new(pivot, min_trade_size),
        ));
        self.by_assets.insert(assets, index);
        self.by_address.insert(address, index);

        debug!(
            pair = %address,
            token0 = %assets.token0(),
            token1 = %assets.token1(),
            pivot = pivot.index(),
            %min_trade_size,
            total = self.pairs.len(),
            "pair created"
        );
        Ok(address)
    }

    /// Creates a pair from its configuration.
    ///
    /// # Errors
    ///
    /// Same as [`PairRegistry::create_pair`].
    pub fn create_pair_from_config(&mut self, config: &PairConfig) -> Result<Address, AmmError> {
        self.create_pair(
            config.asset_a(),
            config.asset_b(),
            config.min_trade_size(),
            config.pivot(),
        )
    }

    /// Returns the address of the pair for two assets, in either order.
    #[must_use]
    pub fn get_pair(&self, asset_a: Address, asset_b: Address) -> Option<Address> {
        let assets = AssetPair::new(asset_a, asset_b).ok()?;
        let index = self.by_assets.get(&assets)?;
        self.pairs.get(*index).map(Pair::address)
    }

    /// Returns the pair at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownPair`] if this registry did not create it.
    pub fn pair(&self, address: Address) -> Result<&Pair, AmmError> {
        self.by_address
            .get(&address)
            .and_then(|index| self.pairs.get(*index))
            .ok_or(AmmError::UnknownPair)
    }

    /// Returns every pair in creation order.
    #[must_use]
    pub fn all_pairs(&self) -> impl Iterator<Item = &Pair> {
        self.pairs.iter()
    }

    /// Returns the pair created `index`-th, if any.
    #[must_use]
    pub fn pair_at(&self, index: usize) -> Option<&Pair> {
        self.pairs.get(index)
    }

    /// Returns how many pairs exist.
    #[must_use]
    pub fn all_pairs_len(&self) -> usize {
        self.pairs.len()
    }

    /// Runs `f` as one all-or-nothing call against `ledger` and every pair
    /// of this registry.
    ///
    /// On `Err` the ledger is restored from a snapshot and each pair undoes
    /// the mints, burns, swaps and syncs it committed during `f`, including
    /// those made by a [`SwapCallee`](crate::traits::SwapCallee) on a pair
    /// other than the one being swapped.  Calls may nest; an inner failure
    /// only unwinds its own changes.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `f`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use alloy_primitives::Address;
    /// use pivot_amm::domain::{Amount, Liquidity, PivotSelector};
    /// use pivot_amm::error::AmmError;
    /// use pivot_amm::factory::PairRegistry;
    /// use pivot_amm::ledger::MemoryLedger;
    /// use pivot_amm::traits::AssetLedger;
    ///
    /// let (usd, wise) = (Address::repeat_byte(0xee), Address::repeat_byte(0x11));
    /// let lp = Address::repeat_byte(0x01);
    /// let mut registry = PairRegistry::new(Address::repeat_byte(0xfa));
    /// let address = registry
    ///     .create_pair(usd, wise, Amount::new(1_000), PivotSelector::AssetA)
    ///     .expect("created");
    /// let pair = registry.pair(address).expect("registered");
    ///
    /// let mut ledger = MemoryLedger::new();
    /// let result = registry.atomically(&mut ledger, |l| {
    ///     l.issue(usd, address, Amount::new(1_000_000))?;
    ///     l.issue(wise, address, Amount::new(1_000_000))?;
    ///     pair.mint(l, lp, lp)?;
    ///     Err::<(), _>(AmmError::InvariantViolation)
    /// });
    /// assert_eq!(result, Err(AmmError::InvariantViolation));
    /// assert_eq!(pair.total_supply(), Liquidity::ZERO);
    /// assert_eq!(ledger.balance_of(usd, address), Ok(Amount::ZERO));
    /// ```
    pub fn atomically<L, T>(
        &self,
        ledger: &mut L,
        f: impl FnOnce(&mut L) -> Result<T, AmmError>,
    ) -> Result<T, AmmError>
    where
        L: AssetLedger + Clone,
    {
        crate::pair::atomically(&self.pairs, ledger, f)
    }
}

impl FromConfig<RegistryConfig> for PairRegistry {
    fn from_config(config: &RegistryConfig) -> Result<Self, AmmError> {
        config.validate()?;
        let mut registry = Self::new(config.address());
        for pair in config.pairs() {
            registry.create_pair_from_config(pair)?;
        }
        Ok(registry)
    }
}
