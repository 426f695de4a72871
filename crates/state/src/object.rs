use crate::ObjectStorage;
use bitflags::bitflags;
use primitives::{Address, Bytes, StorageKey, StorageValue, B256, KECCAK_EMPTY, U256};

bitflags! {
    /// Status flags of a [`StateObject`] inside one execution scope.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct ObjectStatus: u8 {
        /// Account is scheduled for removal when the scope is finalised.
        const DESTRUCTED = 0b0000_0001;
        /// Account was referenced during execution. Touched empty accounts are
        /// removed at finalisation (EIP-161).
        const TOUCHED = 0b0000_0010;
    }
}

/// A mutable account: balance, nonce, code, storage and the coinage fields.
///
/// Setters on this type are raw; they do not record anything. Journaling is the
/// responsibility of whoever owns the object.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateObject {
    /// Identity of the account.
    pub address: Address,
    /// Account balance.
    pub balance: U256,
    /// Account nonce.
    pub nonce: u64,
    /// Coinage accumulated by the balance.
    pub coinage: U256,
    /// Block number at which coinage was last settled.
    pub last_reference_block: u64,
    /// Account code.
    pub code: Bytes,
    /// keccak256 of `code`.
    pub code_hash: B256,
    /// Storage slots written or loaded in this scope.
    pub storage: ObjectStorage,
    /// Status flags.
    pub status: ObjectStatus,
}

impl StateObject {
    /// Creates an empty account at `address`.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            balance: U256::ZERO,
            nonce: 0,
            coinage: U256::ZERO,
            last_reference_block: 0,
            code: Bytes::new(),
            code_hash: KECCAK_EMPTY,
            storage: ObjectStorage::default(),
            status: ObjectStatus::empty(),
        }
    }

    /// Sets the balance and returns self.
    pub fn with_balance(mut self, balance: U256) -> Self {
        self.balance = balance;
        self
    }

    /// Sets the nonce and returns self.
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    /// Empty as defined by EIP-161: zero nonce, zero balance and no code.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nonce == 0 && self.balance.is_zero() && self.code_hash == KECCAK_EMPTY
    }

    /// Is account marked for destruction.
    #[inline]
    pub fn is_destructed(&self) -> bool {
        self.status.contains(ObjectStatus::DESTRUCTED)
    }

    /// Is account touched.
    #[inline]
    pub fn is_touched(&self) -> bool {
        self.status.contains(ObjectStatus::TOUCHED)
    }

    /// Sets or clears the destructed flag.
    #[inline]
    pub fn set_destructed(&mut self, destructed: bool) {
        self.status.set(ObjectStatus::DESTRUCTED, destructed);
    }

    /// Sets or clears the touched flag.
    #[inline]
    pub fn set_touched(&mut self, touched: bool) {
        self.status.set(ObjectStatus::TOUCHED, touched);
    }

    /// Sets the balance.
    #[inline]
    pub fn set_balance(&mut self, balance: U256) {
        self.balance = balance;
    }

    /// Sets the coinage.
    #[inline]
    pub fn set_coinage(&mut self, coinage: U256) {
        self.coinage = coinage;
    }

    /// Sets the last reference block.
    #[inline]
    pub fn set_last_reference_block(&mut self, block: u64) {
        self.last_reference_block = block;
    }

    /// Sets the nonce.
    #[inline]
    pub fn set_nonce(&mut self, nonce: u64) {
        self.nonce = nonce;
    }

    /// Sets code together with its hash. The hash is not checked against the code.
    #[inline]
    pub fn set_code(&mut self, code: Bytes, code_hash: B256) {
        self.code = code;
        self.code_hash = code_hash;
    }

    /// Writes a storage slot. Writing zero clears it.
    #[inline]
    pub fn set_state(&mut self, key: StorageKey, value: StorageValue) {
        if value.is_zero() {
            self.storage.remove(&key);
        } else {
            self.storage.insert(key, value);
        }
    }

    /// Reads a storage slot. Slots never written read as zero.
    #[inline]
    pub fn state(&self, key: &StorageKey) -> StorageValue {
        self.storage.get(key).copied().unwrap_or_default()
    }
}
