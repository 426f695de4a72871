//! Contains the [`JournalEntry`] and the logic to undo it.
//!
//! Entries are created right before the store is mutated and hold a copy of every value the
//! mutation overwrites. Accounts are referenced by address and resolved again at undo time, so
//! an entry stays valid even when the object it points to was replaced in the meantime.
use crate::{JournalError, JournaledStore};
use primitives::{Address, Bytes, StorageKey, StorageValue, B256, RIPEMD_ADDRESS, U256};
use state::StateObject;
use std::boxed::Box;

/// Journal entries that are used to track changes to the state and are used to revert it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JournalEntry {
    /// Account object created where none existed.
    /// Action: Insert new object and mark it dirty.
    /// Revert: Remove the object and its dirty marker.
    ObjectCreated {
        /// Address of created account.
        address: Address,
    },
    /// Account object replaced by a fresh one.
    /// Action: Replace object, dropping it from the destructed set.
    /// Revert: Reinstall the previous object as it was, back in the destructed set if it was
    /// destructed.
    ObjectReset {
        /// Object that was replaced.
        prev: Box<StateObject>,
    },
    /// Account marked for destruction at the end of the scope.
    /// Action: Set destructed flag and clear balance and coinage fields.
    /// Revert: Restore flag and fields, leave destructed set if it was not destructed before.
    Destructed {
        /// Address of destructed account.
        address: Address,
        /// If account had already been destructed before this entry.
        was_destructed: bool,
        /// Balance before destruction.
        prev_balance: U256,
        /// Coinage before destruction.
        prev_coinage: U256,
        /// Last reference block before destruction.
        prev_last_reference_block: u64,
    },
    /// Balance changed
    /// Action: Balance changed
    /// Revert: Revert to previous balance
    BalanceChange {
        /// Address of account that had its balance changed.
        address: Address,
        /// Previous balance.
        prev: U256,
    },
    /// Coinage changed
    /// Action: Coinage changed
    /// Revert: Revert to previous coinage
    CoinageChange {
        /// Address of account that had its coinage changed.
        address: Address,
        /// Previous coinage.
        prev: U256,
    },
    /// Last reference block changed
    /// Action: Last reference block changed
    /// Revert: Revert to previous block number
    LastReferenceBlockChange {
        /// Address of account that had its last reference block changed.
        address: Address,
        /// Previous block number.
        prev: u64,
    },
    /// Nonce changed
    /// Action: Nonce changed
    /// Revert: Revert to previous nonce
    NonceChange {
        /// Address of account that had its nonce changed.
        address: Address,
        /// Previous nonce.
        prev: u64,
    },
    /// Storage slot changed
    /// Action: Storage change
    /// Revert: Revert to previous value
    StorageChange {
        /// Address of account that had its storage changed.
        address: Address,
        /// Key of storage slot that is changed.
        key: StorageKey,
        /// Previous value of storage slot.
        prev: StorageValue,
    },
    /// Code changed
    /// Action: Account code and code hash changed
    /// Revert: Revert to previous code and hash together.
    CodeChange {
        /// Address of account that had its code changed.
        address: Address,
        /// Previous code.
        prev_code: Bytes,
        /// Previous code hash.
        prev_hash: B256,
    },
    /// Refund counter changed
    /// Action: Refund added or subtracted
    /// Revert: Revert to previous counter
    RefundChange {
        /// Previous refund counter.
        prev: u64,
    },
    /// Log appended for a transaction
    /// Action: Push log
    /// Revert: Pop the last log of the transaction, drop the transaction key when none is left.
    LogAdded {
        /// Hash of the transaction the log belongs to.
        tx_hash: B256,
    },
    /// Preimage recorded
    /// Action: Insert preimage
    /// Revert: Remove preimage
    PreimageAdded {
        /// Hash the preimage was recorded under.
        hash: B256,
    },
    /// Loading an account does not touch it. Only when the account is called, or value is
    /// transferred to it, it becomes touched.
    /// Action: Mark account touched and dirty
    /// Revert: Unmark touched, and drop dirty marker if it was not dirty before.
    /// Never reverted for [`RIPEMD_ADDRESS`].
    Touched {
        /// Address of account that is touched.
        address: Address,
        /// If account was already touched.
        was_touched: bool,
        /// If account was already in the dirty set.
        was_dirty: bool,
    },
}

impl JournalEntry {
    /// Creates a journal entry for a newly created account object.
    pub fn object_created(address: Address) -> Self {
        JournalEntry::ObjectCreated { address }
    }

    /// Creates a journal entry holding the object that is about to be replaced.
    pub fn object_reset(prev: StateObject) -> Self {
        JournalEntry::ObjectReset {
            prev: Box::new(prev),
        }
    }

    /// Creates a journal entry for an account being marked as destructed.
    pub fn destructed(
        address: Address,
        was_destructed: bool,
        prev_balance: U256,
        prev_coinage: U256,
        prev_last_reference_block: u64,
    ) -> Self {
        JournalEntry::Destructed {
            address,
            was_destructed,
            prev_balance,
            prev_coinage,
            prev_last_reference_block,
        }
    }

    /// Creates a journal entry for a balance change.
    pub fn balance_changed(address: Address, prev: U256) -> Self {
        JournalEntry::BalanceChange { address, prev }
    }

    /// Creates a journal entry for a coinage change.
    pub fn coinage_changed(address: Address, prev: U256) -> Self {
        JournalEntry::CoinageChange { address, prev }
    }

    /// Creates a journal entry for a last reference block change.
    pub fn last_reference_block_changed(address: Address, prev: u64) -> Self {
        JournalEntry::LastReferenceBlockChange { address, prev }
    }

    /// Creates a journal entry for a nonce change.
    pub fn nonce_changed(address: Address, prev: u64) -> Self {
        JournalEntry::NonceChange { address, prev }
    }

    /// Creates a journal entry for a storage slot change.
    pub fn storage_changed(address: Address, key: StorageKey, prev: StorageValue) -> Self {
        JournalEntry::StorageChange { address, key, prev }
    }

    /// Creates a journal entry for a code change.
    pub fn code_changed(address: Address, prev_code: Bytes, prev_hash: B256) -> Self {
        JournalEntry::CodeChange {
            address,
            prev_code,
            prev_hash,
        }
    }

    /// Creates a journal entry for a refund counter change.
    pub fn refund_changed(prev: u64) -> Self {
        JournalEntry::RefundChange { prev }
    }

    /// Creates a journal entry for a log appended under `tx_hash`.
    pub fn log_added(tx_hash: B256) -> Self {
        JournalEntry::LogAdded { tx_hash }
    }

    /// Creates a journal entry for a recorded preimage.
    pub fn preimage_added(hash: B256) -> Self {
        JournalEntry::PreimageAdded { hash }
    }

    /// Creates a journal entry for an account being touched.
    pub fn touched(address: Address, was_touched: bool, was_dirty: bool) -> Self {
        JournalEntry::Touched {
            address,
            was_touched,
            was_dirty,
        }
    }

    /// Address of the account this entry changes, if any.
    pub fn address(&self) -> Option<Address> {
        match self {
            JournalEntry::ObjectCreated { address }
            | JournalEntry::Destructed { address, .. }
            | JournalEntry::BalanceChange { address, .. }
            | JournalEntry::CoinageChange { address, .. }
            | JournalEntry::LastReferenceBlockChange { address, .. }
            | JournalEntry::NonceChange { address, .. }
            | JournalEntry::StorageChange { address, .. }
            | JournalEntry::CodeChange { address, .. }
            | JournalEntry::Touched { address, .. } => Some(*address),
            JournalEntry::ObjectReset { prev } => Some(prev.address),
            JournalEntry::RefundChange { .. }
            | JournalEntry::LogAdded { .. }
            | JournalEntry::PreimageAdded { .. } => None,
        }
    }

    /// Undoes the change against `store`.
    ///
    /// Must be called at most once per entry, and only after every entry appended after it
    /// was undone.
    pub fn undo<S: JournaledStore + ?Sized>(self, store: &mut S) -> Result<(), JournalError> {
        match self {
            JournalEntry::ObjectCreated { address } => {
                store.remove_object(&address);
                store.remove_dirty(&address);
            }
            JournalEntry::ObjectReset { prev } => {
                if prev.is_destructed() {
                    store.insert_destructed(prev.address);
                }
                store.insert_object(*prev);
            }
            JournalEntry::Destructed {
                address,
                was_destructed,
                prev_balance,
                prev_coinage,
                prev_last_reference_block,
            } => {
                let obj = object(store, address)?;
                obj.set_destructed(was_destructed);
                obj.set_balance(prev_balance);
                obj.set_coinage(prev_coinage);
                obj.set_last_reference_block(prev_last_reference_block);
                if !was_destructed {
                    store.remove_destructed(&address);
                }
            }
            JournalEntry::BalanceChange { address, prev } => {
                object(store, address)?.set_balance(prev);
            }
            JournalEntry::CoinageChange { address, prev } => {
                object(store, address)?.set_coinage(prev);
            }
            JournalEntry::LastReferenceBlockChange { address, prev } => {
                object(store, address)?.set_last_reference_block(prev);
            }
            JournalEntry::NonceChange { address, prev } => {
                object(store, address)?.set_nonce(prev);
            }
            JournalEntry::StorageChange { address, key, prev } => {
                object(store, address)?.set_state(key, prev);
            }
            JournalEntry::CodeChange {
                address,
                prev_code,
                prev_hash,
            } => {
                object(store, address)?.set_code(prev_code, prev_hash);
            }
            JournalEntry::RefundChange { prev } => {
                store.set_refund(prev);
            }
            JournalEntry::LogAdded { tx_hash } => {
                let logs = store
                    .logs_mut(&tx_hash)
                    .ok_or(JournalError::MissingLogs(tx_hash))?;
                if logs.pop().is_none() {
                    return Err(JournalError::MissingLogs(tx_hash));
                }
                if logs.is_empty() {
                    store.remove_logs(&tx_hash);
                }
            }
            JournalEntry::PreimageAdded { hash } => {
                store.remove_preimage(&hash);
            }
            JournalEntry::Touched {
                address,
                was_touched,
                was_dirty,
            } => {
                if !was_touched && address != RIPEMD_ADDRESS {
                    object(store, address)?.set_touched(was_touched);
                    if !was_dirty {
                        store.remove_dirty(&address);
                    }
                }
            }
        }
        Ok(())
    }
}

#[inline]
fn object<S: JournaledStore + ?Sized>(
    store: &mut S,
    address: Address,
) -> Result<&mut StateObject, JournalError> {
    store
        .object_mut(&address)
        .ok_or(JournalError::MissingAccount(address))
}
