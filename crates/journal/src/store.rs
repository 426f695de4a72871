//! Interface the journal needs from the account store.
use auto_impl::auto_impl;
use primitives::{Address, Log, B256};
use state::StateObject;
use std::vec::Vec;

/// The narrow view of an account store that journal entries are allowed to touch.
///
/// The store owns its dirty and destructed sets. Entries only ever remove from them, except
/// for an object reset, which puts a destructed object back into the destructed set.
#[auto_impl(&mut, Box)]
pub trait JournaledStore {
    /// Returns the live object for `address`.
    fn object_mut(&mut self, address: &Address) -> Option<&mut StateObject>;

    /// Installs `object`, replacing any object with the same address.
    fn insert_object(&mut self, object: StateObject);

    /// Removes the object for `address`.
    fn remove_object(&mut self, address: &Address);

    /// Removes `address` from the dirty set.
    fn remove_dirty(&mut self, address: &Address);

    /// Adds `address` to the destructed set.
    fn insert_destructed(&mut self, address: Address);

    /// Removes `address` from the destructed set.
    fn remove_destructed(&mut self, address: &Address);

    /// Logs recorded for a transaction, in emission order.
    fn logs_mut(&mut self, tx_hash: &B256) -> Option<&mut Vec<Log>>;

    /// Drops every log recorded for a transaction.
    fn remove_logs(&mut self, tx_hash: &B256);

    /// Drops the preimage of `hash`.
    fn remove_preimage(&mut self, hash: &B256);

    /// Overwrites the refund counter.
    fn set_refund(&mut self, refund: u64);
}
