//! Backing storage of the [`crate::StateDb`].
use journal::JournaledStore;
use primitives::{Address, HashSet, Log, B256};
use state::{Preimages, StateLogs, StateObject, StateObjects};
use std::vec::Vec;

/// Everything the state database holds besides its journal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectStore {
    /// Live account objects.
    pub objects: StateObjects,
    /// Accounts with changes not yet handed out by finalisation.
    pub dirty: HashSet<Address>,
    /// Accounts scheduled for removal at finalisation.
    pub destructed: HashSet<Address>,
    /// Logs grouped by transaction hash.
    pub logs: StateLogs,
    /// Preimages of seen hashes.
    pub preimages: Preimages,
    /// Gas refund counter.
    pub refund: u64,
}

impl JournaledStore for ObjectStore {
    fn object_mut(&mut self, address: &Address) -> Option<&mut StateObject> {
        self.objects.get_mut(address)
    }

    fn insert_object(&mut self, object: StateObject) {
        self.objects.insert(object.address, object);
    }

    fn remove_object(&mut self, address: &Address) {
        self.objects.remove(address);
    }

    fn remove_dirty(&mut self, address: &Address) {
        self.dirty.remove(address);
    }

    fn insert_destructed(&mut self, address: Address) {
        self.destructed.insert(address);
    }

    fn remove_destructed(&mut self, address: &Address) {
        self.destructed.remove(address);
    }

    fn logs_mut(&mut self, tx_hash: &B256) -> Option<&mut Vec<Log>> {
        self.logs.get_mut(tx_hash)
    }

    fn remove_logs(&mut self, tx_hash: &B256) {
        self.logs.remove(tx_hash);
    }

    fn remove_preimage(&mut self, hash: &B256) {
        self.preimages.remove(hash);
    }

    fn set_refund(&mut self, refund: u64) {
        self.refund = refund;
    }
}
