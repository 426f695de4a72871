//! In-memory [`JournaledStore`] used by unit tests.
use crate::JournaledStore;
use primitives::{Address, HashSet, Log, B256};
use state::{Preimages, StateLogs, StateObject, StateObjects};

#[derive(Debug, Default)]
pub(crate) struct MemStore {
    pub(crate) objects: StateObjects,
    pub(crate) dirty: HashSet<Address>,
    pub(crate) destructed: HashSet<Address>,
    pub(crate) logs: StateLogs,
    pub(crate) preimages: Preimages,
    pub(crate) refund: u64,
}

impl JournaledStore for MemStore {
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
