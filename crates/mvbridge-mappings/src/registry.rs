use crate::MappingTable;
use mvbridge_types::BlockState;

/// Read-only view of the latest version's block and item numbering.
///
/// Shared by every adapter; implementations must be safe to read from many
/// connections at once.
pub trait CanonicalRegistry: Send + Sync {
    fn item_name_to_id(&self, name: &str) -> Option<i32>;
    fn item_id_to_name(&self, id: i32) -> Option<&str>;
    fn state_to_runtime_id(&self, state: &BlockState) -> Option<u32>;
    fn runtime_id_to_state(&self, id: u32) -> Option<&BlockState>;
}

impl CanonicalRegistry for MappingTable {
    fn item_name_to_id(&self, name: &str) -> Option<i32> {
        self.item_id(name)
    }

    fn item_id_to_name(&self, id: i32) -> Option<&str> {
        self.item_name(id)
    }

    fn state_to_runtime_id(&self, state: &BlockState) -> Option<u32> {
        self.canonical_to_legacy(state)
    }

    fn runtime_id_to_state(&self, id: u32) -> Option<&BlockState> {
        self.legacy_to_canonical(id)
    }
}
