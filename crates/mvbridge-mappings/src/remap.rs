use crate::{CanonicalRegistry, MappingError, MappingResult, MappingTable};
use mvbridge_types::{BlockState, ItemInstance, ItemStack};
use std::sync::Arc;

/// Translates block runtime IDs and item stacks between one legacy version
/// and the latest version, pivoting through canonical names.
///
/// Every lookup is total: anything without an equivalent becomes air (blocks)
/// or the empty stack (items).
#[derive(Clone)]
pub struct Remapper {
    legacy: Arc<MappingTable>,
    latest: Arc<dyn CanonicalRegistry>,
    latest_air: u32,
}

impl Remapper {
    pub fn new(legacy: Arc<MappingTable>, latest: Arc<dyn CanonicalRegistry>) -> MappingResult<Self> {
        let latest_air = latest
            .state_to_runtime_id(&BlockState::air())
            .ok_or_else(|| MappingError::MissingAir("latest registry".into()))?;
        Ok(Self {
            legacy,
            latest,
            latest_air,
        })
    }

    pub fn table(&self) -> &MappingTable {
        &self.legacy
    }

    pub fn legacy_air(&self) -> u32 {
        self.legacy.air_runtime_id()
    }

    pub fn latest_air(&self) -> u32 {
        self.latest_air
    }

    pub fn upgrade_block(&self, legacy_id: u32) -> u32 {
        self.legacy
            .legacy_to_canonical(legacy_id)
            .and_then(|state| self.latest.state_to_runtime_id(state))
            .unwrap_or(self.latest_air)
    }

    pub fn downgrade_block(&self, latest_id: u32) -> u32 {
        self.latest
            .runtime_id_to_state(latest_id)
            .and_then(|state| self.legacy.canonical_to_legacy(state))
            .unwrap_or_else(|| self.legacy.air_runtime_id())
    }

    pub fn upgrade_item_id(&self, legacy_id: i32) -> Option<i32> {
        let name = self.legacy.item_name(legacy_id)?;
        self.latest.item_name_to_id(name)
    }

    pub fn downgrade_item_id(&self, latest_id: i32) -> Option<i32> {
        let name = self.latest.item_id_to_name(latest_id)?;
        self.legacy.item_id(name)
    }

    /// Legacy item ID for a latest item name.
    pub fn legacy_item_id(&self, name: &str) -> Option<i32> {
        self.legacy.item_id(name)
    }

    pub fn latest_item_id(&self, name: &str) -> Option<i32> {
        self.latest.item_name_to_id(name)
    }

    pub fn upgrade_item(&self, item: &ItemStack) -> ItemStack {
        self.remap_item(item, |id| self.upgrade_item_id(id), |rid| self.upgrade_block(rid))
    }

    pub fn downgrade_item(&self, item: &ItemStack) -> ItemStack {
        self.remap_item(item, |id| self.downgrade_item_id(id), |rid| self.downgrade_block(rid))
    }

    pub fn upgrade_item_instance(&self, instance: &ItemInstance) -> ItemInstance {
        remap_instance(instance, self.upgrade_item(&instance.stack))
    }

    pub fn downgrade_item_instance(&self, instance: &ItemInstance) -> ItemInstance {
        remap_instance(instance, self.downgrade_item(&instance.stack))
    }

    fn remap_item(
        &self,
        item: &ItemStack,
        item_id: impl Fn(i32) -> Option<i32>,
        block_id: impl Fn(u32) -> u32,
    ) -> ItemStack {
        if item.is_empty() {
            return ItemStack::empty();
        }
        let Some(network_id) = item_id(item.network_id) else {
            tracing::trace!("No equivalent for item {}, clearing stack", item.network_id);
            return ItemStack::empty();
        };
        let mut out = item.clone();
        out.network_id = network_id;
        if item.block_runtime_id > 0 {
            out.block_runtime_id = block_id(item.block_runtime_id as u32) as i32;
        }
        out
    }
}

fn remap_instance(instance: &ItemInstance, stack: ItemStack) -> ItemInstance {
    if stack.is_empty() {
        return ItemInstance::default();
    }
    ItemInstance {
        stack_network_id: instance.stack_network_id,
        stack,
    }
}

impl std::fmt::Debug for Remapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Remapper")
            .field("legacy_blocks", &self.legacy.block_count())
            .field("legacy_air", &self.legacy_air())
            .field("latest_air", &self.latest_air)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlockEntry, ItemEntry, MappingData};
    use mvbridge_types::PropertyValue;
    use std::collections::BTreeMap;

    fn block(name: &str) -> BlockEntry {
        BlockEntry {
            name: name.into(),
            states: BTreeMap::new(),
        }
    }

    fn item(name: &str, id: i32) -> ItemEntry {
        ItemEntry {
            name: name.into(),
            id,
        }
    }

    /// Legacy: 0 air, 1 stone, 2 dirt, 3 dirt (duplicate), 4 old_block.
    /// Latest: 0 new_block, 1 stone, 2 air, 3 dirt.
    fn remapper() -> Remapper {
        let legacy = MappingData {
            blocks: vec![
                block("minecraft:air"),
                block("minecraft:stone"),
                block("minecraft:dirt"),
                block("minecraft:dirt"),
                block("minecraft:old_block"),
            ],
            items: vec![
                item("minecraft:stone", 1),
                item("minecraft:dirt", 3),
                item("minecraft:old_item", 900),
            ],
        };
        let latest = MappingData {
            blocks: vec![
                block("minecraft:new_block"),
                block("minecraft:stone"),
                block("minecraft:air"),
                block("minecraft:dirt"),
            ],
            items: vec![
                item("minecraft:stone", 10),
                item("minecraft:dirt", 30),
                item("minecraft:new_item", 700),
            ],
        };
        Remapper::new(
            Arc::new(MappingTable::from_data(legacy, "legacy").unwrap()),
            Arc::new(MappingTable::from_data(latest, "latest").unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn test_block_round_trip() {
        let r = remapper();
        for id in [0, 1, 2] {
            assert_eq!(r.downgrade_block(r.upgrade_block(id)), id);
        }
        assert_eq!(r.upgrade_block(1), 1);
        assert_eq!(r.upgrade_block(0), 2);
    }

    #[test]
    fn test_collision_yields_valid_id() {
        let r = remapper();
        // 3 shares its state with 2; the way back picks the lower ID.
        assert_eq!(r.downgrade_block(r.upgrade_block(3)), 2);
    }

    #[test]
    fn test_fallback_totality() {
        let r = remapper();
        assert_eq!(r.upgrade_block(4), r.latest_air());
        assert_eq!(r.upgrade_block(12345), r.latest_air());
        assert_eq!(r.downgrade_block(0), r.legacy_air());
        assert_eq!(r.downgrade_block(u32::MAX), r.legacy_air());
    }

    #[test]
    fn test_item_remap_with_block() {
        let r = remapper();
        let stack = ItemStack {
            network_id: 1,
            count: 64,
            block_runtime_id: 1,
            extra: vec![0xaa],
            ..Default::default()
        };
        let up = r.upgrade_item(&stack);
        assert_eq!(up.network_id, 10);
        assert_eq!(up.block_runtime_id, 1);
        assert_eq!(up.count, 64);
        assert_eq!(up.extra, vec![0xaa]);
        let down = r.downgrade_item(&up);
        assert_eq!(down.network_id, 1);
        assert_eq!(down.block_runtime_id, 1);
    }

    #[test]
    fn test_unknown_item_is_emptied() {
        let r = remapper();
        assert!(r.upgrade_item(&ItemStack::new(900, 1)).is_empty());
        assert!(r.upgrade_item(&ItemStack::new(-77, 1)).is_empty());
        assert!(r.downgrade_item(&ItemStack::new(700, 1)).is_empty());
        assert!(r.upgrade_item(&ItemStack::empty()).is_empty());

        let instance = ItemInstance {
            stack_network_id: 8,
            stack: ItemStack::new(900, 1),
        };
        assert_eq!(r.upgrade_item_instance(&instance), ItemInstance::default());
    }

    #[test]
    fn test_instance_keeps_stack_id() {
        let r = remapper();
        let instance = ItemInstance {
            stack_network_id: 8,
            stack: ItemStack::new(3, 2),
        };
        let up = r.upgrade_item_instance(&instance);
        assert_eq!(up.stack_network_id, 8);
        assert_eq!(up.stack.network_id, 30);
    }

    #[test]
    fn test_latest_without_air_is_rejected() {
        let legacy = MappingData {
            blocks: vec![block("minecraft:air")],
            items: Vec::new(),
        };
        let table = Arc::new(MappingTable::from_data(legacy, "legacy").unwrap());

        struct NoAir;
        impl CanonicalRegistry for NoAir {
            fn item_name_to_id(&self, _: &str) -> Option<i32> {
                None
            }
            fn item_id_to_name(&self, _: i32) -> Option<&str> {
                None
            }
            fn state_to_runtime_id(&self, _: &BlockState) -> Option<u32> {
                None
            }
            fn runtime_id_to_state(&self, _: u32) -> Option<&BlockState> {
                None
            }
        }
        assert!(Remapper::new(table, Arc::new(NoAir)).is_err());
    }

    #[test]
    fn test_properties_are_part_of_state() {
        let legacy = MappingData {
            blocks: vec![
                block("minecraft:air"),
                BlockEntry {
                    name: "minecraft:wheat".into(),
                    states: BTreeMap::from([("growth".to_string(), PropertyValue::Int(7))]),
                },
            ],
            items: Vec::new(),
        };
        let latest = MappingData {
            blocks: vec![
                block("minecraft:air"),
                BlockEntry {
                    name: "minecraft:wheat".into(),
                    states: BTreeMap::from([("growth".to_string(), PropertyValue::Int(0))]),
                },
            ],
            items: Vec::new(),
        };
        let r = Remapper::new(
            Arc::new(MappingTable::from_data(legacy, "legacy").unwrap()),
            Arc::new(MappingTable::from_data(latest, "latest").unwrap()),
        )
        .unwrap();
        assert_eq!(r.upgrade_block(1), r.latest_air());
    }
}
