use mvbridge_mappings::{BlockEntry, ItemEntry, MappingData, MappingTable, Remapper};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const LEGACY_AIR: u32 = 0;
pub const LEGACY_STONE: u32 = 1;
pub const LATEST_AIR: u32 = 1;
pub const LATEST_STONE: u32 = 2;

pub const LEGACY_STONE_ITEM: i32 = 1;
pub const LEGACY_SHIELD_ITEM: i32 = 355;
pub const LEGACY_OLD_ITEM: i32 = 900;
pub const LATEST_STONE_ITEM: i32 = 10;
pub const LATEST_SHIELD_ITEM: i32 = 380;
pub const LATEST_NEW_ITEM: i32 = 700;

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

pub fn legacy_data() -> MappingData {
    MappingData {
        blocks: vec![
            block("minecraft:air"),
            block("minecraft:stone"),
            block("minecraft:dirt"),
        ],
        items: vec![
            item("minecraft:stone", LEGACY_STONE_ITEM),
            item("minecraft:shield", LEGACY_SHIELD_ITEM),
            item("minecraft:old_item", LEGACY_OLD_ITEM),
        ],
    }
}

pub fn latest_data() -> MappingData {
    MappingData {
        blocks: vec![
            block("minecraft:dirt"),
            block("minecraft:air"),
            block("minecraft:stone"),
            block("minecraft:new_block"),
        ],
        items: vec![
            item("minecraft:stone", LATEST_STONE_ITEM),
            item("minecraft:shield", LATEST_SHIELD_ITEM),
            item("minecraft:new_item", LATEST_NEW_ITEM),
        ],
    }
}

pub fn latest_table() -> Arc<MappingTable> {
    Arc::new(MappingTable::from_data(latest_data(), "latest").unwrap())
}

pub fn remapper() -> Remapper {
    let legacy = MappingTable::from_data(legacy_data(), "legacy").unwrap();
    Remapper::new(Arc::new(legacy), latest_table()).unwrap()
}
