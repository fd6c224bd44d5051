use mvbridge_types::{BlockState, AIR_BLOCK};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MappingError {
    #[error("Mapping table {0} has no minecraft:air block")]
    MissingAir(String),
    #[error("Cannot read mapping table: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid mapping JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type MappingResult<T> = Result<T, MappingError>;

/// A block palette entry. Its runtime ID is its index in the palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEntry {
    pub name: String,
    #[serde(default)]
    pub states: BTreeMap<String, mvbridge_types::PropertyValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEntry {
    pub name: String,
    pub id: i32,
}

/// On-disk form of one version's block palette and item table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingData {
    #[serde(default)]
    pub blocks: Vec<BlockEntry>,
    #[serde(default)]
    pub items: Vec<ItemEntry>,
}

/// Numeric block and item IDs of one protocol version and the canonical
/// names they stand for. Immutable once built.
#[derive(Debug, Clone)]
pub struct MappingTable {
    states: Vec<BlockState>,
    state_ids: HashMap<BlockState, u32>,
    item_names: HashMap<i32, String>,
    item_ids: HashMap<String, i32>,
    air: u32,
}

impl MappingTable {
    /// Build a table from parsed data. `source` names the data in errors.
    pub fn from_data(data: MappingData, source: &str) -> MappingResult<Self> {
        let states: Vec<BlockState> = data
            .blocks
            .into_iter()
            .map(|entry| BlockState {
                name: entry.name,
                properties: entry.states,
            })
            .collect();

        // The lowest runtime ID wins when several share a state.
        let mut state_ids = HashMap::with_capacity(states.len());
        for (id, state) in states.iter().enumerate() {
            state_ids.entry(state.clone()).or_insert(id as u32);
        }

        let air = states
            .iter()
            .position(|s| s.name == AIR_BLOCK && s.properties.is_empty())
            .ok_or_else(|| MappingError::MissingAir(source.to_string()))? as u32;

        let mut item_names = HashMap::with_capacity(data.items.len());
        let mut item_ids = HashMap::with_capacity(data.items.len());
        for item in data.items {
            item_names.entry(item.id).or_insert_with(|| item.name.clone());
            item_ids.entry(item.name).or_insert(item.id);
        }

        Ok(Self {
            states,
            state_ids,
            item_names,
            item_ids,
            air,
        })
    }

    /// Load a table from a JSON file.
    pub fn load(path: &Path) -> MappingResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let data: MappingData = serde_json::from_str(&contents)?;
        let table = Self::from_data(data, &path.display().to_string())?;
        tracing::info!(
            "Loaded {} block states and {} items from {}",
            table.block_count(),
            table.item_count(),
            path.display()
        );
        Ok(table)
    }

    pub fn legacy_to_canonical(&self, id: u32) -> Option<&BlockState> {
        self.states.get(id as usize)
    }

    pub fn canonical_to_legacy(&self, state: &BlockState) -> Option<u32> {
        self.state_ids.get(state).copied()
    }

    pub fn item_name(&self, id: i32) -> Option<&str> {
        self.item_names.get(&id).map(String::as_str)
    }

    pub fn item_id(&self, name: &str) -> Option<i32> {
        self.item_ids.get(name).copied()
    }

    /// Runtime ID of `minecraft:air` in this version.
    pub fn air_runtime_id(&self) -> u32 {
        self.air
    }

    pub fn block_count(&self) -> usize {
        self.states.len()
    }

    pub fn item_count(&self) -> usize {
        self.item_names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvbridge_types::PropertyValue;
    use std::io::Write;

    const TABLE: &str = r#"{
        "blocks": [
            {"name": "minecraft:stone"},
            {"name": "minecraft:air"},
            {"name": "minecraft:wheat", "states": {"growth": 0}},
            {"name": "minecraft:wheat", "states": {"growth": 0}}
        ],
        "items": [
            {"name": "minecraft:stone", "id": 1},
            {"name": "minecraft:wheat_seeds", "id": 295}
        ]
    }"#;

    fn table() -> MappingTable {
        MappingTable::from_data(serde_json::from_str(TABLE).unwrap(), "test").unwrap()
    }

    #[test]
    fn test_lookups() {
        let t = table();
        assert_eq!(t.air_runtime_id(), 1);
        assert_eq!(t.legacy_to_canonical(0).unwrap().name, "minecraft:stone");
        assert!(t.legacy_to_canonical(99).is_none());
        assert_eq!(t.canonical_to_legacy(&BlockState::new("minecraft:stone")), Some(0));
        assert_eq!(t.item_name(295), Some("minecraft:wheat_seeds"));
        assert_eq!(t.item_id("minecraft:stone"), Some(1));
        assert_eq!(t.item_id("minecraft:diamond"), None);
    }

    #[test]
    fn test_collision_lowest_id_wins() {
        let t = table();
        let wheat = BlockState::new("minecraft:wheat").with("growth", PropertyValue::Int(0));
        assert_eq!(t.canonical_to_legacy(&wheat), Some(2));
        assert_eq!(t.legacy_to_canonical(3), Some(&wheat));
    }

    #[test]
    fn test_missing_air_fails() {
        let data = MappingData {
            blocks: vec![BlockEntry {
                name: "minecraft:stone".into(),
                states: BTreeMap::new(),
            }],
            items: Vec::new(),
        };
        let err = MappingTable::from_data(data, "broken.json").unwrap_err();
        assert!(matches!(err, MappingError::MissingAir(ref s) if s == "broken.json"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TABLE.as_bytes()).unwrap();
        let t = MappingTable::load(file.path()).unwrap();
        assert_eq!(t.block_count(), 4);
        assert_eq!(t.item_count(), 2);
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();
        assert!(matches!(
            MappingTable::load(file.path()),
            Err(MappingError::Json(_))
        ));
    }
}
