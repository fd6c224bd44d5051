use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One supported wire revision of the Bedrock protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtocolVersion {
    /// Protocol number sent in the login request (e.g. 671).
    pub id: i32,
    /// Human-readable game version (e.g. "1.20.80").
    pub name: &'static str,
}

impl ProtocolVersion {
    pub const fn new(id: i32, name: &'static str) -> Self {
        Self { id, name }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// A block position in the world (x, y, z integers).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Position of a 16x16x16 sub-chunk, in sub-chunk units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubChunkPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl SubChunkPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// A chunk column position (x, z).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

/// A single precision 3D vector, as used for positions and velocities on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Value of a single block state property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i32),
    String(String),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Int(i) => write!(f, "{}", i),
            PropertyValue::String(s) => f.write_str(s),
        }
    }
}

/// A block in its canonical form: a namespaced name plus an ordered property set.
/// This is the pivot every version's numeric runtime IDs translate through.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockState {
    pub name: String,
    #[serde(default, rename = "states")]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl BlockState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn air() -> Self {
        Self::new(AIR_BLOCK)
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.properties.is_empty() {
            f.write_str("[")?;
            for (i, (k, v)) in self.properties.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{}={}", k, v)?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

/// Name of the air block in every supported version.
pub const AIR_BLOCK: &str = "minecraft:air";

/// An item stack as written on the wire.
///
/// A `network_id` of 0 is the empty slot; every other field is meaningless then.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemStack {
    pub network_id: i32,
    pub metadata: u32,
    pub count: u16,
    /// Runtime ID of the block this item places, or 0.
    pub block_runtime_id: i32,
    /// Opaque user data (NBT, can-place-on and can-break lists).
    pub extra: Vec<u8>,
    /// Only present on the wire for shields.
    pub blocking_tick: i64,
}

impl ItemStack {
    pub fn new(network_id: i32, count: u16) -> Self {
        Self {
            network_id,
            count,
            ..Default::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.network_id == 0
    }
}

/// An item stack with its server-assigned stack network ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemInstance {
    pub stack_network_id: i32,
    pub stack: ItemStack,
}

impl ItemInstance {
    pub fn new(stack: ItemStack) -> Self {
        Self {
            stack_network_id: 0,
            stack,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_state_display() {
        let state = BlockState::new("minecraft:stone")
            .with("stone_type", PropertyValue::String("granite".into()));
        assert_eq!(state.to_string(), "minecraft:stone[stone_type=granite]");
        assert_eq!(BlockState::air().to_string(), "minecraft:air");
    }

    #[test]
    fn test_property_order_is_canonical() {
        let a = BlockState::new("minecraft:log")
            .with("pillar_axis", PropertyValue::String("y".into()))
            .with("age", PropertyValue::Int(1));
        let b = BlockState::new("minecraft:log")
            .with("age", PropertyValue::Int(1))
            .with("pillar_axis", PropertyValue::String("y".into()));
        assert_eq!(a, b);
    }

    #[test]
    fn test_block_state_json() {
        let state: BlockState = serde_json::from_str(
            r#"{"name":"minecraft:wheat","states":{"growth":3,"lit":true,"facing":"north"}}"#,
        )
        .unwrap();
        assert_eq!(state.properties["growth"], PropertyValue::Int(3));
        assert_eq!(state.properties["lit"], PropertyValue::Bool(true));
        assert_eq!(
            state.properties["facing"],
            PropertyValue::String("north".into())
        );
    }

    #[test]
    fn test_empty_item() {
        assert!(ItemStack::empty().is_empty());
        assert!(!ItemStack::new(5, 1).is_empty());
    }
}
