mod entity;
mod game;
mod inventory;
mod world;

pub use entity::*;
pub use game::*;
pub use inventory::*;
pub use world::*;

use crate::codec::{CodecResult, Reader, Writer};
use mvbridge_types::ProtocolVersion;

/// The protocol revision the packet shapes in this module belong to.
pub const LATEST_VERSION: ProtocolVersion = ProtocolVersion::new(685, "1.21.0");

/// Wire packet IDs. Shared by every supported version.
pub mod ids {
    pub const RESOURCE_PACKS_INFO: u32 = 0x06;
    pub const TEXT: u32 = 0x09;
    pub const START_GAME: u32 = 0x0b;
    pub const ADD_PLAYER: u32 = 0x0c;
    pub const ADD_ITEM_ACTOR: u32 = 0x0f;
    pub const UPDATE_BLOCK: u32 = 0x15;
    pub const LEVEL_EVENT: u32 = 0x19;
    pub const MOB_EFFECT: u32 = 0x1c;
    pub const INVENTORY_TRANSACTION: u32 = 0x1e;
    pub const MOB_EQUIPMENT: u32 = 0x1f;
    pub const MOB_ARMOUR_EQUIPMENT: u32 = 0x20;
    pub const SET_ACTOR_MOTION: u32 = 0x28;
    pub const CONTAINER_CLOSE: u32 = 0x2f;
    pub const INVENTORY_CONTENT: u32 = 0x31;
    pub const INVENTORY_SLOT: u32 = 0x32;
    pub const CRAFTING_DATA: u32 = 0x34;
    /// Removed from the protocol; older clients still send it.
    pub const CRAFTING_EVENT: u32 = 0x35;
    pub const LEVEL_CHUNK: u32 = 0x3a;
    pub const AVAILABLE_COMMANDS: u32 = 0x4c;
    pub const SHOW_STORE_OFFER: u32 = 0x5b;
    pub const UPDATE_BLOCK_SYNCED: u32 = 0x6e;
    pub const LEVEL_SOUND_EVENT: u32 = 0x7b;
    pub const LECTERN_UPDATE: u32 = 0x7d;
    pub const PLAYER_AUTH_INPUT: u32 = 0x90;
    pub const CREATIVE_CONTENT: u32 = 0x91;
    pub const ITEM_STACK_REQUEST: u32 = 0x93;
    pub const UPDATE_SUB_CHUNK_BLOCKS: u32 = 0xac;
    pub const SUB_CHUNK: u32 = 0xae;
    pub const CODE_BUILDER_SOURCE: u32 = 0xb2;
    pub const PLAYER_TOGGLE_CRAFTER_SLOT_REQUEST: u32 = 0x132;
    pub const SET_PLAYER_INVENTORY_OPTIONS: u32 = 0x133;
    /// Clientbound only in the latest version; older clients echo it back.
    pub const SET_HUD: u32 = 0x134;
}

/// Reads and writes the body of a packet (everything after the packet header).
///
/// Packets are created zero-valued by a pool factory and filled in place.
pub trait Marshal {
    fn marshal(&self, w: &mut Writer);
    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()>;
}

/// A decoded packet of any version: knows its wire ID and how to hold bytes
/// it does not understand.
pub trait WirePacket: Marshal + Sized {
    fn id(&self) -> u32;
    fn unknown(id: u32, payload: Vec<u8>) -> Self;
}

/// Read a VarInt-prefixed list of marshalled values.
pub fn read_vec<T: Marshal + Default>(r: &mut Reader) -> CodecResult<Vec<T>> {
    let len = r.count()?;
    read_vec_of_len(r, len)
}

pub fn read_vec_of_len<T: Marshal + Default>(r: &mut Reader, len: usize) -> CodecResult<Vec<T>> {
    let mut out = Vec::with_capacity(len.min(1024));
    for _ in 0..len {
        let mut value = T::default();
        value.unmarshal(r)?;
        out.push(value);
    }
    Ok(out)
}

pub fn write_vec<T: Marshal>(w: &mut Writer, values: &[T]) {
    w.count(values.len());
    for value in values {
        value.marshal(w);
    }
}

macro_rules! game_packets {
    ($($variant:ident => $id:path,)*) => {
        /// Every packet shape of the latest protocol revision.
        #[derive(Debug, Clone, PartialEq)]
        pub enum GamePacket {
            $($variant($variant),)*
            /// A packet this crate does not model, kept as its raw body.
            Unknown { id: u32, payload: Vec<u8> },
        }

        impl GamePacket {
            pub fn name(&self) -> &'static str {
                match self {
                    $(GamePacket::$variant(_) => stringify!($variant),)*
                    GamePacket::Unknown { .. } => "Unknown",
                }
            }

            /// Zero-value factory for a modelled packet ID.
            pub fn factory(id: u32) -> Option<fn() -> GamePacket> {
                match id {
                    $($id => Some((|| GamePacket::$variant($variant::default())) as fn() -> GamePacket),)*
                    _ => None,
                }
            }
        }

        impl WirePacket for GamePacket {
            fn id(&self) -> u32 {
                match self {
                    $(GamePacket::$variant(_) => $id,)*
                    GamePacket::Unknown { id, .. } => *id,
                }
            }

            fn unknown(id: u32, payload: Vec<u8>) -> Self {
                GamePacket::Unknown { id, payload }
            }
        }

        impl Marshal for GamePacket {
            fn marshal(&self, w: &mut Writer) {
                match self {
                    $(GamePacket::$variant(pk) => pk.marshal(w),)*
                    GamePacket::Unknown { payload, .. } => w.bytes(payload),
                }
            }

            fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
                match self {
                    $(GamePacket::$variant(pk) => pk.unmarshal(r),)*
                    GamePacket::Unknown { payload, .. } => {
                        *payload = r.rest();
                        Ok(())
                    }
                }
            }
        }

        $(
            impl From<$variant> for GamePacket {
                fn from(pk: $variant) -> Self {
                    GamePacket::$variant(pk)
                }
            }
        )*
    };
}

game_packets! {
    ResourcePacksInfo => ids::RESOURCE_PACKS_INFO,
    Text => ids::TEXT,
    StartGame => ids::START_GAME,
    AddPlayer => ids::ADD_PLAYER,
    AddItemActor => ids::ADD_ITEM_ACTOR,
    UpdateBlock => ids::UPDATE_BLOCK,
    LevelEvent => ids::LEVEL_EVENT,
    MobEffect => ids::MOB_EFFECT,
    InventoryTransaction => ids::INVENTORY_TRANSACTION,
    MobEquipment => ids::MOB_EQUIPMENT,
    MobArmourEquipment => ids::MOB_ARMOUR_EQUIPMENT,
    SetActorMotion => ids::SET_ACTOR_MOTION,
    ContainerClose => ids::CONTAINER_CLOSE,
    InventoryContent => ids::INVENTORY_CONTENT,
    InventorySlot => ids::INVENTORY_SLOT,
    CraftingData => ids::CRAFTING_DATA,
    LevelChunk => ids::LEVEL_CHUNK,
    AvailableCommands => ids::AVAILABLE_COMMANDS,
    ShowStoreOffer => ids::SHOW_STORE_OFFER,
    UpdateBlockSynced => ids::UPDATE_BLOCK_SYNCED,
    LevelSoundEvent => ids::LEVEL_SOUND_EVENT,
    LecternUpdate => ids::LECTERN_UPDATE,
    PlayerAuthInput => ids::PLAYER_AUTH_INPUT,
    CreativeContent => ids::CREATIVE_CONTENT,
    ItemStackRequest => ids::ITEM_STACK_REQUEST,
    UpdateSubChunkBlocks => ids::UPDATE_SUB_CHUNK_BLOCKS,
    SubChunk => ids::SUB_CHUNK,
    CodeBuilderSource => ids::CODE_BUILDER_SOURCE,
    PlayerToggleCrafterSlotRequest => ids::PLAYER_TOGGLE_CRAFTER_SLOT_REQUEST,
    SetPlayerInventoryOptions => ids::SET_PLAYER_INVENTORY_OPTIONS,
}

#[cfg(test)]
pub(crate) fn roundtrip<T: Marshal + Default>(pk: &T) -> T {
    let mut w = Writer::new(0);
    pk.marshal(&mut w);
    let mut r = Reader::new(w.into_bytes(), 0, true);
    let mut out = T::default();
    out.unmarshal(&mut r).unwrap();
    assert_eq!(r.remaining(), 0, "trailing bytes after unmarshal");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_matches_id() {
        for id in [ids::TEXT, ids::LEVEL_CHUNK, ids::SET_PLAYER_INVENTORY_OPTIONS] {
            let pk = GamePacket::factory(id).unwrap()();
            assert_eq!(pk.id(), id);
        }
        assert!(GamePacket::factory(ids::CRAFTING_EVENT).is_none());
    }

    #[test]
    fn test_unknown_keeps_body() {
        let mut pk = GamePacket::unknown(0x99, Vec::new());
        let mut r = Reader::new(vec![1u8, 2, 3], 0, true);
        pk.unmarshal(&mut r).unwrap();
        let mut w = Writer::new(0);
        pk.marshal(&mut w);
        assert_eq!(&w.into_bytes()[..], &[1, 2, 3]);
        assert_eq!(pk.id(), 0x99);
        assert_eq!(pk.name(), "Unknown");
    }
}
