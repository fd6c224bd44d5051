use super::{read_vec, write_vec, Marshal};
use crate::codec::{CodecResult, Reader, Writer};
use mvbridge_types::{BlockPos, ChunkPos, SubChunkPos, Vec3};

/// Flags for block updates.
pub mod update_block_flags {
    pub const NEIGHBOURS: u32 = 1 << 0;
    pub const NETWORK: u32 = 1 << 1;
    pub const NO_GRAPHICS: u32 = 1 << 2;
    pub const PRIORITY: u32 = 1 << 3;
}

/// Update Block (0x15, clientbound).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateBlock {
    pub position: BlockPos,
    pub new_block_runtime_id: u32,
    pub flags: u32,
    pub layer: u32,
}

impl Marshal for UpdateBlock {
    fn marshal(&self, w: &mut Writer) {
        w.ublock_pos(self.position);
        w.varuint32(self.new_block_runtime_id);
        w.varuint32(self.flags);
        w.varuint32(self.layer);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.position = r.ublock_pos()?;
        self.new_block_runtime_id = r.varuint32()?;
        self.flags = r.varuint32()?;
        self.layer = r.varuint32()?;
        Ok(())
    }
}

/// Update Block Synced (0x6e, clientbound).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateBlockSynced {
    pub position: BlockPos,
    pub new_block_runtime_id: u32,
    pub flags: u32,
    pub layer: u32,
    pub entity_unique_id: u64,
    pub transition_type: u64,
}

impl Marshal for UpdateBlockSynced {
    fn marshal(&self, w: &mut Writer) {
        w.ublock_pos(self.position);
        w.varuint32(self.new_block_runtime_id);
        w.varuint32(self.flags);
        w.varuint32(self.layer);
        w.varuint64(self.entity_unique_id);
        w.varuint64(self.transition_type);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.position = r.ublock_pos()?;
        self.new_block_runtime_id = r.varuint32()?;
        self.flags = r.varuint32()?;
        self.layer = r.varuint32()?;
        self.entity_unique_id = r.varuint64()?;
        self.transition_type = r.varuint64()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockChangeEntry {
    pub block_pos: BlockPos,
    pub block_runtime_id: u32,
    pub flags: u32,
    pub synced_update_entity_unique_id: u64,
    pub synced_update_type: u32,
}

impl Marshal for BlockChangeEntry {
    fn marshal(&self, w: &mut Writer) {
        w.ublock_pos(self.block_pos);
        w.varuint32(self.block_runtime_id);
        w.varuint32(self.flags);
        w.varuint64(self.synced_update_entity_unique_id);
        w.varuint32(self.synced_update_type);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.block_pos = r.ublock_pos()?;
        self.block_runtime_id = r.varuint32()?;
        self.flags = r.varuint32()?;
        self.synced_update_entity_unique_id = r.varuint64()?;
        self.synced_update_type = r.varuint32()?;
        Ok(())
    }
}

/// Update Sub Chunk Blocks (0xac, clientbound). `extra` holds the second
/// (liquid) layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSubChunkBlocks {
    pub position: SubChunkPos,
    pub blocks: Vec<BlockChangeEntry>,
    pub extra: Vec<BlockChangeEntry>,
}

impl Marshal for UpdateSubChunkBlocks {
    fn marshal(&self, w: &mut Writer) {
        w.sub_chunk_pos(self.position);
        write_vec(w, &self.blocks);
        write_vec(w, &self.extra);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.position = r.sub_chunk_pos()?;
        self.blocks = read_vec(r)?;
        self.extra = read_vec(r)?;
        Ok(())
    }
}

pub mod level_event {
    pub const PARTICLES_DESTROY_BLOCK: i32 = 2001;
    pub const PARTICLES_CRACK_BLOCK: i32 = 2014;
}

/// Level Event (0x19, clientbound). Some event types put a block runtime ID
/// in `event_data`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelEvent {
    pub event_type: i32,
    pub position: Vec3,
    pub event_data: i32,
}

impl Marshal for LevelEvent {
    fn marshal(&self, w: &mut Writer) {
        w.varint32(self.event_type);
        w.vec3(self.position);
        w.varint32(self.event_data);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.event_type = r.varint32()?;
        self.position = r.vec3()?;
        self.event_data = r.varint32()?;
        Ok(())
    }
}

pub mod sound_event {
    pub const ITEM_USE_ON: u32 = 0;
    pub const HIT: u32 = 1;
    pub const PLACE: u32 = 6;
    pub const LAND: u32 = 35;
}

/// Level Sound Event (0x7b, both directions). Block sounds put a block
/// runtime ID in `extra_data`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelSoundEvent {
    pub sound_type: u32,
    pub position: Vec3,
    pub extra_data: i32,
    pub entity_type: String,
    pub baby_mob: bool,
    pub disable_relative_volume: bool,
}

impl LevelSoundEvent {
    pub fn carries_block(&self) -> bool {
        matches!(
            self.sound_type,
            sound_event::ITEM_USE_ON | sound_event::HIT | sound_event::PLACE | sound_event::LAND
        )
    }
}

impl Marshal for LevelSoundEvent {
    fn marshal(&self, w: &mut Writer) {
        w.varuint32(self.sound_type);
        w.vec3(self.position);
        w.varint32(self.extra_data);
        w.string(&self.entity_type);
        w.bool(self.baby_mob);
        w.bool(self.disable_relative_volume);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.sound_type = r.varuint32()?;
        self.position = r.vec3()?;
        self.extra_data = r.varint32()?;
        self.entity_type = r.string()?;
        self.baby_mob = r.bool()?;
        self.disable_relative_volume = r.bool()?;
        Ok(())
    }
}

/// Sub-chunk count values that switch LevelChunk into sub-chunk request mode.
pub const SUB_CHUNK_REQUEST_MODE_LIMITLESS: u32 = u32::MAX;
pub const SUB_CHUNK_REQUEST_MODE_LIMITED: u32 = u32::MAX - 1;

/// Level Chunk (0x3a, clientbound).
///
/// With caching disabled `raw_payload` holds the serialised sub-chunks,
/// biomes, a border block byte and any block entity NBT.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelChunk {
    pub position: ChunkPos,
    pub dimension: i32,
    pub sub_chunk_count: u32,
    /// Only sent in limited request mode.
    pub highest_sub_chunk: u16,
    pub cache_enabled: bool,
    pub blob_hashes: Vec<u64>,
    pub raw_payload: Vec<u8>,
}

impl LevelChunk {
    /// True when the client is asked to request sub-chunks separately.
    pub fn request_mode(&self) -> bool {
        self.sub_chunk_count == SUB_CHUNK_REQUEST_MODE_LIMITLESS
            || self.sub_chunk_count == SUB_CHUNK_REQUEST_MODE_LIMITED
    }
}

impl Marshal for LevelChunk {
    fn marshal(&self, w: &mut Writer) {
        w.varint32(self.position.x);
        w.varint32(self.position.z);
        w.varint32(self.dimension);
        w.varuint32(self.sub_chunk_count);
        if self.sub_chunk_count == SUB_CHUNK_REQUEST_MODE_LIMITED {
            w.u16(self.highest_sub_chunk);
        }
        w.bool(self.cache_enabled);
        if self.cache_enabled {
            w.count(self.blob_hashes.len());
            for hash in &self.blob_hashes {
                w.u64(*hash);
            }
        }
        w.byte_slice(&self.raw_payload);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        let x = r.varint32()?;
        let z = r.varint32()?;
        self.position = ChunkPos::new(x, z);
        self.dimension = r.varint32()?;
        self.sub_chunk_count = r.varuint32()?;
        self.highest_sub_chunk = if self.sub_chunk_count == SUB_CHUNK_REQUEST_MODE_LIMITED {
            r.u16()?
        } else {
            0
        };
        self.cache_enabled = r.bool()?;
        self.blob_hashes.clear();
        if self.cache_enabled {
            let len = r.count()?;
            for _ in 0..len {
                self.blob_hashes.push(r.u64()?);
            }
        }
        self.raw_payload = r.byte_slice()?;
        Ok(())
    }
}

pub mod sub_chunk_result {
    pub const SUCCESS: u8 = 1;
    pub const CHUNK_NOT_FOUND: u8 = 2;
    pub const INVALID_DIMENSION: u8 = 3;
    pub const PLAYER_NOT_FOUND: u8 = 4;
    pub const INDEX_OUT_OF_BOUNDS: u8 = 5;
    pub const SUCCESS_ALL_AIR: u8 = 6;
}

pub const HEIGHT_MAP_HAS_DATA: u8 = 1;

/// One sub-chunk answer inside a SubChunk packet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubChunkEntry {
    pub offset: [i8; 3],
    pub result: u8,
    pub raw_payload: Vec<u8>,
    pub height_map_type: u8,
    /// 256 bytes when `height_map_type` is `HEIGHT_MAP_HAS_DATA`.
    pub height_map_data: Vec<u8>,
    pub blob_hash: u64,
}

impl SubChunkEntry {
    fn has_payload(&self, cache_enabled: bool) -> bool {
        !cache_enabled || self.result != sub_chunk_result::SUCCESS_ALL_AIR
    }

    fn write(&self, w: &mut Writer, cache_enabled: bool) {
        for v in self.offset {
            w.i8(v);
        }
        w.u8(self.result);
        if self.has_payload(cache_enabled) {
            w.byte_slice(&self.raw_payload);
        }
        w.u8(self.height_map_type);
        if self.height_map_type == HEIGHT_MAP_HAS_DATA {
            w.bytes(&self.height_map_data);
        }
        if cache_enabled {
            w.u64(self.blob_hash);
        }
    }

    fn read(&mut self, r: &mut Reader, cache_enabled: bool) -> CodecResult<()> {
        for v in &mut self.offset {
            *v = r.i8()?;
        }
        self.result = r.u8()?;
        if self.has_payload(cache_enabled) {
            self.raw_payload = r.byte_slice()?;
        }
        self.height_map_type = r.u8()?;
        if self.height_map_type == HEIGHT_MAP_HAS_DATA {
            self.height_map_data = r.bytes(256)?;
        }
        if cache_enabled {
            self.blob_hash = r.u64()?;
        }
        Ok(())
    }
}

/// Sub Chunk (0xae, clientbound).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubChunk {
    pub cache_enabled: bool,
    pub dimension: i32,
    pub position: SubChunkPos,
    pub entries: Vec<SubChunkEntry>,
}

impl Marshal for SubChunk {
    fn marshal(&self, w: &mut Writer) {
        w.bool(self.cache_enabled);
        w.varint32(self.dimension);
        w.sub_chunk_pos(self.position);
        w.u32(self.entries.len() as u32);
        for entry in &self.entries {
            entry.write(w, self.cache_enabled);
        }
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.cache_enabled = r.bool()?;
        self.dimension = r.varint32()?;
        self.position = r.sub_chunk_pos()?;
        let len = r.u32()? as usize;
        let len = r.check_count(len)?;
        self.entries = Vec::with_capacity(len.min(1024));
        for _ in 0..len {
            let mut entry = SubChunkEntry::default();
            entry.read(r, self.cache_enabled)?;
            self.entries.push(entry);
        }
        Ok(())
    }
}

/// Lectern Update (0x7d, serverbound).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LecternUpdate {
    pub page: u8,
    pub page_count: u8,
    pub position: BlockPos,
}

impl Marshal for LecternUpdate {
    fn marshal(&self, w: &mut Writer) {
        w.u8(self.page);
        w.u8(self.page_count);
        w.ublock_pos(self.position);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.page = r.u8()?;
        self.page_count = r.u8()?;
        self.position = r.ublock_pos()?;
        Ok(())
    }
}
