mod column;
mod recode;
mod storage;
mod sub_chunk;

pub use column::{decode, encode, BiomeStorage, Biomes, ChunkColumn, ChunkLayout, SerialisedData};
pub use recode::{recode, recode_sub_chunk};
pub use storage::PalettedStorage;
pub use sub_chunk::SubChunk;

use mvbridge_protocol_core::CodecError;
use thiserror::Error;

/// Errors raised when a chunk payload does not match its declared layout.
#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("Chunk data ended early")]
    NotEnoughData,
    #[error("Unknown sub-chunk version {0}")]
    UnknownSubChunkVersion(u8),
    #[error("Storage uses the disk encoding")]
    PersistentStorage,
    #[error("Invalid bits per index {0}")]
    InvalidBitsPerIndex(u8),
    #[error("Palette of {len} entries does not fit {bits} bits per index")]
    InvalidPaletteSize { len: i32, bits: u8 },
    #[error("Palette index {index} out of range for palette of {len}")]
    PaletteIndexOutOfRange { index: u32, len: usize },
    #[error("First biome storage refers to a previous one")]
    OrphanBiomeReference,
    #[error("{count} sub-chunks exceed the {max} of the vertical range")]
    TooManySubChunks { count: usize, max: usize },
    #[error("Bad var-int in chunk data: {0}")]
    Codec(#[from] CodecError),
}

pub type ChunkResult<T> = Result<T, ChunkError>;

/// Vertical extent of a dimension in blocks, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerticalRange {
    pub min: i32,
    pub max: i32,
}

impl VerticalRange {
    pub const OVERWORLD: VerticalRange = VerticalRange::new(-64, 319);
    pub const NETHER: VerticalRange = VerticalRange::new(0, 127);
    pub const END: VerticalRange = VerticalRange::new(0, 255);

    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Range of a dimension ID as sent in chunk packets.
    pub fn for_dimension(dimension: i32) -> Self {
        match dimension {
            1 => Self::NETHER,
            2 => Self::END,
            _ => Self::OVERWORLD,
        }
    }

    pub fn height(&self) -> i32 {
        self.max - self.min + 1
    }

    pub fn sub_chunk_count(&self) -> usize {
        ((self.height() + 15) >> 4) as usize
    }
}
