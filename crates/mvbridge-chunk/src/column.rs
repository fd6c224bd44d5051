use crate::storage::{read_u8, PalettedStorage};
use crate::sub_chunk::SubChunk;
use crate::{ChunkError, ChunkResult, VerticalRange};
use bytes::{Buf, BufMut};

/// Biome header value meaning "same biomes as the sub-chunk below".
const BIOME_SAME_AS_PREVIOUS: u8 = 0x7f;
/// Size of the pre-1.18 biome grid: one byte per column.
const LEGACY_BIOME_SIZE: usize = 256;

/// How a chunk payload is laid out; taken from the packet and the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLayout {
    pub sub_chunk_count: usize,
    /// Pre-1.18 biomes: a flat 16x16 byte grid instead of 3-D storages.
    pub legacy_biomes: bool,
    pub range: VerticalRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BiomeStorage {
    Explicit(PalettedStorage),
    SameAsPrevious,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Biomes {
    Legacy(Vec<u8>),
    /// One entry per sub-chunk of the vertical range.
    Paletted(Vec<BiomeStorage>),
}

impl Biomes {
    /// Biome ID at chunk-local coordinates; `y` is relative to the bottom of
    /// the range.
    pub fn at(&self, x: u8, y: usize, z: u8) -> Option<u32> {
        match self {
            Biomes::Legacy(grid) => grid
                .get(((z as usize & 15) << 4) | (x as usize & 15))
                .map(|&b| b as u32),
            Biomes::Paletted(storages) => {
                let mut index = (y >> 4).min(storages.len().checked_sub(1)?);
                loop {
                    match &storages[index] {
                        BiomeStorage::Explicit(storage) => {
                            return Some(storage.at(x, (y & 15) as u8, z))
                        }
                        BiomeStorage::SameAsPrevious => index = index.checked_sub(1)?,
                    }
                }
            }
        }
    }
}

/// A decoded chunk column in one version's block numbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkColumn {
    pub air: u32,
    pub range: VerticalRange,
    /// Only the sub-chunks the payload declared, bottom first.
    pub sub_chunks: Vec<SubChunk>,
    pub biomes: Biomes,
}

impl ChunkColumn {
    /// Block at chunk-local x/z and absolute y. Positions outside the
    /// decoded sub-chunks are air.
    pub fn block(&self, x: u8, y: i32, z: u8, layer: usize) -> u32 {
        if y < self.range.min || y > self.range.max {
            return self.air;
        }
        let offset = y - self.range.min;
        self.sub_chunks
            .get((offset >> 4) as usize)
            .map(|sub| sub.block(x, (offset & 15) as u8, z, layer, self.air))
            .unwrap_or(self.air)
    }
}

/// Serialised parts of a column, ready to be written back into a packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialisedData {
    pub sub_chunks: Vec<Vec<u8>>,
    pub biomes: Vec<u8>,
}

impl SerialisedData {
    /// Concatenate everything, followed by `trailing`.
    pub fn into_payload(self, trailing: &[u8]) -> Vec<u8> {
        let len = self.sub_chunks.iter().map(Vec::len).sum::<usize>()
            + self.biomes.len()
            + trailing.len();
        let mut out = Vec::with_capacity(len);
        for sub in self.sub_chunks {
            out.extend_from_slice(&sub);
        }
        out.extend_from_slice(&self.biomes);
        out.extend_from_slice(trailing);
        out
    }
}

/// Decode the sub-chunks and biomes of a LevelChunk payload. Returns the
/// column and the bytes after the biomes (border blocks, block entities).
pub fn decode(data: &[u8], air: u32, layout: ChunkLayout) -> ChunkResult<(ChunkColumn, &[u8])> {
    let max = layout.range.sub_chunk_count();
    if layout.sub_chunk_count > max {
        return Err(ChunkError::TooManySubChunks {
            count: layout.sub_chunk_count,
            max,
        });
    }

    let mut buf = data;
    let mut sub_chunks = Vec::with_capacity(layout.sub_chunk_count);
    for i in 0..layout.sub_chunk_count {
        sub_chunks.push(SubChunk::decode(&mut buf, i as u8)?);
    }

    let biomes = if layout.legacy_biomes {
        if buf.remaining() < LEGACY_BIOME_SIZE {
            return Err(ChunkError::NotEnoughData);
        }
        let grid = buf[..LEGACY_BIOME_SIZE].to_vec();
        buf.advance(LEGACY_BIOME_SIZE);
        Biomes::Legacy(grid)
    } else {
        let mut storages = Vec::with_capacity(max);
        for i in 0..max {
            let header = read_u8(&mut buf)?;
            if header >> 1 == BIOME_SAME_AS_PREVIOUS {
                if i == 0 {
                    return Err(ChunkError::OrphanBiomeReference);
                }
                storages.push(BiomeStorage::SameAsPrevious);
            } else {
                storages.push(BiomeStorage::Explicit(PalettedStorage::decode_body(
                    &mut buf, header,
                )?));
            }
        }
        Biomes::Paletted(storages)
    };

    let column = ChunkColumn {
        air,
        range: layout.range,
        sub_chunks,
        biomes,
    };
    Ok((column, buf))
}

/// Encode a column in the network format it was decoded from.
pub fn encode(column: &ChunkColumn) -> SerialisedData {
    let sub_chunks = column
        .sub_chunks
        .iter()
        .map(|sub| {
            let mut out = Vec::new();
            sub.encode(&mut out);
            out
        })
        .collect();

    let mut biomes = Vec::new();
    match &column.biomes {
        Biomes::Legacy(grid) => biomes.extend_from_slice(grid),
        Biomes::Paletted(storages) => {
            for storage in storages {
                match storage {
                    BiomeStorage::Explicit(storage) => storage.encode(&mut biomes),
                    BiomeStorage::SameAsPrevious => biomes.put_u8(BIOME_SAME_AS_PREVIOUS << 1 | 1),
                }
            }
        }
    }

    SerialisedData { sub_chunks, biomes }
}
