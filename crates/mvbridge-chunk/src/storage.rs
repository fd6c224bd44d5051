use crate::{ChunkError, ChunkResult};
use bytes::{Buf, BufMut};
use mvbridge_protocol_core::{read_varint32, write_varint32};

/// Bits per index a network storage may use.
const VALID_BITS: [u8; 9] = [0, 1, 2, 3, 4, 5, 6, 8, 16];

/// Number of voxels in one storage (16x16x16).
pub const STORAGE_SIZE: usize = 4096;

fn words_for(bits: u8) -> usize {
    if bits == 0 {
        return 0;
    }
    let per_word = 32 / bits as usize;
    (STORAGE_SIZE + per_word - 1) / per_word
}

/// Smallest valid index width able to address `len` palette entries.
fn bits_for(len: usize) -> u8 {
    VALID_BITS
        .iter()
        .copied()
        .find(|&bits| len <= 1usize << bits)
        .unwrap_or(16)
}

/// Voxel index for chunk-local coordinates. Y varies fastest.
#[inline]
pub fn voxel_index(x: u8, y: u8, z: u8) -> usize {
    ((x as usize & 15) << 8) | ((z as usize & 15) << 4) | (y as usize & 15)
}

/// A 16x16x16 grid of IDs: a palette of distinct values and packed
/// indices into it, `bits_per_index` bits each, never straddling a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PalettedStorage {
    bits_per_index: u8,
    words: Vec<u32>,
    palette: Vec<u32>,
}

impl PalettedStorage {
    /// Storage where every voxel holds `value`.
    pub fn uniform(value: u32) -> Self {
        Self {
            bits_per_index: 0,
            words: Vec::new(),
            palette: vec![value],
        }
    }

    /// Pack a palette and one palette index per voxel.
    pub fn from_indices(palette: Vec<u32>, indices: &[u16; STORAGE_SIZE]) -> Self {
        let bits_per_index = bits_for(palette.len());
        let mut storage = Self {
            bits_per_index,
            words: vec![0; words_for(bits_per_index)],
            palette,
        };
        if bits_per_index > 0 {
            for (i, &idx) in indices.iter().enumerate() {
                storage.put_index(i, idx as u32);
            }
        }
        storage
    }

    pub fn bits_per_index(&self) -> u8 {
        self.bits_per_index
    }

    pub fn palette(&self) -> &[u32] {
        &self.palette
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Palette index stored for voxel `i`.
    pub fn index(&self, i: usize) -> u32 {
        if self.bits_per_index == 0 {
            return 0;
        }
        let bits = self.bits_per_index as usize;
        let per_word = 32 / bits;
        let mask = (1u32 << bits) - 1;
        let word = self.words[i / per_word];
        (word >> ((i % per_word) * bits)) & mask
    }

    fn put_index(&mut self, i: usize, idx: u32) {
        let bits = self.bits_per_index as usize;
        let per_word = 32 / bits;
        let shift = (i % per_word) * bits;
        let mask = ((1u64 << bits) - 1) as u32;
        let word = &mut self.words[i / per_word];
        *word = (*word & !(mask << shift)) | ((idx & mask) << shift);
    }

    pub fn at(&self, x: u8, y: u8, z: u8) -> u32 {
        self.palette[self.index(voxel_index(x, y, z)) as usize]
    }

    /// Set a voxel, growing the index width when the palette outgrows it.
    /// The palette holds at most one entry more than there are voxels.
    pub fn set(&mut self, x: u8, y: u8, z: u8, value: u32) {
        let idx = match self.palette.iter().position(|&v| v == value) {
            Some(idx) => idx,
            None => {
                if self.palette.len() >= STORAGE_SIZE {
                    self.compact();
                }
                self.palette.push(value);
                self.palette.len() - 1
            }
        };
        if self.palette.len() > 1usize << self.bits_per_index {
            self.repack(bits_for(self.palette.len()));
        }
        if self.bits_per_index > 0 {
            self.put_index(voxel_index(x, y, z), idx as u32);
        }
    }

    /// Drop palette entries no voxel refers to.
    fn compact(&mut self) {
        let mut palette = Vec::new();
        let mut translated: Vec<Option<u16>> = vec![None; self.palette.len()];
        let mut indices = [0u16; STORAGE_SIZE];
        for (i, slot) in indices.iter_mut().enumerate() {
            let old = self.index(i) as usize;
            *slot = *translated[old].get_or_insert_with(|| {
                palette.push(self.palette[old]);
                (palette.len() - 1) as u16
            });
        }
        *self = Self::from_indices(palette, &indices);
    }

    fn repack(&mut self, bits: u8) {
        let indices: Vec<u32> = (0..STORAGE_SIZE).map(|i| self.index(i)).collect();
        self.bits_per_index = bits;
        self.words = vec![0; words_for(bits)];
        for (i, idx) in indices.into_iter().enumerate() {
            self.put_index(i, idx);
        }
    }

    /// Storage with every palette value replaced through `remap`, walking
    /// each voxel into freshly packed indices. Values that collapse onto the
    /// same result share one palette entry.
    pub fn remapped(&self, remap: &mut impl FnMut(u32) -> u32) -> Self {
        let mut palette = Vec::with_capacity(self.palette.len());
        let translated: Vec<u16> = self
            .palette
            .iter()
            .map(|&old| {
                let new = remap(old);
                match palette.iter().position(|&v| v == new) {
                    Some(idx) => idx as u16,
                    None => {
                        palette.push(new);
                        (palette.len() - 1) as u16
                    }
                }
            })
            .collect();

        let mut indices = [0u16; STORAGE_SIZE];
        for (i, slot) in indices.iter_mut().enumerate() {
            *slot = translated[self.index(i) as usize];
        }
        Self::from_indices(palette, &indices)
    }

    /// Decode a storage whose header byte has already been read.
    pub(crate) fn decode_body(buf: &mut &[u8], header: u8) -> ChunkResult<Self> {
        if header & 1 == 0 {
            return Err(ChunkError::PersistentStorage);
        }
        let bits_per_index = header >> 1;
        if !VALID_BITS.contains(&bits_per_index) {
            return Err(ChunkError::InvalidBitsPerIndex(bits_per_index));
        }

        let word_count = words_for(bits_per_index);
        if buf.remaining() < word_count * 4 {
            return Err(ChunkError::NotEnoughData);
        }
        let words: Vec<u32> = (0..word_count).map(|_| buf.get_u32_le()).collect();

        let palette_len = if bits_per_index == 0 {
            1
        } else {
            let len = read_varint32(buf)?;
            if len <= 0 || len as i64 > 1i64 << bits_per_index {
                return Err(ChunkError::InvalidPaletteSize {
                    len,
                    bits: bits_per_index,
                });
            }
            len as usize
        };
        let mut palette = Vec::with_capacity(palette_len);
        for _ in 0..palette_len {
            palette.push(read_varint32(buf)? as u32);
        }

        let storage = Self {
            bits_per_index,
            words,
            palette,
        };
        if bits_per_index > 0 {
            for i in 0..STORAGE_SIZE {
                let index = storage.index(i);
                if index as usize >= storage.palette.len() {
                    return Err(ChunkError::PaletteIndexOutOfRange {
                        index,
                        len: storage.palette.len(),
                    });
                }
            }
        }
        Ok(storage)
    }

    pub(crate) fn decode(buf: &mut &[u8]) -> ChunkResult<Self> {
        let header = read_u8(buf)?;
        Self::decode_body(buf, header)
    }

    pub(crate) fn encode(&self, out: &mut Vec<u8>) {
        out.put_u8(self.bits_per_index << 1 | 1);
        for &word in &self.words {
            out.put_u32_le(word);
        }
        if self.bits_per_index != 0 {
            write_varint32(out, self.palette.len() as i32);
        }
        for &value in &self.palette {
            write_varint32(out, value as i32);
        }
    }
}

pub(crate) fn read_u8(buf: &mut &[u8]) -> ChunkResult<u8> {
    if !buf.has_remaining() {
        return Err(ChunkError::NotEnoughData);
    }
    Ok(buf.get_u8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_counts() {
        assert_eq!(words_for(0), 0);
        assert_eq!(words_for(1), 128);
        assert_eq!(words_for(3), 410);
        assert_eq!(words_for(5), 683);
        assert_eq!(words_for(16), 2048);
    }

    #[test]
    fn test_bits_for_palette() {
        assert_eq!(bits_for(1), 0);
        assert_eq!(bits_for(2), 1);
        assert_eq!(bits_for(5), 3);
        assert_eq!(bits_for(65), 8);
        assert_eq!(bits_for(300), 16);
    }

    #[test]
    fn test_uniform_encoding() {
        let mut out = Vec::new();
        PalettedStorage::uniform(3).encode(&mut out);
        // header (0 bits, network flag), zig-zag 3
        assert_eq!(out, vec![0x01, 0x06]);
        let mut slice = &out[..];
        let decoded = PalettedStorage::decode(&mut slice).unwrap();
        assert_eq!(decoded, PalettedStorage::uniform(3));
        assert!(slice.is_empty());
    }

    #[test]
    fn test_set_grows_width() {
        let mut storage = PalettedStorage::uniform(0);
        storage.set(0, 0, 0, 7);
        assert_eq!(storage.bits_per_index(), 1);
        storage.set(1, 2, 3, 8);
        storage.set(15, 15, 15, 9);
        assert_eq!(storage.bits_per_index(), 2);
        storage.set(4, 4, 4, 10);
        assert_eq!(storage.bits_per_index(), 3);
        assert_eq!(storage.at(0, 0, 0), 7);
        assert_eq!(storage.at(1, 2, 3), 8);
        assert_eq!(storage.at(15, 15, 15), 9);
        assert_eq!(storage.at(4, 4, 4), 10);
        assert_eq!(storage.at(5, 5, 5), 0);
    }

    #[test]
    fn test_set_drops_overwritten_values() {
        let mut storage = PalettedStorage::uniform(0);
        for value in 1..=6000 {
            storage.set(3, 4, 5, value);
        }
        assert!(storage.palette().len() <= STORAGE_SIZE + 1);
        assert_eq!(storage.at(3, 4, 5), 6000);
        assert_eq!(storage.at(0, 0, 0), 0);

        storage.set(0, 0, 0, 6000);
        for value in 6001..=12000 {
            storage.set(3, 4, 5, value);
        }
        assert!(storage.palette().len() <= STORAGE_SIZE + 1);
        assert_eq!(storage.at(0, 0, 0), 6000);
        assert_eq!(storage.at(3, 4, 5), 12000);
        assert_eq!(storage.at(15, 15, 15), 0);
    }

    #[test]
    fn test_remapped_merges_entries() {
        let mut storage = PalettedStorage::uniform(1);
        storage.set(0, 0, 0, 2);
        storage.set(0, 1, 0, 3);
        let merged = storage.remapped(&mut |v| if v == 3 { 12 } else { v + 10 });
        assert_eq!(merged.palette(), &[11, 12]);
        assert_eq!(merged.bits_per_index(), 1);
        assert_eq!(merged.at(0, 0, 0), 12);
        assert_eq!(merged.at(0, 1, 0), 12);
        assert_eq!(merged.at(9, 9, 9), 11);
    }

    #[test]
    fn test_rejects_bad_headers() {
        let mut slice: &[u8] = &[7 << 1 | 1];
        assert!(matches!(
            PalettedStorage::decode(&mut slice),
            Err(ChunkError::InvalidBitsPerIndex(7))
        ));
        let mut slice: &[u8] = &[0];
        assert!(matches!(
            PalettedStorage::decode(&mut slice),
            Err(ChunkError::PersistentStorage)
        ));
        let mut slice: &[u8] = &[1 << 1 | 1, 0, 0];
        assert!(matches!(
            PalettedStorage::decode(&mut slice),
            Err(ChunkError::NotEnoughData)
        ));
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let mut out = vec![1u8 << 1 | 1];
        // first voxel points at palette entry 1 of a 1-entry palette
        out.extend_from_slice(&1u32.to_le_bytes());
        out.extend(std::iter::repeat(0).take(127 * 4));
        write_varint32(&mut out, 1);
        write_varint32(&mut out, 5);
        let mut slice = &out[..];
        assert!(matches!(
            PalettedStorage::decode(&mut slice),
            Err(ChunkError::PaletteIndexOutOfRange { index: 1, len: 1 })
        ));
    }
}
