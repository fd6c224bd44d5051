use crate::storage::{read_u8, PalettedStorage};
use crate::{ChunkError, ChunkResult};
use bytes::BufMut;

/// Single-layer format used by very old servers.
const VERSION_SINGLE_LAYER: u8 = 1;
/// Layer count follows the version byte.
const VERSION_LAYERED: u8 = 8;
/// Layer count and the sub-chunk's Y index follow the version byte.
const VERSION_INDEXED: u8 = 9;

/// One 16-block-high slice of a chunk column.
///
/// The serialisation version and Y index are kept so an unchanged sub-chunk
/// encodes back to the same bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubChunk {
    pub version: u8,
    pub index: u8,
    /// Layer 0 holds blocks, layer 1 usually holds liquids.
    pub layers: Vec<PalettedStorage>,
}

impl SubChunk {
    pub fn new(index: u8) -> Self {
        Self {
            version: VERSION_INDEXED,
            index,
            layers: Vec::new(),
        }
    }

    /// Block in `layer`, or `air` when the layer does not exist.
    pub fn block(&self, x: u8, y: u8, z: u8, layer: usize, air: u32) -> u32 {
        self.layers
            .get(layer)
            .map(|storage| storage.at(x, y, z))
            .unwrap_or(air)
    }

    /// Set a block, creating layers filled with `air` up to `layer`.
    pub fn set_block(&mut self, x: u8, y: u8, z: u8, layer: usize, air: u32, value: u32) {
        while self.layers.len() <= layer {
            self.layers.push(PalettedStorage::uniform(air));
        }
        self.layers[layer].set(x, y, z, value);
    }

    /// True when no layer holds anything but air.
    pub fn is_empty(&self, air: u32) -> bool {
        self.layers
            .iter()
            .all(|storage| storage.palette() == [air])
    }

    pub(crate) fn decode(buf: &mut &[u8], position: u8) -> ChunkResult<Self> {
        let version = read_u8(buf)?;
        let (layer_count, index) = match version {
            VERSION_SINGLE_LAYER => (1, position),
            VERSION_LAYERED => (read_u8(buf)?, position),
            VERSION_INDEXED => {
                let count = read_u8(buf)?;
                (count, read_u8(buf)?)
            }
            other => return Err(ChunkError::UnknownSubChunkVersion(other)),
        };
        let mut layers = Vec::with_capacity(layer_count as usize);
        for _ in 0..layer_count {
            layers.push(PalettedStorage::decode(buf)?);
        }
        Ok(Self {
            version,
            index,
            layers,
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.put_u8(self.version);
        match self.version {
            VERSION_SINGLE_LAYER => {}
            VERSION_LAYERED => out.put_u8(self.layers.len() as u8),
            _ => {
                out.put_u8(self.layers.len() as u8);
                out.put_u8(self.index);
            }
        }
        for layer in &self.layers {
            layer.encode(out);
        }
    }

    /// Copy with every block ID passed through `remap`.
    pub fn remapped(&self, remap: &mut impl FnMut(u32) -> u32) -> Self {
        Self {
            version: self.version,
            index: self.index,
            layers: self.layers.iter().map(|l| l.remapped(remap)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_roundtrip() {
        let mut sub = SubChunk::new(0xfc);
        sub.set_block(1, 2, 3, 0, 0, 5);
        sub.set_block(0, 0, 0, 1, 0, 9);
        let mut out = Vec::new();
        sub.encode(&mut out);
        assert_eq!(&out[..3], &[VERSION_INDEXED, 2, 0xfc]);

        let mut slice = &out[..];
        let decoded = SubChunk::decode(&mut slice, 0).unwrap();
        assert!(slice.is_empty());
        assert_eq!(decoded, sub);
        assert_eq!(decoded.block(1, 2, 3, 0, 0), 5);
        assert_eq!(decoded.block(0, 0, 0, 1, 0), 9);
        assert_eq!(decoded.block(0, 0, 0, 2, 0), 0);
    }

    #[test]
    fn test_single_layer_version() {
        let data = [VERSION_SINGLE_LAYER, 0x01, 0x02];
        let mut slice = &data[..];
        let sub = SubChunk::decode(&mut slice, 3).unwrap();
        assert_eq!(sub.index, 3);
        assert_eq!(sub.layers, vec![PalettedStorage::uniform(1)]);
        let mut out = Vec::new();
        sub.encode(&mut out);
        assert_eq!(out, data);
    }

    #[test]
    fn test_unknown_version() {
        let mut slice: &[u8] = &[0];
        assert!(matches!(
            SubChunk::decode(&mut slice, 0),
            Err(ChunkError::UnknownSubChunkVersion(0))
        ));
    }

    #[test]
    fn test_empty_detection() {
        let mut sub = SubChunk::new(0);
        assert!(sub.is_empty(4));
        sub.set_block(0, 0, 0, 0, 4, 4);
        assert!(sub.is_empty(4));
        sub.set_block(0, 0, 0, 0, 4, 1);
        assert!(!sub.is_empty(4));
    }
}
