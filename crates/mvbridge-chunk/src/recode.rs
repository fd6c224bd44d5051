use crate::column::{self, ChunkColumn, ChunkLayout};
use crate::sub_chunk::SubChunk;
use crate::ChunkResult;

/// Rewrite a LevelChunk payload from one block numbering into another.
///
/// Every voxel of every layer goes through `remap`. Biomes and the bytes that
/// follow them are carried over unchanged.
pub fn recode(
    data: &[u8],
    layout: ChunkLayout,
    from_air: u32,
    to_air: u32,
    mut remap: impl FnMut(u32) -> u32,
) -> ChunkResult<Vec<u8>> {
    let (column, trailing) = column::decode(data, from_air, layout)?;
    let recoded = ChunkColumn {
        air: to_air,
        range: column.range,
        sub_chunks: column
            .sub_chunks
            .iter()
            .map(|sub| sub.remapped(&mut remap))
            .collect(),
        biomes: column.biomes,
    };
    tracing::trace!(
        "Recoded {} sub-chunks, {} trailing bytes",
        recoded.sub_chunks.len(),
        trailing.len()
    );
    Ok(column::encode(&recoded).into_payload(trailing))
}

/// Rewrite one sub-chunk as carried by a SubChunk packet entry. Bytes after
/// the sub-chunk (block entities) are kept.
pub fn recode_sub_chunk(
    data: &[u8],
    mut remap: impl FnMut(u32) -> u32,
) -> ChunkResult<Vec<u8>> {
    let mut buf = data;
    let sub = SubChunk::decode(&mut buf, 0)?;
    let mut out = Vec::with_capacity(data.len());
    sub.remapped(&mut remap).encode(&mut out);
    out.extend_from_slice(buf);
    Ok(out)
}
