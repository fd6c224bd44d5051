use bytes::{Buf, BufMut, Bytes, BytesMut};
use mvbridge_types::{BlockPos, ItemInstance, ItemStack, SubChunkPos, Vec2, Vec3};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("VarInt too big")]
    VarIntTooBig,
    #[error("Not enough data")]
    NotEnoughData,
    #[error("Length too long: {0} > {1}")]
    LengthTooLong(usize, usize),
    #[error("Invalid UTF-8 string")]
    InvalidString,
    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: i64 },
}

pub type CodecResult<T> = Result<T, CodecError>;

/// Maximum element count of a length-prefixed collection when limits are enabled.
pub const MAX_COLLECTION_LEN: usize = 8192;
/// Maximum byte length of a string when limits are enabled.
pub const MAX_STRING_LEN: usize = 1 << 20;

/// Read an unsigned LEB128 VarInt (at most 5 bytes).
pub fn read_varuint32(buf: &mut impl Buf) -> CodecResult<u32> {
    let mut result: u32 = 0;
    let mut shift: u32 = 0;
    loop {
        if !buf.has_remaining() {
            return Err(CodecError::NotEnoughData);
        }
        let byte = buf.get_u8();
        result |= ((byte & 0x7F) as u32) << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
        if shift >= 35 {
            return Err(CodecError::VarIntTooBig);
        }
    }
}

/// Write an unsigned LEB128 VarInt.
pub fn write_varuint32(buf: &mut impl BufMut, mut value: u32) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.put_u8(byte);
        if value == 0 {
            break;
        }
    }
}

/// Read a zig-zag encoded signed VarInt.
pub fn read_varint32(buf: &mut impl Buf) -> CodecResult<i32> {
    let raw = read_varuint32(buf)?;
    Ok(((raw >> 1) as i32) ^ -((raw & 1) as i32))
}

/// Write a zig-zag encoded signed VarInt.
pub fn write_varint32(buf: &mut impl BufMut, value: i32) {
    write_varuint32(buf, ((value << 1) ^ (value >> 31)) as u32);
}

/// Read an unsigned VarLong (at most 10 bytes).
pub fn read_varuint64(buf: &mut impl Buf) -> CodecResult<u64> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;
    loop {
        if !buf.has_remaining() {
            return Err(CodecError::NotEnoughData);
        }
        let byte = buf.get_u8();
        result |= ((byte & 0x7F) as u64) << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
        if shift >= 70 {
            return Err(CodecError::VarIntTooBig);
        }
    }
}

pub fn write_varuint64(buf: &mut impl BufMut, mut value: u64) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.put_u8(byte);
        if value == 0 {
            break;
        }
    }
}

pub fn read_varint64(buf: &mut impl Buf) -> CodecResult<i64> {
    let raw = read_varuint64(buf)?;
    Ok(((raw >> 1) as i64) ^ -((raw & 1) as i64))
}

pub fn write_varint64(buf: &mut impl BufMut, value: i64) {
    write_varuint64(buf, ((value << 1) ^ (value >> 63)) as u64);
}

/// Calculate the byte length of an unsigned VarInt.
pub fn varuint32_len(value: u32) -> usize {
    let mut val = value;
    let mut len = 0;
    loop {
        len += 1;
        val >>= 7;
        if val == 0 {
            break;
        }
    }
    len
}

/// Reads Bedrock wire primitives from a packet body.
///
/// `shield_id` is the network ID of the shield item in the version being read:
/// shield stacks carry an extra blocking tick at the end of their user data.
pub struct Reader {
    buf: Bytes,
    shield_id: i32,
    limits: bool,
}

macro_rules! fixed {
    ($name:ident, $ty:ty, $get:ident, $size:expr) => {
        pub fn $name(&mut self) -> CodecResult<$ty> {
            self.need($size)?;
            Ok(self.buf.$get())
        }
    };
}

impl Reader {
    pub fn new(buf: impl Into<Bytes>, shield_id: i32, enable_limits: bool) -> Self {
        Self {
            buf: buf.into(),
            shield_id,
            limits: enable_limits,
        }
    }

    pub fn shield_id(&self) -> i32 {
        self.shield_id
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn need(&self, n: usize) -> CodecResult<()> {
        if self.buf.remaining() < n {
            return Err(CodecError::NotEnoughData);
        }
        Ok(())
    }

    fixed!(u8, u8, get_u8, 1);
    fixed!(i8, i8, get_i8, 1);
    fixed!(u16, u16, get_u16_le, 2);
    fixed!(i16, i16, get_i16_le, 2);
    fixed!(i32, i32, get_i32_le, 4);
    fixed!(u32, u32, get_u32_le, 4);
    fixed!(i64, i64, get_i64_le, 8);
    fixed!(u64, u64, get_u64_le, 8);
    fixed!(f32, f32, get_f32_le, 4);

    pub fn bool(&mut self) -> CodecResult<bool> {
        Ok(self.u8()? != 0)
    }

    pub fn varuint32(&mut self) -> CodecResult<u32> {
        read_varuint32(&mut self.buf)
    }

    pub fn varint32(&mut self) -> CodecResult<i32> {
        read_varint32(&mut self.buf)
    }

    pub fn varuint64(&mut self) -> CodecResult<u64> {
        read_varuint64(&mut self.buf)
    }

    pub fn varint64(&mut self) -> CodecResult<i64> {
        read_varint64(&mut self.buf)
    }

    /// Read a VarInt collection length, enforcing the collection limit.
    pub fn count(&mut self) -> CodecResult<usize> {
        let len = self.varuint32()? as usize;
        self.check_count(len)
    }

    /// Enforce the collection limit on a length read some other way.
    pub fn check_count(&self, len: usize) -> CodecResult<usize> {
        if self.limits && len > MAX_COLLECTION_LEN {
            return Err(CodecError::LengthTooLong(len, MAX_COLLECTION_LEN));
        }
        Ok(len)
    }

    pub fn string(&mut self) -> CodecResult<String> {
        let len = self.varuint32()? as usize;
        if self.limits && len > MAX_STRING_LEN {
            return Err(CodecError::LengthTooLong(len, MAX_STRING_LEN));
        }
        self.need(len)?;
        let bytes = self.buf.split_to(len);
        String::from_utf8(bytes.to_vec()).map_err(|_| CodecError::InvalidString)
    }

    /// Read a byte array with VarInt length prefix.
    pub fn byte_slice(&mut self) -> CodecResult<Vec<u8>> {
        let len = self.varuint32()? as usize;
        self.need(len)?;
        Ok(self.buf.split_to(len).to_vec())
    }

    /// Take every byte left in the packet.
    pub fn rest(&mut self) -> Vec<u8> {
        let len = self.buf.remaining();
        self.buf.split_to(len).to_vec()
    }

    pub fn bytes(&mut self, n: usize) -> CodecResult<Vec<u8>> {
        self.need(n)?;
        Ok(self.buf.split_to(n).to_vec())
    }

    pub fn uuid(&mut self) -> CodecResult<Uuid> {
        self.need(16)?;
        let mut bytes = [0u8; 16];
        self.buf.copy_to_slice(&mut bytes);
        Ok(Uuid::from_bytes(bytes))
    }

    pub fn vec3(&mut self) -> CodecResult<Vec3> {
        Ok(Vec3::new(self.f32()?, self.f32()?, self.f32()?))
    }

    pub fn vec2(&mut self) -> CodecResult<Vec2> {
        Ok(Vec2::new(self.f32()?, self.f32()?))
    }

    /// Block position with a signed Y coordinate.
    pub fn block_pos(&mut self) -> CodecResult<BlockPos> {
        let x = self.varint32()?;
        let y = self.varint32()?;
        let z = self.varint32()?;
        Ok(BlockPos::new(x, y, z))
    }

    /// Block position with an unsigned Y coordinate.
    pub fn ublock_pos(&mut self) -> CodecResult<BlockPos> {
        let x = self.varint32()?;
        let y = self.varuint32()? as i32;
        let z = self.varint32()?;
        Ok(BlockPos::new(x, y, z))
    }

    pub fn sub_chunk_pos(&mut self) -> CodecResult<SubChunkPos> {
        let x = self.varint32()?;
        let y = self.varint32()?;
        let z = self.varint32()?;
        Ok(SubChunkPos::new(x, y, z))
    }

    /// Read an item stack without a stack network ID.
    pub fn item(&mut self) -> CodecResult<ItemStack> {
        let network_id = self.varint32()?;
        if network_id == 0 {
            return Ok(ItemStack::empty());
        }
        let count = self.u16()?;
        let metadata = self.varuint32()?;
        let block_runtime_id = self.varint32()?;
        let extra = self.byte_slice()?;
        Ok(self.finish_item(network_id, count, metadata, block_runtime_id, extra))
    }

    /// Read an item stack preceded by an optional stack network ID.
    pub fn item_instance(&mut self) -> CodecResult<ItemInstance> {
        let network_id = self.varint32()?;
        if network_id == 0 {
            return Ok(ItemInstance::default());
        }
        let count = self.u16()?;
        let metadata = self.varuint32()?;
        let stack_network_id = if self.bool()? { self.varint32()? } else { 0 };
        let block_runtime_id = self.varint32()?;
        let extra = self.byte_slice()?;
        Ok(ItemInstance {
            stack_network_id,
            stack: self.finish_item(network_id, count, metadata, block_runtime_id, extra),
        })
    }

    fn finish_item(
        &self,
        network_id: i32,
        count: u16,
        metadata: u32,
        block_runtime_id: i32,
        mut extra: Vec<u8>,
    ) -> ItemStack {
        let mut blocking_tick = 0;
        if network_id == self.shield_id && extra.len() >= 8 {
            let tail = extra.split_off(extra.len() - 8);
            let mut tick = [0u8; 8];
            tick.copy_from_slice(&tail);
            blocking_tick = i64::from_le_bytes(tick);
        }
        ItemStack {
            network_id,
            metadata,
            count,
            block_runtime_id,
            extra,
            blocking_tick,
        }
    }
}

/// Writes Bedrock wire primitives into a packet body.
pub struct Writer {
    buf: BytesMut,
    shield_id: i32,
}

impl Writer {
    pub fn new(shield_id: i32) -> Self {
        Self {
            buf: BytesMut::with_capacity(256),
            shield_id,
        }
    }

    pub fn shield_id(&self) -> i32 {
        self.shield_id
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }

    pub fn u8(&mut self, v: u8) {
        self.buf.put_u8(v);
    }

    pub fn i8(&mut self, v: i8) {
        self.buf.put_i8(v);
    }

    pub fn bool(&mut self, v: bool) {
        self.buf.put_u8(v as u8);
    }

    pub fn u16(&mut self, v: u16) {
        self.buf.put_u16_le(v);
    }

    pub fn i16(&mut self, v: i16) {
        self.buf.put_i16_le(v);
    }

    pub fn i32(&mut self, v: i32) {
        self.buf.put_i32_le(v);
    }

    pub fn u32(&mut self, v: u32) {
        self.buf.put_u32_le(v);
    }

    pub fn i64(&mut self, v: i64) {
        self.buf.put_i64_le(v);
    }

    pub fn u64(&mut self, v: u64) {
        self.buf.put_u64_le(v);
    }

    pub fn f32(&mut self, v: f32) {
        self.buf.put_f32_le(v);
    }

    pub fn varuint32(&mut self, v: u32) {
        write_varuint32(&mut self.buf, v);
    }

    pub fn varint32(&mut self, v: i32) {
        write_varint32(&mut self.buf, v);
    }

    pub fn varuint64(&mut self, v: u64) {
        write_varuint64(&mut self.buf, v);
    }

    pub fn varint64(&mut self, v: i64) {
        write_varint64(&mut self.buf, v);
    }

    pub fn count(&mut self, len: usize) {
        self.varuint32(len as u32);
    }

    pub fn string(&mut self, s: &str) {
        self.varuint32(s.len() as u32);
        self.buf.put_slice(s.as_bytes());
    }

    pub fn byte_slice(&mut self, data: &[u8]) {
        self.varuint32(data.len() as u32);
        self.buf.put_slice(data);
    }

    pub fn bytes(&mut self, data: &[u8]) {
        self.buf.put_slice(data);
    }

    pub fn uuid(&mut self, uuid: &Uuid) {
        self.buf.put_slice(uuid.as_bytes());
    }

    pub fn vec3(&mut self, v: Vec3) {
        self.f32(v.x);
        self.f32(v.y);
        self.f32(v.z);
    }

    pub fn vec2(&mut self, v: Vec2) {
        self.f32(v.x);
        self.f32(v.y);
    }

    pub fn block_pos(&mut self, pos: BlockPos) {
        self.varint32(pos.x);
        self.varint32(pos.y);
        self.varint32(pos.z);
    }

    pub fn ublock_pos(&mut self, pos: BlockPos) {
        self.varint32(pos.x);
        self.varuint32(pos.y as u32);
        self.varint32(pos.z);
    }

    pub fn sub_chunk_pos(&mut self, pos: SubChunkPos) {
        self.varint32(pos.x);
        self.varint32(pos.y);
        self.varint32(pos.z);
    }

    pub fn item(&mut self, item: &ItemStack) {
        self.varint32(item.network_id);
        if item.is_empty() {
            return;
        }
        self.u16(item.count);
        self.varuint32(item.metadata);
        self.varint32(item.block_runtime_id);
        self.item_extra(item);
    }

    pub fn item_instance(&mut self, instance: &ItemInstance) {
        let item = &instance.stack;
        self.varint32(item.network_id);
        if item.is_empty() {
            return;
        }
        self.u16(item.count);
        self.varuint32(item.metadata);
        self.bool(instance.stack_network_id != 0);
        if instance.stack_network_id != 0 {
            self.varint32(instance.stack_network_id);
        }
        self.varint32(item.block_runtime_id);
        self.item_extra(item);
    }

    fn item_extra(&mut self, item: &ItemStack) {
        if item.network_id == self.shield_id {
            self.varuint32(item.extra.len() as u32 + 8);
            self.buf.put_slice(&item.extra);
            self.buf.put_i64_le(item.blocking_tick);
        } else {
            self.byte_slice(&item.extra);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varuint_encoding() {
        let test_cases = vec![
            (0u32, vec![0x00]),
            (1, vec![0x01]),
            (127, vec![0x7F]),
            (128, vec![0x80, 0x01]),
            (300, vec![0xAC, 0x02]),
            (u32::MAX, vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]),
        ];

        for (value, expected_bytes) in test_cases {
            let mut buf = BytesMut::new();
            write_varuint32(&mut buf, value);
            assert_eq!(buf.to_vec(), expected_bytes, "write_varuint32({}) failed", value);

            let mut slice = &expected_bytes[..];
            assert_eq!(read_varuint32(&mut slice).unwrap(), value);
        }
    }

    #[test]
    fn test_zigzag_encoding() {
        let test_cases = vec![(0i32, vec![0x00]), (-1, vec![0x01]), (1, vec![0x02]), (-2, vec![0x03])];
        for (value, expected_bytes) in test_cases {
            let mut buf = BytesMut::new();
            write_varint32(&mut buf, value);
            assert_eq!(buf.to_vec(), expected_bytes, "write_varint32({}) failed", value);
        }

        let mut buf = BytesMut::new();
        write_varint32(&mut buf, i32::MIN);
        write_varint64(&mut buf, i64::MIN);
        let mut slice = &buf[..];
        assert_eq!(read_varint32(&mut slice).unwrap(), i32::MIN);
        assert_eq!(read_varint64(&mut slice).unwrap(), i64::MIN);
    }

    #[test]
    fn test_varint_too_big() {
        let mut slice: &[u8] = &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01];
        assert!(matches!(read_varuint32(&mut slice), Err(CodecError::VarIntTooBig)));
    }

    #[test]
    fn test_varuint_len() {
        assert_eq!(varuint32_len(0), 1);
        assert_eq!(varuint32_len(127), 1);
        assert_eq!(varuint32_len(128), 2);
        assert_eq!(varuint32_len(u32::MAX), 5);
    }

    #[test]
    fn test_truncated_string() {
        let mut w = Writer::new(0);
        w.varuint32(10);
        w.bytes(b"abc");
        let mut r = Reader::new(w.into_bytes(), 0, true);
        assert!(matches!(r.string(), Err(CodecError::NotEnoughData)));
    }

    #[test]
    fn test_collection_limit() {
        let mut w = Writer::new(0);
        w.count(MAX_COLLECTION_LEN + 1);
        let bytes = w.into_bytes();

        let mut limited = Reader::new(bytes.clone(), 0, true);
        assert!(matches!(limited.count(), Err(CodecError::LengthTooLong(_, _))));

        let mut unlimited = Reader::new(bytes, 0, false);
        assert_eq!(unlimited.count().unwrap(), MAX_COLLECTION_LEN + 1);
    }

    #[test]
    fn test_shield_blocking_tick() {
        const SHIELD: i32 = 355;
        let mut shield = ItemStack::new(SHIELD, 1);
        shield.extra = vec![0, 0, 0, 0, 0, 0, 0, 0];
        shield.blocking_tick = 42;

        let mut w = Writer::new(SHIELD);
        w.item(&shield);
        let mut r = Reader::new(w.into_bytes(), SHIELD, true);
        let read = r.item().unwrap();
        assert_eq!(read.blocking_tick, 42);
        assert_eq!(read.extra, shield.extra);

        // A reader that does not know the item as a shield keeps the tick in the user data.
        let mut w = Writer::new(SHIELD);
        w.item(&shield);
        let mut r = Reader::new(w.into_bytes(), 0, true);
        assert_eq!(r.item().unwrap().extra.len(), 16);
    }

    #[test]
    fn test_item_instance_stack_id() {
        let mut instance = ItemInstance::new(ItemStack::new(5, 64));
        instance.stack_network_id = 9;
        instance.stack.block_runtime_id = 12;

        let mut w = Writer::new(0);
        w.item_instance(&instance);
        w.item_instance(&ItemInstance::default());
        let mut r = Reader::new(w.into_bytes(), 0, true);
        assert_eq!(r.item_instance().unwrap(), instance);
        assert!(r.item_instance().unwrap().stack.is_empty());
        assert_eq!(r.remaining(), 0);
    }
}
