use crate::{v1_20_40, v1_20_60, v1_20_80};
use mvbridge_protocol_core::{CodecResult, GamePacket, Marshal, Reader, WirePacket, Writer};

/// A packet in the shape of exactly one protocol version.
///
/// `Latest` covers every shape the latest version uses, including the many
/// that older versions share unchanged. The other variants hold shapes a
/// version retired.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    Latest(GamePacket),
    V1_20_80(v1_20_80::LegacyPacket),
    V1_20_60(v1_20_60::LegacyPacket),
    V1_20_40(v1_20_40::LegacyPacket),
}

impl Packet {
    pub fn name(&self) -> &'static str {
        match self {
            Packet::Latest(pk) => pk.name(),
            Packet::V1_20_80(pk) => pk.name(),
            Packet::V1_20_60(pk) => pk.name(),
            Packet::V1_20_40(pk) => pk.name(),
        }
    }

    /// The latest-shaped packet, if this is one.
    pub fn as_latest(&self) -> Option<&GamePacket> {
        match self {
            Packet::Latest(pk) => Some(pk),
            _ => None,
        }
    }
}

impl WirePacket for Packet {
    fn id(&self) -> u32 {
        match self {
            Packet::Latest(pk) => pk.id(),
            Packet::V1_20_80(pk) => pk.id(),
            Packet::V1_20_60(pk) => pk.id(),
            Packet::V1_20_40(pk) => pk.id(),
        }
    }

    fn unknown(id: u32, payload: Vec<u8>) -> Self {
        Packet::Latest(GamePacket::unknown(id, payload))
    }
}

impl Marshal for Packet {
    fn marshal(&self, w: &mut Writer) {
        match self {
            Packet::Latest(pk) => pk.marshal(w),
            Packet::V1_20_80(pk) => pk.marshal(w),
            Packet::V1_20_60(pk) => pk.marshal(w),
            Packet::V1_20_40(pk) => pk.marshal(w),
        }
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        match self {
            Packet::Latest(pk) => pk.unmarshal(r),
            Packet::V1_20_80(pk) => pk.unmarshal(r),
            Packet::V1_20_60(pk) => pk.unmarshal(r),
            Packet::V1_20_40(pk) => pk.unmarshal(r),
        }
    }
}

impl From<GamePacket> for Packet {
    fn from(pk: GamePacket) -> Self {
        Packet::Latest(pk)
    }
}

/// Declares a version's `LegacyPacket` enum over its retired packet structs,
/// with wire IDs, `Marshal` and a pool registration helper.
macro_rules! legacy_packets {
    ($wrap:path { $($variant:ident => $id:path,)* }) => {
        /// Packet shapes this version retired.
        #[derive(Debug, Clone, PartialEq)]
        pub enum LegacyPacket {
            $($variant($variant),)*
        }

        impl LegacyPacket {
            pub fn id(&self) -> u32 {
                match self {
                    $(LegacyPacket::$variant(_) => $id,)*
                }
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $(LegacyPacket::$variant(_) => stringify!($variant),)*
                }
            }

            /// Zero-value factory wrapped into [`Packet`](crate::Packet).
            pub fn factory(id: u32) -> Option<fn() -> crate::Packet> {
                match id {
                    $($id => Some((|| $wrap(LegacyPacket::$variant($variant::default()))) as fn() -> crate::Packet),)*
                    _ => None,
                }
            }

            pub const IDS: &'static [u32] = &[$($id,)*];
        }

        impl mvbridge_protocol_core::Marshal for LegacyPacket {
            fn marshal(&self, w: &mut mvbridge_protocol_core::Writer) {
                match self {
                    $(LegacyPacket::$variant(pk) => pk.marshal(w),)*
                }
            }

            fn unmarshal(
                &mut self,
                r: &mut mvbridge_protocol_core::Reader,
            ) -> mvbridge_protocol_core::CodecResult<()> {
                match self {
                    $(LegacyPacket::$variant(pk) => pk.unmarshal(r),)*
                }
            }
        }

        $(
            impl From<$variant> for crate::Packet {
                fn from(pk: $variant) -> Self {
                    $wrap(LegacyPacket::$variant(pk))
                }
            }
        )*
    };
}

pub(crate) use legacy_packets;
