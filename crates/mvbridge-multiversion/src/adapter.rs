use crate::defaults;
use crate::Packet;
use bytes::Bytes;
use mvbridge_mappings::Remapper;
use mvbridge_protocol_core::{Direction, PacketPool, Reader, Writer};
use mvbridge_types::ProtocolVersion;

/// Base game version whose chunks still carry 2-D biome grids.
const LEGACY_BIOME_GAME_VERSION: &str = "1.17.40";

/// What the translator knows about a connection. Read-only during
/// conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionInfo {
    /// Base game version announced in StartGame.
    pub base_game_version: String,
}

impl SessionInfo {
    pub fn new(base_game_version: impl Into<String>) -> Self {
        Self {
            base_game_version: base_game_version.into(),
        }
    }

    pub fn legacy_biomes(&self) -> bool {
        self.base_game_version == LEGACY_BIOME_GAME_VERSION
    }
}

/// Translation support for one legacy protocol version.
///
/// An adapter only knows its immediate newer neighbour: `upgrade` turns this
/// version's retired shapes into the neighbour's, `downgrade` does the
/// reverse. Block and item IDs are rewritten separately, straight between
/// this version and the latest one, by the `convert_*` methods.
pub trait VersionAdapter: Send + Sync {
    fn version(&self) -> ProtocolVersion;

    fn id(&self) -> i32 {
        self.version().id
    }

    fn ver(&self) -> &'static str {
        self.version().name
    }

    fn new_reader(&self, buf: Bytes, shield_id: i32, enable_limits: bool) -> Reader {
        Reader::new(buf, shield_id, enable_limits)
    }

    fn new_writer(&self, shield_id: i32) -> Writer {
        Writer::new(shield_id)
    }

    /// Packets this version sends in `direction`.
    fn packets(&self, direction: Direction) -> &PacketPool<Packet>;

    /// ID tables between this version and the latest.
    fn remapper(&self) -> &Remapper;

    /// Rewrite this version's retired shapes into the newer neighbour's.
    fn upgrade(&self, packets: Vec<Packet>) -> Vec<Packet>;

    /// Rewrite newer shapes this version lacks into its own.
    fn downgrade(&self, packets: Vec<Packet>) -> Vec<Packet>;

    /// IDs first, then shapes. The result may hold any number of packets.
    fn convert_to_latest(&self, packet: Packet, session: &SessionInfo) -> Vec<Packet> {
        match defaults::upgrade_fields(packet, self.remapper(), session) {
            Some(packet) => self.upgrade(vec![packet]),
            None => Vec::new(),
        }
    }

    /// Only valid for packets whose newest shape is this version's
    /// neighbour; the translator handles longer chains.
    fn convert_from_latest(&self, packet: Packet, session: &SessionInfo) -> Vec<Packet> {
        match defaults::downgrade_fields(packet, self.remapper(), session) {
            Some(packet) => self.downgrade(vec![packet]),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_biomes() {
        assert!(SessionInfo::new("1.17.40").legacy_biomes());
        assert!(!SessionInfo::new("1.18.0").legacy_biomes());
        assert!(!SessionInfo::default().legacy_biomes());
    }
}
