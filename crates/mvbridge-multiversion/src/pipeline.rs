use crate::{defaults, Packet, SessionInfo, VersionAdapter};
use bytes::Bytes;
use mvbridge_mappings::CanonicalRegistry;
use mvbridge_protocol_core::{
    latest_pool, CodecError, Direction, Marshal, PacketPool, Reader, Writer, LATEST_VERSION,
};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace, warn};

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Unsupported protocol version {0}")]
    UnsupportedProtocol(i32),
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

pub type TranslateResult<T> = Result<T, TranslateError>;

/// Structural upgrade through `chain`, oldest adapter first.
pub fn upgrade(mut packets: Vec<Packet>, chain: &[Arc<dyn VersionAdapter>]) -> Vec<Packet> {
    for adapter in chain {
        if packets.is_empty() {
            break;
        }
        debug!("Upgrading {} packet(s) from {}", packets.len(), adapter.version());
        packets = adapter.upgrade(packets);
    }
    packets
}

/// Structural downgrade through `chain`, newest adapter first.
pub fn downgrade(mut packets: Vec<Packet>, chain: &[Arc<dyn VersionAdapter>]) -> Vec<Packet> {
    for adapter in chain.iter().rev() {
        if packets.is_empty() {
            break;
        }
        debug!("Downgrading {} packet(s) to {}", packets.len(), adapter.version());
        packets = adapter.downgrade(packets);
    }
    packets
}

/// Routes packets between any accepted protocol version and the latest one.
///
/// Holds every adapter from the oldest accepted version up to the latest
/// protocol, since a conversion walks each version in between.
pub struct Translator {
    adapters: Vec<Arc<dyn VersionAdapter>>,
    accepted: BTreeSet<i32>,
    latest: Arc<dyn CanonicalRegistry>,
    shield_ids: HashMap<i32, i32>,
    enable_limits: bool,
    clientbound: PacketPool<Packet>,
    serverbound: PacketPool<Packet>,
}

impl Translator {
    pub fn new(
        mut adapters: Vec<Arc<dyn VersionAdapter>>,
        latest: Arc<dyn CanonicalRegistry>,
        shield_item: &str,
        enable_limits: bool,
    ) -> Self {
        adapters.sort_by_key(|adapter| adapter.id());
        adapters.dedup_by_key(|adapter| adapter.id());

        let mut shield_ids = HashMap::new();
        for adapter in &adapters {
            match adapter.remapper().legacy_item_id(shield_item) {
                Some(id) => {
                    shield_ids.insert(adapter.id(), id);
                }
                None => warn!("No {} item in protocol {} mappings", shield_item, adapter.id()),
            }
        }
        match latest.item_name_to_id(shield_item) {
            Some(id) => {
                shield_ids.insert(LATEST_VERSION.id, id);
            }
            None => warn!("No {} item in latest mappings", shield_item),
        }

        Self {
            accepted: adapters.iter().map(|adapter| adapter.id()).collect(),
            adapters,
            latest,
            shield_ids,
            enable_limits,
            clientbound: latest_pool(Direction::Clientbound).map(Packet::Latest),
            serverbound: latest_pool(Direction::Serverbound).map(Packet::Latest),
        }
    }

    /// Stop accepting legacy versions outside `versions`. Their adapters stay
    /// loaded as hops for older versions.
    pub(crate) fn accept_only(&mut self, versions: &[i32]) {
        self.accepted.retain(|id| versions.contains(id));
    }

    /// Protocol numbers this translator accepts, the latest included.
    pub fn protocols(&self) -> Vec<i32> {
        let mut protocols: Vec<i32> = self.accepted.iter().copied().collect();
        protocols.push(LATEST_VERSION.id);
        protocols
    }

    pub fn supports(&self, protocol: i32) -> bool {
        protocol == LATEST_VERSION.id || self.accepted.contains(&protocol)
    }

    pub fn latest_registry(&self) -> &Arc<dyn CanonicalRegistry> {
        &self.latest
    }

    pub fn adapter(&self, protocol: i32) -> Option<&Arc<dyn VersionAdapter>> {
        if !self.accepted.contains(&protocol) {
            return None;
        }
        self.adapters.iter().find(|adapter| adapter.id() == protocol)
    }

    /// Adapters a packet of `protocol` passes through on its way to the
    /// latest version, oldest first. Empty for the latest version itself.
    pub fn chain(&self, protocol: i32) -> TranslateResult<&[Arc<dyn VersionAdapter>]> {
        if protocol == LATEST_VERSION.id {
            return Ok(&[]);
        }
        if !self.accepted.contains(&protocol) {
            return Err(TranslateError::UnsupportedProtocol(protocol));
        }
        let start = self
            .adapters
            .iter()
            .position(|adapter| adapter.id() == protocol)
            .ok_or(TranslateError::UnsupportedProtocol(protocol))?;
        Ok(&self.adapters[start..])
    }

    /// Convert a packet received from a `protocol` client into latest shapes
    /// and numbering.
    pub fn to_latest(
        &self,
        protocol: i32,
        packet: Packet,
        session: &SessionInfo,
    ) -> TranslateResult<Vec<Packet>> {
        let chain = self.chain(protocol)?;
        let Some((source, rest)) = chain.split_first() else {
            trace!("Passing {} through unchanged", packet.name());
            return Ok(vec![packet]);
        };
        let packets = source.convert_to_latest(packet, session);
        Ok(upgrade(packets, rest))
    }

    /// Convert a latest packet for delivery to a `protocol` client.
    pub fn from_latest(
        &self,
        protocol: i32,
        packet: Packet,
        session: &SessionInfo,
    ) -> TranslateResult<Vec<Packet>> {
        let chain = self.chain(protocol)?;
        let Some(target) = chain.first() else {
            trace!("Passing {} through unchanged", packet.name());
            return Ok(vec![packet]);
        };
        let packets = defaults::downgrade_fields(packet, target.remapper(), session)
            .into_iter()
            .collect();
        Ok(downgrade(packets, chain))
    }

    /// Network ID of the shield item in `protocol`'s numbering, 0 if unknown.
    pub fn shield_id(&self, protocol: i32) -> i32 {
        self.shield_ids.get(&protocol).copied().unwrap_or(0)
    }

    pub fn packets(&self, protocol: i32, direction: Direction) -> TranslateResult<&PacketPool<Packet>> {
        if protocol == LATEST_VERSION.id {
            return Ok(match direction {
                Direction::Clientbound => &self.clientbound,
                Direction::Serverbound => &self.serverbound,
            });
        }
        self.adapter(protocol)
            .map(|adapter| adapter.packets(direction))
            .ok_or(TranslateError::UnsupportedProtocol(protocol))
    }

    pub fn reader(&self, protocol: i32, buf: Bytes) -> TranslateResult<Reader> {
        let shield_id = self.shield_id(protocol);
        if protocol == LATEST_VERSION.id {
            return Ok(Reader::new(buf, shield_id, self.enable_limits));
        }
        self.adapter(protocol)
            .map(|adapter| adapter.new_reader(buf, shield_id, self.enable_limits))
            .ok_or(TranslateError::UnsupportedProtocol(protocol))
    }

    pub fn writer(&self, protocol: i32) -> TranslateResult<Writer> {
        let shield_id = self.shield_id(protocol);
        if protocol == LATEST_VERSION.id {
            return Ok(Writer::new(shield_id));
        }
        self.adapter(protocol)
            .map(|adapter| adapter.new_writer(shield_id))
            .ok_or(TranslateError::UnsupportedProtocol(protocol))
    }

    /// Decode a packet body sent in `protocol`'s format.
    pub fn decode(
        &self,
        protocol: i32,
        direction: Direction,
        id: u32,
        payload: Bytes,
    ) -> TranslateResult<Packet> {
        let pool = self.packets(protocol, direction)?;
        let mut reader = self.reader(protocol, payload)?;
        Ok(pool.decode(id, &mut reader)?)
    }

    /// Encode a packet body in `protocol`'s format.
    pub fn encode(&self, protocol: i32, packet: &Packet) -> TranslateResult<Bytes> {
        let mut writer = self.writer(protocol)?;
        packet.marshal(&mut writer);
        Ok(writer.into_bytes())
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("protocols", &self.protocols())
            .field("enable_limits", &self.enable_limits)
            .finish()
    }
}
