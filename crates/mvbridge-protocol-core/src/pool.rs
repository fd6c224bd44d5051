use crate::codec::{CodecResult, Reader};
use crate::packets::{ids, GamePacket, Marshal, WirePacket};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Which side of the proxy a packet pool decodes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Packets sent by the client to the server.
    Serverbound,
    /// Packets sent by the server to the client.
    Clientbound,
}

impl Direction {
    pub fn flip(self) -> Self {
        match self {
            Direction::Serverbound => Direction::Clientbound,
            Direction::Clientbound => Direction::Serverbound,
        }
    }
}

pub type Factory<P> = Arc<dyn Fn() -> P + Send + Sync>;

/// Packet ID to zero-value factory map for one version and direction.
///
/// Built once at start-up and only read afterwards.
pub struct PacketPool<P> {
    factories: HashMap<u32, Factory<P>>,
}

impl<P> Clone for PacketPool<P> {
    fn clone(&self) -> Self {
        Self {
            factories: self.factories.clone(),
        }
    }
}

impl<P> Default for PacketPool<P> {
    fn default() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }
}

impl<P> fmt::Debug for PacketPool<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacketPool").field("ids", &self.ids()).finish()
    }
}

impl<P> PacketPool<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the factory for a packet ID.
    pub fn register<F>(&mut self, id: u32, factory: F)
    where
        F: Fn() -> P + Send + Sync + 'static,
    {
        self.factories.insert(id, Arc::new(factory));
    }

    pub fn remove(&mut self, id: u32) -> bool {
        self.factories.remove(&id).is_some()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.factories.contains_key(&id)
    }

    /// A fresh zero-value packet for `id`.
    pub fn get(&self, id: u32) -> Option<P> {
        self.factories.get(&id).map(|factory| factory())
    }

    /// Registered IDs in ascending order.
    pub fn ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.factories.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Wrap every factory's output, e.g. to lift a pool of one packet type
    /// into a wider sum type.
    pub fn map<Q, F>(&self, wrap: F) -> PacketPool<Q>
    where
        P: 'static,
        Q: 'static,
        F: Fn(P) -> Q + Send + Sync + Clone + 'static,
    {
        let factories = self
            .factories
            .iter()
            .map(|(&id, factory)| {
                let factory = Arc::clone(factory);
                let wrap = wrap.clone();
                let lifted: Factory<Q> = Arc::new(move || wrap(factory()));
                (id, lifted)
            })
            .collect();
        PacketPool { factories }
    }
}

impl<P: WirePacket> PacketPool<P> {
    /// Decode a packet body. IDs without a factory decode as unknown packets
    /// holding the raw body.
    pub fn decode(&self, id: u32, r: &mut Reader) -> CodecResult<P> {
        match self.get(id) {
            Some(mut pk) => {
                pk.unmarshal(r)?;
                Ok(pk)
            }
            None => {
                tracing::trace!("No factory for packet {:#x}, keeping raw body", id);
                Ok(P::unknown(id, r.rest()))
            }
        }
    }
}

const CLIENTBOUND: &[u32] = &[
    ids::RESOURCE_PACKS_INFO,
    ids::TEXT,
    ids::START_GAME,
    ids::ADD_PLAYER,
    ids::ADD_ITEM_ACTOR,
    ids::UPDATE_BLOCK,
    ids::LEVEL_EVENT,
    ids::MOB_EFFECT,
    ids::MOB_EQUIPMENT,
    ids::MOB_ARMOUR_EQUIPMENT,
    ids::SET_ACTOR_MOTION,
    ids::CONTAINER_CLOSE,
    ids::INVENTORY_CONTENT,
    ids::INVENTORY_SLOT,
    ids::CRAFTING_DATA,
    ids::LEVEL_CHUNK,
    ids::AVAILABLE_COMMANDS,
    ids::SHOW_STORE_OFFER,
    ids::UPDATE_BLOCK_SYNCED,
    ids::LEVEL_SOUND_EVENT,
    ids::CREATIVE_CONTENT,
    ids::UPDATE_SUB_CHUNK_BLOCKS,
    ids::SUB_CHUNK,
    ids::SET_PLAYER_INVENTORY_OPTIONS,
];

const SERVERBOUND: &[u32] = &[
    ids::TEXT,
    ids::INVENTORY_TRANSACTION,
    ids::MOB_EQUIPMENT,
    ids::MOB_ARMOUR_EQUIPMENT,
    ids::CONTAINER_CLOSE,
    ids::LEVEL_SOUND_EVENT,
    ids::LECTERN_UPDATE,
    ids::PLAYER_AUTH_INPUT,
    ids::ITEM_STACK_REQUEST,
    ids::CODE_BUILDER_SOURCE,
    ids::PLAYER_TOGGLE_CRAFTER_SLOT_REQUEST,
    ids::SET_PLAYER_INVENTORY_OPTIONS,
];

/// The pool of the latest protocol version for one direction.
pub fn latest_pool(direction: Direction) -> PacketPool<GamePacket> {
    let ids = match direction {
        Direction::Clientbound => CLIENTBOUND,
        Direction::Serverbound => SERVERBOUND,
    };
    let mut pool = PacketPool::new();
    for &id in ids {
        if let Some(factory) = GamePacket::factory(id) {
            pool.register(id, factory);
        }
    }
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Writer;
    use crate::packets::ContainerClose;

    #[test]
    fn test_latest_pools_differ_by_direction() {
        let client = latest_pool(Direction::Clientbound);
        let server = latest_pool(Direction::Serverbound);
        assert!(client.contains(ids::LEVEL_CHUNK));
        assert!(!server.contains(ids::LEVEL_CHUNK));
        assert!(server.contains(ids::PLAYER_AUTH_INPUT));
        assert!(!client.contains(ids::PLAYER_AUTH_INPUT));
        assert!(client.contains(ids::TEXT) && server.contains(ids::TEXT));
        assert_eq!(client.len(), CLIENTBOUND.len());
        assert_eq!(server.len(), SERVERBOUND.len());
    }

    #[test]
    fn test_decode_known_packet() {
        let pk = ContainerClose {
            window_id: 2,
            container_type: 7,
            server_side: true,
        };
        let mut w = Writer::new(0);
        pk.marshal(&mut w);
        let pool = latest_pool(Direction::Clientbound);
        let mut r = Reader::new(w.into_bytes(), 0, true);
        let decoded = pool.decode(ids::CONTAINER_CLOSE, &mut r).unwrap();
        assert_eq!(decoded, GamePacket::ContainerClose(pk));
    }

    #[test]
    fn test_decode_unknown_id() {
        let pool = latest_pool(Direction::Serverbound);
        let mut r = Reader::new(vec![7u8, 8], 0, true);
        let decoded = pool.decode(0x7f0, &mut r).unwrap();
        assert_eq!(
            decoded,
            GamePacket::Unknown {
                id: 0x7f0,
                payload: vec![7, 8]
            }
        );
    }

    #[test]
    fn test_map_and_remove() {
        let mut pool = latest_pool(Direction::Serverbound);
        assert!(pool.remove(ids::CODE_BUILDER_SOURCE));
        assert!(!pool.remove(ids::CODE_BUILDER_SOURCE));
        let named = pool.map(|pk| pk.name());
        assert_eq!(named.get(ids::TEXT), Some("Text"));
        assert_eq!(named.ids(), pool.ids());
        assert!(Direction::Serverbound.flip() == Direction::Clientbound);
    }
}
