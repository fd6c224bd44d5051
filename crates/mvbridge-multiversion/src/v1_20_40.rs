//! Protocol 622 (1.20.40).

use crate::packet::legacy_packets;
use crate::{v1_20_60, Packet, VersionAdapter};
use mvbridge_mappings::Remapper;
use mvbridge_protocol_core::{
    self as latest, ids, store_offer_type, CodecResult, Direction, GamePacket, Marshal, PacketPool,
    Reader, Writer,
};
use mvbridge_types::ProtocolVersion;

pub const VERSION: ProtocolVersion = ProtocolVersion::new(622, "1.20.40");

/// Packets introduced after this version. They have no older equivalent.
const UNSUPPORTED: [u32; 2] = [
    ids::SET_PLAYER_INVENTORY_OPTIONS,
    ids::PLAYER_TOGGLE_CRAFTER_SLOT_REQUEST,
];

legacy_packets!(crate::Packet::V1_20_40 {
    ShowStoreOffer => ids::SHOW_STORE_OFFER,
});

/// ShowStoreOffer before offer types replaced the show-all flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowStoreOffer {
    pub offer_id: String,
    pub show_all: bool,
}

impl Marshal for ShowStoreOffer {
    fn marshal(&self, w: &mut Writer) {
        w.string(&self.offer_id);
        w.bool(self.show_all);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.offer_id = r.string()?;
        self.show_all = r.bool()?;
        Ok(())
    }
}

fn downgrade_packet(packet: Packet) -> Option<Packet> {
    let pk = match packet {
        Packet::Latest(pk) => pk,
        other => return Some(other),
    };
    match pk {
        GamePacket::ShowStoreOffer(pk) => Some(
            ShowStoreOffer {
                offer_id: pk.offer_id,
                show_all: false,
            }
            .into(),
        ),
        GamePacket::SetPlayerInventoryOptions(_) | GamePacket::PlayerToggleCrafterSlotRequest(_) => {
            tracing::warn!("Dropping {} for protocol {}", pk.name(), VERSION.id);
            None
        }
        other => Some(Packet::Latest(other)),
    }
}

/// The 1.20.60 pool minus packets this version never had.
pub fn packet_pool(direction: Direction) -> PacketPool<Packet> {
    let mut pool = v1_20_60::packet_pool(direction);
    for id in UNSUPPORTED {
        pool.remove(id);
    }
    for &id in LegacyPacket::IDS {
        if !pool.contains(id) {
            continue;
        }
        if let Some(factory) = LegacyPacket::factory(id) {
            pool.register(id, factory);
        }
    }
    pool
}

#[derive(Debug)]
pub struct Adapter {
    remapper: Remapper,
    clientbound: PacketPool<Packet>,
    serverbound: PacketPool<Packet>,
}

impl Adapter {
    pub fn new(remapper: Remapper) -> Self {
        Self {
            remapper,
            clientbound: packet_pool(Direction::Clientbound),
            serverbound: packet_pool(Direction::Serverbound),
        }
    }
}

impl VersionAdapter for Adapter {
    fn version(&self) -> ProtocolVersion {
        VERSION
    }

    fn packets(&self, direction: Direction) -> &PacketPool<Packet> {
        match direction {
            Direction::Clientbound => &self.clientbound,
            Direction::Serverbound => &self.serverbound,
        }
    }

    fn remapper(&self) -> &Remapper {
        &self.remapper
    }

    fn upgrade(&self, packets: Vec<Packet>) -> Vec<Packet> {
        packets
            .into_iter()
            .map(|packet| match packet {
                Packet::V1_20_40(LegacyPacket::ShowStoreOffer(pk)) => {
                    Packet::Latest(GamePacket::ShowStoreOffer(latest::ShowStoreOffer {
                        offer_id: pk.offer_id,
                        offer_type: store_offer_type::MARKETPLACE,
                    }))
                }
                other => other,
            })
            .collect()
    }

    fn downgrade(&self, packets: Vec<Packet>) -> Vec<Packet> {
        packets.into_iter().filter_map(downgrade_packet).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::remapper;

    fn adapter() -> Adapter {
        Adapter::new(remapper())
    }

    #[test]
    fn test_store_offer() {
        let pk = latest::ShowStoreOffer {
            offer_id: "offer".into(),
            offer_type: store_offer_type::SERVER_PAGE,
        };
        let out = adapter().downgrade(vec![GamePacket::ShowStoreOffer(pk).into()]);
        assert_eq!(
            out,
            vec![Packet::from(ShowStoreOffer {
                offer_id: "offer".into(),
                show_all: false,
            })]
        );

        let up = adapter().upgrade(out);
        let Some(GamePacket::ShowStoreOffer(pk)) = up[0].as_latest() else {
            panic!("offer not upgraded");
        };
        assert_eq!(pk.offer_type, store_offer_type::MARKETPLACE);
        assert_eq!(pk.offer_id, "offer");
    }

    #[test]
    fn test_new_packets_dropped() {
        let out = adapter().downgrade(vec![
            GamePacket::SetPlayerInventoryOptions(Default::default()).into(),
            GamePacket::PlayerToggleCrafterSlotRequest(Default::default()).into(),
            GamePacket::ShowStoreOffer(Default::default()).into(),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name(), "ShowStoreOffer");
    }

    #[test]
    fn test_pool() {
        let adapter = adapter();
        let server = adapter.packets(Direction::Serverbound);
        let client = adapter.packets(Direction::Clientbound);
        assert!(!server.contains(ids::SET_PLAYER_INVENTORY_OPTIONS));
        assert!(!server.contains(ids::PLAYER_TOGGLE_CRAFTER_SLOT_REQUEST));
        assert!(!client.contains(ids::SET_PLAYER_INVENTORY_OPTIONS));
        assert!(matches!(
            client.get(ids::SHOW_STORE_OFFER),
            Some(Packet::V1_20_40(LegacyPacket::ShowStoreOffer(_)))
        ));
        assert!(matches!(
            server.get(ids::PLAYER_AUTH_INPUT),
            Some(Packet::V1_20_60(v1_20_60::LegacyPacket::PlayerAuthInput(_)))
        ));
    }

    #[test]
    fn test_decode_store_offer() {
        let mut w = Writer::new(0);
        w.string("sale");
        w.bool(true);
        let pool = packet_pool(Direction::Clientbound);
        let mut r = Reader::new(w.into_bytes(), 0, true);
        let packet = pool.decode(ids::SHOW_STORE_OFFER, &mut r).unwrap();
        assert_eq!(
            packet,
            Packet::from(ShowStoreOffer {
                offer_id: "sale".into(),
                show_all: true,
            })
        );
    }
}
