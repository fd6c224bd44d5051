//! Protocol 649 (1.20.60).

use crate::packet::legacy_packets;
use crate::{v1_20_80, Packet, VersionAdapter};
use mvbridge_mappings::Remapper;
use mvbridge_protocol_core::{
    self as latest, arg_type, ids, read_auth_input_head, read_pack_list, read_vec,
    write_auth_input_head, write_pack_list, write_vec, CodecResult, Direction, GamePacket, Marshal,
    PackUrl, PackInfo, PacketPool, Reader, Writer,
};
use mvbridge_types::{BlockPos, ProtocolVersion, Vec2, Vec3};

pub const VERSION: ProtocolVersion = ProtocolVersion::new(649, "1.20.60");

legacy_packets!(crate::Packet::V1_20_60 {
    ResourcePacksInfo => ids::RESOURCE_PACKS_INFO,
    MobEffect => ids::MOB_EFFECT,
    SetActorMotion => ids::SET_ACTOR_MOTION,
    AvailableCommands => ids::AVAILABLE_COMMANDS,
    LecternUpdate => ids::LECTERN_UPDATE,
    PlayerAuthInput => ids::PLAYER_AUTH_INPUT,
});

/// Command argument types renumbered since this version, as
/// (latest, 1.20.60) pairs. Types not listed kept their number.
const ARG_TYPES: [(u32, u32); 9] = [
    (arg_type::EQUIPMENT_SLOTS, 43),
    (arg_type::STRING, 44),
    (arg_type::BLOCK_POSITION, 52),
    (arg_type::POSITION, 53),
    (arg_type::MESSAGE, 55),
    (arg_type::RAW_TEXT, 58),
    (arg_type::JSON, 62),
    (arg_type::BLOCK_STATES, 71),
    (arg_type::COMMAND, 74),
];

fn upgrade_arg_type(legacy: u32) -> u32 {
    ARG_TYPES
        .iter()
        .find(|&&(_, old)| old == legacy)
        .map(|&(new, _)| new)
        .unwrap_or(legacy)
}

fn downgrade_arg_type(new: u32) -> u32 {
    ARG_TYPES
        .iter()
        .find(|&&(latest, _)| latest == new)
        .map(|&(_, old)| old)
        .unwrap_or(new)
}

fn renumber_commands(pk: &mut latest::AvailableCommands, renumber: fn(u32) -> u32) {
    let params = pk
        .commands
        .iter_mut()
        .flat_map(|command| command.overloads.iter_mut())
        .flat_map(|overload| overload.parameters.iter_mut());
    for param in params {
        if let Some(basic) = param.basic_type() {
            param.set_basic_type(renumber(basic));
        }
    }
}

/// ResourcePacksInfo without the add-on flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourcePacksInfo {
    pub texture_pack_required: bool,
    pub has_scripts: bool,
    pub forcing_server_packs: bool,
    pub behaviour_packs: Vec<PackInfo>,
    pub texture_packs: Vec<PackInfo>,
    pub pack_urls: Vec<PackUrl>,
}

impl Marshal for ResourcePacksInfo {
    fn marshal(&self, w: &mut Writer) {
        w.bool(self.texture_pack_required);
        w.bool(self.has_scripts);
        w.bool(self.forcing_server_packs);
        write_pack_list(w, &self.behaviour_packs);
        write_pack_list(w, &self.texture_packs);
        write_vec(w, &self.pack_urls);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.texture_pack_required = r.bool()?;
        self.has_scripts = r.bool()?;
        self.forcing_server_packs = r.bool()?;
        self.behaviour_packs = read_pack_list(r)?;
        self.texture_packs = read_pack_list(r)?;
        self.pack_urls = read_vec(r)?;
        Ok(())
    }
}

/// MobEffect without the server tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MobEffect {
    pub entity_runtime_id: u64,
    pub operation: u8,
    pub effect_type: i32,
    pub amplifier: i32,
    pub particles: bool,
    pub duration: i32,
}

impl Marshal for MobEffect {
    fn marshal(&self, w: &mut Writer) {
        w.varuint64(self.entity_runtime_id);
        w.u8(self.operation);
        w.varint32(self.effect_type);
        w.varint32(self.amplifier);
        w.bool(self.particles);
        w.varint32(self.duration);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.entity_runtime_id = r.varuint64()?;
        self.operation = r.u8()?;
        self.effect_type = r.varint32()?;
        self.amplifier = r.varint32()?;
        self.particles = r.bool()?;
        self.duration = r.varint32()?;
        Ok(())
    }
}

/// SetActorMotion without the server tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetActorMotion {
    pub entity_runtime_id: u64,
    pub velocity: Vec3,
}

impl Marshal for SetActorMotion {
    fn marshal(&self, w: &mut Writer) {
        w.varuint64(self.entity_runtime_id);
        w.vec3(self.velocity);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.entity_runtime_id = r.varuint64()?;
        self.velocity = r.vec3()?;
        Ok(())
    }
}

/// AvailableCommands with argument types in this version's numbering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailableCommands(pub latest::AvailableCommands);

impl Marshal for AvailableCommands {
    fn marshal(&self, w: &mut Writer) {
        self.0.marshal(w);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.0.unmarshal(r)
    }
}

/// LecternUpdate with the drop-book flag this version still sends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LecternUpdate {
    pub page: u8,
    pub page_count: u8,
    pub position: BlockPos,
    pub drop_book: bool,
}

impl Marshal for LecternUpdate {
    fn marshal(&self, w: &mut Writer) {
        w.u8(self.page);
        w.u8(self.page_count);
        w.ublock_pos(self.position);
        w.bool(self.drop_book);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.page = r.u8()?;
        self.page_count = r.u8()?;
        self.position = r.ublock_pos()?;
        self.drop_book = r.bool()?;
        Ok(())
    }
}

/// PlayerAuthInput whose client-predicted vehicle section carries only the
/// vehicle ID. `vehicle_rotation` is never on the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerAuthInput(pub latest::PlayerAuthInput);

impl Marshal for PlayerAuthInput {
    fn marshal(&self, w: &mut Writer) {
        let pk = &self.0;
        write_auth_input_head(w, pk);
        if pk.predicts_vehicle() {
            w.varint64(pk.client_predicted_vehicle);
        }
        w.vec2(pk.analogue_move_vector);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        let pk = &mut self.0;
        read_auth_input_head(r, pk)?;
        if pk.predicts_vehicle() {
            pk.client_predicted_vehicle = r.varint64()?;
        }
        pk.analogue_move_vector = r.vec2()?;
        Ok(())
    }
}

fn upgrade_packet(pk: LegacyPacket) -> GamePacket {
    match pk {
        LegacyPacket::ResourcePacksInfo(pk) => GamePacket::ResourcePacksInfo(latest::ResourcePacksInfo {
            texture_pack_required: pk.texture_pack_required,
            has_addons: false,
            has_scripts: pk.has_scripts,
            forcing_server_packs: pk.forcing_server_packs,
            behaviour_packs: pk.behaviour_packs,
            texture_packs: pk.texture_packs,
            pack_urls: pk.pack_urls,
        }),
        LegacyPacket::MobEffect(pk) => GamePacket::MobEffect(latest::MobEffect {
            entity_runtime_id: pk.entity_runtime_id,
            operation: pk.operation,
            effect_type: pk.effect_type,
            amplifier: pk.amplifier,
            particles: pk.particles,
            duration: pk.duration,
            tick: 0,
        }),
        LegacyPacket::SetActorMotion(pk) => GamePacket::SetActorMotion(latest::SetActorMotion {
            entity_runtime_id: pk.entity_runtime_id,
            velocity: pk.velocity,
            tick: 0,
        }),
        LegacyPacket::AvailableCommands(AvailableCommands(mut pk)) => {
            renumber_commands(&mut pk, upgrade_arg_type);
            GamePacket::AvailableCommands(pk)
        }
        LegacyPacket::LecternUpdate(pk) => GamePacket::LecternUpdate(latest::LecternUpdate {
            page: pk.page,
            page_count: pk.page_count,
            position: pk.position,
        }),
        LegacyPacket::PlayerAuthInput(PlayerAuthInput(pk)) => {
            GamePacket::PlayerAuthInput(latest::PlayerAuthInput {
                vehicle_rotation: Vec2::default(),
                ..pk
            })
        }
    }
}

fn downgrade_packet(packet: Packet) -> Packet {
    let pk = match packet {
        Packet::Latest(pk) => pk,
        other => return other,
    };
    match pk {
        GamePacket::ResourcePacksInfo(pk) => ResourcePacksInfo {
            texture_pack_required: pk.texture_pack_required,
            has_scripts: pk.has_scripts,
            forcing_server_packs: pk.forcing_server_packs,
            behaviour_packs: pk.behaviour_packs,
            texture_packs: pk.texture_packs,
            pack_urls: pk.pack_urls,
        }
        .into(),
        GamePacket::MobEffect(pk) => MobEffect {
            entity_runtime_id: pk.entity_runtime_id,
            operation: pk.operation,
            effect_type: pk.effect_type,
            amplifier: pk.amplifier,
            particles: pk.particles,
            duration: pk.duration,
        }
        .into(),
        GamePacket::SetActorMotion(pk) => SetActorMotion {
            entity_runtime_id: pk.entity_runtime_id,
            velocity: pk.velocity,
        }
        .into(),
        GamePacket::AvailableCommands(mut pk) => {
            renumber_commands(&mut pk, downgrade_arg_type);
            AvailableCommands(pk).into()
        }
        GamePacket::LecternUpdate(pk) => LecternUpdate {
            page: pk.page,
            page_count: pk.page_count,
            position: pk.position,
            drop_book: false,
        }
        .into(),
        GamePacket::PlayerAuthInput(pk) => PlayerAuthInput(pk).into(),
        other => Packet::Latest(other),
    }
}

/// The 1.20.80 pool with this version's retired shapes swapped in.
pub fn packet_pool(direction: Direction) -> PacketPool<Packet> {
    let mut pool = v1_20_80::packet_pool(direction);
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
                Packet::V1_20_60(pk) => Packet::Latest(upgrade_packet(pk)),
                other => other,
            })
            .collect()
    }

    fn downgrade(&self, packets: Vec<Packet>) -> Vec<Packet> {
        packets.into_iter().map(downgrade_packet).collect()
    }
}
