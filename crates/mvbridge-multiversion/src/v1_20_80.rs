//! Protocol 671 (1.20.80), the version just before the latest.

use crate::packet::legacy_packets;
use crate::{Packet, VersionAdapter};
use mvbridge_mappings::Remapper;
use mvbridge_protocol_core::{
    self as latest, ids, latest_pool, read_vec, write_vec, CodecResult, Direction, GamePacket,
    Marshal, PacketPool, Reader, Writer,
};
use mvbridge_types::ProtocolVersion;

pub const VERSION: ProtocolVersion = ProtocolVersion::new(671, "1.20.80");

legacy_packets!(crate::Packet::V1_20_80 {
    Text => ids::TEXT,
    ContainerClose => ids::CONTAINER_CLOSE,
    CodeBuilderSource => ids::CODE_BUILDER_SOURCE,
    StartGame => ids::START_GAME,
    CraftingData => ids::CRAFTING_DATA,
});

/// Text without the filtered message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Text {
    pub text_type: u8,
    pub needs_translation: bool,
    pub source_name: String,
    pub message: String,
    pub parameters: Vec<String>,
    pub xuid: String,
    pub platform_chat_id: String,
}

impl Marshal for Text {
    fn marshal(&self, w: &mut Writer) {
        w.u8(self.text_type);
        w.bool(self.needs_translation);
        latest::write_text_content(w, self.text_type, &self.source_name, &self.message, &self.parameters);
        w.string(&self.xuid);
        w.string(&self.platform_chat_id);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.text_type = r.u8()?;
        self.needs_translation = r.bool()?;
        let (source_name, message, parameters) = latest::read_text_content(r, self.text_type)?;
        self.source_name = source_name;
        self.message = message;
        self.parameters = parameters;
        self.xuid = r.string()?;
        self.platform_chat_id = r.string()?;
        Ok(())
    }
}

impl From<Text> for latest::Text {
    fn from(pk: Text) -> Self {
        Self {
            filtered_message: pk.message.clone(),
            text_type: pk.text_type,
            needs_translation: pk.needs_translation,
            source_name: pk.source_name,
            message: pk.message,
            parameters: pk.parameters,
            xuid: pk.xuid,
            platform_chat_id: pk.platform_chat_id,
        }
    }
}

impl From<latest::Text> for Text {
    fn from(pk: latest::Text) -> Self {
        Self {
            text_type: pk.text_type,
            needs_translation: pk.needs_translation,
            source_name: pk.source_name,
            message: pk.message,
            parameters: pk.parameters,
            xuid: pk.xuid,
            platform_chat_id: pk.platform_chat_id,
        }
    }
}

/// ContainerClose without the container type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerClose {
    pub window_id: u8,
    pub server_side: bool,
}

impl Marshal for ContainerClose {
    fn marshal(&self, w: &mut Writer) {
        w.u8(self.window_id);
        w.bool(self.server_side);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.window_id = r.u8()?;
        self.server_side = r.bool()?;
        Ok(())
    }
}

/// CodeBuilderSource carrying a list of status bytes instead of one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBuilderSource {
    pub operation: u8,
    pub category: u8,
    pub value: Vec<u8>,
}

impl Marshal for CodeBuilderSource {
    fn marshal(&self, w: &mut Writer) {
        w.u8(self.operation);
        w.u8(self.category);
        w.byte_slice(&self.value);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.operation = r.u8()?;
        self.category = r.u8()?;
        self.value = r.byte_slice()?;
        Ok(())
    }
}

/// StartGame without the hardcore flag. The inner `hardcore` field is never
/// written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StartGame(pub latest::StartGame);

impl Marshal for StartGame {
    fn marshal(&self, w: &mut Writer) {
        self.0.write(w, false);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.0.read(r, false)
    }
}

/// A recipe written without its unlock requirement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyRecipe(pub latest::Recipe);

impl Marshal for LegacyRecipe {
    fn marshal(&self, w: &mut Writer) {
        self.0.write(w, false);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.0.read(r, false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CraftingData {
    pub recipes: Vec<LegacyRecipe>,
    pub potion_recipes: Vec<latest::PotionRecipe>,
    pub potion_container_change_recipes: Vec<latest::PotionContainerChangeRecipe>,
    pub material_reducers: Vec<latest::MaterialReducer>,
    pub clear_recipes: bool,
}

impl Marshal for CraftingData {
    fn marshal(&self, w: &mut Writer) {
        write_vec(w, &self.recipes);
        write_vec(w, &self.potion_recipes);
        write_vec(w, &self.potion_container_change_recipes);
        write_vec(w, &self.material_reducers);
        w.bool(self.clear_recipes);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.recipes = read_vec(r)?;
        self.potion_recipes = read_vec(r)?;
        self.potion_container_change_recipes = read_vec(r)?;
        self.material_reducers = read_vec(r)?;
        self.clear_recipes = r.bool()?;
        Ok(())
    }
}

fn upgrade_recipe(LegacyRecipe(mut recipe): LegacyRecipe) -> latest::Recipe {
    match &mut recipe {
        latest::Recipe::Shapeless(r) => r.unlock_requirement = Default::default(),
        latest::Recipe::Shaped(r) => r.unlock_requirement = Default::default(),
        latest::Recipe::Furnace(_) => {}
    }
    recipe
}

fn upgrade_packet(pk: LegacyPacket) -> Vec<Packet> {
    let upgraded = match pk {
        LegacyPacket::Text(pk) => GamePacket::Text(pk.into()),
        LegacyPacket::ContainerClose(pk) => GamePacket::ContainerClose(latest::ContainerClose {
            window_id: pk.window_id,
            container_type: 0,
            server_side: pk.server_side,
        }),
        LegacyPacket::CodeBuilderSource(pk) => {
            return pk
                .value
                .iter()
                .map(|&code_status| {
                    Packet::Latest(GamePacket::CodeBuilderSource(latest::CodeBuilderSource {
                        operation: pk.operation,
                        category: pk.category,
                        code_status,
                    }))
                })
                .collect();
        }
        LegacyPacket::StartGame(StartGame(mut pk)) => {
            pk.hardcore = false;
            GamePacket::StartGame(pk)
        }
        LegacyPacket::CraftingData(pk) => GamePacket::CraftingData(latest::CraftingData {
            recipes: pk.recipes.into_iter().map(upgrade_recipe).collect(),
            potion_recipes: pk.potion_recipes,
            potion_container_change_recipes: pk.potion_container_change_recipes,
            material_reducers: pk.material_reducers,
            clear_recipes: pk.clear_recipes,
        }),
    };
    vec![Packet::Latest(upgraded)]
}

fn downgrade_packet(packet: Packet) -> Packet {
    match packet {
        Packet::Latest(GamePacket::Text(pk)) => Text::from(pk).into(),
        Packet::Latest(GamePacket::ContainerClose(pk)) => ContainerClose {
            window_id: pk.window_id,
            server_side: pk.server_side,
        }
        .into(),
        Packet::Latest(GamePacket::CodeBuilderSource(pk)) => CodeBuilderSource {
            operation: pk.operation,
            category: pk.category,
            value: vec![pk.code_status],
        }
        .into(),
        Packet::Latest(GamePacket::StartGame(pk)) => StartGame(pk).into(),
        Packet::Latest(GamePacket::CraftingData(pk)) => CraftingData {
            recipes: pk.recipes.into_iter().map(LegacyRecipe).collect(),
            potion_recipes: pk.potion_recipes,
            potion_container_change_recipes: pk.potion_container_change_recipes,
            material_reducers: pk.material_reducers,
            clear_recipes: pk.clear_recipes,
        }
        .into(),
        other => other,
    }
}

/// The latest pool with this version's retired shapes swapped in.
pub fn packet_pool(direction: Direction) -> PacketPool<Packet> {
    let mut pool = latest_pool(direction).map(Packet::Latest);
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
        let mut out = Vec::with_capacity(packets.len());
        for packet in packets {
            match packet {
                Packet::V1_20_80(pk) => out.extend(upgrade_packet(pk)),
                other => out.push(other),
            }
        }
        out
    }

    fn downgrade(&self, packets: Vec<Packet>) -> Vec<Packet> {
        packets.into_iter().map(downgrade_packet).collect()
    }
}
