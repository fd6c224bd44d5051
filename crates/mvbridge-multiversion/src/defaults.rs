//! Block and item ID rewriting shared by every adapter.
//!
//! These passes only touch IDs and never change a packet's shape. They run
//! directly between a legacy version and the latest one, before the
//! structural upgrade or before the structural downgrade.

use crate::{v1_20_80, Packet, SessionInfo};
use mvbridge_chunk::{recode, recode_sub_chunk, ChunkLayout, ChunkResult, VerticalRange};
use mvbridge_mappings::Remapper;
use mvbridge_protocol_core::{
    ids, level_event, sub_chunk_result, CraftingData, GamePacket, InventoryAction,
    InventoryTransaction, ItemEntry, LevelChunk, StackRequest, StackRequestAction, SubChunk,
    TransactionData, UseItemTransactionData,
};
use mvbridge_types::{ItemInstance, ItemStack};

/// Rewrite the IDs in a packet received from a legacy peer. Packets the
/// latest version no longer accepts are dropped.
pub fn upgrade_fields(packet: Packet, remapper: &Remapper, session: &SessionInfo) -> Option<Packet> {
    let remap = Remap {
        remapper,
        towards_latest: true,
    };
    match packet {
        Packet::Latest(GamePacket::Unknown { id, .. })
            if id == ids::CRAFTING_EVENT || id == ids::SET_HUD =>
        {
            tracing::debug!("Dropping retired packet {:#x}", id);
            None
        }
        Packet::Latest(pk) => Some(Packet::Latest(remap_game(pk, &remap, session))),
        Packet::V1_20_80(v1_20_80::LegacyPacket::StartGame(mut pk)) => {
            remap_item_table(&mut pk.0.items, &remap);
            Some(pk.into())
        }
        Packet::V1_20_80(v1_20_80::LegacyPacket::CraftingData(_)) => Some(
            v1_20_80::CraftingData {
                clear_recipes: true,
                ..Default::default()
            }
            .into(),
        ),
        other => Some(other),
    }
}

/// Rewrite the IDs in a latest-shaped packet for a legacy peer.
pub fn downgrade_fields(packet: Packet, remapper: &Remapper, session: &SessionInfo) -> Option<Packet> {
    let remap = Remap {
        remapper,
        towards_latest: false,
    };
    match packet {
        Packet::Latest(pk) => Some(Packet::Latest(remap_game(pk, &remap, session))),
        other => Some(other),
    }
}

struct Remap<'a> {
    remapper: &'a Remapper,
    towards_latest: bool,
}

impl Remap<'_> {
    fn block(&self, id: u32) -> u32 {
        if self.towards_latest {
            self.remapper.upgrade_block(id)
        } else {
            self.remapper.downgrade_block(id)
        }
    }

    fn from_air(&self) -> u32 {
        if self.towards_latest {
            self.remapper.legacy_air()
        } else {
            self.remapper.latest_air()
        }
    }

    fn to_air(&self) -> u32 {
        if self.towards_latest {
            self.remapper.latest_air()
        } else {
            self.remapper.legacy_air()
        }
    }

    fn item(&self, item: &ItemStack) -> ItemStack {
        if self.towards_latest {
            self.remapper.upgrade_item(item)
        } else {
            self.remapper.downgrade_item(item)
        }
    }

    fn instance(&self, instance: &ItemInstance) -> ItemInstance {
        if self.towards_latest {
            self.remapper.upgrade_item_instance(instance)
        } else {
            self.remapper.downgrade_item_instance(instance)
        }
    }

    fn item_id(&self, name: &str) -> Option<i32> {
        if self.towards_latest {
            self.remapper.latest_item_id(name)
        } else {
            self.remapper.legacy_item_id(name)
        }
    }
}

fn remap_game(mut pk: GamePacket, remap: &Remap, session: &SessionInfo) -> GamePacket {
    match &mut pk {
        GamePacket::LevelChunk(chunk) => recode_level_chunk(chunk, remap, session),
        GamePacket::SubChunk(sub) => recode_sub_chunks(sub, remap),
        GamePacket::UpdateBlock(update) => {
            update.new_block_runtime_id = remap.block(update.new_block_runtime_id)
        }
        GamePacket::UpdateBlockSynced(update) => {
            update.new_block_runtime_id = remap.block(update.new_block_runtime_id)
        }
        GamePacket::UpdateSubChunkBlocks(update) => {
            for entry in update.blocks.iter_mut().chain(update.extra.iter_mut()) {
                entry.block_runtime_id = remap.block(entry.block_runtime_id);
            }
        }
        GamePacket::LevelEvent(event) => match event.event_type {
            level_event::PARTICLES_DESTROY_BLOCK => {
                event.event_data = remap.block(event.event_data as u32) as i32
            }
            level_event::PARTICLES_CRACK_BLOCK => {
                let block = remap.block((event.event_data & CRACK_BLOCK_MASK) as u32);
                match pack_crack_block(event.event_data, block) {
                    Some(data) => event.event_data = data,
                    None => tracing::warn!(
                        "Block {} does not fit a crack particle event, leaving it unchanged",
                        block
                    ),
                }
            }
            _ => {}
        },
        GamePacket::LevelSoundEvent(sound) if sound.carries_block() => {
            sound.extra_data = remap.block(sound.extra_data as u32) as i32
        }
        GamePacket::InventoryTransaction(tx) => remap_transaction(tx, remap),
        GamePacket::ItemStackRequest(pk) => {
            for request in &mut pk.requests {
                remap_stack_request(request, remap);
            }
        }
        GamePacket::PlayerAuthInput(pk) => {
            let interaction = &mut pk.actions.item_interaction;
            remap_actions(&mut interaction.actions, remap);
            remap_use_item(&mut interaction.data, remap);
            remap_stack_request(&mut pk.actions.item_stack_request, remap);
        }
        GamePacket::MobEquipment(pk) => pk.new_item = remap.instance(&pk.new_item),
        GamePacket::MobArmourEquipment(pk) => {
            for piece in pk.pieces_mut() {
                *piece = remap.instance(piece);
            }
        }
        GamePacket::InventoryContent(pk) => {
            for slot in &mut pk.content {
                slot.0 = remap.instance(&slot.0);
            }
        }
        GamePacket::InventorySlot(pk) => pk.new_item = remap.instance(&pk.new_item),
        GamePacket::CreativeContent(pk) => {
            for entry in &mut pk.items {
                entry.item = remap.item(&entry.item);
            }
            pk.items.retain(|entry| !entry.item.is_empty());
        }
        GamePacket::AddPlayer(pk) => pk.held_item = remap.instance(&pk.held_item),
        GamePacket::AddItemActor(pk) => pk.item = remap.instance(&pk.item),
        GamePacket::StartGame(pk) => remap_item_table(&mut pk.items, remap),
        GamePacket::CraftingData(pk) => {
            // recipe item IDs are not rewritten; the peer gets an empty book
            *pk = CraftingData {
                clear_recipes: true,
                ..Default::default()
            }
        }
        _ => {}
    }
    pk
}

/// The block runtime ID sits in the low 24 bits of a crack particle event,
/// the block face above it.
const CRACK_BLOCK_MASK: i32 = 0xff_ffff;

fn pack_crack_block(event_data: i32, block: u32) -> Option<i32> {
    let block = i32::try_from(block).ok().filter(|&block| block <= CRACK_BLOCK_MASK)?;
    Some((event_data & !CRACK_BLOCK_MASK) | block)
}

fn remap_actions(actions: &mut [InventoryAction], remap: &Remap) {
    for action in actions {
        action.old_item = remap.instance(&action.old_item);
        action.new_item = remap.instance(&action.new_item);
    }
}

fn remap_use_item(data: &mut UseItemTransactionData, remap: &Remap) {
    data.held_item = remap.instance(&data.held_item);
    data.block_runtime_id = remap.block(data.block_runtime_id);
}

fn remap_stack_request(request: &mut StackRequest, remap: &Remap) {
    for action in &mut request.actions {
        if let StackRequestAction::CraftResultsDeprecated { result_items, .. } = action {
            for item in result_items {
                item.0 = remap.item(&item.0);
            }
        }
    }
}

fn remap_transaction(tx: &mut InventoryTransaction, remap: &Remap) {
    remap_actions(&mut tx.actions, remap);
    match &mut tx.transaction_data {
        TransactionData::UseItem(data) => remap_use_item(data, remap),
        TransactionData::UseItemOnEntity(data) => data.held_item = remap.instance(&data.held_item),
        TransactionData::ReleaseItem(data) => data.held_item = remap.instance(&data.held_item),
        TransactionData::Normal | TransactionData::Mismatch => {}
    }
}

/// Renumber the StartGame item table by name. Items the other side does
/// not know, custom items included, are dropped rather than passed through.
fn remap_item_table(items: &mut Vec<ItemEntry>, remap: &Remap) {
    let before = items.len();
    items.retain_mut(|entry| match remap.item_id(&entry.name) {
        Some(id) => {
            entry.runtime_id = id as i16;
            true
        }
        None => false,
    });
    if items.len() != before {
        tracing::debug!("Left {} unknown items out of the item table", before - items.len());
    }
}

fn recode_level_chunk(chunk: &mut LevelChunk, remap: &Remap, session: &SessionInfo) {
    if chunk.request_mode() || chunk.cache_enabled {
        tracing::trace!("Level chunk at {:?} carries no block data", chunk.position);
        return;
    }
    let layout = ChunkLayout {
        sub_chunk_count: chunk.sub_chunk_count as usize,
        legacy_biomes: session.legacy_biomes(),
        range: VerticalRange::for_dimension(chunk.dimension),
    };
    match recode(
        &chunk.raw_payload,
        layout,
        remap.from_air(),
        remap.to_air(),
        |id| remap.block(id),
    ) {
        Ok(payload) => chunk.raw_payload = payload,
        Err(err) => tracing::error!("Failed to recode level chunk at {:?}: {}", chunk.position, err),
    }
}

/// All entries or none: one bad entry leaves the packet as it was.
fn recode_sub_chunks(pk: &mut SubChunk, remap: &Remap) {
    if pk.cache_enabled {
        return;
    }
    let payloads: ChunkResult<Vec<Option<Vec<u8>>>> = pk
        .entries
        .iter()
        .map(|entry| {
            if entry.result != sub_chunk_result::SUCCESS {
                return Ok(None);
            }
            recode_sub_chunk(&entry.raw_payload, |id| remap.block(id)).map(Some)
        })
        .collect();
    match payloads {
        Ok(payloads) => {
            for (entry, payload) in pk.entries.iter_mut().zip(payloads) {
                if let Some(payload) = payload {
                    entry.raw_payload = payload;
                }
            }
        }
        Err(err) => tracing::error!("Failed to recode sub-chunks at {:?}: {}", pk.position, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::*;
    use mvbridge_chunk::{BiomeStorage, Biomes, ChunkColumn, PalettedStorage};
    use mvbridge_types::ChunkPos;
    use mvbridge_protocol_core::{
        input_flag, sound_event, BlockChangeEntry, CreativeContent, CreativeItem,
        ItemInteractionData, LevelEvent, LevelSoundEvent, Marshal, PlayerAuthInput, Reader,
        Recipe, StartGame, SubChunkEntry, UpdateSubChunkBlocks, Writer,
        SUB_CHUNK_REQUEST_MODE_LIMITED, SUB_CHUNK_REQUEST_MODE_LIMITLESS,
    };

    fn session() -> SessionInfo {
        SessionInfo::new("1.20.0")
    }

    fn up(pk: GamePacket) -> Option<GamePacket> {
        match upgrade_fields(Packet::Latest(pk), &remapper(), &session())? {
            Packet::Latest(pk) => Some(pk),
            other => panic!("unexpected shape {:?}", other),
        }
    }

    fn down(pk: GamePacket) -> GamePacket {
        match downgrade_fields(Packet::Latest(pk), &remapper(), &session()) {
            Some(Packet::Latest(pk)) => pk,
            other => panic!("unexpected result {:?}", other),
        }
    }

    fn stone_chunk_payload(air: u32, stone: u32) -> Vec<u8> {
        let mut sub_chunks = Vec::new();
        for i in 0..4 {
            let mut sub = mvbridge_chunk::SubChunk::new(i);
            sub.set_block(0, 0, 0, 0, air, air);
            sub_chunks.push(sub);
        }
        sub_chunks[0].set_block(0, 0, 0, 0, air, stone);
        let mut biomes = vec![BiomeStorage::Explicit(PalettedStorage::uniform(1))];
        biomes.resize(24, BiomeStorage::SameAsPrevious);
        let column = ChunkColumn {
            air,
            range: VerticalRange::OVERWORLD,
            sub_chunks,
            biomes: Biomes::Paletted(biomes),
        };
        mvbridge_chunk::encode(&column).into_payload(&[0])
    }

    fn layout(count: usize) -> ChunkLayout {
        ChunkLayout {
            sub_chunk_count: count,
            legacy_biomes: false,
            range: VerticalRange::OVERWORLD,
        }
    }

    #[test]
    fn test_level_chunk_upgrade() {
        let pk = LevelChunk {
            sub_chunk_count: 4,
            raw_payload: stone_chunk_payload(LEGACY_AIR, LEGACY_STONE),
            ..Default::default()
        };
        let Some(GamePacket::LevelChunk(out)) = up(GamePacket::LevelChunk(pk)) else {
            panic!("level chunk lost");
        };
        let (column, rest) = mvbridge_chunk::decode(&out.raw_payload, LATEST_AIR, layout(4)).unwrap();
        assert_eq!(rest, &[0]);
        assert_eq!(column.block(0, -64, 0, 0), LATEST_STONE);
        assert_eq!(column.block(0, -63, 0, 0), LATEST_AIR);
        assert_eq!(column.block(5, 0, 5, 0), LATEST_AIR);
        assert_eq!(out.raw_payload, stone_chunk_payload(LATEST_AIR, LATEST_STONE));
    }

    fn encode(pk: &impl Marshal) -> Vec<u8> {
        let mut w = Writer::new(0);
        pk.marshal(&mut w);
        w.into_bytes().to_vec()
    }

    #[test]
    fn test_chunks_without_block_data_untouched() {
        let limited = LevelChunk {
            position: ChunkPos::new(3, -7),
            sub_chunk_count: SUB_CHUNK_REQUEST_MODE_LIMITED,
            highest_sub_chunk: 11,
            raw_payload: vec![0xff, 0x00, 0x13],
            ..Default::default()
        };
        let limitless = LevelChunk {
            sub_chunk_count: SUB_CHUNK_REQUEST_MODE_LIMITLESS,
            raw_payload: vec![0xff, 0x00, 0x13],
            ..Default::default()
        };
        let cached = LevelChunk {
            sub_chunk_count: 4,
            cache_enabled: true,
            blob_hashes: vec![0x1234_5678_9abc_def0, 42],
            raw_payload: vec![0],
            ..Default::default()
        };
        for pk in [limited, limitless, cached] {
            let bytes = encode(&pk);
            let mut decoded = LevelChunk::default();
            decoded.unmarshal(&mut Reader::new(bytes.clone(), 0, true)).unwrap();
            assert_eq!(decoded, pk);

            let out = up(GamePacket::LevelChunk(decoded.clone())).unwrap();
            assert_eq!(encode(&out), bytes);
            assert_eq!(encode(&down(GamePacket::LevelChunk(decoded))), bytes);
        }
    }

    #[test]
    fn test_malformed_chunk_forwarded() {
        let pk = LevelChunk {
            sub_chunk_count: 4,
            raw_payload: vec![9, 1, 0, 0x0e],
            ..Default::default()
        };
        let out = up(GamePacket::LevelChunk(pk.clone())).unwrap();
        assert_eq!(out, GamePacket::LevelChunk(pk));
    }

    #[test]
    fn test_sub_chunk_all_or_nothing() {
        let mut sub = mvbridge_chunk::SubChunk::new(0);
        sub.set_block(1, 1, 1, 0, LEGACY_AIR, LEGACY_STONE);
        let mut good = Vec::new();
        sub.encode(&mut good);

        let entry = |payload: Vec<u8>| SubChunkEntry {
            result: sub_chunk_result::SUCCESS,
            raw_payload: payload,
            ..Default::default()
        };
        let pk = SubChunk {
            entries: vec![entry(good.clone()), entry(vec![77])],
            ..Default::default()
        };
        let out = up(GamePacket::SubChunk(pk.clone())).unwrap();
        assert_eq!(out, GamePacket::SubChunk(pk));

        let pk = SubChunk {
            entries: vec![entry(good.clone())],
            ..Default::default()
        };
        let Some(GamePacket::SubChunk(out)) = up(GamePacket::SubChunk(pk)) else {
            panic!("sub-chunk lost");
        };
        assert_ne!(out.entries[0].raw_payload, good);
    }

    #[test]
    fn test_unknown_item_in_transaction() {
        let pk = InventoryTransaction {
            actions: vec![InventoryAction {
                old_item: ItemInstance::new(ItemStack::new(LEGACY_OLD_ITEM, 1)),
                new_item: ItemInstance::new(ItemStack::new(LEGACY_STONE_ITEM, 3)),
                ..Default::default()
            }],
            transaction_data: TransactionData::UseItem(UseItemTransactionData {
                held_item: ItemInstance::new(ItemStack::new(-40, 1)),
                block_runtime_id: LEGACY_STONE,
                ..Default::default()
            }),
            ..Default::default()
        };
        let Some(GamePacket::InventoryTransaction(out)) = up(GamePacket::InventoryTransaction(pk)) else {
            panic!("transaction lost");
        };
        assert!(out.actions[0].old_item.stack.is_empty());
        assert_eq!(out.actions[0].new_item.stack.network_id, LATEST_STONE_ITEM);
        assert_eq!(out.actions[0].new_item.stack.count, 3);
        let TransactionData::UseItem(data) = out.transaction_data else {
            panic!("transaction data changed kind");
        };
        assert!(data.held_item.stack.is_empty());
        assert_eq!(data.block_runtime_id, LATEST_STONE);
    }

    #[test]
    fn test_auth_input_item_interaction() {
        let mut pk = PlayerAuthInput {
            input_data: input_flag::PERFORM_ITEM_INTERACTION,
            ..Default::default()
        };
        pk.actions.item_interaction = ItemInteractionData {
            actions: vec![InventoryAction {
                new_item: ItemInstance::new(ItemStack::new(LEGACY_STONE_ITEM, 2)),
                ..Default::default()
            }],
            data: UseItemTransactionData {
                held_item: ItemInstance::new(ItemStack::new(LEGACY_STONE_ITEM, 1)),
                block_runtime_id: LEGACY_STONE,
                ..Default::default()
            },
            ..Default::default()
        };
        let Some(GamePacket::PlayerAuthInput(out)) = up(GamePacket::PlayerAuthInput(pk)) else {
            panic!("input lost");
        };
        let interaction = &out.actions.item_interaction;
        assert_eq!(interaction.actions[0].new_item.stack.network_id, LATEST_STONE_ITEM);
        assert_eq!(interaction.data.held_item.stack.network_id, LATEST_STONE_ITEM);
        assert_eq!(interaction.data.block_runtime_id, LATEST_STONE);
    }

    #[test]
    fn test_retired_packets_dropped() {
        for id in [ids::CRAFTING_EVENT, ids::SET_HUD] {
            assert_eq!(up(GamePacket::Unknown { id, payload: vec![1] }), None);
        }
        let other = GamePacket::Unknown {
            id: 0x99,
            payload: vec![1],
        };
        assert_eq!(up(other.clone()), Some(other));
    }

    #[test]
    fn test_block_updates_downgrade() {
        let pk = UpdateSubChunkBlocks {
            blocks: vec![BlockChangeEntry {
                block_runtime_id: LATEST_STONE,
                ..Default::default()
            }],
            extra: vec![BlockChangeEntry {
                block_runtime_id: 12345,
                ..Default::default()
            }],
            ..Default::default()
        };
        let GamePacket::UpdateSubChunkBlocks(out) = down(GamePacket::UpdateSubChunkBlocks(pk)) else {
            panic!("update lost");
        };
        assert_eq!(out.blocks[0].block_runtime_id, LEGACY_STONE);
        assert_eq!(out.extra[0].block_runtime_id, LEGACY_AIR);
    }

    #[test]
    fn test_level_events_downgrade() {
        let pk = LevelEvent {
            event_type: level_event::PARTICLES_CRACK_BLOCK,
            event_data: (3 << 24) | LATEST_STONE as i32,
            ..Default::default()
        };
        let GamePacket::LevelEvent(out) = down(GamePacket::LevelEvent(pk)) else {
            panic!("event lost");
        };
        assert_eq!(out.event_data, (3 << 24) | LEGACY_STONE as i32);

        assert_eq!(pack_crack_block(5 << 24, 0xff_ffff), Some((5 << 24) | 0xff_ffff));
        assert_eq!(pack_crack_block(5 << 24, 0x100_0000), None);
        assert_eq!(pack_crack_block(0, u32::MAX), None);

        let pk = LevelEvent {
            event_type: 9800,
            event_data: LATEST_STONE as i32,
            ..Default::default()
        };
        assert_eq!(down(GamePacket::LevelEvent(pk.clone())), GamePacket::LevelEvent(pk));

        let pk = LevelSoundEvent {
            sound_type: sound_event::PLACE,
            extra_data: LATEST_STONE as i32,
            ..Default::default()
        };
        let GamePacket::LevelSoundEvent(out) = down(GamePacket::LevelSoundEvent(pk)) else {
            panic!("sound lost");
        };
        assert_eq!(out.extra_data, LEGACY_STONE as i32);
    }

    #[test]
    fn test_crafting_data_cleared() {
        let pk = CraftingData {
            recipes: vec![Recipe::default()],
            ..Default::default()
        };
        let GamePacket::CraftingData(out) = down(GamePacket::CraftingData(pk)) else {
            panic!("crafting data lost");
        };
        assert!(out.clear_recipes);
        assert!(out.recipes.is_empty());
    }

    #[test]
    fn test_start_game_item_table() {
        let entry = |name: &str, runtime_id: i16| ItemEntry {
            name: name.into(),
            runtime_id,
            component_based: false,
        };
        let pk = StartGame {
            items: vec![
                entry("minecraft:stone", LATEST_STONE_ITEM as i16),
                entry("minecraft:new_item", LATEST_NEW_ITEM as i16),
            ],
            ..Default::default()
        };
        let GamePacket::StartGame(out) = down(GamePacket::StartGame(pk)) else {
            panic!("start game lost");
        };
        assert_eq!(out.items, vec![entry("minecraft:stone", LEGACY_STONE_ITEM as i16)]);
    }

    #[test]
    fn test_creative_content_drops_unknown() {
        let pk = CreativeContent {
            items: vec![
                CreativeItem {
                    creative_item_network_id: 1,
                    item: ItemStack::new(LATEST_STONE_ITEM, 1),
                },
                CreativeItem {
                    creative_item_network_id: 2,
                    item: ItemStack::new(LATEST_NEW_ITEM, 1),
                },
            ],
        };
        let GamePacket::CreativeContent(out) = down(GamePacket::CreativeContent(pk)) else {
            panic!("creative content lost");
        };
        assert_eq!(out.items.len(), 1);
        assert_eq!(out.items[0].item.network_id, LEGACY_STONE_ITEM);
    }
}
