use super::{read_vec, write_vec, Marshal};
use crate::codec::{CodecError, CodecResult, Reader, Writer};
use mvbridge_types::{BlockPos, ItemInstance, ItemStack, Vec3};

/// Inventory action sources. Only container and crafting (99999) sources carry a
/// window ID; only world interaction carries flags.
pub mod source_type {
    pub const CONTAINER: u32 = 0;
    pub const WORLD_INTERACTION: u32 = 2;
    pub const CREATIVE: u32 = 3;
    pub const CRAFTING: u32 = 99999;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryAction {
    pub source_type: u32,
    pub window_id: i32,
    pub source_flags: u32,
    pub inventory_slot: u32,
    pub old_item: ItemInstance,
    pub new_item: ItemInstance,
}

impl Marshal for InventoryAction {
    fn marshal(&self, w: &mut Writer) {
        w.varuint32(self.source_type);
        match self.source_type {
            source_type::CONTAINER | source_type::CRAFTING => w.varint32(self.window_id),
            source_type::WORLD_INTERACTION => w.varuint32(self.source_flags),
            _ => {}
        }
        w.varuint32(self.inventory_slot);
        w.item_instance(&self.old_item);
        w.item_instance(&self.new_item);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.source_type = r.varuint32()?;
        match self.source_type {
            source_type::CONTAINER | source_type::CRAFTING => self.window_id = r.varint32()?,
            source_type::WORLD_INTERACTION => self.source_flags = r.varuint32()?,
            _ => {}
        }
        self.inventory_slot = r.varuint32()?;
        self.old_item = r.item_instance()?;
        self.new_item = r.item_instance()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacySetItemSlot {
    pub container_id: u8,
    pub slots: Vec<u8>,
}

impl Marshal for LegacySetItemSlot {
    fn marshal(&self, w: &mut Writer) {
        w.u8(self.container_id);
        w.byte_slice(&self.slots);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.container_id = r.u8()?;
        self.slots = r.byte_slice()?;
        Ok(())
    }
}

pub mod transaction_type {
    pub const NORMAL: u32 = 0;
    pub const MISMATCH: u32 = 1;
    pub const USE_ITEM: u32 = 2;
    pub const USE_ITEM_ON_ENTITY: u32 = 3;
    pub const RELEASE_ITEM: u32 = 4;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UseItemTransactionData {
    pub action_type: u32,
    pub trigger_type: u32,
    pub block_position: BlockPos,
    pub block_face: i32,
    pub hot_bar_slot: i32,
    pub held_item: ItemInstance,
    pub position: Vec3,
    pub clicked_position: Vec3,
    /// Runtime ID of the block that was clicked.
    pub block_runtime_id: u32,
    pub client_prediction: u8,
}

impl Marshal for UseItemTransactionData {
    fn marshal(&self, w: &mut Writer) {
        w.varuint32(self.action_type);
        w.varuint32(self.trigger_type);
        w.ublock_pos(self.block_position);
        w.varint32(self.block_face);
        w.varint32(self.hot_bar_slot);
        w.item_instance(&self.held_item);
        w.vec3(self.position);
        w.vec3(self.clicked_position);
        w.varuint32(self.block_runtime_id);
        w.u8(self.client_prediction);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.action_type = r.varuint32()?;
        self.trigger_type = r.varuint32()?;
        self.block_position = r.ublock_pos()?;
        self.block_face = r.varint32()?;
        self.hot_bar_slot = r.varint32()?;
        self.held_item = r.item_instance()?;
        self.position = r.vec3()?;
        self.clicked_position = r.vec3()?;
        self.block_runtime_id = r.varuint32()?;
        self.client_prediction = r.u8()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UseItemOnEntityTransactionData {
    pub target_entity_runtime_id: u64,
    pub action_type: u32,
    pub hot_bar_slot: i32,
    pub held_item: ItemInstance,
    pub position: Vec3,
    pub clicked_position: Vec3,
}

impl Marshal for UseItemOnEntityTransactionData {
    fn marshal(&self, w: &mut Writer) {
        w.varuint64(self.target_entity_runtime_id);
        w.varuint32(self.action_type);
        w.varint32(self.hot_bar_slot);
        w.item_instance(&self.held_item);
        w.vec3(self.position);
        w.vec3(self.clicked_position);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.target_entity_runtime_id = r.varuint64()?;
        self.action_type = r.varuint32()?;
        self.hot_bar_slot = r.varint32()?;
        self.held_item = r.item_instance()?;
        self.position = r.vec3()?;
        self.clicked_position = r.vec3()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseItemTransactionData {
    pub action_type: u32,
    pub hot_bar_slot: i32,
    pub held_item: ItemInstance,
    pub head_position: Vec3,
}

impl Marshal for ReleaseItemTransactionData {
    fn marshal(&self, w: &mut Writer) {
        w.varuint32(self.action_type);
        w.varint32(self.hot_bar_slot);
        w.item_instance(&self.held_item);
        w.vec3(self.head_position);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.action_type = r.varuint32()?;
        self.hot_bar_slot = r.varint32()?;
        self.held_item = r.item_instance()?;
        self.head_position = r.vec3()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum TransactionData {
    #[default]
    Normal,
    Mismatch,
    UseItem(UseItemTransactionData),
    UseItemOnEntity(UseItemOnEntityTransactionData),
    ReleaseItem(ReleaseItemTransactionData),
}

impl TransactionData {
    pub fn transaction_type(&self) -> u32 {
        match self {
            TransactionData::Normal => transaction_type::NORMAL,
            TransactionData::Mismatch => transaction_type::MISMATCH,
            TransactionData::UseItem(_) => transaction_type::USE_ITEM,
            TransactionData::UseItemOnEntity(_) => transaction_type::USE_ITEM_ON_ENTITY,
            TransactionData::ReleaseItem(_) => transaction_type::RELEASE_ITEM,
        }
    }

    fn empty_for(kind: u32) -> CodecResult<Self> {
        Ok(match kind {
            transaction_type::NORMAL => TransactionData::Normal,
            transaction_type::MISMATCH => TransactionData::Mismatch,
            transaction_type::USE_ITEM => TransactionData::UseItem(Default::default()),
            transaction_type::USE_ITEM_ON_ENTITY => {
                TransactionData::UseItemOnEntity(Default::default())
            }
            transaction_type::RELEASE_ITEM => TransactionData::ReleaseItem(Default::default()),
            other => {
                return Err(CodecError::UnknownVariant {
                    kind: "transaction type",
                    value: other as i64,
                })
            }
        })
    }

    fn marshal_body(&self, w: &mut Writer) {
        match self {
            TransactionData::Normal | TransactionData::Mismatch => {}
            TransactionData::UseItem(data) => data.marshal(w),
            TransactionData::UseItemOnEntity(data) => data.marshal(w),
            TransactionData::ReleaseItem(data) => data.marshal(w),
        }
    }

    fn unmarshal_body(&mut self, r: &mut Reader) -> CodecResult<()> {
        match self {
            TransactionData::Normal | TransactionData::Mismatch => Ok(()),
            TransactionData::UseItem(data) => data.unmarshal(r),
            TransactionData::UseItemOnEntity(data) => data.unmarshal(r),
            TransactionData::ReleaseItem(data) => data.unmarshal(r),
        }
    }
}

/// Inventory Transaction (0x1e, serverbound).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryTransaction {
    pub legacy_request_id: i32,
    /// Only present when `legacy_request_id` is non-zero.
    pub legacy_set_item_slots: Vec<LegacySetItemSlot>,
    pub actions: Vec<InventoryAction>,
    pub transaction_data: TransactionData,
}

impl Marshal for InventoryTransaction {
    fn marshal(&self, w: &mut Writer) {
        w.varint32(self.legacy_request_id);
        if self.legacy_request_id != 0 {
            write_vec(w, &self.legacy_set_item_slots);
        }
        w.varuint32(self.transaction_data.transaction_type());
        write_vec(w, &self.actions);
        self.transaction_data.marshal_body(w);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.legacy_request_id = r.varint32()?;
        self.legacy_set_item_slots = if self.legacy_request_id != 0 {
            read_vec(r)?
        } else {
            Vec::new()
        };
        let kind = r.varuint32()?;
        self.actions = read_vec(r)?;
        self.transaction_data = TransactionData::empty_for(kind)?;
        self.transaction_data.unmarshal_body(r)
    }
}

/// Mob Equipment (0x1f, both directions).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MobEquipment {
    pub entity_runtime_id: u64,
    pub new_item: ItemInstance,
    pub inventory_slot: u8,
    pub hot_bar_slot: u8,
    pub window_id: u8,
}

impl Marshal for MobEquipment {
    fn marshal(&self, w: &mut Writer) {
        w.varuint64(self.entity_runtime_id);
        w.item_instance(&self.new_item);
        w.u8(self.inventory_slot);
        w.u8(self.hot_bar_slot);
        w.u8(self.window_id);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.entity_runtime_id = r.varuint64()?;
        self.new_item = r.item_instance()?;
        self.inventory_slot = r.u8()?;
        self.hot_bar_slot = r.u8()?;
        self.window_id = r.u8()?;
        Ok(())
    }
}

/// Mob Armour Equipment (0x20, both directions).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MobArmourEquipment {
    pub entity_runtime_id: u64,
    pub helmet: ItemInstance,
    pub chestplate: ItemInstance,
    pub leggings: ItemInstance,
    pub boots: ItemInstance,
}

impl MobArmourEquipment {
    pub fn pieces_mut(&mut self) -> [&mut ItemInstance; 4] {
        [
            &mut self.helmet,
            &mut self.chestplate,
            &mut self.leggings,
            &mut self.boots,
        ]
    }
}

impl Marshal for MobArmourEquipment {
    fn marshal(&self, w: &mut Writer) {
        w.varuint64(self.entity_runtime_id);
        w.item_instance(&self.helmet);
        w.item_instance(&self.chestplate);
        w.item_instance(&self.leggings);
        w.item_instance(&self.boots);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.entity_runtime_id = r.varuint64()?;
        self.helmet = r.item_instance()?;
        self.chestplate = r.item_instance()?;
        self.leggings = r.item_instance()?;
        self.boots = r.item_instance()?;
        Ok(())
    }
}

/// Container Close (0x2f, both directions).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerClose {
    pub window_id: u8,
    pub container_type: u8,
    pub server_side: bool,
}

impl Marshal for ContainerClose {
    fn marshal(&self, w: &mut Writer) {
        w.u8(self.window_id);
        w.u8(self.container_type);
        w.bool(self.server_side);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.window_id = r.u8()?;
        self.container_type = r.u8()?;
        self.server_side = r.bool()?;
        Ok(())
    }
}

/// Wrapper so item instances can go through `read_vec`/`write_vec`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slot(pub ItemInstance);

impl Marshal for Slot {
    fn marshal(&self, w: &mut Writer) {
        w.item_instance(&self.0);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.0 = r.item_instance()?;
        Ok(())
    }
}

/// Inventory Content (0x31, clientbound).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryContent {
    pub window_id: u32,
    pub content: Vec<Slot>,
}

impl Marshal for InventoryContent {
    fn marshal(&self, w: &mut Writer) {
        w.varuint32(self.window_id);
        write_vec(w, &self.content);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.window_id = r.varuint32()?;
        self.content = read_vec(r)?;
        Ok(())
    }
}

/// Inventory Slot (0x32, clientbound).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventorySlot {
    pub window_id: u32,
    pub slot: u32,
    pub new_item: ItemInstance,
}

impl Marshal for InventorySlot {
    fn marshal(&self, w: &mut Writer) {
        w.varuint32(self.window_id);
        w.varuint32(self.slot);
        w.item_instance(&self.new_item);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.window_id = r.varuint32()?;
        self.slot = r.varuint32()?;
        self.new_item = r.item_instance()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreativeItem {
    pub creative_item_network_id: u32,
    pub item: ItemStack,
}

impl Marshal for CreativeItem {
    fn marshal(&self, w: &mut Writer) {
        w.varuint32(self.creative_item_network_id);
        w.item(&self.item);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.creative_item_network_id = r.varuint32()?;
        self.item = r.item()?;
        Ok(())
    }
}

/// Creative Content (0x91, clientbound).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreativeContent {
    pub items: Vec<CreativeItem>,
}

impl Marshal for CreativeContent {
    fn marshal(&self, w: &mut Writer) {
        write_vec(w, &self.items);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.items = read_vec(r)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackRequestSlotInfo {
    pub container_id: u8,
    pub slot: u8,
    pub stack_network_id: i32,
}

impl Marshal for StackRequestSlotInfo {
    fn marshal(&self, w: &mut Writer) {
        w.u8(self.container_id);
        w.u8(self.slot);
        w.varint32(self.stack_network_id);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.container_id = r.u8()?;
        self.slot = r.u8()?;
        self.stack_network_id = r.varint32()?;
        Ok(())
    }
}

pub mod stack_action_type {
    pub const TAKE: u8 = 0;
    pub const PLACE: u8 = 1;
    pub const DROP: u8 = 3;
    pub const DESTROY: u8 = 4;
    pub const CONSUME: u8 = 5;
    pub const CREATE: u8 = 6;
    pub const CRAFT_RECIPE: u8 = 12;
    pub const CRAFT_CREATIVE: u8 = 14;
    pub const CRAFT_RESULTS_DEPRECATED: u8 = 19;
}

/// One action of an item stack request. Only the actions a proxy has to
/// look at are modelled; anything else fails to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackRequestAction {
    Take {
        count: u8,
        source: StackRequestSlotInfo,
        destination: StackRequestSlotInfo,
    },
    Place {
        count: u8,
        source: StackRequestSlotInfo,
        destination: StackRequestSlotInfo,
    },
    Drop {
        count: u8,
        source: StackRequestSlotInfo,
        randomly: bool,
    },
    Destroy {
        count: u8,
        source: StackRequestSlotInfo,
    },
    Consume {
        count: u8,
        source: StackRequestSlotInfo,
    },
    Create {
        results_slot: u8,
    },
    CraftRecipe {
        recipe_network_id: u32,
        number_of_crafts: u8,
    },
    CraftCreative {
        creative_item_network_id: u32,
        number_of_crafts: u8,
    },
    /// Carries full item stacks, so its items need remapping.
    CraftResultsDeprecated {
        result_items: Vec<CreativeItemStack>,
        times_crafted: u8,
    },
}

impl Default for StackRequestAction {
    fn default() -> Self {
        StackRequestAction::Create { results_slot: 0 }
    }
}

/// Wrapper so bare item stacks can go through `read_vec`/`write_vec`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreativeItemStack(pub ItemStack);

impl Marshal for CreativeItemStack {
    fn marshal(&self, w: &mut Writer) {
        w.item(&self.0);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.0 = r.item()?;
        Ok(())
    }
}

fn read_slot(r: &mut Reader) -> CodecResult<StackRequestSlotInfo> {
    let mut slot = StackRequestSlotInfo::default();
    slot.unmarshal(r)?;
    Ok(slot)
}

impl Marshal for StackRequestAction {
    fn marshal(&self, w: &mut Writer) {
        match self {
            StackRequestAction::Take {
                count,
                source,
                destination,
            } => {
                w.u8(stack_action_type::TAKE);
                w.u8(*count);
                source.marshal(w);
                destination.marshal(w);
            }
            StackRequestAction::Place {
                count,
                source,
                destination,
            } => {
                w.u8(stack_action_type::PLACE);
                w.u8(*count);
                source.marshal(w);
                destination.marshal(w);
            }
            StackRequestAction::Drop {
                count,
                source,
                randomly,
            } => {
                w.u8(stack_action_type::DROP);
                w.u8(*count);
                source.marshal(w);
                w.bool(*randomly);
            }
            StackRequestAction::Destroy { count, source } => {
                w.u8(stack_action_type::DESTROY);
                w.u8(*count);
                source.marshal(w);
            }
            StackRequestAction::Consume { count, source } => {
                w.u8(stack_action_type::CONSUME);
                w.u8(*count);
                source.marshal(w);
            }
            StackRequestAction::Create { results_slot } => {
                w.u8(stack_action_type::CREATE);
                w.u8(*results_slot);
            }
            StackRequestAction::CraftRecipe {
                recipe_network_id,
                number_of_crafts,
            } => {
                w.u8(stack_action_type::CRAFT_RECIPE);
                w.varuint32(*recipe_network_id);
                w.u8(*number_of_crafts);
            }
            StackRequestAction::CraftCreative {
                creative_item_network_id,
                number_of_crafts,
            } => {
                w.u8(stack_action_type::CRAFT_CREATIVE);
                w.varuint32(*creative_item_network_id);
                w.u8(*number_of_crafts);
            }
            StackRequestAction::CraftResultsDeprecated {
                result_items,
                times_crafted,
            } => {
                w.u8(stack_action_type::CRAFT_RESULTS_DEPRECATED);
                write_vec(w, result_items);
                w.u8(*times_crafted);
            }
        }
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        *self = match r.u8()? {
            stack_action_type::TAKE => StackRequestAction::Take {
                count: r.u8()?,
                source: read_slot(r)?,
                destination: read_slot(r)?,
            },
            stack_action_type::PLACE => StackRequestAction::Place {
                count: r.u8()?,
                source: read_slot(r)?,
                destination: read_slot(r)?,
            },
            stack_action_type::DROP => StackRequestAction::Drop {
                count: r.u8()?,
                source: read_slot(r)?,
                randomly: r.bool()?,
            },
            stack_action_type::DESTROY => StackRequestAction::Destroy {
                count: r.u8()?,
                source: read_slot(r)?,
            },
            stack_action_type::CONSUME => StackRequestAction::Consume {
                count: r.u8()?,
                source: read_slot(r)?,
            },
            stack_action_type::CREATE => StackRequestAction::Create {
                results_slot: r.u8()?,
            },
            stack_action_type::CRAFT_RECIPE => StackRequestAction::CraftRecipe {
                recipe_network_id: r.varuint32()?,
                number_of_crafts: r.u8()?,
            },
            stack_action_type::CRAFT_CREATIVE => StackRequestAction::CraftCreative {
                creative_item_network_id: r.varuint32()?,
                number_of_crafts: r.u8()?,
            },
            stack_action_type::CRAFT_RESULTS_DEPRECATED => {
                StackRequestAction::CraftResultsDeprecated {
                    result_items: read_vec(r)?,
                    times_crafted: r.u8()?,
                }
            }
            other => {
                return Err(CodecError::UnknownVariant {
                    kind: "stack request action",
                    value: other as i64,
                })
            }
        };
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterString(pub String);

impl Marshal for FilterString {
    fn marshal(&self, w: &mut Writer) {
        w.string(&self.0);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.0 = r.string()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackRequest {
    pub request_id: i32,
    pub actions: Vec<StackRequestAction>,
    pub filter_strings: Vec<FilterString>,
    pub filter_cause: i32,
}

impl Marshal for StackRequest {
    fn marshal(&self, w: &mut Writer) {
        w.varint32(self.request_id);
        write_vec(w, &self.actions);
        write_vec(w, &self.filter_strings);
        w.i32(self.filter_cause);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.request_id = r.varint32()?;
        self.actions = read_vec(r)?;
        self.filter_strings = read_vec(r)?;
        self.filter_cause = r.i32()?;
        Ok(())
    }
}

/// Item Stack Request (0x93, serverbound).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemStackRequest {
    pub requests: Vec<StackRequest>,
}

impl Marshal for ItemStackRequest {
    fn marshal(&self, w: &mut Writer) {
        write_vec(w, &self.requests);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.requests = read_vec(r)?;
        Ok(())
    }
}

/// Player Toggle Crafter Slot Request (0x132, serverbound).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerToggleCrafterSlotRequest {
    pub position: BlockPos,
    pub slot: u8,
    pub disabled: bool,
}

impl Marshal for PlayerToggleCrafterSlotRequest {
    fn marshal(&self, w: &mut Writer) {
        w.i32(self.position.x);
        w.i32(self.position.y);
        w.i32(self.position.z);
        w.u8(self.slot);
        w.bool(self.disabled);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        let x = r.i32()?;
        let y = r.i32()?;
        let z = r.i32()?;
        self.position = BlockPos::new(x, y, z);
        self.slot = r.u8()?;
        self.disabled = r.bool()?;
        Ok(())
    }
}

/// Set Player Inventory Options (0x133, both directions).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetPlayerInventoryOptions {
    pub left_inventory_tab: i32,
    pub right_inventory_tab: i32,
    pub filtering: bool,
    pub inventory_layout: i32,
    pub crafting_layout: i32,
}

impl Marshal for SetPlayerInventoryOptions {
    fn marshal(&self, w: &mut Writer) {
        w.varint32(self.left_inventory_tab);
        w.varint32(self.right_inventory_tab);
        w.bool(self.filtering);
        w.varint32(self.inventory_layout);
        w.varint32(self.crafting_layout);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.left_inventory_tab = r.varint32()?;
        self.right_inventory_tab = r.varint32()?;
        self.filtering = r.bool()?;
        self.inventory_layout = r.varint32()?;
        self.crafting_layout = r.varint32()?;
        Ok(())
    }
}
