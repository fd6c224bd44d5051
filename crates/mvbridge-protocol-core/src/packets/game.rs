use super::{read_vec, write_vec, Marshal};
use crate::codec::{CodecError, CodecResult, Reader, Writer};
use mvbridge_types::{BlockPos, ItemStack, Vec3};
use uuid::Uuid;

/// Text message categories. The category decides which fields follow.
pub mod text_type {
    pub const RAW: u8 = 0;
    pub const CHAT: u8 = 1;
    pub const TRANSLATION: u8 = 2;
    pub const POPUP: u8 = 3;
    pub const JUKEBOX_POPUP: u8 = 4;
    pub const TIP: u8 = 5;
    pub const SYSTEM: u8 = 6;
    pub const WHISPER: u8 = 7;
    pub const ANNOUNCEMENT: u8 = 8;
    pub const OBJECT_WHISPER: u8 = 9;
    pub const OBJECT: u8 = 10;
    pub const OBJECT_ANNOUNCEMENT: u8 = 11;
}

/// Chat, system and translated messages (0x09, both directions).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Text {
    pub text_type: u8,
    pub needs_translation: bool,
    pub source_name: String,
    pub message: String,
    pub parameters: Vec<String>,
    pub xuid: String,
    pub platform_chat_id: String,
    pub filtered_message: String,
}

/// Read the category-dependent part of a text message: source name, message
/// and translation parameters.
pub fn read_text_content(
    r: &mut Reader,
    text_type: u8,
) -> CodecResult<(String, String, Vec<String>)> {
    let mut source_name = String::new();
    let mut parameters = Vec::new();
    let message;
    match text_type {
        text_type::CHAT | text_type::WHISPER | text_type::ANNOUNCEMENT => {
            source_name = r.string()?;
            message = r.string()?;
        }
        text_type::RAW
        | text_type::TIP
        | text_type::SYSTEM
        | text_type::OBJECT
        | text_type::OBJECT_WHISPER
        | text_type::OBJECT_ANNOUNCEMENT => {
            message = r.string()?;
        }
        text_type::TRANSLATION | text_type::POPUP | text_type::JUKEBOX_POPUP => {
            message = r.string()?;
            let len = r.count()?;
            for _ in 0..len {
                parameters.push(r.string()?);
            }
        }
        other => {
            return Err(CodecError::UnknownVariant {
                kind: "text type",
                value: other as i64,
            })
        }
    }
    Ok((source_name, message, parameters))
}

pub fn write_text_content(
    w: &mut Writer,
    text_type: u8,
    source_name: &str,
    message: &str,
    parameters: &[String],
) {
    match text_type {
        text_type::CHAT | text_type::WHISPER | text_type::ANNOUNCEMENT => {
            w.string(source_name);
            w.string(message);
        }
        text_type::TRANSLATION | text_type::POPUP | text_type::JUKEBOX_POPUP => {
            w.string(message);
            w.count(parameters.len());
            for p in parameters {
                w.string(p);
            }
        }
        _ => w.string(message),
    }
}

impl Marshal for Text {
    fn marshal(&self, w: &mut Writer) {
        w.u8(self.text_type);
        w.bool(self.needs_translation);
        write_text_content(
            w,
            self.text_type,
            &self.source_name,
            &self.message,
            &self.parameters,
        );
        w.string(&self.xuid);
        w.string(&self.platform_chat_id);
        w.string(&self.filtered_message);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.text_type = r.u8()?;
        self.needs_translation = r.bool()?;
        let (source_name, message, parameters) = read_text_content(r, self.text_type)?;
        self.source_name = source_name;
        self.message = message;
        self.parameters = parameters;
        self.xuid = r.string()?;
        self.platform_chat_id = r.string()?;
        self.filtered_message = r.string()?;
        Ok(())
    }
}

/// One entry of the item table sent in StartGame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemEntry {
    pub name: String,
    pub runtime_id: i16,
    pub component_based: bool,
}

impl Marshal for ItemEntry {
    fn marshal(&self, w: &mut Writer) {
        w.string(&self.name);
        w.i16(self.runtime_id);
        w.bool(self.component_based);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.name = r.string()?;
        self.runtime_id = r.i16()?;
        self.component_based = r.bool()?;
        Ok(())
    }
}

/// Start Game (0x0b, clientbound).
///
/// Models the world settings that differ between supported versions and the
/// item table the translator rewrites; the level settings block is carried
/// as individual fields in wire order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StartGame {
    pub entity_unique_id: i64,
    pub entity_runtime_id: u64,
    pub player_game_mode: i32,
    pub player_position: Vec3,
    pub pitch: f32,
    pub yaw: f32,
    pub world_seed: u64,
    pub dimension: i32,
    pub generator: i32,
    pub world_game_mode: i32,
    pub hardcore: bool,
    pub difficulty: i32,
    pub world_spawn: BlockPos,
    pub level_id: String,
    pub world_name: String,
    pub base_game_version: String,
    pub time: i64,
    pub enchantment_seed: i32,
    pub items: Vec<ItemEntry>,
    pub multiplayer_correlation_id: String,
    pub server_authoritative_inventory: bool,
    pub game_version: String,
    pub server_block_state_checksum: u64,
    pub use_block_network_id_hashes: bool,
    pub server_authoritative_sound: bool,
}

impl StartGame {
    /// Write the packet body. Versions before 1.21.0 have no hardcore flag.
    pub fn write(&self, w: &mut Writer, with_hardcore: bool) {
        w.varint64(self.entity_unique_id);
        w.varuint64(self.entity_runtime_id);
        w.varint32(self.player_game_mode);
        w.vec3(self.player_position);
        w.f32(self.pitch);
        w.f32(self.yaw);
        w.u64(self.world_seed);
        w.varint32(self.dimension);
        w.varint32(self.generator);
        w.varint32(self.world_game_mode);
        if with_hardcore {
            w.bool(self.hardcore);
        }
        w.varint32(self.difficulty);
        w.ublock_pos(self.world_spawn);
        w.string(&self.level_id);
        w.string(&self.world_name);
        w.string(&self.base_game_version);
        w.i64(self.time);
        w.varint32(self.enchantment_seed);
        write_vec(w, &self.items);
        w.string(&self.multiplayer_correlation_id);
        w.bool(self.server_authoritative_inventory);
        w.string(&self.game_version);
        w.u64(self.server_block_state_checksum);
        w.bool(self.use_block_network_id_hashes);
        w.bool(self.server_authoritative_sound);
    }

    pub fn read(&mut self, r: &mut Reader, with_hardcore: bool) -> CodecResult<()> {
        self.entity_unique_id = r.varint64()?;
        self.entity_runtime_id = r.varuint64()?;
        self.player_game_mode = r.varint32()?;
        self.player_position = r.vec3()?;
        self.pitch = r.f32()?;
        self.yaw = r.f32()?;
        self.world_seed = r.u64()?;
        self.dimension = r.varint32()?;
        self.generator = r.varint32()?;
        self.world_game_mode = r.varint32()?;
        self.hardcore = with_hardcore && r.bool()?;
        self.difficulty = r.varint32()?;
        self.world_spawn = r.ublock_pos()?;
        self.level_id = r.string()?;
        self.world_name = r.string()?;
        self.base_game_version = r.string()?;
        self.time = r.i64()?;
        self.enchantment_seed = r.varint32()?;
        self.items = read_vec(r)?;
        self.multiplayer_correlation_id = r.string()?;
        self.server_authoritative_inventory = r.bool()?;
        self.game_version = r.string()?;
        self.server_block_state_checksum = r.u64()?;
        self.use_block_network_id_hashes = r.bool()?;
        self.server_authoritative_sound = r.bool()?;
        Ok(())
    }
}

impl Marshal for StartGame {
    fn marshal(&self, w: &mut Writer) {
        self.write(w, true);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.read(r, true)
    }
}

/// A recipe input. Descriptor type 1 is the only one carrying an item;
/// every other descriptor decodes as the invalid (empty) ingredient.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeIngredient {
    pub network_id: i16,
    pub metadata: i16,
    pub count: i32,
}

const DESCRIPTOR_INVALID: u8 = 0;
const DESCRIPTOR_DEFAULT: u8 = 1;

impl Marshal for RecipeIngredient {
    fn marshal(&self, w: &mut Writer) {
        if self.network_id == 0 && self.count == 0 {
            w.u8(DESCRIPTOR_INVALID);
            w.varint32(0);
            return;
        }
        w.u8(DESCRIPTOR_DEFAULT);
        w.i16(self.network_id);
        if self.network_id != 0 {
            w.i16(self.metadata);
        }
        w.varint32(self.count);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        match r.u8()? {
            DESCRIPTOR_INVALID => {
                self.network_id = 0;
                self.metadata = 0;
            }
            DESCRIPTOR_DEFAULT => {
                self.network_id = r.i16()?;
                self.metadata = if self.network_id != 0 { r.i16()? } else { 0 };
            }
            other => {
                return Err(CodecError::UnknownVariant {
                    kind: "item descriptor",
                    value: other as i64,
                })
            }
        }
        self.count = r.varint32()?;
        Ok(())
    }
}

/// Wrapper so bare item stacks can go through `read_vec`/`write_vec`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeOutput(pub ItemStack);

impl Marshal for RecipeOutput {
    fn marshal(&self, w: &mut Writer) {
        w.item(&self.0);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.0 = r.item()?;
        Ok(())
    }
}

/// Unlock contexts. Only `NONE` lists the ingredients that unlock the recipe.
pub mod unlock_context {
    pub const NONE: u8 = 0;
    pub const ALWAYS_UNLOCKED: u8 = 1;
    pub const PLAYER_IN_WATER: u8 = 2;
    pub const PLAYER_HAS_MANY_ITEMS: u8 = 3;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockRequirement {
    pub context: u8,
    pub ingredients: Vec<RecipeIngredient>,
}

impl Default for UnlockRequirement {
    fn default() -> Self {
        Self {
            context: unlock_context::ALWAYS_UNLOCKED,
            ingredients: Vec::new(),
        }
    }
}

impl Marshal for UnlockRequirement {
    fn marshal(&self, w: &mut Writer) {
        w.u8(self.context);
        if self.context == unlock_context::NONE {
            write_vec(w, &self.ingredients);
        }
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.context = r.u8()?;
        self.ingredients = if self.context == unlock_context::NONE {
            read_vec(r)?
        } else {
            Vec::new()
        };
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapelessRecipe {
    pub recipe_id: String,
    pub input: Vec<RecipeIngredient>,
    pub output: Vec<RecipeOutput>,
    pub uuid: Uuid,
    pub block: String,
    pub priority: i32,
    pub unlock_requirement: UnlockRequirement,
    pub recipe_network_id: u32,
}

impl ShapelessRecipe {
    /// Versions before 1.21.0 send no unlock requirement.
    pub fn write(&self, w: &mut Writer, with_unlock: bool) {
        w.string(&self.recipe_id);
        write_vec(w, &self.input);
        write_vec(w, &self.output);
        w.uuid(&self.uuid);
        w.string(&self.block);
        w.varint32(self.priority);
        if with_unlock {
            self.unlock_requirement.marshal(w);
        }
        w.varuint32(self.recipe_network_id);
    }

    pub fn read(&mut self, r: &mut Reader, with_unlock: bool) -> CodecResult<()> {
        self.recipe_id = r.string()?;
        self.input = read_vec(r)?;
        self.output = read_vec(r)?;
        self.uuid = r.uuid()?;
        self.block = r.string()?;
        self.priority = r.varint32()?;
        read_unlock(&mut self.unlock_requirement, r, with_unlock)?;
        self.recipe_network_id = r.varuint32()?;
        Ok(())
    }
}

fn read_unlock(req: &mut UnlockRequirement, r: &mut Reader, with_unlock: bool) -> CodecResult<()> {
    if with_unlock {
        req.unmarshal(r)
    } else {
        *req = UnlockRequirement::default();
        Ok(())
    }
}

impl Marshal for ShapelessRecipe {
    fn marshal(&self, w: &mut Writer) {
        self.write(w, true);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.read(r, true)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapedRecipe {
    pub recipe_id: String,
    pub width: i32,
    pub height: i32,
    /// Row-major, `width * height` entries.
    pub input: Vec<RecipeIngredient>,
    pub output: Vec<RecipeOutput>,
    pub uuid: Uuid,
    pub block: String,
    pub priority: i32,
    pub assume_symmetry: bool,
    pub unlock_requirement: UnlockRequirement,
    pub recipe_network_id: u32,
}

/// Read the `width * height` grid of a shaped recipe.
pub fn read_shaped_input(r: &mut Reader, width: i32, height: i32) -> CodecResult<Vec<RecipeIngredient>> {
    if width < 0 || height < 0 {
        return Err(CodecError::UnknownVariant {
            kind: "shaped recipe size",
            value: width.min(height) as i64,
        });
    }
    let cells = r.check_count(width as usize * height as usize)?;
    super::read_vec_of_len(r, cells)
}

impl ShapedRecipe {
    pub fn write(&self, w: &mut Writer, with_unlock: bool) {
        w.string(&self.recipe_id);
        w.varint32(self.width);
        w.varint32(self.height);
        for ingredient in &self.input {
            ingredient.marshal(w);
        }
        write_vec(w, &self.output);
        w.uuid(&self.uuid);
        w.string(&self.block);
        w.varint32(self.priority);
        w.bool(self.assume_symmetry);
        if with_unlock {
            self.unlock_requirement.marshal(w);
        }
        w.varuint32(self.recipe_network_id);
    }

    pub fn read(&mut self, r: &mut Reader, with_unlock: bool) -> CodecResult<()> {
        self.recipe_id = r.string()?;
        self.width = r.varint32()?;
        self.height = r.varint32()?;
        self.input = read_shaped_input(r, self.width, self.height)?;
        self.output = read_vec(r)?;
        self.uuid = r.uuid()?;
        self.block = r.string()?;
        self.priority = r.varint32()?;
        self.assume_symmetry = r.bool()?;
        read_unlock(&mut self.unlock_requirement, r, with_unlock)?;
        self.recipe_network_id = r.varuint32()?;
        Ok(())
    }
}

impl Marshal for ShapedRecipe {
    fn marshal(&self, w: &mut Writer) {
        self.write(w, true);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.read(r, true)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FurnaceRecipe {
    pub network_id: i32,
    pub output: ItemStack,
    pub block: String,
}

impl Marshal for FurnaceRecipe {
    fn marshal(&self, w: &mut Writer) {
        w.varint32(self.network_id);
        w.item(&self.output);
        w.string(&self.block);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.network_id = r.varint32()?;
        self.output = r.item()?;
        self.block = r.string()?;
        Ok(())
    }
}

pub mod recipe_type {
    pub const SHAPELESS: i32 = 0;
    pub const SHAPED: i32 = 1;
    pub const FURNACE: i32 = 2;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipe {
    Shapeless(ShapelessRecipe),
    Shaped(ShapedRecipe),
    Furnace(FurnaceRecipe),
}

impl Default for Recipe {
    fn default() -> Self {
        Recipe::Shapeless(ShapelessRecipe::default())
    }
}

impl Recipe {
    pub fn write(&self, w: &mut Writer, with_unlock: bool) {
        match self {
            Recipe::Shapeless(recipe) => {
                w.varint32(recipe_type::SHAPELESS);
                recipe.write(w, with_unlock);
            }
            Recipe::Shaped(recipe) => {
                w.varint32(recipe_type::SHAPED);
                recipe.write(w, with_unlock);
            }
            Recipe::Furnace(recipe) => {
                w.varint32(recipe_type::FURNACE);
                recipe.marshal(w);
            }
        }
    }

    pub fn read(&mut self, r: &mut Reader, with_unlock: bool) -> CodecResult<()> {
        *self = match r.varint32()? {
            recipe_type::SHAPELESS => {
                let mut recipe = ShapelessRecipe::default();
                recipe.read(r, with_unlock)?;
                Recipe::Shapeless(recipe)
            }
            recipe_type::SHAPED => {
                let mut recipe = ShapedRecipe::default();
                recipe.read(r, with_unlock)?;
                Recipe::Shaped(recipe)
            }
            recipe_type::FURNACE => {
                let mut recipe = FurnaceRecipe::default();
                recipe.unmarshal(r)?;
                Recipe::Furnace(recipe)
            }
            other => {
                return Err(CodecError::UnknownVariant {
                    kind: "recipe type",
                    value: other as i64,
                })
            }
        };
        Ok(())
    }
}

impl Marshal for Recipe {
    fn marshal(&self, w: &mut Writer) {
        self.write(w, true);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.read(r, true)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PotionRecipe {
    pub input_potion_id: i32,
    pub input_potion_metadata: i32,
    pub reagent_item_id: i32,
    pub reagent_item_metadata: i32,
    pub output_potion_id: i32,
    pub output_potion_metadata: i32,
}

impl Marshal for PotionRecipe {
    fn marshal(&self, w: &mut Writer) {
        w.varint32(self.input_potion_id);
        w.varint32(self.input_potion_metadata);
        w.varint32(self.reagent_item_id);
        w.varint32(self.reagent_item_metadata);
        w.varint32(self.output_potion_id);
        w.varint32(self.output_potion_metadata);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.input_potion_id = r.varint32()?;
        self.input_potion_metadata = r.varint32()?;
        self.reagent_item_id = r.varint32()?;
        self.reagent_item_metadata = r.varint32()?;
        self.output_potion_id = r.varint32()?;
        self.output_potion_metadata = r.varint32()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PotionContainerChangeRecipe {
    pub input_item_id: i32,
    pub reagent_item_id: i32,
    pub output_item_id: i32,
}

impl Marshal for PotionContainerChangeRecipe {
    fn marshal(&self, w: &mut Writer) {
        w.varint32(self.input_item_id);
        w.varint32(self.reagent_item_id);
        w.varint32(self.output_item_id);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.input_item_id = r.varint32()?;
        self.reagent_item_id = r.varint32()?;
        self.output_item_id = r.varint32()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialReducerOutput {
    pub network_id: i32,
    pub count: i32,
}

impl Marshal for MaterialReducerOutput {
    fn marshal(&self, w: &mut Writer) {
        w.varint32(self.network_id);
        w.varint32(self.count);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.network_id = r.varint32()?;
        self.count = r.varint32()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialReducer {
    /// Input item ID in the upper 16 bits, metadata in the lower 16.
    pub input: i32,
    pub outputs: Vec<MaterialReducerOutput>,
}

impl Marshal for MaterialReducer {
    fn marshal(&self, w: &mut Writer) {
        w.varint32(self.input);
        write_vec(w, &self.outputs);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.input = r.varint32()?;
        self.outputs = read_vec(r)?;
        Ok(())
    }
}

/// Crafting Data (0x34, clientbound).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CraftingData {
    pub recipes: Vec<Recipe>,
    pub potion_recipes: Vec<PotionRecipe>,
    pub potion_container_change_recipes: Vec<PotionContainerChangeRecipe>,
    pub material_reducers: Vec<MaterialReducer>,
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

/// Flags carried in the high bits of a command parameter type.
pub mod arg_flag {
    pub const VALID: u32 = 0x100000;
    pub const ENUM: u32 = 0x200000;
    pub const POSTFIX: u32 = 0x1000000;
    pub const SOFT_ENUM: u32 = 0x4000000;
}

/// Basic command argument types, as numbered by the latest version.
pub mod arg_type {
    pub const INT: u32 = 1;
    pub const FLOAT: u32 = 3;
    pub const VALUE: u32 = 4;
    pub const WILDCARD_INT: u32 = 5;
    pub const OPERATOR: u32 = 6;
    pub const COMPARE_OPERATOR: u32 = 7;
    pub const TARGET: u32 = 8;
    pub const WILDCARD_TARGET: u32 = 10;
    pub const FILEPATH: u32 = 17;
    pub const FULL_INTEGER_RANGE: u32 = 23;
    pub const EQUIPMENT_SLOTS: u32 = 47;
    pub const STRING: u32 = 56;
    pub const BLOCK_POSITION: u32 = 64;
    pub const POSITION: u32 = 65;
    pub const MESSAGE: u32 = 68;
    pub const RAW_TEXT: u32 = 70;
    pub const JSON: u32 = 74;
    pub const BLOCK_STATES: u32 = 84;
    pub const COMMAND: u32 = 87;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandParameter {
    pub name: String,
    /// Argument type in the low 16 bits, `arg_flag` bits above.
    pub param_type: u32,
    pub optional: bool,
    pub options: u8,
}

impl CommandParameter {
    /// The basic argument type, or `None` for enum and postfix parameters.
    pub fn basic_type(&self) -> Option<u32> {
        let t = self.param_type;
        if t & arg_flag::VALID == 0 || t & (arg_flag::ENUM | arg_flag::SOFT_ENUM | arg_flag::POSTFIX) != 0 {
            return None;
        }
        Some(t & 0xffff)
    }

    pub fn set_basic_type(&mut self, basic: u32) {
        self.param_type = (self.param_type & !0xffff) | (basic & 0xffff);
    }
}

impl Marshal for CommandParameter {
    fn marshal(&self, w: &mut Writer) {
        w.string(&self.name);
        w.u32(self.param_type);
        w.bool(self.optional);
        w.u8(self.options);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.name = r.string()?;
        self.param_type = r.u32()?;
        self.optional = r.bool()?;
        self.options = r.u8()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOverload {
    pub chaining: bool,
    pub parameters: Vec<CommandParameter>,
}

impl Marshal for CommandOverload {
    fn marshal(&self, w: &mut Writer) {
        w.bool(self.chaining);
        write_vec(w, &self.parameters);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.chaining = r.bool()?;
        self.parameters = read_vec(r)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub description: String,
    pub flags: u16,
    pub permission_level: u8,
    pub aliases_offset: u32,
    pub overloads: Vec<CommandOverload>,
}

impl Marshal for Command {
    fn marshal(&self, w: &mut Writer) {
        w.string(&self.name);
        w.string(&self.description);
        w.u16(self.flags);
        w.u8(self.permission_level);
        w.u32(self.aliases_offset);
        write_vec(w, &self.overloads);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.name = r.string()?;
        self.description = r.string()?;
        self.flags = r.u16()?;
        self.permission_level = r.u8()?;
        self.aliases_offset = r.u32()?;
        self.overloads = read_vec(r)?;
        Ok(())
    }
}

/// Wrapper so plain strings can go through `read_vec`/`write_vec`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumValue(pub String);

impl Marshal for EnumValue {
    fn marshal(&self, w: &mut Writer) {
        w.string(&self.0);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.0 = r.string()?;
        Ok(())
    }
}

/// Available Commands (0x4c, clientbound). Enum and constraint tables that
/// follow the command list are kept raw in `trailing`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailableCommands {
    pub enum_values: Vec<EnumValue>,
    pub commands: Vec<Command>,
    pub trailing: Vec<u8>,
}

impl Marshal for AvailableCommands {
    fn marshal(&self, w: &mut Writer) {
        write_vec(w, &self.enum_values);
        write_vec(w, &self.commands);
        w.bytes(&self.trailing);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.enum_values = read_vec(r)?;
        self.commands = read_vec(r)?;
        self.trailing = r.rest();
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackInfo {
    pub uuid: String,
    pub version: String,
    pub size: u64,
    pub content_key: String,
    pub sub_pack_name: String,
    pub content_identity: String,
    pub has_scripts: bool,
    pub rtx_enabled: bool,
}

impl Marshal for PackInfo {
    fn marshal(&self, w: &mut Writer) {
        w.string(&self.uuid);
        w.string(&self.version);
        w.u64(self.size);
        w.string(&self.content_key);
        w.string(&self.sub_pack_name);
        w.string(&self.content_identity);
        w.bool(self.has_scripts);
        w.bool(self.rtx_enabled);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.uuid = r.string()?;
        self.version = r.string()?;
        self.size = r.u64()?;
        self.content_key = r.string()?;
        self.sub_pack_name = r.string()?;
        self.content_identity = r.string()?;
        self.has_scripts = r.bool()?;
        self.rtx_enabled = r.bool()?;
        Ok(())
    }
}

/// Pack lists in ResourcePacksInfo use a little-endian u16 count.
pub fn read_pack_list(r: &mut Reader) -> CodecResult<Vec<PackInfo>> {
    let len = r.u16()? as usize;
    super::read_vec_of_len(r, len)
}

pub fn write_pack_list(w: &mut Writer, packs: &[PackInfo]) {
    w.u16(packs.len() as u16);
    for pack in packs {
        pack.marshal(w);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackUrl {
    pub uuid_version: String,
    pub url: String,
}

impl Marshal for PackUrl {
    fn marshal(&self, w: &mut Writer) {
        w.string(&self.uuid_version);
        w.string(&self.url);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.uuid_version = r.string()?;
        self.url = r.string()?;
        Ok(())
    }
}

/// Resource Packs Info (0x06, clientbound).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourcePacksInfo {
    pub texture_pack_required: bool,
    pub has_addons: bool,
    pub has_scripts: bool,
    pub forcing_server_packs: bool,
    pub behaviour_packs: Vec<PackInfo>,
    pub texture_packs: Vec<PackInfo>,
    pub pack_urls: Vec<PackUrl>,
}

impl Marshal for ResourcePacksInfo {
    fn marshal(&self, w: &mut Writer) {
        w.bool(self.texture_pack_required);
        w.bool(self.has_addons);
        w.bool(self.has_scripts);
        w.bool(self.forcing_server_packs);
        write_pack_list(w, &self.behaviour_packs);
        write_pack_list(w, &self.texture_packs);
        write_vec(w, &self.pack_urls);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.texture_pack_required = r.bool()?;
        self.has_addons = r.bool()?;
        self.has_scripts = r.bool()?;
        self.forcing_server_packs = r.bool()?;
        self.behaviour_packs = read_pack_list(r)?;
        self.texture_packs = read_pack_list(r)?;
        self.pack_urls = read_vec(r)?;
        Ok(())
    }
}

pub mod store_offer_type {
    pub const MARKETPLACE: u8 = 0;
    pub const DRESSING_ROOM: u8 = 1;
    pub const SERVER_PAGE: u8 = 2;
}

/// Show Store Offer (0x5b, clientbound).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowStoreOffer {
    pub offer_id: String,
    pub offer_type: u8,
}

impl Marshal for ShowStoreOffer {
    fn marshal(&self, w: &mut Writer) {
        w.string(&self.offer_id);
        w.u8(self.offer_type);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.offer_id = r.string()?;
        self.offer_type = r.u8()?;
        Ok(())
    }
}

/// Code Builder Source (0xb2, serverbound).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBuilderSource {
    pub operation: u8,
    pub category: u8,
    pub code_status: u8,
}

impl Marshal for CodeBuilderSource {
    fn marshal(&self, w: &mut Writer) {
        w.u8(self.operation);
        w.u8(self.category);
        w.u8(self.code_status);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.operation = r.u8()?;
        self.category = r.u8()?;
        self.code_status = r.u8()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packets::roundtrip;

    #[test]
    fn test_text_chat_layout() {
        let pk = Text {
            text_type: text_type::CHAT,
            source_name: "Steve".into(),
            message: "hi".into(),
            filtered_message: "hi".into(),
            ..Default::default()
        };
        let mut w = Writer::new(0);
        pk.marshal(&mut w);
        let bytes = w.into_bytes();
        assert_eq!(bytes[0], text_type::CHAT);
        assert_eq!(bytes[2], 5);
        assert_eq!(&bytes[3..8], b"Steve");
        assert_eq!(roundtrip(&pk), pk);
    }

    #[test]
    fn test_text_translation_params() {
        let pk = Text {
            text_type: text_type::TRANSLATION,
            needs_translation: true,
            message: "%death.attack.fall".into(),
            parameters: vec!["Alex".into()],
            ..Default::default()
        };
        assert_eq!(roundtrip(&pk), pk);
    }

    #[test]
    fn test_unknown_text_type() {
        let mut r = Reader::new(vec![42u8, 0], 0, true);
        let err = Text::default().unmarshal(&mut r).unwrap_err();
        assert!(matches!(err, CodecError::UnknownVariant { value: 42, .. }));
    }

    #[test]
    fn test_ingredient_omits_meta_for_air() {
        let mut w = Writer::new(0);
        RecipeIngredient {
            network_id: 0,
            metadata: 0,
            count: 1,
        }
        .marshal(&mut w);
        assert_eq!(&w.into_bytes()[..], &[1, 0, 0, 2]);
    }

    #[test]
    fn test_shaped_recipe() {
        let ingredient = RecipeIngredient {
            network_id: 5,
            metadata: 0,
            count: 1,
        };
        let pk = CraftingData {
            recipes: vec![Recipe::Shaped(ShapedRecipe {
                recipe_id: "minecraft:stick".into(),
                width: 1,
                height: 2,
                input: vec![ingredient.clone(), ingredient],
                output: vec![RecipeOutput(ItemStack::new(320, 4))],
                block: "crafting_table".into(),
                unlock_requirement: UnlockRequirement {
                    context: unlock_context::NONE,
                    ingredients: vec![RecipeIngredient {
                        network_id: 5,
                        metadata: 0,
                        count: 1,
                    }],
                },
                recipe_network_id: 7,
                ..Default::default()
            })],
            clear_recipes: true,
            ..Default::default()
        };
        assert_eq!(roundtrip(&pk), pk);
    }

    #[test]
    fn test_command_basic_type() {
        let mut param = CommandParameter {
            param_type: arg_flag::VALID | arg_type::STRING,
            ..Default::default()
        };
        assert_eq!(param.basic_type(), Some(arg_type::STRING));
        param.set_basic_type(44);
        assert_eq!(param.param_type, arg_flag::VALID | 44);

        let enum_param = CommandParameter {
            param_type: arg_flag::VALID | arg_flag::ENUM | 3,
            ..Default::default()
        };
        assert_eq!(enum_param.basic_type(), None);
    }

    #[test]
    fn test_start_game_items() {
        let pk = StartGame {
            hardcore: true,
            base_game_version: "1.17.40".into(),
            items: vec![ItemEntry {
                name: "minecraft:stone".into(),
                runtime_id: 1,
                component_based: false,
            }],
            ..Default::default()
        };
        assert_eq!(roundtrip(&pk), pk);
    }
}
