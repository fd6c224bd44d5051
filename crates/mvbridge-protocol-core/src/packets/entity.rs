use super::{read_vec, read_vec_of_len, write_vec, InventoryAction, LegacySetItemSlot, Marshal};
use super::{StackRequest, UseItemTransactionData};
use crate::codec::{CodecError, CodecResult, Reader, Writer};
use mvbridge_types::{BlockPos, ItemInstance, Vec2, Vec3};
use uuid::Uuid;

/// Add Player (0x0c, clientbound). Entity metadata, abilities and links are
/// carried raw in `rest`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddPlayer {
    pub uuid: Uuid,
    pub username: String,
    pub entity_runtime_id: u64,
    pub platform_chat_id: String,
    pub position: Vec3,
    pub velocity: Vec3,
    pub pitch: f32,
    pub yaw: f32,
    pub head_yaw: f32,
    pub held_item: ItemInstance,
    pub game_type: i32,
    pub rest: Vec<u8>,
}

impl Marshal for AddPlayer {
    fn marshal(&self, w: &mut Writer) {
        w.uuid(&self.uuid);
        w.string(&self.username);
        w.varuint64(self.entity_runtime_id);
        w.string(&self.platform_chat_id);
        w.vec3(self.position);
        w.vec3(self.velocity);
        w.f32(self.pitch);
        w.f32(self.yaw);
        w.f32(self.head_yaw);
        w.item_instance(&self.held_item);
        w.varint32(self.game_type);
        w.bytes(&self.rest);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.uuid = r.uuid()?;
        self.username = r.string()?;
        self.entity_runtime_id = r.varuint64()?;
        self.platform_chat_id = r.string()?;
        self.position = r.vec3()?;
        self.velocity = r.vec3()?;
        self.pitch = r.f32()?;
        self.yaw = r.f32()?;
        self.head_yaw = r.f32()?;
        self.held_item = r.item_instance()?;
        self.game_type = r.varint32()?;
        self.rest = r.rest();
        Ok(())
    }
}

/// Add Item Actor (0x0f, clientbound).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddItemActor {
    pub entity_unique_id: i64,
    pub entity_runtime_id: u64,
    pub item: ItemInstance,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Entity metadata and the from-fishing flag.
    pub rest: Vec<u8>,
}

impl Marshal for AddItemActor {
    fn marshal(&self, w: &mut Writer) {
        w.varint64(self.entity_unique_id);
        w.varuint64(self.entity_runtime_id);
        w.item_instance(&self.item);
        w.vec3(self.position);
        w.vec3(self.velocity);
        w.bytes(&self.rest);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.entity_unique_id = r.varint64()?;
        self.entity_runtime_id = r.varuint64()?;
        self.item = r.item_instance()?;
        self.position = r.vec3()?;
        self.velocity = r.vec3()?;
        self.rest = r.rest();
        Ok(())
    }
}

/// Mob Effect (0x1c, clientbound).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MobEffect {
    pub entity_runtime_id: u64,
    pub operation: u8,
    pub effect_type: i32,
    pub amplifier: i32,
    pub particles: bool,
    pub duration: i32,
    pub tick: u64,
}

impl Marshal for MobEffect {
    fn marshal(&self, w: &mut Writer) {
        w.varuint64(self.entity_runtime_id);
        w.u8(self.operation);
        w.varint32(self.effect_type);
        w.varint32(self.amplifier);
        w.bool(self.particles);
        w.varint32(self.duration);
        w.varuint64(self.tick);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.entity_runtime_id = r.varuint64()?;
        self.operation = r.u8()?;
        self.effect_type = r.varint32()?;
        self.amplifier = r.varint32()?;
        self.particles = r.bool()?;
        self.duration = r.varint32()?;
        self.tick = r.varuint64()?;
        Ok(())
    }
}

/// Set Actor Motion (0x28, clientbound).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetActorMotion {
    pub entity_runtime_id: u64,
    pub velocity: Vec3,
    pub tick: u64,
}

impl Marshal for SetActorMotion {
    fn marshal(&self, w: &mut Writer) {
        w.varuint64(self.entity_runtime_id);
        w.vec3(self.velocity);
        w.varuint64(self.tick);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.entity_runtime_id = r.varuint64()?;
        self.velocity = r.vec3()?;
        self.tick = r.varuint64()?;
        Ok(())
    }
}

/// `PlayerAuthInput` flag bits that gate optional sections of the packet.
pub mod input_flag {
    pub const PERFORM_ITEM_INTERACTION: u64 = 1 << 34;
    pub const PERFORM_BLOCK_ACTIONS: u64 = 1 << 35;
    pub const PERFORM_ITEM_STACK_REQUEST: u64 = 1 << 36;
    pub const CLIENT_PREDICTED_VEHICLE: u64 = 1 << 45;
}

pub mod play_mode {
    /// VR play; the only mode that sends a gaze direction.
    pub const REALITY: u32 = 5;
}

/// Block actions that carry a position and face.
pub mod player_action {
    pub const START_BREAK: i32 = 0;
    pub const ABORT_BREAK: i32 = 1;
    pub const CRACK_BREAK: i32 = 18;
    pub const PREDICT_DESTROY_BLOCK: i32 = 26;
    pub const CONTINUE_DESTROY_BLOCK: i32 = 27;
}

/// The item use a client predicts within a PlayerAuthInput tick. Same body
/// as a use-item transaction, minus the transaction type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemInteractionData {
    pub legacy_request_id: i32,
    /// Only present when `legacy_request_id` is non-zero.
    pub legacy_set_item_slots: Vec<LegacySetItemSlot>,
    pub actions: Vec<InventoryAction>,
    pub data: UseItemTransactionData,
}

impl Marshal for ItemInteractionData {
    fn marshal(&self, w: &mut Writer) {
        w.varint32(self.legacy_request_id);
        if self.legacy_request_id != 0 {
            write_vec(w, &self.legacy_set_item_slots);
        }
        write_vec(w, &self.actions);
        self.data.marshal(w);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.legacy_request_id = r.varint32()?;
        self.legacy_set_item_slots = if self.legacy_request_id != 0 {
            read_vec(r)?
        } else {
            Vec::new()
        };
        self.actions = read_vec(r)?;
        self.data.unmarshal(r)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerBlockAction {
    pub action: i32,
    pub position: BlockPos,
    pub face: i32,
}

impl PlayerBlockAction {
    fn has_position(&self) -> bool {
        matches!(
            self.action,
            player_action::START_BREAK
                | player_action::ABORT_BREAK
                | player_action::CRACK_BREAK
                | player_action::PREDICT_DESTROY_BLOCK
                | player_action::CONTINUE_DESTROY_BLOCK
        )
    }
}

impl Marshal for PlayerBlockAction {
    fn marshal(&self, w: &mut Writer) {
        w.varint32(self.action);
        if self.has_position() {
            w.block_pos(self.position);
            w.varint32(self.face);
        }
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        self.action = r.varint32()?;
        if self.has_position() {
            self.position = r.block_pos()?;
            self.face = r.varint32()?;
        }
        Ok(())
    }
}

/// The flag-gated sections between `delta` and the vehicle data of a
/// PlayerAuthInput. Each is on the wire only when its `input_flag` bit is
/// set, with no length prefix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthInputActions {
    pub item_interaction: ItemInteractionData,
    pub item_stack_request: StackRequest,
    pub block_actions: Vec<PlayerBlockAction>,
}

impl AuthInputActions {
    pub fn write(&self, w: &mut Writer, input_data: u64) {
        if input_data & input_flag::PERFORM_ITEM_INTERACTION != 0 {
            self.item_interaction.marshal(w);
        }
        if input_data & input_flag::PERFORM_ITEM_STACK_REQUEST != 0 {
            self.item_stack_request.marshal(w);
        }
        if input_data & input_flag::PERFORM_BLOCK_ACTIONS != 0 {
            // signed VarInt count, unlike other lists
            w.varint32(self.block_actions.len() as i32);
            for action in &self.block_actions {
                action.marshal(w);
            }
        }
    }

    pub fn read(r: &mut Reader, input_data: u64) -> CodecResult<Self> {
        let mut out = Self::default();
        if input_data & input_flag::PERFORM_ITEM_INTERACTION != 0 {
            out.item_interaction.unmarshal(r)?;
        }
        if input_data & input_flag::PERFORM_ITEM_STACK_REQUEST != 0 {
            out.item_stack_request.unmarshal(r)?;
        }
        if input_data & input_flag::PERFORM_BLOCK_ACTIONS != 0 {
            let len = r.varint32()?;
            let len = usize::try_from(len).map_err(|_| CodecError::UnknownVariant {
                kind: "block action count",
                value: i64::from(len),
            })?;
            let len = r.check_count(len)?;
            out.block_actions = read_vec_of_len(r, len)?;
        }
        Ok(out)
    }
}

/// Player Auth Input (0x90, serverbound).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerAuthInput {
    pub pitch: f32,
    pub yaw: f32,
    pub position: Vec3,
    pub move_vector: Vec2,
    pub head_yaw: f32,
    pub input_data: u64,
    pub input_mode: u32,
    pub play_mode: u32,
    pub interaction_model: u32,
    /// Only sent in `play_mode::REALITY`.
    pub gaze_direction: Vec3,
    pub tick: u64,
    pub delta: Vec3,
    pub actions: AuthInputActions,
    /// Only sent with `input_flag::CLIENT_PREDICTED_VEHICLE`, as is
    /// `client_predicted_vehicle`.
    pub vehicle_rotation: Vec2,
    pub client_predicted_vehicle: i64,
    pub analogue_move_vector: Vec2,
}

impl PlayerAuthInput {
    pub fn predicts_vehicle(&self) -> bool {
        self.input_data & input_flag::CLIENT_PREDICTED_VEHICLE != 0
    }
}

/// Everything before the vehicle section, which every PlayerAuthInput
/// layout shares.
pub fn write_auth_input_head(w: &mut Writer, pk: &PlayerAuthInput) {
    w.f32(pk.pitch);
    w.f32(pk.yaw);
    w.vec3(pk.position);
    w.vec2(pk.move_vector);
    w.f32(pk.head_yaw);
    w.varuint64(pk.input_data);
    w.varuint32(pk.input_mode);
    w.varuint32(pk.play_mode);
    w.varuint32(pk.interaction_model);
    if pk.play_mode == play_mode::REALITY {
        w.vec3(pk.gaze_direction);
    }
    w.varuint64(pk.tick);
    w.vec3(pk.delta);
    pk.actions.write(w, pk.input_data);
}

pub fn read_auth_input_head(r: &mut Reader, pk: &mut PlayerAuthInput) -> CodecResult<()> {
    pk.pitch = r.f32()?;
    pk.yaw = r.f32()?;
    pk.position = r.vec3()?;
    pk.move_vector = r.vec2()?;
    pk.head_yaw = r.f32()?;
    pk.input_data = r.varuint64()?;
    pk.input_mode = r.varuint32()?;
    pk.play_mode = r.varuint32()?;
    pk.interaction_model = r.varuint32()?;
    if pk.play_mode == play_mode::REALITY {
        pk.gaze_direction = r.vec3()?;
    }
    pk.tick = r.varuint64()?;
    pk.delta = r.vec3()?;
    pk.actions = AuthInputActions::read(r, pk.input_data)?;
    Ok(())
}

impl Marshal for PlayerAuthInput {
    fn marshal(&self, w: &mut Writer) {
        write_auth_input_head(w, self);
        if self.predicts_vehicle() {
            w.vec2(self.vehicle_rotation);
            w.varint64(self.client_predicted_vehicle);
        }
        w.vec2(self.analogue_move_vector);
    }

    fn unmarshal(&mut self, r: &mut Reader) -> CodecResult<()> {
        read_auth_input_head(r, self)?;
        if self.predicts_vehicle() {
            self.vehicle_rotation = r.vec2()?;
            self.client_predicted_vehicle = r.varint64()?;
        }
        self.analogue_move_vector = r.vec2()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packets::roundtrip;
    use mvbridge_types::ItemStack;

    #[test]
    fn test_add_player_keeps_trailing_bytes() {
        let pk = AddPlayer {
            uuid: Uuid::new_v4(),
            username: "Steve".into(),
            entity_runtime_id: 1,
            held_item: ItemInstance::new(ItemStack::new(3, 1)),
            rest: vec![1, 2, 3, 4],
            ..Default::default()
        };
        assert_eq!(roundtrip(&pk), pk);
    }

    fn decode_auth(bytes: &[u8]) -> PlayerAuthInput {
        let mut r = Reader::new(bytes.to_vec(), 0, true);
        let mut pk = PlayerAuthInput::default();
        pk.unmarshal(&mut r).unwrap();
        assert_eq!(r.remaining(), 0);
        pk
    }

    fn encode(pk: &impl Marshal) -> Vec<u8> {
        let mut w = Writer::new(0);
        pk.marshal(&mut w);
        w.into_bytes().to_vec()
    }

    /// Rotation, position and move vectors all zero, followed by `input_data`.
    fn auth_head(input_data: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0u8; 32];
        bytes.extend_from_slice(input_data);
        // input mode touch, normal play, crosshair, tick 5
        bytes.extend_from_slice(&[0x01, 0x00, 0x00, 0x05]);
        bytes.extend_from_slice(&[0u8; 12]);
        bytes
    }

    const ANALOGUE_UP: [u8; 8] = [0, 0, 0, 0, 0, 0, 0x80, 0x3f];

    #[test]
    fn test_auth_input_without_sections() {
        let mut bytes = auth_head(&[0x00]);
        bytes.extend_from_slice(&ANALOGUE_UP);
        let pk = decode_auth(&bytes);
        assert_eq!(pk.input_mode, 1);
        assert_eq!(pk.tick, 5);
        assert_eq!(pk.analogue_move_vector, Vec2::new(0.0, 1.0));
        assert_eq!(pk.actions, AuthInputActions::default());
        assert_eq!(encode(&pk), bytes);
    }

    #[test]
    fn test_auth_input_vehicle_rotation() {
        let mut bytes = auth_head(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x08]);
        bytes.extend_from_slice(&[0, 0, 0x80, 0x3f, 0, 0, 0, 0x40, 0x0e]);
        bytes.extend_from_slice(&ANALOGUE_UP);
        let pk = decode_auth(&bytes);
        assert!(pk.predicts_vehicle());
        assert_eq!(pk.vehicle_rotation, Vec2::new(1.0, 2.0));
        assert_eq!(pk.client_predicted_vehicle, 7);
        assert_eq!(pk.analogue_move_vector, Vec2::new(0.0, 1.0));
        assert_eq!(encode(&pk), bytes);
    }

    #[test]
    fn test_auth_input_vehicle_fields_need_flag() {
        let pk = PlayerAuthInput {
            vehicle_rotation: Vec2::new(3.0, 4.0),
            client_predicted_vehicle: 12,
            ..Default::default()
        };
        let mut expected = auth_head(&[0x00]);
        expected[33] = 0x00;
        expected[36] = 0x00;
        expected.extend_from_slice(&[0u8; 8]);
        assert_eq!(encode(&pk), expected);
    }

    #[test]
    fn test_auth_input_block_actions() {
        let mut bytes = auth_head(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]);
        // two actions: start break at (1, 64, -1) face 1, then stop break
        bytes.extend_from_slice(&[0x04, 0x00, 0x02, 0x80, 0x01, 0x01, 0x02, 0x04]);
        bytes.extend_from_slice(&ANALOGUE_UP);
        let pk = decode_auth(&bytes);
        assert_eq!(
            pk.actions.block_actions,
            vec![
                PlayerBlockAction {
                    action: player_action::START_BREAK,
                    position: BlockPos::new(1, 64, -1),
                    face: 1,
                },
                PlayerBlockAction {
                    action: 2,
                    ..Default::default()
                },
            ]
        );
        assert_eq!(encode(&pk), bytes);
    }

    #[test]
    fn test_auth_input_negative_block_action_count() {
        let mut bytes = auth_head(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]);
        bytes.push(0x01);
        let mut r = Reader::new(bytes, 0, true);
        let mut pk = PlayerAuthInput::default();
        assert!(matches!(
            pk.unmarshal(&mut r),
            Err(CodecError::UnknownVariant { value: -1, .. })
        ));
    }

    #[test]
    fn test_auth_input_item_interaction_and_stack_request() {
        let flags = input_flag::PERFORM_ITEM_INTERACTION | input_flag::PERFORM_ITEM_STACK_REQUEST;
        let mut w = Writer::new(0);
        w.bytes(&[0u8; 32]);
        w.varuint64(flags);
        w.bytes(&[0x01, 0x00, 0x00, 0x05]);
        w.bytes(&[0u8; 12]);
        // item interaction
        w.varint32(-2);
        w.count(1);
        w.u8(28);
        w.byte_slice(&[0, 1]);
        w.count(0);
        w.varuint32(0);
        w.varuint32(1);
        w.ublock_pos(BlockPos::new(4, 70, -8));
        w.varint32(1);
        w.varint32(3);
        w.item_instance(&ItemInstance::default());
        w.vec3(Vec3::new(4.5, 71.0, -7.5));
        w.vec3(Vec3::new(0.5, 1.0, 0.5));
        w.varuint32(42);
        w.u8(1);
        // stack request with no actions
        w.varint32(-5);
        w.count(0);
        w.count(0);
        w.i32(0);
        w.bytes(&ANALOGUE_UP);
        let bytes = w.into_bytes().to_vec();

        let pk = decode_auth(&bytes);
        let interaction = &pk.actions.item_interaction;
        assert_eq!(interaction.legacy_request_id, -2);
        assert_eq!(interaction.legacy_set_item_slots[0].container_id, 28);
        assert_eq!(interaction.data.block_position, BlockPos::new(4, 70, -8));
        assert_eq!(interaction.data.block_runtime_id, 42);
        assert_eq!(pk.actions.item_stack_request.request_id, -5);
        assert!(pk.actions.block_actions.is_empty());
        assert_eq!(encode(&pk), bytes);
    }

    #[test]
    fn test_auth_input_gaze_in_reality_mode() {
        let pk = PlayerAuthInput {
            play_mode: play_mode::REALITY,
            gaze_direction: Vec3::new(0.0, -1.0, 0.0),
            ..Default::default()
        };
        let bytes = encode(&pk);
        assert_eq!(bytes.len(), 32 + 4 + 12 + 1 + 12 + 8);
        assert_eq!(decode_auth(&bytes), pk);

        let normal = PlayerAuthInput {
            gaze_direction: Vec3::new(0.0, -1.0, 0.0),
            ..Default::default()
        };
        assert_eq!(encode(&normal).len(), 32 + 4 + 1 + 12 + 8);
    }

    #[test]
    fn test_mob_effect_tick() {
        let pk = MobEffect {
            entity_runtime_id: 9,
            effect_type: 1,
            duration: 200,
            tick: 55,
            ..Default::default()
        };
        assert_eq!(roundtrip(&pk), pk);
    }
}
