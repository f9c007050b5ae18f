//! Thing (map object) types as read from the `THINGS` family.

use serde::Serialize;
use strum::{EnumCount, EnumIter, IntoStaticStr};

use crate::angle::Angle;
use crate::damage::{Damage, DamageDefault};
use crate::dlight::{DLight, Weakness};
use crate::mobj_flags::{ExtendedFlags, HyperFlags, MobjFlags};
use crate::state::{S_NULL, StateGroup, StateNum};
use crate::units::{BITSET_EMPTY, BITSET_FULL, BitSet, Percent, TICRATE, Tics};

/// Code run when a thing enters a state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter, EnumCount, IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ThingAction {
    Nothing,
    CloseAttemptSound,
    ComboAttack,
    FaceTarget,
    PlaySound,
    KillSound,
    MakeSound,
    MakeActiveSound,
    MakeSoundRandom,
    MakeDeathSound,
    MakeDead,
    MakeOverkillSound,
    MakePainSound,
    PlayerScream,
    CloseAttack,
    RangeAttack,
    SpareAttack,
    RangeAttemptSound,
    RefireCheck,
    ReloadCheck,
    ReloadReset,
    Lookout,
    SupportLookout,
    Chase,
    ResChase,
    WalkSoundChase,
    Meander,
    SupportMeander,
    ExplosionDamage,
    Thrust,
    Tracer,
    ResetSpreader,
    Smoking,
    TrackerActive,
    TrackerFollow,
    TrackerStart,
    EffectTracker,
    CheckBlood,
    CheckMoving,
    CheckActivity,
    Jump,
    Become,
    Explode,
    ActivateLinetype,
    RtsEnableTagged,
    RtsDisableTagged,
    TouchyRearm,
    TouchyDisarm,
    BounceRearm,
    BounceDisarm,
    PathCheck,
    PathFollow,
    SetInvulnerable,
    ClearInvulnerable,
    DropItem,
    Spawn,
    TransSet,
    TransFade,
    TransMore,
    TransLess,
    TransAlternate,
    DLightSet,
    DLightFade,
    DLightRandom,
    DLightColour,
    SetSkin,
    Face,
    Turn,
    TurnRandom,
    MlookFace,
    MlookTurn,
    MoveFwd,
    MoveRight,
    MoveUp,
    Stop,
    Die,
    KeenDie,
    BrainSpit,
    CubeSpawn,
    CubeTracer,
    BrainScream,
    BrainMissileExplode,
    BrainDie,
}

/// Well-known state labels of a thing, each with its own entry point.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter, EnumCount, IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ThingStarter {
    Spawn,
    Idle,
    Chase,
    Pain,
    Missile,
    Melee,
    Death,
    Overkill,
    Respawn,
    Resurrect,
    Meander,
    Bounce,
    Touch,
    Reload,
    Gib,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MobjType {
    pub name: String,
    pub number: i32,

    pub states: StateGroup<ThingAction>,
    starts: [StateNum; ThingStarter::COUNT],

    pub spawnhealth: f32,
    pub radius: f32,
    pub height: f32,
    pub mass: f32,
    pub speed: f32,
    pub fast: f32,
    pub float_speed: f32,
    pub step_size: f32,

    pub flags: MobjFlags,
    pub extended_flags: ExtendedFlags,
    pub hyper_flags: HyperFlags,

    pub respawn_time: Tics,
    pub fuse: Tics,
    pub reaction_time: Tics,
    pub jump_delay: Tics,
    pub lung_capacity: Tics,
    pub gasp_start: Tics,

    pub translucency: Percent,
    pub shadow_trans: Percent,
    pub painchance: Percent,
    pub minatk_chance: Percent,
    pub bobbing: Percent,
    pub view_height: Percent,
    pub shot_height: Percent,

    pub jump_height: f32,
    pub crouch_height: f32,
    pub max_fall: f32,

    pub castorder: i32,
    pub cast_title: String,
    pub player: i32,
    pub side: BitSet,

    pub close_attack: Option<String>,
    pub range_attack: Option<String>,
    pub spare_attack: Option<String>,
    pub dropitem: Option<String>,
    pub blood: Option<String>,
    pub respawn_effect: Option<String>,
    pub spit_spot: Option<String>,

    pub active_sound: Option<String>,
    pub sight_sound: Option<String>,
    pub attack_sound: Option<String>,
    pub pain_sound: Option<String>,
    pub death_sound: Option<String>,
    pub overkill_sound: Option<String>,
    pub walk_sound: Option<String>,
    pub jump_sound: Option<String>,
    pub noway_sound: Option<String>,
    pub oof_sound: Option<String>,
    pub gasp_sound: Option<String>,

    pub scale: f32,
    pub aspect: f32,
    pub model_skin: i32,
    pub model_scale: f32,
    pub model_aspect: f32,

    pub bounce_speed: f32,
    pub bounce_up: f32,
    pub sight_slope: f32,
    pub sight_angle: Angle,
    pub ride_friction: f32,

    pub immunity: BitSet,
    pub resistance: BitSet,
    pub resist_multiply: f32,
    /// Negative when disabled.
    pub resist_painchance: Percent,
    pub ghost: BitSet,

    pub explode_radius: f32,
    pub explode_damage: Damage,
    pub choke_damage: Damage,
    pub reload_shots: i32,

    /// Negative when disabled.
    pub armour_protect: Percent,
    pub armour_deplete: Percent,
    pub armour_class: BitSet,

    pub dlight: [DLight; 2],
    pub weak: Weakness,
}

pub const RIDE_FRICTION: f32 = 0.7;

impl MobjType {
    pub fn new(name: &str, number: i32) -> Self {
        Self {
            name: name.to_string(),
            number,
            states: StateGroup::new(),
            starts: [S_NULL; ThingStarter::COUNT],
            spawnhealth: 1000.0,
            radius: 0.0,
            height: 0.0,
            mass: 100.0,
            speed: 0.0,
            fast: 1.0,
            float_speed: 2.0,
            step_size: 24.0,
            flags: MobjFlags::empty(),
            extended_flags: ExtendedFlags::empty(),
            hyper_flags: HyperFlags::empty(),
            respawn_time: 30 * TICRATE,
            fuse: 0,
            reaction_time: 0,
            jump_delay: TICRATE,
            lung_capacity: 20 * TICRATE,
            gasp_start: 2 * TICRATE,
            translucency: 1.0,
            shadow_trans: 0.75,
            painchance: 0.0,
            minatk_chance: 0.0,
            bobbing: 1.0,
            view_height: 0.75,
            shot_height: 0.64,
            jump_height: 0.0,
            crouch_height: 0.0,
            max_fall: 0.0,
            castorder: 0,
            cast_title: String::new(),
            player: 0,
            side: BITSET_EMPTY,
            close_attack: None,
            range_attack: None,
            spare_attack: None,
            dropitem: None,
            blood: None,
            respawn_effect: None,
            spit_spot: None,
            active_sound: None,
            sight_sound: None,
            attack_sound: None,
            pain_sound: None,
            death_sound: None,
            overkill_sound: None,
            walk_sound: None,
            jump_sound: None,
            noway_sound: None,
            oof_sound: None,
            gasp_sound: None,
            scale: 1.0,
            aspect: 1.0,
            model_skin: 1,
            model_scale: 1.0,
            model_aspect: 1.0,
            bounce_speed: 0.5,
            bounce_up: 0.5,
            sight_slope: 16.0,
            sight_angle: Angle::ANG90,
            ride_friction: RIDE_FRICTION,
            immunity: BITSET_EMPTY,
            resistance: BITSET_EMPTY,
            resist_multiply: 0.4,
            resist_painchance: -1.0,
            ghost: BITSET_EMPTY,
            explode_radius: 0.0,
            explode_damage: Damage::new(DamageDefault::Mobj),
            choke_damage: Damage::new(DamageDefault::MobjChoke),
            reload_shots: 5,
            armour_protect: -1.0,
            armour_deplete: 1.0,
            armour_class: BITSET_FULL,
            dlight: [DLight::default(), DLight::default()],
            weak: Weakness::default(),
        }
    }

    /// Take every detail of `other` except its identity.
    pub fn copy_detail(&mut self, other: &MobjType) {
        let (name, number) = (std::mem::take(&mut self.name), self.number);
        *self = other.clone();
        self.name = name;
        self.number = number;
    }

    /// Entry point for `starter`, [`S_NULL`] if it has no states.
    pub fn state(&self, starter: ThingStarter) -> StateNum {
        self.starts[starter as usize]
    }

    pub fn set_state(&mut self, starter: ThingStarter, st: StateNum) {
        self.starts[starter as usize] = st;
    }
}
