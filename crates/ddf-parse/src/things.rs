//! The `THINGS` family: map object types, their flags and their states.

use ddf_types::{
    Damage, DLight, DLightType, ExtendedFlags, HyperFlags, MobjFlags, MobjType, Rgb, S_NULL,
    StateNum, ThingAction, ThingStarter, Weakness,
};

use crate::coerce::{
    FlagCheck, SpecialFlag, check_special_flag, get_angle, get_angle_range, get_bitset,
    get_boolean, get_float, get_label_offset, get_numeric, get_opt_string, get_percent,
    get_percent_any, get_percent_range, get_rgb, get_slope, get_string, get_time,
};
use crate::container::{Container, Named};
use crate::diag::Diagnostics;
use crate::dispatch::{Command, dispatch, names_match};
use crate::driver::Family;
use crate::error::DdfError;
use crate::states::{
    ActionCode, ArgKind, Redirectors, SpriteNames, StateSpec, StateTarget, Starter,
    lookup_director, parse_state_field, resolve_group,
};
use crate::{field, sub_record};

pub const TAG: &str = "THINGS";

/// Warnings about oversized lights stop after this many.
const DLIGHT_RADIUS_WARNINGS: usize = 3;
const DLIGHT_RADIUS_MAX: f32 = 512.0;
const DLIGHT_COMPAT_DIM: f32 = 0.8;
const NO_NAME: &str = "THING_WITH_NO_NAME";
const DEFAULT_THING: &str = "__DEFAULT_MOBJ";

impl Named for MobjType {
    fn name(&self) -> &str {
        &self.name
    }

    fn number(&self) -> i32 {
        self.number
    }
}

static DLIGHT_TYPES: &[SpecialFlag<DLightType>] = &[
    SpecialFlag::new("NONE", DLightType::None, false),
    SpecialFlag::new("MODULATE", DLightType::Modulate, false),
    SpecialFlag::new("ADD", DLightType::Add, false),
    SpecialFlag::new("LINEAR", DLightType::CompatLinear, false),
    SpecialFlag::new("QUADRATIC", DLightType::CompatQuadratic, false),
    SpecialFlag::new("CONSTANT", DLightType::CompatLinear, false),
];

fn get_dlight_type(info: &str, dest: &mut DLightType, diag: &mut Diagnostics) -> Result<(), DdfError> {
    match check_special_flag(info, DLIGHT_TYPES, false, false, diag)? {
        FlagCheck::Positive(kind) => *dest = kind,
        _ => diag.warn_error(format!("Unknown dlight type '{info}'"))?,
    }
    Ok(())
}

fn get_player(info: &str, dest: &mut i32, diag: &mut Diagnostics) -> Result<(), DdfError> {
    get_numeric(info, dest, diag)?;
    if *dest > 32 {
        diag.warning(format!("Player number '{dest}' will not work."));
    }
    Ok(())
}

static DLIGHT_COMMANDS: &[Command<DLight>] = &[
    field!(DLight, "TYPE", kind, get_dlight_type),
    field!(DLight, "GRAPHIC", shape, get_string),
    field!(DLight, "RADIUS", radius, get_float),
    field!(DLight, "COLOUR", colour, get_rgb),
    field!(DLight, "HEIGHT", height, get_percent),
    field!(DLight, "LEAKY", leaky, get_boolean),
    field!(DLight, "INTENSITY", radius, get_float),
];

static WEAKNESS_COMMANDS: &[Command<Weakness>] = &[
    field!(Weakness, "CLASS", classes, get_bitset),
    field!(Weakness, "HEIGHTS", height, get_percent_range),
    field!(Weakness, "ANGLES", angle, get_angle_range),
    field!(Weakness, "MULTIPLY", multiply, get_float),
    field!(Weakness, "PAINCHANCE", painchance, get_percent),
];

pub static DAMAGE_COMMANDS: &[Command<Damage>] = &[
    field!(Damage, "VAL", nominal, get_float),
    field!(Damage, "MAX", linear_max, get_float),
    field!(Damage, "ERROR", error, get_float),
    field!(Damage, "DELAY", delay, get_time),
    field!(Damage, "OBITUARY", obituary, get_string),
    field!(Damage, "PAIN_STATE", pain, get_label_offset),
    field!(Damage, "DEATH_STATE", death, get_label_offset),
    field!(Damage, "OVERKILL_STATE", overkill, get_label_offset),
];

static THING_COMMANDS: &[Command<MobjType>] = &[
    sub_record!(MobjType, "DLIGHT", DLIGHT_COMMANDS, |t| &mut t.dlight[0]),
    sub_record!(MobjType, "DLIGHT2", DLIGHT_COMMANDS, |t| &mut t.dlight[1]),
    sub_record!(MobjType, "WEAKNESS", WEAKNESS_COMMANDS, |t| &mut t.weak),
    sub_record!(MobjType, "EXPLODE_DAMAGE", DAMAGE_COMMANDS, |t| &mut t.explode_damage),
    sub_record!(MobjType, "CHOKE_DAMAGE", DAMAGE_COMMANDS, |t| &mut t.choke_damage),
    field!(MobjType, "SPAWNHEALTH", spawnhealth, get_float),
    field!(MobjType, "RADIUS", radius, get_float),
    field!(MobjType, "HEIGHT", height, get_float),
    field!(MobjType, "MASS", mass, get_float),
    field!(MobjType, "SPEED", speed, get_float),
    field!(MobjType, "FAST", fast, get_float),
    field!(MobjType, "RESPAWN_TIME", respawn_time, get_time),
    field!(MobjType, "FUSE", fuse, get_time),
    field!(MobjType, "LIFESPAN", fuse, get_time),
    field!(MobjType, "TRANSLUCENCY", translucency, get_percent),
    field!(MobjType, "PAINCHANCE", painchance, get_percent),
    field!(MobjType, "MINATTACK_CHANCE", minatk_chance, get_percent),
    field!(MobjType, "REACTION_TIME", reaction_time, get_time),
    field!(MobjType, "JUMP_DELAY", jump_delay, get_time),
    field!(MobjType, "JUMP_HEIGHT", jump_height, get_float),
    field!(MobjType, "CROUCH_HEIGHT", crouch_height, get_float),
    field!(MobjType, "VIEW_HEIGHT", view_height, get_percent),
    field!(MobjType, "SHOT_HEIGHT", shot_height, get_percent),
    field!(MobjType, "MAX_FALL", max_fall, get_float),
    field!(MobjType, "CASTORDER", castorder, get_numeric),
    field!(MobjType, "CAST_TITLE", cast_title, get_string),
    field!(MobjType, "PLAYER", player, get_player),
    field!(MobjType, "SIDE", side, get_bitset),
    field!(MobjType, "CLOSE_ATTACK", close_attack, get_opt_string),
    field!(MobjType, "RANGE_ATTACK", range_attack, get_opt_string),
    field!(MobjType, "SPARE_ATTACK", spare_attack, get_opt_string),
    field!(MobjType, "DROPITEM", dropitem, get_opt_string),
    field!(MobjType, "BLOOD", blood, get_opt_string),
    field!(MobjType, "RESPAWN_EFFECT", respawn_effect, get_opt_string),
    field!(MobjType, "SPIT_SPOT", spit_spot, get_opt_string),
    field!(MobjType, "PICKUP_SOUND", active_sound, get_opt_string),
    field!(MobjType, "ACTIVE_SOUND", active_sound, get_opt_string),
    field!(MobjType, "LAUNCH_SOUND", sight_sound, get_opt_string),
    field!(MobjType, "AMBIENT_SOUND", sight_sound, get_opt_string),
    field!(MobjType, "SIGHTING_SOUND", sight_sound, get_opt_string),
    field!(MobjType, "DEATH_SOUND", death_sound, get_opt_string),
    field!(MobjType, "OVERKILL_SOUND", overkill_sound, get_opt_string),
    field!(MobjType, "PAIN_SOUND", pain_sound, get_opt_string),
    field!(MobjType, "STARTCOMBAT_SOUND", attack_sound, get_opt_string),
    field!(MobjType, "WALK_SOUND", walk_sound, get_opt_string),
    field!(MobjType, "JUMP_SOUND", jump_sound, get_opt_string),
    field!(MobjType, "NOWAY_SOUND", noway_sound, get_opt_string),
    field!(MobjType, "OOF_SOUND", oof_sound, get_opt_string),
    field!(MobjType, "GASP_SOUND", gasp_sound, get_opt_string),
    field!(MobjType, "FLOAT_SPEED", float_speed, get_float),
    field!(MobjType, "STEP_SIZE", step_size, get_float),
    field!(MobjType, "SPRITE_SCALE", scale, get_float),
    field!(MobjType, "SPRITE_ASPECT", aspect, get_float),
    field!(MobjType, "MODEL_SKIN", model_skin, get_numeric),
    field!(MobjType, "MODEL_SCALE", model_scale, get_float),
    field!(MobjType, "MODEL_ASPECT", model_aspect, get_float),
    field!(MobjType, "BOUNCE_SPEED", bounce_speed, get_float),
    field!(MobjType, "BOUNCE_UP", bounce_up, get_float),
    field!(MobjType, "SIGHT_SLOPE", sight_slope, get_slope),
    field!(MobjType, "SIGHT_ANGLE", sight_angle, get_angle),
    field!(MobjType, "RIDE_FRICTION", ride_friction, get_float),
    field!(MobjType, "BOBBING", bobbing, get_percent),
    field!(MobjType, "IMMUNITY_CLASS", immunity, get_bitset),
    field!(MobjType, "RESISTANCE_CLASS", resistance, get_bitset),
    field!(MobjType, "RESISTANCE_MULTIPLY", resist_multiply, get_float),
    field!(MobjType, "RESISTANCE_PAINCHANCE", resist_painchance, get_percent),
    field!(MobjType, "GHOST_CLASS", ghost, get_bitset),
    field!(MobjType, "SHADOW_TRANSLUCENCY", shadow_trans, get_percent),
    field!(MobjType, "LUNG_CAPACITY", lung_capacity, get_time),
    field!(MobjType, "GASP_START", gasp_start, get_time),
    field!(MobjType, "EXPLODE_RADIUS", explode_radius, get_float),
    field!(MobjType, "RELOAD_SHOTS", reload_shots, get_numeric),
    field!(MobjType, "ARMOUR_PROTECTION", armour_protect, get_percent),
    field!(MobjType, "ARMOUR_DEPLETION", armour_deplete, get_percent_any),
    field!(MobjType, "ARMOUR_CLASS", armour_class, get_bitset),
    field!(MobjType, "!EXPLOD_DAMAGE", explode_damage.nominal, get_float),
    field!(MobjType, "!EXPLOSION_DAMAGE", explode_damage.nominal, get_float),
    field!(MobjType, "!EXPLOD_DAMAGERANGE", explode_damage.nominal, get_float),
];

static THING_STARTERS: &[Starter<ThingStarter>] = &[
    Starter { label: "SPAWN", last_redir: "IDLE", slot: ThingStarter::Spawn },
    Starter { label: "IDLE", last_redir: "IDLE", slot: ThingStarter::Idle },
    Starter { label: "CHASE", last_redir: "CHASE", slot: ThingStarter::Chase },
    Starter { label: "PAIN", last_redir: "IDLE", slot: ThingStarter::Pain },
    Starter { label: "MISSILE", last_redir: "IDLE", slot: ThingStarter::Missile },
    Starter { label: "MELEE", last_redir: "IDLE", slot: ThingStarter::Melee },
    Starter { label: "DEATH", last_redir: "REMOVE", slot: ThingStarter::Death },
    Starter { label: "OVERKILL", last_redir: "REMOVE", slot: ThingStarter::Overkill },
    Starter { label: "RESPAWN", last_redir: "IDLE", slot: ThingStarter::Respawn },
    Starter { label: "RESURRECT", last_redir: "IDLE", slot: ThingStarter::Resurrect },
    Starter { label: "MEANDER", last_redir: "MEANDER", slot: ThingStarter::Meander },
    Starter { label: "BOUNCE", last_redir: "IDLE", slot: ThingStarter::Bounce },
    Starter { label: "TOUCH", last_redir: "IDLE", slot: ThingStarter::Touch },
    Starter { label: "RELOAD", last_redir: "IDLE", slot: ThingStarter::Reload },
    Starter { label: "GIB", last_redir: "REMOVE", slot: ThingStarter::Gib },
];

use ArgKind as K;
use ThingAction as T;

static THING_ACTIONS: &[ActionCode<ThingAction>] = &[
    ActionCode::new("NOTHING", T::Nothing, None),
    ActionCode::new("CLOSEATTEMPTSND", T::CloseAttemptSound, None),
    ActionCode::new("COMBOATTACK", T::ComboAttack, None),
    ActionCode::new("FACETARGET", T::FaceTarget, None),
    ActionCode::new("PLAYSOUND", T::PlaySound, Some(K::Sound)),
    ActionCode::new("KILLSOUND", T::KillSound, None),
    ActionCode::new("MAKESOUND", T::MakeSound, None),
    ActionCode::new("MAKEACTIVESOUND", T::MakeActiveSound, None),
    ActionCode::new("MAKESOUNDRANDOM", T::MakeSoundRandom, None),
    ActionCode::new("MAKEDEATHSOUND", T::MakeDeathSound, None),
    ActionCode::new("MAKEDEAD", T::MakeDead, None),
    ActionCode::new("MAKEOVERKILLSOUND", T::MakeOverkillSound, None),
    ActionCode::new("MAKEPAINSOUND", T::MakePainSound, None),
    ActionCode::new("PLAYER_SCREAM", T::PlayerScream, None),
    ActionCode::new("CLOSE_ATTACK", T::CloseAttack, Some(K::Attack)),
    ActionCode::new("RANGE_ATTACK", T::RangeAttack, Some(K::Attack)),
    ActionCode::new("SPARE_ATTACK", T::SpareAttack, Some(K::Attack)),
    ActionCode::new("RANGEATTEMPTSND", T::RangeAttemptSound, None),
    ActionCode::new("REFIRE_CHECK", T::RefireCheck, None),
    ActionCode::new("RELOAD_CHECK", T::ReloadCheck, None),
    ActionCode::new("RELOAD_RESET", T::ReloadReset, None),
    ActionCode::new("LOOKOUT", T::Lookout, None),
    ActionCode::new("SUPPORT_LOOKOUT", T::SupportLookout, None),
    ActionCode::new("CHASE", T::Chase, None),
    ActionCode::new("RESCHASE", T::ResChase, None),
    ActionCode::new("WALKSOUND_CHASE", T::WalkSoundChase, None),
    ActionCode::new("MEANDER", T::Meander, None),
    ActionCode::new("SUPPORT_MEANDER", T::SupportMeander, None),
    ActionCode::new("EXPLOSIONDAMAGE", T::ExplosionDamage, None),
    ActionCode::new("THRUST", T::Thrust, None),
    ActionCode::new("TRACER", T::Tracer, None),
    ActionCode::new("RANDOM_TRACER", T::Tracer, None),
    ActionCode::new("RESET_SPREADER", T::ResetSpreader, None),
    ActionCode::new("SMOKING", T::Smoking, None),
    ActionCode::new("TRACKERACTIVE", T::TrackerActive, None),
    ActionCode::new("TRACKERFOLLOW", T::TrackerFollow, None),
    ActionCode::new("TRACKERSTART", T::TrackerStart, None),
    ActionCode::new("EFFECTTRACKER", T::EffectTracker, None),
    ActionCode::new("CHECKBLOOD", T::CheckBlood, None),
    ActionCode::new("CHECKMOVING", T::CheckMoving, None),
    ActionCode::new("CHECK_ACTIVITY", T::CheckActivity, None),
    ActionCode::new("JUMP", T::Jump, Some(K::Jump)),
    ActionCode::new("BECOME", T::Become, Some(K::Become)),
    ActionCode::new("EXPLODE", T::Explode, None),
    ActionCode::new("ACTIVATE_LINETYPE", T::ActivateLinetype, Some(K::IntPair)),
    ActionCode::new("RTS_ENABLE_TAGGED", T::RtsEnableTagged, Some(K::Integer)),
    ActionCode::new("RTS_DISABLE_TAGGED", T::RtsDisableTagged, Some(K::Integer)),
    ActionCode::new("TOUCHY_REARM", T::TouchyRearm, None),
    ActionCode::new("TOUCHY_DISARM", T::TouchyDisarm, None),
    ActionCode::new("BOUNCE_REARM", T::BounceRearm, None),
    ActionCode::new("BOUNCE_DISARM", T::BounceDisarm, None),
    ActionCode::new("PATH_CHECK", T::PathCheck, None),
    ActionCode::new("PATH_FOLLOW", T::PathFollow, None),
    ActionCode::new("SET_INVULNERABLE", T::SetInvulnerable, None),
    ActionCode::new("CLEAR_INVULNERABLE", T::ClearInvulnerable, None),
    ActionCode::new("DROPITEM", T::DropItem, Some(K::Thing)),
    ActionCode::new("SPAWN", T::Spawn, Some(K::Thing)),
    ActionCode::new("TRANS_SET", T::TransSet, Some(K::Percent)),
    ActionCode::new("TRANS_FADE", T::TransFade, Some(K::Percent)),
    ActionCode::new("TRANS_MORE", T::TransMore, Some(K::Percent)),
    ActionCode::new("TRANS_LESS", T::TransLess, Some(K::Percent)),
    ActionCode::new("TRANS_ALTERNATE", T::TransAlternate, Some(K::Percent)),
    ActionCode::new("DLIGHT_SET", T::DLightSet, Some(K::Integer)),
    ActionCode::new("DLIGHT_FADE", T::DLightFade, Some(K::Integer)),
    ActionCode::new("DLIGHT_RANDOM", T::DLightRandom, Some(K::IntPair)),
    ActionCode::new("DLIGHT_COLOUR", T::DLightColour, Some(K::Rgb)),
    ActionCode::new("SET_SKIN", T::SetSkin, Some(K::Integer)),
    ActionCode::new("FACE", T::Face, Some(K::Angle)),
    ActionCode::new("TURN", T::Turn, Some(K::Angle)),
    ActionCode::new("TURN_RANDOM", T::TurnRandom, Some(K::Angle)),
    ActionCode::new("MLOOK_FACE", T::MlookFace, Some(K::Slope)),
    ActionCode::new("MLOOK_TURN", T::MlookTurn, Some(K::Slope)),
    ActionCode::new("MOVE_FWD", T::MoveFwd, Some(K::Float)),
    ActionCode::new("MOVE_RIGHT", T::MoveRight, Some(K::Float)),
    ActionCode::new("MOVE_UP", T::MoveUp, Some(K::Float)),
    ActionCode::new("STOP", T::Stop, None),
    ActionCode::new("DIE", T::Die, None),
    ActionCode::new("KEEN_DIE", T::KeenDie, None),
    ActionCode::new("BRAINSPIT", T::BrainSpit, None),
    ActionCode::new("CUBESPAWN", T::CubeSpawn, None),
    ActionCode::new("CUBETRACER", T::CubeTracer, None),
    ActionCode::new("BRAINSCREAM", T::BrainScream, None),
    ActionCode::new("BRAINMISSILEEXPLODE", T::BrainMissileExplode, None),
    ActionCode::new("BRAINDIE", T::BrainDie, None),
    ActionCode::new("VARIEDEXPDAMAGE", T::ExplosionDamage, None),
    ActionCode::new("VARIED_THRUST", T::Thrust, None),
];

static THING_STATES: StateSpec<ThingAction, ThingStarter> = StateSpec {
    starters: THING_STARTERS,
    actions: THING_ACTIONS,
    default_redir: "IDLE",
    is_weapon: false,
};

static NORMAL_SPECIALS: &[SpecialFlag<MobjFlags>] = &[
    SpecialFlag::new("AMBUSH", MobjFlags::AMBUSH, false),
    SpecialFlag::new("FUZZY", MobjFlags::FUZZY, false),
    SpecialFlag::new("SOLID", MobjFlags::SOLID, false),
    SpecialFlag::new(
        "ON_CEILING",
        MobjFlags::SPAWN_CEILING.union(MobjFlags::NO_GRAVITY),
        false,
    ),
    SpecialFlag::new("FLOATER", MobjFlags::FLOAT.union(MobjFlags::NO_GRAVITY), false),
    SpecialFlag::new("INERT", MobjFlags::NO_BLOCKMAP, false),
    SpecialFlag::new("TELEPORT_TYPE", MobjFlags::NO_GRAVITY, false),
    SpecialFlag::new("LINKS", MobjFlags::NO_BLOCKMAP.union(MobjFlags::NO_SECTOR), true),
    SpecialFlag::new("DAMAGESMOKE", MobjFlags::NO_BLOOD, false),
    SpecialFlag::new("SHOOTABLE", MobjFlags::SHOOTABLE, false),
    SpecialFlag::new("COUNT_AS_KILL", MobjFlags::COUNT_KILL, false),
    SpecialFlag::new("COUNT_AS_ITEM", MobjFlags::COUNT_ITEM, false),
    SpecialFlag::new("SKULLFLY", MobjFlags::SKULL_FLY, false),
    SpecialFlag::new("SPECIAL", MobjFlags::SPECIAL, false),
    SpecialFlag::new("SECTOR", MobjFlags::NO_SECTOR, true),
    SpecialFlag::new("BLOCKMAP", MobjFlags::NO_BLOCKMAP, true),
    SpecialFlag::new("SPAWNCEILING", MobjFlags::SPAWN_CEILING, false),
    SpecialFlag::new("GRAVITY", MobjFlags::NO_GRAVITY, true),
    SpecialFlag::new("DROPOFF", MobjFlags::DROPOFF, false),
    SpecialFlag::new("PICKUP", MobjFlags::PICKUP, false),
    SpecialFlag::new("CLIP", MobjFlags::NO_CLIP, true),
    SpecialFlag::new("SLIDER", MobjFlags::SLIDE, false),
    SpecialFlag::new("FLOAT", MobjFlags::FLOAT, false),
    SpecialFlag::new("TELEPORT", MobjFlags::TELEPORT, false),
    SpecialFlag::new("BARE_MISSILE", MobjFlags::MISSILE, false),
    SpecialFlag::new("DROPPED", MobjFlags::DROPPED, false),
    SpecialFlag::new("CORPSE", MobjFlags::CORPSE, false),
    SpecialFlag::new("STEALTH", MobjFlags::STEALTH, false),
    SpecialFlag::new("DEATHMATCH", MobjFlags::NOT_DMATCH, true),
    SpecialFlag::new("TOUCHY", MobjFlags::TOUCHY, false),
];

static EXTENDED_SPECIALS: &[SpecialFlag<ExtendedFlags>] = &[
    SpecialFlag::new("RESPAWN", ExtendedFlags::NO_RESPAWN, true),
    SpecialFlag::new("RESURRECT", ExtendedFlags::NO_RESURRECT, true),
    SpecialFlag::new("DISLOYAL", ExtendedFlags::DISLOYAL_TYPE, false),
    SpecialFlag::new("TRIGGER_HAPPY", ExtendedFlags::TRIGGER_HAPPY, false),
    SpecialFlag::new("ATTACK_HURTS", ExtendedFlags::OWN_ATTACK_HURTS, false),
    SpecialFlag::new("EXPLODE_IMMUNE", ExtendedFlags::EXPLODE_IMMUNE, false),
    SpecialFlag::new("ALWAYS_LOUD", ExtendedFlags::ALWAYS_LOUD, false),
    SpecialFlag::new(
        "BOSSMAN",
        ExtendedFlags::EXPLODE_IMMUNE.union(ExtendedFlags::ALWAYS_LOUD),
        false,
    ),
    SpecialFlag::new("NEVERTARGETED", ExtendedFlags::NEVER_TARGET, false),
    SpecialFlag::new("GRAV_KILL", ExtendedFlags::NO_GRAV_KILL, true),
    SpecialFlag::new("GRUDGE", ExtendedFlags::NO_GRUDGE, true),
    SpecialFlag::new("BOUNCE", ExtendedFlags::BOUNCE, false),
    SpecialFlag::new("EDGEWALKER", ExtendedFlags::EDGE_WALKER, false),
    SpecialFlag::new("GRAVFALL", ExtendedFlags::GRAV_FALL, false),
    SpecialFlag::new("CLIMBABLE", ExtendedFlags::CLIMBABLE, false),
    SpecialFlag::new("WATERWALKER", ExtendedFlags::WATER_WALKER, false),
    SpecialFlag::new("MONSTER", ExtendedFlags::MONSTER, false),
    SpecialFlag::new("CROSSLINES", ExtendedFlags::CROSS_LINES, false),
    SpecialFlag::new("FRICTION", ExtendedFlags::NO_FRICTION, true),
    SpecialFlag::new("USABLE", ExtendedFlags::USABLE, false),
    SpecialFlag::new("BLOCK_SHOTS", ExtendedFlags::BLOCK_SHOTS, false),
    SpecialFlag::new("TUNNEL", ExtendedFlags::TUNNEL, false),
    SpecialFlag::new("SIMPLE_ARMOUR", ExtendedFlags::SIMPLE_ARMOUR, false),
];

static HYPER_SPECIALS: &[SpecialFlag<HyperFlags>] = &[
    SpecialFlag::new("FORCE_PICKUP", HyperFlags::FORCE_PICKUP, false),
    SpecialFlag::new("SILENT_PICKUP", HyperFlags::SILENT_PICKUP, false),
    SpecialFlag::new("SIDE_IMMUNE", HyperFlags::SIDE_IMMUNE, false),
    SpecialFlag::new("SIDE_GHOST", HyperFlags::SIDE_GHOST, false),
    SpecialFlag::new("ULTRA_LOYAL", HyperFlags::ULTRA_LOYAL, false),
    SpecialFlag::new("ZBUFFER", HyperFlags::NO_ZBUFFER, true),
    SpecialFlag::new("HOVER", HyperFlags::HOVER, false),
    SpecialFlag::new("PUSHABLE", HyperFlags::PUSHABLE, false),
    SpecialFlag::new("POINT_FORCE", HyperFlags::POINT_FORCE, false),
    SpecialFlag::new("PASS_MISSILE", HyperFlags::PASS_MISSILE, false),
    SpecialFlag::new("INVULNERABLE", HyperFlags::INVULNERABLE, false),
    SpecialFlag::new("VAMPIRE", HyperFlags::VAMPIRE, false),
    SpecialFlag::new("AUTOAIM", HyperFlags::NO_AUTOAIM, true),
    SpecialFlag::new("TILT", HyperFlags::TILT, false),
    SpecialFlag::new("IMMORTAL", HyperFlags::IMMORTAL, false),
    SpecialFlag::new("FLOOR_CLIP", HyperFlags::FLOOR_CLIP, false),
];

/// Apply one `SPECIAL` name, trying the normal, extended and hyper
/// tables in turn.
fn apply_special(t: &mut MobjType, info: &str, diag: &mut Diagnostics) -> Result<(), DdfError> {
    if names_match("INVISIBLE", info) {
        t.translucency = 0.0;
        return Ok(());
    }
    if names_match("NOSHADOW", info) {
        t.shadow_trans = 0.0;
        return Ok(());
    }
    if names_match("MISSILE", info) {
        t.flags |= MobjFlags::MISSILE;
        t.extended_flags |= ExtendedFlags::CROSS_LINES | ExtendedFlags::NO_FRICTION;
        return Ok(());
    }

    match check_special_flag(info, NORMAL_SPECIALS, true, false, diag)? {
        FlagCheck::Positive(bits) => t.flags.insert(bits),
        FlagCheck::Negative(bits) => t.flags.remove(bits),
        FlagCheck::User(_) | FlagCheck::Unknown => {
            match check_special_flag(info, EXTENDED_SPECIALS, true, false, diag)? {
                FlagCheck::Positive(bits) => t.extended_flags.insert(bits),
                FlagCheck::Negative(bits) => t.extended_flags.remove(bits),
                FlagCheck::User(_) | FlagCheck::Unknown => {
                    match check_special_flag(info, HYPER_SPECIALS, true, false, diag)? {
                        FlagCheck::Positive(bits) => t.hyper_flags.insert(bits),
                        FlagCheck::Negative(bits) => t.hyper_flags.remove(bits),
                        FlagCheck::User(_) | FlagCheck::Unknown => {
                            diag.warn_error(format!("Unknown special '{info}'"))?;
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

/// Convert the old linear/quadratic light models to modulated lights.
fn dlight_compatibility(t: &mut MobjType) {
    for light in &mut t.dlight {
        let dim = |c: u8| (f32::from(c) * DLIGHT_COMPAT_DIM) as u8;
        let colour = Rgb::new(
            dim(light.colour.red()),
            dim(light.colour.green()),
            dim(light.colour.blue()),
        );
        match light.kind {
            DLightType::CompatQuadratic => {
                light.kind = DLightType::Modulate;
                light.radius = 10.0 * light.radius.sqrt();
                light.colour = colour;
                t.hyper_flags |= HyperFlags::QUADRATIC_COMPAT;
            }
            DLightType::CompatLinear => {
                light.kind = DLightType::Modulate;
                light.radius *= 1.3;
                light.colour = colour;
            }
            _ => {}
        }
    }
}

/// Every thing read so far, plus the sprite and model names their states
/// refer to. Accumulates across passes.
#[derive(Debug)]
pub struct ThingDb {
    pub names: SpriteNames,
    pub things: Container<MobjType>,
    /// Stands in for unknown references when lax errors are allowed.
    pub default_thing: MobjType,
}

impl Default for ThingDb {
    fn default() -> Self {
        Self {
            names: SpriteNames::default(),
            things: Container::default(),
            default_thing: MobjType::new(DEFAULT_THING, 0),
        }
    }
}

impl ThingDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<&MobjType> {
        self.things.lookup(name)
    }

    /// Thing referred to by another definition. An unknown name is a lax
    /// error; when allowed, the default thing is returned instead.
    pub fn lookup_ref(&self, name: &str, diag: &mut Diagnostics) -> Result<&MobjType, DdfError> {
        match self.lookup(name) {
            Some(thing) => Ok(thing),
            None => {
                diag.lax_error(format!("Unknown thing type: {name}"))?;
                Ok(&self.default_thing)
            }
        }
    }

    /// State of thing `name` at `label[:n]`. The default thing has no
    /// states, so a lax miss gives `S_NULL`.
    pub fn lookup_state(
        &self,
        name: &str,
        reference: &str,
        diag: &mut Diagnostics,
    ) -> Result<StateNum, DdfError> {
        let thing = self.lookup_ref(name, diag)?;
        if std::ptr::eq(thing, &self.default_thing) {
            return Ok(S_NULL);
        }
        lookup_director(&thing.states, reference, diag)
    }

    /// Checks that every `DROPITEM`, `BLOOD` and `RESPAWN_EFFECT` names a
    /// known thing. Run once all files have been read, since a reference
    /// may point at a thing defined later. Unresolved references are
    /// dropped when lax errors are allowed.
    pub fn link_references(&mut self, diag: &mut Diagnostics) -> Result<(), DdfError> {
        for idx in self.things.disabled_count()..self.things.len() {
            let Some(thing) = self.things.get(idx) else {
                continue;
            };
            diag.set_entry(Some(format!("[{}]", thing.name)));
            let dropitem = self.is_missing(&thing.dropitem, diag)?;
            let blood = self.is_missing(&thing.blood, diag)?;
            let respawn = self.is_missing(&thing.respawn_effect, diag)?;
            if let Some(thing) = self.things.get_mut(idx) {
                if dropitem {
                    thing.dropitem = None;
                }
                if blood {
                    thing.blood = None;
                }
                if respawn {
                    thing.respawn_effect = None;
                }
            }
        }
        diag.set_entry(None);
        Ok(())
    }

    fn is_missing(&self, reference: &Option<String>, diag: &mut Diagnostics) -> Result<bool, DdfError> {
        match reference {
            Some(name) => Ok(std::ptr::eq(self.lookup_ref(name, diag)?, &self.default_thing)),
            None => Ok(false),
        }
    }
}

struct Scratch {
    /// Slot of the persisted record this entry replaces or extends.
    slot: Option<usize>,
    thing: MobjType,
}

/// Reads `THINGS` entries into a [`ThingDb`].
///
/// Each entry is built in a scratch copy and only written back by
/// `finish_entry`, so a failed entry never leaves a half-edited record.
pub struct ThingParser<'db> {
    db: &'db mut ThingDb,
    current: Option<Scratch>,
    redirs: Redirectors,
    dlight_warnings: usize,
}

impl<'db> ThingParser<'db> {
    pub fn new(db: &'db mut ThingDb) -> Self {
        Self {
            db,
            current: None,
            redirs: Redirectors::default(),
            dlight_warnings: 0,
        }
    }

    fn apply_template(&mut self, other: &str, diag: &Diagnostics) -> Result<(), DdfError> {
        let idx = self
            .db
            .things
            .find_first(other, 0)
            .ok_or_else(|| diag.semantic(format!("Unknown thing template: '{other}'")))?;
        let Some(cur) = self.current.as_mut() else {
            return Err(diag.error("Thing field outside of an entry"));
        };
        if cur.slot == Some(idx) {
            return Err(diag.semantic(format!("Bad thing template: '{other}'")));
        }
        if let Some(src) = self.db.things.get(idx) {
            cur.thing.copy_detail(src);
        }
        cur.thing.states.begin_range();
        Ok(())
    }

    fn check(&mut self, t: &mut MobjType, diag: &mut Diagnostics) -> Result<(), DdfError> {
        if t.flags.contains(MobjFlags::COUNT_KILL) {
            t.extended_flags |= ExtendedFlags::MONSTER;
        }
        if t.flags.contains(MobjFlags::COUNT_ITEM) {
            t.hyper_flags |= HyperFlags::FORCE_PICKUP;
        }
        if t.flags.contains(MobjFlags::SHOOTABLE) {
            t.hyper_flags |= HyperFlags::PUSHABLE;
        }

        if t.mass < 1.0 {
            diag.warn_error(format!("Bad MASS value {} in DDF.", t.mass))?;
            t.mass = 1.0;
        }
        if t.castorder > 0 {
            if t.state(ThingStarter::Chase) == S_NULL {
                return Err(diag.semantic("Cast object must have CHASE states !"));
            }
            if t.state(ThingStarter::Death) == S_NULL {
                return Err(diag.semantic("Cast object must have DEATH states !"));
            }
        }
        if t.explode_damage.nominal < 0.0 {
            diag.warn_error(format!(
                "Bad EXPLODE_DAMAGE.VAL value {} in DDF.",
                t.explode_damage.nominal
            ))?;
        }
        if t.explode_radius < 0.0 {
            return Err(diag.semantic(format!("Bad EXPLODE_RADIUS value {} in DDF.", t.explode_radius)));
        }
        if t.reload_shots <= 0 {
            return Err(diag.semantic(format!("Bad RELOAD_SHOTS value {} in DDF.", t.reload_shots)));
        }
        if t.choke_damage.nominal < 0.0 {
            diag.warn_error(format!(
                "Bad CHOKE_DAMAGE.VAL value {} in DDF.",
                t.choke_damage.nominal
            ))?;
        }
        if !(0..=9).contains(&t.model_skin) {
            return Err(diag.semantic(format!(
                "Bad MODEL_SKIN value {} in DDF (must be 0-9).",
                t.model_skin
            )));
        }
        if t.dlight[0].radius > DLIGHT_RADIUS_MAX {
            if self.dlight_warnings < DLIGHT_RADIUS_WARNINGS {
                diag.warning(format!(
                    "DLIGHT_RADIUS value {:.1} too large (over 512).",
                    t.dlight[0].radius
                ));
            } else if self.dlight_warnings == DLIGHT_RADIUS_WARNINGS {
                diag.warning("More too large DLIGHT_RADIUS values found....");
            }
            self.dlight_warnings += 1;
        }

        if t.state(ThingStarter::Idle) == S_NULL {
            t.set_state(ThingStarter::Idle, t.state(ThingStarter::Spawn));
        }
        dlight_compatibility(t);
        Ok(())
    }
}

/// `NAME` or `NAME:number`.
fn split_entry_name(entry: &str) -> (&str, i32) {
    match entry.split_once(':') {
        Some((name, n)) => {
            let n = n
                .bytes()
                .take_while(u8::is_ascii_digit)
                .fold(0i32, |acc, d| acc.saturating_mul(10).saturating_add(i32::from(d - b'0')));
            (name, n)
        }
        None => (entry, 0),
    }
}

impl Family for ThingParser<'_> {
    fn start_entry(&mut self, entry: &str, extend: bool, diag: &mut Diagnostics) -> Result<(), DdfError> {
        let (mut name, number) = split_entry_name(entry);
        if name.is_empty() {
            diag.warn_error("New thing entry is missing a name!")?;
            name = NO_NAME;
        }

        let slot = self.db.things.find_first(name, 0);
        let mut thing = match (slot.and_then(|i| self.db.things.get(i)), extend) {
            (Some(existing), true) => {
                let mut t = existing.clone();
                if number > 0 {
                    t.number = number;
                }
                t
            }
            (None, true) => {
                return Err(diag.semantic(format!("Unknown thing to extend: {name}")));
            }
            (Some(existing), false) => MobjType::new(&existing.name, number),
            (None, false) => MobjType::new(name, number),
        };
        log::trace!(
            "thing {name}: {}",
            match (slot, extend) {
                (_, true) => "extend",
                (Some(_), false) => "replace",
                (None, false) => "new",
            }
        );
        thing.states.begin_range();
        self.redirs.clear();
        self.current = Some(Scratch { slot, thing });
        Ok(())
    }

    fn parse_field(
        &mut self,
        field: &str,
        value: &str,
        index: usize,
        is_last: bool,
        diag: &mut Diagnostics,
    ) -> Result<(), DdfError> {
        log::trace!("THING_PARSE: {field} = {value};");
        if names_match("TEMPLATE", field) {
            return self.apply_template(value, diag);
        }

        let db = &mut *self.db;
        let Some(cur) = self.current.as_mut() else {
            return Err(diag.error("Thing field outside of an entry"));
        };
        let t = &mut cur.thing;

        if names_match("SPECIAL", field) || names_match("PROJECTILE_SPECIAL", field) {
            return apply_special(t, value, diag);
        }
        if dispatch(THING_COMMANDS, field, value, t, diag)? {
            return Ok(());
        }

        let mut target = StateTarget {
            group: &mut t.states,
            names: &mut db.names,
            redirs: &mut self.redirs,
        };
        match parse_state_field(&THING_STATES, field, value, index, is_last, &mut target, diag)? {
            Some(sf) => {
                if let (Some(starter), Some(st)) = (sf.slot, sf.entry) {
                    t.set_state(starter, st);
                }
                Ok(())
            }
            None => diag.warn_error(format!("Unknown thing/attack command: {field}")),
        }
    }

    fn finish_entry(&mut self, diag: &mut Diagnostics) -> Result<(), DdfError> {
        let Some(Scratch { slot, mut thing }) = self.current.take() else {
            return Ok(());
        };
        resolve_group(&mut thing.states, &mut self.redirs, diag)?;
        self.check(&mut thing, diag)?;

        match slot {
            Some(idx) => {
                self.db.things.set(idx, thing);
                self.db.things.move_to_end(idx);
            }
            None => {
                self.db.things.push(thing);
            }
        }
        Ok(())
    }

    fn clear_all(&mut self, _diag: &mut Diagnostics) -> Result<(), DdfError> {
        log::info!(
            "#CLEARALL: {} things tombstoned",
            self.db.things.len() - self.db.things.disabled_count()
        );
        self.db.things.disable_all();
        Ok(())
    }
}
