use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// Basic thing flags (`SPECIAL = ...` names map onto these).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct MobjFlags: u32 {
        const SPECIAL       = 1 << 0;
        const SOLID         = 1 << 1;
        const SHOOTABLE     = 1 << 2;
        const NO_SECTOR     = 1 << 3;
        const NO_BLOCKMAP   = 1 << 4;
        const AMBUSH        = 1 << 5;
        const SPAWN_CEILING = 1 << 8;
        const NO_GRAVITY    = 1 << 9;
        const DROPOFF       = 1 << 10;
        const PICKUP        = 1 << 11;
        const NO_CLIP       = 1 << 12;
        const SLIDE         = 1 << 13;
        const FLOAT         = 1 << 14;
        const TELEPORT      = 1 << 15;
        const MISSILE       = 1 << 16;
        const DROPPED       = 1 << 17;
        const FUZZY         = 1 << 18;
        const NO_BLOOD      = 1 << 19;
        const CORPSE        = 1 << 20;
        const COUNT_KILL    = 1 << 22;
        const COUNT_ITEM    = 1 << 23;
        const SKULL_FLY     = 1 << 24;
        const NOT_DMATCH    = 1 << 25;
        const STEALTH       = 1 << 26;
        const TOUCHY        = 1 << 28;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct ExtendedFlags: u32 {
        const EXPLODE_IMMUNE   = 1 << 0;
        const NO_RESPAWN       = 1 << 2;
        const NO_GRAV_KILL     = 1 << 3;
        const DISLOYAL_TYPE    = 1 << 4;
        const OWN_ATTACK_HURTS = 1 << 5;
        const TRIGGER_HAPPY    = 1 << 8;
        const NEVER_TARGET     = 1 << 9;
        const NO_GRUDGE        = 1 << 10;
        const NO_RESURRECT     = 1 << 12;
        const BOUNCE           = 1 << 13;
        const EDGE_WALKER      = 1 << 14;
        const GRAV_FALL        = 1 << 15;
        const CLIMBABLE        = 1 << 16;
        const WATER_WALKER     = 1 << 17;
        const MONSTER          = 1 << 18;
        const CROSS_LINES      = 1 << 19;
        const NO_FRICTION      = 1 << 20;
        const USABLE           = 1 << 23;
        const BLOCK_SHOTS      = 1 << 24;
        const TUNNEL           = 1 << 26;
        const SIMPLE_ARMOUR    = 1 << 27;
        const ALWAYS_LOUD      = 1 << 29;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct HyperFlags: u32 {
        const FORCE_PICKUP   = 1 << 0;
        const SIDE_IMMUNE    = 1 << 1;
        const SIDE_GHOST     = 1 << 2;
        const ULTRA_LOYAL    = 1 << 3;
        const NO_ZBUFFER     = 1 << 4;
        const HOVER          = 1 << 5;
        const PUSHABLE       = 1 << 6;
        const POINT_FORCE    = 1 << 7;
        const PASS_MISSILE   = 1 << 8;
        const INVULNERABLE   = 1 << 9;
        const VAMPIRE        = 1 << 10;
        const NO_AUTOAIM     = 1 << 13;
        const TILT           = 1 << 15;
        const IMMORTAL       = 1 << 16;
        const SILENT_PICKUP  = 1 << 17;
        const FLOOR_CLIP     = 1 << 18;
        /// Dynamic light was converted from the old quadratic model.
        const QUADRATIC_COMPAT = 1 << 19;
    }
}
