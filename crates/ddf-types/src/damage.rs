use serde::Serialize;
use strum::{EnumCount, EnumIter};

use crate::label_offset::LabelOffset;
use crate::units::{TICRATE, Tics};

/// Which set of defaults a [`Damage`] record starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter, EnumCount)]
pub enum DamageDefault {
    Mobj,
    MobjChoke,
    Sector,
    Attack,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Damage {
    pub nominal: f32,
    /// Upper bound for linear random damage; negative when unused.
    pub linear_max: f32,
    /// Spread for random damage; negative when unused.
    pub error: f32,
    pub delay: Tics,

    pub obituary: String,
    pub pain: LabelOffset,
    pub death: LabelOffset,
    pub overkill: LabelOffset,

    pub no_armour: bool,
}

impl Damage {
    pub fn new(kind: DamageDefault) -> Self {
        let mut d = Self {
            nominal: 0.0,
            linear_max: -1.0,
            error: -1.0,
            delay: 0,
            obituary: String::new(),
            pain: LabelOffset::default(),
            death: LabelOffset::default(),
            overkill: LabelOffset::default(),
            no_armour: false,
        };
        match kind {
            DamageDefault::MobjChoke => {
                d.nominal = 6.0;
                d.linear_max = 14.0;
                d.delay = 2 * TICRATE;
                d.obituary = "OB_DROWN".into();
                d.no_armour = true;
            }
            DamageDefault::Sector => {
                d.delay = 31;
            }
            DamageDefault::Mobj | DamageDefault::Attack => {}
        }
        d
    }
}

impl Default for Damage {
    fn default() -> Self {
        Self::new(DamageDefault::Mobj)
    }
}
