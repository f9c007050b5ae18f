use serde::Serialize;
use strum::{EnumIter, FromRepr};

use crate::angle::Angle;
use crate::rgb::Rgb;
use crate::units::{BITSET_EMPTY, BitSet, Percent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, EnumIter, FromRepr)]
#[repr(u8)]
pub enum DLightType {
    #[default]
    None = 0,
    Modulate = 1,
    Add = 2,
    CompatLinear = 3,
    CompatQuadratic = 4,
}

/// Dynamic light attached to a thing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DLight {
    pub kind: DLightType,
    pub shape: String,
    pub radius: f32,
    pub colour: Rgb,
    pub height: Percent,
    pub leaky: bool,
}

impl Default for DLight {
    fn default() -> Self {
        Self {
            kind: DLightType::None,
            shape: "DLIGHT_EXP".into(),
            radius: 32.0,
            colour: Rgb::WHITE,
            height: 0.5,
            leaky: false,
        }
    }
}

/// Where and by what a thing is extra vulnerable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Weakness {
    pub height: [Percent; 2],
    pub angle: [Angle; 2],
    pub classes: BitSet,
    pub multiply: f32,
    /// Negative when disabled.
    pub painchance: Percent,
}

impl Default for Weakness {
    fn default() -> Self {
        Self {
            height: [0.0, 1.0],
            angle: [Angle::ANG0, Angle::MAX],
            classes: BITSET_EMPTY,
            multiply: 2.5,
            painchance: -1.0,
        }
    }
}
