//! Typed arguments attached to a state's action, e.g. the `25%` in
//! `JUMP(MISSILE,25%)`.

use serde::Serialize;

use crate::angle::Angle;
use crate::label_offset::LabelOffset;
use crate::rgb::Rgb;
use crate::units::Percent;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JumpInfo {
    /// Chance of taking the jump.
    pub chance: Percent,
}

impl Default for JumpInfo {
    fn default() -> Self {
        Self { chance: 1.0 }
    }
}

/// Target of a `BECOME` action: another thing type and where to start in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BecomeInfo {
    pub type_name: String,
    pub start: LabelOffset,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ActionParam {
    Integer(i32),
    IntPair(i32, i32),
    Float(f32),
    Percent(Percent),
    Angle(Angle),
    Slope(f32),
    Rgb(Rgb),
    /// Sound effect name, looked up by the audio side.
    Sound(String),
    /// Thing type name, resolved after all things are loaded.
    Thing(String),
    /// Attack name, resolved after all attacks are loaded.
    Attack(String),
    Jump(JumpInfo),
    Become(BecomeInfo),
}
