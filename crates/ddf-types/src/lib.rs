pub mod action;
pub mod angle;
pub mod damage;
pub mod dlight;
pub mod keys;
pub mod label_offset;
pub mod mobj_flags;
pub mod rgb;
pub mod state;
pub mod thing;
pub mod units;
pub mod when_appear;

pub use action::{ActionParam, BecomeInfo, JumpInfo};
pub use angle::Angle;
pub use damage::{Damage, DamageDefault};
pub use dlight::{DLight, DLightType, Weakness};
pub use keys::Keys;
pub use label_offset::LabelOffset;
pub use mobj_flags::{ExtendedFlags, HyperFlags, MobjFlags};
pub use rgb::{Rgb, RgbParseError};
pub use state::{NextRef, S_NULL, State, StateFlags, StateGroup, StateNum, StateRange};
pub use thing::{MobjType, RIDE_FRICTION, ThingAction, ThingStarter};
pub use units::{BITSET_EMPTY, BITSET_FULL, BitSet, Percent, TICRATE, Tics, percent};
pub use when_appear::WhenAppear;
