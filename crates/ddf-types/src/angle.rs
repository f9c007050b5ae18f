use serde::Serialize;

/// Binary angle: a full turn maps onto the whole `u32` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Angle(pub u32);

const FULL_TURN: f64 = 4_294_967_296.0;

impl Angle {
    pub const ANG0: Self = Self(0);
    pub const ANG45: Self = Self(0x2000_0000);
    pub const ANG90: Self = Self(0x4000_0000);
    pub const ANG180: Self = Self(0x8000_0000);
    pub const ANG270: Self = Self(0xC000_0000);
    pub const MAX: Self = Self(u32::MAX);

    /// Convert degrees, wrapping anything outside `0..360`.
    pub fn from_degrees(deg: f32) -> Self {
        let turns = f64::from(deg) / 360.0;
        let frac = turns - turns.floor();
        Self(((frac * FULL_TURN) as u64 & 0xFFFF_FFFF) as u32)
    }

    pub fn to_degrees(self) -> f32 {
        (f64::from(self.0) * 360.0 / FULL_TURN) as f32
    }

    /// Tangent of the angle, used for vertical slopes.
    pub fn tan(self) -> f32 {
        let deg = f64::from(self.0) * 360.0 / FULL_TURN;
        deg.to_radians().tan() as f32
    }
}
