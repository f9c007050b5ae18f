/// Fraction in `0.0..=1.0` for ordinary percentages (`50%` is `0.5`).
pub type Percent = f32;

/// Game ticks.
pub type Tics = i32;

/// Ticks per second.
pub const TICRATE: Tics = 35;

/// Up to 31 lettered classes (`A` is bit 0).
pub type BitSet = u32;

pub const BITSET_EMPTY: BitSet = 0;
pub const BITSET_FULL: BitSet = 0x7FFF_FFFF;

/// Make a [`Percent`] from a whole-number percentage.
pub const fn percent(p: u8) -> Percent {
    p as f32 / 100.0
}
