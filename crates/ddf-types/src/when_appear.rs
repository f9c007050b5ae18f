use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// Skill levels and game modes in which something appears.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct WhenAppear: u16 {
        const SKILL1     = 0x0001;
        const SKILL2     = 0x0002;
        const SKILL3     = 0x0004;
        const SKILL4     = 0x0008;
        const SKILL5     = 0x0010;

        const SINGLE     = 0x0100;
        const COOP       = 0x0200;
        const DEATHMATCH = 0x0400;

        const SKILL_BITS = 0x001F;
        const NET_BITS   = 0x0700;
    }
}

impl WhenAppear {
    /// Flag for skill `1..=5`.
    pub fn skill(level: u8) -> Self {
        match level {
            1..=5 => Self::from_bits_truncate(1 << (level - 1)),
            _ => Self::empty(),
        }
    }
}

impl Default for WhenAppear {
    fn default() -> Self {
        Self::SKILL_BITS | Self::NET_BITS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_bits() {
        assert_eq!(WhenAppear::skill(1), WhenAppear::SKILL1);
        assert_eq!(WhenAppear::skill(5), WhenAppear::SKILL5);
        assert!(WhenAppear::skill(6).is_empty());
    }

    #[test]
    fn default_is_everywhere() {
        let all = WhenAppear::default();
        assert!(all.contains(WhenAppear::SKILL3 | WhenAppear::COOP));
    }
}
