use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// Keys needed to activate something.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct Keys: u32 {
        const BLUE_CARD    = 1 << 0;
        const YELLOW_CARD  = 1 << 1;
        const RED_CARD     = 1 << 2;
        const GREEN_CARD   = 1 << 3;

        const BLUE_SKULL   = 1 << 4;
        const YELLOW_SKULL = 1 << 5;
        const RED_SKULL    = 1 << 6;
        const GREEN_SKULL  = 1 << 7;

        const GOLD_KEY     = 1 << 8;
        const SILVER_KEY   = 1 << 9;
        const BRASS_KEY    = 1 << 10;
        const COPPER_KEY   = 1 << 11;
        const STEEL_KEY    = 1 << 12;
        const WOODEN_KEY   = 1 << 13;
        const FIRE_KEY     = 1 << 14;
        const WATER_KEY    = 1 << 15;

        /// Every listed key is needed, not just one of them.
        const STRICTLY_ALL = 1 << 16;

        const CARDS  = 0x000F;
        const SKULLS = 0x00F0;
    }
}
