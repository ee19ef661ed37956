//! Compile-time tunables.
//!
//! Values the state machine and the vblank tasks share. Anything that is purely
//! a register address lives next to the register block in [`crate::ppu`] or
//! [`crate::mapper`] instead.

/// Player positions are fixed point; shift right by this much for pixels.
pub const PLAYER_POSITION_SHIFT: u8 = 4;

/// Pixel coordinate the player spawns at on both axes.
pub const PLAYER_SPAWN_PIXEL: u16 = 128;

/// Marker for "the player hasn't touched a sprite".
pub const NO_SPRITE_HIT: u8 = 0xff;

/// Marker for "no crack tile on this screen".
pub const NO_CRACK: u8 = 0xff;

/// One entry per overworld tile.
pub const WORLD_STATE_LEN: usize = 64;

/// Highest layer the game progresses to.
pub const MAX_LAYER: u8 = 4;

/// Pattern table the sprites render from. Backgrounds keep table 0.
pub const SPRITE_PATTERN_BANK: u8 = 1;

/// First CHR bank holding background tiles. Each layer uses `CHR_BANK_TILES + layer`,
/// and its corrupted twin sits [`ALT_BANK_OFFSET`] banks further on.
pub const CHR_BANK_TILES: u8 = 0;
pub const ALT_BANK_OFFSET: u8 = 2;

/// OAM byte offset of the first enemy sprite; everything past it belongs to the map.
pub const FIRST_ENEMY_SPRITE_OAM_INDEX: u8 = 40;

/// OAM byte holding the Y coordinate of the sprite parked during screen scrolls.
pub const PARKED_SPRITE_OAM_Y: u8 = 0x04;

/// Y coordinate that keeps a sprite below the visible area.
pub const SPRITE_OFFSCREEN: u8 = 0xee;

/// Music track numbers. Layer songs are consecutive, starting at `SONG_LAYERS`.
pub const SONG_TITLE: u8 = 0;
pub const SONG_LAYERS: u8 = 1;

pub const SFX_GAMEOVER: u8 = 0;
pub const SFX_WIN: u8 = 1;

/// Only the top nibble of the frame counter drives the corruption timing,
/// so each phase lasts 16 frames.
pub const FRAME_PHASE_MASK: u8 = 0xf0;

/// Busy-wait length after a fake scroll write, so the bad scroll lands mid-frame.
pub const SCROLL_HOLD_SPINS: u8 = 200;

/// Which frame phases (`frame_count & FRAME_PHASE_MASK`) a glitch may fire in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameWindow {
    Below(u8),
    Exactly(u8),
    Above(u8),
}

impl FrameWindow {
    #[inline(always)]
    pub const fn contains(self, phase: u8) -> bool {
        match self {
            FrameWindow::Below(limit) => phase < limit,
            FrameWindow::Exactly(at) => phase == at,
            FrameWindow::Above(limit) => phase > limit,
        }
    }
}

/// Corruption intensity for one layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CorruptionTuning {
    pub layer: u8,
    /// Phases where a fake scroll write may happen.
    pub scroll_window: FrameWindow,
    /// Phases where the corrupted tile bank may be swapped in.
    pub bank_window: FrameWindow,
    /// A PRNG draw must be strictly above this for a glitch to fire.
    pub draw_floor: u8,
}

pub const CORRUPTION_TUNING: [CorruptionTuning; 2] = [
    CorruptionTuning {
        layer: 3,
        scroll_window: FrameWindow::Below(0x40),
        bank_window: FrameWindow::Exactly(0x20),
        draw_floor: 200,
    },
    CorruptionTuning {
        layer: 4,
        scroll_window: FrameWindow::Above(0xb0),
        bank_window: FrameWindow::Above(0x90),
        draw_floor: 100,
    },
];

impl CorruptionTuning {
    /// Tuning for `layer`, or `None` when the layer is still clean.
    pub fn for_layer(layer: u8) -> Option<&'static CorruptionTuning> {
        CORRUPTION_TUNING.iter().find(|t| t.layer == layer)
    }
}
