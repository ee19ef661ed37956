//! The seams between the main loop and everything it drives.
//!
//! On the console these are bound to the C runtime in [`crate::nes`]; the
//! simulator and tests provide their own. Every call is synchronous: fades and
//! menus block (and wait on vblank themselves) until they are done.

use crate::{
    banks::{PrgBank, Routine},
    config::{SFX_GAMEOVER, SFX_WIN, SONG_LAYERS, SONG_TITLE},
    error::CrashReport,
    session::Session,
    state::GameState,
    vblank::Progress,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Song {
    Title,
    /// The track for a progression layer.
    Layer(u8),
}

impl Song {
    pub const fn id(self) -> u8 {
        match self {
            Song::Title => SONG_TITLE,
            Song::Layer(layer) => SONG_LAYERS + layer,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Sfx {
    GameOver,
    Win,
}

impl Sfx {
    pub const fn id(self) -> u8 {
        match self {
            Sfx::GameOver => SFX_GAMEOVER,
            Sfx::Win => SFX_WIN,
        }
    }
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SfxChannel {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
}

/// How the player left the pause menu.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PauseOutcome {
    Resume,
    GameOver,
}

impl PauseOutcome {
    /// The pause menu on the cartridge reports back through the state byte:
    /// `GameOver1` when the player quit, anything else when they resumed.
    pub fn from_menu_state(state: u8) -> Self {
        if state == GameState::GameOver1.raw() {
            PauseOutcome::GameOver
        } else {
            PauseOutcome::Resume
        }
    }
}

/// Vertical blank synchronization.
pub trait FrameSync {
    /// Make `progress` visible to the vblank tasks. Called at the points where
    /// the loop has finished mutating state for this frame.
    fn publish(&mut self, progress: Progress);

    /// Block until the next vertical blank has been handled.
    fn wait_vblank(&mut self);

    /// Frames since power on, wrapping.
    fn frame_count(&self) -> u8;
}

pub trait Video {
    fn ppu_off(&mut self);
    fn ppu_on_all(&mut self);

    fn fade_in(&mut self);
    fn fade_out(&mut self);
    fn fade_out_instant(&mut self);

    /// Hide every sprite from OAM byte offset `first` onward.
    fn oam_hide_rest(&mut self, first: u8);

    /// Push one sprite below the screen by writing `y` at OAM byte `offset`.
    fn park_sprite(&mut self, offset: u8, y: u8);

    /// Pattern table sprites draw from.
    fn set_sprite_bank(&mut self, bank: u8);
}

/// Fire and forget.
pub trait Sound {
    fn play_music(&mut self, song: Song);
    fn stop_music(&mut self);
    fn play_sfx(&mut self, sfx: Sfx, channel: SfxChannel);
}

pub trait Prng {
    fn set_seed(&mut self, seed: u16);
    fn rand8(&mut self) -> u8;
}

pub trait Diagnostics {
    /// Show the crash screen. On the console this never returns.
    fn crash(&mut self, report: &CrashReport);
}

pub trait System {
    /// Restart from the reset vector. On the console this never returns.
    fn reset(&mut self);
}

/// Everything the loop needs from the machine it runs on.
pub trait Console: FrameSync + Video + Sound + Prng + Diagnostics + System {}

impl<T: FrameSync + Video + Sound + Prng + Diagnostics + System> Console for T {}

/// The bank-call trampoline and the code behind it.
pub trait Banked {
    /// Map `bank`, run `routine`, and restore the previous mapping.
    fn banked_call(&mut self, bank: PrgBank, routine: Routine, session: &mut Session);

    /// Run the pause menu's own input loop until the player leaves it.
    fn pause_menu(&mut self, bank: PrgBank, session: &mut Session) -> PauseOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quitting_from_pause_is_game_over_1() {
        assert_eq!(
            PauseOutcome::from_menu_state(GameState::GameOver1.raw()),
            PauseOutcome::GameOver
        );
        // the menu leaves Running (or the state it was entered with) on resume
        for state in [GameState::Running, GameState::Paused, GameState::GameOver] {
            assert_eq!(PauseOutcome::from_menu_state(state.raw()), PauseOutcome::Resume);
        }
    }

    #[test]
    fn layer_songs_follow_title() {
        assert_eq!(Song::Title.id(), SONG_TITLE);
        assert_eq!(Song::Layer(3).id(), SONG_LAYERS + 3);
    }
}
