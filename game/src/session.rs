//! Everything that survives from one frame to the next.
//!
//! On the console this is the block of RAM the C runtime calls "globals". Here it
//! is one struct owned by the [`GameLoop`](crate::GameLoop) and lent to every
//! banked routine it calls. The layouts are `#[repr(C)]` because the banked C
//! routines read and write the same bytes.

use crate::{
    config::{NO_SPRITE_HIT, PLAYER_POSITION_SHIFT, PLAYER_SPAWN_PIXEL, WORLD_STATE_LEN},
    error::GameError,
    state::GameState,
    vblank::Progress,
};

#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum WorldId {
    #[default]
    Overworld,
    Underworld,
}

#[repr(C)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerState {
    /// Fixed point, see [`PLAYER_POSITION_SHIFT`].
    pub x: u16,
    pub y: u16,
    pub direction: Direction,
    pub health: u8,
    pub max_health: u8,
    pub key_count: u8,
    /// Which overworld tile the player is on, 0-62.
    pub overworld_position: u8,
    pub last_collision: u8,
}

impl PlayerState {
    /// A fresh player at the start of a new game.
    pub const fn spawn() -> Self {
        Self {
            x: PLAYER_SPAWN_PIXEL << PLAYER_POSITION_SHIFT,
            y: PLAYER_SPAWN_PIXEL << PLAYER_POSITION_SHIFT,
            direction: Direction::Down,
            health: 1,
            max_health: 1,
            key_count: 0,
            overworld_position: 0,
            last_collision: NO_SPRITE_HIT,
        }
    }

    #[inline]
    pub const fn pixel_x(&self) -> u8 {
        (self.x >> PLAYER_POSITION_SHIFT) as u8
    }

    #[inline]
    pub const fn pixel_y(&self) -> u8 {
        (self.y >> PLAYER_POSITION_SHIFT) as u8
    }
}

/// Where the player comes back after dying.
#[repr(C)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckpointState {
    pub screen_id: u8,
    pub layer: u8,
    pub key_count: u8,
    pub x: u16,
    pub y: u16,
    /// Owned by the map code; the loop only ever clears it.
    pub world_state: [u8; WORLD_STATE_LEN],
}

impl Default for CheckpointState {
    fn default() -> Self {
        Self {
            screen_id: 0,
            layer: 0,
            key_count: 0,
            x: 0,
            y: 0,
            world_state: [0; WORLD_STATE_LEN],
        }
    }
}

impl CheckpointState {
    /// Snapshot of `player` on `layer`, with a clean world.
    pub fn capture(player: &PlayerState, layer: u8) -> Self {
        Self {
            screen_id: player.overworld_position,
            layer,
            key_count: player.key_count,
            x: player.x,
            y: player.y,
            world_state: [0; WORLD_STATE_LEN],
        }
    }
}

#[repr(C)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    // raw so a stray write shows up as a crash instead of being unrepresentable
    state: u8,
    pub player: PlayerState,
    pub world: WorldId,
    /// Progression tier, 0 through [`MAX_LAYER`](crate::config::MAX_LAYER).
    pub layer: u8,
    pub checkpoint: CheckpointState,
    pub nearest_crack: u8,
    /// Counts down while a crack tile is forming. Zero means idle.
    pub crack_timer: u8,
    pub death_count: u8,
    /// Flips once per main loop iteration, for half-rate work.
    pub every_other_cycle: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::power_on()
    }
}

impl Session {
    /// RAM as it looks right after power on: zeroed, nothing initialized.
    pub fn power_on() -> Self {
        Self {
            state: GameState::SystemInit.raw(),
            player: PlayerState::default(),
            world: WorldId::Overworld,
            layer: 0,
            checkpoint: CheckpointState::default(),
            nearest_crack: 0,
            crack_timer: 0,
            death_count: 0,
            every_other_cycle: false,
        }
    }

    pub fn state(&self) -> Result<GameState, GameError> {
        GameState::try_from(self.state)
    }

    #[inline(always)]
    pub fn raw_state(&self) -> u8 {
        self.state
    }

    #[inline(always)]
    pub fn set_state(&mut self, state: GameState) {
        self.state = state.raw();
    }

    /// Store a byte with no validation. The loop crashes on it if it isn't a state.
    #[inline(always)]
    pub fn set_raw_state(&mut self, raw: u8) {
        self.state = raw;
    }

    #[inline(always)]
    pub fn is(&self, state: GameState) -> bool {
        self.state == state.raw()
    }

    /// The read-only view handed to the vblank tasks.
    pub fn progress(&self) -> Progress {
        Progress {
            state: self.state,
            layer: self.layer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_is_centered() {
        let player = PlayerState::spawn();
        assert_eq!(player.pixel_x(), 128);
        assert_eq!(player.pixel_y(), 128);
        assert_eq!(player.x, 128 << 4);
    }

    #[test]
    fn checkpoint_capture_mirrors_player() {
        let mut player = PlayerState::spawn();
        player.overworld_position = 12;
        player.key_count = 3;
        player.x = 0x0420;

        let checkpoint = CheckpointState::capture(&player, 2);
        assert_eq!(checkpoint.screen_id, 12);
        assert_eq!(checkpoint.key_count, 3);
        assert_eq!(checkpoint.layer, 2);
        assert_eq!(checkpoint.x, 0x0420);
        assert!(checkpoint.world_state.iter().all(|&b| b == 0));
    }

    #[test]
    fn raw_state_round_trips_through_progress() {
        let mut session = Session::power_on();
        session.set_state(GameState::Running);
        session.layer = 3;
        assert!(session.is(GameState::Running));
        assert_eq!(session.progress(), Progress { state: 10, layer: 3 });

        session.set_raw_state(0x99);
        assert_eq!(session.state(), Err(GameError::UnknownGameState(0x99)));
    }
}
