//! # Rift runtime core
//!
//! The frame loop and game state machine for Rift, plus the raster-timed
//! "corruption" effect that runs from the vertical blank handler.
//!
//! Everything that draws, plays sound, or reads the controller lives behind the
//! traits in [`platform`], so the loop can run on the console (`target_arch = "mos"`)
//! or inside the host simulator and tests.
//!
//! ```text
//!  power on ─▶ GameLoop::run ─▶ dispatch(state) ─▶ publish ─▶ wait_vblank ─┐
//!                   ▲                                                   │
//!                   └───────────────────────────────────────────────────┘
//!  vblank  ─▶ VblankTasks::on_vblank ─▶ FrameClock::tick ─▶ Corruption
//! ```

#![cfg_attr(not(test), no_std)]
#![allow(static_mut_refs)]

pub mod banks;
pub mod config;
pub mod corruption;
pub mod error;
pub mod init;
pub mod machine;
pub mod mapper;
pub mod platform;
pub mod ppu;
pub mod prng;
pub mod session;
pub mod state;
pub mod vblank;

#[cfg(target_arch = "mos")]
pub mod nes;

pub use banks::{PrgBank, Routine};
pub use corruption::{Corruption, Raster};
pub use error::{CrashReport, ErrorCode, GameError};
pub use machine::{GameLoop, Halt};
pub use platform::{
    Banked, Console, Diagnostics, FrameSync, PauseOutcome, Prng, Sfx, SfxChannel, Song, Sound,
    System, Video,
};
pub use prng::Galois16;
pub use session::{CheckpointState, Direction, PlayerState, Session, WorldId};
pub use state::GameState;
pub use vblank::{FrameClock, Progress, VblankTasks};
