//! Work done on the vertical blank tick itself, outside the main loop.
//!
//! The main loop only ever *publishes* a [`Progress`] snapshot; the tasks here
//! read it and never write back into the session.

use log::{trace, warn};

use crate::{
    config::MAX_LAYER,
    corruption::{Corruption, Raster},
    platform::Prng,
    state::GameState,
};

/// The slice of session state the vblank tasks may look at.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    /// Raw game state byte.
    pub state: u8,
    pub layer: u8,
}

impl Progress {
    #[inline(always)]
    pub fn is_running(&self) -> bool {
        self.state == GameState::Running.raw()
    }

    /// A known state and a layer that exists.
    pub fn is_valid(&self) -> bool {
        GameState::try_from(self.state).is_ok() && self.layer <= MAX_LAYER
    }
}

/// Counts vertical blanks. Wraps every 256 frames.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameClock {
    count: u8,
}

impl FrameClock {
    pub const fn new() -> Self {
        Self { count: 0 }
    }

    #[inline(always)]
    pub fn tick(&mut self) -> u8 {
        self.count = self.count.wrapping_add(1);
        self.count
    }

    #[inline(always)]
    pub fn count(&self) -> u8 {
        self.count
    }
}

/// Everything run once per vertical blank.
#[derive(Debug, Default)]
pub struct VblankTasks {
    pub clock: FrameClock,
    progress: Progress,
    corruption: Corruption,
}

impl VblankTasks {
    pub const fn new() -> Self {
        Self {
            clock: FrameClock::new(),
            progress: Progress { state: 0, layer: 0 },
            corruption: Corruption::new(),
        }
    }

    #[inline(always)]
    pub fn publish(&mut self, progress: Progress) {
        self.progress = progress;
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn on_vblank<R, H>(&mut self, rng: &mut R, raster: &mut H)
    where
        R: Prng + ?Sized,
        H: Raster + ?Sized,
    {
        let frame = self.clock.tick();
        if !self.progress.is_valid() {
            warn!("vblank {frame}: skipping effects, bad progress {:?}", self.progress);
            return;
        }
        trace!("vblank {frame} ({:?})", self.progress);
        self.corruption.on_vblank(self.progress, frame, rng, raster);
    }
}
