//! # Screen corruption
//!
//! On the last two layers the picture starts to come apart: every so often the
//! vblank handler writes garbage to `PPUSCROLL` and then stalls, so the bad
//! scroll takes effect partway down the frame, and it swaps background tiles
//! for a corrupted copy of the layer's CHR bank.
//!
//! | Layer | Fake scroll when phase | Corrupt tiles when phase | Draw must beat |
//! |-------|------------------------|--------------------------|----------------|
//! | 3     | `< 0x40`               | `== 0x20`                | 200            |
//! | 4     | `> 0xb0`               | `> 0x90`                 | 100            |
//!
//! where phase is `frame_count & 0xf0`. Nothing happens outside `Running`.
//!
//! PRNG draws happen in a fixed order and only when the frame check passes,
//! so the effect is reproducible from a seed.

use crate::{
    config::{ALT_BANK_OFFSET, CHR_BANK_TILES, CorruptionTuning, FRAME_PHASE_MASK, SCROLL_HOLD_SPINS},
    platform::Prng,
    vblank::Progress,
};

/// Hardware the effect pokes at.
pub trait Raster {
    /// Read `PPUSTATUS`, resetting the scroll/address latch.
    fn read_status(&mut self) -> u8;
    fn write_scroll(&mut self, value: u8);
    /// Burn roughly `spins` loop iterations.
    fn hold(&mut self, spins: u8);
    fn set_chr_bank_0(&mut self, bank: u8);
}

#[derive(Debug, Default)]
pub struct Corruption {
    // runs inside NMI, so it gets its own byte instead of borrowing a global
    scratch: u8,
}

impl Corruption {
    pub const fn new() -> Self {
        Self { scratch: 0 }
    }

    pub fn on_vblank<R, H>(&mut self, progress: Progress, frame_count: u8, rng: &mut R, raster: &mut H)
    where
        R: Prng + ?Sized,
        H: Raster + ?Sized,
    {
        if !progress.is_running() {
            return;
        }
        let Some(tuning) = CorruptionTuning::for_layer(progress.layer) else {
            return;
        };

        let phase = frame_count & FRAME_PHASE_MASK;

        if tuning.scroll_window.contains(phase) && rng.rand8() > tuning.draw_floor {
            self.scratch = rng.rand8();
            raster.read_status();
            raster.write_scroll(self.scratch);
            raster.write_scroll(rng.rand8());
            raster.hold(SCROLL_HOLD_SPINS);
        }

        let bank = CHR_BANK_TILES + progress.layer;
        if tuning.bank_window.contains(phase) && rng.rand8() > tuning.draw_floor {
            raster.set_chr_bank_0(bank + ALT_BANK_OFFSET);
        } else {
            raster.set_chr_bank_0(bank);
        }
    }
}
