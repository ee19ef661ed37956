//! # PPU registers
//!
//! The eight CPU-visible PPU registers, mirrored every 8 bytes through `$2000-$3FFF`.
//!
//! | Addr    | Name        | Access |
//! |---------|-------------|--------|
//! | `$2000` | `PPUCTRL`   | write  |
//! | `$2001` | `PPUMASK`   | write  |
//! | `$2002` | `PPUSTATUS` | read   |
//! | `$2003` | `OAMADDR`   | write  |
//! | `$2004` | `OAMDATA`   | r/w    |
//! | `$2005` | `PPUSCROLL` | write x2 |
//! | `$2006` | `PPUADDR`   | write x2 |
//! | `$2007` | `PPUDATA`   | r/w    |

use volatile_register::{RO, RW, WO};

use crate::{corruption::Raster, mapper::Mmc1};

#[repr(C)]
pub struct PpuRegisters {
    pub ctrl: WO<u8>,
    pub mask: WO<u8>,
    pub status: RO<u8>,
    pub oam_addr: WO<u8>,
    pub oam_data: RW<u8>,
    pub scroll: WO<u8>,
    pub addr: WO<u8>,
    pub data: RW<u8>,
}

impl PpuRegisters {
    /// # Safety
    /// Only one reference may exist; the NMI handler and main loop must not both hold one.
    pub unsafe fn new() -> &'static mut PpuRegisters {
        unsafe { &mut *(0x2000 as *mut PpuRegisters) }
    }
}

bitflags::bitflags! {
    /// `PPUCTRL` is write-only, so the runtime keeps a shadow copy of it.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct PpuCtrl: u8 {
        const NAMETABLE_X        = 0b0000_0001;
        const NAMETABLE_Y        = 0b0000_0010;
        /// VRAM address steps by 32 (down a row) instead of 1.
        const VRAM_INCREMENT_32  = 0b0000_0100;
        /// 8x8 sprites come from the pattern table at `$1000`.
        const SPRITE_TABLE_1     = 0b0000_1000;
        const BACKGROUND_TABLE_1 = 0b0001_0000;
        const SPRITE_8X16        = 0b0010_0000;
        const EXT_MASTER         = 0b0100_0000;
        /// Fire NMI at the start of vertical blank.
        const NMI_ENABLE         = 0b1000_0000;
    }
}

impl PpuCtrl {
    /// Point sprites at pattern table `bank` (0 or 1), as `bank_spr` does.
    #[inline]
    pub fn with_sprite_bank(self, bank: u8) -> Self {
        let mut ctrl = self;
        ctrl.set(PpuCtrl::SPRITE_TABLE_1, bank & 1 != 0);
        ctrl
    }
}

/// The raster hardware as the corruption effect sees it.
pub struct RasterPort<'a> {
    pub ppu: &'a mut PpuRegisters,
    pub mapper: Mmc1<'a>,
}

impl Raster for RasterPort<'_> {
    #[inline(always)]
    fn read_status(&mut self) -> u8 {
        self.ppu.status.read()
    }

    #[inline(always)]
    fn write_scroll(&mut self, value: u8) {
        unsafe { self.ppu.scroll.write(value) }
    }

    fn hold(&mut self, spins: u8) {
        for spin in 0..spins {
            core::hint::black_box(spin);
        }
    }

    fn set_chr_bank_0(&mut self, bank: u8) {
        self.mapper.set_chr_bank_0(bank);
    }
}
