use rift::{
    CrashReport, Diagnostics, FrameSync, Galois16, Prng, Progress, Raster, Sfx, SfxChannel, Song,
    Sound, System, VblankTasks, Video,
    ppu::PpuCtrl,
};
use tracing::{debug, error, info, trace};

/// What the raster effect did, frame by frame.
#[derive(Debug, Default)]
pub struct SimRaster {
    pub chr_bank_0: u8,
    pub scroll_writes: u32,
    pub corrupted_frames: u32,
    pub status_reads: u32,
}

impl Raster for SimRaster {
    fn read_status(&mut self) -> u8 {
        self.status_reads += 1;
        // vblank flag
        0x80
    }

    fn write_scroll(&mut self, value: u8) {
        trace!("fake scroll {value:#04x}");
        self.scroll_writes += 1;
    }

    fn hold(&mut self, _spins: u8) {}

    fn set_chr_bank_0(&mut self, bank: u8) {
        if bank != self.chr_bank_0 {
            trace!("chr bank 0 -> {bank}");
        }
        self.chr_bank_0 = bank;
    }
}

/// A console with no screen: fades take frames, music is just a track number.
pub struct SimConsole {
    tasks: VblankTasks,
    rng: Galois16,
    pub raster: SimRaster,
    pub ppu_ctrl: PpuCtrl,
    pub rendering: bool,
    pub music: Option<u8>,
    pub vblanks: u64,
    pub crash: Option<CrashReport>,
    pub resets: u32,
    fade_frames: u8,
    /// Stands in for the frame-counter seed at the start of each game.
    seeded: Option<Galois16>,
}

impl SimConsole {
    pub fn new(fade_frames: u8, seeded: Option<Galois16>) -> Self {
        Self {
            tasks: VblankTasks::new(),
            rng: Galois16::new(),
            raster: SimRaster::default(),
            ppu_ctrl: PpuCtrl::NMI_ENABLE,
            rendering: false,
            music: None,
            vblanks: 0,
            crash: None,
            resets: 0,
            fade_frames,
            seeded,
        }
    }

    fn vblank(&mut self) {
        let before = self.raster.scroll_writes;
        self.tasks.on_vblank(&mut self.rng, &mut self.raster);
        if self.raster.scroll_writes != before {
            self.raster.corrupted_frames += 1;
        }
        self.vblanks += 1;
    }

    fn fade(&mut self, label: &str) {
        debug!("{label} over {} frames", self.fade_frames);
        for _ in 0..self.fade_frames {
            self.vblank();
        }
    }
}

impl FrameSync for SimConsole {
    fn publish(&mut self, progress: Progress) {
        self.tasks.publish(progress);
    }

    fn wait_vblank(&mut self) {
        self.vblank();
    }

    fn frame_count(&self) -> u8 {
        self.tasks.clock.count()
    }
}

impl Video for SimConsole {
    fn ppu_off(&mut self) {
        self.rendering = false;
    }

    fn ppu_on_all(&mut self) {
        self.rendering = true;
    }

    fn fade_in(&mut self) {
        self.fade("fade in");
    }

    fn fade_out(&mut self) {
        self.fade("fade out");
    }

    fn fade_out_instant(&mut self) {
        debug!("fade out (instant)");
    }

    fn oam_hide_rest(&mut self, first: u8) {
        trace!("hide sprites from oam {first}");
    }

    fn park_sprite(&mut self, offset: u8, y: u8) {
        trace!("park sprite at oam {offset}, y = {y:#04x}");
    }

    fn set_sprite_bank(&mut self, bank: u8) {
        self.ppu_ctrl = self.ppu_ctrl.with_sprite_bank(bank);
        debug!("ppuctrl = {:#010b}", self.ppu_ctrl.bits());
    }
}

impl Sound for SimConsole {
    fn play_music(&mut self, song: Song) {
        info!(?song, "music");
        self.music = Some(song.id());
    }

    fn stop_music(&mut self) {
        self.music = None;
    }

    fn play_sfx(&mut self, sfx: Sfx, channel: SfxChannel) {
        info!(?sfx, ?channel, "sfx");
    }
}

impl Prng for SimConsole {
    fn set_seed(&mut self, seed: u16) {
        match self.seeded {
            Some(rng) => {
                debug!("prng seed {seed:#06x} replaced by {rng:?}");
                self.rng = rng;
            }
            None => {
                debug!("prng seeded with {seed:#06x}");
                self.rng.set_seed(seed);
            }
        }
    }

    fn rand8(&mut self) -> u8 {
        self.rng.rand8()
    }
}

impl Diagnostics for SimConsole {
    fn crash(&mut self, report: &CrashReport) {
        error!(
            code = report.code as u8,
            value = report.value,
            "{}: {}",
            report.explanation.to_string_lossy(),
            report.label.to_string_lossy(),
        );
        self.crash = Some(*report);
    }
}

impl System for SimConsole {
    fn reset(&mut self) {
        info!("console reset");
        self.resets += 1;
    }
}
