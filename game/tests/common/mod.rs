#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use rift::{
    Banked, CrashReport, Diagnostics, FrameSync, GameLoop, PauseOutcome, PrgBank, Prng, Progress,
    Routine, Session, Sfx, SfxChannel, Song, Sound, System, Video,
};

/// Everything the loop asked the outside world to do, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Publish(Progress),
    WaitVblank,
    PpuOff,
    PpuOnAll,
    FadeIn,
    FadeOut,
    FadeOutInstant,
    OamHideRest(u8),
    ParkSprite(u8, u8),
    SpriteBank(u8),
    Music(Song),
    StopMusic,
    Sfx(Sfx, SfxChannel),
    Seed(u16),
    Crash(CrashReport),
    Reset,
    Banked(PrgBank, Routine),
    PauseMenu(PrgBank),
}

pub type Log = Rc<RefCell<Vec<Call>>>;

pub struct RecordingConsole {
    pub log: Log,
    pub frames: u8,
}

impl RecordingConsole {
    fn push(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }
}

impl FrameSync for RecordingConsole {
    fn publish(&mut self, progress: Progress) {
        self.push(Call::Publish(progress));
    }
    fn wait_vblank(&mut self) {
        self.frames = self.frames.wrapping_add(1);
        self.push(Call::WaitVblank);
    }
    fn frame_count(&self) -> u8 {
        self.frames
    }
}

impl Video for RecordingConsole {
    fn ppu_off(&mut self) {
        self.push(Call::PpuOff);
    }
    fn ppu_on_all(&mut self) {
        self.push(Call::PpuOnAll);
    }
    fn fade_in(&mut self) {
        self.push(Call::FadeIn);
    }
    fn fade_out(&mut self) {
        self.push(Call::FadeOut);
    }
    fn fade_out_instant(&mut self) {
        self.push(Call::FadeOutInstant);
    }
    fn oam_hide_rest(&mut self, first: u8) {
        self.push(Call::OamHideRest(first));
    }
    fn park_sprite(&mut self, offset: u8, y: u8) {
        self.push(Call::ParkSprite(offset, y));
    }
    fn set_sprite_bank(&mut self, bank: u8) {
        self.push(Call::SpriteBank(bank));
    }
}

impl Sound for RecordingConsole {
    fn play_music(&mut self, song: Song) {
        self.push(Call::Music(song));
    }
    fn stop_music(&mut self) {
        self.push(Call::StopMusic);
    }
    fn play_sfx(&mut self, sfx: Sfx, channel: SfxChannel) {
        self.push(Call::Sfx(sfx, channel));
    }
}

impl Prng for RecordingConsole {
    fn set_seed(&mut self, seed: u16) {
        self.push(Call::Seed(seed));
    }
    fn rand8(&mut self) -> u8 {
        0
    }
}

impl Diagnostics for RecordingConsole {
    fn crash(&mut self, report: &CrashReport) {
        self.push(Call::Crash(*report));
    }
}

impl System for RecordingConsole {
    fn reset(&mut self) {
        self.push(Call::Reset);
    }
}

pub type Hook = Box<dyn FnMut(&mut Session)>;

/// Banked routines that do nothing unless a test hooks them.
pub struct ScriptedRoutines {
    pub log: Log,
    pub hooks: HashMap<Routine, Hook>,
    pub pause_outcome: PauseOutcome,
}

impl ScriptedRoutines {
    pub fn on(&mut self, routine: Routine, hook: impl FnMut(&mut Session) + 'static) {
        self.hooks.insert(routine, Box::new(hook));
    }
}

impl Banked for ScriptedRoutines {
    fn banked_call(&mut self, bank: PrgBank, routine: Routine, session: &mut Session) {
        self.log.borrow_mut().push(Call::Banked(bank, routine));
        if let Some(hook) = self.hooks.get_mut(&routine) {
            hook(session);
        }
    }

    fn pause_menu(&mut self, bank: PrgBank, _session: &mut Session) -> PauseOutcome {
        self.log.borrow_mut().push(Call::PauseMenu(bank));
        self.pause_outcome
    }
}

pub type TestLoop = GameLoop<RecordingConsole, ScriptedRoutines>;

pub fn game() -> (TestLoop, Log) {
    let log: Log = Rc::default();
    let console = RecordingConsole {
        log: log.clone(),
        frames: 0,
    };
    let routines = ScriptedRoutines {
        log: log.clone(),
        hooks: HashMap::new(),
        pause_outcome: PauseOutcome::Resume,
    };
    (GameLoop::new(console, routines), log)
}

/// Drain and return everything logged so far.
pub fn take(log: &Log) -> Vec<Call> {
    std::mem::take(&mut *log.borrow_mut())
}

pub fn banked(routine: Routine) -> Call {
    Call::Banked(routine.bank(), routine)
}
