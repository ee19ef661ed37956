//! Console bindings: the platform traits on top of the cartridge's C runtime.
//!
//! The runtime's crt0 calls [`main`] once RAM is set up, and its NMI handler
//! calls [`do_ppu_mess`] once per vertical blank, after it has pushed OAM and
//! the palette.

use core::{ffi::c_char, mem::MaybeUninit, panic::PanicInfo};

use log::error;

use crate::{
    banks::{PrgBank, Routine},
    error::CrashReport,
    machine::GameLoop,
    mapper::Mmc1,
    platform::{
        Banked, Diagnostics, FrameSync, PauseOutcome, Prng, Sfx, SfxChannel, Song, Sound, System,
        Video,
    },
    ppu::{PpuRegisters, RasterPort},
    session::Session,
    vblank::{Progress, VblankTasks},
};

unsafe extern "C" {
    unsafe fn ppu_wait_nmi();
    unsafe fn ppu_off();
    unsafe fn ppu_on_all();
    unsafe fn oam_hide_rest(first: u8) -> u8;
    unsafe fn bank_spr(n: u8);

    unsafe fn music_play(song: u8);
    unsafe fn music_stop();
    unsafe fn sfx_play(sound: u8, channel: u8);

    unsafe fn set_rand(seed: u16);
    unsafe fn rand8() -> u8;

    unsafe fn fade_in();
    unsafe fn fade_out();
    unsafe fn fade_out_instant();

    unsafe fn reset() -> !;
    unsafe fn crash_error_use_banked_details(
        code: u8,
        explanation: *const c_char,
        label: *const c_char,
        value: u16,
    ) -> !;

    /// Maps `bank` at `$8000`, calls `routine`, then maps the caller's bank back.
    unsafe fn banked_call(bank: u8, routine: unsafe extern "C" fn());

    unsafe fn draw_title_screen();
    unsafe fn handle_title_input();
    unsafe fn draw_intro();
    unsafe fn draw_warning();
    unsafe fn load_map();
    unsafe fn draw_current_map_to_a();
    unsafe fn init_map();
    unsafe fn load_sprites();
    unsafe fn draw_hud();
    unsafe fn update_hud();
    unsafe fn update_map_sprites();
    unsafe fn handle_player_movement();
    unsafe fn update_player_sprite();
    unsafe fn do_scroll_screen_transition();
    unsafe fn do_fade_screen_transition();
    unsafe fn draw_game_text();
    unsafe fn draw_pause_screen();
    unsafe fn handle_pause_input();
    unsafe fn draw_game_over_screen();
    unsafe fn wait_for_start();
    unsafe fn restore_game_over();
    unsafe fn draw_win_screen();
    unsafe fn draw_credits_screen();
}

#[panic_handler]
fn panic(_panic: &PanicInfo<'_>) -> ! {
    loop {}
}

#[unsafe(no_mangle)]
pub extern "C" fn main() -> ! {
    let console = unsafe { Nes::new() };
    let halt = GameLoop::new(console, NesBanks).run();
    // crash and reset don't come back on hardware
    error!("main loop returned: {halt:?}");
    loop {}
}

/// Shadow OAM, copied to the PPU by the NMI handler.
const OAM_BUF: *mut [u8; 256] = 0x0200 as *mut [u8; 256];

#[unsafe(link_section = ".data.zp")]
static mut TASKS: VblankTasks = VblankTasks::new();

#[unsafe(no_mangle)]
pub extern "C" fn do_ppu_mess() {
    let mut raster = RasterPort {
        ppu: unsafe { PpuRegisters::new() },
        mapper: unsafe { Mmc1::new() },
    };
    unsafe { TASKS.on_vblank(&mut Neslib, &mut raster) };
}

/// The session as the banked C routines see it. Only initialized while one runs.
#[unsafe(export_name = "rift_session")]
static mut SHARED: MaybeUninit<Session> = MaybeUninit::uninit();

fn entry(routine: Routine) -> unsafe extern "C" fn() {
    match routine {
        Routine::DrawTitleScreen => draw_title_screen,
        Routine::HandleTitleInput => handle_title_input,
        Routine::DrawIntro => draw_intro,
        Routine::DrawWarning => draw_warning,
        Routine::LoadMap => load_map,
        Routine::DrawCurrentMap => draw_current_map_to_a,
        Routine::InitMap => init_map,
        Routine::LoadSprites => load_sprites,
        Routine::DrawHud => draw_hud,
        Routine::UpdateHud => update_hud,
        Routine::UpdateMapSprites => update_map_sprites,
        Routine::HandlePlayerMovement => handle_player_movement,
        Routine::UpdatePlayerSprite => update_player_sprite,
        Routine::ScrollScreenTransition => do_scroll_screen_transition,
        Routine::FadeScreenTransition => do_fade_screen_transition,
        Routine::DrawGameText => draw_game_text,
        Routine::DrawPauseScreen => draw_pause_screen,
        Routine::DrawGameOverScreen => draw_game_over_screen,
        Routine::WaitForStart => wait_for_start,
        Routine::RestoreGameOver => restore_game_over,
        Routine::DrawWinScreen => draw_win_screen,
        Routine::DrawCreditsScreen => draw_credits_screen,
    }
}

/// Banked game code, reached through the runtime's trampoline.
pub struct NesBanks;

impl NesBanks {
    fn run(bank: PrgBank, routine: unsafe extern "C" fn(), session: &mut Session) {
        unsafe {
            SHARED.write(session.clone());
            if bank.is_fixed() {
                routine();
            } else {
                banked_call(bank.number(), routine);
            }
            *session = SHARED.assume_init_read();
        }
    }
}

impl Banked for NesBanks {
    fn banked_call(&mut self, bank: PrgBank, routine: Routine, session: &mut Session) {
        Self::run(bank, entry(routine), session);
    }

    fn pause_menu(&mut self, bank: PrgBank, session: &mut Session) -> PauseOutcome {
        Self::run(bank, handle_pause_input, session);
        PauseOutcome::from_menu_state(session.raw_state())
    }
}

/// The runtime's PRNG, shared by the main loop and the NMI handler.
pub struct Neslib;

impl Prng for Neslib {
    #[inline(always)]
    fn set_seed(&mut self, seed: u16) {
        unsafe { set_rand(seed) }
    }

    #[inline(always)]
    fn rand8(&mut self) -> u8 {
        unsafe { rand8() }
    }
}

pub struct Nes {
    oam: &'static mut [u8; 256],
}

impl Nes {
    /// # Safety
    /// Call once; the returned value owns shadow OAM.
    pub unsafe fn new() -> Nes {
        Nes {
            oam: unsafe { &mut *OAM_BUF },
        }
    }
}

impl FrameSync for Nes {
    fn publish(&mut self, progress: Progress) {
        // two bytes; a torn read costs the effect at most one frame
        unsafe { TASKS.publish(progress) }
    }

    #[inline(always)]
    fn wait_vblank(&mut self) {
        unsafe { ppu_wait_nmi() }
    }

    fn frame_count(&self) -> u8 {
        unsafe { TASKS.clock.count() }
    }
}

impl Video for Nes {
    fn ppu_off(&mut self) {
        unsafe { ppu_off() }
    }

    fn ppu_on_all(&mut self) {
        unsafe { ppu_on_all() }
    }

    fn fade_in(&mut self) {
        unsafe { fade_in() }
    }

    fn fade_out(&mut self) {
        unsafe { fade_out() }
    }

    fn fade_out_instant(&mut self) {
        unsafe { fade_out_instant() }
    }

    fn oam_hide_rest(&mut self, first: u8) {
        unsafe { oam_hide_rest(first) };
    }

    fn park_sprite(&mut self, offset: u8, y: u8) {
        self.oam[offset as usize] = y;
    }

    fn set_sprite_bank(&mut self, bank: u8) {
        unsafe { bank_spr(bank) }
    }
}

impl Sound for Nes {
    fn play_music(&mut self, song: Song) {
        unsafe { music_play(song.id()) }
    }

    fn stop_music(&mut self) {
        unsafe { music_stop() }
    }

    fn play_sfx(&mut self, sfx: Sfx, channel: SfxChannel) {
        unsafe { sfx_play(sfx.id(), channel as u8) }
    }
}

impl Prng for Nes {
    fn set_seed(&mut self, seed: u16) {
        Neslib.set_seed(seed)
    }

    fn rand8(&mut self) -> u8 {
        Neslib.rand8()
    }
}

impl Diagnostics for Nes {
    fn crash(&mut self, report: &CrashReport) {
        unsafe {
            crash_error_use_banked_details(
                report.code as u8,
                report.explanation.as_ptr(),
                report.label.as_ptr(),
                report.value as u16,
            )
        }
    }
}

impl System for Nes {
    fn reset(&mut self) {
        unsafe { reset() }
    }
}
