//! # The main loop
//!
//! One pass per frame: flip `every_other_cycle`, do the current state's work,
//! publish progress to the vblank tasks, wait for vblank.
//!
//! The scripted states (`PostTitle`, `GameOver1`, `Credits`) run their whole
//! sequence in a single pass. Fades and "press start" prompts block inside the
//! platform and wait on vblank themselves, so one pass of those states spans
//! many frames; the wait at the end of the pass comes on top of those.
//!
//! Collaborators move the game between states by writing the session's state,
//! except for the pause menu, which reports back with a [`PauseOutcome`].

use core::ops::ControlFlow::{self, Break, Continue};

use log::{debug, error, info};

use crate::{
    banks::{PrgBank, Routine},
    config::{FIRST_ENEMY_SPRITE_OAM_INDEX, NO_CRACK, PARKED_SPRITE_OAM_Y, SPRITE_OFFSCREEN},
    error::GameError,
    init::initialize_variables,
    platform::{Banked, Console, PauseOutcome, Sfx, SfxChannel, Song},
    session::Session,
    state::GameState,
};

/// Why the loop stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Halt {
    /// Credits finished and the console was told to reset.
    Reset,
    /// The state byte held something the loop can't run.
    Crashed(GameError),
}

pub struct GameLoop<C, B> {
    pub console: C,
    pub banked: B,
    pub session: Session,
}

impl<C: Console, B: Banked> GameLoop<C, B> {
    pub fn new(console: C, banked: B) -> Self {
        Self {
            console,
            banked,
            session: Session::power_on(),
        }
    }

    /// Power-on entry. Returns only when the loop halts.
    pub fn run(&mut self) -> Halt {
        self.boot();
        loop {
            if let Break(halt) = self.step() {
                return halt;
            }
        }
    }

    /// What the console does before the first pass.
    pub fn boot(&mut self) {
        self.console.fade_out_instant();
        self.session.set_state(GameState::SystemInit);
    }

    /// One full pass of the loop, including the vblank wait at the end.
    pub fn step(&mut self) -> ControlFlow<Halt> {
        self.session.every_other_cycle = !self.session.every_other_cycle;
        self.dispatch()?;
        self.console.publish(self.session.progress());
        self.console.wait_vblank();
        Continue(())
    }

    /// The state's work, without the trailing vblank wait.
    pub fn dispatch(&mut self) -> ControlFlow<Halt> {
        let state = match self.session.state() {
            Ok(state) => state,
            Err(err) => return Break(self.crash(err)),
        };

        match state {
            GameState::SystemInit => {
                initialize_variables(&mut self.session, &mut self.console);
                self.transition(GameState::TitleDraw);
            }
            GameState::TitleDraw => {
                self.call(Routine::DrawTitleScreen);
                self.console.play_music(Song::Title);
                self.console.fade_in();
            }
            GameState::TitleInput => self.call(Routine::HandleTitleInput),
            GameState::PostTitle => self.start_game(),
            GameState::Running => self.run_frame(),
            GameState::ScreenScroll => self.scroll_screen(),
            GameState::ShowingText => {
                self.call(Routine::DrawGameText);
                self.transition(GameState::Running);
            }
            GameState::Paused => self.pause(),
            GameState::GameOver => {
                self.console.fade_out();
                self.game_over();
            }
            GameState::GameOver1 => self.game_over(),
            GameState::Credits => return Break(self.credits()),
        }

        Continue(())
    }

    #[inline(always)]
    fn call(&mut self, routine: Routine) {
        self.banked.banked_call(routine.bank(), routine, &mut self.session);
    }

    fn transition(&mut self, next: GameState) {
        debug!("game state {:#04x} -> {next:?}", self.session.raw_state());
        self.session.set_state(next);
    }

    fn crash(&mut self, err: GameError) -> Halt {
        error!("{err}");
        self.console.crash(&err.report());
        Halt::Crashed(err)
    }

    /// Map, sprites and HUD for the current screen, drawn with rendering off.
    fn draw_screen(&mut self, with_sprites: bool) {
        self.call(Routine::DrawCurrentMap);

        // the map drawing turns the ppu back on when it's done; we aren't yet
        self.console.ppu_off();
        self.call(Routine::InitMap);
        if with_sprites {
            self.call(Routine::LoadSprites);
        }
        self.call(Routine::DrawHud);
        self.console.ppu_on_all();
    }

    fn start_game(&mut self) {
        info!("starting new game");
        self.call(Routine::DrawIntro);
        self.call(Routine::DrawWarning);
        self.session.death_count = 0;

        self.console.stop_music();
        self.console.fade_out();
        self.call(Routine::LoadMap);
        self.draw_screen(true);

        let seed = self.console.frame_count();
        self.console.set_seed(seed as u16);

        self.console.play_music(Song::Layer(self.session.layer));
        self.console.fade_in();
        self.transition(GameState::Running);
    }

    fn run_frame(&mut self) {
        self.call(Routine::UpdateHud);
        self.call(Routine::UpdateMapSprites);
        self.call(Routine::HandlePlayerMovement);
        self.call(Routine::UpdatePlayerSprite);
    }

    fn scroll_screen(&mut self) {
        // empty the screen of map sprites so the next one can fill it
        self.console.oam_hide_rest(FIRST_ENEMY_SPRITE_OAM_INDEX);
        // a crack spawning mid-scroll corrupts the new screen
        self.session.crack_timer = 0;
        self.console.park_sprite(PARKED_SPRITE_OAM_Y, SPRITE_OFFSCREEN);

        self.call(Routine::screen_transition());
        self.session.nearest_crack = NO_CRACK;
    }

    fn pause(&mut self) {
        self.console.fade_out();
        self.call(Routine::DrawPauseScreen);
        self.console.fade_in();

        let outcome = self.banked.pause_menu(PrgBank::PauseMenu, &mut self.session);
        debug!("left pause menu: {outcome:?}");

        self.console.fade_out();
        match outcome {
            PauseOutcome::Resume => {
                self.draw_screen(false);
                self.console.fade_in();
                self.transition(GameState::Running);
            }
            PauseOutcome::GameOver => self.transition(GameState::GameOver1),
        }
    }

    fn game_over(&mut self) {
        info!("game over (death #{})", self.session.death_count);
        self.call(Routine::DrawGameOverScreen);
        self.console.play_sfx(Sfx::GameOver, SfxChannel::One);

        self.console.fade_in();
        self.call(Routine::WaitForStart);
        self.console.fade_out();

        self.call(Routine::RestoreGameOver);
        self.call(Routine::LoadMap);
        self.draw_screen(true);
        self.console.fade_in();

        self.console.play_music(Song::Layer(self.session.layer));
        self.transition(GameState::Running);
    }

    fn credits(&mut self) -> Halt {
        info!("game won, rolling credits");
        self.console.stop_music();
        self.console.play_sfx(Sfx::Win, SfxChannel::One);

        self.console.fade_out();
        self.call(Routine::DrawWinScreen);
        self.console.fade_in();
        self.call(Routine::WaitForStart);
        self.console.fade_out();

        self.call(Routine::DrawCreditsScreen);
        self.console.fade_in();
        self.call(Routine::WaitForStart);
        self.console.fade_out();

        self.console.reset();
        Halt::Reset
    }
}
