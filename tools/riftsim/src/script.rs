use std::collections::HashMap;
use std::str::FromStr;

use anyhow::{Context, anyhow, bail};
use rift::{
    Banked, CheckpointState, GameState, PauseOutcome, PrgBank, Routine, Session,
    config::MAX_LAYER,
};
use tracing::{debug, info};

/// Something the scripted player does on a given gameplay frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Walk off the edge of the screen.
    Scroll,
    /// Talk to someone.
    Text,
    /// Pause, then unpause.
    Pause,
    /// Pause, then pick "quit" from the menu.
    Quit,
    /// Run out of health.
    Die,
    /// Fall through a crack into layer `n`, saving a checkpoint there.
    Layer(u8),
    /// Touch the endgame sprite.
    Win,
}

impl FromStr for Event {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "scroll" => Event::Scroll,
            "text" => Event::Text,
            "pause" => Event::Pause,
            "quit" => Event::Quit,
            "die" => Event::Die,
            "win" => Event::Win,
            _ => match s.strip_prefix("layer=") {
                Some(n) => {
                    let layer: u8 = n.parse().with_context(|| format!("bad layer in {s:?}"))?;
                    if layer > MAX_LAYER {
                        bail!("layer {layer} is past the last layer ({MAX_LAYER})");
                    }
                    Event::Layer(layer)
                }
                None => bail!("unknown event {s:?}"),
            },
        })
    }
}

/// `<frame>:<event>`, where frame counts gameplay frames only.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScriptEvent {
    pub frame: u32,
    pub event: Event,
}

impl FromStr for ScriptEvent {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (frame, event) = s
            .split_once(':')
            .ok_or_else(|| anyhow!("expected FRAME:EVENT, got {s:?}"))?;
        Ok(ScriptEvent {
            frame: frame.parse().with_context(|| format!("bad frame in {s:?}"))?,
            event: event.parse()?,
        })
    }
}

/// A short run through every flow the loop has.
pub fn demo() -> Vec<ScriptEvent> {
    use Event::*;
    [
        (30, Scroll),
        (60, Text),
        (90, Pause),
        (120, Layer(3)),
        (400, Die),
        (450, Layer(4)),
        (700, Quit),
        (760, Win),
    ]
    .into_iter()
    .map(|(frame, event)| ScriptEvent { frame, event })
    .collect()
}

/// Stand-ins for the banked game code, driven by a script instead of a controller.
pub struct ScriptedGame {
    events: Vec<ScriptEvent>,
    /// Title screen polls before the player "presses start".
    title_polls: u32,
    gameplay_frames: u32,
    pending_pause: Option<PauseOutcome>,
    pub calls: HashMap<Routine, u32>,
    pub bank_switches: u32,
    current_bank: Option<PrgBank>,
}

impl ScriptedGame {
    pub fn new(mut events: Vec<ScriptEvent>) -> Self {
        events.sort_by_key(|e| e.frame);
        Self {
            events,
            title_polls: 0,
            gameplay_frames: 0,
            pending_pause: None,
            calls: HashMap::new(),
            bank_switches: 0,
            current_bank: None,
        }
    }

    pub fn gameplay_frames(&self) -> u32 {
        self.gameplay_frames
    }

    fn apply(&mut self, event: Event, session: &mut Session) {
        info!(frame = self.gameplay_frames, ?event, "script");
        match event {
            Event::Scroll => session.set_state(GameState::ScreenScroll),
            Event::Text => session.set_state(GameState::ShowingText),
            Event::Pause => {
                self.pending_pause = Some(PauseOutcome::Resume);
                session.set_state(GameState::Paused);
            }
            Event::Quit => {
                self.pending_pause = Some(PauseOutcome::GameOver);
                session.set_state(GameState::Paused);
            }
            Event::Die => {
                session.player.health = 0;
                session.death_count = session.death_count.wrapping_add(1);
                session.set_state(GameState::GameOver);
            }
            Event::Layer(layer) => {
                session.layer = layer;
                session.checkpoint = CheckpointState::capture(&session.player, layer);
            }
            Event::Win => session.set_state(GameState::Credits),
        }
    }

    fn gameplay_frame(&mut self, session: &mut Session) {
        self.gameplay_frames += 1;
        while let Some(next) = self.events.first().copied() {
            if next.frame > self.gameplay_frames {
                break;
            }
            self.events.remove(0);
            self.apply(next.event, session);
        }
    }
}

const TITLE_POLLS_BEFORE_START: u32 = 20;

impl Banked for ScriptedGame {
    fn banked_call(&mut self, bank: PrgBank, routine: Routine, session: &mut Session) {
        if !bank.is_fixed() && self.current_bank != Some(bank) {
            self.current_bank = Some(bank);
            self.bank_switches += 1;
        }
        *self.calls.entry(routine).or_default() += 1;
        debug!(?bank, ?routine, "banked call");

        match routine {
            Routine::DrawTitleScreen => session.set_state(GameState::TitleInput),
            Routine::HandleTitleInput => {
                self.title_polls += 1;
                if self.title_polls >= TITLE_POLLS_BEFORE_START {
                    session.set_state(GameState::PostTitle);
                }
            }
            Routine::HandlePlayerMovement => self.gameplay_frame(session),
            Routine::ScrollScreenTransition | Routine::FadeScreenTransition => {
                session.player.overworld_position = (session.player.overworld_position + 1) % 63;
                session.set_state(GameState::Running);
            }
            Routine::RestoreGameOver => {
                let checkpoint = &session.checkpoint;
                session.player.overworld_position = checkpoint.screen_id;
                session.player.key_count = checkpoint.key_count;
                session.player.x = checkpoint.x;
                session.player.y = checkpoint.y;
                session.player.health = session.player.max_health;
                session.layer = checkpoint.layer;
            }
            _ => {}
        }
    }

    fn pause_menu(&mut self, bank: PrgBank, _session: &mut Session) -> PauseOutcome {
        self.current_bank = Some(bank);
        self.pending_pause.take().unwrap_or(PauseOutcome::Resume)
    }
}
