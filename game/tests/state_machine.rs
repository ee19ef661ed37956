mod common;

use std::ops::ControlFlow::{Break, Continue};

use common::{Call, banked, game, take};
use rift::{
    ErrorCode, GameError, GameState, Halt, PauseOutcome, PlayerState, PrgBank, Progress, Routine,
    Sfx, SfxChannel, Song, WorldId,
    config::{FIRST_ENEMY_SPRITE_OAM_INDEX, NO_CRACK, SPRITE_OFFSCREEN},
};

fn progress(state: GameState, layer: u8) -> Progress {
    Progress { state: state.raw(), layer }
}

fn end_of_pass(state: GameState, layer: u8) -> [Call; 2] {
    [Call::Publish(progress(state, layer)), Call::WaitVblank]
}

#[test]
fn power_on_reaches_title_draw() {
    let (mut game, log) = game();
    game.boot();
    assert_eq!(game.step(), Continue(()));

    assert!(game.session.is(GameState::TitleDraw));
    assert_eq!(game.session.player, PlayerState::spawn());
    assert_eq!(game.session.world, WorldId::Overworld);
    assert_eq!(game.session.layer, 0);
    assert!(game.session.checkpoint.world_state.iter().all(|&b| b == 0));

    let mut expected = vec![Call::FadeOutInstant, Call::SpriteBank(1)];
    expected.extend(end_of_pass(GameState::TitleDraw, 0));
    assert_eq!(take(&log), expected);

    // next pass draws the title, starts its music and fades in
    assert_eq!(game.step(), Continue(()));
    let mut expected = vec![
        banked(Routine::DrawTitleScreen),
        Call::Music(Song::Title),
        Call::FadeIn,
    ];
    expected.extend(end_of_pass(GameState::TitleDraw, 0));
    assert_eq!(take(&log), expected);
}

#[test]
fn title_draw_waits_for_a_collaborator() {
    let (mut game, _log) = game();
    game.session.set_state(GameState::TitleDraw);
    assert_eq!(game.step(), Continue(()));
    assert_eq!(game.step(), Continue(()));
    assert!(game.session.is(GameState::TitleDraw));

    game.banked.on(Routine::DrawTitleScreen, |s| s.set_state(GameState::TitleInput));
    assert_eq!(game.step(), Continue(()));
    assert!(game.session.is(GameState::TitleInput));

    game.banked.on(Routine::HandleTitleInput, |s| s.set_state(GameState::PostTitle));
    assert_eq!(game.step(), Continue(()));
    assert!(game.session.is(GameState::PostTitle));
}

#[test]
fn post_title_runs_whole_sequence_in_one_pass() {
    let (mut game, log) = game();
    game.session.set_state(GameState::PostTitle);
    game.session.death_count = 5;
    game.session.layer = 2;
    game.console.frames = 0x37;

    assert_eq!(game.step(), Continue(()));

    let mut expected = vec![
        banked(Routine::DrawIntro),
        banked(Routine::DrawWarning),
        Call::StopMusic,
        Call::FadeOut,
        banked(Routine::LoadMap),
        banked(Routine::DrawCurrentMap),
        Call::PpuOff,
        banked(Routine::InitMap),
        banked(Routine::LoadSprites),
        banked(Routine::DrawHud),
        Call::PpuOnAll,
        Call::Seed(0x37),
        Call::Music(Song::Layer(2)),
        Call::FadeIn,
    ];
    expected.extend(end_of_pass(GameState::Running, 2));
    assert_eq!(take(&log), expected);
    assert_eq!(game.session.death_count, 0);
}

#[test]
fn running_updates_every_frame_and_stays() {
    let (mut game, log) = game();
    game.session.set_state(GameState::Running);

    for _ in 0..3 {
        assert_eq!(game.step(), Continue(()));
        let mut expected = vec![
            Call::Banked(PrgBank::Hud, Routine::UpdateHud),
            Call::Banked(PrgBank::MapSprites, Routine::UpdateMapSprites),
            Call::Banked(PrgBank::PlayerSprite, Routine::HandlePlayerMovement),
            Call::Banked(PrgBank::PlayerSprite, Routine::UpdatePlayerSprite),
        ];
        expected.extend(end_of_pass(GameState::Running, 0));
        assert_eq!(take(&log), expected);
    }
}

#[test]
fn screen_scroll_clears_crack_state() {
    let (mut game, log) = game();
    game.session.set_state(GameState::Running);
    game.banked.on(Routine::HandlePlayerMovement, |s| s.set_state(GameState::ScreenScroll));
    assert_eq!(game.step(), Continue(()));
    take(&log);

    game.session.crack_timer = 30;
    game.session.nearest_crack = 12;
    game.banked.on(Routine::screen_transition(), |s| s.set_state(GameState::Running));
    assert_eq!(game.step(), Continue(()));

    let mut expected = vec![
        Call::OamHideRest(FIRST_ENEMY_SPRITE_OAM_INDEX),
        Call::ParkSprite(0x04, SPRITE_OFFSCREEN),
        Call::Banked(PrgBank::MapLogic, Routine::screen_transition()),
    ];
    expected.extend(end_of_pass(GameState::Running, 0));
    assert_eq!(take(&log), expected);
    assert_eq!(game.session.crack_timer, 0);
    assert_eq!(game.session.nearest_crack, NO_CRACK);
}

#[test]
fn showing_text_returns_to_running() {
    let (mut game, log) = game();
    game.session.set_state(GameState::ShowingText);
    assert_eq!(game.step(), Continue(()));

    assert!(game.session.is(GameState::Running));
    assert_eq!(take(&log)[0], banked(Routine::DrawGameText));
}

#[test]
fn unpausing_redraws_without_reloading_sprites() {
    let (mut game, log) = game();
    game.session.set_state(GameState::Paused);
    assert_eq!(game.step(), Continue(()));

    let mut expected = vec![
        Call::FadeOut,
        banked(Routine::DrawPauseScreen),
        Call::FadeIn,
        Call::PauseMenu(PrgBank::PauseMenu),
        Call::FadeOut,
        banked(Routine::DrawCurrentMap),
        Call::PpuOff,
        banked(Routine::InitMap),
        banked(Routine::DrawHud),
        Call::PpuOnAll,
        Call::FadeIn,
    ];
    // Running reaches the vblank tasks only after the redraw fades
    expected.extend(end_of_pass(GameState::Running, 0));
    assert_eq!(take(&log), expected);
}

#[test]
fn quitting_from_pause_goes_to_game_over() {
    let (mut game, log) = game();
    game.session.set_state(GameState::Paused);
    game.banked.pause_outcome = PauseOutcome::GameOver;
    assert_eq!(game.step(), Continue(()));

    let mut expected = vec![
        Call::FadeOut,
        banked(Routine::DrawPauseScreen),
        Call::FadeIn,
        Call::PauseMenu(PrgBank::PauseMenu),
        Call::FadeOut,
    ];
    expected.extend(end_of_pass(GameState::GameOver1, 0));
    assert_eq!(take(&log), expected);

    // the game over screen follows on the next pass, without the extra fade
    assert_eq!(game.step(), Continue(()));
    assert_eq!(take(&log)[0], banked(Routine::DrawGameOverScreen));
}

fn game_over_sequence(layer: u8) -> Vec<Call> {
    vec![
        banked(Routine::DrawGameOverScreen),
        Call::Sfx(Sfx::GameOver, SfxChannel::One),
        Call::FadeIn,
        banked(Routine::WaitForStart),
        Call::FadeOut,
        banked(Routine::RestoreGameOver),
        banked(Routine::LoadMap),
        banked(Routine::DrawCurrentMap),
        Call::PpuOff,
        banked(Routine::InitMap),
        banked(Routine::LoadSprites),
        banked(Routine::DrawHud),
        Call::PpuOnAll,
        Call::FadeIn,
        Call::Music(Song::Layer(layer)),
    ]
}

#[test]
fn game_over_falls_through_without_a_frame_wait() {
    let (mut game, log) = game();
    game.session.set_state(GameState::GameOver);
    game.session.layer = 1;
    assert_eq!(game.step(), Continue(()));

    let mut expected = vec![Call::FadeOut];
    expected.extend(game_over_sequence(1));
    expected.extend(end_of_pass(GameState::Running, 1));
    assert_eq!(take(&log), expected);
}

#[test]
fn game_over_1_skips_the_leading_fade() {
    let (mut game, log) = game();
    game.session.set_state(GameState::GameOver1);
    assert_eq!(game.step(), Continue(()));

    let mut expected = game_over_sequence(0);
    expected.extend(end_of_pass(GameState::Running, 0));
    assert_eq!(take(&log), expected);
}

#[test]
fn restored_checkpoint_layer_picks_the_music() {
    let (mut game, log) = game();
    game.session.set_state(GameState::GameOver1);
    game.session.layer = 4;
    game.banked.on(Routine::RestoreGameOver, |s| s.layer = s.checkpoint.layer);
    game.session.checkpoint.layer = 2;
    assert_eq!(game.step(), Continue(()));

    assert!(take(&log).contains(&Call::Music(Song::Layer(2))));
}

#[test]
fn credits_reset_the_console() {
    let (mut game, log) = game();
    game.session.set_state(GameState::Credits);

    assert_eq!(game.step(), Break(Halt::Reset));
    assert_eq!(
        take(&log),
        [
            Call::StopMusic,
            Call::Sfx(Sfx::Win, SfxChannel::One),
            Call::FadeOut,
            banked(Routine::DrawWinScreen),
            Call::FadeIn,
            banked(Routine::WaitForStart),
            Call::FadeOut,
            banked(Routine::DrawCreditsScreen),
            Call::FadeIn,
            banked(Routine::WaitForStart),
            Call::FadeOut,
            Call::Reset,
        ]
    );
}

#[test]
fn unknown_state_crashes_once_and_stops() {
    let (mut game, log) = game();
    game.session.set_raw_state(0x42);

    assert_eq!(
        game.step(),
        Break(Halt::Crashed(GameError::UnknownGameState(0x42)))
    );

    let calls = take(&log);
    assert_eq!(calls.len(), 1);
    let Call::Crash(report) = calls[0] else {
        panic!("expected a crash, got {calls:?}");
    };
    assert_eq!(report.code, ErrorCode::UnknownGameState);
    assert_eq!(report.value, 0x42);
}

#[test]
fn every_other_cycle_flips_each_pass() {
    let (mut game, _log) = game();
    game.session.set_state(GameState::Running);
    let mut seen = Vec::new();
    for _ in 0..4 {
        assert_eq!(game.step(), Continue(()));
        seen.push(game.session.every_other_cycle);
    }
    assert_eq!(seen, [true, false, true, false]);
}

#[test]
fn every_documented_state_lands_on_a_documented_state() {
    for state in GameState::ALL {
        let (mut game, _log) = game();
        game.session.set_state(state);
        let flow = game.step();

        let allowed: &[GameState] = match state {
            GameState::SystemInit => &[GameState::TitleDraw],
            GameState::TitleDraw => &[GameState::TitleDraw],
            GameState::TitleInput => &[GameState::TitleInput],
            GameState::PostTitle => &[GameState::Running],
            GameState::Running => &[GameState::Running],
            GameState::ScreenScroll => &[GameState::ScreenScroll],
            GameState::ShowingText => &[GameState::Running],
            GameState::Paused => &[GameState::Running, GameState::GameOver1],
            GameState::GameOver | GameState::GameOver1 => &[GameState::Running],
            GameState::Credits => {
                assert_eq!(flow, Break(Halt::Reset));
                continue;
            }
        };
        assert_eq!(flow, Continue(()));
        let now = game.session.state().unwrap();
        assert!(allowed.contains(&now), "{state:?} went to {now:?}");
    }
}

#[test]
fn full_playthrough_ends_in_reset() {
    let (mut game, log) = game();
    game.banked.on(Routine::DrawTitleScreen, |s| s.set_state(GameState::TitleInput));
    game.banked.on(Routine::HandleTitleInput, |s| s.set_state(GameState::PostTitle));

    let mut frames = 0;
    game.banked.on(Routine::UpdateHud, move |s| {
        frames += 1;
        match frames {
            2 => s.set_state(GameState::ShowingText),
            4 => s.set_state(GameState::Paused),
            6 => s.set_state(GameState::GameOver),
            8 => {
                s.layer = 4;
                s.set_state(GameState::Credits)
            }
            _ => {}
        }
    });

    assert_eq!(game.run(), Halt::Reset);

    let calls = take(&log);
    assert_eq!(calls.last(), Some(&Call::Reset));
    assert_eq!(calls.iter().filter(|c| **c == Call::SpriteBank(1)).count(), 1);
    assert!(calls.contains(&Call::Banked(PrgBank::GameText, Routine::DrawGameText)));
    assert!(calls.contains(&Call::Sfx(Sfx::GameOver, SfxChannel::One)));
    assert!(!calls.iter().any(|c| matches!(c, Call::Crash(_))));
}
