//! PRG banks and the routines that live in them.
//!
//! The cartridge holds far more code than the CPU can see at once, so most of
//! the game is split into 16K banks swapped in at `$8000`. The main loop never
//! calls into another bank directly; it names a [`Routine`] and lets the
//! [`Banked`](crate::Banked) trampoline map the right bank first.

/// Switchable PRG banks, in ROM order. `Primary` is the fixed bank at `$C000`.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrgBank {
    Title = 0,
    MapLogic = 1,
    MapSprites = 2,
    PlayerSprite = 3,
    Hud = 4,
    GameText = 5,
    PauseMenu = 6,
    GameOver = 7,
    MenuInputHelpers = 8,
    CreditsMenu = 9,
    Primary = 15,
}

impl PrgBank {
    #[inline(always)]
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// The fixed bank is always mapped; calling into it needs no swap.
    #[inline(always)]
    pub const fn is_fixed(self) -> bool {
        matches!(self, PrgBank::Primary)
    }
}

/// Every out-of-bank procedure the main loop calls. All take no arguments
/// beyond the session and report back only by returning.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Routine {
    DrawTitleScreen,
    HandleTitleInput,
    DrawIntro,
    DrawWarning,
    LoadMap,
    DrawCurrentMap,
    InitMap,
    LoadSprites,
    DrawHud,
    UpdateHud,
    UpdateMapSprites,
    HandlePlayerMovement,
    UpdatePlayerSprite,
    ScrollScreenTransition,
    FadeScreenTransition,
    DrawGameText,
    DrawPauseScreen,
    DrawGameOverScreen,
    WaitForStart,
    RestoreGameOver,
    DrawWinScreen,
    DrawCreditsScreen,
}

impl Routine {
    pub const fn bank(self) -> PrgBank {
        use Routine::*;
        match self {
            DrawTitleScreen | HandleTitleInput | DrawIntro | DrawWarning => PrgBank::Title,
            LoadMap => PrgBank::Primary,
            DrawCurrentMap | InitMap | LoadSprites | ScrollScreenTransition
            | FadeScreenTransition | RestoreGameOver => PrgBank::MapLogic,
            DrawHud | UpdateHud => PrgBank::Hud,
            UpdateMapSprites => PrgBank::MapSprites,
            HandlePlayerMovement | UpdatePlayerSprite => PrgBank::PlayerSprite,
            DrawGameText => PrgBank::GameText,
            DrawPauseScreen => PrgBank::PauseMenu,
            DrawGameOverScreen => PrgBank::GameOver,
            WaitForStart => PrgBank::MenuInputHelpers,
            DrawWinScreen | DrawCreditsScreen => PrgBank::CreditsMenu,
        }
    }

    /// The transition the loop runs when the player walks off a screen edge.
    pub const fn screen_transition() -> Routine {
        if cfg!(feature = "fade-transition") {
            Routine::FadeScreenTransition
        } else {
            Routine::ScrollScreenTransition
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_routines_share_a_bank() {
        for routine in [
            Routine::DrawCurrentMap,
            Routine::InitMap,
            Routine::LoadSprites,
            Routine::RestoreGameOver,
            Routine::screen_transition(),
        ] {
            assert_eq!(routine.bank(), PrgBank::MapLogic);
        }
    }

    #[test]
    fn load_map_stays_in_fixed_bank() {
        assert!(Routine::LoadMap.bank().is_fixed());
        assert!(!Routine::DrawHud.bank().is_fixed());
    }
}
