use crate::error::GameError;

/// The value the main loop dispatches on.
///
/// Discriminants are the bytes stored in the session; the gaps leave room for
/// states owned by collaborators. A raw byte outside this set is a crash.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GameState {
    SystemInit = 0,
    TitleDraw = 1,
    TitleInput = 2,
    PostTitle = 3,
    Running = 10,
    Paused = 20,
    ScreenScroll = 25,
    ShowingText = 30,
    GameOver = 240,
    /// Game over without the leading fade; `GameOver` falls through into it.
    GameOver1 = 241,
    Credits = 250,
}

impl GameState {
    pub const ALL: [GameState; 11] = [
        GameState::SystemInit,
        GameState::TitleDraw,
        GameState::TitleInput,
        GameState::PostTitle,
        GameState::Running,
        GameState::Paused,
        GameState::ScreenScroll,
        GameState::ShowingText,
        GameState::GameOver,
        GameState::GameOver1,
        GameState::Credits,
    ];

    #[inline(always)]
    pub const fn raw(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for GameState {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => GameState::SystemInit,
            1 => GameState::TitleDraw,
            2 => GameState::TitleInput,
            3 => GameState::PostTitle,
            10 => GameState::Running,
            20 => GameState::Paused,
            25 => GameState::ScreenScroll,
            30 => GameState::ShowingText,
            240 => GameState::GameOver,
            241 => GameState::GameOver1,
            250 => GameState::Credits,
            _ => return Err(GameError::UnknownGameState(value)),
        })
    }
}
