mod game;
mod home;

use serde::Deserialize;
use strum::Display;

pub use crate::action::game::GameAction;
pub use crate::action::home::HomeAction;

/// Where in a key's press/repeat/release cycle an action was produced.
/// Click bindings always fire with `Start`; hold bindings fire once per kind.
#[derive(Debug, Clone, PartialEq, Eq, Display, Deserialize, Default)]
pub enum ActionState {
    #[default]
    Start,
    Repeat,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Deserialize)]
pub enum Command {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    Error(String),
    ToggleShowHelp,
    StartGame,
    GoHome,
    // Page actions
    Home(HomeAction),
    Game(GameAction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub command: Command,
    pub state: ActionState,
}

macro_rules! act {
    ($command:expr) => {
        Action { command: $command, state: ActionState::default() }
    };
    ($command:expr, $state:expr) => {
        Action { command: $command, state: $state }
    };
}

pub(crate) use act;
