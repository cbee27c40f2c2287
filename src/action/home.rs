use serde::Deserialize;
use strum::Display;

#[derive(Debug, Clone, PartialEq, Eq, Display, Deserialize)]
pub enum HomeAction {
    Up,
    Down,
    Select,
}
