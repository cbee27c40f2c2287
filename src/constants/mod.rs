pub mod game;

/// Playfield size in terminal cells, border included. The app centers a
/// WIDTH x HEIGHT box in the terminal and renders everything inside it.
pub const WIDTH: u16 = 72;
pub const HEIGHT: u16 = 38;

pub const TITLE_TEXT: &str = r#"
 _____  _       _     ____   ____  __   __
|  ___|| |     / \   |  _ \ |  _ \ \ \ / /
| |_   | |    / _ \  | |_) || |_) | \ V /
|  _|  | |__ / ___ \ |  __/ |  __/   | |
|_|    |____/_/   \_\|_|    |_|      |_|
"#;

pub const SUBTITLE_TEXT: &str = "a terminal bird with commitment issues";
