use std::{collections::HashMap, path::PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use derive_deref::{Deref, DerefMut};
use ratatui::style::{Color, Modifier, Style};
use serde::{
    de::{self, Deserializer},
    Deserialize,
};

use crate::{
    action::{Action, ActionState, Command, GameAction, HomeAction},
    pages::PageId,
    utils::{get_config_dir, get_data_dir},
};

const CONFIG: &str = include_str!("../.config/config.yaml");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub _data_dir: PathBuf,
    #[serde(default)]
    pub _config_dir: PathBuf,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub keybindings: KeyBindings,
    #[serde(default)]
    pub styles: Styles,
}

impl Config {
    pub fn new() -> Result<Self, config::ConfigError> {
        let default_config: Config =
            serde_yaml::from_str(CONFIG).expect("embedded default config is valid yaml");
        let data_dir = get_data_dir();
        let config_dir = get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("_data_dir", data_dir.to_str().unwrap_or_default())?
            .set_default("_config_dir", config_dir.to_str().unwrap_or_default())?;

        let user_config = config_dir.join("config.yaml");
        builder = builder
            .add_source(config::File::from(user_config.clone()).format(config::FileFormat::Yaml).required(false));
        if !user_config.exists() {
            log::info!("no user configuration at {user_config:?}, using the built-in defaults");
        }

        let mut cfg: Self = builder.build()?.try_deserialize()?;

        // Anything the user file does not mention falls back to the
        // embedded defaults, entry by entry.
        for (page, default_bindings) in default_config.keybindings.pages.iter() {
            let user_bindings = cfg.keybindings.pages.entry(page.clone()).or_default();
            for (key, action) in default_bindings.iter() {
                user_bindings.entry(*key).or_insert_with(|| action.clone());
            }
        }
        for (key, action) in default_config.keybindings.global.iter() {
            cfg.keybindings.global.entry(*key).or_insert_with(|| action.clone());
        }
        for (name, style) in default_config.styles.iter() {
            cfg.styles.entry(name.clone()).or_insert(*style);
        }

        Ok(cfg)
    }

    /// Named style lookup with a fallback for entries the user removed.
    pub fn style(&self, name: &str, default: Style) -> Style {
        self.styles.get(name).copied().unwrap_or(default)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
struct RawPageKeyBindings {
    click: Option<HashMap<String, String>>,
    hold: Option<HashMap<String, String>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct RawKeyBindings {
    #[serde(default)]
    global: RawPageKeyBindings,
    #[serde(default)]
    pages: HashMap<String, RawPageKeyBindings>,
}

#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct PageKeyBindings(pub HashMap<KeyEvent, Action>);

#[derive(Clone, Debug, Default)]
pub struct KeyBindings {
    pub global: PageKeyBindings,
    pub pages: HashMap<PageId, PageKeyBindings>,
}

impl<'de> Deserialize<'de> for KeyBindings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawKeyBindings::deserialize(deserializer)?;

        let global = PageKeyBindings(
            parse_bindings::<Command>(&raw.global)
                .into_iter()
                .map(|(event, (command, state))| (event, Action { command, state }))
                .collect(),
        );

        // Each page's bindings parse through that page's own action type.
        let mut pages = HashMap::new();
        for (page, bindings) in raw.pages.iter() {
            let page_id: PageId = serde_yaml::from_str(page).map_err(de::Error::custom)?;
            let map = match page_id {
                PageId::Home => parse_bindings::<HomeAction>(bindings)
                    .into_iter()
                    .map(|(event, (command, state))| (event, Action { command: Command::Home(command), state }))
                    .collect(),
                PageId::Game => parse_bindings::<GameAction>(bindings)
                    .into_iter()
                    .map(|(event, (command, state))| (event, Action { command: Command::Game(command), state }))
                    .collect(),
            };
            pages.insert(page_id, PageKeyBindings(map));
        }

        Ok(KeyBindings { global, pages })
    }
}

/// Unreadable entries are skipped with a log line rather than taking the
/// whole config down.
fn parse_bindings<T>(raw: &RawPageKeyBindings) -> HashMap<KeyEvent, (T, ActionState)>
where
    T: de::DeserializeOwned + Clone,
{
    let parse = |map: &Option<HashMap<String, String>>| -> HashMap<KeyEvent, T> {
        map.as_ref()
            .map(|bindings| {
                bindings
                    .iter()
                    .filter_map(|(key, action)| {
                        let action: T = match serde_yaml::from_str(action) {
                            Ok(action) => action,
                            Err(e) => {
                                log::warn!("skipping keybinding `{key}`: {e}");
                                return None;
                            },
                        };
                        let event = match parse_key_event(key) {
                            Ok(event) => event,
                            Err(e) => {
                                log::warn!("skipping keybinding `{key}`: {e}");
                                return None;
                            },
                        };
                        Some((event, action))
                    })
                    .collect()
            })
            .unwrap_or_default()
    };

    merge_keybinding_maps(parse(&raw.click), parse(&raw.hold))
}

/// Click bindings fire on press only; hold bindings are expanded to one
/// entry per key event kind so pages can react to press/repeat/release.
fn merge_keybinding_maps<A: Clone>(
    click: HashMap<KeyEvent, A>,
    hold: HashMap<KeyEvent, A>,
) -> HashMap<KeyEvent, (A, ActionState)> {
    let mut merged: HashMap<KeyEvent, (A, ActionState)> =
        click.into_iter().map(|(event, action)| (event, (action, ActionState::default()))).collect();
    for (mut event, action) in hold {
        merged.insert(event, (action.clone(), ActionState::Start));
        event.kind = KeyEventKind::Repeat;
        merged.insert(event, (action.clone(), ActionState::Repeat));
        event.kind = KeyEventKind::Release;
        merged.insert(event, (action, ActionState::End));
    }
    merged
}

pub fn parse_key_event(raw: &str) -> Result<KeyEvent, String> {
    let raw = raw.trim_start_matches('<').trim_end_matches('>');
    let raw_lower = raw.to_ascii_lowercase();
    let (remaining, modifiers) = extract_modifiers(&raw_lower);
    parse_key_code_with_modifiers(remaining, modifiers)
}

fn extract_modifiers(raw: &str) -> (&str, KeyModifiers) {
    let mut modifiers = KeyModifiers::empty();
    let mut current = raw;

    loop {
        match current {
            rest if rest.starts_with("ctrl-") => {
                modifiers.insert(KeyModifiers::CONTROL);
                current = &rest[5..];
            },
            rest if rest.starts_with("alt-") => {
                modifiers.insert(KeyModifiers::ALT);
                current = &rest[4..];
            },
            rest if rest.starts_with("shift-") => {
                modifiers.insert(KeyModifiers::SHIFT);
                current = &rest[6..];
            },
            _ => break,
        };
    }

    (current, modifiers)
}

fn parse_key_code_with_modifiers(raw: &str, mut modifiers: KeyModifiers) -> Result<KeyEvent, String> {
    let code = match raw {
        "esc" => KeyCode::Esc,
        "enter" => KeyCode::Enter,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "backtab" => {
            modifiers.insert(KeyModifiers::SHIFT);
            KeyCode::BackTab
        },
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        "space" => KeyCode::Char(' '),
        "hyphen" | "minus" => KeyCode::Char('-'),
        "tab" => KeyCode::Tab,
        function if function.len() > 1 && function.starts_with('f') => {
            let number: u8 = function[1..].parse().map_err(|_| format!("Unable to parse `{raw}`"))?;
            if !(1..=12).contains(&number) {
                return Err(format!("Unable to parse `{raw}`"));
            }
            KeyCode::F(number)
        },
        c if c.chars().count() == 1 => {
            let mut c = c.chars().next().ok_or_else(|| format!("Unable to parse `{raw}`"))?;
            if modifiers.contains(KeyModifiers::SHIFT) {
                c = c.to_ascii_uppercase();
            }
            KeyCode::Char(c)
        },
        _ => return Err(format!("Unable to parse `{raw}`")),
    };
    Ok(KeyEvent::new(code, modifiers))
}

pub fn key_event_to_string(key_event: &KeyEvent) -> String {
    let char;
    let key_code = match key_event.code {
        KeyCode::Backspace => "backspace",
        KeyCode::Enter => "enter",
        KeyCode::Left => "left",
        KeyCode::Right => "right",
        KeyCode::Up => "up",
        KeyCode::Down => "down",
        KeyCode::Home => "home",
        KeyCode::End => "end",
        KeyCode::PageUp => "pageup",
        KeyCode::PageDown => "pagedown",
        KeyCode::Tab => "tab",
        KeyCode::BackTab => "backtab",
        KeyCode::Delete => "delete",
        KeyCode::Insert => "insert",
        KeyCode::F(n) => {
            char = format!("f{n}");
            &char
        },
        KeyCode::Char(' ') => "space",
        KeyCode::Char(c) => {
            char = c.to_string();
            &char
        },
        KeyCode::Esc => "esc",
        _ => "",
    };

    let mut modifiers = Vec::with_capacity(3);
    if key_event.modifiers.intersects(KeyModifiers::CONTROL) {
        modifiers.push("ctrl");
    }
    if key_event.modifiers.intersects(KeyModifiers::SHIFT) {
        modifiers.push("shift");
    }
    if key_event.modifiers.intersects(KeyModifiers::ALT) {
        modifiers.push("alt");
    }

    let mut key = modifiers.join("-");
    if !key.is_empty() {
        key.push('-');
    }
    key.push_str(key_code);
    key
}

#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct Styles(pub HashMap<String, Style>);

impl<'de> Deserialize<'de> for Styles {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = HashMap::<String, String>::deserialize(deserializer)?;
        Ok(Styles(raw.into_iter().map(|(name, style)| (name, parse_style(&style))).collect()))
    }
}

pub fn parse_style(line: &str) -> Style {
    let (foreground, background) = line.split_at(line.to_lowercase().find("on ").unwrap_or(line.len()));
    let foreground = process_color_string(foreground);
    let background = process_color_string(&background.replace("on ", ""));

    let mut style = Style::default();
    if let Some(fg) = parse_color(&foreground.0) {
        style = style.fg(fg);
    }
    if let Some(bg) = parse_color(&background.0) {
        style = style.bg(bg);
    }
    style.add_modifier(foreground.1 | background.1)
}

fn process_color_string(color_str: &str) -> (String, Modifier) {
    let color = color_str
        .replace("grey", "gray")
        .replace("bright ", "")
        .replace("bold ", "")
        .replace("underline ", "")
        .replace("inverse ", "");

    let mut modifiers = Modifier::empty();
    if color_str.contains("underline") {
        modifiers |= Modifier::UNDERLINED;
    }
    if color_str.contains("bold") {
        modifiers |= Modifier::BOLD;
    }
    if color_str.contains("inverse") {
        modifiers |= Modifier::REVERSED;
    }

    (color, modifiers)
}

fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(code) = s.strip_prefix("color") {
        return Some(Color::Indexed(code.parse().unwrap_or_default()));
    }
    if let Some(level) = s.strip_prefix("gray") {
        if !level.is_empty() {
            return Some(Color::Indexed(232 + level.parse::<u8>().unwrap_or_default()));
        }
    }
    if let Some(digits) = s.strip_prefix("rgb") {
        let mut values = digits.chars().filter_map(|c| c.to_digit(10));
        if let (Some(r), Some(g), Some(b)) = (values.next(), values.next(), values.next()) {
            return Some(Color::Indexed((16 + r * 36 + g * 6 + b) as u8));
        }
        return None;
    }

    let named: [(&str, u8); 9] = [
        ("black", 0),
        ("red", 1),
        ("green", 2),
        ("yellow", 3),
        ("blue", 4),
        ("magenta", 5),
        ("cyan", 6),
        ("white", 7),
        ("gray", 8),
    ];
    named.iter().find(|(name, _)| s == *name).map(|(_, index)| Color::Indexed(*index))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_style_default() {
        let style = parse_style("");
        assert_eq!(style, Style::default());
    }

    #[test]
    fn test_parse_style_foreground() {
        let style = parse_style("red");
        assert_eq!(style.fg, Some(Color::Indexed(1)));
    }

    #[test]
    fn test_parse_style_background() {
        let style = parse_style("on blue");
        assert_eq!(style.bg, Some(Color::Indexed(4)));
    }

    #[test]
    fn test_parse_style_modifiers() {
        let style = parse_style("underline red on blue");
        assert_eq!(style.fg, Some(Color::Indexed(1)));
        assert_eq!(style.bg, Some(Color::Indexed(4)));
        assert!(style.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_process_color_string() {
        let (color, modifiers) = process_color_string("underline bold inverse gray");
        assert_eq!(color, "gray");
        assert!(modifiers.contains(Modifier::UNDERLINED));
        assert!(modifiers.contains(Modifier::BOLD));
        assert!(modifiers.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_parse_color_rgb() {
        let color = parse_color("rgb123");
        let expected = 16 + 36 + 2 * 6 + 3;
        assert_eq!(color, Some(Color::Indexed(expected)));
    }

    #[test]
    fn test_parse_color_unknown() {
        assert_eq!(parse_color("unknown"), None);
    }

    #[test]
    fn test_config_defaults() {
        let c = Config::new().unwrap();
        let game_bindings = c.keybindings.pages.get(&PageId::Game).unwrap();
        assert_eq!(
            game_bindings.get(&parse_key_event("<space>").unwrap()),
            Some(&Action { command: Command::Game(GameAction::Flap), state: ActionState::Start })
        );
        assert!(c.styles.contains_key("bird"));
    }

    #[test]
    fn test_simple_keys() {
        assert_eq!(parse_key_event("a").unwrap(), KeyEvent::new(KeyCode::Char('a'), KeyModifiers::empty()));
        assert_eq!(parse_key_event("enter").unwrap(), KeyEvent::new(KeyCode::Enter, KeyModifiers::empty()));
        assert_eq!(parse_key_event("esc").unwrap(), KeyEvent::new(KeyCode::Esc, KeyModifiers::empty()));
        assert_eq!(parse_key_event("f5").unwrap(), KeyEvent::new(KeyCode::F(5), KeyModifiers::empty()));
    }

    #[test]
    fn test_with_modifiers() {
        assert_eq!(parse_key_event("ctrl-a").unwrap(), KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
        assert_eq!(parse_key_event("alt-enter").unwrap(), KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT));
        assert_eq!(parse_key_event("shift-esc").unwrap(), KeyEvent::new(KeyCode::Esc, KeyModifiers::SHIFT));
    }

    #[test]
    fn test_multiple_modifiers() {
        assert_eq!(
            parse_key_event("ctrl-alt-a").unwrap(),
            KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL | KeyModifiers::ALT)
        );
        assert_eq!(
            parse_key_event("ctrl-shift-enter").unwrap(),
            KeyEvent::new(KeyCode::Enter, KeyModifiers::CONTROL | KeyModifiers::SHIFT)
        );
    }

    #[test]
    fn test_key_event_to_string_roundtrip() {
        let event = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL | KeyModifiers::ALT);
        let raw = key_event_to_string(&event);
        assert_eq!(raw, "ctrl-alt-a".to_string());
        assert_eq!(parse_key_event(&raw).unwrap(), event);
    }

    #[test]
    fn test_invalid_keys() {
        assert!(parse_key_event("invalid-key").is_err());
        assert!(parse_key_event("ctrl-invalid-key").is_err());
        assert!(parse_key_event("f13").is_err());
    }

    #[test]
    fn test_case_insensitivity() {
        assert_eq!(parse_key_event("CTRL-a").unwrap(), KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
        assert_eq!(parse_key_event("AlT-eNtEr").unwrap(), KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT));
    }
}
