mod bird;
mod pipe;
mod score;
mod session;

use std::collections::HashMap;

use color_eyre::eyre::Result;
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Margin, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph},
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;

use super::{Page, PageId};
use crate::{
    action::{act, Action, ActionState, Command, GameAction},
    components::sprite::Sprite,
    config::{Config, PageKeyBindings},
    constants::game,
    pages::game::{
        score::ScoreStore,
        session::{Session, SessionState},
    },
};

pub struct GamePage {
    pub action_tx: Option<UnboundedSender<Action>>,
    pub keymap: PageKeyBindings,
    config: Config,
    session: Session,
}

impl GamePage {
    pub fn new() -> Self {
        GamePage {
            action_tx: None,
            keymap: PageKeyBindings::default(),
            config: Config::default(),
            session: Session::new(ScoreStore::new()),
        }
    }

    /// World units to cells. The world is fixed, the terminal is not, so
    /// both axes scale independently. Also used for lengths; the mapping is
    /// linear through the origin.
    fn cell_x(area: Rect, x: f32) -> i32 {
        (x / game::WORLD_WIDTH * area.width as f32).round() as i32
    }

    fn cell_y(area: Rect, y: f32) -> i32 {
        (y / game::WORLD_HEIGHT * area.height as f32).round() as i32
    }

    fn draw_clouds(&self, f: &mut Frame<'_>, area: Rect) {
        let style = self.config.style("cloud", Style::default().fg(Color::White));
        for (x, y) in game::CLOUDS {
            let sprite = Sprite::new(game::CLOUD_TEXT, Self::cell_x(area, x), Self::cell_y(area, y))
                .style(style)
                .transparent_whitespace(true);
            f.render_widget(sprite, area);
        }
    }

    fn draw_pipes(&self, f: &mut Frame<'_>, area: Rect) {
        let style = self.config.style("pipe", Style::default().fg(Color::Green));
        let width = Self::cell_x(area, game::PIPE_WIDTH).max(1) as u16;

        for pipe in self.session.pipes().iter() {
            let x = Self::cell_x(area, pipe.x());

            let top_h = Self::cell_y(area, pipe.top_h()).max(1) as u16;
            let top = Sprite::from_lines(pipe_lines(width, top_h, true), x, 0).style(style);
            f.render_widget(top, area);

            // The lower segment reaches at least to the floor; rounding the
            // two heights independently could otherwise leave a one-cell
            // sliver above it. Any overshoot is clipped by the sprite.
            let bottom_y = Self::cell_y(area, pipe.bottom_y());
            let bottom_h = Self::cell_y(area, pipe.bottom_h()).max(area.height as i32 - bottom_y).max(1) as u16;
            let bottom = Sprite::from_lines(pipe_lines(width, bottom_h, false), x, bottom_y).style(style);
            f.render_widget(bottom, area);
        }
    }

    fn draw_bird(&self, f: &mut Frame<'_>, area: Rect) {
        let bird = self.session.bird();
        let x = Self::cell_x(area, bird.x());
        let y = Self::cell_y(area, bird.y());

        let body = if bird.velocity() < 0.0 { game::BIRD_BODY_RISING } else { game::BIRD_BODY_FALLING };
        let body_style = self.config.style("bird", Style::default().fg(Color::Yellow));
        f.render_widget(Sprite::new(body, x, y).style(body_style), area);

        let face_style = self.config.style("bird_face", Style::default().fg(Color::Black).bold());
        f.render_widget(Sprite::new(game::BIRD_FACE, x, y).style(face_style).transparent_whitespace(true), area);
    }

    fn draw_score(&self, f: &mut Frame<'_>, area: Rect) {
        let style = self.config.style("score", Style::default().fg(Color::Gray));
        let lines = vec![
            Line::from(format!("Score: {}", self.session.score())),
            Line::from(format!("Best:  {}", self.session.best())),
        ];
        let paragraph = Paragraph::new(lines).style(style);
        f.render_widget(paragraph, area.inner(Margin { horizontal: 2, vertical: 1 }));
    }

    fn draw_game_over(&self, f: &mut Frame<'_>, area: Rect) {
        let style = self.config.style("overlay", Style::default().fg(Color::White).bold());
        let lines = vec![
            Line::from("GAME OVER"),
            Line::from(""),
            Line::from(format!("Score: {}", self.session.score())),
            Line::from(format!("Best:  {}", self.session.best())),
            Line::from(""),
            Line::from("Press SPACE to restart"),
        ];

        let width = lines.iter().map(Line::width).max().unwrap_or(0) as u16 + 2 * 3 + 2;
        let height = lines.len() as u16 + 2 * 1 + 2;
        let [panel] = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center).areas(area);
        let [panel] = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center).areas(panel);

        f.render_widget(Clear, panel);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .padding(Padding::symmetric(3, 1));
        f.render_widget(Paragraph::new(lines).alignment(Alignment::Center).style(style).block(block), panel);
    }
}

impl Page for GamePage {
    fn id(&self) -> PageId {
        PageId::Game
    }

    fn register_keymap(&mut self, keymaps: &HashMap<PageId, PageKeyBindings>) -> Result<()> {
        if let Some(keymap) = keymaps.get(&self.id()) {
            self.keymap = keymap.clone();
        }
        Ok(())
    }

    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(tx);
        Ok(())
    }

    fn register_config_handler(&mut self, config: Config) -> Result<()> {
        self.config = config;
        Ok(())
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action.command {
            Command::Tick => self.session.tick(),
            // Entering the page always starts a fresh run.
            Command::StartGame => self.session.restart(),
            Command::Game(GameAction::Flap) if action.state == ActionState::Start => self.session.activate(),
            Command::Game(GameAction::Back) => {
                if let Some(action_tx) = &self.action_tx {
                    action_tx.send(act!(Command::GoHome))?;
                }
            },
            _ => {},
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        self.draw_clouds(f, area);
        self.draw_pipes(f, area);
        self.draw_bird(f, area);
        self.draw_score(f, area);

        if self.session.state() == SessionState::GameOver {
            self.draw_game_over(f, area);
        }

        Ok(())
    }
}

impl Default for GamePage {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds one pipe segment as text rows: a solid cap row on the gap side,
/// plain body rows elsewhere.
fn pipe_lines(width: u16, height: u16, cap_at_bottom: bool) -> Vec<String> {
    let body = std::iter::repeat_n('|', width as usize).collect::<String>();
    let cap = std::iter::repeat_n('█', width as usize).collect::<String>();

    let mut lines: Vec<String> =
        std::iter::repeat_with(|| body.clone()).take(height.saturating_sub(1) as usize).collect();
    if cap_at_bottom {
        lines.push(cap);
    } else {
        lines.insert(0, cap);
    }
    lines
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_pipe_lines_cap_placement() {
        let top = pipe_lines(3, 4, true);
        assert_eq!(top, vec!["|||", "|||", "|||", "███"]);

        let bottom = pipe_lines(3, 2, false);
        assert_eq!(bottom, vec!["███", "|||"]);

        // Degenerate one-row segment is just the cap.
        assert_eq!(pipe_lines(2, 1, true), vec!["██"]);
    }

    #[test]
    fn test_world_to_cell_scaling() {
        let area = Rect::new(0, 0, 48, 32);
        assert_eq!(GamePage::cell_x(area, 0.0), 0);
        assert_eq!(GamePage::cell_x(area, game::WORLD_WIDTH), 48);
        assert_eq!(GamePage::cell_x(area, game::WORLD_WIDTH / 2.0), 24);
        assert_eq!(GamePage::cell_y(area, game::WORLD_HEIGHT), 32);
    }

    #[test]
    fn test_flap_only_fires_on_press() {
        let mut page = GamePage::new();
        page.session.restart();
        page.update(act!(Command::Game(GameAction::Flap), ActionState::End)).unwrap();
        assert_eq!(page.session.bird().velocity(), 0.0);

        page.update(act!(Command::Game(GameAction::Flap))).unwrap();
        assert_eq!(page.session.bird().velocity(), game::FLAP_VELOCITY);
    }
}
