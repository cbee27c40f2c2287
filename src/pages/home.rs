use std::collections::HashMap;

use color_eyre::eyre::Result;
use derive_builder::Builder;
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Clear, Paragraph},
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;

use super::{Page, PageId};
use crate::{
    action::{act, Action, ActionState, Command, HomeAction},
    config::PageKeyBindings,
    constants::{SUBTITLE_TEXT, TITLE_TEXT},
};

#[derive(Copy, Clone, PartialEq, Eq)]
pub enum OptionItem {
    Start,
    Quit,
}

#[derive(Builder)]
pub struct HomePage {
    #[builder(default)]
    pub action_tx: Option<UnboundedSender<Action>>,
    #[builder(default)]
    pub keymap: PageKeyBindings,
    options: Vec<(OptionItem, &'static str)>,
    selected_option_index: usize,
}

impl HomePage {
    pub fn new() -> Self {
        HomePageBuilder::default()
            .options(vec![(OptionItem::Start, "Start playing"), (OptionItem::Quit, "Quit")])
            .selected_option_index(0)
            .build()
            .unwrap()
    }

    fn up(&mut self) {
        if self.selected_option_index > 0 {
            self.selected_option_index -= 1;
        }
    }

    fn down(&mut self) {
        if self.selected_option_index < self.options.len() - 1 {
            self.selected_option_index += 1;
        }
    }

    fn select(&mut self) -> Result<()> {
        let Some(action_tx) = &self.action_tx else {
            return Ok(());
        };
        match self.options[self.selected_option_index].0 {
            OptionItem::Start => action_tx.send(act!(Command::StartGame))?,
            OptionItem::Quit => action_tx.send(act!(Command::Quit))?,
        }
        Ok(())
    }
}

impl Page for HomePage {
    fn id(&self) -> PageId {
        PageId::Home
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

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if let Command::Home(command) = action.command {
            match command {
                HomeAction::Up => self.up(),
                HomeAction::Down => self.down(),
                HomeAction::Select => self.select()?,
            }
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, rect: Rect) -> Result<()> {
        f.render_widget(Clear, rect);

        let title_lines: Vec<&str> = TITLE_TEXT.lines().filter(|s| !s.is_empty()).collect();
        let num_title_lines = title_lines.len() as u16 + 2;

        let num_options = self.options.len() as u16;
        let option_height = num_options * 2 - 1;

        let [title_area, option_area] =
            Layout::vertical([Constraint::Length(num_title_lines), Constraint::Length(option_height)])
                .flex(Flex::SpaceAround)
                .areas(rect);

        // Title and subtitle
        let mut lines = title_lines.iter().map(|line| Line::from(*line)).collect::<Vec<_>>();
        lines.push(Line::from(""));
        lines.push(Line::from(SUBTITLE_TEXT).style(Style::default().fg(Color::DarkGray)));
        let paragraph = Paragraph::new(lines).style(Style::default().fg(Color::Yellow)).alignment(Alignment::Center);
        f.render_widget(paragraph, title_area);

        // Menu options, selected one highlighted
        let max_option_len = self.options.iter().map(|(_, title)| title.len()).max().unwrap_or(0) as u16;
        let [option_area] =
            Layout::horizontal([Constraint::Length(max_option_len + 4)]).flex(Flex::SpaceAround).areas(option_area);

        let mut lines: Vec<Line> = Vec::new();
        for (index, (_, title)) in self.options.iter().enumerate() {
            let padded = format!("  {title:<width$}  ", width = max_option_len as usize);
            let style = if index == self.selected_option_index {
                Style::default().bg(Color::Cyan).fg(Color::Black)
            } else {
                Style::default()
            };
            lines.push(Line::from(padded).style(style));
            if index < self.options.len() - 1 {
                lines.push(Line::from(""));
            }
        }

        let paragraph = Paragraph::new(lines).style(Style::default().fg(Color::White)).alignment(Alignment::Left);
        f.render_widget(paragraph, option_area);

        Ok(())
    }
}

impl Default for HomePage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut page = HomePage::new();
        page.up();
        assert_eq!(page.selected_option_index, 0);

        page.down();
        assert_eq!(page.selected_option_index, 1);
        page.down();
        assert_eq!(page.selected_option_index, 1);
    }

    #[test]
    fn test_select_sends_start() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut page = HomePage::new();
        page.register_action_handler(tx).unwrap();

        page.update(act!(Command::Home(HomeAction::Select))).unwrap();
        assert_eq!(rx.try_recv().unwrap(), act!(Command::StartGame));

        page.update(act!(Command::Home(HomeAction::Down))).unwrap();
        page.update(act!(Command::Home(HomeAction::Select))).unwrap();
        assert_eq!(rx.try_recv().unwrap(), act!(Command::Quit));
    }
}
