use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    widgets::{Block, BorderType, Borders, Clear, Padding, Row, Table, Widget},
};

use crate::{
    action::ActionState,
    config::{key_event_to_string, PageKeyBindings},
};

/// Overlay listing the active keybindings, one bordered table per group.
#[derive(Debug)]
pub struct Help {
    groups: Vec<(String, Vec<(String, String)>)>,
}

impl Help {
    pub fn new(keybinding_groups: Vec<(String, PageKeyBindings)>) -> Self {
        let groups = keybinding_groups
            .into_iter()
            .map(|(name, bindings)| {
                let mut rows: Vec<(String, String)> = bindings
                    .iter()
                    .filter(|(_, action)| action.state == ActionState::Start)
                    .map(|(event, action)| (key_event_to_string(event), action.command.to_string()))
                    .collect();
                rows.sort();
                (name, rows)
            })
            .collect();

        Help { groups }
    }
}

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let key_length = self
            .groups
            .iter()
            .flat_map(|(_, rows)| rows.iter().map(|(key, _)| key.len()))
            .max()
            .unwrap_or(0) as u16;
        let command_length = self
            .groups
            .iter()
            .flat_map(|(_, rows)| rows.iter().map(|(_, command)| command.len()))
            .max()
            .unwrap_or(0) as u16;

        // columns + spacing + padding + border
        let width = key_length + command_length + 5 + 2 * 2 + 2;
        // rows + padding + header + border
        let heights: Vec<Constraint> =
            self.groups.iter().map(|(_, rows)| Constraint::Length(rows.len() as u16 + 2 + 2 + 2)).collect();

        let [area] = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center).areas(area);
        let areas = Layout::vertical(heights).flex(Flex::Center).split(area);

        for ((name, rows), group_area) in self.groups.into_iter().zip(areas.iter()) {
            let rows: Vec<Row> = rows.into_iter().map(|(key, command)| Row::new(vec![key, command])).collect();
            let table = Table::new(rows, [Constraint::Length(key_length), Constraint::Min(command_length)])
                .column_spacing(5)
                .header(Row::new(vec!["Key", "Command"]).style(Style::new().bold()).bottom_margin(1))
                .block(
                    Block::new()
                        .title(name)
                        .title_alignment(Alignment::Center)
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::new().bold().fg(Color::Cyan))
                        .padding(Padding::symmetric(2, 1)),
                );

            Clear.render(*group_area, buf);
            table.render(*group_area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_help_collects_click_bindings() {
        let config = Config::new().unwrap();
        let help = Help::new(vec![("System".to_string(), config.keybindings.global.clone())]);

        assert!(!help.groups.is_empty());
        let (_, rows) = &help.groups[0];
        assert!(rows.iter().any(|(_, command)| command == "Quit"));
    }
}
