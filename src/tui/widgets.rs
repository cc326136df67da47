use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Row, StatefulWidget, Table, TableState, Widget},
};

use super::theme::Theme;
use crate::router::Route;

/// Navigation menu shown in the sidebar, one row per top-level route
pub struct MenuWidget<'a> {
    pub routes: &'a [Route],
    pub current: &'a Route,
    pub authenticated: bool,
    pub focused: bool,
    pub theme: &'a Theme,
}

/// Highlighted row of the navigation menu
pub struct MenuState {
    pub table_state: TableState,
}

impl MenuState {
    pub fn new(selected: usize) -> Self {
        let mut table_state = TableState::default();
        table_state.select(Some(selected));
        Self { table_state }
    }
}

impl<'a> StatefulWidget for MenuWidget<'a> {
    type State = MenuState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let rows = self.routes.iter().map(|route| {
            // Protected entries are marked while logged out; opening them lands on login
            let marker = if route.requires_auth() && !self.authenticated {
                "[*]"
            } else {
                ""
            };
            let style = if route == self.current {
                self.theme.selected()
            } else {
                Style::default().fg(self.theme.text)
            };
            Row::new(vec![
                Cell::from(route.title()).style(style),
                Cell::from(marker).style(Style::default().fg(self.theme.muted)),
            ])
        });

        let border = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border
        };

        let table = Table::new(rows, [Constraint::Min(16), Constraint::Length(3)])
            .block(
                Block::default()
                    .title("Menu")
                    .borders(Borders::RIGHT)
                    .border_style(Style::default().fg(border)),
            )
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("▶ ");

        if self.focused {
            StatefulWidget::render(table, area, buf, &mut state.table_state);
        } else {
            StatefulWidget::render(table, area, buf, &mut TableState::default());
        }
    }
}

/// Centered yes/no prompt guarding a destructive action
pub struct ConfirmDialog<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub busy: bool,
    pub theme: &'a Theme,
}

impl<'a> Widget for ConfirmDialog<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = area.width.min(60);
        let height = 7;

        let dialog_area = Rect {
            x: area.x + (area.width.saturating_sub(width)) / 2,
            y: area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height: height.min(area.height),
        };

        Clear.render(dialog_area, buf);
        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.warning));

        let inner = block.inner(dialog_area);
        block.render(dialog_area, buf);
        if inner.height < 2 {
            return;
        }

        buf.set_stringn(
            inner.x + 1,
            inner.y + 1,
            self.message,
            inner.width.saturating_sub(2) as usize,
            Style::default().fg(self.theme.text),
        );

        let shortcuts = if self.busy {
            "Deleting..."
        } else {
            "[y] Delete  [n] Cancel"
        };
        buf.set_string(
            inner.x + (inner.width.saturating_sub(shortcuts.len() as u16)) / 2,
            inner.y + inner.height - 1,
            shortcuts,
            Style::default()
                .fg(self.theme.header)
                .add_modifier(Modifier::BOLD),
        );
    }
}
