use std::{cmp::Ordering, collections::HashSet};

use crate::utils::natural_cmp;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Constraint,
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, Cell, Clear, Row, StatefulWidget, Table, TableState, Widget},
};
use tui_textarea::TextArea;

#[derive(Default, Debug, Clone)]
pub struct TableWidget {
    columns: Vec<String>,
    widths: Vec<Constraint>,
    data: Vec<TableRow>,
    filtered: Vec<TableRow>,
    table_state: TableState,
    sort_by: (usize, Sort),
    //keys of selected rows
    selected: HashSet<usize>,
    title: Option<String>,
    search_text_area: TextArea<'static>,
    searching: bool,
}

#[derive(Debug, Default, PartialEq, Clone, Copy)]
pub enum Sort {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    /// Identifies the row across sorting and filtering
    pub key: usize,
    pub cells: Vec<String>,
    /// Per column numbers to sort by instead of the cell text
    pub sort_values: Vec<Option<i64>>,
    pub highlight: Option<Color>,
}

impl TableRow {
    pub fn new(key: usize, cells: Vec<String>) -> Self {
        Self {
            key,
            cells,
            ..Default::default()
        }
    }
    pub fn with_highlight(self, highlight: Option<Color>) -> Self {
        Self { highlight, ..self }
    }
    pub fn with_sort_values(self, sort_values: Vec<Option<i64>>) -> Self {
        Self {
            sort_values,
            ..self
        }
    }

    fn cmp_column(&self, other: &TableRow, col: usize) -> Ordering {
        let numbers = (
            self.sort_values.get(col).copied().flatten(),
            other.sort_values.get(col).copied().flatten(),
        );
        match numbers {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => natural_cmp(&self.cells[col], &other.cells[col]),
        }
    }
}

impl TableWidget {
    pub fn new(columns: &[&str], widths: Vec<Constraint>) -> Self {
        Self {
            columns: columns.iter().map(|s| s.to_string()).collect(),
            widths,
            data: vec![],
            filtered: vec![],
            table_state: TableState::default(),
            sort_by: (0, Sort::Asc),
            selected: HashSet::new(),
            title: None,
            search_text_area: get_textarea(),
            searching: false,
        }
    }

    ///return true if event was handled and should not be processed further
    pub(crate) fn handle_key_event(&mut self, key: &KeyEvent) -> bool {
        if self.searching {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => {
                    self.searching = false;
                    return true;
                }
                _ => {}
            }
            self.search_text_area.input(*key);
            self.update_filtered();

            return true; //dont process other items
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.safe_move(-1),
            KeyCode::Down | KeyCode::Char('j') => self.safe_move(1),
            KeyCode::Esc => {
                self.clear_search();
                self.clear_selection();
            }
            KeyCode::Home => self.safe_move(isize::MIN),
            KeyCode::End => self.safe_move(isize::MAX),
            KeyCode::PageUp => self.safe_move(-10),
            KeyCode::PageDown => self.safe_move(10),
            KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                let index = c as usize - '1' as usize;
                self.set_sort(index);
                self.do_sort();
            }
            KeyCode::Char(' ') => {
                if let Some(current) = self.get_current().map(|r| r.key) {
                    if !self.selected.remove(&current) {
                        self.selected.insert(current);
                    }
                    self.safe_move(1);
                }
            }
            KeyCode::Char('/') => self.searching = true,
            KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.get_selected().len() == self.filtered.len() {
                    self.clear_selection();
                } else {
                    self.select_all();
                }
            }
            _ => return false,
        }
        true
    }

    fn get_filter(&self) -> String {
        self.search_text_area.lines().join(" ")
    }

    pub(crate) fn set_data(&mut self, rows: Vec<TableRow>) {
        if rows == self.data {
            return;
        }

        self.data = rows;
        //drop selections whose rows are gone
        let keys = self.data.iter().map(|r| r.key).collect::<HashSet<_>>();
        self.selected.retain(|k| keys.contains(k));
        self.update_filtered();
    }

    fn safe_move(&mut self, change: isize) {
        if self.filtered.is_empty() {
            return;
        }

        let len = self.filtered.len();
        let tstate = &mut self.table_state;
        if change < 0 {
            tstate.select(
                tstate
                    .selected()
                    .map(|s| s.saturating_sub(change.unsigned_abs())),
            );
        } else {
            tstate.select(
                tstate
                    .selected()
                    .map(|s| (s.saturating_add(change as usize)).min(len - 1)),
            );
        }
    }
    fn set_sort(&mut self, column_index: usize) {
        if column_index >= self.columns.len() {
            return;
        }

        if self.sort_by.0 == column_index {
            if self.sort_by.1 == Sort::Asc {
                self.sort_by.1 = Sort::Desc;
            } else {
                self.sort_by.1 = Sort::Asc;
            }
        } else {
            self.sort_by.0 = column_index;
            self.sort_by.1 = Sort::Asc;
        }
    }
    fn do_sort(&mut self) {
        let current = self.get_current().map(|r| r.key);
        self.sort_rows();
        self.select_key(current);
    }
    fn sort_rows(&mut self) {
        let sort_col = self.sort_by.0;
        match self.sort_by.1 {
            Sort::Asc => self.filtered.sort_by(|a, b| a.cmp_column(b, sort_col)),
            Sort::Desc => self.filtered.sort_by(|a, b| b.cmp_column(a, sort_col)),
        }
    }

    //keep the cursor on the same row, else go to the top
    pub(crate) fn select_key(&mut self, key: Option<usize>) {
        let index = key.and_then(|k| self.filtered.iter().position(|r| r.key == k));
        match index {
            Some(i) => self.table_state.select(Some(i)),
            None if self.filtered.is_empty() => self.table_state.select(None),
            None => self.table_state.select(Some(0)),
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub(crate) fn set_selected(&mut self, keys: impl IntoIterator<Item = usize>) {
        self.selected = keys.into_iter().collect();
    }

    pub fn get_selected(&self) -> Vec<&TableRow> {
        self.filtered
            .iter()
            .filter(|r| self.selected.contains(&r.key))
            .collect::<Vec<&TableRow>>()
    }

    pub(crate) fn select_all(&mut self) {
        self.selected = self.filtered.iter().map(|r| r.key).collect();
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    pub(crate) fn rows(&self) -> &Vec<TableRow> {
        &self.filtered
    }

    pub fn clear_search(&mut self) {
        self.search_text_area.select_all();
        self.search_text_area.cut();
        self.update_filtered();
    }
    fn update_filtered(&mut self) {
        let current = self.get_current().map(|r| r.key);

        let filter = self.get_filter().to_lowercase();
        if filter.is_empty() {
            self.filtered = self.data.clone();
        } else {
            self.filtered = self
                .data
                .iter()
                .filter(|row| {
                    row.cells
                        .iter()
                        .any(|cell| cell.to_lowercase().contains(&filter))
                })
                .cloned()
                .collect();
        }
        self.sort_rows();
        self.select_key(current);
    }

    pub(crate) fn get_current(&self) -> Option<&TableRow> {
        self.table_state
            .selected()
            .and_then(|i| self.filtered.get(i))
    }
}

impl Widget for TableWidget {
    fn render(mut self, area: ratatui::layout::Rect, buf: &mut ratatui::buffer::Buffer) {
        let selected_colour = Color::LightBlue;

        let footer = if self.selected.is_empty() {
            String::new()
        } else {
            format!("{} selected", self.selected.len())
        };
        let block = Block::bordered()
            .title(self.title.clone().unwrap_or_default())
            .title_bottom(Line::from(footer).bg(selected_colour).black().underlined());

        let mut table = Table::new(
            self.filtered.iter().map(|item| {
                let mut row = Row::new(item.cells.iter().map(|c| c.as_str()));
                if self.selected.contains(&item.key) {
                    row = row.bg(selected_colour).fg(Color::Black).underlined();
                } else if let Some(col) = item.highlight {
                    row = row.fg(col);
                }
                row
            }),
            self.widths,
        )
        .row_highlight_style(Style::new().bg(Color::Yellow).fg(Color::Black))
        .block(block);
        if !self.columns.is_empty() {
            table = table.header(
                self.columns
                    .iter()
                    .cloned()
                    .enumerate()
                    .map(|(i, c)| {
                        let c = match self.sort_by.1 {
                            Sort::Asc if self.sort_by.0 == i => format!("{} ↑", c),
                            Sort::Desc if self.sort_by.0 == i => format!("{} ↓", c),
                            _ => c,
                        };
                        Cell::from(c).black()
                    })
                    .collect::<Row>()
                    .bold()
                    .bg(Color::Red),
            )
        }
        <Table as StatefulWidget>::render(table, area, buf, &mut self.table_state);

        let top_right = ratatui::layout::Rect {
            x: area.x + area.width.saturating_sub(21),
            y: area.y,
            width: area.width.min(20),
            height: area.height.min(1),
        };

        draw_search(&mut self.search_text_area, top_right, buf, self.searching);
    }
}

fn draw_search(
    search_text_area: &mut TextArea<'static>,
    area: ratatui::prelude::Rect,
    buf: &mut ratatui::prelude::Buffer,
    searching: bool,
) {
    if !searching && search_text_area.is_empty() {
        return;
    }
    Clear.render(area, buf);

    if searching {
        search_text_area.set_cursor_style(Style::default().bg(Color::White));
        search_text_area.set_style(Style::default().bg(Color::Blue).fg(Color::Black));
    } else {
        search_text_area.set_cursor_style(Style::default());
        search_text_area.set_style(Style::default().bg(Color::Gray).fg(Color::Black));
    }
    search_text_area.render(area, buf);
}

fn get_textarea() -> TextArea<'static> {
    let mut textarea = TextArea::default();
    textarea.set_placeholder_text("Search...");
    textarea.set_style(Style::default().bg(Color::Blue).fg(Color::Black));
    textarea.set_placeholder_style(Style::default().bg(Color::Blue).fg(Color::DarkGray));

    textarea
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn table() -> TableWidget {
        let mut table = TableWidget::new(
            &["Name", "Size"],
            vec![Constraint::Percentage(50), Constraint::Percentage(50)],
        );
        table.set_data(vec![
            TableRow::new(0, vec!["vim".into(), "2.00 MB".into()])
                .with_sort_values(vec![None, Some(2 * 1024 * 1024)]),
            TableRow::new(1, vec!["bash".into(), "900.00 KB".into()])
                .with_sort_values(vec![None, Some(900 * 1024)]),
            TableRow::new(2, vec!["zsh10".into(), "3.00 KB".into()])
                .with_sort_values(vec![None, Some(3 * 1024)]),
            TableRow::new(3, vec!["zsh2".into(), "1.00 GB".into()])
                .with_sort_values(vec![None, Some(1024 * 1024 * 1024)]),
        ]);
        table
    }

    fn keys(table: &TableWidget) -> Vec<usize> {
        table.rows().iter().map(|r| r.key).collect()
    }

    #[test]
    fn test_sort() {
        let mut table = table();
        //natural order on names
        assert_eq!(keys(&table), vec![1, 0, 3, 2]);
        assert_eq!(table.get_current().map(|r| r.key), Some(1));

        //sizes sort by bytes, not by text
        table.handle_key_event(&key(KeyCode::Char('2')));
        assert_eq!(keys(&table), vec![2, 1, 0, 3]);
        table.handle_key_event(&key(KeyCode::Char('2')));
        assert_eq!(keys(&table), vec![3, 0, 1, 2]);
        //cursor stays on the same row
        assert_eq!(table.get_current().map(|r| r.key), Some(1));

        //out of range column and zero are ignored
        table.handle_key_event(&key(KeyCode::Char('9')));
        assert!(!table.handle_key_event(&key(KeyCode::Char('0'))));
        assert_eq!(keys(&table), vec![3, 0, 1, 2]);
    }

    #[test]
    fn test_search() {
        let mut table = table();
        assert!(table.handle_key_event(&key(KeyCode::Char('/'))));
        for c in "ZSH".chars() {
            table.handle_key_event(&key(KeyCode::Char(c)));
        }
        table.handle_key_event(&key(KeyCode::Enter));
        assert_eq!(keys(&table), vec![3, 2]);

        table.handle_key_event(&key(KeyCode::Esc));
        assert_eq!(table.rows().len(), 4);
    }

    #[test]
    fn test_selection() {
        let mut table = table();
        table.handle_key_event(&key(KeyCode::Char(' ')));
        table.handle_key_event(&key(KeyCode::Char(' ')));
        let selected: Vec<_> = table.get_selected().iter().map(|r| r.key).collect();
        assert_eq!(selected, vec![1, 0]);

        let ctrl_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        table.handle_key_event(&ctrl_a);
        assert_eq!(table.get_selected().len(), 4);
        table.handle_key_event(&ctrl_a);
        assert!(table.get_selected().is_empty());

        //selection survives new data when the row is still there
        table.handle_key_event(&key(KeyCode::Char(' ')));
        let mut rows = table.rows().clone();
        rows[0].cells[1] = "changed".into();
        rows.pop();
        table.set_data(rows);
        assert_eq!(table.get_selected().len(), 1);
    }
}
