use std::collections::HashSet;

use crossterm::event::KeyCode;
use ratatui::{layout::Constraint, style::Color, widgets::Widget};

use crate::{
    structs::{
        attribute::Attribute,
        event::{EventCommand, EventResult},
        operation::Operation,
        package::Package,
        reason::UpdateState,
        tab::Tab,
    },
    widgets::{
        Commands, CurrentPackage,
        table::{TableRow, TableWidget},
    },
};

/// Package attributes shown as table columns, before the operation column
const COLUMNS: [Attribute; 5] = [
    Attribute::Name,
    Attribute::Version,
    Attribute::Repo,
    Attribute::Size,
    Attribute::UpdateState,
];

#[derive(Debug, Clone)]
pub struct PackagesWidget {
    data: Vec<Package>,
    tab: Tab,
    table: TableWidget,
}

impl Default for PackagesWidget {
    fn default() -> Self {
        Self {
            data: vec![],
            tab: Tab::default(),
            table: TableWidget::new(
                &["Name", "Version", "Repo", "Size", "State", "Op"],
                vec![
                    Constraint::Percentage(30),
                    Constraint::Percentage(25),
                    Constraint::Length(12),
                    Constraint::Length(12),
                    Constraint::Length(17),
                    Constraint::Length(8),
                ],
            ),
        }
    }
}

impl PackagesWidget {
    pub fn new(tab: Tab) -> Self {
        Self {
            tab,
            ..Default::default()
        }
    }

    /// Replace the package list. Each package's column index becomes its row key.
    /// Keys change on reload, so selection and cursor follow the package identity
    pub fn set_data(&mut self, data: Vec<Package>) {
        let selected = self
            .table
            .get_selected()
            .iter()
            .filter_map(|r| self.data.get(r.key))
            .map(identity)
            .collect::<HashSet<_>>();
        let current = self.current_package().map(identity);

        self.data = data;
        for (i, pack) in self.data.iter_mut().enumerate() {
            pack.set_col_index(i as i32);
        }
        let key_of = |id: &(String, String)| {
            self.data
                .iter()
                .find(|p| identity(p) == *id)
                .map(|p| p.col_index() as usize)
        };
        let selected_keys = selected.iter().filter_map(key_of).collect::<Vec<_>>();
        let current_key = current.as_ref().and_then(key_of);

        self.table.clear_selection();
        self.refresh_table();
        self.table.set_selected(selected_keys);
        self.table.select_key(current_key);
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.refresh_table();
    }

    fn refresh_table(&mut self) {
        let rows = self
            .data
            .iter()
            .filter(|p| self.tab.shows(p))
            .map(package_row)
            .collect();
        self.table.set_data(rows);
        self.update_title();
    }

    fn update_title(&mut self) {
        let shown = self.table.rows().len();
        let pending = self.data.iter().filter(|p| p.op() != Operation::None).count();
        let extra = if pending > 0 {
            format!(" ({pending} pending)")
        } else {
            String::new()
        };
        self.table
            .set_title(&format!("{} {} packages{}", shown, self.tab, extra));
    }

    /// Tag the selected packages, or the current one when nothing is selected
    pub fn tag(&mut self, op: Operation) {
        let mut keys: Vec<usize> = self.table.get_selected().iter().map(|r| r.key).collect();
        if keys.is_empty() {
            keys.extend(self.table.get_current().map(|r| r.key));
        }
        for key in keys {
            if let Some(pack) = self.data.get_mut(key) {
                pack.set_op(op);
            }
        }
        self.table.clear_selection();
        self.refresh_table();
    }

    /// Names of packages tagged for install and for removal
    pub fn pending(&self) -> (Vec<String>, Vec<String>) {
        let names = |op| {
            self.data
                .iter()
                .filter(|p| p.op() == op)
                .map(|p| p.name().to_string())
                .collect::<Vec<_>>()
        };
        (names(Operation::Install), names(Operation::Remove))
    }
}

fn identity(pack: &Package) -> (String, String) {
    (pack.repo().to_string(), pack.name().to_string())
}

fn package_row(pack: &Package) -> TableRow {
    let mut cells: Vec<String> = COLUMNS.iter().map(|a| pack.get_attr(*a)).collect();
    cells.push(match pack.op() {
        Operation::None => String::new(),
        op => op.to_string(),
    });
    let sort_values = COLUMNS.iter().map(|a| pack.get_off_attr(*a).ok()).collect();

    let highlight = match pack.update_state() {
        UpdateState::UpdateAvailable => Some(Color::Yellow),
        UpdateState::UpToDate => Some(Color::Green),
        UpdateState::NotInstalled => None,
    };
    TableRow::new(pack.col_index() as usize, cells)
        .with_sort_values(sort_values)
        .with_highlight(highlight)
}

impl Widget for PackagesWidget {
    fn render(self, area: ratatui::layout::Rect, buf: &mut ratatui::buffer::Buffer) {
        self.table.render(area, buf);
    }
}

impl Commands for PackagesWidget {
    fn command_descriptions(&self) -> Vec<(&str, &str, &str)> {
        vec![
            ("+", "Tag selected packages for install", "Install"),
            ("-", "Tag selected packages for removal", "Remove"),
            ("Backspace", "Clear tag of selected packages", ""),
            ("x", "Apply pending operations", "Apply"),
        ]
    }

    fn handle_key_event(&mut self, key: &crossterm::event::KeyEvent) -> Option<EventResult> {
        if self.table.handle_key_event(key) {
            self.update_title(); //may have filtered
            return Some(EventResult::None);
        }
        match key.code {
            KeyCode::Char('+') => self.tag(Operation::Install),
            KeyCode::Char('-') => self.tag(Operation::Remove),
            KeyCode::Backspace => self.tag(Operation::None),
            KeyCode::Char('x') => {
                let (install, remove) = self.pending();
                return Some(EventResult::Command(EventCommand::ApplyPending {
                    install,
                    remove,
                }));
            }
            _ => return None,
        }
        Some(EventResult::None)
    }
}

impl CurrentPackage for PackagesWidget {
    fn current_package(&self) -> Option<&Package> {
        self.table
            .get_current()
            .and_then(|row| self.data.get(row.key))
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;
    use crate::pman::{PacmanDb, PacmanPackage};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn op_of(widget: &PackagesWidget, name: &str) -> Option<Operation> {
        widget.data.iter().find(|p| p.name() == name).map(|p| p.op())
    }

    fn pkg(name: &str, version: &str, size: i64) -> PacmanPackage {
        PacmanPackage {
            name: Some(name.to_string()),
            version: Some(version.to_string()),
            db_name: Some("extra".to_string()),
            size,
            ..Default::default()
        }
    }

    fn widget() -> PackagesWidget {
        let local = PacmanDb::new(vec![pkg("curl", "8.0-1", 0), pkg("vim", "9.1-1", 0)]);
        let packs = [
            pkg("vim", "9.1-1", 2048),
            pkg("curl", "8.1-1", 4096),
            pkg("emacs", "29-1", 1024),
        ]
        .iter()
        .map(|p| Package::new(p, &local))
        .collect();

        let mut widget = PackagesWidget::default();
        widget.set_data(packs);
        widget
    }

    #[test]
    fn test_rows() {
        let widget = widget();
        let rows = widget.table.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].cells[0], "curl");
        assert_eq!(rows[0].cells[1], "8.1-1 (local: 8.0-1)");
        assert_eq!(rows[0].cells[3], "4.00 KB");
        assert_eq!(rows[0].cells[4], "update available");
        assert_eq!(rows[0].highlight, Some(Color::Yellow));
        //only sizes have a numeric sort value
        assert_eq!(rows[0].sort_values, vec![None, None, None, Some(4096), None]);

        //keys are the column indexes given on load
        assert_eq!(widget.current_package().map(|p| p.col_index()), Some(1));
        assert_eq!(widget.current_package().map(|p| p.name()), Some("curl"));
    }

    #[test]
    fn test_tabs() {
        let mut widget = widget();
        widget.set_tab(Tab::Installed);
        assert_eq!(widget.table.rows().len(), 2);
        widget.set_tab(Tab::Updates);
        assert_eq!(widget.table.rows().len(), 1);
        assert_eq!(widget.current_package().map(|p| p.name()), Some("curl"));
        widget.set_tab(Tab::All);
        assert_eq!(widget.table.rows().len(), 3);
    }

    #[test]
    fn test_reload_keeps_selection_on_same_package() {
        let local = PacmanDb::default();
        let load = |names: &[&str]| {
            names
                .iter()
                .map(|n| Package::new(&pkg(n, "1-1", 0), &local))
                .collect::<Vec<_>>()
        };
        let mut widget = PackagesWidget::default();
        widget.set_data(load(&["aa", "bb", "cc"]));

        //select cc, cursor on bb
        widget.handle_key_event(&key(KeyCode::End));
        widget.handle_key_event(&key(KeyCode::Char(' ')));
        widget.handle_key_event(&key(KeyCode::Up));
        assert_eq!(widget.current_package().map(|p| p.name()), Some("bb"));

        //a new package shifts every index after it
        widget.set_data(load(&["aa", "ab", "bb", "cc"]));
        let selected = widget
            .table
            .get_selected()
            .iter()
            .map(|r| widget.data[r.key].name())
            .collect::<Vec<_>>();
        assert_eq!(selected, vec!["cc"]);
        assert_eq!(widget.current_package().map(|p| p.name()), Some("bb"));

        widget.handle_key_event(&key(KeyCode::Char('+')));
        assert_eq!(widget.pending().0, vec!["cc".to_string()]);

        //gone packages drop out of the selection
        widget.handle_key_event(&key(KeyCode::Char(' ')));
        assert_eq!(widget.current_package().map(|p| p.name()), Some("cc"));
        widget.set_data(load(&["aa"]));
        assert!(widget.table.get_selected().is_empty());
        assert_eq!(widget.current_package().map(|p| p.name()), Some("aa"));
    }

    #[test]
    fn test_tag_and_apply() {
        let mut widget = widget();
        //current row is curl
        widget.handle_key_event(&key(KeyCode::Char('-')));
        assert_eq!(op_of(&widget, "curl"), Some(Operation::Remove));

        //select emacs and vim, tag both
        widget.handle_key_event(&key(KeyCode::Down));
        widget.handle_key_event(&key(KeyCode::Char(' ')));
        widget.handle_key_event(&key(KeyCode::Char(' ')));
        widget.handle_key_event(&key(KeyCode::Char('+')));
        assert_eq!(widget.table.rows()[2].cells[5], "install");

        let res = widget.handle_key_event(&key(KeyCode::Char('x')));
        assert_eq!(
            res,
            Some(EventResult::Command(EventCommand::ApplyPending {
                install: vec!["vim".to_string(), "emacs".to_string()],
                remove: vec!["curl".to_string()],
            }))
        );

        //clearing the tag
        widget.handle_key_event(&key(KeyCode::Up));
        widget.handle_key_event(&key(KeyCode::Up));
        widget.handle_key_event(&key(KeyCode::Backspace));
        assert_eq!(op_of(&widget, "curl"), Some(Operation::None));

        assert_eq!(widget.handle_key_event(&key(KeyCode::Char('q'))), None);
    }
}
