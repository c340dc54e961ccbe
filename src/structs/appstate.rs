use std::time::Duration;

use crate::{
    structs::{tab::Tab, timedstring::TimedString},
    widgets::packages::PackagesWidget,
};

pub struct AppState {
    pub show_info: bool,
    pub show_help: bool,
    pub message: TimedString,
    pub packages_widget: PackagesWidget,
}

impl AppState {
    pub fn new(tab: Tab) -> Self {
        Self {
            packages_widget: PackagesWidget::new(tab),
            ..Default::default()
        }
    }

    pub fn set_message(&mut self, message: &str) {
        self.message = TimedString::new(message, Duration::from_secs(5));
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            show_info: true,
            show_help: false,
            message: TimedString::new("", Duration::from_secs(5)),
            packages_widget: PackagesWidget::default(),
        }
    }
}
