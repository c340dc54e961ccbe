use crossterm::event::KeyEvent;

use crate::structs::{event::EventResult, package::Package};

pub mod info;
pub mod packages;
pub mod table;

pub trait Commands {
    /// (key, help text, status bar text)
    fn command_descriptions(&self) -> Vec<(&str, &str, &str)>;
    fn handle_key_event(&mut self, key: &KeyEvent) -> Option<EventResult>;
}

pub trait CurrentPackage {
    fn current_package(&self) -> Option<&Package>;
}
