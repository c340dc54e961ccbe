use std::{fmt::Display, str::FromStr};

use crate::{error::AppError, structs::package::Package, structs::reason::UpdateState};

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum Tab {
    #[default]
    All,
    Installed,
    Updates,
}
impl Tab {
    pub fn values() -> Vec<String> {
        vec![
            Tab::All.to_string(),
            Tab::Installed.to_string(),
            Tab::Updates.to_string(),
        ]
    }

    pub(crate) fn cycle_next(&mut self) {
        *self = match self {
            Tab::All => Tab::Installed,
            Tab::Installed => Tab::Updates,
            Tab::Updates => Tab::All,
        };
    }
    pub fn cycle_prev(&mut self) {
        *self = match self {
            Tab::All => Tab::Updates,
            Tab::Installed => Tab::All,
            Tab::Updates => Tab::Installed,
        };
    }

    /// Whether the package is listed on this tab
    pub fn shows(&self, pack: &Package) -> bool {
        match self {
            Tab::All => true,
            Tab::Installed => pack.update_state() != UpdateState::NotInstalled,
            Tab::Updates => pack.update_state() == UpdateState::UpdateAvailable,
        }
    }
}

impl Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tab::All => write!(f, "All"),
            Tab::Installed => write!(f, "Installed"),
            Tab::Updates => write!(f, "Updates"),
        }
    }
}

impl FromStr for Tab {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Tab::All),
            "installed" => Ok(Tab::Installed),
            "updates" => Ok(Tab::Updates),
            other => Err(AppError::Parse(format!("unknown tab '{other}'"))),
        }
    }
}

//for select ratatui::Tabs
impl From<&Tab> for Option<usize> {
    fn from(tab: &Tab) -> Self {
        match tab {
            Tab::All => Some(0),
            Tab::Installed => Some(1),
            Tab::Updates => Some(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle() {
        let mut tab = Tab::default();
        tab.cycle_next();
        assert_eq!(tab, Tab::Installed);
        tab.cycle_next();
        tab.cycle_next();
        assert_eq!(tab, Tab::All);
        tab.cycle_prev();
        assert_eq!(tab, Tab::Updates);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Installed".parse::<Tab>().unwrap(), Tab::Installed);
        assert_eq!("updates".parse::<Tab>().unwrap(), Tab::Updates);
        assert!("orphans".parse::<Tab>().is_err());
    }
}
