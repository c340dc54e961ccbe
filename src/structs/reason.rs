use std::fmt::Display;

/// Why a package is installed, if at all
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InstallReason {
    #[default]
    NotInstalled,
    Explicit,
    AsDependency,
}

impl Display for InstallReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstallReason::NotInstalled => write!(f, "not installed"),
            InstallReason::Explicit => write!(f, "explicit"),
            InstallReason::AsDependency => write!(f, "as dependency"),
        }
    }
}

/// How the available version relates to the installed one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateState {
    #[default]
    NotInstalled,
    UpdateAvailable,
    UpToDate,
}

impl Display for UpdateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateState::NotInstalled => write!(f, "not installed"),
            UpdateState::UpdateAvailable => write!(f, "update available"),
            UpdateState::UpToDate => write!(f, "up to date"),
        }
    }
}
