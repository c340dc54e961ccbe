use std::fmt::Display;

/// Pending operation the user has tagged a package with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Operation {
    #[default]
    None,
    Install,
    Remove,
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::None => write!(f, "none"),
            Operation::Install => write!(f, "install"),
            Operation::Remove => write!(f, "remove"),
        }
    }
}
