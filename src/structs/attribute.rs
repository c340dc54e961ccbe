use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

/// Every displayable property of a package
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Attribute {
    #[default]
    None,
    Name,
    Version,
    Url,
    Repo,
    Packager,
    BuildDate,
    InstallState,
    UpdateState,
    Desc,
    Arch,
    Licenses,
    Groups,
    Depends,
    OptDepends,
    Conflicts,
    Provides,
    Replaces,
    RequiredBy,
    OptionalFor,
    Signature,
    Size,
    ISize,
}

impl Attribute {
    /// In identifier order, so `ALL[i]` has identifier `i`
    pub const ALL: [Attribute; 23] = [
        Attribute::None,
        Attribute::Name,
        Attribute::Version,
        Attribute::Url,
        Attribute::Repo,
        Attribute::Packager,
        Attribute::BuildDate,
        Attribute::InstallState,
        Attribute::UpdateState,
        Attribute::Desc,
        Attribute::Arch,
        Attribute::Licenses,
        Attribute::Groups,
        Attribute::Depends,
        Attribute::OptDepends,
        Attribute::Conflicts,
        Attribute::Provides,
        Attribute::Replaces,
        Attribute::RequiredBy,
        Attribute::OptionalFor,
        Attribute::Signature,
        Attribute::Size,
        Attribute::ISize,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Attribute::None => "none",
            Attribute::Name => "name",
            Attribute::Version => "version",
            Attribute::Url => "url",
            Attribute::Repo => "repo",
            Attribute::Packager => "packager",
            Attribute::BuildDate => "builddate",
            Attribute::InstallState => "reason",
            Attribute::UpdateState => "updates",
            Attribute::Desc => "desc",
            Attribute::Arch => "arch",
            Attribute::Licenses => "licenses",
            Attribute::Groups => "groups",
            Attribute::Depends => "depends",
            Attribute::OptDepends => "optdepends",
            Attribute::Conflicts => "conflicts",
            Attribute::Provides => "provides",
            Attribute::Replaces => "replaces",
            Attribute::RequiredBy => "requiredby",
            Attribute::OptionalFor => "optfor",
            Attribute::Signature => "signature",
            Attribute::Size => "size",
            Attribute::ISize => "isize",
        }
    }

    /// Attributes shown in the info pane, in display order
    pub fn info_fields() -> impl Iterator<Item = Attribute> {
        Attribute::ALL.into_iter().filter(|a| *a != Attribute::None)
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl TryFrom<u8> for Attribute {
    type Error = AppError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Attribute::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| AppError::InvalidAttribute(value.to_string()))
    }
}

impl FromStr for Attribute {
    type Err = AppError;

    /// Accepts a label or its numeric identifier
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if let Ok(id) = s.parse::<u8>() {
            return Attribute::try_from(id);
        }
        Attribute::ALL
            .into_iter()
            .find(|a| a.label() == s)
            .ok_or(AppError::InvalidAttribute(s))
    }
}
