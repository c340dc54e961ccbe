//! Read-only view of a package database.
//!
//! [`Package`](crate::structs::package::Package) is built against these traits
//! so it does not care whether the metadata came from pacman's output or from
//! anywhere else.

use std::fmt::Display;

/// Why a package is in the local database
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PkgReason {
    #[default]
    Explicit,
    Depend,
}

/// Version constraint operator of a dependency
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DepMod {
    #[default]
    Any,
    Eq,
    Ge,
    Le,
    Gt,
    Lt,
}

impl DepMod {
    fn as_str(&self) -> &'static str {
        match self {
            DepMod::Any => "",
            DepMod::Eq => "=",
            DepMod::Ge => ">=",
            DepMod::Le => "<=",
            DepMod::Gt => ">",
            DepMod::Lt => "<",
        }
    }
}

/// A dependency as listed in depends, optdepends, conflicts, provides and replaces
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Depend {
    pub name: String,
    pub modifier: DepMod,
    pub version: Option<String>,
    pub desc: Option<String>,
}

impl Depend {
    /// Render as `name[op version][: desc]`
    pub fn compute_string(&self) -> String {
        let mut s = self.name.clone();
        if let Some(version) = &self.version
            && self.modifier != DepMod::Any
        {
            s.push_str(self.modifier.as_str());
            s.push_str(version);
        }
        if let Some(desc) = &self.desc {
            s.push_str(": ");
            s.push_str(desc);
        }
        s
    }
}

impl From<&str> for Depend {
    /// Parse pacman's textual form, e.g. `glibc>=2.38` or `python: for scripts`
    fn from(s: &str) -> Self {
        let (dep, desc) = match s.split_once(": ") {
            Some((dep, desc)) => (dep.trim(), Some(desc.trim().to_string())),
            None => (s.trim(), None),
        };

        //two character operators first so ">=" is not read as ">"
        let ops = [
            (">=", DepMod::Ge),
            ("<=", DepMod::Le),
            ("=", DepMod::Eq),
            (">", DepMod::Gt),
            ("<", DepMod::Lt),
        ];
        for (op, modifier) in ops {
            if let Some((name, version)) = dep.split_once(op) {
                return Depend {
                    name: name.to_string(),
                    modifier,
                    version: Some(version.to_string()),
                    desc,
                };
            }
        }

        Depend {
            name: dep.to_string(),
            modifier: DepMod::Any,
            version: None,
            desc,
        }
    }
}

impl Display for Depend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.compute_string())
    }
}

/// Metadata of one package entry, sync or local.
/// String getters return `None` when the database has no value
pub trait PackageHandle {
    fn name(&self) -> Option<&str>;
    fn url(&self) -> Option<&str>;
    fn packager(&self) -> Option<&str>;
    fn desc(&self) -> Option<&str>;
    fn version(&self) -> Option<&str>;
    fn arch(&self) -> Option<&str>;
    /// Name of the database that owns this entry
    fn db_name(&self) -> Option<&str>;
    /// Seconds since the epoch
    fn build_date(&self) -> i64;
    fn size(&self) -> i64;
    fn isize(&self) -> i64;
    fn licenses(&self) -> &[String];
    fn groups(&self) -> &[String];
    fn depends(&self) -> &[Depend];
    fn optdepends(&self) -> &[Depend];
    fn conflicts(&self) -> &[Depend];
    fn provides(&self) -> &[Depend];
    fn replaces(&self) -> &[Depend];
    fn has_signature(&self) -> bool;
    fn reason(&self) -> PkgReason;
}

/// The database of installed packages
pub trait LocalDatabase {
    type Pkg: PackageHandle;

    fn get_pkg(&self, name: &str) -> Option<&Self::Pkg>;
    /// Names of installed packages that depend on `pkg`
    fn compute_required_by(&self, pkg: &Self::Pkg) -> Vec<String>;
    /// Names of installed packages that optionally depend on `pkg`
    fn compute_optional_for(&self, pkg: &Self::Pkg) -> Vec<String>;
}
