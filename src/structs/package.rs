use std::cmp::Ordering;

use jiff::{Timestamp, tz::TimeZone};
use tracing::{trace, warn};

use crate::{
    db::{Depend, LocalDatabase, PackageHandle, PkgReason},
    error::AppError,
    structs::{
        attribute::Attribute,
        operation::Operation,
        reason::{InstallReason, UpdateState},
    },
    utils::{size_to_string, trim_str},
    version::vercmp,
};

/// Lines up optdepends continuation lines in the info pane
const OPTDEPENDS_DELIM: &str = "\n            ";

/// Display record of a single package, all fields formatted up front
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Package {
    name: String,
    url: String,
    packager: String,
    desc: String,
    version: String,
    local_version: String,
    db_name: String,
    arch: String,
    build_date: i64,
    size: i64,
    isize: i64,
    size_str: String,
    isize_str: String,
    licenses: String,
    groups: String,
    depends: String,
    optdepends: String,
    conflicts: String,
    provides: String,
    replaces: String,
    required_by: String,
    optional_for: String,
    signature: String,
    reason: InstallReason,
    update_state: UpdateState,

    //ui annotations
    col_index: i32,
    op: Operation,
}

impl Package {
    pub fn new<D: LocalDatabase>(pkg: &impl PackageHandle, localdb: &D) -> Self {
        let name = trim_str(pkg.name());
        let mut package = Package {
            url: trim_str(pkg.url()),
            packager: trim_str(pkg.packager()),
            desc: trim_str(pkg.desc()),
            version: trim_str(pkg.version()),
            db_name: trim_str(pkg.db_name()),
            arch: trim_str(pkg.arch()),
            build_date: pkg.build_date(),
            size: pkg.size(),
            isize: pkg.isize(),
            size_str: size_to_string(pkg.size()),
            isize_str: size_to_string(pkg.isize()),
            licenses: pkg.licenses().join(" "),
            groups: pkg.groups().join(" "),
            depends: deplist_to_string(pkg.depends(), " "),
            optdepends: deplist_to_string(pkg.optdepends(), OPTDEPENDS_DELIM),
            conflicts: deplist_to_string(pkg.conflicts(), " "),
            provides: deplist_to_string(pkg.provides(), " "),
            replaces: deplist_to_string(pkg.replaces(), " "),
            signature: if pkg.has_signature() { "Yes" } else { "None" }.to_string(),
            ..Default::default()
        };

        if let Some(local) = localdb.get_pkg(&name) {
            package.local_version = trim_str(local.version());
            package.update_state = match vercmp(&package.version, &package.local_version) {
                Ordering::Greater => UpdateState::UpdateAvailable,
                _ => UpdateState::UpToDate,
            };
            package.reason = match local.reason() {
                PkgReason::Depend => InstallReason::AsDependency,
                PkgReason::Explicit => InstallReason::Explicit,
            };
            //computed lists are dropped as soon as they are joined
            package.required_by = localdb.compute_required_by(local).join(" ");
            package.optional_for = localdb.compute_optional_for(local).join(" ");
        }
        package.name = name;

        trace!(
            name = %package.name,
            repo = %package.db_name,
            state = %package.update_state,
            "built package"
        );
        package
    }

    /// String value of any attribute. `Attribute::None` is always empty
    pub fn get_attr(&self, attr: Attribute) -> String {
        match attr {
            Attribute::None => String::new(),
            Attribute::Name => self.name.clone(),
            Attribute::Version => self.version(),
            Attribute::Url => self.url.clone(),
            Attribute::Repo => self.db_name.clone(),
            Attribute::Packager => self.packager.clone(),
            Attribute::BuildDate => self.build_date_str(),
            Attribute::InstallState => self.reason.to_string(),
            Attribute::UpdateState => self.update_state.to_string(),
            Attribute::Desc => self.desc.clone(),
            Attribute::Arch => self.arch.clone(),
            Attribute::Licenses => self.licenses.clone(),
            Attribute::Groups => self.groups.clone(),
            Attribute::Depends => self.depends.clone(),
            Attribute::OptDepends => self.optdepends.clone(),
            Attribute::Conflicts => self.conflicts.clone(),
            Attribute::Provides => self.provides.clone(),
            Attribute::Replaces => self.replaces.clone(),
            Attribute::RequiredBy => self.required_by.clone(),
            Attribute::OptionalFor => self.optional_for.clone(),
            Attribute::Signature => self.signature.clone(),
            Attribute::Size => self.size_str.clone(),
            Attribute::ISize => self.isize_str.clone(),
        }
    }

    /// Numeric value of an attribute, only build date and the sizes have one
    pub fn get_off_attr(&self, attr: Attribute) -> Result<i64, AppError> {
        match attr {
            Attribute::BuildDate => Ok(self.build_date),
            Attribute::Size => Ok(self.size),
            Attribute::ISize => Ok(self.isize),
            other => Err(AppError::InvalidAttribute(format!(
                "{other} has no numeric value"
            ))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    /// Shows the installed version next to the new one when an update is available
    pub fn version(&self) -> String {
        if self.update_state == UpdateState::UpdateAvailable {
            return format!("{} (local: {})", self.version, self.local_version);
        }
        self.version.clone()
    }

    pub fn repo(&self) -> &str {
        &self.db_name
    }

    pub fn reason(&self) -> InstallReason {
        self.reason
    }

    pub fn update_state(&self) -> UpdateState {
        self.update_state
    }

    pub fn build_date_str(&self) -> String {
        format_build_date(self.build_date, TimeZone::system())
    }

    pub fn set_col_index(&mut self, index: i32) {
        self.col_index = index;
    }

    pub fn col_index(&self) -> i32 {
        self.col_index
    }

    pub fn set_op(&mut self, op: Operation) {
        self.op = op;
    }

    pub fn op(&self) -> Operation {
        self.op
    }
}

fn deplist_to_string(deps: &[Depend], delim: &str) -> String {
    deps.iter()
        .map(Depend::compute_string)
        .collect::<Vec<_>>()
        .join(delim)
}

/// ctime style, e.g. "Thu Jan  1 00:00:00 1970"
fn format_build_date(secs: i64, tz: TimeZone) -> String {
    match Timestamp::from_second(secs) {
        Ok(ts) => ts
            .to_zoned(tz)
            .strftime("%a %b %e %H:%M:%S %Y")
            .to_string(),
        Err(e) => {
            warn!("Build date {secs} out of range: {e}");
            secs.to_string()
        }
    }
}
