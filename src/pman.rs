use std::{
    collections::{HashMap, HashSet},
    io::Write,
    process::Command,
};

use jiff::tz::TimeZone;
use tracing::{debug, info, warn};

use crate::{
    db::{Depend, LocalDatabase, PackageHandle, PkgReason},
    error::AppError,
    structs::{event::EventCommand, package::Package},
    utils::natural_cmp,
};

/// Database name pacman uses for installed packages
pub const LOCAL_DB: &str = "local";

/// One package block from `pacman -Si` or `pacman -Qi`
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PacmanPackage {
    pub name: Option<String>,
    pub version: Option<String>,
    pub desc: Option<String>,
    pub arch: Option<String>,
    pub url: Option<String>,
    pub packager: Option<String>,
    pub db_name: Option<String>,
    pub build_date: i64,
    pub size: i64,
    pub isize: i64,
    pub licenses: Vec<String>,
    pub groups: Vec<String>,
    pub depends: Vec<Depend>,
    pub optdepends: Vec<Depend>,
    pub conflicts: Vec<Depend>,
    pub provides: Vec<Depend>,
    pub replaces: Vec<Depend>,
    pub required_by: Vec<String>,
    pub optional_for: Vec<String>,
    pub signed: bool,
    pub reason: PkgReason,
}

impl PacmanPackage {
    fn from_fields(fields: &[(String, Vec<String>)], default_db: &str) -> Self {
        let mut pack = PacmanPackage {
            db_name: Some(default_db.to_string()),
            ..Default::default()
        };
        let mut download_size = None;

        for (key, lines) in fields {
            let value = lines.join(" ");
            match key.as_str() {
                "Repository" => pack.db_name = Some(value),
                "Name" => pack.name = Some(value),
                "Version" => pack.version = Some(value),
                "Description" => pack.desc = Some(value),
                "Architecture" => pack.arch = Some(value),
                "URL" => pack.url = Some(value),
                "Packager" => pack.packager = Some(value),
                "Licenses" => pack.licenses = words(&value),
                "Groups" => pack.groups = words(&value),
                "Provides" => pack.provides = depends(&value),
                "Depends On" => pack.depends = depends(&value),
                "Conflicts With" => pack.conflicts = depends(&value),
                "Replaces" => pack.replaces = depends(&value),
                "Optional Deps" => {
                    //one dependency per line, with an optional description
                    pack.optdepends = lines
                        .iter()
                        .map(|l| l.trim_end_matches("[installed]").trim())
                        .filter(|l| !l.is_empty() && *l != "None")
                        .map(Depend::from)
                        .collect()
                }
                "Required By" => pack.required_by = words(&value),
                "Optional For" => pack.optional_for = words(&value),
                "Download Size" => download_size = Some(parse_size(&value)),
                "Installed Size" => pack.isize = parse_size(&value),
                "Build Date" => pack.build_date = parse_date(&value),
                "Install Reason" => {
                    pack.reason = if value.contains("dependency") {
                        PkgReason::Depend
                    } else {
                        PkgReason::Explicit
                    }
                }
                "Validated By" => pack.signed = value.contains("Signature"),
                _ => {}
            }
        }
        //the local database only records the installed size
        pack.size = download_size.unwrap_or(pack.isize);
        pack
    }
}

impl PackageHandle for PacmanPackage {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
    fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
    fn packager(&self) -> Option<&str> {
        self.packager.as_deref()
    }
    fn desc(&self) -> Option<&str> {
        self.desc.as_deref()
    }
    fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
    fn arch(&self) -> Option<&str> {
        self.arch.as_deref()
    }
    fn db_name(&self) -> Option<&str> {
        self.db_name.as_deref()
    }
    fn build_date(&self) -> i64 {
        self.build_date
    }
    fn size(&self) -> i64 {
        self.size
    }
    fn isize(&self) -> i64 {
        self.isize
    }
    fn licenses(&self) -> &[String] {
        &self.licenses
    }
    fn groups(&self) -> &[String] {
        &self.groups
    }
    fn depends(&self) -> &[Depend] {
        &self.depends
    }
    fn optdepends(&self) -> &[Depend] {
        &self.optdepends
    }
    fn conflicts(&self) -> &[Depend] {
        &self.conflicts
    }
    fn provides(&self) -> &[Depend] {
        &self.provides
    }
    fn replaces(&self) -> &[Depend] {
        &self.replaces
    }
    fn has_signature(&self) -> bool {
        self.signed
    }
    fn reason(&self) -> PkgReason {
        self.reason
    }
}

/// Installed packages keyed by name
#[derive(Debug, Default)]
pub struct PacmanDb {
    packages: HashMap<String, PacmanPackage>,
}

impl PacmanDb {
    pub fn new(packages: Vec<PacmanPackage>) -> Self {
        Self {
            packages: packages
                .into_iter()
                .filter_map(|p| Some((p.name.clone()?, p)))
                .collect(),
        }
    }

    pub fn packages(&self) -> impl Iterator<Item = &PacmanPackage> {
        self.packages.values()
    }
}

impl LocalDatabase for PacmanDb {
    type Pkg = PacmanPackage;

    fn get_pkg(&self, name: &str) -> Option<&PacmanPackage> {
        self.packages.get(name)
    }

    //pacman -Qi already resolved the reverse dependencies
    fn compute_required_by(&self, pkg: &PacmanPackage) -> Vec<String> {
        pkg.required_by.clone()
    }

    fn compute_optional_for(&self, pkg: &PacmanPackage) -> Vec<String> {
        pkg.optional_for.clone()
    }
}

pub fn load_packages() -> Result<Vec<Package>, AppError> {
    //run these in parallel
    let jh1 = std::thread::spawn(get_sync_packages);
    let jh2 = std::thread::spawn(get_local_packages);

    let sync = jh1.join().map_err(|_| thread_error())??;
    let local = PacmanDb::new(jh2.join().map_err(|_| thread_error())??);
    debug!(
        sync = sync.len(),
        local = local.packages.len(),
        "pacman databases read"
    );

    Ok(combine_packages(&sync, &local))
}

fn thread_error() -> AppError {
    AppError::Other("Thread error".to_string())
}

/// One entry per sync package, plus installed packages no repository carries
pub fn combine_packages(sync: &[PacmanPackage], local: &PacmanDb) -> Vec<Package> {
    let sync_names = sync
        .iter()
        .filter_map(|p| p.name.as_deref())
        .collect::<HashSet<_>>();

    let mut combined: Vec<Package> = sync.iter().map(|p| Package::new(p, local)).collect();
    combined.extend(
        local
            .packages()
            .filter(|p| p.name.as_deref().is_some_and(|n| !sync_names.contains(n)))
            .map(|p| Package::new(p, local)),
    );
    combined.sort_by(|a, b| natural_cmp(a.name(), b.name()));
    combined
}

pub fn run_command(command: EventCommand) -> Result<(), AppError> {
    let mut ret = Ok(());
    match command {
        EventCommand::SyncDatabase => ret = run_pacman(&["-Sy"], &[]),
        EventCommand::ApplyPending { install, remove } => {
            if install.is_empty() && remove.is_empty() {
                return Err(String::from("No pending operations").into());
            }
            if !install.is_empty() {
                ret = run_pacman(&["-S"], &install);
            }
            if ret.is_ok() && !remove.is_empty() {
                ret = run_pacman(&["-R"], &remove);
            }
        }
    }

    std::io::stdout().write_all("\nPress enter to continue...".as_bytes())?;
    std::io::stdout().flush()?;
    crossterm::event::read()?;

    ret
}

fn run_pacman(flags: &[&str], packs: &[String]) -> Result<(), AppError> {
    let comm = "pacman";
    let mut args: Vec<&str> = flags.to_vec();
    args.extend(packs.iter().map(|a| a.as_str()));

    info!("Running command: {} {}", comm, args.join(" "));
    std::io::stdout()
        .write_all(format!("\nRunning command: {} {}\n", comm, args.join(" ")).as_bytes())?;
    //try run command as is
    let res = Command::new(comm).args(&args).status()?;
    if !res.success() {
        std::io::stdout().write_all("running sudo\n".as_bytes())?;
        //run as sudo
        args.insert(0, comm);
        args.insert(0, "-S"); //for sudo
        let res = Command::new("sudo").args(&args).status()?;
        if !res.success() {
            warn!("{comm} failed with {res}");
            std::io::stdout().write_all("Failed to run command".as_bytes())?;
            return Err(String::from("Failed to run command").into());
        }
    }
    Ok(())
}

pub fn pacman_exists() -> bool {
    Command::new("pacman").output().is_ok()
}

pub fn get_sync_packages() -> Result<Vec<PacmanPackage>, AppError> {
    get_packages_command("-Si", "")
}

pub fn get_local_packages() -> Result<Vec<PacmanPackage>, AppError> {
    get_packages_command("-Qi", LOCAL_DB)
}

fn get_packages_command(command: &str, default_db: &str) -> Result<Vec<PacmanPackage>, AppError> {
    let output = Command::new("pacman")
        .env("LC_ALL", "C")
        .arg(command)
        .output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AppError::Other(format!("pacman {command}: {}", stderr.trim())));
    }
    let output = String::from_utf8(output.stdout)?;
    Ok(parse_packages(&output, default_db))
}

/// Split pacman's info output into package blocks
pub fn parse_packages(output: &str, default_db: &str) -> Vec<PacmanPackage> {
    let mut packs = vec![];
    let mut fields: Vec<(String, Vec<String>)> = vec![];

    for line in output.lines() {
        if line.trim().is_empty() {
            if !fields.is_empty() {
                packs.push(PacmanPackage::from_fields(&fields, default_db));
                fields.clear();
            }
            continue;
        }

        //wrapped values are indented
        if line.starts_with(char::is_whitespace) {
            if let Some((_, lines)) = fields.last_mut() {
                lines.push(line.trim().to_string());
            }
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        fields.push((key.trim().to_string(), vec![value.trim().to_string()]));
    }
    if !fields.is_empty() {
        packs.push(PacmanPackage::from_fields(&fields, default_db));
    }

    packs
}

fn words(value: &str) -> Vec<String> {
    value
        .split_whitespace()
        .filter(|r| *r != "None")
        .map(|r| r.to_string())
        .collect()
}

fn depends(value: &str) -> Vec<Depend> {
    value
        .split_whitespace()
        .filter(|r| *r != "None")
        .map(Depend::from)
        .collect()
}

/// "1.50 MiB" -> 1572864
pub fn parse_size(value: &str) -> i64 {
    let mut parts = value.split_whitespace();
    let num = parts.next().and_then(|n| n.parse::<f64>().ok());
    let power = match parts.next() {
        Some("B") | None => Some(0),
        Some("KiB") => Some(1),
        Some("MiB") => Some(2),
        Some("GiB") => Some(3),
        Some("TiB") => Some(4),
        Some("PiB") => Some(5),
        Some(_) => None,
    };
    match (num, power) {
        (Some(num), Some(power)) => (num * 1024_f64.powi(power)).round() as i64,
        _ => {
            warn!("Could not parse size '{value}'");
            0
        }
    }
}

/// C locale ctime date to seconds since the epoch
pub fn parse_date(value: &str) -> i64 {
    to_timestamp(value, TimeZone::system()).unwrap_or_else(|e| {
        warn!("Could not parse date '{value}': {e}");
        0
    })
}

fn to_timestamp(value: &str, tz: TimeZone) -> Result<i64, AppError> {
    let time = jiff::fmt::strtime::parse("%a %b %e %H:%M:%S %Y", value)
        .map_err(|e| AppError::Parse(e.to_string()))?;
    let zoned = time
        .to_datetime()
        .and_then(|dt| dt.to_zoned(tz))
        .map_err(|e| AppError::Parse(e.to_string()))?;
    Ok(zoned.timestamp().as_second())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::{
        attribute::Attribute,
        reason::{InstallReason, UpdateState},
    };

    const SYNC: &str = "\
Repository      : extra
Name            : vim
Version         : 9.1.0-2
Description     : Vi Improved, a highly configurable, improved version of the vi text editor
Architecture    : x86_64
URL             : https://www.vim.org
Licenses        : custom:vim
Groups          : None
Provides        : xxd  vim-minimal  vim-python3
Depends On      : vim-runtime=9.1.0-2  gpm  acl  glibc  libgcrypt  pcre  zlib
                  libffi
Optional Deps   : python: Python language support
                  ruby: Ruby language support
                  lua [installed]
Conflicts With  : gvim  vim-minimal
Replaces        : vim-python3
Download Size   : 1.50 MiB
Installed Size  : 4.00 MiB
Packager        : Some One <someone@archlinux.org>
Build Date      : Tue Nov 14 22:13:20 2023
Validated By    : MD5 Sum  SHA-256 Sum  Signature

Repository      : core
Name            : zlib
Version         : 1:1.3.1-2
Description     : Compression library
Architecture    : x86_64
URL             : https://www.zlib.net/
Licenses        : Zlib
Groups          : None
Provides        : None
Depends On      : glibc
Optional Deps   : None
Conflicts With  : None
Replaces        : None
Download Size   : 92.00 KiB
Installed Size  : 300.00 KiB
Packager        : Some One <someone@archlinux.org>
Build Date      : Thu Jan  1 00:00:00 1970
Validated By    : Signature
";

    const LOCAL: &str = "\
Name            : vim
Version         : 9.0.2000-1
Description     : Vi Improved
Architecture    : x86_64
URL             : https://www.vim.org
Required By     : None
Optional For    : None
Installed Size  : 3.50 MiB
Install Reason  : Explicitly installed
Validated By    : Signature

Name            : zlib
Version         : 1:1.3.1-2
Required By     : curl  file  vim
                  openssl
Optional For    : python
Installed Size  : 300.00 KiB
Install Reason  : Installed as a dependency for another package
Validated By    : Signature

Name            : my-tool
Version         : 0.1-1
Description     : Built from the AUR
Installed Size  : 12.00 B
Install Reason  : Explicitly installed
Validated By    : None
";

    #[test]
    fn test_parse_sync() {
        let packs = parse_packages(SYNC, "");
        assert_eq!(packs.len(), 2);
        let vim = &packs[0];
        assert_eq!(vim.name.as_deref(), Some("vim"));
        assert_eq!(vim.db_name.as_deref(), Some("extra"));
        assert_eq!(vim.licenses, vec!["custom:vim"]);
        assert!(vim.groups.is_empty());
        assert_eq!(vim.depends.len(), 8);
        assert_eq!(vim.depends[0].compute_string(), "vim-runtime=9.1.0-2");
        assert_eq!(vim.depends[7].name, "libffi");
        assert_eq!(vim.optdepends.len(), 3);
        assert_eq!(vim.optdepends[0].compute_string(), "python: Python language support");
        assert_eq!(vim.optdepends[2].compute_string(), "lua");
        assert_eq!(vim.size, 1572864);
        assert_eq!(vim.isize, 4 * 1024 * 1024);
        assert!(vim.signed);

        let zlib = &packs[1];
        assert_eq!(zlib.version.as_deref(), Some("1:1.3.1-2"));
        assert!(zlib.optdepends.is_empty());
        assert!(zlib.provides.is_empty());
    }

    #[test]
    fn test_parse_local() {
        let packs = parse_packages(LOCAL, LOCAL_DB);
        assert_eq!(packs.len(), 3);
        assert_eq!(packs[0].db_name.as_deref(), Some("local"));
        assert_eq!(packs[0].reason, PkgReason::Explicit);
        assert!(packs[0].required_by.is_empty());
        assert_eq!(packs[1].reason, PkgReason::Depend);
        assert_eq!(packs[1].required_by, vec!["curl", "file", "vim", "openssl"]);
        assert_eq!(packs[1].optional_for, vec!["python"]);
        //no download size locally
        assert_eq!(packs[2].size, 12);
        assert!(!packs[2].signed);
    }

    #[test]
    fn test_combine() {
        let sync = parse_packages(SYNC, "");
        let local = PacmanDb::new(parse_packages(LOCAL, LOCAL_DB));
        let packs = combine_packages(&sync, &local);

        let names: Vec<_> = packs.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["my-tool", "vim", "zlib"]);

        let foreign = &packs[0];
        assert_eq!(foreign.repo(), "local");
        assert_eq!(foreign.update_state(), UpdateState::UpToDate);

        let vim = &packs[1];
        assert_eq!(vim.update_state(), UpdateState::UpdateAvailable);
        assert_eq!(vim.version(), "9.1.0-2 (local: 9.0.2000-1)");
        assert_eq!(vim.reason(), InstallReason::Explicit);
        assert_eq!(vim.get_attr(Attribute::Size), "1.50 MB");
        assert_eq!(vim.get_attr(Attribute::Provides), "xxd vim-minimal vim-python3");

        let zlib = &packs[2];
        assert_eq!(zlib.update_state(), UpdateState::UpToDate);
        assert_eq!(zlib.reason(), InstallReason::AsDependency);
        assert_eq!(zlib.get_attr(Attribute::RequiredBy), "curl file vim openssl");
        assert_eq!(zlib.get_attr(Attribute::OptionalFor), "python");
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("0.00 B"), 0);
        assert_eq!(parse_size("12.00 B"), 12);
        assert_eq!(parse_size("1.50 KiB"), 1536);
        assert_eq!(parse_size("2.00 GiB"), 2 * 1024 * 1024 * 1024);
        assert_eq!(parse_size("lots"), 0);
        assert_eq!(parse_size("1.00 parsecs"), 0);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(to_timestamp("Thu Jan  1 00:00:00 1970", TimeZone::UTC).unwrap(), 0);
        assert_eq!(
            to_timestamp("Tue Nov 14 22:13:20 2023", TimeZone::UTC).unwrap(),
            1_700_000_000
        );
        assert!(to_timestamp("yesterday", TimeZone::UTC).is_err());
        assert_eq!(parse_date("not a date"), 0);
    }
}
