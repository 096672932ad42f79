//! Numeric uid to login name resolution

use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Resolves a numeric owner id to a display name.
pub trait IdentityResolver {
    /// Returns the login name for `uid`, or `None` if it is unknown.
    fn resolve(&self, uid: u32) -> Option<String>;
}

/// Resolver backed by a one-time read of a passwd(5) file.
#[derive(Debug, Default)]
pub struct PasswdResolver {
    names: HashMap<u32, String>,
}

impl PasswdResolver {
    /// Loads the table from `path`. An unreadable file yields an empty table,
    /// so every owner falls back to its numeric id.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(data) => Self::parse(&data),
            Err(e) => {
                log::warn!("Cannot read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parses passwd-formatted text (`name:pw:uid:gid:...`).
    pub fn parse(data: &str) -> Self {
        let mut names = HashMap::new();
        for line in data.lines() {
            if line.starts_with('#') {
                continue;
            }
            let mut parts = line.split(':');
            let (Some(name), Some(_), Some(uid)) = (parts.next(), parts.next(), parts.next()) else {
                continue;
            };
            if let Ok(uid) = uid.parse::<u32>() {
                // First entry wins, as getpwuid does
                names.entry(uid).or_insert_with(|| name.to_string());
            }
        }
        Self { names }
    }
}

impl IdentityResolver for PasswdResolver {
    fn resolve(&self, uid: u32) -> Option<String> {
        self.names.get(&uid).cloned()
    }
}
