use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};
use tracing::debug;

pub const ENV_MAX_FILES_LIMIT: &str = "DOCPICK_MAX_FILES_LIMIT";
pub const ENV_DISABLE_INGESTION: &str = "DOCPICK_DISABLE_INGESTION";

/* ============================== Feature flags =============================== */

/// Remotely managed switches for the ingestion screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Upper bound on selected files; `None` means unbounded.
    #[serde(default)]
    pub max_files_limit: Option<usize>,
    #[serde(default)]
    pub disable_ingestion: bool,
}

impl FeatureFlags {
    /// Overlay values from the process environment.
    pub fn with_env(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values from `lookup`, keyed by the `DOCPICK_*` variable names.
    /// Unset keys leave the current value alone.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_MAX_FILES_LIMIT) {
            self.max_files_limit = parse_limit(ENV_MAX_FILES_LIMIT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_DISABLE_INGESTION) {
            self.disable_ingestion = parse_bool(ENV_DISABLE_INGESTION, &raw)?;
        }
        Ok(self)
    }
}

fn invalid(name: &str, value: &str) -> Error {
    Error::InvalidFlag {
        name: name.to_string(),
        value: value.to_string(),
    }
}

fn parse_limit(name: &str, raw: &str) -> Result<Option<usize>> {
    let v = raw.trim();
    if v.is_empty() || v.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    v.parse::<usize>()
        .map(Some)
        .map_err(|_| invalid(name, raw))
}

fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(invalid(name, raw)),
    }
}

/* ================================ Flags IO ================================= */

/// Read flags from a JSON file. A missing file yields the defaults.
pub fn load_flags(path: &Path) -> Result<FeatureFlags> {
    let data = match fs::read(path) {
        Ok(d) => d,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no flags file; using defaults");
            return Ok(FeatureFlags::default());
        }
        Err(e) => return Err(Error::io(path, e)),
    };
    Ok(serde_json::from_slice::<FeatureFlags>(&data)?)
}

/// Write flags as pretty JSON through a temp file and rename.
pub fn save_flags(path: &Path, flags: &FeatureFlags) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(flags)?;
    fs::write(&tmp, data).map_err(|e| Error::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| Error::io(path, e))?;
    Ok(())
}

/// File (when given), then environment, over the defaults.
pub fn resolve_flags(path: Option<&Path>) -> Result<FeatureFlags> {
    let base = match path {
        Some(p) => load_flags(p)?,
        None => FeatureFlags::default(),
    };
    base.with_env()
}
