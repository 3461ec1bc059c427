use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Environment variable that overrides every other installation root source.
pub const HOME_ENV_VAR: &str = "MDPREP_HOME";

const DATA_DIR_NAME: &str = "data";
const LIB_DIR_NAME: &str = "lib";
const PATH_CONFIG_FILE: &str = "path.conf";

/// Library tiers searched by [`ResourceLocator::lib_dir`], in order of preference.
const LIB_TIERS: [&str; 2] = ["basic", "pro"];

#[derive(Debug, Error)]
pub enum HomeError {
    #[error("Could not find libs under '{}' (looked for lib/basic and lib/pro)", root.display())]
    LibrariesNotFound { root: PathBuf },

    #[error("Could not determine the per-user {0} directory")]
    NoProjectDirs(&'static str),

    #[error("I/O error for '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Resolves paths relative to the toolkit's installation root.
///
/// The locator performs no I/O on construction. Only [`ResourceLocator::lib_dir`]
/// inspects the filesystem, and only to pick between the library tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocator {
    root: PathBuf,
}

impl ResourceLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Builds a locator from the first available root source.
    ///
    /// Sources are consulted in this order: the [`HOME_ENV_VAR`] environment variable,
    /// the custom path persisted by [`ResourceLocator::set_custom_root`], and finally the
    /// per-user data directory of the platform.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::NoProjectDirs`] when no home directory can be determined
    /// for the current user, or [`HomeError::Io`] if the persisted path cannot be read.
    pub fn discover() -> Result<Self, HomeError> {
        if let Some(root) = std::env::var_os(HOME_ENV_VAR).filter(|v| !v.is_empty()) {
            debug!("Using installation root from {}: {:?}", HOME_ENV_VAR, root);
            return Ok(Self::new(root));
        }

        let config_path = Self::path_config_file()?;
        if config_path.exists() {
            let custom = fs::read_to_string(&config_path).map_err(|e| HomeError::Io {
                path: config_path.clone(),
                source: e,
            })?;
            let custom = custom.trim();
            if custom.is_empty() {
                warn!("Custom path config file is empty, falling back to default path.");
            } else {
                debug!("Using persisted installation root: {}", custom);
                return Ok(Self::new(custom));
            }
        }

        let dirs = project_dirs().ok_or(HomeError::NoProjectDirs("data"))?;
        Ok(Self::new(dirs.data_dir()))
    }

    /// Persists `path` as the installation root used by [`ResourceLocator::discover`].
    pub fn set_custom_root(path: &Path) -> Result<(), HomeError> {
        let config_path = Self::path_config_file()?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| HomeError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        fs::write(&config_path, path.to_string_lossy().as_bytes()).map_err(|e| HomeError::Io {
            path: config_path,
            source: e,
        })
    }

    /// Removes a persisted installation root, if any.
    pub fn reset_custom_root() -> Result<(), HomeError> {
        let config_path = Self::path_config_file()?;
        if config_path.exists() {
            fs::remove_file(&config_path).map_err(|e| HomeError::Io {
                path: config_path,
                source: e,
            })?;
        }
        Ok(())
    }

    /// The installation root.
    pub fn home(&self) -> &Path {
        &self.root
    }

    /// Path of a bundled data set. The directory is not required to exist.
    pub fn data_dir(&self, name: &str) -> PathBuf {
        self.root.join(DATA_DIR_NAME).join(name)
    }

    /// Path of the native library directory for the running platform.
    ///
    /// The `basic` tier wins over `pro` when both are installed. Only the tier
    /// directory itself has to exist; the platform subdirectory is not checked.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::LibrariesNotFound`] if neither tier directory exists.
    pub fn lib_dir(&self) -> Result<PathBuf, HomeError> {
        let lib_root = self.root.join(LIB_DIR_NAME);
        LIB_TIERS
            .iter()
            .map(|tier| lib_root.join(tier))
            .find(|candidate| candidate.exists())
            .map(|tier_dir| tier_dir.join(platform_name()))
            .ok_or_else(|| HomeError::LibrariesNotFound {
                root: self.root.clone(),
            })
    }

    fn path_config_file() -> Result<PathBuf, HomeError> {
        project_dirs()
            .map(|dirs| dirs.config_dir().join(PATH_CONFIG_FILE))
            .ok_or(HomeError::NoProjectDirs("config"))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "mdprep", "mdprep")
}

/// Conventional system name of the running platform (`Linux`, `Darwin`, `Windows`).
pub fn platform_name() -> &'static str {
    match std::env::consts::OS {
        "linux" => "Linux",
        "macos" => "Darwin",
        "windows" => "Windows",
        other => other,
    }
}
