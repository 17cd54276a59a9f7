// SPDX-License-Identifier: MIT
//
// rc-file configuration.
//
// The rc file is a tiny subset of vimrc syntax:
//
//     " comment
//     colorscheme NAME        (or: colo NAME)
//     set background=dark     (or: set bg=light)
//
// Anything else is skipped. The named scheme is read from
// `~/.govim/colors/NAME.vim`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use gim_theme::{Background, Theme, parse_colorscheme};

/// rc file name in the home directory.
pub const RC_FILE: &str = ".govimrc";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("home directory not found")]
    NoHomeDir,

    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid colorscheme name {0:?}")]
    BadSchemeName(String),
}

/// Settings read from the rc file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub colorscheme: Option<String>,
    pub background: Option<Background>,
}

impl Config {
    /// Parse rc text. Later lines override earlier ones.
    pub fn parse(text: &str) -> Self {
        let mut config = Self::default();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.find('"').map_or(raw, |i| &raw[..i]).trim();
            let mut words = line.split_whitespace();
            let Some(cmd) = words.next() else { continue };

            match (cmd, words.next()) {
                ("colorscheme" | "colo", Some(name)) => {
                    config.colorscheme = Some(name.to_string());
                }
                ("set" | "se", Some(option)) => match option.split_once('=') {
                    Some(("background" | "bg", value)) => match value.parse() {
                        Ok(bg) => config.background = Some(bg),
                        Err(e) => tracing::debug!(line = idx + 1, error = %e, "rc: bad background"),
                    },
                    _ => tracing::debug!(line = idx + 1, option, "rc: unsupported option"),
                },
                _ => tracing::debug!(line = idx + 1, text = line, "rc: skipped"),
            }
        }
        config
    }

    /// Read and parse `path`. A missing file is an empty config.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Read`] for any read failure other than not-found.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Self::parse(&text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no rc file");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// `~/.govimrc`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoHomeDir`] if the home directory is unknown.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(RC_FILE))
    }

    /// `~/.govim/colors`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoHomeDir`] if the home directory is unknown.
    pub fn default_colors_dir() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".govim").join("colors"))
    }

    /// Load the configured scheme from `colors_dir`. `Ok(None)` when no
    /// scheme is configured. The rc `background` wins over the scheme's.
    ///
    /// # Errors
    ///
    /// [`ConfigError::BadSchemeName`] for a name that is not a plain file
    /// stem, [`ConfigError::Read`] if the scheme file cannot be read.
    pub fn load_theme(&self, colors_dir: &Path) -> Result<Option<Theme>, ConfigError> {
        let Some(name) = self.colorscheme.as_deref() else {
            return Ok(None);
        };
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(ConfigError::BadSchemeName(name.to_string()));
        }

        let path = colors_dir.join(format!("{name}.vim"));
        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        let mut theme = parse_colorscheme(&text);
        if let Some(bg) = self.background {
            theme.background = Some(bg);
        }
        tracing::info!(
            scheme = name,
            groups = theme.group_count(),
            "loaded colorscheme"
        );
        Ok(Some(theme))
    }
}
