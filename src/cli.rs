// cli.rs - Command-line interface configuration
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::ViewerError;

/// Longer-side limit applied when `--max` is absent or invalid.
pub const DEFAULT_MAX_DIM: u32 = 1600;

#[derive(Parser, Debug, Clone)]
#[command(name = "image-viewer")]
#[command(about = "Minimal aspect-fit image viewer", long_about = None)]
pub struct Cli {
    /// Image file to display
    pub path: Option<PathBuf>,

    /// Downsample so the longer side is at most N pixels
    #[arg(
        long = "max",
        value_name = "N",
        num_args = 0..=1,
        default_missing_value = "",
        allow_hyphen_values = true,
        action = ArgAction::Append
    )]
    pub max: Vec<String>,

    /// Report errors on stderr only, never in a dialog
    #[arg(long = "no-dialog", default_value = "false")]
    pub no_dialog: bool,

    /// Further positional arguments are accepted and ignored
    #[arg(hide = true)]
    pub extra: Vec<OsString>,
}

/// Validated startup configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    pub path: PathBuf,
    pub max_dim: u32,
    pub dialogs: bool,
}

impl Cli {
    /// Parse the process arguments. See [`Cli::try_from_args`].
    pub fn try_from_env() -> Result<Self, ViewerError> {
        Self::try_from_args(std::env::args_os())
    }

    /// Parse `args` (program name first). Any rejection is a usage error
    /// with exit code 1. `--help` and `--version` print and exit 0.
    pub fn try_from_args<I, T>(args: I) -> Result<Self, ViewerError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args).map_err(|err| match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            kind => {
                log::debug!("arguments rejected ({:?}): {}", kind, err);
                ViewerError::Usage
            }
        })
    }

    /// Effective max dimension. The last valid `--max` wins. Non-positive
    /// or unparsable values are ignored.
    pub fn max_dim(&self) -> u32 {
        self.max
            .iter()
            .rev()
            .filter_map(|raw| raw.trim().parse::<u32>().ok())
            .find(|&n| n > 0)
            .unwrap_or(DEFAULT_MAX_DIM)
    }

    /// Check the arguments before any window is created.
    pub fn into_config(self) -> Result<ViewerConfig, ViewerError> {
        let max_dim = self.max_dim();
        let path = self.path.ok_or(ViewerError::Usage)?;
        if !path.exists() {
            return Err(ViewerError::FileNotFound(path));
        }
        Ok(ViewerConfig {
            path,
            max_dim,
            dialogs: !self.no_dialog,
        })
    }
}

impl ViewerConfig {
    pub fn window_title(&self) -> String {
        format!("Viewer - {}", self.path.display())
    }
}
