//! Command-line argument definitions for the `modpack` binary.
//!
//! Kept separate from the entrypoint so argument parsing can be tested
//! without spawning the binary.

use crate::config::CONFIG_FILE;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;

/// Package a mod directory into a versioned ZIP release.
#[derive(Parser, Debug, Clone)]
#[command(name = "modpack")]
#[command(version, about)]
#[command(long_about = concat!(
    "Package a mod directory into a versioned ZIP release.\n\n",
    "Reads the version from the mod manifest (info.json by default) and ",
    "writes <module>_<version>.zip into the module directory, where <module> ",
    "is the directory's name. Every payload file is stored under a single ",
    "<module>_<version>/ folder inside the archive.\n\n",
    "The payload is declared in modpack.toml in the module directory; without ",
    "it a built-in list of the stock mod files is used.",
))]
#[command(after_help = concat!(
    "CONFIGURATION (modpack.toml):\n",
    "  manifest = \"info.json\"\n",
    "  paths = [\"code\", \"prototypes\", \"control.lua\", \"info.json\"]\n\n",
    "EXAMPLES:\n",
    "  Package the mod in the current directory:\n",
    "    $ modpack\n\n",
    "  Package another mod directory:\n",
    "    $ modpack --module-dir ../examplemod\n",
))]
pub struct Cli {
    /// Module directory to package; its name becomes the release name.
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    pub module_dir: Utf8PathBuf,

    /// Packaging configuration [default: <DIR>/modpack.toml if present].
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Manifest to read the version from, overriding the configuration.
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<Utf8PathBuf>,

    /// Do not print the created archive path.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// The configuration file to read and whether it must exist.
    #[must_use]
    pub fn config_source(&self) -> (Utf8PathBuf, bool) {
        match &self.config {
            Some(path) => (path.clone(), true),
            None => (self.module_dir.join(CONFIG_FILE), false),
        }
    }

    /// The manifest override, if one was given.
    #[must_use]
    pub fn manifest_override(&self) -> Option<&Utf8Path> {
        self.manifest.as_deref()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
