//! Mod release packager.
//!
//! Reads a mod's version from its JSON manifest and archives a declared list
//! of files and directories into `<module>_<version>.zip`, every member
//! nested under a single `<module>_<version>/` folder.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - `modpack.toml` packaging target configuration
//! - [`release`] - Manifest reading, release naming, and ZIP packaging

pub mod cli;
pub mod config;
pub mod release;
