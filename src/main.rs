//! `modpack` CLI entrypoint.
//!
//! Thin wrapper around [`modpack::release::packaging::package`]: loads the
//! packaging configuration, resolves the manifest and payload paths, and
//! reports the created archive on stdout.

use camino::Utf8Path;
use clap::Parser;
use modpack::cli::Cli;
use modpack::config::{ConfigError, PackConfig};
use modpack::release::packaging::{PackageOutput, package};
use modpack::release::packaging_error::PackagingError;
use std::io::Write;
use thiserror::Error;

/// Errors returned by the packaging CLI.
#[derive(Debug, Error)]
enum CliError {
    /// The packaging configuration could not be loaded.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Packaging failed.
    #[error("{0}")]
    Packaging(#[from] PackagingError),
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let exit_code = exit_code_for_run_result(run(&cli, &mut stdout), &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write) -> Result<PackageOutput, CliError> {
    let (config_path, required) = cli.config_source();
    let config = if required {
        PackConfig::load(&config_path)?
    } else {
        PackConfig::load_or_default(&config_path)?
    };

    let manifest_path = cli
        .manifest_override()
        .map_or_else(|| config.manifest_path(&cli.module_dir), Utf8Path::to_path_buf);
    let paths = config.path_list();

    let output = package(&manifest_path, &cli.module_dir, &paths)?;
    if !cli.quiet {
        write_line(stdout, format_args!("Created {}", output.archive_path));
    }
    Ok(output)
}

fn exit_code_for_run_result<T>(result: Result<T, CliError>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(_) => 0,
        Err(err) => {
            write_line(stderr, format_args!("error: {err}"));
            1
        }
    }
}

fn write_line(out: &mut dyn Write, message: std::fmt::Arguments<'_>) {
    if writeln!(out, "{message}").is_err() {
        // Best-effort reporting; ignore write failures.
    }
}
