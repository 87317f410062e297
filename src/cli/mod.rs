// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Command-line interface code. More specific options for `svo-tools`
//! subcommands are contained in modules.
//!
//! Only 3 things should be public in this module: `SvoTools`,
//! `SvoTools::run`, and `SvoToolsError`.

mod common;
mod error;
mod extract_keywords;
mod submit_metadata;

pub(crate) use common::Warn;
pub use error::SvoToolsError;

use clap::{AppSettings, Args, Parser, Subcommand};
use log::info;

use crate::PROGRESS_BARS;

// Add build-time information from the "built" crate.
include!(concat!(env!("OUT_DIR"), "/built.rs"));

#[derive(Debug, Parser)]
#[clap(
    version,
    author,
    about = r#"Provider tools for the SOLARNET Virtual Observatory (SVO)
Documentation: https://solarnet.oma.be/svo_manual"#
)]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
#[clap(disable_help_subcommand = true)]
#[clap(infer_subcommands = true)]
#[clap(propagate_version = true)]
#[clap(infer_long_args = true)]
pub struct SvoTools {
    #[clap(flatten)]
    global_opts: GlobalArgs,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// Don't draw progress bars.
    #[clap(long)]
    #[clap(global = true)]
    no_progress_bars: bool,

    /// The verbosity of the program. Increase by specifying multiple times
    /// (e.g. -vv). The default is to print only high-level information.
    #[clap(short, long, parse(from_occurrences))]
    #[clap(global = true)]
    verbosity: u8,
}

#[derive(Debug, Subcommand)]
#[clap(arg_required_else_help = true)]
enum Command {
    #[clap(alias = "extract")]
    #[clap(
        about = r#"Extract the definitions of the keywords in FITS file headers, to set up a new dataset in the SVO."#
    )]
    ExtractKeywords(extract_keywords::ExtractKeywordsArgs),

    #[clap(alias = "submit")]
    #[clap(
        about = r#"Submit metadata and data_location records for FITS files to an existing SVO dataset."#
    )]
    SubmitMetadata(submit_metadata::SubmitMetadataArgs),
}

impl SvoTools {
    pub fn run(self) -> Result<(), SvoToolsError> {
        // Set up logging.
        let GlobalArgs {
            no_progress_bars,
            verbosity,
        } = self.global_opts;
        setup_logging(verbosity).expect("Failed to initialise logging.");
        // Enable progress bars if the user didn't say "no progress bars".
        if !no_progress_bars {
            PROGRESS_BARS.store(true);
        }

        // Print the version of svo-tools and its build-time information.
        let sub_command = match &self.command {
            Command::ExtractKeywords(_) => "extract-keywords",
            Command::SubmitMetadata(_) => "submit-metadata",
        };
        info!("svo-tools {} {}", sub_command, env!("CARGO_PKG_VERSION"));
        display_build_info();

        match self.command {
            Command::ExtractKeywords(args) => args.run()?,
            Command::SubmitMetadata(args) => args.run()?,
        }

        common::display_warnings();
        info!("svo-tools {} complete.", sub_command);
        Ok(())
    }
}

/// Activate a logger. All log messages are put onto `stdout`. `env_logger`
/// automatically only uses colours and fancy symbols if we're on a tty (e.g. a
/// terminal); piped output will be formatted sensibly. Source code lines are
/// displayed in log messages when verbosity >= 3.
fn setup_logging(verbosity: u8) -> Result<(), log::SetLoggerError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.target(env_logger::Target::Stdout);
    builder.format_target(false);
    match verbosity {
        0 => builder.filter_level(log::LevelFilter::Info),
        1 => builder.filter_level(log::LevelFilter::Debug),
        2 => builder.filter_level(log::LevelFilter::Trace),
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
            builder.format(|buf, record| {
                use std::io::Write;

                let timestamp = buf.timestamp();
                let level = record.level();
                let target = record.target();
                let line = record.line().unwrap_or(0);
                let message = record.args();

                writeln!(buf, "[{timestamp} {level} {target}:{line}] {message}")
            })
        }
    };
    builder.init();

    Ok(())
}

/// Write many info-level log lines of how this executable was compiled.
fn display_build_info() {
    let dirty = match GIT_DIRTY {
        Some(true) => " (dirty)",
        _ => "",
    };
    match GIT_COMMIT_HASH_SHORT {
        Some(hash) => {
            info!("Compiled on git commit hash: {hash}{dirty}");
        }
        None => info!("Compiled on git commit hash: <no git info>"),
    }
    if let Some(hr) = GIT_HEAD_REF {
        info!("            git head ref: {}", hr);
    }
    info!("            {}", BUILT_TIME_UTC);
    info!("         with compiler {}", RUSTC_VERSION);
    info!("");
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_command_line() {
        SvoTools::command().debug_assert();
    }

    #[test]
    fn subcommand_arguments_parse() {
        let parsed = SvoTools::try_parse_from([
            "svo-tools",
            "extract-keywords",
            "--hdu",
            "1",
            "-E",
            "DATE",
            "-E",
            "EXTEND",
            "-o",
            "defs.json",
            "a.fits",
            "b.fits",
        ])
        .unwrap();
        assert!(matches!(parsed.command, Command::ExtractKeywords(_)));

        let parsed = SvoTools::try_parse_from([
            "svo-tools",
            "submit-metadata",
            "--dry-run",
            "--base-file-url",
            "https://proba2.sidc.be/swap/data/bsd/",
            "SWAP level 1",
            "swap.fits",
        ])
        .unwrap();
        assert!(matches!(parsed.command, Command::SubmitMetadata(_)));
    }

    #[test]
    fn fits_files_are_required() {
        assert!(SvoTools::try_parse_from(["svo-tools", "extract-keywords"]).is_err());
        assert!(SvoTools::try_parse_from(["svo-tools", "submit-metadata", "SWAP level 1"]).is_err());
    }
}
