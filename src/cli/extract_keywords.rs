// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Extract the definitions of the keywords in FITS file headers, to set up a
//! new dataset in the SVO.

use std::{
    fs::File,
    io::{self, BufWriter},
    path::PathBuf,
};

use clap::Parser;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use is_terminal::IsTerminal;
use log::{debug, info};
use serde::Serialize;

use super::{common::InfoPrinter, SvoToolsError};
use crate::{
    constants::DEFAULT_KEYWORDS_OUTPUT,
    fits::HduSpec,
    glob::get_all_matches_from_globs,
    keywords::KeywordInspector,
    PROGRESS_BARS,
};

#[derive(Parser, Debug)]
pub(super) struct ExtractKeywordsArgs {
    /// Paths, URLs or glob patterns of the FITS files to inspect. If
    /// possible, use files spread over the whole dataset instead of
    /// consecutive files, so that changes in the headers over time are
    /// detected.
    #[clap(name = "FITS_FILES", required = true)]
    fits_files: Vec<String>,

    /// The index or EXTNAME of the HDU holding the keywords.
    #[clap(long, default_value = "0")]
    hdu: HduSpec,

    /// Path of the JSON file to write the keyword definitions to.
    #[clap(short, long, default_value = DEFAULT_KEYWORDS_OUTPUT)]
    output: PathBuf,

    /// A keyword to skip; may be given multiple times. Structural keywords
    /// such as SIMPLE, BITPIX and CHECKSUM are always skipped.
    #[clap(short = 'E', long = "exclude", value_name = "KEYWORD")]
    exclude_keywords: Vec<String>,

    /// Path of a backup file where progress is saved after every FITS file,
    /// so that an interrupted run restarts where it stopped.
    #[clap(short, long, value_name = "BACKUP_FILE")]
    backup: Option<PathBuf>,

    /// Ask about every keyword property, even when all files agree on it.
    #[clap(short = 'i', long)]
    force_interactive: bool,
}

impl ExtractKeywordsArgs {
    pub(super) fn run(&self) -> Result<(), SvoToolsError> {
        if self.force_interactive && !io::stdin().is_terminal() {
            return Err(SvoToolsError::ExtractKeywords(
                "--force-interactive needs a terminal to ask questions on".to_string(),
            ));
        }

        let fits_files = get_all_matches_from_globs(&self.fits_files)?;
        debug!("Found {} FITS files", fits_files.len());

        let mut inspector = KeywordInspector::new(
            self.hdu.clone(),
            &self.exclude_keywords,
            self.backup.clone(),
            self.force_interactive,
        )?;

        let progress = ProgressBar::with_draw_target(
            Some(fits_files.len() as u64),
            if PROGRESS_BARS.load() {
                ProgressDrawTarget::stdout()
            } else {
                ProgressDrawTarget::hidden()
            },
        )
        .with_style(
            ProgressStyle::default_bar()
                .template("{msg:16}: [{wide_bar:.blue}] {pos}/{len} files ({elapsed_precise}<{eta_precise})")
                .unwrap()
                .progress_chars("=> "),
        )
        .with_message("Inspecting");
        for fits_file in &fits_files {
            inspector.process_files(std::slice::from_ref(fits_file))?;
            progress.inc(1);
        }
        progress.finish_and_clear();

        if inspector.is_empty() {
            return Err(SvoToolsError::ExtractKeywords(
                "No keywords were found; were any of the FITS files readable?".to_string(),
            ));
        }

        // Any disagreement between the files is resolved by asking the user.
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut prompts = io::stdout();
        let definitions = inspector.keyword_definitions(&mut input, &mut prompts)?;

        // The SVO takes these definitions as a tab-indented JSON document.
        let file = BufWriter::new(File::create(&self.output)?);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(file, formatter);
        definitions
            .serialize(&mut serializer)
            .map_err(|e| SvoToolsError::ExtractKeywords(e.to_string()))?;
        info!(
            "Wrote {} keyword definitions to \"{}\"",
            definitions.len(),
            self.output.display()
        );

        let mut printer = InfoPrinter::new("Keyword definitions".into());
        printer.push_line(format!("{} FITS files inspected", fits_files.len()).into());
        printer.push_line(
            format!(
                "{} keyword definitions written to \"{}\"",
                definitions.len(),
                self.output.display()
            )
            .into(),
        );
        printer.display();

        Ok(())
    }
}
