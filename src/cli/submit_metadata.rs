// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Submit metadata and data_location records for FITS files to the SVO.

use std::{
    path::{Path, PathBuf},
    time::{Duration, UNIX_EPOCH},
};

use clap::Parser;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use itertools::Itertools;
use log::{debug, error, info};
use serde_json::Value;

use super::{common::InfoPrinter, SvoToolsError, Warn};
use crate::{
    api::{ApiAuth, Dataset, RestfulApi},
    constants::{DEFAULT_API_URL, DEFAULT_AUTH_FILE},
    fits::{fits_open, fits_read_header, HduSpec},
    glob::{filter_by_modif_time, get_all_matches_from_globs},
    keywords::KeywordDefinition,
    records::{DataLocationBuilder, MetadataBuilder},
    time::parse_date_time,
    PROGRESS_BARS,
};

#[derive(Parser, Debug)]
pub(super) struct SubmitMetadataArgs {
    /// The name of the dataset in the SVO.
    #[clap(name = "DATASET")]
    dataset: String,

    /// Paths or glob patterns of the FITS files to submit.
    #[clap(name = "FITS_FILES", required = true)]
    fits_files: Vec<String>,

    /// Path of a file with the SVO username and api key, separated by a
    /// colon, i.e. username:api_key.
    #[clap(short, long, default_value = DEFAULT_AUTH_FILE, value_name = "AUTH_FILE")]
    auth_file: PathBuf,

    /// The URL of the SVO RESTful API.
    #[clap(long, default_value = DEFAULT_API_URL, value_name = "URL")]
    api_url: String,

    /// The index or EXTNAME of the HDU holding the metadata.
    #[clap(long, default_value = "0")]
    hdu: HduSpec,

    /// The observation id of the metadata record. By default it is derived
    /// from the DATE-BEG keyword; only sensible when submitting a single
    /// file.
    #[clap(long)]
    oid: Option<String>,

    /// The URL from which the file can be downloaded; only sensible when
    /// submitting a single file.
    #[clap(long, value_name = "URL")]
    file_url: Option<String>,

    /// The base URL a file's download URL is derived from when --file-url is
    /// not given, by appending the file's relative path.
    #[clap(long, value_name = "URL")]
    base_file_url: Option<String>,

    /// The base directory to strip from the local file paths to make them
    /// relative.
    #[clap(long, value_name = "DIRECTORY")]
    base_file_directory: Option<PathBuf>,

    /// The URL of a thumbnail image for the file.
    #[clap(long, value_name = "URL")]
    thumbnail_url: Option<String>,

    /// Mark the files as offline, i.e. not downloadable.
    #[clap(long)]
    offline: bool,

    /// Only submit files modified after this date.
    #[clap(short = 'm', long, value_name = "DATE")]
    min_modif_time: Option<String>,

    /// Don't submit anything; print the records that would be submitted
    /// instead. No auth file is needed for a dry run.
    #[clap(short = 'n', long)]
    dry_run: bool,
}

impl SubmitMetadataArgs {
    pub(super) fn run(&self) -> Result<(), SvoToolsError> {
        let mut fits_files = get_all_matches_from_globs(&self.fits_files)?;
        if let Some(min_modif_time) = &self.min_modif_time {
            let date = parse_date_time(min_modif_time).ok_or_else(|| {
                SvoToolsError::SubmitMetadata(format!(
                    "\"{min_modif_time}\" is not a valid date for --min-modif-time"
                ))
            })?;
            let min = UNIX_EPOCH + Duration::from_secs(date.and_utc().timestamp().max(0) as u64);
            fits_files = filter_by_modif_time(fits_files, min);
        }
        if fits_files.len() > 1 {
            if self.oid.is_some() {
                "--oid was given with more than one file; every record will get the same oid"
                    .warn();
            }
            if self.file_url.is_some() {
                "--file-url was given with more than one file; every record will get the same file_url"
                    .warn();
            }
        }

        // Auth is only needed to write, so a dry run works without it.
        let auth = if self.dry_run {
            None
        } else {
            Some(ApiAuth::from_file(&self.auth_file)?)
        };
        let api = RestfulApi::new(&self.api_url, auth)?;

        let dataset = api.dataset(&self.dataset)?;
        let keywords = api.keywords(&self.dataset)?;
        debug!(
            "Dataset keywords: {}",
            keywords.iter().map(|k| k.verbose_name.as_str()).join(", ")
        );

        let mut printer = InfoPrinter::new(format!("Submitting to dataset {}", dataset.name).into());
        printer.push_block(vec![
            format!("{} FITS files", fits_files.len()).into(),
            format!("{} keyword definitions", keywords.len()).into(),
        ]);
        if self.dry_run {
            printer.push_line("Dry run; nothing will be submitted".into());
        }
        printer.display();

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
        .with_message("Submitting");
        for fits_file in &fits_files {
            // A bad file should not stop the whole submission.
            if let Err(why) = self.submit_file(&api, &dataset, &keywords, fits_file) {
                error!(
                    "Could not submit file \"{}\": {why}",
                    fits_file.display()
                );
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        Ok(())
    }

    fn submit_file(
        &self,
        api: &RestfulApi,
        dataset: &Dataset,
        keywords: &[KeywordDefinition],
        fits_file: &Path,
    ) -> Result<(), SvoToolsError> {
        info!(
            "Creating metadata and data_location records for file \"{}\"",
            fits_file.display()
        );
        let mut fptr = fits_open(fits_file)?;
        let header = fits_read_header(&mut fptr, &self.hdu)?;
        let mut record = MetadataBuilder::new(&header, keywords)
            .with_oid(self.oid.clone())
            .build()?;
        let oid = record
            .get("oid")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let data_location = DataLocationBuilder {
            local_file: Some(fits_file.to_path_buf()),
            file_url: self.file_url.clone(),
            file_size: None,
            file_path: None,
            thumbnail_url: self.thumbnail_url.clone(),
            offline: self.offline,
            base_file_directory: self.base_file_directory.clone(),
            base_file_url: self.base_file_url.clone(),
        }
        .build(&dataset.resource_uri)?;

        if self.dry_run {
            info!(
                "Metadata record for file \"{}\":\n{}",
                fits_file.display(),
                serde_json::to_string_pretty(&record).expect("json serialisation error")
            );
            info!(
                "Data location record for file \"{}\":\n{}",
                fits_file.display(),
                serde_json::to_string_pretty(&data_location).expect("json serialisation error")
            );
            return Ok(());
        }

        // If a data_location record with the same file URL exists already,
        // point the metadata at it instead of creating a duplicate.
        let data_location_value = match api.data_location(&dataset.name, &data_location.file_url)? {
            Some(existing) => {
                info!(
                    "A data_location record for \"{}\" exists already; reusing it",
                    data_location.file_url
                );
                existing
                    .get("resource_uri")
                    .cloned()
                    .unwrap_or_else(|| Value::String(data_location.file_url.clone()))
            }
            None => serde_json::to_value(&data_location).expect("json serialisation error"),
        };
        record.insert("data_location".to_string(), data_location_value);

        if api.metadata(dataset, &oid)?.is_some() {
            info!("A metadata record with oid \"{oid}\" exists already; updating it");
            // The oid is the primary key, so it is not part of the update.
            record.remove("oid");
            api.update_metadata(dataset, &oid, &record)?;
            info!(
                "Updated metadata record \"{oid}\" for file \"{}\"",
                fits_file.display()
            );
        } else {
            api.create_metadata(dataset, &record)?;
            info!(
                "Created metadata record \"{oid}\" for file \"{}\"",
                fits_file.display()
            );
        }
        Ok(())
    }
}
