// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Functions to glob FITS files.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use glob::glob;
use log::info;
use thiserror::Error;
use url::Url;

/// Schemes cfitsio can open directly with its remote-file drivers.
const REMOTE_SCHEMES: [&str; 4] = ["http", "https", "ftp", "ftps"];

/// Given glob patterns (or plain paths), get all of the matches from the
/// filesystem. The order of the patterns is preserved, and each pattern's
/// matches come out sorted, as `glob` yields them. Remote FITS URLs are
/// passed through untouched; cfitsio opens those itself.
pub(crate) fn get_all_matches_from_globs<S: AsRef<str>>(
    patterns: &[S],
) -> Result<Vec<PathBuf>, GlobError> {
    let mut entries = vec![];
    for pattern in patterns {
        let pattern = pattern.as_ref();
        if is_remote_url(pattern) {
            entries.push(PathBuf::from(pattern));
            continue;
        }
        let mut any = false;
        for entry in glob(pattern)? {
            entries.push(entry?);
            any = true;
        }
        // A pattern with no matches is reported, so a typo isn't silently
        // ignored.
        if !any {
            return Err(GlobError::NoMatches {
                glob: pattern.to_string(),
            });
        }
    }
    Ok(entries)
}

/// Discard the paths with a modification time earlier than `min`. Files whose
/// mtime cannot be read are kept; the FITS reader will report on them
/// properly later.
pub(crate) fn filter_by_modif_time(paths: Vec<PathBuf>, min: SystemTime) -> Vec<PathBuf> {
    paths
        .into_iter()
        .filter(|path| match modif_time(path) {
            Some(mtime) if mtime < min => {
                info!(
                    "Skipping FITS file \"{}\": file modification time earlier than specified min",
                    path.display()
                );
                false
            }
            _ => true,
        })
        .collect()
}

fn modif_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn is_remote_url(pattern: &str) -> bool {
    Url::parse(pattern)
        .map(|url| REMOTE_SCHEMES.contains(&url.scheme()))
        .unwrap_or(false)
}

#[derive(Error, Debug)]
/// Error type associated with glob helper functions.
pub enum GlobError {
    #[error("No glob matches were found for {glob}")]
    NoMatches { glob: String },

    #[error(transparent)]
    GlobCrate(#[from] glob::GlobError),

    #[error(transparent)]
    PatternError(#[from] glob::PatternError),
}
