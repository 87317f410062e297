// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Build a data_location record describing where a dataset file lives.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use url::Url;

/// The payload of one data_location record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataLocation {
    /// Resource URI of the dataset this location belongs to.
    pub dataset: String,
    pub file_url: String,
    pub file_size: u64,
    /// Path of the file relative to the provider's archive root.
    pub file_path: String,
    pub thumbnail_url: Option<String>,
    pub offline: bool,
}

/// Builds a [`DataLocation`], deriving what wasn't given explicitly from the
/// local file and the provider's base directory/URL. Explicit values always
/// win.
#[derive(Debug, Default, Clone)]
pub struct DataLocationBuilder {
    pub local_file: Option<PathBuf>,
    pub file_url: Option<String>,
    pub file_size: Option<u64>,
    pub file_path: Option<String>,
    pub thumbnail_url: Option<String>,
    pub offline: bool,
    /// The base directory to strip off the local file path to make it
    /// relative.
    pub base_file_directory: Option<PathBuf>,
    /// The base URL to derive a default file_url from the file path. Must end
    /// with a `/` for the join to append.
    pub base_file_url: Option<String>,
}

impl DataLocationBuilder {
    pub fn from_local_file(local_file: PathBuf) -> DataLocationBuilder {
        DataLocationBuilder {
            local_file: Some(local_file),
            ..Default::default()
        }
    }

    pub fn build(&self, dataset_resource_uri: &str) -> Result<DataLocation, DataLocationError> {
        let file_path = self.file_path()?;
        Ok(DataLocation {
            dataset: dataset_resource_uri.to_string(),
            file_url: self.file_url(&file_path)?,
            file_size: self.file_size()?,
            file_path,
            thumbnail_url: self.thumbnail_url.clone(),
            offline: self.offline,
        })
    }

    fn file_path(&self) -> Result<String, DataLocationError> {
        let file_path = if let Some(file_path) = &self.file_path {
            file_path.clone()
        } else if let Some(local_file) = &self.local_file {
            let mut file_path = local_file.to_string_lossy().into_owned();
            if let Some(base) = &self.base_file_directory {
                let absolute = std::fs::canonicalize(local_file)
                    .unwrap_or_else(|_| local_file.clone());
                if let Ok(relative) = absolute.strip_prefix(base) {
                    file_path = relative.to_string_lossy().into_owned();
                }
            }
            file_path
        } else {
            return Err(DataLocationError::NoFilePath);
        };
        // file_path must always be relative
        Ok(file_path.trim_start_matches(['.', '/']).to_string())
    }

    fn file_url(&self, file_path: &str) -> Result<String, DataLocationError> {
        if let Some(file_url) = &self.file_url {
            return Ok(file_url.clone());
        }
        let base = self
            .base_file_url
            .as_deref()
            .ok_or(DataLocationError::NoFileUrl)?;
        let url = Url::parse(base)
            .and_then(|base| base.join(file_path))
            .map_err(|source| DataLocationError::BadBaseUrl {
                base: base.to_string(),
                source,
            })?;
        Ok(url.into())
    }

    fn file_size(&self) -> Result<u64, DataLocationError> {
        if let Some(file_size) = self.file_size {
            return Ok(file_size);
        }
        let local_file = self.local_file.as_ref().ok_or(DataLocationError::NoFileSize)?;
        let metadata =
            std::fs::metadata(local_file).map_err(|source| DataLocationError::FileSize {
                local_file: local_file.clone(),
                source,
            })?;
        Ok(metadata.len())
    }
}

#[derive(Error, Debug)]
pub enum DataLocationError {
    #[error("Either file_path or local_file must be set")]
    NoFilePath,

    #[error("Either file_url or base_file_url must be set")]
    NoFileUrl,

    #[error("Either file_size or local_file must be set")]
    NoFileSize,

    #[error("Base URL \"{base}\" cannot be combined with the file path: {source}")]
    BadBaseUrl { base: String, source: url::ParseError },

    #[error("Could not read the size of {local_file}: {source}")]
    FileSize {
        local_file: PathBuf,
        source: std::io::Error,
    },
}
