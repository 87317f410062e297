// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all svo-tools-related errors. This should be the *only*
//! error enum that is publicly visible.

use thiserror::Error;

use crate::{
    api::ApiError,
    fits::FitsError,
    glob::GlobError,
    keywords::inspector::InspectorError,
    records::{DataLocationError, MetadataError},
};

/// The *only* publicly visible error from svo-tools.
#[derive(Error, Debug)]
pub enum SvoToolsError {
    /// An error related to extract-keywords.
    #[error("{0}")]
    ExtractKeywords(String),

    /// An error related to submit-metadata.
    #[error("{0}")]
    SubmitMetadata(String),

    /// An error related to the SVO RESTful API.
    #[error("{0}")]
    Api(String),

    /// A cfitsio error. Because these are usually quite spartan, some
    /// suggestions are provided here.
    #[error("cfitsio error: {0}\n\nIf you don't know what this means, try turning up verbosity (-v or -vv) and maybe disabling progress bars.")]
    Cfitsio(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

impl From<InspectorError> for SvoToolsError {
    fn from(e: InspectorError) -> Self {
        Self::ExtractKeywords(e.to_string())
    }
}

impl From<MetadataError> for SvoToolsError {
    fn from(e: MetadataError) -> Self {
        Self::SubmitMetadata(e.to_string())
    }
}

impl From<DataLocationError> for SvoToolsError {
    fn from(e: DataLocationError) -> Self {
        Self::SubmitMetadata(e.to_string())
    }
}

impl From<ApiError> for SvoToolsError {
    fn from(e: ApiError) -> Self {
        Self::Api(e.to_string())
    }
}

impl From<FitsError> for SvoToolsError {
    fn from(e: FitsError) -> Self {
        let s = e.to_string();
        match e {
            FitsError::Open { .. } => Self::Generic(s),
            FitsError::Fitsio { .. } | FitsError::Cfitsio { .. } => Self::Cfitsio(s),
        }
    }
}

impl From<GlobError> for SvoToolsError {
    fn from(e: GlobError) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<std::io::Error> for SvoToolsError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
