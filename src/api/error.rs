// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with the SVO RESTful API.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Could not read SVO username and api key from file \"{path}\": {source}")]
    AuthFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(
        "Auth file \"{path}\" does not have the correct format, i.e. username:api_key"
    )]
    AuthFormat { path: PathBuf },

    #[error("\"{url}\" is not a valid URL: {source}")]
    BadUrl { url: String, source: url::ParseError },

    /// e.g. a `mailto:` URL parses, but resource paths can't hang off it.
    #[error("\"{url}\" cannot be used as an API base URL")]
    NotABaseUrl { url: String },

    /// The server answered with a non-success status. The response body is
    /// included because the SVO's validation errors are in there.
    #[error("{url} answered {status}:\n{body}")]
    Http {
        status: reqwest::StatusCode,
        url: String,
        body: String,
    },

    #[error("{url} did not answer with valid JSON: {source}")]
    Json {
        url: String,
        source: serde_json::Error,
    },

    #[error("{url} answered with an unexpected JSON structure: {source}")]
    Structure {
        url: String,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Request(#[from] reqwest::Error),
}
