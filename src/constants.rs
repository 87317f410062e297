// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Useful constants.

/// URL of the production SVO RESTful API.
pub(crate) const DEFAULT_API_URL: &str = "https://solarnet.oma.be/service/api/svo";

/// Keywords that never make useful SVO keyword definitions. Structural and
/// checksum cards, plus the commentary keywords which have no value.
pub(crate) const DEFAULT_EXCLUDE_KEYWORDS: &[&str] = &[
    "DATASUM", "CHECKSUM", "SIMPLE", "BITPIX", "COMMENT", "HISTORY", "END", "",
];

/// Default path of the file containing the `username:api_key` credentials.
pub(crate) const DEFAULT_AUTH_FILE: &str = "./.svo_auth";

/// Default output path for extracted keyword definitions.
pub(crate) const DEFAULT_KEYWORDS_OUTPUT: &str = "keywords_definitions.json";
