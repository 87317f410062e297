// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! SVO keyword definitions and how they are derived from FITS headers.
//!
//! A dataset in the SVO is described by a list of keyword definitions; each
//! one names a metadata field, points to the FITS keyword the value comes
//! from (`verbose_name`) and fixes the field's type. [`inspector`] derives
//! these definitions by tallying a series of FITS headers.

pub mod inspector;
pub(crate) mod resolve;

pub use inspector::KeywordInspector;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::fits::CardValue;
use crate::time::parse_date_time;

lazy_static! {
    // Units are usually specified at the beginning of the comment between
    // brackets, e.g. "[Angstrom] Wavelength of the observation".
    static ref UNIT_PATTERN: Regex = Regex::new(r"^\s*\[\s*(?P<unit>[^\]]+?)\s*\]\s*(?P<comment>.*?)\s*$").unwrap();
    static ref NON_NAME_CHARS: Regex = Regex::new(r"[^a-zA-Z0-9_]").unwrap();
}

/// The type of an SVO keyword. The string forms are the type names the SVO
/// database uses.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
pub enum KeywordType {
    #[serde(rename = "text")]
    #[strum(serialize = "text")]
    Text,
    #[serde(rename = "boolean")]
    #[strum(serialize = "boolean")]
    Boolean,
    #[serde(rename = "integer")]
    #[strum(serialize = "integer")]
    Integer,
    #[serde(rename = "real")]
    #[strum(serialize = "real")]
    Real,
    #[serde(rename = "time (ISO 8601)")]
    #[strum(serialize = "time (ISO 8601)")]
    Time,
}

impl KeywordType {
    /// The SVO type of a card value. Text values that look like dates are
    /// time keywords; undefined values don't pin down a type and default to
    /// text.
    pub fn of_value(value: &CardValue) -> KeywordType {
        match value {
            CardValue::Logical(_) => KeywordType::Boolean,
            CardValue::Integer(_) => KeywordType::Integer,
            CardValue::Real(_) => KeywordType::Real,
            CardValue::Text(text) if parse_date_time(text).is_some() => KeywordType::Time,
            CardValue::Text(_) | CardValue::Undefined => KeywordType::Text,
        }
    }
}

/// One keyword definition as stored by the SVO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordDefinition {
    /// SVO-compliant field name, e.g. `date_obs`.
    pub name: String,
    /// The FITS keyword the value comes from, e.g. `DATE-OBS`.
    pub verbose_name: String,
    #[serde(rename = "type")]
    pub keyword_type: KeywordType,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Convert a FITS keyword into an SVO-compliant keyword name: lower case,
/// any unusual character replaced by an underscore, consecutive underscores
/// collapsed and underscores stripped from the extremities.
pub fn keyword_name(keyword: &str) -> String {
    let mut name = NON_NAME_CHARS
        .replace_all(keyword.trim().to_lowercase().as_str(), "_")
        .into_owned();
    while name.contains("__") {
        name = name.replace("__", "_");
    }
    name.trim_matches('_').to_string()
}

/// Split a card comment into a unit and a description.
pub fn unit_and_description(comment: &str) -> (Option<String>, String) {
    match UNIT_PATTERN.captures(comment) {
        Some(captures) => (
            Some(captures["unit"].to_string()),
            captures["comment"].to_string(),
        ),
        None => (None, comment.trim().to_string()),
    }
}
