// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! FITS header cards and their values.

use serde::{Deserialize, Serialize};

/// One header card: the keyword, the value string exactly as cfitsio hands it
/// over, the classified value, and the comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub keyword: String,
    pub raw_value: String,
    pub value: CardValue,
    pub comment: String,
}

/// A card value, classified following the cfitsio value-string rules: a
/// quoted string is text, a bare `T`/`F` is a logical, a number is an integer
/// unless it has a fractional part or exponent, and an absent value is
/// undefined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CardValue {
    Undefined,
    Logical(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl CardValue {
    /// Classify a raw value string as read with `fits_read_keyn`.
    pub fn parse(raw_value: &str) -> CardValue {
        let value = raw_value.trim();
        if value.is_empty() {
            return CardValue::Undefined;
        }
        if value.starts_with('\'') {
            return CardValue::Text(unquote(value));
        }
        match value {
            "T" => return CardValue::Logical(true),
            "F" => return CardValue::Logical(false),
            _ => (),
        }
        if let Ok(integer) = value.parse::<i64>() {
            return CardValue::Integer(integer);
        }
        // Fortran-style exponents (1.5D3) are permitted by the standard.
        if let Ok(real) = value.replace(['D', 'd'], "E").parse::<f64>() {
            return CardValue::Real(real);
        }
        CardValue::Text(value.to_string())
    }

    /// The text form of the value, as used when a keyword is typed `text` in
    /// the SVO.
    pub fn as_text(&self) -> String {
        match self {
            CardValue::Undefined => String::new(),
            CardValue::Logical(logical) => logical.to_string(),
            CardValue::Integer(integer) => integer.to_string(),
            CardValue::Real(real) => real.to_string(),
            CardValue::Text(text) => text.clone(),
        }
    }
}

/// Strip the outer quotes of a FITS string value, collapse doubled quotes and
/// drop the padding cfitsio keeps at the end.
fn unquote(value: &str) -> String {
    let mut inner = value.strip_prefix('\'').unwrap_or(value);
    inner = inner.strip_suffix('\'').unwrap_or(inner);
    inner.replace("''", "'").trim_end().to_string()
}
