// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Build a metadata record from a FITS header and the dataset's keyword
//! definitions.

use log::{debug, warn};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::fits::{CardValue, FitsHeader};
use crate::keywords::{KeywordDefinition, KeywordType};
use crate::time::{format_date_time, parse_date_time};

/// The fields every metadata record must carry, on top of the dataset's own
/// keywords.
const REQUIRED_FIELDS: &[&str] = &[
    "oid",
    "fits_header",
    "date_beg",
    "date_end",
    "wavemin",
    "wavemax",
];

/// Builds the JSON payload of one metadata record. The required fields are
/// hard errors; the other keyword fields are skipped with a warning when the
/// FITS header doesn't provide them.
pub struct MetadataBuilder<'a> {
    header: &'a FitsHeader,
    keywords: &'a [KeywordDefinition],
    oid: Option<String>,
}

impl<'a> MetadataBuilder<'a> {
    pub fn new(header: &'a FitsHeader, keywords: &'a [KeywordDefinition]) -> MetadataBuilder<'a> {
        MetadataBuilder {
            header,
            keywords,
            oid: None,
        }
    }

    /// Use an explicit observation id instead of deriving it from `date_beg`.
    pub fn with_oid(mut self, oid: Option<String>) -> MetadataBuilder<'a> {
        self.oid = oid;
        self
    }

    /// Build the record. Keywords named like a required field don't get
    /// extracted twice.
    pub fn build(&self) -> Result<Map<String, Value>, MetadataError> {
        let mut record = Map::new();
        for field in REQUIRED_FIELDS {
            record.insert(field.to_string(), self.field_value(field)?);
        }
        for keyword in self.keywords {
            if record.contains_key(&keyword.name) {
                continue;
            }
            match self.field_value(&keyword.name) {
                Ok(value) => {
                    debug!("Field {} has value \"{value}\"", keyword.name);
                    record.insert(keyword.name.clone(), value);
                }
                Err(why) => {
                    warn!("Could not extract value for field {}: {why}", keyword.name);
                }
            }
        }
        Ok(record)
    }

    fn field_value(&self, field_name: &str) -> Result<Value, MetadataError> {
        match field_name {
            "oid" => self.oid_value(),
            "fits_header" => Ok(Value::String(self.header.text.trim().to_string())),
            _ => {
                let keyword = self
                    .keywords
                    .iter()
                    .find(|keyword| keyword.name == field_name)
                    .ok_or_else(|| MetadataError::MissingDefinition {
                        field: field_name.to_string(),
                    })?;
                let card = self.header.get(&keyword.verbose_name).ok_or_else(|| {
                    MetadataError::MissingKeyword {
                        keyword: keyword.verbose_name.clone(),
                    }
                })?;
                convert(&card.value, keyword.keyword_type)
            }
        }
    }

    /// The observation id: explicit, or `date_beg` simplified to
    /// `%Y%m%d%H%M%S`.
    fn oid_value(&self) -> Result<Value, MetadataError> {
        if let Some(oid) = &self.oid {
            return Ok(Value::String(oid.clone()));
        }
        let date_beg = match self.field_value("date_beg")? {
            Value::String(date_beg) => date_beg,
            other => other.to_string(),
        };
        let date_beg = parse_date_time(&date_beg).ok_or(MetadataError::BadDateBeg { date_beg })?;
        Ok(Value::String(date_beg.format("%Y%m%d%H%M%S").to_string()))
    }
}

/// Convert a card value to the JSON form of the given SVO keyword type.
fn convert(value: &CardValue, keyword_type: KeywordType) -> Result<Value, MetadataError> {
    let conversion_error = || MetadataError::Convert {
        value: value.as_text(),
        keyword_type,
    };
    match keyword_type {
        KeywordType::Text => Ok(Value::String(value.as_text())),
        KeywordType::Boolean => match value {
            CardValue::Logical(logical) => Ok(Value::Bool(*logical)),
            CardValue::Integer(integer) => Ok(Value::Bool(*integer != 0)),
            _ => Err(conversion_error()),
        },
        KeywordType::Integer => match value {
            CardValue::Integer(integer) => Ok(Value::Number((*integer).into())),
            CardValue::Text(text) => text
                .trim()
                .parse::<i64>()
                .map(|integer| Value::Number(integer.into()))
                .map_err(|_| conversion_error()),
            _ => Err(conversion_error()),
        },
        KeywordType::Real => {
            let real = match value {
                CardValue::Real(real) => Some(*real),
                CardValue::Integer(integer) => Some(*integer as f64),
                CardValue::Text(text) => text.trim().parse::<f64>().ok(),
                _ => None,
            };
            real.and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(conversion_error)
        }
        KeywordType::Time => match value {
            CardValue::Text(text) => parse_date_time(text)
                .map(|date_time| Value::String(format_date_time(date_time)))
                .ok_or_else(conversion_error),
            _ => Err(conversion_error()),
        },
    }
}

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Keyword definition missing for field {field}")]
    MissingDefinition { field: String },

    #[error("Keyword {keyword} missing from FITS header")]
    MissingKeyword { keyword: String },

    #[error("Could not convert value \"{value}\" to {keyword_type}")]
    Convert {
        value: String,
        keyword_type: KeywordType,
    },

    #[error("Could not derive an oid: \"{date_beg}\" is not a valid date_beg")]
    BadDateBeg { date_beg: String },
}
