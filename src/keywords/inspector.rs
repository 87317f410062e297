// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Derive SVO keyword definitions by scanning a series of FITS files.
//!
//! Files spread over the whole dataset work better than consecutive ones:
//! the tallies then pick up changes in the headers over time, which surface
//! as ambiguities for the user to resolve.

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use thiserror::Error;

use super::resolve::{resolve_ambiguity, Choice, Resolution};
use super::{keyword_name, unit_and_description, KeywordDefinition, KeywordType};
use crate::constants::DEFAULT_EXCLUDE_KEYWORDS;
use crate::fits::{fits_open, fits_read_header, CardValue, FitsHeader, HduSpec};

/// How many example values to show when asking the user to resolve an
/// ambiguity.
const NUM_EXAMPLES: usize = 3;

/// How often one value of one keyword was observed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueTally {
    pub value: CardValue,
    pub count: u64,
}

/// The tallies of the inspector, kept separate so they can be snapshotted to
/// a backup file and restored after an interruption.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct InspectorState {
    processed_files: Vec<PathBuf>,
    /// keyword -> raw value string -> tally. Keyed by the raw string because
    /// real values don't hash; insertion order is the order of first
    /// appearance, which is also the output order.
    keyword_values: IndexMap<String, IndexMap<String, ValueTally>>,
    /// keyword -> comment -> count.
    keyword_comments: IndexMap<String, IndexMap<String, u64>>,
}

pub struct KeywordInspector {
    hdu: HduSpec,
    exclude_keywords: Vec<String>,
    backup_path: Option<PathBuf>,
    force_interactive: bool,
    state: InspectorState,
}

impl KeywordInspector {
    /// Set up an inspector. When a backup file is given and exists, the
    /// tallies and the list of already-processed files are restored from it.
    pub fn new(
        hdu: HduSpec,
        exclude_keywords: &[String],
        backup_path: Option<PathBuf>,
        force_interactive: bool,
    ) -> Result<KeywordInspector, InspectorError> {
        let exclude_keywords = DEFAULT_EXCLUDE_KEYWORDS
            .iter()
            .map(|keyword| keyword.to_string())
            .chain(exclude_keywords.iter().map(|keyword| keyword.to_uppercase()))
            .collect();
        let state = match &backup_path {
            Some(path) if path.is_file() => restore_backup(path)?,
            _ => InspectorState::default(),
        };
        Ok(KeywordInspector {
            hdu,
            exclude_keywords,
            backup_path,
            force_interactive,
            state,
        })
    }

    /// Inspect all the FITS files and tally the keywords, their values and
    /// comments. Unreadable files are logged and skipped; the backup (when
    /// configured) is re-saved after every file.
    pub fn process_files(&mut self, fits_files: &[PathBuf]) -> Result<(), InspectorError> {
        for fits_file in fits_files {
            if self.state.processed_files.contains(fits_file) {
                info!(
                    "File {} was already processed. Skipping!",
                    fits_file.display()
                );
                continue;
            }
            info!("Processing file {}", fits_file.display());
            let header = fits_open(fits_file)
                .and_then(|mut fptr| fits_read_header(&mut fptr, &self.hdu));
            match header {
                Ok(header) => {
                    self.inspect_header(&header);
                    self.state.processed_files.push(fits_file.clone());
                    if let Some(path) = &self.backup_path {
                        save_backup(path, &self.state)?;
                    }
                }
                Err(e) => {
                    error!("Could not read file {}: {e} . Skipping!", fits_file.display());
                }
            }
        }
        Ok(())
    }

    /// Tally the cards of one header.
    pub fn inspect_header(&mut self, header: &FitsHeader) {
        for card in &header.cards {
            if self.exclude_keywords.contains(&card.keyword.to_uppercase()) {
                debug!("Keyword {} in exclude_keywords. Skipping!", card.keyword);
                continue;
            }
            let tally = self
                .state
                .keyword_values
                .entry(card.keyword.clone())
                .or_default()
                .entry(card.raw_value.clone())
                .or_insert_with(|| ValueTally {
                    value: card.value.clone(),
                    count: 0,
                });
            tally.count += 1;
            *self
                .state
                .keyword_comments
                .entry(card.keyword.clone())
                .or_default()
                .entry(card.comment.clone())
                .or_insert(0) += 1;
        }
    }

    /// True when no keyword has been tallied, e.g. every file failed to read.
    pub fn is_empty(&self) -> bool {
        self.state.keyword_values.is_empty()
    }

    /// The files successfully inspected so far, restored ones included.
    pub fn processed_files(&self) -> &[PathBuf] {
        &self.state.processed_files
    }

    /// Build the keyword definitions from the tallies, asking the user (via
    /// `input`/`output`) whenever files disagree on a type, unit or
    /// description.
    pub fn keyword_definitions(
        &self,
        input: &mut impl BufRead,
        output: &mut impl Write,
    ) -> Result<Vec<KeywordDefinition>, InspectorError> {
        let mut definitions = Vec::with_capacity(self.state.keyword_values.len());
        for keyword in self.state.keyword_values.keys() {
            let keyword_type = self.resolve_type(keyword, input, output)?;
            let (unit, description) = self.resolve_unit_description(keyword, input, output)?;
            definitions.push(KeywordDefinition {
                name: keyword_name(keyword),
                verbose_name: keyword.clone(),
                keyword_type,
                unit,
                description: Some(description),
            });
        }
        Ok(definitions)
    }

    /// The SVO types observed for a keyword, with their total counts and a
    /// few example raw values each, in order of first appearance.
    fn observed_types(&self, keyword: &str) -> IndexMap<KeywordType, (u64, Vec<String>)> {
        let mut types: IndexMap<KeywordType, (u64, Vec<String>)> = IndexMap::new();
        if let Some(values) = self.state.keyword_values.get(keyword) {
            for (raw_value, tally) in values {
                let keyword_type = KeywordType::of_value(&tally.value);
                let entry = types.entry(keyword_type).or_default();
                entry.0 += tally.count;
                if entry.1.len() < NUM_EXAMPLES {
                    entry.1.push(raw_value.clone());
                }
            }
        }
        types
    }

    fn resolve_type(
        &self,
        keyword: &str,
        input: &mut impl BufRead,
        output: &mut impl Write,
    ) -> Result<KeywordType, InspectorError> {
        let mut types = self.observed_types(keyword);
        if types.len() == 1 && !self.force_interactive {
            let (keyword_type, _) = types.pop().expect("checked for exactly one type");
            return Ok(keyword_type);
        }

        // Offer the unobserved types as well, so the user can overrule the
        // classification entirely.
        for keyword_type in KeywordType::iter() {
            types.entry(keyword_type).or_default();
        }
        let choices = types
            .into_iter()
            .map(|(keyword_type, (count, examples))| Choice {
                label: keyword_type.to_string(),
                value: keyword_type,
                count,
                examples,
            })
            .collect();
        match resolve_ambiguity(keyword, "types", choices, false, input, output)? {
            Resolution::Choice(keyword_type) => Ok(keyword_type),
            Resolution::Manual(_) => unreachable!("type resolution offers no manual input"),
        }
    }

    fn resolve_unit_description(
        &self,
        keyword: &str,
        input: &mut impl BufRead,
        output: &mut impl Write,
    ) -> Result<(Option<String>, String), InspectorError> {
        let mut units: IndexMap<Option<String>, (u64, Vec<String>)> = IndexMap::new();
        let mut descriptions: IndexMap<String, (u64, Vec<String>)> = IndexMap::new();
        if let Some(comments) = self.state.keyword_comments.get(keyword) {
            for (comment, count) in comments {
                let (unit, description) = unit_and_description(comment);
                let entry = units.entry(unit).or_default();
                entry.0 += count;
                if entry.1.len() < NUM_EXAMPLES {
                    entry.1.push(comment.clone());
                }
                let entry = descriptions.entry(description).or_default();
                entry.0 += count;
                if entry.1.len() < NUM_EXAMPLES {
                    entry.1.push(comment.clone());
                }
            }
        }

        let unit = if units.len() == 1 && !self.force_interactive {
            units.pop().expect("checked for exactly one unit").0
        } else {
            // Make sure that "no unit" is always an option.
            units.entry(None).or_default();
            let choices = units
                .into_iter()
                .map(|(unit, (count, examples))| Choice {
                    label: unit.clone().unwrap_or_else(|| "None".to_string()),
                    value: unit,
                    count,
                    examples,
                })
                .collect();
            match resolve_ambiguity(keyword, "units", choices, true, input, output)? {
                Resolution::Choice(unit) => unit,
                Resolution::Manual(unit) if unit.is_empty() => None,
                Resolution::Manual(unit) => Some(unit),
            }
        };

        let description = if descriptions.len() == 1 && !self.force_interactive {
            descriptions
                .pop()
                .expect("checked for exactly one description")
                .0
        } else {
            let choices = descriptions
                .into_iter()
                .map(|(description, (count, examples))| Choice {
                    label: description.clone(),
                    value: description,
                    count,
                    examples,
                })
                .collect();
            match resolve_ambiguity(keyword, "descriptions", choices, true, input, output)? {
                Resolution::Choice(description) => description,
                Resolution::Manual(description) => description,
            }
        };

        Ok((unit, description))
    }
}

fn save_backup(path: &Path, state: &InspectorState) -> Result<(), InspectorError> {
    debug!("Saving state to backup file {}", path.display());
    let file = std::fs::File::create(path).map_err(|source| InspectorError::Backup {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::to_writer(BufWriter::new(file), state).map_err(|source| {
        InspectorError::BackupFormat {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn restore_backup(path: &Path) -> Result<InspectorState, InspectorError> {
    debug!("Restoring state from backup file {}", path.display());
    let file = std::fs::File::open(path).map_err(|source| InspectorError::Backup {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        InspectorError::BackupFormat {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[derive(Error, Debug)]
pub enum InspectorError {
    #[error("Could not open backup file {path}: {source}")]
    Backup {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Backup file {path} is not a valid state snapshot: {source}")]
    BackupFormat {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Could not resolve ambiguity: {0}")]
    Prompt(#[from] std::io::Error),
}
