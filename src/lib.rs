// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Provider-side tools for the SOLARNET Virtual Observatory (SVO).

The SVO catalogues solar observations by dataset. Data providers describe
their datasets with *keyword definitions* (derived from FITS headers) and
register individual files as *metadata* and *data location* records via the
SVO RESTful API. This crate implements both halves: inspecting FITS files to
derive the keyword definitions, and building/submitting the records.
 */

pub mod api;
pub mod cli;
pub(crate) mod constants;
pub mod fits;
pub(crate) mod glob;
pub mod keywords;
pub mod records;
pub(crate) mod time;

pub use cli::{SvoTools, SvoToolsError};

use crossbeam_utils::atomic::AtomicCell;

/// Are progress bars to be drawn? Enabled by the command line interface
/// unless the user opts out.
pub(crate) static PROGRESS_BARS: AtomicCell<bool> = AtomicCell::new(false);
