// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The records submitted to the SVO: metadata and data locations.

mod data_location;
mod metadata;
#[cfg(test)]
mod tests;

pub use data_location::{DataLocation, DataLocationBuilder, DataLocationError};
pub use metadata::{MetadataBuilder, MetadataError};
