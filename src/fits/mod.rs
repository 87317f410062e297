// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helper functions for reading FITS headers.
//!
//! The high-level `fitsio` wrapper reads keyword values but not comments, and
//! has no card iteration, so the card-by-card access goes through raw
//! `fitsio-sys` calls on the current HDU.

mod card;
mod error;
#[cfg(test)]
pub(crate) mod test_support;
#[cfg(test)]
mod tests;

pub use card::{Card, CardValue};
pub use error::FitsError;

use std::{
    ffi::CStr,
    fmt::Display,
    os::raw::c_char,
    path::Path,
    ptr,
    str::FromStr,
};

use fitsio::{hdu::*, FitsFile};

/// Maximum length of a header card, with room for the NUL terminator.
const FLEN_CARD: usize = 81;

/// Which HDU to inspect, by position or by EXTNAME.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HduSpec {
    Index(usize),
    Name(String),
}

impl Default for HduSpec {
    fn default() -> Self {
        HduSpec::Index(0)
    }
}

impl FromStr for HduSpec {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<usize>() {
            Ok(index) => Ok(HduSpec::Index(index)),
            Err(_) => Ok(HduSpec::Name(s.to_string())),
        }
    }
}

impl Display for HduSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            HduSpec::Index(index) => write!(f, "{index}"),
            HduSpec::Name(name) => write!(f, "{name}"),
        }
    }
}

/// The full header of one HDU: every card, plus the header as a single block
/// of text (the `fits_header` field of SVO metadata records).
#[derive(Debug, Clone)]
pub struct FitsHeader {
    pub cards: Vec<Card>,
    pub text: String,
}

impl FitsHeader {
    /// Find a card by keyword. FITS keywords are case-insensitive.
    pub fn get(&self, keyword: &str) -> Option<&Card> {
        self.cards
            .iter()
            .find(|card| card.keyword.eq_ignore_ascii_case(keyword))
    }
}

/// Open a fits file.
#[track_caller]
pub fn fits_open<P: AsRef<Path>>(file: P) -> Result<FitsFile, FitsError> {
    FitsFile::open(file.as_ref()).map_err(|e| {
        let caller = std::panic::Location::caller();
        FitsError::Open {
            fits_error: Box::new(e),
            fits_filename: file.as_ref().to_path_buf().into_boxed_path(),
            source_file: caller.file(),
            source_line: caller.line(),
            source_column: caller.column(),
        }
    })
}

/// Open a fits file's HDU, making it the current HDU of the file pointer.
#[track_caller]
pub fn fits_open_hdu<T: DescribesHdu + Display + Copy>(
    fits_fptr: &mut FitsFile,
    hdu_description: T,
) -> Result<FitsHdu, FitsError> {
    fits_fptr.hdu(hdu_description).map_err(|e| {
        let caller = std::panic::Location::caller();
        FitsError::Fitsio {
            fits_error: Box::new(e),
            fits_filename: fits_fptr.file_path().to_path_buf().into_boxed_path(),
            hdu_description: format!("{hdu_description}").into_boxed_str(),
            source_file: caller.file(),
            source_line: caller.line(),
            source_column: caller.column(),
        }
    })
}

/// Open the HDU described by an [`HduSpec`].
#[track_caller]
pub fn fits_open_hdu_spec(fits_fptr: &mut FitsFile, spec: &HduSpec) -> Result<FitsHdu, FitsError> {
    match spec {
        HduSpec::Index(index) => fits_open_hdu(fits_fptr, *index),
        HduSpec::Name(name) => fits_open_hdu(fits_fptr, name.as_str()),
    }
}

/// The number of keywords in the current HDU's header.
#[track_caller]
pub fn fits_num_keys(fits_fptr: &mut FitsFile) -> Result<usize, FitsError> {
    let mut num_keys: std::os::raw::c_int = 0;
    let mut more_keys: std::os::raw::c_int = 0;
    let mut status = 0;
    unsafe {
        // ffghsp = fits_get_hdrspace
        fitsio_sys::ffghsp(fits_fptr.as_raw(), &mut num_keys, &mut more_keys, &mut status);
    }
    fits_check_status(fits_fptr, status, "counting header keywords")?;
    Ok(num_keys as usize)
}

/// Read the `key_num`th card (0-based) of the current HDU, comment included.
#[track_caller]
pub fn fits_read_card(fits_fptr: &mut FitsFile, key_num: usize) -> Result<Card, FitsError> {
    let mut keyword = [0 as c_char; FLEN_CARD];
    let mut value = [0 as c_char; FLEN_CARD];
    let mut comment = [0 as c_char; FLEN_CARD];
    let mut status = 0;
    unsafe {
        // ffgkyn = fits_read_keyn, 1-based
        fitsio_sys::ffgkyn(
            fits_fptr.as_raw(),
            (key_num + 1) as _,
            keyword.as_mut_ptr(),
            value.as_mut_ptr(),
            comment.as_mut_ptr(),
            &mut status,
        );
    }
    fits_check_status(fits_fptr, status, "reading a header card")?;

    let keyword = unsafe { CStr::from_ptr(keyword.as_ptr()) }
        .to_string_lossy()
        .into_owned();
    let raw_value = unsafe { CStr::from_ptr(value.as_ptr()) }
        .to_string_lossy()
        .into_owned();
    let comment = unsafe { CStr::from_ptr(comment.as_ptr()) }
        .to_string_lossy()
        .into_owned();
    let value = CardValue::parse(&raw_value);
    Ok(Card {
        keyword,
        raw_value,
        value,
        comment,
    })
}

/// The current HDU's header as one string of 80-character card images,
/// COMMENT/HISTORY cards included.
#[track_caller]
pub fn fits_header_text(fits_fptr: &mut FitsFile) -> Result<String, FitsError> {
    let mut header_ptr = ptr::null_mut();
    let mut num_keys = 0;
    let mut status = 0;
    unsafe {
        // ffhdr2str = fits_hdr2str
        fitsio_sys::ffhdr2str(
            fits_fptr.as_raw(),
            0,               /* I - don't exclude any cards     */
            ptr::null_mut(), /* I - no exclusion list           */
            0,
            &mut header_ptr,
            &mut num_keys,
            &mut status,
        );
    }
    fits_check_status(fits_fptr, status, "reading the header as a string")?;

    let text = unsafe { CStr::from_ptr(header_ptr) }
        .to_string_lossy()
        .trim_end()
        .to_string();
    unsafe {
        // fffree = fits_free_memory; the status it reports isn't useful.
        fitsio_sys::fffree(header_ptr.cast(), &mut 0);
    }
    Ok(text)
}

/// Read every card of the HDU described by `spec`, plus the header text.
#[track_caller]
pub fn fits_read_header(fits_fptr: &mut FitsFile, spec: &HduSpec) -> Result<FitsHeader, FitsError> {
    fits_open_hdu_spec(fits_fptr, spec)?;
    let num_keys = fits_num_keys(fits_fptr)?;
    let mut cards = Vec::with_capacity(num_keys);
    for key_num in 0..num_keys {
        cards.push(fits_read_card(fits_fptr, key_num)?);
    }
    let text = fits_header_text(fits_fptr)?;
    Ok(FitsHeader { cards, text })
}

#[track_caller]
fn fits_check_status(
    fits_fptr: &FitsFile,
    status: i32,
    op: &'static str,
) -> Result<(), FitsError> {
    if status == 0 {
        return Ok(());
    }
    let caller = std::panic::Location::caller();
    Err(FitsError::Cfitsio {
        status,
        op,
        fits_filename: fits_fptr.file_path().to_path_buf().into_boxed_path(),
        source_file: caller.file(),
        source_line: caller.line(),
        source_column: caller.column(),
    })
}
