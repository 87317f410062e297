// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Write small FITS files for tests.

use std::ffi::CString;
use std::path::Path;

use fitsio::FitsFile;

/// Create a FITS file at `path` whose primary HDU carries the given
/// `(keyword, value, comment)` cards. Values are written as raw value
/// strings, so e.g. a text value needs its quotes: `("TELESCOP", "'SWAP'",
/// "the telescope")`.
pub(crate) fn write_test_fits(path: &Path, cards: &[(&str, &str, &str)]) {
    let mut fptr = FitsFile::create(path).open().unwrap();
    // Make the primary HDU current.
    fptr.hdu(0).unwrap();
    let mut status = 0;
    for (keyword, value, comment) in cards {
        let image = if comment.is_empty() {
            format!("{keyword:<8}= {value:>20}")
        } else {
            format!("{keyword:<8}= {value:>20} / {comment}")
        };
        let image = CString::new(image).unwrap();
        unsafe {
            // ffprec = fits_write_record
            fitsio_sys::ffprec(fptr.as_raw(), image.as_ptr(), &mut status);
        }
        assert_eq!(status, 0, "couldn't write card {keyword}");
    }
    // Drop flushes the file to disk.
}

/// A representative SWAP-like header.
pub(crate) fn swap_like_cards() -> Vec<(&'static str, &'static str, &'static str)> {
    vec![
        ("TELESCOP", "'SWAP    '", "Telescope name"),
        ("WAVELNTH", "174", "[Angstrom] Wavelength of the observation"),
        ("EXPTIME", "10.0", "[s] Exposure time"),
        ("DATE-OBS", "'2021-06-13T09:22:30.5'", "Start of the observation"),
        ("LEVEL", "1", "Processing level"),
        ("PASSFAIL", "T", "Pass quality control"),
    ]
}
