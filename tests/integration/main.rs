// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod extract_keywords;
mod submit_metadata;

use std::ffi::CString;
use std::path::Path;
use std::process::Output;
use std::str::from_utf8;

use assert_cmd::{output::OutputError, Command};
use fitsio::FitsFile;

fn svo_tools() -> Command {
    Command::cargo_bin("svo-tools").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

/// Create a FITS file at `path` whose primary HDU carries the given
/// `(keyword, value, comment)` cards, with the values as raw value strings.
fn write_fits(path: &Path, cards: &[(&str, &str, &str)]) {
    let mut fptr = FitsFile::create(path).open().unwrap();
    // Make the primary HDU current.
    fptr.hdu(0).unwrap();
    let mut status = 0;
    for (keyword, value, comment) in cards {
        let image = format!("{keyword:<8}= {value:>20} / {comment}");
        let image = CString::new(image).unwrap();
        unsafe {
            // ffprec = fits_write_record
            fitsio_sys::ffprec(fptr.as_raw(), image.as_ptr(), &mut status);
        }
        assert_eq!(status, 0, "couldn't write card {keyword}");
    }
}

#[test]
fn help_is_also_correct() {
    let cmd = svo_tools().arg("--help").ok();
    assert!(cmd.is_ok());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty());
    assert!(stdout.contains("extract-keywords"));
    assert!(stdout.contains("submit-metadata"));
}

#[test]
fn no_subcommand_fails() {
    let cmd = svo_tools().ok();
    assert!(cmd.is_err());
}
