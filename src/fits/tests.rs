// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::test_support::{swap_like_cards, write_test_fits};
use super::*;

#[test]
fn test_hdu_spec_parsing() {
    assert_eq!("0".parse::<HduSpec>().unwrap(), HduSpec::Index(0));
    assert_eq!("3".parse::<HduSpec>().unwrap(), HduSpec::Index(3));
    assert_eq!(
        "IMAGE".parse::<HduSpec>().unwrap(),
        HduSpec::Name("IMAGE".to_string())
    );
}

#[test]
fn test_read_header_cards() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("swap.fits");
    write_test_fits(&path, &swap_like_cards());

    let mut fptr = fits_open(&path).unwrap();
    let header = fits_read_header(&mut fptr, &HduSpec::Index(0)).unwrap();

    // The structural cards (SIMPLE, BITPIX, NAXIS, ...) are present too.
    assert!(header.cards.len() >= swap_like_cards().len());

    let telescop = header.get("TELESCOP").unwrap();
    assert_eq!(telescop.value, CardValue::Text("SWAP".to_string()));
    assert_eq!(telescop.comment, "Telescope name");

    let wavelnth = header.get("WAVELNTH").unwrap();
    assert_eq!(wavelnth.value, CardValue::Integer(174));
    assert_eq!(wavelnth.comment, "[Angstrom] Wavelength of the observation");

    let exptime = header.get("EXPTIME").unwrap();
    assert_eq!(exptime.value, CardValue::Real(10.0));

    let passfail = header.get("PASSFAIL").unwrap();
    assert_eq!(passfail.value, CardValue::Logical(true));

    // Keyword lookup is case-insensitive.
    assert!(header.get("telescop").is_some());
    assert!(header.get("NO-SUCH").is_none());
}

#[test]
fn test_header_text_contains_card_images() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("swap.fits");
    write_test_fits(&path, &swap_like_cards());

    let mut fptr = fits_open(&path).unwrap();
    let header = fits_read_header(&mut fptr, &HduSpec::Index(0)).unwrap();

    assert!(header.text.contains("TELESCOP"));
    assert!(header.text.contains("SWAP"));
    // Card images are 80 characters; several cards means a long text.
    assert!(header.text.len() > 80);
}

#[test]
fn test_open_missing_file_is_an_error() {
    let result = fits_open("definitely/not/a/file.fits");
    assert!(matches!(result, Err(FitsError::Open { .. })));
}

#[test]
fn test_missing_hdu_is_an_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("swap.fits");
    write_test_fits(&path, &swap_like_cards());

    let mut fptr = fits_open(&path).unwrap();
    let result = fits_read_header(&mut fptr, &HduSpec::Index(7));
    match result {
        Err(e @ FitsError::Fitsio { .. }) => {
            // The offending file is named in the message.
            assert!(e.to_string().contains("swap.fits"));
        }
        other => panic!("expected a Fitsio error, got {other:?}"),
    }

    let result = fits_read_header(&mut fptr, &HduSpec::Name("NO-SUCH".to_string()));
    assert!(result.is_err());
}
