// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use tempfile::TempDir;

use crate::{get_cmd_output, svo_tools, write_fits};

#[test]
fn submit_metadata_needs_an_auth_file() {
    let tmp = TempDir::new().unwrap();
    let fits_file = tmp.path().join("swap.fits");
    write_fits(
        &fits_file,
        &[("WAVELNTH", "174", "[Angstrom] Wavelength of the observation")],
    );
    let auth_file = tmp.path().join("does_not_exist");

    let cmd = svo_tools()
        .arg("submit-metadata")
        .arg("--auth-file")
        .arg(&auth_file)
        .arg("SWAP level 1")
        .arg(&fits_file)
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("username and api key"));
}

#[test]
fn submit_metadata_rejects_a_bad_min_modif_time() {
    let tmp = TempDir::new().unwrap();
    let fits_file = tmp.path().join("swap.fits");
    write_fits(
        &fits_file,
        &[("WAVELNTH", "174", "[Angstrom] Wavelength of the observation")],
    );

    let cmd = svo_tools()
        .arg("submit-metadata")
        .arg("--dry-run")
        .arg("--min-modif-time")
        .arg("yesterday")
        .arg("SWAP level 1")
        .arg(&fits_file)
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("not a valid date"));
}
