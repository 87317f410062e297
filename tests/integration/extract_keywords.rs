// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use indoc::indoc;
use tempfile::TempDir;

use crate::{get_cmd_output, svo_tools, write_fits};

#[test]
fn extract_keywords_writes_tab_indented_definitions() {
    let tmp = TempDir::new().unwrap();
    let fits_file = tmp.path().join("swap.fits");
    write_fits(
        &fits_file,
        &[("WAVELNTH", "174", "[Angstrom] Wavelength of the observation")],
    );
    let output = tmp.path().join("keywords_definitions.json");

    let cmd = svo_tools()
        .arg("extract-keywords")
        .arg("--no-progress-bars")
        .arg("-E")
        .arg("NAXIS")
        .arg("-E")
        .arg("EXTEND")
        .arg("-o")
        .arg(&output)
        .arg(&fits_file)
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));

    let written = std::fs::read_to_string(&output).unwrap();
    let expected = indoc! {r#"
        [
            {
                "name": "wavelnth",
                "verbose_name": "WAVELNTH",
                "type": "integer",
                "unit": "Angstrom",
                "description": "Wavelength of the observation"
            }
        ]"#}
    .replace("    ", "\t");
    assert_eq!(written, expected);
}

#[test]
fn extract_keywords_needs_matching_files() {
    let tmp = TempDir::new().unwrap();
    let pattern = tmp.path().join("*.fits");

    let cmd = svo_tools().arg("extract-keywords").arg(&pattern).ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("No glob matches"));
}
