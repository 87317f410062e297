// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde_json::{json, Value};

use super::*;
use crate::fits::{Card, CardValue, FitsHeader};
use crate::keywords::{KeywordDefinition, KeywordType};

fn keyword(name: &str, verbose_name: &str, keyword_type: KeywordType) -> KeywordDefinition {
    KeywordDefinition {
        name: name.to_string(),
        verbose_name: verbose_name.to_string(),
        keyword_type,
        unit: None,
        description: None,
    }
}

fn swap_like_header() -> FitsHeader {
    let cards = [
        ("TELESCOP", "'SWAP    '", "Telescope name"),
        ("WAVELNTH", "174", "[Angstrom] Wavelength"),
        ("EXPTIME", "10.0", "[s] Exposure time"),
        ("DATE-OBS", "'2021-06-13T09:22:30'", "Start of the observation"),
        ("DATE-END", "'2021-06-13T09:22:40'", "End of the observation"),
        ("WAVEMIN", "17.1", "[nm] Min wavelength"),
        ("WAVEMAX", "17.7", "[nm] Max wavelength"),
        ("PASSFAIL", "T", "Pass quality control"),
    ];
    FitsHeader {
        cards: cards
            .iter()
            .map(|(keyword, raw_value, comment)| Card {
                keyword: keyword.to_string(),
                raw_value: raw_value.to_string(),
                value: CardValue::parse(raw_value),
                comment: comment.to_string(),
            })
            .collect(),
        text: "TELESCOP= 'SWAP'".to_string(),
    }
}

fn swap_like_keywords() -> Vec<KeywordDefinition> {
    vec![
        keyword("telescop", "TELESCOP", KeywordType::Text),
        keyword("wavelnth", "WAVELNTH", KeywordType::Integer),
        keyword("exptime", "EXPTIME", KeywordType::Real),
        keyword("date_beg", "DATE-OBS", KeywordType::Time),
        keyword("date_end", "DATE-END", KeywordType::Time),
        keyword("wavemin", "WAVEMIN", KeywordType::Real),
        keyword("wavemax", "WAVEMAX", KeywordType::Real),
        keyword("passfail", "PASSFAIL", KeywordType::Boolean),
        keyword("missing", "MISSING", KeywordType::Text),
    ]
}

#[test]
fn test_metadata_record() {
    let header = swap_like_header();
    let keywords = swap_like_keywords();
    let record = MetadataBuilder::new(&header, &keywords).build().unwrap();

    // The oid is derived from date_beg.
    assert_eq!(record["oid"], json!("20210613092230"));
    assert_eq!(record["fits_header"], json!("TELESCOP= 'SWAP'"));
    assert_eq!(record["date_beg"], json!("2021-06-13T09:22:30"));
    assert_eq!(record["date_end"], json!("2021-06-13T09:22:40"));
    assert_eq!(record["wavemin"], json!(17.1));
    assert_eq!(record["wavemax"], json!(17.7));
    assert_eq!(record["telescop"], json!("SWAP"));
    assert_eq!(record["wavelnth"], json!(174));
    assert_eq!(record["exptime"], json!(10.0));
    assert_eq!(record["passfail"], json!(true));
    // Keywords absent from the header are skipped, not errors.
    assert!(!record.contains_key("missing"));
}

#[test]
fn test_metadata_record_with_explicit_oid() {
    let header = swap_like_header();
    let keywords = swap_like_keywords();
    let record = MetadataBuilder::new(&header, &keywords)
        .with_oid(Some("swap_001".to_string()))
        .build()
        .unwrap();
    assert_eq!(record["oid"], json!("swap_001"));
}

#[test]
fn test_metadata_record_missing_required_field() {
    let header = swap_like_header();
    // No date_beg definition at all.
    let keywords = vec![keyword("date_end", "DATE-END", KeywordType::Time)];
    let result = MetadataBuilder::new(&header, &keywords).build();
    assert!(matches!(
        result,
        Err(MetadataError::MissingDefinition { .. })
    ));

    // A definition pointing at a keyword the header doesn't have.
    let mut keywords = swap_like_keywords();
    keywords
        .iter_mut()
        .find(|keyword| keyword.name == "date_beg")
        .unwrap()
        .verbose_name = "NO-SUCH".to_string();
    let result = MetadataBuilder::new(&header, &keywords).build();
    assert!(matches!(result, Err(MetadataError::MissingKeyword { .. })));
}

#[test]
fn test_value_conversions() {
    let mut header = swap_like_header();
    header.cards.push(Card {
        keyword: "LEVEL".to_string(),
        raw_value: "'1'".to_string(),
        value: CardValue::Text("1".to_string()),
        comment: String::new(),
    });
    header.cards.push(Card {
        keyword: "QUALITY".to_string(),
        raw_value: "0".to_string(),
        value: CardValue::Integer(0),
        comment: String::new(),
    });
    let mut keywords = swap_like_keywords();
    // The files write LEVEL as a string, the SVO wants an integer.
    keywords.push(keyword("level", "LEVEL", KeywordType::Integer));
    keywords.push(keyword("quality", "QUALITY", KeywordType::Boolean));
    // And TELESCOP can't be a real: skipped with a warning.
    keywords
        .iter_mut()
        .find(|keyword| keyword.name == "telescop")
        .unwrap()
        .keyword_type = KeywordType::Real;

    let record = MetadataBuilder::new(&header, &keywords).build().unwrap();
    assert_eq!(record["level"], json!(1));
    assert_eq!(record["quality"], json!(false));
    assert!(!record.contains_key("telescop"));
}

#[test]
fn test_data_location_from_local_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let local_file = temp_dir.path().join("swap_001.fits");
    std::fs::write(&local_file, vec![0u8; 2880]).unwrap();

    let mut builder = DataLocationBuilder::from_local_file(local_file.clone());
    builder.base_file_directory = Some(temp_dir.path().to_path_buf());
    builder.base_file_url = Some("http://proba2.oma.be/swap/data/bsd/".to_string());

    let data_location = builder.build("/api/svo/dataset/swap_level_1").unwrap();
    assert_eq!(data_location.dataset, "/api/svo/dataset/swap_level_1");
    assert_eq!(data_location.file_path, "swap_001.fits");
    assert_eq!(
        data_location.file_url,
        "http://proba2.oma.be/swap/data/bsd/swap_001.fits"
    );
    assert_eq!(data_location.file_size, 2880);
    assert_eq!(data_location.thumbnail_url, None);
    assert!(!data_location.offline);
}

#[test]
fn test_data_location_explicit_values_win() {
    let builder = DataLocationBuilder {
        file_url: Some("https://example.org/a.fits".to_string()),
        file_size: Some(123),
        file_path: Some("./sub/a.fits".to_string()),
        thumbnail_url: Some("https://example.org/a.png".to_string()),
        offline: true,
        ..Default::default()
    };
    let data_location = builder.build("/api/svo/dataset/test").unwrap();
    // The leading "./" is stripped: file_path must always be relative.
    assert_eq!(data_location.file_path, "sub/a.fits");
    assert_eq!(data_location.file_url, "https://example.org/a.fits");
    assert_eq!(data_location.file_size, 123);
    assert_eq!(
        data_location.thumbnail_url.as_deref(),
        Some("https://example.org/a.png")
    );
    assert!(data_location.offline);
}

#[test]
fn test_data_location_requires_a_url() {
    let builder = DataLocationBuilder {
        file_path: Some("a.fits".to_string()),
        file_size: Some(1),
        ..Default::default()
    };
    let result = builder.build("/api/svo/dataset/test");
    assert!(matches!(result, Err(DataLocationError::NoFileUrl)));
}

#[test]
fn test_data_location_serialises_like_the_api_expects() {
    let builder = DataLocationBuilder {
        file_url: Some("https://example.org/a.fits".to_string()),
        file_size: Some(1),
        file_path: Some("a.fits".to_string()),
        ..Default::default()
    };
    let data_location = builder.build("/api/svo/dataset/test").unwrap();
    let value = serde_json::to_value(data_location).unwrap();
    assert_eq!(
        value,
        json!({
            "dataset": "/api/svo/dataset/test",
            "file_url": "https://example.org/a.fits",
            "file_size": 1,
            "file_path": "a.fits",
            "thumbnail_url": Value::Null,
            "offline": false,
        })
    );
}
