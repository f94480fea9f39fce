/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::path::PathBuf;
use chrono::{TimeZone, Utc};
use image::{DynamicImage, GrayImage, Luma};
use mbx_image::{encode_jpeg, ModelId, ModelVariant};
use mbx_monitor::{
    load_config, resolve_config, CompareOutcome, KeyConfig, MedianOutcome, Monitor, MonitorConfig, MonitorError,
    RetentionPolicy, StoreConfig
};

// run with "cargo test test_xx -- --nocapture"

fn sample_config_path ()->PathBuf {
    PathBuf::from( env!("CARGO_MANIFEST_DIR")).join("configs").join("mbx_monitor.ron")
}

#[test]
fn test_default_keys () {
    let keys = KeyConfig::default();
    assert_eq!( keys.latest_result_key( ModelId::A), "status/modela.json");
    assert_eq!( keys.history_key( ModelId::D), "status/statistics-modeld.json");
    assert_eq!( keys.visualization_key( ModelId::B), "status/modelB.jpg");
    assert_eq!( keys.archive_key( "2025-03-10-12-05"), "usortert/2025-03-10-12-05.jpg");
    assert_eq!( keys.thumbnail_key( "2025-03-10-12-05"), "thumbnails/2025-03-10-12-05-thumbnail.jpg");
}

#[test]
fn test_default_config () {
    let config = MonitorConfig::default();
    assert!( config.validate().is_ok());
    assert_eq!( config.median_samples, 189);
    assert_eq!( config.retention_for( ModelId::A), RetentionPolicy::MaxCount(100));
    assert_eq!( config.retention_for( ModelId::D), RetentionPolicy::MaxAge(60));
    assert_eq!( config.variant_for( ModelId::B).unwrap(), ModelVariant::MultiSignal);
    assert_eq!( config.variant_for( ModelId::C).unwrap(), ModelVariant::InvertedPower);
}

#[test]
fn test_load_sample_config () {
    let config = load_config( sample_config_path()).unwrap();
    println!("{config:#?}");

    assert_eq!( config.store, StoreConfig::Fs{ root: PathBuf::from("data") });
    assert_eq!( config.keys, KeyConfig::default());
    assert_eq!( config.ingest_top_crop, 35);
    assert_eq!( config.reference_quality, 85); // not in file
    assert_eq!( config.retention.get( &ModelId::D), Some(&RetentionPolicy::MaxAge(60)));
    assert_eq!( config.variant_for( ModelId::B).unwrap(), ModelVariant::MultiSignal);
}

#[test]
fn test_parse_config_variants () {
    let config: MonitorConfig = ron::from_str( r#"(
        store: Memory,
        variants: { C: GaussianWeighted( crop: Some(( left: 10, top: 0, width: 900, height: 576 )) ) },
        retention: { B: MaxCount(5) },
    )"#).unwrap();

    assert!( matches!( config.variant_for( ModelId::C).unwrap(), ModelVariant::GaussianWeighted{ crop: Some(_) }));
    assert_eq!( config.retention_for( ModelId::B), RetentionPolicy::MaxCount(5));
    assert_eq!( config.retention_for( ModelId::C), RetentionPolicy::MaxCount(100));
}

#[test]
fn test_invalid_config () {
    let mut config = MonitorConfig::default();
    config.variants.insert( ModelId::A, ModelVariant::PowerCurve);
    assert!( matches!( config.validate(), Err(MonitorError::ConfigError(_))));
    assert!( Monitor::from_config( config).is_err());

    let mut config = MonitorConfig::default();
    config.median_samples = 2;
    assert!( matches!( config.validate(), Err(MonitorError::ConfigError(_))));

    let config = MonitorConfig { store: StoreConfig::S3{ bucket: "mailbox".into(), region: "eu-north-1".into() }, ..MonitorConfig::default() };
    if cfg!(not(feature="s3")) {
        assert!( matches!( Monitor::from_config( config), Err(MonitorError::ConfigError(_))));
    }
}

#[test]
fn test_store_root_override () {
    let config = resolve_config( Some( sample_config_path().to_str().unwrap()), Some("/tmp/mbx")).unwrap();
    assert_eq!( config.store, StoreConfig::Fs{ root: PathBuf::from("/tmp/mbx") });

    let config = resolve_config( None, None).unwrap();
    assert_eq!( config.store, StoreConfig::Memory);
}

#[test]
fn test_filesystem_store_round_trip () {
    let dir = tempfile::tempdir().unwrap();
    let config = MonitorConfig { store: StoreConfig::Fs{ root: dir.path().to_path_buf() }, ..MonitorConfig::default() };
    let monitor = Monitor::from_config( config).unwrap();
    let now = Utc.with_ymd_and_hms( 2025, 6, 1, 14, 5, 0).unwrap();

    for (i,v) in [100u8, 110, 120].iter().enumerate() {
        let img = DynamicImage::ImageLuma8( GrayImage::from_pixel( 64, 71, Luma([*v])));
        let key = format!("{}sample-{i}.jpg", monitor.config().keys.sample_prefix);
        monitor.store().put( &key, encode_jpeg( &img, 95).unwrap(), Default::default()).unwrap();
    }
    assert!( matches!( monitor.rebuild_median( now).unwrap(), MedianOutcome::Created(_)));

    let snapshot = DynamicImage::ImageLuma8( GrayImage::from_pixel( 64, 71, Luma([110])));
    monitor.ingest( &encode_jpeg( &snapshot, 95).unwrap(), now).unwrap();

    match monitor.compare( "ModelD", now).unwrap() {
        CompareOutcome::Compared(result) => assert!( !result.has_mail()),
        other => panic!("unexpected {other:?}")
    }

    assert!( dir.path().join("status").join("statistics-modeld.json").is_file());
    assert!( dir.path().join("median-image").join("median.jpg").is_file());
    assert_eq!( monitor.status( "D", now).unwrap().history.total_comparisons, 1);
}
