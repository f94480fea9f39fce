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

use std::{collections::BTreeMap, path::{Path,PathBuf}, sync::Arc};
use serde::{Serialize,Deserialize};
use mbx_common::{fs::filepath_contents, store::{ObjectStore,MemoryStore,FsStore}};
use mbx_image::{ModelId, ModelVariant, REFERENCE_WIDTH, REFERENCE_HEIGHT};
use crate::{errors::{Result,MonitorError}, history::RetentionPolicy};

/// where persisted artifacts live
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub enum StoreConfig {
    /// keys are files below the given root directory
    Fs { root: PathBuf },
    /// in-process only (tests and dry runs)
    Memory,
    /// AWS S3 bucket. Requires the "s3" feature
    S3 { bucket: String, region: String },
}

/// the storage key layout. Prefixes are used as given, i.e. they should end in '/' if they denote folders
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    pub live_image: String,
    pub reference_image: String,
    pub median_log: String,
    pub sample_prefix: String,
    pub status_prefix: String,
    pub archive_prefix: String,
    pub thumbnail_prefix: String,
}

impl Default for KeyConfig {
    fn default()->Self {
        KeyConfig {
            live_image: "uploads/latest.jpg".into(),
            reference_image: "median-image/median.jpg".into(),
            median_log: "median-image/log.json".into(),
            sample_prefix: "ai-training-data/without-mail/".into(),
            status_prefix: "status".into(),
            archive_prefix: "usortert/".into(),
            thumbnail_prefix: "thumbnails/".into(),
        }
    }
}

/// join a folder-like prefix and a name with exactly one '/' between them
pub fn join_key (prefix: &str, name: &str)->String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() { name.to_string() } else { format!("{prefix}/{name}") }
}

impl KeyConfig {
    /// e.g. "status/modela.json"
    pub fn latest_result_key (&self, model: ModelId)->String {
        join_key( &self.status_prefix, &format!("model{}.json", model.letter().to_ascii_lowercase()))
    }

    /// e.g. "status/statistics-modela.json"
    pub fn history_key (&self, model: ModelId)->String {
        join_key( &self.status_prefix, &format!("statistics-model{}.json", model.letter().to_ascii_lowercase()))
    }

    /// e.g. "status/modelA.jpg"
    pub fn visualization_key (&self, model: ModelId)->String {
        join_key( &self.status_prefix, &format!("model{}.jpg", model.letter()))
    }

    pub fn archive_key (&self, stamp: &str)->String {
        join_key( &self.archive_prefix, &format!("{stamp}.jpg"))
    }

    pub fn thumbnail_key (&self, stamp: &str)->String {
        join_key( &self.thumbnail_prefix, &format!("{stamp}-thumbnail.jpg"))
    }
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub store: StoreConfig,
    pub keys: KeyConfig,

    /// max number of newest samples the reference image is computed from
    pub median_samples: usize,
    pub reference_width: u32,
    pub reference_height: u32,

    /// rows removed from the top of ingested snapshots (camera timestamp overlay)
    pub ingest_top_crop: u32,
    pub thumbnail_width: u32,

    pub live_quality: u8,
    pub reference_quality: u8,
    pub visualization_quality: u8,
    pub thumbnail_quality: u8,

    /// per model overrides, models without entry use their defaults
    pub retention: BTreeMap<ModelId,RetentionPolicy>,
    pub variants: BTreeMap<ModelId,ModelVariant>,

    /// how often we try a conditional history update before giving up
    pub max_write_attempts: u32,
}

impl Default for MonitorConfig {
    fn default()->Self {
        MonitorConfig {
            store: StoreConfig::Memory,
            keys: KeyConfig::default(),
            median_samples: 189,
            reference_width: REFERENCE_WIDTH,
            reference_height: REFERENCE_HEIGHT,
            ingest_top_crop: 35,
            thumbnail_width: 128,
            live_quality: 95,
            reference_quality: 85,
            visualization_quality: 95,
            thumbnail_quality: 85,
            retention: BTreeMap::new(),
            variants: BTreeMap::new(),
            max_write_attempts: 5,
        }
    }
}

impl MonitorConfig {
    pub fn retention_for (&self, model: ModelId)->RetentionPolicy {
        self.retention.get( &model).copied().unwrap_or_else( || RetentionPolicy::default_for( model))
    }

    pub fn variant_for (&self, model: ModelId)->Result<ModelVariant> {
        match self.variants.get( &model) {
            Some(v) if v.model() == model => Ok( v.clone() ),
            Some(v) => Err( MonitorError::ConfigError( format!("variant {v} configured for {model}"))),
            None => Ok( ModelVariant::default_for( model) )
        }
    }

    /// check everything we can check without accessing the store
    pub fn validate (&self)->Result<()> {
        for model in ModelId::all() {
            self.variant_for( model)?;
        }
        if self.median_samples < mbx_image::MIN_MEDIAN_SAMPLES {
            return Err( MonitorError::ConfigError( format!("median_samples has to be at least {}", mbx_image::MIN_MEDIAN_SAMPLES)))
        }
        if self.reference_width == 0 || self.reference_height == 0 || self.thumbnail_width == 0 {
            return Err( MonitorError::ConfigError( "image dimensions have to be positive".into()))
        }
        Ok(())
    }
}

pub fn load_config<P> (path: P)->Result<MonitorConfig> where P: AsRef<Path> {
    let data = filepath_contents( &path)?;
    let config: MonitorConfig = ron::de::from_bytes( data.as_slice())?;
    config.validate()?;
    Ok( config )
}

/// the config used by command line tools: an optional RON config file with an optional override
/// of the store root directory
pub fn resolve_config (path: Option<&str>, store_root: Option<&str>)->Result<MonitorConfig> {
    let mut config = match path {
        Some(path) => load_config( path)?,
        None => MonitorConfig::default()
    };
    if let Some(root) = store_root {
        config.store = StoreConfig::Fs { root: PathBuf::from( root) };
    }
    Ok( config )
}

pub fn open_store (config: &StoreConfig)->Result<Arc<dyn ObjectStore>> {
    match config {
        StoreConfig::Memory => Ok( Arc::new( MemoryStore::new()) ),
        StoreConfig::Fs{root} => Ok( Arc::new( FsStore::new( root)) ),

        #[cfg(feature="s3")]
        StoreConfig::S3{bucket,region} => Ok( Arc::new( mbx_common::s3::S3Store::new( bucket, region)?) ),

        #[cfg(not(feature="s3"))]
        StoreConfig::S3{bucket,..} => Err( MonitorError::ConfigError( format!("cannot open S3 bucket {bucket}, not built with feature 's3'")))
    }
}
