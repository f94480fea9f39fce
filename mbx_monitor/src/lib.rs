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

//! the mailbox monitor orchestrator: runs the scoring models on the stored live and reference
//! images, persists results and per model histories, rebuilds the reference image and manages
//! snapshot ingestion. All artifacts go through an [`ObjectStore`]

use std::sync::Arc;
use chrono::{DateTime,Utc};
use serde::{Serialize,Deserialize};
use mbx_common::{
    debug, info, warn, error,
    datetime::{iso_utc_string, minute_stamp, sort_newest_first},
    store::{metadata, ObjectInfo, ObjectStore, StoreError}
};
use mbx_image::{
    crop_top, decode_image, encode_jpeg, encode_rgb_jpeg, resize_to_width, run_model,
    ComparisonResult, MbxImageError, MedianBuilder, ModelId, ModelOutput
};

mod errors;
pub use errors::{Result,MonitorError};

pub mod config;
pub use config::{MonitorConfig, KeyConfig, StoreConfig, load_config, resolve_config, open_store};

pub mod history;
pub use history::{ComparisonHistory, RetentionPolicy, append_to_history, parse_history};

/// what a comparison request can produce if it doesn't fail
#[derive(Debug,Clone,PartialEq)]
pub enum CompareOutcome {
    Compared(ComparisonResult),
    /// the live or reference image is not (yet) available
    CannotCompare { missing: String },
}

#[derive(Debug,Clone,PartialEq)]
pub enum MedianOutcome {
    Created(MedianLog),
    NotCreated { reason: String },
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct SampleInfo {
    pub filename: String,
    pub size_bytes: u64,
    pub last_modified: DateTime<Utc>,
    pub processing_order: usize,
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct SkippedSample {
    pub filename: String,
    pub reason: String,
}

/// provenance record of a reference image
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct MedianLog {
    pub bucket_name: String,
    pub created_at: DateTime<Utc>,
    pub source_folder: String,
    pub median_image_key: String,
    pub median_image_size: usize,
    pub image_size: [u32;2],
    pub num_images_requested: usize,
    pub num_images_found: usize,
    pub num_images_processed: usize,
    pub files_used: Vec<SampleInfo>,
    #[serde(default)]
    pub skipped: Vec<SkippedSample>,
}

#[derive(Debug,Clone,PartialEq)]
pub struct IngestReport {
    pub key: String,
    pub cropped: bool,
    pub image_size: [u32;2],
}

#[derive(Debug,Clone,PartialEq)]
pub struct ArchiveReport {
    pub archive_key: String,
    pub thumbnail_key: String,
}

#[derive(Debug,Clone,PartialEq)]
pub struct ModelStatus {
    pub latest: Option<ComparisonResult>,
    pub history: ComparisonHistory,
}

pub struct Monitor {
    config: MonitorConfig,
    store: Arc<dyn ObjectStore>,
}

impl Monitor {
    pub fn new (config: MonitorConfig, store: Arc<dyn ObjectStore>)->Self {
        Monitor { config, store }
    }

    /// open the store that is configured in `config`
    pub fn from_config (config: MonitorConfig)->Result<Self> {
        config.validate()?;
        let store = open_store( &config.store)?;
        Ok( Monitor::new( config, store) )
    }

    pub fn config (&self)->&MonitorConfig { &self.config }
    pub fn store (&self)->&Arc<dyn ObjectStore> { &self.store }

    /* #region comparison ********************************************************************************/

    /// score the current live image against the reference image with the configured variant of the given
    /// model, then persist the updated history, the visualization and the latest result (in this order).
    /// Unknown model names fail before the store is accessed. If the history can't be committed nothing
    /// else is written
    pub fn compare (&self, model_name: &str, now: DateTime<Utc>)->Result<CompareOutcome> {
        let model = ModelId::parse( model_name)?;
        let variant = self.config.variant_for( model)?;
        let keys = &self.config.keys;

        let Some(live) = self.store.get_opt( &keys.live_image)? else {
            warn!("{model}: no live image {}", keys.live_image);
            return Ok( CompareOutcome::CannotCompare{ missing: keys.live_image.clone() })
        };
        let Some(reference) = self.store.get_opt( &keys.reference_image)? else {
            warn!("{model}: no reference image {}", keys.reference_image);
            return Ok( CompareOutcome::CannotCompare{ missing: keys.reference_image.clone() })
        };

        let live = decode_image( &live.data)?;
        let reference = decode_image( &reference.data)?;

        // read history before writing anything so that a malformed history leaves the store untouched
        let snapshot = self.load_history( model, now)?;

        let ModelOutput { mut score, visualization } = run_model( &variant, &live, &reference)?;
        let visualization = match encode_rgb_jpeg( &visualization, self.config.visualization_quality) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                error!("failed to encode {model} visualization: {e}");
                None
            }
        };
        score.visualization_saved = visualization.is_some();

        let mut result = ComparisonResult::new( score, now, &keys.live_image, &keys.reference_image);
        self.commit_history( model, snapshot, &result, now)?;

        if let Some(bytes) = visualization {
            result.score.visualization_saved = self.save_visualization( model, bytes, &result);
        }
        self.save_latest_result( model, &result)?;

        info!("{model} ({}): difference {}% has_mail={}", variant.name(), result.score.difference_percentage, result.score.has_mail);
        Ok( CompareOutcome::Compared( result) )
    }

    /// compare all models. Failures of single models do not prevent the others from running
    pub fn compare_all (&self, now: DateTime<Utc>)->Vec<(ModelId,Result<CompareOutcome>)> {
        ModelId::all().into_iter().map( |model| (model, self.compare( model.name(), now))).collect()
    }

    /// store the visualization. Failures are logged but do not fail the comparison
    fn save_visualization (&self, model: ModelId, bytes: Vec<u8>, result: &ComparisonResult)->bool {
        let key = self.config.keys.visualization_key( model);
        let meta = metadata( &[
            ("created_at", iso_utc_string( &result.timestamp)),
            ("model", model.name().to_string()),
            ("different_pixels", result.score.different_pixels.to_string()),
            ("total_pixels", result.score.total_pixels.to_string()),
        ]);

        match self.store.put( &key, bytes, meta) {
            Ok(_) => {
                debug!("saved visualization {key}");
                true
            }
            Err(e) => {
                error!("failed to save visualization {key}: {e}");
                false
            }
        }
    }

    fn save_latest_result (&self, model: ModelId, result: &ComparisonResult)->Result<ObjectInfo> {
        let key = self.config.keys.latest_result_key( model);
        let meta = metadata( &[
            ("created_at", iso_utc_string( &result.timestamp)),
            ("difference_percentage", result.score.difference_percentage.to_string()),
            ("model_name", model.name().to_string()),
        ]);

        let info = self.store.put( &key, serde_json::to_vec_pretty( result)?, meta)?;
        info!("saved latest {model} result to {key}");
        Ok( info )
    }

    /* #endregion comparison */

    /* #region history ***********************************************************************************/

    /// the stored history and the version it was read at (None if there is no history yet)
    fn load_history (&self, model: ModelId, now: DateTime<Utc>)->Result<(ComparisonHistory,Option<String>)> {
        match self.store.get_opt( &self.config.keys.history_key( model))? {
            Some(obj) => Ok( (parse_history( model, &obj.data, now)?, Some(obj.info.version)) ),
            None => Ok( (ComparisonHistory::new( model, now), None) )
        }
    }

    /// optimistic update of the model history: if somebody else wrote the history after we read it
    /// we re-read and re-apply our result
    fn commit_history (&self, model: ModelId, snapshot: (ComparisonHistory,Option<String>), result: &ComparisonResult, now: DateTime<Utc>)->Result<ComparisonHistory> {
        let key = self.config.keys.history_key( model);
        let policy = self.config.retention_for( model);
        let max_attempts = self.config.max_write_attempts.max(1);
        let (mut history, mut version) = snapshot;

        for attempt in 1..=max_attempts {
            let updated = append_to_history( history, result.clone(), &policy, &now);
            let meta = metadata( &[
                ("last_updated", iso_utc_string( &now)),
                ("total_comparisons", updated.total_comparisons.to_string()),
                ("model_name", model.name().to_string()),
            ]);

            match self.store.put_if_version( &key, serde_json::to_vec_pretty( &updated)?, meta, version.as_deref()) {
                Ok(_) => {
                    info!("saved {model} history with {} entries to {key}", updated.total_comparisons);
                    return Ok( updated )
                }
                Err(StoreError::Conflict(msg)) => {
                    warn!("{model} history update conflict (attempt {attempt}/{max_attempts}): {msg}");
                    (history, version) = self.load_history( model, now)?;
                }
                Err(e) => return Err( e.into())
            }
        }

        Err( MonitorError::WriteConflict( key, max_attempts))
    }

    /// latest result and history of a model. Missing artifacts are reported as None / empty history
    pub fn status (&self, model_name: &str, now: DateTime<Utc>)->Result<ModelStatus> {
        let model = ModelId::parse( model_name)?;

        let latest = match self.store.get_opt( &self.config.keys.latest_result_key( model))? {
            Some(obj) => Some( serde_json::from_slice::<ComparisonResult>( &obj.data)?),
            None => None
        };
        let (history, _) = self.load_history( model, now)?;

        Ok( ModelStatus { latest, history } )
    }

    /// replace the history of a model with an edited version, which can be either a plain JSON array
    /// of results or an object with a "comparisons" array
    pub fn replace_history (&self, model_name: &str, json: &str, now: DateTime<Utc>)->Result<ComparisonHistory> {
        let model = ModelId::parse( model_name)?;
        let parsed = parse_history( model, json.as_bytes(), now)?;
        let history = ComparisonHistory::with_comparisons( model, parsed.comparisons, now);

        let key = self.config.keys.history_key( model);
        let meta = metadata( &[
            ("last_modified", iso_utc_string( &now)),
            ("model", model.name().to_string()),
        ]);
        self.store.put( &key, serde_json::to_vec_pretty( &history)?, meta)?;
        info!("replaced {model} history ({} entries)", history.total_comparisons);

        Ok( history )
    }

    /* #endregion history */

    /* #region reference image ***************************************************************************/

    /// the sample images we would use for a reference image, newest first (ties ordered by key)
    pub fn median_candidates (&self)->Result<Vec<ObjectInfo>> {
        let mut samples: Vec<ObjectInfo> = self.store.list( &self.config.keys.sample_prefix)?.into_iter()
            .filter( |i| i.key.ends_with(".jpg") && !i.key.ends_with("-thumbnail.jpg"))
            .collect();
        samples.sort_by( |a,b| a.key.cmp( &b.key));
        sort_newest_first( &mut samples); // stable, keeps key order for equal dates
        Ok( samples )
    }

    /// recompute the reference image from the newest samples and replace the stored one.
    /// Not having enough usable samples is a reported outcome, not an error
    pub fn rebuild_median (&self, now: DateTime<Utc>)->Result<MedianOutcome> {
        let cfg = &self.config;
        let keys = &cfg.keys;

        let mut samples = self.median_candidates()?;
        if samples.is_empty() {
            warn!("no sample images found in {}", keys.sample_prefix);
            return Ok( MedianOutcome::NotCreated{ reason: format!("no sample images in {}", keys.sample_prefix) })
        }
        samples.truncate( cfg.median_samples);
        let num_found = samples.len();
        info!("building reference image from {num_found} samples");

        let mut builder = MedianBuilder::new( cfg.reference_width, cfg.reference_height);
        let mut files_used = Vec::with_capacity( num_found);

        for (i,info) in samples.iter().enumerate() {
            match self.store.get( &info.key) {
                Ok(obj) => {
                    if builder.add_encoded( &info.key, &obj.data) {
                        files_used.push( SampleInfo {
                            filename: info.key.clone(),
                            size_bytes: info.size,
                            last_modified: info.last_modified,
                            processing_order: i + 1
                        });
                    }
                }
                Err(e) => {
                    warn!("skipping median sample {}: {e}", info.key);
                    builder.skip( &info.key, e);
                }
            }
        }

        let img = match builder.build() {
            Ok(img) => img,
            Err(MbxImageError::InsufficientSamples(n,min)) => {
                warn!("not enough usable samples for reference image: {n} < {min}");
                return Ok( MedianOutcome::NotCreated{ reason: format!("only {n} usable samples, need at least {min}") })
            }
            Err(e) => return Err( e.into())
        };

        let bytes = encode_rgb_jpeg( &img, cfg.reference_quality)?;
        let median_image_size = bytes.len();
        let source_folder = keys.sample_prefix.trim_end_matches('/').to_string();

        self.store.put( &keys.reference_image, bytes, metadata( &[
            ("created_at", iso_utc_string( &now)),
            ("source_images", builder.len().to_string()),
            ("source_folder", source_folder.clone()),
        ]))?;
        info!("saved reference image {} ({} bytes)", keys.reference_image, median_image_size);

        let log = MedianLog {
            bucket_name: self.store.name(),
            created_at: now,
            source_folder,
            median_image_key: keys.reference_image.clone(),
            median_image_size,
            image_size: [img.width(), img.height()],
            num_images_requested: cfg.median_samples,
            num_images_found: num_found,
            num_images_processed: builder.len(),
            files_used,
            skipped: builder.skipped().iter().map( |(f,r)| SkippedSample{ filename: f.clone(), reason: r.clone() }).collect(),
        };

        self.store.put( &keys.median_log, serde_json::to_vec_pretty( &log)?, metadata( &[
            ("created_at", iso_utc_string( &now)),
            ("log_type", "median_image_creation".to_string()),
        ]))?;

        Ok( MedianOutcome::Created( log) )
    }

    pub fn read_median_log (&self)->Result<Option<MedianLog>> {
        match self.store.get_opt( &self.config.keys.median_log)? {
            Some(obj) => Ok( Some( serde_json::from_slice( &obj.data)?) ),
            None => Ok( None )
        }
    }

    /* #endregion reference image */

    /* #region ingestion *********************************************************************************/

    /// store a new camera snapshot as live image, with the top rows (timestamp overlay) removed.
    /// Images that are too small to be cropped are stored as they are
    pub fn ingest (&self, bytes: &[u8], now: DateTime<Utc>)->Result<IngestReport> {
        let img = decode_image( bytes)?;

        let (img, cropped) = match crop_top( &img, self.config.ingest_top_crop) {
            Ok(cropped) => (cropped, true),
            Err(e) if e.is_dimension_error() => {
                warn!("not cropping snapshot: {e}");
                (img, false)
            }
            Err(e) => return Err( e.into())
        };

        let key = self.config.keys.live_image.clone();
        let data = encode_jpeg( &img, self.config.live_quality)?;
        self.store.put( &key, data, metadata( &[
            ("uploaded_at", iso_utc_string( &now)),
            ("cropped", cropped.to_string()),
        ]))?;
        info!("stored snapshot as {key} ({}x{}, cropped={cropped})", img.width(), img.height());

        Ok( IngestReport { key, cropped, image_size: [img.width(), img.height()] } )
    }

    /// copy the live image into the archive under a minute resolution time stamp name and create
    /// a thumbnail for it
    pub fn archive_latest (&self, now: DateTime<Utc>)->Result<ArchiveReport> {
        let keys = &self.config.keys;
        let stamp = minute_stamp( &now);
        let archive_key = keys.archive_key( &stamp);
        let thumbnail_key = keys.thumbnail_key( &stamp);

        let live = self.store.get( &keys.live_image)?;
        let img = decode_image( &live.data)?;

        self.store.put( &archive_key, live.data, live.info.metadata)?;

        let thumbnail = resize_to_width( &img, self.config.thumbnail_width);
        self.store.put( &thumbnail_key, encode_jpeg( &thumbnail, self.config.thumbnail_quality)?, metadata( &[
            ("created_at", iso_utc_string( &now)),
            ("source", archive_key.clone()),
        ]))?;
        info!("archived {} as {archive_key} with thumbnail {thumbnail_key}", keys.live_image);

        Ok( ArchiveReport { archive_key, thumbnail_key } )
    }

    /* #endregion ingestion */
}
