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

use std::collections::BTreeMap;
use chrono::{DateTime,Utc};
use serde::{Serialize,Deserialize};
use mbx_common::is_none;
use crate::{curves::round2, mask::DiffMask, models::ModelVariant};

/// the per-signal percentages of a multi-signal score
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct AnalysisBreakdown {
    pub pixel_diff_percent: f64,
    pub edge_diff_percent: f64,
    pub color_diff_percent: f64,
}

/// the sensitivity curve a score was transformed with, e.g. `{"curve_type":"power","beta":2.0}`
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct CurveParameters {
    pub curve_type: String,
    #[serde(flatten)]
    pub parameters: BTreeMap<String,f64>,
}

impl CurveParameters {
    pub fn new (curve_type: &str, params: &[(&str,f64)])->Self {
        let parameters = params.iter().map( |(k,v)| (k.to_string(), *v)).collect();
        CurveParameters { curve_type: curve_type.to_string(), parameters }
    }

    pub fn get (&self, key: &str)->Option<f64> {
        self.parameters.get( key).copied()
    }
}

/// what a model run computes. This is a pure function of the two input images and the model variant.
/// Reported percentages are rounded to two decimals, `has_mail` is decided on the unrounded value
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct Score {
    pub model_name: String,
    #[serde(default)]
    pub variant: String,
    pub method: String,

    pub difference_percentage: f64,
    #[serde(default)]
    pub raw_difference_percentage: f64,
    pub total_pixels: u64,
    pub different_pixels: u64,
    pub has_mail: bool,
    pub threshold: f64,
    pub image_size: [u32;2],

    #[serde(default, skip_serializing_if="is_none")]
    pub weighted_difference_percentage: Option<f64>,
    #[serde(default, skip_serializing_if="is_none")]
    pub analysis_breakdown: Option<AnalysisBreakdown>,
    #[serde(default, skip_serializing_if="is_none")]
    pub curve_parameters: Option<CurveParameters>,

    #[serde(default, skip_serializing_if="is_none")]
    pub original_brightness: Option<f64>,
    #[serde(default, skip_serializing_if="is_none")]
    pub median_brightness: Option<f64>,
    #[serde(default, skip_serializing_if="is_none")]
    pub brightness_adjustment_factor: Option<f64>,

    #[serde(default)]
    pub visualization_saved: bool,
}

impl Score {
    pub fn new (variant: &ModelVariant, mask: &DiffMask, raw: f64, adjusted: f64, threshold: f64)->Self {
        let (w,h) = mask.dimensions();
        Score {
            model_name: variant.model().name().to_string(),
            variant: variant.name().to_string(),
            method: variant.method().to_string(),
            difference_percentage: round2( adjusted),
            raw_difference_percentage: round2( raw),
            total_pixels: mask.total() as u64,
            different_pixels: mask.count() as u64,
            has_mail: adjusted > threshold,
            threshold,
            image_size: [w as u32, h as u32],
            weighted_difference_percentage: None,
            analysis_breakdown: None,
            curve_parameters: None,
            original_brightness: None,
            median_brightness: None,
            brightness_adjustment_factor: None,
            visualization_saved: false,
        }
    }

    pub fn with_curve (mut self, curve: CurveParameters)->Self {
        self.curve_parameters = Some(curve);
        self
    }
}

/// a persisted model run: the score plus when it was computed and which images were compared
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct ComparisonResult {
    #[serde(flatten)]
    pub score: Score,

    pub timestamp: DateTime<Utc>,
    pub latest_image: String,
    pub median_image: String,
}

impl ComparisonResult {
    pub fn new (score: Score, timestamp: DateTime<Utc>, latest_image: impl ToString, median_image: impl ToString)->Self {
        ComparisonResult { score, timestamp, latest_image: latest_image.to_string(), median_image: median_image.to_string() }
    }

    pub fn has_mail (&self)->bool {
        self.score.has_mail
    }
}
