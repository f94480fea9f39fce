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

//! Model B: grayscale difference at 1024x576 with two historical versions
//!  - v1 suppresses small differences with a power curve
//!  - v2 blends pixel, edge and color channel differences

use image::{DynamicImage, GrayImage};
use crate::{
    errors::Result, DiffMask, Score, AnalysisBreakdown, CurveParameters, find_edges, gray_grid, resize_to, to_gray, to_rgb,
    curves::{clamp_pct, power_curve as apply_power_curve, round2}, REFERENCE_WIDTH, REFERENCE_HEIGHT
};
use super::{ModelOutput, ModelVariant, PIXEL_DIFF_THRESHOLD, visualize};

pub const POWER_BETA: f64 = 2.0;
pub const POWER_DECISION_THRESHOLD: f64 = 25.0;

pub const PIXEL_WEIGHT: f64 = 0.5;
pub const EDGE_WEIGHT: f64 = 0.3;
pub const COLOR_WEIGHT: f64 = 0.2;
pub const MULTI_DECISION_THRESHOLD: f64 = 10.0;

fn gray_at_reference_res (img: &DynamicImage)->GrayImage {
    resize_to( &to_gray( img), REFERENCE_WIDTH, REFERENCE_HEIGHT)
}

pub fn power_curve (live: &DynamicImage, reference: &DynamicImage)->Result<ModelOutput> {
    let variant = ModelVariant::PowerCurve;
    let live = gray_at_reference_res( live);
    let reference = gray_at_reference_res( reference);

    let mask = DiffMask::from_grids( &gray_grid( &live), &gray_grid( &reference), PIXEL_DIFF_THRESHOLD)?;
    let raw = mask.percentage();
    let adjusted = apply_power_curve( raw, POWER_BETA);

    let score = Score::new( &variant, &mask, raw, adjusted, POWER_DECISION_THRESHOLD)
        .with_curve( CurveParameters::new( "power", &[("beta", POWER_BETA)]));
    let visualization = visualize( &live, &mask)?;

    Ok( ModelOutput { score, visualization } )
}

pub fn multi_signal (live: &DynamicImage, reference: &DynamicImage)->Result<ModelOutput> {
    let variant = ModelVariant::MultiSignal;
    let live_gray = gray_at_reference_res( live);
    let ref_gray = gray_at_reference_res( reference);

    let pixel_mask = DiffMask::from_grids( &gray_grid( &live_gray), &gray_grid( &ref_gray), PIXEL_DIFF_THRESHOLD)?;
    let pixel_pct = pixel_mask.percentage();

    let edge_mask = DiffMask::from_gray_diff( &find_edges( &live_gray), &find_edges( &ref_gray), PIXEL_DIFF_THRESHOLD)?;
    let edge_pct = edge_mask.percentage();

    let live_rgb = resize_to( &to_rgb( live), REFERENCE_WIDTH, REFERENCE_HEIGHT);
    let ref_rgb = resize_to( &to_rgb( reference), REFERENCE_WIDTH, REFERENCE_HEIGHT);
    let color_mask = DiffMask::from_rgb_diff( &live_rgb, &ref_rgb, PIXEL_DIFF_THRESHOLD)?;
    let color_pct = color_mask.percentage();

    let adjusted = clamp_pct( PIXEL_WEIGHT * pixel_pct + EDGE_WEIGHT * edge_pct + COLOR_WEIGHT * color_pct);

    let mut score = Score::new( &variant, &pixel_mask, pixel_pct, adjusted, MULTI_DECISION_THRESHOLD);
    score.analysis_breakdown = Some( AnalysisBreakdown {
        pixel_diff_percent: round2( pixel_pct),
        edge_diff_percent: round2( edge_pct),
        color_diff_percent: round2( color_pct),
    });
    let visualization = visualize( &live_gray, &pixel_mask)?;

    Ok( ModelOutput { score, visualization } )
}
