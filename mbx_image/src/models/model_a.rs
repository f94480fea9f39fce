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

//! Model A: plain grayscale pixel difference at the resolution of the reference image

use image::{DynamicImage, GrayImage};
use mbx_common::debug;
use crate::{errors::Result, DiffMask, Score, gray_grid, resize_to, to_gray};
use super::{ModelOutput, ModelVariant, PIXEL_DIFF_THRESHOLD, visualize};

pub const DECISION_THRESHOLD: f64 = 60.0;

pub fn pixel_diff (live: &DynamicImage, reference: &DynamicImage)->Result<ModelOutput> {
    score_at_reference_size( &ModelVariant::PixelDiff, to_gray( live), &to_gray( reference))
}

/// gray difference with the live image resized to the reference size if they differ.
/// This is shared with the brightness adjusted model
pub(crate) fn score_at_reference_size (variant: &ModelVariant, live: GrayImage, reference: &GrayImage)->Result<ModelOutput> {
    let (w,h) = reference.dimensions();
    if live.dimensions() != (w,h) {
        debug!("resizing live image from {:?} to {:?}", live.dimensions(), (w,h));
    }
    let live = resize_to( &live, w, h);

    let mask = DiffMask::from_grids( &gray_grid( &live), &gray_grid( reference), PIXEL_DIFF_THRESHOLD)?;
    let raw = mask.percentage();

    let score = Score::new( variant, &mask, raw, raw, DECISION_THRESHOLD);
    let visualization = visualize( &live, &mask)?;

    Ok( ModelOutput { score, visualization } )
}
