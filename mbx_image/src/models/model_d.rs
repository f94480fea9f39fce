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

//! Model D: Model A on a live image whose brightness was scaled to the mean brightness of the reference.
//! This compensates for global lighting changes between day times

use image::DynamicImage;
use mbx_common::debug;
use crate::{errors::Result, adjust_brightness, mean_luminance, to_gray, curves::round2};
use super::{ModelOutput, ModelVariant, model_a::score_at_reference_size};

pub fn brightness_adjusted (live: &DynamicImage, reference: &DynamicImage)->Result<ModelOutput> {
    let live_brightness = mean_luminance( live);
    let ref_brightness = mean_luminance( reference);

    let (adjusted, factor) = adjust_brightness( live, ref_brightness);
    debug!("brightness live={live_brightness:.2} reference={ref_brightness:.2} factor={factor:.3}");

    let adjusted = to_gray( &DynamicImage::ImageRgb8( adjusted));
    let mut output = score_at_reference_size( &ModelVariant::BrightnessAdjusted, adjusted, &to_gray( reference))?;

    output.score.original_brightness = Some( round2( live_brightness));
    output.score.median_brightness = Some( round2( ref_brightness));
    output.score.brightness_adjustment_factor = Some( round2( factor));

    Ok( output )
}
