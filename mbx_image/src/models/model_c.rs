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

//! Model C: grayscale difference at 1024x576 with two historical versions
//!  - v1 weights columns with a super-Gaussian kernel that emphasizes the horizontal center and
//!    flattens the result with a piecewise linear curve. An optional crop rectangle (in 1024x576
//!    coordinates) is applied before a final resize to 800x600
//!  - v2 amplifies small differences with an inverted power curve

use image::{DynamicImage, GrayImage};
use crate::{
    errors::Result, CropRect, DiffMask, Score, CurveParameters, crop, gray_grid, resize_to, to_gray,
    curves::{inverted_power_curve, DEFAULT_PIECEWISE, DEFAULT_SUPER_GAUSSIAN, round2},
    REFERENCE_WIDTH, REFERENCE_HEIGHT
};
use super::{ModelOutput, ModelVariant, PIXEL_DIFF_THRESHOLD, visualize};

pub const CROPPED_WIDTH: u32 = 800;
pub const CROPPED_HEIGHT: u32 = 600;

pub const GAUSSIAN_DECISION_THRESHOLD: f64 = 50.0;

pub const INVERTED_ALPHA: f64 = 2.5;
pub const INVERTED_DECISION_THRESHOLD: f64 = 50.0;

fn preprocess (img: &DynamicImage, rect: Option<&CropRect>)->Result<GrayImage> {
    let gray = resize_to( &to_gray( img), REFERENCE_WIDTH, REFERENCE_HEIGHT);
    match rect {
        Some(rect) => Ok( resize_to( &crop( &gray, rect)?, CROPPED_WIDTH, CROPPED_HEIGHT) ),
        None => Ok( gray )
    }
}

pub fn gaussian_weighted (live: &DynamicImage, reference: &DynamicImage, rect: Option<&CropRect>)->Result<ModelOutput> {
    let variant = ModelVariant::GaussianWeighted{ crop: rect.cloned() };
    let live = preprocess( live, rect)?;
    let reference = preprocess( reference, rect)?;

    let mask = DiffMask::from_grids( &gray_grid( &live), &gray_grid( &reference), PIXEL_DIFF_THRESHOLD)?;
    let raw = mask.percentage();

    let (w,_) = mask.dimensions();
    let kernel = DEFAULT_SUPER_GAUSSIAN;
    let weighted = mask.weighted_percentage( &kernel.weights( w));

    let curve = DEFAULT_PIECEWISE;
    let adjusted = curve.apply( weighted);

    let mut score = Score::new( &variant, &mask, raw, adjusted, GAUSSIAN_DECISION_THRESHOLD)
        .with_curve( CurveParameters::new( "super_gaussian_piecewise", &[
            ("boost", kernel.boost),
            ("sigma_factor", kernel.sigma_factor),
            ("power", kernel.power),
            ("knee", curve.knee),
            ("low_gain", curve.low_gain),
            ("knee_value", curve.knee_value),
            ("high_slope", curve.high_slope),
        ]));
    score.weighted_difference_percentage = Some( round2( weighted));
    let visualization = visualize( &live, &mask)?;

    Ok( ModelOutput { score, visualization } )
}

pub fn inverted_power (live: &DynamicImage, reference: &DynamicImage)->Result<ModelOutput> {
    let variant = ModelVariant::InvertedPower;
    let live = preprocess( live, None)?;
    let reference = preprocess( reference, None)?;

    let mask = DiffMask::from_grids( &gray_grid( &live), &gray_grid( &reference), PIXEL_DIFF_THRESHOLD)?;
    let raw = mask.percentage();
    let adjusted = inverted_power_curve( raw, INVERTED_ALPHA);

    let score = Score::new( &variant, &mask, raw, adjusted, INVERTED_DECISION_THRESHOLD)
        .with_curve( CurveParameters::new( "inverted_power", &[("alpha", INVERTED_ALPHA)]));
    let visualization = visualize( &live, &mask)?;

    Ok( ModelOutput { score, visualization } )
}
