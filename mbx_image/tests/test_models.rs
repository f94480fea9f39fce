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

use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use mbx_image::{run_model, models::{self, ModelId, ModelVariant}, CropRect, MbxImageError, MARKER_COLOR};

// run with "cargo test test_xx -- --nocapture"

fn solid_gray (w: u32, h: u32, v: u8)->DynamicImage {
    DynamicImage::ImageLuma8( GrayImage::from_pixel( w, h, Luma([v])))
}

fn gradient (w: u32, h: u32)->DynamicImage {
    DynamicImage::ImageRgb8( ImageBuffer::from_fn( w, h, |x,y| Rgb([ (x*4 % 256) as u8, (y*5 % 256) as u8, ((x+y) % 256) as u8 ])))
}

fn all_variants ()->Vec<ModelVariant> {
    ModelId::all().into_iter().flat_map( |m| ModelVariant::variants_of(m)).collect()
}

#[test]
fn test_identical_images () {
    let img = gradient( 64, 36);

    for variant in all_variants() {
        let out = run_model( &variant, &img, &img).unwrap();
        println!("{variant}: {:?}", out.score);

        assert_eq!( out.score.raw_difference_percentage, 0.0, "{variant}");
        assert_eq!( out.score.difference_percentage, 0.0, "{variant}");
        assert_eq!( out.score.different_pixels, 0);
        assert!( !out.score.has_mail, "{variant}");
    }
}

#[test]
fn test_maximally_different_images () {
    // live is black so that brightness normalization keeps it unchanged (factor 1.0)
    let live = solid_gray( 64, 36, 0);
    let reference = solid_gray( 64, 36, 255);

    for variant in all_variants() {
        let out = run_model( &variant, &live, &reference).unwrap();
        println!("{variant}: raw={} adjusted={}", out.score.raw_difference_percentage, out.score.difference_percentage);

        assert_eq!( out.score.raw_difference_percentage, 100.0, "{variant}");
        assert!( out.score.difference_percentage <= 100.0, "{variant}");
        assert!( out.score.difference_percentage >= 0.0, "{variant}");
    }

    let out = run_model( &ModelVariant::PixelDiff, &live, &reference).unwrap();
    assert_eq!( out.score.difference_percentage, 100.0);
    assert!( out.score.has_mail);
    assert_eq!( out.score.image_size, [64,36]);
    assert_eq!( out.score.total_pixels, 64*36);
}

#[test]
fn test_idempotence () {
    let live = gradient( 80, 45);
    let reference = solid_gray( 80, 45, 90);

    for variant in all_variants() {
        let a = run_model( &variant, &live, &reference).unwrap();
        let b = run_model( &variant, &live, &reference).unwrap();
        assert_eq!( a.score, b.score, "{variant}");
        assert_eq!( a.visualization, b.visualization, "{variant}");
    }
}

#[test]
fn test_monotonic_raw_percentage () {
    let (w,h) = (40u32, 20u32);
    let reference = solid_gray( w, h, 0);
    let mut last = -1.0;

    for k in 0..=w {
        let live = DynamicImage::ImageLuma8( GrayImage::from_fn( w, h, |x,_| Luma([ if x < k { 200 } else { 0 } ])));
        let out = run_model( &ModelVariant::PixelDiff, &live, &reference).unwrap();
        let raw = out.score.raw_difference_percentage;
        assert!( raw >= last, "raw percentage decreased at k={k}: {raw} < {last}");
        assert_eq!( out.score.different_pixels, (k*h) as u64);
        last = raw;
    }
    assert_eq!( last, 100.0);
}

#[test]
fn test_model_a_resizes_live_to_reference () {
    let live = solid_gray( 200, 100, 50);
    let reference = solid_gray( 100, 50, 50);

    let out = run_model( &ModelVariant::PixelDiff, &live, &reference).unwrap();
    assert_eq!( out.score.image_size, [100,50]);
    assert_eq!( out.visualization.dimensions(), (100,50));
    assert_eq!( out.score.method, "pixel_difference_grayscale");
    assert_eq!( out.score.model_name, "ModelA");
}

#[test]
fn test_visualization_marks_different_pixels () {
    let reference = solid_gray( 20, 10, 0);
    let live = DynamicImage::ImageLuma8( GrayImage::from_fn( 20, 10, |x,y| Luma([ if x < 5 && y < 5 { 255 } else { 0 } ])));

    let out = run_model( &ModelVariant::PixelDiff, &live, &reference).unwrap();
    assert_eq!( out.score.different_pixels, 25);
    assert_eq!( out.score.raw_difference_percentage, 12.5);
    assert!( !out.score.has_mail);

    assert_eq!( *out.visualization.get_pixel( 2, 2), MARKER_COLOR);
    assert_eq!( *out.visualization.get_pixel( 10, 5), Rgb([0,0,0]));
}

#[test]
fn test_reported_values_are_rounded () {
    let reference = solid_gray( 3, 1, 0);
    let live = DynamicImage::ImageLuma8( GrayImage::from_fn( 3, 1, |x,_| Luma([ if x == 0 { 100 } else { 0 } ])));

    let out = run_model( &ModelVariant::PixelDiff, &live, &reference).unwrap();
    assert_eq!( out.score.raw_difference_percentage, 33.33);
}

#[test]
fn test_model_b_variants () {
    let live = solid_gray( 64, 36, 0);
    let reference = solid_gray( 64, 36, 255);

    let power = run_model( &ModelVariant::PowerCurve, &live, &reference).unwrap();
    assert_eq!( power.score.image_size, [1024,576]);
    assert_eq!( power.score.threshold, 25.0);
    assert_eq!( power.score.curve_parameters.as_ref().and_then( |c| c.get("beta")), Some(2.0));

    let multi = run_model( &ModelVariant::MultiSignal, &live, &reference).unwrap();
    assert_eq!( multi.score.threshold, 10.0);
    assert!( multi.score.has_mail);
    let breakdown = multi.score.analysis_breakdown.clone().unwrap();
    assert_eq!( breakdown.pixel_diff_percent, 100.0);
    assert_eq!( breakdown.color_diff_percent, 100.0);

    // solid images only have edge responses along the (copied) border
    assert!( breakdown.edge_diff_percent > 0.0 && breakdown.edge_diff_percent < 1.0);
}

#[test]
fn test_model_c_variants () {
    let img = gradient( 1024, 576);

    let rect = CropRect::new( 100, 50, 600, 400);
    let out = run_model( &ModelVariant::GaussianWeighted{ crop: Some(rect) }, &img, &img).unwrap();
    assert_eq!( out.score.image_size, [800,600]);
    assert_eq!( out.score.weighted_difference_percentage, Some(0.0));

    let bad_rect = CropRect::new( 900, 0, 300, 100);
    match run_model( &ModelVariant::GaussianWeighted{ crop: Some(bad_rect) }, &img, &img) {
        Err(MbxImageError::InvalidDimensions(_)) => {}
        other => panic!("expected dimension error, got {:?}", other.map( |o| o.score))
    }

    let live = solid_gray( 64, 36, 0);
    let reference = solid_gray( 64, 36, 255);
    let gaussian = run_model( &ModelVariant::GaussianWeighted{ crop: None }, &live, &reference).unwrap();
    assert_eq!( gaussian.score.weighted_difference_percentage, Some(100.0));
    assert_eq!( gaussian.score.difference_percentage, 45.0); // 42 + 60 * 0.05

    let inverted = run_model( &ModelVariant::InvertedPower, &live, &reference).unwrap();
    assert_eq!( inverted.score.difference_percentage, 100.0);
    assert!( inverted.score.has_mail);
}

#[test]
fn test_model_d_brightness () {
    let live = DynamicImage::ImageRgb8( RgbImage::from_pixel( 50, 30, Rgb([200,200,200])));
    let reference = DynamicImage::ImageRgb8( RgbImage::from_pixel( 50, 30, Rgb([100,100,100])));

    let out = run_model( &ModelVariant::BrightnessAdjusted, &live, &reference).unwrap();
    assert_eq!( out.score.original_brightness, Some(200.0));
    assert_eq!( out.score.median_brightness, Some(100.0));
    assert_eq!( out.score.brightness_adjustment_factor, Some(0.5));

    // after normalization the images are identical
    assert_eq!( out.score.raw_difference_percentage, 0.0);
    assert!( !out.score.has_mail);

    // Model A sees the brightness change
    let a = run_model( &ModelVariant::PixelDiff, &live, &reference).unwrap();
    assert_eq!( a.score.raw_difference_percentage, 100.0);
}

#[test]
fn test_unknown_model () {
    let img = solid_gray( 10, 10, 0);
    match models::run( "ModelZ", &img, &img) {
        Err(MbxImageError::UnknownModel(name)) => assert_eq!( name, "ModelZ"),
        other => panic!("expected unknown model error, got {:?}", other.map( |o| o.score))
    }

    assert!( models::run( "ModelA", &img, &img).is_ok());
}

#[test]
fn test_model_ids_and_variants () {
    assert_eq!( ModelId::parse("ModelC").unwrap(), ModelId::C);
    assert_eq!( ModelId::parse("modelb").unwrap(), ModelId::B);
    assert_eq!( ModelId::parse("d").unwrap(), ModelId::D);
    assert!( ModelId::parse("Model").is_err());
    assert!( ModelId::parse("ModelAB").is_err());
    assert_eq!( ModelId::all().len(), 4);

    assert_eq!( ModelVariant::lookup( ModelId::B, 1).unwrap(), ModelVariant::PowerCurve);
    assert_eq!( ModelVariant::lookup( ModelId::B, 2).unwrap(), ModelVariant::MultiSignal);
    assert!( matches!( ModelVariant::lookup( ModelId::A, 2), Err(MbxImageError::UnknownVariant(_))));

    assert_eq!( ModelVariant::parse( ModelId::C, "gaussian").unwrap(), ModelVariant::GaussianWeighted{ crop: None });
    assert_eq!( ModelVariant::parse( ModelId::C, "v2").unwrap(), ModelVariant::InvertedPower);
    assert!( ModelVariant::parse( ModelId::D, "multi").is_err());

    for m in ModelId::all() {
        assert_eq!( ModelVariant::default_for(m).model(), m);
    }
}
