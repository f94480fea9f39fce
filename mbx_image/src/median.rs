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

use image::{DynamicImage, Rgb, RgbImage};
use mbx_common::{debug, warn};
use crate::{errors::Result, MbxImageError, decode_image, resize_to, to_rgb, REFERENCE_WIDTH, REFERENCE_HEIGHT};

/// we need at least that many usable samples to compute a reference image
pub const MIN_MEDIAN_SAMPLES: usize = 3;

/// per pixel, per channel median over a set of equally sized RGB images. For an even number of
/// samples this is the truncated mean of the two middle values
pub fn median_image (samples: &[RgbImage])->Result<RgbImage> {
    if samples.len() < MIN_MEDIAN_SAMPLES {
        return Err( MbxImageError::InsufficientSamples( samples.len(), MIN_MEDIAN_SAMPLES))
    }

    let (w,h) = samples[0].dimensions();
    if let Some(s) = samples.iter().find( |s| s.dimensions() != (w,h)) {
        return Err( MbxImageError::InvalidDimensions(
            format!("sample size {}x{} differs from {w}x{h}", s.width(), s.height())))
    }

    let n = samples.len();
    let mut values: Vec<u8> = Vec::with_capacity( n);

    let img = RgbImage::from_fn( w, h, |x,y| {
        let mut px = [0u8; 3];
        for c in 0..3 {
            values.clear();
            values.extend( samples.iter().map( |s| s.get_pixel(x,y).0[c]));
            values.sort_unstable();

            px[c] = if n % 2 == 1 {
                values[n/2]
            } else {
                ((values[n/2 - 1] as u16 + values[n/2] as u16) / 2) as u8
            };
        }
        Rgb(px)
    });

    Ok( img )
}

/// accumulates preprocessed samples for a reference image. Samples that can't be decoded are
/// recorded as skipped (together with the reason) instead of failing the whole build
pub struct MedianBuilder {
    width: u32,
    height: u32,
    samples: Vec<RgbImage>,
    used: Vec<String>,
    skipped: Vec<(String,String)>,
}

impl MedianBuilder {
    pub fn new (width: u32, height: u32)->Self {
        MedianBuilder { width, height, samples: Vec::new(), used: Vec::new(), skipped: Vec::new() }
    }

    pub fn dimensions (&self)->(u32,u32) {
        (self.width, self.height)
    }

    pub fn add_image (&mut self, name: &str, img: &DynamicImage) {
        self.samples.push( resize_to( &to_rgb( img), self.width, self.height));
        self.used.push( name.to_string());
    }

    /// decode and add an encoded sample. Returns false if the sample had to be skipped
    pub fn add_encoded (&mut self, name: &str, bytes: &[u8])->bool {
        match decode_image( bytes) {
            Ok(img) => {
                debug!("adding median sample {name}");
                self.add_image( name, &img);
                true
            }
            Err(e) => {
                warn!("skipping median sample {name}: {e}");
                self.skip( name, e.to_string());
                false
            }
        }
    }

    pub fn skip (&mut self, name: &str, reason: impl ToString) {
        self.skipped.push( (name.to_string(), reason.to_string()));
    }

    pub fn len (&self)->usize { self.samples.len() }
    pub fn is_empty (&self)->bool { self.samples.is_empty() }

    /// names of added samples, in the order they were added
    pub fn used (&self)->&[String] { &self.used }

    pub fn skipped (&self)->&[(String,String)] { &self.skipped }

    pub fn build (&self)->Result<RgbImage> {
        median_image( &self.samples)
    }
}

impl Default for MedianBuilder {
    fn default()->Self { MedianBuilder::new( REFERENCE_WIDTH, REFERENCE_HEIGHT) }
}
