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

//! the image comparison core of the mailbox monitor.
//!
//! This wraps the external 'image' crate with the preprocessing steps shared by all scoring models
//! (decoding, color mode conversion, resizing, cropping and brightness normalization), and provides
//! the difference masks, sensitivity curves, median reference builder and the models themselves

use std::{io::Cursor, path::Path};
use image::{
    self, imageops::{self, FilterType}, codecs::jpeg::JpegEncoder, GenericImageView, ImageBuffer, Pixel, Rgb
};
pub use image::{DynamicImage, GrayImage, RgbImage};
use imageproc::filter::filter3x3;
use ndarray::Array2;
use serde::{Serialize,Deserialize};
use mbx_common::fs::filepath_contents;

mod errors;
pub use errors::{Result,MbxImageError};

mod mask;
pub use mask::{DiffMask,MaskIter};

pub mod curves;

mod median;
pub use median::{MedianBuilder, median_image, MIN_MEDIAN_SAMPLES};

mod result;
pub use result::{Score, ComparisonResult, AnalysisBreakdown, CurveParameters};

pub mod models;
pub use models::{ModelId, ModelVariant, ModelOutput, run_model};

/// the common resolution of reference images and most models
pub const REFERENCE_WIDTH: u32 = 1024;
pub const REFERENCE_HEIGHT: u32 = 576;

/// color we use to mark different pixels in visualizations
pub const MARKER_COLOR: Rgb<u8> = Rgb([255, 255, 0]);

/* #region decode/encode *************************************************************************************/

/// decode image bytes in any of the formats supported by the image crate
pub fn decode_image (bytes: &[u8])->Result<DynamicImage> {
    image::load_from_memory( bytes).map_err( |e| MbxImageError::ImageDecode( e.to_string()))
}

pub fn open_image<P> (path: P)->Result<DynamicImage> where P: AsRef<Path> {
    let bytes = filepath_contents( &path)?;
    decode_image( &bytes)
}

/// JPEG encode an image with the given quality (1..100). Alpha channels are dropped
pub fn encode_jpeg (img: &DynamicImage, quality: u8)->Result<Vec<u8>> {
    let mut buf = Cursor::new( Vec::new());
    let encoder = JpegEncoder::new_with_quality( &mut buf, quality.clamp(1,100));

    match img {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => img.write_with_encoder( encoder)?,
        _ => DynamicImage::ImageRgb8( img.to_rgb8()).write_with_encoder( encoder)?
    }
    Ok( buf.into_inner() )
}

pub fn encode_rgb_jpeg (img: &RgbImage, quality: u8)->Result<Vec<u8>> {
    let mut buf = Cursor::new( Vec::new());
    JpegEncoder::new_with_quality( &mut buf, quality.clamp(1,100)).encode_image( img)?;
    Ok( buf.into_inner() )
}

/* #endregion decode/encode */

/* #region color mode & geometry *****************************************************************************/

/// single channel luminance. This is a plain copy if the image already is 8bit grayscale
pub fn to_gray (img: &DynamicImage)->GrayImage {
    img.to_luma8()
}

pub fn to_rgb (img: &DynamicImage)->RgbImage {
    img.to_rgb8()
}

pub fn gray_to_rgb (img: &GrayImage)->RgbImage {
    DynamicImage::ImageLuma8( img.clone()).to_rgb8()
}

/// Lanczos3 resize to the given target size. Images that already have that size are returned unchanged
pub fn resize_to<P> (img: &ImageBuffer<P,Vec<P::Subpixel>>, width: u32, height: u32)->ImageBuffer<P,Vec<P::Subpixel>>
    where P: Pixel + 'static, P::Subpixel: 'static
{
    if img.dimensions() == (width,height) {
        img.clone()
    } else {
        imageops::resize( img, width, height, FilterType::Lanczos3)
    }
}

/// resize preserving the aspect ratio so that the result is `width` pixels wide (used for thumbnails)
pub fn resize_to_width (img: &DynamicImage, width: u32)->DynamicImage {
    let (w,h) = img.dimensions();
    let height = ((h as f64 * width as f64) / w.max(1) as f64).round().max(1.0) as u32;
    img.resize_exact( width, height, FilterType::Lanczos3)
}

/// a crop rectangle in pixel coordinates of the image it is applied to
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new (left: u32, top: u32, width: u32, height: u32)->Self {
        CropRect { left, top, width, height }
    }

    pub fn fits (&self, width: u32, height: u32)->bool {
        self.width > 0 && self.height > 0 &&
        self.left.checked_add( self.width).map( |r| r <= width).unwrap_or(false) &&
        self.top.checked_add( self.height).map( |b| b <= height).unwrap_or(false)
    }
}

pub fn crop<P> (img: &ImageBuffer<P,Vec<P::Subpixel>>, rect: &CropRect)->Result<ImageBuffer<P,Vec<P::Subpixel>>>
    where P: Pixel + 'static, P::Subpixel: 'static
{
    let (w,h) = img.dimensions();
    if rect.fits( w, h) {
        Ok( imageops::crop_imm( img, rect.left, rect.top, rect.width, rect.height).to_image() )
    } else {
        Err( MbxImageError::InvalidDimensions( format!("crop rectangle {rect:?} exceeds image size {w}x{h}")))
    }
}

/// remove the top `n` rows. This fails if that would not leave any rows, in which case callers are
/// supposed to keep the original image
pub fn crop_top (img: &DynamicImage, n: u32)->Result<DynamicImage> {
    let (w,h) = img.dimensions();
    if h > n {
        Ok( img.crop_imm( 0, n, w, h - n) )
    } else {
        Err( MbxImageError::InvalidDimensions( format!("image height {h} does not exceed top crop of {n}")))
    }
}

/* #endregion color mode & geometry */

/* #region brightness ****************************************************************************************/

/// mean of the grayscale conversion in [0..255]
pub fn mean_luminance (img: &DynamicImage)->f64 {
    mean_gray( &to_gray( img))
}

pub fn mean_gray (img: &GrayImage)->f64 {
    let n = img.as_raw().len();
    if n > 0 {
        img.as_raw().iter().map( |v| *v as f64).sum::<f64>() / n as f64
    } else {
        0.0
    }
}

/// multiplicative factor that maps `current` mean brightness to `target`. Non-positive current
/// brightness (all black images) yields a neutral factor of 1.0
pub fn brightness_factor (current: f64, target: f64)->f64 {
    if current > 0.0 { target / current } else { 1.0 }
}

/// scale all RGB channels so that the mean luminance matches `target`, clipping to [0..255].
/// Returns the adjusted image and the applied factor
pub fn adjust_brightness (img: &DynamicImage, target: f64)->(RgbImage,f64) {
    let factor = brightness_factor( mean_luminance( img), target);
    (scale_rgb( &to_rgb( img), factor), factor)
}

pub fn scale_rgb (img: &RgbImage, factor: f64)->RgbImage {
    let mut out = img.clone();
    for v in out.iter_mut() {
        *v = (*v as f64 * factor).clamp( 0.0, 255.0) as u8; // truncates
    }
    out
}

/* #endregion brightness */

/* #region numeric grids *************************************************************************************/

/// the grayscale image as (rows,cols) float grid so that differences can't wrap around
pub fn gray_grid (img: &GrayImage)->Array2<f32> {
    let (w,h) = img.dimensions();
    Array2::from_shape_fn( (h as usize, w as usize), |(y,x)| img.get_pixel( x as u32, y as u32).0[0] as f32)
}

/// 3x3 edge enhancement kernel (8 at the center, -1 for all neighbors)
pub const FIND_EDGES_KERNEL: [i32;9] = [-1,-1,-1, -1,8,-1, -1,-1,-1];

/// convolve with [`FIND_EDGES_KERNEL`], clipping results to [0..255]. The outermost rows and columns
/// have no full neighborhood and are copied from the input
pub fn find_edges (img: &GrayImage)->GrayImage {
    let mut out: GrayImage = filter3x3::<_,i32,u8>( img, &FIND_EDGES_KERNEL);

    let (w,h) = img.dimensions();
    for (x,y,px) in img.enumerate_pixels() {
        if x == 0 || y == 0 || x+1 == w || y+1 == h {
            out.put_pixel( x, y, *px);
        }
    }
    out
}

/* #endregion numeric grids */
