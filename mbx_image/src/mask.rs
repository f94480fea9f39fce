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

use bit_set::BitSet;
use image::{GrayImage, Rgb, RgbImage};
use ndarray::Array2;
use serde::{Serialize,Deserialize};
use crate::{errors::Result, MbxImageError, curves::percentage};

/// boolean grid of "different" cells for two compared images of the same size
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct DiffMask {
    width: usize,
    height: usize,
    data: BitSet
}

impl DiffMask {
    pub fn new (width: usize, height: usize)->Self {
        let data = BitSet::with_capacity(width*height);
        DiffMask{width,height,data}
    }

    /// mark all cells for which `|a - b| > threshold`. Grids are (rows,cols)
    pub fn from_grids (a: &Array2<f32>, b: &Array2<f32>, threshold: f32)->Result<Self> {
        if a.dim() != b.dim() {
            return Err( MbxImageError::InvalidDimensions( format!("grid dimensions differ: {:?} vs {:?}", a.dim(), b.dim())))
        }

        let (h,w) = a.dim();
        let mut mask = DiffMask::new( w, h);
        for ((y,x),va) in a.indexed_iter() {
            if (va - b[[y,x]]).abs() > threshold {
                mask.set( x, y);
            }
        }
        Ok( mask )
    }

    pub fn from_gray_diff (a: &GrayImage, b: &GrayImage, threshold: f32)->Result<Self> {
        check_dimensions( a.dimensions(), b.dimensions())?;

        let (w,h) = a.dimensions();
        let mut mask = DiffMask::new( w as usize, h as usize);
        for (x,y,pa) in a.enumerate_pixels() {
            let pb = b.get_pixel( x, y);
            if (pa.0[0] as f32 - pb.0[0] as f32).abs() > threshold {
                mask.set( x as usize, y as usize);
            }
        }
        Ok( mask )
    }

    /// a cell is different if any of its color channels differs by more than `threshold`
    pub fn from_rgb_diff (a: &RgbImage, b: &RgbImage, threshold: f32)->Result<Self> {
        check_dimensions( a.dimensions(), b.dimensions())?;

        let (w,h) = a.dimensions();
        let mut mask = DiffMask::new( w as usize, h as usize);
        for (x,y,pa) in a.enumerate_pixels() {
            let pb = b.get_pixel( x, y);
            if pa.0.iter().zip( pb.0.iter()).any( |(ca,cb)| (*ca as f32 - *cb as f32).abs() > threshold) {
                mask.set( x as usize, y as usize);
            }
        }
        Ok( mask )
    }

    pub fn dimensions (&self)->(usize,usize) {
        (self.width,self.height)
    }

    pub fn total (&self)->usize {
        self.width * self.height
    }

    /// number of set cells
    pub fn count (&self)->usize {
        self.data.len()
    }

    /// unweighted percentage of set cells in [0..100]
    pub fn percentage (&self)->f64 {
        percentage( self.count(), self.total())
    }

    pub fn get (&self, x: usize, y: usize)->bool {
        self.data.contains( y*self.width + x)
    }

    pub fn set (&mut self, x: usize, y: usize) {
        self.data.insert( y*self.width + x);
    }

    /// number of set cells per image column
    pub fn column_counts (&self)->Vec<usize> {
        let mut counts = vec![0usize; self.width];
        for (x,_) in self.iter() {
            counts[x] += 1;
        }
        counts
    }

    /// `Σ weight[x]*set(x,y) / (Σ weight[x] * height) * 100` for per-column weights.
    /// Returns 0 for empty masks or weights that do not match the mask width
    pub fn weighted_percentage (&self, weights: &[f64])->f64 {
        if weights.len() != self.width || self.height == 0 {
            return 0.0
        }

        let total: f64 = weights.iter().sum::<f64>() * self.height as f64;
        if total > 0.0 {
            let sum: f64 = self.column_counts().iter().zip( weights.iter()).map( |(n,w)| *n as f64 * w).sum();
            (sum / total) * 100.0
        } else {
            0.0
        }
    }

    /// paint all set cells of the mask with `color`
    pub fn paint (&self, img: &mut RgbImage, color: Rgb<u8>)->Result<()> {
        check_dimensions( (self.width as u32, self.height as u32), img.dimensions())?;
        for (x,y) in self.iter() {
            img.put_pixel( x as u32, y as u32, color);
        }
        Ok(())
    }

    pub fn iter (&self)->MaskIter<'_> {
        MaskIter{ bits: self.data.iter(), w: self.width }
    }
}

fn check_dimensions (a: (u32,u32), b: (u32,u32))->Result<()> {
    if a == b {
        Ok(())
    } else {
        Err( MbxImageError::InvalidDimensions( format!("image dimensions differ: {}x{} vs {}x{}", a.0, a.1, b.0, b.1)))
    }
}

impl<'a> IntoIterator for &'a DiffMask {
    type Item = (usize,usize);
    type IntoIter = MaskIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// iterator over the (x,y) coordinates of set mask cells, in row major order
pub struct MaskIter<'a> {
    bits: bit_set::Iter<'a,u32>,
    w: usize,
}

impl <'a> Iterator for MaskIter<'a> {
    type Item = (usize,usize);

    fn next(&mut self) -> Option<Self::Item> {
        self.bits.next().map( |n| (n % self.w, n / self.w))
    }
}
