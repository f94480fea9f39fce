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

//! pure sensitivity transforms that map raw difference percentages in [0..100] to adjusted
//! percentages, and the column weight kernel used by horizontally weighted scoring.
//! All functions clamp their results to [0..100]

pub const MAX_PCT: f64 = 100.0;

#[inline]
pub fn clamp_pct (v: f64)->f64 {
    if v.is_nan() { 0.0 } else { v.clamp( 0.0, MAX_PCT) }
}

/// round to two decimal places (which is what we report)
#[inline]
pub fn round2 (v: f64)->f64 {
    (v * 100.0).round() / 100.0
}

/// `count / total * 100`, with 0 for empty totals
#[inline]
pub fn percentage (count: usize, total: usize)->f64 {
    if total > 0 { (count as f64 / total as f64) * 100.0 } else { 0.0 }
}

/// `100 * (raw/100)^beta`. For beta > 1 this suppresses small differences
pub fn power_curve (raw: f64, beta: f64)->f64 {
    let r = clamp_pct( raw) / MAX_PCT;
    clamp_pct( MAX_PCT * r.powf( beta))
}

/// `100 * (raw/100)^3`, the strongest suppression of small differences we use
pub fn cubic_curve (raw: f64)->f64 {
    power_curve( raw, 3.0)
}

/// `100 * (1 - (1 - raw/100)^alpha)`. For alpha > 1 this amplifies small differences
pub fn inverted_power_curve (raw: f64, alpha: f64)->f64 {
    let r = clamp_pct( raw) / MAX_PCT;
    clamp_pct( MAX_PCT * (1.0 - (1.0 - r).powf( alpha)))
}

/// two segment linear curve: `raw * low_gain` up to `knee`, then `knee_value + (raw - knee) * high_slope`
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct PiecewiseCurve {
    pub knee: f64,
    pub low_gain: f64,
    pub knee_value: f64,
    pub high_slope: f64,
}

pub const DEFAULT_PIECEWISE: PiecewiseCurve = PiecewiseCurve { knee: 40.0, low_gain: 1.05, knee_value: 42.0, high_slope: 0.05 };

impl PiecewiseCurve {
    pub fn apply (&self, raw: f64)->f64 {
        let raw = clamp_pct( raw);
        if raw <= self.knee {
            clamp_pct( raw * self.low_gain)
        } else {
            clamp_pct( self.knee_value + (raw - self.knee) * self.high_slope)
        }
    }
}

pub fn piecewise_curve (raw: f64)->f64 {
    DEFAULT_PIECEWISE.apply( raw)
}

/// parameters of the super-Gaussian column weight kernel
/// `weight(x) = boost * exp( -0.5 * (|x - center| / sigma)^p )` with `sigma = sigma_factor * width`
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct SuperGaussian {
    pub boost: f64,
    pub sigma_factor: f64,
    pub power: f64,
}

pub const DEFAULT_SUPER_GAUSSIAN: SuperGaussian = SuperGaussian { boost: 2.5, sigma_factor: 0.205, power: 2.8 };

impl SuperGaussian {
    /// per-column weights for an image of the given width, centered at `(width-1)/2`
    pub fn weights (&self, width: usize)->Vec<f64> {
        let center = (width as f64 - 1.0) / 2.0;
        let sigma = self.sigma_factor * width as f64;

        (0..width).map( |x| {
            if sigma > 0.0 {
                let d = (x as f64 - center).abs() / sigma;
                self.boost * (-0.5 * d.powf( self.power)).exp()
            } else {
                self.boost
            }
        }).collect()
    }
}

pub fn super_gaussian_weights (width: usize)->Vec<f64> {
    DEFAULT_SUPER_GAUSSIAN.weights( width)
}
