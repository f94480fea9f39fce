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

//! the difference scoring models.
//!
//! Each model slot (A..D) can have several mutually exclusive algorithm versions. A [`ModelVariant`]
//! identifies one (model, version) combination and is what gets dispatched in [`run_model`].
//! All variants are deterministic functions of the two input images

use std::{fmt, str::FromStr};
use image::{DynamicImage, GrayImage, RgbImage};
use serde::{Serialize,Deserialize};
use strum::{EnumIter, IntoEnumIterator};
use mbx_common::debug;
use crate::{errors::Result, MbxImageError, CropRect, DiffMask, Score, gray_to_rgb, MARKER_COLOR};

pub mod model_a;
pub mod model_b;
pub mod model_c;
pub mod model_d;

/// the absolute per-pixel difference above which we consider a pixel to be different
pub const PIXEL_DIFF_THRESHOLD: f32 = 10.0;

#[derive(Debug,Clone,Copy,PartialEq,Eq,PartialOrd,Ord,Hash,Serialize,Deserialize,EnumIter)]
pub enum ModelId { A, B, C, D }

impl ModelId {
    /// the external name, e.g. "ModelA"
    pub fn name (&self)->&'static str {
        match self {
            ModelId::A => "ModelA",
            ModelId::B => "ModelB",
            ModelId::C => "ModelC",
            ModelId::D => "ModelD",
        }
    }

    pub fn letter (&self)->char {
        match self {
            ModelId::A => 'A',
            ModelId::B => 'B',
            ModelId::C => 'C',
            ModelId::D => 'D',
        }
    }

    /// accepts "ModelA", "modela", "A" or "a"
    pub fn parse (s: &str)->Result<Self> {
        let s = s.trim();
        let id = match (s.get(..5), s.get(5..)) {
            (Some(prefix), Some(rest)) if prefix.eq_ignore_ascii_case("model") => rest,
            _ => s
        };

        match id {
            "A" | "a" => Ok(ModelId::A),
            "B" | "b" => Ok(ModelId::B),
            "C" | "c" => Ok(ModelId::C),
            "D" | "d" => Ok(ModelId::D),
            _ => Err( MbxImageError::UnknownModel( s.to_string()))
        }
    }

    pub fn all ()->Vec<ModelId> {
        ModelId::iter().collect()
    }
}

impl fmt::Display for ModelId {
    fn fmt (&self, f: &mut fmt::Formatter<'_>)->fmt::Result {
        write!( f, "{}", self.name())
    }
}

impl FromStr for ModelId {
    type Err = MbxImageError;
    fn from_str (s: &str)->Result<Self> { ModelId::parse(s) }
}

/// the versioned strategy for a model slot
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub enum ModelVariant {
    /// A/v1: grayscale pixel difference at reference resolution
    PixelDiff,
    /// B/v1: pixel difference with power curve
    PowerCurve,
    /// B/v2: weighted blend of pixel, edge and color differences
    MultiSignal,
    /// C/v1: super-Gaussian column weighting with piecewise linear curve, optional pre-crop
    GaussianWeighted { crop: Option<CropRect> },
    /// C/v2: pixel difference with inverted power curve
    InvertedPower,
    /// D/v1: pixel difference after matching the live image brightness to the reference
    BrightnessAdjusted,
}

impl ModelVariant {
    pub fn model (&self)->ModelId {
        use ModelVariant::*;
        match self {
            PixelDiff => ModelId::A,
            PowerCurve | MultiSignal => ModelId::B,
            GaussianWeighted{..} | InvertedPower => ModelId::C,
            BrightnessAdjusted => ModelId::D,
        }
    }

    pub fn version (&self)->u32 {
        use ModelVariant::*;
        match self {
            PixelDiff | PowerCurve | GaussianWeighted{..} | BrightnessAdjusted => 1,
            MultiSignal | InvertedPower => 2,
        }
    }

    pub fn name (&self)->&'static str {
        use ModelVariant::*;
        match self {
            PixelDiff => "pixel",
            PowerCurve => "power",
            MultiSignal => "multi",
            GaussianWeighted{..} => "gaussian",
            InvertedPower => "inverted",
            BrightnessAdjusted => "brightness",
        }
    }

    /// the method tag that is reported in results
    pub fn method (&self)->&'static str {
        use ModelVariant::*;
        match self {
            PixelDiff => "pixel_difference_grayscale",
            PowerCurve => "power_sensitivity_curve",
            MultiSignal => "multi_analysis_weighted",
            GaussianWeighted{..} => "gaussian_weighted_piecewise",
            InvertedPower => "inverted_sensitivity_curve",
            BrightnessAdjusted => "brightness_adjusted_pixel_difference_grayscale",
        }
    }

    /// the variant we use if nothing else is configured
    pub fn default_for (model: ModelId)->Self {
        match model {
            ModelId::A => ModelVariant::PixelDiff,
            ModelId::B => ModelVariant::MultiSignal,
            ModelId::C => ModelVariant::InvertedPower,
            ModelId::D => ModelVariant::BrightnessAdjusted,
        }
    }

    pub fn variants_of (model: ModelId)->Vec<ModelVariant> {
        match model {
            ModelId::A => vec![ ModelVariant::PixelDiff ],
            ModelId::B => vec![ ModelVariant::PowerCurve, ModelVariant::MultiSignal ],
            ModelId::C => vec![ ModelVariant::GaussianWeighted{crop: None}, ModelVariant::InvertedPower ],
            ModelId::D => vec![ ModelVariant::BrightnessAdjusted ],
        }
    }

    /// find the variant for a (model, version) key
    pub fn lookup (model: ModelId, version: u32)->Result<Self> {
        Self::variants_of( model).into_iter()
            .find( |v| v.version() == version)
            .ok_or_else( || MbxImageError::UnknownVariant( format!("{model}/v{version}")))
    }

    /// find the variant by model and variant name (e.g. "multi") or version (e.g. "v2", "2")
    pub fn parse (model: ModelId, spec: &str)->Result<Self> {
        let spec = spec.trim();
        let version = spec.strip_prefix('v').unwrap_or(spec);
        if let Ok(n) = version.parse::<u32>() {
            return Self::lookup( model, n)
        }

        Self::variants_of( model).into_iter()
            .find( |v| v.name().eq_ignore_ascii_case( spec))
            .ok_or_else( || MbxImageError::UnknownVariant( format!("{model}/{spec}")))
    }
}

impl fmt::Display for ModelVariant {
    fn fmt (&self, f: &mut fmt::Formatter<'_>)->fmt::Result {
        write!( f, "{}/v{} {}", self.model(), self.version(), self.name())
    }
}

/// the outcome of a model run: the score and the preprocessed live image with all different pixels marked
pub struct ModelOutput {
    pub score: Score,
    pub visualization: RgbImage,
}

/// run the given model variant on a live and reference image
pub fn run_model (variant: &ModelVariant, live: &DynamicImage, reference: &DynamicImage)->Result<ModelOutput> {
    debug!("running {variant}");

    let output = match variant {
        ModelVariant::PixelDiff => model_a::pixel_diff( live, reference)?,
        ModelVariant::PowerCurve => model_b::power_curve( live, reference)?,
        ModelVariant::MultiSignal => model_b::multi_signal( live, reference)?,
        ModelVariant::GaussianWeighted{crop} => model_c::gaussian_weighted( live, reference, crop.as_ref())?,
        ModelVariant::InvertedPower => model_c::inverted_power( live, reference)?,
        ModelVariant::BrightnessAdjusted => model_d::brightness_adjusted( live, reference)?,
    };

    debug!("{} raw={} adjusted={} has_mail={}", output.score.model_name,
        output.score.raw_difference_percentage, output.score.difference_percentage, output.score.has_mail);
    Ok( output )
}

/// look up the model by name and run its default variant
pub fn run (model_name: &str, live: &DynamicImage, reference: &DynamicImage)->Result<ModelOutput> {
    let model = ModelId::parse( model_name)?;
    run_model( &ModelVariant::default_for( model), live, reference)
}

/// the preprocessed live image as RGB with all mask pixels painted in the marker color
pub(crate) fn visualize (live: &GrayImage, mask: &DiffMask)->Result<RgbImage> {
    let mut img = gray_to_rgb( live);
    mask.paint( &mut img, MARKER_COLOR)?;
    Ok( img )
}
