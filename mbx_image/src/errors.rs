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

use mbx_common::define_error;

pub type Result<T> = std::result::Result<T, MbxImageError>;

define_error!{ pub MbxImageError =
    ImageDecode(String) : "image decode error: {0}",
    ImageError(#[from] image::ImageError) : "image error: {0}",
    IOError(#[from] std::io::Error) : "IO error: {0}",
    SerdeError(#[from] serde_json::Error) : "serialization/deserialization error: {0}",
    InvalidDimensions(String) : "invalid dimension error: {0}",
    InsufficientSamples(usize,usize) : "insufficient samples: {0} usable, at least {1} required",
    UnknownModel(String) : "unknown model: {0}",
    UnknownVariant(String) : "unknown model variant: {0}"
}

impl MbxImageError {
    pub fn is_dimension_error (&self)->bool {
        matches!( self, MbxImageError::InvalidDimensions(_))
    }
}
