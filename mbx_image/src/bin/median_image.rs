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

use std::path::Path;
use mbx_common::{define_cli, check_cli, init_tracing, info, fs::{filepath_contents, write_file_atomic}};
use mbx_image::{encode_rgb_jpeg, MedianBuilder};
use anyhow::Result;

define_cli! { ARGS [about="compute a per-pixel median reference image from a set of sample images"] =
    width: u32 [help="width of reference image", long, default_value="1024"],
    height: u32 [help="height of reference image", long, default_value="576"],
    quality: u8 [help="JPEG quality of output", long, default_value="85"],
    output: String [help="filename of the reference image to create", long, short],

    sample_files: Vec<String> [help="sample images (at least 3 usable ones)", required=true]
}

fn main()->Result<()> {
    check_cli!(ARGS);
    init_tracing();

    let mut builder = MedianBuilder::new( ARGS.width, ARGS.height);
    for file in &ARGS.sample_files {
        match filepath_contents( &Path::new(file)) {
            Ok(bytes) => { builder.add_encoded( file, &bytes); }
            Err(e) => builder.skip( file, e)
        }
    }

    let img = builder.build()?;
    write_file_atomic( &Path::new( &ARGS.output), &encode_rgb_jpeg( &img, ARGS.quality)?)?;

    info!("created {} from {} samples ({} skipped)", ARGS.output, builder.len(), builder.skipped().len());
    Ok(())
}
