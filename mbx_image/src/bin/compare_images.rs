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
use mbx_common::{define_cli, check_cli, init_tracing, fs::write_file_atomic};
use mbx_image::{open_image, encode_rgb_jpeg, run_model, ModelId, ModelVariant};
use anyhow::Result;

define_cli! { ARGS [about="score a live image against a reference image with one of the mailbox models"] =
    model: String [help="model to run (A, B, C or D)", long, short, default_value="A"],
    variant: Option<String> [help="model variant name or version (e.g. 'multi' or 'v2'), default is the configured slot default", long],
    visualization: Option<String> [help="optional filename for the visualization (JPEG) output", long],
    quality: u8 [help="JPEG quality of visualization output", long, default_value="95"],

    live_file: String [help="filename of live image"],
    reference_file: String [help="filename of reference (median) image"]
}

fn main()->Result<()> {
    check_cli!(ARGS);
    init_tracing();

    let model = ModelId::parse( &ARGS.model)?;
    let variant = match &ARGS.variant {
        Some(spec) => ModelVariant::parse( model, spec)?,
        None => ModelVariant::default_for( model)
    };

    let live = open_image( &ARGS.live_file)?;
    let reference = open_image( &ARGS.reference_file)?;

    let mut output = run_model( &variant, &live, &reference)?;

    if let Some(path) = &ARGS.visualization {
        let bytes = encode_rgb_jpeg( &output.visualization, ARGS.quality)?;
        write_file_atomic( &Path::new(path), &bytes)?;
        output.score.visualization_saved = true;
    }

    println!("{}", serde_json::to_string_pretty( &output.score)?);
    Ok(())
}
