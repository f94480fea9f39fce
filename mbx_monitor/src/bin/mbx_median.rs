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

use mbx_common::{define_cli, check_cli, init_tracing, datetime::utc_now};
use mbx_monitor::{resolve_config, MedianOutcome, Monitor};
use anyhow::Result;

define_cli! { ARGS [about="rebuild the reference image from the newest sample images"] =
    config: Option<String> [help="path of RON monitor config", long, short],
    store_root: Option<String> [help="use a filesystem store with this root directory", long],
    samples: Option<usize> [help="max number of samples to use (overrides config)", long, short],
    show_log: bool [help="only print the log of the last reference image build", long]
}

fn main()->Result<()> {
    check_cli!(ARGS);
    init_tracing();

    let mut config = resolve_config( ARGS.config.as_deref(), ARGS.store_root.as_deref())?;
    if let Some(n) = ARGS.samples {
        config.median_samples = n;
    }
    let monitor = Monitor::from_config( config)?;

    if ARGS.show_log {
        match monitor.read_median_log()? {
            Some(log) => println!("{}", serde_json::to_string_pretty( &log)?),
            None => println!("no reference image log")
        }
        return Ok(())
    }

    match monitor.rebuild_median( utc_now())? {
        MedianOutcome::Created(log) => {
            println!("{}", serde_json::to_string_pretty( &log)?);
            Ok(())
        }
        MedianOutcome::NotCreated{reason} => anyhow::bail!("reference image not created: {reason}")
    }
}
