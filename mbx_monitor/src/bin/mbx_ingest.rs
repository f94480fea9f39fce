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

use mbx_common::{define_cli, check_cli, init_tracing, datetime::utc_now, fs::filepath_contents};
use mbx_monitor::{resolve_config, Monitor};
use anyhow::Result;

define_cli! { ARGS [about="store a camera snapshot as the new live image"] =
    config: Option<String> [help="path of RON monitor config", long, short],
    store_root: Option<String> [help="use a filesystem store with this root directory", long],
    archive: bool [help="also archive the stored live image and create a thumbnail", long, short],

    snapshot_file: String [help="filename of the snapshot image"]
}

fn main()->Result<()> {
    check_cli!(ARGS);
    init_tracing();

    let monitor = Monitor::from_config( resolve_config( ARGS.config.as_deref(), ARGS.store_root.as_deref())?)?;
    let now = utc_now();

    let bytes = filepath_contents( &ARGS.snapshot_file)?;
    let report = monitor.ingest( &bytes, now)?;
    println!("stored {} as {} ({}x{}, cropped: {})", ARGS.snapshot_file, report.key, report.image_size[0], report.image_size[1], report.cropped);

    if ARGS.archive {
        let report = monitor.archive_latest( now)?;
        println!("archived as {} (thumbnail {})", report.archive_key, report.thumbnail_key);
    }
    Ok(())
}
