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

use mbx_common::{define_cli, check_cli, init_tracing, datetime::utc_now, fs::filepath_contents_as_string};
use mbx_monitor::{resolve_config, Monitor};
use anyhow::Result;

define_cli! { ARGS [about="show the latest result and history of a model, or replace its history"] =
    config: Option<String> [help="path of RON monitor config", long, short],
    store_root: Option<String> [help="use a filesystem store with this root directory", long],
    replace: Option<String> [help="JSON file with edited history that replaces the stored one", long],
    history: bool [help="print the full history, not just the latest result", long],

    model: String [help="model (A..D)"]
}

fn main()->Result<()> {
    check_cli!(ARGS);
    init_tracing();

    let monitor = Monitor::from_config( resolve_config( ARGS.config.as_deref(), ARGS.store_root.as_deref())?)?;
    let now = utc_now();

    if let Some(path) = &ARGS.replace {
        let json = filepath_contents_as_string( path)?;
        let history = monitor.replace_history( &ARGS.model, &json, now)?;
        println!("replaced {} history with {} entries", history.model_name, history.total_comparisons);
        return Ok(())
    }

    let status = monitor.status( &ARGS.model, now)?;
    if ARGS.history {
        println!("{}", serde_json::to_string_pretty( &status.history)?);
    } else {
        match &status.latest {
            Some(result) => println!("{}", serde_json::to_string_pretty( result)?),
            None => println!("no result for {}", ARGS.model)
        }
        println!("{} entries in history", status.history.total_comparisons);
    }
    Ok(())
}
