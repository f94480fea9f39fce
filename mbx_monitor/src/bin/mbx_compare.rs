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

use mbx_common::{define_cli, check_cli, init_tracing, error, datetime::utc_now};
use mbx_monitor::{resolve_config, CompareOutcome, Monitor, Result as MonitorResult};
use anyhow::Result;

define_cli! { ARGS [about="compare the current live image against the reference image and update model results"] =
    config: Option<String> [help="path of RON monitor config", long, short],
    store_root: Option<String> [help="use a filesystem store with this root directory", long],
    model: Vec<String> [help="model(s) to run (A..D), default is all models", long, short]
}

fn main()->Result<()> {
    check_cli!(ARGS);
    init_tracing();

    let monitor = Monitor::from_config( resolve_config( ARGS.config.as_deref(), ARGS.store_root.as_deref())?)?;
    let now = utc_now();

    let results: Vec<(String,MonitorResult<CompareOutcome>)> = if ARGS.model.is_empty() {
        monitor.compare_all( now).into_iter().map( |(m,r)| (m.name().to_string(), r)).collect()
    } else {
        ARGS.model.iter().map( |m| (m.clone(), monitor.compare( m, now))).collect()
    };

    let mut n_failed = 0;
    for (model, res) in results {
        match res {
            Ok(CompareOutcome::Compared(result)) => println!("{}", serde_json::to_string_pretty( &result)?),
            Ok(CompareOutcome::CannotCompare{missing}) => println!("{model}: cannot compare, missing {missing}"),
            Err(e) => {
                error!("{model} failed: {e}");
                n_failed += 1;
            }
        }
    }

    if n_failed > 0 { anyhow::bail!("{n_failed} model comparison(s) failed") }
    Ok(())
}
