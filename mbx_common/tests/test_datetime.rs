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

use chrono::{TimeZone,Utc};
use mbx_common::datetime::{days_before_start_of_day, iso_utc_string, minute_stamp, parse_datetime, start_of_day};

#[test]
fn test_start_of_day () {
    let dt = Utc.with_ymd_and_hms( 2025, 6, 15, 13, 45, 10).unwrap();
    assert_eq!( start_of_day(&dt), Utc.with_ymd_and_hms( 2025, 6, 15, 0, 0, 0).unwrap());
}

#[test]
fn test_retention_cutoff_crosses_months () {
    let dt = Utc.with_ymd_and_hms( 2025, 3, 10, 8, 0, 0).unwrap();
    let cutoff = days_before_start_of_day( &dt, 60);
    assert_eq!( cutoff, Utc.with_ymd_and_hms( 2025, 1, 9, 0, 0, 0).unwrap());
}

#[test]
fn test_stamps () {
    let dt = Utc.with_ymd_and_hms( 2025, 6, 1, 14, 5, 59).unwrap();
    assert_eq!( minute_stamp(&dt), "2025-06-01-14-05");

    let s = iso_utc_string(&dt);
    assert!( s.starts_with("2025-06-01T14:05:59"));
    assert_eq!( parse_datetime(&s), Some(dt));
}
