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

use chrono::{DateTime, TimeDelta, NaiveTime, SecondsFormat, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

pub fn utc_now()->DateTime<Utc> {
    Utc::now()
}

/// midnight (00:00:00 UTC) of the day of the given date
pub fn start_of_day (dt: &DateTime<Utc>)->DateTime<Utc> {
    dt.date_naive().and_time( NaiveTime::MIN).and_utc()
}

/// the start of the day that is `n_days` before the day of `dt`. This is what we use as retention cutoff
pub fn days_before_start_of_day (dt: &DateTime<Utc>, n_days: u32)->DateTime<Utc> {
    start_of_day(dt) - TimeDelta::days( n_days as i64)
}

/// RFC 3339 string with microsecond resolution and explicit "+00:00" offset
pub fn iso_utc_string (dt: &DateTime<Utc>)->String {
    dt.to_rfc3339_opts( SecondsFormat::Micros, false)
}

/// minute resolution stamp that can be used as (sortable) file name component, e.g. "2025-06-01-14-05"
pub fn minute_stamp (dt: &DateTime<Utc>)->String {
    dt.format("%Y-%m-%d-%H-%M").to_string()
}

pub fn parse_datetime (s: &str)->Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s).ok().map(|d| d.to_utc())
}

/* #region dated objects ****************************************************************************************/

/// a type bound for something we can get a date for.
/// The main purpose of this trait is to avoid having to extract DateTime lists out of already existing collections
pub trait Dated {
    fn date (&self)->DateTime<Utc>;
}

//--- some blanket impls

impl Dated for DateTime<Utc> {
    fn date (&self)->DateTime<Utc> { *self }
}

impl Dated for SystemTime {
    /// times before the epoch are clamped to the epoch
    fn date (&self)->DateTime<Utc> {
        let nanos = self.duration_since( UNIX_EPOCH).map( |d| d.as_nanos() as i64).unwrap_or(0);
        DateTime::from_timestamp_nanos( nanos)
    }
}

/// sort a slice of dated items newest-first. This is stable, i.e. items with equal dates keep their order
pub fn sort_newest_first<T: Dated> (items: &mut [T]) {
    items.sort_by( |a,b| b.date().cmp( &a.date()));
}

/* #endregion dated objects */
