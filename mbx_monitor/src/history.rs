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

//! the per model comparison history and its retention policies.
//! Appending is a pure function so that it can be used in optimistic read-modify-write cycles

use chrono::{DateTime,Utc};
use serde::{Serialize,Deserialize};
use serde_json::Value;
use mbx_common::datetime::days_before_start_of_day;
use mbx_image::{ComparisonResult, ModelId};
use crate::errors::{Result,MonitorError};

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub enum RetentionPolicy {
    /// keep the newest n entries
    MaxCount(usize),
    /// keep entries that are not older than the start of the day n days ago (UTC)
    MaxAge(u32),
}

impl RetentionPolicy {
    pub fn default_for (model: ModelId)->Self {
        match model {
            ModelId::D => RetentionPolicy::MaxAge(60),
            _ => RetentionPolicy::MaxCount(100),
        }
    }

    /// trim a newest-first list of results
    pub fn apply (&self, comparisons: &mut Vec<ComparisonResult>, now: &DateTime<Utc>) {
        match self {
            RetentionPolicy::MaxCount(n) => comparisons.truncate( *n),
            RetentionPolicy::MaxAge(days) => {
                let cutoff = days_before_start_of_day( now, *days);
                comparisons.retain( |c| c.timestamp >= cutoff);
            }
        }
    }
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct ComparisonHistory {
    pub model_name: String,
    pub total_comparisons: usize,
    pub last_updated: DateTime<Utc>,
    /// newest first
    pub comparisons: Vec<ComparisonResult>,
}

impl ComparisonHistory {
    pub fn new (model: ModelId, now: DateTime<Utc>)->Self {
        Self::with_comparisons( model, Vec::new(), now)
    }

    pub fn with_comparisons (model: ModelId, comparisons: Vec<ComparisonResult>, now: DateTime<Utc>)->Self {
        ComparisonHistory { model_name: model.name().to_string(), total_comparisons: comparisons.len(), last_updated: now, comparisons }
    }

    pub fn len (&self)->usize { self.comparisons.len() }
    pub fn is_empty (&self)->bool { self.comparisons.is_empty() }

    pub fn latest (&self)->Option<&ComparisonResult> {
        self.comparisons.first()
    }
}

/// old history + new result -> new history (new result first, retention applied)
pub fn append_to_history (old: ComparisonHistory, result: ComparisonResult, policy: &RetentionPolicy, now: &DateTime<Utc>)->ComparisonHistory {
    let mut comparisons = Vec::with_capacity( old.comparisons.len() + 1);
    comparisons.push( result);
    comparisons.extend( old.comparisons);
    policy.apply( &mut comparisons, now);

    ComparisonHistory { model_name: old.model_name, total_comparisons: comparisons.len(), last_updated: *now, comparisons }
}

/// parse a history document. We accept both the full object form (with a "comparisons" array) and
/// a plain array of results. Everything else is a malformed history
pub fn parse_history (model: ModelId, data: &[u8], now: DateTime<Utc>)->Result<ComparisonHistory> {
    let value: Value = serde_json::from_slice( data).map_err( |e| malformed( model, e))?;

    let (comparisons, last_updated) = match value {
        Value::Array(_) => (value, None),
        Value::Object(mut map) => {
            let comparisons = match map.remove("comparisons") {
                Some(c @ Value::Array(_)) => c,
                _ => return Err( malformed( model, "no comparisons array"))
            };
            let last_updated = map.remove("last_updated").and_then( |v| serde_json::from_value::<DateTime<Utc>>(v).ok());
            (comparisons, last_updated)
        }
        _ => return Err( malformed( model, "not a JSON array or object"))
    };

    let comparisons: Vec<ComparisonResult> = serde_json::from_value( comparisons).map_err( |e| malformed( model, e))?;
    Ok( ComparisonHistory::with_comparisons( model, comparisons, last_updated.unwrap_or(now)) )
}

fn malformed (model: ModelId, reason: impl ToString)->MonitorError {
    MonitorError::MalformedHistory( format!("{model}: {}", reason.to_string()))
}
