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

//! AWS S3 backed [`ObjectStore`]. The store interface is synchronous, we therefore drive the async
//! SDK from a private current-thread tokio runtime

use std::{collections::HashMap, fmt::Display};
use aws_sdk_s3::{
    Client,
    error::ProvideErrorMetadata,
    operation::{get_object::GetObjectError, head_object::HeadObjectError},
    primitives::ByteStream,
};
use aws_config::{Region,meta::region::RegionProviderChain};
use aws_smithy_types_convert::date_time::DateTimeExt;
use chrono::{DateTime,Utc};
use tokio::runtime::{Builder,Runtime};

use crate::store::{Metadata, ObjectInfo, ObjectStore, Result, StoreError, StoredObject};

pub type S3Client = Client;

/// create S3 Client for given region (credentials are taken from the environment)
pub async fn create_s3_client (region: String) -> Client {
    let region_provider = RegionProviderChain::first_try( Region::new( region));
    let aws_config = aws_config::from_env().region(region_provider).load().await;
    Client::new(&aws_config)
}

fn transient<E: Display> (e: E)->StoreError {
    StoreError::Transient( e.to_string())
}

fn to_chrono (dt: Option<&aws_sdk_s3::primitives::DateTime>)->DateTime<Utc> {
    dt.and_then( |d| d.to_chrono_utc().ok()).unwrap_or_else( Utc::now)
}

fn to_metadata (map: Option<&HashMap<String,String>>)->Metadata {
    map.map( |m| m.iter().map( |(k,v)| (k.clone(), v.clone())).collect()).unwrap_or_default()
}

pub struct S3Store {
    client: Client,
    bucket: String,
    rt: Runtime,
}

impl S3Store {
    pub fn new (bucket: impl ToString, region: impl ToString)->Result<Self> {
        let rt = Builder::new_current_thread().enable_all().build()?;
        let client = rt.block_on( create_s3_client( region.to_string()));
        Ok( S3Store { client, bucket: bucket.to_string(), rt } )
    }

    async fn put_object (&self, key: &str, data: Vec<u8>, metadata: Metadata, expected: Option<Option<&str>>)->Result<ObjectInfo> {
        let size = data.len() as u64;
        let meta: HashMap<String,String> = metadata.iter().map( |(k,v)| (k.clone(), v.clone())).collect();

        let mut builder = self.client.put_object()
            .bucket( &self.bucket)
            .key( key)
            .body( ByteStream::from( data))
            .set_metadata( Some(meta));

        builder = match expected {
            Some(Some(etag)) => builder.if_match( etag),
            Some(None) => builder.if_none_match( "*"),
            None => builder
        };

        let out = builder.send().await.map_err( |e| {
            let se = e.into_service_error();
            if se.code() == Some("PreconditionFailed") || se.code() == Some("ConditionalRequestConflict") {
                StoreError::Conflict( key.to_string())
            } else {
                transient( se)
            }
        })?;

        Ok( ObjectInfo {
            key: key.to_string(),
            size,
            last_modified: Utc::now(),
            version: out.e_tag().unwrap_or_default().to_string(),
            metadata
        })
    }
}

impl ObjectStore for S3Store {
    fn name (&self)->String { self.bucket.clone() }

    fn get (&self, key: &str)->Result<StoredObject> {
        self.rt.block_on( async {
            let out = self.client.get_object().bucket( &self.bucket).key( key).send().await.map_err( |e| {
                match e.into_service_error() {
                    GetObjectError::NoSuchKey(_) => StoreError::NotFound( key.to_string()),
                    other => transient( other)
                }
            })?;

            let info = ObjectInfo {
                key: key.to_string(),
                size: out.content_length().unwrap_or(0).max(0) as u64,
                last_modified: to_chrono( out.last_modified()),
                version: out.e_tag().unwrap_or_default().to_string(),
                metadata: to_metadata( out.metadata())
            };
            let data = out.body.collect().await.map_err( transient)?.into_bytes().to_vec();

            Ok( StoredObject { info, data } )
        })
    }

    fn head (&self, key: &str)->Result<ObjectInfo> {
        self.rt.block_on( async {
            let out = self.client.head_object().bucket( &self.bucket).key( key).send().await.map_err( |e| {
                match e.into_service_error() {
                    HeadObjectError::NotFound(_) => StoreError::NotFound( key.to_string()),
                    other => transient( other)
                }
            })?;

            Ok( ObjectInfo {
                key: key.to_string(),
                size: out.content_length().unwrap_or(0).max(0) as u64,
                last_modified: to_chrono( out.last_modified()),
                version: out.e_tag().unwrap_or_default().to_string(),
                metadata: to_metadata( out.metadata())
            })
        })
    }

    fn put (&self, key: &str, data: Vec<u8>, metadata: Metadata)->Result<ObjectInfo> {
        self.rt.block_on( self.put_object( key, data, metadata, None))
    }

    fn put_if_version (&self, key: &str, data: Vec<u8>, metadata: Metadata, expected: Option<&str>)->Result<ObjectInfo> {
        self.rt.block_on( self.put_object( key, data, metadata, Some(expected)))
    }

    fn list (&self, prefix: &str)->Result<Vec<ObjectInfo>> {
        self.rt.block_on( async {
            let mut infos = Vec::new();
            let mut token: Option<String> = None;

            loop {
                let out = self.client.list_objects_v2()
                    .bucket( &self.bucket)
                    .prefix( prefix)
                    .set_continuation_token( token.take())
                    .send().await.map_err( transient)?;

                for o in out.contents() {
                    if let Some(key) = o.key() {
                        infos.push( ObjectInfo {
                            key: key.to_string(),
                            size: o.size().unwrap_or(0).max(0) as u64,
                            last_modified: to_chrono( o.last_modified()),
                            version: o.e_tag().unwrap_or_default().to_string(),
                            metadata: Metadata::new()
                        });
                    }
                }

                if out.is_truncated().unwrap_or(false) {
                    token = out.next_continuation_token().map( |t| t.to_string());
                    if token.is_none() { break }
                } else {
                    break
                }
            }

            Ok(infos)
        })
    }

    fn delete (&self, key: &str)->Result<()> {
        self.rt.block_on( async {
            self.client.delete_object().bucket( &self.bucket).key( key).send().await.map_err( transient)?;
            Ok(())
        })
    }
}
