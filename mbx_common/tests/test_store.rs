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

use mbx_common::store::{metadata, FsStore, MemoryStore, Metadata, ObjectStore, StoreError};

// run with "cargo test test_xx -- --nocapture"

fn check_basic_ops (store: &dyn ObjectStore) {
    let info = store.put( "status/modela.json", b"{}".to_vec(), metadata(&[("model_name","ModelA")])).unwrap();
    assert_eq!( info.size, 2);

    let obj = store.get( "status/modela.json").unwrap();
    assert_eq!( obj.data, b"{}".to_vec());
    assert_eq!( obj.info.metadata.get("model_name").map(|s| s.as_str()), Some("ModelA"));

    let head = store.head( "status/modela.json").unwrap();
    assert_eq!( head.size, 2);
    assert!( store.exists( "status/modela.json").unwrap());

    assert!( matches!( store.get("status/nope.json"), Err(StoreError::NotFound(_))));
    assert!( matches!( store.head("status/nope.json"), Err(StoreError::NotFound(_))));
    assert!( store.get_opt("status/nope.json").unwrap().is_none());
    assert!( !store.exists("status/nope.json").unwrap());

    store.put( "samples/a.jpg", vec![1,2,3], Metadata::new()).unwrap();
    store.put( "samples/b.jpg", vec![4,5], Metadata::new()).unwrap();

    let mut keys: Vec<String> = store.list("samples/").unwrap().into_iter().map(|i| i.key).collect();
    keys.sort();
    assert_eq!( keys, vec!["samples/a.jpg".to_string(), "samples/b.jpg".to_string()]);

    store.copy( "samples/a.jpg", "archive/a.jpg").unwrap();
    assert_eq!( store.get("archive/a.jpg").unwrap().data, vec![1,2,3]);

    store.delete( "samples/a.jpg").unwrap();
    assert!( !store.exists("samples/a.jpg").unwrap());
    assert_eq!( store.list("samples/").unwrap().len(), 1);
}

fn check_conditional_put (store: &dyn ObjectStore) {
    let key = "status/statistics-modela.json";

    // create-only succeeds once
    let v1 = store.put_if_version( key, b"1".to_vec(), Metadata::new(), None).unwrap();
    assert!( matches!( store.put_if_version( key, b"x".to_vec(), Metadata::new(), None), Err(StoreError::Conflict(_))));

    let v2 = store.put_if_version( key, b"22".to_vec(), Metadata::new(), Some(&v1.version)).unwrap();
    assert_ne!( v1.version, v2.version);

    // stale version is rejected and does not overwrite
    assert!( matches!( store.put_if_version( key, b"333".to_vec(), Metadata::new(), Some(&v1.version)), Err(StoreError::Conflict(_))));
    assert_eq!( store.get(key).unwrap().data, b"22".to_vec());
}

#[test]
fn test_memory_store () {
    let store = MemoryStore::new();
    check_basic_ops( &store);
    check_conditional_put( &store);
}

#[test]
fn test_fs_store () {
    let dir = tempfile::tempdir().unwrap();
    let store = FsStore::new( dir.path());
    check_basic_ops( &store);
    check_conditional_put( &store);

    // metadata sidecars are not listed as objects
    assert!( store.list("").unwrap().iter().all( |i| !i.key.starts_with(".meta")));
}

#[test]
fn test_fs_store_versions_of_same_size_writes_differ () {
    let dir = tempfile::tempdir().unwrap();
    let store = FsStore::new( dir.path());
    let key = "status/statistics-modela.json";

    let mut last = store.put( key, b"aaaa".to_vec(), Metadata::new()).unwrap();
    for i in 0..20u8 {
        // same size, written back to back (possibly within one file time tick)
        let info = store.put_if_version( key, vec![b'a' + i % 2; 4], Metadata::new(), Some(&last.version)).unwrap();
        assert_ne!( info.version, last.version);

        // the now stale version must be rejected
        assert!( matches!( store.put_if_version( key, b"zzzz".to_vec(), Metadata::new(), Some(&last.version)), Err(StoreError::Conflict(_))));
        last = info;
    }
    assert_eq!( store.head( key).unwrap().version, last.version);
}

#[test]
fn test_fs_store_rejects_invalid_keys () {
    let dir = tempfile::tempdir().unwrap();
    let store = FsStore::new( dir.path());

    assert!( matches!( store.put( "../escape.jpg", vec![0], Metadata::new()), Err(StoreError::InvalidKey(_))));
    assert!( matches!( store.get( "/abs.jpg"), Err(StoreError::InvalidKey(_))));
    assert!( matches!( store.get( ".meta/x.json"), Err(StoreError::InvalidKey(_))));
}

#[test]
fn test_memory_store_dated_listing () {
    use chrono::{TimeZone,Utc};
    use mbx_common::datetime::sort_newest_first;

    let store = MemoryStore::new();
    for (i,key) in ["s/old.jpg", "s/new.jpg", "s/mid.jpg"].iter().enumerate() {
        let date = match i { 0 => Utc.with_ymd_and_hms(2025,1,1,0,0,0).unwrap(), 1 => Utc.with_ymd_and_hms(2025,3,1,0,0,0).unwrap(), _ => Utc.with_ymd_and_hms(2025,2,1,0,0,0).unwrap() };
        store.put_dated( key, vec![0], Metadata::new(), date).unwrap();
    }

    let mut infos = store.list("s/").unwrap();
    sort_newest_first( &mut infos);
    let keys: Vec<&str> = infos.iter().map(|i| i.key.as_str()).collect();
    assert_eq!( keys, vec!["s/new.jpg", "s/mid.jpg", "s/old.jpg"]);
}
