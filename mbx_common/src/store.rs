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

//! the object store collaborator: a flat key -> bytes namespace with per-object user metadata.
//!
//! Keys are plain strings that use '/' as a (purely conventional) path separator, e.g. "status/modela.json".
//! Each stored object carries a `version` string that changes with every write. Stores that can
//! do so honor it in [`ObjectStore::put_if_version`], which is the basis for optimistic
//! read-modify-write updates. Stores without native support fall back to last-write-wins.

use std::{
    collections::{BTreeMap,HashMap},
    path::{Path,PathBuf},
    sync::{Mutex,atomic::{AtomicU64,Ordering}},
    fmt::Debug
};
use chrono::{DateTime,Utc};
use serde::{Serialize,Deserialize};
use crate::{define_error, datetime::Dated, fs::{filepath_contents, filepath_contents_as_string, write_file_atomic, files_below}};

pub type Result<T> = std::result::Result<T, StoreError>;

define_error!{ pub StoreError =
    NotFound(String) : "object not found: {0}",
    Transient(String) : "storage failure: {0}",
    Conflict(String) : "conditional write rejected: {0}",
    InvalidKey(String) : "invalid object key: {0}",
    IOError(#[from] std::io::Error) : "IO error: {0}",
    SerdeError(#[from] serde_json::Error) : "serialization/deserialization error: {0}"
}

/// user metadata of stored objects. We use a BTreeMap so that serialized metadata has a stable order
pub type Metadata = BTreeMap<String,String>;

/// build a Metadata map from (key,value) pairs
pub fn metadata<K: ToString, V: ToString> (kvs: &[(K,V)])->Metadata {
    kvs.iter().map( |(k,v)| (k.to_string(), v.to_string())).collect()
}

/// what we know about a stored object without retrieving its data
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct ObjectInfo {
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub version: String,
    pub metadata: Metadata,
}

impl Dated for ObjectInfo {
    fn date (&self)->DateTime<Utc> { self.last_modified }
}

#[derive(Debug,Clone)]
pub struct StoredObject {
    pub info: ObjectInfo,
    pub data: Vec<u8>,
}

/// the storage interface used by all components that persist or retrieve artifacts.
/// Implementations have to be shareable between threads - concurrency control beyond single operations
/// is the responsibility of the caller (see `put_if_version`)
pub trait ObjectStore: Send + Sync {
    /// a human readable identification of the store (bucket name, root dir etc.)
    fn name (&self)->String;

    fn get (&self, key: &str)->Result<StoredObject>;

    fn head (&self, key: &str)->Result<ObjectInfo>;

    fn put (&self, key: &str, data: Vec<u8>, metadata: Metadata)->Result<ObjectInfo>;

    /// all objects whose key starts with `prefix`, in no particular order. Metadata might not be populated
    fn list (&self, prefix: &str)->Result<Vec<ObjectInfo>>;

    fn delete (&self, key: &str)->Result<()>;

    /// conditional put: `expected` is the version observed when the object was read, `None` means the
    /// object must not exist yet. Stores that cannot check preconditions just overwrite
    fn put_if_version (&self, key: &str, data: Vec<u8>, metadata: Metadata, _expected: Option<&str>)->Result<ObjectInfo> {
        self.put( key, data, metadata)
    }

    fn exists (&self, key: &str)->Result<bool> {
        match self.head(key) {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e)
        }
    }

    /// get that maps NotFound into `Ok(None)`
    fn get_opt (&self, key: &str)->Result<Option<StoredObject>> {
        match self.get(key) {
            Ok(obj) => Ok(Some(obj)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e)
        }
    }

    fn copy (&self, src_key: &str, dst_key: &str)->Result<ObjectInfo> {
        let obj = self.get( src_key)?;
        self.put( dst_key, obj.data, obj.info.metadata)
    }
}

fn check_version (key: &str, current: Option<&str>, expected: Option<&str>)->Result<()> {
    if current == expected {
        Ok(())
    } else {
        Err( StoreError::Conflict( format!("{key} is at version {current:?}, expected {expected:?}")))
    }
}

/* #region memory store ***************************************************************************************/

/// a thread safe in-process store, mostly used for tests and dry runs. Supports conditional puts
pub struct MemoryStore {
    objects: Mutex<HashMap<String,StoredObject>>,
    n_writes: AtomicU64,
}

impl MemoryStore {
    pub fn new ()->Self {
        MemoryStore { objects: Mutex::new( HashMap::new()), n_writes: AtomicU64::new(0) }
    }

    fn lock (&self)->Result<std::sync::MutexGuard<'_,HashMap<String,StoredObject>>> {
        self.objects.lock().map_err( |_| StoreError::Transient("memory store lock poisoned".into()))
    }

    fn next_version (&self)->String {
        (self.n_writes.fetch_add( 1, Ordering::SeqCst) + 1).to_string()
    }

    /// put with explicit last_modified date (e.g. to set up time ordered samples)
    pub fn put_dated (&self, key: &str, data: Vec<u8>, metadata: Metadata, last_modified: DateTime<Utc>)->Result<ObjectInfo> {
        let info = ObjectInfo {
            key: key.to_string(),
            size: data.len() as u64,
            last_modified,
            version: self.next_version(),
            metadata
        };
        self.lock()?.insert( key.to_string(), StoredObject{ info: info.clone(), data });
        Ok(info)
    }

    pub fn len (&self)->usize {
        self.lock().map( |objs| objs.len()).unwrap_or(0)
    }

    pub fn is_empty (&self)->bool {
        self.len() == 0
    }

    pub fn keys (&self)->Vec<String> {
        let mut keys: Vec<String> = self.lock().map( |objs| objs.keys().cloned().collect()).unwrap_or_default();
        keys.sort();
        keys
    }
}

impl Default for MemoryStore {
    fn default()->Self { Self::new() }
}

impl ObjectStore for MemoryStore {
    fn name (&self)->String { "memory".to_string() }

    fn get (&self, key: &str)->Result<StoredObject> {
        self.lock()?.get(key).cloned().ok_or_else( || StoreError::NotFound( key.to_string()))
    }

    fn head (&self, key: &str)->Result<ObjectInfo> {
        self.lock()?.get(key).map( |o| o.info.clone()).ok_or_else( || StoreError::NotFound( key.to_string()))
    }

    fn put (&self, key: &str, data: Vec<u8>, metadata: Metadata)->Result<ObjectInfo> {
        self.put_dated( key, data, metadata, Utc::now())
    }

    fn list (&self, prefix: &str)->Result<Vec<ObjectInfo>> {
        Ok( self.lock()?.values().filter( |o| o.info.key.starts_with(prefix)).map( |o| o.info.clone()).collect() )
    }

    fn delete (&self, key: &str)->Result<()> {
        self.lock()?.remove(key).map( |_| ()).ok_or_else( || StoreError::NotFound( key.to_string()))
    }

    fn put_if_version (&self, key: &str, data: Vec<u8>, metadata: Metadata, expected: Option<&str>)->Result<ObjectInfo> {
        // check and insert under the same lock
        let mut objects = self.lock()?;
        check_version( key, objects.get(key).map( |o| o.info.version.as_str()), expected)?;

        let info = ObjectInfo {
            key: key.to_string(),
            size: data.len() as u64,
            last_modified: Utc::now(),
            version: self.next_version(),
            metadata
        };
        objects.insert( key.to_string(), StoredObject{ info: info.clone(), data });
        Ok(info)
    }
}

/* #endregion memory store */

/* #region file system store **********************************************************************************/

const META_DIR: &str = ".meta";

/// a store that maps keys to files below a root directory. User metadata is kept in JSON sidecar files
/// under `<root>/.meta/`. Object data is written atomically (write + rename).
/// Conditional puts are checked within this process but are not atomic across processes
pub struct FsStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

#[derive(Serialize,Deserialize,Default)]
struct MetaSidecar {
    metadata: Metadata,
    /// number of writes to this key. Part of the version so that versions differ even if two writes
    /// of the same size fall into the same file time tick
    #[serde(default)]
    generation: u64,
}

impl FsStore {
    pub fn new (root: impl AsRef<Path>)->Self {
        FsStore { root: root.as_ref().to_path_buf(), write_lock: Mutex::new(()) }
    }

    pub fn root (&self)->&Path { &self.root }

    fn data_path (&self, key: &str)->Result<PathBuf> {
        if key.is_empty() || key.starts_with('/') || key.split('/').any( |c| c == ".." || c == "." || c.is_empty() || c == META_DIR) {
            Err( StoreError::InvalidKey( key.to_string()))
        } else {
            Ok( self.root.join( key))
        }
    }

    fn meta_path (&self, key: &str)->PathBuf {
        self.root.join( META_DIR).join( format!("{key}.json"))
    }

    fn key_of (&self, path: &Path)->Option<String> {
        let rel = path.strip_prefix( &self.root).ok()?;
        let comps: Vec<&str> = rel.components().filter_map( |c| c.as_os_str().to_str()).collect();
        Some( comps.join("/"))
    }

    fn info (&self, key: &str, path: &Path)->Result<ObjectInfo> {
        let md = std::fs::metadata( path).map_err( |e| map_io_error( key, e))?;
        if !md.is_file() { return Err( StoreError::NotFound( key.to_string())) }

        let last_modified: DateTime<Utc> = md.modified().map( |t| t.date()).unwrap_or_else( |_| Utc::now());
        let sidecar = self.read_sidecar( key)?;
        let version = format!("{}-{}-{}", sidecar.generation, last_modified.timestamp_nanos_opt().unwrap_or(0), md.len());

        Ok( ObjectInfo { key: key.to_string(), size: md.len(), last_modified, version, metadata: sidecar.metadata } )
    }

    fn read_sidecar (&self, key: &str)->Result<MetaSidecar> {
        let meta_path = self.meta_path( key);
        if meta_path.is_file() {
            Ok( serde_json::from_str( &filepath_contents_as_string( &meta_path)?)? )
        } else {
            Ok( MetaSidecar::default() )
        }
    }

    /// callers have to hold the write lock
    fn write (&self, key: &str, path: &Path, data: Vec<u8>, metadata: Metadata)->Result<ObjectInfo> {
        let generation = self.read_sidecar( key)?.generation + 1;
        let sidecar = MetaSidecar { metadata, generation };
        write_file_atomic( &self.meta_path( key), serde_json::to_string( &sidecar)?.as_bytes())?;
        write_file_atomic( &path, &data)?;
        self.info( key, path)
    }

    fn lock (&self)->Result<std::sync::MutexGuard<'_,()>> {
        self.write_lock.lock().map_err( |_| StoreError::Transient("fs store lock poisoned".into()))
    }
}

fn map_io_error (key: &str, e: std::io::Error)->StoreError {
    if e.kind() == std::io::ErrorKind::NotFound {
        StoreError::NotFound( key.to_string())
    } else {
        StoreError::IOError(e)
    }
}

impl ObjectStore for FsStore {
    fn name (&self)->String { self.root.to_string_lossy().to_string() }

    fn get (&self, key: &str)->Result<StoredObject> {
        let path = self.data_path( key)?;
        let info = self.info( key, &path)?;
        let data = filepath_contents( &path).map_err( |e| map_io_error( key, e))?;
        Ok( StoredObject { info, data } )
    }

    fn head (&self, key: &str)->Result<ObjectInfo> {
        let path = self.data_path( key)?;
        self.info( key, &path)
    }

    fn put (&self, key: &str, data: Vec<u8>, metadata: Metadata)->Result<ObjectInfo> {
        let path = self.data_path( key)?;
        let _guard = self.lock()?;
        self.write( key, &path, data, metadata)
    }

    fn list (&self, prefix: &str)->Result<Vec<ObjectInfo>> {
        let skip_dir = |p: &Path| p.file_name().map( |n| n == META_DIR).unwrap_or(false);
        let mut infos = Vec::new();

        for path in files_below( &self.root, &skip_dir)? {
            if path.extension().map( |e| e == "tmp").unwrap_or(false) { continue } // in-flight atomic writes
            if let Some(key) = self.key_of( &path) {
                if key.starts_with( prefix) {
                    infos.push( self.info( &key, &path)?);
                }
            }
        }
        Ok(infos)
    }

    fn delete (&self, key: &str)->Result<()> {
        let path = self.data_path( key)?;
        let _guard = self.lock()?;
        std::fs::remove_file( &path).map_err( |e| map_io_error( key, e))?;

        let meta_path = self.meta_path( key);
        if meta_path.is_file() { std::fs::remove_file( meta_path)?; }
        Ok(())
    }

    fn put_if_version (&self, key: &str, data: Vec<u8>, metadata: Metadata, expected: Option<&str>)->Result<ObjectInfo> {
        let path = self.data_path( key)?;
        let _guard = self.lock()?;

        let current = match self.info( key, &path) {
            Ok(info) => Some(info.version),
            Err(StoreError::NotFound(_)) => None,
            Err(e) => return Err(e)
        };
        check_version( key, current.as_deref(), expected)?;
        self.write( key, &path, data, metadata)
    }
}

/* #endregion file system store */
