//! # Flat-file JSON store
//!
//! [`FileStore`] persists whole collections as JSON documents under a base
//! directory, one file per collection:
//!
//! ```text
//! <data_dir>/
//! ├── users.json        # every registered user
//! └── <username>.json   # one user's notes
//! ```
//!
//! A missing file reads as an empty collection. Writes replace the whole file
//! through a temporary sibling and a rename.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{NotesError, NotesResult};

#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Create the base directory if it does not exist yet.
    pub fn ensure_dir(&self) -> NotesResult<()> {
        fs::create_dir_all(&self.base).map_err(|source| NotesError::Io {
            path: self.base.clone(),
            source,
        })
    }

    /// `<base>/<name>.json`. Callers validate `name`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.base.join(format!("{}.json", name))
    }

    pub fn read<T>(&self, path: &Path) -> NotesResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(T::default()),
            Err(source) => {
                return Err(NotesError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        // `null` shows up in files written by older builds for empty lists
        let value: Option<T> = serde_json::from_slice(&data).map_err(|source| NotesError::Format {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(value.unwrap_or_default())
    }

    pub fn write<T>(&self, path: &Path, value: &T) -> NotesResult<()>
    where
        T: Serialize + ?Sized,
    {
        let data = serde_json::to_vec(value).map_err(|source| NotesError::Format {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| NotesError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &data).map_err(|source| NotesError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, path).map_err(|source| NotesError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
