//! Per-user note collections.

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use notes_types::Note;
use parking_lot::Mutex;

use crate::error::{NotesError, NotesResult};
use crate::store::FileStore;
use crate::users::validate_username;

pub struct NoteRepository {
    store: FileStore,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl NoteRepository {
    pub fn new(store: FileStore) -> Self {
        Self {
            store,
            locks: DashMap::new(),
        }
    }

    fn path(&self, username: &str) -> NotesResult<PathBuf> {
        validate_username(username)?;
        Ok(self.store.path_for(username))
    }

    fn lock_for(&self, username: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(username.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    pub fn load(&self, username: &str) -> NotesResult<Vec<Note>> {
        let path = self.path(username)?;
        self.store.read(&path)
    }

    pub fn save(&self, username: &str, notes: &[Note]) -> NotesResult<()> {
        let path = self.path(username)?;
        self.store.write(&path, notes)
    }

    pub fn find(&self, username: &str, name: &str) -> NotesResult<Option<Note>> {
        Ok(self.load(username)?.into_iter().find(|n| n.name == name))
    }

    pub fn add(&self, username: &str, name: &str, content: &str) -> NotesResult<()> {
        let lock = self.lock_for(username);
        let _guard = lock.lock();

        let mut notes = self.load(username)?;
        if notes.iter().any(|n| n.name == name) {
            return Err(NotesError::DuplicateName);
        }
        notes.push(Note::new(name, content));
        self.save(username, &notes)
    }

    /// Rename and rewrite the first note called `old_name`. A missing note
    /// leaves the collection unchanged. The new name is not checked for
    /// uniqueness.
    pub fn edit(
        &self,
        username: &str,
        old_name: &str,
        new_name: &str,
        new_content: &str,
    ) -> NotesResult<()> {
        let lock = self.lock_for(username);
        let _guard = lock.lock();

        let mut notes = self.load(username)?;
        if let Some(note) = notes.iter_mut().find(|n| n.name == old_name) {
            note.name = new_name.to_string();
            note.content = new_content.to_string();
        }
        self.save(username, &notes)
    }

    pub fn delete(&self, username: &str, name: &str) -> NotesResult<()> {
        let lock = self.lock_for(username);
        let _guard = lock.lock();

        let mut notes = self.load(username)?;
        if let Some(pos) = notes.iter().position(|n| n.name == name) {
            notes.remove(pos);
        }
        self.save(username, &notes)
    }
}
