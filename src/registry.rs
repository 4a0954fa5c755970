// src/registry.rs
//
// Live voice set with a one-deep rollback snapshot.
//
// The snapshot is taken at the first mutation after a completed tick, so a
// rollback undoes the whole batch of unflushed `play` calls. It outlives the
// tick: a voice that starts failing later still rolls back to it.

use std::collections::HashMap;

use crate::voice::{Voice, VoiceId};

#[derive(Debug, Default)]
pub struct VoiceRegistry {
    voices: HashMap<VoiceId, Voice>,

    /// Last known-good voice set. Absent until the first `play`, and after
    /// `clear`.
    backup: Option<HashMap<VoiceId, Voice>>,

    /// Set by the first mutation since the last completed tick.
    dirty: bool,
}

impl VoiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the voice under its id.
    pub fn play(&mut self, voice: Voice) {
        if !self.dirty {
            self.backup = Some(self.voices.clone());
            self.dirty = true;
        }
        self.voices.insert(voice.id.clone(), voice);
    }

    /// Remove every voice. Not undoable: any pending snapshot is dropped too.
    pub fn clear(&mut self) {
        self.voices.clear();
        self.backup = None;
        self.dirty = false;
    }

    /// Copy the snapshot back in. The snapshot is kept, so repeated faults
    /// keep landing on the same set. Returns `false` if there was none.
    pub fn restore(&mut self) -> bool {
        match &self.backup {
            Some(backup) => {
                self.voices = backup.clone();
                true
            }
            None => false,
        }
    }

    /// End the current batch: the next `play` takes a fresh snapshot.
    pub fn flush(&mut self) {
        self.dirty = false;
    }

    // -------------------------------
    // MARK: Accessors
    // -------------------------------

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn has_backup(&self) -> bool {
        self.backup.is_some()
    }

    pub fn get(&self, id: &str) -> Option<&Voice> {
        self.voices.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.voices.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// The current voices, detached from the map so a tick can iterate
    /// while the registry is restored underneath it.
    pub fn voices(&self) -> Vec<Voice> {
        self.voices.values().cloned().collect()
    }

    /// `id: timbre` lines, sorted by id.
    pub fn summary(&self) -> Vec<String> {
        let mut ids: Vec<&VoiceId> = self.voices.keys().collect();
        ids.sort();
        ids.into_iter()
            .map(|id| format!("{}: {}", id, self.voices[id].timbre))
            .collect()
    }
}
