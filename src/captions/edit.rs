use std::collections::BTreeMap;

use serde::Serialize;

use super::error::{CaptionError, CaptionResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    #[default]
    Viewing,
    Editing,
}

/// Working copy of one segment's text, pending save or cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    opened_with: String,
    working: String,
}

impl EditSession {
    fn new(text: &str) -> Self {
        Self {
            opened_with: text.to_string(),
            working: text.to_string(),
        }
    }

    pub fn working_text(&self) -> &str {
        &self.working
    }

    pub fn is_modified(&self) -> bool {
        self.working != self.opened_with
    }

    /// Text that a save commits: the working copy, trimmed. May be empty.
    pub fn committed_text(&self) -> String {
        self.working.trim().to_string()
    }
}

/// Open edit sessions keyed by segment index.
#[derive(Debug, Clone, Default)]
pub struct EditSessions {
    sessions: BTreeMap<usize, EditSession>,
}

impl EditSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session for `index`, or returns the one already open.
    pub fn open(&mut self, index: usize, current_text: &str) -> &EditSession {
        self.sessions
            .entry(index)
            .or_insert_with(|| EditSession::new(current_text))
    }

    pub fn get(&self, index: usize) -> Option<&EditSession> {
        self.sessions.get(&index)
    }

    pub fn mode(&self, index: usize) -> EditMode {
        if self.sessions.contains_key(&index) {
            EditMode::Editing
        } else {
            EditMode::Viewing
        }
    }

    pub fn set_working_text(&mut self, index: usize, text: impl Into<String>) -> CaptionResult<()> {
        let session = self
            .sessions
            .get_mut(&index)
            .ok_or(CaptionError::NoEditSession { index })?;
        session.working = text.into();
        Ok(())
    }

    pub fn close(&mut self, index: usize) -> CaptionResult<EditSession> {
        self.sessions
            .remove(&index)
            .ok_or(CaptionError::NoEditSession { index })
    }

    /// Drops the session of the removed segment and shifts later ones down by one.
    pub fn rekey_after_delete(&mut self, removed: usize) {
        let sessions = std::mem::take(&mut self.sessions);
        self.sessions = sessions
            .into_iter()
            .filter(|(index, _)| *index != removed)
            .map(|(index, session)| {
                if index > removed {
                    (index - 1, session)
                } else {
                    (index, session)
                }
            })
            .collect();
    }

    pub fn clear(&mut self) {
        self.sessions.clear();
    }

    pub fn open_indices(&self) -> Vec<usize> {
        self.sessions.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
