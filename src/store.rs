//! Contact and card store.
//!
//! An ordered in-memory contact list plus a keyed mapping of named card
//! variants, persisted as a single JSON document under
//! `~/.tapdeck/store.json`: loaded on open, written atomically on save.
//!
//! The store is deliberately a pass-through keyed mapping, not a
//! database. The one piece of logic it owns is the follow-up date-field
//! transition: `snoozedUntil` is cleared when status leaves `snoozed`,
//! and `followUpDate` records the instant of a transition to `done`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::types::{CardProfile, Config, Contact, FollowUpStatus};
use crate::util::atomic_write_str;

const STORE_VERSION: u32 = 1;

/// On-disk document shape. Unknown fields are ignored so older builds
/// can read files written by newer ones.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreFile {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    contacts: Vec<Contact>,
    #[serde(default)]
    cards: BTreeMap<String, CardProfile>,
}

fn default_version() -> u32 {
    STORE_VERSION
}

#[derive(Debug)]
pub struct ContactStore {
    path: Option<PathBuf>,
    contacts: Vec<Contact>,
    cards: BTreeMap<String, CardProfile>,
}

impl ContactStore {
    /// A store with no backing file; `save` is a no-op. Used by tests
    /// and by callers that manage persistence themselves.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            contacts: Vec::new(),
            cards: BTreeMap::new(),
        }
    }

    /// Open the store at the configured (or default) location.
    pub fn open_default() -> Result<Self, StoreError> {
        let config = Config::load();
        let path = config
            .store_path
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_path);
        Self::open(path)
    }

    /// Open a store file, treating a missing file as an empty store.
    /// Corrupt JSON is an error, not silent data loss.
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        let file = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str::<StoreFile>(&content)
                .map_err(|source| StoreError::Parse {
                    path: path.clone(),
                    source,
                })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("store: no file at {}, starting empty", path.display());
                StoreFile {
                    version: STORE_VERSION,
                    ..StoreFile::default()
                }
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        log::debug!(
            "store: loaded {} contacts, {} cards from {}",
            file.contacts.len(),
            file.cards.len(),
            path.display()
        );
        Ok(Self {
            path: Some(path),
            contacts: file.contacts,
            cards: file.cards,
        })
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_default()
            .join(".tapdeck")
            .join("store.json")
    }

    /// Write the store to its backing file atomically. No-op without one.
    pub fn save(&self) -> Result<(), StoreError> {
        let Some(ref path) = self.path else {
            log::debug!("store: in-memory, skipping save");
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let file = StoreFile {
            version: STORE_VERSION,
            contacts: self.contacts.clone(),
            cards: self.cards.clone(),
        };
        let content = serde_json::to_string_pretty(&file).map_err(StoreError::Serialize)?;
        atomic_write_str(path, &content)?;
        Ok(())
    }

    // -- contacts ----------------------------------------------------------

    /// Point-in-time snapshot the aggregators read.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn get(&self, id: &str) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    /// Add a contact. An empty id gets a fresh UUID; an empty `taggedAt`
    /// gets the current instant. Returns the stored record.
    pub fn add(&mut self, mut contact: Contact) -> Result<&Contact, StoreError> {
        if contact.contact_name.trim().is_empty() {
            return Err(StoreError::InvalidRecord(
                "contact name must not be empty".to_string(),
            ));
        }
        if contact.id.is_empty() {
            contact.id = uuid::Uuid::new_v4().to_string();
        }
        if self.contacts.iter().any(|c| c.id == contact.id) {
            return Err(StoreError::InvalidRecord(format!(
                "duplicate contact id: {}",
                contact.id
            )));
        }
        if contact.tagged_at.is_empty() {
            contact.tagged_at = Utc::now().to_rfc3339();
        }
        self.contacts.push(contact);
        Ok(self.contacts.last().expect("just pushed"))
    }

    /// Replace a contact by id. `taggedAt` is immutable: the stored
    /// value wins over whatever the update carries.
    pub fn update(&mut self, contact: Contact) -> Result<(), StoreError> {
        let existing = self
            .contacts
            .iter_mut()
            .find(|c| c.id == contact.id)
            .ok_or_else(|| StoreError::ContactNotFound(contact.id.clone()))?;
        let tagged_at = existing.tagged_at.clone();
        *existing = contact;
        existing.tagged_at = tagged_at;
        Ok(())
    }

    pub fn delete(&mut self, id: &str) -> Result<Contact, StoreError> {
        let idx = self
            .contacts
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::ContactNotFound(id.to_string()))?;
        Ok(self.contacts.remove(idx))
    }

    /// Set a contact's follow-up status, applying the date-field
    /// transition rules.
    pub fn set_follow_up_status(
        &mut self,
        id: &str,
        status: FollowUpStatus,
    ) -> Result<(), StoreError> {
        let now = Utc::now();
        let contact = self
            .contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::ContactNotFound(id.to_string()))?;
        apply_status_transition(contact, status, now);
        Ok(())
    }

    /// Set the status on many contacts at once. Unknown ids are skipped;
    /// returns how many records changed.
    pub fn bulk_set_follow_up_status(&mut self, ids: &[String], status: FollowUpStatus) -> usize {
        let now = Utc::now();
        let mut updated = 0;
        for contact in &mut self.contacts {
            if ids.iter().any(|id| *id == contact.id) {
                apply_status_transition(contact, status, now);
                updated += 1;
            }
        }
        updated
    }

    /// Set a due date and mark the follow-up pending.
    pub fn schedule_follow_up(&mut self, id: &str, due: &str) -> Result<(), StoreError> {
        let now = Utc::now();
        let contact = self
            .contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::ContactNotFound(id.to_string()))?;
        contact.follow_up_due_date = Some(due.to_string());
        apply_status_transition(contact, FollowUpStatus::Pending, now);
        Ok(())
    }

    /// Snooze a follow-up until the given instant.
    pub fn snooze_follow_up(&mut self, id: &str, until: &str) -> Result<(), StoreError> {
        let now = Utc::now();
        let contact = self
            .contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::ContactNotFound(id.to_string()))?;
        apply_status_transition(contact, FollowUpStatus::Snoozed, now);
        contact.snoozed_until = Some(until.to_string());
        Ok(())
    }

    // -- cards -------------------------------------------------------------

    pub fn cards(&self) -> &BTreeMap<String, CardProfile> {
        &self.cards
    }

    /// Save a named card variant, last write wins.
    pub fn save_card(&mut self, mut card: CardProfile) -> Result<(), StoreError> {
        if card.name.trim().is_empty() {
            return Err(StoreError::InvalidRecord(
                "card name must not be empty".to_string(),
            ));
        }
        card.updated_at = Utc::now().to_rfc3339();
        self.cards.insert(card.name.clone(), card);
        Ok(())
    }

    pub fn delete_card(&mut self, name: &str) -> Result<CardProfile, StoreError> {
        self.cards
            .remove(name)
            .ok_or_else(|| StoreError::CardNotFound(name.to_string()))
    }
}

/// Apply the follow-up status transition rules to one contact.
///
/// `snoozedUntil` survives only while the status stays `snoozed`;
/// `followUpDate` records the instant of a transition into `done` and is
/// otherwise left untouched (a record already done keeps its original
/// completion instant).
pub(crate) fn apply_status_transition(
    contact: &mut Contact,
    status: FollowUpStatus,
    now: DateTime<Utc>,
) {
    if status != FollowUpStatus::Snoozed {
        contact.snoozed_until = None;
    }
    if status == FollowUpStatus::Done && contact.follow_up_status != FollowUpStatus::Done {
        contact.follow_up_date = Some(now.to_rfc3339());
    }
    contact.follow_up_status = status;
}
