// 📚 Cookbook Registry - name → entry
// Single source of truth for every ingredient and recipe known to the process.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

use crate::entry::{Entry, EntryKind, EntryPayload, Registered};

// ============================================================================
// ERRORS
// ============================================================================

/// Reasons an entry is refused admission. A refused entry never touches the
/// registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddError {
    #[error("malformed entry: {0}")]
    MalformedEntry(String),

    #[error("an entry named '{0}' already exists")]
    DuplicateName(String),

    #[error("recipe '{0}' must declare at least one required item")]
    EmptyRequiredItems(String),

    #[error("recipe '{recipe}' has an invalid required item at position {index}: {reason}")]
    InvalidRequiredItem {
        recipe: String,
        index: usize,
        reason: String,
    },

    #[error("ingredient '{name}' has an invalid cook time: {reason}")]
    InvalidCookTime { name: String, reason: String },

    #[error("unknown entry type '{0}'")]
    UnknownType(String),
}

impl AddError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        AddError::MalformedEntry(reason.into())
    }

    /// Stable identifier of the failure, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AddError::MalformedEntry(_) => "malformed_entry",
            AddError::DuplicateName(_) => "duplicate_name",
            AddError::EmptyRequiredItems(_) => "empty_required_items",
            AddError::InvalidRequiredItem { .. } => "invalid_required_item",
            AddError::InvalidCookTime { .. } => "invalid_cook_time",
            AddError::UnknownType(_) => "unknown_type",
        }
    }
}

// ============================================================================
// LISTING
// ============================================================================

/// Lightweight view of a registered entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub registered_at: DateTime<Utc>,
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Registry of all entries
///
/// Constructed once at startup and shared by reference (usually through an
/// `Arc`). Writers are serialized by the lock, so the duplicate check and the
/// insert of one `add` happen atomically. Readers never observe a half-added
/// entry.
///
/// Entries are append-only: there is no update and no delete.
#[derive(Debug, Default)]
pub struct Registry {
    entries: RwLock<HashMap<String, Registered>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Registry {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Validate an untyped payload and admit it.
    ///
    /// Checks run in a fixed order and the first failure wins:
    /// 1. structure (exactly name, type and one variant field)
    /// 2. name uniqueness
    /// 3. variant rules (required items / cook time / known type)
    pub fn add(&self, payload: &Value) -> Result<EntryKind, AddError> {
        let parsed = EntryPayload::parse(payload)?;

        let mut entries = self.write();
        if entries.contains_key(parsed.name) {
            return Err(AddError::DuplicateName(parsed.name.to_string()));
        }

        let entry = parsed.into_entry()?;
        let kind = entry.kind();
        Self::admit(&mut entries, entry);
        Ok(kind)
    }

    /// Admit an already-typed entry.
    ///
    /// Types rule out negative numbers; the remaining invariants are checked
    /// here.
    pub fn insert(&self, entry: Entry) -> Result<(), AddError> {
        if entry.name().is_empty() {
            return Err(AddError::malformed("field `name` must not be empty"));
        }

        let mut entries = self.write();
        if entries.contains_key(entry.name()) {
            return Err(AddError::DuplicateName(entry.name().to_string()));
        }

        if let Entry::Recipe(recipe) = &entry {
            if recipe.required_items.is_empty() {
                return Err(AddError::EmptyRequiredItems(recipe.name.clone()));
            }
            if let Some(index) = recipe.required_items.iter().position(|item| item.name.is_empty()) {
                return Err(AddError::InvalidRequiredItem {
                    recipe: recipe.name.clone(),
                    index,
                    reason: "missing or invalid `name`".to_string(),
                });
            }
        }

        Self::admit(&mut entries, entry);
        Ok(())
    }

    fn admit(entries: &mut HashMap<String, Registered>, entry: Entry) {
        let registered = Registered {
            entry,
            registered_at: Utc::now(),
        };
        entries.insert(registered.entry.name().to_string(), registered);
    }

    /// Exact, case-sensitive lookup
    pub fn get(&self, name: &str) -> Option<Entry> {
        self.read().get(name).map(|registered| registered.entry.clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// All registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Every entry with its type and admission time, sorted by name
    pub fn list(&self) -> Vec<EntryInfo> {
        let mut infos: Vec<EntryInfo> = self
            .read()
            .values()
            .map(|registered| EntryInfo {
                name: registered.entry.name().to_string(),
                kind: registered.entry.kind(),
                registered_at: registered.registered_at,
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Consistent read view held for the lifetime of the returned value.
    ///
    /// Adds block until every snapshot is dropped.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot { entries: self.read() }
    }

    // Insert is the last step of every write, so a poisoned map is never
    // half-updated.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Registered>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Registered>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Read-locked view of the registry.
pub struct Snapshot<'a> {
    entries: RwLockReadGuard<'a, HashMap<String, Registered>>,
}

impl Snapshot<'_> {
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name).map(|registered| &registered.entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
