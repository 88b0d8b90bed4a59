//! The record store proper.

use crate::error::{StoreError, StoreResult};
use fauxcrm_types::Entity;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Version expectation for a guarded write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionGuard {
    /// Unconditional overwrite, explicitly opted into by the caller
    Any,
    /// Write only if the stored version equals this token
    IfVersion(u64),
}

/// Mapping from entity-type name to a mapping from record id to record.
///
/// Cloning shares the underlying tables. Reads hand out deep copies, so a
/// query evaluates over a consistent point-in-time view and mutating a
/// result never mutates stored data.
#[derive(Clone, Default)]
pub struct RecordStore {
    tables: Arc<RwLock<HashMap<String, IndexMap<Uuid, Entity>>>>,
    version_counter: Arc<AtomicU64>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new record, assigning it the next row version.
    ///
    /// A nil id is replaced by a fresh one. Returns the id and the version
    /// assigned.
    pub fn create(&self, mut entity: Entity) -> StoreResult<(Uuid, u64)> {
        if entity.id.is_nil() {
            entity.id = Uuid::new_v4();
        }
        // The lock is held across counter bump and insert so no reader can
        // observe a record whose version is not yet the table's newest.
        let mut tables = self.tables.write();
        let table = tables.entry(entity.logical_name.to_lowercase()).or_default();
        if table.contains_key(&entity.id) {
            return Err(StoreError::DuplicateRecord {
                logical_name: entity.logical_name.clone(),
                id: entity.id,
            });
        }
        let version = self.version_counter.fetch_add(1, Ordering::SeqCst) + 1;
        entity.row_version = version;
        let id = entity.id;
        table.insert(id, entity);
        Ok((id, version))
    }

    /// Merge the given attributes into a stored record.
    ///
    /// Guarded updates compare `guard` against the stored version first; a
    /// mismatch is a [`StoreError::ConcurrencyConflict`], never a silent
    /// overwrite. A successful update bumps the row version.
    pub fn update(&self, patch: &Entity, guard: VersionGuard) -> StoreResult<u64> {
        let mut tables = self.tables.write();
        let record = Self::record_mut(&mut tables, &patch.logical_name, patch.id)?;
        Self::check_guard(record, guard)?;
        record.merge_attributes(patch);
        let version = self.version_counter.fetch_add(1, Ordering::SeqCst) + 1;
        record.row_version = version;
        Ok(version)
    }

    /// Remove a single attribute from a stored record (the update path's
    /// representation of an explicit null). Bumps the row version.
    pub fn clear_attribute(
        &self,
        logical_name: &str,
        id: Uuid,
        attribute: &str,
        guard: VersionGuard,
    ) -> StoreResult<u64> {
        let mut tables = self.tables.write();
        let record = Self::record_mut(&mut tables, logical_name, id)?;
        Self::check_guard(record, guard)?;
        record.set(attribute, None);
        let version = self.version_counter.fetch_add(1, Ordering::SeqCst) + 1;
        record.row_version = version;
        Ok(version)
    }

    /// Delete a record, optionally guarded.
    pub fn delete(&self, logical_name: &str, id: Uuid, guard: VersionGuard) -> StoreResult<()> {
        let mut tables = self.tables.write();
        {
            let record = Self::record_mut(&mut tables, logical_name, id)?;
            Self::check_guard(record, guard)?;
        }
        tables
            .get_mut(&logical_name.to_lowercase())
            .map(|table| table.shift_remove(&id));
        Ok(())
    }

    /// Row lookup by id. Returns a deep copy.
    pub fn get(&self, logical_name: &str, id: Uuid) -> Option<Entity> {
        self.tables
            .read()
            .get(&logical_name.to_lowercase())
            .and_then(|table| table.get(&id))
            .cloned()
    }

    /// Point-in-time snapshot of every row of a type, in insertion order.
    /// An unknown type yields an empty snapshot.
    pub fn rows_of_type(&self, logical_name: &str) -> Vec<Entity> {
        self.tables
            .read()
            .get(&logical_name.to_lowercase())
            .map(|table| table.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Stored row version, if the record exists.
    pub fn version_of(&self, logical_name: &str, id: Uuid) -> Option<u64> {
        self.tables
            .read()
            .get(&logical_name.to_lowercase())
            .and_then(|table| table.get(&id))
            .map(|record| record.row_version)
    }

    /// Whether a stored record holds a (non-null) value for `attribute`.
    pub fn contains_attribute(&self, logical_name: &str, id: Uuid, attribute: &str) -> bool {
        self.tables
            .read()
            .get(&logical_name.to_lowercase())
            .and_then(|table| table.get(&id))
            .is_some_and(|record| record.contains(attribute))
    }

    /// Number of stored rows of a type.
    pub fn count_of_type(&self, logical_name: &str) -> usize {
        self.tables
            .read()
            .get(&logical_name.to_lowercase())
            .map_or(0, IndexMap::len)
    }

    fn record_mut<'t>(
        tables: &'t mut HashMap<String, IndexMap<Uuid, Entity>>,
        logical_name: &str,
        id: Uuid,
    ) -> StoreResult<&'t mut Entity> {
        tables
            .get_mut(&logical_name.to_lowercase())
            .and_then(|table| table.get_mut(&id))
            .ok_or_else(|| StoreError::MissingRecord {
                logical_name: logical_name.to_string(),
                id,
            })
    }

    fn check_guard(record: &Entity, guard: VersionGuard) -> StoreResult<()> {
        match guard {
            VersionGuard::Any => Ok(()),
            VersionGuard::IfVersion(expected) if expected == record.row_version => Ok(()),
            VersionGuard::IfVersion(expected) => Err(StoreError::ConcurrencyConflict {
                logical_name: record.logical_name.clone(),
                id: record.id,
                expected,
                actual: record.row_version,
            }),
        }
    }
}
