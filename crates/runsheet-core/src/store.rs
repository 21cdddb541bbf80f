//! Block storage seam and the timeline operations built on it.
//!
//! The engine does not own persistence. [`BlockStore`] is the narrow
//! surface it needs from whatever holds the records; [`MemoryStore`] backs
//! the CLI and the tests.
//!
//! Edits go through a single [`BlockStore::update`] call keyed by block
//! id, so a failure part-way through an edit cannot lose the block.

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::bucket::{BucketedTimeline, bucketize};
use crate::error::{Result, RunsheetError};
use crate::models::{BlockStatus, EventInfo, TimelineBlock};
use crate::validate::{BlockDraft, ValidBlock};

/// Storage operations the engine relies on.
pub trait BlockStore {
    /// All blocks recorded against `event_id`, in no particular order.
    fn list(&self, event_id: &str) -> Result<Vec<TimelineBlock>>;

    fn get(&self, id: &str) -> Result<Option<TimelineBlock>>;

    /// Persist a new block and return it with its assigned id.
    fn insert(&mut self, block: ValidBlock) -> Result<TimelineBlock>;

    /// Replace every editable field of block `id` in one step. `id` and
    /// `created_at` are kept.
    fn update(&mut self, id: &str, block: ValidBlock) -> Result<TimelineBlock>;

    /// Remove block `id`. Returns `false` when it did not exist.
    fn delete(&mut self, id: &str) -> Result<bool>;
}

fn into_block(id: String, created_at: Option<String>, valid: ValidBlock) -> TimelineBlock {
    TimelineBlock {
        id,
        event_id: valid.event_id,
        title: valid.title,
        start_time: valid.start_time,
        end_time: valid.end_time,
        location: valid.location,
        description: valid.description,
        personnel: valid.personnel,
        equipment: valid.equipment,
        notes: valid.notes,
        status: valid.status,
        created_at,
    }
}

/// In-memory store keyed by block id.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    blocks: BTreeMap<String, TimelineBlock>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records, keeping their ids.
    pub fn with_blocks(blocks: impl IntoIterator<Item = TimelineBlock>) -> Self {
        Self {
            blocks: blocks.into_iter().map(|b| (b.id.clone(), b)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Every record, ordered by id.
    pub fn into_blocks(self) -> Vec<TimelineBlock> {
        self.blocks.into_values().collect()
    }
}

impl BlockStore for MemoryStore {
    fn list(&self, event_id: &str) -> Result<Vec<TimelineBlock>> {
        Ok(self
            .blocks
            .values()
            .filter(|b| b.event_id == event_id)
            .cloned()
            .collect())
    }

    fn get(&self, id: &str) -> Result<Option<TimelineBlock>> {
        Ok(self.blocks.get(id).cloned())
    }

    fn insert(&mut self, block: ValidBlock) -> Result<TimelineBlock> {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
        let block = into_block(id.clone(), Some(created_at), block);
        self.blocks.insert(id, block.clone());
        Ok(block)
    }

    fn update(&mut self, id: &str, block: ValidBlock) -> Result<TimelineBlock> {
        let slot = self
            .blocks
            .get_mut(id)
            .ok_or_else(|| RunsheetError::NotFound(id.to_string()))?;
        *slot = into_block(id.to_string(), slot.created_at.take(), block);
        Ok(slot.clone())
    }

    fn delete(&mut self, id: &str) -> Result<bool> {
        Ok(self.blocks.remove(id).is_some())
    }
}

/// Timeline operations for one event on top of a [`BlockStore`].
pub struct TimelineService<S> {
    store: S,
}

impl<S: BlockStore> TimelineService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Validate `draft` and insert it. Nothing is written on failure.
    pub fn create(&mut self, draft: &BlockDraft) -> Result<TimelineBlock> {
        let valid = draft.validate().map_err(RunsheetError::Validation)?;
        let block = self.store.insert(valid)?;
        info!(id = %block.id, title = %block.title, "created block");
        Ok(block)
    }

    /// Validate `draft` and apply it to block `id` with one update call.
    pub fn edit(&mut self, id: &str, draft: &BlockDraft) -> Result<TimelineBlock> {
        let valid = draft.validate().map_err(RunsheetError::Validation)?;
        let block = self.store.update(id, valid)?;
        info!(id = %block.id, "updated block");
        Ok(block)
    }

    /// Change only the status of block `id`.
    pub fn set_status(&mut self, id: &str, status: BlockStatus) -> Result<TimelineBlock> {
        let current = self
            .store
            .get(id)?
            .ok_or_else(|| RunsheetError::NotFound(id.to_string()))?;

        let valid = ValidBlock {
            event_id: current.event_id,
            title: current.title,
            start_time: current.start_time,
            end_time: current.end_time,
            location: current.location,
            description: current.description,
            personnel: current.personnel,
            equipment: current.equipment,
            notes: current.notes,
            status,
        };
        self.store.update(id, valid)
    }

    pub fn delete(&mut self, id: &str) -> Result<()> {
        if self.store.delete(id)? {
            info!(id, "deleted block");
            Ok(())
        } else {
            Err(RunsheetError::NotFound(id.to_string()))
        }
    }

    /// Read the event's blocks and bucket them by day.
    pub fn load(&self, event: &EventInfo) -> Result<BucketedTimeline> {
        let blocks = self.store.list(&event.id)?;
        debug!(event = %event.id, blocks = blocks.len(), "loaded blocks");
        bucketize(event.start_date, event.end_date, &blocks)
    }

    /// Delete every id in `ids`, skipping ones already gone. Returns how
    /// many were removed.
    pub fn purge<I, T>(&mut self, ids: I) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut removed = 0;
        for id in ids {
            if self.store.delete(id.as_ref())? {
                removed += 1;
            }
        }
        info!(removed, "purged blocks");
        Ok(removed)
    }

    /// Delete all ghost and out-of-range blocks of `event`.
    pub fn purge_ghosts(&mut self, event: &EventInfo) -> Result<usize> {
        let ids = self.load(event)?.cleanup_ids();
        self.purge(ids)
    }
}
