//! Concentrated-liquidity position lifecycle: create, remove and fungify.

use crate::domain::{Attributes, BlockEvent, PoolPosition, PositionId};
use crate::store::{EntityStore, StoreError};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const CONCENTRATED_LIQUIDITY_MODULE: &str = "concentratedliquidity";

/// Why a position event was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    WrongModule(Option<String>),
    MissingAttribute(&'static str),
    PoolNotTracked(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionOutcome {
    Opened(PositionId),
    Closed(PositionId),
    NotFound(PositionId),
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FungifyOutcome {
    /// Sources consumed and the merged position created.
    Merged {
        merged: PositionId,
        removed: Vec<PositionId>,
        missing: Vec<PositionId>,
    },
    /// The first source was absent, so no merged position could be derived.
    /// Sources in `removed` stay deleted.
    SampleMissing {
        sample: PositionId,
        removed: Vec<PositionId>,
        missing: Vec<PositionId>,
    },
    Ignored(IgnoreReason),
}

pub struct PositionLifecycleProjector {
    store: Arc<dyn EntityStore>,
    pools: HashSet<String>,
}

impl PositionLifecycleProjector {
    pub fn new(store: Arc<dyn EntityStore>, pools: HashSet<String>) -> Self {
        Self { store, pools }
    }

    /// Open a position. Writes unconditionally, replacing any entity with the same
    /// id, so a replayed create reopens a position that was closed in between.
    ///
    /// # Errors
    /// Returns an error if the store write fails.
    pub async fn create(&self, input: &BlockEvent) -> Result<PositionOutcome, StoreError> {
        let attrs = input.event.attributes();
        let (pool_id, position_id) = match self.position_target(&attrs) {
            Ok(target) => target,
            Err(reason) => return Ok(PositionOutcome::Ignored(reason)),
        };

        let id = PositionId::composite(pool_id, position_id);
        let position = PoolPosition::open(
            id.clone(),
            pool_id.to_string(),
            input.block.height,
            input.block.time_ms(),
        );
        self.store.create_position(&position).await?;
        info!(id = %id, height = %input.block.height, "Position added");

        Ok(PositionOutcome::Opened(id))
    }

    /// Mark a tracked position closed at the event's block.
    ///
    /// # Errors
    /// Returns an error if the store lookup or save fails.
    pub async fn remove(&self, input: &BlockEvent) -> Result<PositionOutcome, StoreError> {
        let attrs = input.event.attributes();
        let (pool_id, position_id) = match self.position_target(&attrs) {
            Ok(target) => target,
            Err(reason) => return Ok(PositionOutcome::Ignored(reason)),
        };

        let id = PositionId::composite(pool_id, position_id);
        let Some(mut position) = self.store.get_position(&id).await? else {
            warn!(id = %id, "Position not found when trying to close it");
            return Ok(PositionOutcome::NotFound(id));
        };

        position.close(input.block.height, input.block.time_ms());
        if !self.store.save_position(&position).await? {
            warn!(id = %id, "Position vanished before close was saved");
            return Ok(PositionOutcome::NotFound(id));
        }
        info!(id = %id, closed_height = %input.block.height, "Position closed");

        Ok(PositionOutcome::Closed(id))
    }

    /// Merge the positions in `position_ids` into `new_position_id`.
    ///
    /// Sources are deleted one by one; an absent source is logged and skipped. The
    /// merged position takes its pool from the first source as read before its
    /// deletion. Deletions are not rolled back when that source is absent.
    ///
    /// # Errors
    /// Returns an error if a store call fails; deletions made before the failure
    /// are kept.
    pub async fn fungify(&self, input: &BlockEvent) -> Result<FungifyOutcome, StoreError> {
        let attrs = input.event.attributes();
        let pool_id = match self.tracked_pool(&attrs) {
            Ok(pool_id) => pool_id,
            Err(reason) => return Ok(FungifyOutcome::Ignored(reason)),
        };
        let Some(source_ids) = attrs.non_empty("position_ids").map(split_position_ids) else {
            warn!("Fungify event missing position_ids");
            return Ok(FungifyOutcome::Ignored(IgnoreReason::MissingAttribute(
                "position_ids",
            )));
        };
        let Some(new_position_id) = attrs.non_empty("new_position_id") else {
            warn!("Fungify event missing new_position_id");
            return Ok(FungifyOutcome::Ignored(IgnoreReason::MissingAttribute(
                "new_position_id",
            )));
        };
        if source_ids.is_empty() {
            warn!("Fungify event has an empty position_ids list");
            return Ok(FungifyOutcome::Ignored(IgnoreReason::MissingAttribute(
                "position_ids",
            )));
        }

        let sources: Vec<PositionId> = source_ids
            .iter()
            .map(|source| PositionId::composite(pool_id, source))
            .collect();

        let mut sample = None;
        let mut removed = Vec::new();
        let mut missing = Vec::new();
        for (idx, id) in sources.iter().enumerate() {
            match self.store.get_position(id).await? {
                Some(old) => {
                    self.store.remove_position(id).await?;
                    info!(id = %id, "Removed fungified source position");
                    if idx == 0 {
                        sample = Some(old);
                    }
                    removed.push(id.clone());
                }
                None => {
                    warn!(id = %id, "Fungified source position not found");
                    missing.push(id.clone());
                }
            }
        }

        let Some(sample) = sample else {
            error!(
                sample = %sources[0],
                removed = removed.len(),
                "Sample source position not found, merged position not created"
            );
            return Ok(FungifyOutcome::SampleMissing {
                sample: sources[0].clone(),
                removed,
                missing,
            });
        };

        let merged = PositionId::composite(&sample.pool_id, new_position_id);
        self.store
            .create_position(&PoolPosition::open(
                merged.clone(),
                sample.pool_id,
                input.block.height,
                input.block.time_ms(),
            ))
            .await?;
        info!(id = %merged, sources = removed.len(), "Created fungified position");

        Ok(FungifyOutcome::Merged {
            merged,
            removed,
            missing,
        })
    }

    /// Shared precondition: concentrated-liquidity module and an allow-listed pool.
    fn tracked_pool<'a>(&self, attrs: &'a Attributes) -> Result<&'a str, IgnoreReason> {
        let module = attrs.get("module");
        if module != Some(CONCENTRATED_LIQUIDITY_MODULE) {
            return Err(IgnoreReason::WrongModule(module.map(str::to_string)));
        }
        let pool_id = attrs
            .non_empty("pool_id")
            .ok_or(IgnoreReason::MissingAttribute("pool_id"))?;
        if !self.pools.contains(pool_id) {
            return Err(IgnoreReason::PoolNotTracked(pool_id.to_string()));
        }
        Ok(pool_id)
    }

    fn position_target<'a>(
        &self,
        attrs: &'a Attributes,
    ) -> Result<(&'a str, &'a str), IgnoreReason> {
        let pool_id = self.tracked_pool(attrs)?;
        let position_id = attrs
            .non_empty("position_id")
            .ok_or(IgnoreReason::MissingAttribute("position_id"))?;
        Ok((pool_id, position_id))
    }
}

/// Split a comma-separated id list, trimming whitespace and dropping empty entries.
pub fn split_position_ids(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .collect()
}
