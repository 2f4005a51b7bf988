//! # Chunk Lifecycle Manager
//!
//! Owns the active chunks and keeps them equal to the window
//! `[current - chunks_behind, current + chunks_ahead]` around the
//! player's chunk.
//!
//! ## Per-Tick Contract
//!
//! - `advance` is cheap when the player stays inside its chunk.
//! - On a chunk change, missing chunks are generated (ahead first) and
//!   every chunk outside the window is retired, on either side.
//! - Generation is synchronous. A large `chunks_ahead` costs tick latency.
//!
//! Reversing direction or teleporting works the same way: chunks are
//! self-contained, so the order in which they are generated is irrelevant.

use std::collections::HashMap;
use std::ops::RangeInclusive;

use tracing::{debug, info};

use crate::chunk::{Chunk, ChunkIndex};
use crate::config::CityConfig;
use crate::error::{CityError, CityResult};
use crate::generator::ChunkGenerator;

/// Running totals for the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamingStats {
    /// Chunks generated since construction.
    pub generated_this_session: u64,
    /// Chunks retired since construction.
    pub retired_this_session: u64,
    /// Largest number of simultaneously active chunks.
    pub peak_active: usize,
    /// Buildings generated across all chunks.
    pub buildings_generated: u64,
    /// Road segments generated across all chunks.
    pub roads_generated: u64,
}

/// What one `initialize` / `advance` call changed.
#[derive(Debug)]
pub struct ChunkTransition {
    /// Player chunk before the call, `None` on first initialize.
    pub previous: Option<ChunkIndex>,
    /// Player chunk after the call.
    pub current: ChunkIndex,
    /// Chunks generated by the call, in generation order.
    pub created: Vec<ChunkIndex>,
    /// Chunks removed by the call, ascending by index. Dropping them
    /// releases their geometry.
    pub retired: Vec<Chunk>,
}

impl ChunkTransition {
    fn unchanged(current: ChunkIndex) -> Self {
        Self {
            previous: Some(current),
            current,
            created: Vec::new(),
            retired: Vec::new(),
        }
    }

    /// Returns true if the player crossed into another chunk.
    #[must_use]
    pub fn crossed_boundary(&self) -> bool {
        self.previous != Some(self.current)
    }

    /// Returns true if nothing was created or retired.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.retired.is_empty()
    }
}

/// Streams chunks in and out around the player.
pub struct ChunkManager {
    generator: ChunkGenerator,
    active: HashMap<ChunkIndex, Chunk>,
    current: Option<ChunkIndex>,
    stats: StreamingStats,
}

impl ChunkManager {
    /// Creates a manager with no active chunks.
    ///
    /// # Errors
    ///
    /// Returns [`CityError::Config`] if `config` fails validation.
    pub fn new(config: CityConfig) -> CityResult<Self> {
        let generator = ChunkGenerator::new(config)?;
        let window = generator.config().chunks_behind as usize + generator.config().chunks_ahead as usize + 1;

        Ok(Self {
            generator,
            active: HashMap::with_capacity(window),
            current: None,
            stats: StreamingStats::default(),
        })
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &CityConfig {
        self.generator.config()
    }

    /// The generator used for new chunks.
    #[must_use]
    pub const fn generator(&self) -> &ChunkGenerator {
        &self.generator
    }

    /// Generates the full window around `player_z`.
    ///
    /// Can be called again to restart elsewhere; chunks outside the new
    /// window are retired.
    ///
    /// # Errors
    ///
    /// Returns [`CityError::NonFinitePosition`] if `player_z` is NaN or
    /// infinite, and [`CityError::PositionOutOfRange`] if the window around
    /// it would leave the chunk index range.
    pub fn initialize(&mut self, player_z: f32) -> CityResult<ChunkTransition> {
        let index = self.index_of(player_z)?;
        let transition = self.move_to(index);

        info!(
            current = index.0,
            active = self.active.len(),
            ahead = self.config().chunks_ahead,
            behind = self.config().chunks_behind,
            "City initialized"
        );
        Ok(transition)
    }

    /// Moves the window to follow `player_z`.
    ///
    /// No-op while the player stays inside the current chunk.
    ///
    /// # Errors
    ///
    /// Returns [`CityError::NotInitialized`] before [`Self::initialize`],
    /// [`CityError::NonFinitePosition`] for NaN or infinite positions, and
    /// [`CityError::PositionOutOfRange`] when the window would not fit.
    pub fn advance(&mut self, player_z: f32) -> CityResult<ChunkTransition> {
        let current = self.current.ok_or(CityError::NotInitialized)?;
        let index = self.index_of(player_z)?;

        if index == current {
            return Ok(ChunkTransition::unchanged(current));
        }

        let transition = self.move_to(index);
        debug!(
            from = current.0,
            to = index.0,
            created = transition.created.len(),
            retired = transition.retired.len(),
            "Chunk boundary crossed"
        );
        Ok(transition)
    }

    /// Generates chunk `index` if it is not active.
    ///
    /// Returns false if it already existed.
    pub fn generate_chunk(&mut self, index: ChunkIndex) -> bool {
        if self.active.contains_key(&index) {
            return false;
        }

        let chunk = self.generator.generate(index);
        self.stats.generated_this_session += 1;
        self.stats.buildings_generated += chunk.building_count() as u64;
        self.stats.roads_generated += chunk.road_count() as u64;
        self.active.insert(index, chunk);
        self.stats.peak_active = self.stats.peak_active.max(self.active.len());
        true
    }

    /// Removes chunk `index`, handing it back to the caller.
    ///
    /// Returns `None` if it was not active.
    pub fn remove_chunk(&mut self, index: ChunkIndex) -> Option<Chunk> {
        let chunk = self.active.remove(&index)?;
        self.stats.retired_this_session += 1;
        debug!(chunk = index.0, buildings = chunk.building_count(), "Chunk retired");
        Some(chunk)
    }

    /// Active chunk for `index`.
    #[must_use]
    pub fn get(&self, index: ChunkIndex) -> Option<&Chunk> {
        self.active.get(&index)
    }

    /// Returns true if `index` is active.
    #[must_use]
    pub fn contains(&self, index: ChunkIndex) -> bool {
        self.active.contains_key(&index)
    }

    /// Active indices in ascending order.
    #[must_use]
    pub fn active_indices(&self) -> Vec<ChunkIndex> {
        let mut indices: Vec<ChunkIndex> = self.active.keys().copied().collect();
        indices.sort_unstable();
        indices
    }

    /// Active chunks in ascending index order.
    pub fn active_chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.active_indices()
            .into_iter()
            .filter_map(move |index| self.active.get(&index))
    }

    /// Number of active chunks.
    #[must_use]
    pub fn active_chunk_count(&self) -> usize {
        self.active.len()
    }

    /// Player chunk, `None` before initialize.
    #[must_use]
    pub const fn current_index(&self) -> Option<ChunkIndex> {
        self.current
    }

    /// Index window that should be active, `None` before initialize.
    #[must_use]
    pub fn window(&self) -> Option<RangeInclusive<i32>> {
        self.current.map(|current| self.window_around(current))
    }

    /// Session statistics.
    #[must_use]
    pub const fn stats(&self) -> &StreamingStats {
        &self.stats
    }

    fn index_of(&self, player_z: f32) -> CityResult<ChunkIndex> {
        if !player_z.is_finite() {
            return Err(CityError::NonFinitePosition(player_z));
        }

        let (behind, ahead) = self.window_sides();
        ChunkIndex::from_world_z(player_z, self.config().chunk_size)
            .filter(|index| index.0.checked_sub(behind).is_some() && index.0.checked_add(ahead).is_some())
            .ok_or(CityError::PositionOutOfRange(player_z))
    }

    #[allow(clippy::cast_possible_wrap)]
    fn window_sides(&self) -> (i32, i32) {
        // Both sides are bounded by MAX_WINDOW_SIDE during validation.
        (self.config().chunks_behind as i32, self.config().chunks_ahead as i32)
    }

    /// Only called with indices accepted by `index_of`, so the ends never saturate.
    fn window_around(&self, current: ChunkIndex) -> RangeInclusive<i32> {
        let (behind, ahead) = self.window_sides();
        current.0.saturating_sub(behind)..=current.0.saturating_add(ahead)
    }

    fn move_to(&mut self, index: ChunkIndex) -> ChunkTransition {
        let previous = self.current.replace(index);
        let window = self.window_around(index);

        let mut created = Vec::new();
        let ahead = (index.0.saturating_add(1)..=*window.end()).map(ChunkIndex);
        let behind = (*window.start()..=index.0).map(ChunkIndex);
        for candidate in ahead.chain(behind) {
            if self.generate_chunk(candidate) {
                created.push(candidate);
            }
        }

        let mut stale: Vec<ChunkIndex> = self
            .active
            .keys()
            .copied()
            .filter(|k| !window.contains(&k.0))
            .collect();
        stale.sort_unstable();
        let retired = stale
            .into_iter()
            .filter_map(|k| self.remove_chunk(k))
            .collect();

        ChunkTransition {
            previous,
            current: index,
            created,
            retired,
        }
    }
}

impl std::fmt::Debug for ChunkManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkManager")
            .field("current", &self.current)
            .field("active", &self.active_indices())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
