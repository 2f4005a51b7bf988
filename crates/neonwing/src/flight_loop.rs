//! # NEONWING Flight Loop
//!
//! ```text
//! Tick N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. READ POSITION                                                    │
//! │    └─ feed.world_z(dt)                                              │
//! │                                                                     │
//! │ 2. ADVANCE CITY                                                     │
//! │    ├─ Same chunk: nothing to do                                     │
//! │    └─ New chunk: generate ahead/behind, retire outside the window   │
//! │                                                                     │
//! │ 3. HAND OFF GEOMETRY                                                │
//! │    ├─ sink.upload(&chunk) for every created chunk                   │
//! │    └─ sink.release(chunk) for every retired chunk                   │
//! │                                                                     │
//! │ 4. RECORD TIMING                                                    │
//! │    └─ FrameStats -> FrameStatsAccumulator, warn if over budget      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything runs on the caller's thread. Chunk generation blocks the
//! tick it happens in.

use std::time::{Duration, Instant};

use neonwing_procedural::{ChunkIndex, ChunkManager, ChunkTransition, CityConfig};
use tracing::{info, warn};

use crate::error::{FlightError, FlightResult};
use crate::feed::PlayerPositionFeed;
use crate::sink::GeometrySink;

/// Configuration for the flight loop.
#[derive(Clone, Debug)]
pub struct FlightLoopConfig {
    /// Target ticks per second; sets the frame budget.
    pub target_fps: u32,
    /// Log ticks that exceed the frame budget.
    pub enable_timing_logs: bool,
}

impl Default for FlightLoopConfig {
    fn default() -> Self {
        Self {
            target_fps: 90, // VR headset refresh
            enable_timing_logs: false,
        }
    }
}

impl FlightLoopConfig {
    /// Time available to one tick.
    #[must_use]
    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.target_fps.max(1)))
    }
}

/// Timing and streaming figures for one tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameStats {
    /// Tick number.
    pub frame: u64,
    /// Whole tick in microseconds.
    pub total_us: u64,
    /// Chunk manager advance (includes generation) in microseconds.
    pub advance_us: u64,
    /// Geometry hand-off in microseconds.
    pub handoff_us: u64,
    /// Chunks generated this tick.
    pub chunks_created: u32,
    /// Chunks retired this tick.
    pub chunks_retired: u32,
    /// Player position read this tick.
    pub player_z: f32,
    /// Player chunk after this tick.
    pub current_chunk: ChunkIndex,
}

/// Accumulator for frame statistics.
#[derive(Clone, Debug)]
pub struct FrameStatsAccumulator {
    /// Total frames recorded.
    pub frames_recorded: u64,
    /// Sum of total frame times.
    pub total_us_sum: u64,
    /// Sum of advance times.
    pub advance_us_sum: u64,
    /// Sum of hand-off times.
    pub handoff_us_sum: u64,
    /// Min frame time.
    pub min_frame_us: u64,
    /// Max frame time.
    pub max_frame_us: u64,
    /// Frames that exceeded budget.
    pub frames_over_budget: u64,
    /// Frames that crossed a chunk boundary.
    pub transition_frames: u64,
    /// Budget each frame is measured against.
    pub budget_us: u64,
}

impl FrameStatsAccumulator {
    /// Creates an accumulator measuring against `budget`.
    #[must_use]
    pub fn new(budget: Duration) -> Self {
        Self {
            frames_recorded: 0,
            total_us_sum: 0,
            advance_us_sum: 0,
            handoff_us_sum: 0,
            min_frame_us: u64::MAX,
            max_frame_us: 0,
            frames_over_budget: 0,
            transition_frames: 0,
            budget_us: duration_us(budget),
        }
    }

    /// Records a frame's statistics.
    pub fn record(&mut self, stats: FrameStats) {
        self.frames_recorded += 1;
        self.total_us_sum += stats.total_us;
        self.advance_us_sum += stats.advance_us;
        self.handoff_us_sum += stats.handoff_us;
        self.min_frame_us = self.min_frame_us.min(stats.total_us);
        self.max_frame_us = self.max_frame_us.max(stats.total_us);

        if stats.total_us > self.budget_us {
            self.frames_over_budget += 1;
        }
        if stats.chunks_created > 0 || stats.chunks_retired > 0 {
            self.transition_frames += 1;
        }
    }

    /// Returns average frame time in milliseconds.
    #[must_use]
    pub fn avg_frame_ms(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (self.total_us_sum as f64 / self.frames_recorded as f64) / 1000.0
    }

    /// Returns average FPS.
    #[must_use]
    pub fn avg_fps(&self) -> f64 {
        let avg_ms = self.avg_frame_ms();
        if avg_ms <= 0.0 {
            return 0.0;
        }
        1000.0 / avg_ms
    }

    /// Returns the fraction of frames over budget.
    #[must_use]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        self.frames_over_budget as f64 / self.frames_recorded as f64
    }

    /// Logs a summary at info level.
    pub fn log_summary(&self) {
        let min_frame_us = if self.frames_recorded == 0 { 0 } else { self.min_frame_us };
        info!(
            frames = self.frames_recorded,
            avg_ms = self.avg_frame_ms(),
            avg_fps = self.avg_fps(),
            min_ms = min_frame_us as f64 / 1000.0,
            max_ms = self.max_frame_us as f64 / 1000.0,
            over_budget = self.frames_over_budget,
            over_budget_pct = self.over_budget_ratio() * 100.0,
            transitions = self.transition_frames,
            "Frame statistics"
        );
    }
}

fn duration_us(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

/// Collects the collaborators a [`FlightLoop`] needs.
///
/// Both a position feed and a geometry sink are mandatory.
#[derive(Debug)]
pub struct FlightLoopBuilder<F, S> {
    city: CityConfig,
    config: FlightLoopConfig,
    feed: Option<F>,
    sink: Option<S>,
}

impl<F: PlayerPositionFeed, S: GeometrySink> FlightLoopBuilder<F, S> {
    /// Starts a builder for a city with `city` configuration.
    #[must_use]
    pub fn new(city: CityConfig) -> Self {
        Self {
            city,
            config: FlightLoopConfig::default(),
            feed: None,
            sink: None,
        }
    }

    /// Sets loop timing options.
    #[must_use]
    pub fn config(mut self, config: FlightLoopConfig) -> Self {
        self.config = config;
        self
    }

    /// Attaches the player position source.
    #[must_use]
    pub fn position_feed(mut self, feed: F) -> Self {
        self.feed = Some(feed);
        self
    }

    /// Attaches the geometry consumer.
    #[must_use]
    pub fn geometry_sink(mut self, sink: S) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Validates the city config, reads the start position and generates
    /// the initial window.
    ///
    /// # Errors
    ///
    /// - [`FlightError::MissingPositionSource`] without a feed
    /// - [`FlightError::MissingGeometrySink`] without a sink
    /// - [`FlightError::City`] for an invalid config or start position
    pub fn build(self) -> FlightResult<FlightLoop<F, S>> {
        let mut feed = self.feed.ok_or(FlightError::MissingPositionSource)?;
        let sink = self.sink.ok_or(FlightError::MissingGeometrySink)?;

        let mut city = ChunkManager::new(self.city)?;
        let start_z = feed.world_z(0.0);
        let transition = city.initialize(start_z)?;

        let budget = self.config.frame_budget();
        let mut flight = FlightLoop {
            city,
            feed,
            sink,
            config: self.config,
            frame_count: 0,
            player_z: start_z,
            stats_accumulator: FrameStatsAccumulator::new(budget),
        };
        flight.hand_off(transition);

        info!(
            start_z,
            target_fps = flight.config.target_fps,
            budget_ms = budget.as_secs_f64() * 1000.0,
            "Flight loop ready"
        );
        Ok(flight)
    }
}

/// Drives the city from a position feed into a geometry sink.
pub struct FlightLoop<F, S> {
    city: ChunkManager,
    feed: F,
    sink: S,
    config: FlightLoopConfig,
    frame_count: u64,
    player_z: f32,
    stats_accumulator: FrameStatsAccumulator,
}

impl<F: PlayerPositionFeed, S: GeometrySink> FlightLoop<F, S> {
    /// Runs one tick of `dt` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`FlightError::City`] if the feed reports a non-finite
    /// position. The city is left untouched in that case.
    pub fn tick(&mut self, dt: f32) -> FlightResult<FrameStats> {
        let start = Instant::now();

        let player_z = self.feed.world_z(dt);
        let transition = self.city.advance(player_z)?;
        self.player_z = player_z;
        let advanced = Instant::now();

        let current_chunk = transition.current;
        let chunks_created = u32::try_from(transition.created.len()).unwrap_or(u32::MAX);
        let chunks_retired = u32::try_from(transition.retired.len()).unwrap_or(u32::MAX);
        self.hand_off(transition);
        let done = Instant::now();

        let stats = FrameStats {
            frame: self.frame_count,
            total_us: duration_us(done - start),
            advance_us: duration_us(advanced - start),
            handoff_us: duration_us(done - advanced),
            chunks_created,
            chunks_retired,
            player_z,
            current_chunk,
        };
        self.end_frame(stats);
        Ok(stats)
    }

    fn hand_off(&mut self, transition: ChunkTransition) {
        for index in &transition.created {
            if let Some(chunk) = self.city.get(*index) {
                self.sink.upload(chunk);
            }
        }
        for chunk in transition.retired {
            self.sink.release(chunk);
        }
    }

    fn end_frame(&mut self, stats: FrameStats) {
        self.frame_count += 1;
        self.stats_accumulator.record(stats);

        if self.config.enable_timing_logs && stats.total_us > self.stats_accumulator.budget_us {
            warn!(
                frame = stats.frame,
                total_ms = stats.total_us as f64 / 1000.0,
                budget_ms = self.stats_accumulator.budget_us as f64 / 1000.0,
                created = stats.chunks_created,
                retired = stats.chunks_retired,
                "Tick exceeded frame budget"
            );
        }
    }

    /// Returns the number of completed ticks.
    #[inline]
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Last position read from the feed.
    #[must_use]
    pub const fn player_z(&self) -> f32 {
        self.player_z
    }

    /// The chunk manager.
    #[must_use]
    pub const fn city(&self) -> &ChunkManager {
        &self.city
    }

    /// The geometry sink.
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// The position feed.
    #[must_use]
    pub const fn feed(&self) -> &F {
        &self.feed
    }

    /// Returns the accumulated statistics.
    #[must_use]
    pub const fn stats(&self) -> &FrameStatsAccumulator {
        &self.stats_accumulator
    }

    /// Stops the loop, returning the collaborators.
    #[must_use]
    pub fn into_parts(self) -> (F, S) {
        (self.feed, self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::ScriptedFlight;
    use crate::sink::MeshBudgetSink;

    #[test]
    fn test_missing_feed_is_fatal() {
        let result = FlightLoopBuilder::<ScriptedFlight, MeshBudgetSink>::new(CityConfig::default())
            .geometry_sink(MeshBudgetSink::new())
            .build();
        assert!(matches!(result, Err(FlightError::MissingPositionSource)));
    }

    #[test]
    fn test_missing_sink_is_fatal() {
        let result = FlightLoopBuilder::<ScriptedFlight, MeshBudgetSink>::new(CityConfig::default())
            .position_feed(ScriptedFlight::new(0.0, 10.0))
            .build();
        assert!(matches!(result, Err(FlightError::MissingGeometrySink)));
    }

    #[test]
    fn test_build_uploads_initial_window() {
        let flight = FlightLoopBuilder::new(CityConfig::default())
            .position_feed(ScriptedFlight::new(0.0, 10.0))
            .geometry_sink(MeshBudgetSink::new())
            .build()
            .unwrap();

        assert_eq!(flight.sink().resident_chunks(), 8);
        assert_eq!(flight.sink().uploads(), 8);
        assert_eq!(flight.frame_count(), 0);
    }

    #[test]
    fn test_tick_counts_frames() {
        let mut flight = FlightLoopBuilder::new(CityConfig::default())
            .position_feed(ScriptedFlight::new(0.0, 10.0))
            .geometry_sink(MeshBudgetSink::new())
            .build()
            .unwrap();

        let stats = flight.tick(0.5).unwrap();
        assert_eq!(stats.frame, 0);
        assert_eq!(stats.player_z, 5.0);
        assert_eq!(stats.chunks_created, 0);
        assert_eq!(flight.frame_count(), 1);
        assert_eq!(flight.stats().frames_recorded, 1);
    }

    #[test]
    fn test_nan_feed_leaves_city_untouched() {
        let mut calls = 0;
        let feed = move |_dt: f32| {
            calls += 1;
            if calls > 1 {
                f32::NAN
            } else {
                0.0
            }
        };
        let mut flight = FlightLoopBuilder::new(CityConfig::default())
            .position_feed(feed)
            .geometry_sink(MeshBudgetSink::new())
            .build()
            .unwrap();

        assert!(matches!(flight.tick(0.1), Err(FlightError::City(_))));
        assert_eq!(flight.city().active_chunk_count(), 8);
        assert_eq!(flight.player_z(), 0.0);
    }

    #[test]
    fn test_stats_accumulator() {
        let mut acc = FrameStatsAccumulator::new(Duration::from_micros(11_111));

        for i in 0..100 {
            acc.record(FrameStats {
                frame: i,
                total_us: 10_000 + (i * 100),
                advance_us: 8_000,
                handoff_us: 500,
                ..FrameStats::default()
            });
        }

        assert_eq!(acc.frames_recorded, 100);
        assert_eq!(acc.min_frame_us, 10_000);
        assert_eq!(acc.max_frame_us, 19_900);
        // 10_000 + i*100 > 11_111 for i >= 12
        assert_eq!(acc.frames_over_budget, 88);
        assert!(acc.avg_fps() > 50.0);
        assert!(acc.avg_fps() < 100.0);
    }
}
