//! # Flight Loop Integration Tests
//!
//! Drives the full stack (feed, chunk manager, mesh builders, sink) and
//! checks that geometry handed to the renderer always matches the active
//! window.

use neonwing::procedural::{Chunk, ChunkIndex, CityConfig};
use neonwing::{FlightLoopBuilder, GeometrySink, MeshBudgetSink, ScriptedFlight};

/// Test: Sink residency equals the manager's window on every tick.
#[test]
fn test_sink_tracks_window_while_flying() {
    let mut flight = FlightLoopBuilder::new(CityConfig::default())
        .position_feed(ScriptedFlight::new(0.0, 240.0))
        .geometry_sink(MeshBudgetSink::new())
        .build()
        .unwrap();

    for _ in 0..930 {
        flight.tick(1.0 / 90.0).unwrap();

        let active = flight.city().active_indices();
        assert_eq!(flight.sink().resident_chunks(), active.len());
        for index in active {
            assert!(flight.sink().is_resident(index), "{index} not uploaded");
        }
    }

    // ~10.3 s at 240 u/s = ~2480 units = chunk 24
    assert_eq!(flight.city().current_index(), Some(ChunkIndex(24)));
    assert_eq!(flight.sink().releases(), 24);
    assert_eq!(flight.stats().transition_frames, 24);
}

/// Test: Turning around streams the city back in behind the player.
#[test]
fn test_reversal_streams_back() {
    let mut flight = FlightLoopBuilder::new(CityConfig::default())
        .position_feed(ScriptedFlight::new(50.0, 100.0).reversing_at(1_050.0))
        .geometry_sink(MeshBudgetSink::new())
        .build()
        .unwrap();

    for _ in 0..30 {
        flight.tick(1.0).unwrap();
    }

    // Out to 1050 in 10 ticks, back to -950 in 20
    assert!((flight.player_z() - -950.0).abs() < 1e-3);
    assert_eq!(flight.city().current_index(), Some(ChunkIndex(-10)));
    assert_eq!(
        flight.city().active_indices(),
        (-12..=-5).map(ChunkIndex).collect::<Vec<_>>()
    );
    assert_eq!(flight.sink().resident_chunks(), 8);
}

/// Test: Resident geometry returns to the same level for the same window.
#[test]
fn test_budget_is_stable_for_revisited_window() {
    let mut flight = FlightLoopBuilder::new(CityConfig::default())
        .position_feed(ScriptedFlight::new(0.0, 100.0).reversing_at(1_000.0))
        .geometry_sink(MeshBudgetSink::new())
        .build()
        .unwrap();
    let initial = flight.sink().resident_vertices();

    for _ in 0..20 {
        flight.tick(1.0).unwrap();
    }

    assert_eq!(flight.city().current_index(), Some(ChunkIndex(0)));
    assert_eq!(flight.sink().resident_vertices(), initial);
}

/// A sink that keeps retired chunks to inspect them.
#[derive(Default)]
struct RecordingSink {
    uploaded: Vec<ChunkIndex>,
    released: Vec<Chunk>,
}

impl GeometrySink for RecordingSink {
    fn upload(&mut self, chunk: &Chunk) {
        self.uploaded.push(chunk.index());
    }

    fn release(&mut self, chunk: Chunk) {
        self.released.push(chunk);
    }
}

/// Test: Retired chunks arrive whole, with every building and road.
#[test]
fn test_released_chunks_are_complete() {
    let mut flight = FlightLoopBuilder::new(CityConfig::default())
        .position_feed(ScriptedFlight::new(0.0, 100.0))
        .geometry_sink(RecordingSink::default())
        .build()
        .unwrap();

    let initial_chunk_minus_two = flight.city().get(ChunkIndex(-2)).unwrap().building_count();
    flight.tick(1.0).unwrap();

    let (_, sink) = flight.into_parts();
    assert_eq!(sink.uploaded.len(), 9);
    assert_eq!(sink.uploaded[8], ChunkIndex(6));
    assert_eq!(sink.released.len(), 1);

    let released = &sink.released[0];
    assert_eq!(released.index(), ChunkIndex(-2));
    assert_eq!(released.building_count(), initial_chunk_minus_two);
    assert_eq!(released.road_count(), 6);
}
