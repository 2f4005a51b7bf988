//! Player position sources.
//!
//! The city only needs one number per tick: how far along the travel axis
//! the player is. The flight rig owns the full transform.

/// Supplies the player's world Z once per tick.
pub trait PlayerPositionFeed {
    /// Advances by `dt` seconds and returns the new world Z.
    ///
    /// Called once with `dt = 0.0` at start-up to place the initial window.
    fn world_z(&mut self, dt: f32) -> f32;
}

impl<F> PlayerPositionFeed for F
where
    F: FnMut(f32) -> f32,
{
    fn world_z(&mut self, dt: f32) -> f32 {
        self(dt)
    }
}

/// Constant-speed flight along +Z, optionally turning around once.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScriptedFlight {
    z: f32,
    speed: f32,
    reverse_at: Option<f32>,
}

impl ScriptedFlight {
    /// Starts at `start_z` flying at `speed` units per second.
    #[must_use]
    pub const fn new(start_z: f32, speed: f32) -> Self {
        Self {
            z: start_z,
            speed,
            reverse_at: None,
        }
    }

    /// Turns around once the flight reaches `z`.
    #[must_use]
    pub const fn reversing_at(mut self, z: f32) -> Self {
        self.reverse_at = Some(z);
        self
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> f32 {
        self.z
    }

    /// Current signed speed.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }
}

impl PlayerPositionFeed for ScriptedFlight {
    fn world_z(&mut self, dt: f32) -> f32 {
        self.z += self.speed * dt;

        if let Some(turn) = self.reverse_at {
            let passed = (self.speed > 0.0 && self.z >= turn) || (self.speed < 0.0 && self.z <= turn);
            if passed {
                self.speed = -self.speed;
                self.reverse_at = None;
            }
        }

        self.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_speed() {
        let mut flight = ScriptedFlight::new(10.0, 50.0);
        assert_eq!(flight.world_z(0.0), 10.0);
        assert_eq!(flight.world_z(1.0), 60.0);
        assert_eq!(flight.world_z(0.5), 85.0);
    }

    #[test]
    fn test_reverses_once() {
        let mut flight = ScriptedFlight::new(0.0, 100.0).reversing_at(250.0);
        flight.world_z(2.0);
        assert_eq!(flight.world_z(1.0), 300.0);
        assert_eq!(flight.speed(), -100.0);
        assert_eq!(flight.world_z(4.0), -100.0);
        assert_eq!(flight.speed(), -100.0);
    }

    #[test]
    fn test_closure_feed() {
        let mut t = 0.0;
        let mut feed = |dt: f32| {
            t += dt;
            t * 2.0
        };
        assert_eq!(PlayerPositionFeed::world_z(&mut feed, 1.5), 3.0);
    }
}
