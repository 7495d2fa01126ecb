//! Starting scenes.

use glam::DVec2;

use crate::body::{Body, Color};

/// Which bodies a fresh window starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scenario {
    /// A sun with three orbiters.
    #[default]
    SolarSystem,
    /// No bodies; everything is spawned by hand.
    Empty,
}

impl Scenario {
    pub fn bodies(self) -> Vec<Body> {
        match self {
            Scenario::SolarSystem => solar_system(),
            Scenario::Empty => Vec::new(),
        }
    }
}

/// Sun at the origin with a slight drift, an inner planet, and a planet
/// with a moon.
pub fn solar_system() -> Vec<Body> {
    let sun = Body::with_color(
        DVec2::new(0.0, 0.0),
        DVec2::new(0.0, -0.1),
        35.0,
        Color::from_rgb12(0xEE5),
    );
    let mercury = Body::with_color(
        DVec2::new(-200.0, 0.0),
        DVec2::new(0.0, -9.0),
        3.0,
        Color::from_rgb12(0x000),
    );
    let earth = Body::with_color(
        DVec2::new(500.0, 0.0),
        DVec2::new(0.0, 6.0),
        8.0,
        Color::from_rgb12(0x66F),
    );
    let moon = Body::with_color(
        DVec2::new(520.0, 0.0),
        DVec2::new(0.0, 9.0),
        2.0,
        Color::from_rgb12(0x444),
    );

    vec![sun, mercury, earth, moon]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solar_system_layout() {
        let bodies = Scenario::SolarSystem.bodies();
        assert_eq!(bodies.len(), 4);
        assert_eq!(bodies[0].location, DVec2::ZERO);
        assert_eq!(bodies[0].radius(), 35.0);
        assert!(bodies.iter().all(|b| !b.selected && b.trail.is_empty()));
        assert!(Scenario::Empty.bodies().is_empty());
    }
}
