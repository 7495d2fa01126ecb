//! Gravity, collisions and the leapfrog step.
//!
//! All operations work on a plain `&mut [Body]` so the same code runs in the
//! windowed app, the headless driver and the benchmarks.
//!
//! # Step order
//!
//! [`Physics::step`] advances every body by `dt` in five passes:
//!
//! 1. drift locations by half a step with the current velocities,
//! 2. recompute accelerations at the drifted locations,
//! 3. kick velocities by a full step,
//! 4. drift locations by the second half step with the new velocities,
//! 5. resolve collisions.
//!
//! Changing this order changes the energy behaviour of the system.

use glam::DVec2;

use crate::body::Body;

/// Gravitational constant.
pub const GRAVITY: f64 = 0.1;

/// Squared softening length added to every squared separation.
pub const SOFTENING_SQ: f64 = 100.0;

/// Physics substeps run per rendered frame.
pub const SUBSTEPS_PER_FRAME: u32 = 8;

/// When two bodies count as colliding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Discs overlap: `|d|² < (r1 + r2)²`.
    #[default]
    Touching,
    /// Squared distance against the unsquared radius sum: `|d|² < r1 + r2`.
    ///
    /// Triggers much later than [`CollisionPolicy::Touching`] for bodies
    /// with a combined radius above one.
    Loose,
}

impl CollisionPolicy {
    #[inline]
    pub fn is_colliding(self, a: &Body, b: &Body) -> bool {
        let dist_sq = (a.location - b.location).length_squared();
        let total_radius = a.radius() + b.radius();
        match self {
            CollisionPolicy::Touching => dist_sq < total_radius * total_radius,
            CollisionPolicy::Loose => dist_sq < total_radius,
        }
    }
}

/// Physical constants and policies for one simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Physics {
    pub gravity: f64,
    pub softening_sq: f64,
    pub collision: CollisionPolicy,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            softening_sq: SOFTENING_SQ,
            collision: CollisionPolicy::Touching,
        }
    }
}

impl Physics {
    pub fn with_collision_policy(mut self, collision: CollisionPolicy) -> Self {
        self.collision = collision;
        self
    }

    /// Advance all bodies by `dt`.
    pub fn step(&self, bodies: &mut [Body], dt: f64) {
        let half_dt = 0.5 * dt;

        for body in bodies.iter_mut() {
            body.location += body.velocity * half_dt;
        }

        self.compute_forces(bodies);

        for body in bodies.iter_mut() {
            body.velocity += body.acceleration * dt;
        }

        for body in bodies.iter_mut() {
            body.location += body.velocity * half_dt;
        }

        self.resolve_collisions(bodies);
    }

    /// Run `substeps` steps of `1 / substeps` each, one rendered frame.
    pub fn advance_frame(&self, bodies: &mut [Body], substeps: u32) {
        if substeps == 0 {
            return;
        }
        let dt = 1.0 / substeps as f64;
        for _ in 0..substeps {
            self.step(bodies, dt);
        }
    }

    /// Recompute every body's acceleration from softened pairwise gravity.
    ///
    /// Each unordered pair is visited once and both sides are updated.
    pub fn compute_forces(&self, bodies: &mut [Body]) {
        for body in bodies.iter_mut() {
            body.acceleration = DVec2::ZERO;
        }

        let n = bodies.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = pair_mut(bodies, i, j);
                let d = a.location - b.location;
                let norm = (self.softening_sq + d.length_squared()).sqrt();
                let mag = self.gravity / (norm * norm * norm);

                a.acceleration -= d * (mag * b.mass());
                b.acceleration += d * (mag * a.mass());
            }
        }
    }

    /// Apply an elastic impulse to every colliding pair.
    ///
    /// Pairs are visited with `i` ascending and `j < i`, each resolved once
    /// against the velocities left by the pairs before it. Overlapping bodies
    /// are not pushed apart.
    pub fn resolve_collisions(&self, bodies: &mut [Body]) {
        for i in 0..bodies.len() {
            for j in 0..i {
                let (b2, b1) = pair_mut(bodies, j, i);
                if self.collision.is_colliding(b1, b2) {
                    resolve_elastic(b1, b2);
                }
            }
        }
    }
}

/// Exchange momentum between two bodies along their line of centers.
///
/// Coincident bodies produce a NaN normal, which propagates into both
/// velocities.
pub fn resolve_elastic(b1: &mut Body, b2: &mut Body) {
    let displacement = b1.location - b2.location;
    let normal = displacement / displacement.length();
    let relative = b2.velocity - b1.velocity;
    let total_mass = b1.mass() + b2.mass();

    let impulse = normal * (2.0 * normal.dot(relative) / total_mass);

    b1.velocity += impulse * b2.mass();
    b2.velocity -= impulse * b1.mass();
}

/// Index of the first body whose disc strictly contains `point`.
pub fn hit_test(bodies: &[Body], point: DVec2) -> Option<usize> {
    bodies
        .iter()
        .position(|body| (body.location - point).length() < body.radius())
}

/// Mass-weighted mean location, or `None` when there is no mass.
pub fn center_of_gravity(bodies: &[Body]) -> Option<DVec2> {
    let mass = total_mass(bodies);
    if mass == 0.0 {
        return None;
    }
    let weighted = bodies
        .iter()
        .fold(DVec2::ZERO, |acc, body| acc + body.location * body.mass());
    Some(weighted / mass)
}

pub fn total_mass(bodies: &[Body]) -> f64 {
    bodies.iter().map(Body::mass).sum()
}

pub fn total_momentum(bodies: &[Body]) -> DVec2 {
    bodies.iter().fold(DVec2::ZERO, |acc, body| acc + body.momentum())
}

pub fn kinetic_energy(bodies: &[Body]) -> f64 {
    bodies.iter().map(Body::kinetic_energy).sum()
}

/// Two distinct mutable bodies, `i < j`.
fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    debug_assert!(i < j);
    let (head, tail) = bodies.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Color;

    fn body(x: f64, y: f64, vx: f64, vy: f64, radius: f64) -> Body {
        Body::with_color(DVec2::new(x, y), DVec2::new(vx, vy), radius, Color::BLACK)
    }

    #[test]
    fn test_forces_attract_along_line_of_centers() {
        let physics = Physics::default();
        let mut bodies = vec![body(-50.0, 0.0, 0.0, 0.0, 2.0), body(50.0, 0.0, 0.0, 0.0, 2.0)];
        physics.compute_forces(&mut bodies);

        assert!(bodies[0].acceleration.x > 0.0);
        assert!(bodies[1].acceleration.x < 0.0);
        assert_eq!(bodies[0].acceleration.y, 0.0);

        let m = bodies[1].mass();
        let norm = (SOFTENING_SQ + 100.0_f64 * 100.0).sqrt();
        let expected = 100.0 * GRAVITY / (norm * norm * norm) * m;
        assert!((bodies[0].acceleration.x - expected).abs() < 1e-12);
    }

    #[test]
    fn test_forces_reset_each_call() {
        let physics = Physics::default();
        let mut bodies = vec![body(0.0, 0.0, 0.0, 0.0, 1.0), body(30.0, 0.0, 0.0, 0.0, 1.0)];
        physics.compute_forces(&mut bodies);
        let first = bodies[0].acceleration;
        physics.compute_forces(&mut bodies);
        assert_eq!(bodies[0].acceleration, first);
    }

    #[test]
    fn test_softening_keeps_coincident_force_finite() {
        let physics = Physics::default();
        let mut bodies = vec![body(5.0, 5.0, 0.0, 0.0, 1.0), body(5.0, 5.0, 0.0, 0.0, 1.0)];
        physics.compute_forces(&mut bodies);
        assert_eq!(bodies[0].acceleration, DVec2::ZERO);
        assert_eq!(bodies[1].acceleration, DVec2::ZERO);
    }

    #[test]
    fn test_coincident_collision_propagates_nan() {
        let physics = Physics::default();
        let mut bodies = vec![body(5.0, 5.0, 1.0, 0.0, 1.0), body(5.0, 5.0, -1.0, 0.0, 1.0)];
        physics.resolve_collisions(&mut bodies);
        assert!(bodies[0].velocity.is_nan());
        assert!(bodies[1].velocity.is_nan());
    }

    #[test]
    fn test_equal_mass_head_on_swaps_velocities() {
        let physics = Physics::default();
        let mut bodies = vec![body(0.0, 0.0, 1.0, 0.0, 1.0), body(1.0, 0.0, -1.0, 0.0, 1.0)];
        physics.resolve_collisions(&mut bodies);

        assert!((bodies[0].velocity - DVec2::new(-1.0, 0.0)).length() < 1e-12);
        assert!((bodies[1].velocity - DVec2::new(1.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_collision_chain_resolves_in_pair_order() {
        // (1, 0) collides first, then (2, 1) sees the velocity it left behind.
        // (2, 0) is out of reach.
        let physics = Physics::default();
        let mut bodies = vec![
            body(0.0, 0.0, 1.0, 0.0, 1.0),
            body(1.5, 0.0, 0.0, 0.0, 1.0),
            body(3.0, 0.0, -1.0, 0.0, 1.0),
        ];
        physics.resolve_collisions(&mut bodies);

        let vx: Vec<f64> = bodies.iter().map(|b| b.velocity.x).collect();
        assert_eq!(vx, vec![0.0, -1.0, 1.0]);
    }

    #[test]
    fn test_collision_policies() {
        // Combined radius 4: touching below 16, loose below 4.
        let a = body(0.0, 0.0, 0.0, 0.0, 2.0);
        let b = body(3.0, 0.0, 0.0, 0.0, 2.0);
        assert!(CollisionPolicy::Touching.is_colliding(&a, &b));
        assert!(!CollisionPolicy::Loose.is_colliding(&a, &b));

        let c = body(1.5, 0.0, 0.0, 0.0, 2.0);
        assert!(CollisionPolicy::Loose.is_colliding(&a, &c));
    }

    #[test]
    fn test_separated_bodies_do_not_collide() {
        let physics = Physics::default();
        let mut bodies = vec![body(0.0, 0.0, 1.0, 0.0, 1.0), body(10.0, 0.0, -1.0, 0.0, 1.0)];
        physics.resolve_collisions(&mut bodies);
        assert_eq!(bodies[0].velocity, DVec2::new(1.0, 0.0));
        assert_eq!(bodies[1].velocity, DVec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_single_body_drifts_in_straight_line() {
        let physics = Physics::default();
        let mut bodies = vec![body(0.0, 0.0, 2.0, -1.0, 1.0)];
        physics.advance_frame(&mut bodies, SUBSTEPS_PER_FRAME);
        assert!((bodies[0].location - DVec2::new(2.0, -1.0)).length() < 1e-12);
        assert_eq!(bodies[0].velocity, DVec2::new(2.0, -1.0));
    }

    #[test]
    fn test_step_uses_midpoint_acceleration() {
        // Two bodies at rest: the kick must come from the drifted (unchanged)
        // positions and the second drift must use the kicked velocity.
        let physics = Physics::default();
        let mut bodies = vec![body(-20.0, 0.0, 0.0, 0.0, 1.0), body(20.0, 0.0, 0.0, 0.0, 1.0)];
        let mut reference = bodies.clone();
        physics.compute_forces(&mut reference);
        let a0 = reference[0].acceleration;

        physics.step(&mut bodies, 1.0);
        assert!((bodies[0].velocity - a0).length() < 1e-15);
        assert!((bodies[0].location - (DVec2::new(-20.0, 0.0) + a0 * 0.5)).length() < 1e-12);
    }

    #[test]
    fn test_hit_test_first_match_wins() {
        let bodies = vec![
            body(0.0, 0.0, 0.0, 0.0, 5.0),
            body(2.0, 0.0, 0.0, 0.0, 5.0),
            body(100.0, 0.0, 0.0, 0.0, 5.0),
        ];
        assert_eq!(hit_test(&bodies, DVec2::new(1.0, 0.0)), Some(0));
        assert_eq!(hit_test(&bodies, DVec2::new(100.0, 4.9)), Some(2));
        assert_eq!(hit_test(&bodies, DVec2::new(100.0, 5.0)), None);
        assert_eq!(hit_test(&bodies, DVec2::new(50.0, 50.0)), None);
    }

    #[test]
    fn test_center_of_gravity() {
        let bodies = vec![body(-10.0, 0.0, 0.0, 0.0, 1.0), body(10.0, 4.0, 0.0, 0.0, 1.0)];
        let cog = center_of_gravity(&bodies).unwrap();
        assert!((cog - DVec2::new(0.0, 2.0)).length() < 1e-12);
        assert_eq!(center_of_gravity(&[]), None);
    }
}
