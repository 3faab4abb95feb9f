//! Particle sources for [`crate::Registry::scatter`], and a random
//! non-overlapping sphere packer.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One sphere to place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Centre x.
    pub x: f64,
    /// Centre y.
    pub y: f64,
    /// Centre z.
    pub z: f64,
    /// Radius.
    pub radius: f64,
    /// Bead type; `None` defers to the caller.
    pub beadtype: Option<i64>,
}

/// Anything that yields particles.
pub trait ParticleSource {
    /// Current particles, in insertion order.
    fn particles(&self) -> Vec<Particle>;
}

/// A plain list of particles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scatter {
    particles: Vec<Particle>,
}

impl Scatter {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a particle.
    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Number of particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Returns `true` if there are no particles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

impl FromIterator<Particle> for Scatter {
    fn from_iter<I: IntoIterator<Item = Particle>>(iter: I) -> Self {
        Self {
            particles: iter.into_iter().collect(),
        }
    }
}

impl ParticleSource for Scatter {
    fn particles(&self) -> Vec<Particle> {
        self.particles.clone()
    }
}

/// Parameters of [`Emulsion::insert_one`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InsertRequest {
    /// Fixed centre; drawn at random when `None`.
    pub position: Option<[f64; 3]>,
    /// Radius; 2% of the box diagonal when `None`.
    pub radius: Option<f64>,
    /// Bead type; the emulsion default when `None`.
    pub beadtype: Option<i64>,
    /// Skip the acceptance test.
    pub overlap: bool,
}

/// Random sequential insertion of non-overlapping spheres in a box.
///
/// A candidate is accepted when its centre is farther than its radius from
/// every wall and from every sphere surface already placed.
#[derive(Debug, Clone)]
pub struct Emulsion {
    min: [f64; 3],
    max: [f64; 3],
    max_trials: usize,
    beadtype: i64,
    forced_insertion: bool,
    rng: StdRng,
    placed: Vec<Particle>,
}

impl Emulsion {
    /// Box `10..90` on every axis, 1000 trials, bead type 1, forced
    /// insertion on.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            min: [10.0; 3],
            max: [90.0; 3],
            max_trials: 1000,
            beadtype: 1,
            forced_insertion: true,
            rng: StdRng::seed_from_u64(seed),
            placed: Vec::new(),
        }
    }

    /// Sets the box corners.
    #[must_use]
    pub fn with_bounds(mut self, min: [f64; 3], max: [f64; 3]) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Sets the number of draws per sphere.
    #[must_use]
    pub fn with_max_trials(mut self, max_trials: usize) -> Self {
        self.max_trials = max_trials;
        self
    }

    /// Sets the default bead type.
    #[must_use]
    pub fn with_beadtype(mut self, beadtype: i64) -> Self {
        self.beadtype = beadtype;
        self
    }

    /// Keep going after a failed insertion.
    #[must_use]
    pub fn with_forced_insertion(mut self, forced: bool) -> Self {
        self.forced_insertion = forced;
        self
    }

    /// Number of spheres placed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.placed.len()
    }

    /// Returns `true` if nothing was placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// The most recent insertion.
    #[must_use]
    pub fn last(&self) -> Option<&Particle> {
        self.placed.last()
    }

    fn default_radius(&self) -> f64 {
        let diagonal: f64 = (0..3).map(|i| (self.max[i] - self.min[i]).powi(2)).sum::<f64>().sqrt();
        0.02 * diagonal
    }

    /// Shortest distance from `p` to a wall.
    #[must_use]
    pub fn wall_distance(&self, p: [f64; 3]) -> f64 {
        (0..3)
            .flat_map(|i| [(p[i] - self.min[i]).abs(), (p[i] - self.max[i]).abs()])
            .fold(f64::INFINITY, f64::min)
    }

    /// Shortest distance from `p` to a wall or a placed sphere surface.
    #[must_use]
    pub fn distance(&self, p: [f64; 3]) -> f64 {
        self.placed
            .iter()
            .map(|s| {
                let d2 = (p[0] - s.x).powi(2) + (p[1] - s.y).powi(2) + (p[2] - s.z).powi(2);
                d2.sqrt() - s.radius
            })
            .fold(self.wall_distance(p), f64::min)
    }

    /// Whether a sphere of radius `r` fits at `p`.
    #[must_use]
    pub fn accepted(&self, p: [f64; 3], r: f64) -> bool {
        self.distance(p) > r
    }

    fn draw(&mut self) -> [f64; 3] {
        let mut p = [0.0; 3];
        for (i, v) in p.iter_mut().enumerate() {
            *v = if self.max[i] > self.min[i] {
                self.rng.gen_range(self.min[i]..self.max[i])
            } else {
                self.min[i]
            };
        }
        p
    }

    /// Tries to place one sphere; returns `true` on success.
    pub fn insert_one(&mut self, request: InsertRequest) -> bool {
        let r = request.radius.unwrap_or_else(|| self.default_radius());
        let mut found = None;
        for _ in 0..self.max_trials {
            let p = match request.position {
                Some(p) => p,
                None => self.draw(),
            };
            if request.overlap || self.accepted(p, r) {
                found = Some(p);
                break;
            }
        }
        let Some([x, y, z]) = found else {
            warn!(radius = r, trials = self.max_trials, "sphere could not be inserted");
            return false;
        };
        self.placed.push(Particle {
            x,
            y,
            z,
            radius: r,
            beadtype: Some(request.beadtype.unwrap_or(self.beadtype)),
        });
        true
    }

    /// Places spheres largest first and returns how many fit.
    ///
    /// After a failure, insertion stops unless forced insertion is on.
    pub fn insertion(&mut self, radii: &[f64], beadtype: Option<i64>) -> usize {
        let mut sorted = radii.to_vec();
        sorted.sort_by(|a, b| b.total_cmp(a));
        let mut inserted = 0;
        for r in &sorted {
            let ok = self.insert_one(InsertRequest {
                radius: Some(*r),
                beadtype,
                ..InsertRequest::default()
            });
            if ok {
                inserted += 1;
            } else if !self.forced_insertion {
                break;
            }
        }
        info!(inserted, requested = sorted.len(), "emulsion insertion");
        inserted
    }
}

impl ParticleSource for Emulsion {
    fn particles(&self) -> Vec<Particle> {
        self.placed.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placed_spheres_do_not_overlap() {
        let mut e = Emulsion::new(7);
        let n = e.insertion(&[3.0, 8.0, 5.0, 4.0, 6.0], Some(2));
        assert_eq!(n, 5);
        let ps = e.particles();
        assert_eq!(ps[0].radius, 8.0);
        for (i, a) in ps.iter().enumerate() {
            assert!(a.x - a.radius > 10.0 && a.x + a.radius < 90.0);
            assert_eq!(a.beadtype, Some(2));
            for b in &ps[i + 1..] {
                let d = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2) + (a.z - b.z).powi(2)).sqrt();
                assert!(d > a.radius + b.radius);
            }
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let mut a = Emulsion::new(42);
        let mut b = Emulsion::new(42);
        a.insertion(&[5.0, 5.0], None);
        b.insertion(&[5.0, 5.0], None);
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn oversized_sphere_fails() {
        let mut e = Emulsion::new(1).with_max_trials(20);
        assert!(!e.insert_one(InsertRequest {
            radius: Some(100.0),
            ..InsertRequest::default()
        }));
        assert!(e.is_empty());
    }

    #[test]
    fn unforced_insertion_stops_at_first_failure() {
        let mut e = Emulsion::new(3).with_max_trials(50).with_forced_insertion(false);
        assert_eq!(e.insertion(&[100.0, 2.0], None), 0);
        let mut forced = Emulsion::new(3).with_max_trials(50);
        assert_eq!(forced.insertion(&[100.0, 2.0], None), 1);
    }

    #[test]
    fn fixed_position_and_default_radius() {
        let mut e = Emulsion::new(0).with_beadtype(4);
        assert!(e.insert_one(InsertRequest {
            position: Some([50.0, 50.0, 50.0]),
            ..InsertRequest::default()
        }));
        let p = e.last().copied().unwrap_or(Particle {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            radius: 0.0,
            beadtype: None,
        });
        let diagonal = (3.0f64 * 80.0 * 80.0).sqrt();
        assert!((p.radius - 0.02 * diagonal).abs() < 1e-12);
        assert_eq!(p.beadtype, Some(4));
        assert!(!e.accepted([50.0, 50.0, 50.0], 1.0));
    }

    #[test]
    fn scatter_list() {
        let s: Scatter = (0..3)
            .map(|i| Particle {
                x: f64::from(i),
                y: 0.0,
                z: 0.0,
                radius: 0.5,
                beadtype: None,
            })
            .collect();
        assert_eq!(s.len(), 3);
        assert_eq!(s.particles()[2].x, 2.0);
    }
}
