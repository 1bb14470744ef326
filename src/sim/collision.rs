//! Collision detection and response against disc obstacles
//!
//! One discrete check per tick: the k-d tree is queried around the predicted
//! position, the first candidate touching the particle is resolved, and the
//! scan stops there.

use crate::sim::kdtree::KdTree;
use crate::sim::obstacle::Obstacle;
use crate::sim::particle::Particle;
use crate::{Point, distance};

/// Outcome of moving one particle for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    /// Obstacle the particle rebounded from, if any
    pub hit: Option<Obstacle>,
    /// Distance evaluations spent in the query and the candidate scan
    pub distance_tests: usize,
}

/// Rebound of `particle` off the disc at `center`.
///
/// The unconstrained next position `xd` is pushed back along the outward
/// normal to `center + (r + att·(r − l))·u`. Inbound velocity is mirrored about
/// the normal, and the result is scaled by `attenuation` either way.
pub fn rebound(
    particle: &Particle,
    center: Point,
    radius: f64,
    attenuation: f64,
    dt: f64,
) -> Particle {
    let xd = particle.predicted(dt);
    let offset = xd - center;
    let l = offset.length();
    let u = offset
        .try_normalize()
        .or_else(|| (particle.position - center).try_normalize())
        .unwrap_or(Point::X);
    let xm = center + (radius + attenuation * (radius - l)) * u;

    let mut v = particle.velocity;
    let proj = v.dot(u);
    if proj < 0.0 {
        v -= 2.0 * proj * u;
    }

    Particle {
        position: xm,
        velocity: attenuation * v,
        ..*particle
    }
}

/// First candidate, in order, whose disc contains `position` (boundary
/// included), plus the number of distance evaluations spent finding it
pub fn first_contact(position: Point, candidates: &[Obstacle]) -> (Option<&Obstacle>, usize) {
    let mut tests = 0;
    for obstacle in candidates {
        tests += 1;
        if distance(position, obstacle.center) <= obstacle.radius {
            return (Some(obstacle), tests);
        }
    }
    (None, tests)
}

/// Advance `particle` by `dt`, rebounding off the first obstacle it touches.
///
/// The query ball around the predicted position has radius `margin`, widened
/// to the index's largest obstacle radius plus this tick's displacement so
/// that every disc containing the current position is a candidate.
/// `scratch` is reused between calls to hold query results.
pub fn move_particle(
    particle: &mut Particle,
    index: &KdTree,
    dt: f64,
    margin: f64,
    scratch: &mut Vec<Obstacle>,
) -> MoveResult {
    let predicted = particle.predicted(dt);
    let reach = index.max_radius() + (predicted - particle.position).length();
    let radius = margin.max(reach);

    scratch.clear();
    let query_tests = index.range_query_into(predicted, radius, scratch);
    let (hit, scan_tests) = first_contact(particle.position, scratch);
    let hit = hit.copied();

    match hit {
        Some(obstacle) => {
            *particle = rebound(
                particle,
                obstacle.center,
                obstacle.radius,
                obstacle.attenuation,
                dt,
            );
        }
        None => particle.position = predicted,
    }

    MoveResult {
        hit,
        distance_tests: query_tests + scan_tests,
    }
}
