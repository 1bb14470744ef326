//! Fixed timestep simulation tick
//!
//! Advances the simulation deterministically: emit, integrate, move, cull.

use super::collision::move_particle;
use super::state::SimState;
use crate::{Point, in_domain};

/// Advance the simulation by one fixed timestep
pub fn tick(state: &mut SimState, dt: f64) {
    state.time_ticks += 1;
    state.stats.ticks += 1;

    emit(state);
    compute_dynamics(state, dt);
    move_all(state, dt);
}

/// Roll every fountain once
pub fn emit(state: &mut SimState) {
    for fountain in &state.fountains {
        if let Some(particle) = fountain.emit(&mut state.rng) {
            state.particles.push(particle);
            state.stats.emitted += 1;
        }
    }
}

/// Accumulate forces and integrate velocities (forward Euler)
pub fn compute_dynamics(state: &mut SimState, dt: f64) {
    for particle in &mut state.particles {
        particle.force = Point::ZERO;
        for force in &state.forces {
            let contribution = force.contribute(particle);
            particle.force += contribution;
        }
        particle.velocity += (dt / particle.mass) * particle.force;
    }
}

/// Move every particle against the current obstacle index, then drop the
/// ones that left the domain
pub fn move_all(state: &mut SimState, dt: f64) {
    let margin = state.params.query_margin;
    let bound = state.params.domain_bound;
    let mut scratch = Vec::new();

    let index = &state.index;
    let mut collisions = 0;
    let mut distance_tests = 0;
    for particle in &mut state.particles {
        let result = move_particle(particle, index, dt, margin, &mut scratch);
        collisions += usize::from(result.hit.is_some());
        distance_tests += result.distance_tests;
    }
    state.stats.collisions += collisions;
    state.stats.distance_tests += distance_tests;

    let before = state.particles.len();
    state.particles.retain(|p| in_domain(p.position, bound));
    state.stats.culled += before - state.particles.len();
}
