use glam::DVec3;

use super::arc::GreatCircle;
use super::math::XorShift;
use super::types::TrafficIntensity;

/// How far (relative to the sphere radius) a particle may stray sideways
/// from the arc before being re-projected onto the sphere.
const LATERAL_SPREAD: f64 = 0.06;

/// Fixed per-intensity particle parameters. A lookup table, not a formula.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntensityProfile {
	pub particle_count: usize,
	/// Progress per second; a particle crosses the full arc in `1 / speed`.
	pub speed: f64,
	/// Point size in CSS pixels at reference depth.
	pub point_size: f64,
}

impl TrafficIntensity {
	pub fn profile(self) -> IntensityProfile {
		match self {
			TrafficIntensity::Low => IntensityProfile {
				particle_count: 6,
				speed: 0.12,
				point_size: 2.0,
			},
			TrafficIntensity::Medium => IntensityProfile {
				particle_count: 12,
				speed: 0.20,
				point_size: 2.6,
			},
			TrafficIntensity::High => IntensityProfile {
				particle_count: 20,
				speed: 0.30,
				point_size: 3.2,
			},
		}
	}
}

#[derive(Clone, Debug)]
struct Particle {
	/// Fraction of the arc travelled, in [0, 1).
	progress: f64,
	/// Lateral perturbation, regenerated on every wrap.
	lateral: DVec3,
}

/// Animated particle stream for one link.
///
/// Holds scalar progress per particle and derives world positions on demand
/// from the link's current great-circle arc, so node movement between polls
/// never desynchronizes the stream.
#[derive(Clone, Debug)]
pub struct TrafficFlow {
	particles: Vec<Particle>,
	intensity: TrafficIntensity,
	rng: XorShift,
	positions: Vec<DVec3>,
}

impl TrafficFlow {
	pub fn new(intensity: TrafficIntensity, seed: u64) -> Self {
		let mut flow = Self {
			particles: Vec::new(),
			intensity,
			rng: XorShift::new(seed),
			positions: Vec::new(),
		};
		flow.respawn();
		flow
	}

	pub fn intensity(&self) -> TrafficIntensity {
		self.intensity
	}

	/// Swap the intensity profile, respawning the stream at the new count.
	pub fn set_intensity(&mut self, intensity: TrafficIntensity) {
		if self.intensity != intensity {
			self.intensity = intensity;
			self.respawn();
		}
	}

	fn respawn(&mut self) {
		let profile = self.intensity.profile();
		self.particles = (0..profile.particle_count)
			.map(|_| Particle {
				// Random initial phase so the stream starts spread out.
				progress: self.rng.next_f64(),
				lateral: self.rng.next_unit_vector() * LATERAL_SPREAD,
			})
			.collect();
	}

	/// Advance all particles by `dt` seconds of wall-clock time.
	///
	/// Progress past 1 resets to exactly 0 (not the floating remainder) and
	/// regenerates that particle's lateral offset.
	pub fn advance(&mut self, dt: f64) {
		let speed = self.intensity.profile().speed;
		for particle in &mut self.particles {
			particle.progress += speed * dt;
			if particle.progress > 1.0 {
				particle.progress = 0.0;
				particle.lateral = self.rng.next_unit_vector() * LATERAL_SPREAD;
			}
		}
	}

	/// Recompute the world-space position buffer against the link's current
	/// arc. Perturbed points are re-projected onto the sphere so particles
	/// hug the surface instead of floating off it.
	pub fn update_positions(&mut self, arc: &GreatCircle) -> &[DVec3] {
		let radius = arc.radius();
		self.positions.clear();
		self.positions.extend(self.particles.iter().map(|particle| {
			let on_arc = arc.point_at(particle.progress);
			let perturbed = on_arc + particle.lateral * radius;
			perturbed.normalize_or(DVec3::Y) * radius
		}));
		&self.positions
	}

	/// Last computed position buffer (valid until the next `update_positions`).
	pub fn positions(&self) -> &[DVec3] {
		&self.positions
	}

	#[cfg(test)]
	fn progress_values(&self) -> Vec<f64> {
		self.particles.iter().map(|p| p.progress).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn intensity_table_is_monotonic() {
		let low = TrafficIntensity::Low.profile();
		let medium = TrafficIntensity::Medium.profile();
		let high = TrafficIntensity::High.profile();
		assert!(low.particle_count < medium.particle_count);
		assert!(medium.particle_count < high.particle_count);
		assert!(low.speed < medium.speed && medium.speed < high.speed);
		assert!(low.point_size < medium.point_size && medium.point_size < high.point_size);
	}

	#[test]
	fn particle_count_follows_intensity() {
		let mut flow = TrafficFlow::new(TrafficIntensity::Low, 1);
		assert_eq!(flow.particles.len(), 6);
		flow.set_intensity(TrafficIntensity::High);
		assert_eq!(flow.particles.len(), 20);
	}

	#[test]
	fn wrap_resets_progress_to_exactly_zero() {
		let mut flow = TrafficFlow::new(TrafficIntensity::High, 3);
		// Force every particle near the end of the arc.
		for particle in &mut flow.particles {
			particle.progress = 0.99;
		}
		let before: Vec<DVec3> = flow.particles.iter().map(|p| p.lateral).collect();
		// 0.99 + 0.30 * 0.1 = 1.02 > 1, so all wrap.
		flow.advance(0.1);
		for (particle, old_lateral) in flow.particles.iter().zip(before) {
			assert_eq!(particle.progress, 0.0);
			assert_ne!(particle.lateral, old_lateral);
		}
	}

	#[test]
	fn progress_at_exactly_one_does_not_wrap_early() {
		let mut flow = TrafficFlow::new(TrafficIntensity::Low, 5);
		for particle in &mut flow.particles {
			particle.progress = 1.0;
		}
		// The reset rule is strictly greater-than: exactly 1.0 holds.
		flow.advance(0.0);
		for particle in &flow.particles {
			assert_eq!(particle.progress, 1.0);
		}
		flow.advance(1e-9);
		for particle in &flow.particles {
			assert_eq!(particle.progress, 0.0);
		}
	}

	#[test]
	fn advancing_a_full_cycle_returns_to_start_modulo_reset() {
		let mut flow = TrafficFlow::new(TrafficIntensity::Medium, 9);
		let start = flow.progress_values();
		let speed = TrafficIntensity::Medium.profile().speed;
		// 1/speed seconds moves every particle by exactly one full arc; each
		// crossed the wrap once, so it ends where it started minus the
		// overshoot truncated by the exact-reset rule (< one step increment).
		let steps = 1000;
		for _ in 0..steps {
			flow.advance(1.0 / speed / steps as f64);
		}
		let step_increment = 1.0 / steps as f64;
		for (now, then) in flow.progress_values().iter().zip(start) {
			assert!((now - then).abs() <= step_increment + 1e-9, "now={now} then={then}");
		}
	}

	#[test]
	fn positions_hug_the_sphere() {
		let arc = GreatCircle::between(DVec3::X, DVec3::Y, 8.0);
		let mut flow = TrafficFlow::new(TrafficIntensity::High, 11);
		flow.advance(0.25);
		for p in flow.update_positions(&arc) {
			assert!((p.length() - 8.0).abs() < 1e-9);
		}
	}
}
