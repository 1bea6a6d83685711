use glam::{DQuat, DVec3};
use std::f64::consts::PI;

/// Reference direction the endpoint rotations are built from.
const UP: DVec3 = DVec3::Y;

/// Dot-product margin below which two directions count as coincident (or,
/// negated, antipodal).
const DEGENERATE_DOT: f64 = 1.0 - 1e-9;

/// Number of samples used when searching the arc for the point nearest the
/// chord midpoint.
pub const ARC_SAMPLES: usize = 32;

/// Great-circle arc between two points on the same sphere.
///
/// Both endpoints are taken as directions from the sphere center; points are
/// produced by slerping between the rotations that carry a reference up
/// vector onto each direction, so every sample has magnitude `radius` by
/// construction. This is robust near antipodal pairs where
/// lerp-then-normalize collapses.
#[derive(Clone, Debug)]
pub struct GreatCircle {
	start_rotation: DQuat,
	end_rotation: DQuat,
	radius: f64,
}

impl GreatCircle {
	/// Build the arc between `start` and `end`, scaled to `radius`.
	///
	/// Degenerate inputs get a stable fallback: coincident directions
	/// collapse the arc onto the start point; antipodal directions rotate
	/// through a deterministic orthogonal axis of the start direction, so
	/// the same half-circle is chosen every frame.
	pub fn between(start: DVec3, end: DVec3, radius: f64) -> Self {
		let a = start.normalize_or(UP);
		let b = end.normalize_or(UP);
		let start_rotation = DQuat::from_rotation_arc(UP, a);

		let dot = a.dot(b);
		let end_rotation = if dot >= DEGENERATE_DOT {
			start_rotation
		} else if dot <= -DEGENERATE_DOT {
			DQuat::from_axis_angle(a.any_orthonormal_vector(), PI) * start_rotation
		} else {
			DQuat::from_rotation_arc(UP, b)
		};

		Self {
			start_rotation,
			end_rotation,
			radius,
		}
	}

	pub fn radius(&self) -> f64 {
		self.radius
	}

	/// Point on the arc at fraction `t` in [0, 1].
	pub fn point_at(&self, t: f64) -> DVec3 {
		(self.start_rotation.slerp(self.end_rotation, t) * UP) * self.radius
	}

	/// Midpoint of the arc (t = 0.5), used for link anchors.
	pub fn midpoint(&self) -> DVec3 {
		self.point_at(0.5)
	}

	/// Evenly spaced samples from t = 0 to t = 1 inclusive.
	pub fn sample(&self, segments: usize) -> Vec<DVec3> {
		let segments = segments.max(1);
		(0..=segments)
			.map(|i| self.point_at(i as f64 / segments as f64))
			.collect()
	}

	/// The arc sample nearest to `point`, at `ARC_SAMPLES` resolution. Used
	/// to aim tooltip connectors at the arc rather than the chord midpoint,
	/// which the arc bows away from.
	pub fn closest_sample_to(&self, point: DVec3) -> DVec3 {
		self.sample(ARC_SAMPLES)
			.into_iter()
			.min_by(|p, q| {
				p.distance_squared(point)
					.total_cmp(&q.distance_squared(point))
			})
			.unwrap_or_else(|| self.point_at(0.0))
	}
}
