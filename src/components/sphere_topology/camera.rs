use glam::{DQuat, DVec3};

use super::math::ease_in_out_cubic;

const WORLD_UP: DVec3 = DVec3::Y;

/// Duration of the eased camera move toward a selection.
pub const TWEEN_DURATION: f64 = 1.5;
/// Seconds of pointer silence before auto-rotation resumes.
pub const IDLE_RESUME_SECS: f64 = 5.0;
/// Auto-rotation yaw rate in rad/s.
const AUTO_ROTATE_RATE: f64 = 0.15;
/// Camera distance from the sphere center, as a multiple of its radius.
const FRAME_DISTANCE_FACTOR: f64 = 2.75;
/// Height bias added when framing a selection, as a multiple of the radius.
const FRAME_HEIGHT_BIAS: f64 = 0.45;
const MIN_DISTANCE_FACTOR: f64 = 1.4;
const MAX_DISTANCE_FACTOR: f64 = 8.0;
const MAX_PITCH: f64 = 1.35;
const NEAR_PLANE: f64 = 0.1;

#[derive(Clone, Debug)]
struct CameraTween {
	from: DVec3,
	to: DVec3,
	elapsed: f64,
	duration: f64,
}

/// A world point mapped to canvas space.
#[derive(Clone, Copy, Debug)]
pub struct Projected {
	pub x: f64,
	pub y: f64,
	/// Distance along the view axis; larger is farther from the camera.
	pub depth: f64,
	/// Pixels per world unit at this depth.
	pub scale: f64,
}

/// Orbit camera around the sphere center.
///
/// The orbit target is pinned at the origin; selections move only the eye,
/// via a time-based cubic in-out tween. Any user interaction suspends
/// auto-rotation, which resumes after `IDLE_RESUME_SECS` of silence.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
	eye: DVec3,
	sphere_radius: f64,
	tween: Option<CameraTween>,
	idle: f64,
	auto_rotate: bool,
}

impl OrbitCamera {
	pub fn new(sphere_radius: f64) -> Self {
		Self {
			eye: DVec3::new(0.0, sphere_radius * 0.9, sphere_radius * FRAME_DISTANCE_FACTOR),
			sphere_radius,
			tween: None,
			idle: IDLE_RESUME_SECS,
			auto_rotate: true,
		}
	}

	pub fn eye(&self) -> DVec3 {
		self.eye
	}

	pub fn is_transitioning(&self) -> bool {
		self.tween.is_some()
	}

	pub fn is_auto_rotating(&self) -> bool {
		self.auto_rotate
	}

	/// Begin the eased move that frames `entity` together with its tooltip
	/// anchor: look along the normalized midpoint of the two, from a fixed
	/// distance, with a height bias.
	pub fn frame_selection(&mut self, entity: DVec3, anchor: DVec3) {
		let direction = ((entity + anchor) * 0.5).normalize_or(DVec3::Z);
		let to = direction * (self.sphere_radius * FRAME_DISTANCE_FACTOR)
			+ WORLD_UP * (self.sphere_radius * FRAME_HEIGHT_BIAS);
		self.tween = Some(CameraTween {
			from: self.eye,
			to,
			elapsed: 0.0,
			duration: TWEEN_DURATION,
		});
	}

	/// Record a pointer/wheel/touch interaction: suspends auto-rotation and
	/// restarts the idle countdown.
	pub fn note_interaction(&mut self) {
		self.idle = 0.0;
		self.auto_rotate = false;
	}

	/// Manual orbit by yaw/pitch deltas in radians. Cancels a running tween.
	pub fn orbit(&mut self, yaw: f64, pitch: f64) {
		self.tween = None;
		let rotated = DQuat::from_rotation_y(yaw) * self.eye;
		let distance = rotated.length();
		let current_pitch = (rotated.y / distance).asin();
		let clamped = (current_pitch + pitch).clamp(-MAX_PITCH, MAX_PITCH);
		let flat = DVec3::new(rotated.x, 0.0, rotated.z).normalize_or(DVec3::Z);
		self.eye = (flat * clamped.cos() + WORLD_UP * clamped.sin()) * distance;
	}

	/// Zoom by moving the eye along its radial direction, clamped so the
	/// camera can neither enter the sphere nor drift out of sight.
	pub fn zoom(&mut self, factor: f64) {
		self.tween = None;
		let distance = (self.eye.length() * factor).clamp(
			self.sphere_radius * MIN_DISTANCE_FACTOR,
			self.sphere_radius * MAX_DISTANCE_FACTOR,
		);
		self.eye = self.eye.normalize_or(DVec3::Z) * distance;
	}

	pub fn tick(&mut self, dt: f64) {
		// Idle accrues during a selection tween too, so auto-rotation resumes
		// IDLE_RESUME_SECS after the click, not after the tween ends.
		self.idle += dt;
		if let Some(tween) = &mut self.tween {
			tween.elapsed += dt;
			let t = (tween.elapsed / tween.duration).min(1.0);
			self.eye = tween.from.lerp(tween.to, ease_in_out_cubic(t));
			if t >= 1.0 {
				self.tween = None;
			}
			return;
		}

		if self.idle >= IDLE_RESUME_SECS {
			self.auto_rotate = true;
		}
		if self.auto_rotate {
			self.eye = DQuat::from_rotation_y(AUTO_ROTATE_RATE * dt) * self.eye;
		}
	}

	fn basis(&self) -> (DVec3, DVec3, DVec3) {
		let forward = (-self.eye).normalize_or(DVec3::NEG_Z);
		let right = forward.cross(WORLD_UP).normalize_or(DVec3::X);
		let up = right.cross(forward);
		(forward, right, up)
	}

	/// Depth cue in [0, 1]: 1 on the camera-facing hemisphere, falling off
	/// toward the far side of the sphere.
	pub fn facing(&self, point: DVec3) -> f64 {
		let (forward, _, _) = self.basis();
		let along = point.dot(forward) / self.sphere_radius.max(1e-9);
		(0.5 - 0.5 * along).clamp(0.0, 1.0)
	}

	/// Perspective-project a world point onto a canvas of the given size.
	/// Returns `None` behind the near plane.
	pub fn project(&self, point: DVec3, width: f64, height: f64) -> Option<Projected> {
		let (forward, right, up) = self.basis();
		let v = point - self.eye;
		let depth = v.dot(forward);
		if depth <= NEAR_PLANE {
			return None;
		}
		let focal = 0.9 * width.min(height);
		let scale = focal / depth;
		Some(Projected {
			x: width / 2.0 + v.dot(right) * scale,
			y: height / 2.0 - v.dot(up) * scale,
			depth,
			scale,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tween_runs_from_current_eye_to_target_with_easing() {
		let mut camera = OrbitCamera::new(8.0);
		let from = camera.eye();
		camera.frame_selection(DVec3::X * 8.0, DVec3::X * 12.0);
		assert!(camera.is_transitioning());

		// Cubic in-out is exactly halfway at t = 0.5.
		camera.tick(TWEEN_DURATION / 2.0);
		let expected_to = DVec3::X * 8.0 * FRAME_DISTANCE_FACTOR + WORLD_UP * 8.0 * FRAME_HEIGHT_BIAS;
		assert!(camera.eye().distance(from.lerp(expected_to, 0.5)) < 1e-9);

		camera.tick(TWEEN_DURATION / 2.0);
		assert!(!camera.is_transitioning());
		assert!(camera.eye().distance(expected_to) < 1e-9);
	}

	#[test]
	fn interaction_suspends_auto_rotation_until_idle_elapses() {
		let mut camera = OrbitCamera::new(8.0);
		assert!(camera.is_auto_rotating());
		camera.note_interaction();
		assert!(!camera.is_auto_rotating());

		let eye = camera.eye();
		camera.tick(IDLE_RESUME_SECS - 0.1);
		assert!(!camera.is_auto_rotating());
		assert_eq!(camera.eye(), eye);

		camera.tick(0.2);
		assert!(camera.is_auto_rotating());
		camera.tick(0.5);
		assert_ne!(camera.eye(), eye);
		// Auto-rotation is a pure yaw: height and distance preserved.
		assert!((camera.eye().y - eye.y).abs() < 1e-9);
		assert!((camera.eye().length() - eye.length()).abs() < 1e-9);
	}

	#[test]
	fn idle_countdown_runs_during_a_selection_tween() {
		let mut camera = OrbitCamera::new(8.0);
		camera.note_interaction();
		camera.frame_selection(DVec3::X * 8.0, DVec3::X * 12.0);

		// Finish the tween, then wait out the remainder of the idle window.
		camera.tick(TWEEN_DURATION);
		assert!(!camera.is_transitioning());
		assert!(!camera.is_auto_rotating());
		camera.tick(IDLE_RESUME_SECS - TWEEN_DURATION - 0.1);
		assert!(!camera.is_auto_rotating());
		camera.tick(0.2);
		assert!(camera.is_auto_rotating());
	}

	#[test]
	fn zoom_clamps_to_the_sphere() {
		let mut camera = OrbitCamera::new(8.0);
		camera.zoom(1e-6);
		assert!((camera.eye().length() - 8.0 * MIN_DISTANCE_FACTOR).abs() < 1e-9);
		camera.zoom(1e9);
		assert!((camera.eye().length() - 8.0 * MAX_DISTANCE_FACTOR).abs() < 1e-9);
	}

	#[test]
	fn sphere_center_projects_to_canvas_center() {
		let camera = OrbitCamera::new(8.0);
		let projected = camera.project(DVec3::ZERO, 800.0, 600.0).unwrap();
		assert!((projected.x - 400.0).abs() < 1e-9);
		assert!((projected.y - 300.0).abs() < 1e-9);
		assert!(projected.depth > 0.0);
	}

	#[test]
	fn points_behind_the_camera_do_not_project() {
		let camera = OrbitCamera::new(8.0);
		let behind = camera.eye() * 2.0;
		assert!(camera.project(behind, 800.0, 600.0).is_none());
	}

	#[test]
	fn near_side_faces_more_than_far_side() {
		let camera = OrbitCamera::new(8.0);
		let near = camera.eye().normalize() * 8.0;
		let far = -near;
		assert!(camera.facing(near) > camera.facing(far));
	}
}
