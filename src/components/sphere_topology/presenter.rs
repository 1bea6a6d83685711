use glam::DVec3;

/// Radial breathing amplitude in world units.
const BREATHE_AMPLITUDE: f64 = 0.1;
/// Breathing angular rate in rad/s.
const BREATHE_RATE: f64 = 0.5;
/// Highlight ramp speed, matching the edge/node hover feel of the renderer.
const HIGHLIGHT_SPEED: f64 = 6.0;

/// Per-node animation and highlight state.
///
/// The presenter owns its mutable visual state (phase, highlight ramp) so
/// nodes never share it; the base position is the immutable layout result.
/// Downstream link/tooltip geometry must read the animated center through the
/// position registry rather than calling into the presenter mid-frame.
#[derive(Clone, Debug)]
pub struct NodePresenter {
	base: DVec3,
	phase: f64,
	center: DVec3,
	highlighted: bool,
	highlight_t: f64,
}

impl NodePresenter {
	/// `index` staggers the breathing phase so nodes don't pulse in lockstep.
	pub fn new(base: DVec3, index: usize) -> Self {
		Self {
			base,
			phase: index as f64 * 0.7,
			center: base,
			highlighted: false,
			highlight_t: 0.0,
		}
	}

	/// Current world-space center, after the breathing offset.
	pub fn center(&self) -> DVec3 {
		self.center
	}

	pub fn set_highlighted(&mut self, highlighted: bool) {
		self.highlighted = highlighted;
	}

	pub fn is_highlighted(&self) -> bool {
		self.highlighted
	}

	/// Smoothed highlight amount in [0, 1] for glow/emissive rendering.
	pub fn highlight_t(&self) -> f64 {
		self.highlight_t
	}

	/// Advance the breathing animation to absolute time `time` and ramp the
	/// highlight toward its target over `dt`.
	pub fn tick(&mut self, time: f64, dt: f64) {
		let radial = self.base.normalize_or(DVec3::Y);
		let offset = BREATHE_AMPLITUDE * (BREATHE_RATE * time + self.phase).sin();
		self.center = self.base + radial * offset;

		let target = if self.highlighted { 1.0 } else { 0.0 };
		self.highlight_t += (target - self.highlight_t) * (HIGHLIGHT_SPEED * dt).min(1.0);
		if !self.highlighted && self.highlight_t < 0.01 {
			self.highlight_t = 0.0;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn breathing_is_radial_and_bounded() {
		let base = DVec3::new(8.0, 0.0, 0.0);
		let mut presenter = NodePresenter::new(base, 0);
		for i in 0..200 {
			presenter.tick(i as f64 * 0.05, 0.05);
			let center = presenter.center();
			// Offset stays along the radial direction: y and z unchanged.
			assert_eq!(center.y, 0.0);
			assert_eq!(center.z, 0.0);
			assert!((center.x - base.x).abs() <= BREATHE_AMPLITUDE + 1e-12);
		}
	}

	#[test]
	fn distinct_indices_breathe_out_of_phase() {
		let base = DVec3::new(0.0, 8.0, 0.0);
		let mut a = NodePresenter::new(base, 0);
		let mut b = NodePresenter::new(base, 3);
		a.tick(1.0, 0.016);
		b.tick(1.0, 0.016);
		assert_ne!(a.center(), b.center());
	}

	#[test]
	fn highlight_ramps_up_and_decays_to_zero() {
		let mut presenter = NodePresenter::new(DVec3::X * 8.0, 0);
		presenter.set_highlighted(true);
		for _ in 0..60 {
			presenter.tick(0.0, 0.016);
		}
		assert!(presenter.highlight_t() > 0.9);
		presenter.set_highlighted(false);
		for _ in 0..120 {
			presenter.tick(0.0, 0.016);
		}
		assert_eq!(presenter.highlight_t(), 0.0);
	}
}
