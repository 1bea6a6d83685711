use glam::DVec3;

pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Cubic in-out easing used by time-based camera tweens.
pub fn ease_in_out_cubic(t: f64) -> f64 {
	if t < 0.5 {
		4.0 * t * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
	}
}

/// Deterministic xorshift64 generator. Particle phases and lateral offsets
/// must be reproducible across runs (and in tests), so no entropy source.
#[derive(Clone, Debug)]
pub struct XorShift(u64);

impl XorShift {
	pub fn new(seed: u64) -> Self {
		// xorshift state must be nonzero
		Self(seed | 1)
	}

	fn next_u64(&mut self) -> u64 {
		let mut x = self.0;
		x ^= x << 13;
		x ^= x >> 7;
		x ^= x << 17;
		self.0 = x;
		x
	}

	/// Uniform in [0, 1).
	pub fn next_f64(&mut self) -> f64 {
		(self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
	}

	/// Uniform in [-1, 1).
	pub fn next_signed(&mut self) -> f64 {
		self.next_f64() * 2.0 - 1.0
	}

	/// Random direction, roughly uniform over the sphere (rejection-free
	/// cube sampling is fine at this visual precision).
	pub fn next_unit_vector(&mut self) -> DVec3 {
		let v = DVec3::new(self.next_signed(), self.next_signed(), self.next_signed());
		if v.length_squared() < 1e-12 {
			DVec3::X
		} else {
			v.normalize()
		}
	}
}
