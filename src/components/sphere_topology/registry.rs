use glam::DVec3;
use std::collections::HashMap;

/// Last-known world-space center per node id.
///
/// The composer writes every presenter's animated center here once per
/// polling tick (~60 Hz); link and tooltip geometry read only from the
/// registry. Consumers therefore lag true node positions by at most one
/// polling interval, which decouples them from the node animation.
#[derive(Clone, Debug, Default)]
pub struct PositionRegistry {
	positions: HashMap<String, DVec3>,
}

impl PositionRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn record(&mut self, id: &str, center: DVec3) {
		self.positions.insert(id.to_owned(), center);
	}

	pub fn get(&self, id: &str) -> Option<DVec3> {
		self.positions.get(id).copied()
	}

	/// Both endpoint positions, or `None` until both have been recorded.
	pub fn endpoints(&self, source: &str, target: &str) -> Option<(DVec3, DVec3)> {
		Some((self.get(source)?, self.get(target)?))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn endpoints_require_both_ids() {
		let mut registry = PositionRegistry::new();
		registry.record("a", DVec3::X);
		assert_eq!(registry.endpoints("a", "b"), None);
		registry.record("b", DVec3::Y);
		assert_eq!(registry.endpoints("a", "b"), Some((DVec3::X, DVec3::Y)));
	}

	#[test]
	fn record_overwrites_previous_position() {
		let mut registry = PositionRegistry::new();
		registry.record("a", DVec3::X);
		registry.record("a", DVec3::Z);
		assert_eq!(registry.get("a"), Some(DVec3::Z));
	}
}
