use glam::DVec3;
use std::f64::consts::PI;

/// Golden-angle (Fibonacci) spiral: near-uniform coverage of the sphere for
/// any point count, deterministic in the index.
pub fn sphere_positions(count: usize, radius: f64) -> Vec<DVec3> {
	(0..count).map(|i| sphere_position(i, count, radius)).collect()
}

/// Position of slot `index` in a `count`-point spiral, scaled to `radius`.
pub fn sphere_position(index: usize, count: usize, radius: f64) -> DVec3 {
	if count <= 1 {
		// A single node sits at the pole; the spiral formula divides by
		// count - 1.
		return DVec3::Y * radius;
	}
	let golden_angle = PI * (3.0 - 5.0_f64.sqrt());
	let y = 1.0 - 2.0 * index as f64 / (count as f64 - 1.0);
	let r_y = (1.0 - y * y).max(0.0).sqrt();
	let theta = index as f64 * golden_angle;
	DVec3::new(theta.cos() * r_y, y, theta.sin() * r_y) * radius
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn all_points_on_sphere_and_distinct() {
		for count in [2usize, 3, 8, 50, 257] {
			let radius = 8.0;
			let points = sphere_positions(count, radius);
			assert_eq!(points.len(), count);
			for (i, p) in points.iter().enumerate() {
				assert!(
					(p.length() - radius).abs() < 1e-9,
					"count={count} i={i} |p|={}",
					p.length()
				);
				for q in &points[..i] {
					assert!(p.distance(*q) > 1e-6, "duplicate point at count={count}");
				}
			}
		}
	}

	#[test]
	fn single_node_is_the_pole() {
		assert_eq!(sphere_positions(1, 5.0), vec![DVec3::new(0.0, 5.0, 0.0)]);
	}

	#[test]
	fn spiral_spans_both_poles() {
		let points = sphere_positions(10, 1.0);
		assert!((points[0].y - 1.0).abs() < 1e-9);
		assert!((points[9].y + 1.0).abs() < 1e-9);
	}
}
