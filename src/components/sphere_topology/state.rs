use std::collections::HashMap;

use glam::DVec3;
use log::warn;

use super::arc::GreatCircle;
use super::camera::OrbitCamera;
use super::layout;
use super::presenter::NodePresenter;
use super::registry::PositionRegistry;
use super::tooltip::{EntityRef, TooltipEngine, TooltipState, offset_anchor};
use super::traffic::TrafficFlow;
use super::types::{TopologyData, TopologyLink, TrafficIntensity};

/// Radius every node direction is scaled to at load time.
pub const SPHERE_RADIUS: f64 = 8.0;
/// Cadence at which live node centers are sampled into the registry.
const POLL_INTERVAL: f64 = 1.0 / 60.0;
/// Pointer hit radii in CSS pixels.
pub const NODE_HIT_RADIUS: f64 = 14.0;
pub const LINK_HIT_RADIUS: f64 = 9.0;
/// Polyline resolution for drawing and hit-testing link arcs.
pub const LINK_SEGMENTS: usize = 32;

const ORBIT_SENSITIVITY: f64 = 0.005;

#[derive(Clone, Debug)]
pub struct ResolvedNode {
	pub id: String,
	/// Layout result: on the sphere, magnitude `SPHERE_RADIUS`.
	pub position: DVec3,
}

/// A link plus everything derived from it at runtime.
#[derive(Clone, Debug)]
pub struct LinkState {
	pub data: TopologyLink,
	/// Node indices, or `None` when the link names an unknown id; such links
	/// are excluded from geometry, rendering, and cycling.
	pub endpoints: Option<(usize, usize)>,
	pub flow: TrafficFlow,
	/// Rebuilt from registry positions at the polling cadence; `None` until
	/// both endpoints have been polled at least once.
	pub arc: Option<GreatCircle>,
	/// Cached arc polyline for drawing and pointer hit-testing.
	pub samples: Vec<DVec3>,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub last_x: f64,
	pub last_y: f64,
}

/// Owns the topology and composes layout, presenters, traffic, tooltip and
/// camera into one frame-driven scene.
pub struct SphereTopologyState {
	pub nodes: Vec<ResolvedNode>,
	pub presenters: Vec<NodePresenter>,
	pub links: Vec<LinkState>,
	pub registry: PositionRegistry,
	pub camera: OrbitCamera,
	pub tooltip: TooltipEngine,
	pub drag: DragState,
	pub hovered: Option<EntityRef>,
	pub dark_mode: bool,
	pub radius: f64,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	time: f64,
	poll_accum: f64,
}

impl SphereTopologyState {
	pub fn new(data: &TopologyData, width: f64, height: f64, dark_mode: bool) -> Self {
		let count = data.nodes.len();
		let mut id_to_idx = HashMap::new();
		let mut nodes = Vec::with_capacity(count);

		for (i, node) in data.nodes.iter().enumerate() {
			let direction = DVec3::from_array(node.position);
			// Positions are directions from the sphere center; degenerate
			// input falls back to this node's golden-spiral slot.
			let position = if direction.length_squared() < 1e-12 {
				layout::sphere_position(i, count, SPHERE_RADIUS)
			} else {
				direction.normalize() * SPHERE_RADIUS
			};
			if id_to_idx.insert(node.id.clone(), i).is_some() {
				warn!("duplicate node id '{}', later definition wins", node.id);
			}
			nodes.push(ResolvedNode {
				id: node.id.clone(),
				position,
			});
		}

		// Derived once from a reference node and reused for anchors, offsets
		// and camera framing.
		let radius = nodes
			.first()
			.map(|n| n.position.length())
			.unwrap_or(SPHERE_RADIUS);

		let presenters = nodes
			.iter()
			.enumerate()
			.map(|(i, node)| NodePresenter::new(node.position, i))
			.collect();

		let links = data
			.links
			.iter()
			.enumerate()
			.map(|(i, link)| {
				let endpoints = match (id_to_idx.get(&link.source), id_to_idx.get(&link.target)) {
					(Some(&s), Some(&t)) => Some((s, t)),
					_ => {
						warn!(
							"link '{}' -> '{}' references an unknown node id; excluded",
							link.source, link.target
						);
						None
					}
				};
				LinkState {
					data: link.clone(),
					endpoints,
					flow: TrafficFlow::new(link.traffic_intensity, (i as u64 + 1) * 0x9E3779B9),
					arc: None,
					samples: Vec::new(),
				}
			})
			.collect();

		Self {
			nodes,
			presenters,
			links,
			registry: PositionRegistry::new(),
			camera: OrbitCamera::new(radius),
			tooltip: TooltipEngine::new(),
			drag: DragState::default(),
			hovered: None,
			dark_mode,
			radius,
			width,
			height,
			animation_running: true,
			time: 0.0,
			// First tick polls immediately so link geometry appears as soon
			// as node centers exist.
			poll_accum: POLL_INTERVAL,
		}
	}

	/// Advance every animated subsystem by `dt` seconds of wall-clock time.
	pub fn tick(&mut self, dt: f64) {
		self.time += dt;
		for presenter in &mut self.presenters {
			presenter.tick(self.time, dt);
		}

		// Registry poll: link/tooltip geometry reads these sampled centers,
		// never the presenters directly, so it lags by at most one interval.
		self.poll_accum += dt;
		if self.poll_accum >= POLL_INTERVAL {
			self.poll_accum = 0.0;
			for (node, presenter) in self.nodes.iter().zip(&self.presenters) {
				self.registry.record(&node.id, presenter.center());
			}
			let radius = self.radius;
			for link in &mut self.links {
				link.arc = link.endpoints.and_then(|_| {
					let (a, b) = self
						.registry
						.endpoints(&link.data.source, &link.data.target)?;
					Some(GreatCircle::between(a, b, radius))
				});
				link.samples = match &link.arc {
					Some(arc) => arc.sample(LINK_SEGMENTS),
					None => Vec::new(),
				};
			}
		}

		for link in &mut self.links {
			link.flow.advance(dt);
			if let Some(arc) = &link.arc {
				link.flow.update_positions(arc);
			}
		}

		self.camera.tick(dt);

		let (nodes, links, registry, radius) =
			(&self.nodes, &self.links, &self.registry, self.radius);
		self.tooltip.tick(dt, nodes.len(), links.len(), |entity| {
			build_tooltip(nodes, links, registry, radius, entity)
		});
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn set_dark_mode(&mut self, dark_mode: bool) {
		self.dark_mode = dark_mode;
	}

	/// Control-panel intensity change for one link.
	pub fn set_intensity(&mut self, link_idx: usize, intensity: TrafficIntensity) {
		if let Some(link) = self.links.get_mut(link_idx) {
			link.data.traffic_intensity = intensity;
			link.flow.set_intensity(intensity);
		}
	}

	/// The entity under a canvas-space pointer position, nodes taking
	/// priority over the links they sit on.
	pub fn entity_at(&self, x: f64, y: f64) -> Option<EntityRef> {
		let mut best: Option<(f64, EntityRef)> = None;
		for (i, presenter) in self.presenters.iter().enumerate() {
			if let Some(p) = self.camera.project(presenter.center(), self.width, self.height) {
				let d = ((p.x - x).powi(2) + (p.y - y).powi(2)).sqrt();
				if d < NODE_HIT_RADIUS && best.is_none_or(|(bd, _)| d < bd) {
					best = Some((d, EntityRef::Node(i)));
				}
			}
		}
		if best.is_some() {
			return best.map(|(_, e)| e);
		}

		for (i, link) in self.links.iter().enumerate() {
			for sample in &link.samples {
				if let Some(p) = self.camera.project(*sample, self.width, self.height) {
					let d = ((p.x - x).powi(2) + (p.y - y).powi(2)).sqrt();
					if d < LINK_HIT_RADIUS && best.is_none_or(|(bd, _)| d < bd) {
						best = Some((d, EntityRef::Link(i)));
					}
				}
			}
		}
		best.map(|(_, e)| e)
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		self.camera.note_interaction();
		self.tooltip.note_interaction();

		if let Some(entity) = self.entity_at(x, y) {
			let (nodes, links, registry, radius) =
				(&self.nodes, &self.links, &self.registry, self.radius);
			let selected = self
				.tooltip
				.select(entity, |e| build_tooltip(nodes, links, registry, radius, e))
				.map(|state| (state.target, state.anchor));
			if let Some((target, anchor)) = selected {
				self.camera.frame_selection(target, anchor);
			}
			self.apply_highlights();
		} else {
			self.drag.active = true;
			self.drag.last_x = x;
			self.drag.last_y = y;
		}
	}

	pub fn pointer_moved(&mut self, x: f64, y: f64) {
		self.camera.note_interaction();
		self.tooltip.note_interaction();

		if self.drag.active {
			let (dx, dy) = (x - self.drag.last_x, y - self.drag.last_y);
			self.drag.last_x = x;
			self.drag.last_y = y;
			self.camera.orbit(-dx * ORBIT_SENSITIVITY, dy * ORBIT_SENSITIVITY);
			return;
		}

		let hovered = self.entity_at(x, y);
		if hovered != self.hovered {
			self.hovered = hovered;
			let (nodes, links, registry, radius) =
				(&self.nodes, &self.links, &self.registry, self.radius);
			self.tooltip
				.hover(hovered, |e| build_tooltip(nodes, links, registry, radius, e));
			self.apply_highlights();
		}
	}

	pub fn pointer_up(&mut self) {
		self.drag.active = false;
	}

	pub fn pointer_left(&mut self) {
		self.drag.active = false;
		if self.hovered.take().is_some() {
			self.tooltip.hover(None, |_| None);
			self.apply_highlights();
		}
	}

	pub fn wheel_zoom(&mut self, delta_y: f64) {
		self.camera.note_interaction();
		self.tooltip.note_interaction();
		let factor = if delta_y > 0.0 { 1.1 } else { 0.9 };
		self.camera.zoom(factor);
	}

	/// Touch interaction only suspends auto-rotation in the current scope.
	pub fn touch_interaction(&mut self) {
		self.camera.note_interaction();
		self.tooltip.note_interaction();
	}

	fn apply_highlights(&mut self) {
		for presenter in &mut self.presenters {
			presenter.set_highlighted(false);
		}
		let pinned = self
			.tooltip
			.current()
			.filter(|t| t.pinned)
			.map(|t| t.entity);
		for entity in [self.hovered, pinned].into_iter().flatten() {
			match entity {
				EntityRef::Node(i) => {
					if let Some(p) = self.presenters.get_mut(i) {
						p.set_highlighted(true);
					}
				}
				EntityRef::Link(i) => {
					if let Some((s, t)) = self.links.get(i).and_then(|l| l.endpoints) {
						if let Some(p) = self.presenters.get_mut(s) {
							p.set_highlighted(true);
						}
						if let Some(p) = self.presenters.get_mut(t) {
							p.set_highlighted(true);
						}
					}
				}
			}
		}
	}
}

/// Resolve an entity into a displayable tooltip from registry positions.
/// Returns `None` for malformed links or ids not yet polled, which callers
/// treat as "skip".
fn build_tooltip(
	nodes: &[ResolvedNode],
	links: &[LinkState],
	registry: &PositionRegistry,
	radius: f64,
	entity: EntityRef,
) -> Option<TooltipState> {
	match entity {
		EntityRef::Node(i) => {
			let node = nodes.get(i)?;
			let center = registry.get(&node.id)?;
			let degree = links
				.iter()
				.filter(|l| {
					l.endpoints
						.is_some_and(|(s, t)| s == i || t == i)
				})
				.count();
			Some(TooltipState {
				entity,
				anchor: offset_anchor(center, radius),
				target: center,
				title: node.id.clone(),
				lines: vec![
					format!("{degree} link(s)"),
					format!(
						"({:.1}, {:.1}, {:.1})",
						node.position.x, node.position.y, node.position.z
					),
				],
				pinned: false,
			})
		}
		EntityRef::Link(i) => {
			let link = links.get(i)?;
			link.endpoints?;
			let (a, b) = registry.endpoints(&link.data.source, &link.data.target)?;
			let arc = link.arc.as_ref()?;
			let profile = link.data.traffic_intensity.profile();
			Some(TooltipState {
				entity,
				anchor: offset_anchor(arc.midpoint(), radius),
				// Aim at the arc, not the chord midpoint the arc bows away
				// from.
				target: arc.closest_sample_to((a + b) * 0.5),
				title: format!("{} \u{2192} {}", link.data.source, link.data.target),
				lines: vec![
					format!("traffic: {}", link.data.traffic_intensity.label()),
					format!("{} particles", profile.particle_count),
				],
				pinned: false,
			})
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::sphere_topology::tooltip::TooltipMode;
	use crate::components::sphere_topology::types::TopologyNode;

	fn two_node_topology() -> TopologyData {
		TopologyData {
			nodes: vec![
				TopologyNode {
					id: "a".into(),
					position: [1.0, 0.0, 0.0],
				},
				TopologyNode {
					id: "b".into(),
					position: [0.0, 1.0, 0.0],
				},
			],
			links: vec![TopologyLink {
				source: "a".into(),
				target: "b".into(),
				traffic_intensity: TrafficIntensity::High,
			}],
		}
	}

	#[test]
	fn layout_scales_every_node_to_the_sphere_radius() {
		let state = SphereTopologyState::new(&two_node_topology(), 800.0, 600.0, true);
		for node in &state.nodes {
			assert!((node.position.length() - 8.0).abs() < 1e-9);
		}
	}

	#[test]
	fn zero_direction_falls_back_to_spiral_slot() {
		let data = TopologyData {
			nodes: vec![
				TopologyNode {
					id: "a".into(),
					position: [0.0, 0.0, 0.0],
				},
				TopologyNode {
					id: "b".into(),
					position: [0.0, 0.0, 0.0],
				},
			],
			links: vec![],
		};
		let state = SphereTopologyState::new(&data, 800.0, 600.0, true);
		assert!((state.nodes[0].position.length() - 8.0).abs() < 1e-9);
		assert!(state.nodes[0].position.distance(state.nodes[1].position) > 1.0);
	}

	#[test]
	fn arc_midpoint_is_on_sphere_unlike_chord_midpoint() {
		let mut state = SphereTopologyState::new(&two_node_topology(), 800.0, 600.0, true);
		state.tick(0.02);

		let arc = state.links[0].arc.as_ref().expect("arc after first poll");
		let mid = arc.midpoint();
		assert!((mid.length() - 8.0).abs() < 1e-9);

		let (a, b) = state.registry.endpoints("a", "b").unwrap();
		let chord_mid = (a + b) * 0.5;
		assert!(chord_mid.length() < 8.0 - 1.0);
		assert!(arc.closest_sample_to(chord_mid).distance(mid) < 1e-6);
	}

	#[test]
	fn link_geometry_waits_for_the_first_registry_poll() {
		let state = SphereTopologyState::new(&two_node_topology(), 800.0, 600.0, true);
		assert!(state.links[0].arc.is_none());
		assert!(state.links[0].samples.is_empty());
	}

	#[test]
	fn malformed_link_is_excluded_but_nodes_still_cycle() {
		let mut data = two_node_topology();
		data.links[0].target = "missing".into();
		let mut state = SphereTopologyState::new(&data, 800.0, 600.0, true);
		assert!(state.links[0].endpoints.is_none());

		for _ in 0..10 {
			state.tick(3.0);
			let entity = state.tooltip.current().expect("cycle keeps running").entity;
			assert!(matches!(entity, EntityRef::Node(_)));
		}
	}

	#[test]
	fn node_only_topology_supports_auto_cycle() {
		let data = TopologyData {
			nodes: vec![TopologyNode {
				id: "solo".into(),
				position: [0.0, 0.0, 1.0],
			}],
			links: vec![],
		};
		let mut state = SphereTopologyState::new(&data, 800.0, 600.0, true);
		state.tick(0.02);
		let tooltip = state.tooltip.current().unwrap();
		assert_eq!(tooltip.entity, EntityRef::Node(0));
		assert_eq!(tooltip.title, "solo");
	}

	#[test]
	fn clicking_a_node_pins_the_tooltip_and_frames_the_camera() {
		let mut state = SphereTopologyState::new(&two_node_topology(), 800.0, 600.0, true);
		state.tick(0.02);

		let projected = state
			.camera
			.project(state.presenters[0].center(), 800.0, 600.0)
			.expect("node a visible");
		state.pointer_down(projected.x, projected.y);

		let tooltip = state.tooltip.current().expect("pinned tooltip");
		assert!(tooltip.pinned);
		assert_eq!(tooltip.entity, EntityRef::Node(0));
		assert!(state.camera.is_transitioning());
		assert!(state.presenters[0].is_highlighted());

		// Anchor sits 1.5x the radius out along the node's radial.
		assert!((tooltip.anchor.length() - 12.0).abs() < 1e-6);

		// 5s of pointer silence releases the pin and resumes auto-cycling;
		// the camera resumes rotating after its own idle window.
		for _ in 0..70 {
			state.tick(0.1);
		}
		assert_eq!(state.tooltip.mode(), TooltipMode::AutoCycle);
		assert!(!state.tooltip.is_pinned());
		assert!(state.camera.is_auto_rotating());
	}

	#[test]
	fn hovering_a_node_highlights_it_and_leaving_clears() {
		let mut state = SphereTopologyState::new(&two_node_topology(), 800.0, 600.0, true);
		state.tick(0.02);

		let projected = state
			.camera
			.project(state.presenters[1].center(), 800.0, 600.0)
			.unwrap();
		state.pointer_moved(projected.x, projected.y);
		assert_eq!(state.hovered, Some(EntityRef::Node(1)));
		assert!(state.presenters[1].is_highlighted());
		assert_eq!(
			state.tooltip.current().map(|t| t.entity),
			Some(EntityRef::Node(1))
		);

		state.pointer_left();
		assert_eq!(state.hovered, None);
		assert!(!state.presenters[1].is_highlighted());
		assert!(state.tooltip.current().is_none());
	}

	#[test]
	fn intensity_change_resizes_the_particle_stream() {
		let mut state = SphereTopologyState::new(&two_node_topology(), 800.0, 600.0, true);
		state.tick(0.02);
		assert_eq!(state.links[0].flow.positions().len(), 20);

		state.set_intensity(0, TrafficIntensity::Low);
		state.tick(0.02);
		assert_eq!(state.links[0].data.traffic_intensity, TrafficIntensity::Low);
		assert_eq!(state.links[0].flow.positions().len(), 6);
	}

	#[test]
	fn wheel_zoom_suspends_auto_rotation() {
		let mut state = SphereTopologyState::new(&two_node_topology(), 800.0, 600.0, true);
		assert!(state.camera.is_auto_rotating());
		state.wheel_zoom(1.0);
		assert!(!state.camera.is_auto_rotating());
	}
}
