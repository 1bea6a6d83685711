use serde::{Deserialize, Serialize};

/// A node of the topology graph. `position` is a direction from the sphere
/// center; its magnitude is ignored and the point is re-scaled to the
/// configured sphere radius at load time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TopologyNode {
	pub id: String,
	pub position: [f64; 3],
}

/// Discrete traffic-volume classification for a link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficIntensity {
	Low,
	Medium,
	High,
}

impl TrafficIntensity {
	pub fn label(self) -> &'static str {
		match self {
			TrafficIntensity::Low => "low",
			TrafficIntensity::Medium => "medium",
			TrafficIntensity::High => "high",
		}
	}
}

/// A directed link between two node ids.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopologyLink {
	pub source: String,
	pub target: String,
	pub traffic_intensity: TrafficIntensity,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TopologyData {
	pub nodes: Vec<TopologyNode>,
	pub links: Vec<TopologyLink>,
}

impl TopologyData {
	/// Built-in 8-node demo topology used when the embedding page supplies no
	/// data of its own.
	pub fn demo() -> Self {
		let nodes = [
			("gateway", [0.0, 1.0, 0.2]),
			("core-1", [0.9, 0.3, -0.3]),
			("core-2", [-0.8, 0.4, 0.5]),
			("edge-eu", [0.2, -0.4, 0.9]),
			("edge-us", [-0.6, -0.5, -0.6]),
			("edge-ap", [0.8, -0.3, 0.5]),
			("store", [-0.2, 0.8, -0.6]),
			("analytics", [0.1, -0.9, -0.3]),
		]
		.into_iter()
		.map(|(id, position)| TopologyNode {
			id: id.into(),
			position,
		})
		.collect();

		let links = [
			("gateway", "core-1", TrafficIntensity::High),
			("gateway", "core-2", TrafficIntensity::High),
			("core-1", "edge-us", TrafficIntensity::Medium),
			("core-1", "edge-ap", TrafficIntensity::Medium),
			("core-2", "edge-eu", TrafficIntensity::Medium),
			("core-2", "store", TrafficIntensity::Low),
			("edge-eu", "analytics", TrafficIntensity::Low),
			("edge-us", "analytics", TrafficIntensity::Low),
			("store", "analytics", TrafficIntensity::Medium),
			("edge-ap", "edge-eu", TrafficIntensity::Low),
		]
		.into_iter()
		.map(|(source, target, traffic_intensity)| TopologyLink {
			source: source.into(),
			target: target.into(),
			traffic_intensity,
		})
		.collect();

		Self { nodes, links }
	}
}

/// Options recognized by the embedding entry point. Unknown fields are
/// ignored; missing fields fall back to the documented defaults.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
	#[serde(default)]
	pub data: Option<TopologyData>,
	#[serde(default = "default_true")]
	pub is_dark_mode: bool,
	#[serde(default = "default_true")]
	pub show_control_panel: bool,
}

impl Default for WidgetConfig {
	fn default() -> Self {
		Self {
			data: None,
			is_dark_mode: true,
			show_control_panel: true,
		}
	}
}

fn default_true() -> bool {
	true
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn intensity_wire_format_is_lowercase() {
		let link: TopologyLink = serde_json::from_str(
			r#"{"source":"a","target":"b","trafficIntensity":"high"}"#,
		)
		.unwrap();
		assert_eq!(link.traffic_intensity, TrafficIntensity::High);
	}

	#[test]
	fn config_fields_fall_back_to_defaults() {
		let cfg: WidgetConfig = serde_json::from_str("{}").unwrap();
		assert!(cfg.data.is_none());
		assert!(cfg.is_dark_mode);
		assert!(cfg.show_control_panel);

		let cfg: WidgetConfig =
			serde_json::from_str(r#"{"isDarkMode":false,"showControlPanel":false}"#).unwrap();
		assert!(!cfg.is_dark_mode);
		assert!(!cfg.show_control_panel);
	}

	#[test]
	fn demo_topology_links_reference_existing_nodes() {
		let data = TopologyData::demo();
		assert_eq!(data.nodes.len(), 8);
		for link in &data.links {
			assert!(data.nodes.iter().any(|n| n.id == link.source));
			assert!(data.nodes.iter().any(|n| n.id == link.target));
		}
	}
}
