mod arc;
mod camera;
mod component;
mod layout;
mod math;
mod presenter;
mod registry;
mod render;
mod state;
mod tooltip;
mod traffic;
mod types;

pub use component::SphereTopologyCanvas;
pub use types::{TopologyData, TopologyLink, TopologyNode, TrafficIntensity, WidgetConfig};
