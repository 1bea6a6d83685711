use leptos::prelude::*;

use super::control_panel::ControlPanel;
use super::sphere_topology::{SphereTopologyCanvas, TopologyData, TrafficIntensity};

/// Composed widget: canvas scene plus the optional control panel, wired
/// together through signals.
#[component]
pub fn SphereTopologyView(
	#[prop(default = TopologyData::demo())] data: TopologyData,
	#[prop(default = true)] is_dark_mode: bool,
	#[prop(default = true)] show_control_panel: bool,
	#[prop(default = false)] fullscreen: bool,
) -> impl IntoView {
	let dark_mode = RwSignal::new(is_dark_mode);
	let intensities: RwSignal<Vec<TrafficIntensity>> = RwSignal::new(
		data.links.iter().map(|l| l.traffic_intensity).collect(),
	);
	let data = Signal::stored(data);

	view! {
		<div class="sphere-topology-view" style="position: relative;">
			<SphereTopologyCanvas
				data=data
				dark_mode=dark_mode
				intensities=intensities
				fullscreen=fullscreen
			/>
			<Show when=move || show_control_panel>
				<ControlPanel data=data dark_mode=dark_mode intensities=intensities />
			</Show>
		</div>
	}
}
