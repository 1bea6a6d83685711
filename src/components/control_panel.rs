use leptos::prelude::*;

use super::sphere_topology::{TopologyData, TrafficIntensity};

fn parse_intensity(value: &str) -> Option<TrafficIntensity> {
	match value {
		"low" => Some(TrafficIntensity::Low),
		"medium" => Some(TrafficIntensity::Medium),
		"high" => Some(TrafficIntensity::High),
		_ => None,
	}
}

/// Overlay panel: theme toggle and per-link traffic intensity selection.
#[component]
pub fn ControlPanel(
	#[prop(into)] data: Signal<TopologyData>,
	dark_mode: RwSignal<bool>,
	intensities: RwSignal<Vec<TrafficIntensity>>,
) -> impl IntoView {
	let panel_style = move || {
		let colors = if dark_mode.get() {
			"background: rgba(18, 22, 38, 0.92); color: #e8ecf8; border: 1px solid rgba(120, 160, 230, 0.4);"
		} else {
			"background: rgba(255, 255, 255, 0.95); color: #1a1a2e; border: 1px solid rgba(90, 120, 190, 0.4);"
		};
		format!(
			"position: absolute; top: 16px; right: 16px; width: 220px; padding: 12px; \
			 border-radius: 8px; font: 12px sans-serif; {colors}"
		)
	};

	view! {
		<div class="topology-control-panel" style=panel_style>
			<h2 style="margin: 0 0 8px; font-size: 13px;">"Topology"</h2>
			<label style="display: block; margin-bottom: 10px; cursor: pointer;">
				<input
					type="checkbox"
					prop:checked=move || dark_mode.get()
					on:change=move |_| dark_mode.update(|dark| *dark = !*dark)
				/>
				" Dark mode"
			</label>
			<div class="link-intensities">
				{move || {
					data.get()
						.links
						.iter()
						.enumerate()
						.map(|(i, link)| {
							let label = format!("{} \u{2192} {}", link.source, link.target);
							view! {
								<label style="display: flex; justify-content: space-between; align-items: center; gap: 6px; margin-bottom: 4px;">
									<span style="overflow: hidden; text-overflow: ellipsis; white-space: nowrap;">
										{label}
									</span>
									<select
										prop:value=move || {
											intensities
												.get()
												.get(i)
												.copied()
												.unwrap_or(TrafficIntensity::Low)
												.label()
										}
										on:change=move |ev| {
											if let Some(intensity) = parse_intensity(&event_target_value(&ev)) {
												intensities.update(|list| {
													if let Some(slot) = list.get_mut(i) {
														*slot = intensity;
													}
												});
											}
										}
									>
										<option value="low">"low"</option>
										<option value="medium">"medium"</option>
										<option value="high">"high"</option>
									</select>
								</label>
							}
						})
						.collect_view()
				}}
			</div>
		</div>
	}
}
