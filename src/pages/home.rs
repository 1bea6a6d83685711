use leptos::prelude::*;

use crate::components::topology_view::SphereTopologyView;

/// Default Home Page: the widget running fullscreen on the built-in demo
/// topology.
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-topology">
				<SphereTopologyView fullscreen=true />
				<div class="topology-overlay">
					<h1>"Network Topology"</h1>
					<p class="subtitle">
						"Hover nodes and links for details. Click to focus. Drag to orbit, scroll to zoom."
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
