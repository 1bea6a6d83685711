//! Leptos client-side app wiring, routes, and the embedding entry point.

use std::cell::Cell;

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, error, info};
use wasm_bindgen::prelude::*;

// Modules
mod components;
mod pages;

pub use crate::components::sphere_topology::{
	TopologyData, TopologyLink, TopologyNode, TrafficIntensity, WidgetConfig,
};
pub use crate::components::topology_view::SphereTopologyView;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Container element id the embedding entry point mounts into.
pub const MOUNT_CONTAINER_ID: &str = "sphere-topology";

thread_local! {
	// One widget instance per page: both entry points claim this guard, so
	// re-invocation never double-mounts and manual init suppresses the
	// demo auto-mount.
	static MOUNTED: Cell<bool> = const { Cell::new(false) };
}

fn claim_mount() -> bool {
	MOUNTED.with(|mounted| !mounted.replace(true))
}

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Embedding entry point. Parses the optional JSON configuration
/// (`data`, `isDarkMode`, `showControlPanel`), then mounts the widget into
/// `#sphere-topology`. Malformed fields fall back to defaults; a missing
/// container aborts with an error without affecting the host page.
#[wasm_bindgen]
pub fn init_topology(config_json: Option<String>) -> Result<(), JsValue> {
	init_logging();

	let config = match config_json {
		Some(raw) => serde_json::from_str::<WidgetConfig>(&raw).map_err(|err| {
			error!("invalid topology config: {err}");
			JsValue::from_str(&format!("invalid topology config: {err}"))
		})?,
		None => WidgetConfig::default(),
	};

	let Some(container) = web_sys::window()
		.and_then(|window| window.document())
		.and_then(|document| document.get_element_by_id(MOUNT_CONTAINER_ID))
	else {
		error!("mount container '#{MOUNT_CONTAINER_ID}' not found; initialization aborted");
		return Err(JsValue::from_str("mount container not found"));
	};

	if !claim_mount() {
		info!("topology widget already mounted; ignoring re-initialization");
		return Ok(());
	}

	let data = config.data.unwrap_or_else(TopologyData::demo);
	info!(
		"mounting topology widget: {} nodes, {} links",
		data.nodes.len(),
		data.links.len()
	);
	// Long-running UI: the widget lives until the page does.
	leptos::mount::mount_to(container.unchecked_into(), move || {
		view! {
			<SphereTopologyView
				data=data
				is_dark_mode=config.is_dark_mode
				show_control_panel=config.show_control_panel
			/>
		}
	})
	.forget();
	Ok(())
}

/// Demo-app auto-mount used by the binary target. A no-op when manual
/// initialization already claimed the widget.
pub fn auto_mount() {
	init_logging();
	if !claim_mount() {
		info!("manual initialization detected; skipping auto-mount");
		return;
	}
	leptos::mount::mount_to_body(App);
}

/// An app router which renders the demo page and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Sphere Topology" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
