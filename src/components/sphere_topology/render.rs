use std::f64::consts::PI;

use glam::DVec3;
use web_sys::CanvasRenderingContext2d;

use super::camera::Projected;
use super::math::ease_out_cubic;
use super::state::SphereTopologyState;
use super::tooltip::EntityRef;

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

/// On-screen node radius in pixels at reference depth (the sphere center).
pub const NODE_RADIUS: f64 = 6.0;

type Rgb = (u8, u8, u8);

/// Theme colors. Shared immutable template; per-frame alpha values are
/// composed into owned strings, never mutated in place.
pub struct Palette {
	pub background: &'static str,
	pub sphere_outline: Rgb,
	pub link: Rgb,
	pub particle: Rgb,
	pub label: Rgb,
	pub tooltip_bg: &'static str,
	pub tooltip_border: &'static str,
	pub tooltip_title: &'static str,
	pub tooltip_text: &'static str,
	pub connector: Rgb,
}

const DARK: Palette = Palette {
	background: "#0b0e1a",
	sphere_outline: (110, 130, 180),
	link: (100, 180, 255),
	particle: (255, 214, 130),
	label: (255, 255, 255),
	tooltip_bg: "rgba(18, 22, 38, 0.92)",
	tooltip_border: "rgba(120, 160, 230, 0.6)",
	tooltip_title: "#ffffff",
	tooltip_text: "rgba(210, 220, 240, 0.9)",
	connector: (180, 205, 255),
};

const LIGHT: Palette = Palette {
	background: "#f4f6fb",
	sphere_outline: (120, 135, 170),
	link: (60, 110, 200),
	particle: (200, 120, 20),
	label: (26, 26, 46),
	tooltip_bg: "rgba(255, 255, 255, 0.95)",
	tooltip_border: "rgba(90, 120, 190, 0.55)",
	tooltip_title: "#1a1a2e",
	tooltip_text: "rgba(50, 60, 90, 0.9)",
	connector: (70, 100, 180),
};

pub fn palette(dark_mode: bool) -> &'static Palette {
	if dark_mode { &DARK } else { &LIGHT }
}

pub fn node_color(index: usize) -> &'static str {
	COLORS[index % COLORS.len()]
}

fn rgba((r, g, b): Rgb, alpha: f64) -> String {
	format!("rgba({r}, {g}, {b}, {alpha:.3})")
}

/// Paint one frame. Links first, then particles, then depth-sorted nodes,
/// then the tooltip on top.
pub fn render(state: &SphereTopologyState, ctx: &CanvasRenderingContext2d) {
	let theme = palette(state.dark_mode);
	ctx.set_fill_style_str(theme.background);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	// Pixels per world unit at the sphere center; all sizes scale off it so
	// zooming feels like moving, not inflating.
	let Some(center) = state.camera.project(DVec3::ZERO, state.width, state.height) else {
		return;
	};
	let ref_scale = center.scale;

	draw_sphere_outline(state, ctx, theme, &center, ref_scale);
	draw_links(state, ctx, theme);
	draw_particles(state, ctx, theme, ref_scale);
	draw_nodes(state, ctx, theme, ref_scale);
	draw_tooltip(state, ctx, theme);
}

fn draw_sphere_outline(
	state: &SphereTopologyState,
	ctx: &CanvasRenderingContext2d,
	theme: &Palette,
	center: &Projected,
	ref_scale: f64,
) {
	ctx.begin_path();
	let _ = ctx.arc(
		center.x,
		center.y,
		state.radius * ref_scale,
		0.0,
		2.0 * PI,
	);
	ctx.set_stroke_style_str(&rgba(theme.sphere_outline, 0.18));
	ctx.set_line_width(1.0);
	ctx.stroke();
}

fn is_selected_link(state: &SphereTopologyState, idx: usize) -> bool {
	let pinned = state
		.tooltip
		.current()
		.filter(|t| t.pinned)
		.map(|t| t.entity);
	state.hovered == Some(EntityRef::Link(idx)) || pinned == Some(EntityRef::Link(idx))
}

fn draw_links(state: &SphereTopologyState, ctx: &CanvasRenderingContext2d, theme: &Palette) {
	for (i, link) in state.links.iter().enumerate() {
		if link.samples.is_empty() {
			continue;
		}
		let highlighted = is_selected_link(state, i);
		let (base_alpha, width) = if highlighted { (0.9, 2.2) } else { (0.45, 1.4) };
		ctx.set_line_width(width);

		// Per-segment alpha gives the far hemisphere its depth cue.
		let mut prev: Option<(Projected, f64)> = None;
		for sample in &link.samples {
			let facing = state.camera.facing(*sample);
			let projected = state.camera.project(*sample, state.width, state.height);
			let Some(p) = projected else {
				prev = None;
				continue;
			};
			if let Some((q, prev_facing)) = prev {
				let alpha = base_alpha * (0.2 + 0.8 * (facing + prev_facing) * 0.5);
				ctx.set_stroke_style_str(&rgba(theme.link, alpha));
				ctx.begin_path();
				ctx.move_to(q.x, q.y);
				ctx.line_to(p.x, p.y);
				ctx.stroke();
			}
			prev = Some((p, facing));
		}
	}
}

fn draw_particles(
	state: &SphereTopologyState,
	ctx: &CanvasRenderingContext2d,
	theme: &Palette,
	ref_scale: f64,
) {
	for link in &state.links {
		if link.arc.is_none() {
			continue;
		}
		let point_size = link.data.traffic_intensity.profile().point_size;
		for position in link.flow.positions() {
			let Some(p) = state.camera.project(*position, state.width, state.height) else {
				continue;
			};
			let facing = state.camera.facing(*position);
			let radius = point_size * (p.scale / ref_scale).clamp(0.4, 2.5);
			ctx.set_fill_style_str(&rgba(theme.particle, 0.25 + 0.75 * facing));
			ctx.begin_path();
			let _ = ctx.arc(p.x, p.y, radius * 0.5, 0.0, 2.0 * PI);
			ctx.fill();
		}
	}
}

fn draw_nodes(
	state: &SphereTopologyState,
	ctx: &CanvasRenderingContext2d,
	theme: &Palette,
	ref_scale: f64,
) {
	// Painter's order: far nodes first.
	let mut order: Vec<(usize, Projected, f64)> = state
		.presenters
		.iter()
		.enumerate()
		.filter_map(|(i, presenter)| {
			let center = presenter.center();
			state
				.camera
				.project(center, state.width, state.height)
				.map(|p| (i, p, state.camera.facing(center)))
		})
		.collect();
	order.sort_by(|a, b| b.1.depth.total_cmp(&a.1.depth));

	for (i, p, facing) in order {
		let t = ease_out_cubic(state.presenters[i].highlight_t());
		let alpha = 0.35 + 0.65 * facing;
		let radius = NODE_RADIUS * (p.scale / ref_scale).clamp(0.4, 2.5) * (1.0 + 0.35 * t);

		if t > 0.01 {
			let glow_radius = radius * (1.8 + 1.2 * t);
			if let Ok(gradient) =
				ctx.create_radial_gradient(p.x, p.y, radius * 0.3, p.x, p.y, glow_radius)
			{
				let _ = gradient.add_color_stop(0.0, &rgba(theme.label, 0.35 * t));
				let _ = gradient.add_color_stop(0.6, &rgba(theme.connector, 0.12 * t));
				let _ = gradient.add_color_stop(1.0, &rgba(theme.label, 0.0));
				ctx.begin_path();
				let _ = ctx.arc(p.x, p.y, glow_radius, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node_color(i));
		ctx.fill();
		ctx.set_global_alpha(1.0);

		if t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(p.x, p.y, radius + 2.0, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&rgba(theme.label, 0.7 * t));
			ctx.set_line_width(1.5);
			ctx.stroke();
		}

		ctx.set_fill_style_str(&rgba(theme.label, alpha * 0.85));
		ctx.set_font("11px sans-serif");
		let _ = ctx.fill_text(&state.nodes[i].id, p.x + radius + 4.0, p.y + 3.0);
	}
}

fn draw_tooltip(state: &SphereTopologyState, ctx: &CanvasRenderingContext2d, theme: &Palette) {
	let Some(tooltip) = state.tooltip.current() else {
		return;
	};
	let (Some(anchor), Some(target)) = (
		state.camera.project(tooltip.anchor, state.width, state.height),
		state.camera.project(tooltip.target, state.width, state.height),
	) else {
		return;
	};

	// Box metrics from the widest line of text.
	ctx.set_font("bold 13px sans-serif");
	let mut text_width = ctx
		.measure_text(&tooltip.title)
		.map(|m| m.width())
		.unwrap_or(80.0);
	ctx.set_font("11px sans-serif");
	for line in &tooltip.lines {
		if let Ok(metrics) = ctx.measure_text(line) {
			text_width = text_width.max(metrics.width());
		}
	}
	let padding = 10.0;
	let line_height = 16.0;
	let box_w = text_width + padding * 2.0;
	let box_h = padding * 2.0 + line_height * (1 + tooltip.lines.len()) as f64;

	// Keep the box on the canvas; the connector still points at the target.
	let box_x = (anchor.x - box_w / 2.0).clamp(6.0, (state.width - box_w - 6.0).max(6.0));
	let box_y = (anchor.y - box_h / 2.0).clamp(6.0, (state.height - box_h - 6.0).max(6.0));

	ctx.set_stroke_style_str(&rgba(theme.connector, 0.8));
	ctx.set_line_width(1.2);
	ctx.begin_path();
	ctx.move_to(box_x + box_w / 2.0, box_y + box_h / 2.0);
	ctx.line_to(target.x, target.y);
	ctx.stroke();

	ctx.set_fill_style_str(&rgba(theme.connector, 0.9));
	ctx.begin_path();
	let _ = ctx.arc(target.x, target.y, 2.5, 0.0, 2.0 * PI);
	ctx.fill();

	round_rect(ctx, box_x, box_y, box_w, box_h, 6.0);
	ctx.set_fill_style_str(theme.tooltip_bg);
	ctx.fill();
	ctx.set_stroke_style_str(if tooltip.pinned {
		theme.tooltip_title
	} else {
		theme.tooltip_border
	});
	ctx.set_line_width(1.0);
	ctx.stroke();

	ctx.set_fill_style_str(theme.tooltip_title);
	ctx.set_font("bold 13px sans-serif");
	let _ = ctx.fill_text(&tooltip.title, box_x + padding, box_y + padding + 10.0);

	ctx.set_fill_style_str(theme.tooltip_text);
	ctx.set_font("11px sans-serif");
	for (i, line) in tooltip.lines.iter().enumerate() {
		let _ = ctx.fill_text(
			line,
			box_x + padding,
			box_y + padding + 10.0 + line_height * (i + 1) as f64,
		);
	}
}

fn round_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}
