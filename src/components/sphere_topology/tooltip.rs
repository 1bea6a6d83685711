use glam::DVec3;

/// Default auto-cycle interval between tooltip steps.
pub const CYCLE_INTERVAL: f64 = 3.0;
/// Seconds of pointer silence before a pinned/interactive tooltip yields
/// back to auto-cycling.
pub const PIN_IDLE_SECS: f64 = 5.0;
/// How far outside the sphere surface anchors sit, as a radius multiple.
pub const ANCHOR_FACTOR: f64 = 1.5;

/// Index into the topology: nodes first, then links.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityRef {
	Node(usize),
	Link(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TooltipMode {
	AutoCycle,
	Interactive,
}

/// A fully resolved tooltip: where to draw it, where its connector points,
/// and what it says.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipState {
	pub entity: EntityRef,
	/// Drawn position, projected outside the sphere so it never occludes it.
	pub anchor: DVec3,
	/// Point the connector line ends at (node center, or nearest arc sample).
	pub target: DVec3,
	pub title: String,
	pub lines: Vec<String>,
	pub pinned: bool,
}

/// Project a surface point outward past the sphere so the tooltip floats
/// clear of it.
pub fn offset_anchor(point: DVec3, radius: f64) -> DVec3 {
	point.normalize_or(DVec3::Y) * radius * ANCHOR_FACTOR
}

fn entity_at(index: usize, node_count: usize) -> EntityRef {
	if index < node_count {
		EntityRef::Node(index)
	} else {
		EntityRef::Link(index - node_count)
	}
}

/// Drives which tooltip is visible.
///
/// Auto-cycle walks a circular index over nodes-then-links on a fixed
/// interval; hover/click switches to interactive mode, and a click
/// additionally pins the tooltip. After `PIN_IDLE_SECS` without interaction
/// the pin is released and auto-cycling resumes. The builder callback
/// resolves an entity to its current geometry/text and returns `None` for
/// entities that cannot be shown (malformed links, unpolled positions),
/// which the cycle skips without stalling.
#[derive(Clone, Debug)]
pub struct TooltipEngine {
	mode: TooltipMode,
	cycle_elapsed: f64,
	cycle_index: usize,
	idle: f64,
	current: Option<TooltipState>,
}

impl Default for TooltipEngine {
	fn default() -> Self {
		Self::new()
	}
}

impl TooltipEngine {
	pub fn new() -> Self {
		Self {
			mode: TooltipMode::AutoCycle,
			cycle_elapsed: CYCLE_INTERVAL,
			cycle_index: 0,
			idle: 0.0,
			current: None,
		}
	}

	pub fn mode(&self) -> TooltipMode {
		self.mode
	}

	pub fn current(&self) -> Option<&TooltipState> {
		self.current.as_ref()
	}

	pub fn is_pinned(&self) -> bool {
		self.current.as_ref().is_some_and(|t| t.pinned)
	}

	/// Pointer movement without a hover change still counts as interaction
	/// for the resume countdown.
	pub fn note_interaction(&mut self) {
		if self.mode == TooltipMode::Interactive {
			self.idle = 0.0;
		}
	}

	/// Pointer entered (`Some`) or left (`None`) an entity. A pinned tooltip
	/// is latched and ignores hover until the pin is released.
	pub fn hover<F>(&mut self, entity: Option<EntityRef>, mut build: F)
	where
		F: FnMut(EntityRef) -> Option<TooltipState>,
	{
		if self.is_pinned() {
			self.idle = 0.0;
			return;
		}
		self.mode = TooltipMode::Interactive;
		self.idle = 0.0;
		self.current = entity.and_then(&mut build);
	}

	/// Click on an entity: pin its tooltip. Returns the pinned state so the
	/// caller can start a camera transition toward it.
	pub fn select<F>(&mut self, entity: EntityRef, mut build: F) -> Option<&TooltipState>
	where
		F: FnMut(EntityRef) -> Option<TooltipState>,
	{
		self.mode = TooltipMode::Interactive;
		self.idle = 0.0;
		self.current = build(entity).map(|mut state| {
			state.pinned = true;
			state
		});
		self.current.as_ref()
	}

	/// Advance timers and refresh the visible tooltip's geometry (the target
	/// breathes with its node, so stale geometry would visibly detach).
	pub fn tick<F>(&mut self, dt: f64, node_count: usize, link_count: usize, mut build: F)
	where
		F: FnMut(EntityRef) -> Option<TooltipState>,
	{
		let total = node_count + link_count;
		if total == 0 {
			self.current = None;
			return;
		}

		match self.mode {
			TooltipMode::AutoCycle => {
				self.cycle_elapsed += dt;
				if self.current.is_none() || self.cycle_elapsed >= CYCLE_INTERVAL {
					self.cycle_elapsed = 0.0;
					self.advance_cycle(total, node_count, &mut build);
				} else {
					self.refresh(&mut build);
				}
			}
			TooltipMode::Interactive => {
				self.idle += dt;
				if self.idle >= PIN_IDLE_SECS {
					self.mode = TooltipMode::AutoCycle;
					self.cycle_elapsed = 0.0;
					if let Some(current) = &mut self.current {
						current.pinned = false;
					}
				} else {
					self.refresh(&mut build);
				}
			}
		}
	}

	fn advance_cycle<F>(&mut self, total: usize, node_count: usize, build: &mut F)
	where
		F: FnMut(EntityRef) -> Option<TooltipState>,
	{
		for _ in 0..total {
			let entity = entity_at(self.cycle_index % total, node_count);
			self.cycle_index = (self.cycle_index + 1) % total;
			if let Some(state) = build(entity) {
				self.current = Some(state);
				return;
			}
		}
		self.current = None;
	}

	fn refresh<F>(&mut self, build: &mut F)
	where
		F: FnMut(EntityRef) -> Option<TooltipState>,
	{
		if let Some(current) = &self.current {
			let pinned = current.pinned;
			self.current = build(current.entity).map(|mut state| {
				state.pinned = pinned;
				state
			});
		}
	}
}
