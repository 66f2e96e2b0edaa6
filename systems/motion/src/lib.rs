#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Motion integration system that moves the agent along a projected path.

use gridwalk_core::{AgentState, GridQuery, MotionConfig, Path, Termination, Vector2};
use gridwalk_system_projection::project;
use log::trace;

/// Advances `state` by `elapsed` seconds along `path`.
///
/// Segments are consumed in order. A segment that is only partly covered
/// moves the agent to `a + v * remaining` without updating the cell; a fully
/// covered segment moves the agent to its end point and adopts its cell.
/// Time left over once the path is exhausted is discarded rather than
/// extrapolated, so callers re-project from the returned state every frame.
///
/// The state is returned unchanged when movement is disabled, the path is
/// empty, or `elapsed` is not a positive number.
#[must_use]
pub fn advance(state: AgentState, path: &Path, elapsed: f64, config: &MotionConfig) -> AgentState {
    if !config.movement_enabled() || path.is_empty() || !(elapsed > 0.0) {
        return state;
    }

    let mut next = state;
    let mut remaining = elapsed;
    for segment in path.segments() {
        if remaining < segment.duration() {
            next.position = segment.position_at(remaining);
            return next;
        }

        next.position = segment.b();
        next.cell = segment.cell();
        remaining -= segment.duration();
    }

    if remaining > 0.0 {
        trace!("discarding {remaining}s beyond the projected horizon");
    }
    next
}

/// Per-frame driver that re-projects and integrates the agent's motion.
///
/// The walker owns the agent state. Every [`Walker::step`] projects a fresh
/// path from the current state, so velocity or world changes are observed on
/// the very next frame.
#[derive(Clone, Debug)]
pub struct Walker {
    state: AgentState,
    config: MotionConfig,
    path: Path,
}

impl Walker {
    /// Creates a walker for an agent at `state`.
    #[must_use]
    pub const fn new(state: AgentState, config: MotionConfig) -> Self {
        Self {
            state,
            config,
            path: Path::empty(Termination::Stationary),
        }
    }

    /// Current agent state.
    #[must_use]
    pub const fn state(&self) -> AgentState {
        self.state
    }

    /// Configuration applied to projection and integration.
    #[must_use]
    pub const fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Path projected during the most recent step.
    #[must_use]
    pub const fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the configuration used by subsequent steps.
    pub fn set_config(&mut self, config: MotionConfig) {
        self.config = config;
    }

    /// Projects a path from the current state and integrates `elapsed` seconds.
    pub fn step<W>(&mut self, velocity: Vector2, world: &W, elapsed: f64) -> AgentState
    where
        W: GridQuery + ?Sized,
    {
        self.path = project(self.state.position, velocity, world, &self.config);
        self.state = advance(self.state, &self.path, elapsed, &self.config);
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridwalk_core::{CellCoord, MotionSegment, PathBuilder};

    fn vector(x: f64, y: f64) -> Vector2 {
        Vector2::new(x, y).expect("finite vector")
    }

    fn straight_path() -> Path {
        let v = vector(1.0, 0.0);
        let first = MotionSegment::new(
            vector(0.5, 0.5),
            vector(1.0, 0.5),
            v,
            0.5,
            CellCoord::new(0, 0),
            None,
        );
        let second = MotionSegment::new(
            first.b(),
            vector(2.0, 0.5),
            v,
            1.0,
            CellCoord::new(1, 0),
            None,
        );
        let mut builder = PathBuilder::new();
        builder.push(first).expect("first segment accepted");
        builder.push(second).expect("second segment accepted");
        builder.finish(Termination::Horizon)
    }

    #[test]
    fn non_positive_elapsed_leaves_state_untouched() {
        let state = AgentState::spawn(vector(0.5, 0.5));
        let config = MotionConfig::default();
        let path = straight_path();

        assert_eq!(advance(state, &path, 0.0, &config), state);
        assert_eq!(advance(state, &path, -1.0, &config), state);
        assert_eq!(advance(state, &path, f64::NAN, &config), state);
    }

    #[test]
    fn disabled_movement_leaves_state_untouched() {
        let state = AgentState::spawn(vector(0.5, 0.5));
        let config = MotionConfig::default().with_movement_enabled(false);

        assert_eq!(advance(state, &straight_path(), 0.75, &config), state);
    }

    #[test]
    fn exact_segment_boundary_adopts_segment_cell() {
        let state = AgentState::spawn(vector(0.5, 0.5));
        let next = advance(state, &straight_path(), 0.5, &MotionConfig::default());

        assert_eq!(next.position, vector(1.0, 0.5));
        assert_eq!(next.cell, CellCoord::new(0, 0));
    }
}
