#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the gridwalk engine.
//!
//! This crate defines the value types that connect the grid world, the pure
//! projection and motion systems, and the adapters that drive them. The world
//! answers [`GridQuery::classify`] for integer cells, the projector turns a
//! continuous position and velocity into a [`Path`] of [`MotionSegment`]
//! values, and the integrator consumes that path to produce the next
//! [`AgentState`].

use std::ops::{Add, Mul, Neg, Sub};

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Simulated look-ahead horizon, in seconds, used when no override is supplied.
pub const DEFAULT_PATH_TIME: f64 = 0.5;

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Records an explicit classification for a cell.
    SetCell {
        /// Cell being classified.
        cell: CellCoord,
        /// Classification to store.
        state: CellState,
    },
    /// Forgets the entry for a cell, returning it to the unexplored state.
    ClearCell {
        /// Cell being forgotten.
        cell: CellCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Reports that the effective classification of a cell changed.
    CellChanged {
        /// Cell whose classification changed.
        cell: CellCoord,
        /// Classification observed before the command.
        from: CellState,
        /// Classification observed after the command.
        to: CellState,
    },
}

/// Error raised when a vector would hold a NaN or infinite component.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
#[error("vector ({x}, {y}) has a non-finite component")]
pub struct NonFiniteError {
    /// Rejected horizontal component.
    pub x: f64,
    /// Rejected vertical component.
    pub y: f64,
}

/// Reasons a [`MotionConfig`] may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The look-ahead horizon was zero, negative or not finite.
    #[error("path time must be a positive finite number of seconds, got {0}")]
    InvalidPathTime(f64),
}

/// Reasons a segment may be refused while assembling a [`Path`].
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum PathError {
    /// The segment did not start exactly where the previous one ended.
    #[error("segment {index} starts at {start:?} but the previous segment ended at {previous_end:?}")]
    Discontinuous {
        /// Position of the offending segment within the path.
        index: usize,
        /// Start point of the offending segment.
        start: Vector2,
        /// End point of the preceding segment.
        previous_end: Vector2,
    },
    /// The segment covered no time, or a negative or non-finite amount of it.
    #[error("segment {index} has non-positive duration {duration}")]
    NonPositiveDuration {
        /// Position of the offending segment within the path.
        index: usize,
        /// Duration carried by the offending segment.
        duration: f64,
    },
}

/// One of the two axes of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis, indexed by `x`.
    X,
    /// Vertical axis, indexed by `y`.
    Y,
}

impl Axis {
    /// Returns the perpendicular axis.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }
}

/// Continuous two-dimensional vector whose components are always finite.
///
/// Constructors and serde validate their input. The arithmetic operators only
/// check their results with `debug_assert!`, so a release build that overflows
/// can still produce infinite components; revalidate such results with
/// [`Vector2::new`].
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Vector2 {
    x: f64,
    y: f64,
}

impl Vector2 {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a vector, rejecting NaN and infinite components.
    pub fn new(x: f64, y: f64) -> Result<Self, NonFiniteError> {
        if x.is_finite() && y.is_finite() {
            Ok(Self { x, y })
        } else {
            Err(NonFiniteError { x, y })
        }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Vertical component.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Component along the provided axis.
    #[must_use]
    pub const fn component(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Returns a copy with the horizontal component replaced.
    ///
    /// Non-finite replacements fail a debug assertion. Release builds ignore
    /// them and leave the component untouched.
    #[must_use]
    pub fn with_x(self, x: f64) -> Self {
        debug_assert!(x.is_finite(), "non-finite x component {x}");
        if x.is_finite() {
            Self { x, ..self }
        } else {
            self
        }
    }

    /// Returns a copy with the vertical component replaced.
    ///
    /// Non-finite replacements fail a debug assertion. Release builds ignore
    /// them and leave the component untouched.
    #[must_use]
    pub fn with_y(self, y: f64) -> Self {
        debug_assert!(y.is_finite(), "non-finite y component {y}");
        if y.is_finite() {
            Self { y, ..self }
        } else {
            self
        }
    }

    /// Returns a copy with the component along `axis` replaced.
    #[must_use]
    pub fn with_component(self, axis: Axis, value: f64) -> Self {
        match axis {
            Axis::X => self.with_x(value),
            Axis::Y => self.with_y(value),
        }
    }

    /// Euclidean length of the vector.
    #[must_use]
    pub fn length(&self) -> f64 {
        DVec2::from(*self).length()
    }

    /// Reports whether both components are exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Unit vector pointing the same way, or `None` for the zero vector.
    #[must_use]
    pub fn normalize(&self) -> Option<Self> {
        DVec2::from(*self)
            .try_normalize()
            .and_then(|unit| Self::try_from(unit).ok())
    }

    /// Per-component floor.
    #[must_use]
    pub fn floor(&self) -> Self {
        Self {
            x: self.x.floor(),
            y: self.y.floor(),
        }
    }

    /// Per-component non-negative remainder of division by `modulus`.
    ///
    /// Fails when the remainder is not finite, as happens for a zero or NaN
    /// `modulus`.
    pub fn rem_euclid(&self, modulus: f64) -> Result<Self, NonFiniteError> {
        Self::new(self.x.rem_euclid(modulus), self.y.rem_euclid(modulus))
    }

    /// Per-component sign: `1.0`, `-1.0`, or `0.0` for zero components.
    #[must_use]
    pub fn signum(&self) -> Self {
        Self {
            x: sign(self.x),
            y: sign(self.y),
        }
    }
}

fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let sum = Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        };
        debug_assert!(sum.x.is_finite() && sum.y.is_finite(), "vector sum overflowed");
        sum
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        let difference = Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        };
        debug_assert!(
            difference.x.is_finite() && difference.y.is_finite(),
            "vector difference overflowed"
        );
        difference
    }
}

impl Mul<f64> for Vector2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        let scaled = Self {
            x: self.x * rhs,
            y: self.y * rhs,
        };
        debug_assert!(
            scaled.x.is_finite() && scaled.y.is_finite(),
            "vector scaled by {rhs} is not finite"
        );
        scaled
    }
}

impl Neg for Vector2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl From<Vector2> for DVec2 {
    fn from(value: Vector2) -> Self {
        DVec2::new(value.x, value.y)
    }
}

impl TryFrom<DVec2> for Vector2 {
    type Error = NonFiniteError;

    fn try_from(value: DVec2) -> Result<Self, Self::Error> {
        Self::new(value.x, value.y)
    }
}

impl TryFrom<[f64; 2]> for Vector2 {
    type Error = NonFiniteError;

    fn try_from([x, y]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(x, y)
    }
}

impl From<Vector2> for [f64; 2] {
    fn from(value: Vector2) -> Self {
        [value.x, value.y]
    }
}

/// Location of a single grid cell expressed as integer `x` and `y` indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: i64,
    y: i64,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Horizontal cell index.
    #[must_use]
    pub const fn x(&self) -> i64 {
        self.x
    }

    /// Vertical cell index.
    #[must_use]
    pub const fn y(&self) -> i64 {
        self.y
    }

    /// Cell index along the provided axis.
    #[must_use]
    pub const fn component(&self, axis: Axis) -> i64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Returns the cell displaced by the provided offsets.
    #[must_use]
    pub const fn offset(self, dx: i64, dy: i64) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Cell that contains the position, using a plain floor on both axes.
    ///
    /// Positions lying exactly on a grid line belong to the cell with the
    /// greater index. Direction-aware classification lives in the projector.
    #[must_use]
    pub fn containing(position: Vector2) -> Self {
        let floored = position.floor();
        Self {
            x: floored.x as i64,
            y: floored.y as i64,
        }
    }
}

/// Traversability of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// The agent may move through the cell.
    Open,
    /// The cell is a wall. Unexplored cells are reported as blocked.
    Blocked,
}

impl CellState {
    /// Reports whether the agent may enter the cell.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Reports whether the cell stops the agent.
    #[must_use]
    pub const fn is_blocked(self) -> bool {
        matches!(self, Self::Blocked)
    }
}

/// Read-only view of the grid consumed by the projector.
///
/// Implementations must return [`CellState::Blocked`] for every coordinate
/// that carries no explicit entry.
pub trait GridQuery {
    /// Classifies the provided cell.
    fn classify(&self, cell: CellCoord) -> CellState;
}

impl<T> GridQuery for &T
where
    T: GridQuery + ?Sized,
{
    fn classify(&self, cell: CellCoord) -> CellState {
        (**self).classify(cell)
    }
}

/// Uniform-velocity leg of a projected path.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionSegment {
    a: Vector2,
    b: Vector2,
    v: Vector2,
    duration: f64,
    cell: CellCoord,
    blocked_by: Option<CellCoord>,
}

impl MotionSegment {
    /// Creates a segment travelling from `a` to `b` at velocity `v`.
    ///
    /// `b` is expected to equal `a + v * duration` up to the grid-line snapping
    /// performed by the projector.
    #[must_use]
    pub const fn new(
        a: Vector2,
        b: Vector2,
        v: Vector2,
        duration: f64,
        cell: CellCoord,
        blocked_by: Option<CellCoord>,
    ) -> Self {
        Self {
            a,
            b,
            v,
            duration,
            cell,
            blocked_by,
        }
    }

    /// Start point of the segment.
    #[must_use]
    pub const fn a(&self) -> Vector2 {
        self.a
    }

    /// End point of the segment.
    #[must_use]
    pub const fn b(&self) -> Vector2 {
        self.b
    }

    /// Constant velocity held across the segment.
    #[must_use]
    pub const fn velocity(&self) -> Vector2 {
        self.v
    }

    /// Seconds spent travelling the segment.
    #[must_use]
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    /// Cell traversed by the segment.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Blocked cell that forced a velocity reduction for this segment, if any.
    #[must_use]
    pub const fn blocked_by(&self) -> Option<CellCoord> {
        self.blocked_by
    }

    /// Position reached `elapsed` seconds after entering the segment.
    #[must_use]
    pub fn position_at(&self, elapsed: f64) -> Vector2 {
        self.a + self.v * elapsed
    }
}

/// Reason a projection stopped emitting segments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// The walk consumed the full look-ahead horizon.
    Horizon,
    /// The requested velocity was zero, so no motion was projected.
    Stationary,
    /// No slide direction was open; the agent is stuck against `blocked_by`.
    Wedged {
        /// Cell that blocked the requested direction of travel.
        blocked_by: CellCoord,
    },
    /// The walk hit an internal inconsistency and was truncated.
    Degenerate,
}

/// Ordered, contiguous sequence of motion segments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPath")]
pub struct Path {
    segments: Vec<MotionSegment>,
    termination: Termination,
}

impl Path {
    /// Creates a path with no segments.
    #[must_use]
    pub const fn empty(termination: Termination) -> Self {
        Self {
            segments: Vec::new(),
            termination,
        }
    }

    /// Segments in travel order.
    #[must_use]
    pub fn segments(&self) -> &[MotionSegment] {
        &self.segments
    }

    /// Reason the projection stopped.
    #[must_use]
    pub const fn termination(&self) -> Termination {
        self.termination
    }

    /// Reports whether the path holds no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Final segment of the path, if any.
    #[must_use]
    pub fn last(&self) -> Option<&MotionSegment> {
        self.segments.last()
    }

    /// End point of the final segment, if any.
    #[must_use]
    pub fn endpoint(&self) -> Option<Vector2> {
        self.last().map(MotionSegment::b)
    }

    /// Sum of all segment durations, in seconds.
    #[must_use]
    pub fn total_duration(&self) -> f64 {
        self.segments
            .iter()
            .fold(0.0, |total, segment| total + segment.duration)
    }
}

#[derive(Deserialize)]
struct RawPath {
    segments: Vec<MotionSegment>,
    termination: Termination,
}

impl TryFrom<RawPath> for Path {
    type Error = PathError;

    fn try_from(raw: RawPath) -> Result<Self, Self::Error> {
        let mut builder = PathBuilder::with_capacity(raw.segments.len());
        for segment in raw.segments {
            builder.push(segment)?;
        }
        Ok(builder.finish(raw.termination))
    }
}

/// Incremental [`Path`] constructor that enforces continuity.
///
/// Every pushed segment must start bit-for-bit where the previous one ended
/// and must cover a strictly positive, finite duration.
#[derive(Clone, Debug, Default)]
pub struct PathBuilder {
    segments: Vec<MotionSegment>,
}

impl PathBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Creates an empty builder with room for `capacity` segments.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            segments: Vec::with_capacity(capacity),
        }
    }

    /// Appends a segment, rejecting gaps and non-positive durations.
    pub fn push(&mut self, segment: MotionSegment) -> Result<(), PathError> {
        let index = self.segments.len();
        if !(segment.duration > 0.0 && segment.duration.is_finite()) {
            return Err(PathError::NonPositiveDuration {
                index,
                duration: segment.duration,
            });
        }

        if let Some(previous) = self.segments.last() {
            if !same_bits(previous.b, segment.a) {
                return Err(PathError::Discontinuous {
                    index,
                    start: segment.a,
                    previous_end: previous.b,
                });
            }
        }

        self.segments.push(segment);
        Ok(())
    }

    /// Number of segments accepted so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Reports whether no segment was accepted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Seals the builder into a path with the provided termination reason.
    #[must_use]
    pub fn finish(self, termination: Termination) -> Path {
        Path {
            segments: self.segments,
            termination,
        }
    }
}

fn same_bits(left: Vector2, right: Vector2) -> bool {
    left.x.to_bits() == right.x.to_bits() && left.y.to_bits() == right.y.to_bits()
}

/// Continuous position of the agent together with the cell it occupies.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    /// Continuous position of the agent.
    pub position: Vector2,
    /// Grid cell the agent currently occupies.
    pub cell: CellCoord,
}

impl AgentState {
    /// Creates a state with an explicit cell.
    #[must_use]
    pub const fn new(position: Vector2, cell: CellCoord) -> Self {
        Self { position, cell }
    }

    /// Places the agent at `position`, deriving its cell with a plain floor.
    #[must_use]
    pub fn spawn(position: Vector2) -> Self {
        Self {
            position,
            cell: CellCoord::containing(position),
        }
    }
}

/// Host-supplied constants consumed by the projector and integrator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionConfig {
    path_time: f64,
    movement_enabled: bool,
}

impl MotionConfig {
    /// Creates a configuration, rejecting non-positive or non-finite horizons.
    pub fn new(path_time: f64, movement_enabled: bool) -> Result<Self, ConfigError> {
        if path_time > 0.0 && path_time.is_finite() {
            Ok(Self {
                path_time,
                movement_enabled,
            })
        } else {
            Err(ConfigError::InvalidPathTime(path_time))
        }
    }

    /// Look-ahead horizon of each projection, in seconds.
    #[must_use]
    pub const fn path_time(&self) -> f64 {
        self.path_time
    }

    /// Whether the integrator is allowed to move the agent.
    #[must_use]
    pub const fn movement_enabled(&self) -> bool {
        self.movement_enabled
    }

    /// Returns a copy with the movement kill-switch set to `enabled`.
    #[must_use]
    pub const fn with_movement_enabled(self, enabled: bool) -> Self {
        Self {
            movement_enabled: enabled,
            ..self
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            path_time: DEFAULT_PATH_TIME,
            movement_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn vector(x: f64, y: f64) -> Vector2 {
        Vector2::new(x, y).expect("finite vector")
    }

    fn segment(a: Vector2, v: Vector2, duration: f64) -> MotionSegment {
        MotionSegment::new(
            a,
            a + v * duration,
            v,
            duration,
            CellCoord::containing(a),
            None,
        )
    }

    #[test]
    fn vector_rejects_non_finite_components() {
        assert!(Vector2::new(f64::NAN, 0.0).is_err());
        assert!(Vector2::new(0.0, f64::INFINITY).is_err());
        assert!(Vector2::new(f64::NEG_INFINITY, 1.0).is_err());
        assert!(Vector2::new(1.0, -2.0).is_ok());
    }

    #[test]
    fn vector_length_and_normalize() {
        let v = vector(3.0, 4.0);
        assert_relative_eq!(v.length(), 5.0);
        let unit = v.normalize().expect("non-zero vector normalizes");
        assert_relative_eq!(unit.x(), 0.6);
        assert_relative_eq!(unit.y(), 0.8);
        assert_eq!(Vector2::ZERO.normalize(), None);
    }

    #[test]
    fn vector_floor_and_modulo_handle_negative_components() {
        let v = vector(-1.25, 2.75);
        assert_eq!(v.floor(), vector(-2.0, 2.0));
        let wrapped = v.rem_euclid(1.0).expect("finite modulus");
        assert_relative_eq!(wrapped.x(), 0.75);
        assert_relative_eq!(wrapped.y(), 0.75);
        assert!(v.rem_euclid(0.0).is_err());
    }

    #[test]
    fn vector_signum_keeps_zero_components() {
        assert_eq!(vector(-3.0, 0.0).signum(), vector(-1.0, 0.0));
        assert_eq!(vector(0.0, 0.25).signum(), vector(0.0, 1.0));
    }

    #[test]
    fn with_component_replaces_a_single_axis() {
        let v = vector(1.0, 2.0);
        assert_eq!(v.with_component(Axis::Y, 0.0), vector(1.0, 0.0));
        assert_eq!(v.with_component(Axis::X, -3.5), vector(-3.5, 2.0));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "non-finite x component")]
    fn with_component_rejects_non_finite_values_in_debug_builds() {
        let _ = vector(1.0, 2.0).with_component(Axis::X, f64::NAN);
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn with_component_ignores_non_finite_values_in_release_builds() {
        let v = vector(1.0, 2.0);
        assert_eq!(v.with_component(Axis::X, f64::NAN), v);
        assert_eq!(v.with_y(f64::INFINITY), v);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "is not finite")]
    fn overflowing_scale_fails_in_debug_builds() {
        let _ = vector(f64::MAX, 0.0) * 4.0;
    }

    #[test]
    fn offset_moves_and_saturates() {
        let cell = CellCoord::new(2, -3);
        assert_eq!(cell.offset(-1, 4), CellCoord::new(1, 1));
        assert_eq!(
            CellCoord::new(i64::MAX, 0).offset(1, -1),
            CellCoord::new(i64::MAX, -1)
        );
    }

    #[test]
    fn vector_deserialization_rejects_non_finite_input() {
        let bytes = bincode::serialize(&[f64::NAN, 1.0]).expect("serialize");
        assert!(bincode::deserialize::<Vector2>(&bytes).is_err());
    }

    #[test]
    fn containing_uses_plain_floor() {
        assert_eq!(CellCoord::containing(vector(1.0, -0.5)), CellCoord::new(1, -1));
        assert_eq!(CellCoord::containing(vector(-2.0, 3.99)), CellCoord::new(-2, 3));
    }

    #[test]
    fn path_builder_rejects_gaps() {
        let first = segment(vector(0.5, 0.5), vector(1.0, 0.0), 0.5);
        let gap = segment(vector(1.5, 0.5), vector(1.0, 0.0), 0.25);
        let mut builder = PathBuilder::new();
        builder.push(first).expect("first segment accepted");
        assert!(matches!(
            builder.push(gap),
            Err(PathError::Discontinuous { index: 1, .. })
        ));
    }

    #[test]
    fn path_builder_rejects_non_positive_durations() {
        let mut builder = PathBuilder::new();
        let stalled = segment(vector(0.5, 0.5), vector(1.0, 0.0), 0.0);
        assert!(matches!(
            builder.push(stalled),
            Err(PathError::NonPositiveDuration { index: 0, .. })
        ));
        assert!(builder.is_empty());
    }

    #[test]
    fn path_reports_total_duration_and_endpoint() {
        let first = segment(vector(0.5, 0.5), vector(1.0, 0.0), 0.5);
        let second = segment(first.b(), vector(1.0, 0.0), 0.25);
        let mut builder = PathBuilder::with_capacity(2);
        builder.push(first).expect("first segment accepted");
        builder.push(second).expect("second segment accepted");
        let path = builder.finish(Termination::Horizon);

        assert_eq!(path.len(), 2);
        assert_relative_eq!(path.total_duration(), 0.75);
        assert_eq!(path.endpoint(), Some(second.b()));
    }

    #[test]
    fn path_round_trips_through_bincode() {
        let first = segment(vector(0.5, 0.5), vector(1.0, 1.0), 0.5);
        let second = segment(first.b(), vector(0.0, 1.0), 0.25);
        let mut builder = PathBuilder::new();
        builder.push(first).expect("first segment accepted");
        builder.push(second).expect("second segment accepted");
        let path = builder.finish(Termination::Wedged {
            blocked_by: CellCoord::new(2, 2),
        });

        let bytes = bincode::serialize(&path).expect("serialize");
        let restored: Path = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, path);
    }

    #[test]
    fn motion_config_rejects_invalid_horizons() {
        assert_eq!(
            MotionConfig::new(0.0, true),
            Err(ConfigError::InvalidPathTime(0.0))
        );
        assert!(MotionConfig::new(-1.0, true).is_err());
        assert!(MotionConfig::new(f64::INFINITY, true).is_err());

        let config = MotionConfig::default();
        assert_relative_eq!(config.path_time(), DEFAULT_PATH_TIME);
        assert!(config.movement_enabled());
        assert!(!config.with_movement_enabled(false).movement_enabled());
    }
}
