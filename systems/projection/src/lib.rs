#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure path projection system that walks the grid ahead of the agent.
//!
//! [`project`] performs a grid DDA walk from a continuous position along a
//! velocity, emitting one [`MotionSegment`] per grid-line crossing until the
//! configured look-ahead horizon is spent or the agent is wedged against
//! blocked cells. Blocked cells are resolved by sliding along walls.

use gridwalk_core::{
    Axis, CellCoord, GridQuery, MotionConfig, MotionSegment, Path, PathBuilder, Termination,
    Vector2,
};
use log::{debug, error, trace};

/// Relative tolerance under which a coordinate is snapped onto its nearest
/// grid line.
pub const SNAP_EPSILON: f64 = 4.0 * f64::EPSILON;

/// Projects the motion of an agent at `position` travelling at `velocity`.
///
/// Returns an empty path when `velocity` is zero. Otherwise the path covers
/// `config.path_time()` seconds unless the walk is cut short by walls, in
/// which case [`Path::termination`] reports why.
///
/// The function is pure: identical inputs always produce identical paths.
#[must_use]
pub fn project<W>(position: Vector2, velocity: Vector2, world: &W, config: &MotionConfig) -> Path
where
    W: GridQuery + ?Sized,
{
    if velocity.is_zero() {
        return Path::empty(Termination::Stationary);
    }

    let horizon = config.path_time();
    let mut builder = PathBuilder::new();
    let mut position = snap(position);
    let mut time = 0.0;

    while time < horizon {
        let leg = match resolve_leg(position, velocity, world) {
            Resolution::Move(leg) => leg,
            Resolution::Wedged { blocked_by } => {
                debug!(
                    "agent wedged at ({}, {}) against cell {blocked_by:?}",
                    position.x(),
                    position.y()
                );
                return builder.finish(Termination::Wedged { blocked_by });
            }
            Resolution::Inconsistent { cell } => {
                return invariant_violated(
                    builder,
                    format_args!(
                        "blocked cell {cell:?} classified from strict interior position ({}, {})",
                        position.x(),
                        position.y()
                    ),
                );
            }
        };

        let crossing_x = time_to_line(position.x(), leg.velocity.x());
        let crossing_y = time_to_line(position.y(), leg.velocity.y());
        let crossing = crossing_x.min(crossing_y);
        let remaining = horizon - time;
        let reaches_horizon = crossing >= remaining;
        let duration = if reaches_horizon { remaining } else { crossing };

        if !(duration > 0.0 && duration.is_finite()) {
            return invariant_violated(
                builder,
                format_args!(
                    "non-positive segment duration {duration} at ({}, {})",
                    position.x(),
                    position.y()
                ),
            );
        }

        let mut end = position + leg.velocity * duration;
        if !reaches_horizon {
            if crossing_x <= crossing_y {
                end = end.with_x(next_line(position.x(), leg.velocity.x()));
            }
            if crossing_y <= crossing_x {
                end = end.with_y(next_line(position.y(), leg.velocity.y()));
            }
        }
        let end = snap(end);

        let segment = MotionSegment::new(
            position,
            end,
            leg.velocity,
            duration,
            leg.cell,
            leg.blocked_by,
        );
        trace!("projected segment {segment:?}");
        if let Err(violation) = builder.push(segment) {
            return invariant_violated(builder, format_args!("{violation}"));
        }

        position = end;
        time = if reaches_horizon {
            horizon
        } else {
            time + duration
        };
    }

    builder.finish(Termination::Horizon)
}

/// Cell occupied by an agent at `position` heading along `velocity`.
///
/// Each axis uses `floor(coordinate)`, except that an exact integer
/// coordinate travelled in the negative direction belongs to the cell behind
/// the grid line, `coordinate - 1`.
#[must_use]
pub fn classify_position(position: Vector2, velocity: Vector2) -> CellCoord {
    CellCoord::new(
        cell_index(position.x(), velocity.x()),
        cell_index(position.y(), velocity.y()),
    )
}

fn cell_index(coordinate: f64, direction: f64) -> i64 {
    let floored = coordinate.floor();
    if direction < 0.0 && floored == coordinate {
        (floored - 1.0) as i64
    } else {
        floored as i64
    }
}

#[derive(Clone, Copy, Debug)]
struct Leg {
    velocity: Vector2,
    cell: CellCoord,
    blocked_by: Option<CellCoord>,
}

#[derive(Clone, Copy, Debug)]
enum Resolution {
    Move(Leg),
    Wedged { blocked_by: CellCoord },
    Inconsistent { cell: CellCoord },
}

fn resolve_leg<W>(position: Vector2, velocity: Vector2, world: &W) -> Resolution
where
    W: GridQuery + ?Sized,
{
    let cell = classify_position(position, velocity);
    if world.classify(cell).is_open() {
        return Resolution::Move(Leg {
            velocity,
            cell,
            blocked_by: None,
        });
    }

    // Axes whose velocity component may be kept while sliding, in probe order.
    let slide_axes: &[Axis] = match (is_integer(position.x()), is_integer(position.y())) {
        (true, true) => {
            if velocity.x().abs() > velocity.y().abs() {
                &[Axis::X, Axis::Y]
            } else {
                &[Axis::Y, Axis::X]
            }
        }
        (true, false) => &[Axis::Y],
        (false, true) => &[Axis::X],
        (false, false) => return Resolution::Inconsistent { cell },
    };

    for &kept in slide_axes {
        let slide = velocity.with_component(kept.other(), 0.0);
        if slide.is_zero() {
            continue;
        }

        if let Some(probe) = open_slide_cell(position, velocity, kept, world) {
            debug!("sliding along {kept:?} past blocked cell {cell:?} into {probe:?}");
            return Resolution::Move(Leg {
                velocity: slide,
                cell: probe,
                blocked_by: Some(cell),
            });
        }
    }

    Resolution::Wedged { blocked_by: cell }
}

/// Finds the open cell a slide along `kept` would travel through.
///
/// The zeroed axis lies exactly on a grid line, so the slide runs through the
/// cell on the side the agent approached from. Without a component on that
/// axis there is no approach side and both neighbours are probed.
fn open_slide_cell<W>(position: Vector2, velocity: Vector2, kept: Axis, world: &W) -> Option<CellCoord>
where
    W: GridQuery + ?Sized,
{
    let zeroed = kept.other();
    let along = cell_index(position.component(kept), velocity.component(kept));
    let line = position.component(zeroed);
    let approach = velocity.component(zeroed);

    let across: &[i64] = if approach > 0.0 {
        &[cell_index(line, -1.0)]
    } else if approach < 0.0 {
        &[cell_index(line, 1.0)]
    } else {
        &[cell_index(line, 1.0), cell_index(line, -1.0)]
    };

    across
        .iter()
        .map(|&index| match kept {
            Axis::X => CellCoord::new(along, index),
            Axis::Y => CellCoord::new(index, along),
        })
        .find(|&probe| world.classify(probe).is_open())
}

/// Seconds until `coordinate` moving at `speed` reaches the next grid line.
fn time_to_line(coordinate: f64, speed: f64) -> f64 {
    if speed == 0.0 {
        return f64::INFINITY;
    }

    let fraction = coordinate.rem_euclid(1.0);
    let distance = if speed > 0.0 {
        1.0 - fraction
    } else if fraction == 0.0 {
        1.0
    } else {
        fraction
    };
    distance / speed.abs()
}

/// Grid line reached next by `coordinate` moving at `speed`.
fn next_line(coordinate: f64, speed: f64) -> f64 {
    let floored = coordinate.floor();
    if speed > 0.0 {
        floored + 1.0
    } else if floored == coordinate {
        floored - 1.0
    } else {
        floored
    }
}

fn is_integer(coordinate: f64) -> bool {
    coordinate.fract() == 0.0
}

fn snap(position: Vector2) -> Vector2 {
    position
        .with_x(snap_coordinate(position.x()))
        .with_y(snap_coordinate(position.y()))
}

fn snap_coordinate(coordinate: f64) -> f64 {
    let nearest = coordinate.round();
    if (coordinate - nearest).abs() <= SNAP_EPSILON * nearest.abs().max(1.0) {
        // Adding zero folds a negative zero into positive zero.
        nearest + 0.0
    } else {
        coordinate
    }
}

fn invariant_violated(builder: PathBuilder, detail: std::fmt::Arguments<'_>) -> Path {
    if cfg!(debug_assertions) {
        panic!("path projection invariant violated: {detail}");
    }
    error!(
        "path projection invariant violated, truncating after {} segments: {detail}",
        builder.len()
    );
    builder.finish(Termination::Degenerate)
}
