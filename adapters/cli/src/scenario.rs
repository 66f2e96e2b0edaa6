use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use gridwalk_core::{AgentState, CellCoord, GridQuery, MotionConfig, Vector2, DEFAULT_PATH_TIME};
use gridwalk_world::{layout, World};
use serde::Deserialize;

const DEFAULT_FRAME_SECONDS: f64 = 1.0 / 60.0;

/// Fully validated scenario ready to be simulated.
#[derive(Debug)]
pub(crate) struct Scenario {
    pub(crate) config: MotionConfig,
    pub(crate) spawn: AgentState,
    pub(crate) world: World,
    pub(crate) frame_seconds: f64,
    pub(crate) inputs: Vec<InputSpan>,
}

/// Velocity held for a run of consecutive frames.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct InputSpan {
    pub(crate) frames: usize,
    pub(crate) velocity: Vector2,
}

impl Scenario {
    /// Loads and validates the scenario stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario at {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("invalid scenario at {}", path.display()))
    }

    /// Parses and validates a scenario from TOML text.
    pub(crate) fn from_toml(contents: &str) -> Result<Self> {
        let file: ScenarioFile =
            toml::from_str(contents).context("failed to parse scenario toml contents")?;

        let config = MotionConfig::new(file.motion.path_time, file.motion.movement_enabled)
            .context("invalid [motion] section")?;

        if !(file.frame_seconds > 0.0 && file.frame_seconds.is_finite()) {
            bail!(
                "frame_seconds must be a positive finite number, got {}",
                file.frame_seconds
            );
        }

        let [origin_x, origin_y] = file.world.origin;
        let world = layout::parse(&file.world.layout, CellCoord::new(origin_x, origin_y))
            .context("invalid [world] layout")?;

        let spawn = AgentState::spawn(file.agent.position);
        if !world.classify(spawn.cell).is_open() {
            bail!(
                "invalid [agent] position: ({}, {}) lies in cell ({}, {}), which is not open",
                spawn.position.x(),
                spawn.position.y(),
                spawn.cell.x(),
                spawn.cell.y()
            );
        }

        Ok(Self {
            config,
            spawn,
            world,
            frame_seconds: file.frame_seconds,
            inputs: file.inputs,
        })
    }

    /// Velocity requested on the first frame, or zero when no input is scripted.
    pub(crate) fn initial_velocity(&self) -> Vector2 {
        self.inputs
            .iter()
            .find(|span| span.frames > 0)
            .map_or(Vector2::ZERO, |span| span.velocity)
    }

    /// Per-frame velocities in playback order.
    pub(crate) fn frame_velocities(&self) -> impl Iterator<Item = Vector2> + '_ {
        self.inputs
            .iter()
            .flat_map(|span| std::iter::repeat(span.velocity).take(span.frames))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioFile {
    #[serde(default)]
    motion: MotionSection,
    agent: AgentSection,
    world: WorldSection,
    #[serde(default = "default_frame_seconds")]
    frame_seconds: f64,
    #[serde(default, rename = "input")]
    inputs: Vec<InputSpan>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, default)]
struct MotionSection {
    path_time: f64,
    movement_enabled: bool,
}

impl Default for MotionSection {
    fn default() -> Self {
        Self {
            path_time: DEFAULT_PATH_TIME,
            movement_enabled: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AgentSection {
    position: Vector2,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WorldSection {
    #[serde(default)]
    origin: [i64; 2],
    layout: String,
}

fn default_frame_seconds() -> f64 {
    DEFAULT_FRAME_SECONDS
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridwalk_core::CellState;

    const CORRIDOR: &str = r#"
        frame_seconds = 0.05

        [motion]
        path_time = 0.25

        [agent]
        position = [1.5, 1.5]

        [world]
        origin = [0, 0]
        layout = """
#####
#...#
#####"""

        [[input]]
        frames = 3
        velocity = [2.0, 0.0]

        [[input]]
        frames = 2
        velocity = [0.0, 0.0]
    "#;

    #[test]
    fn parses_complete_scenario() {
        let scenario = Scenario::from_toml(CORRIDOR).expect("scenario parses");

        assert!((scenario.config.path_time() - 0.25).abs() < f64::EPSILON);
        assert!(scenario.config.movement_enabled());
        assert_eq!(scenario.spawn.cell, CellCoord::new(1, 1));
        assert_eq!(scenario.world.classify(CellCoord::new(3, 1)), CellState::Open);
        assert_eq!(scenario.world.classify(CellCoord::new(4, 1)), CellState::Blocked);
        assert_eq!(scenario.frame_velocities().count(), 5);
        assert_eq!(
            scenario.initial_velocity(),
            Vector2::new(2.0, 0.0).expect("finite vector")
        );
    }

    #[test]
    fn motion_section_defaults_when_omitted() {
        let scenario = Scenario::from_toml(
            r#"
            [agent]
            position = [0.5, 0.5]

            [world]
            layout = "."
            "#,
        )
        .expect("scenario parses");

        assert_eq!(scenario.config, MotionConfig::default());
        assert!((scenario.frame_seconds - DEFAULT_FRAME_SECONDS).abs() < f64::EPSILON);
        assert_eq!(scenario.initial_velocity(), Vector2::ZERO);
    }

    #[test]
    fn rejects_non_positive_path_time() {
        let error = Scenario::from_toml(
            r#"
            [motion]
            path_time = 0.0

            [agent]
            position = [0.5, 0.5]

            [world]
            layout = "."
            "#,
        )
        .expect_err("zero horizon rejected");

        assert!(format!("{error:#}").contains("path time"));
    }

    #[test]
    fn rejects_unknown_layout_symbols() {
        let error = Scenario::from_toml(
            r#"
            [agent]
            position = [0.5, 0.5]

            [world]
            layout = ".?"
            "#,
        )
        .expect_err("unknown symbol rejected");

        assert!(format!("{error:#}").contains("unknown layout symbol"));
    }

    #[test]
    fn rejects_spawn_inside_a_wall() {
        let error = Scenario::from_toml(
            r##"
            [agent]
            position = [0.5, 0.5]

            [world]
            layout = "#."

            [[input]]
            frames = 1
            velocity = [1.0, 0.0]
            "##,
        )
        .expect_err("spawn in blocked cell rejected");

        assert!(format!("{error:#}").contains("cell (0, 0), which is not open"));
    }

    #[test]
    fn rejects_spawn_in_unexplored_cell() {
        let error = Scenario::from_toml(
            r#"
            [agent]
            position = [4.5, 0.5]

            [world]
            layout = ".."
            "#,
        )
        .expect_err("spawn outside the layout rejected");

        assert!(format!("{error:#}").contains("invalid [agent] position"));
    }
}
