use std::io::Write;

use anyhow::{Context, Result};
use gridwalk_core::{AgentState, CellCoord, MotionSegment, Path, Termination, Vector2};
use serde::Serialize;

/// Output flavour selected on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Format {
    Text,
    Json,
}

/// Agent state observed at the end of a simulated frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub(crate) struct FrameReport {
    pub(crate) frame: usize,
    pub(crate) time: f64,
    pub(crate) position: Vector2,
    pub(crate) cell: CellCoord,
}

impl FrameReport {
    pub(crate) fn new(frame: usize, time: f64, state: AgentState) -> Self {
        Self {
            frame,
            time,
            position: state.position,
            cell: state.cell,
        }
    }
}

pub(crate) fn write_frame(out: &mut impl Write, format: Format, report: &FrameReport) -> Result<()> {
    match format {
        Format::Text => writeln!(
            out,
            "{:>5} t={:.3} pos=({:.4}, {:.4}) cell=({}, {})",
            report.frame,
            report.time,
            report.position.x(),
            report.position.y(),
            report.cell.x(),
            report.cell.y()
        )
        .context("failed to write frame report"),
        Format::Json => {
            serde_json::to_writer(&mut *out, report).context("failed to encode frame report")?;
            writeln!(out).context("failed to write frame report")
        }
    }
}

pub(crate) fn write_path(out: &mut impl Write, format: Format, path: &Path) -> Result<()> {
    match format {
        Format::Text => {
            for (index, segment) in path.segments().iter().enumerate() {
                write_segment(out, index, segment)?;
            }
            writeln!(
                out,
                "total={:.4}s termination={}",
                path.total_duration(),
                describe(path.termination())
            )
            .context("failed to write path summary")
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, path).context("failed to encode path")?;
            writeln!(out).context("failed to write path")
        }
    }
}

fn write_segment(out: &mut impl Write, index: usize, segment: &MotionSegment) -> Result<()> {
    let blocked = segment
        .blocked_by()
        .map(|cell| format!(" blocked_by=({}, {})", cell.x(), cell.y()))
        .unwrap_or_default();
    writeln!(
        out,
        "{index:>3} ({:.4}, {:.4}) -> ({:.4}, {:.4}) v=({:.3}, {:.3}) dt={:.4} cell=({}, {}){blocked}",
        segment.a().x(),
        segment.a().y(),
        segment.b().x(),
        segment.b().y(),
        segment.velocity().x(),
        segment.velocity().y(),
        segment.duration(),
        segment.cell().x(),
        segment.cell().y(),
    )
    .context("failed to write path segment")
}

fn describe(termination: Termination) -> String {
    match termination {
        Termination::Horizon => "horizon".to_owned(),
        Termination::Stationary => "stationary".to_owned(),
        Termination::Wedged { blocked_by } => {
            format!("wedged by ({}, {})", blocked_by.x(), blocked_by.y())
        }
        Termination::Degenerate => "degenerate".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(x: f64, y: f64) -> Vector2 {
        Vector2::new(x, y).expect("finite vector")
    }

    #[test]
    fn text_frame_lists_position_and_cell() {
        let report = FrameReport::new(
            3,
            0.05,
            AgentState::new(vector(1.25, 2.5), CellCoord::new(1, 2)),
        );
        let mut out = Vec::new();
        write_frame(&mut out, Format::Text, &report).expect("frame written");

        let line = String::from_utf8(out).expect("utf-8 output");
        assert_eq!(line, "    3 t=0.050 pos=(1.2500, 2.5000) cell=(1, 2)\n");
    }

    #[test]
    fn json_frame_is_a_single_line() {
        let report = FrameReport::new(0, 0.0, AgentState::spawn(vector(0.5, 0.5)));
        let mut out = Vec::new();
        write_frame(&mut out, Format::Json, &report).expect("frame written");

        let line = String::from_utf8(out).expect("utf-8 output");
        assert_eq!(line.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(&line).expect("valid json");
        assert_eq!(value["position"], serde_json::json!([0.5, 0.5]));
        assert_eq!(value["cell"]["x"], 0);
    }

    #[test]
    fn text_path_reports_termination() {
        let path = Path::empty(Termination::Wedged {
            blocked_by: CellCoord::new(4, -1),
        });
        let mut out = Vec::new();
        write_path(&mut out, Format::Text, &path).expect("path written");

        let text = String::from_utf8(out).expect("utf-8 output");
        assert_eq!(text, "total=0.0000s termination=wedged by (4, -1)\n");
    }
}
