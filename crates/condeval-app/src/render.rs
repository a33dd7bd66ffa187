//! Render and artifact-writing use cases.

use anyhow::Context;
use camino::Utf8Path;
use condeval_types::CondevalReport;

use crate::report::{serialize_report, to_renderable};

pub fn render_markdown(report: &CondevalReport) -> String {
    condeval_render::render_markdown(&to_renderable(report))
}

/// Serialize `report` as pretty JSON to `path`, creating parent directories.
pub fn write_report(path: &Utf8Path, report: &CondevalReport) -> anyhow::Result<()> {
    let bytes = serialize_report(report)?;
    write_bytes(path, &bytes)
}

pub fn write_text(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    write_bytes(path, text.as_bytes())
}

fn write_bytes(path: &Utf8Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create dir {parent}"))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write {path}"))?;
    tracing::debug!(path = %path, bytes = bytes.len(), "wrote artifact");
    Ok(())
}
