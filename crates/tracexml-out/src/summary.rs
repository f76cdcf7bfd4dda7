//! Completion summary printed after a run.
//!
//! Uses Handlebars with one custom helper:
//! - basename: Last component of a path

use handlebars::{handlebars_helper, no_escape, Handlebars};
use once_cell::sync::Lazy;
use serde_json::json;
use std::path::Path;
use tracexml_core::{RunContext, StageRecord};

use crate::{RenderError, RenderOutcome};

const SUMMARY_TEMPLATE: &str = "\
Trace complete for oid = {{oid}} (run {{run_id}}, started {{started_at}})
{{#each stages}}  {{id}}: {{items}} item(s) -> {{basename output}} ({{latency_ms}} ms)
{{/each}}{{#if report.rendered}}Report: {{report.output}}{{else}}Report not rendered{{#if report.error}}: {{report.error}}{{/if}}{{/if}}
";

handlebars_helper!(basename: |path: str| {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
});

static SUMMARY: Lazy<Handlebars<'static>> = Lazy::new(|| {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(no_escape);
    handlebars.register_helper("basename", Box::new(basename));
    handlebars
        .register_template_string("summary", SUMMARY_TEMPLATE)
        .expect("summary template is valid");
    handlebars
});

/// Render the human-readable summary of a completed run.
pub fn render_summary(
    ctx: &RunContext,
    records: &[StageRecord],
    report: &RenderOutcome,
) -> Result<String, RenderError> {
    let data = json!({
        "oid": ctx.oid,
        "run_id": ctx.run_id,
        "started_at": ctx.started_at.to_rfc3339(),
        "stages": records,
        "report": report,
    });

    SUMMARY
        .render("summary", &data)
        .map_err(|e| RenderError::Summary(e.to_string()))
}
