// crates/conformance-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and tooling.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for conformance configuration. The output is static and
//! is loaded and validated by the crate tests.

/// Returns a canonical example `conformance.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[corpus]
root = "tests"
extension = "svg"
order_file = "order.txt"
results_file = "results.csv"
max_document_bytes = 262144
vcs = "git"

[checks]
title_limit = true
title_max_length = 60
line_width = 100
disabled = []

[checks.exemptions]
# Entity inclusion hides ids from the parser.
element_ids = ["e-svg-031.svg", "e-svg-032.svg", "e-use-024.svg"]
line_width = ["a-style-004.svg", "e-text-023.svg"]
unused_namespace = ["e-svg-003.svg"]

[renderers]
schema_version = 1
id_column = "title"

[[renderers.columns]]
id = "resvg"
label = "resvg"
primary = true

[[renderers.columns]]
id = "chrome"
label = "Chrome"

[[renderers.columns]]
id = "inkscape"
label = "Inkscape"

[[renderers.columns]]
id = "librsvg"
label = "librsvg"

[[renderers.columns]]
id = "qtsvg"
label = "QtSvg"

[report]
output_dir = "report"
out_of_scope = ["e-font", "e-cursor"]

[[report.categories]]
title = "Structure"
link = "https://www.w3.org/TR/SVG11/struct.html"
features = ["e-svg", "e-g", "e-defs", "e-use", "e-style"]

[[report.categories]]
title = "Shapes"
link = "https://www.w3.org/TR/SVG11/shapes.html"
features = ["e-rect", "e-circle", "e-ellipse", "e-line", "e-polyline", "e-polygon"]

[[report.categories]]
title = "Text"
link = "https://www.w3.org/TR/SVG11/text.html"
features = ["e-text", "e-font", "e-cursor"]

[[report.categories]]
title = "Painting"
link = "https://www.w3.org/TR/SVG11/painting.html"
features = ["a-fill", "a-stroke", "a-stroke-dasharray", "a-style"]

[logging]
enabled = true
# path = "conformance-events.jsonl"
"#,
    )
}
