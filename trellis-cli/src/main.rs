//! Trellis CLI
//!
//! Runs one layout pass over a JSON fixture and prints the box tree.

mod fixture;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use serde::Serialize;
use trellis_common::Diagnostic;
use trellis_css::{
    ApproximateTextMeasure, BoxSource, ComputedStyle, EdgeSizes, LayoutBox, LayoutOptions, LayoutResult, Size,
    SpacingTable, ZIndex, layout_document,
};
use trellis_dom::NodeId;

use fixture::Fixture;

/// Trellis: inspect CSS cascade and layout passes
#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the box tree of a fixture
    trellis page.json

    # Narrow viewport, with computed styles
    trellis --width 320 --styles page.json

    # Machine-readable output
    trellis --json page.json > layout.json

    # Verbose pass logging
    RUST_LOG=trellis_css=debug trellis page.json
"#)]
struct Cli {
    /// JSON fixture holding the document, rules and viewport
    #[arg(value_name = "FIXTURE")]
    fixture: PathBuf,

    /// Viewport width, overriding the fixture (default: 800)
    #[arg(long)]
    width: Option<f32>,

    /// Viewport height, overriding the fixture (default: 600)
    #[arg(long)]
    height: Option<f32>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Also print computed styles
    #[arg(long)]
    styles: bool,

    /// Use the classic heading/paragraph spacing table
    #[arg(long)]
    classic_spacing: bool,

    /// Leave out the built-in default stylesheet
    #[arg(long)]
    no_default_rules: bool,
}

impl Cli {
    fn options(&self, fixture: &Fixture) -> LayoutOptions {
        let defaults = LayoutOptions::default();
        let base = fixture.viewport.map_or(defaults.viewport, Size::from);
        LayoutOptions {
            viewport: Size::new(
                self.width.unwrap_or(base.width),
                self.height.unwrap_or(base.height),
            ),
            spacing: if self.classic_spacing {
                SpacingTable::classic()
            } else {
                SpacingTable::new()
            },
            include_default_rules: !self.no_default_rules,
            ..defaults
        }
    }
}

/// What `--json` prints.
#[derive(Serialize)]
struct Report<'a> {
    viewport: Size,
    root: Option<&'a LayoutBox>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    styles: Vec<StyleEntry<'a>>,
    diagnostics: &'a [Diagnostic],
}

#[derive(Serialize)]
struct StyleEntry<'a> {
    node: NodeId,
    style: &'a ComputedStyle,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let text = fs::read_to_string(&cli.fixture)
        .with_context(|| format!("failed to read {}", cli.fixture.display()))?;
    let fixture = Fixture::from_json(&text).with_context(|| format!("in {}", cli.fixture.display()))?;
    let tree = fixture.build_tree();
    let store = fixture.build_store()?;
    let options = cli.options(&fixture);

    let result = layout_document(tree.document(), &store, &ApproximateTextMeasure, &options);

    if cli.json {
        let report = Report {
            viewport: options.viewport,
            root: result.root.as_ref(),
            styles: if cli.styles {
                result
                    .styles
                    .iter()
                    .map(|(node, style)| StyleEntry {
                        node: *node,
                        style: style.as_ref(),
                    })
                    .collect()
            } else {
                Vec::new()
            },
            diagnostics: result.diagnostics.records(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_result(&result, &options, cli.styles);
    Ok(())
}

fn print_result(result: &LayoutResult, options: &LayoutOptions, show_styles: bool) {
    println!(
        "{}",
        format!(
            "=== Box Tree (viewport: {}x{}) ===",
            options.viewport.width, options.viewport.height
        )
        .bold()
    );
    match &result.root {
        Some(root) => print_box(root, 0),
        None => println!("{}", "no boxes generated".dimmed()),
    }

    if show_styles {
        println!("\n{}", "=== Computed Styles ===".bold());
        for (node, style) in &result.styles {
            println!("{}", node.cyan());
            for (property, value) in style.iter() {
                println!("  {property}: {value}");
            }
        }
    }

    println!("\n{}", "=== Diagnostics ===".bold());
    if result.diagnostics.is_empty() {
        println!("{}", "none".dimmed());
    }
    for diagnostic in result.diagnostics.records() {
        println!("{}", diagnostic.yellow());
    }
}

/// Recursively print a box with its geometry.
fn print_box(layout_box: &LayoutBox, depth: usize) {
    let indent = "  ".repeat(depth);
    let label = match &layout_box.source {
        BoxSource::Element { node, tag } => format!("<{tag}> {node}").cyan().to_string(),
        BoxSource::Text { text, .. } => {
            let preview: String = text.chars().take(30).collect();
            let suffix = if text.chars().count() > 30 { "..." } else { "" };
            format!("\"{}{suffix}\"", preview.replace('\n', "\\n")).green().to_string()
        }
        BoxSource::Anonymous => "anonymous".dimmed().to_string(),
    };
    let z = match layout_box.z_index {
        ZIndex::Auto => String::new(),
        ZIndex::Integer(z) => format!(" z={z}"),
    };
    println!("{indent}[{label}] {}{z}", layout_box.box_type);

    let content = layout_box.metrics.content;
    println!(
        "{indent}  content: x={:.1} y={:.1} w={:.1} h={:.1}",
        content.x, content.y, content.width, content.height
    );
    for (name, edges) in [
        ("margin", &layout_box.metrics.margin),
        ("border", &layout_box.metrics.border),
        ("padding", &layout_box.metrics.padding),
    ] {
        if *edges != EdgeSizes::default() {
            println!(
                "{indent}  {name}: t={:.1} r={:.1} b={:.1} l={:.1}",
                edges.top, edges.right, edges.bottom, edges.left
            );
        }
    }
    for fragment in &layout_box.fragments {
        println!(
            "{indent}  {} line {} at x={:.1} y={:.1} w={:.1}",
            "fragment".dimmed(),
            fragment.line,
            fragment.rect.x,
            fragment.rect.y,
            fragment.rect.width
        );
    }

    for child in &layout_box.children {
        print_box(child, depth + 1);
    }
}
