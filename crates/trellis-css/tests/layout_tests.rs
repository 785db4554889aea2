//! Integration tests for full layout passes.

use trellis_common::{DiagnosticKind, MeasureError};
use trellis_css::{
    ApproximateTextMeasure, BoxType, FontSpec, LayoutBox, LayoutOptions, LayoutResult, SpacingTable, StyleRuleStore,
    TextMeasure, layout_document,
};
use trellis_dom::{DomTree, ElementData, NodeId};

const EPSILON: f32 = 0.01;

fn assert_close(actual: f32, expected: f32, what: &str) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "{what}: expected {expected}, got {actual}"
    );
}

fn styled(tag: &str, style: &str) -> ElementData {
    ElementData::new(tag).with_attr("style", style)
}

fn run(tree: &DomTree, options: &LayoutOptions) -> LayoutResult {
    layout_document(tree.document(), &StyleRuleStore::new(), &ApproximateTextMeasure, options)
}

fn box_of(result: &LayoutResult, node: NodeId) -> &LayoutBox {
    result
        .box_for(node)
        .unwrap_or_else(|| panic!("no box generated for {node}"))
}

#[test]
fn test_width_from_parent_and_percentage() {
    // <div style="width:200px"><p>A</p><p style="width:50%">B</p></div>
    let mut tree = DomTree::new();
    let div = tree.append_element(NodeId::ROOT, styled("div", "width:200px"));
    let first = tree.append_element(div, ElementData::new("p"));
    let _ = tree.append_text(first, "A");
    let second = tree.append_element(div, styled("p", "width:50%"));
    let _ = tree.append_text(second, "B");

    let result = run(&tree, &LayoutOptions::default());

    let div_box = box_of(&result, div);
    let first_box = box_of(&result, first);
    let second_box = box_of(&result, second);
    assert_close(div_box.metrics.content.width, 200.0, "div width");
    assert_close(first_box.metrics.content.width, 200.0, "auto width fills the parent");
    assert_close(second_box.metrics.content.width, 100.0, "50% of the parent");
    assert!(
        second_box.margin_box().y >= first_box.margin_box().bottom() - EPSILON,
        "second p at {} overlaps first p ending at {}",
        second_box.margin_box().y,
        first_box.margin_box().bottom()
    );
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics.records());
}

#[test]
fn test_block_siblings_never_overlap() {
    let mut tree = DomTree::new();
    let body = tree.append_element(NodeId::ROOT, ElementData::new("body"));
    let h1 = tree.append_element(body, ElementData::new("h1"));
    let _ = tree.append_text(h1, "Title");
    let _ = tree.append_element(body, styled("div", "height: 40px; padding: 5px; border: 2px solid"));
    let _ = tree.append_element(body, styled("div", "margin: 3em 0; height: 10%"));
    let p = tree.append_element(body, ElementData::new("p"));
    let _ = tree.append_text(p, "a paragraph long enough to wrap over a couple of lines at this width");
    let _ = tree.append_element(body, styled("div", "height: 0"));

    let result = run(&tree, &LayoutOptions::with_viewport(300.0, 200.0));
    let body_box = box_of(&result, body);
    assert_eq!(body_box.children.len(), 5);
    for pair in body_box.children.windows(2) {
        let (above, below) = (pair[0].margin_box(), pair[1].margin_box());
        assert!(
            below.y >= above.y + above.height - EPSILON,
            "{} at {} starts inside {} ending at {}",
            pair[1].describe(),
            below.y,
            pair[0].describe(),
            above.bottom()
        );
    }
    let last = body_box.children[4].margin_box();
    assert_close(body_box.metrics.content.height, last.bottom() - body_box.metrics.content.y, "body auto height");
}

#[test]
fn test_display_none_removes_whole_subtree() {
    let mut tree = DomTree::new();
    let body = tree.append_element(NodeId::ROOT, ElementData::new("body"));
    let hidden = tree.append_element(body, styled("div", "display: none"));
    let inner = tree.append_element(hidden, ElementData::new("p"));
    let text = tree.append_text(inner, "never shown");
    let shown = tree.append_element(body, ElementData::new("p"));
    let _ = tree.append_text(shown, "shown");
    let attr_hidden = tree.append_element(body, ElementData::new("p").with_attr("hidden", ""));

    let result = run(&tree, &LayoutOptions::default());
    for node in [hidden, inner, text, attr_hidden] {
        assert!(result.box_for(node).is_none(), "{node} should generate no box");
    }
    // anonymous root, body, p, its text
    assert_eq!(result.root.as_ref().map(LayoutBox::count), Some(4));
    let shown_box = box_of(&result, shown);
    assert_close(shown_box.metrics.content.y, 8.0 + 16.0, "hidden content takes no space");
}

#[test]
fn test_hidden_root_produces_no_tree() {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, styled("html", "display:none"));
    let _ = tree.append_element(html, ElementData::new("body"));

    let result = layout_document(
        tree.node(html),
        &StyleRuleStore::new(),
        &ApproximateTextMeasure,
        &LayoutOptions::default(),
    );
    assert!(result.root.is_none());
    assert!(result.styles.contains_key(&html));
}

#[test]
fn test_grid_fr_columns() {
    let mut tree = DomTree::new();
    let grid = tree.append_element(
        NodeId::ROOT,
        styled("div", "display: grid; width: 500px; grid-template-columns: 100px 1fr 1fr"),
    );
    let cells: Vec<NodeId> = (0..3)
        .map(|i| {
            let placement = format!("grid-column: {}", i + 1);
            let cell = tree.append_element(grid, styled("span", &placement));
            let _ = tree.append_text(cell, &format!("cell {i}"));
            cell
        })
        .collect();

    let result = run(&tree, &LayoutOptions::default());
    let grid_box = box_of(&result, grid);
    assert_eq!(grid_box.box_type, BoxType::GridContainer);
    let origin = grid_box.metrics.content.x;
    let expected = [(0.0, 100.0), (100.0, 200.0), (300.0, 200.0)];
    for (cell, (x, width)) in cells.iter().zip(expected) {
        let rect = box_of(&result, *cell).metrics.content;
        assert_close(rect.x - origin, x, "column offset");
        assert_close(rect.width, width, "column width");
    }
}

#[test]
fn test_grid_items_without_placement_share_first_cell() {
    let mut tree = DomTree::new();
    let grid = tree.append_element(
        NodeId::ROOT,
        styled("div", "display: grid; width: 300px; grid-template-columns: 100px 100px 100px"),
    );
    let first = tree.append_element(grid, ElementData::new("span"));
    let second = tree.append_element(grid, ElementData::new("span"));

    let result = run(&tree, &LayoutOptions::default());
    let origin = box_of(&result, grid).metrics.content;
    for item in [first, second] {
        let rect = box_of(&result, item).metrics.content;
        assert_close(rect.x - origin.x, 0.0, "omitted column line is line 1");
        assert_close(rect.y - origin.y, 0.0, "omitted row line is line 1");
        assert_close(rect.width, 100.0, "1x1 cell");
    }
}

#[test]
fn test_unknown_tags_default_to_block() {
    let mut tree = DomTree::new();
    let body = tree.append_element(NodeId::ROOT, ElementData::new("body"));
    let widget = tree.append_element(body, ElementData::new("custom-widget"));
    let _ = tree.append_text(widget, "hi");
    let label = tree.append_element(body, ElementData::new("span"));
    let _ = tree.append_text(label, "after");

    let result = run(&tree, &LayoutOptions::default());
    let widget_box = box_of(&result, widget);
    assert_eq!(widget_box.box_type, BoxType::Block);
    assert!(!widget_box.inline_level);
    assert_close(widget_box.metrics.content.width, 784.0, "block fills the body");
    let label_box = box_of(&result, label);
    assert_eq!(label_box.box_type, BoxType::Inline);
    assert!(
        label_box.margin_box().y >= widget_box.margin_box().bottom() - EPSILON,
        "inline content after a block starts below it"
    );
}

#[test]
fn test_flex_items_fill_container() {
    let mut tree = DomTree::new();
    let row = tree.append_element(
        NodeId::ROOT,
        styled("div", "display: flex; width: 600px; column-gap: 10px"),
    );
    let items: Vec<NodeId> = [1, 2, 1]
        .iter()
        .map(|grow| tree.append_element(row, styled("span", &format!("flex: {grow} 1 50px"))))
        .collect();

    let result = run(&tree, &LayoutOptions::default());
    let widths: Vec<f32> = items
        .iter()
        .map(|item| box_of(&result, *item).margin_box().width)
        .collect();
    assert_close(widths.iter().sum::<f32>() + 20.0, 600.0, "items plus gaps");
    assert_close(widths[0], 157.5, "first item");
    assert_close(widths[1], 265.0, "second item");
    let last = box_of(&result, items[2]).margin_box();
    let row_box = box_of(&result, row);
    assert_close(last.right(), row_box.metrics.content.right(), "last item ends at the container edge");
}

#[test]
fn test_relative_offset_moves_box_not_siblings() {
    let mut tree = DomTree::new();
    let moved = tree.append_element(
        NodeId::ROOT,
        styled("div", "position: relative; top: 10px; left: 20px; height: 30px; margin: 0"),
    );
    let inner = tree.append_element(moved, styled("div", "height: 10px; margin: 0"));
    let after = tree.append_element(NodeId::ROOT, styled("div", "height: 30px; margin: 0"));

    let result = run(&tree, &LayoutOptions::default());
    let moved_box = box_of(&result, moved).metrics.content;
    assert_close(moved_box.x, 20.0, "moved x");
    assert_close(moved_box.y, 10.0, "moved y");
    assert_close(box_of(&result, inner).metrics.content.y, 10.0, "child moves with its parent");
    assert_close(box_of(&result, after).metrics.content.y, 30.0, "sibling keeps its place");
}

#[test]
fn test_paint_order_follows_z_index() {
    let mut tree = DomTree::new();
    let body = tree.append_element(NodeId::ROOT, ElementData::new("body"));
    let top = tree.append_element(body, styled("div", "z-index: 2; height: 10px"));
    let plain = tree.append_element(body, styled("div", "height: 10px"));
    let under = tree.append_element(body, styled("div", "z-index: -1; height: 10px"));

    let result = run(&tree, &LayoutOptions::default());
    let body_box = box_of(&result, body);
    let order: Vec<Option<NodeId>> = body_box.children.iter().map(LayoutBox::node).collect();
    assert_eq!(order, vec![Some(under), Some(plain), Some(top)]);
    // geometry still follows document order
    assert!(box_of(&result, under).metrics.content.y > box_of(&result, top).metrics.content.y);
}

#[test]
fn test_spacing_table_adds_space_between_tags() {
    let mut tree = DomTree::new();
    let body = tree.append_element(NodeId::ROOT, ElementData::new("body"));
    let h1 = tree.append_element(body, ElementData::new("h1"));
    let _ = tree.append_text(h1, "Heading");
    let p = tree.append_element(body, ElementData::new("p"));
    let _ = tree.append_text(p, "Text");

    let options = LayoutOptions {
        spacing: SpacingTable::new().with("h1", "p", 10.0),
        include_default_rules: false,
        ..LayoutOptions::default()
    };
    let result = run(&tree, &options);
    let h1_box = box_of(&result, h1).margin_box();
    assert_close(h1_box.y, 0.0, "first child gets no extra space");
    assert_close(box_of(&result, p).margin_box().y, h1_box.bottom() + 10.0, "h1 → p spacing");
}

#[test]
fn test_rem_units_follow_root_font_size() {
    let mut tree = DomTree::new();
    let div = tree.append_element(NodeId::ROOT, styled("div", "width: 10rem; margin: 0"));

    let options = LayoutOptions {
        root_font_size: 10.0,
        ..LayoutOptions::default()
    };
    let result = run(&tree, &options);
    assert_close(box_of(&result, div).metrics.content.width, 100.0, "10rem at 10px");
}

#[derive(Debug)]
struct NoFonts;

impl TextMeasure for NoFonts {
    fn measure(&self, _text: &str, font: &FontSpec) -> Result<f32, MeasureError> {
        Err(MeasureError::FontUnavailable(font.family.clone()))
    }
}

#[test]
fn test_measurement_failure_is_diagnosed_and_layout_completes() {
    let mut tree = DomTree::new();
    let p = tree.append_element(NodeId::ROOT, styled("p", "font-family: Missing"));
    let text = tree.append_text(p, "hello world");

    let result = layout_document(tree.document(), &StyleRuleStore::new(), &NoFonts, &LayoutOptions::default());
    assert!(result.diagnostics.of_kind(DiagnosticKind::MeasureFailed).count() >= 1);
    let text_box = box_of(&result, text);
    assert!(text_box.fragments.iter().all(|f| f.rect.width == 0.0));
    assert_close(box_of(&result, p).metrics.content.width, 800.0, "block still fills the viewport");
}

#[test]
fn test_malformed_values_fail_soft() {
    let mut tree = DomTree::new();
    let div = tree.append_element(
        NodeId::ROOT,
        styled("div", "width: wide; padding-left: 3zz; display: sideways; margin: 0"),
    );

    let result = run(&tree, &LayoutOptions::default());
    let div_box = box_of(&result, div);
    assert_eq!(div_box.box_type, BoxType::Block);
    assert_close(div_box.metrics.padding.left, 0.0, "malformed padding");
    assert_close(div_box.metrics.content.width, 0.0, "malformed width resolves to 0");
    assert!(result.diagnostics.of_kind(DiagnosticKind::UnknownDisplay).count() == 1);
    assert!(result.diagnostics.of_kind(DiagnosticKind::MalformedValue).count() >= 2);
}

#[test]
fn test_relayout_is_identical() {
    let mut tree = DomTree::new();
    let body = tree.append_element(NodeId::ROOT, ElementData::new("body"));
    let flex = tree.append_element(body, styled("div", "display: flex; justify-content: center"));
    for word in ["one", "two", "three"] {
        let item = tree.append_element(flex, ElementData::new("span"));
        let _ = tree.append_text(item, word);
    }
    let p = tree.append_element(body, styled("p", "width: calc(50% - 2em)"));
    let _ = tree.append_text(p, "text that wraps around a few times at a narrow width");

    let options = LayoutOptions::with_viewport(400.0, 300.0);
    let first = serde_json::to_value(&run(&tree, &options).root).unwrap();
    let second = serde_json::to_value(&run(&tree, &options).root).unwrap();
    assert_eq!(first, second);
}
