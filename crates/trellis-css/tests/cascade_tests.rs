//! Integration tests for the cascade as seen through a layout pass.

use trellis_common::Diagnostics;
use trellis_css::{
    ApproximateTextMeasure, Cascade, Declaration, LayoutOptions, Origin, Selector, Specificity, StyleRuleStore,
    compute_styles, layout_document, parse_declarations,
};
use trellis_dom::{DomTree, ElementData, NodeId};

fn store_with(rules: &[(&str, &str)]) -> StyleRuleStore {
    let mut store = StyleRuleStore::new();
    for (selectors, declarations) in rules {
        let _ = store.add(selectors, declarations, Origin::Author);
    }
    store
}

#[test]
fn test_class_rule_beats_type_rule() {
    let mut tree = DomTree::new();
    let div = tree.append_element(NodeId::ROOT, ElementData::new("div").with_attr("class", "a"));
    let store = store_with(&[(".a", "color: red"), ("div", "color: blue")]);

    let result = layout_document(tree.document(), &store, &ApproximateTextMeasure, &LayoutOptions::default());
    assert_eq!(result.styles[&div].get("color"), Some("red"));
}

#[test]
fn test_important_beats_higher_specificity() {
    let mut tree = DomTree::new();
    let p = tree.append_element(
        NodeId::ROOT,
        ElementData::new("p").with_attr("id", "x").with_attr("style", "color: teal"),
    );
    let store = store_with(&[("p", "color: green !important"), ("#x", "color: red")]);

    let mut diagnostics = Diagnostics::new();
    let styles = compute_styles(tree.document(), &Cascade::new(&store), &mut diagnostics);
    assert_eq!(styles[&p].get("color"), Some("green"));
    assert!(diagnostics.is_empty());
}

#[test]
fn test_structured_rules_without_text() {
    let mut tree = DomTree::new();
    let body = tree.append_element(NodeId::ROOT, ElementData::new("body"));
    let span = tree.append_element(body, ElementData::new("span").with_attr("class", "note"));

    let mut store = StyleRuleStore::new();
    let selector = Selector::parse("body .note").unwrap();
    assert_eq!(selector.specificity(), Specificity(0, 1, 1));
    let first = store.add_rule(
        selector,
        vec![Declaration::new("font-size", "20px")],
        Origin::Author,
    );
    let second = store.add_rule(
        Selector::parse("span").unwrap(),
        parse_declarations("font-size: 12px; padding: 1px 2px"),
        Origin::Author,
    );
    assert!(second > first);

    let mut diagnostics = Diagnostics::new();
    let styles = compute_styles(tree.document(), &Cascade::new(&store), &mut diagnostics);
    assert_eq!(styles[&span].get("font-size"), Some("20px"));
    assert_eq!(styles[&span].get("padding-left"), Some("2px"));
}

#[test]
fn test_inherited_and_non_inherited_properties() {
    let mut tree = DomTree::new();
    let div = tree.append_element(NodeId::ROOT, ElementData::new("div"));
    let em = tree.append_element(div, ElementData::new("em"));
    let store = store_with(&[("div", "color: #123456; font-size: 20px; border: 1px solid")]);

    let result = layout_document(tree.document(), &store, &ApproximateTextMeasure, &LayoutOptions::default());
    let em_style = &result.styles[&em];
    assert_eq!(em_style.get("color"), Some("#123456"));
    assert_eq!(em_style.get("font-size"), Some("20px"));
    assert_eq!(em_style.get("font-style"), Some("italic"), "default stylesheet still applies");
    assert_eq!(em_style.get("border-top-width"), Some("medium"));
}

#[test]
fn test_default_rules_can_be_left_out() {
    let mut tree = DomTree::new();
    let body = tree.append_element(NodeId::ROOT, ElementData::new("body"));

    let with_defaults = layout_document(
        tree.document(),
        &StyleRuleStore::new(),
        &ApproximateTextMeasure,
        &LayoutOptions::default(),
    );
    assert_eq!(with_defaults.styles[&body].get("margin-top"), Some("8px"));

    let options = LayoutOptions {
        include_default_rules: false,
        ..LayoutOptions::default()
    };
    let without = layout_document(
        tree.document(),
        &StyleRuleStore::with_default_rules(),
        &ApproximateTextMeasure,
        &options,
    );
    assert_eq!(without.styles[&body].get("margin-top"), Some("0px"));
}

#[test]
fn test_cascade_is_deterministic() {
    let mut tree = DomTree::new();
    let ul = tree.append_element(NodeId::ROOT, ElementData::new("ul"));
    for i in 0..4 {
        let li = tree.append_element(ul, ElementData::new("li").with_attr("class", &format!("item-{i}")));
        let _ = tree.append_text(li, "entry");
    }
    let store = store_with(&[
        ("li:first-child", "margin-top: 4px"),
        ("ul > li", "color: maroon; padding: 1em"),
        ("li:last-child, .item-1", "color: navy"),
    ]);

    let mut first = Diagnostics::new();
    let mut second = Diagnostics::new();
    let cascade = Cascade::new(&store);
    assert_eq!(
        compute_styles(tree.document(), &cascade, &mut first),
        compute_styles(tree.document(), &cascade, &mut second)
    );
    assert_eq!(first.len(), second.len());
}
