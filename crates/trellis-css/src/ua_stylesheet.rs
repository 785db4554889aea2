//! Default stylesheet
//!
//! [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html)
//!
//! "User agents are expected to have a default style sheet that presents elements
//! of HTML documents in ways consistent with general user expectations."
//!
//! Default rules have the lowest priority in the cascade: any author rule
//! overrides them regardless of specificity. The `display` of each element
//! is not set here; the box tree builder owns that table.

/// `(selector list, declaration block)` pairs loaded by
/// [`StyleRuleStore::with_default_rules`](crate::StyleRuleStore::with_default_rules).
pub const DEFAULT_RULES: &[(&str, &str)] = &[
    // [§ 15.3.3 Flow content](https://html.spec.whatwg.org/multipage/rendering.html#flow-content-3)
    ("body", "margin: 8px"),
    ("div, p, blockquote, ul, ol, pre", "margin: 1em 0"),
    ("blockquote", "margin-left: 40px; margin-right: 40px"),
    // [§ 15.3.6 Sections and headings](https://html.spec.whatwg.org/multipage/rendering.html#sections-and-headings)
    ("h1", "font-size: 2em; font-weight: bold; margin: 0.67em 0"),
    ("h2", "font-size: 1.5em; font-weight: bold; margin: 0.83em 0"),
    ("h3", "font-size: 1.17em; font-weight: bold; margin: 1em 0"),
    ("h4", "font-size: 1em; font-weight: bold; margin: 1.33em 0"),
    ("h5", "font-size: 0.83em; font-weight: bold; margin: 1.67em 0"),
    ("h6", "font-size: 0.67em; font-weight: bold; margin: 2.33em 0"),
    // [§ 15.3.8 Lists](https://html.spec.whatwg.org/multipage/rendering.html#lists)
    ("ul, ol", "padding-left: 40px"),
    ("ul", "list-style-type: disc"),
    ("ol", "list-style-type: decimal"),
    // [§ 15.3.4 Phrasing content](https://html.spec.whatwg.org/multipage/rendering.html#phrasing-content-3)
    ("b, strong", "font-weight: bold"),
    ("i, em, cite, var, dfn", "font-style: italic"),
    ("pre, code, kbd, samp, tt", "font-family: monospace"),
    ("pre", "white-space: pre"),
    ("center", "text-align: center"),
    ("a", "color: #0000ee"),
    // [§ 15.3.1 Hidden elements](https://html.spec.whatwg.org/multipage/rendering.html#hidden-elements)
    ("[hidden]", "display: none"),
];
