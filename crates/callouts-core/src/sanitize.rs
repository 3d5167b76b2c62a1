use htmlize::{escape_attribute, escape_text, unescape_attribute};
use lol_html::{RewriteStrSettings, doc_comments, element, rewrite_str};
use regex::Regex;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::OnceLock;

pub const DEFAULT_ICON_SIZE: u32 = 16;

const SVG_ALLOWED_TAGS: &[&str] = &[
    "svg",
    "path",
    "circle",
    "rect",
    "line",
    "polyline",
    "polygon",
    "ellipse",
    "g",
    "defs",
    "title",
    "linearGradient",
    "radialGradient",
    "stop",
    "mask",
    "pattern",
    "clipPath",
];

const SVG_ALLOWED_ATTR: &[&str] = &[
    // Core
    "viewBox",
    "d",
    "points",
    "preserveAspectRatio",
    // Presentation
    "fill",
    "stroke",
    "stroke-width",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-opacity",
    "fill-opacity",
    "opacity",
    // Transform
    "transform",
    "transform-origin",
    // Basic shapes
    "cx",
    "cy",
    "r",
    "rx",
    "ry",
    "x",
    "y",
    "x1",
    "y1",
    "x2",
    "y2",
    "width",
    "height",
    // Gradients
    "gradientUnits",
    "gradientTransform",
    "offset",
    "stop-color",
    "stop-opacity",
    "id",
    "class",
    "style",
    // Pattern/mask
    "patternUnits",
    "maskUnits",
    "maskContentUnits",
];

/// Attributes whose values are never URL-checked (DOMPurify's `URI_SAFE_ATTRIBUTES`, restricted to
/// the allow-list above).
const URI_SAFE_ATTR: &[&str] = &["class", "id", "style"];

/// Disallowed elements whose content is dropped together with them instead of being unwrapped.
const FORBID_CONTENTS: &[&str] = &[
    "annotation-xml",
    "audio",
    "colgroup",
    "desc",
    "foreignobject",
    "head",
    "iframe",
    "math",
    "mi",
    "mn",
    "mo",
    "ms",
    "mtext",
    "noembed",
    "noframes",
    "noscript",
    "plaintext",
    "script",
    "style",
    "template",
    "thead",
    "video",
    "xmp",
];

fn lowercase_set(items: &'static [&'static str]) -> HashSet<String> {
    items.iter().map(|s| s.to_ascii_lowercase()).collect()
}

fn allowed_tags() -> &'static HashSet<String> {
    static SET: OnceLock<HashSet<String>> = OnceLock::new();
    SET.get_or_init(|| lowercase_set(SVG_ALLOWED_TAGS))
}

fn allowed_attr() -> &'static HashSet<String> {
    static SET: OnceLock<HashSet<String>> = OnceLock::new();
    SET.get_or_init(|| lowercase_set(SVG_ALLOWED_ATTR))
}

fn uri_safe_attr() -> &'static HashSet<String> {
    static SET: OnceLock<HashSet<String>> = OnceLock::new();
    SET.get_or_init(|| lowercase_set(URI_SAFE_ATTR))
}

fn forbid_contents() -> &'static HashSet<String> {
    static SET: OnceLock<HashSet<String>> = OnceLock::new();
    SET.get_or_init(|| lowercase_set(FORBID_CONTENTS))
}

fn attr_whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[\u{0000}-\u{0020}\u{00A0}\u{1680}\u{180E}\u{2000}-\u{2029}\u{205F}\u{3000}]")
            .expect("valid regex")
    })
}

fn is_allowed_uri_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:(?:(?:f|ht)tps?|mailto|tel|callto|sms|cid|xmpp):|[^a-z]|[a-z+.\-]+(?:[^a-z+.\-:]|$))")
            .expect("valid regex")
    })
}

fn is_script_or_data_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(?:\w+script|data):").expect("valid regex"))
}

fn css_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)url\(\s*['"]?([^'")]*)"#).expect("valid regex"))
}

fn xml_breakout_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)((--!?|])>)|</(style|title)").expect("valid regex"))
}

fn strip_attr_whitespace(value: &str) -> String {
    attr_whitespace_regex().replace_all(value, "").to_string()
}

/// Every `url(...)` reference must point at a fragment (`url(#grad)`) or an allowed scheme.
fn css_urls_are_safe(decoded_value: &str) -> bool {
    css_url_regex().captures_iter(decoded_value).all(|caps| {
        let target = caps.get(1).map_or("", |m| m.as_str());
        let target = strip_attr_whitespace(target);
        target.is_empty()
            || target.starts_with('#')
            || (is_allowed_uri_regex().is_match(&target)
                && !is_script_or_data_regex().is_match(&target))
    })
}

fn contains_script_scheme(value_no_ws: &str) -> bool {
    let lc = value_no_ws.to_ascii_lowercase();
    lc.contains("javascript:") || lc.contains("vbscript:") || lc.contains("expression(")
}

fn is_valid_attribute(lc_name: &str, value: &str) -> bool {
    // No namespaced attributes (`xlink:href`, `xmlns:*`, `xml:space`), no data attributes.
    if lc_name.contains(':') || lc_name.starts_with("data-") {
        return false;
    }

    if !allowed_attr().contains(lc_name) {
        return false;
    }

    if xml_breakout_regex().is_match(value) {
        return false;
    }

    let decoded_value = unescape_attribute(value);
    let value_no_ws = strip_attr_whitespace(&decoded_value);

    if contains_script_scheme(&value_no_ws) || !css_urls_are_safe(&decoded_value) {
        return false;
    }

    if uri_safe_attr().contains(lc_name) {
        return true;
    }

    if is_allowed_uri_regex().is_match(&value_no_ws) {
        return true;
    }

    value.is_empty()
}

fn local_name(lc_tag: &str) -> &str {
    lc_tag.rsplit(':').next().unwrap_or(lc_tag)
}

/// Allow-list pass over raw SVG markup.
///
/// Disallowed elements are unwrapped (their children survive and are checked in turn) unless they
/// are listed in `FORBID_CONTENTS`, in which case their whole subtree is dropped. Comments and
/// processing instructions are removed. Returns `None` if the markup cannot be tokenized.
pub fn sanitize_svg_markup(markup: &str) -> Option<String> {
    if markup.is_empty() {
        return Some(String::new());
    }

    let handlers = vec![
        element!("*", |el| {
            let lc_tag = el.tag_name().to_ascii_lowercase();

            if lc_tag.contains(':') || !allowed_tags().contains(&lc_tag) {
                if forbid_contents().contains(local_name(&lc_tag)) {
                    el.remove();
                } else {
                    el.remove_and_keep_content();
                }
                return Ok(());
            }

            let attrs: Vec<(String, String)> = el
                .attributes()
                .iter()
                .map(|a| (a.name().to_string(), a.value().to_string()))
                .collect();

            for (name, value) in attrs {
                let lc_name = name.to_ascii_lowercase();
                if !is_valid_attribute(&lc_name, &value) {
                    el.remove_attribute(&name);
                }
            }

            Ok(())
        }),
    ];

    match rewrite_str(
        markup,
        RewriteStrSettings {
            element_content_handlers: handlers,
            document_content_handlers: vec![doc_comments!(|c| {
                c.remove();
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    ) {
        Ok(out) => Some(out),
        Err(err) => {
            tracing::debug!(error = %err, "inline svg could not be tokenized");
            None
        }
    }
}

const REPARSE_WRAPPER: &str = "callout-icon-root";

fn write_element(out: &mut String, node: roxmltree::Node<'_, '_>, root_size: Option<u32>) {
    let name = node.tag_name().name();
    let _ = write!(out, "<{name}");

    let mut wrote_width = false;
    let mut wrote_height = false;
    for attr in node.attributes() {
        let attr_name = attr.name();
        let value = match (root_size, attr_name) {
            (Some(size), "width") => {
                wrote_width = true;
                size.to_string()
            }
            (Some(size), "height") => {
                wrote_height = true;
                size.to_string()
            }
            _ => attr.value().to_string(),
        };
        let _ = write!(out, r#" {attr_name}="{}""#, escape_attribute(value.as_str()));
    }
    if let Some(size) = root_size {
        if !wrote_width {
            let _ = write!(out, r#" width="{size}""#);
        }
        if !wrote_height {
            let _ = write!(out, r#" height="{size}""#);
        }
    }
    out.push('>');

    for child in node.children() {
        if child.is_element() {
            write_element(out, child, None);
        } else if child.is_text() {
            out.push_str(&escape_text(child.text().unwrap_or_default()));
        }
    }

    let _ = write!(out, "</{name}>");
}

/// Sanitizes `markup` and returns it as a single `<svg>` element sized `size`×`size`.
///
/// Fails closed: if the sanitized output does not start with an `<svg>` element (or is not
/// well-formed enough to reparse), `None` is returned rather than partially cleaned markup. Only
/// the first top-level node is kept.
pub fn create_safe_svg(markup: &str, size: u32) -> Option<String> {
    let sanitized = sanitize_svg_markup(markup)?;
    let wrapped = format!("<{REPARSE_WRAPPER}>{sanitized}</{REPARSE_WRAPPER}>");

    let doc = match roxmltree::Document::parse(&wrapped) {
        Ok(doc) => doc,
        Err(err) => {
            tracing::debug!(error = %err, "sanitized svg is not well-formed");
            return None;
        }
    };

    let first = doc.root_element().first_child()?;
    if !first.is_element() || first.tag_name().name() != "svg" {
        tracing::debug!("sanitized svg has no root <svg> element");
        return None;
    }

    let mut out = String::with_capacity(sanitized.len() + 32);
    write_element(&mut out, first, Some(size));
    Some(out)
}
