use callouts_core::{ContentNode, ResolvedCallout};
use htmlize::{escape_attribute, escape_text};
use std::fmt::Write as _;

/// Inputs for one callout's markup. Icon and chevron markup must already be safe to inject.
#[derive(Debug, Clone, Copy)]
pub struct CalloutHtml<'a> {
    pub resolved: &'a ResolvedCallout,
    pub icon_html: Option<&'a str>,
    pub chevron_html: &'a str,
    pub collapsed: bool,
    pub children: &'a [ContentNode],
}

impl CalloutHtml<'_> {
    pub fn render(&self) -> String {
        let mut out = String::new();
        let r = self.resolved;
        let collapsible = r.is_collapsible;

        let mut class = String::from("callout");
        if collapsible {
            class.push_str(" is-collapsible");
            if self.collapsed {
                class.push_str(" is-collapsed");
            }
        }

        let _ = write!(
            out,
            r#"<div class="{class}" data-callout-type="{}" style="{}">"#,
            escape_attribute(r.display_type.as_str()),
            escape_attribute(r.background_style())
        );

        if collapsible {
            let _ = write!(
                out,
                r#"<div class="callout-title" role="button" tabindex="0" aria-expanded="{}">"#,
                !self.collapsed
            );
        } else {
            out.push_str(r#"<div class="callout-title">"#);
        }
        let _ = write!(
            out,
            r#"<div class="callout-icon">{}</div>"#,
            self.icon_html.unwrap_or_default()
        );
        let _ = write!(
            out,
            r#"<div class="callout-title-inner">{}</div>"#,
            escape_text(r.title.as_str())
        );
        if collapsible {
            let _ = write!(out, r#"<div class="callout-fold">{}</div>"#, self.chevron_html);
        }
        out.push_str("</div>");

        if !self.children.is_empty() {
            out.push_str(r#"<div class="callout-content">"#);
            for child in self.children {
                match child {
                    ContentNode::Text(text) => out.push_str(&escape_text(text.as_str())),
                    ContentNode::Html(html) => out.push_str(html),
                }
            }
            out.push_str("</div>");
        }

        out.push_str("</div>");
        out
    }
}
