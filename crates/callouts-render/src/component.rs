use crate::collapse::{CollapseAnimator, ContentSurface, HeadlessSurface, TransitionTicket};
use crate::html::CalloutHtml;
use callouts_core::{CalloutSettings, IconRegistry, ParsedCalloutNode, ResolvedCallout};

pub const CHEVRON_ICON: &str = "chevron-down";

/// One rendered callout occurrence: resolved settings, icon markup and collapse state.
///
/// Resolution runs once at construction; [`QuoteCallout::render_html`] can be called again after
/// every toggle so the chevron and `aria-expanded` follow the logical state immediately.
#[derive(Debug)]
pub struct QuoteCallout<S: ContentSurface = HeadlessSurface> {
    node: ParsedCalloutNode,
    resolved: ResolvedCallout,
    icon_html: Option<String>,
    chevron_html: String,
    animator: CollapseAnimator<S>,
}

impl<S: ContentSurface> QuoteCallout<S> {
    pub fn new(
        node: ParsedCalloutNode,
        settings: &CalloutSettings,
        registry: &dyn IconRegistry,
    ) -> Self {
        let resolved = settings.resolve(&node);
        let icon_html = resolved.icon_markup(registry);
        if icon_html.is_none() {
            tracing::debug!(
                callout_type = resolved.canonical_type.as_str(),
                "callout icon rejected by sanitizer"
            );
        }
        let chevron_html = registry.icon_html(CHEVRON_ICON);
        let animator = CollapseAnimator::for_callout(&resolved);

        Self {
            node,
            resolved,
            icon_html,
            chevron_html,
            animator,
        }
    }

    pub fn node(&self) -> &ParsedCalloutNode {
        &self.node
    }

    pub fn resolved(&self) -> &ResolvedCallout {
        &self.resolved
    }

    pub fn icon_html(&self) -> Option<&str> {
        self.icon_html.as_deref()
    }

    pub fn animator(&self) -> &CollapseAnimator<S> {
        &self.animator
    }

    pub fn is_collapsed(&self) -> bool {
        self.animator.is_collapsed()
    }

    /// Called once the content element exists. Callouts without children never get one.
    pub fn register_content(&mut self, surface: S) {
        if self.node.children.is_empty() {
            return;
        }
        self.animator.attach(surface);
    }

    pub fn toggle_collapse(&mut self) {
        self.animator.toggle();
    }

    pub fn on_transition_end(&mut self, ticket: TransitionTicket) -> bool {
        self.animator.on_transition_end(ticket)
    }

    pub fn unmount(&mut self) -> Option<S> {
        self.animator.detach()
    }

    pub fn render_html(&self) -> String {
        CalloutHtml {
            resolved: &self.resolved,
            icon_html: self.icon_html.as_deref(),
            chevron_html: &self.chevron_html,
            collapsed: self.animator.is_collapsed(),
            children: &self.node.children,
        }
        .render()
    }
}

/// Resolves and renders a node in one go, for static (non-interactive) output.
pub fn render_callout(
    node: ParsedCalloutNode,
    settings: &CalloutSettings,
    registry: &dyn IconRegistry,
) -> String {
    QuoteCallout::<HeadlessSurface>::new(node, settings, registry).render_html()
}
