//! Height-based collapse/expand state machine for a callout's content region.
//!
//! The animator never talks to a DOM directly. It drives a [`ContentSurface`], which maps each
//! call onto whatever the host UI offers (`el.style.height`, `void el.offsetHeight`,
//! `transitionend`, ...). The logical `collapsed` flag flips as soon as [`CollapseAnimator::toggle`]
//! runs; the visual state catches up when the surface reports the end of the transition.

use callouts_core::ResolvedCallout;
use serde::Serialize;

/// Identifies one triggered transition. A completion signal is only honoured for the ticket that
/// is currently pending; older tickets are stale and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TransitionTicket(u64);

impl TransitionTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// The content element as seen by the animator.
///
/// Implementations are handles: the animator takes one on [`CollapseAnimator::attach`] and hands
/// it back on [`CollapseAnimator::detach`]. While attached, nothing else may write the element's
/// height, display or overflow.
pub trait ContentSurface {
    /// Natural height of the content (`scrollHeight`).
    fn scroll_height(&self) -> f64;
    /// Height currently on screen, including a transition in flight (`offsetHeight`).
    fn rendered_height(&self) -> f64;
    /// Forces a synchronous layout so the previous height write becomes the transition's start
    /// value instead of being coalesced with the next write.
    fn commit_layout(&mut self);
    /// `None` clears the explicit height.
    fn set_height(&mut self, height: Option<f64>);
    fn set_overflow_clipped(&mut self);
    /// `display: none` on/off.
    fn set_hidden(&mut self, hidden: bool);
    fn listen_transition_end(&mut self, ticket: TransitionTicket);
    fn unlisten_transition_end(&mut self, ticket: TransitionTicket);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CollapseState {
    Open,
    Closed,
    OpeningTransition,
    ClosingTransition,
}

impl CollapseState {
    pub fn initial(initially_collapsed: bool) -> Self {
        if initially_collapsed {
            Self::Closed
        } else {
            Self::Open
        }
    }

    /// Logical state: a closing transition already counts as collapsed.
    pub fn is_collapsed(self) -> bool {
        matches!(self, Self::Closed | Self::ClosingTransition)
    }

    pub fn is_transitioning(self) -> bool {
        matches!(self, Self::OpeningTransition | Self::ClosingTransition)
    }

    fn settled(self) -> Self {
        if self.is_collapsed() {
            Self::Closed
        } else {
            Self::Open
        }
    }
}

#[derive(Debug)]
pub struct CollapseAnimator<S: ContentSurface> {
    collapsible: bool,
    state: CollapseState,
    surface: Option<S>,
    pending: Option<TransitionTicket>,
    next_ticket: u64,
}

impl<S: ContentSurface> CollapseAnimator<S> {
    pub fn new(collapsible: bool, initially_collapsed: bool) -> Self {
        Self {
            collapsible,
            state: CollapseState::initial(collapsible && initially_collapsed),
            surface: None,
            pending: None,
            next_ticket: 0,
        }
    }

    pub fn for_callout(resolved: &ResolvedCallout) -> Self {
        Self::new(resolved.is_collapsible, resolved.initially_collapsed)
    }

    pub fn state(&self) -> CollapseState {
        self.state
    }

    pub fn is_collapsible(&self) -> bool {
        self.collapsible
    }

    pub fn is_collapsed(&self) -> bool {
        self.state.is_collapsed()
    }

    pub fn is_transitioning(&self) -> bool {
        self.state.is_transitioning()
    }

    pub fn pending_ticket(&self) -> Option<TransitionTicket> {
        self.pending
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Binds the content element and lays it out for the current state without animating.
    ///
    /// A previously attached surface is detached first and dropped.
    pub fn attach(&mut self, mut surface: S) {
        let _ = self.detach();

        surface.set_overflow_clipped();
        if self.state.is_collapsed() {
            surface.set_height(Some(0.0));
            surface.set_hidden(true);
        } else {
            let natural = surface.scroll_height();
            surface.set_height(Some(natural));
        }
        tracing::trace!(state = ?self.state, "callout content attached");
        self.surface = Some(surface);
    }

    /// Releases the content element. Any pending completion listener is removed, and an
    /// in-flight transition is settled logically.
    pub fn detach(&mut self) -> Option<S> {
        let mut surface = self.surface.take()?;
        if let Some(ticket) = self.pending.take() {
            surface.unlisten_transition_end(ticket);
        }
        self.state = self.state.settled();
        tracing::trace!(state = ?self.state, "callout content detached");
        Some(surface)
    }

    pub fn toggle(&mut self) {
        if !self.collapsible {
            return;
        }

        let Some(surface) = self.surface.as_mut() else {
            // Nothing to animate yet; `attach` lays out whatever state we end up in.
            self.state = if self.state.is_collapsed() {
                CollapseState::Open
            } else {
                CollapseState::Closed
            };
            tracing::trace!(state = ?self.state, "callout toggled before attach");
            return;
        };

        // Interrupting a transition: start from what is on screen right now.
        let in_flight_height = self
            .state
            .is_transitioning()
            .then(|| surface.rendered_height());
        if let Some(stale) = self.pending.take() {
            surface.unlisten_transition_end(stale);
        }

        let (from, to, next) = if self.state.is_collapsed() {
            surface.set_hidden(false);
            let from = in_flight_height.unwrap_or(0.0);
            surface.set_height(Some(from));
            surface.commit_layout();
            let to = surface.scroll_height();
            surface.set_height(Some(to));
            (from, to, CollapseState::OpeningTransition)
        } else {
            let from = in_flight_height.unwrap_or_else(|| surface.scroll_height());
            surface.set_height(Some(from));
            surface.commit_layout();
            surface.set_height(Some(0.0));
            (from, 0.0, CollapseState::ClosingTransition)
        };
        self.state = next;
        tracing::trace!(state = ?self.state, from, to, "callout transition started");

        if from == to {
            // No height change means no transition runs, so no completion signal will come.
            self.finish();
            return;
        }

        let ticket = TransitionTicket(self.next_ticket);
        self.next_ticket += 1;
        surface.listen_transition_end(ticket);
        self.pending = Some(ticket);
    }

    /// Feeds a transition-completion signal. Returns `false` if the ticket is stale (or nothing is
    /// pending), in which case nothing changes.
    pub fn on_transition_end(&mut self, ticket: TransitionTicket) -> bool {
        if self.pending != Some(ticket) {
            tracing::trace!(ticket = ticket.id(), "stale callout transition end ignored");
            return false;
        }
        self.pending = None;
        if let Some(surface) = self.surface.as_mut() {
            surface.unlisten_transition_end(ticket);
        }
        self.finish();
        true
    }

    fn finish(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            self.state = self.state.settled();
            return;
        };
        match self.state {
            CollapseState::ClosingTransition => {
                surface.set_hidden(true);
                self.state = CollapseState::Closed;
            }
            CollapseState::OpeningTransition => {
                surface.set_height(None);
                self.state = CollapseState::Open;
            }
            CollapseState::Open | CollapseState::Closed => {}
        }
        tracing::trace!(state = ?self.state, "callout transition finished");
    }
}

impl<S: ContentSurface> Drop for CollapseAnimator<S> {
    fn drop(&mut self) {
        if let (Some(surface), Some(ticket)) = (self.surface.as_mut(), self.pending.take()) {
            surface.unlisten_transition_end(ticket);
        }
    }
}

/// One style mutation recorded by [`HeadlessSurface`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleWrite {
    Height(Option<f64>),
    Hidden(bool),
    OverflowClipped,
    Commit,
}

/// In-memory [`ContentSurface`] with a fixed natural height.
///
/// Records every write, and lets the caller play the role of the transition engine:
/// [`HeadlessSurface::fire_transition_end`] delivers (and consumes) the registered listener, and
/// `animated_height` can be set to simulate a transition caught halfway.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlessSurface {
    pub natural_height: f64,
    pub height: Option<f64>,
    pub hidden: bool,
    pub overflow_clipped: bool,
    pub animated_height: Option<f64>,
    pub listeners: Vec<TransitionTicket>,
    pub writes: Vec<StyleWrite>,
}

impl HeadlessSurface {
    pub fn new(natural_height: f64) -> Self {
        Self {
            natural_height,
            ..Default::default()
        }
    }

    /// Listener registered for the transition currently running, if any.
    pub fn fire_transition_end(&mut self) -> Option<TransitionTicket> {
        self.animated_height = None;
        if self.listeners.is_empty() {
            return None;
        }
        Some(self.listeners.remove(0))
    }
}

impl ContentSurface for HeadlessSurface {
    fn scroll_height(&self) -> f64 {
        self.natural_height
    }

    fn rendered_height(&self) -> f64 {
        if self.hidden {
            return 0.0;
        }
        self.animated_height
            .or(self.height)
            .unwrap_or(self.natural_height)
    }

    fn commit_layout(&mut self) {
        self.writes.push(StyleWrite::Commit);
    }

    fn set_height(&mut self, height: Option<f64>) {
        self.height = height;
        self.writes.push(StyleWrite::Height(height));
    }

    fn set_overflow_clipped(&mut self) {
        self.overflow_clipped = true;
        self.writes.push(StyleWrite::OverflowClipped);
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
        self.writes.push(StyleWrite::Hidden(hidden));
    }

    fn listen_transition_end(&mut self, ticket: TransitionTicket) {
        self.listeners.push(ticket);
    }

    fn unlisten_transition_end(&mut self, ticket: TransitionTicket) {
        self.listeners.retain(|t| *t != ticket);
    }
}
