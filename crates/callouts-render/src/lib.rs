#![forbid(unsafe_code)]

//! HTML rendering and collapse/expand animation for callouts.
//!
//! Resolution lives in `callouts-core`; this crate turns a [`callouts_core::ResolvedCallout`] into
//! markup and drives the interactive open/closed behavior of the content region.

pub mod collapse;
pub mod component;
pub mod html;

pub use collapse::{
    CollapseAnimator, CollapseState, ContentSurface, HeadlessSurface, StyleWrite, TransitionTicket,
};
pub use component::{CHEVRON_ICON, QuoteCallout, render_callout};
pub use html::CalloutHtml;
