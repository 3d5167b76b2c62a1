#![forbid(unsafe_code)]

//! Callout settings resolution and icon sanitizing (headless).
//!
//! A callout occurrence arrives as a [`ParsedCalloutNode`] produced by an external markdown/BBCode
//! parser. [`CalloutSettings::resolve`] maps its raw type token through the configured aliases and
//! fallback chains into a [`ResolvedCallout`]; [`icons::render_icon`] turns the resolved icon source
//! into markup that is safe to inject.
//!
//! Everything here is pure and side-effect free (apart from `tracing` events), so a single
//! [`CalloutSettings`] can be shared freely across threads.

pub mod alias;
pub mod color;
pub mod config;
pub mod error;
pub mod icons;
pub mod node;
pub mod resolve;
pub mod sanitize;
pub mod utils;

pub use alias::{AliasIndex, CalloutEntry, find_callout_setting};
pub use config::{CalloutDefaults, CalloutDefinition, CalloutSettings};
pub use error::{Error, Result};
pub use icons::{IconRegistry, IconSource, SpriteIconRegistry, render_icon};
pub use node::{ContentNode, ParsedCalloutNode};
pub use resolve::{ResolvedCallout, compute};
