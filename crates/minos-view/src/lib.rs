//! # Minos View
//!
//! Template rendering for Minos controllers.
//!
//! - [`TemplateEngine`] is the contract controllers render through
//! - [`MiniJinjaEngine`] renders `<root>/<name>.html` with optional layouts
//! - [`TemplateMixins`] contribute computed values to every render

#![doc(html_root_url = "https://docs.rs/minos-view/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod engine;
mod error;
mod mixin;

pub use engine::{MiniJinjaEngine, TemplateEngine, TEMPLATE_EXTENSION};
pub use error::ViewError;
pub use mixin::{MixinCatalog, TemplateMixin, TemplateMixins};
