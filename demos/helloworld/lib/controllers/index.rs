//! `/`: the landing page.

use minos::prelude::*;
use serde_json::json;

/// The landing page.
#[derive(Default)]
pub struct Home;

impl Controller for Home {
    fn index<'a>(&'a self, ctx: &'a mut ActionContext) -> BoxFuture<'a, ActionResult> {
        Box::pin(async move {
            ctx.render("index/index", json!({ "title": "Home" }))?;
            Ok(Flow::Handled)
        })
    }
}
