//! Catch-all for requests no other controller handled.

use minos::prelude::*;
use serde_json::json;

/// Renders the not-found page.
#[derive(Default)]
pub struct NotFound;

impl Controller for NotFound {
    fn index<'a>(&'a self, ctx: &'a mut ActionContext) -> BoxFuture<'a, ActionResult> {
        Box::pin(async move {
            let page = ctx
                .context()
                .map(|c| c.page().to_string())
                .unwrap_or_default();

            ctx.response_mut().set_status(http::StatusCode::NOT_FOUND);
            ctx.render("not_found", json!({ "title": "Not found", "page": page }))?;
            Ok(Flow::Handled)
        })
    }
}
