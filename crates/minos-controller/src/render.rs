//! Template rendering for actions.

use std::time::Instant;

use minos_core::{MinosError, MinosResult};
use serde_json::{json, Map, Value};

use crate::context::ActionContext;
use crate::events::ControllerEvent;

/// Layout wrapped around rendered templates unless the values pick another.
pub const DEFAULT_LAYOUT: &str = "layouts/application";

impl ActionContext {
    /// Renders `template` and sends the result.
    ///
    /// `values` must be a JSON object (or null); its keys override the
    /// defaults: `layout`, `title`, `stylesheets`, `flash`, `config`,
    /// `request` and `context`. Template mixins are bound afterwards, and the
    /// final values are copied into the response locals.
    ///
    /// # Errors
    ///
    /// When rendering fails the error response has already been produced and
    /// [`MinosError::RenderHandled`] is returned, which the controller error
    /// handler ignores.
    pub fn render(&mut self, template: &str, values: Value) -> MinosResult<String> {
        self.render_with(template, values, true)
    }

    /// Renders `template` without sending it.
    ///
    /// # Errors
    ///
    /// Same as [`render`](Self::render).
    pub fn render_to_string(&mut self, template: &str, values: Value) -> MinosResult<String> {
        self.render_with(template, values, false)
    }

    fn render_with(&mut self, template: &str, values: Value, send: bool) -> MinosResult<String> {
        let start = Instant::now();

        let rendered = self.template_values(template, values).and_then(|merged| {
            self.response_mut().locals_mut().extend(merged.clone());
            self.services()
                .views()
                .render(template, &Value::Object(merged))
                .map_err(MinosError::from)
        });

        self.log_done();

        let outcome = match rendered {
            Ok(html) => {
                if send {
                    self.response_mut().send(html.clone());
                }
                Ok(html)
            }
            Err(error) => Err(self.handle_render_error(template, error)),
        };

        self.finish(template, start);
        outcome
    }

    fn template_values(&self, template: &str, values: Value) -> MinosResult<Map<String, Value>> {
        let request = self.request();
        let params: Map<String, Value> = request
            .params()
            .iter()
            .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
            .collect();

        let mut merged = Map::new();
        merged.insert("layout".into(), json!(DEFAULT_LAYOUT));
        merged.insert("title".into(), json!(""));
        merged.insert("stylesheets".into(), json!([]));
        merged.insert("flash".into(), json!({}));
        merged.insert("config".into(), self.config().all());
        merged.insert(
            "request".into(),
            json!({
                "method": request.method().as_str(),
                "url": request.url(),
                "params": params,
            }),
        );
        merged.insert(
            "context".into(),
            serde_json::to_value(request.context()).unwrap_or(Value::Null),
        );

        match values {
            Value::Object(values) => merged.extend(values),
            Value::Null => {}
            other => {
                return Err(MinosError::render(
                    template,
                    format!("template values must be an object, got {other}"),
                ))
            }
        }

        self.services().mixins().bind_all(&mut merged);
        Ok(merged)
    }

    fn log_done(&self) {
        let request = self.request();
        let (token, browser) = self.log_ids();

        tracing::debug!(
            request_token = token,
            browser_id = browser,
            "{} {} DONE",
            request.method(),
            request.url()
        );

        if let Some(context) = request.context() {
            tracing::info!(
                request_token = token,
                browser_id = browser,
                controller = context.controller_name(),
                action = context.action(),
                "Request for {}#{} done in {} ms",
                context.controller_name(),
                context.action(),
                context.elapsed().as_millis()
            );
        }
    }

    fn finish(&self, template: &str, render_start: Instant) {
        let events = self.services().events();

        events.emit(ControllerEvent::RenderFinished {
            template: template.to_string(),
            elapsed: render_start.elapsed(),
        });

        let context = self.request().context().cloned();
        let elapsed = context
            .as_ref()
            .map_or_else(|| render_start.elapsed(), |context| context.elapsed());

        events.emit(ControllerEvent::RequestFinished {
            method: self.request().method().clone(),
            elapsed,
            context,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_context, test_context_with};
    use minos_view::MixinCatalog;
    use std::fs;

    #[test]
    fn test_render_sends_with_layout_and_defaults() {
        let (mut ctx, _dir) = test_context("/users?page=2");

        let html = ctx
            .render("users/index", json!({ "title": "Users" }))
            .unwrap();

        assert_eq!(html, "<main>Users: GET</main>");
        assert_eq!(ctx.response().locals()["request"]["url"], json!("/users?page=2"));
        assert!(ctx.response().is_sent());
        assert_eq!(ctx.response().body().unwrap().as_ref(), html.as_bytes());
    }

    #[test]
    fn test_render_to_string_does_not_send() {
        let (mut ctx, _dir) = test_context("/users");

        let html = ctx
            .render_to_string("users/index", json!({ "layout": null }))
            .unwrap();

        assert_eq!(html, ": GET");
        assert!(!ctx.response().is_sent());
    }

    #[test]
    fn test_values_are_copied_to_locals() {
        let (mut ctx, _dir) = test_context("/users");

        ctx.render("users/index", json!({ "title": "Users", "extra": 1 }))
            .unwrap();

        let locals = ctx.response().locals();
        assert_eq!(locals["title"], json!("Users"));
        assert_eq!(locals["extra"], json!(1));
        assert_eq!(locals["layout"], json!(DEFAULT_LAYOUT));
        assert_eq!(locals["stylesheets"], json!([]));
        assert_eq!(locals["flash"], json!({}));
        assert_eq!(locals["request"]["method"], json!("GET"));
    }

    #[test]
    fn test_mixins_are_bound() {
        let (mut ctx, dir) = test_context("/users");
        fs::write(dir.path().join("shout.rs"), "").unwrap();

        let catalog = MixinCatalog::new().register("shout", |values: &Map<String, Value>| {
            let title = values.get("title").and_then(Value::as_str).unwrap_or("");
            Value::String(title.to_uppercase())
        });
        ctx.services().mixins().load(dir.path(), &catalog).unwrap();

        ctx.render("users/index", json!({ "title": "users" })).unwrap();
        assert_eq!(ctx.response().locals()["shout"], json!("USERS"));
    }

    #[tokio::test]
    async fn test_render_emits_events() {
        let (mut ctx, _dir) = test_context("/users");
        let mut events = ctx.services().events().subscribe();

        ctx.render("users/index", json!({})).unwrap();

        let first = events.recv().await.unwrap();
        assert!(matches!(
            first,
            ControllerEvent::RenderFinished { ref template, .. } if template == "users/index"
        ));
        let second = events.recv().await.unwrap();
        assert!(matches!(second, ControllerEvent::RequestFinished { .. }));
    }

    #[test]
    fn test_failed_render_produces_error_page() {
        let (mut ctx, _dir) = test_context("/users");

        let err = ctx.render("missing", json!({})).unwrap_err();

        assert!(err.is_render_handled());
        assert_eq!(ctx.response().status(), http::StatusCode::INTERNAL_SERVER_ERROR);
        let body = String::from_utf8(ctx.response().body().unwrap().to_vec()).unwrap();
        assert!(body.starts_with("<error>An error occurred. Please try again. ("));
    }

    #[test]
    fn test_non_object_values_fail_render() {
        let (mut ctx, _dir) = test_context_with("/users", "production");

        let err = ctx.render("users/index", json!([1, 2])).unwrap_err();
        assert!(err.is_render_handled());
        assert_eq!(ctx.response().status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
