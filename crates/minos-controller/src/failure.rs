//! Error responses.
//!
//! Every failure on a request path ends in [`ActionContext::handle_error`]:
//! the full error is logged under a fresh incident id, and the client gets a
//! generic message carrying that id. XHR requests receive JSON, everything
//! else the `error` template. The raw error is only shown in development.

use http::StatusCode;
use minos_core::{identifier, MinosError};
use serde_json::{json, Value};

use crate::context::ActionContext;

/// Message shown to users instead of the raw error.
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

/// Template rendered for failed non-XHR requests.
pub const ERROR_TEMPLATE: &str = "error";

/// Layout of the error template.
pub const ERROR_LAYOUT: &str = "layouts/error";

impl ActionContext {
    /// Log line text for `error` under `incident`.
    pub fn full_error(&self, error: &MinosError, incident: &str) -> String {
        format!("Incident {incident} - {error:?}")
    }

    /// Client-facing text for `incident`.
    pub fn user_error(&self, incident: &str) -> String {
        format!("{DEFAULT_ERROR_MESSAGE} ({incident})")
    }

    /// Logs `error` and produces the standard error response.
    ///
    /// [`MinosError::RenderHandled`] is ignored; its response already exists.
    pub fn handle_error(&mut self, error: &MinosError) {
        if error.is_render_handled() {
            return;
        }

        let incident = identifier::generate_default();
        let (token, browser) = self.log_ids();
        tracing::error!(
            incident = %incident,
            request_token = token,
            browser_id = browser,
            "{}",
            self.full_error(error, &incident)
        );

        if self.request().is_xhr() {
            self.handle_xhr_error(error, &incident);
        } else {
            self.handle_normal_error(error, &incident);
        }
    }

    fn handle_xhr_error(&mut self, error: &MinosError, incident: &str) {
        let mut payload = json!({
            "incident": incident,
            "message": self.user_error(incident),
        });
        if self.environment().is_development() {
            payload["detail"] = Value::String(error.to_string());
        }

        let response = self.response_mut();
        response.set_status(StatusCode::INTERNAL_SERVER_ERROR);
        if let Err(e) = response.send_json(&json!({ "success": false, "error": payload })) {
            tracing::warn!(error = %e, "could not encode error response");
            response.send_text(DEFAULT_ERROR_MESSAGE);
        }
    }

    fn handle_normal_error(&mut self, error: &MinosError, incident: &str) {
        let detail = if self.environment().is_development() {
            Value::String(error.to_string())
        } else {
            Value::Null
        };
        let values = json!({
            "userError": self.user_error(incident),
            "error": detail,
            "layout": ERROR_LAYOUT,
        });

        self.response_mut()
            .set_status(StatusCode::INTERNAL_SERVER_ERROR);

        // failures are reported by render itself
        let _ = self.render(ERROR_TEMPLATE, values);
    }

    /// Handles a render failure and returns the marker error for the caller.
    ///
    /// A failure while rendering the error template falls back to plain text
    /// instead of rendering again.
    pub(crate) fn handle_render_error(&mut self, template: &str, error: MinosError) -> MinosError {
        if template == ERROR_TEMPLATE {
            let incident = identifier::generate_default();
            let (token, browser) = self.log_ids();
            tracing::error!(
                incident = %incident,
                request_token = token,
                browser_id = browser,
                "Could not render error page. {}",
                self.full_error(&error, &incident)
            );

            let user_error = self.user_error(&incident);
            self.response_mut().send_text(user_error);
        } else {
            self.handle_error(&error);
        }

        MinosError::RenderHandled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context_for, test_context, test_context_with, TestTemplates};
    use http::{Method, Uri};
    use minos_core::Request;

    fn body(ctx: &ActionContext) -> String {
        String::from_utf8(ctx.response().body().unwrap().to_vec()).unwrap()
    }

    #[test]
    fn test_normal_error_renders_error_page() {
        let (mut ctx, _dir) = test_context_with("/users", "production");

        ctx.handle_error(&MinosError::action("database unavailable"));

        assert_eq!(ctx.response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body(&ctx);
        assert!(body.starts_with("<error>An error occurred. Please try again. ("));
        assert!(!body.contains("database unavailable"));
        assert_eq!(ctx.response().locals()["layout"], json!(ERROR_LAYOUT));
        assert_eq!(ctx.response().locals()["error"], Value::Null);
    }

    #[test]
    fn test_development_shows_raw_error() {
        let (mut ctx, _dir) = test_context_with("/users", "development");

        ctx.handle_error(&MinosError::action("database unavailable"));

        assert!(body(&ctx).contains("[database unavailable]"));
    }

    #[test]
    fn test_xhr_error_is_json() {
        let request = Request::new(Method::GET, Uri::from_static("/users"))
            .with_header("x-requested-with", "XMLHttpRequest");
        let (mut ctx, _dir) = context_for(request, "production");

        ctx.handle_error(&MinosError::action("boom"));

        assert_eq!(ctx.response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        let payload: Value = serde_json::from_str(&body(&ctx)).unwrap();
        assert_eq!(payload["success"], json!(false));
        let incident = payload["error"]["incident"].as_str().unwrap();
        assert_eq!(incident.len(), identifier::DEFAULT_LENGTH);
        assert_eq!(
            payload["error"]["message"],
            json!(format!("{DEFAULT_ERROR_MESSAGE} ({incident})"))
        );
        assert!(payload["error"].get("detail").is_none());
    }

    #[test]
    fn test_render_handled_is_ignored() {
        let (mut ctx, _dir) = test_context("/users");

        ctx.handle_error(&MinosError::RenderHandled);

        assert!(!ctx.response().is_sent());
        assert_eq!(ctx.response().status(), StatusCode::OK);
    }

    #[test]
    fn test_broken_error_template_falls_back_to_text() {
        let (mut ctx, dir) = test_context("/users");
        TestTemplates::write(dir.path(), "error", "{% if %}");

        ctx.handle_error(&MinosError::action("boom"));

        assert_eq!(ctx.response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body(&ctx);
        assert!(body.starts_with(DEFAULT_ERROR_MESSAGE));
        assert!(!body.contains("<error>"));
    }
}
