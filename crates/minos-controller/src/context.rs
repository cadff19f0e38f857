//! Per-request state handed to controller actions.

use std::fmt;
use std::sync::Arc;

use minos_config::Config;
use minos_core::{Environment, Request, RequestContext, Response};

use crate::services::ControllerServices;

/// The request, its response and the shared services for one action call.
///
/// Actions write to the response through [`response_mut`](Self::response_mut)
/// or through the render helpers.
pub struct ActionContext {
    request: Request,
    response: Response,
    services: Arc<ControllerServices>,
}

impl ActionContext {
    /// Creates a context with an empty response.
    pub fn new(request: Request, services: Arc<ControllerServices>) -> Self {
        Self::with_response(request, Response::new(), services)
    }

    /// Creates a context around an existing response.
    pub fn with_response(
        request: Request,
        response: Response,
        services: Arc<ControllerServices>,
    ) -> Self {
        Self {
            request,
            response,
            services,
        }
    }

    /// The request.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// The request, mutably.
    pub fn request_mut(&mut self) -> &mut Request {
        &mut self.request
    }

    /// The response being built.
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// The response being built, mutably.
    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }

    /// Request and response together, for code that needs both mutably.
    pub fn parts_mut(&mut self) -> (&mut Request, &mut Response) {
        (&mut self.request, &mut self.response)
    }

    /// Route parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.request.param(name)
    }

    /// Dispatch metadata, when set.
    pub fn context(&self) -> Option<&RequestContext> {
        self.request.context()
    }

    /// Shared services.
    pub fn services(&self) -> &Arc<ControllerServices> {
        &self.services
    }

    /// Application configuration.
    pub fn config(&self) -> &Config {
        self.services.config()
    }

    /// Process environment.
    pub fn environment(&self) -> &Environment {
        self.services.environment()
    }

    /// Splits into request and response.
    pub fn into_parts(self) -> (Request, Response) {
        (self.request, self.response)
    }

    /// Consumes the context, keeping the response.
    pub fn into_response(self) -> Response {
        self.response
    }

    pub(crate) fn log_ids(&self) -> (&str, &str) {
        self.request.context().map_or(("-", "-"), |context| {
            (context.request_token(), context.browser_id())
        })
    }
}

impl fmt::Debug for ActionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionContext")
            .field("method", self.request.method())
            .field("url", &self.request.url())
            .field("status", &self.response.status())
            .finish_non_exhaustive()
    }
}
