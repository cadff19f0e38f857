//! The controller contract.

use minos_core::{BoxFuture, Flow, MinosError, MinosResult};
use minos_router::Action;

use crate::context::ActionContext;
use crate::filters::BeforeFilters;

/// Outcome of a controller action.
pub type ActionResult = MinosResult<Flow>;

fn fall_through<'a>() -> BoxFuture<'a, ActionResult> {
    Box::pin(async { Ok(Flow::Next) })
}

/// A REST controller bound to the routes derived from its source path.
///
/// Every action defaults to [`Flow::Next`], handing the request to the next
/// matching route. Errors returned from an action, from a filter or from a
/// timeout are passed to [`handle_error`](Self::handle_error).
///
/// # Example
///
/// ```
/// use minos_controller::{ActionContext, ActionResult, BeforeFilters, Controller};
/// use minos_core::{BoxFuture, Flow};
/// use minos_router::Action;
/// use serde_json::json;
///
/// struct Users;
///
/// impl Controller for Users {
///     fn before_filters(&self) -> BeforeFilters {
///         BeforeFilters::new().only("require_login", [Action::Create])
///     }
///
///     fn index<'a>(&'a self, ctx: &'a mut ActionContext) -> BoxFuture<'a, ActionResult> {
///         Box::pin(async move {
///             ctx.render("users/index", json!({ "title": "Users" }))?;
///             Ok(Flow::Handled)
///         })
///     }
/// }
/// ```
pub trait Controller: Send + Sync + 'static {
    /// Filters to run before actions.
    fn before_filters(&self) -> BeforeFilters {
        BeforeFilters::new()
    }

    /// `GET /resource`
    fn index<'a>(&'a self, _ctx: &'a mut ActionContext) -> BoxFuture<'a, ActionResult> {
        fall_through()
    }

    /// `GET /resource/new`
    #[allow(clippy::new_ret_no_self)]
    fn new<'a>(&'a self, _ctx: &'a mut ActionContext) -> BoxFuture<'a, ActionResult> {
        fall_through()
    }

    /// `POST /resource`
    fn create<'a>(&'a self, _ctx: &'a mut ActionContext) -> BoxFuture<'a, ActionResult> {
        fall_through()
    }

    /// `GET /resource/:resourceId`
    fn show<'a>(&'a self, _ctx: &'a mut ActionContext) -> BoxFuture<'a, ActionResult> {
        fall_through()
    }

    /// `GET /resource/:resourceId/edit`
    fn edit<'a>(&'a self, _ctx: &'a mut ActionContext) -> BoxFuture<'a, ActionResult> {
        fall_through()
    }

    /// `PUT /resource/:resourceId`
    fn update<'a>(&'a self, _ctx: &'a mut ActionContext) -> BoxFuture<'a, ActionResult> {
        fall_through()
    }

    /// `DELETE /resource/:resourceId`
    fn destroy<'a>(&'a self, _ctx: &'a mut ActionContext) -> BoxFuture<'a, ActionResult> {
        fall_through()
    }

    /// Reports a failed request to the client.
    ///
    /// The default renders the standard error response, see
    /// [`ActionContext::handle_error`].
    fn handle_error<'a>(
        &'a self,
        ctx: &'a mut ActionContext,
        error: MinosError,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move { ctx.handle_error(&error) })
    }
}

/// Runs `action` on `controller`.
pub fn invoke_action<'a>(
    controller: &'a dyn Controller,
    action: Action,
    ctx: &'a mut ActionContext,
) -> BoxFuture<'a, ActionResult> {
    match action {
        Action::Index => controller.index(ctx),
        Action::New => controller.new(ctx),
        Action::Create => controller.create(ctx),
        Action::Show => controller.show(ctx),
        Action::Edit => controller.edit(ctx),
        Action::Update => controller.update(ctx),
        Action::Destroy => controller.destroy(ctx),
    }
}
