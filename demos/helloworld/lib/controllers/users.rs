//! `/users`: an in-memory user list.
//!
//! Creating and deleting users goes through the `logged_in` filter.

use std::sync::Arc;

use minos::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::RwLock;

use crate::filters::logged_in::CurrentUser;

/// A stored user.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Numeric id, used in `/users/:userId`.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Who created the user, if it was created over HTTP.
    pub created_by: Option<String>,
}

#[derive(Deserialize)]
struct NewUser {
    name: String,
}

/// Users shared by every controller instance, so development reloads keep
/// their data.
pub type UserStore = Arc<RwLock<Vec<User>>>;

/// The `/users` resource.
pub struct Users {
    store: UserStore,
}

impl Users {
    /// A controller over `store`.
    pub fn new(store: UserStore) -> Self {
        Self { store }
    }

    async fn find(&self, id: Option<&str>) -> Option<User> {
        let id: u64 = id?.parse().ok()?;
        self.store.read().await.iter().find(|u| u.id == id).cloned()
    }
}

impl Controller for Users {
    fn before_filters(&self) -> BeforeFilters {
        BeforeFilters::new().only("logged_in", [Action::Create, Action::Destroy])
    }

    fn index<'a>(&'a self, ctx: &'a mut ActionContext) -> BoxFuture<'a, ActionResult> {
        Box::pin(async move {
            let users = self.store.read().await.clone();
            ctx.render("users/index", json!({ "title": "Users", "users": users }))?;
            Ok(Flow::Handled)
        })
    }

    fn show<'a>(&'a self, ctx: &'a mut ActionContext) -> BoxFuture<'a, ActionResult> {
        Box::pin(async move {
            let Some(user) = self.find(ctx.param("userId")).await else {
                return Ok(Flow::Next);
            };

            if ctx.request().is_xhr() {
                ctx.response_mut().send_json(&user)?;
            } else {
                ctx.render("users/show", json!({ "title": user.name, "user": user }))?;
            }
            Ok(Flow::Handled)
        })
    }

    fn create<'a>(&'a self, ctx: &'a mut ActionContext) -> BoxFuture<'a, ActionResult> {
        Box::pin(async move {
            let input: NewUser = ctx.request().json()?;
            if input.name.trim().is_empty() {
                return Err(MinosError::action("name must not be empty"));
            }
            let created_by = ctx
                .request()
                .extensions()
                .get::<CurrentUser>()
                .map(|u| u.0.clone());

            let user = {
                let mut users = self.store.write().await;
                let user = User {
                    id: users.iter().map(|u| u.id).max().unwrap_or(0) + 1,
                    name: input.name,
                    created_by,
                };
                users.push(user.clone());
                user
            };

            tracing::info!(id = user.id, "created user");
            let response = ctx.response_mut();
            response.set_status(http::StatusCode::CREATED);
            response.send_json(&user)?;
            Ok(Flow::Handled)
        })
    }

    fn destroy<'a>(&'a self, ctx: &'a mut ActionContext) -> BoxFuture<'a, ActionResult> {
        Box::pin(async move {
            let Some(user) = self.find(ctx.param("userId")).await else {
                return Ok(Flow::Next);
            };
            self.store.write().await.retain(|u| u.id != user.id);

            let response = ctx.response_mut();
            response.set_status(http::StatusCode::NO_CONTENT);
            response.send(Vec::new());
            Ok(Flow::Handled)
        })
    }

    fn handle_error<'a>(
        &'a self,
        ctx: &'a mut ActionContext,
        error: MinosError,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            if matches!(error, MinosError::FilterRejected { .. }) {
                let response = ctx.response_mut();
                response.set_status(http::StatusCode::UNAUTHORIZED);
                response.send_text("Log in first.");
                return;
            }
            ctx.handle_error(&error);
        })
    }
}
