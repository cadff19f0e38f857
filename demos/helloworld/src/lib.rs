//! A minimal Minos application.
//!
//! Controllers, filters and template mixins live under `lib/`, where the
//! application discovers them; this crate compiles the same files and
//! registers them by name.

use std::path::Path;
use std::sync::Arc;

use minos::prelude::*;
use tokio::sync::RwLock;

#[path = "../lib/controllers"]
pub mod controllers {
    pub mod error;
    pub mod index;
    pub mod users;
}

#[path = "../lib/filters"]
pub mod filters {
    pub mod logged_in;
}

#[path = "../lib/template_mixins"]
pub mod template_mixins {
    pub mod app_name;
}

use controllers::error::NotFound;
use controllers::index::Home;
use controllers::users::{User, UserStore, Users};

/// Controllers keyed by their path below `lib/controllers`.
pub fn controller_catalog(store: UserStore) -> ControllerCatalog {
    ControllerCatalog::new()
        .register::<Home>("index")
        .register::<NotFound>("error")
        .register_factory("users", move || Ok(Users::new(Arc::clone(&store))))
}

/// Filters keyed by file name.
pub fn filter_catalog() -> FilterCatalog {
    FilterCatalog::new().register("logged_in", filters::logged_in::LoggedIn)
}

/// Template mixins keyed by file name.
pub fn mixin_catalog() -> MixinCatalog {
    MixinCatalog::new().register("app_name", template_mixins::app_name::app_name)
}

/// Seed data for the user list.
pub fn seed_users() -> UserStore {
    Arc::new(RwLock::new(vec![User {
        id: 1,
        name: "Ada".to_string(),
        created_by: None,
    }]))
}

/// The application rooted at `base_path`, with every registration in place.
pub fn app(base_path: impl AsRef<Path>, options: AppOptions) -> App {
    let options = AppOptions {
        base_path: base_path.as_ref().to_path_buf(),
        ..options
    };

    App::new(options)
        .controllers(controller_catalog(seed_users()))
        .filters(filter_catalog())
        .mixins(mixin_catalog())
}
