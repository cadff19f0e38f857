//! Fixtures shared by this crate's unit tests.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use http::{Method, Uri};
use minos_config::Config;
use minos_core::{Environment, Request};
use minos_view::MiniJinjaEngine;
use tempfile::TempDir;

use crate::context::ActionContext;
use crate::services::ControllerServices;

pub(crate) struct TestTemplates;

impl TestTemplates {
    pub(crate) fn write(root: &Path, name: &str, source: &str) {
        let path = root.join(format!("{name}.html"));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, source).unwrap();
    }

    pub(crate) fn install(root: &Path) {
        Self::write(root, "layouts/application", "<main>{{ content }}</main>");
        Self::write(root, "layouts/error", "<error>{{ content }}</error>");
        Self::write(
            root,
            "error",
            "{{ userError }}{% if error %} [{{ error }}]{% endif %}",
        );
        Self::write(root, "users/index", "{{ title }}: {{ request.method }}");
    }
}

pub(crate) fn services(environment: &str, root: &Path) -> Arc<ControllerServices> {
    let engine = MiniJinjaEngine::new(root).with_reload(true);
    Arc::new(ControllerServices::new(
        Config::new(),
        Environment::new(environment),
        Arc::new(engine),
    ))
}

pub(crate) fn context_for(request: Request, environment: &str) -> (ActionContext, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    TestTemplates::install(dir.path());
    let ctx = ActionContext::new(request, services(environment, dir.path()));
    (ctx, dir)
}

pub(crate) fn test_context_with(url: &str, environment: &str) -> (ActionContext, TempDir) {
    let uri: Uri = url.parse().unwrap();
    context_for(Request::new(Method::GET, uri), environment)
}

pub(crate) fn test_context(url: &str) -> (ActionContext, TempDir) {
    test_context_with(url, "test")
}
