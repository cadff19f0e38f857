//! Template engine contract and the MiniJinja implementation.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use minijinja::{AutoEscape, Environment, ErrorKind};
use serde_json::Value;

use crate::error::ViewError;

/// File extension appended to template names.
pub const TEMPLATE_EXTENSION: &str = "html";

/// Renders named templates with a JSON value set.
pub trait TemplateEngine: Send + Sync {
    /// Renders `name` with `values`.
    ///
    /// # Errors
    ///
    /// Fails when the template is missing or the engine rejects it.
    fn render(&self, name: &str, values: &Value) -> Result<String, ViewError>;
}

/// [`TemplateEngine`] backed by `minijinja`.
///
/// Templates are loaded from `<root>/<name>.html`. When the values carry a
/// string `layout`, the rendered body is passed to the layout template as
/// `content`.
///
/// # Example
///
/// ```no_run
/// use minos_view::{MiniJinjaEngine, TemplateEngine};
/// use serde_json::json;
///
/// let engine = MiniJinjaEngine::new("lib/views");
/// let html = engine.render("home", &json!({ "title": "Home", "layout": "layouts/application" }))?;
/// # Ok::<(), minos_view::ViewError>(())
/// ```
pub struct MiniJinjaEngine {
    root: PathBuf,
    reload: bool,
    cached: Environment<'static>,
}

impl MiniJinjaEngine {
    /// Creates an engine reading templates below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let cached = build_environment(root.clone());
        Self {
            root,
            reload: false,
            cached,
        }
    }

    /// Re-reads templates from disk on every render.
    #[must_use]
    pub fn with_reload(mut self, reload: bool) -> Self {
        self.reload = reload;
        self
    }

    /// Template root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn render_with(
        env: &Environment<'static>,
        name: &str,
        values: &Value,
    ) -> Result<String, ViewError> {
        validate_name(name)?;

        let mut context: BTreeMap<String, minijinja::Value> = match values {
            Value::Object(map) => map
                .iter()
                .map(|(key, value)| (key.clone(), minijinja::Value::from_serialize(value)))
                .collect(),
            Value::Null => BTreeMap::new(),
            other => {
                return Err(ViewError::render(
                    name,
                    format!("template values must be an object, got {other}"),
                ))
            }
        };

        let body = render_one(env, name, &context)?;

        let layout = match values.get("layout") {
            Some(Value::String(layout)) if !layout.is_empty() => layout.clone(),
            _ => return Ok(body),
        };

        validate_name(&layout)?;
        context.insert("content".to_string(), minijinja::Value::from_safe_string(body));
        render_one(env, &layout, &context)
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render(&self, name: &str, values: &Value) -> Result<String, ViewError> {
        if self.reload {
            let env = build_environment(self.root.clone());
            Self::render_with(&env, name, values)
        } else {
            Self::render_with(&self.cached, name, values)
        }
    }
}

impl std::fmt::Debug for MiniJinjaEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiniJinjaEngine")
            .field("root", &self.root)
            .field("reload", &self.reload)
            .finish_non_exhaustive()
    }
}

fn build_environment(root: PathBuf) -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env.set_loader(move |name| {
        let path = root.join(format!("{name}.{TEMPLATE_EXTENSION}"));
        match fs::read_to_string(&path) {
            Ok(source) => Ok(Some(source)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(minijinja::Error::new(
                ErrorKind::InvalidOperation,
                format!("could not read {}: {e}", path.display()),
            )),
        }
    });
    env
}

fn render_one(
    env: &Environment<'static>,
    name: &str,
    context: &BTreeMap<String, minijinja::Value>,
) -> Result<String, ViewError> {
    let template = env.get_template(name).map_err(|e| match e.kind() {
        ErrorKind::TemplateNotFound => ViewError::TemplateNotFound(name.to_string()),
        _ => ViewError::render(name, e.to_string()),
    })?;

    template
        .render(context)
        .map_err(|e| ViewError::render(name, e.to_string()))
}

fn validate_name(name: &str) -> Result<(), ViewError> {
    let escapes = Path::new(name)
        .components()
        .any(|c| !matches!(c, Component::Normal(_)));

    if name.is_empty() || escapes {
        return Err(ViewError::InvalidName(name.to_string()));
    }
    Ok(())
}
