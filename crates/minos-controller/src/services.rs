//! Shared collaborators available to every controller action.

use std::fmt;
use std::sync::Arc;

use minos_config::Config;
use minos_core::Environment;
use minos_view::{TemplateEngine, TemplateMixins};

use crate::events::EventBus;

/// Configuration, environment, views and events shared by all requests.
#[derive(Clone)]
pub struct ControllerServices {
    config: Config,
    environment: Environment,
    views: Arc<dyn TemplateEngine>,
    mixins: TemplateMixins,
    events: EventBus,
}

impl ControllerServices {
    /// Creates services with no mixins and a fresh event bus.
    pub fn new(config: Config, environment: Environment, views: Arc<dyn TemplateEngine>) -> Self {
        Self {
            config,
            environment,
            views,
            mixins: TemplateMixins::new(),
            events: EventBus::default(),
        }
    }

    /// Uses a shared mixin set.
    #[must_use]
    pub fn with_mixins(mut self, mixins: TemplateMixins) -> Self {
        self.mixins = mixins;
        self
    }

    /// Publishes on an existing bus.
    #[must_use]
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    /// Application configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Process environment.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Template engine.
    pub fn views(&self) -> &Arc<dyn TemplateEngine> {
        &self.views
    }

    /// Template mixins bound into every render.
    pub fn mixins(&self) -> &TemplateMixins {
        &self.mixins
    }

    /// Lifecycle event bus.
    pub fn events(&self) -> &EventBus {
        &self.events
    }
}

impl fmt::Debug for ControllerServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerServices")
            .field("environment", &self.environment)
            .field("mixins", &self.mixins)
            .finish_non_exhaustive()
    }
}
