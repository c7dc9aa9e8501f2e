use anyhow::Context;
use std::sync::Arc;

use crate::module::{Endpoint, InitCtx, Module};

/// Module registry managing module lifecycle in registration order
pub struct ModuleRegistry {
    modules: Vec<Arc<dyn Module>>,
}

impl ModuleRegistry {
    /// Create a new module registry
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// Register a module with the registry
    pub fn register(&mut self, module: Arc<dyn Module>) {
        tracing::debug!(module = module.name(), "module registered");
        self.modules.push(module);
    }

    /// Get all registered modules in registration order
    pub fn modules(&self) -> &[Arc<dyn Module>] {
        &self.modules
    }

    /// Get a module by name
    pub fn get_module(&self, name: &str) -> Option<&Arc<dyn Module>> {
        self.modules.iter().find(|module| module.name() == name)
    }

    /// Get the number of registered modules
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Collect every module's endpoints, tagged with the module name
    pub fn endpoints(&self) -> Vec<(&'static str, Endpoint)> {
        self.modules
            .iter()
            .flat_map(|module| {
                let name = module.name();
                module
                    .endpoints()
                    .into_iter()
                    .map(move |endpoint| (name, endpoint))
            })
            .collect()
    }

    /// Initialize modules in registration order
    pub async fn init_modules(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!("initializing {} modules", self.modules.len());

        for module in &self.modules {
            tracing::info!(module = module.name(), "initializing module");

            module
                .init(ctx)
                .await
                .with_context(|| format!("failed to initialize module '{}'", module.name()))?;
        }

        Ok(())
    }

    /// Start modules in registration order
    pub async fn start_modules(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!("starting {} modules", self.modules.len());

        for module in &self.modules {
            tracing::info!(module = module.name(), "starting module");

            module
                .start(ctx)
                .await
                .with_context(|| format!("failed to start module '{}'", module.name()))?;
        }

        Ok(())
    }

    /// Stop modules in reverse registration order
    pub async fn stop_modules(&self) -> anyhow::Result<()> {
        tracing::info!("stopping {} modules", self.modules.len());

        for module in self.modules.iter().rev() {
            tracing::info!(module = module.name(), "stopping module");

            module
                .stop()
                .await
                .with_context(|| format!("failed to stop module '{}'", module.name()))?;
        }

        Ok(())
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use libris_db::{DocumentStore, InMemoryStore};
    use std::sync::Mutex;

    struct TestModule {
        name: &'static str,
        events: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait::async_trait]
    impl Module for TestModule {
        fn name(&self) -> &'static str {
            self.name
        }

        fn endpoints(&self) -> Vec<Endpoint> {
            vec![Endpoint::get("/things", "List things")]
        }

        async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
            self.events.lock().unwrap().push(format!("init {}", self.name));
            Ok(())
        }

        async fn stop(&self) -> anyhow::Result<()> {
            self.events.lock().unwrap().push(format!("stop {}", self.name));
            Ok(())
        }
    }

    #[test]
    fn test_module_registry_creation() {
        let registry = ModuleRegistry::new();
        assert!(registry.modules().is_empty());
        assert!(registry.endpoints().is_empty());
    }

    #[test]
    fn test_endpoint_collection() {
        let mut registry = ModuleRegistry::new();
        let events = Arc::new(Mutex::new(Vec::new()));
        registry.register(Arc::new(TestModule {
            name: "things",
            events,
        }));

        let endpoints = registry.endpoints();
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].0, "things");
        assert_eq!(endpoints[0].1.method, "GET");
        assert!(registry.get_module("things").is_some());
        assert!(registry.get_module("missing").is_none());
    }

    #[tokio::test]
    async fn test_module_lifecycle_order() {
        let mut registry = ModuleRegistry::new();
        let events = Arc::new(Mutex::new(Vec::new()));
        for name in ["first", "second"] {
            registry.register(Arc::new(TestModule {
                name,
                events: Arc::clone(&events),
            }));
        }

        let settings = Settings::default();
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryStore::new());
        let ctx = InitCtx {
            settings: &settings,
            store: &store,
        };

        registry.init_modules(&ctx).await.unwrap();
        registry.start_modules(&ctx).await.unwrap();
        registry.stop_modules().await.unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec!["init first", "init second", "stop second", "stop first"]
        );
    }
}
