//! Engine facade
//!
//! One [`Engine`] per configuration. It owns the compiled expression cache
//! and is `Sync`, so a single instance can serve every thread.
//!
//! ```ignore
//! let engine = Engine::new(EngineConfig::default());
//! let nav = engine.navigator(&schema, &device)?;
//! let ports = engine.select(&nav, "/t1:cont1a/t1:list2a")?;
//! ```

pub mod cache;
pub mod parallel;

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::data::ConfigNode;
use crate::error::Result;
use crate::navigator::{Navigator, YangNavigator};
use crate::schema::SchemaIndex;
use crate::xpath::{CompiledExpr, XPathValue};

pub use cache::{CacheStats, ExprCache};

pub struct Engine {
    config: EngineConfig,
    cache: ExprCache,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        tracing::debug!(?config, "engine created");
        Engine {
            cache: ExprCache::new(config.cache_capacity),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compile `xpath`, or fetch it from the cache.
    pub fn compile(&self, xpath: &str) -> Result<Arc<CompiledExpr>> {
        self.cache.get_or_compile(xpath)
    }

    /// Cursor at the root of `root`, validated first when
    /// `validate-instance` is set.
    pub fn navigator<'a>(
        &self,
        schema: &'a SchemaIndex,
        root: &'a dyn ConfigNode,
    ) -> Result<YangNavigator<'a>> {
        if self.config.validate_instance {
            YangNavigator::checked(schema, root)
        } else {
            Ok(YangNavigator::new(schema, root))
        }
    }

    pub fn select<N: Navigator>(&self, nav: &N, xpath: &str) -> Result<Vec<N>> {
        self.compile(xpath)?.select(nav)
    }

    pub fn evaluate<N: Navigator>(&self, nav: &N, xpath: &str) -> Result<XPathValue<N>> {
        self.compile(xpath)?.evaluate(nav)
    }

    /// Evaluate every expression from `nav`, results in input order.
    /// Batches of at least `parallel-threshold` run on the rayon pool.
    pub fn evaluate_all<N>(&self, nav: &N, xpaths: &[&str]) -> Vec<Result<XPathValue<N>>>
    where
        N: Navigator + Send + Sync,
    {
        parallel::evaluate_batch(nav, xpaths, self.config.parallel_threshold, |xpath| {
            self.compile(xpath)
        })
    }

    /// Map `mapper` over the nodes `xpath` selects, in parallel.
    pub fn select_map<N, F, T>(&self, nav: &N, xpath: &str, mapper: F) -> Result<Vec<T>>
    where
        N: Navigator + Send + Sync,
        F: Fn(&N) -> T + Sync + Send,
        T: Send,
    {
        let expr = self.compile(xpath)?;
        parallel::select_map(nav, &expr, mapper)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataNode;
    use crate::error::Error;
    use crate::fixtures;

    fn assert_sync<T: Send + Sync>() {}

    #[test]
    fn test_engine_and_cursor_are_shareable() {
        assert_sync::<Engine>();
        assert_sync::<YangNavigator<'static>>();
    }

    #[test]
    fn test_select_and_evaluate() {
        let engine = Engine::default();
        let schema = fixtures::schema();
        let device = fixtures::device();
        let nav = engine.navigator(&schema, &device).unwrap();

        let nodes = engine
            .select(&nav, "/t1:cont1a/t1:list2a[@t1:name='l2a2']/t1:rx-power")
            .unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].to_string(), "rx-power: 26");

        assert_eq!(
            engine.evaluate(&nav, "count(//t1:list2a)").unwrap(),
            XPathValue::Number(3.0)
        );
        assert!(matches!(engine.select(&nav, "count(//*)"), Err(Error::NotNodeSet)));
    }

    #[test]
    fn test_repeated_queries_hit_cache() {
        let engine = Engine::default();
        let schema = fixtures::schema();
        let device = fixtures::device_tree();
        let nav = engine.navigator(&schema, &device).unwrap();

        for _ in 0..3 {
            engine.select(&nav, "//t1:leaf2g").unwrap();
        }
        assert_eq!(engine.cache_stats(), CacheStats { hits: 2, misses: 1 });

        engine.clear_cache();
        engine.select(&nav, "//t1:leaf2g").unwrap();
        assert_eq!(engine.cache_stats().misses, 2);
    }

    #[test]
    fn test_navigator_validation() {
        let schema = fixtures::schema();
        let bad = DataNode::new().container("cont1a", DataNode::new().leaf("bogus", 1u8));

        let strict = Engine::default();
        assert!(matches!(
            strict.navigator(&schema, &bad),
            Err(Error::SchemaMismatch { .. })
        ));

        let lenient = Engine::new(EngineConfig::default().with_validation(false));
        let nav = lenient.navigator(&schema, &bad).unwrap();
        assert!(lenient.select(&nav, "/t1:cont1a/*").unwrap().is_empty());
    }

    #[test]
    fn test_evaluate_all() {
        let engine = Engine::new(EngineConfig::default().with_parallel_threshold(2));
        let schema = fixtures::schema();
        let device = fixtures::device();
        let nav = engine.navigator(&schema, &device).unwrap();

        let results = engine.evaluate_all(
            &nav,
            &[
                "/t1:cont1a/t1:cont2a/t1:leaf2a = 1",
                "sum(/t1:cont1a/t1:list2a/t1:tx-power) > 0",
                "$missing",
            ],
        );
        assert_eq!(results[0].as_ref().unwrap(), &XPathValue::Boolean(true));
        assert_eq!(results[1].as_ref().unwrap(), &XPathValue::Boolean(true));
        assert!(matches!(results[2], Err(Error::UnboundVariable(ref name)) if name == "missing"));
    }

    #[test]
    fn test_select_map_over_entries() {
        let engine = Engine::default();
        let schema = fixtures::schema();
        let device = fixtures::device();
        let nav = engine.navigator(&schema, &device).unwrap();

        let names = engine
            .select_map(&nav, "/t1:cont1a/t1:list2a", |entry| {
                engine.evaluate(entry, "string(@t1:name)")
            })
            .unwrap()
            .into_iter()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(
            names,
            [
                XPathValue::String("l2a1".to_string()),
                XPathValue::String("l2a2".to_string()),
                XPathValue::String("l2a3".to_string()),
            ]
        );
    }
}
