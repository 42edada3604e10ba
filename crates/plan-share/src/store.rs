//! Persisting plan state in a key-value store.
//!
//! Two entries are involved: the plan payload under
//! [`StoreConfig::state_key`], and the compression flag under
//! [`StoreConfig::compression_key`]. The payload is the structured text,
//! compressed when the flag says so. Every public operation swallows its
//! failures after logging them: callers see `None` or `false` and fall back to
//! an empty plan.
//!
//! The store assumes a single writer. Two writers race and the last write
//! wins.

use plan_share_codec::{decode, decompress, encode, try_compress};
use plan_share_util::graph::{Document, Graph, Value};

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::migrate;
use crate::storage::KeyValueStore;

const FLAG_TRUE: &str = "true";
const FLAG_FALSE: &str = "false";

pub struct PlanStore<S> {
    storage: S,
    config: StoreConfig,
}

impl<S: KeyValueStore> PlanStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, StoreConfig::default())
    }

    pub fn with_config(storage: S, config: StoreConfig) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// The stored flag; anything but exactly `"true"` / `"false"`, or an
    /// unreadable store, falls back to the configured default.
    pub fn compression_enabled(&self) -> bool {
        let default = self.config.default_compression;
        match self.storage.get(&self.config.compression_key) {
            Ok(Some(flag)) => match flag.as_str() {
                FLAG_TRUE => true,
                FLAG_FALSE => false,
                other => {
                    tracing::debug!(flag = %other, default, "Unrecognized compression flag");
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                tracing::warn!(error = %e, default, "Could not read compression flag");
                default
            }
        }
    }

    /// Encodes and writes the plan. Returns whether it was stored.
    pub fn save(&mut self, graph: &Graph, value: &Value) -> bool {
        match self.try_save(graph, value) {
            Ok(bytes) => {
                tracing::debug!(key = %self.config.state_key, bytes, "Saved plan");
                true
            }
            Err(e) => {
                tracing::warn!(key = %self.config.state_key, error = %e, "Failed to save plan");
                false
            }
        }
    }

    /// The stored plan, repaired for older snapshot layouts. `None` when
    /// nothing is stored or it cannot be read back.
    pub fn load(&self) -> Option<Document> {
        match self.try_load() {
            Ok(Some(mut doc)) => {
                migrate::repair(&mut doc);
                Some(doc)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(key = %self.config.state_key, error = %e, "Failed to load plan");
                None
            }
        }
    }

    /// Removes the stored plan. Idempotent.
    pub fn clear(&mut self) {
        if let Err(e) = self.storage.remove(&self.config.state_key) {
            tracing::warn!(key = %self.config.state_key, error = %e, "Failed to clear plan");
        }
    }

    /// Switches compression at rest, rewriting any stored plan into the new
    /// representation first. If the rewrite fails the plan is left as it was
    /// and only the flag changes. Returns whether the flag was written.
    pub fn set_compression(&mut self, enabled: bool) -> bool {
        let current = self.compression_enabled();
        if current != enabled {
            if let Err(e) = self.transcode(current, enabled) {
                tracing::warn!(
                    error = %e,
                    from = current,
                    to = enabled,
                    "Stored plan left in its previous representation"
                );
            }
        }
        let flag = if enabled { FLAG_TRUE } else { FLAG_FALSE };
        match self.storage.set(&self.config.compression_key, flag) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to store compression flag");
                false
            }
        }
    }

    fn try_save(&mut self, graph: &Graph, value: &Value) -> Result<usize, StoreError> {
        let text = encode(graph, value)?;
        let payload = if self.compression_enabled() {
            try_compress(&text)?
        } else {
            text
        };
        self.storage.set(&self.config.state_key, &payload)?;
        Ok(payload.len())
    }

    fn try_load(&self) -> Result<Option<Document>, StoreError> {
        let Some(payload) = self.storage.get(&self.config.state_key)? else {
            return Ok(None);
        };
        let text = read_payload(payload, self.compression_enabled())?;
        Ok(Some(decode(&text)?))
    }

    fn transcode(&mut self, from: bool, to: bool) -> Result<(), StoreError> {
        let Some(payload) = self.storage.get(&self.config.state_key)? else {
            return Ok(());
        };
        let text = read_payload(payload, from)?;
        // Refuse to re-wrap a payload that does not parse under the old rules.
        decode(&text)?;
        let payload = if to { try_compress(&text)? } else { text };
        self.storage.set(&self.config.state_key, &payload)?;
        tracing::debug!(compressed = to, "Transcoded stored plan");
        Ok(())
    }
}

fn read_payload(payload: String, compressed: bool) -> Result<String, StoreError> {
    if compressed {
        Ok(decompress(&payload)?)
    } else {
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use plan_share_util::json_equal::deep_equal;

    fn sample_plan(graph: &mut Graph) -> Value {
        let move_date = graph.date(1_735_689_600_000);
        let scenario = graph.object([
            ("id", Value::from("lisbon")),
            ("moveDate", move_date),
            ("taxRate", Value::from(0.2)),
        ]);
        let scenarios = graph.array([scenario]);
        let selected = graph.array([Value::from("lisbon")]);
        graph.object([
            ("name", Value::from("Plan A")),
            ("scenarios", scenarios),
            ("selectedScenarioIds", selected),
        ])
    }

    #[test]
    fn test_empty_store_loads_none() {
        let store = PlanStore::new(MemoryStore::new());
        assert!(store.load().is_none());
    }

    #[test]
    fn test_save_load_clear() {
        let mut graph = Graph::new();
        let plan = sample_plan(&mut graph);
        let mut store = PlanStore::new(MemoryStore::new());

        assert!(store.save(&graph, &plan));
        let doc = store.load().unwrap();
        assert!(deep_equal(&graph, &plan, &doc.graph, &doc.root));

        store.clear();
        store.clear();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_default_flag_compresses() {
        let mut graph = Graph::new();
        let plan = sample_plan(&mut graph);
        let mut store = PlanStore::new(MemoryStore::new());
        store.save(&graph, &plan);

        let raw = store.storage().get("relocation-plan").unwrap().unwrap();
        assert!(!raw.starts_with('{'));
        assert!(decompress(&raw).is_ok());
    }

    #[test]
    fn test_plain_storage() {
        let mut graph = Graph::new();
        let plan = sample_plan(&mut graph);
        let mut store = PlanStore::new(MemoryStore::new());
        assert!(store.set_compression(false));
        assert!(store.save(&graph, &plan));

        let raw = store.storage().get("relocation-plan").unwrap().unwrap();
        assert!(raw.starts_with(r#"{"name":"Plan A""#));
        assert_eq!(
            store.storage().get("relocation-plan-compressed").unwrap().as_deref(),
            Some("false")
        );
        assert!(store.load().is_some());
    }

    #[test]
    fn test_unrecognized_flag_uses_default() {
        let mut storage = MemoryStore::new();
        storage.set("relocation-plan-compressed", "yes").unwrap();
        let store = PlanStore::new(storage);
        assert!(store.compression_enabled());

        let config = StoreConfig {
            default_compression: false,
            ..StoreConfig::default()
        };
        let store = PlanStore::with_config(store.into_storage(), config);
        assert!(!store.compression_enabled());
    }

    #[test]
    fn test_mismatched_payload_fails_closed() {
        let mut storage = MemoryStore::new();
        storage
            .set("relocation-plan", r#"{"name":"Plan A","scenarios":[]}"#)
            .unwrap();
        storage.set("relocation-plan-compressed", "true").unwrap();
        let store = PlanStore::new(storage);
        assert!(store.load().is_none());
    }

    #[test]
    fn test_garbage_payload_is_none() {
        let mut storage = MemoryStore::new();
        storage.set("relocation-plan-compressed", "false").unwrap();
        storage.set("relocation-plan", "{truncated").unwrap();
        assert!(PlanStore::new(storage).load().is_none());
    }

    #[test]
    fn test_save_failure_is_false() {
        let mut graph = Graph::new();
        let plan = sample_plan(&mut graph);

        let mut store = PlanStore::new(MemoryStore::with_quota(16));
        assert!(!store.save(&graph, &plan));

        let mut store = PlanStore::new(MemoryStore::new());
        assert!(!store.save(&graph, &Value::Undefined));

        let mut storage = MemoryStore::new();
        storage.set_disabled(true);
        let mut store = PlanStore::new(storage);
        assert!(!store.save(&graph, &plan));
        assert!(store.load().is_none());
        store.clear();
        assert!(!store.set_compression(false));
    }

    #[test]
    fn test_toggle_transcodes_both_ways() {
        let mut graph = Graph::new();
        let plan = sample_plan(&mut graph);
        let mut store = PlanStore::new(MemoryStore::new());
        store.save(&graph, &plan);

        assert!(store.set_compression(false));
        let raw = store.storage().get("relocation-plan").unwrap().unwrap();
        assert!(raw.starts_with('{'));
        let doc = store.load().unwrap();
        assert!(deep_equal(&graph, &plan, &doc.graph, &doc.root));

        assert!(store.set_compression(true));
        let raw = store.storage().get("relocation-plan").unwrap().unwrap();
        assert!(!raw.starts_with('{'));
        let doc = store.load().unwrap();
        assert!(deep_equal(&graph, &plan, &doc.graph, &doc.root));
    }

    #[test]
    fn test_toggle_without_payload() {
        let mut store = PlanStore::new(MemoryStore::new());
        assert!(store.set_compression(false));
        assert!(!store.compression_enabled());
        assert!(store.load().is_none());
    }

    #[test]
    fn test_failed_transcode_leaves_payload() {
        let mut storage = MemoryStore::new();
        storage.set("relocation-plan-compressed", "true").unwrap();
        storage.set("relocation-plan", "not-a-real-compressed-string").unwrap();
        let mut store = PlanStore::new(storage);

        assert!(store.set_compression(false));
        assert!(!store.compression_enabled());
        assert_eq!(
            store.storage().get("relocation-plan").unwrap().as_deref(),
            Some("not-a-real-compressed-string")
        );
    }

    #[test]
    fn test_load_repairs_missing_selection() {
        let mut storage = MemoryStore::new();
        storage.set("relocation-plan-compressed", "false").unwrap();
        storage
            .set(
                "relocation-plan",
                r#"{"name":"Old plan","scenarios":[{"id":"s-1"},{"id":"s-2"}]}"#,
            )
            .unwrap();
        let doc = PlanStore::new(storage).load().unwrap();
        assert_eq!(
            crate::snapshot::selected_scenario_ids(&doc),
            &[Value::from("s-1")]
        );
    }

    #[test]
    fn test_too_deep_plan_is_not_saved() {
        let mut graph = Graph::new();
        let mut current = graph.object([("leaf", Value::Bool(true))]);
        for _ in 0..200 {
            current = graph.object([("child", current)]);
        }
        let mut store = PlanStore::new(MemoryStore::new());
        assert!(!store.save(&graph, &current));
        assert!(store.storage().get("relocation-plan").unwrap().is_none());
    }

    #[test]
    fn test_oversized_plan_is_not_saved_compressed() {
        let mut graph = Graph::new();
        let huge = "x".repeat(plan_share_codec::MAX_DECOMPRESSED_LEN);
        let plan = graph.object([("notes", Value::from(huge))]);

        let mut store = PlanStore::new(MemoryStore::new());
        assert!(!store.save(&graph, &plan));
        assert!(store.storage().get("relocation-plan").unwrap().is_none());

        // Stored uncompressed it round-trips, and turning compression on
        // leaves it readable as it was.
        assert!(store.set_compression(false));
        assert!(store.save(&graph, &plan));
        assert!(store.set_compression(true));
        assert!(store.storage().get("relocation-plan").unwrap().is_some());
        assert!(store.set_compression(false));
        assert!(store.load().is_some());
    }
}
