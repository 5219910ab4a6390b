use std::sync::{Arc, Mutex};

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::store::{KeyValueStore, StoreError};

/// Store key for the serialized layout collection.
const LAYOUTS_KEY: &str = "dashboard:layouts:v1";

/// Store key for the active layout id.
const ACTIVE_KEY: &str = "dashboard:activeLayout:v1";

/// Random suffix length appended to generated layout ids.
const ID_SUFFIX_LEN: usize = 7;

/// A saved arrangement of dashboard widgets.
///
/// Identity is `id`; `name` is the user-facing label, unique among layouts
/// case-insensitively. Widget descriptors are opaque to the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardLayout {
    pub id: String,
    pub name: String,
    pub widgets: Vec<Value>,
    /// Unix timestamp in milliseconds of the last save.
    #[serde(rename = "updatedAt")]
    pub updated_at: i64,
}

/// Library of named layouts plus the "currently active" pointer.
///
/// The collection is read from the backing store once at construction; a
/// malformed stored collection degrades to empty rather than failing. All
/// mutations persist immediately and surface store errors.
pub struct LayoutStore {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    layouts: Mutex<Vec<DashboardLayout>>,
    active_id: Mutex<Option<String>>,
}

impl LayoutStore {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        let layouts = Self::load_collection(store.as_ref());
        let active_id = store.get(ACTIVE_KEY);
        Self {
            store,
            clock,
            layouts: Mutex::new(layouts),
            active_id: Mutex::new(active_id),
        }
    }

    fn load_collection(store: &dyn KeyValueStore) -> Vec<DashboardLayout> {
        let Some(raw) = store.get(LAYOUTS_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(layouts) => layouts,
            Err(e) => {
                // Self-healing against corruption, at the cost of dropping
                // whatever was stored there.
                warn!(error = %e, "Stored layout collection is malformed, starting empty");
                Vec::new()
            }
        }
    }

    fn persist_collection(&self, layouts: &[DashboardLayout]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(layouts)?;
        self.store.set(LAYOUTS_KEY, &raw)
    }

    fn persist_active(&self, id: Option<&str>) -> Result<(), StoreError> {
        match id {
            Some(id) => self.store.set(ACTIVE_KEY, id),
            None => {
                self.store.remove(ACTIVE_KEY);
                Ok(())
            }
        }
    }

    fn generate_id(&self, layouts: &[DashboardLayout]) -> String {
        let millis = self.clock.now().timestamp_millis();
        loop {
            let suffix: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(ID_SUFFIX_LEN)
                .map(|b| (b as char).to_ascii_lowercase())
                .collect();
            let id = format!("layout-{}-{}", millis, suffix);
            // Timestamp plus random suffix collides only if a save reuses
            // both; re-roll rather than assume
            if !layouts.iter().any(|l| l.id == id) {
                return id;
            }
        }
    }

    /// Save `widgets` under `name`, overwriting the existing layout with
    /// that name (case-insensitive) or creating a new one. The saved layout
    /// becomes active. A blank name is a no-op returning `Ok(None)`.
    pub fn save(&self, name: &str, widgets: &[Value]) -> Result<Option<String>, StoreError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            debug!("Ignoring layout save with blank name");
            return Ok(None);
        }

        let mut layouts = self.layouts.lock().unwrap();
        let now = self.clock.now().timestamp_millis();
        let lowered = trimmed.to_lowercase();

        let id = match layouts
            .iter_mut()
            .find(|l| l.name.to_lowercase() == lowered)
        {
            Some(existing) => {
                existing.widgets = widgets.to_vec();
                existing.updated_at = now;
                existing.id.clone()
            }
            None => {
                let id = self.generate_id(&layouts);
                layouts.push(DashboardLayout {
                    id: id.clone(),
                    name: trimmed.to_string(),
                    widgets: widgets.to_vec(),
                    updated_at: now,
                });
                id
            }
        };

        self.persist_collection(&layouts)?;
        self.set_active_locked(Some(id.clone()))?;
        Ok(Some(id))
    }

    /// Look up a layout by id, make it active, and return an owned copy of
    /// its widgets. An unknown id returns `Ok(None)` and leaves the active
    /// pointer untouched.
    pub fn load(&self, id: &str) -> Result<Option<Vec<Value>>, StoreError> {
        let layouts = self.layouts.lock().unwrap();
        let Some(layout) = layouts.iter().find(|l| l.id == id) else {
            return Ok(None);
        };
        let widgets = layout.widgets.clone();
        drop(layouts);

        self.set_active_locked(Some(id.to_string()))?;
        Ok(Some(widgets))
    }

    /// Delete the layout with `id`. If it was active, an arbitrary remaining
    /// layout becomes active, or none if the collection is now empty.
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut layouts = self.layouts.lock().unwrap();
        layouts.retain(|l| l.id != id);
        self.persist_collection(&layouts)?;

        let was_active = self.active_id.lock().unwrap().as_deref() == Some(id);
        if was_active {
            let next = layouts.first().map(|l| l.id.clone());
            drop(layouts);
            self.set_active_locked(next)?;
        }
        Ok(())
    }

    /// Read-only lookup by id.
    pub fn get(&self, id: &str) -> Option<DashboardLayout> {
        self.layouts.lock().unwrap().iter().find(|l| l.id == id).cloned()
    }

    /// Set (or clear) the active pointer without checking that `id` exists.
    /// A dangling pointer is treated as absent by every dereferencing site.
    pub fn set_active(&self, id: Option<&str>) -> Result<(), StoreError> {
        self.set_active_locked(id.map(str::to_string))
    }

    fn set_active_locked(&self, id: Option<String>) -> Result<(), StoreError> {
        self.persist_active(id.as_deref())?;
        *self.active_id.lock().unwrap() = id;
        Ok(())
    }

    /// Id of the active layout, if any. May dangle; see [`LayoutStore::set_active`].
    pub fn active_layout_id(&self) -> Option<String> {
        self.active_id.lock().unwrap().clone()
    }

    /// The active layout itself. A dangling pointer yields `None`.
    pub fn active_layout(&self) -> Option<DashboardLayout> {
        let id = self.active_layout_id()?;
        self.get(&id)
    }

    /// All layouts, most recently updated first. Ties keep their original
    /// relative order.
    pub fn list(&self) -> Vec<DashboardLayout> {
        let mut layouts = self.layouts.lock().unwrap().clone();
        layouts.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        layouts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::MemoryStore;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    fn new_store() -> (LayoutStore, Arc<MemoryStore>, Arc<ManualClock>) {
        let backing = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        ));
        let store = LayoutStore::new(backing.clone(), clock.clone());
        (store, backing, clock)
    }

    fn widgets(tag: &str) -> Vec<Value> {
        vec![json!({ "type": "chart", "series": tag })]
    }

    #[test]
    fn test_save_creates_and_activates() {
        let (store, _, _) = new_store();
        let id = store.save("Overview", &widgets("pop")).unwrap().unwrap();

        assert!(id.starts_with("layout-"));
        assert_eq!(store.active_layout_id(), Some(id.clone()));
        let saved = store.get(&id).unwrap();
        assert_eq!(saved.name, "Overview");
        assert_eq!(saved.widgets, widgets("pop"));
    }

    #[test]
    fn test_save_overwrites_case_insensitively() {
        let (store, _, _) = new_store();
        let first = store.save("Foo", &widgets("a")).unwrap().unwrap();
        let second = store.save("foo", &widgets("b")).unwrap().unwrap();

        assert_eq!(first, second);
        assert_eq!(store.list().len(), 1);
        let layout = store.get(&first).unwrap();
        assert_eq!(layout.name, "Foo");
        assert_eq!(layout.widgets, widgets("b"));
    }

    #[test]
    fn test_save_blank_name_is_noop() {
        let (store, backing, _) = new_store();
        assert_eq!(store.save("   ", &widgets("a")).unwrap(), None);
        assert!(store.list().is_empty());
        assert_eq!(backing.get(LAYOUTS_KEY), None);
    }

    #[test]
    fn test_save_trims_name() {
        let (store, _, _) = new_store();
        let id = store.save("  Overview  ", &widgets("a")).unwrap().unwrap();
        assert_eq!(store.get(&id).unwrap().name, "Overview");
    }

    #[test]
    fn test_load_returns_copy_and_sets_active() {
        let (store, _, _) = new_store();
        let id = store.save("Overview", &widgets("a")).unwrap().unwrap();
        store.set_active(None).unwrap();

        let mut loaded = store.load(&id).unwrap().unwrap();
        assert_eq!(store.active_layout_id(), Some(id.clone()));

        // Caller mutation must not reach stored state
        loaded.push(json!({ "type": "injected" }));
        assert_eq!(store.get(&id).unwrap().widgets, widgets("a"));
        assert_eq!(store.load(&id).unwrap().unwrap(), widgets("a"));
    }

    #[test]
    fn test_load_unknown_id_keeps_active() {
        let (store, _, _) = new_store();
        let id = store.save("Overview", &widgets("a")).unwrap().unwrap();

        assert_eq!(store.load("layout-nope").unwrap(), None);
        assert_eq!(store.active_layout_id(), Some(id));
    }

    #[test]
    fn test_delete_last_layout_clears_active() {
        let (store, backing, _) = new_store();
        let id = store.save("Only", &widgets("a")).unwrap().unwrap();

        store.delete(&id).unwrap();

        assert_eq!(store.active_layout_id(), None);
        assert!(store.list().is_empty());
        assert_eq!(backing.get(ACTIVE_KEY), None);
    }

    #[test]
    fn test_delete_active_reassigns_to_remaining() {
        let (store, _, clock) = new_store();
        let first = store.save("First", &widgets("a")).unwrap().unwrap();
        clock.advance(Duration::minutes(1));
        let second = store.save("Second", &widgets("b")).unwrap().unwrap();

        store.delete(&second).unwrap();

        assert_eq!(store.active_layout_id(), Some(first.clone()));
        assert!(store.get(&second).is_none());
        assert!(store.get(&first).is_some());
    }

    #[test]
    fn test_delete_inactive_keeps_active() {
        let (store, _, clock) = new_store();
        let first = store.save("First", &widgets("a")).unwrap().unwrap();
        clock.advance(Duration::minutes(1));
        let second = store.save("Second", &widgets("b")).unwrap().unwrap();

        store.delete(&first).unwrap();
        assert_eq!(store.active_layout_id(), Some(second));
    }

    #[test]
    fn test_list_sorted_by_updated_at_descending() {
        let (store, _, clock) = new_store();
        store.save("Oldest", &widgets("a")).unwrap();
        clock.advance(Duration::minutes(1));
        store.save("Middle", &widgets("b")).unwrap();
        clock.advance(Duration::minutes(1));
        store.save("Newest", &widgets("c")).unwrap();

        let names: Vec<String> = store.list().into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["Newest", "Middle", "Oldest"]);
    }

    #[test]
    fn test_resave_moves_layout_to_front_of_list() {
        let (store, _, clock) = new_store();
        store.save("First", &widgets("a")).unwrap();
        clock.advance(Duration::minutes(1));
        store.save("Second", &widgets("b")).unwrap();
        clock.advance(Duration::minutes(1));
        store.save("first", &widgets("c")).unwrap();

        let names: Vec<String> = store.list().into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn test_corrupt_collection_degrades_to_empty() {
        let backing = Arc::new(MemoryStore::new());
        backing.set(LAYOUTS_KEY, "{definitely not an array").unwrap();
        backing.set(ACTIVE_KEY, "layout-dangling").unwrap();
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ));

        let store = LayoutStore::new(backing, clock);
        assert!(store.list().is_empty());
        // The pointer survives but dereferences to absent
        assert_eq!(store.active_layout_id(), Some("layout-dangling".to_string()));
        assert!(store.active_layout().is_none());
    }

    #[test]
    fn test_persists_across_reconstruction() {
        let backing = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ));

        let id = {
            let store = LayoutStore::new(backing.clone(), clock.clone());
            store.save("Overview", &widgets("a")).unwrap().unwrap()
        };

        let reopened = LayoutStore::new(backing, clock);
        assert_eq!(reopened.active_layout_id(), Some(id.clone()));
        assert_eq!(reopened.get(&id).unwrap().widgets, widgets("a"));
    }

    #[test]
    fn test_set_active_accepts_unknown_id() {
        let (store, backing, _) = new_store();
        store.set_active(Some("layout-ghost")).unwrap();
        assert_eq!(store.active_layout_id(), Some("layout-ghost".to_string()));
        assert!(store.active_layout().is_none());
        assert_eq!(backing.get(ACTIVE_KEY), Some("layout-ghost".to_string()));
    }

    #[test]
    fn test_save_propagates_quota_errors() {
        let backing = Arc::new(MemoryStore::with_capacity_bytes(16));
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ));
        let store = LayoutStore::new(backing, clock);

        let err = store.save("Overview", &widgets("a")).unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { .. }));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let (store, _, _) = new_store();
        let a = store.save("A", &widgets("a")).unwrap().unwrap();
        let b = store.save("B", &widgets("b")).unwrap().unwrap();
        assert_ne!(a, b);
    }
}
