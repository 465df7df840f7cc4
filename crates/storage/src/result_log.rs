use std::sync::Arc;

use brain_core::model::DrillResult;
use brain_core::observable::{ListenerKey, Observable};

use crate::kv::{KeyValueStore, keys};
use crate::mapping::{decode_results, encode_results};

/// Drill results, most recent first, mirrored to the key-value store.
///
/// The in-memory list is authoritative. Failed writes are logged and the
/// next mutation writes the whole list again.
pub struct ResultLog {
    store: Arc<dyn KeyValueStore>,
    results: Observable<Vec<DrillResult>>,
}

impl ResultLog {
    /// Load persisted results. Unreadable data yields an empty log.
    #[must_use]
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let results = read_results(store.as_ref());
        Self {
            store,
            results: Observable::new(results),
        }
    }

    /// Insert a result at the front of the log.
    pub fn append(&self, result: DrillResult) {
        tracing::debug!(id = %result.id(), medal = %result.medal(), "appending drill result");
        self.results.update(|results| {
            results.insert(0, result);
            self.persist(results);
        });
    }

    /// Snapshot of every result, most recent first.
    #[must_use]
    pub fn all(&self) -> Vec<DrillResult> {
        self.results.get()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.with(Vec::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every result.
    pub fn clear(&self) {
        self.results.update(|results| {
            results.clear();
            self.persist(results);
        });
    }

    /// Listen for changes. The listener receives the full log.
    pub fn subscribe(&self, listener: impl Fn(&[DrillResult]) + 'static) -> ListenerKey {
        self.results
            .subscribe(move |results: &Vec<DrillResult>| listener(results))
    }

    pub fn unsubscribe(&self, key: ListenerKey) -> bool {
        self.results.unsubscribe(key)
    }

    fn persist(&self, results: &[DrillResult]) {
        let written = encode_results(results)
            .and_then(|raw| self.store.set(keys::DRILL_RESULTS, &raw));
        if let Err(e) = written {
            tracing::error!(error = %e, count = results.len(), "failed to persist drill results");
        }
    }
}

fn read_results(store: &dyn KeyValueStore) -> Vec<DrillResult> {
    let raw = match store.get(keys::DRILL_RESULTS) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "could not read drill results, starting empty");
            return Vec::new();
        }
    };
    match decode_results(&raw) {
        Ok(decoded) => {
            if decoded.repaired > 0 {
                tracing::warn!(
                    repaired = decoded.repaired,
                    "defaulted malformed drill result fields"
                );
            }
            decoded.value
        }
        Err(e) => {
            tracing::warn!(error = %e, "discarding unreadable drill results");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::InMemoryStore;
    use brain_core::time::fixed_now;
    use chrono::Duration;
    use std::cell::Cell;
    use std::rc::Rc;

    fn result(secs: f64) -> DrillResult {
        DrillResult::record(fixed_now() + Duration::seconds(secs as i64), secs, 10, 9).unwrap()
    }

    #[test]
    fn appends_most_recent_first_and_persists() {
        let store = Arc::new(InMemoryStore::new());
        let log = ResultLog::load(store.clone());
        assert!(log.is_empty());

        let first = result(20.0);
        let second = result(40.0);
        log.append(first.clone());
        log.append(second.clone());

        assert_eq!(log.all(), vec![second.clone(), first.clone()]);

        let reloaded = ResultLog::load(store);
        assert_eq!(reloaded.all(), vec![second, first]);
    }

    #[test]
    fn clear_is_idempotent() {
        let store = Arc::new(InMemoryStore::new());
        let log = ResultLog::load(store.clone());
        log.append(result(10.0));
        log.clear();
        log.clear();

        assert!(log.is_empty());
        assert_eq!(store.get(keys::DRILL_RESULTS).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn garbage_loads_as_empty() {
        let store = Arc::new(InMemoryStore::with_entries([(keys::DRILL_RESULTS, "{oops")]));
        assert!(ResultLog::load(store).is_empty());
    }

    #[test]
    fn subscribers_see_appends() {
        let log = ResultLog::load(Arc::new(InMemoryStore::new()));
        let seen = Rc::new(Cell::new(0));
        let sink = Rc::clone(&seen);
        let key = log.subscribe(move |results| sink.set(results.len()));

        log.append(result(5.0));
        log.append(result(6.0));
        assert_eq!(seen.get(), 2);

        assert!(log.unsubscribe(key));
        log.clear();
        assert_eq!(seen.get(), 2);
    }
}
