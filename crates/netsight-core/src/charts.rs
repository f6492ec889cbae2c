// ── Chart lifecycle ──
//
// Owns every live chart handle, keyed by metric name. Handles are released by
// reconcile, teardown, or Drop; nothing else holds them.

use indexmap::IndexMap;
use tracing::debug;

use crate::render::ChartSpec;

/// Produces and releases drawing resources for charts.
pub trait ChartBackend {
    type Handle;

    fn create(&mut self, spec: &ChartSpec) -> Self::Handle;

    fn destroy(&mut self, handle: Self::Handle);
}

pub struct ChartLifecycleManager<B: ChartBackend> {
    backend: B,
    handles: IndexMap<String, B::Handle>,
}

impl<B: ChartBackend> ChartLifecycleManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            handles: IndexMap::new(),
        }
    }

    /// Make the live chart set match `specs` exactly, in `specs` order.
    ///
    /// An existing handle under a key is always destroyed before its
    /// replacement is created. Keys missing from `specs` are destroyed.
    pub fn reconcile(&mut self, specs: &[ChartSpec]) {
        let mut next = IndexMap::with_capacity(specs.len());

        for spec in specs {
            if let Some(old) = self.handles.shift_remove(&spec.key) {
                self.backend.destroy(old);
            }
            // A repeated key in one batch replaces the earlier chart.
            if let Some(dup) = next.shift_remove(&spec.key) {
                self.backend.destroy(dup);
            }
            next.insert(spec.key.clone(), self.backend.create(spec));
        }

        let stale = std::mem::replace(&mut self.handles, next);
        for (key, handle) in stale {
            debug!(chart = %key, "destroying chart no longer in payload");
            self.backend.destroy(handle);
        }
    }

    /// Destroy every remaining handle.
    pub fn teardown(&mut self) {
        for (_, handle) in self.handles.drain(..) {
            self.backend.destroy(handle);
        }
    }

    /// Live handles in display order.
    pub fn handles(&self) -> impl Iterator<Item = (&str, &B::Handle)> {
        self.handles.iter().map(|(k, h)| (k.as_str(), h))
    }

    pub fn get(&self, key: &str) -> Option<&B::Handle> {
        self.handles.get(key)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: ChartBackend> std::fmt::Debug for ChartLifecycleManager<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartLifecycleManager")
            .field("charts", &self.handles.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl<B: ChartBackend> Drop for ChartLifecycleManager<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}
