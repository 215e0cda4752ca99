//! Mode and view stacks.

use core::fmt::Debug;

use padwork_core::compat::Arc;
use tracing::{trace, warn};

/// Common surface of modes and views.
pub trait Layer: Send + Sync {
    type Id: Copy + Eq + Debug;

    fn id(&self) -> Self::Id;

    fn name(&self) -> &str;
}

/// Last-is-active stack that always keeps its bottom element.
pub struct LayerStack<L: ?Sized + Layer> {
    layers: Vec<Arc<L>>,
}

impl<L: ?Sized + Layer> LayerStack<L> {
    pub fn new(default: Arc<L>) -> Self {
        Self {
            layers: vec![default],
        }
    }

    #[inline]
    pub fn active(&self) -> &Arc<L> {
        // Never empty: `new` seeds one layer and `pop` keeps the last.
        &self.layers[self.layers.len() - 1]
    }

    #[inline]
    pub fn active_id(&self) -> L::Id {
        self.active().id()
    }

    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    pub fn contains(&self, id: L::Id) -> bool {
        self.layers.iter().any(|l| l.id() == id)
    }

    pub fn ids(&self) -> Vec<L::Id> {
        self.layers.iter().map(|l| l.id()).collect()
    }

    /// Push unless `layer` is already on top. Returns `true` if pushed.
    pub fn push(&mut self, layer: Arc<L>) -> bool {
        if self.active_id() == layer.id() {
            trace!("{} already active, push ignored", layer.name());
            return false;
        }
        trace!("Push {}", layer.name());
        self.layers.push(layer);
        true
    }

    /// Pop the active layer. The bottom layer is never popped.
    pub fn pop(&mut self) -> Option<Arc<L>> {
        if self.layers.len() <= 1 {
            warn!("Pop on single-layer stack ignored");
            return None;
        }
        let layer = self.layers.pop();
        if let Some(layer) = &layer {
            trace!("Pop {}", layer.name());
        }
        layer
    }

    /// Pop only if `id` is the active layer.
    pub fn pop_if(&mut self, id: L::Id) -> Option<Arc<L>> {
        if self.active_id() != id {
            warn!("Pop of {:?} ignored, {:?} is active", id, self.active_id());
            return None;
        }
        self.pop()
    }
}
