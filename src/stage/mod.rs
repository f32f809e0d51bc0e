//! Stage: the host that mounts backdrop layers and drives their frames.
//!
//! The stage owns the viewport, the scroll position, the frame queue and
//! the signal bus. Layers acquire frame loops and listeners through a
//! [`MountContext`]; dropping a layer releases all of them, so an unmounted
//! layer leaves no pending frames and no listeners behind.

pub mod layers;
pub mod signals;

pub use layers::{FieldLayer, SnowLayer};
pub use signals::{Signal, SignalBus, SharedSignalBus, Subscription};

use anyhow::Result;

use crate::config::{ParticleFieldParameters, SnowfallParameters};
use crate::physics::{ParticleField, Snowfall};
use crate::render::{Palette, PixelCanvas};
use crate::scheduler::{FrameLoop, FrameQueue, FrameRequest, FrameSlot, LayerId, SharedFrameQueue};
use crate::state::{FrameMetrics, LayerStats, Viewport};

/// A full-viewport drawing layer hosted by the [`Stage`]
pub trait Layer {
    fn name(&self) -> &'static str;

    /// Stacking order; higher draws on top
    fn z_index(&self) -> i32;

    /// Handle a fired frame request addressed to this layer
    fn on_frame(&mut self, request: FrameRequest, timestamp_ms: f64);

    fn on_resize(&mut self, viewport: Viewport);

    fn on_scroll(&mut self, _scroll_y: f32) {}

    /// Draw this layer's canvas onto the composite target
    fn composite_into(&self, target: &mut PixelCanvas);

    fn stats(&self) -> LayerStats;
}

/// Host resources handed to a layer while it mounts
pub struct MountContext {
    id: LayerId,
    viewport: Viewport,
    scroll_y: f32,
    frames: SharedFrameQueue,
    signals: SharedSignalBus,
}

impl MountContext {
    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    /// A stopped frame loop bound to this layer
    pub fn frame_loop(&self, slot: FrameSlot) -> FrameLoop {
        FrameLoop::new(self.frames.clone(), self.id, slot)
    }

    /// Listen for `signal` until the returned subscription is dropped
    pub fn subscribe(&self, signal: Signal) -> Subscription {
        Subscription::new(self.signals.clone(), signal, self.id)
    }
}

/// Layer host
pub struct Stage {
    viewport: Viewport,
    scroll_y: f32,
    frames: SharedFrameQueue,
    signals: SharedSignalBus,
    layers: Vec<(LayerId, Box<dyn Layer>)>,
    next_id: u64,
    metrics: FrameMetrics,
}

impl Stage {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            scroll_y: 0.0,
            frames: FrameQueue::shared(),
            signals: SignalBus::shared(),
            layers: Vec::new(),
            next_id: 0,
            metrics: FrameMetrics::new(),
        }
    }

    /// Mount a layer built by `build`
    ///
    /// Returns `None` if the layer could not acquire its resources; anything
    /// it registered before failing is released with it.
    pub fn mount<L, F>(&mut self, build: F) -> Option<LayerId>
    where
        L: Layer + 'static,
        F: FnOnce(&MountContext) -> Result<L>,
    {
        self.next_id += 1;
        let ctx = MountContext {
            id: LayerId(self.next_id),
            viewport: self.viewport,
            scroll_y: self.scroll_y,
            frames: self.frames.clone(),
            signals: self.signals.clone(),
        };

        match build(&ctx) {
            Ok(layer) => {
                log::info!("Mounted {} as layer {}", layer.name(), ctx.id.0);
                let z = layer.z_index();
                let index = self
                    .layers
                    .iter()
                    .position(|(_, l)| l.z_index() > z)
                    .unwrap_or(self.layers.len());
                self.layers.insert(index, (ctx.id, Box::new(layer)));
                Some(ctx.id)
            }
            Err(e) => {
                log::warn!("Layer {} not mounted: {:#}", ctx.id.0, e);
                None
            }
        }
    }

    /// Mount the particle network with an entropy-seeded field
    pub fn mount_particle_field(
        &mut self,
        params: &ParticleFieldParameters,
        palette: Palette,
    ) -> Option<LayerId> {
        self.mount(|ctx| FieldLayer::mount(ctx, ParticleField::new(params, ctx.viewport()), palette))
    }

    /// Mount the snowfall, or nothing when it is disabled
    pub fn mount_snowfall(&mut self, params: &SnowfallParameters) -> Option<LayerId> {
        if !params.enabled {
            log::info!("Snowfall disabled");
            return None;
        }
        self.mount(|ctx| SnowLayer::mount(ctx, Snowfall::new(params, ctx.viewport())))
    }

    /// Drop a layer along with its frame loops and listeners
    pub fn unmount(&mut self, id: LayerId) -> bool {
        match self.layers.iter().position(|(layer_id, _)| *layer_id == id) {
            Some(index) => {
                let (_, layer) = self.layers.remove(index);
                log::info!("Unmounted {} (layer {})", layer.name(), id.0);
                true
            }
            None => false,
        }
    }

    /// Resize the viewport and notify resize listeners
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let targets = self.signals.borrow().listeners_for(Signal::Resize);
        for id in targets {
            if let Some(layer) = self.layer_mut(id) {
                layer.on_resize(viewport);
            }
        }
    }

    /// Set the document scroll offset and notify scroll listeners
    pub fn scroll_to(&mut self, scroll_y: f32) {
        self.scroll_y = scroll_y;
        let targets = self.signals.borrow().listeners_for(Signal::Scroll);
        for id in targets {
            if let Some(layer) = self.layer_mut(id) {
                layer.on_scroll(scroll_y);
            }
        }
    }

    /// Run every frame callback due at `timestamp_ms`; returns how many fired
    ///
    /// Metrics only count ticks that ran at least one callback.
    pub fn tick(&mut self, timestamp_ms: f64) -> usize {
        let due = self.frames.borrow_mut().take_due();
        if due.is_empty() {
            return 0;
        }
        for request in &due {
            if let Some(layer) = self.layer_mut(request.layer) {
                layer.on_frame(*request, timestamp_ms);
            }
        }

        let stats = self.stats();
        self.metrics.record_frame(timestamp_ms, stats);
        due.len()
    }

    /// Flatten all layers, bottom to top, into a new canvas
    pub fn composite(&self) -> Result<PixelCanvas> {
        let mut target = PixelCanvas::new(self.viewport)?;
        for (_, layer) in &self.layers {
            layer.composite_into(&mut target);
        }
        Ok(target)
    }

    /// Combined counters of all mounted layers
    pub fn stats(&self) -> LayerStats {
        self.layers
            .iter()
            .fold(LayerStats::default(), |acc, (_, layer)| acc.merge(layer.stats()))
    }

    fn layer_mut(&mut self, id: LayerId) -> Option<&mut Box<dyn Layer>> {
        self.layers
            .iter_mut()
            .find(|(layer_id, _)| *layer_id == id)
            .map(|(_, layer)| layer)
    }

    /// Mounted layer names, bottom to top
    pub fn layer_names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|(_, layer)| layer.name()).collect()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Outstanding frame requests across all layers
    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().pending()
    }

    /// Registered resize and scroll listeners across all layers
    pub fn listener_count(&self) -> usize {
        self.signals.borrow().len()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    pub fn metrics(&self) -> &FrameMetrics {
        &self.metrics
    }
}
