use std::sync::{Arc, Mutex};

use lumina_core::{
    ControlSignal, FrameClock, LayerKind, PerceptionRuntime, Rgb, Scene, SignalCell, THEME,
};

use crate::input::{PointerHandSource, PointerState};
use crate::render::GpuState;

/// Everything one window needs between frames.
pub struct FrameContext<'a> {
    pub scene: Scene,
    pub cell: SignalCell,
    pub clock: FrameClock,
    pub perception: PerceptionRuntime,
    pub pointer: Arc<Mutex<PointerState>>,
    pub surface_size: Arc<Mutex<(u32, u32)>>,
    pub gpu: GpuState<'a>,
    pub last_signal: ControlSignal,
    theme_cursor: usize,
}

impl<'a> FrameContext<'a> {
    pub fn new(scene: Scene, gpu: GpuState<'a>, smoothing_alpha: f32) -> Self {
        let cell = SignalCell::new();
        let perception = PerceptionRuntime::new(cell.clone(), smoothing_alpha);
        let surface_size = Arc::new(Mutex::new(gpu.size()));
        Self {
            scene,
            cell,
            clock: FrameClock::new(),
            perception,
            pointer: Arc::new(Mutex::new(PointerState::default())),
            surface_size,
            gpu,
            last_signal: ControlSignal::default(),
            theme_cursor: 0,
        }
    }

    /// One tick: advance the scene from the latest signal, then draw it.
    pub fn frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let time = self.clock.tick();
        let signal = self.scene.advance(time, &self.cell);
        if signal.is_detected != self.last_signal.is_detected {
            log::debug!(
                "[frame] hand {} (openness {:.2})",
                if signal.is_detected { "tracking" } else { "idle" },
                signal.openness
            );
        }
        self.last_signal = signal;
        self.gpu.render(&self.scene)
    }

    pub fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.gpu.resize(size);
        if let Ok(mut s) = self.surface_size.lock() {
            *s = self.gpu.size();
        }
    }

    pub fn start_perception(&mut self) {
        let source = PointerHandSource::new(self.pointer.clone(), self.surface_size.clone());
        self.perception.start(source);
    }

    pub fn toggle_perception(&mut self) {
        if self.perception.is_running() {
            self.perception.stop();
        } else {
            self.start_perception();
        }
    }

    pub fn toggle_pause(&mut self) {
        let paused = !self.clock.is_paused();
        self.clock.set_paused(paused);
        log::info!("[frame] paused={}", paused);
    }

    /// Give the layer the next theme color.
    pub fn cycle_color(&mut self, kind: LayerKind) {
        self.theme_cursor = (self.theme_cursor + 1) % THEME.len();
        match Rgb::from_hex(THEME[self.theme_cursor]) {
            Ok(color) => {
                self.scene.palette.set_color(kind, color);
                log::info!("[frame] {} -> {}", kind.name(), THEME[self.theme_cursor]);
            }
            Err(e) => log::warn!("[frame] {}", e),
        }
    }

    pub fn with_pointer(&self, f: impl FnOnce(&mut PointerState)) {
        if let Ok(mut p) = self.pointer.lock() {
            f(&mut p);
        }
    }
}
