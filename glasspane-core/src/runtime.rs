//! Panel runtime
//!
//! Owns the engine, both adapters, the screen registry and the flow
//! engine, and wires them together for each scheduler iteration.

use glasspane_hal::{Digitizer, PanelController};

use crate::config::{ConfigError, PanelConfig};
use crate::display::FlushAdapter;
use crate::engine::{DisplayRegistration, EngineIo, GuiEngine, RenderMode};
use crate::flow::{FlowBridge, FlowEngine};
use crate::input::{Calibrator, InputAdapter};
use crate::registry::{Registry, RegistryError, ScreenId};
use crate::scheduler::LoopBody;

/// Startup and loop errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RuntimeError {
    /// Panel configuration rejected
    Config(ConfigError),
    /// Screen registry defect
    Registry(RegistryError),
    /// Engine refused display or pointer registration
    Engine,
}

impl From<ConfigError> for RuntimeError {
    fn from(e: ConfigError) -> Self {
        RuntimeError::Config(e)
    }
}

impl From<RegistryError> for RuntimeError {
    fn from(e: RegistryError) -> Self {
        RuntimeError::Registry(e)
    }
}

/// Everything one scheduler iteration touches
pub struct Runtime<E, P, D, F> {
    engine: E,
    display: FlushAdapter<P>,
    input: InputAdapter<D>,
    registry: Registry,
    flow: F,
    config: PanelConfig,
}

impl<E, P, D, F> Runtime<E, P, D, F>
where
    E: GuiEngine,
    P: PanelController,
    D: Digitizer,
    F: FlowEngine,
{
    /// Assemble a runtime from its collaborators
    ///
    /// The panel must already be initialized; its reported dimensions are
    /// the ones flushes are clipped to.
    pub fn new(
        config: PanelConfig,
        engine: E,
        panel: P,
        digitizer: D,
        flow: F,
    ) -> Result<Self, RuntimeError> {
        config.validate()?;
        let calibrator = Calibrator::new(config.calibration, config.width, config.height)?;

        Ok(Self {
            engine,
            display: FlushAdapter::new(panel, config.swap_bytes),
            input: InputAdapter::new(digitizer, calibrator, config.min_pressure),
            registry: Registry::new(),
            flow,
            config,
        })
    }

    /// Register the display and pointer, build every screen and show Main
    pub fn init(&mut self) -> Result<(), RuntimeError> {
        self.engine
            .register_display(DisplayRegistration {
                width: self.config.width,
                height: self.config.height,
                buffer_pixels: self.config.draw_buffer_pixels(),
                render_mode: RenderMode::Partial,
            })
            .map_err(|_| RuntimeError::Engine)?;
        self.engine
            .register_pointer()
            .map_err(|_| RuntimeError::Engine)?;

        self.registry
            .construct_all(&mut self.engine, &mut self.flow)?;
        self.registry.load_screen(&mut self.engine, ScreenId::Main)?;
        Ok(())
    }

    /// Switch the active screen
    pub fn load_screen(&mut self, id: ScreenId) -> Result<(), RegistryError> {
        self.registry.load_screen(&mut self.engine, id)
    }

    /// Get the GUI engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Get the GUI engine mutably
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Get the screen registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Get the flow engine
    pub fn flow(&self) -> &F {
        &self.flow
    }

    /// Get the flow engine mutably
    pub fn flow_mut(&mut self) -> &mut F {
        &mut self.flow
    }

    /// Get the display flush adapter
    pub fn display(&self) -> &FlushAdapter<P> {
        &self.display
    }

    /// Get the display flush adapter mutably
    pub fn display_mut(&mut self) -> &mut FlushAdapter<P> {
        &mut self.display
    }

    /// Get the input adapter
    pub fn input(&self) -> &InputAdapter<D> {
        &self.input
    }

    /// Get the input adapter mutably
    pub fn input_mut(&mut self) -> &mut InputAdapter<D> {
        &mut self.input
    }

    /// Get the validated panel configuration
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }
}

impl<E, P, D, F> LoopBody for Runtime<E, P, D, F>
where
    E: GuiEngine,
    P: PanelController,
    D: Digitizer,
    F: FlowEngine,
{
    type Error = RegistryError;

    fn advance(&mut self, elapsed_ms: u32) {
        self.engine.tick_inc(elapsed_ms);
    }

    fn drive(&mut self) -> Result<(), RegistryError> {
        if let Some(area) = self.display.take_retry() {
            #[cfg(feature = "defmt")]
            defmt::debug!("redrawing area after failed flush: {}", area);
            self.engine.invalidate(area);
        }

        let mut bridge = FlowBridge::new(&mut self.flow);
        self.engine.timer_handler(EngineIo::new(
            &mut self.display,
            &mut self.input,
            &mut bridge,
        ));

        self.registry.tick_active(&mut self.flow)
    }
}
