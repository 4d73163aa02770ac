//! Registry state: constructed handles, active screen, tick dispatch

use heapless::Vec;

use super::{
    Node, ObjectSlot, RegistryError, ScreenDescriptor, ScreenId, TickContext, MAX_NODES,
    OBJECT_COUNT, OBJECT_NAMES, SCREENS, SCREEN_COUNT, SCREEN_NAMES,
};
use crate::engine::{Align, GuiEngine, Theme, WidgetHandle, WidgetKind, WidgetTree};
use crate::flow::{EventBinding, FlowEngine, FlowStateToken};

/// Named, non-owning references into the engine's object graph
#[derive(Debug, Clone, Default)]
pub struct ObjectTable {
    handles: [Option<WidgetHandle>; OBJECT_COUNT],
}

impl ObjectTable {
    /// Handle stored in `slot`, once its screen is constructed
    pub fn get(&self, slot: ObjectSlot) -> Option<WidgetHandle> {
        self.handles[slot.index()]
    }

    fn set(&mut self, slot: ObjectSlot, handle: WidgetHandle) {
        self.handles[slot.index()] = Some(handle);
    }
}

/// Screen registry
pub struct Registry {
    screens: &'static [ScreenDescriptor],
    objects: ObjectTable,
    roots: [Option<WidgetHandle>; SCREEN_COUNT],
    states: [Option<FlowStateToken>; SCREEN_COUNT],
    constructed: bool,
    active: Option<ScreenId>,
}

impl Registry {
    /// Registry over the built-in screens
    pub fn new() -> Self {
        Self::with_screens(&SCREENS)
    }

    /// Registry over a custom descriptor table
    ///
    /// Descriptor `i` must carry the screen whose index is `i`.
    pub fn with_screens(screens: &'static [ScreenDescriptor]) -> Self {
        Self {
            screens,
            objects: ObjectTable::default(),
            roots: [None; SCREEN_COUNT],
            states: [None; SCREEN_COUNT],
            constructed: false,
            active: None,
        }
    }

    /// Ordered screen names published to the flow engine
    pub fn screen_names() -> &'static [&'static str] {
        &SCREEN_NAMES
    }

    /// Ordered object names published to the flow engine
    pub fn object_names() -> &'static [&'static str] {
        &OBJECT_NAMES
    }

    /// Materialize every screen
    ///
    /// Publishes the name tables, installs the default theme and builds the
    /// screens in index order. May only succeed once per registry; a second
    /// call fails with [`RegistryError::AlreadyConstructed`] without
    /// touching the engine.
    pub fn construct_all<E, F>(&mut self, engine: &mut E, flow: &mut F) -> Result<(), RegistryError>
    where
        E: GuiEngine + ?Sized,
        F: FlowEngine + ?Sized,
    {
        if self.constructed {
            #[cfg(feature = "defmt")]
            defmt::error!("registry: construct_all called twice");
            return Err(RegistryError::AlreadyConstructed);
        }
        self.constructed = true;

        flow.init_screen_names(Self::screen_names());
        flow.init_object_names(Self::object_names());
        engine.apply_theme(Theme::DEFAULT);

        for (index, screen) in self.screens.iter().enumerate() {
            if screen.id.index() != index {
                return Err(RegistryError::MalformedScreen(screen.id));
            }
            self.construct(screen, engine, flow)?;
        }

        #[cfg(feature = "defmt")]
        defmt::info!("registry: {} screens constructed", self.screens.len());

        Ok(())
    }

    fn construct<E, F>(
        &mut self,
        screen: &ScreenDescriptor,
        engine: &mut E,
        flow: &mut F,
    ) -> Result<(), RegistryError>
    where
        E: GuiEngine + ?Sized,
        F: FlowEngine + ?Sized,
    {
        let id = screen.id;
        let state = flow.flow_state(0, id.index() as u16);
        let mut handles: Vec<WidgetHandle, MAX_NODES> = Vec::new();

        for (i, node) in screen.nodes.iter().enumerate() {
            let parent = match node.parent {
                None if i == 0 => None,
                Some(p) if (p as usize) < i => handles.get(p as usize).copied(),
                _ => return Err(RegistryError::MalformedScreen(id)),
            };
            if (i == 0) != (node.kind == WidgetKind::Screen) {
                return Err(RegistryError::MalformedScreen(id));
            }

            let handle = engine
                .create(node.kind, parent)
                .map_err(|_| RegistryError::Engine(id))?;
            apply_node(engine, handle, node, state).map_err(|_| RegistryError::Engine(id))?;

            handles
                .push(handle)
                .map_err(|_| RegistryError::MalformedScreen(id))?;
            if let Some(slot) = node.object {
                self.objects.set(slot, handle);
            }
        }

        let root = handles
            .first()
            .copied()
            .ok_or(RegistryError::MalformedScreen(id))?;
        self.roots[id.index()] = Some(root);
        self.states[id.index()] = Some(state);
        Ok(())
    }

    /// Run the tick routine of the screen at `index`
    pub fn tick<F>(&mut self, index: usize, flow: &mut F) -> Result<(), RegistryError>
    where
        F: FlowEngine,
    {
        let Some(screen) = self.screens.get(index) else {
            #[cfg(feature = "defmt")]
            defmt::error!("registry: tick of unknown screen {}", index);
            return Err(RegistryError::ScreenOutOfRange(index));
        };
        if !self.constructed {
            return Err(RegistryError::NotConstructed);
        }

        let mut ctx = TickContext {
            screen: screen.id,
            flow,
        };
        (screen.tick)(&mut ctx);
        Ok(())
    }

    /// Run the tick routine of the active screen, if any
    pub fn tick_active<F>(&mut self, flow: &mut F) -> Result<(), RegistryError>
    where
        F: FlowEngine,
    {
        match self.active {
            Some(id) => self.tick(id.index(), flow),
            None => Ok(()),
        }
    }

    /// Make a constructed screen active in the engine
    pub fn load_screen<E>(&mut self, engine: &mut E, id: ScreenId) -> Result<(), RegistryError>
    where
        E: GuiEngine + ?Sized,
    {
        let root = self
            .roots
            .get(id.index())
            .copied()
            .flatten()
            .ok_or(RegistryError::NotConstructed)?;
        engine
            .load_screen(root)
            .map_err(|_| RegistryError::Engine(id))?;
        self.active = Some(id);

        #[cfg(feature = "defmt")]
        defmt::info!("registry: screen {} loaded", id.name());

        Ok(())
    }

    /// Currently active screen
    pub fn active(&self) -> Option<ScreenId> {
        self.active
    }

    /// Check if `construct_all` has run
    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    /// Handle of a named object
    pub fn object(&self, slot: ObjectSlot) -> Option<WidgetHandle> {
        self.objects.get(slot)
    }

    /// Root handle of a constructed screen
    pub fn screen_root(&self, id: ScreenId) -> Option<WidgetHandle> {
        self.roots[id.index()]
    }

    /// Flow state token captured when the screen was constructed
    pub fn flow_state(&self, id: ScreenId) -> Option<FlowStateToken> {
        self.states[id.index()]
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_node<T>(
    tree: &mut T,
    handle: WidgetHandle,
    node: &Node,
    state: FlowStateToken,
) -> Result<(), T::Error>
where
    T: WidgetTree + ?Sized,
{
    tree.set_geometry(handle, node.geometry)?;
    if let Some(text) = node.text {
        tree.set_text(handle, text)?;
    }
    if node.style.is_set() {
        tree.set_text_style(handle, node.style)?;
    }
    if node.align != Align::TopLeft {
        tree.set_align(handle, node.align)?;
    }
    if let Some(scrollable) = node.scrollable {
        tree.set_scrollable(handle, scrollable)?;
    }
    if let Some(options) = node.text_area {
        tree.configure_text_area(handle, options)?;
    }
    if let Some(route) = node.route {
        tree.attach_event(
            handle,
            EventBinding {
                state,
                object_index: route.object_index,
                action_index: route.action_index,
                filter: route.filter,
            },
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{
        Area, DisplayRegistration, EngineIo, EventCode, EventSink, Geometry, Point,
        TextAreaOptions, TextStyle, WidgetEvent,
    };
    use crate::flow::FlowBridge;
    use heapless::String;

    /// Engine that records construction and hands out sequential handles
    #[derive(Default)]
    struct MockEngine {
        created: Vec<(WidgetKind, Option<WidgetHandle>), 32>,
        texts: Vec<(WidgetHandle, String<24>), 32>,
        bindings: Vec<(WidgetHandle, EventBinding), 8>,
        themes: u8,
        loaded: Option<WidgetHandle>,
        fail_create: bool,
    }

    impl WidgetTree for MockEngine {
        type Error = ();

        fn create(
            &mut self,
            kind: WidgetKind,
            parent: Option<WidgetHandle>,
        ) -> Result<WidgetHandle, ()> {
            if self.fail_create {
                return Err(());
            }
            let handle = WidgetHandle::from_raw(self.created.len() as u16);
            self.created.push((kind, parent)).map_err(|_| ())?;
            Ok(handle)
        }

        fn set_geometry(&mut self, _w: WidgetHandle, _g: Geometry) -> Result<(), ()> {
            Ok(())
        }

        fn set_text(&mut self, widget: WidgetHandle, text: &str) -> Result<(), ()> {
            let text = String::try_from(text)?;
            self.texts.push((widget, text)).map_err(|_| ())
        }

        fn set_text_style(&mut self, _w: WidgetHandle, _s: TextStyle) -> Result<(), ()> {
            Ok(())
        }

        fn set_align(&mut self, _w: WidgetHandle, _a: Align) -> Result<(), ()> {
            Ok(())
        }

        fn set_scrollable(&mut self, _w: WidgetHandle, _s: bool) -> Result<(), ()> {
            Ok(())
        }

        fn configure_text_area(
            &mut self,
            _w: WidgetHandle,
            _o: TextAreaOptions,
        ) -> Result<(), ()> {
            Ok(())
        }

        fn attach_event(&mut self, widget: WidgetHandle, binding: EventBinding) -> Result<(), ()> {
            self.bindings.push((widget, binding)).map_err(|_| ())
        }
    }

    impl GuiEngine for MockEngine {
        fn register_display(&mut self, _r: DisplayRegistration) -> Result<(), ()> {
            Ok(())
        }

        fn register_pointer(&mut self) -> Result<(), ()> {
            Ok(())
        }

        fn apply_theme(&mut self, _theme: Theme) {
            self.themes += 1;
        }

        fn tick_inc(&mut self, _elapsed_ms: u32) {}

        fn timer_handler(&mut self, _io: EngineIo<'_>) {}

        fn invalidate(&mut self, _area: Area) {}

        fn load_screen(&mut self, screen: WidgetHandle) -> Result<(), ()> {
            self.loaded = Some(screen);
            Ok(())
        }
    }

    /// Flow engine that records every call
    #[derive(Default)]
    struct RecordingFlow {
        screen_names: Option<&'static [&'static str]>,
        object_names: Option<&'static [&'static str]>,
        lookups: Vec<(u16, u16), 16>,
        propagated: Vec<(FlowStateToken, u16, u16), 4>,
    }

    impl FlowEngine for RecordingFlow {
        fn init_screen_names(&mut self, names: &'static [&'static str]) {
            self.screen_names = Some(names);
        }

        fn init_object_names(&mut self, names: &'static [&'static str]) {
            self.object_names = Some(names);
        }

        fn flow_state(&mut self, instance: u16, screen: u16) -> FlowStateToken {
            let _ = self.lookups.push((instance, screen));
            FlowStateToken::from_raw(0x100 + screen as u32)
        }

        fn propagate(
            &mut self,
            state: FlowStateToken,
            object_index: u16,
            action_index: u16,
            _event: &WidgetEvent,
        ) {
            let _ = self.propagated.push((state, object_index, action_index));
        }
    }

    fn constructed() -> (Registry, MockEngine, RecordingFlow) {
        let mut registry = Registry::new();
        let mut engine = MockEngine::default();
        let mut flow = RecordingFlow::default();
        registry.construct_all(&mut engine, &mut flow).unwrap();
        (registry, engine, flow)
    }

    #[test]
    fn test_construct_all_publishes_tables_and_theme() {
        let (registry, engine, flow) = constructed();

        assert!(registry.is_constructed());
        assert_eq!(flow.screen_names, Some(&["Main", "Menu"][..]));
        assert_eq!(
            flow.object_names,
            Some(&["main", "menu", "btn_setting", "obj0"][..])
        );
        assert_eq!(engine.themes, 1);
        assert_eq!(engine.created.len(), 7 + 4);
    }

    #[test]
    fn test_screens_built_in_order() {
        let (registry, engine, _flow) = constructed();

        // Main root first, Menu root right after Main's seven nodes
        assert_eq!(engine.created[0], (WidgetKind::Screen, None));
        assert_eq!(engine.created[7], (WidgetKind::Screen, None));
        assert_eq!(
            registry.screen_root(ScreenId::Main),
            Some(WidgetHandle::from_raw(0))
        );
        assert_eq!(
            registry.screen_root(ScreenId::Menu),
            Some(WidgetHandle::from_raw(7))
        );

        // "Button" caption is parented to the button, not the screen
        assert_eq!(
            engine.created[6],
            (WidgetKind::Label, Some(WidgetHandle::from_raw(5)))
        );
    }

    #[test]
    fn test_object_slots_filled() {
        let (registry, engine, _flow) = constructed();

        assert_eq!(
            registry.object(ObjectSlot::Main),
            Some(WidgetHandle::from_raw(0))
        );
        assert_eq!(
            registry.object(ObjectSlot::Obj0),
            Some(WidgetHandle::from_raw(1))
        );
        assert_eq!(
            registry.object(ObjectSlot::BtnSetting),
            Some(WidgetHandle::from_raw(4))
        );
        assert_eq!(
            registry.object(ObjectSlot::Menu),
            Some(WidgetHandle::from_raw(7))
        );
        assert!(engine
            .texts
            .iter()
            .any(|(w, t)| *w == WidgetHandle::from_raw(1) && t.as_str() == "00:00"));
    }

    #[test]
    fn test_construct_twice_fails() {
        let (mut registry, mut engine, mut flow) = constructed();
        let created = engine.created.len();

        assert_eq!(
            registry.construct_all(&mut engine, &mut flow),
            Err(RegistryError::AlreadyConstructed)
        );
        assert_eq!(engine.created.len(), created);
        assert_eq!(engine.themes, 1);
    }

    #[test]
    fn test_engine_failure_is_reported() {
        let mut registry = Registry::new();
        let mut engine = MockEngine {
            fail_create: true,
            ..Default::default()
        };
        let mut flow = RecordingFlow::default();

        assert_eq!(
            registry.construct_all(&mut engine, &mut flow),
            Err(RegistryError::Engine(ScreenId::Main))
        );
    }

    #[test]
    fn test_tick_dispatches_to_indexed_screen() {
        let (mut registry, _engine, mut flow) = constructed();
        flow.lookups.clear();

        registry.tick(1, &mut flow).unwrap();
        assert_eq!(flow.lookups.as_slice(), &[(0, 1)]);

        registry.tick(0, &mut flow).unwrap();
        assert_eq!(flow.lookups.as_slice(), &[(0, 1), (0, 0)]);
    }

    #[test]
    fn test_tick_out_of_range() {
        let (mut registry, _engine, mut flow) = constructed();
        flow.lookups.clear();

        assert_eq!(
            registry.tick(2, &mut flow),
            Err(RegistryError::ScreenOutOfRange(2))
        );
        assert_eq!(
            registry.tick(usize::MAX, &mut flow),
            Err(RegistryError::ScreenOutOfRange(usize::MAX))
        );
        assert!(flow.lookups.is_empty());
    }

    #[test]
    fn test_tick_before_construction() {
        let mut registry = Registry::new();
        let mut flow = RecordingFlow::default();
        assert_eq!(
            registry.tick(0, &mut flow),
            Err(RegistryError::NotConstructed)
        );
    }

    #[test]
    fn test_load_screen() {
        let (mut registry, mut engine, mut flow) = constructed();
        assert_eq!(registry.active(), None);
        assert_eq!(registry.tick_active(&mut flow), Ok(()));

        registry.load_screen(&mut engine, ScreenId::Menu).unwrap();
        assert_eq!(registry.active(), Some(ScreenId::Menu));
        assert_eq!(engine.loaded, Some(WidgetHandle::from_raw(7)));

        flow.lookups.clear();
        registry.tick_active(&mut flow).unwrap();
        assert_eq!(flow.lookups.as_slice(), &[(0, 1)]);
    }

    #[test]
    fn test_load_before_construction() {
        let mut registry = Registry::new();
        let mut engine = MockEngine::default();
        assert_eq!(
            registry.load_screen(&mut engine, ScreenId::Main),
            Err(RegistryError::NotConstructed)
        );
    }

    #[test]
    fn test_release_on_settings_button_propagates_once() {
        let (registry, engine, mut flow) = constructed();
        let button = registry.object(ObjectSlot::BtnSetting).unwrap();

        let (_, binding) = engine
            .bindings
            .iter()
            .find(|(w, _)| *w == button)
            .copied()
            .unwrap();
        assert_eq!(binding.state, FlowStateToken::from_raw(0x100));

        let mut bridge = FlowBridge::new(&mut flow);
        for code in [EventCode::Pressed, EventCode::Released] {
            let event = WidgetEvent {
                code,
                target: button,
                point: Point::new(290, 210),
            };
            bridge.dispatch(&binding, &event);
        }

        assert_eq!(
            flow.propagated.as_slice(),
            &[(FlowStateToken::from_raw(0x100), 4, 0)]
        );
    }
}
