//! Scene engine
//!
//! Holds the widget pool, tracks dirty areas and pointer state, and renders
//! the active screen band by band into the caller's partial buffer.

use glasspane_core::engine::{
    Align, Area, Dim, DisplayRegistration, DisplaySink, EngineIo, EventCode, EventSink,
    FlushSignal, Geometry, GuiEngine, Point, PointerSample, PointerState, TextAreaOptions,
    TextStyle, Theme, WidgetEvent, WidgetHandle, WidgetKind, WidgetTree,
};
use glasspane_core::flow::EventBinding;
use heapless::{String, Vec};

use crate::band::Band;
use crate::error::SceneError;
use crate::render::{draw_widget, text_size, Colors};
use crate::widget::{Widget, MAX_TEXT};

/// Widget pool capacity
pub const MAX_WIDGETS: usize = 32;

/// Pending dirty areas before they are collapsed into one
const MAX_DIRTY: usize = 8;

/// Pointer polling period (ms)
pub const INPUT_PERIOD_MS: u32 = 30;

/// Refresh period (ms)
pub const REFRESH_PERIOD_MS: u32 = 33;

/// Flush completion flag
struct FlushFlag(bool);

impl FlushSignal for FlushFlag {
    fn flush_ready(&mut self) {
        self.0 = true;
    }
}

#[derive(Debug, Default)]
struct PointerTracker {
    /// Last reported contact state
    down: bool,
    /// Widget that received the press
    target: Option<u16>,
}

/// Retained scene engine over a borrowed partial render buffer
pub struct SceneEngine<'buf> {
    buffer: &'buf mut [u16],
    widgets: Vec<Widget, MAX_WIDGETS>,
    theme: Theme,
    display: Option<DisplayRegistration>,
    pointer_enabled: bool,
    active: Option<u16>,
    dirty: Vec<Area, MAX_DIRTY>,
    now_ms: u32,
    last_input: Option<u32>,
    last_refresh: Option<u32>,
    pointer: PointerTracker,
    flushes: u32,
}

impl<'buf> SceneEngine<'buf> {
    /// Create an engine rendering into `buffer`
    pub fn new(buffer: &'buf mut [u16]) -> Self {
        Self {
            buffer,
            widgets: Vec::new(),
            theme: Theme::DEFAULT,
            display: None,
            pointer_enabled: false,
            active: None,
            dirty: Vec::new(),
            now_ms: 0,
            last_input: None,
            last_refresh: None,
            pointer: PointerTracker::default(),
            flushes: 0,
        }
    }

    /// Engine time (ms, wrapping)
    pub fn now_ms(&self) -> u32 {
        self.now_ms
    }

    /// Active screen
    pub fn active_screen(&self) -> Option<WidgetHandle> {
        self.active.map(WidgetHandle::from_raw)
    }

    /// Number of widgets created
    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    /// Areas waiting to be redrawn
    pub fn dirty_areas(&self) -> &[Area] {
        &self.dirty
    }

    /// Number of bands flushed so far
    pub fn flush_count(&self) -> u32 {
        self.flushes
    }

    /// Text of a widget
    pub fn text(&self, widget: WidgetHandle) -> Option<&str> {
        self.widgets.get(widget.raw() as usize).map(|w| w.text.as_str())
    }

    /// Kind of a widget
    pub fn kind(&self, widget: WidgetHandle) -> Option<WidgetKind> {
        self.widgets.get(widget.raw() as usize).map(|w| w.kind)
    }

    /// Check if the pointer is held on a widget
    pub fn is_pressed(&self, widget: WidgetHandle) -> bool {
        self.widgets
            .get(widget.raw() as usize)
            .map(|w| w.pressed)
            .unwrap_or(false)
    }

    /// Screen-space bounds of a widget
    pub fn bounds(&self, widget: WidgetHandle) -> Option<Area> {
        bounds(&self.widgets, widget.raw() as usize)
    }

    fn index(&self, widget: WidgetHandle) -> Result<usize, SceneError> {
        let index = widget.raw() as usize;
        if index < self.widgets.len() {
            Ok(index)
        } else {
            Err(SceneError::UnknownWidget)
        }
    }

    /// Record an area for the next refresh, merging overlapping entries
    fn mark_dirty(&mut self, area: Area) {
        for pending in self.dirty.iter_mut() {
            if pending.intersect(&area).is_some() {
                *pending = pending.union(&area);
                return;
            }
        }
        if self.dirty.push(area).is_err() {
            let merged = self.dirty.iter().fold(area, |acc, a| acc.union(a));
            self.dirty.clear();
            // Cannot fail: the list was just emptied
            let _ = self.dirty.push(merged);
        }
    }

    /// Mark a widget's current bounds dirty if it is on screen
    fn touch(&mut self, index: usize) {
        let visible = self
            .widgets
            .get(index)
            .map(|w| Some(w.root) == self.active)
            .unwrap_or(false);
        if visible {
            if let Some(area) = bounds(&self.widgets, index) {
                self.mark_dirty(area);
            }
        }
    }

    /// Apply a change to a widget, redrawing its old and new bounds
    fn update<F>(&mut self, widget: WidgetHandle, change: F) -> Result<(), SceneError>
    where
        F: FnOnce(&mut Widget) -> Result<(), SceneError>,
    {
        let index = self.index(widget)?;
        self.touch(index);
        change(&mut self.widgets[index])?;
        self.touch(index);
        Ok(())
    }

    /// Topmost interactive widget of the active screen under `point`
    fn hit_test(&self, point: Point) -> Option<u16> {
        let root = self.active?;
        self.widgets
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, w)| w.root == root && w.kind.is_interactive())
            .find(|(i, _)| {
                bounds(&self.widgets, *i)
                    .map(|area| area.contains(point))
                    .unwrap_or(false)
            })
            .map(|(i, _)| i as u16)
    }

    fn emit(&self, events: &mut dyn EventSink, index: u16, code: EventCode, point: Point) {
        if let Some(binding) = self.widgets.get(index as usize).and_then(|w| w.binding) {
            events.dispatch(
                &binding,
                &WidgetEvent {
                    code,
                    target: WidgetHandle::from_raw(index),
                    point,
                },
            );
        }
    }

    fn set_pressed(&mut self, index: u16, pressed: bool) {
        if let Some(widget) = self.widgets.get_mut(index as usize) {
            widget.pressed = pressed;
        }
        self.touch(index as usize);
    }

    /// Turn a pointer sample into press/release/click events
    fn handle_pointer(&mut self, sample: PointerSample, events: &mut dyn EventSink) {
        match sample.state {
            PointerState::Pressed if !self.pointer.down => {
                if let Some(index) = self.hit_test(sample.point) {
                    self.pointer.target = Some(index);
                    self.set_pressed(index, true);
                    self.emit(events, index, EventCode::Pressed, sample.point);
                }
            }
            PointerState::Released => {
                if let Some(index) = self.pointer.target.take() {
                    self.set_pressed(index, false);
                    self.emit(events, index, EventCode::Released, sample.point);
                    let inside = bounds(&self.widgets, index as usize)
                        .map(|area| area.contains(sample.point))
                        .unwrap_or(false);
                    if inside {
                        self.emit(events, index, EventCode::Clicked, sample.point);
                    }
                }
            }
            PointerState::Pressed => {}
        }
        self.pointer.down = sample.is_pressed();
    }

    /// Render every dirty area of the active screen and flush it in bands
    fn refresh(&mut self, display: &mut dyn DisplaySink) {
        let dirty = core::mem::take(&mut self.dirty);
        let (Some(registration), Some(root)) = (self.display, self.active) else {
            return;
        };
        let Some(screen) = Area::full(registration.width, registration.height) else {
            return;
        };
        let colors = Colors::from_theme(&self.theme);
        let capacity = registration.buffer_pixels.min(self.buffer.len());

        for area in dirty.iter().filter_map(|a| a.intersect(&screen)) {
            let rows = (capacity / area.width() as usize).max(1) as i32;
            let mut y = area.y1;
            while y <= area.y2 {
                let band_area = Area::new(area.x1, y, area.x2, (y + rows - 1).min(area.y2));
                let count = band_area.pixel_count();
                if count > self.buffer.len() {
                    #[cfg(feature = "defmt")]
                    defmt::error!("band {} exceeds the render buffer", band_area);
                    return;
                }

                render_band(&mut self.buffer[..count], band_area, &self.widgets, root, &colors);

                let mut done = FlushFlag(false);
                display.flush(&band_area, &self.buffer[..count], &mut done);
                if !done.0 {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("display sink returned without signalling completion");
                }
                self.flushes = self.flushes.wrapping_add(1);
                y = band_area.y2 + 1;
            }
        }
    }
}

/// Check if a periodic job is due
fn due(last: Option<u32>, now: u32, period: u32) -> bool {
    match last {
        None => true,
        Some(at) => now.wrapping_sub(at) >= period,
    }
}

/// Resolve a widget's screen-space bounds through its parent chain
fn bounds(widgets: &[Widget], index: usize) -> Option<Area> {
    let widget = widgets.get(index)?;
    let (width, height) = size_of(widget);
    let Geometry { x, y, .. } = widget.geometry;
    let (x, y) = (x as i32, y as i32);

    let (left, top) = match widget.parent {
        None => (x, y),
        Some(parent) => {
            let outer = bounds(widgets, parent as usize)?;
            match widget.align {
                Align::TopLeft => (outer.x1 + x, outer.y1 + y),
                Align::Center => (
                    outer.x1 + (outer.width() as i32 - width as i32) / 2 + x,
                    outer.y1 + (outer.height() as i32 - height as i32) / 2 + y,
                ),
            }
        }
    };
    Area::from_origin(left, top, width, height)
}

fn size_of(widget: &Widget) -> (u32, u32) {
    let (content_w, content_h) = text_size(&widget.text, &widget.style);
    let resolve = |dim: Dim, content: u32| match dim {
        Dim::Px(px) => px as u32,
        Dim::Content => content,
    };
    (
        resolve(widget.geometry.width, content_w),
        resolve(widget.geometry.height, content_h),
    )
}

fn render_band(pixels: &mut [u16], area: Area, widgets: &[Widget], root: u16, colors: &Colors) {
    let Some(mut band) = Band::new(pixels, area) else {
        return;
    };
    for (index, widget) in widgets.iter().enumerate() {
        if widget.root != root {
            continue;
        }
        let Some(bounds) = bounds(widgets, index) else {
            continue;
        };
        if bounds.intersect(&area).is_none() {
            continue;
        }
        match draw_widget(&mut band, widget, &bounds, colors) {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }
}

impl WidgetTree for SceneEngine<'_> {
    type Error = SceneError;

    fn create(
        &mut self,
        kind: WidgetKind,
        parent: Option<WidgetHandle>,
    ) -> Result<WidgetHandle, SceneError> {
        let index = self.widgets.len() as u16;
        let root = match (kind, parent) {
            (WidgetKind::Screen, None) => index,
            (WidgetKind::Screen, Some(_)) | (_, None) => return Err(SceneError::InvalidParent),
            (_, Some(parent)) => self.widgets[self.index(parent)?].root,
        };

        let parent = parent.map(WidgetHandle::raw);
        self.widgets
            .push(Widget::new(kind, parent, root))
            .map_err(|_| SceneError::PoolFull)?;
        Ok(WidgetHandle::from_raw(index))
    }

    fn set_geometry(&mut self, widget: WidgetHandle, geometry: Geometry) -> Result<(), SceneError> {
        self.update(widget, |w| {
            w.geometry = geometry;
            Ok(())
        })
    }

    fn set_text(&mut self, widget: WidgetHandle, text: &str) -> Result<(), SceneError> {
        self.update(widget, |w| {
            if text.chars().count() > w.text_limit() {
                return Err(SceneError::TextTooLong);
            }
            w.text = String::try_from(text).map_err(|_| SceneError::TextTooLong)?;
            Ok(())
        })
    }

    fn set_text_style(&mut self, widget: WidgetHandle, style: TextStyle) -> Result<(), SceneError> {
        self.update(widget, |w| {
            w.style = style;
            Ok(())
        })
    }

    fn set_align(&mut self, widget: WidgetHandle, align: Align) -> Result<(), SceneError> {
        self.update(widget, |w| {
            w.align = align;
            Ok(())
        })
    }

    fn set_scrollable(&mut self, widget: WidgetHandle, scrollable: bool) -> Result<(), SceneError> {
        let index = self.index(widget)?;
        self.widgets[index].scrollable = scrollable;
        Ok(())
    }

    fn configure_text_area(
        &mut self,
        widget: WidgetHandle,
        options: TextAreaOptions,
    ) -> Result<(), SceneError> {
        if options.max_length as usize > MAX_TEXT {
            return Err(SceneError::TextTooLong);
        }
        self.update(widget, |w| {
            w.text_area = Some(options);
            Ok(())
        })
    }

    fn attach_event(&mut self, widget: WidgetHandle, binding: EventBinding) -> Result<(), SceneError> {
        let index = self.index(widget)?;
        self.widgets[index].binding = Some(binding);
        Ok(())
    }
}

impl GuiEngine for SceneEngine<'_> {
    fn register_display(&mut self, registration: DisplayRegistration) -> Result<(), SceneError> {
        let row = registration.width as usize;
        if registration.buffer_pixels > self.buffer.len() || registration.buffer_pixels < row {
            return Err(SceneError::BufferTooSmall);
        }
        self.display = Some(registration);
        if let Some(area) = Area::full(registration.width, registration.height) {
            self.mark_dirty(area);
        }
        Ok(())
    }

    fn register_pointer(&mut self) -> Result<(), SceneError> {
        self.pointer_enabled = true;
        Ok(())
    }

    fn apply_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    fn tick_inc(&mut self, elapsed_ms: u32) {
        self.now_ms = self.now_ms.wrapping_add(elapsed_ms);
    }

    fn timer_handler(&mut self, io: EngineIo<'_>) {
        let EngineIo {
            display,
            pointer,
            events,
        } = io;

        if self.pointer_enabled && due(self.last_input, self.now_ms, INPUT_PERIOD_MS) {
            self.last_input = Some(self.now_ms);
            let sample = pointer.read_pointer();
            self.handle_pointer(sample, events);
        }

        if !self.dirty.is_empty() && due(self.last_refresh, self.now_ms, REFRESH_PERIOD_MS) {
            self.last_refresh = Some(self.now_ms);
            self.refresh(display);
        }
    }

    fn invalidate(&mut self, area: Area) {
        self.mark_dirty(area);
    }

    fn load_screen(&mut self, screen: WidgetHandle) -> Result<(), SceneError> {
        let index = self.index(screen)?;
        if self.widgets[index].kind != WidgetKind::Screen {
            return Err(SceneError::NotScreen);
        }
        // A press held across a screen change never completes
        if let Some(target) = self.pointer.target.take() {
            self.widgets[target as usize].pressed = false;
        }
        self.active = Some(index as u16);
        if let Some(registration) = self.display {
            if let Some(area) = Area::full(registration.width, registration.height) {
                self.mark_dirty(area);
            }
        }
        Ok(())
    }
}
