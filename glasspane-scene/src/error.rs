//! Scene engine errors

/// Errors raised by scene construction and screen loading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SceneError {
    /// Widget pool is full
    PoolFull,
    /// Handle does not name a widget
    UnknownWidget,
    /// Screens cannot have parents; other widgets need one
    InvalidParent,
    /// Text exceeds the widget's storage or text-area limit
    TextTooLong,
    /// Only screen widgets can be loaded
    NotScreen,
    /// Display registration does not fit the draw buffer
    BufferTooSmall,
}
