//! Display controller abstractions
//!
//! Models the write path of an SPI/parallel TFT controller: open a write
//! transaction, address a window, stream pixels, close the transaction.

/// Display controller write interface
///
/// Implementations own the bus. Calls are blocking; the caller stalls for
/// the duration of the transfer.
pub trait PanelController {
    /// Error type for controller transport operations
    type Error;

    /// Open a write transaction
    fn begin_write(&mut self) -> Result<(), Self::Error>;

    /// Address a rectangular window for the following pixel stream
    ///
    /// - `x`, `y`: Top-left corner in panel pixels
    /// - `width`, `height`: Window size in pixels (both non-zero)
    fn set_address_window(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    ) -> Result<(), Self::Error>;

    /// Stream pixels into the addressed window
    ///
    /// Pixels are in the controller's native 16-bit encoding. When
    /// `swap_bytes` is set each pixel is sent high byte first.
    fn push_pixels(&mut self, pixels: &[u16], swap_bytes: bool) -> Result<(), Self::Error>;

    /// Close the write transaction
    fn end_write(&mut self) -> Result<(), Self::Error>;

    /// Get the panel dimensions in pixels (width, height) for the current rotation
    fn dimensions(&self) -> (u16, u16);
}
