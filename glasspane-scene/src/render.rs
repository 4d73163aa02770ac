//! Widget drawing
//!
//! Absolute positioning only. Fonts are the built-in mono fonts, picked by
//! the closest requested height; image buttons draw as outlined boxes.

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10, FONT_7X13};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::{Rgb565, Rgb888};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, Rectangle, RoundedRectangle};
use embedded_graphics::text::{Baseline, Text};
use glasspane_core::engine::{Area, TextStyle, Theme, WidgetKind};
use heapless::String;

use crate::widget::{Widget, MAX_TEXT};

/// Inner padding of text areas
const TEXT_AREA_PADDING: i32 = 4;

/// Button corner radius
const BUTTON_RADIUS: u32 = 4;

/// Resolved theme colors
#[derive(Debug, Clone, Copy)]
pub struct Colors {
    /// Screen fill
    pub background: Rgb565,
    /// Text area fill
    pub surface: Rgb565,
    /// Outlines
    pub border: Rgb565,
    /// Button fill
    pub primary: Rgb565,
    /// Button fill while held
    pub pressed: Rgb565,
    /// Text
    pub text: Rgb565,
}

impl Colors {
    /// Resolve a theme into RGB565 colors
    pub fn from_theme(theme: &Theme) -> Self {
        let (background, surface, border, text) = if theme.dark {
            (0x15171A, 0x282B30, 0x5F6368, 0xFFFFFF)
        } else {
            (0xFFFFFF, 0xF5F5F5, 0x9E9E9E, 0x212121)
        };
        Self {
            background: rgb(background),
            surface: rgb(surface),
            border: rgb(border),
            primary: rgb(theme.primary.main_rgb()),
            pressed: rgb(theme.secondary.main_rgb()),
            text: rgb(text),
        }
    }
}

/// Convert 0xRRGGBB (alpha ignored) to RGB565
pub fn rgb(value: u32) -> Rgb565 {
    Rgb565::from(Rgb888::new(
        (value >> 16) as u8,
        (value >> 8) as u8,
        value as u8,
    ))
}

/// Closest built-in font for a requested height
pub fn font_for(style: &TextStyle) -> &'static MonoFont<'static> {
    match style.font_px {
        Some(px) if px >= 18 => &FONT_10X20,
        Some(px) if px <= 11 => &FONT_6X10,
        _ => &FONT_7X13,
    }
}

/// Pixel size of a single line of text
pub fn text_size(text: &str, style: &TextStyle) -> (u32, u32) {
    let font = font_for(style);
    let chars = text.chars().count() as u32;
    let width = chars * (font.character_size.width + font.character_spacing);
    (width, font.character_size.height)
}

fn rectangle(area: &Area) -> Rectangle {
    Rectangle::new(
        Point::new(area.x1, area.y1),
        Size::new(area.width(), area.height()),
    )
}

fn draw_text<D>(
    target: &mut D,
    text: &str,
    origin: Point,
    style: &TextStyle,
    fallback: Rgb565,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let color = style.color.map(rgb).unwrap_or(fallback);
    let text_style = MonoTextStyle::new(font_for(style), color);
    Text::with_baseline(text, origin, text_style, Baseline::Top).draw(target)?;
    Ok(())
}

/// Draw one widget occupying `area`
///
/// Children are drawn separately, after their parent.
pub fn draw_widget<D>(
    target: &mut D,
    widget: &Widget,
    area: &Area,
    colors: &Colors,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let bounds = rectangle(area);
    let fill = if widget.pressed {
        colors.pressed
    } else {
        colors.primary
    };

    match widget.kind {
        WidgetKind::Screen => {
            bounds
                .into_styled(PrimitiveStyleBuilder::new().fill_color(colors.background).build())
                .draw(target)?;
        }
        WidgetKind::Label => {
            draw_text(target, &widget.text, bounds.top_left, &widget.style, colors.text)?;
        }
        WidgetKind::Button => {
            RoundedRectangle::with_equal_corners(bounds, Size::new(BUTTON_RADIUS, BUTTON_RADIUS))
                .into_styled(PrimitiveStyleBuilder::new().fill_color(fill).build())
                .draw(target)?;
        }
        WidgetKind::ImageButton => {
            let style = PrimitiveStyleBuilder::new().stroke_color(fill).stroke_width(2);
            let style = if widget.pressed {
                style.fill_color(colors.surface)
            } else {
                style
            };
            bounds.into_styled(style.build()).draw(target)?;
        }
        WidgetKind::TextArea => {
            bounds
                .into_styled(
                    PrimitiveStyleBuilder::new()
                        .fill_color(colors.surface)
                        .stroke_color(if widget.pressed {
                            colors.primary
                        } else {
                            colors.border
                        })
                        .stroke_width(1)
                        .build(),
                )
                .draw(target)?;

            let origin = bounds.top_left + Point::new(TEXT_AREA_PADDING, TEXT_AREA_PADDING);
            let password = widget.text_area.map(|o| o.password).unwrap_or(false);
            if password {
                let mut masked: String<MAX_TEXT> = String::new();
                for _ in widget.text.chars() {
                    let _ = masked.push('*');
                }
                draw_text(target, &masked, origin, &TextStyle::NONE, colors.text)?;
            } else {
                draw_text(target, &widget.text, origin, &widget.style, colors.text)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glasspane_core::engine::Palette;

    #[test]
    fn test_font_selection() {
        let style = |px| TextStyle {
            font_px: px,
            color: None,
        };
        assert_eq!(font_for(&style(None)).character_size, FONT_7X13.character_size);
        assert_eq!(font_for(&style(Some(48))).character_size, FONT_10X20.character_size);
        assert_eq!(font_for(&style(Some(20))).character_size, FONT_10X20.character_size);
        assert_eq!(font_for(&style(Some(10))).character_size, FONT_6X10.character_size);
    }

    #[test]
    fn test_text_size() {
        assert_eq!(text_size("SAVE", &TextStyle::NONE), (28, 13));
        assert_eq!(text_size("", &TextStyle::NONE), (0, 13));
    }

    #[test]
    fn test_theme_colors() {
        let colors = Colors::from_theme(&Theme::DEFAULT);
        assert_eq!(colors.primary, rgb(Palette::Blue.main_rgb()));
        assert_eq!(colors.pressed, rgb(Palette::Red.main_rgb()));
        assert_eq!(colors.text, Rgb565::WHITE);
    }
}
