//! The drawing side of a dialog box.
//!
//! The dialog box never talks to a graphics API directly. The host implements
//! [`Renderer`] on top of whatever it draws with and [`FontProvider`] on top of its
//! font loading, and passes them in when the dialog box needs them.

use std::path::Path;

use bevy::math::{Rect, Vec2};
use serde::Deserialize;

use crate::prelude::Rgba;

pub(crate) mod draw;
pub mod layout;

/// A font known to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct FontHandle(pub u32);

/// An image known to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct ImageHandle(pub u32);

/// Immediate mode drawing primitives provided by the host.
///
/// Coordinates are in pixels with the origin at the top-left corner of the viewport
/// and y growing downwards.
pub trait Renderer {
    /// Size of the drawable area.
    fn viewport_size(&self) -> Vec2;

    /// The color used by the next drawing calls.
    fn color(&self) -> Rgba;

    /// Sets the color used by the next drawing calls.
    fn set_color(&mut self, color: Rgba);

    /// The font used by the next text calls.
    fn font(&self) -> FontHandle;

    /// Sets the font used by the next text calls.
    fn set_font(&mut self, font: FontHandle);

    /// Height of a line of text in the current font.
    fn line_height(&self) -> f32;

    /// Width of `text` on a single line in the current font.
    fn text_width(&self, text: &str) -> f32;

    /// Fills a rectangle with the current color.
    fn fill_rect(&mut self, rect: Rect, corner_radius: f32);

    /// Outlines a rectangle with the current color.
    fn stroke_rect(&mut self, rect: Rect, line_width: f32, corner_radius: f32);

    /// Draws `text` on a single line with its top-left corner at `position`.
    fn print(&mut self, text: &str, position: Vec2);

    /// Draws `text` starting at `position`, breaking lines so that none is wider than `wrap_width`.
    fn print_wrapped(&mut self, text: &str, position: Vec2, wrap_width: f32);

    /// Natural size of an image.
    fn image_size(&self, image: ImageHandle) -> Vec2;

    /// Draws an image with its top-left corner at `position`, scaled on each axis by `scale`.
    fn draw_image(&mut self, image: ImageHandle, position: Vec2, scale: Vec2);

    /// Restricts the next drawing calls to `clip`, or lifts the restriction with `None`.
    fn set_clip(&mut self, clip: Option<Rect>);
}

/// Hands out font handles.
pub trait FontProvider {
    /// Loads the font at `path` with the given point size, or the engine default font
    /// at that size when `path` is `None`.
    fn load_font(&mut self, path: Option<&Path>, size: f32) -> FontHandle;
}
