//! Geometry of the default dialog box layout.
//!
//! These functions only compute rectangles, they never draw. Custom draw hooks can
//! use them to stay aligned with the default look.

use bevy::math::{Rect, Vec2};

use crate::prelude::{DialogConfig, NamePosition};

/// The panel the dialog is drawn in.
///
/// It spans the viewport width minus the horizontal margins, capped at
/// `max_width`, is centered horizontally and sits `margin_y` above the bottom edge.
pub fn panel_rect(config: &DialogConfig, viewport: Vec2) -> Rect {
    let available = (viewport.x - 2.0 * config.margin_x).max(0.0);
    let width = config
        .max_width
        .map_or(available, |max_width| available.min(max_width.max(0.0)));
    let x = (viewport.x - width) / 2.0;
    let y = viewport.y - config.margin_y - config.box_height;
    Rect::new(x, y, x + width, y + config.box_height)
}

/// Where the name and the body text go inside the panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentLayout {
    /// Top-left corner of the name, if a name is shown.
    pub name_origin: Option<Vec2>,
    /// The area the body text is wrapped in.
    pub text_area: Rect,
}

/// Splits the panel between name and text.
///
/// `name_size` is the measured size of the name in the name font, `None` when the
/// node has no name.
pub fn content_layout(
    panel: Rect,
    padding: f32,
    position: NamePosition,
    name_size: Option<Vec2>,
) -> ContentLayout {
    let inner = Rect {
        min: panel.min + Vec2::splat(padding),
        max: (panel.max - Vec2::splat(padding)).max(panel.min + Vec2::splat(padding)),
    };

    match (position, name_size) {
        (NamePosition::Top, Some(size)) => ContentLayout {
            name_origin: Some(inner.min),
            text_area: Rect {
                min: Vec2::new(inner.min.x, (inner.min.y + size.y + padding / 2.0).min(inner.max.y)),
                max: inner.max,
            },
        },
        (NamePosition::Left, Some(size)) => ContentLayout {
            name_origin: Some(inner.min),
            text_area: Rect {
                min: Vec2::new((inner.min.x + size.x + padding / 2.0).min(inner.max.x), inner.min.y),
                max: inner.max,
            },
        },
        _ => ContentLayout {
            name_origin: None,
            text_area: inner,
        },
    }
}

/// Width of a choice box holding text `text_width` wide.
pub fn choice_width(text_width: f32, config: &DialogConfig) -> f32 {
    (text_width + 2.0 * config.choice_padding).max(config.choice_min_width)
}

/// Height of a choice box for a font with the given line height.
pub fn choice_height(line_height: f32, config: &DialogConfig) -> f32 {
    line_height + 2.0 * config.choice_padding
}

/// Stacks choice boxes of the given widths vertically, centered on the panel and
/// ending `spacing` above its top edge. The first choice is the topmost.
pub fn stack_choices(widths: &[f32], height: f32, spacing: f32, panel: Rect) -> Vec<Rect> {
    let count = widths.len();
    if count == 0 {
        return Vec::new();
    }

    let total = count as f32 * height + (count - 1) as f32 * spacing;
    let center = panel.center().x;
    let mut top = panel.min.y - spacing - total;

    widths
        .iter()
        .map(|width| {
            let rect = Rect::new(center - width / 2.0, top, center + width / 2.0, top + height);
            top += height + spacing;
            rect
        })
        .collect()
}
