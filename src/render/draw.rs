//! Default drawing of a dialog box.

use bevy::{
    log::warn,
    math::{Rect, Vec2},
};

use crate::prelude::{
    layout, BackgroundMode, Choice, DialogConfig, FontHandle, ImageHandle, NamePosition, Renderer,
    Rgba,
};

/// Fonts owned by a dialog box. `None` means whatever font the renderer had.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Fonts {
    /// Font of the body text and the choices.
    pub(crate) body: Option<FontHandle>,
    /// Font of the speaker name.
    pub(crate) name: Option<FontHandle>,
}

/// What is on screen this frame.
#[derive(Debug)]
pub(crate) struct Frame<'a> {
    /// Speaker name of the current node.
    pub(crate) name: Option<&'a str>,
    /// The revealed part of the text.
    pub(crate) text: &'a str,
    /// Choices of the current node.
    pub(crate) choices: &'a [Choice],
    /// The 1-based selected choice.
    pub(crate) selected: usize,
    /// Whether the choices are shown (the text is fully revealed).
    pub(crate) show_choices: bool,
}

/// Draws name, text and choices, in that order, and returns the hit rectangles of the choices.
///
/// Each region is drawn by its hook when the config has one. Draw color and font are
/// restored before returning.
pub(crate) fn draw_dialog(
    renderer: &mut dyn Renderer,
    config: &DialogConfig,
    fonts: Fonts,
    frame: &Frame,
) -> Vec<Rect> {
    let saved_color = renderer.color();
    let saved_font = renderer.font();

    let panel = layout::panel_rect(config, renderer.viewport_size());

    if config.show_background {
        match &config.draw_background {
            Some(hook) => (hook.0)(renderer, panel),
            None => draw_background(renderer, config, panel),
        }
    }

    let name = frame
        .name
        .filter(|_| config.name_position != NamePosition::None);
    let name_size = name.map(|name| {
        renderer.set_font(fonts.name.unwrap_or(saved_font));
        Vec2::new(renderer.text_width(name), renderer.line_height())
    });
    let content = layout::content_layout(panel, config.padding, config.name_position, name_size);

    if let (Some(name), Some(origin)) = (name, content.name_origin) {
        match &config.draw_name {
            Some(hook) => (hook.0)(renderer, name, origin),
            None => {
                renderer.set_font(fonts.name.unwrap_or(saved_font));
                renderer.set_color(config.name_color);
                renderer.print(name, origin);
            }
        }
    }

    match &config.draw_text {
        Some(hook) => (hook.0)(renderer, frame.text, content.text_area),
        None => {
            renderer.set_font(fonts.body.unwrap_or(saved_font));
            renderer.set_color(config.text_color);
            renderer.print_wrapped(frame.text, content.text_area.min, content.text_area.width());
        }
    }

    let bounds = if frame.show_choices && !frame.choices.is_empty() {
        match &config.draw_choices {
            Some(hook) => (hook.0)(renderer, frame.choices, frame.selected, panel),
            None => {
                renderer.set_font(fonts.body.unwrap_or(saved_font));
                draw_choices(renderer, config, frame, panel)
            }
        }
    } else {
        Vec::new()
    };

    renderer.set_font(saved_font);
    renderer.set_color(saved_color);
    bounds
}

/// Panel fill, then the background image, then the border.
fn draw_background(renderer: &mut dyn Renderer, config: &DialogConfig, panel: Rect) {
    renderer.set_color(config.background_color);
    renderer.fill_rect(panel, config.corner_radius);

    if let Some(image) = config.background_image {
        renderer.set_color(Rgba::WHITE);
        draw_background_image(renderer, image, config.background_mode, panel);
    }

    if config.border_width > 0.0 {
        renderer.set_color(config.border_color);
        renderer.stroke_rect(panel, config.border_width, config.corner_radius);
    }
}

/// Draws `image` over `panel` according to `mode`.
fn draw_background_image(
    renderer: &mut dyn Renderer,
    image: ImageHandle,
    mode: BackgroundMode,
    panel: Rect,
) {
    let image_size = renderer.image_size(image);
    if image_size.x <= 0.0 || image_size.y <= 0.0 {
        warn!("Background image {:?} has no size, skipping it", image);
        return;
    }
    let panel_size = panel.size();

    match mode {
        BackgroundMode::Stretch => {
            renderer.draw_image(image, panel.min, panel_size / image_size);
        }
        BackgroundMode::Fit => {
            let scale = (panel_size / image_size).min_element();
            let offset = (panel_size - image_size * scale) / 2.0;
            renderer.draw_image(image, panel.min + offset, Vec2::splat(scale));
        }
        BackgroundMode::Fill => {
            let scale = (panel_size / image_size).max_element();
            let offset = (panel_size - image_size * scale) / 2.0;
            renderer.set_clip(Some(panel));
            renderer.draw_image(image, panel.min + offset, Vec2::splat(scale));
            renderer.set_clip(None);
        }
        BackgroundMode::Tile => {
            // tiles are at least a pixel apart
            let step = image_size.max(Vec2::ONE);
            renderer.set_clip(Some(panel));
            let mut y = panel.min.y;
            while y < panel.max.y {
                let mut x = panel.min.x;
                while x < panel.max.x {
                    renderer.draw_image(image, Vec2::new(x, y), Vec2::ONE);
                    x += step.x;
                }
                y += step.y;
            }
            renderer.set_clip(None);
        }
    }
}

/// Draws the choice boxes stacked above the panel and returns their rectangles.
fn draw_choices(
    renderer: &mut dyn Renderer,
    config: &DialogConfig,
    frame: &Frame,
    panel: Rect,
) -> Vec<Rect> {
    let text_widths: Vec<f32> = frame
        .choices
        .iter()
        .map(|choice| renderer.text_width(&choice.text))
        .collect();
    let box_widths: Vec<f32> = text_widths
        .iter()
        .map(|width| layout::choice_width(*width, config))
        .collect();
    let height = layout::choice_height(renderer.line_height(), config);
    let rects = layout::stack_choices(&box_widths, height, config.choice_spacing, panel);

    let theme = config.choice_theme;
    for (i, ((choice, rect), text_width)) in frame
        .choices
        .iter()
        .zip(&rects)
        .zip(&text_widths)
        .enumerate()
    {
        let (color, fill_alpha, border_alpha) = if i + 1 == frame.selected {
            (
                config.choice_selected_color,
                theme.selected_fill_alpha,
                theme.selected_border_alpha,
            )
        } else {
            (
                config.choice_color,
                theme.unselected_fill_alpha,
                theme.unselected_border_alpha,
            )
        };

        renderer.set_color(color.with_alpha(color.a * fill_alpha));
        renderer.fill_rect(*rect, config.corner_radius);
        renderer.set_color(color.with_alpha(color.a * border_alpha));
        renderer.stroke_rect(*rect, 1.0, config.corner_radius);

        renderer.set_color(color);
        let position = Vec2::new(
            rect.center().x - text_width / 2.0,
            rect.min.y + config.choice_padding,
        );
        renderer.print(&choice.text, position);
    }

    rects
}
