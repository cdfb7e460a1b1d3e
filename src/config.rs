//! Presentation settings of a dialog box.
//!
//! [`DialogConfig`] holds every knob with its default value. Changes are applied with
//! a [`ConfigPatch`], which only overwrites the keys it carries (a shallow merge).
//! Patches can be written by hand or loaded from RON theme files.

use std::{path::PathBuf, sync::Arc};

use bevy::math::{Rect, Vec2};
use serde::Deserialize;

use crate::prelude::{Callback, Choice, ImageHandle, Renderer};

/// A color with red, green, blue and alpha channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Rgba {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a color from its four channels.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::WHITE
    }
}

/// Where the speaker name goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum NamePosition {
    /// On its own line above the text.
    #[default]
    Top,
    /// Before the text, on the same line.
    Left,
    /// Not drawn.
    None,
}

/// How the background image covers the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum BackgroundMode {
    /// Scaled on both axes to the panel size.
    #[default]
    Stretch,
    /// Scaled uniformly to fit inside the panel.
    Fit,
    /// Scaled uniformly to cover the whole panel, cropped.
    Fill,
    /// Repeated at its natural size, cropped.
    Tile,
}

/// Alpha multipliers used for the choice boxes of the default theme.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ChoiceTheme {
    /// Fill alpha of the selected choice.
    pub selected_fill_alpha: f32,
    /// Fill alpha of the other choices.
    pub unselected_fill_alpha: f32,
    /// Border alpha of the selected choice.
    pub selected_border_alpha: f32,
    /// Border alpha of the other choices.
    pub unselected_border_alpha: f32,
}

impl Default for ChoiceTheme {
    fn default() -> Self {
        Self {
            selected_fill_alpha: 0.3,
            unselected_fill_alpha: 0.05,
            selected_border_alpha: 0.8,
            unselected_border_alpha: 0.4,
        }
    }
}

/// Draws the background panel. Receives the panel rectangle.
pub type BackgroundHook = Callback<dyn Fn(&mut dyn Renderer, Rect) + Send + Sync>;

/// Draws the body text. Receives the revealed text and the area it may use.
pub type TextHook = Callback<dyn Fn(&mut dyn Renderer, &str, Rect) + Send + Sync>;

/// Draws the speaker name. Receives the name and its top-left corner.
pub type NameHook = Callback<dyn Fn(&mut dyn Renderer, &str, Vec2) + Send + Sync>;

/// Draws the choices. Receives the choices, the 1-based selected index and the panel
/// rectangle, and returns one hit rectangle per choice, in order.
pub type ChoicesHook =
    Callback<dyn Fn(&mut dyn Renderer, &[Choice], usize, Rect) -> Vec<Rect> + Send + Sync>;

/// Builds a [`BackgroundHook`].
pub fn background_hook(f: impl Fn(&mut dyn Renderer, Rect) + Send + Sync + 'static) -> BackgroundHook {
    Callback(Arc::new(f))
}

/// Builds a [`TextHook`].
pub fn text_hook(f: impl Fn(&mut dyn Renderer, &str, Rect) + Send + Sync + 'static) -> TextHook {
    Callback(Arc::new(f))
}

/// Builds a [`NameHook`].
pub fn name_hook(f: impl Fn(&mut dyn Renderer, &str, Vec2) + Send + Sync + 'static) -> NameHook {
    Callback(Arc::new(f))
}

/// Builds a [`ChoicesHook`].
pub fn choices_hook(
    f: impl Fn(&mut dyn Renderer, &[Choice], usize, Rect) -> Vec<Rect> + Send + Sync + 'static,
) -> ChoicesHook {
    Callback(Arc::new(f))
}

/// Every setting of a dialog box.
#[derive(Debug, Clone)]
pub struct DialogConfig {
    /// Seconds per revealed character. Zero or less shows the text at once.
    pub text_speed: f32,
    /// Fill color of the panel.
    pub background_color: Rgba,
    /// Image drawn over the panel fill.
    pub background_image: Option<ImageHandle>,
    /// How the background image covers the panel.
    pub background_mode: BackgroundMode,
    /// Color of the body text.
    pub text_color: Rgba,
    /// Color of the speaker name.
    pub name_color: Rgba,
    /// Color of unselected choices.
    pub choice_color: Rgba,
    /// Color of the selected choice.
    pub choice_selected_color: Rgba,
    /// Point size of the body font.
    pub font_size: f32,
    /// File of the body font. `None` uses the engine default.
    pub font_path: Option<PathBuf>,
    /// Point size of the name font.
    pub name_font_size: f32,
    /// File of the name font. `None` uses the engine default.
    pub name_font_path: Option<PathBuf>,
    /// Space between the panel edge and its content.
    pub padding: f32,
    /// Height of the panel.
    pub box_height: f32,
    /// Upper bound on the panel width.
    pub max_width: Option<f32>,
    /// Space kept free on the left and right of the panel.
    pub margin_x: f32,
    /// Space kept free below the panel.
    pub margin_y: f32,
    /// Whether the panel is drawn at all.
    pub show_background: bool,
    /// Where the speaker name goes.
    pub name_position: NamePosition,
    /// Width of the panel border. Zero disables it.
    pub border_width: f32,
    /// Color of the panel border.
    pub border_color: Rgba,
    /// Corner radius passed along to the renderer.
    pub corner_radius: f32,
    /// Narrowest a choice box can be.
    pub choice_min_width: f32,
    /// Space between a choice box edge and its text.
    pub choice_padding: f32,
    /// Vertical gap between choice boxes.
    pub choice_spacing: f32,
    /// Alpha multipliers of the choice boxes.
    pub choice_theme: ChoiceTheme,
    /// Replaces the default background drawing.
    pub draw_background: Option<BackgroundHook>,
    /// Replaces the default text drawing.
    pub draw_text: Option<TextHook>,
    /// Replaces the default name drawing.
    pub draw_name: Option<NameHook>,
    /// Replaces the default choices drawing.
    pub draw_choices: Option<ChoicesHook>,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            text_speed: 0.05,
            background_color: Rgba::new(0.0, 0.0, 0.0, 0.8),
            background_image: None,
            background_mode: BackgroundMode::Stretch,
            text_color: Rgba::WHITE,
            name_color: Rgba::new(1.0, 0.85, 0.4, 1.0),
            choice_color: Rgba::new(0.85, 0.85, 0.85, 1.0),
            choice_selected_color: Rgba::new(1.0, 1.0, 0.4, 1.0),
            font_size: 16.0,
            font_path: None,
            name_font_size: 18.0,
            name_font_path: None,
            padding: 16.0,
            box_height: 150.0,
            max_width: None,
            margin_x: 20.0,
            margin_y: 20.0,
            show_background: true,
            name_position: NamePosition::Top,
            border_width: 2.0,
            border_color: Rgba::WHITE,
            corner_radius: 0.0,
            choice_min_width: 200.0,
            choice_padding: 8.0,
            choice_spacing: 6.0,
            choice_theme: ChoiceTheme::default(),
            draw_background: None,
            draw_text: None,
            draw_name: None,
            draw_choices: None,
        }
    }
}

/// Which fonts have to be acquired again after a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FontChanges {
    /// The body font size or path was set.
    pub body: bool,
    /// The name font size or path was set.
    pub name: bool,
}

impl DialogConfig {
    /// Overwrites the keys present in `patch`, leaving the others untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use bevy_dialog_box::prelude::*;
    ///
    /// let mut config = DialogConfig::default();
    /// let changes = config.merge(ConfigPatch {
    ///     text_speed: Some(0.1),
    ///     font_size: Some(24.0),
    ///     ..Default::default()
    /// });
    ///
    /// assert_eq!(config.text_speed, 0.1);
    /// assert_eq!(config.box_height, 150.0);
    /// assert!(changes.body);
    /// assert!(!changes.name);
    /// ```
    pub fn merge(&mut self, patch: ConfigPatch) -> FontChanges {
        let changes = FontChanges {
            body: patch.font_size.is_some() || patch.font_path.is_some(),
            name: patch.name_font_size.is_some() || patch.name_font_path.is_some(),
        };

        // moves every present field of the patch into the config
        macro_rules! overwrite {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = patch.$field {
                    self.$field = value;
                })*
            };
        }
        macro_rules! overwrite_optional {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = patch.$field {
                    self.$field = Some(value);
                })*
            };
        }

        overwrite!(
            text_speed,
            background_color,
            background_mode,
            text_color,
            name_color,
            choice_color,
            choice_selected_color,
            font_size,
            name_font_size,
            padding,
            box_height,
            margin_x,
            margin_y,
            show_background,
            name_position,
            border_width,
            border_color,
            corner_radius,
            choice_min_width,
            choice_padding,
            choice_spacing,
            choice_theme,
        );
        overwrite_optional!(
            background_image,
            font_path,
            name_font_path,
            max_width,
            draw_background,
            draw_text,
            draw_name,
            draw_choices,
        );

        changes
    }
}

/// A partial [`DialogConfig`]: only the keys that are `Some` are applied.
///
/// Everything but the draw hooks can be read from RON:
///
/// ```
/// use bevy_dialog_box::prelude::*;
///
/// let patch = ConfigPatch::from_ron(
///     "(text_speed: Some(0.02), name_position: Some(Left))",
/// ).unwrap();
/// assert_eq!(patch.text_speed, Some(0.02));
/// assert_eq!(patch.name_position, Some(NamePosition::Left));
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigPatch {
    /// See [`DialogConfig::text_speed`].
    pub text_speed: Option<f32>,
    /// See [`DialogConfig::background_color`].
    pub background_color: Option<Rgba>,
    /// See [`DialogConfig::background_image`].
    pub background_image: Option<ImageHandle>,
    /// See [`DialogConfig::background_mode`].
    pub background_mode: Option<BackgroundMode>,
    /// See [`DialogConfig::text_color`].
    pub text_color: Option<Rgba>,
    /// See [`DialogConfig::name_color`].
    pub name_color: Option<Rgba>,
    /// See [`DialogConfig::choice_color`].
    pub choice_color: Option<Rgba>,
    /// See [`DialogConfig::choice_selected_color`].
    pub choice_selected_color: Option<Rgba>,
    /// See [`DialogConfig::font_size`].
    pub font_size: Option<f32>,
    /// See [`DialogConfig::font_path`].
    pub font_path: Option<PathBuf>,
    /// See [`DialogConfig::name_font_size`].
    pub name_font_size: Option<f32>,
    /// See [`DialogConfig::name_font_path`].
    pub name_font_path: Option<PathBuf>,
    /// See [`DialogConfig::padding`].
    pub padding: Option<f32>,
    /// See [`DialogConfig::box_height`].
    pub box_height: Option<f32>,
    /// See [`DialogConfig::max_width`].
    pub max_width: Option<f32>,
    /// See [`DialogConfig::margin_x`].
    pub margin_x: Option<f32>,
    /// See [`DialogConfig::margin_y`].
    pub margin_y: Option<f32>,
    /// See [`DialogConfig::show_background`].
    pub show_background: Option<bool>,
    /// See [`DialogConfig::name_position`].
    pub name_position: Option<NamePosition>,
    /// See [`DialogConfig::border_width`].
    pub border_width: Option<f32>,
    /// See [`DialogConfig::border_color`].
    pub border_color: Option<Rgba>,
    /// See [`DialogConfig::corner_radius`].
    pub corner_radius: Option<f32>,
    /// See [`DialogConfig::choice_min_width`].
    pub choice_min_width: Option<f32>,
    /// See [`DialogConfig::choice_padding`].
    pub choice_padding: Option<f32>,
    /// See [`DialogConfig::choice_spacing`].
    pub choice_spacing: Option<f32>,
    /// See [`DialogConfig::choice_theme`].
    pub choice_theme: Option<ChoiceTheme>,
    /// See [`DialogConfig::draw_background`].
    #[serde(skip)]
    pub draw_background: Option<BackgroundHook>,
    /// See [`DialogConfig::draw_text`].
    #[serde(skip)]
    pub draw_text: Option<TextHook>,
    /// See [`DialogConfig::draw_name`].
    #[serde(skip)]
    pub draw_name: Option<NameHook>,
    /// See [`DialogConfig::draw_choices`].
    #[serde(skip)]
    pub draw_choices: Option<ChoicesHook>,
}

impl ConfigPatch {
    /// Reads a patch from a RON string.
    pub fn from_ron(source: &str) -> Result<Self, serde_ron::error::SpannedError> {
        serde_ron::from_str(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_is_shallow() {
        let mut config = DialogConfig {
            max_width: Some(600.0),
            ..Default::default()
        };
        config.merge(ConfigPatch {
            padding: Some(4.0),
            ..Default::default()
        });
        config.merge(ConfigPatch {
            box_height: Some(90.0),
            ..Default::default()
        });

        assert_eq!(config.padding, 4.0);
        assert_eq!(config.box_height, 90.0);
        assert_eq!(config.max_width, Some(600.0));
        assert_eq!(config.text_speed, 0.05);
    }

    #[test]
    fn font_changes_follow_present_keys() {
        let mut config = DialogConfig::default();

        let changes = config.merge(ConfigPatch {
            name_font_path: Some(PathBuf::from("fonts/title.ttf")),
            ..Default::default()
        });
        assert_eq!(
            changes,
            FontChanges {
                body: false,
                name: true
            }
        );

        let changes = config.merge(ConfigPatch {
            text_color: Some(Rgba::BLACK),
            ..Default::default()
        });
        assert_eq!(changes, FontChanges::default());
    }

    #[test]
    fn merge_installs_hooks() {
        let mut config = DialogConfig::default();
        config.merge(ConfigPatch {
            draw_background: Some(background_hook(|_, _| {})),
            ..Default::default()
        });
        assert!(config.draw_background.is_some());
        assert!(config.draw_text.is_none());
    }

    #[test]
    fn theme_patch_from_ron() {
        let patch = ConfigPatch::from_ron(
            r#"#![enable(implicit_some)]
            (
                background_color: (r: 0.1, g: 0.1, b: 0.2, a: 0.9),
                background_mode: Tile,
                max_width: 640.0,
                font_path: "fonts/body.ttf",
                choice_theme: (
                    selected_fill_alpha: 0.5,
                    unselected_fill_alpha: 0.0,
                    selected_border_alpha: 1.0,
                    unselected_border_alpha: 0.2,
                ),
            )"#,
        )
        .unwrap();

        assert_eq!(patch.background_color, Some(Rgba::new(0.1, 0.1, 0.2, 0.9)));
        assert_eq!(patch.background_mode, Some(BackgroundMode::Tile));
        assert_eq!(patch.max_width, Some(640.0));
        assert_eq!(patch.font_path, Some(PathBuf::from("fonts/body.ttf")));
        assert_eq!(patch.choice_theme.map(|t| t.selected_fill_alpha), Some(0.5));
        assert!(patch.text_speed.is_none());
    }

    #[test]
    fn bundled_theme_applies() {
        let patch =
            ConfigPatch::from_ron(include_str!("../assets/themes/parchment.theme.ron")).unwrap();
        let mut config = DialogConfig::default();
        let fonts = config.merge(patch);

        assert_eq!(config.name_position, NamePosition::Left);
        assert_eq!(config.max_width, Some(720.0));
        assert_eq!(config.text_speed, 0.03);
        assert_eq!(config.font_size, DialogConfig::default().font_size);
        assert_eq!(fonts, FontChanges::default());
    }

    #[test]
    fn unknown_theme_keys_are_rejected() {
        assert!(ConfigPatch::from_ron("(text_sped: Some(0.1))").is_err());
    }
}
