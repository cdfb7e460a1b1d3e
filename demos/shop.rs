//! A shopkeeper conversation drawn with sprites, gizmos and 2D text.
//!
//! Return or Space advances, Up and Down move the highlight, Escape closes.
//! The mouse highlights and picks choices. Press R to talk again.

use std::path::Path;

use bevy::{prelude::*, sprite::Anchor, text::Text2dBounds, window::PrimaryWindow};
use bevy_dialog_box::prelude::*;

/// Runs the shop.
fn main() {
    App::new()
        .add_plugins((DefaultPlugins, DialogBoxPlugin))
        .init_resource::<FontTable>()
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (talk_again, report, draw_dialogs).after(DialogBoxSet),
        )
        .run();
}

/// The script the shopkeeper follows.
#[derive(Resource)]
struct Shop(DialogScript);

/// Fonts handed out so far, indexed by [`FontHandle`].
#[derive(Resource, Default)]
struct FontTable(Vec<(Handle<Font>, f32)>);

impl FontTable {
    /// The Bevy font and point size behind `handle`.
    fn get(&self, handle: FontHandle) -> (Handle<Font>, f32) {
        self.0
            .get(handle.0 as usize)
            .cloned()
            .unwrap_or_else(|| (Handle::default(), 16.0))
    }
}

/// Loads fonts through the asset server and records them in the [`FontTable`].
struct LoadFonts<'a> {
    /// Where font files come from.
    server: &'a AssetServer,
    /// Where loaded fonts go.
    table: &'a mut FontTable,
}

impl FontProvider for LoadFonts<'_> {
    fn load_font(&mut self, path: Option<&Path>, size: f32) -> FontHandle {
        let font = path
            .map(|path| self.server.load(path.to_path_buf()))
            .unwrap_or_default();
        self.table.0.push((font, size));
        FontHandle(self.table.0.len() as u32 - 1)
    }
}

/// Marks the entities spawned to draw the last frame.
#[derive(Component)]
struct Drawn;

/// Something the dialog box asked to draw.
enum Shape {
    /// A filled rectangle.
    Fill(Rect, Color),
    /// A rectangle outline.
    Stroke(Rect, Color),
    /// A line of text, wrapped when a width is given.
    Text {
        /// What to print.
        text: String,
        /// Top-left corner.
        position: Vec2,
        /// Width to wrap at.
        wrap: Option<f32>,
        /// The font to print with.
        font: FontHandle,
        /// The text color.
        color: Color,
    },
}

/// Collects the shapes of one frame, in screen pixels with y growing downwards.
struct FrameRenderer<'a> {
    /// Window size.
    viewport: Vec2,
    /// Current color.
    color: Rgba,
    /// Current font.
    font: FontHandle,
    /// Sizes of the fonts.
    fonts: &'a FontTable,
    /// What was drawn, back to front.
    shapes: Vec<Shape>,
}

impl FrameRenderer<'_> {
    /// Point size of the current font.
    fn font_size(&self) -> f32 {
        self.fonts.get(self.font).1
    }

    /// The current color as a Bevy color.
    fn bevy_color(&self) -> Color {
        Color::rgba(self.color.r, self.color.g, self.color.b, self.color.a)
    }
}

impl Renderer for FrameRenderer<'_> {
    fn viewport_size(&self) -> Vec2 {
        self.viewport
    }

    fn color(&self) -> Rgba {
        self.color
    }

    fn set_color(&mut self, color: Rgba) {
        self.color = color;
    }

    fn font(&self) -> FontHandle {
        self.font
    }

    fn set_font(&mut self, font: FontHandle) {
        self.font = font;
    }

    fn line_height(&self) -> f32 {
        self.font_size() * 1.2
    }

    // Bevy lays text out after this frame, so widths are estimated.
    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.font_size() * 0.5
    }

    fn fill_rect(&mut self, rect: Rect, _corner_radius: f32) {
        let color = self.bevy_color();
        self.shapes.push(Shape::Fill(rect, color));
    }

    fn stroke_rect(&mut self, rect: Rect, _line_width: f32, _corner_radius: f32) {
        let color = self.bevy_color();
        self.shapes.push(Shape::Stroke(rect, color));
    }

    fn print(&mut self, text: &str, position: Vec2) {
        self.shapes.push(Shape::Text {
            text: text.to_string(),
            position,
            wrap: None,
            font: self.font,
            color: self.bevy_color(),
        });
    }

    fn print_wrapped(&mut self, text: &str, position: Vec2, wrap_width: f32) {
        self.shapes.push(Shape::Text {
            text: text.to_string(),
            position,
            wrap: Some(wrap_width),
            font: self.font,
            color: self.bevy_color(),
        });
    }

    fn image_size(&self, _image: ImageHandle) -> Vec2 {
        Vec2::ZERO
    }

    fn draw_image(&mut self, _image: ImageHandle, _position: Vec2, _scale: Vec2) {}

    fn set_clip(&mut self, _clip: Option<Rect>) {}
}

/// Spawns the camera and the shopkeeper's dialog box.
fn setup(mut commands: Commands, server: Res<AssetServer>, mut fonts: ResMut<FontTable>) {
    commands.spawn(Camera2dBundle::default());

    let raw = RawDialogScript::from_ron(include_str!("../assets/dialogs/shop.dialog.ron"))
        .expect("the shop script is valid RON");
    let script = DialogScript::build(&raw).expect("the shop script links");

    let mut dialog = DialogBox::new(DialogConfig {
        text_speed: 0.03,
        choice_min_width: 260.0,
        ..default()
    });
    dialog.load_fonts(&mut LoadFonts {
        server: &server,
        table: &mut fonts,
    });
    dialog.start_script(&script);

    commands.spawn(dialog);
    commands.insert_resource(Shop(script));
}

/// Starts the conversation over when R is pressed and nothing is shown.
fn talk_again(keys: Res<Input<KeyCode>>, shop: Res<Shop>, mut dialogs: Query<&mut DialogBox>) {
    if !keys.just_pressed(KeyCode::R) {
        return;
    }
    for mut dialog in &mut dialogs {
        if !dialog.is_active() {
            dialog.start_script(&shop.0);
        }
    }
}

/// Logs what the player picked.
fn report(mut choices: EventReader<DialogChoiceEvent>, mut ends: EventReader<DialogEndEvent>) {
    for choice in choices.read() {
        info!(
            "Picked choice {} with key {:?} and value {:?}",
            choice.index, choice.key, choice.value
        );
    }
    for _ in ends.read() {
        info!("The shopkeeper is done talking, press R to talk again");
    }
}

/// Replaces last frame's sprites and texts with the ones of this frame.
fn draw_dialogs(
    mut commands: Commands,
    mut gizmos: Gizmos,
    windows: Query<&Window, With<PrimaryWindow>>,
    fonts: Res<FontTable>,
    drawn: Query<Entity, With<Drawn>>,
    mut dialogs: Query<&mut DialogBox>,
) {
    for entity in &drawn {
        commands.entity(entity).despawn();
    }
    let Ok(window) = windows.get_single() else {
        return;
    };

    let viewport = Vec2::new(window.width(), window.height());
    let mut renderer = FrameRenderer {
        viewport,
        color: Rgba::WHITE,
        font: FontHandle(0),
        fonts: &fonts,
        shapes: Vec::new(),
    };
    for mut dialog in &mut dialogs {
        dialog.render(&mut renderer);
    }

    let to_world = |point: Vec2| Vec2::new(point.x - viewport.x / 2.0, viewport.y / 2.0 - point.y);
    for (i, shape) in renderer.shapes.into_iter().enumerate() {
        let z = i as f32 * 0.01;
        match shape {
            Shape::Fill(rect, color) => {
                commands.spawn((
                    SpriteBundle {
                        sprite: Sprite {
                            color,
                            custom_size: Some(rect.size()),
                            anchor: Anchor::TopLeft,
                            ..default()
                        },
                        transform: Transform::from_translation(to_world(rect.min).extend(z)),
                        ..default()
                    },
                    Drawn,
                ));
            }
            Shape::Stroke(rect, color) => {
                gizmos.rect_2d(to_world(rect.center()), 0.0, rect.size(), color);
            }
            Shape::Text {
                text,
                position,
                wrap,
                font,
                color,
            } => {
                let (font, font_size) = fonts.get(font);
                commands.spawn((
                    Text2dBundle {
                        text: Text::from_section(
                            text,
                            TextStyle {
                                font,
                                font_size,
                                color,
                            },
                        ),
                        text_anchor: Anchor::TopLeft,
                        text_2d_bounds: Text2dBounds {
                            size: Vec2::new(wrap.unwrap_or(f32::INFINITY), f32::INFINITY),
                        },
                        transform: Transform::from_translation(to_world(position).extend(z)),
                        ..default()
                    },
                    Drawn,
                ));
            }
        }
    }
}
