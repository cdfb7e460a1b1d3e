//! The dialog box component.
//!
//! A [`DialogBox`] shows one [`DialogNode`] at a time: it reveals the text letter by
//! letter, then either waits for the player to pick one of the node's choices or to
//! dismiss it. Picking a choice moves on to the node the choice leads to, or closes
//! the dialog when there is none.
//!
//! The dialog box is driven by the host once per frame: [`DialogBox::update`] with the
//! elapsed time, the input handlers with what the player did, and
//! [`DialogBox::render`] to draw it. With [`DialogBoxPlugin`](crate::DialogBoxPlugin)
//! the first two happen automatically for every entity with a `DialogBox`.

use std::{fmt, sync::Arc};

use bevy::{
    input::mouse::MouseButton,
    log::{debug, warn},
    math::{Rect, Vec2},
    prelude::Component,
};

use crate::{
    prelude::{
        Choice, ChoiceValue, ConfigPatch, DialogConfig, DialogError, DialogKey, DialogNode,
        DialogScript, FontHandle, FontProvider, Renderer, TextReveal,
    },
    render::draw::{self, Fonts, Frame},
};

/// Called once when a dialog ends.
pub type CloseCallback = Box<dyn FnOnce() + Send + Sync>;

/// Where a dialog box is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    /// No dialog is shown.
    #[default]
    Inactive,
    /// The text is being revealed.
    Revealing,
    /// The text is revealed and the player has to pick a choice.
    AwaitingChoice,
    /// The text is revealed, the node has no choices and the player has to dismiss it.
    AwaitingDismiss,
}

/// A choice the player committed, kept until the plugin turns it into an event.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CommittedChoice {
    /// The 1-based index of the choice.
    pub(crate) index: usize,
    /// The key of the choice.
    pub(crate) key: Option<String>,
    /// The value of the choice.
    pub(crate) value: Option<ChoiceValue>,
}

/// Presentation state of the node on screen.
#[derive(Debug)]
struct Page {
    /// The node being shown.
    node: Arc<DialogNode>,
    /// Reveal progress of the node text.
    reveal: TextReveal,
    /// Copies of the node choices.
    choices: Vec<Choice>,
    /// 1-based index of the highlighted choice.
    selected: usize,
    /// Hit rectangles of the choices as last rendered, in choice order.
    choice_bounds: Vec<Rect>,
}

impl Page {
    /// Fresh presentation of `node`, nothing revealed and the first choice highlighted.
    fn new(node: Arc<DialogNode>) -> Self {
        Self {
            reveal: TextReveal::new(node.text.clone()),
            choices: node.choices.clone(),
            selected: 1,
            choice_bounds: Vec::new(),
            node,
        }
    }

    /// Index of the first choice rectangle containing `position`.
    fn hit(&self, position: Vec2) -> Option<usize> {
        self.choice_bounds
            .iter()
            .take(self.choices.len())
            .position(|rect| rect.contains(position))
            .map(|i| i + 1)
    }
}

/// A dialog box: the text box, the speaker name and the choices of one dialog.
///
/// # Examples
///
/// ```
/// use bevy_dialog_box::prelude::*;
///
/// let mut dialog = DialogBox::default();
/// dialog.start(DialogNode::new("Hi").with_choice(Choice::new("Bye")));
/// assert_eq!(dialog.state(), DialogState::Revealing);
///
/// dialog.update(1000.0);
/// assert_eq!(dialog.visible_text(), "Hi");
/// assert_eq!(dialog.state(), DialogState::AwaitingChoice);
///
/// dialog.on_key(DialogKey::Confirm);
/// assert_eq!(dialog.state(), DialogState::Inactive);
/// ```
#[derive(Component, Default)]
pub struct DialogBox {
    /// Presentation settings.
    config: DialogConfig,
    /// Fonts acquired for this dialog box.
    fonts: Fonts,
    /// The node on screen, `None` when inactive.
    page: Option<Page>,
    /// Run when the dialog ends.
    on_close: Option<CloseCallback>,
    /// Keeps the script of a scripted dialog alive while it runs.
    script: Option<DialogScript>,
    /// Committed choices not yet reported, oldest first.
    committed: Vec<CommittedChoice>,
    /// How many times a dialog ended since this was last reported.
    ended: usize,
}

impl fmt::Debug for DialogBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogBox")
            .field("config", &self.config)
            .field("fonts", &self.fonts)
            .field("page", &self.page)
            .field("on_close", &self.on_close.as_ref().map(|_| ".."))
            .field("script", &self.script)
            .finish_non_exhaustive()
    }
}

// Lifecycle
impl DialogBox {
    /// Creates an inactive dialog box with the given settings.
    ///
    /// Text is drawn with the renderer's current font until [`DialogBox::load_fonts`]
    /// or [`DialogBox::set_config`] acquires fonts.
    pub fn new(config: DialogConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Shows `node`, replacing whatever was shown before.
    ///
    /// A previously stored close callback is dropped without being called.
    pub fn start(&mut self, node: impl Into<Arc<DialogNode>>) {
        self.begin(node.into(), None, None);
    }

    /// Shows `node` and calls `on_close` once when the dialog ends, however many
    /// nodes the player goes through before that.
    pub fn start_with(
        &mut self,
        node: impl Into<Arc<DialogNode>>,
        on_close: impl FnOnce() + Send + Sync + 'static,
    ) {
        self.begin(node.into(), Some(Box::new(on_close)), None);
    }

    /// Shows the start node of `script`. The script is kept alive until the dialog ends.
    pub fn start_script(&mut self, script: &DialogScript) {
        self.begin(script.start_node(), None, Some(script.clone()));
    }

    /// Same as [`DialogBox::start_script`] with a close callback.
    pub fn start_script_with(
        &mut self,
        script: &DialogScript,
        on_close: impl FnOnce() + Send + Sync + 'static,
    ) {
        self.begin(
            script.start_node(),
            Some(Box::new(on_close)),
            Some(script.clone()),
        );
    }

    /// Installs a new dialog.
    fn begin(
        &mut self,
        node: Arc<DialogNode>,
        on_close: Option<CloseCallback>,
        script: Option<DialogScript>,
    ) {
        if self.is_active() {
            debug!("Dialog box restarted while a dialog was still open");
        }
        self.on_close = on_close;
        self.script = script;
        self.show(node);
    }

    /// Makes `node` the node on screen, restarting its reveal.
    fn show(&mut self, node: Arc<DialogNode>) {
        debug!(
            "Showing dialog node {:?} with {} choices",
            node.key,
            node.choices.len()
        );
        self.page = Some(Page::new(node));
    }

    /// Advances the text reveal by `delta_seconds`.
    pub fn update(&mut self, delta_seconds: f32) {
        let text_speed = self.config.text_speed;
        if let Some(page) = &mut self.page {
            page.reveal.tick(delta_seconds, text_speed);
        }
    }

    /// Reveals the whole text right away.
    pub fn skip_reveal(&mut self) {
        if let Some(page) = &mut self.page {
            page.reveal.skip();
        }
    }

    /// Ends the dialog and calls the close callback. Does nothing when already inactive.
    pub fn close(&mut self) {
        if self.page.take().is_none() {
            return;
        }
        debug!("Dialog closed");
        self.script = None;
        self.ended += 1;
        if let Some(on_close) = self.on_close.take() {
            on_close();
        }
    }
}

// Input
impl DialogBox {
    /// Handles a key press.
    ///
    /// - [`DialogKey::Confirm`] reveals the whole text, or commits the highlighted
    ///   choice, or dismisses a node without choices.
    /// - [`DialogKey::Up`] and [`DialogKey::Down`] move the highlight, stopping at the
    ///   first and last choice.
    /// - [`DialogKey::Cancel`] closes the dialog.
    pub fn on_key(&mut self, key: DialogKey) {
        match key {
            DialogKey::Confirm => match self.state() {
                DialogState::Inactive => {}
                DialogState::Revealing => self.skip_reveal(),
                DialogState::AwaitingChoice => {
                    if let Some(index) = self.selected_index() {
                        self.commit(index);
                    }
                }
                DialogState::AwaitingDismiss => self.close(),
            },
            DialogKey::Up => self.move_selection(-1),
            DialogKey::Down => self.move_selection(1),
            DialogKey::Cancel => self.close(),
        }
    }

    /// Moves the highlight by `offset`, clamped to the choices.
    fn move_selection(&mut self, offset: isize) {
        if let Some(page) = &mut self.page {
            let count = page.choices.len();
            if count == 0 {
                return;
            }
            page.selected = page.selected.saturating_add_signed(offset).clamp(1, count);
        }
    }

    /// Highlights the choice under the pointer, once the choices are shown.
    pub fn on_pointer_move(&mut self, position: Vec2) {
        if self.state() != DialogState::AwaitingChoice {
            return;
        }
        if let Some(page) = &mut self.page {
            if let Some(index) = page.hit(position) {
                page.selected = index;
            }
        }
    }

    /// Handles a mouse click. Only the left button is used.
    ///
    /// While the text is being revealed, a click anywhere reveals it all and does
    /// nothing else. Afterwards a click on a choice commits it, and a click anywhere
    /// dismisses a node without choices. Clicks next to the choices are ignored.
    pub fn on_pointer_click(&mut self, position: Vec2, button: MouseButton) {
        self.click(Some(position), button);
    }

    /// Handles a mouse click at `position`, or at an unknown position when the cursor
    /// has not been seen yet. Only picking a choice needs the position.
    pub(crate) fn click(&mut self, position: Option<Vec2>, button: MouseButton) {
        if button != MouseButton::Left {
            return;
        }
        match self.state() {
            DialogState::Inactive => {}
            DialogState::Revealing => self.skip_reveal(),
            DialogState::AwaitingChoice => {
                let hit = position
                    .zip(self.page.as_ref())
                    .and_then(|(position, page)| page.hit(position));
                if let Some(index) = hit {
                    self.commit(index);
                }
            }
            DialogState::AwaitingDismiss => self.close(),
        }
    }

    /// Commits the choice at the 1-based `index` as if the player had picked it.
    ///
    /// # Errors
    ///
    /// Returns [`DialogError::InvalidChoice`] if `index` is not in `1..=choice count`,
    /// which is always the case while the dialog box is inactive.
    pub fn select_choice(&mut self, index: usize) -> Result<(), DialogError> {
        let count = self.choices().len();
        if index == 0 || index > count {
            return Err(DialogError::InvalidChoice { index, count });
        }
        self.commit(index);
        Ok(())
    }

    /// Runs the selection callback of the choice at the 1-based `index`, then moves
    /// on to its successor or closes. `index` must be in range.
    fn commit(&mut self, index: usize) {
        let Some(choice) = self
            .page
            .as_ref()
            .and_then(|page| page.choices.get(index.checked_sub(1)?))
            .cloned()
        else {
            warn!("Choice {} committed but it is not on screen", index);
            return;
        };

        choice.notify_selected();
        self.committed.push(CommittedChoice {
            index,
            key: choice.key.clone(),
            value: choice.value.clone(),
        });

        match choice.successor.resolve() {
            Some(next) => self.show(next),
            None => self.close(),
        }
    }
}

// Configuration and drawing
impl DialogBox {
    /// Applies `patch` on top of the current settings, acquiring again the fonts
    /// whose size or path it sets.
    pub fn set_config(&mut self, patch: ConfigPatch, fonts: &mut dyn FontProvider) {
        let changes = self.config.merge(patch);
        if changes.body {
            self.fonts.body = Some(load_body_font(&self.config, fonts));
        }
        if changes.name {
            self.fonts.name = Some(load_name_font(&self.config, fonts));
        }
        debug!("Dialog box settings updated, font changes: {:?}", changes);
    }

    /// Acquires the body and name fonts described by the current settings.
    pub fn load_fonts(&mut self, fonts: &mut dyn FontProvider) {
        self.fonts = Fonts {
            body: Some(load_body_font(&self.config, fonts)),
            name: Some(load_name_font(&self.config, fonts)),
        };
    }

    /// Draws the dialog box and records where its choices are for the input handlers.
    ///
    /// Call it after [`DialogBox::update`] in a frame so the drawing reflects the
    /// elapsed time.
    pub fn render(&mut self, renderer: &mut dyn Renderer) {
        let Some(page) = &mut self.page else {
            return;
        };
        let frame = Frame {
            name: page.node.name.as_deref(),
            text: page.reveal.visible_text(),
            choices: &page.choices,
            selected: page.selected,
            show_choices: page.reveal.is_complete(),
        };
        let bounds = draw::draw_dialog(renderer, &self.config, self.fonts, &frame);
        if frame.show_choices && bounds.len() != page.choices.len() {
            warn!(
                "Choices were drawn with {} hit rectangles for {} choices",
                bounds.len(),
                page.choices.len()
            );
        }
        page.choice_bounds = bounds;
    }
}

/// Acquires the body font described by `config`.
fn load_body_font(
    config: &DialogConfig,
    fonts: &mut dyn FontProvider,
) -> FontHandle {
    fonts.load_font(config.font_path.as_deref(), config.font_size)
}

/// Acquires the name font described by `config`.
fn load_name_font(
    config: &DialogConfig,
    fonts: &mut dyn FontProvider,
) -> FontHandle {
    fonts.load_font(config.name_font_path.as_deref(), config.name_font_size)
}

// Queries
impl DialogBox {
    /// Where the dialog box is in its lifecycle.
    pub fn state(&self) -> DialogState {
        match &self.page {
            None => DialogState::Inactive,
            Some(page) if !page.reveal.is_complete() => DialogState::Revealing,
            Some(page) if page.choices.is_empty() => DialogState::AwaitingDismiss,
            Some(_) => DialogState::AwaitingChoice,
        }
    }

    /// Whether a dialog is shown.
    pub fn is_active(&self) -> bool {
        self.page.is_some()
    }

    /// The current settings.
    pub fn config(&self) -> &DialogConfig {
        &self.config
    }

    /// The node on screen.
    pub fn current_node(&self) -> Option<&Arc<DialogNode>> {
        self.page.as_ref().map(|page| &page.node)
    }

    /// The revealed part of the text, empty when inactive.
    pub fn visible_text(&self) -> &str {
        self.page
            .as_ref()
            .map_or("", |page| page.reveal.visible_text())
    }

    /// Whether the whole text is revealed.
    pub fn is_revealed(&self) -> bool {
        self.page
            .as_ref()
            .is_some_and(|page| page.reveal.is_complete())
    }

    /// The choices of the node on screen.
    pub fn choices(&self) -> &[Choice] {
        self.page
            .as_ref()
            .map(|page| page.choices.as_slice())
            .unwrap_or_default()
    }

    /// The 1-based index of the highlighted choice, `None` without choices.
    pub fn selected_index(&self) -> Option<usize> {
        self.page
            .as_ref()
            .filter(|page| !page.choices.is_empty())
            .map(|page| page.selected)
    }

    /// Hit rectangles of the choices as last rendered.
    pub fn choice_bounds(&self) -> &[Rect] {
        self.page
            .as_ref()
            .map(|page| page.choice_bounds.as_slice())
            .unwrap_or_default()
    }

    /// Takes the committed choices not reported yet, oldest first.
    pub(crate) fn take_committed(&mut self) -> Vec<CommittedChoice> {
        std::mem::take(&mut self.committed)
    }

    /// How many times a dialog ended since this was last called.
    pub(crate) fn take_ended(&mut self) -> usize {
        std::mem::take(&mut self.ended)
    }

    /// Whether there is something for the plugin to report.
    pub(crate) fn has_news(&self) -> bool {
        self.ended > 0 || !self.committed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    use rstest::{fixture, rstest};

    use crate::{
        prelude::*,
        tests::{MockFonts, MockRenderer},
    };

    use super::*;

    /// Counts how many times a callback ran.
    fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + Clone + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inc = Arc::clone(&count);
        (count, move || {
            inc.fetch_add(1, Ordering::SeqCst);
        })
    }

    /// A node with three choices that all close the dialog.
    #[fixture]
    fn three_choices() -> DialogNode {
        DialogNode::new("Pick one").with_choices([
            Choice::new("A").with_key("a"),
            Choice::new("B").with_key("b"),
            Choice::new("C").with_key("c"),
        ])
    }

    /// A dialog box showing `node` with its text fully revealed and rendered once.
    fn revealed(node: DialogNode) -> (DialogBox, MockRenderer) {
        let mut dialog = DialogBox::default();
        dialog.start(node);
        dialog.update(1000.0);
        let mut renderer = MockRenderer::default();
        dialog.render(&mut renderer);
        (dialog, renderer)
    }

    #[test]
    fn inactive_by_default() {
        let mut dialog = DialogBox::default();
        assert_eq!(dialog.state(), DialogState::Inactive);
        dialog.update(1.0);
        dialog.on_key(DialogKey::Confirm);
        dialog.on_pointer_click(Vec2::ZERO, MouseButton::Left);
        assert_eq!(dialog.state(), DialogState::Inactive);
        assert_eq!(dialog.visible_text(), "");
        assert_eq!(dialog.selected_index(), None);
    }

    #[test]
    fn hi_bye_example() {
        let (closes, on_close) = counter();
        let mut dialog = DialogBox::default();
        dialog.start_with(
            DialogNode::new("Hi").with_choice(Choice::new("Bye")),
            on_close,
        );

        dialog.update(1000.0);
        assert_eq!(dialog.visible_text(), "Hi");
        assert_eq!(dialog.state(), DialogState::AwaitingChoice);
        assert_eq!(dialog.choices().len(), 1);

        dialog.on_key(DialogKey::Confirm);
        assert_eq!(dialog.state(), DialogState::Inactive);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reveals_one_character_per_update() {
        let mut dialog = DialogBox::new(DialogConfig {
            text_speed: 0.05,
            ..Default::default()
        });
        dialog.start(DialogNode::new("0123456789"));

        for i in 1..10 {
            dialog.update(0.05);
            assert_eq!(dialog.visible_text().chars().count(), i);
            assert_eq!(dialog.state(), DialogState::Revealing);
        }
        dialog.update(0.05);
        assert_eq!(dialog.visible_text(), "0123456789");
        assert_eq!(dialog.state(), DialogState::AwaitingDismiss);
    }

    #[test]
    fn zero_speed_reveals_on_first_update() {
        let mut dialog = DialogBox::new(DialogConfig {
            text_speed: 0.0,
            ..Default::default()
        });
        dialog.start(DialogNode::new("fast"));
        dialog.update(0.0);
        assert!(dialog.is_revealed());
    }

    #[test]
    fn confirm_skips_then_dismisses() {
        let (closes, on_close) = counter();
        let mut dialog = DialogBox::default();
        dialog.start_with(DialogNode::new("A long line of text"), on_close);

        dialog.on_key(DialogKey::Confirm);
        assert_eq!(dialog.visible_text(), "A long line of text");
        assert_eq!(dialog.state(), DialogState::AwaitingDismiss);
        assert_eq!(closes.load(Ordering::SeqCst), 0);

        dialog.on_key(DialogKey::Confirm);
        assert_eq!(dialog.state(), DialogState::Inactive);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cancel_closes_while_revealing() {
        let (closes, on_close) = counter();
        let mut dialog = DialogBox::default();
        dialog.start_with(three_choices(), on_close);

        dialog.on_key(DialogKey::Cancel);
        assert_eq!(dialog.state(), DialogState::Inactive);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn close_is_idempotent() {
        let (closes, on_close) = counter();
        let mut dialog = DialogBox::default();
        dialog.start_with(DialogNode::new("x"), on_close);

        dialog.close();
        dialog.close();
        dialog.on_key(DialogKey::Cancel);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    fn selection_stays_in_range(three_choices: DialogNode) {
        let (mut dialog, _) = revealed(three_choices);
        assert_eq!(dialog.selected_index(), Some(1));

        dialog.on_key(DialogKey::Up);
        assert_eq!(dialog.selected_index(), Some(1));

        for _ in 0..10 {
            dialog.on_key(DialogKey::Down);
            let index = dialog.selected_index().unwrap();
            assert!((1..=3).contains(&index));
        }
        assert_eq!(dialog.selected_index(), Some(3));

        dialog.on_key(DialogKey::Down);
        assert_eq!(dialog.selected_index(), Some(3));

        dialog.on_key(DialogKey::Up);
        assert_eq!(dialog.selected_index(), Some(2));
    }

    #[test]
    fn up_and_down_without_choices_do_nothing() {
        let mut dialog = DialogBox::default();
        dialog.start(DialogNode::new("no choices"));
        dialog.update(1000.0);
        dialog.on_key(DialogKey::Down);
        dialog.on_key(DialogKey::Up);
        assert_eq!(dialog.selected_index(), None);
        assert_eq!(dialog.state(), DialogState::AwaitingDismiss);
    }

    #[test]
    fn on_select_runs_once_for_the_picked_choice_only() {
        let picked = Arc::new(Mutex::new(Vec::new()));
        let choice = |text: &str| {
            let picked = Arc::clone(&picked);
            Choice::new(text)
                .with_key(text)
                .on_select(move |key, _| picked.lock().unwrap().push(key.map(str::to_owned)))
        };
        let mut dialog = DialogBox::default();
        dialog.start(DialogNode::new("?").with_choices([choice("a"), choice("b"), choice("c")]));
        dialog.update(1000.0);

        dialog.on_key(DialogKey::Down);
        dialog.on_key(DialogKey::Confirm);

        assert_eq!(*picked.lock().unwrap(), vec![Some("b".to_string())]);
    }

    #[test]
    fn on_select_runs_before_the_successor_is_resolved() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let (select_log, resolve_log) = (Arc::clone(&order), Arc::clone(&order));
        let mut dialog = DialogBox::default();
        dialog.start(
            DialogNode::new("?").with_choice(
                Choice::new("go")
                    .on_select(move |_, _| select_log.lock().unwrap().push("select"))
                    .leads_to_with(move || {
                        resolve_log.lock().unwrap().push("resolve");
                        Some(Arc::new(DialogNode::new("next")))
                    }),
            ),
        );
        dialog.skip_reveal();
        dialog.on_key(DialogKey::Confirm);

        assert_eq!(*order.lock().unwrap(), vec!["select", "resolve"]);
        assert_eq!(dialog.current_node().unwrap().text, "next");
    }

    #[test]
    fn traversal_keeps_the_close_callback_until_the_end() {
        let (closes, on_close) = counter();
        let last = DialogNode::new("Goodbye");
        let first = DialogNode::new("Hello").with_choice(Choice::new("Next").leads_to(last));
        let mut dialog = DialogBox::default();
        dialog.start_with(first, on_close);

        dialog.skip_reveal();
        dialog.on_key(DialogKey::Confirm);
        assert_eq!(dialog.current_node().unwrap().text, "Goodbye");
        assert_eq!(dialog.state(), DialogState::Revealing);
        assert_eq!(closes.load(Ordering::SeqCst), 0);

        dialog.skip_reveal();
        dialog.on_key(DialogKey::Confirm);
        assert_eq!(dialog.state(), DialogState::Inactive);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    #[case::absent(Choice::new("end"))]
    #[case::producer_returns_none(Choice::new("end").leads_to_with(|| None))]
    fn missing_successor_closes(#[case] choice: Choice) {
        let (closes, on_close) = counter();
        let mut dialog = DialogBox::default();
        dialog.start_with(DialogNode::new("?").with_choice(choice), on_close);
        dialog.skip_reveal();

        dialog.select_choice(1).unwrap();

        assert_eq!(dialog.state(), DialogState::Inactive);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn revisiting_a_node_restarts_its_reveal() {
        let loop_node: Arc<Mutex<Option<Arc<DialogNode>>>> = Arc::new(Mutex::new(None));
        let link = Arc::clone(&loop_node);
        let node = Arc::new(
            DialogNode::new("Again?")
                .with_choice(Choice::new("Yes").leads_to_with(move || link.lock().unwrap().clone()))
                .with_choice(Choice::new("No")),
        );
        *loop_node.lock().unwrap() = Some(Arc::clone(&node));

        let mut dialog = DialogBox::default();
        dialog.start(Arc::clone(&node));
        for _ in 0..3 {
            dialog.update(1000.0);
            assert!(dialog.is_revealed());
            dialog.on_key(DialogKey::Confirm);
            assert!(Arc::ptr_eq(dialog.current_node().unwrap(), &node));
            assert_eq!(dialog.visible_text(), "");
            assert_eq!(dialog.state(), DialogState::Revealing);
        }

        // break the cycle so the node can be dropped
        *loop_node.lock().unwrap() = None;
    }

    #[rstest]
    #[case(0)]
    #[case(4)]
    fn select_choice_out_of_range(three_choices: DialogNode, #[case] index: usize) {
        let (mut dialog, _) = revealed(three_choices);
        assert_eq!(
            dialog.select_choice(index),
            Err(DialogError::InvalidChoice { index, count: 3 })
        );
        assert_eq!(dialog.state(), DialogState::AwaitingChoice);
    }

    #[test]
    fn select_choice_while_inactive_is_an_error() {
        let mut dialog = DialogBox::default();
        assert_eq!(
            dialog.select_choice(1),
            Err(DialogError::InvalidChoice { index: 1, count: 0 })
        );
    }

    #[rstest]
    fn pointer_move_highlights_the_hovered_choice(three_choices: DialogNode) {
        let (mut dialog, _) = revealed(three_choices);
        let third = dialog.choice_bounds()[2];

        dialog.on_pointer_move(third.center());
        assert_eq!(dialog.selected_index(), Some(3));

        dialog.on_pointer_move(Vec2::new(-10.0, -10.0));
        assert_eq!(dialog.selected_index(), Some(3));
    }

    #[rstest]
    fn pointer_move_is_ignored_while_revealing(three_choices: DialogNode) {
        let (mut dialog, _) = revealed(three_choices.clone());
        let third = dialog.choice_bounds()[2];

        dialog.start(three_choices);
        dialog.on_pointer_move(third.center());
        assert_eq!(dialog.selected_index(), Some(1));
    }

    #[rstest]
    fn click_on_a_choice_commits_it(three_choices: DialogNode) {
        let (mut dialog, _) = revealed(three_choices);
        let second = dialog.choice_bounds()[1];

        dialog.on_pointer_click(second.center(), MouseButton::Left);

        assert_eq!(dialog.state(), DialogState::Inactive);
        assert_eq!(
            dialog
                .take_committed()
                .into_iter()
                .map(|c| (c.index, c.key))
                .collect::<Vec<_>>(),
            vec![(2, Some("b".to_string()))]
        );
    }

    #[test]
    fn click_outside_the_choices_is_ignored() {
        let node = DialogNode::new("Two").with_choices([Choice::new("A"), Choice::new("B")]);
        let (mut dialog, _) = revealed(node);

        dialog.on_pointer_click(Vec2::new(-5.0, -5.0), MouseButton::Left);

        assert_eq!(dialog.state(), DialogState::AwaitingChoice);
        assert_eq!(dialog.selected_index(), Some(1));
    }

    #[rstest]
    fn click_while_revealing_only_skips(three_choices: DialogNode) {
        let (mut dialog, _) = revealed(three_choices.clone());
        let first = dialog.choice_bounds()[0];
        dialog.start(three_choices);

        dialog.on_pointer_click(first.center(), MouseButton::Left);

        assert!(dialog.is_revealed());
        assert_eq!(dialog.state(), DialogState::AwaitingChoice);
        assert!(dialog.take_committed().is_empty());
    }

    #[test]
    fn click_dismisses_a_node_without_choices() {
        let (closes, on_close) = counter();
        let mut dialog = DialogBox::default();
        dialog.start_with(DialogNode::new("done"), on_close);
        dialog.skip_reveal();

        dialog.on_pointer_click(Vec2::new(3000.0, 3000.0), MouseButton::Left);

        assert_eq!(dialog.state(), DialogState::Inactive);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    fn click_without_a_position_skips_and_dismisses_but_never_picks(three_choices: DialogNode) {
        let mut dialog = DialogBox::default();
        dialog.start(three_choices);

        dialog.click(None, MouseButton::Left);
        assert_eq!(dialog.state(), DialogState::AwaitingChoice);

        dialog.click(None, MouseButton::Left);
        assert_eq!(dialog.state(), DialogState::AwaitingChoice);
        assert!(dialog.take_committed().is_empty());

        dialog.start(DialogNode::new("done"));
        dialog.skip_reveal();
        dialog.click(None, MouseButton::Left);
        assert_eq!(dialog.state(), DialogState::Inactive);
    }

    #[rstest]
    #[case(MouseButton::Right)]
    #[case(MouseButton::Middle)]
    #[case(MouseButton::Other(4))]
    fn other_buttons_are_ignored(#[case] button: MouseButton) {
        let mut dialog = DialogBox::default();
        dialog.start(DialogNode::new("text"));

        dialog.on_pointer_click(Vec2::ZERO, button);

        assert_eq!(dialog.state(), DialogState::Revealing);
    }

    #[test]
    fn restart_replaces_the_close_callback() {
        let (first_closes, first) = counter();
        let (second_closes, second) = counter();
        let mut dialog = DialogBox::default();
        dialog.start_with(DialogNode::new("one"), first);
        dialog.start_with(DialogNode::new("two"), second);

        dialog.close();

        assert_eq!(first_closes.load(Ordering::SeqCst), 0);
        assert_eq!(second_closes.load(Ordering::SeqCst), 1);
        assert_eq!(dialog.visible_text(), "");
    }

    #[test]
    fn render_clears_bounds_when_choices_are_hidden() {
        let node = DialogNode::new("Two").with_choices([Choice::new("A"), Choice::new("B")]);
        let (mut dialog, mut renderer) = revealed(node.clone());
        assert_eq!(dialog.choice_bounds().len(), 2);

        dialog.start(node);
        dialog.render(&mut renderer);
        assert!(dialog.choice_bounds().is_empty());
    }

    #[test]
    fn set_config_reloads_only_the_touched_fonts() {
        let mut fonts = MockFonts::default();
        let mut dialog = DialogBox::default();
        dialog.load_fonts(&mut fonts);
        assert_eq!(fonts.loaded.len(), 2);

        dialog.set_config(
            ConfigPatch {
                text_speed: Some(0.2),
                ..Default::default()
            },
            &mut fonts,
        );
        assert_eq!(fonts.loaded.len(), 2);
        assert_eq!(dialog.config().text_speed, 0.2);

        dialog.set_config(
            ConfigPatch {
                name_font_size: Some(30.0),
                ..Default::default()
            },
            &mut fonts,
        );
        assert_eq!(fonts.loaded.len(), 3);
        assert_eq!(fonts.loaded[2], (None, 30.0));
        assert_eq!(dialog.fonts.name, Some(FontHandle(3)));
        assert_eq!(dialog.fonts.body, Some(FontHandle(1)));
    }

    #[test]
    fn ended_and_committed_are_reported_once() {
        let mut dialog = DialogBox::default();
        dialog.start(DialogNode::new("?").with_choice(Choice::new("ok").with_key("ok")));
        dialog.skip_reveal();
        dialog.on_key(DialogKey::Confirm);

        assert!(dialog.has_news());
        assert_eq!(dialog.take_ended(), 1);
        assert_eq!(dialog.take_ended(), 0);
        assert_eq!(
            dialog.take_committed().iter().map(|c| c.index).collect::<Vec<_>>(),
            vec![1]
        );
        assert!(dialog.take_committed().is_empty());
        assert!(!dialog.has_news());
    }

    #[test]
    fn commits_queue_up_until_reported() {
        let last = DialogNode::new("B").with_choice(Choice::new("b1").with_key("b1"));
        let first = DialogNode::new("A").with_choice(Choice::new("a1").with_key("a1").leads_to(last));
        let mut dialog = DialogBox::default();
        dialog.start(first);

        dialog.skip_reveal();
        dialog.select_choice(1).unwrap();
        dialog.skip_reveal();
        dialog.select_choice(1).unwrap();

        let keys: Vec<_> = dialog
            .take_committed()
            .into_iter()
            .map(|c| c.key)
            .collect();
        assert_eq!(keys, vec![Some("a1".to_string()), Some("b1".to_string())]);
        assert_eq!(dialog.take_ended(), 1);
    }

    #[test]
    fn every_end_is_counted() {
        let mut dialog = DialogBox::default();
        dialog.start(DialogNode::new("one"));
        dialog.close();
        dialog.start(DialogNode::new("two"));
        dialog.close();

        assert_eq!(dialog.take_ended(), 2);
    }
}
