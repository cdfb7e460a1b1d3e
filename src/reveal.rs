//! Letter by letter reveal of the dialog text.

/// Reveals a text one character at a time as time passes.
///
/// Characters are counted as Unicode scalar values, so multi-byte text is never
/// cut in the middle of a character.
///
/// # Examples
///
/// ```
/// use bevy_dialog_box::prelude::TextReveal;
///
/// let mut reveal = TextReveal::new("Hi!");
/// reveal.tick(0.1, 0.05);
/// assert_eq!(reveal.visible_text(), "Hi");
/// reveal.skip();
/// assert_eq!(reveal.visible_text(), "Hi!");
/// assert!(reveal.is_complete());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextReveal {
    /// The whole text.
    full_text: String,
    /// Number of characters in `full_text`.
    total_chars: usize,
    /// Number of characters currently visible.
    revealed_chars: usize,
    /// Seconds accumulated since the reveal started.
    elapsed: f32,
    /// Seconds accumulated but not yet spent on a character.
    pending: f32,
    /// Whether every character is visible.
    complete: bool,
}

impl TextReveal {
    /// Starts revealing `text` from the first character.
    pub fn new(text: impl Into<String>) -> Self {
        let full_text = text.into();
        let total_chars = full_text.chars().count();
        Self {
            full_text,
            total_chars,
            ..Default::default()
        }
    }

    /// Advances the reveal by `delta_seconds`, showing one more character for every
    /// whole `seconds_per_char` accumulated.
    ///
    /// A non-positive (or non-finite) `seconds_per_char` reveals everything at once.
    pub fn tick(&mut self, delta_seconds: f32, seconds_per_char: f32) {
        if self.complete {
            return;
        }

        let delta_seconds = delta_seconds.max(0.0);
        self.elapsed += delta_seconds;

        if seconds_per_char <= 0.0 || !seconds_per_char.is_finite() {
            self.skip();
            return;
        }

        self.pending += delta_seconds;
        while self.revealed_chars < self.total_chars && self.pending >= seconds_per_char {
            self.pending -= seconds_per_char;
            self.revealed_chars += 1;
        }

        if self.revealed_chars >= self.total_chars {
            self.complete = true;
        }
    }

    /// Shows the whole text right away.
    pub fn skip(&mut self) {
        self.revealed_chars = self.total_chars;
        self.pending = 0.0;
        self.complete = true;
    }

    /// The part of the text revealed so far.
    pub fn visible_text(&self) -> &str {
        self.full_text
            .char_indices()
            .nth(self.revealed_chars)
            .map(|(end, _)| &self.full_text[..end])
            .unwrap_or(&self.full_text)
    }

    /// The whole text.
    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// How many characters are visible.
    pub fn revealed_chars(&self) -> usize {
        self.revealed_chars
    }

    /// How many characters the text has.
    pub fn total_chars(&self) -> usize {
        self.total_chars
    }

    /// Seconds ticked since the reveal started.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Whether every character is visible.
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}
