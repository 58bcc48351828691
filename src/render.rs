//! Output rendering for streamed answers.
//!
//! Answers arrive as arbitrary fragments. [`EmphasisFilter`] turns the
//! markdown bold marker `**` into ANSI bold-green on the fly, even when a
//! marker is split across two fragments, and [`PlainTextRenderer`] writes the
//! result to the terminal as it arrives.

use std::io::{self, Stdout, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// ANSI escape code that turns on bold green (used for `**emphasis**`).
pub const ANSI_BOLD_GREEN: &str = "\x1b[1;32m";

/// ANSI escape code that turns off bold and restores the default colour.
pub const ANSI_BOLD_RESET: &str = "\x1b[22;39m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code for yellow text (used for refusals).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

const MARKER: char = '*';

///////////////////////////////////////// Emphasis /////////////////////////////////////////

/// Incremental `**bold**` to ANSI translator.
///
/// The filter holds at most one unresolved `*`, so a marker split across
/// fragments (`"**"` arriving as `"*"` then `"*"`) renders exactly as if it
/// had arrived whole. A lone `*` followed by anything else is emitted
/// verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmphasisFilter {
    pending_marker: bool,
    bold: bool,
}

impl EmphasisFilter {
    /// Creates a filter in the plain, no-pending-marker state.
    pub fn new() -> Self {
        Self::default()
    }

    /// True between an opening and a closing `**`.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// True when the last character seen was an unpaired `*`.
    pub fn has_pending_marker(&self) -> bool {
        self.pending_marker
    }

    /// Translates one fragment, appending the output to `out`.
    pub fn push(&mut self, fragment: &str, out: &mut String) {
        for ch in fragment.chars() {
            if ch == MARKER {
                if self.pending_marker {
                    self.pending_marker = false;
                    self.bold = !self.bold;
                    out.push_str(if self.bold {
                        ANSI_BOLD_GREEN
                    } else {
                        ANSI_BOLD_RESET
                    });
                } else {
                    self.pending_marker = true;
                }
            } else {
                if self.pending_marker {
                    // the `*` we held back was not part of a marker after all
                    self.pending_marker = false;
                    out.push(MARKER);
                }
                out.push(ch);
            }
        }
    }

    /// Convenience wrapper around [`EmphasisFilter::push`].
    pub fn render(&mut self, fragment: &str) -> String {
        let mut out = String::with_capacity(fragment.len());
        self.push(fragment, &mut out);
        out
    }

    /// Ends the current text: emits any held-back `*`, closes an unterminated
    /// bold run, and returns to the initial state.
    pub fn finish(&mut self, out: &mut String) {
        if self.pending_marker {
            out.push(MARKER);
        }
        if self.bold {
            out.push_str(ANSI_BOLD_RESET);
        }
        *self = Self::default();
    }
}

///////////////////////////////////////// Renderer /////////////////////////////////////////

/// Trait for rendering chat output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
/// - Capturing output in tests
pub trait Renderer: Send {
    /// Called before the first fragment of a response.
    fn start_response(&mut self) {}

    /// Print a chunk of regular response text.
    ///
    /// This is called incrementally as tokens are streamed from the API.
    fn print_text(&mut self, text: &str);

    /// Called once the answer text is complete.
    fn finish_content(&mut self);

    /// Print the model's refusal to answer.
    fn print_refusal(&mut self, refusal: &str);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Called when a response is complete.
    ///
    /// Used to ensure terminal styling is reset after streaming.
    fn finish_response(&mut self);

    /// Called when the stream is interrupted by the user.
    fn print_interrupted(&mut self) {}

    /// Returns true if streaming should be interrupted.
    fn should_interrupt(&self) -> bool {
        false
    }
}

/// Plain text renderer with optional ANSI styling.
///
/// This renderer outputs text to stdout (or any other writer) as it
/// arrives, translating `**` markers when colour is enabled.
pub struct PlainTextRenderer<W: Write + Send = Stdout> {
    writer: W,
    use_color: bool,
    emphasis: EmphasisFilter,
    interrupted: Option<Arc<AtomicBool>>,
}

impl PlainTextRenderer<Stdout> {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self::with_writer(io::stdout(), use_color)
    }
}

impl Default for PlainTextRenderer<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> PlainTextRenderer<W> {
    /// Creates a renderer that writes to `writer`.
    pub fn with_writer(writer: W, use_color: bool) -> Self {
        Self {
            writer,
            use_color,
            emphasis: EmphasisFilter::new(),
            interrupted: None,
        }
    }

    /// Attaches an interrupt flag to the renderer.
    pub fn with_interrupt(mut self, interrupted: Arc<AtomicBool>) -> Self {
        self.interrupted = Some(interrupted);
        self
    }

    /// Whether ANSI styling is emitted.
    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Consumes the renderer and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let _ = self.writer.write_all(text.as_bytes());
        let _ = self.writer.flush();
    }

    fn reset_emphasis(&mut self) {
        let mut out = String::new();
        self.emphasis.finish(&mut out);
        self.write(&out);
    }
}

impl<W: Write + Send> Renderer for PlainTextRenderer<W> {
    fn start_response(&mut self) {
        self.write("\n");
    }

    fn print_text(&mut self, text: &str) {
        if self.use_color {
            let rendered = self.emphasis.render(text);
            self.write(&rendered);
        } else {
            self.write(text);
        }
    }

    fn finish_content(&mut self) {
        self.reset_emphasis();
        self.write("\n\n");
    }

    fn print_refusal(&mut self, refusal: &str) {
        self.reset_emphasis();
        if self.use_color {
            self.write(&format!(
                "\n{ANSI_YELLOW}[Model refused to answer]{ANSI_RESET}\n\n{refusal}\n"
            ));
        } else {
            self.write(&format!("\n[Model refused to answer]\n\n{refusal}\n"));
        }
    }

    fn print_error(&mut self, error: &str) {
        self.reset_emphasis();
        if self.use_color {
            eprintln!("\n{ANSI_RED}Error:{ANSI_RESET} {error}");
        } else {
            eprintln!("\nError: {error}");
        }
    }

    fn print_info(&mut self, info: &str) {
        self.reset_emphasis();
        self.write(&format!("{info}\n"));
    }

    fn finish_response(&mut self) {
        self.reset_emphasis();
    }

    fn print_interrupted(&mut self) {
        self.reset_emphasis();
        self.write("\n[interrupted]\n\n");
    }

    fn should_interrupt(&self) -> bool {
        self.interrupted
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}
