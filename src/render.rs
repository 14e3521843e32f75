//! Terminal output for the chat application.
//!
//! This module provides a trait-based rendering abstraction so the chat state
//! can drive different front-ends.  [`PlainTextRenderer`] writes to a
//! terminal, styling emphasis and labels with the active theme's ANSI
//! palette.  Streamed text is rendered a line at a time: a line is formatted
//! once its newline arrives, and the tail is formatted when the reply ends.

use std::io::{self, Stdout, Write};

use crate::markup::{self, Block, Span};
use crate::theme::{Palette, Theme};
use crate::types::Message;

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code to clear from the cursor to the end of the line.
const ANSI_CLEAR_LINE: &str = "\x1b[K";

/// Shown while the reply placeholder is still empty.
const TYPING_INDICATOR: &str = "...";

/// Prefix of a rendered list item.
const BULLET: &str = "  \u{2022} ";

/// Trait for rendering chat output.
pub trait Renderer: Send {
    /// Print a complete message: a header line followed by its blocks.
    fn print_message(&mut self, message: &Message);

    /// Called when the reply placeholder is appended, before any chunk.
    ///
    /// Prints the header and the typing indicator.
    fn start_response(&mut self, placeholder: &Message);

    /// Print a chunk of streamed reply text.
    fn print_chunk(&mut self, text: &str);

    /// Called when the reply stream ends, successfully or not.
    fn finish_response(&mut self);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Switch to the palette of `theme`.
    fn set_theme(&mut self, theme: &Theme);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer<W: Write + Send = Stdout> {
    out: W,
    use_color: bool,
    palette: Palette,
    line_buffer: String,
    indicator_visible: bool,
}

impl PlainTextRenderer<Stdout> {
    /// Creates a new PlainTextRenderer on stdout with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer on stdout with specified color setting.
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
    /// Creates a renderer writing to `out`.
    pub fn with_writer(out: W, use_color: bool) -> Self {
        Self {
            out,
            use_color,
            palette: Palette::DARK,
            line_buffer: String::new(),
            indicator_visible: false,
        }
    }

    /// Consumes the renderer, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        let _ = self.out.write_all(text.as_bytes());
    }

    /// Flushes the writer to ensure immediate display of streamed content.
    fn flush(&mut self) {
        let _ = self.out.flush();
    }

    fn styled(&self, style: &str, text: &str) -> String {
        if self.use_color && !style.is_empty() {
            format!("{style}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }

    fn header(&self, message: &Message) -> String {
        let label = if message.is_model() {
            self.styled(self.palette.model_label, "Assistant")
        } else {
            self.styled(self.palette.user_label, "You")
        };
        match &message.timestamp {
            Some(timestamp) => format!("{label} {}\n", self.styled(self.palette.muted, timestamp)),
            None => format!("{label}\n"),
        }
    }

    fn format_spans(&self, spans: &[Span]) -> String {
        spans
            .iter()
            .map(|span| match span {
                Span::Plain(text) => self.styled(self.palette.text, text),
                Span::Emphasis(text) => self.styled(self.palette.emphasis, text),
            })
            .collect()
    }

    fn format_blocks(&self, blocks: &[Block]) -> String {
        let mut out = String::new();
        for block in blocks {
            match block {
                Block::Paragraph(spans) => {
                    out.push_str(&self.format_spans(spans));
                    out.push('\n');
                }
                Block::List(items) => {
                    for item in items {
                        out.push_str(BULLET);
                        out.push_str(&self.format_spans(item));
                        out.push('\n');
                    }
                }
            }
        }
        out
    }

    fn clear_indicator(&mut self) {
        if self.indicator_visible {
            self.indicator_visible = false;
            if self.use_color {
                self.emit(&format!("\r{ANSI_CLEAR_LINE}"));
            } else {
                self.emit(&format!("\r{}\r", " ".repeat(TYPING_INDICATOR.len())));
            }
        }
    }

    fn render_line(&mut self, line: &str) {
        let formatted = self.format_blocks(&markup::render(line));
        self.emit(&formatted);
    }
}

impl<W: Write + Send> Renderer for PlainTextRenderer<W> {
    fn print_message(&mut self, message: &Message) {
        let mut text = self.header(message);
        text.push_str(&self.format_blocks(&markup::render(&message.content)));
        text.push('\n');
        self.emit(&text);
        self.flush();
    }

    fn start_response(&mut self, placeholder: &Message) {
        self.line_buffer.clear();
        let mut text = self.header(placeholder);
        text.push_str(&self.styled(self.palette.muted, TYPING_INDICATOR));
        self.emit(&text);
        self.indicator_visible = true;
        self.flush();
    }

    fn print_chunk(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.clear_indicator();
        self.line_buffer.push_str(text);
        while let Some(newline) = self.line_buffer.find('\n') {
            let line: String = self.line_buffer.drain(..=newline).collect();
            self.render_line(&line[..line.len() - 1]);
        }
        self.flush();
    }

    fn finish_response(&mut self) {
        self.clear_indicator();
        let tail = std::mem::take(&mut self.line_buffer);
        self.render_line(&tail);
        self.emit("\n");
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        self.clear_indicator();
        let text = format!("{}\n", self.styled(self.palette.error, error));
        self.emit(&text);
        self.flush();
    }

    fn print_info(&mut self, info: &str) {
        let text = format!("{}\n", self.styled(self.palette.muted, info));
        self.emit(&text);
        self.flush();
    }

    fn set_theme(&mut self, theme: &Theme) {
        self.palette = theme.palette().clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_renderer() -> PlainTextRenderer<Vec<u8>> {
        PlainTextRenderer::with_writer(Vec::new(), false)
    }

    fn output(renderer: PlainTextRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color);
    }

    #[test]
    fn print_message_renders_blocks() {
        let mut renderer = plain_renderer();
        renderer.print_message(&Message::model("Values:\n* *Equity*\n- Teamwork", "10:00"));
        assert_eq!(
            output(renderer),
            "Assistant 10:00\nValues:\n  \u{2022} Equity\n  \u{2022} Teamwork\n\n"
        );
    }

    #[test]
    fn message_without_timestamp_has_bare_header() {
        let mut renderer = plain_renderer();
        renderer.print_message(&Message::new(crate::types::Role::Model, "Sorry.", None));
        assert_eq!(output(renderer), "Assistant\nSorry.\n\n");
    }

    #[test]
    fn streamed_lines_render_as_they_complete() {
        let mut renderer = plain_renderer();
        renderer.start_response(&Message::placeholder("10:00"));
        renderer.print_chunk("Hel");
        renderer.print_chunk("lo\n- it");
        renderer.print_chunk("em");
        renderer.finish_response();
        assert_eq!(
            output(renderer),
            "Assistant 10:00\n...\r   \rHello\n  \u{2022} item\n\n"
        );
    }

    #[test]
    fn empty_chunk_keeps_indicator() {
        let mut renderer = plain_renderer();
        renderer.start_response(&Message::placeholder("10:00"));
        renderer.print_chunk("");
        assert!(renderer.indicator_visible);
    }

    #[test]
    fn colored_emphasis_uses_palette() {
        let mut renderer = PlainTextRenderer::with_writer(Vec::new(), true);
        renderer.set_theme(&Theme::high_contrast());
        let spans = markup::render_inline("a *b*");
        let text = renderer.format_spans(&spans);
        assert!(text.contains(&format!("{}b{ANSI_RESET}", Palette::HIGH_CONTRAST.emphasis)));
    }
}
