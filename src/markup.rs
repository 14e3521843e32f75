//! Lightweight markup for message bodies.
//!
//! Message text is turned into display [`Block`]s without a markdown parser:
//! runs of bullet lines (`* ` or `- `) become a list, every other non-blank
//! line becomes a paragraph, and `*` toggles emphasis inside a line.
//!
//! Emphasis is an alternating split, not a pair matcher.  An odd number of
//! `*` characters leaves the final span emphasized through the end of the
//! line.  This is intentional and relied upon by the display layer.

/// A run of inline text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    /// Unstyled text.
    Plain(String),
    /// Text between `*` delimiters.
    Emphasis(String),
}

impl Span {
    /// The text of the span without styling.
    pub fn text(&self) -> &str {
        match self {
            Span::Plain(text) | Span::Emphasis(text) => text,
        }
    }

    /// Returns true for emphasized spans.
    pub fn is_emphasis(&self) -> bool {
        matches!(self, Span::Emphasis(_))
    }
}

/// A display block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// One line of text.
    Paragraph(Vec<Span>),
    /// Consecutive bullet lines; one entry per item.
    List(Vec<Vec<Span>>),
}

/// Render `text` into display blocks.
///
/// Total on every input; the empty string renders to no blocks.
pub fn render(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut pending: Vec<Vec<Span>> = Vec::new();

    for line in text.split('\n') {
        let trimmed = line.trim();
        if let Some(item) = list_item(trimmed) {
            pending.push(render_inline(item));
        } else {
            flush_list(&mut pending, &mut blocks);
            if !trimmed.is_empty() {
                blocks.push(Block::Paragraph(render_inline(line)));
            }
        }
    }
    flush_list(&mut pending, &mut blocks);

    blocks
}

/// Split `line` on `*`, emphasizing the odd-numbered segments.
pub fn render_inline(line: &str) -> Vec<Span> {
    line.split('*')
        .enumerate()
        .map(|(i, part)| {
            if i % 2 == 1 {
                Span::Emphasis(part.to_string())
            } else {
                Span::Plain(part.to_string())
            }
        })
        .collect()
}

fn list_item(trimmed: &str) -> Option<&str> {
    trimmed
        .strip_prefix("* ")
        .or_else(|| trimmed.strip_prefix("- "))
}

fn flush_list(pending: &mut Vec<Vec<Span>>, blocks: &mut Vec<Block>) {
    if !pending.is_empty() {
        blocks.push(Block::List(std::mem::take(pending)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> Span {
        Span::Plain(text.to_string())
    }

    fn emphasis(text: &str) -> Span {
        Span::Emphasis(text.to_string())
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert!(render("").is_empty());
        assert!(render("\n  \n\t\n").is_empty());
    }

    #[test]
    fn single_list_item() {
        assert_eq!(render("- item"), vec![Block::List(vec![vec![plain("item")]])]);
    }

    #[test]
    fn bold_pair() {
        assert_eq!(
            render("*bold*"),
            vec![Block::Paragraph(vec![plain(""), emphasis("bold"), plain("")])]
        );
    }

    #[test]
    fn unmatched_delimiter_emphasizes_to_end_of_line() {
        assert_eq!(
            render("price is *5 dollars"),
            vec![Block::Paragraph(vec![plain("price is "), emphasis("5 dollars")])]
        );
    }

    #[test]
    fn consecutive_bullets_form_one_list() {
        let text = "Our values:\n* *Innovation:* technology\n- *Equity:* access\n\nThanks!";
        assert_eq!(
            render(text),
            vec![
                Block::Paragraph(vec![plain("Our values:")]),
                Block::List(vec![
                    vec![plain(""), emphasis("Innovation:"), plain(" technology")],
                    vec![plain(""), emphasis("Equity:"), plain(" access")],
                ]),
                Block::Paragraph(vec![plain("Thanks!")]),
            ]
        );
    }

    #[test]
    fn blank_line_splits_lists() {
        let blocks = render("- a\n\n- b");
        assert_eq!(
            blocks,
            vec![
                Block::List(vec![vec![plain("a")]]),
                Block::List(vec![vec![plain("b")]]),
            ]
        );
    }

    #[test]
    fn indented_bullet_is_still_a_list_item() {
        assert_eq!(
            render("   * nested"),
            vec![Block::List(vec![vec![plain("nested")]])]
        );
    }

    #[test]
    fn paragraph_keeps_untrimmed_line() {
        assert_eq!(
            render("  indented  "),
            vec![Block::Paragraph(vec![plain("  indented  ")])]
        );
    }

    #[test]
    fn bullet_marker_without_space_is_a_paragraph() {
        assert_eq!(
            render("*not a bullet"),
            vec![Block::Paragraph(vec![plain(""), emphasis("not a bullet")])]
        );
        assert_eq!(render("-5 degrees"), vec![Block::Paragraph(vec![plain("-5 degrees")])]);
    }

    #[test]
    fn lone_marker_is_not_a_list_item() {
        // Trimming removes the space after the marker.
        assert_eq!(render("- "), vec![Block::Paragraph(vec![plain("- ")])]);
    }

    #[test]
    fn render_is_deterministic() {
        let text = "Intro *key* term\n* one\n* two *half\nend";
        assert_eq!(render(text), render(text));
    }

    #[test]
    fn crlf_lines_render_without_carriage_returns_in_items() {
        assert_eq!(
            render("- a\r\n- b\r"),
            vec![Block::List(vec![vec![plain("a")], vec![plain("b")]])]
        );
    }
}
