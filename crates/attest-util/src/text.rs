//! Text helpers for file naming and PDF layout
//!
//! The PDF backend exposes no text metrics for the built-in fonts, so
//! widths are estimated from an average glyph width per font. Good enough
//! for centering header lines and wrapping remarks; not pixel-exact.

/// One PostScript point in millimeters.
pub const PT_TO_MM: f32 = 0.352_778;

/// Collapse every run of whitespace to a single underscore.
///
/// Used for output file names: `"Acme  Test Labs"` becomes `"Acme_Test_Labs"`.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Estimate the rendered width of `text` in millimeters.
///
/// `avg_char_factor` is the average glyph advance as a fraction of the font
/// size (roughly 0.52 for Helvetica, 0.50 for Times, 0.60 for Courier).
pub fn approx_text_width_mm(text: &str, font_size_pt: f32, avg_char_factor: f32) -> f32 {
    text.chars().count() as f32 * font_size_pt * avg_char_factor * PT_TO_MM
}

/// Greedy word wrap to at most `max_chars` characters per line.
///
/// Words longer than the limit are hard-split so a single long token can
/// never overflow the page width.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > max_chars {
            // Flush whatever is pending, then split the oversized word.
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let split_at = word
                .char_indices()
                .nth(max_chars)
                .map(|(i, _)| i)
                .unwrap_or(word.len());
            lines.push(word[..split_at].to_string());
            word = &word[split_at..];
        }

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };

        if needed > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse_single_and_multiple_spaces() {
        assert_eq!(collapse_whitespace("Acme Test Labs"), "Acme_Test_Labs");
        assert_eq!(collapse_whitespace("Acme  Test\tLabs"), "Acme_Test_Labs");
        assert_eq!(collapse_whitespace("Acme"), "Acme");
    }

    #[test]
    fn wrap_short_text_is_one_line() {
        assert_eq!(wrap_text("short note", 40), vec!["short note"]);
    }

    #[test]
    fn wrap_respects_limit() {
        let lines = wrap_text("contact welding observed after thermal soak cycle", 20);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= 20, "line too long: {:?}", line);
        }
    }

    #[test]
    fn wrap_splits_oversized_word() {
        let lines = wrap_text("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_empty_is_single_empty_line() {
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn width_estimate_scales_with_length() {
        let short = approx_text_width_mm("ab", 10.0, 0.52);
        let long = approx_text_width_mm("abcd", 10.0, 0.52);
        assert!((long - short * 2.0).abs() < 1e-6);
    }
}
