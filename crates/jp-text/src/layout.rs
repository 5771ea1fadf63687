//! Box fitting and line splitting for full-width Japanese text
//!
//! All helpers share one width model: every character occupies
//! `0.6 * font_size` points. The pre-printed form boxes were tuned against
//! this exact approximation, so it must not be swapped for real font metrics
//! without re-measuring every box on the template.

/// Width factor per character, in font-size units
const CHAR_WIDTH_FACTOR: f64 = 0.6;

/// Marker appended to truncated text
const ELLIPSIS: &str = "…";

/// Approximate rendered width of `text` in points
pub fn approx_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * CHAR_WIDTH_FACTOR
}

/// Fit text into a box of `max_width` points, truncating with an ellipsis
/// when it would overflow
///
/// Returns the input unchanged when it already fits. Otherwise the text is
/// cut to `floor(len * max_width / total_width) - 2` characters (clamped to
/// zero) and the ellipsis marker is appended.
///
/// # Examples
/// ```
/// use jp_text::fit_text;
/// assert_eq!(fit_text("山田太郎", 100.0, 9.0), "山田太郎");
/// assert_eq!(fit_text("", 100.0, 9.0), "");
/// ```
pub fn fit_text(text: &str, max_width: f64, font_size: f64) -> String {
    if text.is_empty() {
        return String::new();
    }

    let char_count = text.chars().count();
    let total_width = char_count as f64 * font_size * CHAR_WIDTH_FACTOR;

    if total_width <= max_width {
        return text.to_string();
    }

    let ratio = max_width / total_width;
    let keep = ((char_count as f64 * ratio).floor() as i64 - 2).max(0) as usize;

    let mut result: String = text.chars().take(keep).collect();
    result.push_str(ELLIPSIS);
    result
}

/// Split text into at most two lines of `max_width` points each
///
/// Greedy fill: each line takes `floor(max_width / (0.6 * font_size))`
/// characters. Text beyond the second line is dropped. The box on the form
/// genuinely holds only two lines, so overflow past that is discarded rather
/// than marked.
///
/// # Examples
/// ```
/// use jp_text::split_lines;
/// let lines = split_lines("短い", 100.0, 9.0);
/// assert_eq!(lines, vec!["短い"]);
/// ```
pub fn split_lines(text: &str, max_width: f64, font_size: f64) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let chars_per_line = (max_width / (font_size * CHAR_WIDTH_FACTOR)).floor() as usize;
    if chars_per_line == 0 {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut lines = Vec::with_capacity(2);

    for chunk in chars.chunks(chars_per_line).take(2) {
        lines.push(chunk.iter().collect());
    }

    lines
}
