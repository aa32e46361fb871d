use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cut `s` to `width` columns, marking the cut with "..".
pub(crate) fn truncate_display(s: &str, width: usize) -> String {
    if UnicodeWidthStr::width(s) <= width {
        return s.to_string();
    }
    if width < 3 {
        return s.chars().take(width).collect();
    }

    let mut used = 0;
    let kept: String = s
        .chars()
        .take_while(|ch| {
            used += UnicodeWidthChar::width(*ch).unwrap_or(0);
            used <= width - 2
        })
        .collect();
    kept + ".."
}

pub(crate) fn pad_right(s: &str, width: usize) -> String {
    let cell = truncate_display(s, width);
    let fill = width.saturating_sub(UnicodeWidthStr::width(cell.as_str()));
    cell + &" ".repeat(fill)
}

/// Render rows as a fixed-width text table with a header rule.
///
/// Each column is as wide as its widest cell, capped at `max_width`.
pub(crate) fn render_table(headers: &[&str], rows: &[Vec<String>], max_width: usize) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| UnicodeWidthStr::width(*h)).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(UnicodeWidthStr::width(cell.as_str()));
        }
    }
    for w in widths.iter_mut() {
        *w = (*w).min(max_width);
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad_right(c, *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(headers.to_vec()));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}
