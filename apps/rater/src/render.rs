use std::fmt::Write as _;

use client_core::SessionView;

pub fn render_list(view: &SessionView) -> String {
    let mut out = String::new();
    for (index, entry) in view.entries.iter().enumerate() {
        let marker = if entry.selected { '>' } else { ' ' };
        let _ = write!(out, "{marker} {:>4}. {}", index + 1, entry.name);
        if let Some(rating) = &entry.rating {
            let _ = write!(out, "  [{rating}]");
        }
        out.push('\n');
    }
    out
}

pub fn render_view(view: &SessionView) -> String {
    let mut out = render_list(view);
    let _ = writeln!(out, "{}", view.loading_status);
    if view.has_more {
        out.push_str("More files available: type 'more' to load the next page.\n");
    }
    if !view.entries.is_empty() {
        let _ = writeln!(out, "{}", view.current_label);
        let _ = writeln!(out, "Rating: {}", view.rating_field);
    }
    if let Some(url) = &view.now_playing {
        let _ = writeln!(out, "Now playing: {url}");
    }
    if view.save_visible {
        out.push_str("Unsaved rating: type 'save' to store it.\n");
    }
    out
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
