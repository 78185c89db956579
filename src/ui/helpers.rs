use std::error::Error;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Split the content area into `count` equal columns.
pub(crate) fn split_columns(area: Rect, count: usize) -> Vec<Rect> {
    let count = count.max(1) as u32;
    let constraints = (0..count).map(|_| Constraint::Ratio(1, count));
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area)
        .to_vec()
}

/// Carve a fixed-height footer off the bottom of `area` when there is room.
pub(crate) fn split_footer(area: Rect, footer_height: u16) -> (Rect, Option<Rect>) {
    if area.height <= footer_height {
        return (area, None);
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
        .split(area);
    (chunks[0], Some(chunks[1]))
}

/// Extract the most relevant message from an error and its sources.
pub(crate) fn surface_error(err: &(dyn Error + 'static)) -> String {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}

/// Clamp `current + offset` into `0..len`; `None` current starts at the edge
/// the offset points away from.
pub(crate) fn step_index(current: Option<usize>, offset: isize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let last = len - 1;
    let next = match current {
        None if offset < 0 => last,
        None => 0,
        Some(index) => index.saturating_add_signed(offset).min(last),
    };
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_index_clamps_to_bounds() {
        assert_eq!(step_index(None, 1, 0), None);
        assert_eq!(step_index(None, 1, 3), Some(0));
        assert_eq!(step_index(None, -1, 3), Some(2));
        assert_eq!(step_index(Some(0), -1, 3), Some(0));
        assert_eq!(step_index(Some(1), 10, 3), Some(2));
        assert_eq!(step_index(Some(5), 0, 3), Some(2));
    }

    #[test]
    fn surface_error_reports_innermost_cause() {
        let err = crate::config::ConfigError::Read {
            path: "config.toml".into(),
            source: std::io::Error::other("disk gone"),
        };
        assert_eq!(surface_error(&err), "disk gone");

        let err = crate::view::ViewError::from(crate::db::SourceError::Unavailable {
            reason: "offline".into(),
        });
        assert_eq!(surface_error(&err), "record source unavailable: offline");
    }

    #[test]
    fn columns_cover_the_whole_width() {
        let columns = split_columns(Rect::new(0, 0, 90, 10), 3);
        assert_eq!(columns.len(), 3);
        assert_eq!(columns.iter().map(|rect| rect.width).sum::<u16>(), 90);
    }
}
