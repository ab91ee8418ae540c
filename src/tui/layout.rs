use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Position, Rect};

use crate::models::Status;

/// Board layout: a header line, four equal status columns, and a one-line
/// status bar. The column rects double as the drop zones for drag
/// resolution, so they must come from the same calculation the renderer
/// used for the frame the gesture happened in.
pub struct BoardLayout {
    pub header_area: Rect,
    pub columns: [Rect; 4],
    pub status_area: Rect,
}

impl BoardLayout {
    /// Minimum terminal dimensions for a usable four-column board
    pub const MIN_WIDTH: u16 = 60;
    pub const MIN_HEIGHT: u16 = 12;

    pub fn calculate(size: Rect) -> Self {
        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Min(1),    // Columns
                Constraint::Length(1), // Status bar
            ])
            .split(size);

        let horizontal = RatLayout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 4),
                Constraint::Ratio(1, 4),
                Constraint::Ratio(1, 4),
                Constraint::Ratio(1, 4),
            ])
            .split(vertical[1]);

        Self {
            header_area: vertical[0],
            columns: [horizontal[0], horizontal[1], horizontal[2], horizontal[3]],
            status_area: vertical[2],
        }
    }

    /// The drop zone rect for a column
    pub fn column_rect(&self, status: Status) -> Rect {
        let idx = Status::ALL
            .iter()
            .position(|s| *s == status)
            .unwrap_or(0);
        self.columns[idx]
    }

    /// Resolve a pointer position to the column containing it.
    ///
    /// Columns are tested in `Status::ALL` order and the first containing
    /// rect wins; a position outside all four resolves to `None`.
    pub fn column_at(&self, x: u16, y: u16) -> Option<Status> {
        let pos = Position::new(x, y);
        Status::ALL
            .iter()
            .copied()
            .find(|status| self.column_rect(*status).contains(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> BoardLayout {
        BoardLayout::calculate(Rect::new(0, 0, 80, 24))
    }

    #[test]
    fn four_columns_span_the_board() {
        let l = layout();
        assert_eq!(l.columns.iter().map(|c| c.width).sum::<u16>(), 80);
        for c in &l.columns {
            assert_eq!(c.y, 1);
            assert_eq!(c.height, 22);
        }
    }

    #[test]
    fn column_hit_testing_follows_enumeration_order() {
        let l = layout();
        assert_eq!(l.column_at(0, 5), Some(Status::Todo));
        assert_eq!(l.column_at(25, 5), Some(Status::InProgress));
        assert_eq!(l.column_at(45, 5), Some(Status::UnderReview));
        assert_eq!(l.column_at(79, 5), Some(Status::Completed));
    }

    #[test]
    fn positions_outside_the_columns_resolve_to_none() {
        let l = layout();
        // header row and status bar row are not drop zones
        assert_eq!(l.column_at(10, 0), None);
        assert_eq!(l.column_at(10, 23), None);
        // off the right edge
        assert_eq!(l.column_at(80, 5), None);
    }
}
