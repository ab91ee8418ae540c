use ratatui::layout::Rect;

use crate::models::Status;
use crate::tui::layout::BoardLayout;

/// Horizontal travel (in cells) a pressed card must see before the press
/// becomes a drag. Releases under the threshold are treated as clicks.
pub const DRAG_THRESHOLD: u16 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// Pressed, threshold not yet crossed; the card is still in its column
    Armed,
    /// Threshold crossed; the card renders detached under the pointer
    Dragging,
}

/// What a release resolved to. `Click` means the session never left `Armed`;
/// `Cancelled` covers both a drop outside every column and a drop back onto
/// the card's current column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Click,
    Cancelled,
    Commit(Status),
}

/// State for one pointer gesture on one card.
///
/// Created on pointer-down, updated on every pointer-move, consumed by
/// `release` on pointer-up. The owner holds it as `Option<DragSession>`, so
/// dropping it on every release path is what guarantees no gesture state
/// leaks across cards. Phases only ever move `Armed -> Dragging`; there is
/// no way back.
#[derive(Debug, Clone)]
pub struct DragSession {
    pub note_id: i64,
    origin: (u16, u16),
    grab_offset: (u16, u16),
    current: (u16, u16),
    card_size: (u16, u16),
    phase: DragPhase,
}

impl DragSession {
    /// Start a session from a pointer-down on a card occupying `card_area`
    pub fn press(note_id: i64, x: u16, y: u16, card_area: Rect) -> Self {
        Self {
            note_id,
            origin: (x, y),
            grab_offset: (x.saturating_sub(card_area.x), y.saturating_sub(card_area.y)),
            current: (x, y),
            card_size: (card_area.width, card_area.height),
            phase: DragPhase::Armed,
        }
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::Dragging
    }

    /// Track a pointer-move. Crosses into `Dragging` once the horizontal
    /// displacement from the press position exceeds the threshold; once
    /// dragging, every move just updates the pointer.
    pub fn update(&mut self, x: u16, y: u16) {
        self.current = (x, y);
        if self.phase == DragPhase::Armed && x.abs_diff(self.origin.0) > DRAG_THRESHOLD {
            self.phase = DragPhase::Dragging;
        }
    }

    /// Where the detached card should render: pointer position minus the
    /// grab offset, at the size the card had when it was picked up, clipped
    /// to `bounds`.
    pub fn overlay_rect(&self, bounds: Rect) -> Rect {
        let x = self.current.0.saturating_sub(self.grab_offset.0);
        let y = self.current.1.saturating_sub(self.grab_offset.1);
        let width = self.card_size.0.min(bounds.width.saturating_sub(x.min(bounds.width)));
        let height = self
            .card_size
            .1
            .min(bounds.height.saturating_sub(y.min(bounds.height)));
        Rect::new(x, y, width, height)
    }

    /// Consume the session on pointer-up and decide what the release means.
    ///
    /// A release while still `Armed` is a click. Otherwise the release
    /// position is resolved against the four column rects; `None` and the
    /// card's current column cancel, anything else commits.
    pub fn release(self, x: u16, y: u16, layout: &BoardLayout, current_status: Status) -> DropOutcome {
        if self.phase == DragPhase::Armed {
            return DropOutcome::Click;
        }

        match layout.column_at(x, y) {
            None => DropOutcome::Cancelled,
            Some(target) if target == current_status => DropOutcome::Cancelled,
            Some(target) => DropOutcome::Commit(target),
        }
    }
}
