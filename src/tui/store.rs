use crate::models::{Note, Status};

/// The single owned, ordered note collection behind the board.
///
/// Order is whatever the service returned (newest first). There is no
/// partial-update API: callers compute the changed collection themselves and
/// replace the whole thing. Each replace bumps `revision`, which is how
/// readers observe that the collection changed between frames. Concurrent
/// replaces are last-write-wins.
#[derive(Debug, Default)]
pub struct NoteStore {
    notes: Vec<Note>,
    revision: u64,
}

impl NoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == Some(id))
    }

    /// Notes in one column, in collection order
    pub fn notes_with_status(&self, status: Status) -> Vec<&Note> {
        self.notes.iter().filter(|n| n.status == status).collect()
    }

    /// Replace the entire collection (the only mutation)
    pub fn replace_all(&mut self, notes: Vec<Note>) {
        self.notes = notes;
        self.revision += 1;
    }

    /// Build the collection that `replace_all` needs for a one-note status
    /// change: same notes, same order, only the matching entry's status
    /// replaced.
    pub fn with_status(&self, id: i64, new_status: Status) -> Vec<Note> {
        self.notes
            .iter()
            .map(|n| {
                if n.id == Some(id) {
                    let mut changed = n.clone();
                    changed.status = new_status;
                    changed
                } else {
                    n.clone()
                }
            })
            .collect()
    }

    /// Build the collection with one note removed
    pub fn without(&self, id: i64) -> Vec<Note> {
        self.notes
            .iter()
            .filter(|n| n.id != Some(id))
            .cloned()
            .collect()
    }

    /// Build the collection with one note's fields replaced wholesale
    pub fn with_replaced(&self, updated: &Note) -> Vec<Note> {
        self.notes
            .iter()
            .map(|n| {
                if n.id == updated.id {
                    updated.clone()
                } else {
                    n.clone()
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: i64, status: Status) -> Note {
        let mut n = Note::new(1, format!("note {}", id), status);
        n.id = Some(id);
        n
    }

    #[test]
    fn replace_bumps_revision() {
        let mut store = NoteStore::new();
        assert_eq!(store.revision(), 0);
        store.replace_all(vec![note(1, Status::Todo)]);
        assert_eq!(store.revision(), 1);
        store.replace_all(Vec::new());
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn with_status_touches_only_the_matching_entry() {
        let mut store = NoteStore::new();
        store.replace_all(vec![note(1, Status::Todo), note(2, Status::UnderReview)]);

        let changed = store.with_status(1, Status::Completed);
        assert_eq!(changed[0].status, Status::Completed);
        assert_eq!(changed[0].title, "note 1");
        assert_eq!(changed[1].status, Status::UnderReview);

        // building the new collection does not mutate the store
        assert_eq!(store.get(1).unwrap().status, Status::Todo);
    }

    #[test]
    fn column_filter_preserves_order() {
        let mut store = NoteStore::new();
        store.replace_all(vec![
            note(3, Status::Todo),
            note(2, Status::InProgress),
            note(1, Status::Todo),
        ]);
        let todos = store.notes_with_status(Status::Todo);
        assert_eq!(
            todos.iter().map(|n| n.id.unwrap()).collect::<Vec<_>>(),
            vec![3, 1]
        );
    }

    #[test]
    fn without_removes_exactly_one() {
        let mut store = NoteStore::new();
        store.replace_all(vec![note(1, Status::Todo), note(2, Status::Todo)]);
        let rest = store.without(1);
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].id, Some(2));
    }
}
