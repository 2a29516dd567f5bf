use bevy::prelude::*;
use std::collections::HashSet;

use crate::engine::assets::point_store::{ColourPoint, PointKey};

/// How a finalized candidate set is combined with the existing selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    #[default]
    Replace,
    Add,
    Subtract,
}

/// Optional growth of the candidate set before it is combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionExpand {
    #[default]
    None,
    SameColour,
}

/// Which gesture shape the next pointer-down starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureKind {
    Box,
    #[default]
    Lasso,
}

/// An in-progress selection shape, in screen-space pixels.
///
/// A box is two order-independent corners; a path is an ordered vertex list,
/// implicitly closed from the last vertex back to the first.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Box { start: Vec2, end: Vec2 },
    Path(Vec<Vec2>),
}

impl Gesture {
    pub fn begin(kind: GestureKind, at: Vec2) -> Self {
        match kind {
            GestureKind::Box => Gesture::Box { start: at, end: at },
            GestureKind::Lasso => Gesture::Path(vec![at]),
        }
    }

    /// Extend with the latest pointer position: a box moves its second
    /// corner, a path grows at the tail.
    pub fn extend(&mut self, at: Vec2) {
        match self {
            Gesture::Box { end, .. } => *end = at,
            Gesture::Path(vertices) => vertices.push(at),
        }
    }

    /// Outline vertices for on-screen rendering: a box yields its corners in
    /// top-left, top-right, bottom-right, bottom-left order, a path its
    /// vertices in insertion order.
    pub fn outline(&self) -> Vec<Vec2> {
        match self {
            Gesture::Box { start, end } => {
                let min = start.min(*end);
                let max = start.max(*end);
                vec![
                    min,
                    Vec2::new(max.x, min.y),
                    max,
                    Vec2::new(min.x, max.y),
                ]
            }
            Gesture::Path(vertices) => vertices.clone(),
        }
    }
}

/// Field tags delivered to observers on every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    Enabled,
    Mode,
    Expand,
    Gesture,
    Selected,
    BlendMultiply,
}

/// The observable fields of the selection state machine.
#[derive(Debug, Clone, Default)]
pub struct SelectionFields {
    pub enabled: bool,
    pub mode: SelectionMode,
    pub expand: SelectionExpand,
    pub gesture: Option<Gesture>,
    pub selected: Vec<ColourPoint>,
    pub blend_multiply: bool,
}

/// Reaction callback invoked synchronously after each field write.
pub trait SelectionObserver: Send + Sync {
    fn on_change(&mut self, change: StateChange, fields: &SelectionFields);
}

/// Reactive selection record. Every setter performs its mutation and then
/// notifies the registered observers, in registration order, before
/// returning. Collaborators (point store, projector) are passed in at the
/// call sites that need them rather than reached through globals, so
/// multiple instances can run in isolation.
#[derive(Default)]
pub struct SelectionState {
    fields: SelectionFields,
    observers: Vec<Box<dyn SelectionObserver>>,
}

impl SelectionState {
    pub fn observe(&mut self, observer: Box<dyn SelectionObserver>) {
        self.observers.push(observer);
    }

    pub fn fields(&self) -> &SelectionFields {
        &self.fields
    }

    fn notify(&mut self, change: StateChange) {
        for observer in &mut self.observers {
            observer.on_change(change, &self.fields);
        }
    }

    /// Enter or leave selection mode. Leaving discards any in-progress
    /// gesture, keeping the invariant that a gesture only exists while
    /// selection is enabled.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.fields.enabled = enabled;
        self.notify(StateChange::Enabled);

        if !enabled && self.fields.gesture.is_some() {
            self.fields.gesture = None;
            self.notify(StateChange::Gesture);
        }
    }

    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.fields.mode = mode;
        self.notify(StateChange::Mode);
    }

    pub fn set_expand(&mut self, expand: SelectionExpand) {
        self.fields.expand = expand;
        self.notify(StateChange::Expand);
    }

    pub fn set_blend_multiply(&mut self, blend_multiply: bool) {
        self.fields.blend_multiply = blend_multiply;
        self.notify(StateChange::BlendMultiply);
    }

    /// Start a gesture at the current pointer position. Ignored while
    /// selection is disabled.
    pub fn begin_gesture(&mut self, kind: GestureKind, at: Vec2) {
        if !self.fields.enabled {
            return;
        }
        self.fields.gesture = Some(Gesture::begin(kind, at));
        self.notify(StateChange::Gesture);
    }

    /// Extend the in-progress gesture, if any.
    pub fn extend_gesture(&mut self, at: Vec2) {
        if let Some(gesture) = &mut self.fields.gesture {
            gesture.extend(at);
            self.notify(StateChange::Gesture);
        }
    }

    /// Drop the in-progress gesture, if any.
    pub fn clear_gesture(&mut self) {
        if self.fields.gesture.take().is_some() {
            self.notify(StateChange::Gesture);
        }
    }

    /// Combine a finalized candidate set with the current selection
    /// according to the active mode. Candidates are compared by value, not
    /// by reference, since they may be distinct instances of the same
    /// logical point.
    pub fn apply_candidates(&mut self, candidates: Vec<ColourPoint>) {
        let next = match self.fields.mode {
            SelectionMode::Replace => dedup_by_key(candidates),
            SelectionMode::Add => {
                let mut merged = self.fields.selected.clone();
                let mut seen: HashSet<PointKey> = merged.iter().map(|p| p.key()).collect();
                for point in candidates {
                    if seen.insert(point.key()) {
                        merged.push(point);
                    }
                }
                merged
            }
            SelectionMode::Subtract => {
                let removed: HashSet<PointKey> = candidates.iter().map(|p| p.key()).collect();
                self.fields
                    .selected
                    .iter()
                    .copied()
                    .filter(|p| !removed.contains(&p.key()))
                    .collect()
            }
        };

        self.fields.selected = next;
        self.notify(StateChange::Selected);
    }

    /// Reset the selection to empty, e.g. on Escape while idle or when the
    /// point store is replaced.
    pub fn clear_selected(&mut self) {
        self.fields.selected.clear();
        self.notify(StateChange::Selected);
    }
}

fn dedup_by_key(points: Vec<ColourPoint>) -> Vec<ColourPoint> {
    let mut seen: HashSet<PointKey> = HashSet::with_capacity(points.len());
    points.into_iter().filter(|p| seen.insert(p.key())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<StateChange>>>);

    impl SelectionObserver for Recorder {
        fn on_change(&mut self, change: StateChange, _fields: &SelectionFields) {
            self.0.lock().unwrap().push(change);
        }
    }

    impl Recorder {
        fn changes(&self) -> Vec<StateChange> {
            self.0.lock().unwrap().clone()
        }
    }

    fn point(r: f32, x: u32) -> ColourPoint {
        ColourPoint::new(Vec3::new(r, 0.0, 0.0), UVec2::new(x, 0))
    }

    #[test]
    fn replace_ignores_previous_selection() {
        let mut state = SelectionState::default();
        state.apply_candidates(vec![point(0.1, 1), point(0.2, 2)]);
        state.apply_candidates(vec![point(0.3, 3)]);
        assert_eq!(state.fields().selected, vec![point(0.3, 3)]);
    }

    #[test]
    fn replace_with_empty_candidates_clears_selection() {
        let mut state = SelectionState::default();
        state.apply_candidates(vec![point(0.1, 1)]);
        state.apply_candidates(Vec::new());
        assert!(state.fields().selected.is_empty());
    }

    #[test]
    fn add_is_a_union_and_idempotent() {
        let mut state = SelectionState::default();
        state.set_mode(SelectionMode::Add);
        state.apply_candidates(vec![point(0.1, 1)]);
        state.apply_candidates(vec![point(0.1, 1), point(0.2, 2)]);
        assert_eq!(
            state.fields().selected,
            vec![point(0.1, 1), point(0.2, 2)]
        );

        // Adding the same candidates again changes nothing.
        state.apply_candidates(vec![point(0.1, 1), point(0.2, 2)]);
        assert_eq!(
            state.fields().selected,
            vec![point(0.1, 1), point(0.2, 2)]
        );
    }

    #[test]
    fn subtract_removes_by_value_equality() {
        let mut state = SelectionState::default();
        state.apply_candidates(vec![point(0.1, 1), point(0.2, 2)]);
        state.set_mode(SelectionMode::Subtract);

        // A fresh instance with equal values must still match.
        state.apply_candidates(vec![point(0.1, 1)]);
        assert_eq!(state.fields().selected, vec![point(0.2, 2)]);
    }

    #[test]
    fn disabling_discards_the_gesture() {
        let mut state = SelectionState::default();
        state.set_enabled(true);
        state.begin_gesture(GestureKind::Lasso, Vec2::new(5.0, 5.0));
        assert!(state.fields().gesture.is_some());

        state.set_enabled(false);
        assert!(state.fields().gesture.is_none());
    }

    #[test]
    fn gestures_require_enabled_selection() {
        let mut state = SelectionState::default();
        state.begin_gesture(GestureKind::Box, Vec2::ZERO);
        assert!(state.fields().gesture.is_none());
    }

    #[test]
    fn observers_fire_synchronously_in_registration_order() {
        let first = Recorder::default();
        let second = Recorder::default();
        let mut state = SelectionState::default();
        state.observe(Box::new(first.clone()));
        state.observe(Box::new(second.clone()));

        state.set_enabled(true);
        state.begin_gesture(GestureKind::Lasso, Vec2::ZERO);
        state.set_enabled(false);

        let expected = vec![
            StateChange::Enabled,
            StateChange::Gesture,
            StateChange::Enabled,
            StateChange::Gesture, // discarded by disable
        ];
        assert_eq!(first.changes(), expected);
        assert_eq!(second.changes(), expected);
    }

    #[test]
    fn every_setter_notifies() {
        let recorder = Recorder::default();
        let mut state = SelectionState::default();
        state.observe(Box::new(recorder.clone()));

        state.set_mode(SelectionMode::Add);
        state.set_expand(SelectionExpand::SameColour);
        state.set_blend_multiply(true);
        state.clear_selected();

        assert_eq!(
            recorder.changes(),
            vec![
                StateChange::Mode,
                StateChange::Expand,
                StateChange::BlendMultiply,
                StateChange::Selected,
            ]
        );
    }

    #[test]
    fn box_outline_is_corner_ordered() {
        let gesture = Gesture::Box {
            start: Vec2::new(40.0, 30.0),
            end: Vec2::new(10.0, 20.0),
        };
        assert_eq!(
            gesture.outline(),
            vec![
                Vec2::new(10.0, 20.0), // top-left
                Vec2::new(40.0, 20.0), // top-right
                Vec2::new(40.0, 30.0), // bottom-right
                Vec2::new(10.0, 30.0), // bottom-left
            ]
        );
    }

    #[test]
    fn path_extends_at_the_tail() {
        let mut gesture = Gesture::begin(GestureKind::Lasso, Vec2::ZERO);
        gesture.extend(Vec2::new(1.0, 0.0));
        gesture.extend(Vec2::new(2.0, 0.0));
        assert_eq!(
            gesture.outline(),
            vec![Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0)]
        );
    }
}
