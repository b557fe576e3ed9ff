use crate::{Action, FocusKey};

/// Component-local staging buffer for a focus-list drag gesture.
///
/// The preview order is recomputed from the vertical offset on every move; the
/// store only sees the result once, when the gesture finishes.
#[derive(Clone, Debug)]
pub struct FocusListDrag {
    committed: Vec<FocusKey>,
    heights: Vec<f32>,
    dragged: usize,
    offset_y: f32,
}

impl FocusListDrag {
    /// `heights` are the rendered heights of `committed`, index for index.
    pub fn start(committed: Vec<FocusKey>, heights: Vec<f32>, dragged: &FocusKey) -> Option<Self> {
        if committed.len() != heights.len() {
            return None;
        }
        let dragged = committed.iter().position(|key| key == dragged)?;
        Some(Self {
            committed,
            heights,
            dragged,
            offset_y: 0.0,
        })
    }

    pub fn dragged_key(&self) -> &FocusKey {
        &self.committed[self.dragged]
    }

    pub fn offset_y(&self) -> f32 {
        self.offset_y
    }

    /// Index the dragged entry would land at for a displacement of `dy` pixels
    /// (negative is up). A neighbour is crossed once the pointer passes its
    /// midpoint.
    pub fn target_index(&self, dy: f32) -> usize {
        if !dy.is_finite() || dy == 0.0 {
            return self.dragged;
        }

        let distance = dy.abs();
        let mut traversed = 0.0f32;
        let mut target = self.dragged;

        if dy > 0.0 {
            for idx in (self.dragged + 1)..self.committed.len() {
                let height = self.heights[idx].max(0.0);
                if distance <= traversed + height / 2.0 {
                    break;
                }
                target = idx;
                traversed += height;
            }
        } else {
            for idx in (0..self.dragged).rev() {
                let height = self.heights[idx].max(0.0);
                if distance <= traversed + height / 2.0 {
                    break;
                }
                target = idx;
                traversed += height;
            }
        }

        target
    }

    pub fn preview_order(&self, dy: f32) -> Vec<FocusKey> {
        let target = self.target_index(dy);
        let mut order = self.committed.clone();
        if target != self.dragged {
            let key = order.remove(self.dragged);
            order.insert(target, key);
        }
        order
    }

    /// Records the latest pointer offset and returns the live preview.
    pub fn move_to(&mut self, dy: f32) -> Vec<FocusKey> {
        self.offset_y = dy;
        self.preview_order(dy)
    }

    /// Ends the gesture. Yields the single store mutation, if the order changed.
    pub fn finish(self) -> Option<Action> {
        if self.target_index(self.offset_y) == self.dragged {
            return None;
        }
        Some(Action::ReplaceFocusList {
            keys: self.preview_order(self.offset_y),
        })
    }
}
