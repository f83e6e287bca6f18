//! Interaction model for the before/after comparison slider.
//!
//! Two states: Idle and Dragging. A pointer-down acquires document-level
//! move/release listeners for the duration of the drag; release or teardown
//! gives them back. The split position is a percentage in [0, 100], clamped
//! against the widget's bounding box rather than extrapolated.

/// Horizontal bounds of the widget, in the pointer event coordinate space.
#[derive(Debug, Clone, Copy)]
pub struct BoundingRect {
    pub left: f64,
    pub width: f64,
}

/// Document-level pointer listener registry.
///
/// Stands in for the global event target the widget attaches its move and
/// release handlers to while a drag is live. Tracked explicitly so teardown
/// can be verified to leave nothing behind.
#[derive(Debug, Default)]
pub struct PointerListeners {
    move_handlers: usize,
    release_handlers: usize,
}

impl PointerListeners {
    pub fn active(&self) -> usize {
        self.move_handlers + self.release_handlers
    }

    fn acquire(&mut self) {
        self.move_handlers += 1;
        self.release_handlers += 1;
    }

    fn release(&mut self) {
        self.move_handlers = self.move_handlers.saturating_sub(1);
        self.release_handlers = self.release_handlers.saturating_sub(1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderState {
    Idle,
    Dragging,
}

#[derive(Debug)]
pub struct ComparisonSlider {
    position: f64,
    state: SliderState,
}

impl Default for ComparisonSlider {
    fn default() -> Self {
        Self {
            position: 50.0,
            state: SliderState::Idle,
        }
    }
}

impl ComparisonSlider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split position as a percentage in [0, 100].
    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn state(&self) -> SliderState {
        self.state
    }

    /// Pointer pressed on the slider surface; acquires the global listeners.
    pub fn pointer_down(&mut self, listeners: &mut PointerListeners) {
        if self.state == SliderState::Dragging {
            return;
        }
        listeners.acquire();
        self.state = SliderState::Dragging;
    }

    /// Pointer moved while dragging. The x coordinate is clamped to the
    /// bounding box, so positions never leave [0, 100] even when the cursor
    /// does.
    pub fn pointer_move(&mut self, rect: BoundingRect, client_x: f64) {
        if self.state != SliderState::Dragging || rect.width <= 0.0 {
            return;
        }

        let x = (client_x - rect.left).clamp(0.0, rect.width);
        self.position = x / rect.width * 100.0;
    }

    /// Pointer released; the drag ends and the listeners are given back.
    pub fn pointer_up(&mut self, listeners: &mut PointerListeners) {
        if self.state == SliderState::Dragging {
            listeners.release();
            self.state = SliderState::Idle;
        }
    }

    /// Widget leaving the display. Releases any listeners still held, which
    /// matters when the widget is removed mid-drag.
    pub fn teardown(&mut self, listeners: &mut PointerListeners) {
        self.pointer_up(listeners);
    }

    /// Percentage of the "after" layer hidden from the right edge.
    pub fn after_clip_inset(&self) -> f64 {
        100.0 - self.position
    }

    /// Horizontal offset of the drag handle, as a percentage.
    pub fn handle_offset(&self) -> f64 {
        self.position
    }
}
