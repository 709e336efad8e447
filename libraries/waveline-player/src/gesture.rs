//! Press-drag-release capture for the volume slider

use std::fmt;

/// Pointer listeners the host attached for the length of one drag
///
/// `release` detaches the pointer-move and pointer-up listeners.
pub trait PointerCapture {
    fn release(&mut self);
}

/// Closure-backed capture, handy for hosts that already hold a detach callback
pub struct FnCapture<F: FnMut()>(pub F);

impl<F: FnMut()> PointerCapture for FnCapture<F> {
    fn release(&mut self) {
        (self.0)();
    }
}

/// Owns a [`PointerCapture`] and releases it exactly once
///
/// Release happens on [`CaptureGuard::release`] or on drop, whichever comes
/// first.
#[derive(Default)]
pub struct CaptureGuard {
    capture: Option<Box<dyn PointerCapture>>,
}

impl CaptureGuard {
    pub fn new(capture: Box<dyn PointerCapture>) -> Self {
        Self {
            capture: Some(capture),
        }
    }

    pub fn is_held(&self) -> bool {
        self.capture.is_some()
    }

    pub fn release(&mut self) {
        if let Some(mut capture) = self.capture.take() {
            capture.release();
        }
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for CaptureGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureGuard")
            .field("held", &self.is_held())
            .finish()
    }
}

/// Horizontal drag over the volume bar
#[derive(Debug, Default)]
pub struct VolumeDrag {
    left_bound: Option<f64>,
    right_bound: Option<f64>,
    guard: CaptureGuard,
}

impl VolumeDrag {
    /// Begin a drag over an element spanning `[left, left + width]`
    ///
    /// Any capture still held from an earlier drag is released first.
    /// Returns the volume for the press position.
    pub fn start(
        &mut self,
        pointer_x: f64,
        element_left: f64,
        element_width: f64,
        capture: Box<dyn PointerCapture>,
    ) -> f64 {
        self.guard.release();
        self.left_bound = Some(element_left);
        self.right_bound = Some(element_left + element_width);
        self.guard = CaptureGuard::new(capture);
        pointer_x - element_left
    }

    /// Volume for a pointer move, `None` when inactive or outside the bounds
    pub fn track(&self, pointer_x: f64) -> Option<f64> {
        if !self.is_active() {
            return None;
        }
        let (left, right) = (self.left_bound?, self.right_bound?);
        if pointer_x >= left && pointer_x <= right {
            Some(pointer_x - left)
        } else {
            None
        }
    }

    /// End the drag and detach the listeners
    ///
    /// The bounds of the last drag are kept for display.
    pub fn end(&mut self) {
        self.guard.release();
    }

    pub fn is_active(&self) -> bool {
        self.guard.is_held()
    }

    pub fn left_bound(&self) -> Option<f64> {
        self.left_bound
    }

    pub fn right_bound(&self) -> Option<f64> {
        self.right_bound
    }
}
