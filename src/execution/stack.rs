//! Execution stack - the suspension points started by one run

use crate::core::SuspensionPoint;

/// A suspension point together with the position of the step that made it
#[derive(Debug)]
pub struct Frame<A, R> {
    pub index: usize,
    pub point: SuspensionPoint<A, R>,
}

/// LIFO record of the suspension points started so far
///
/// Points are pushed in the order their steps ran and popped innermost
/// first, so the unwind mirrors the nesting of the steps.
#[derive(Debug)]
pub struct ExecutionStack<A, R> {
    frames: Vec<Frame<A, R>>,
}

impl<A, R> ExecutionStack<A, R> {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Push a point and hand it back so it can be started in place
    pub fn push(&mut self, index: usize, point: SuspensionPoint<A, R>) -> &mut SuspensionPoint<A, R> {
        self.frames.push(Frame { index, point });
        let last = self.frames.len() - 1;
        &mut self.frames[last].point
    }

    /// Remove the most recently pushed point
    pub fn pop(&mut self) -> Option<Frame<A, R>> {
        self.frames.pop()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Step indices from the outermost to the innermost point
    pub fn indices(&self) -> Vec<usize> {
        self.frames.iter().map(|frame| frame.index).collect()
    }

    /// Drain the frames innermost first
    pub fn drain_innermost_first(self) -> impl Iterator<Item = Frame<A, R>> {
        self.frames.into_iter().rev()
    }
}

impl<A, R> Default for ExecutionStack<A, R> {
    fn default() -> Self {
        Self::new()
    }
}
