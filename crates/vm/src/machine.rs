//! Thread state: the call stack of frames.

use crate::error::RuntimeError;
use crate::frame::Frame;

/// Default limit on the number of frames one thread may hold.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;

/// One logical thread of execution.
///
/// The top frame is the method currently executing. The thread has
/// finished exactly when its call stack is empty.
#[derive(Debug, Clone)]
pub struct Thread<'a> {
    /// pc of the instruction most recently fetched, in the active frame.
    pc: usize,
    frames: Vec<Frame<'a>>,
    max_depth: usize,
}

impl<'a> Thread<'a> {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_CALL_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            pc: 0,
            frames: Vec::new(),
            max_depth,
        }
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub(crate) fn set_pc(&mut self, pc: usize) {
        self.pc = pc;
    }

    /// Make `frame` the active frame.
    pub fn push_frame(&mut self, frame: Frame<'a>) -> Result<(), RuntimeError> {
        if self.frames.len() >= self.max_depth {
            return Err(RuntimeError::CallStackOverflow {
                depth: self.frames.len(),
            });
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop_frame(&mut self) -> Option<Frame<'a>> {
        self.frames.pop()
    }

    pub fn current_frame(&self) -> Option<&Frame<'a>> {
        self.frames.last()
    }

    pub fn current_frame_mut(&mut self) -> Option<&mut Frame<'a>> {
        self.frames.last_mut()
    }

    /// The active frame, or [`RuntimeError::NoActiveFrame`].
    pub fn active_frame_mut(&mut self) -> Result<&mut Frame<'a>, RuntimeError> {
        self.frames.last_mut().ok_or(RuntimeError::NoActiveFrame)
    }

    /// Number of frames on the call stack.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_finished(&self) -> bool {
        self.frames.is_empty()
    }
}

impl Default for Thread<'_> {
    fn default() -> Self {
        Self::new()
    }
}
