//! Per thread step bookkeeping: one context per interpreter frame, mirroring
//! the interpreter's own call stack.
//!
//! A step request is bound to exactly one frame at a time. It follows calls
//! only for INTO steps, and escapes to the caller as a pending step when its
//! frame returns before it fired.

use std::sync::Arc;

use log::trace;

use crate::{
    requests::EventRequest,
    spec::*,
    vm::{ClassInfo, LineTable},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StepStart {
    line: Option<i32>,
    index: u64,
}

#[derive(Debug)]
struct StepBinding {
    request: Arc<EventRequest>,
    size: StepSize,
    depth: StepDepth,
    /// Where the step was armed, `None` once it moved into a new frame.
    start: Option<StepStart>,
}

impl StepBinding {
    fn is_due(&self, frame: &FrameStepContext) -> bool {
        if self.depth == StepDepth::Out {
            return false;
        }
        let Some(start) = self.start else {
            return true;
        };
        match (self.size, frame.line, start.line) {
            (StepSize::Line, Some(line), Some(start_line)) => {
                // a different line at a lower index is a loop back-edge
                line > start_line || (line != start_line && frame.location.index < start.index)
            }
            // without line information a line step is a minimal one
            _ => frame.location.index != start.index,
        }
    }
}

#[derive(Debug)]
pub struct FrameStepContext {
    location: Location,
    line: Option<i32>,
    lines: Option<Arc<LineTable>>,
    class: Option<Arc<ClassInfo>>,
    this: Option<ObjectID>,
    step: Option<StepBinding>,
    /// Steps that escaped a returning callee, fired on control coming back
    /// here.
    pending: Vec<Arc<EventRequest>>,
}

impl FrameStepContext {
    pub fn new(
        location: Location,
        class: Option<Arc<ClassInfo>>,
        lines: Option<Arc<LineTable>>,
        this: Option<ObjectID>,
    ) -> Self {
        FrameStepContext {
            location,
            line: lines.as_ref().and_then(|l| l.line_at(location.index)),
            lines,
            class,
            this,
            step: None,
            pending: Vec::new(),
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn line(&self) -> Option<i32> {
        self.line
    }

    pub fn class(&self) -> Option<&ClassInfo> {
        self.class.as_deref()
    }

    pub fn this(&self) -> Option<ObjectID> {
        self.this
    }

    fn move_to(&mut self, location: Location) {
        self.location = location;
        self.line = self.lines.as_ref().and_then(|l| l.line_at(location.index));
    }

    fn owns(&self, id: RequestID) -> bool {
        self.step.as_ref().map_or(false, |b| b.request.id() == id)
            || self.pending.iter().any(|r| r.id() == id)
    }
}

#[derive(Debug, Default)]
pub struct StepStack {
    frames: Vec<FrameStepContext>,
}

impl StepStack {
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn top(&self) -> Option<&FrameStepContext> {
        self.frames.last()
    }

    pub fn push(&mut self, mut frame: FrameStepContext) {
        if let Some(parent) = self.frames.last_mut() {
            if parent.step.as_ref().map_or(false, |b| b.depth == StepDepth::Into) {
                let callee = frame.location;
                frame.step = parent.step.take().map(|binding| {
                    trace!("step {:?} follows the call into {:?}", binding.request.id(), callee);
                    StepBinding {
                        start: None,
                        ..binding
                    }
                });
            }
        }
        self.frames.push(frame);
    }

    /// Pops the top frame, handing its unfired steps to the caller.
    pub fn pop(&mut self) -> Option<FrameStepContext> {
        let mut frame = self.frames.pop()?;
        if let Some(parent) = self.frames.last_mut() {
            let escaping = frame.step.take().map(|b| b.request);
            for request in frame.pending.drain(..).chain(escaping) {
                if request.is_active() {
                    trace!("step {:?} escapes to {:?}", request.id(), parent.location);
                    parent.pending.push(request);
                }
            }
        }
        Some(frame)
    }

    pub fn move_to(&mut self, location: Location) {
        if let Some(top) = self.frames.last_mut() {
            top.move_to(location);
        }
    }

    /// Binds this thread's unbound step requests to the top frame at its
    /// current location.
    pub fn claim(&mut self, requests: &[Arc<EventRequest>], thread: ThreadID) {
        for request in requests {
            let Some((step_thread, size, depth)) = request.step() else {
                continue;
            };
            if step_thread != thread || !request.is_active() {
                continue;
            }
            let id = request.id();
            if self.frames.iter().any(|f| f.owns(id)) {
                continue;
            }
            let Some(top) = self.frames.last_mut() else {
                return;
            };
            if top.step.as_ref().map_or(false, |b| b.request.is_active()) {
                return;
            }
            let start = StepStart {
                line: top.line,
                index: top.location.index,
            };
            trace!("step {:?} armed at {:?} line {:?}", id, top.location, start.line);
            top.step = Some(StepBinding {
                request: request.clone(),
                size,
                depth,
                start: Some(start),
            });
        }
    }

    /// Step requests that complete at the top frame's current location.
    pub fn due(&mut self) -> Vec<Arc<EventRequest>> {
        let Some(top) = self.frames.last_mut() else {
            return Vec::new();
        };
        top.pending.retain(|r| r.is_active());
        if top.step.as_ref().map_or(false, |b| !b.request.is_active()) {
            top.step = None;
        }

        let mut due = top.pending.clone();
        if let Some(binding) = &top.step {
            if binding.is_due(top) {
                due.push(binding.request.clone());
            }
        }
        due
    }

    /// Disarms steps that were just reported.
    pub fn fired(&mut self, ids: &[RequestID]) {
        let Some(top) = self.frames.last_mut() else {
            return;
        };
        top.pending.retain(|r| !ids.contains(&r.id()));
        if top.step.as_ref().map_or(false, |b| ids.contains(&b.request.id())) {
            trace!("step {:?} fired at {:?}", top.step.as_ref().map(|b| b.request.id()), top.location);
            top.step = None;
        }
    }
}
