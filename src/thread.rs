use std::{cell::RefCell, sync::Arc};

use crate::{
    jvm::{class_name, return_tag},
    modifiers::EventContext,
    requests::EventRequest,
    session::Session,
    spec::{event::Event, *},
    stepping::{FrameStepContext, StepStack},
    vm::ClassInfo,
};

/// Events produced by one hook, sent as a single composite.
#[derive(Debug, Default)]
struct Fired {
    events: Vec<Event>,
    policy: Option<SuspendPolicy>,
    steps: Vec<RequestID>,
}

impl Fired {
    fn add(&mut self, request: &EventRequest, event: Event) {
        let policy = request.suspend_policy();
        self.policy = Some(self.policy.map_or(policy, |p| p.max(policy)));
        if request.kind() == EventKind::SingleStep {
            self.steps.push(request.id());
        }
        self.events.push(event);
    }
}

/// Context for events tied to the current instruction.
fn location_context(frame: &FrameStepContext, thread: ThreadID) -> EventContext<'_> {
    method_context(frame, thread)
        .at(frame.location())
        .with_this(frame.this())
}

/// Method entry and exit only filter on the thread and the class.
fn method_context(frame: &FrameStepContext, thread: ThreadID) -> EventContext<'_> {
    let ctx = EventContext::new(thread);
    match frame.class() {
        Some(class) => ctx.with_class(class),
        None => EventContext {
            class_id: Some(*frame.location().reference_id),
            ..ctx
        },
    }
}

/// The execution hooks of one interpreter thread.
///
/// The interpreter calls these in program order from the thread they
/// describe, which is why this is not [Sync]. Every hook may block while the
/// debugger has the thread suspended, and all of them do nothing once the
/// session has ended.
#[derive(Debug)]
pub struct DebugThread {
    session: Arc<Session>,
    thread: ThreadID,
    stack: RefCell<StepStack>,
}

impl DebugThread {
    pub fn new(session: Arc<Session>, thread: ThreadID) -> Self {
        DebugThread {
            session,
            thread,
            stack: RefCell::default(),
        }
    }

    pub fn id(&self) -> ThreadID {
        self.thread
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn frame_entered(&self, location: Location, this: Option<ObjectID>) {
        if !self.session.is_active() {
            return;
        }
        let class = self.session.debuggee().class(*location.reference_id);
        let lines = self
            .session
            .source()
            .line_table(*location.reference_id, location.method_id);
        self.stack
            .borrow_mut()
            .push(FrameStepContext::new(location, class, lines, this));
        self.checkpoint();

        let mut fired = Fired::default();
        if let Some(top) = self.stack.borrow().top() {
            let ctx = method_context(top, self.thread);
            self.collect(EventKind::MethodEntry, &ctx, &mut fired, |id| {
                Event::MethodEntry(id, self.thread, location)
            });
        }
        self.deliver(fired);
    }

    /// Called before the instruction at `location` executes.
    pub fn instruction(&self, location: Location) {
        if !self.session.is_active() {
            return;
        }
        self.claim();
        self.stack.borrow_mut().move_to(location);
        self.checkpoint();
        let fired = self.location_events(location, true);
        self.deliver(fired);
    }

    /// Called as the top frame returns, before it is gone.
    ///
    /// `return_value` is `None` for void methods.
    pub fn frame_exited(&self, return_value: Option<Value>) {
        if self.session.is_active() {
            self.checkpoint();
            let mut fired = Fired::default();
            if let Some(top) = self.stack.borrow().top() {
                let location = top.location();
                let ctx = method_context(top, self.thread);
                self.collect(EventKind::MethodExit, &ctx, &mut fired, |id| {
                    Event::MethodExit(id, self.thread, location)
                });

                let declared = top
                    .class()
                    .and_then(|c| c.method(location.method_id))
                    .map(|m| return_tag(&m.signature));
                let value = match (return_value, declared) {
                    (Some(value), Some(tag)) => value.coerce_to(tag),
                    (Some(value), None) => value,
                    (None, _) => Value::Void,
                };
                self.collect(EventKind::MethodExitWithReturnValue, &ctx, &mut fired, |id| {
                    Event::MethodExitWithReturnValue(id, self.thread, location, value)
                });
            }
            self.deliver(fired);
        }
        self.stack.borrow_mut().pop();
    }

    /// Called once control is back in the caller after a return, with the
    /// caller's resume location.
    pub fn returned_to(&self, location: Location) {
        if !self.session.is_active() {
            return;
        }
        self.stack.borrow_mut().move_to(location);
        self.checkpoint();
        let fired = self.location_events(location, false);
        self.deliver(fired);
    }

    /// `catch` is where the exception will be caught, `None` if it won't be.
    pub fn exception_thrown(&self, exception: TaggedObjectID, catch: Option<Location>) {
        if !self.session.is_active() {
            return;
        }
        self.checkpoint();
        let exception_types = self.type_and_superclasses(*exception);

        let mut fired = Fired::default();
        if let Some(top) = self.stack.borrow().top() {
            let location = top.location();
            let ctx = location_context(top, self.thread)
                .with_exception(exception_types, catch.is_some());
            self.collect(EventKind::Exception, &ctx, &mut fired, |id| {
                Event::Exception(id, self.thread, location, exception, catch)
            });
        }
        self.deliver(fired);
    }

    pub fn thread_started(&self) {
        self.thread_event(EventKind::ThreadStart, Event::ThreadStart);
    }

    pub fn thread_died(&self) {
        self.thread_event(EventKind::ThreadDeath, Event::ThreadDeath);
    }

    fn thread_event(&self, kind: EventKind, event: fn(RequestID, ThreadID) -> Event) {
        if !self.session.is_active() {
            return;
        }
        self.checkpoint();
        let mut fired = Fired::default();
        let ctx = EventContext::new(self.thread);
        self.collect(kind, &ctx, &mut fired, |id| event(id, self.thread));
        self.deliver(fired);
    }

    pub fn class_prepared(&self, class: &ClassInfo) {
        if !self.session.is_active() {
            return;
        }
        self.checkpoint();
        let mut fired = Fired::default();
        let ctx = EventContext::new(self.thread).with_class(class);
        self.collect(EventKind::ClassPrepare, &ctx, &mut fired, |id| {
            Event::ClassPrepare(id, self.thread, class.id, class.signature.clone(), class.status)
        });
        self.deliver(fired);
    }

    pub fn class_unloaded(&self, signature: &str) {
        if !self.session.is_active() {
            return;
        }
        let mut fired = Fired::default();
        let ctx = EventContext::new(self.thread).with_class_name(class_name(signature));
        self.collect(EventKind::ClassUnload, &ctx, &mut fired, |id| {
            Event::ClassUnload(id, signature.to_owned())
        });
        self.deliver(fired);
    }

    /// The runtime type of `object` followed by its superclasses.
    fn type_and_superclasses(&self, object: ObjectID) -> Vec<ReferenceTypeID> {
        let debuggee = self.session.debuggee();
        let mut types = Vec::new();
        let mut next = debuggee.object_type(object).ok().map(|t| *t);
        while let Some(id) = next.filter(|id| !types.contains(id)) {
            types.push(id);
            next = debuggee.class(id).and_then(|c| c.superclass).map(|s| *s);
        }
        types
    }

    /// Steps completing here, and breakpoints at this location if asked for.
    fn location_events(&self, location: Location, breakpoints: bool) -> Fired {
        let mut fired = Fired::default();
        let mut stack = self.stack.borrow_mut();
        let due = stack.due();
        let class;
        let ctx = match stack.top() {
            Some(top) => location_context(top, self.thread),
            // code running in frames entered before the session began
            None => {
                class = self.session.debuggee().class(*location.reference_id);
                let ctx = EventContext::new(self.thread);
                match &class {
                    Some(info) => ctx.with_class(info),
                    None => ctx,
                }
                .at(location)
            }
        };
        for request in due {
            if request.matches(&ctx) {
                fired.add(&request, Event::SingleStep(request.id(), self.thread, location));
            }
        }
        if breakpoints {
            self.collect(EventKind::Breakpoint, &ctx, &mut fired, |id| {
                Event::Breakpoint(id, self.thread, location)
            });
        }
        fired
    }

    fn collect(
        &self,
        kind: EventKind,
        ctx: &EventContext<'_>,
        fired: &mut Fired,
        event: impl Fn(RequestID) -> Event,
    ) {
        for request in self.session.requests().of_kind(kind) {
            if request.matches(ctx) {
                fired.add(&request, event(request.id()));
            }
        }
    }

    /// Sends what fired and hands control to the debugger.
    ///
    /// No borrow of the step stack may be held here, the debugger can make
    /// this thread run code while it has control.
    fn deliver(&self, fired: Fired) {
        let Some(policy) = fired.policy else {
            return;
        };
        if !fired.steps.is_empty() {
            self.stack.borrow_mut().fired(&fired.steps);
        }
        self.session.send_events(policy, fired.events);
        self.session.give_control(self.thread, policy);
        self.claim();
    }

    fn claim(&self) {
        let requests = self.session.requests().of_kind(EventKind::SingleStep);
        if !requests.is_empty() {
            self.stack.borrow_mut().claim(&requests, self.thread);
        }
    }

    /// Parks the thread if the debugger suspended it meanwhile.
    fn checkpoint(&self) {
        self.session.park(self.thread);
        self.claim();
    }
}
