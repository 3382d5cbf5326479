use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, AtomicI32, Ordering},
        Arc, RwLock, RwLockReadGuard, RwLockWriteGuard,
    },
};

use log::{debug, warn};

use crate::{
    modifiers::{EventContext, EventModifier},
    spec::*,
};

/// A subscription set by the debugger.
#[derive(Debug)]
pub struct EventRequest {
    id: RequestID,
    kind: EventKind,
    suspend_policy: SuspendPolicy,
    modifiers: Vec<EventModifier>,
    /// Times every modifier but Count matched so far.
    hits: AtomicI32,
    /// Cleared on removal and when a Count runs out.
    active: AtomicBool,
}

impl EventRequest {
    pub fn new(
        id: RequestID,
        kind: EventKind,
        suspend_policy: SuspendPolicy,
        modifiers: Vec<EventModifier>,
    ) -> Self {
        EventRequest {
            id,
            kind,
            suspend_policy,
            modifiers,
            hits: AtomicI32::new(0),
            active: AtomicBool::new(true),
        }
    }

    pub fn id(&self) -> RequestID {
        self.id
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn suspend_policy(&self) -> SuspendPolicy {
        self.suspend_policy
    }

    pub fn modifiers(&self) -> &[EventModifier] {
        &self.modifiers
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn expire(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// The Step modifier of a single step request.
    pub fn step(&self) -> Option<(ThreadID, StepSize, StepDepth)> {
        self.modifiers.iter().find_map(|m| match *m {
            EventModifier::Step {
                thread,
                size,
                depth,
            } => Some((thread, size, depth)),
            _ => None,
        })
    }

    fn count(&self) -> Option<i32> {
        self.modifiers.iter().find_map(|m| match *m {
            EventModifier::Count(count) => Some(count),
            _ => None,
        })
    }

    /// Decides whether this request fires for an event.
    ///
    /// Every modifier has to pass. With a Count of `n` the first `n - 1`
    /// otherwise matching events are swallowed, the n-th fires and the
    /// request expires after it.
    pub fn matches(&self, ctx: &EventContext<'_>) -> bool {
        if !self.is_active() || !self.modifiers.iter().all(|m| m.matches(ctx)) {
            return false;
        }
        let Some(count) = self.count() else {
            return true;
        };
        let hits = self.hits.fetch_add(1, Ordering::AcqRel) + 1;
        if hits < count {
            return false;
        }
        // a concurrent hit on another thread may have already taken the n-th
        if self.active.swap(false, Ordering::AcqRel) {
            debug!("request {:?} reached its count of {}", self.id, count);
            true
        } else {
            false
        }
    }
}

/// All active event requests of a session, keyed by their id.
///
/// Lookups hand out snapshots, so interpreter threads can evaluate requests
/// while the debugger sets or clears others.
#[derive(Debug)]
pub struct RequestRegistry {
    next_id: AtomicI32,
    requests: RwLock<BTreeMap<RequestID, Arc<EventRequest>>>,
}

impl Default for RequestRegistry {
    fn default() -> Self {
        RequestRegistry {
            // 0 is reserved for automatically generated events
            next_id: AtomicI32::new(1),
            requests: RwLock::default(),
        }
    }
}

impl RequestRegistry {
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<RequestID, Arc<EventRequest>>> {
        self.requests.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<RequestID, Arc<EventRequest>>> {
        self.requests.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn insert(
        &self,
        kind: EventKind,
        suspend_policy: SuspendPolicy,
        modifiers: Vec<EventModifier>,
    ) -> Arc<EventRequest> {
        let id = RequestID::from_raw(self.next_id.fetch_add(1, Ordering::Relaxed));
        let request = Arc::new(EventRequest::new(id, kind, suspend_policy, modifiers));
        self.write().insert(id, request.clone());
        debug!("set {:?} request {:?} ({:?})", kind, id, suspend_policy);
        request
    }

    /// Removes a request, which is not an error if it doesn't exist.
    pub fn remove(&self, kind: EventKind, id: RequestID) {
        let mut requests = self.write();
        match requests.get(&id) {
            Some(request) if request.kind == kind => {
                request.expire();
                requests.remove(&id);
                debug!("cleared {:?} request {:?}", kind, id);
            }
            _ => warn!("no {:?} request {:?} to clear", kind, id),
        }
    }

    pub fn remove_kind(&self, kind: EventKind) {
        self.write().retain(|_, request| {
            let keep = request.kind != kind;
            if !keep {
                request.expire();
            }
            keep
        });
    }

    pub fn clear(&self) {
        let mut requests = self.write();
        for request in requests.values() {
            request.expire();
        }
        requests.clear();
    }

    pub fn get(&self, id: RequestID) -> Option<Arc<EventRequest>> {
        self.read().get(&id).cloned()
    }

    /// Active requests of one kind, in the order they were set.
    pub fn of_kind(&self, kind: EventKind) -> Vec<Arc<EventRequest>> {
        self.read()
            .values()
            .filter(|r| r.kind == kind && r.is_active())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
