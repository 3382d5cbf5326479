use log::warn;

use super::{CommandError, Handler};
use crate::{
    modifiers::EventModifier,
    session::Session,
    spec::{event_request::*, *},
};

impl Handler for Set {
    fn handle(self, session: &Session) -> Result<RequestID, CommandError> {
        if !self.event_kind.is_requestable() {
            warn!("refusing a request for {:?}", self.event_kind);
            return Err(ErrorCode::InvalidEventType.into());
        }
        let modifiers = self
            .modifiers
            .into_iter()
            .map(EventModifier::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        if self.event_kind == EventKind::SingleStep {
            let Some(thread) = modifiers.iter().find_map(|m| match m {
                EventModifier::Step { thread, .. } => Some(*thread),
                _ => None,
            }) else {
                return Err(ErrorCode::IllegalArgument.into());
            };
            if session.debuggee().thread(thread).is_none() {
                return Err(ErrorCode::InvalidThread.into());
            }
        }

        let request = session
            .requests()
            .insert(self.event_kind, self.suspend_policy, modifiers);
        Ok(request.id())
    }
}

impl Handler for Clear {
    fn handle(self, session: &Session) -> Result<(), CommandError> {
        session.requests().remove(self.event_kind, self.request_id);
        Ok(())
    }
}

impl Handler for ClearAllBreakpoints {
    fn handle(self, session: &Session) -> Result<(), CommandError> {
        session.requests().remove_kind(EventKind::Breakpoint);
        Ok(())
    }
}
