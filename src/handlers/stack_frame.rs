use super::{CommandError, Handler};
use crate::{
    session::Session,
    spec::{stack_frame::*, *},
};

fn check_suspended(session: &Session, thread: ThreadID) -> Result<(), ErrorCode> {
    match session.debuggee().suspend_count(thread)? {
        count if count <= 0 => Err(ErrorCode::ThreadNotSuspended),
        _ => Ok(()),
    }
}

impl Handler for GetValues {
    fn handle(self, session: &Session) -> Result<Vec<Value>, CommandError> {
        check_suspended(session, self.thread_id)?;
        Ok(session
            .debuggee()
            .frame_values(self.thread_id, self.frame_id, &self.slots)?)
    }
}

impl Handler for SetValues {
    fn handle(self, session: &Session) -> Result<(), CommandError> {
        check_suspended(session, self.thread_id)?;
        Ok(session
            .debuggee()
            .set_frame_values(self.thread_id, self.frame_id, &self.slot_values)?)
    }
}

impl Handler for ThisObject {
    fn handle(self, session: &Session) -> Result<TaggedObjectID, CommandError> {
        check_suspended(session, self.thread_id)?;
        Ok(session
            .debuggee()
            .this_object(self.thread_id, self.frame_id)?
            .unwrap_or(TaggedObjectID::NULL))
    }
}
