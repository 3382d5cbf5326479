use super::{CommandError, Handler};
use crate::{
    session::Session,
    spec::{object_reference::*, *},
};

impl Handler for ReferenceType {
    fn handle(self, session: &Session) -> Result<TaggedReferenceTypeID, CommandError> {
        Ok(session.debuggee().object_type(self.object)?)
    }
}

impl Handler for GetValues {
    fn handle(self, session: &Session) -> Result<Vec<Value>, CommandError> {
        Ok(session
            .debuggee()
            .instance_field_values(self.object, &self.fields)?)
    }
}

impl Handler for InvokeMethod {
    fn handle(self, session: &Session) -> Result<InvokeMethodReply, CommandError> {
        let debuggee = session.debuggee();
        if debuggee.thread(self.thread).is_none() {
            return Err(ErrorCode::InvalidThread.into());
        }
        if debuggee.suspend_count(self.thread)? <= 0 {
            return Err(ErrorCode::ThreadNotSuspended.into());
        }
        Ok(debuggee.invoke_method(
            self.object,
            self.thread,
            self.class_id,
            self.method_id,
            &self.arguments,
            self.options,
        )?)
    }
}

impl Handler for IsCollected {
    fn handle(self, session: &Session) -> Result<bool, CommandError> {
        Ok(session.debuggee().is_collected(self.object)?)
    }
}
