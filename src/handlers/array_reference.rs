use super::{CommandError, Handler};
use crate::{
    session::Session,
    spec::{array_reference::*, *},
};

impl Handler for Length {
    fn handle(self, session: &Session) -> Result<i32, CommandError> {
        Ok(session.debuggee().array_length(self.array_id)?)
    }
}

impl Handler for GetValues {
    fn handle(self, session: &Session) -> Result<ArrayRegion, CommandError> {
        let debuggee = session.debuggee();
        let size = debuggee.array_length(self.array_id)?;
        if self.first_index < 0 || self.first_index > size {
            return Err(ErrorCode::InvalidIndex.into());
        }
        if self.length < 0 || self.length > size - self.first_index {
            return Err(ErrorCode::InvalidLength.into());
        }
        Ok(debuggee.array_region(
            self.array_id,
            self.first_index as usize,
            self.length as usize,
        )?)
    }
}
