use super::{CommandError, Handler};
use crate::{session::Session, spec::string_reference};

impl Handler for string_reference::Value {
    fn handle(self, session: &Session) -> Result<String, CommandError> {
        Ok(session.debuggee().string_value(self.string_object)?)
    }
}
