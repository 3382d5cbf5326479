use super::{class, CommandError, Handler};
use crate::{
    session::Session,
    spec::{class_type::Superclass, ClassID},
};

impl Handler for Superclass {
    fn handle(self, session: &Session) -> Result<Option<ClassID>, CommandError> {
        Ok(class(session, *self.class_id)?.superclass)
    }
}
