use super::{CommandError, Handler};
use crate::{
    session::Session,
    spec::{thread_group_reference::*, *},
    vm::ThreadGroupInfo,
};

fn group(session: &Session, id: ThreadGroupID) -> Result<ThreadGroupInfo, ErrorCode> {
    session
        .debuggee()
        .thread_group(id)
        .ok_or(ErrorCode::InvalidThreadGroup)
}

impl Handler for Name {
    fn handle(self, session: &Session) -> Result<String, CommandError> {
        Ok(group(session, self.group)?.name)
    }
}

impl Handler for Parent {
    fn handle(self, session: &Session) -> Result<Option<ThreadGroupID>, CommandError> {
        Ok(group(session, self.group)?.parent)
    }
}

impl Handler for Children {
    fn handle(self, session: &Session) -> Result<ChildrenReply, CommandError> {
        let group = group(session, self.group)?;
        Ok(ChildrenReply {
            child_threads: group.threads,
            child_groups: group.groups,
        })
    }
}
