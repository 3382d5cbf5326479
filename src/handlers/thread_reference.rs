use super::{CommandError, Handler};
use crate::{
    session::Session,
    spec::{thread_reference::*, *},
    vm::ThreadInfo,
};

fn thread(session: &Session, id: ThreadID) -> Result<ThreadInfo, ErrorCode> {
    session.debuggee().thread(id).ok_or(ErrorCode::InvalidThread)
}

/// The part of a stack of `count` frames that a start and length select,
/// with a length of -1 meaning all remaining frames.
fn frame_range(count: usize, start: i32, length: i32) -> Result<(usize, usize), ErrorCode> {
    let start = usize::try_from(start)
        .ok()
        .filter(|&s| s <= count)
        .ok_or(ErrorCode::InvalidIndex)?;
    let end = match length {
        -1 => count,
        length => usize::try_from(length)
            .ok()
            .and_then(|l| start.checked_add(l))
            .filter(|&end| end <= count)
            .ok_or(ErrorCode::InvalidLength)?,
    };
    Ok((start, end))
}

impl Handler for Name {
    fn handle(self, session: &Session) -> Result<String, CommandError> {
        Ok(thread(session, self.thread)?.name)
    }
}

impl Handler for Suspend {
    fn handle(self, session: &Session) -> Result<(), CommandError> {
        Ok(session.debuggee().suspend_thread(self.thread)?)
    }
}

impl Handler for Resume {
    fn handle(self, session: &Session) -> Result<(), CommandError> {
        Ok(session.debuggee().resume_thread(self.thread)?)
    }
}

impl Handler for Status {
    fn handle(self, session: &Session) -> Result<(ThreadStatus, SuspendStatus), CommandError> {
        let info = thread(session, self.thread)?;
        let suspended = if session.debuggee().suspend_count(self.thread)? > 0 {
            SuspendStatus::Suspended
        } else {
            SuspendStatus::NotSuspended
        };
        Ok((info.status, suspended))
    }
}

impl Handler for ThreadGroup {
    fn handle(self, session: &Session) -> Result<ThreadGroupID, CommandError> {
        Ok(thread(session, self.thread)?.group)
    }
}

impl Handler for Frames {
    fn handle(self, session: &Session) -> Result<Vec<(FrameID, Location)>, CommandError> {
        let debuggee = session.debuggee();
        if debuggee.suspend_count(self.thread)? <= 0 {
            return Err(ErrorCode::ThreadNotSuspended.into());
        }
        let frames = debuggee.frames(self.thread)?;
        let (start, end) = frame_range(frames.len(), self.start_frame, self.length)?;
        Ok(frames[start..end]
            .iter()
            .map(|frame| (frame.id, frame.location))
            .collect())
    }
}

impl Handler for FrameCount {
    fn handle(self, session: &Session) -> Result<i32, CommandError> {
        let debuggee = session.debuggee();
        if debuggee.suspend_count(self.thread)? <= 0 {
            return Err(ErrorCode::ThreadNotSuspended.into());
        }
        Ok(debuggee.frame_count(self.thread)?)
    }
}

impl Handler for OwnedMonitors {
    fn handle(self, session: &Session) -> Result<Vec<TaggedObjectID>, CommandError> {
        Ok(session.debuggee().owned_monitors(self.thread)?)
    }
}

impl Handler for CurrentContendedMonitor {
    fn handle(self, session: &Session) -> Result<TaggedObjectID, CommandError> {
        Ok(session
            .debuggee()
            .contended_monitor(self.thread)?
            .unwrap_or(TaggedObjectID::NULL))
    }
}

impl Handler for Interrupt {
    fn handle(self, session: &Session) -> Result<(), CommandError> {
        Ok(session.debuggee().interrupt(self.thread)?)
    }
}

impl Handler for SuspendCount {
    fn handle(self, session: &Session) -> Result<i32, CommandError> {
        Ok(session.debuggee().suspend_count(self.thread)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_ranges() {
        assert_eq!(frame_range(3, 0, -1), Ok((0, 3)));
        assert_eq!(frame_range(3, 1, 2), Ok((1, 3)));
        assert_eq!(frame_range(3, 3, 0), Ok((3, 3)));
        assert_eq!(frame_range(3, 3, -1), Ok((3, 3)));
        assert_eq!(frame_range(3, 4, -1), Err(ErrorCode::InvalidIndex));
        assert_eq!(frame_range(3, -1, 1), Err(ErrorCode::InvalidIndex));
        assert_eq!(frame_range(3, 1, 3), Err(ErrorCode::InvalidLength));
        assert_eq!(frame_range(3, 0, -2), Err(ErrorCode::InvalidLength));
    }
}
