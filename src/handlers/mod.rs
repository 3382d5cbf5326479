//! Command dispatch: one [Handler] impl per supported command, grouped by
//! command set.

use std::sync::Arc;

use log::{debug, error, warn};
use thiserror::Error;

use crate::{
    codec::{DecodeError, JdwpReadable, JdwpReader, JdwpWritable},
    session::{ServerError, Session},
    spec::*,
    vm::ClassInfo,
};

mod array_reference;
mod class_type;
mod event_request;
mod method;
mod object_reference;
mod reference_type;
mod stack_frame;
mod string_reference;
mod thread_group_reference;
mod thread_reference;
mod virtual_machine;

/// Why a command produced an error reply instead of its reply data.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    Reply(#[from] ErrorCode),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

pub(crate) trait Handler: Command + JdwpReadable {
    fn handle(self, session: &Session) -> Result<Self::Reply, CommandError>;
}

fn serve<C>(session: &Session, id: u32, body: &mut JdwpReader<'_>) -> Result<Vec<u8>, ServerError>
where
    C: Handler,
    C::Reply: JdwpWritable,
{
    let result = C::read(body)
        .map_err(CommandError::from)
        .and_then(|command| command.handle(session));

    let packet = match result {
        Ok(reply) => encode_reply(id, &reply),
        Err(CommandError::Reply(code)) => {
            debug!("{} failed with {}", C::ID, code);
            encode_error(id, code)
        }
        Err(CommandError::Decode(e)) => match e.error_code() {
            Some(code) => {
                debug!("{} rejected: {}", C::ID, e);
                encode_error(id, code)
            }
            None => return Err(e.into()),
        },
    };
    packet.map_err(|e| {
        error!("encoding reply to {}: {}", id, e);
        ServerError::LengthMismatch(id)
    })
}

macro_rules! dispatch {
    ($command:ident, $session:ident, $id:ident, $body:ident; $($handler:ty),* $(,)?) => {
        $(
            if $command == <$handler as Command>::ID {
                return serve::<$handler>($session, $id, $body);
            }
        )*
    };
}

/// Runs one command and returns the encoded reply packet.
pub(crate) fn dispatch(
    session: &Session,
    command: CommandId,
    id: u32,
    body: &mut JdwpReader<'_>,
) -> Result<Vec<u8>, ServerError> {
    debug!("command {} (packet {})", command, id);

    match command.command_set() {
        Ok(CommandSet::VirtualMachine) => {
            use crate::spec::virtual_machine::*;
            dispatch!(command, session, id, body;
                Version,
                ClassesBySignature,
                AllClasses,
                AllThreads,
                TopLevelThreadGroups,
                Dispose,
                IDSizes,
                Suspend,
                Resume,
                CreateString,
                ClassPaths,
                CapabilitiesNew,
                AllClassesWithGeneric,
            );
        }
        Ok(CommandSet::ReferenceType) => {
            use crate::spec::reference_type::*;
            dispatch!(command, session, id, body;
                Signature,
                ClassLoader,
                Modifiers,
                GetValues,
                SourceFile,
                Status,
                Interfaces,
                SignatureWithGeneric,
                FieldsWithGeneric,
                MethodsWithGeneric,
            );
        }
        Ok(CommandSet::ClassType) => {
            dispatch!(command, session, id, body; crate::spec::class_type::Superclass);
        }
        Ok(CommandSet::Method) => {
            use crate::spec::method::*;
            dispatch!(command, session, id, body; LineTable, VariableTableWithGeneric);
        }
        Ok(CommandSet::ObjectReference) => {
            use crate::spec::object_reference::*;
            dispatch!(command, session, id, body;
                ReferenceType,
                GetValues,
                InvokeMethod,
                IsCollected,
            );
        }
        Ok(CommandSet::StringReference) => {
            dispatch!(command, session, id, body; crate::spec::string_reference::Value);
        }
        Ok(CommandSet::ThreadReference) => {
            use crate::spec::thread_reference::*;
            dispatch!(command, session, id, body;
                Name,
                Suspend,
                Resume,
                Status,
                ThreadGroup,
                Frames,
                FrameCount,
                OwnedMonitors,
                CurrentContendedMonitor,
                Interrupt,
                SuspendCount,
            );
        }
        Ok(CommandSet::ThreadGroupReference) => {
            use crate::spec::thread_group_reference::*;
            dispatch!(command, session, id, body; Name, Parent, Children);
        }
        Ok(CommandSet::ArrayReference) => {
            use crate::spec::array_reference::*;
            dispatch!(command, session, id, body; Length, GetValues);
        }
        Ok(CommandSet::EventRequest) => {
            use crate::spec::event_request::*;
            dispatch!(command, session, id, body; Set, Clear, ClearAllBreakpoints);
        }
        Ok(CommandSet::StackFrame) => {
            use crate::spec::stack_frame::*;
            dispatch!(command, session, id, body; GetValues, SetValues, ThisObject);
        }
        _ => {}
    }

    warn!("command {} is not implemented", command);
    encode_error(id, ErrorCode::NotImplemented).map_err(ServerError::from)
}

/// Looks up a reference type the debugger referred to.
fn class(session: &Session, id: ReferenceTypeID) -> Result<Arc<ClassInfo>, ErrorCode> {
    session
        .debuggee()
        .class(id)
        .ok_or(ErrorCode::InvalidClass)
}

/// Generic signatures are written as empty strings when absent.
fn generic(signature: &Option<String>) -> String {
    signature.clone().unwrap_or_default()
}
