use log::info;

use super::{generic, CommandError, Handler};
use crate::{
    session::Session,
    spec::{virtual_machine::*, *},
};

impl Handler for Version {
    fn handle(self, session: &Session) -> Result<VersionReply, CommandError> {
        let version = session.debuggee().version();
        Ok(VersionReply {
            description: version.description,
            version_major: version.version_major,
            version_minor: version.version_minor,
            vm_version: version.vm_version,
            vm_name: version.vm_name,
        })
    }
}

impl Handler for ClassesBySignature {
    fn handle(
        self,
        session: &Session,
    ) -> Result<Vec<(TaggedReferenceTypeID, ClassStatus)>, CommandError> {
        Ok(session
            .debuggee()
            .classes()
            .iter()
            .filter(|c| c.signature == self.signature)
            .map(|c| (c.id, c.status))
            .collect())
    }
}

impl Handler for AllClasses {
    fn handle(self, session: &Session) -> Result<Vec<Class>, CommandError> {
        Ok(session
            .debuggee()
            .classes()
            .iter()
            .map(|c| Class {
                type_id: c.id,
                signature: c.signature.clone(),
                status: c.status,
            })
            .collect())
    }
}

impl Handler for AllThreads {
    fn handle(self, session: &Session) -> Result<Vec<ThreadID>, CommandError> {
        Ok(session.debuggee().threads())
    }
}

impl Handler for TopLevelThreadGroups {
    fn handle(self, session: &Session) -> Result<Vec<ThreadGroupID>, CommandError> {
        Ok(session.debuggee().top_level_thread_groups())
    }
}

impl Handler for Dispose {
    fn handle(self, session: &Session) -> Result<(), CommandError> {
        info!("debugger disposed the session");
        session.dispose();
        Ok(())
    }
}

impl Handler for IDSizes {
    fn handle(self, _: &Session) -> Result<IDSizeInfo, CommandError> {
        Ok(IDSizeInfo::default())
    }
}

impl Handler for Suspend {
    fn handle(self, session: &Session) -> Result<(), CommandError> {
        session.debuggee().suspend_all();
        Ok(())
    }
}

impl Handler for Resume {
    fn handle(self, session: &Session) -> Result<(), CommandError> {
        session.debuggee().resume_all();
        Ok(())
    }
}

impl Handler for CreateString {
    fn handle(self, session: &Session) -> Result<StringID, CommandError> {
        Ok(session.debuggee().create_string(&self.string)?)
    }
}

impl Handler for ClassPaths {
    fn handle(self, session: &Session) -> Result<ClassPathsReply, CommandError> {
        let paths = session.debuggee().class_paths();
        Ok(ClassPathsReply {
            base_dir: paths.base_dir,
            classpaths: paths.classpaths,
            bootclasspaths: paths.bootclasspaths,
        })
    }
}

impl Handler for CapabilitiesNew {
    fn handle(self, session: &Session) -> Result<Capabilities, CommandError> {
        Ok(session.config().capabilities.clone())
    }
}

impl Handler for AllClassesWithGeneric {
    fn handle(self, session: &Session) -> Result<Vec<GenericClass>, CommandError> {
        Ok(session
            .debuggee()
            .classes()
            .iter()
            .map(|c| GenericClass {
                type_id: c.id,
                signature: c.signature.clone(),
                generic_signature: generic(&c.generic_signature),
                status: c.status,
            })
            .collect())
    }
}
