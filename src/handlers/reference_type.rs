use log::debug;

use super::{class, generic, CommandError, Handler};
use crate::{
    jvm::TypeModifiers,
    session::Session,
    spec::{reference_type::*, *},
};

impl Handler for Signature {
    fn handle(self, session: &Session) -> Result<String, CommandError> {
        Ok(class(session, self.ref_type)?.signature.clone())
    }
}

impl Handler for ClassLoader {
    fn handle(self, session: &Session) -> Result<Option<ClassLoaderID>, CommandError> {
        Ok(class(session, self.ref_type)?.class_loader)
    }
}

impl Handler for Modifiers {
    fn handle(self, session: &Session) -> Result<TypeModifiers, CommandError> {
        Ok(class(session, self.ref_type)?.modifiers)
    }
}

impl Handler for GetValues {
    fn handle(self, session: &Session) -> Result<Vec<Value>, CommandError> {
        let class = class(session, self.ref_type)?;
        if let Some(unknown) = self.fields.iter().find(|&&f| class.field(f).is_none()) {
            debug!("{:?} has no {:?}", self.ref_type, unknown);
            return Err(ErrorCode::InvalidFieldid.into());
        }
        Ok(session
            .debuggee()
            .static_field_values(self.ref_type, &self.fields)?)
    }
}

impl Handler for SourceFile {
    fn handle(self, session: &Session) -> Result<String, CommandError> {
        class(session, self.ref_type)?
            .source_file
            .clone()
            .ok_or(ErrorCode::AbsentInformation.into())
    }
}

impl Handler for Status {
    fn handle(self, session: &Session) -> Result<ClassStatus, CommandError> {
        Ok(class(session, self.ref_type)?.status)
    }
}

impl Handler for Interfaces {
    fn handle(self, session: &Session) -> Result<Vec<InterfaceID>, CommandError> {
        Ok(class(session, self.ref_type)?.interfaces.clone())
    }
}

impl Handler for SignatureWithGeneric {
    fn handle(self, session: &Session) -> Result<SignatureWithGenericReply, CommandError> {
        let class = class(session, self.ref_type)?;
        Ok(SignatureWithGenericReply {
            signature: class.signature.clone(),
            generic_signature: generic(&class.generic_signature),
        })
    }
}

impl Handler for FieldsWithGeneric {
    fn handle(self, session: &Session) -> Result<Vec<Field>, CommandError> {
        Ok(class(session, self.ref_type)?
            .fields
            .iter()
            .map(|f| Field {
                field_id: f.id,
                name: f.name.clone(),
                signature: f.signature.clone(),
                generic_signature: generic(&f.generic_signature),
                mod_bits: f.modifiers,
            })
            .collect())
    }
}

impl Handler for MethodsWithGeneric {
    fn handle(self, session: &Session) -> Result<Vec<Method>, CommandError> {
        Ok(class(session, self.ref_type)?
            .methods
            .iter()
            .map(|m| Method {
                method_id: m.id,
                name: m.name.clone(),
                signature: m.signature.clone(),
                generic_signature: generic(&m.generic_signature),
                mod_bits: m.modifiers,
            })
            .collect())
    }
}
