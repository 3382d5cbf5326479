use super::{class, generic, CommandError, Handler};
use crate::{
    session::Session,
    spec::{method::*, *},
};

/// Both commands answer INVALID_METHODID for methods the class doesn't
/// declare, before asking for debug information.
fn check_method(
    session: &Session,
    class_id: ReferenceTypeID,
    method: MethodID,
) -> Result<(), ErrorCode> {
    class(session, class_id)?
        .method(method)
        .map(|_| ())
        .ok_or(ErrorCode::InvalidMethodid)
}

impl Handler for LineTable {
    fn handle(self, session: &Session) -> Result<LineTableReply, CommandError> {
        check_method(session, self.reference_type_id, self.method_id)?;
        let table = session
            .source()
            .line_table(self.reference_type_id, self.method_id)
            .ok_or(ErrorCode::AbsentInformation)?;
        Ok(LineTableReply {
            start: table.start,
            end: table.end,
            lines: table
                .lines
                .iter()
                .map(|&(line_code_index, line_number)| Line {
                    line_code_index,
                    line_number,
                })
                .collect(),
        })
    }
}

impl Handler for VariableTableWithGeneric {
    fn handle(self, session: &Session) -> Result<VariableTableWithGenericReply, CommandError> {
        check_method(session, self.reference_type_id, self.method_id)?;
        let table = session
            .source()
            .variable_table(self.reference_type_id, self.method_id)
            .ok_or(ErrorCode::AbsentInformation)?;
        Ok(VariableTableWithGenericReply {
            arg_cnt: table.arg_count,
            variables: table
                .variables
                .into_iter()
                .map(|v| Variable {
                    code_index: v.code_index,
                    generic_signature: generic(&v.generic_signature),
                    name: v.name,
                    signature: v.signature,
                    length: v.length,
                    slot: v.slot,
                })
                .collect(),
        })
    }
}
