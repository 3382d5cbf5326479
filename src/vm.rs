//! The interface between the protocol engine and the interpreter it
//! debugs.
//!
//! Every identifier this crate ever writes comes either from these traits or
//! from a packet the debugger sent; nothing here is computed by the engine
//! itself.

use std::sync::Arc;

use crate::{
    jvm::{class_name, FieldModifiers, MethodModifiers, TypeModifiers},
    spec::*,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub description: String,
    pub version_major: u32,
    pub version_minor: u32,
    pub vm_version: String,
    pub vm_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassPathsInfo {
    pub base_dir: String,
    pub classpaths: Vec<String>,
    pub bootclasspaths: Vec<String>,
}

/// A loaded reference type with the metadata the ReferenceType, ClassType
/// and Method command sets report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    pub id: TaggedReferenceTypeID,
    /// JNI signature, e.g. `Ljava/lang/String;`
    pub signature: String,
    pub generic_signature: Option<String>,
    pub status: ClassStatus,
    pub modifiers: TypeModifiers,
    /// `None` for the bootstrap loader.
    pub class_loader: Option<ClassLoaderID>,
    /// `None` for java.lang.Object, interfaces and primitive arrays.
    pub superclass: Option<ClassID>,
    pub interfaces: Vec<InterfaceID>,
    pub source_file: Option<String>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
}

impl ClassInfo {
    /// The dotted name class patterns are matched against.
    pub fn name(&self) -> String {
        class_name(&self.signature)
    }

    pub fn method(&self, id: MethodID) -> Option<&MethodInfo> {
        self.methods.iter().find(|m| m.id == id)
    }

    pub fn field(&self, id: FieldID) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    pub id: FieldID,
    pub name: String,
    pub signature: String,
    pub generic_signature: Option<String>,
    pub modifiers: FieldModifiers,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInfo {
    pub id: MethodID,
    pub name: String,
    pub signature: String,
    pub generic_signature: Option<String>,
    pub modifiers: MethodModifiers,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadInfo {
    pub name: String,
    pub group: ThreadGroupID,
    pub status: ThreadStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadGroupInfo {
    pub name: String,
    pub parent: Option<ThreadGroupID>,
    pub threads: Vec<ThreadID>,
    pub groups: Vec<ThreadGroupID>,
}

/// One activation record, as reported to the debugger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    pub id: FrameID,
    pub location: Location,
}

/// Code index to source line mapping of one method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTable {
    /// Lowest valid code index, -1 for native methods.
    pub start: i64,
    /// Highest valid code index, -1 for native methods.
    pub end: i64,
    /// `(code index, line)` pairs ordered by code index.
    pub lines: Vec<(u64, i32)>,
}

impl LineTable {
    /// The line of the last entry starting at or before `index`.
    pub fn line_at(&self, index: u64) -> Option<i32> {
        match self.lines.partition_point(|&(start, _)| start <= index) {
            0 => None,
            n => Some(self.lines[n - 1].1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVariable {
    pub code_index: u64,
    pub name: String,
    pub signature: String,
    pub generic_signature: Option<String>,
    pub length: u32,
    pub slot: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableTable {
    pub arg_count: i32,
    pub variables: Vec<LocalVariable>,
}

/// The execution engine being debugged.
///
/// Suspend counts kept by the implementation are the only resume signal the
/// packet loop observes, so they must be safe to read from any thread while
/// another one changes them.
pub trait Debuggee: Send + Sync {
    fn version(&self) -> VersionInfo;

    fn classes(&self) -> Vec<Arc<ClassInfo>>;

    fn class(&self, id: ReferenceTypeID) -> Option<Arc<ClassInfo>>;

    fn class_paths(&self) -> ClassPathsInfo {
        ClassPathsInfo::default()
    }

    fn create_string(&self, value: &str) -> Result<StringID, ErrorCode>;

    /// Live threads only.
    fn threads(&self) -> Vec<ThreadID>;

    fn thread(&self, id: ThreadID) -> Option<ThreadInfo>;

    fn top_level_thread_groups(&self) -> Vec<ThreadGroupID>;

    fn thread_group(&self, id: ThreadGroupID) -> Option<ThreadGroupInfo>;

    /// Increments the suspend count of a thread.
    fn suspend_thread(&self, id: ThreadID) -> Result<(), ErrorCode>;

    /// Decrements the suspend count of a thread, never below zero.
    fn resume_thread(&self, id: ThreadID) -> Result<(), ErrorCode>;

    fn suspend_count(&self, id: ThreadID) -> Result<i32, ErrorCode>;

    fn suspend_all(&self) {
        for thread in self.threads() {
            // a thread may die between listing and suspending
            let _ = self.suspend_thread(thread);
        }
    }

    fn resume_all(&self) {
        for thread in self.threads() {
            let _ = self.resume_thread(thread);
        }
    }

    fn interrupt(&self, id: ThreadID) -> Result<(), ErrorCode> {
        self.thread(id)
            .map(|_| ())
            .ok_or(ErrorCode::InvalidThread)
    }

    fn owned_monitors(&self, id: ThreadID) -> Result<Vec<TaggedObjectID>, ErrorCode> {
        self.thread(id)
            .map(|_| Vec::new())
            .ok_or(ErrorCode::InvalidThread)
    }

    fn contended_monitor(&self, id: ThreadID) -> Result<Option<TaggedObjectID>, ErrorCode> {
        self.thread(id).map(|_| None).ok_or(ErrorCode::InvalidThread)
    }

    /// The call stack of a suspended thread, top frame first.
    fn frames(&self, thread: ThreadID) -> Result<Vec<FrameInfo>, ErrorCode>;

    fn frame_count(&self, thread: ThreadID) -> Result<i32, ErrorCode> {
        self.frames(thread).map(|frames| frames.len() as i32)
    }

    fn frame_values(
        &self,
        thread: ThreadID,
        frame: FrameID,
        slots: &[(i32, Tag)],
    ) -> Result<Vec<Value>, ErrorCode>;

    fn set_frame_values(
        &self,
        thread: ThreadID,
        frame: FrameID,
        values: &[(i32, Value)],
    ) -> Result<(), ErrorCode>;

    /// `None` for static and native frames.
    fn this_object(&self, thread: ThreadID, frame: FrameID)
        -> Result<Option<TaggedObjectID>, ErrorCode>;

    fn object_type(&self, object: ObjectID) -> Result<TaggedReferenceTypeID, ErrorCode>;

    fn instance_field_values(
        &self,
        object: ObjectID,
        fields: &[FieldID],
    ) -> Result<Vec<Value>, ErrorCode>;

    fn static_field_values(
        &self,
        class: ReferenceTypeID,
        fields: &[FieldID],
    ) -> Result<Vec<Value>, ErrorCode>;

    fn is_collected(&self, object: ObjectID) -> Result<bool, ErrorCode>;

    fn string_value(&self, object: ObjectID) -> Result<String, ErrorCode>;

    fn array_length(&self, array: ArrayID) -> Result<i32, ErrorCode>;

    /// Bounds are already checked against [Debuggee::array_length].
    fn array_region(
        &self,
        array: ArrayID,
        first: usize,
        length: usize,
    ) -> Result<ArrayRegion, ErrorCode>;

    fn invoke_method(
        &self,
        object: ObjectID,
        thread: ThreadID,
        class: ClassID,
        method: MethodID,
        arguments: &[Value],
        options: InvokeOptions,
    ) -> Result<InvokeMethodReply, ErrorCode> {
        let _ = (object, thread, class, method, arguments, options);
        Err(ErrorCode::NotImplemented)
    }
}

/// Source level information, usually backed by the class files' debug
/// attributes.
pub trait SourceInfo: Send + Sync {
    fn line_table(&self, class: ReferenceTypeID, method: MethodID) -> Option<Arc<LineTable>>;

    fn variable_table(&self, class: ReferenceTypeID, method: MethodID) -> Option<VariableTable>;
}
