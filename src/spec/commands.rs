use crate::{
    codec::{JdwpReadable, JdwpWritable},
    jdwp_command,
    jvm::{FieldModifiers, MethodModifiers, TypeModifiers},
    spec::*,
};

/// VirtualMachine Command Set (1)
pub mod virtual_machine {
    use super::*;

    /// Returns the JDWP version implemented by the debuggee.
    ///
    /// The version string format is implementation dependent.
    #[jdwp_command(1, 1)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct Version;

    #[derive(Debug, Clone, PartialEq, Eq, JdwpReadable, JdwpWritable)]
    pub struct VersionReply {
        /// Text information on the VM version
        pub description: String,
        /// Major JDWP Version number
        pub version_major: u32,
        /// Minor JDWP Version number
        pub version_minor: u32,
        /// Debuggee runtime version
        pub vm_version: String,
        /// Debuggee runtime name
        pub vm_name: String,
    }

    /// Returns reference types for all the loaded classes which match the
    /// given signature.
    ///
    /// The search is confined to loaded classes only.
    #[jdwp_command(Vec<(TaggedReferenceTypeID, ClassStatus)>, 1, 2)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct ClassesBySignature {
        /// JNI signature of the class to find (for example,
        /// "Ljava/lang/String;")
        pub signature: String,
    }

    /// Returns reference types for all classes currently loaded.
    #[jdwp_command(Vec<Class>, 1, 3)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct AllClasses;

    #[derive(Debug, Clone, PartialEq, Eq, JdwpReadable, JdwpWritable)]
    pub struct Class {
        /// Matching loaded reference type
        pub type_id: TaggedReferenceTypeID,
        /// The JNI signature of the loaded reference type
        pub signature: String,
        /// The current class status
        pub status: ClassStatus,
    }

    /// Returns all threads currently running.
    ///
    /// Threads that have not yet been started and threads that have completed
    /// their execution are not included in the returned list.
    #[jdwp_command(Vec<ThreadID>, 1, 4)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct AllThreads;

    /// Returns all thread groups that do not have a parent.
    #[jdwp_command(Vec<ThreadGroupID>, 1, 5)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct TopLevelThreadGroups;

    /// Invalidates this session.
    ///
    /// All event requests are cancelled and all threads suspended by the
    /// debugger are resumed as many times as necessary for them to run.
    #[jdwp_command((), 1, 6)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct Dispose;

    /// Returns the sizes of variably-sized data types.
    #[jdwp_command(IDSizeInfo, 1, 7)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct IDSizes;

    #[derive(Debug, Clone, PartialEq, Eq, JdwpReadable, JdwpWritable)]
    pub struct IDSizeInfo {
        /// field_id size in bytes
        pub field_id_size: u32,
        /// method_id size in bytes
        pub method_id_size: u32,
        /// object_id size in bytes
        pub object_id_size: u32,
        /// reference_type_id size in bytes
        pub reference_type_id_size: u32,
        /// frame_id size in bytes
        pub frame_id_size: u32,
    }

    impl Default for IDSizeInfo {
        fn default() -> Self {
            let size = ID_SIZE as u32;
            Self {
                field_id_size: size,
                method_id_size: size,
                object_id_size: size,
                reference_type_id_size: size,
                frame_id_size: size,
            }
        }
    }

    /// Suspends all threads.
    ///
    /// Suspends of both the virtual machine and individual threads are
    /// counted, and a thread runs again only once its count is back to zero.
    #[jdwp_command((), 1, 8)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct Suspend;

    /// Resumes execution after the suspend command or an event has stopped
    /// it.
    #[jdwp_command((), 1, 9)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct Resume;

    /// Creates a new string object and returns its id.
    #[jdwp_command(StringID, 1, 11)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct CreateString {
        /// UTF-8 characters to use in the created string
        pub string: String,
    }

    /// Retrieve the classpath and bootclasspath of the debuggee.
    #[jdwp_command(1, 13)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct ClassPaths;

    #[derive(Debug, Clone, PartialEq, Eq, JdwpReadable, JdwpWritable)]
    pub struct ClassPathsReply {
        /// Base directory used to resolve relative paths in either of the
        /// following lists.
        pub base_dir: String,
        /// Components of the classpath
        pub classpaths: Vec<String>,
        /// Components of the bootclasspath
        pub bootclasspaths: Vec<String>,
    }

    /// Retrieve this session's capabilities.
    #[jdwp_command(Capabilities, 1, 17)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct CapabilitiesNew;

    /// The capability flags, each telling whether the matching optional
    /// feature is available.
    ///
    /// The commands associated with each capability return NOT_IMPLEMENTED
    /// when it's not.
    #[derive(Debug, Clone, PartialEq, Eq, JdwpReadable, JdwpWritable)]
    pub struct Capabilities {
        pub can_watch_field_modification: bool,
        pub can_watch_field_access: bool,
        pub can_get_bytecodes: bool,
        pub can_get_synthetic_attribute: bool,
        pub can_get_owned_monitor_info: bool,
        pub can_get_current_contended_monitor: bool,
        pub can_get_monitor_info: bool,
        pub can_redefine_classes: bool,
        pub can_add_method: bool,
        pub can_unrestrictedly_redefine_classes: bool,
        pub can_pop_frames: bool,
        pub can_use_instance_filters: bool,
        pub can_get_source_debug_extension: bool,
        pub can_request_vm_death_event: bool,
        pub can_set_default_stratum: bool,
        pub can_get_instance_info: bool,
        pub can_request_monitor_events: bool,
        pub can_get_monitor_frame_info: bool,
        pub can_use_source_name_filters: bool,
        pub can_get_constant_pool: bool,
        pub can_force_early_return: bool,
        /// Reserved for future capabilities
        pub reserved: [bool; 11],
    }

    impl Default for Capabilities {
        fn default() -> Self {
            Self {
                can_watch_field_modification: false,
                can_watch_field_access: false,
                can_get_bytecodes: false,
                can_get_synthetic_attribute: false,
                can_get_owned_monitor_info: true,
                can_get_current_contended_monitor: true,
                can_get_monitor_info: false,
                can_redefine_classes: false,
                can_add_method: false,
                can_unrestrictedly_redefine_classes: false,
                can_pop_frames: false,
                can_use_instance_filters: true,
                can_get_source_debug_extension: false,
                can_request_vm_death_event: true,
                can_set_default_stratum: false,
                can_get_instance_info: false,
                can_request_monitor_events: false,
                can_get_monitor_frame_info: false,
                can_use_source_name_filters: true,
                can_get_constant_pool: false,
                can_force_early_return: false,
                reserved: [false; 11],
            }
        }
    }

    /// Returns reference types for all classes currently loaded, with their
    /// generic signatures.
    #[jdwp_command(Vec<GenericClass>, 1, 20)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct AllClassesWithGeneric;

    #[derive(Debug, Clone, PartialEq, Eq, JdwpReadable, JdwpWritable)]
    pub struct GenericClass {
        /// Loaded reference type
        pub type_id: TaggedReferenceTypeID,
        /// The JNI signature of the loaded reference type
        pub signature: String,
        /// The generic signature of the loaded reference type, empty if there
        /// is none
        pub generic_signature: String,
        /// The current class status
        pub status: ClassStatus,
    }
}

/// ReferenceType Command Set (2)
pub mod reference_type {
    use super::*;

    /// Returns the JNI signature of a reference type.
    #[jdwp_command(String, 2, 1)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct Signature {
        /// The reference type ID
        pub ref_type: ReferenceTypeID,
    }

    /// Returns the instance of java.lang.ClassLoader which loaded a given
    /// reference type, or `None` for the bootstrap class loader.
    #[jdwp_command(Option<ClassLoaderID>, 2, 2)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct ClassLoader {
        /// The reference type ID
        pub ref_type: ReferenceTypeID,
    }

    /// Returns the modifiers (also known as access flags) for a reference
    /// type.
    #[jdwp_command(TypeModifiers, 2, 3)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct Modifiers {
        /// The reference type ID
        pub ref_type: ReferenceTypeID,
    }

    /// Returns the value of one or more static fields of the reference type.
    #[jdwp_command(Vec<Value>, 2, 6)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct GetValues {
        /// The reference type ID
        pub ref_type: ReferenceTypeID,
        /// Field IDs to get
        pub fields: Vec<FieldID>,
    }

    /// Returns the source file name in which a reference type was declared.
    ///
    /// Fails with ABSENT_INFORMATION when the type carries none.
    #[jdwp_command(String, 2, 7)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct SourceFile {
        /// The reference type ID
        pub ref_type: ReferenceTypeID,
    }

    /// Returns the current status of the reference type.
    #[jdwp_command(ClassStatus, 2, 9)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct Status {
        /// The reference type ID
        pub ref_type: ReferenceTypeID,
    }

    /// Returns the interfaces declared as implemented by this class.
    #[jdwp_command(Vec<InterfaceID>, 2, 10)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct Interfaces {
        /// The reference type ID
        pub ref_type: ReferenceTypeID,
    }

    /// Returns the JNI signature of a reference type along with the generic
    /// signature if there is one.
    #[jdwp_command(2, 13)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct SignatureWithGeneric {
        /// The reference type ID
        pub ref_type: ReferenceTypeID,
    }

    #[derive(Debug, Clone, PartialEq, Eq, JdwpReadable, JdwpWritable)]
    pub struct SignatureWithGenericReply {
        /// The JNI signature for the reference type.
        pub signature: String,
        /// The generic signature for the reference type or an empty string if
        /// there is none.
        pub generic_signature: String,
    }

    /// Returns information, including the generic signature if any, for each
    /// field in a reference type.
    ///
    /// Inherited fields are not included.
    #[jdwp_command(Vec<Field>, 2, 14)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct FieldsWithGeneric {
        /// The reference type ID
        pub ref_type: ReferenceTypeID,
    }

    #[derive(Debug, Clone, PartialEq, Eq, JdwpReadable, JdwpWritable)]
    pub struct Field {
        /// The field ID
        pub field_id: FieldID,
        /// The name of the field
        pub name: String,
        /// The JNI signature of the field
        pub signature: String,
        /// The generic signature of the field, or an empty string if there is
        /// none
        pub generic_signature: String,
        /// The modifier bit flags (also known as access flags)
        pub mod_bits: FieldModifiers,
    }

    /// Returns information, including the generic signature if any, for each
    /// method in a reference type.
    ///
    /// Inherited methods are not included.
    #[jdwp_command(Vec<Method>, 2, 15)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct MethodsWithGeneric {
        /// The reference type ID
        pub ref_type: ReferenceTypeID,
    }

    #[derive(Debug, Clone, PartialEq, Eq, JdwpReadable, JdwpWritable)]
    pub struct Method {
        /// The method ID
        pub method_id: MethodID,
        /// The name of the method
        pub name: String,
        /// The JNI signature of the method
        pub signature: String,
        /// The generic signature of the method, or an empty string if there is
        /// none
        pub generic_signature: String,
        /// The modifier bit flags (also known as access flags)
        pub mod_bits: MethodModifiers,
    }
}

/// ClassType Command Set (3)
pub mod class_type {
    use super::*;

    /// Returns the immediate superclass of a class, `None` for
    /// java.lang.Object.
    #[jdwp_command(Option<ClassID>, 3, 1)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct Superclass {
        /// The class type ID.
        pub class_id: ClassID,
    }
}

/// Method Command Set (6)
pub mod method {
    use super::*;

    /// Returns line number information for the method, if present.
    ///
    /// The line table maps source line numbers to the initial code index of
    /// the line.
    #[jdwp_command(6, 1)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct LineTable {
        /// The class.
        pub reference_type_id: ReferenceTypeID,
        /// The method.
        pub method_id: MethodID,
    }

    #[derive(Debug, Clone, PartialEq, Eq, JdwpReadable, JdwpWritable)]
    pub struct LineTableReply {
        /// Lowest valid code index for the method, >=0, or -1 if the method is
        /// native
        pub start: i64,
        /// Highest valid code index for the method, >=0, or -1 if the method
        /// is native
        pub end: i64,
        /// The entries of the line table for this method.
        pub lines: Vec<Line>,
    }

    #[derive(Debug, Clone, PartialEq, Eq, JdwpReadable, JdwpWritable)]
    pub struct Line {
        /// Initial code index of the line, start <= lineCodeIndex < end
        pub line_code_index: u64,
        /// Line number.
        pub line_number: i32,
    }

    /// Returns variable information for the method, including generic
    /// signatures for the variables.
    #[jdwp_command(6, 5)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct VariableTableWithGeneric {
        /// The class.
        pub reference_type_id: ReferenceTypeID,
        /// The method.
        pub method_id: MethodID,
    }

    #[derive(Debug, Clone, PartialEq, Eq, JdwpReadable, JdwpWritable)]
    pub struct VariableTableWithGenericReply {
        /// The number of words in the frame used by arguments. Eight-byte
        /// arguments use two words; all others use one.
        pub arg_cnt: i32,
        /// The variables.
        pub variables: Vec<Variable>,
    }

    #[derive(Debug, Clone, PartialEq, Eq, JdwpReadable, JdwpWritable)]
    pub struct Variable {
        /// First code index at which the variable is visible.
        ///
        /// Used in conjunction with `length`. The variable can be get or set
        /// only when the current `code_index` <= current frame code index <
        /// `code_index + length`
        pub code_index: u64,
        /// The variable's name.
        pub name: String,
        /// The variable type's JNI signature.
        pub signature: String,
        /// The variable type's generic signature or an empty string if there
        /// is none.
        pub generic_signature: String,
        /// Unsigned value used in conjunction with `code_index`.
        pub length: u32,
        /// The local variable's index in its frame
        pub slot: u32,
    }
}

/// ObjectReference Command Set (9)
pub mod object_reference {
    use super::*;

    /// Returns the runtime type of the object.
    #[jdwp_command(TaggedReferenceTypeID, 9, 1)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct ReferenceType {
        /// The object ID
        pub object: ObjectID,
    }

    /// Returns the value of one or more instance fields.
    ///
    /// Each field must be member of the object's type or one of its
    /// superclasses, superinterfaces, or implemented interfaces.
    #[jdwp_command(Vec<Value>, 9, 2)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct GetValues {
        /// The object ID
        pub object: ObjectID,
        /// Fields to get
        pub fields: Vec<FieldID>,
    }

    /// Invokes an instance method.
    ///
    /// The method must be member of the object's type or one of its
    /// superclasses, superinterfaces, or implemented interfaces, and the
    /// invoking thread must have been suspended by an event.
    #[jdwp_command(InvokeMethodReply, 9, 6)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct InvokeMethod {
        /// The object ID
        pub object: ObjectID,
        /// The thread in which to invoke
        pub thread: ThreadID,
        /// The class type
        pub class_id: ClassID,
        /// The method to invoke
        pub method_id: MethodID,
        /// The arguments
        pub arguments: Vec<Value>,
        /// Invocation options
        pub options: InvokeOptions,
    }

    /// Determines whether an object has been garbage collected.
    #[jdwp_command(bool, 9, 9)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct IsCollected {
        /// The object ID
        pub object: ObjectID,
    }
}

/// StringReference Command Set (10)
pub mod string_reference {
    use super::*;

    /// Returns the characters contained in the string.
    #[jdwp_command(String, 10, 1)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct Value {
        /// The String object ID
        pub string_object: ObjectID,
    }
}

/// ThreadReference Command Set (11)
pub mod thread_reference {
    use super::*;

    /// Returns the thread name.
    #[jdwp_command(String, 11, 1)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct Name {
        /// The thread object ID.
        pub thread: ThreadID,
    }

    /// Suspends the thread.
    ///
    /// Suspensions are counted; the thread runs again only after as many
    /// resumes.
    #[jdwp_command((), 11, 2)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct Suspend {
        /// The thread object ID.
        pub thread: ThreadID,
    }

    /// Resumes the execution of a given thread, decrementing its suspend
    /// count.
    #[jdwp_command((), 11, 3)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct Resume {
        /// The thread object ID.
        pub thread: ThreadID,
    }

    /// Returns the current status of a thread.
    #[jdwp_command((ThreadStatus, SuspendStatus), 11, 4)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct Status {
        /// The thread object ID.
        pub thread: ThreadID,
    }

    /// Returns the thread group that contains a given thread.
    #[jdwp_command(ThreadGroupID, 11, 5)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct ThreadGroup {
        /// The thread object ID.
        pub thread: ThreadID,
    }

    /// Returns the current call stack of a suspended thread, top frame first.
    #[jdwp_command(Vec<(FrameID, Location)>, 11, 6)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct Frames {
        /// The thread object ID.
        pub thread: ThreadID,
        /// The index of the first frame to retrieve.
        pub start_frame: i32,
        /// The count of frames to retrieve (-1 means all remaining).
        pub length: i32,
    }

    /// Returns the count of frames on this thread's stack.
    #[jdwp_command(i32, 11, 7)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct FrameCount {
        /// The thread object ID.
        pub thread: ThreadID,
    }

    /// Returns the objects whose monitors have been entered by this thread.
    #[jdwp_command(Vec<TaggedObjectID>, 11, 8)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct OwnedMonitors {
        /// The thread object ID.
        pub thread: ThreadID,
    }

    /// Returns the object, if any, for which this thread is waiting.
    ///
    /// No monitor is written as a null object.
    #[jdwp_command(TaggedObjectID, 11, 9)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct CurrentContendedMonitor {
        /// The thread object ID.
        pub thread: ThreadID,
    }

    /// Interrupts the thread as java.lang.Thread.interrupt would.
    #[jdwp_command((), 11, 11)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct Interrupt {
        /// The thread object ID.
        pub thread: ThreadID,
    }

    /// Get the suspend count for this thread.
    #[jdwp_command(i32, 11, 12)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct SuspendCount {
        /// The thread object ID.
        pub thread: ThreadID,
    }
}

/// ThreadGroupReference Command Set (12)
pub mod thread_group_reference {
    use super::*;

    /// Returns the thread group name.
    #[jdwp_command(String, 12, 1)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct Name {
        /// The thread group object ID
        pub group: ThreadGroupID,
    }

    /// Returns the thread group, if any, which contains a given thread group.
    #[jdwp_command(Option<ThreadGroupID>, 12, 2)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct Parent {
        /// The thread group object ID
        pub group: ThreadGroupID,
    }

    /// Returns the live threads and active thread groups directly contained
    /// in this thread group.
    #[jdwp_command(12, 3)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct Children {
        /// The thread group object ID
        pub group: ThreadGroupID,
    }

    #[derive(Debug, Clone, PartialEq, Eq, JdwpReadable, JdwpWritable)]
    pub struct ChildrenReply {
        /// Live direct child threads
        pub child_threads: Vec<ThreadID>,
        /// Active child thread groups
        pub child_groups: Vec<ThreadGroupID>,
    }
}

/// ArrayReference Command Set (13)
pub mod array_reference {
    use super::*;

    /// Returns the number of components in a given array.
    #[jdwp_command(i32, 13, 1)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct Length {
        /// The array object ID
        pub array_id: ArrayID,
    }

    /// Returns a range of array components.
    ///
    /// The specified range must be within the bounds of the array.
    #[jdwp_command(ArrayRegion, 13, 2)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct GetValues {
        /// The array object ID
        pub array_id: ArrayID,
        /// The first index to retrieve
        pub first_index: i32,
        /// The number of components to retrieve
        pub length: i32,
    }
}

/// EventRequest Command Set (15)
pub mod event_request {
    use super::*;

    /// A filter attached to an event request, as it appears on the wire.
    #[derive(Debug, Clone, PartialEq, Eq, JdwpReadable, JdwpWritable)]
    #[repr(u8)]
    pub enum Modifier {
        /// Report the event only on the n-th time it would otherwise be
        /// reported; subsequent events are never reported for the request.
        Count(
            /// Count before event. One for one-off
            i32,
        ) = ModifierKind::Count as u8,

        /// Conditional on expression
        Conditional {
            /// For the future
            expr_id: i32,
        } = ModifierKind::Conditional as u8,

        /// Restricts reported events to those in the given thread.
        ThreadOnly(
            /// Required thread
            ThreadID,
        ) = ModifierKind::ThreadOnly as u8,

        /// Restricts reported events to those whose location is in the given
        /// reference type.
        ClassOnly(
            /// Required class
            ReferenceTypeID,
        ) = ModifierKind::ClassOnly as u8,

        /// Restricts reported events to those for classes whose name matches
        /// the given pattern.
        ///
        /// Matches are limited to exact matches of the given class pattern
        /// and matches of patterns that begin or end with `*`; for example,
        /// `*.Foo` or `java.*`.
        ClassMatch(
            /// Required class pattern.
            String,
        ) = ModifierKind::ClassMatch as u8,

        /// Restricts reported events to those for classes whose name does not
        /// match the given pattern.
        ClassExclude(
            /// Disallowed class pattern.
            String,
        ) = ModifierKind::ClassExclude as u8,

        /// Restricts reported events to those that occur at the given
        /// location.
        LocationOnly(
            /// Required location
            Location,
        ) = ModifierKind::LocationOnly as u8,

        /// Restricts reported exceptions by their class and whether they are
        /// caught or uncaught.
        ExceptionOnly {
            /// Exception to report. `None` means report exceptions of all
            /// types.
            exception: Option<ReferenceTypeID>,
            /// Report caught exceptions
            caught: bool,
            /// Report uncaught exceptions.
            uncaught: bool,
        } = ModifierKind::ExceptionOnly as u8,

        /// Restricts reported events to those that occur for a given field.
        FieldOnly(
            /// Type in which field is declared
            ReferenceTypeID,
            /// Required field
            FieldID,
        ) = ModifierKind::FieldOnly as u8,

        /// Restricts reported step events to those which satisfy depth and
        /// size constraints.
        Step(
            /// Thread in which to step
            ThreadID,
            /// Size of each step
            StepSize,
            /// Relative call stack limit
            StepDepth,
        ) = ModifierKind::Step as u8,

        /// Restricts reported events to those whose active 'this' object is
        /// the given object.
        InstanceOnly(
            /// Required 'this' object
            ObjectID,
        ) = ModifierKind::InstanceOnly as u8,

        /// Restricts reported class prepare events to those for reference
        /// types which have a source name which matches the given pattern.
        SourceNameMatch(
            /// Required source name pattern.
            String,
        ) = ModifierKind::SourceNameMatch as u8,
    }

    /// Set an event request.
    ///
    /// When the event described by this request occurs, an event is sent to
    /// the debugger. Only the step, breakpoint, exception, class unload,
    /// thread start and death, class prepare and method entry and exit kinds
    /// can be requested.
    #[jdwp_command(RequestID, 15, 1)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct Set {
        /// Event kind to request.
        pub event_kind: EventKind,
        /// What threads are suspended when this event occurs?
        pub suspend_policy: SuspendPolicy,
        /// Constraints used to control the number of generated events.
        ///
        /// Only events that satisfy all modifiers are reported.
        pub modifiers: Vec<Modifier>,
    }

    /// Clear an event request.
    ///
    /// If there isn't a matching event request the command is a no-op and
    /// does not result in an error.
    #[jdwp_command((), 15, 2)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct Clear {
        /// Event kind to clear
        pub event_kind: EventKind,
        /// ID of request to clear
        pub request_id: RequestID,
    }

    /// Removes all set breakpoints, a no-op if there are no breakpoints set.
    #[jdwp_command((), 15, 3)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct ClearAllBreakpoints;
}

/// StackFrame Command Set (16)
pub mod stack_frame {
    use super::*;

    /// Returns the value of one or more local variables in a given frame.
    #[jdwp_command(Vec<Value>, 16, 1)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct GetValues {
        /// The frame's thread.
        pub thread_id: ThreadID,
        /// The frame ID.
        pub frame_id: FrameID,
        /// Local variable indices and types to get.
        pub slots: Vec<(i32, Tag)>,
    }

    /// Sets the value of one or more local variables.
    #[jdwp_command((), 16, 2)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct SetValues {
        /// The frame's thread.
        pub thread_id: ThreadID,
        /// The frame ID.
        pub frame_id: FrameID,
        /// Local variable indices and values to set.
        pub slot_values: Vec<(i32, Value)>,
    }

    /// Returns the value of the 'this' reference for this frame.
    ///
    /// Static and native frames get a null object.
    #[jdwp_command(TaggedObjectID, 16, 3)]
    #[derive(Debug, Clone, JdwpReadable, JdwpWritable)]
    pub struct ThisObject {
        /// The frame's thread.
        pub thread_id: ThreadID,
        /// The frame ID.
        pub frame_id: FrameID,
    }
}

/// Event Command Set (64)
pub mod event {
    use super::*;

    /// A single event inside a [Composite].
    ///
    /// The field order on the wire is the discriminator ([EventKind]) first
    /// and then the request id, so the id stays inside each variant.
    #[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
    #[repr(u8)]
    pub enum Event {
        /// Notification of step completion.
        ///
        /// Generated before the code at its location is executed.
        SingleStep(
            /// Request that generated the event
            RequestID,
            /// Stepped thread
            ThreadID,
            /// Location stepped to
            Location,
        ) = EventKind::SingleStep as u8,

        /// Notification of a breakpoint.
        ///
        /// Generated before the code at its location is executed.
        Breakpoint(
            /// Request that generated the event
            RequestID,
            /// Thread which hit breakpoint
            ThreadID,
            /// Location hit
            Location,
        ) = EventKind::Breakpoint as u8,

        /// Notification of an exception.
        Exception(
            /// Request that generated the event
            RequestID,
            /// Thread with exception
            ThreadID,
            /// Location of exception throw
            Location,
            /// Thrown exception
            TaggedObjectID,
            /// Location of catch if caught, `None` if uncaught
            Option<Location>,
        ) = EventKind::Exception as u8,

        /// Notification of a new running thread.
        ThreadStart(
            /// Request that generated the event
            RequestID,
            /// Started thread
            ThreadID,
        ) = EventKind::ThreadStart as u8,

        /// Notification of a completed thread.
        ThreadDeath(
            /// Request that generated the event
            RequestID,
            /// Ending thread
            ThreadID,
        ) = EventKind::ThreadDeath as u8,

        /// Notification of a class prepare.
        ClassPrepare(
            /// Request that generated the event
            RequestID,
            /// Preparing thread
            ThreadID,
            /// Type being prepared
            TaggedReferenceTypeID,
            /// Type signature
            String,
            /// Status of type
            ClassStatus,
        ) = EventKind::ClassPrepare as u8,

        /// Notification of a class unload.
        ClassUnload(
            /// Request that generated the event
            RequestID,
            /// Type signature
            String,
        ) = EventKind::ClassUnload as u8,

        /// Notification of a method invocation.
        ///
        /// Generated before any code in the invoked method has executed.
        MethodEntry(
            /// Request that generated the event
            RequestID,
            /// Thread which entered method
            ThreadID,
            /// The initial executable location in the method
            Location,
        ) = EventKind::MethodEntry as u8,

        /// Notification of a method return.
        ///
        /// The location is the last executed location in the method.
        MethodExit(
            /// Request that generated the event
            RequestID,
            /// Thread which exited method
            ThreadID,
            /// Location of exit
            Location,
        ) = EventKind::MethodExit as u8,

        /// Notification of a method return, along with the value it returns.
        MethodExitWithReturnValue(
            /// Request that generated the event
            RequestID,
            /// Thread which exited method
            ThreadID,
            /// Location of exit
            Location,
            /// Value that will be returned by the method
            Value,
        ) = EventKind::MethodExitWithReturnValue as u8,

        /// Notification of initialization of a target VM.
        ///
        /// Automatically generated, sent before any other event.
        VmStart(
            /// Always [RequestID::AUTOMATIC] when automatically generated
            RequestID,
            /// Initial thread
            ThreadID,
        ) = EventKind::VmStart as u8,

        /// Notification that the debuggee is terminating.
        VmDeath(
            /// Always [RequestID::AUTOMATIC] when automatically generated
            RequestID,
        ) = EventKind::VmDeath as u8,
    }

    impl Event {
        pub fn kind(&self) -> EventKind {
            use Event::*;
            match self {
                SingleStep(..) => EventKind::SingleStep,
                Breakpoint(..) => EventKind::Breakpoint,
                Exception(..) => EventKind::Exception,
                ThreadStart(..) => EventKind::ThreadStart,
                ThreadDeath(..) => EventKind::ThreadDeath,
                ClassPrepare(..) => EventKind::ClassPrepare,
                ClassUnload(..) => EventKind::ClassUnload,
                MethodEntry(..) => EventKind::MethodEntry,
                MethodExit(..) => EventKind::MethodExit,
                MethodExitWithReturnValue(..) => EventKind::MethodExitWithReturnValue,
                VmStart(..) => EventKind::VmStart,
                VmDeath(..) => EventKind::VmDeath,
            }
        }

        pub fn request_id(&self) -> RequestID {
            use Event::*;
            match *self {
                SingleStep(id, ..)
                | Breakpoint(id, ..)
                | Exception(id, ..)
                | ThreadStart(id, ..)
                | ThreadDeath(id, ..)
                | ClassPrepare(id, ..)
                | ClassUnload(id, ..)
                | MethodEntry(id, ..)
                | MethodExit(id, ..)
                | MethodExitWithReturnValue(id, ..)
                | VmStart(id, ..)
                | VmDeath(id) => id,
            }
        }
    }

    /// Several events that occurred at the same time, sent by the back-end
    /// without a request from the debugger.
    ///
    /// All events in a composite share a thread and a location, except for
    /// the automatically generated VM start and death events.
    #[jdwp_command((), 64, 100)]
    #[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
    pub struct Composite {
        /// Which threads were suspended by this composite event?
        pub suspend_policy: SuspendPolicy,
        /// Events in set.
        pub events: Vec<Event>,
    }
}
