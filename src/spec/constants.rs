use std::{
    fmt::{Display, Formatter},
    io::{self, Write},
};

use bitflags::bitflags;

use crate::codec::{DecodeError, JdwpReadable, JdwpReader, JdwpWritable, JdwpWriter};

macro_rules! jdwp_enum {
    (
        #[repr($repr:ident)]
        pub enum $e:ident {
            $($(#[doc = $string:literal])* $name:ident = $id:literal),*
            $(,)?
        }
    ) => {
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        #[repr($repr)]
        pub enum $e {
            $($(#[doc = $string])* $name = $id,)*
        }

        impl TryFrom<$repr> for $e {
            type Error = $repr;

            fn try_from(value: $repr) -> Result<Self, Self::Error> {
                match value {
                    $($id => Ok($e::$name),)*
                    other => Err(other),
                }
            }
        }

        impl JdwpReadable for $e {
            fn read(read: &mut JdwpReader<'_>) -> Result<Self, DecodeError> {
                Self::try_from($repr::read(read)?).map_err(|value| DecodeError::InvalidValue {
                    what: stringify!($e),
                    value: value.into(),
                })
            }
        }

        impl JdwpWritable for $e {
            fn length(&self) -> usize {
                std::mem::size_of::<$repr>()
            }

            fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
                (*self as $repr).write(write)
            }
        }
    };
    (
        #[derive(Display)]
        #[repr($repr:ident)]
        pub enum $e:ident {
            $(#[doc = $string:literal] $name:ident = $id:literal),*
            $(,)?
        }
    ) => {
        jdwp_enum! {
            #[repr($repr)]
            pub enum $e {
                $(#[doc = $string] $name = $id,)*
            }
        }

        impl Display for $e {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $($e::$name => $string,)*
                })
            }
        }
    };
    (
        $(
            $(#[derive(Display)])?
            #[repr($repr:ident)]
            pub enum $e:ident {
                $(#[doc = $string:literal] $name:ident = $id:literal),*
                $(,)?
            }
        )*
    ) => {
        $(
            jdwp_enum! {
                $(#[derive(Display)])?
                #[repr($repr)]
                pub enum $e {
                    $(#[doc = $string] $name = $id,)*
                }
            }
        )*
    };
}

jdwp_enum! {
    #[derive(Display)]
    #[repr(u16)]
    pub enum ErrorCode {
        /// No error has occurred
        None = 0,
        /// Passed thread is null, is not a valid thread or has exited
        InvalidThread = 10,
        /// Thread group invalid
        InvalidThreadGroup = 11,
        /// If the specified thread has not been suspended by an event
        ThreadNotSuspended = 13,
        /// Thread already suspended
        ThreadSuspended = 14,
        /// Thread has not been started or is now dead
        ThreadNotAlive = 15,
        /// If this reference type has been unloaded and garbage collected
        InvalidObject = 20,
        /// Invalid class
        InvalidClass = 21,
        /// Class has been loaded but not yet prepared
        ClassNotPrepared = 22,
        /// Invalid method
        InvalidMethodid = 23,
        /// Invalid location
        InvalidLocation = 24,
        /// Invalid field
        InvalidFieldid = 25,
        /// Invalid jframeID
        InvalidFrameid = 30,
        /// There are no more Java or JNI frames on the call stack
        NoMoreFrames = 31,
        /// Information about the frame is not available
        OpaqueFrame = 32,
        /// The variable is not an appropriate type for the function used
        TypeMismatch = 34,
        /// Invalid slot
        InvalidSlot = 35,
        /// The functionality is not implemented in this virtual machine
        NotImplemented = 99,
        /// Desired information is not available
        AbsentInformation = 101,
        /// The specified event type id is not recognized
        InvalidEventType = 102,
        /// Illegal argument
        IllegalArgument = 103,
        /// The virtual machine is not running
        VmDead = 112,
        /// An unexpected internal error has occurred
        Internal = 113,
        /// object type id or class tag
        InvalidTag = 500,
        /// Previous invoke not complete
        AlreadyInvoking = 502,
        /// Index is invalid
        InvalidIndex = 503,
        /// The length is invalid
        InvalidLength = 504,
        /// The string is invalid
        InvalidString = 506,
        /// The class loader is invalid
        InvalidClassLoader = 507,
        /// The array is invalid
        InvalidArray = 508,
        /// The count is invalid
        InvalidCount = 512,
    }
}

impl std::error::Error for ErrorCode {}

jdwp_enum! {
    #[repr(u8)]
    pub enum CommandSet {
        VirtualMachine = 1,
        ReferenceType = 2,
        ClassType = 3,
        ArrayType = 4,
        InterfaceType = 5,
        Method = 6,
        Field = 8,
        ObjectReference = 9,
        StringReference = 10,
        ThreadReference = 11,
        ThreadGroupReference = 12,
        ArrayReference = 13,
        ClassLoaderReference = 14,
        EventRequest = 15,
        StackFrame = 16,
        ClassObjectReference = 17,
        ModuleReference = 18,
        Event = 64,
    }
}

jdwp_enum! {
    #[repr(u8)]
    pub enum EventKind {
        SingleStep = 1,
        Breakpoint = 2,
        FramePop = 3,
        Exception = 4,
        UserDefined = 5,
        ThreadStart = 6,
        ThreadDeath = 7,
        ClassPrepare = 8,
        ClassUnload = 9,
        ClassLoad = 10,
        FieldAccess = 20,
        FieldModification = 21,
        ExceptionCatch = 30,
        MethodEntry = 40,
        MethodExit = 41,
        MethodExitWithReturnValue = 42,
        MonitorContendedEnter = 43,
        MonitorContendedEntered = 44,
        MonitorWait = 45,
        MonitorWaited = 46,
        VmStart = 90,
        VmDeath = 99,
        /// Never sent across JDWP
        VmDisconnected = 100,
    }
}

impl EventKind {
    /// Whether an event request of this kind can be set; every other kind is
    /// either never generated by this back-end or generated automatically.
    pub fn is_requestable(self) -> bool {
        use EventKind::*;
        matches!(
            self,
            SingleStep
                | Breakpoint
                | Exception
                | ClassUnload
                | ThreadStart
                | ThreadDeath
                | ClassPrepare
                | MethodEntry
                | MethodExit
                | MethodExitWithReturnValue
        )
    }
}

jdwp_enum! {
    #[repr(u32)]
    pub enum ThreadStatus {
        Zombie = 0,
        Running = 1,
        Sleeping = 2,
        Monitor = 3,
        Wait = 4,
    }
}

jdwp_enum! {
    #[repr(u32)]
    pub enum SuspendStatus {
        NotSuspended = 0,
        Suspended = 1,
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ClassStatus: u32 {
        const VERIFIED = 1;
        const PREPARED = 2;
        const INITIALIZED = 4;
        const ERROR = 8;

        const OK = Self::VERIFIED.bits() | Self::PREPARED.bits() | Self::INITIALIZED.bits();
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct InvokeOptions: u32 {
        const NONE = 0x00;
        /// otherwise, all threads started
        const SINGLE_THREADED = 0x01;
        /// otherwise, normal virtual invoke (instance methods only)
        const NONVIRTUAL = 0x02;
    }
}

macro_rules! u32_flags {
    ($($types:ident),*) => {
        $(
            impl JdwpReadable for $types {
                fn read(read: &mut JdwpReader<'_>) -> Result<Self, DecodeError> {
                    u32::read(read).map(Self::from_bits_retain)
                }
            }

            impl JdwpWritable for $types {
                fn length(&self) -> usize {
                    4
                }

                fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
                    self.bits().write(write)
                }
            }
        )*
    };
}

u32_flags![ClassStatus, InvokeOptions];

pub(crate) trait ByteTag {}

jdwp_enum! {
    #[repr(u8)]
    pub enum TypeTag {
        /// ReferenceType is a class
        Class = 1,
        /// ReferenceType is an interface
        Interface = 2,
        /// ReferenceType is an array
        Array = 3,
    }
}

// object tags are followed by an object id, the rest by their payload
jdwp_enum! {
    #[repr(u8)]
    pub enum Tag {
        /// `[`, array
        Array = 91,
        /// `B`, byte value, 1 byte
        Byte = 66,
        /// `C`, character value, 2 bytes
        Char = 67,
        /// `L`, object
        Object = 76,
        /// `F`, float value, 4 bytes
        Float = 70,
        /// `D`, double value, 8 bytes
        Double = 68,
        /// `I`, int value, 4 bytes
        Int = 73,
        /// `J`, long value, 8 bytes
        Long = 74,
        /// `S`, short value, 2 bytes
        Short = 83,
        /// `V`, void value, no bytes
        Void = 86,
        /// `Z`, boolean value, 1 byte
        Boolean = 90,
        /// `s`, String
        String = 115,
        /// `t`, Thread
        Thread = 116,
        /// `g`, ThreadGroup
        ThreadGroup = 103,
        /// `l`, ClassLoader
        ClassLoader = 108,
        /// `c`, class
        ClassObject = 99,
    }
}

impl ByteTag for Tag {}
impl ByteTag for TypeTag {}

jdwp_enum! {
    #[repr(u32)]
    pub enum StepDepth {
        /// Step into any method calls that occur before the end of the step
        Into = 0,
        /// Step over any method calls that occur before the end of the step
        Over = 1,
        /// Step out of the current method
        Out = 2,
    }
}

jdwp_enum! {
    #[repr(u32)]
    pub enum StepSize {
        /// Step by the minimum possible amount (often a byte code instruction)
        Min = 0,
        /// Step to the next source line unless there is no line number
        /// information in which case a MIN step is done instead
        Line = 1,
    }
}

jdwp_enum! {
    #[repr(u8)]
    pub enum SuspendPolicy {
        /// Suspend no threads when this event is encountered
        None = 0,
        /// Suspend the event thread when this event is encountered
        EventThread = 1,
        /// Suspend all threads when this event is encountered
        All = 2,
    }
}

impl SuspendPolicy {
    /// The stronger of two policies, used when several requests fire at once.
    pub fn max(self, other: SuspendPolicy) -> SuspendPolicy {
        if (other as u8) > (self as u8) {
            other
        } else {
            self
        }
    }
}

jdwp_enum! {
    #[repr(u8)]
    pub enum ModifierKind {
        /// Report the event only on its n-th occurrence, after which the
        /// request expires.
        Count = 1,
        /// Conditional on expression
        Conditional = 2,
        /// Restricts reported events to those in the given thread.
        ThreadOnly = 3,
        /// Restricts reported events to those whose location is in the given
        /// reference type.
        ClassOnly = 4,
        /// Restricts reported events to those for classes whose name matches
        /// the given restricted regular expression.
        ClassMatch = 5,
        /// Restricts reported events to those for classes whose name does not
        /// match the given restricted regular expression.
        ClassExclude = 6,
        /// Restricts reported events to those that occur at the given
        /// location.
        LocationOnly = 7,
        /// Restricts reported exceptions by their class and whether they are
        /// caught or uncaught.
        ExceptionOnly = 8,
        /// Restricts reported events to those that occur for a given field.
        FieldOnly = 9,
        /// Restricts reported step events to those which satisfy depth and
        /// size constraints.
        Step = 10,
        /// Restricts reported events to those whose active 'this' object is
        /// the given object.
        InstanceOnly = 11,
        /// Restricts reported class prepare events to those whose source name
        /// matches the given restricted regular expression.
        SourceNameMatch = 12,
    }
}
