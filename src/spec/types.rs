use std::{
    fmt::{self, Debug},
    io::{self, Write},
    ops::Deref,
};

use byteorder::{WriteBytesExt, BE};

use crate::codec::*;

use super::{ByteTag, Tag, TypeTag};

pub trait JdwpId: Clone + Copy {
    /// Type of the underlying raw ID.
    type Raw;

    /// Creates an instance of Self from an arbitrary number.
    ///
    /// Nothing is validated here; ids are handed out by the debuggee's object
    /// registry and only ever echoed back by this crate.
    fn from_raw(raw: Self::Raw) -> Self;

    /// The underlying raw value.
    fn raw(self) -> Self::Raw;
}

/// Wire size of every identifier kind, as reported by IDSizes.
pub const ID_SIZE: usize = 8;

/// Uniquely identifies an object in the debuggee.
///
/// A particular object is identified by exactly one [ObjectID] throughout its
/// lifetime. The null object is the id `0`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ObjectID(u64);

/// Uniquely identifies a method in some class.
///
/// A [MethodID] is not necessarily unique on its own; it is always paired with
/// a [ReferenceTypeID] to uniquely identify one method.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct MethodID(u64);

/// Uniquely identifies a field in some class.
///
/// Like [MethodID], it's paired with a [ReferenceTypeID].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct FieldID(u64);

/// Uniquely identifies a frame across the whole debuggee.
///
/// A [FrameID] is only valid while its thread is suspended.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct FrameID(u64);

/// Uniquely identifies a reference type.
///
/// A [ReferenceTypeID] is not reused for a different type, even after the
/// type it referred to is unloaded.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ReferenceTypeID(u64);

macro_rules! ids {
    ($($tpe:ident),* $(,)?) => {
        $(
            impl JdwpId for $tpe {
                type Raw = u64;

                fn from_raw(raw: u64) -> Self {
                    Self(raw)
                }

                fn raw(self) -> u64 {
                    self.0
                }
            }

            impl Debug for $tpe {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, concat!(stringify!($tpe), "({})"), self.0)
                }
            }

            impl JdwpReadable for $tpe {
                fn read(read: &mut JdwpReader<'_>) -> Result<Self, DecodeError> {
                    u64::read(read).map($tpe)
                }
            }

            impl JdwpWritable for $tpe {
                fn length(&self) -> usize {
                    ID_SIZE
                }

                fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
                    write.write_u64::<BE>(self.0)
                }
            }

            impl JdwpReadable for Option<$tpe> {
                fn read(read: &mut JdwpReader<'_>) -> Result<Self, DecodeError> {
                    let id = $tpe::read(read)?;
                    Ok(if id.0 == 0 { None } else { Some(id) })
                }
            }

            impl JdwpWritable for Option<$tpe> {
                fn length(&self) -> usize {
                    ID_SIZE
                }

                #[inline]
                fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
                    self.unwrap_or($tpe(0)).write(write)
                }
            }
        )*
    };
}

ids![FieldID, MethodID, ObjectID, ReferenceTypeID, FrameID];

/// An object that is known to be a thread.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, JdwpReadable, JdwpWritable)]
#[repr(transparent)]
pub struct ThreadID(ObjectID);

/// An object that is known to be a thread group.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, JdwpReadable, JdwpWritable)]
#[repr(transparent)]
pub struct ThreadGroupID(ObjectID);

/// An object that is known to be a string object.
///
/// Note: this is very different from string, which is a value.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, JdwpReadable, JdwpWritable)]
#[repr(transparent)]
pub struct StringID(ObjectID);

/// An object that is known to be a class loader.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, JdwpReadable, JdwpWritable)]
#[repr(transparent)]
pub struct ClassLoaderID(ObjectID);

/// An object that is known to be a class object.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, JdwpReadable, JdwpWritable)]
#[repr(transparent)]
pub struct ClassObjectID(ObjectID);

/// An object that is known to be an array.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, JdwpReadable, JdwpWritable)]
#[repr(transparent)]
pub struct ArrayID(ObjectID);

/// A reference type that is known to be a class type.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, JdwpReadable, JdwpWritable)]
#[repr(transparent)]
pub struct ClassID(ReferenceTypeID);

/// A reference type that is known to be an interface type.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, JdwpReadable, JdwpWritable)]
#[repr(transparent)]
pub struct InterfaceID(ReferenceTypeID);

/// A reference type that is known to be an array type.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, JdwpReadable, JdwpWritable)]
#[repr(transparent)]
pub struct ArrayTypeID(ReferenceTypeID);

macro_rules! wrapper_ids {
    ($($deref:ident {$($tpe:ident),* $(,)?})*) => {
        $($(
            impl JdwpId for $tpe {
                type Raw = u64;

                fn from_raw(raw: u64) -> Self {
                    Self($deref::from_raw(raw))
                }

                fn raw(self) -> u64 {
                    self.0.0
                }
            }

            impl Debug for $tpe {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, concat!(stringify!($tpe), "({})"), self.0.0)
                }
            }

            impl From<$tpe> for $deref {
                fn from(id: $tpe) -> $deref {
                    id.0
                }
            }

            impl Deref for $tpe {
                type Target = $deref;

                fn deref(&self) -> &Self::Target {
                    &self.0
                }
            }

            impl JdwpReadable for Option<$tpe> {
                fn read(read: &mut JdwpReader<'_>) -> Result<Self, DecodeError> {
                    let id = $tpe::read(read)?;
                    Ok(if id.0 .0 == 0 { None } else { Some(id) })
                }
            }

            impl JdwpWritable for Option<$tpe> {
                fn length(&self) -> usize {
                    ID_SIZE
                }

                fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
                    self.unwrap_or($tpe($deref(0))).write(write)
                }
            }
        )*)*
    };
}

wrapper_ids! {
    ObjectID {
        ThreadID,
        ThreadGroupID,
        StringID,
        ClassLoaderID,
        ClassObjectID,
        ArrayID,
    }
    ReferenceTypeID {
        ClassID,
        InterfaceID,
        ArrayTypeID,
    }
}

/// The id of an event request, assigned by this back-end on
/// [Set](super::event_request::Set).
///
/// Automatically generated events carry the id `0`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, JdwpReadable, JdwpWritable)]
pub struct RequestID(i32);

impl RequestID {
    pub const AUTOMATIC: RequestID = RequestID(0);
}

impl JdwpId for RequestID {
    type Raw = i32;

    fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    fn raw(self) -> i32 {
        self.0
    }
}

/// SAFETY:
/// T must be a #[repr(u8)] enum and all variants must have explicit
/// discriminators that are valid tag values.
pub(crate) unsafe fn tag<T, U: ByteTag + Copy>(e: &T) -> U {
    *(e as *const T as *const U)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, JdwpReadable, JdwpWritable)]
#[repr(u8)]
pub enum TaggedObjectID {
    /// an array object
    Array(ArrayID) = Tag::Array as u8,
    /// an object
    Object(ObjectID) = Tag::Object as u8,
    /// a String object
    String(StringID) = Tag::String as u8,
    /// a Thread object
    Thread(ThreadID) = Tag::Thread as u8,
    /// a ThreadGroup object
    ThreadGroup(ThreadGroupID) = Tag::ThreadGroup as u8,
    /// a ClassLoader object
    ClassLoader(ClassLoaderID) = Tag::ClassLoader as u8,
    /// a class object object
    ClassObject(ClassObjectID) = Tag::ClassObject as u8,
}

impl TaggedObjectID {
    /// The null reference, as written where a tagged object is optional.
    pub const NULL: TaggedObjectID = TaggedObjectID::Object(ObjectID(0));

    pub fn tag(&self) -> Tag {
        // SAFETY: Self and Tag fulfill the requirements
        unsafe { tag(self) }
    }
}

impl Deref for TaggedObjectID {
    type Target = ObjectID;

    fn deref(&self) -> &Self::Target {
        use TaggedObjectID::*;
        match self {
            Array(id) => id,
            Object(id) => id,
            String(id) => id,
            Thread(id) => id,
            ThreadGroup(id) => id,
            ClassLoader(id) => id,
            ClassObject(id) => id,
        }
    }
}

/// A tagged representation of [ReferenceTypeID], the pair of [TypeTag] and
/// [ReferenceTypeID] that most replies use.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, JdwpReadable, JdwpWritable)]
#[repr(u8)]
pub enum TaggedReferenceTypeID {
    /// a class reference
    Class(ClassID) = TypeTag::Class as u8,
    /// an interface reference
    Interface(InterfaceID) = TypeTag::Interface as u8,
    /// an array reference
    Array(ArrayTypeID) = TypeTag::Array as u8,
}

impl TaggedReferenceTypeID {
    pub fn tag(&self) -> TypeTag {
        // SAFETY: Self and TypeTag fulfill the requirements
        unsafe { tag(self) }
    }
}

impl Deref for TaggedReferenceTypeID {
    type Target = ReferenceTypeID;

    fn deref(&self) -> &Self::Target {
        use TaggedReferenceTypeID::*;
        match self {
            Class(id) => id,
            Interface(id) => id,
            Array(id) => id,
        }
    }
}

/// A value in the debuggee: one tag byte followed by a payload whose size
/// the tag determines.
#[derive(Debug, Copy, Clone, PartialEq, JdwpReadable, JdwpWritable)]
#[repr(u8)]
pub enum Value {
    /// an array object
    Array(ArrayID) = Tag::Array as u8,
    /// a byte value (1 byte)
    Byte(i8) = Tag::Byte as u8,
    /// a character value (2 bytes)
    Char(u16) = Tag::Char as u8,
    /// an object ([ObjectID] size)
    Object(ObjectID) = Tag::Object as u8,
    /// a float value (4 bytes)
    Float(f32) = Tag::Float as u8,
    /// a double value (8 bytes)
    Double(f64) = Tag::Double as u8,
    /// an int value (4 bytes)
    Int(i32) = Tag::Int as u8,
    /// a long value (8 bytes)
    Long(i64) = Tag::Long as u8,
    /// a short value (2 bytes)
    Short(i16) = Tag::Short as u8,
    /// a void value (no bytes)
    Void = Tag::Void as u8,
    /// a boolean value (1 byte)
    Boolean(bool) = Tag::Boolean as u8,
    /// a String object
    String(StringID) = Tag::String as u8,
    /// a Thread object
    Thread(ThreadID) = Tag::Thread as u8,
    /// a ThreadGroup object
    ThreadGroup(ThreadGroupID) = Tag::ThreadGroup as u8,
    /// a ClassLoader object
    ClassLoader(ClassLoaderID) = Tag::ClassLoader as u8,
    /// a class object object
    ClassObject(ClassObjectID) = Tag::ClassObject as u8,
}

impl Value {
    pub fn tag(&self) -> Tag {
        // SAFETY: Self and Tag fulfill the requirements
        unsafe { tag(self) }
    }

    /// The object id carried by an object-like value.
    pub fn object_id(&self) -> Option<ObjectID> {
        use Value::*;
        match *self {
            Array(id) => Some(*id),
            Object(id) => Some(id),
            String(id) => Some(*id),
            Thread(id) => Some(*id),
            ThreadGroup(id) => Some(*id),
            ClassLoader(id) => Some(*id),
            ClassObject(id) => Some(*id),
            _ => None,
        }
    }

    fn as_long(&self) -> Option<i64> {
        use Value::*;
        match *self {
            Byte(v) => Some(v.into()),
            Char(v) => Some(v.into()),
            Short(v) => Some(v.into()),
            Int(v) => Some(v.into()),
            Long(v) => Some(v),
            Boolean(v) => Some(v.into()),
            _ => None,
        }
    }

    /// Re-tags an interpreter value with the declared type of the slot or
    /// method it came from.
    ///
    /// Interpreters commonly widen sub-int values to ints and keep untyped
    /// references, so e.g. an [Value::Int] returned from a method declared as
    /// `boolean` becomes a [Value::Boolean]. Values that can't be converted
    /// are returned unchanged.
    pub fn coerce_to(self, tag: Tag) -> Value {
        if self.tag() == tag {
            return self;
        }
        if let Some(id) = self.object_id() {
            return match tag {
                Tag::Array => Value::Array(JdwpId::from_raw(id.raw())),
                Tag::Object => Value::Object(id),
                Tag::String => Value::String(JdwpId::from_raw(id.raw())),
                Tag::Thread => Value::Thread(JdwpId::from_raw(id.raw())),
                Tag::ThreadGroup => Value::ThreadGroup(JdwpId::from_raw(id.raw())),
                Tag::ClassLoader => Value::ClassLoader(JdwpId::from_raw(id.raw())),
                Tag::ClassObject => Value::ClassObject(JdwpId::from_raw(id.raw())),
                _ => self,
            };
        }
        if tag == Tag::Void {
            return Value::Void;
        }
        let Some(long) = self.as_long() else {
            return match (self, tag) {
                (Value::Float(v), Tag::Double) => Value::Double(v.into()),
                (Value::Double(v), Tag::Float) => Value::Float(v as f32),
                _ => self,
            };
        };
        // truncation mirrors the JVM's narrowing conversions
        match tag {
            Tag::Byte => Value::Byte(long as i8),
            Tag::Char => Value::Char(long as u16),
            Tag::Short => Value::Short(long as i16),
            Tag::Int => Value::Int(long as i32),
            Tag::Long => Value::Long(long),
            Tag::Boolean => Value::Boolean(long != 0),
            Tag::Float => Value::Float(long as f32),
            Tag::Double => Value::Double(long as f64),
            _ => self,
        }
    }
}

/// A compact representation of values used with some array operations.
///
/// Primitive components are written untagged, object components keep their
/// tags.
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
#[repr(u8)]
pub enum ArrayRegion {
    Byte(Vec<i8>) = Tag::Byte as u8,
    Boolean(Vec<bool>) = Tag::Boolean as u8,
    Char(Vec<u16>) = Tag::Char as u8,
    Short(Vec<i16>) = Tag::Short as u8,
    Int(Vec<i32>) = Tag::Int as u8,
    Long(Vec<i64>) = Tag::Long as u8,
    Float(Vec<f32>) = Tag::Float as u8,
    Double(Vec<f64>) = Tag::Double as u8,
    Object(Vec<TaggedObjectID>) = Tag::Object as u8,
    Array(Vec<TaggedObjectID>) = Tag::Array as u8,
}

impl ArrayRegion {
    pub fn tag(&self) -> Tag {
        // SAFETY: Self and Tag fulfill the requirements
        unsafe { tag(self) }
    }

    pub fn len(&self) -> usize {
        use ArrayRegion::*;
        match self {
            Byte(v) => v.len(),
            Boolean(v) => v.len(),
            Char(v) => v.len(),
            Short(v) => v.len(),
            Int(v) => v.len(),
            Long(v) => v.len(),
            Float(v) => v.len(),
            Double(v) => v.len(),
            Object(v) | Array(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An executable location: a type tag and class id, a method id and the
/// index of an instruction within that method.
///
/// Index values within a method increase monotonically from the first
/// executable point to the last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, JdwpReadable, JdwpWritable)]
pub struct Location {
    pub reference_id: TaggedReferenceTypeID,
    pub method_id: MethodID,
    pub index: u64,
}

impl Location {
    pub fn new(reference_id: TaggedReferenceTypeID, method_id: MethodID, index: u64) -> Self {
        Location {
            reference_id,
            method_id,
            index,
        }
    }

    /// The same method at another index.
    pub fn at(&self, index: u64) -> Self {
        Location { index, ..*self }
    }
}

// an absent location (e.g. the catch location of an uncaught exception) is
// written as all zeroes
impl JdwpReadable for Option<Location> {
    fn read(read: &mut JdwpReader<'_>) -> Result<Self, DecodeError> {
        use TaggedReferenceTypeID::*;

        let raw_tag = u8::read(read)?;
        if raw_tag == 0 {
            read.read_bytes(ID_SIZE * 2 + 8)?;
            return Ok(None);
        }
        let tag = TypeTag::try_from(raw_tag).map_err(|value| DecodeError::InvalidValue {
            what: "TypeTag",
            value: value.into(),
        })?;
        let id = ReferenceTypeID::read(read)?.raw();
        let reference_id = match tag {
            TypeTag::Class => Class(JdwpId::from_raw(id)),
            TypeTag::Interface => Interface(JdwpId::from_raw(id)),
            TypeTag::Array => Array(JdwpId::from_raw(id)),
        };
        Ok(Some(Location {
            reference_id,
            method_id: JdwpReadable::read(read)?,
            index: JdwpReadable::read(read)?,
        }))
    }
}

impl JdwpWritable for Option<Location> {
    fn length(&self) -> usize {
        1 + ID_SIZE * 2 + 8
    }

    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        match self {
            Some(location) => location.write(write),
            None => write.write_all(&[0; 1 + ID_SIZE * 2 + 8]),
        }
    }
}

/// Reply to the invoke method commands: the return value and the exception
/// that was thrown, if any, written as a null object otherwise.
#[derive(Debug, Clone, PartialEq, JdwpReadable, JdwpWritable)]
pub struct InvokeMethodReply {
    pub return_value: Value,
    pub exception: TaggedObjectID,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip<T: JdwpReadable + JdwpWritable + PartialEq + Debug>(value: T) -> Vec<u8> {
        let bytes = encode(&value).unwrap();
        assert_eq!(bytes.len(), value.length(), "length of {value:?}");

        let mut reader = JdwpReader::new(&bytes);
        assert_eq!(T::read(&mut reader).unwrap(), value);
        assert!(reader.is_empty(), "{} bytes left after {value:?}", reader.remaining());
        bytes
    }

    #[test]
    fn every_value_tag() {
        let values = [
            Value::Array(ArrayID::from_raw(1)),
            Value::Byte(-3),
            Value::Char(0x263A),
            Value::Object(ObjectID::from_raw(2)),
            Value::Float(1.5),
            Value::Double(-0.25),
            Value::Int(i32::MIN),
            Value::Long(i64::MAX),
            Value::Short(-2),
            Value::Void,
            Value::Boolean(true),
            Value::String(StringID::from_raw(3)),
            Value::Thread(ThreadID::from_raw(4)),
            Value::ThreadGroup(ThreadGroupID::from_raw(5)),
            Value::ClassLoader(ClassLoaderID::from_raw(6)),
            Value::ClassObject(ClassObjectID::from_raw(7)),
        ];
        for value in values {
            let bytes = round_trip(value);
            assert_eq!(bytes[0], value.tag() as u8);
        }

        assert_eq!(encode(&Value::Void).unwrap(), [b'V']);
        assert_eq!(encode(&Value::Short(-2)).unwrap(), [b'S', 0xFF, 0xFE]);
        assert_eq!(encode(&Value::Object(ObjectID::from_raw(2))).unwrap().len(), 1 + ID_SIZE);
    }

    #[test]
    fn every_array_region_tag() {
        let regions = [
            ArrayRegion::Byte(vec![1, -1]),
            ArrayRegion::Boolean(vec![true, false, true]),
            ArrayRegion::Char(vec![b'a'.into()]),
            ArrayRegion::Short(vec![-7, 7]),
            ArrayRegion::Int(vec![]),
            ArrayRegion::Long(vec![1 << 40]),
            ArrayRegion::Float(vec![0.5, 2.0]),
            ArrayRegion::Double(vec![3.25]),
            ArrayRegion::Object(vec![
                TaggedObjectID::String(StringID::from_raw(9)),
                TaggedObjectID::NULL,
            ]),
            ArrayRegion::Array(vec![TaggedObjectID::Array(ArrayID::from_raw(10))]),
        ];
        for region in regions {
            let bytes = round_trip(region.clone());
            assert_eq!(bytes[0], region.tag() as u8);
        }

        // tag, count, then untagged components
        assert_eq!(
            encode(&ArrayRegion::Short(vec![-7, 7])).unwrap(),
            [b'S', 0, 0, 0, 2, 0xFF, 0xF9, 0, 7]
        );
        // object components keep their own tags
        assert_eq!(
            encode(&ArrayRegion::Object(vec![TaggedObjectID::NULL])).unwrap().len(),
            1 + 4 + 1 + ID_SIZE
        );
    }

    #[test]
    fn absent_location_is_zeroes() {
        let bytes = round_trip(None::<Location>);
        assert_eq!(bytes, [0; 1 + ID_SIZE * 2 + 8]);

        let location = Location::new(
            TaggedReferenceTypeID::Class(ClassID::from_raw(1)),
            MethodID::from_raw(2),
            3,
        );
        let bytes = round_trip(Some(location));
        assert_eq!(bytes.len(), 1 + ID_SIZE * 2 + 8);
        assert_eq!(bytes[0], TypeTag::Class as u8);
    }
}
