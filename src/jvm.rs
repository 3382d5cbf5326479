//! Java class-file conventions that JDWP leans on without defining: access
//! flags and type signatures.

use std::io::{self, Write};

use bitflags::bitflags;

use crate::{
    codec::{DecodeError, JdwpReadable, JdwpReader, JdwpWritable, JdwpWriter},
    spec::Tag,
};

// Access flags are not specified in the JDWP protocol, so they are in the JVM
// module. The bitflags retain unknown bits as well.

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TypeModifiers: u32 {
        /// Declared public; may be accessed from outside its package.
        const PUBLIC = 0x0001;
        /// Declared final; no subclasses allowed.
        const FINAL = 0x0010;
        /// Treat superclass methods specially when invoked by the invokespecial instruction.
        const SUPER = 0x0020;
        /// Is an interface, not a class.
        const INTERFACE = 0x0200;
        /// Declared abstract; must not be instantiated.
        const ABSTRACT = 0x0400;
        /// Declared synthetic; not present in the source code.
        const SYNTHETIC = 0x1000;
        /// Declared as an annotation type.
        const ANNOTATION = 0x2000;
        /// Declared as an enum type.
        const ENUM = 0x4000;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct FieldModifiers: u32 {
        /// Declared public; may be accessed from outside its package.
        const PUBLIC = 0x0001;
        /// Declared private; usable only within the defining class.
        const PRIVATE = 0x0002;
        /// Declared protected; may be accessed within subclasses.
        const PROTECTED = 0x0004;
        /// Declared static.
        const STATIC = 0x0008;
        /// Declared final; never directly assigned to after object
        /// construction (JLS §17.5).
        const FINAL = 0x0010;
        /// Declared volatile; cannot be cached.
        const VOLATILE = 0x0040;
        /// Declared transient; not written or read by a persistent object
        /// manager.
        const TRANSIENT = 0x0080;
        /// Declared synthetic; not present in the source code.
        const SYNTHETIC = 0x1000;
        /// Declared as an element of an enum.
        const ENUM = 0x4000;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MethodModifiers: u32 {
        /// Declared public; may be accessed from outside its package.
        const PUBLIC = 0x0001;
        /// Declared private; accessible only within the defining class.
        const PRIVATE = 0x0002;
        /// Declared protected; may be accessed within subclasses.
        const PROTECTED = 0x0004;
        /// Declared static.
        const STATIC = 0x0008;
        /// Declared final; must not be overridden (§5.4.5).
        const FINAL = 0x0010;
        /// Declared synchronized; invocation is wrapped by a monitor use.
        const SYNCHRONIZED = 0x0020;
        /// A bridge method, generated by the compiler.
        const BRIDGE = 0x0040;
        /// Declared with variable number of arguments.
        const VARARGS = 0x0080;
        /// Declared native; implemented in a language other than Java.
        const NATIVE = 0x0100;
        /// Declared abstract; no implementation is provided.
        const ABSTRACT = 0x0400;
        /// Declared strictfp; floating-point mode is FP-strict.
        const STRICT = 0x0800;
        /// Declared synthetic; not present in the source code.
        const SYNTHETIC = 0x1000;
    }
}

macro_rules! jdwp_access_flags {
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

jdwp_access_flags![TypeModifiers, FieldModifiers, MethodModifiers];

/// Turns a JNI type signature into the dotted name class filters match
/// against.
///
/// `Lcom/example/Foo;` becomes `com.example.Foo` and array signatures get a
/// `[]` suffix per dimension, so `[[I` is `int[][]`. Anything unrecognized is
/// returned as-is.
pub fn class_name(signature: &str) -> String {
    let dims = signature.bytes().take_while(|&b| b == b'[').count();
    let element = &signature[dims..];
    let mut name = match element.as_bytes().first() {
        Some(b'L') if element.ends_with(';') => element[1..element.len() - 1].replace('/', "."),
        Some(&b) if element.len() == 1 => match primitive_name(b) {
            Some(name) => name.to_owned(),
            None => return signature.to_owned(),
        },
        _ => return signature.to_owned(),
    };
    for _ in 0..dims {
        name.push_str("[]");
    }
    name
}

fn primitive_name(descriptor: u8) -> Option<&'static str> {
    Some(match descriptor {
        b'B' => "byte",
        b'C' => "char",
        b'D' => "double",
        b'F' => "float",
        b'I' => "int",
        b'J' => "long",
        b'S' => "short",
        b'Z' => "boolean",
        b'V' => "void",
        _ => return None,
    })
}

/// The value tag for a field or variable of the given type signature.
///
/// Strings and the well-known `java.lang` object kinds get their specific
/// tags, every other class is a plain object.
pub fn tag_of(signature: &str) -> Tag {
    match signature.as_bytes().first() {
        Some(b'[') => Tag::Array,
        Some(b'B') => Tag::Byte,
        Some(b'C') => Tag::Char,
        Some(b'D') => Tag::Double,
        Some(b'F') => Tag::Float,
        Some(b'I') => Tag::Int,
        Some(b'J') => Tag::Long,
        Some(b'S') => Tag::Short,
        Some(b'Z') => Tag::Boolean,
        Some(b'V') => Tag::Void,
        _ => match signature {
            "Ljava/lang/String;" => Tag::String,
            "Ljava/lang/Thread;" => Tag::Thread,
            "Ljava/lang/ThreadGroup;" => Tag::ThreadGroup,
            "Ljava/lang/ClassLoader;" => Tag::ClassLoader,
            "Ljava/lang/Class;" => Tag::ClassObject,
            _ => Tag::Object,
        },
    }
}

/// The tag of a method's return type, taken from after the closing paren of
/// its signature.
pub fn return_tag(method_signature: &str) -> Tag {
    match method_signature.rfind(')') {
        Some(paren) => tag_of(&method_signature[paren + 1..]),
        None => Tag::Object,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_names() {
        assert_eq!(class_name("Ljava/lang/String;"), "java.lang.String");
        assert_eq!(class_name("LMain;"), "Main");
        assert_eq!(class_name("[[I"), "int[][]");
        assert_eq!(class_name("[Lcom/a/B;"), "com.a.B[]");
        assert_eq!(class_name("weird"), "weird");
    }

    #[test]
    fn tags_from_signatures() {
        assert_eq!(tag_of("Z"), Tag::Boolean);
        assert_eq!(tag_of("[Ljava/lang/Object;"), Tag::Array);
        assert_eq!(tag_of("Ljava/lang/String;"), Tag::String);
        assert_eq!(tag_of("LMain;"), Tag::Object);
        assert_eq!(return_tag("(ILjava/lang/String;)J"), Tag::Long);
        assert_eq!(return_tag("()V"), Tag::Void);
    }

    #[test]
    fn access_flags_keep_unknown_bits() {
        let bytes = crate::codec::encode(&MethodModifiers::from_bits_retain(0x8009)).unwrap();
        assert_eq!(bytes, [0, 0, 0x80, 0x09]);
        let flags = MethodModifiers::read(&mut JdwpReader::new(&bytes)).unwrap();
        assert!(flags.contains(MethodModifiers::PUBLIC | MethodModifiers::STATIC));
        assert_eq!(flags.bits(), 0x8009);
    }
}
