use std::{fmt, fmt::Display, io};

use crate::{
    codec::{encode, DecodeError, JdwpReadable, JdwpReader, JdwpWritable},
    spec::{CommandSet, ErrorCode},
};

/// The handshake both sides send before any packet, unframed.
pub const HANDSHAKE: &[u8; 14] = b"JDWP-Handshake";

pub trait Command {
    const ID: CommandId;

    type Reply;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, JdwpReadable, JdwpWritable)]
pub struct CommandId {
    command_set: u8,
    command: u8,
}

impl CommandId {
    pub const fn new(command_set: u8, command: u8) -> CommandId {
        CommandId {
            command_set,
            command,
        }
    }

    pub fn command_set(&self) -> Result<CommandSet, u8> {
        CommandSet::try_from(self.command_set)
    }

    pub const fn command(&self) -> u8 {
        self.command
    }
}

impl Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.command_set, self.command)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, JdwpWritable)]
#[repr(u8)]
pub enum PacketMeta {
    Command(CommandId) = 0x00,
    Reply(ErrorCode) = 0x80,
}

// any flags value with the reply bit set is a reply, so this is not derived
impl JdwpReadable for PacketMeta {
    fn read(read: &mut JdwpReader<'_>) -> Result<Self, DecodeError> {
        let flags = u8::read(read)?;
        if flags & 0x80 != 0 {
            ErrorCode::read(read).map(PacketMeta::Reply)
        } else {
            CommandId::read(read).map(PacketMeta::Command)
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, JdwpReadable, JdwpWritable)]
pub struct PacketHeader {
    length: u32,
    id: u32,
    meta: PacketMeta,
}

impl PacketHeader {
    pub const JDWP_SIZE: usize = 4 + 4 + 1 + 2;

    pub const fn new(length: u32, id: u32, meta: PacketMeta) -> PacketHeader {
        PacketHeader { length, id, meta }
    }

    pub const fn length(&self) -> u32 {
        self.length
    }

    pub const fn id(&self) -> u32 {
        self.id
    }

    pub const fn meta(&self) -> PacketMeta {
        self.meta
    }
}

/// A packet ready to be written to the wire.
#[derive(Debug)]
struct Packet<'a, T: ?Sized> {
    header: PacketHeader,
    body: &'a T,
}

impl<T: JdwpWritable + ?Sized> JdwpWritable for Packet<'_, T> {
    fn length(&self) -> usize {
        JdwpWritable::length(&self.header) + self.body.length()
    }

    fn write<W: io::Write>(&self, write: &mut crate::codec::JdwpWriter<W>) -> io::Result<()> {
        self.header.write(write)?;
        self.body.write(write)
    }
}

/// Frames `body` behind a header whose length is the header size plus the
/// body's reported length.
///
/// Fails with [io::ErrorKind::InvalidData] when the body writes a different
/// number of bytes than it reported.
pub fn encode_packet<T: JdwpWritable + ?Sized>(
    id: u32,
    meta: PacketMeta,
    body: &T,
) -> io::Result<Vec<u8>> {
    let length = PacketHeader::JDWP_SIZE + body.length();
    let length = u32::try_from(length)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "packet too large"))?;
    encode(&Packet {
        header: PacketHeader::new(length, id, meta),
        body,
    })
}

pub fn encode_reply<T: JdwpWritable + ?Sized>(id: u32, body: &T) -> io::Result<Vec<u8>> {
    encode_packet(id, PacketMeta::Reply(ErrorCode::None), body)
}

pub fn encode_error(id: u32, code: ErrorCode) -> io::Result<Vec<u8>> {
    encode_packet(id, PacketMeta::Reply(code), &())
}
