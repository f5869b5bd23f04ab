//! Class file header decoding.
//!
//! Only the part of the class file needed for type-graph questions is read:
//! the constant pool, access flags, `this_class`, `super_class`, and the
//! direct interface list. Fields, methods, and attributes are never touched,
//! so no module code is loaded or executed.

use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt};

use crate::error::ClassFormatError;

/// Magic number every class file starts with.
pub const CLASS_MAGIC: u32 = 0xCAFE_BABE;

/// `ACC_INTERFACE` access flag.
pub const ACC_INTERFACE: u16 = 0x0200;

// Constant pool tags.
const TAG_UTF8: u8 = 1;
const TAG_INTEGER: u8 = 3;
const TAG_FLOAT: u8 = 4;
const TAG_LONG: u8 = 5;
const TAG_DOUBLE: u8 = 6;
const TAG_CLASS: u8 = 7;
const TAG_STRING: u8 = 8;
const TAG_FIELD_REF: u8 = 9;
const TAG_METHOD_REF: u8 = 10;
const TAG_INTERFACE_METHOD_REF: u8 = 11;
const TAG_NAME_AND_TYPE: u8 = 12;
const TAG_METHOD_HANDLE: u8 = 15;
const TAG_METHOD_TYPE: u8 = 16;
const TAG_DYNAMIC: u8 = 17;
const TAG_INVOKE_DYNAMIC: u8 = 18;
const TAG_MODULE: u8 = 19;
const TAG_PACKAGE: u8 = 20;

#[derive(Debug, Clone)]
enum Constant {
    Utf8(String),
    Class(u16),
    Other,
    /// Slot 0 and the second slot of long/double entries.
    Unusable,
}

/// Declared identity and direct supertypes of a compiled type.
///
/// Names are in dotted binary form (`com.example.Outer$Inner`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassHeader {
    /// Class file minor version.
    pub minor_version: u16,
    /// Class file major version.
    pub major_version: u16,
    /// Raw access flags.
    pub access_flags: u16,
    /// Name declared by `this_class`.
    pub this_class: String,
    /// Direct superclass; `None` for `java.lang.Object` and module descriptors.
    pub super_class: Option<String>,
    /// Directly implemented (or, for interfaces, extended) interfaces.
    pub interfaces: Vec<String>,
}

impl ClassHeader {
    /// Decodes the header of a class file.
    pub fn parse(bytes: &[u8]) -> Result<Self, ClassFormatError> {
        let mut reader = Cursor::new(bytes);

        let magic = reader.read_u32::<BigEndian>()?;
        if magic != CLASS_MAGIC {
            return Err(ClassFormatError::BadMagic(magic));
        }
        let minor_version = reader.read_u16::<BigEndian>()?;
        let major_version = reader.read_u16::<BigEndian>()?;

        let pool = read_constant_pool(&mut reader)?;

        let access_flags = reader.read_u16::<BigEndian>()?;
        let this_index = reader.read_u16::<BigEndian>()?;
        let super_index = reader.read_u16::<BigEndian>()?;
        let interface_count = reader.read_u16::<BigEndian>()?;
        let mut interface_indices = Vec::with_capacity(interface_count as usize);
        for _ in 0..interface_count {
            interface_indices.push(reader.read_u16::<BigEndian>()?);
        }

        let this_class = class_name(&pool, this_index)?;
        let super_class = match super_index {
            0 => None,
            index => Some(class_name(&pool, index)?),
        };
        let interfaces = interface_indices
            .into_iter()
            .map(|index| class_name(&pool, index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            minor_version,
            major_version,
            access_flags,
            this_class,
            super_class,
            interfaces,
        })
    }

    /// Returns true if the type is an interface.
    pub fn is_interface(&self) -> bool {
        self.access_flags & ACC_INTERFACE != 0
    }
}

fn read_constant_pool(reader: &mut Cursor<&[u8]>) -> Result<Vec<Constant>, ClassFormatError> {
    let count = reader.read_u16::<BigEndian>()?;
    let mut pool = Vec::with_capacity(count as usize);
    pool.push(Constant::Unusable);

    let mut index: u16 = 1;
    while index < count {
        let tag = reader.read_u8()?;
        match tag {
            TAG_UTF8 => {
                let len = reader.read_u16::<BigEndian>()? as usize;
                let mut buf = vec![0u8; len];
                reader.read_exact(&mut buf)?;
                pool.push(Constant::Utf8(decode_modified_utf8(&buf)));
            }
            TAG_CLASS => {
                pool.push(Constant::Class(reader.read_u16::<BigEndian>()?));
            }
            TAG_LONG | TAG_DOUBLE => {
                skip(reader, 8)?;
                pool.push(Constant::Other);
                pool.push(Constant::Unusable);
                index += 1;
            }
            TAG_INTEGER | TAG_FLOAT => {
                skip(reader, 4)?;
                pool.push(Constant::Other);
            }
            TAG_STRING | TAG_METHOD_TYPE | TAG_MODULE | TAG_PACKAGE => {
                skip(reader, 2)?;
                pool.push(Constant::Other);
            }
            TAG_FIELD_REF | TAG_METHOD_REF | TAG_INTERFACE_METHOD_REF | TAG_NAME_AND_TYPE
            | TAG_DYNAMIC | TAG_INVOKE_DYNAMIC => {
                skip(reader, 4)?;
                pool.push(Constant::Other);
            }
            TAG_METHOD_HANDLE => {
                skip(reader, 3)?;
                pool.push(Constant::Other);
            }
            _ => return Err(ClassFormatError::BadConstantTag { index, tag }),
        }
        index += 1;
    }

    Ok(pool)
}

fn skip(reader: &mut Cursor<&[u8]>, len: usize) -> Result<(), ClassFormatError> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf[..len])?;
    Ok(())
}

fn class_name(pool: &[Constant], index: u16) -> Result<String, ClassFormatError> {
    let name_index = match pool.get(index as usize) {
        Some(Constant::Class(name_index)) => *name_index,
        _ => {
            return Err(ClassFormatError::BadConstantIndex {
                index,
                expected: "Class",
            })
        }
    };
    match pool.get(name_index as usize) {
        Some(Constant::Utf8(name)) => Ok(name.replace('/', ".")),
        _ => Err(ClassFormatError::BadConstantIndex {
            index: name_index,
            expected: "Utf8",
        }),
    }
}

/// Decodes the JVM's modified UTF-8 (two-byte NUL, surrogate pairs as
/// separate three-byte sequences).
fn decode_modified_utf8(bytes: &[u8]) -> String {
    let mut units = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b & 0x80 == 0 {
            units.push(b as u16);
            i += 1;
        } else if b & 0xE0 == 0xC0 && i + 1 < bytes.len() {
            units.push((((b & 0x1F) as u16) << 6) | (bytes[i + 1] & 0x3F) as u16);
            i += 2;
        } else if b & 0xF0 == 0xE0 && i + 2 < bytes.len() {
            units.push(
                (((b & 0x0F) as u16) << 12)
                    | (((bytes[i + 1] & 0x3F) as u16) << 6)
                    | (bytes[i + 2] & 0x3F) as u16,
            );
            i += 3;
        } else {
            units.push(0xFFFD);
            i += 1;
        }
    }
    String::from_utf16_lossy(&units)
}
