//! The linear, length-less byte encoding produced by the compiler and
//! walked by the evaluator.
//!
//! There is no per-node length header: a reader that doesn't want a node's
//! value must still walk its full shape to land on the next sibling. That's
//! why [`crate::eval`] implements every node twice in lock-step (execute and
//! skip) rather than reading a length prefix and seeking past it.

use crate::error::{Error, Result};

/// Mirrors the reference implementation's node-type ordering exactly; this
/// crate's decoder depends on the discriminant values matching the encoder's,
/// not on any particular order being "correct" in the abstract, so the order
/// is kept byte-for-byte identical to the source project rather than
/// reshuffled for readability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NodeType {
    StatementList = 0,
    Name = 1,
    Assign = 2,
    Return = 3,
    String = 4,
    Compare = 5,
    Dictionary = 6,
    Integer = 7,
    IfElse = 8,
    If = 9,
    Call = 10,
    Attribute = 11,
    UnaryOp = 12,
    BinaryOp = 13,
    BoolOp = 14,
    List = 15,
    Tuple = 16,
    Subscript = 17,
    Index = 18,
    ForLoop = 19,
    WhileLoop = 20,
    AugmentedAssign = 21,
    Continue = 22,
    Break = 23,
    Import = 24,
    ImportFrom = 25,
    Alias = 26,
}

impl NodeType {
    pub fn from_u8(tag: u8) -> Result<NodeType> {
        use NodeType::*;
        Ok(match tag {
            0 => StatementList,
            1 => Name,
            2 => Assign,
            3 => Return,
            4 => String,
            5 => Compare,
            6 => Dictionary,
            7 => Integer,
            8 => IfElse,
            9 => If,
            10 => Call,
            11 => Attribute,
            12 => UnaryOp,
            13 => BinaryOp,
            14 => BoolOp,
            15 => List,
            16 => Tuple,
            17 => Subscript,
            18 => Index,
            19 => ForLoop,
            20 => WhileLoop,
            21 => AugmentedAssign,
            22 => Continue,
            23 => Break,
            24 => Import,
            25 => ImportFrom,
            26 => Alias,
            other => {
                return Err(Error::Encoding {
                    message: format!("unknown node tag {other}"),
                })
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CompareOp {
    Eq = 0,
    NotEq = 1,
    Lt = 2,
    LtE = 3,
    Gt = 4,
    GtE = 5,
    In = 6,
    NotIn = 7,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BoolOpKind {
    And = 0,
    Or = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BinaryOpKind {
    Add = 0,
    Sub = 1,
    Mul = 2,
    Div = 3,
    Mod = 4,
    BitAnd = 5,
    BitOr = 6,
    BitXor = 7,
    LShift = 8,
    RShift = 9,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum UnaryOpKind {
    Not = 0,
    Neg = 1,
    Pos = 2,
    Invert = 3,
}

macro_rules! from_u8_enum {
    ($ty:ident { $($variant:ident = $val:expr),+ $(,)? }) => {
        impl $ty {
            pub fn from_u8(tag: u8) -> Result<$ty> {
                match tag {
                    $($val => Ok($ty::$variant),)+
                    other => Err(Error::Encoding {
                        message: format!(concat!("unknown ", stringify!($ty), " tag {}"), other),
                    }),
                }
            }
        }
    };
}

from_u8_enum!(CompareOp {
    Eq = 0, NotEq = 1, Lt = 2, LtE = 3, Gt = 4, GtE = 5, In = 6, NotIn = 7,
});
from_u8_enum!(BoolOpKind { And = 0, Or = 1 });
from_u8_enum!(BinaryOpKind {
    Add = 0, Sub = 1, Mul = 2, Div = 3, Mod = 4, BitAnd = 5, BitOr = 6, BitXor = 7,
    LShift = 8, RShift = 9,
});
from_u8_enum!(UnaryOpKind {
    Not = 0, Neg = 1, Pos = 2, Invert = 3,
});

/// A growable byte buffer the compiler emits into.
#[derive(Debug, Default)]
pub struct Encoding {
    bytes: Vec<u8>,
}

impl Encoding {
    pub fn new() -> Self {
        Encoding { bytes: Vec::new() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn write_tag(&mut self, tag: NodeType) {
        self.bytes.push(tag as u8);
    }

    pub fn write_u8(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_string(&mut self, s: &str) {
        self.write_u32(s.len() as u32);
        self.bytes.extend_from_slice(s.as_bytes());
    }

    /// Reserve a 4-byte slot to be patched later (used for forward jump-free
    /// constructs that still need a child count written before the children
    /// are known, e.g. dictionaries built incrementally).
    pub fn reserve_u32(&mut self) -> usize {
        let at = self.bytes.len();
        self.bytes.extend_from_slice(&0u32.to_le_bytes());
        at
    }

    pub fn patch_u32(&mut self, at: usize, value: u32) {
        self.bytes[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A read cursor into an [`Encoding`], shared between the execute and skip
/// walkers so both advance through the exact same bytes.
pub struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(encoding: &'a Encoding) -> Self {
        Cursor {
            bytes: encoding.as_bytes(),
            pos: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.pos + n > self.bytes.len() {
            return Err(Error::Encoding {
                message: "unexpected end of encoding".into(),
            });
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_tag(&mut self) -> Result<NodeType> {
        let byte = self.take(1)?[0];
        NodeType::from_u8(byte)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.take(4)?;
        Ok(i32::from_le_bytes(bytes.try_into().unwrap()))
    }

    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| Error::Encoding {
            message: "invalid utf-8 in string literal".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_scalars() {
        let mut enc = Encoding::new();
        enc.write_tag(NodeType::Integer);
        enc.write_i32(-42);
        enc.write_tag(NodeType::String);
        enc.write_string("hi");

        let mut cur = Cursor::new(&enc);
        assert_eq!(cur.read_tag().unwrap(), NodeType::Integer);
        assert_eq!(cur.read_i32().unwrap(), -42);
        assert_eq!(cur.read_tag().unwrap(), NodeType::String);
        assert_eq!(cur.read_string().unwrap(), "hi");
        assert!(cur.at_end());
    }

    #[test]
    fn unknown_tag_is_an_encoding_error() {
        assert!(NodeType::from_u8(200).is_err());
    }
}
