//! ABI type descriptors and the signature parser

use std::fmt;
use std::str::FromStr;

use abikit_primitives::WORD_SIZE;

use crate::AbiError;

/// Maximum number of array dimensions in a signature
pub const MAX_ARRAY_DEPTH: usize = 32;

/// Base name of an ABI type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    /// Unsigned integer
    Uint,
    /// Signed integer
    Int,
    /// 20-byte address
    Address,
    /// Boolean
    Bool,
    /// Signed fixed-point
    Fixed,
    /// Unsigned fixed-point
    Ufixed,
    /// Fixed-size or dynamic byte sequence
    Bytes,
    /// UTF-8 string
    String,
    /// Fixed-size hash
    Hash,
}

impl BaseType {
    /// Canonical signature name
    pub fn name(&self) -> &'static str {
        match self {
            BaseType::Uint => "uint",
            BaseType::Int => "int",
            BaseType::Address => "address",
            BaseType::Bool => "bool",
            BaseType::Fixed => "fixed",
            BaseType::Ufixed => "ufixed",
            BaseType::Bytes => "bytes",
            BaseType::String => "string",
            BaseType::Hash => "hash",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "uint" => BaseType::Uint,
            "int" => BaseType::Int,
            "address" => BaseType::Address,
            "bool" => BaseType::Bool,
            "fixed" | "real" => BaseType::Fixed,
            "ufixed" | "ureal" => BaseType::Ufixed,
            "bytes" => BaseType::Bytes,
            "string" => BaseType::String,
            "hash" => BaseType::Hash,
            _ => return None,
        })
    }
}

/// Suffix following the base name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sub {
    /// No suffix
    None,
    /// Numeric size: bits for integers, bytes for `bytes`/`hash`
    Size(usize),
    /// `<high>x<low>` bit widths of a fixed-point type
    Real {
        /// Integer bits
        high: usize,
        /// Fractional bits
        low: usize,
    },
}

impl fmt::Display for Sub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sub::None => Ok(()),
            Sub::Size(n) => write!(f, "{}", n),
            Sub::Real { high, low } => write!(f, "{}x{}", high, low),
        }
    }
}

/// Parsed ABI type signature
///
/// `dims` lists array dimensions in signature order, so the last entry is
/// the outermost one: `uint256[2][]` is a dynamic array of `uint256[2]`
/// with `dims == [2, 0]`. A `0` dimension is dynamically sized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Type {
    base: BaseType,
    sub: Sub,
    dims: Vec<usize>,
}

impl Type {
    /// Build a type from its parts, applying the same suffix rules as the parser
    pub fn new(base: BaseType, sub: Sub, dims: Vec<usize>) -> Result<Self, AbiError> {
        check_sub(base, &sub)?;
        check_depth(dims.len())?;
        Ok(Type { base, sub, dims })
    }

    /// Parse a signature such as `uint256`, `bytes32[3]` or `fixed128x128[][2]`
    pub fn parse(signature: &str) -> Result<Self, AbiError> {
        let signature = signature.trim();
        let (base_name, rest) = split_while(signature, |b| b.is_ascii_lowercase());
        let (sub_text, brackets) = split_sub(rest);

        let dims = parse_dims(brackets)?;
        let sub = parse_sub(base_name, sub_text)?;
        let base = BaseType::from_name(base_name)
            .ok_or_else(|| AbiError::Parse(format!("Unrecognized type base: {}", base_name)))?;

        Ok(Type { base, sub, dims })
    }

    /// The type used for length and offset words
    pub fn size_type() -> Self {
        Type {
            base: BaseType::Uint,
            sub: Sub::Size(256),
            dims: Vec::new(),
        }
    }

    /// Base name
    pub fn base(&self) -> BaseType {
        self.base
    }

    /// Suffix
    pub fn sub(&self) -> Sub {
        self.sub
    }

    /// Array dimensions, innermost first
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Whether this is an array type
    pub fn is_array(&self) -> bool {
        !self.dims.is_empty()
    }

    /// Outermost array dimension, `0` when dynamically sized
    pub fn outer_dim(&self) -> Option<usize> {
        self.dims.last().copied()
    }

    /// Static encoded size in bytes, `None` for dynamic types
    pub fn size(&self) -> Option<usize> {
        if matches!((self.base, self.sub), (BaseType::String, _) | (BaseType::Bytes, Sub::None)) {
            return None;
        }
        self.dims.iter().try_fold(WORD_SIZE, |size, &len| match len {
            0 => None,
            len => Some(size.saturating_mul(len)),
        })
    }

    /// Whether the encoded size depends on the value
    pub fn is_dynamic(&self) -> bool {
        self.size().is_none()
    }

    /// The type with the outermost dimension removed
    pub fn subtype(&self) -> Type {
        let mut dims = self.dims.clone();
        dims.pop();
        Type {
            base: self.base,
            sub: self.sub,
            dims,
        }
    }

    /// Bytes the type occupies in the head of an enclosing sequence
    pub(crate) fn head_size(&self) -> usize {
        self.size().unwrap_or(WORD_SIZE)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base.name(), self.sub)?;
        for dim in &self.dims {
            match dim {
                0 => f.write_str("[]")?,
                n => write!(f, "[{}]", n)?,
            }
        }
        Ok(())
    }
}

impl FromStr for Type {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Type::parse(s)
    }
}

fn split_while(s: &str, pred: impl Fn(u8) -> bool) -> (&str, &str) {
    let end = s.bytes().position(|b| !pred(b)).unwrap_or(s.len());
    s.split_at(end)
}

/// Split off `[0-9]* x? [0-9]*`
fn split_sub(s: &str) -> (&str, &str) {
    let (high, rest) = split_while(s, |b| b.is_ascii_digit());
    let mut end = high.len();
    if let Some(after_x) = rest.strip_prefix('x') {
        let (low, _) = split_while(after_x, |b| b.is_ascii_digit());
        end += 1 + low.len();
    }
    s.split_at(end)
}

/// Every remaining character must belong to a `[N]` or `[]` group
fn parse_dims(mut s: &str) -> Result<Vec<usize>, AbiError> {
    let unknown = || AbiError::Parse("Unknown characters found in array declaration".to_string());
    let mut dims = Vec::new();
    while !s.is_empty() {
        let body = s.strip_prefix('[').ok_or_else(unknown)?;
        let (digits, rest) = split_while(body, |b| b.is_ascii_digit());
        s = rest.strip_prefix(']').ok_or_else(unknown)?;
        let dim = if digits.is_empty() {
            0
        } else {
            digits
                .parse()
                .map_err(|_| AbiError::Parse(format!("Array dimension out of range: {}", digits)))?
        };
        dims.push(dim);
        check_depth(dims.len())?;
    }
    Ok(dims)
}

fn parse_number(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Over-long digit strings saturate so that range checks still reject them
    Some(s.parse().unwrap_or(usize::MAX))
}

fn parse_sub(base: &str, sub: &str) -> Result<Sub, AbiError> {
    let err = |msg: &str| Err(AbiError::Parse(msg.to_string()));
    match base {
        "string" => {
            if !sub.is_empty() {
                return err("String type must have no suffix or numerical suffix");
            }
            Ok(Sub::None)
        }
        "bytes" => {
            if sub.is_empty() {
                return Ok(Sub::None);
            }
            match parse_number(sub) {
                Some(n) if n <= 32 => Ok(Sub::Size(n)),
                _ => err("Maximum 32 bytes for fixed-length string or bytes"),
            }
        }
        "uint" | "int" => {
            let size = match parse_number(sub) {
                Some(size) => size,
                None => return err("Integer type must have numerical suffix"),
            };
            let sub = Sub::Size(size);
            check_sub(BaseType::Int, &sub)?;
            Ok(sub)
        }
        "ureal" | "real" | "fixed" | "ufixed" => {
            let parts = sub
                .split_once('x')
                .and_then(|(high, low)| Some((parse_number(high)?, parse_number(low)?)));
            let (high, low) = match parts {
                Some(parts) => parts,
                None => return err("Real type must have suffix of form <high>x<low>, e.g. 128x128"),
            };
            let sub = Sub::Real { high, low };
            check_sub(BaseType::Fixed, &sub)?;
            Ok(sub)
        }
        "hash" => match parse_number(sub) {
            Some(n) => Ok(Sub::Size(n)),
            None => err("Hash type must have numerical suffix"),
        },
        "address" => {
            if !sub.is_empty() {
                return err("Address cannot have suffix");
            }
            Ok(Sub::None)
        }
        "bool" => {
            if !sub.is_empty() {
                return err("Bool cannot have suffix");
            }
            Ok(Sub::None)
        }
        _ => Err(AbiError::Parse(format!("Unrecognized type base: {}", base))),
    }
}

fn check_depth(depth: usize) -> Result<(), AbiError> {
    if depth > MAX_ARRAY_DEPTH {
        return Err(AbiError::Parse(format!(
            "Too many array dimensions (max {})",
            MAX_ARRAY_DEPTH
        )));
    }
    Ok(())
}

/// Suffix rules per base type
fn check_sub(base: BaseType, sub: &Sub) -> Result<(), AbiError> {
    let err = |msg: &str| Err(AbiError::Parse(msg.to_string()));
    match (base, *sub) {
        (BaseType::Uint | BaseType::Int, Sub::Size(size)) => {
            if !(8..=256).contains(&size) {
                return err("Integer size out of bounds");
            }
            if size % 8 != 0 {
                return err("Integer size must be multiple of 8");
            }
            Ok(())
        }
        (BaseType::Uint | BaseType::Int, _) => err("Integer type must have numerical suffix"),
        (BaseType::Fixed | BaseType::Ufixed, Sub::Real { high, low }) => {
            let total = high.checked_add(low).unwrap_or(usize::MAX);
            if !(8..=256).contains(&total) {
                return err("Real size out of bounds (max 32 bytes)");
            }
            if high % 8 != 0 || low % 8 != 0 {
                return err("Real high/low sizes must be multiples of 8");
            }
            Ok(())
        }
        (BaseType::Fixed | BaseType::Ufixed, _) => {
            err("Real type must have suffix of form <high>x<low>, e.g. 128x128")
        }
        (BaseType::Bytes, Sub::None) => Ok(()),
        (BaseType::Bytes, Sub::Size(n)) if n <= 32 => Ok(()),
        (BaseType::Bytes, _) => err("Maximum 32 bytes for fixed-length string or bytes"),
        (BaseType::String, Sub::None) => Ok(()),
        (BaseType::String, _) => err("String type must have no suffix or numerical suffix"),
        (BaseType::Hash, Sub::Size(_)) => Ok(()),
        (BaseType::Hash, _) => err("Hash type must have numerical suffix"),
        (BaseType::Address, Sub::None) => Ok(()),
        (BaseType::Address, _) => err("Address cannot have suffix"),
        (BaseType::Bool, Sub::None) => Ok(()),
        (BaseType::Bool, _) => err("Bool cannot have suffix"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_err(sig: &str) -> String {
        match Type::parse(sig) {
            Err(AbiError::Parse(msg)) => msg,
            other => panic!("Expected parse error for {}, got {:?}", sig, other),
        }
    }

    #[test]
    fn test_parse_scalars() {
        let t = Type::parse("uint256").unwrap();
        assert_eq!(t.base(), BaseType::Uint);
        assert_eq!(t.sub(), Sub::Size(256));
        assert!(t.dims().is_empty());

        assert_eq!(Type::parse("address").unwrap().sub(), Sub::None);
        assert_eq!(Type::parse("bytes").unwrap().sub(), Sub::None);
        assert_eq!(Type::parse("bytes32").unwrap().sub(), Sub::Size(32));
        assert_eq!(
            Type::parse("fixed128x128").unwrap().sub(),
            Sub::Real { high: 128, low: 128 }
        );
        assert_eq!(Type::parse("hash20").unwrap().sub(), Sub::Size(20));
    }

    #[test]
    fn test_parse_dims() {
        assert_eq!(Type::parse("bytes32[3]").unwrap().dims(), &[3]);
        assert_eq!(Type::parse("address[]").unwrap().dims(), &[0]);
        assert_eq!(Type::parse("uint256[1][2][]").unwrap().dims(), &[1, 2, 0]);
    }

    #[test]
    fn test_real_aliases() {
        assert_eq!(Type::parse("real128x128").unwrap(), Type::parse("fixed128x128").unwrap());
        assert_eq!(Type::parse("ureal8x8").unwrap().base(), BaseType::Ufixed);
    }

    #[test]
    fn test_parse_rejections() {
        assert_eq!(parse_err("uint7"), "Integer size must be multiple of 8");
        assert_eq!(parse_err("uint264"), "Integer size out of bounds");
        assert_eq!(parse_err("uint0"), "Integer size out of bounds");
        assert_eq!(parse_err("uint"), "Integer type must have numerical suffix");
        assert_eq!(parse_err("int8x8"), "Integer type must have numerical suffix");
        assert_eq!(parse_err("foo"), "Unrecognized type base: foo");
        assert_eq!(parse_err(""), "Unrecognized type base: ");
        assert_eq!(parse_err("bytes33"), "Maximum 32 bytes for fixed-length string or bytes");
        assert_eq!(parse_err("string8"), "String type must have no suffix or numerical suffix");
        assert_eq!(parse_err("address20"), "Address cannot have suffix");
        assert_eq!(parse_err("bool1"), "Bool cannot have suffix");
        assert_eq!(parse_err("hash"), "Hash type must have numerical suffix");
        assert_eq!(
            parse_err("fixed128"),
            "Real type must have suffix of form <high>x<low>, e.g. 128x128"
        );
        assert_eq!(parse_err("fixed128x136"), "Real size out of bounds (max 32 bytes)");
        assert_eq!(parse_err("ufixed4x4"), "Real high/low sizes must be multiples of 8");
    }

    #[test]
    fn test_parse_bad_brackets() {
        let msg = "Unknown characters found in array declaration";
        assert_eq!(parse_err("uint256[2"), msg);
        assert_eq!(parse_err("uint256[a]"), msg);
        assert_eq!(parse_err("uint256[2]x"), msg);
        // Brackets are validated before the base name
        assert_eq!(parse_err("Uint256"), msg);
    }

    #[test]
    fn test_parse_huge_suffix_is_out_of_bounds() {
        assert_eq!(parse_err("uint99999999999999999999999"), "Integer size out of bounds");
    }

    #[test]
    fn test_array_depth_cap() {
        let deepest = format!("uint8{}", "[1]".repeat(MAX_ARRAY_DEPTH));
        let t = Type::parse(&deepest).unwrap();
        assert_eq!(t.dims().len(), MAX_ARRAY_DEPTH);
        assert_eq!(t.size(), Some(32));

        let msg = format!("Too many array dimensions (max {})", MAX_ARRAY_DEPTH);
        assert_eq!(parse_err(&format!("{}[1]", deepest)), msg);
        assert_eq!(parse_err(&format!("uint8{}", "[1]".repeat(30_000))), msg);
        assert!(Type::new(BaseType::Bool, Sub::None, vec![2; MAX_ARRAY_DEPTH + 1]).is_err());
    }

    #[test]
    fn test_size_saturates() {
        let t = Type::parse(&format!("uint256{}", "[4294967295]".repeat(4))).unwrap();
        assert_eq!(t.size(), Some(usize::MAX));
    }

    #[test]
    fn test_size() {
        assert_eq!(Type::parse("uint256").unwrap().size(), Some(32));
        assert_eq!(Type::parse("bytes").unwrap().size(), None);
        assert_eq!(Type::parse("string").unwrap().size(), None);
        assert_eq!(Type::parse("bytes32[3]").unwrap().size(), Some(96));
        assert_eq!(Type::parse("uint8[2][3]").unwrap().size(), Some(192));
        assert_eq!(Type::parse("uint8[]").unwrap().size(), None);
        assert_eq!(Type::parse("string[2]").unwrap().size(), None);
        assert_eq!(Type::parse("uint8[][2]").unwrap().size(), None);
    }

    #[test]
    fn test_subtype() {
        let t = Type::parse("uint256[2][]").unwrap();
        assert_eq!(t.outer_dim(), Some(0));
        assert_eq!(t.subtype(), Type::parse("uint256[2]").unwrap());
        assert_eq!(t.subtype().subtype(), Type::parse("uint256").unwrap());
    }

    #[test]
    fn test_display_roundtrip() {
        for sig in ["uint256", "bytes", "bytes32[3]", "fixed128x128[][2]", "address[]", "hash20"] {
            assert_eq!(Type::parse(sig).unwrap().to_string(), sig);
        }
    }

    #[test]
    fn test_new_validates() {
        assert!(Type::new(BaseType::Uint, Sub::Size(7), vec![]).is_err());
        assert!(Type::new(BaseType::Bool, Sub::Size(1), vec![]).is_err());
        assert_eq!(
            Type::new(BaseType::Uint, Sub::Size(256), vec![]).unwrap(),
            Type::size_type()
        );
    }
}
