//! Pointer-authentication signing schemas.
//!
//! A [`PointerAuthSchema`] describes how one category of pointer is signed
//! before storage and verified before use: which signing technology, which
//! key slot inside that technology's key space, whether the pointer's own
//! storage address is mixed into the signature, and which form of extra
//! discrimination applies.
//!
//! Schemas are small `Copy` values, immutable after construction. A
//! default-constructed schema is disabled; disabled schemas carry no other
//! state, so structural equality is exactly schema equality.
//!
//! # Key Numbering
//!
//! [`HardwareKey`] discriminants mirror the hardware signing convention's
//! key numbering (0 through 3). External tooling consumes these integers
//! verbatim, so they must never be renumbered. [`SoftwareKey`] discriminants
//! are stable for serialization but carry no external meaning.

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Signing technology applied to one pointer category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthKind {
    /// No authentication: the pointer is stored and loaded raw.
    None,
    /// A software-implemented signing scheme with its own key space.
    Software,
    /// Hardware signing instructions as introduced in ARMv8.3.
    HardwareV83,
}

impl AuthKind {
    /// Stable name used in diagnostics and serialized forms.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Software => "software",
            Self::HardwareV83 => "hardware_v83",
        }
    }
}

impl fmt::Display for AuthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key slots of a software signing scheme.
///
/// Each slot cryptographically separates the signatures of one pointer
/// category from the others within the software key space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SoftwareKey {
    /// Plain function pointers.
    FunctionPointers = 0,
    /// Block invocation function pointers.
    BlockInvocationFunctionPointers = 1,
    /// Block copy/destroy helper function pointers.
    BlockHelperFunctionPointers = 2,
    /// Objective-C method-list function pointers.
    ObjcMethodListFunctionPointers = 3,
    /// Virtual-table pointers.
    VTablePointers = 4,
    /// Virtual-function pointers (v-table entries).
    VirtualFunctionPointers = 5,
    /// Member-function pointers.
    MemberFunctionPointers = 6,
}

impl SoftwareKey {
    /// Every software key slot, in numbering order.
    pub const ALL: [Self; 7] = [
        Self::FunctionPointers,
        Self::BlockInvocationFunctionPointers,
        Self::BlockHelperFunctionPointers,
        Self::ObjcMethodListFunctionPointers,
        Self::VTablePointers,
        Self::VirtualFunctionPointers,
        Self::MemberFunctionPointers,
    ];

    /// Numeric slot value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Stable name used in diagnostics and serialized forms.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FunctionPointers => "function_pointers",
            Self::BlockInvocationFunctionPointers => "block_invocation_function_pointers",
            Self::BlockHelperFunctionPointers => "block_helper_function_pointers",
            Self::ObjcMethodListFunctionPointers => "objc_method_list_function_pointers",
            Self::VTablePointers => "vtable_pointers",
            Self::VirtualFunctionPointers => "virtual_function_pointers",
            Self::MemberFunctionPointers => "member_function_pointers",
        }
    }
}

impl fmt::Display for SoftwareKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoftwareKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "function_pointers" => Ok(Self::FunctionPointers),
            "block_invocation_function_pointers" => Ok(Self::BlockInvocationFunctionPointers),
            "block_helper_function_pointers" => Ok(Self::BlockHelperFunctionPointers),
            "objc_method_list_function_pointers" => Ok(Self::ObjcMethodListFunctionPointers),
            "vtable_pointers" => Ok(Self::VTablePointers),
            "virtual_function_pointers" => Ok(Self::VirtualFunctionPointers),
            "member_function_pointers" => Ok(Self::MemberFunctionPointers),
            _ => Err(ParseKeyError {
                space: "software",
                input: s.into(),
            }),
        }
    }
}

/// Key slots of the ARMv8.3 hardware signing instructions.
///
/// The discriminants are the key numbers the hardware convention assigns:
/// two instruction keys, two data keys. Instruction encoding layers consume
/// these integers unchanged, so the numbering is frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum HardwareKey {
    /// Instruction key A (`IA`).
    InstructionA = 0,
    /// Instruction key B (`IB`).
    InstructionB = 1,
    /// Data key A (`DA`).
    DataA = 2,
    /// Data key B (`DB`).
    DataB = 3,
}

impl HardwareKey {
    /// Every hardware key slot, in numbering order.
    pub const ALL: [Self; 4] = [
        Self::InstructionA,
        Self::InstructionB,
        Self::DataA,
        Self::DataB,
    ];

    /// Numeric key value as fixed by the hardware convention.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Stable name used in diagnostics and serialized forms.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InstructionA => "ia",
            Self::InstructionB => "ib",
            Self::DataA => "da",
            Self::DataB => "db",
        }
    }
}

impl fmt::Display for HardwareKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HardwareKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accepts both the short names and the `asia`-style spellings used
        // by the hardware intrinsics header.
        match s {
            "ia" | "asia" => Ok(Self::InstructionA),
            "ib" | "asib" => Ok(Self::InstructionB),
            "da" | "asda" => Ok(Self::DataA),
            "db" | "asdb" => Ok(Self::DataB),
            _ => Err(ParseKeyError {
                space: "hardware",
                input: s.into(),
            }),
        }
    }
}

/// Extra discrimination mixed into a signature beyond the raw pointer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discrimination {
    /// The signature covers only the pointer value (and the storage address
    /// when address discrimination is on).
    None,
    /// A hash of the pointee's static type is mixed in.
    Type,
    /// A hash of the declaring entity's identity is mixed in.
    Decl,
}

impl Discrimination {
    /// Every discrimination mode.
    pub const ALL: [Self; 3] = [Self::None, Self::Type, Self::Decl];

    /// Stable name used in diagnostics and serialized forms.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Type => "type",
            Self::Decl => "decl",
        }
    }
}

impl fmt::Display for Discrimination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key slot tagged with the signing technology that owns it.
///
/// The software and hardware key spaces use disjoint, incompatible
/// numberings. Returning the slot pre-tagged keeps a consumer from
/// interpreting a number against the wrong space; [`SchemaKey::value`]
/// recovers the raw integer for the instruction-encoding layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "space", content = "slot", rename_all = "snake_case")]
pub enum SchemaKey {
    /// A slot in the software scheme's key space.
    Software(SoftwareKey),
    /// A slot in the hardware key space.
    Hardware(HardwareKey),
}

impl SchemaKey {
    /// The signing technology this key belongs to.
    #[must_use]
    pub const fn kind(self) -> AuthKind {
        match self {
            Self::Software(_) => AuthKind::Software,
            Self::Hardware(_) => AuthKind::HardwareV83,
        }
    }

    /// Numeric slot value within the owning key space.
    ///
    /// For hardware keys this is the externally fixed key number and is
    /// passed through to instruction encoding unchanged.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Software(key) => key.value(),
            Self::Hardware(key) => key.value(),
        }
    }
}

impl fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Software(key) => write!(f, "software:{key}"),
            Self::Hardware(key) => write!(f, "hardware:{key}"),
        }
    }
}

impl From<SoftwareKey> for SchemaKey {
    fn from(key: SoftwareKey) -> Self {
        Self::Software(key)
    }
}

impl From<HardwareKey> for SchemaKey {
    fn from(key: HardwareKey) -> Self {
        Self::Hardware(key)
    }
}

/// Error returned when a key-slot name does not match any known slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {space} key slot `{input}`")]
pub struct ParseKeyError {
    /// Key space the lookup was performed against.
    pub space: &'static str,
    /// The rejected input.
    pub input: String,
}

/// How one pointer category is authenticated.
///
/// A schema is either disabled or carries a key slot plus two signature
/// inputs: whether the storage address is mixed in, and which extra
/// discrimination mode applies. Schemas feed binary-compatibility
/// decisions, so equality is exact: two schemas are equal iff they were
/// built from the same constructor arguments.
///
/// The accessors that only make sense on an enabled schema treat a call on
/// a disabled schema as a bug in the caller and panic immediately rather
/// than inventing a value; a silently wrong answer here would corrupt ABI
/// decisions downstream. Callers that cannot guarantee the schema is
/// enabled check [`is_enabled`](Self::is_enabled) first or match on
/// [`key`](Self::key)'s result.
///
/// ```
/// use ptrauth_abi::{Discrimination, HardwareKey, PointerAuthSchema};
///
/// let schema = PointerAuthSchema::hardware(HardwareKey::DataA, true, Discrimination::Type);
/// assert!(schema.is_enabled());
/// assert!(schema.is_address_discriminated());
/// assert_eq!(schema.key().value(), 2);
///
/// let off = PointerAuthSchema::disabled();
/// assert!(!off.is_enabled());
/// assert_eq!(off, PointerAuthSchema::default());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointerAuthSchema {
    repr: SchemaRepr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum SchemaRepr {
    #[default]
    Disabled,
    Enabled {
        key: SchemaKey,
        address_discriminated: bool,
        discrimination: Discrimination,
    },
}

impl PointerAuthSchema {
    /// The disabled schema: no signing, no verification.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            repr: SchemaRepr::Disabled,
        }
    }

    /// A schema signed with the given pre-tagged key slot.
    #[must_use]
    pub const fn enabled(
        key: SchemaKey,
        address_discriminated: bool,
        discrimination: Discrimination,
    ) -> Self {
        Self {
            repr: SchemaRepr::Enabled {
                key,
                address_discriminated,
                discrimination,
            },
        }
    }

    /// A schema signed by the software scheme with the given slot.
    #[must_use]
    pub const fn software(
        key: SoftwareKey,
        address_discriminated: bool,
        discrimination: Discrimination,
    ) -> Self {
        Self::enabled(
            SchemaKey::Software(key),
            address_discriminated,
            discrimination,
        )
    }

    /// A schema signed by the hardware instructions with the given slot.
    #[must_use]
    pub const fn hardware(
        key: HardwareKey,
        address_discriminated: bool,
        discrimination: Discrimination,
    ) -> Self {
        Self::enabled(
            SchemaKey::Hardware(key),
            address_discriminated,
            discrimination,
        )
    }

    /// The signing technology. Valid on every schema.
    #[must_use]
    pub const fn kind(&self) -> AuthKind {
        match self.repr {
            SchemaRepr::Disabled => AuthKind::None,
            SchemaRepr::Enabled { key, .. } => key.kind(),
        }
    }

    /// Whether this pointer category is authenticated at all.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !matches!(self.repr, SchemaRepr::Disabled)
    }

    /// Whether the signature incorporates the pointer's storage address.
    ///
    /// # Panics
    ///
    /// Panics if the schema is disabled.
    #[must_use]
    pub const fn is_address_discriminated(&self) -> bool {
        match self.repr {
            SchemaRepr::Enabled {
                address_discriminated,
                ..
            } => address_discriminated,
            SchemaRepr::Disabled => {
                panic!("address discrimination queried on a disabled schema")
            }
        }
    }

    /// The extra-discrimination mode.
    ///
    /// # Panics
    ///
    /// Panics if the schema is disabled.
    #[must_use]
    pub const fn discrimination(&self) -> Discrimination {
        match self.repr {
            SchemaRepr::Enabled { discrimination, .. } => discrimination,
            SchemaRepr::Disabled => panic!("discrimination queried on a disabled schema"),
        }
    }

    /// Whether any extra discrimination is mixed into the signature.
    ///
    /// # Panics
    ///
    /// Panics if the schema is disabled.
    #[must_use]
    pub const fn has_extra_discrimination(&self) -> bool {
        !matches!(self.discrimination(), Discrimination::None)
    }

    /// The key slot, tagged with its owning technology.
    ///
    /// # Panics
    ///
    /// Panics if the schema is disabled.
    #[must_use]
    pub const fn key(&self) -> SchemaKey {
        match self.repr {
            SchemaRepr::Enabled { key, .. } => key,
            SchemaRepr::Disabled => panic!("key queried on a disabled schema"),
        }
    }

    /// The software key slot.
    ///
    /// # Panics
    ///
    /// Panics if the schema is disabled or signed by the hardware keys.
    #[must_use]
    pub const fn software_key(&self) -> SoftwareKey {
        match self.key() {
            SchemaKey::Software(key) => key,
            SchemaKey::Hardware(_) => panic!("software key queried on a hardware schema"),
        }
    }

    /// The hardware key slot.
    ///
    /// # Panics
    ///
    /// Panics if the schema is disabled or signed by the software scheme.
    #[must_use]
    pub const fn hardware_key(&self) -> HardwareKey {
        match self.key() {
            SchemaKey::Hardware(key) => key,
            SchemaKey::Software(_) => panic!("hardware key queried on a software schema"),
        }
    }
}

impl From<PointerAuthSchema> for bool {
    /// Boolean form of [`PointerAuthSchema::is_enabled`].
    fn from(schema: PointerAuthSchema) -> Self {
        schema.is_enabled()
    }
}

impl fmt::Display for PointerAuthSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repr {
            SchemaRepr::Disabled => f.write_str("disabled"),
            SchemaRepr::Enabled {
                key,
                address_discriminated,
                discrimination,
            } => {
                write!(f, "{key}")?;
                if address_discriminated {
                    f.write_str("+addr")?;
                }
                if !matches!(discrimination, Discrimination::None) {
                    write!(f, "+{discrimination}")?;
                }
                Ok(())
            }
        }
    }
}
