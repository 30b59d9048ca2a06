//! Per-target pointer-authentication options.
//!
//! [`PointerAuthOptions`] is the aggregate a target-configuration layer
//! fills in once per compilation target and code-generation layers read
//! many times. It is plain data: every field is public, independently
//! settable, and no operation on the record fails. Whether a given
//! combination is actually supported by the target's hardware is the
//! configuration producer's concern, not this record's.

use crate::schema::PointerAuthSchema;
use serde::{Deserialize, Serialize};

/// Pointer-authentication configuration for one compilation target.
///
/// One schema field per recognized pointer category, plus boolean toggles
/// that are not tied to any single category. The default record has every
/// schema disabled and every toggle false, which is the complete "pointer
/// authentication off" configuration used on targets without signing
/// support.
///
/// ```
/// use ptrauth_abi::{Discrimination, HardwareKey, PointerAuthOptions, PointerAuthSchema};
///
/// let mut options = PointerAuthOptions::default();
/// assert!(!options.any_enabled());
///
/// options.vtable_pointers =
///     PointerAuthSchema::hardware(HardwareKey::DataA, true, Discrimination::None);
/// options.return_addresses = true;
/// assert!(options.any_enabled());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerAuthOptions {
    /// Plain function pointers.
    pub function_pointers: PointerAuthSchema,

    /// Block invocation function pointers.
    pub block_invocation_function_pointers: PointerAuthSchema,

    /// Block object copy/destroy helper function pointers.
    pub block_helper_function_pointers: PointerAuthSchema,

    /// `__block` variable copy/destroy helper function pointers.
    pub block_byref_helper_function_pointers: PointerAuthSchema,

    /// Objective-C method-list function pointers.
    pub objc_method_list_function_pointers: PointerAuthSchema,

    /// Virtual-table pointers as stored in an object instance.
    pub vtable_pointers: PointerAuthSchema,

    /// Virtual-table pointers as stored in a construction-time table (VTT).
    pub vtt_vtable_pointers: PointerAuthSchema,

    /// Ordinary virtual-function-pointer table entries.
    pub virtual_function_pointers: PointerAuthSchema,

    /// Variadic virtual-function-pointer table entries.
    pub virtual_variadic_function_pointers: PointerAuthSchema,

    /// Member-function pointers.
    pub member_function_pointers: PointerAuthSchema,

    /// Whether member pointers to virtual functions are built as thunks.
    pub thunk_virtual_member_pointers: bool,

    /// Whether function return addresses are authenticated.
    pub return_addresses: bool,

    /// Whether indirect-goto targets are authenticated.
    pub indirect_gotos: bool,

    /// Whether an authentication failure traps instead of yielding an
    /// invalid pointer.
    pub auth_traps: bool,
}

impl PointerAuthOptions {
    /// The schema fields with their stable diagnostic names, in declaration
    /// order.
    ///
    /// Lets a consumer iterate every pointer category without naming each
    /// field; the names match the serialized field names.
    #[must_use]
    pub const fn schemas(&self) -> [(&'static str, PointerAuthSchema); 10] {
        [
            ("function_pointers", self.function_pointers),
            (
                "block_invocation_function_pointers",
                self.block_invocation_function_pointers,
            ),
            (
                "block_helper_function_pointers",
                self.block_helper_function_pointers,
            ),
            (
                "block_byref_helper_function_pointers",
                self.block_byref_helper_function_pointers,
            ),
            (
                "objc_method_list_function_pointers",
                self.objc_method_list_function_pointers,
            ),
            ("vtable_pointers", self.vtable_pointers),
            ("vtt_vtable_pointers", self.vtt_vtable_pointers),
            ("virtual_function_pointers", self.virtual_function_pointers),
            (
                "virtual_variadic_function_pointers",
                self.virtual_variadic_function_pointers,
            ),
            ("member_function_pointers", self.member_function_pointers),
        ]
    }

    /// True if any pointer category or address-class toggle is
    /// authenticated.
    #[must_use]
    pub fn any_enabled(&self) -> bool {
        self.schemas().iter().any(|(_, schema)| schema.is_enabled())
            || self.return_addresses
            || self.indirect_gotos
    }
}
