//! End-to-end contract checks for schemas and options records, exercised
//! the way a target-configuration producer and a code-generation consumer
//! would use them.

use proptest::prelude::*;
use ptrauth_abi::{
    AuthKind, Discrimination, HardwareKey, PointerAuthOptions, PointerAuthSchema, SchemaKey,
    SoftwareKey,
};

/// A hardware-signing configuration in the shape a driver would build for
/// a target with ARMv8.3 instructions.
fn hardware_target() -> PointerAuthOptions {
    let mut options = PointerAuthOptions::default();
    options.function_pointers =
        PointerAuthSchema::hardware(HardwareKey::InstructionA, false, Discrimination::Type);
    options.block_invocation_function_pointers =
        PointerAuthSchema::hardware(HardwareKey::InstructionA, true, Discrimination::None);
    options.vtable_pointers =
        PointerAuthSchema::hardware(HardwareKey::DataA, true, Discrimination::None);
    options.vtt_vtable_pointers =
        PointerAuthSchema::hardware(HardwareKey::DataA, true, Discrimination::None);
    options.virtual_function_pointers =
        PointerAuthSchema::hardware(HardwareKey::InstructionA, true, Discrimination::Decl);
    options.virtual_variadic_function_pointers =
        PointerAuthSchema::hardware(HardwareKey::InstructionA, true, Discrimination::Decl);
    options.member_function_pointers =
        PointerAuthSchema::hardware(HardwareKey::InstructionA, false, Discrimination::Type);
    options.thunk_virtual_member_pointers = true;
    options.return_addresses = true;
    options.auth_traps = true;
    options
}

#[test]
fn consumer_reads_what_the_producer_wrote() {
    let options = hardware_target();

    // A vtable-pointer store site: data key A, address-bound, no extra
    // discriminator.
    let schema = options.vtable_pointers;
    assert!(schema.is_enabled());
    assert_eq!(schema.kind(), AuthKind::HardwareV83);
    assert_eq!(schema.hardware_key(), HardwareKey::DataA);
    assert!(schema.is_address_discriminated());
    assert!(!schema.has_extra_discrimination());

    // A virtual call site: instruction key A with a declaration hash.
    let schema = options.virtual_function_pointers;
    assert_eq!(schema.discrimination(), Discrimination::Decl);

    // Categories the producer left alone stay off.
    assert!(!options.objc_method_list_function_pointers.is_enabled());
    assert!(!options.indirect_gotos);
}

#[test]
fn key_numbers_pass_through_unchanged() {
    // The instruction-encoding layer receives raw key numbers; they must
    // be exactly the hardware convention's values.
    let expected: [(HardwareKey, u8); 4] = [
        (HardwareKey::InstructionA, 0),
        (HardwareKey::InstructionB, 1),
        (HardwareKey::DataA, 2),
        (HardwareKey::DataB, 3),
    ];
    for (key, number) in expected {
        let schema = PointerAuthSchema::hardware(key, true, Discrimination::Type);
        assert_eq!(schema.key().value(), number);
    }
}

#[test]
fn disabled_target_is_a_complete_configuration() {
    let options = PointerAuthOptions::default();
    assert!(!options.any_enabled());
    for (_, schema) in options.schemas() {
        assert_eq!(schema.kind(), AuthKind::None);
        assert!(!bool::from(schema));
    }
}

#[test]
fn record_roundtrips_through_serialization() {
    let options = hardware_target();
    let json = serde_json::to_string_pretty(&options).expect("serialize");
    let parsed: PointerAuthOptions = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(options, parsed);
    assert_eq!(parsed.vtable_pointers.hardware_key(), HardwareKey::DataA);
}

proptest! {
    #[test]
    fn software_schemas_report_constructor_arguments(
        key_index in 0usize..SoftwareKey::ALL.len(),
        address_discriminated in any::<bool>(),
        discrimination_index in 0usize..Discrimination::ALL.len(),
    ) {
        let key = SoftwareKey::ALL[key_index];
        let discrimination = Discrimination::ALL[discrimination_index];
        let schema = PointerAuthSchema::software(key, address_discriminated, discrimination);

        prop_assert!(schema.is_enabled());
        prop_assert_eq!(schema.kind(), AuthKind::Software);
        prop_assert_eq!(schema.is_address_discriminated(), address_discriminated);
        prop_assert_eq!(schema.discrimination(), discrimination);
        prop_assert_eq!(schema.software_key(), key);
        prop_assert_eq!(schema.key(), SchemaKey::Software(key));
    }

    #[test]
    fn hardware_schemas_report_constructor_arguments(
        key_index in 0usize..HardwareKey::ALL.len(),
        address_discriminated in any::<bool>(),
        discrimination_index in 0usize..Discrimination::ALL.len(),
    ) {
        let key = HardwareKey::ALL[key_index];
        let discrimination = Discrimination::ALL[discrimination_index];
        let schema = PointerAuthSchema::hardware(key, address_discriminated, discrimination);

        prop_assert!(schema.is_enabled());
        prop_assert_eq!(schema.kind(), AuthKind::HardwareV83);
        prop_assert_eq!(schema.is_address_discriminated(), address_discriminated);
        prop_assert_eq!(schema.discrimination(), discrimination);
        prop_assert_eq!(schema.hardware_key(), key);
        prop_assert_eq!(schema.key().value(), key.value());
    }

    #[test]
    fn equal_arguments_build_equal_schemas(
        key_index in 0usize..HardwareKey::ALL.len(),
        address_discriminated in any::<bool>(),
        discrimination_index in 0usize..Discrimination::ALL.len(),
    ) {
        let key = HardwareKey::ALL[key_index];
        let discrimination = Discrimination::ALL[discrimination_index];
        let a = PointerAuthSchema::hardware(key, address_discriminated, discrimination);
        let b = PointerAuthSchema::hardware(key, address_discriminated, discrimination);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn schema_serde_roundtrip_preserves_equality(
        key_index in 0usize..HardwareKey::ALL.len(),
        address_discriminated in any::<bool>(),
        discrimination_index in 0usize..Discrimination::ALL.len(),
    ) {
        let schema = PointerAuthSchema::hardware(
            HardwareKey::ALL[key_index],
            address_discriminated,
            Discrimination::ALL[discrimination_index],
        );
        let json = serde_json::to_string(&schema).expect("serialize");
        let parsed: PointerAuthSchema = serde_json::from_str(&json).expect("deserialize");
        prop_assert_eq!(schema, parsed);
    }
}
