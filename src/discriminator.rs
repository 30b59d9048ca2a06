//! ABI-stable hashing for signature discriminators.
//!
//! The `Type` and `Decl` discrimination modes mix a hash of a mangled type
//! or of a declaration's identity into the signature. Those hashes are part
//! of the binary interface: every producer and consumer of a signed pointer
//! must derive the same value for the same string, across releases and host
//! platforms. The standard library's hashers make no such guarantee, so the
//! algorithm is pinned here: SipHash-2-4 under a fixed key, with a fold
//! onto the non-zero 16-bit range for the discriminator operand.

/// Fixed key halves for [`stable_hash`], the little-endian interpretation
/// of the published 16-byte key. Changing them is an ABI break.
const STABLE_KEY_0: u64 = 0x794a_1079_ebc9_d4b5;
const STABLE_KEY_1: u64 = 0x5881_8742_1b8b_ec6f;

/// Computes the stable 64-bit hash of `data`.
///
/// The result is identical on every platform and in every release; signed
/// binaries embed values derived from it.
#[must_use]
pub fn stable_hash(data: &[u8]) -> u64 {
    siphash_2_4(STABLE_KEY_0, STABLE_KEY_1, data)
}

/// Derives the 16-bit extra-discriminator for a string.
///
/// The 64-bit stable hash is folded onto `1..=0xFFFF`. Zero is never
/// produced: a zero discriminator operand means "no extra discrimination",
/// and a string must never alias that.
#[must_use]
pub fn string_discriminator(string: &str) -> u16 {
    let hash = stable_hash(string.as_bytes());
    // Fold onto [1, 0xFFFF]; the modulus is 0xFFFF, not 0x10000, so the +1
    // cannot wrap.
    (hash % 0xFFFF) as u16 + 1
}

/// One SipHash mixing round over the four-word state.
fn sip_round(v: &mut [u64; 4]) {
    v[0] = v[0].wrapping_add(v[1]);
    v[1] = v[1].rotate_left(13);
    v[1] ^= v[0];
    v[0] = v[0].rotate_left(32);
    v[2] = v[2].wrapping_add(v[3]);
    v[3] = v[3].rotate_left(16);
    v[3] ^= v[2];
    v[0] = v[0].wrapping_add(v[3]);
    v[3] = v[3].rotate_left(21);
    v[3] ^= v[0];
    v[2] = v[2].wrapping_add(v[1]);
    v[1] = v[1].rotate_left(17);
    v[1] ^= v[2];
    v[2] = v[2].rotate_left(32);
}

/// SipHash-2-4 with an explicit key: 2 compression rounds per word, 4
/// finalization rounds, 64-bit result.
fn siphash_2_4(k0: u64, k1: u64, data: &[u8]) -> u64 {
    let mut v = [
        0x736f_6d65_7073_6575 ^ k0,
        0x646f_7261_6e64_6f6d ^ k1,
        0x6c79_6765_6e65_7261 ^ k0,
        0x7465_6462_7974_6573 ^ k1,
    ];

    fn compress(v: &mut [u64; 4], word: u64) {
        v[3] ^= word;
        sip_round(v);
        sip_round(v);
        v[0] ^= word;
    }

    let mut chunks = data.chunks_exact(8);
    let mut word = [0u8; 8];
    for chunk in chunks.by_ref() {
        word.copy_from_slice(chunk);
        compress(&mut v, u64::from_le_bytes(word));
    }

    // Final word: remaining bytes in the low positions, total length modulo
    // 256 in the top byte.
    let tail = chunks.remainder();
    let mut last = [0u8; 8];
    last[..tail.len()].copy_from_slice(tail);
    last[7] = data.len() as u8;
    compress(&mut v, u64::from_le_bytes(last));

    v[2] ^= 0xff;
    sip_round(&mut v);
    sip_round(&mut v);
    sip_round(&mut v);
    sip_round(&mut v);

    v[0] ^ v[1] ^ v[2] ^ v[3]
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Key from the SipHash reference test vectors: bytes 00..0f.
    const REF_KEY_0: u64 = 0x0706_0504_0302_0100;
    const REF_KEY_1: u64 = 0x0f0e_0d0c_0b0a_0908;

    #[test]
    fn reference_vector_empty() {
        assert_eq!(siphash_2_4(REF_KEY_0, REF_KEY_1, b""), 0x726f_db47_dd0e_0e31);
    }

    #[test]
    fn reference_vector_one_byte() {
        assert_eq!(
            siphash_2_4(REF_KEY_0, REF_KEY_1, &[0x00]),
            0x74f8_39c5_93dc_67fd
        );
    }

    #[test]
    fn reference_vector_fifteen_bytes() {
        let input: Vec<u8> = (0x00..=0x0e).collect();
        assert_eq!(
            siphash_2_4(REF_KEY_0, REF_KEY_1, &input),
            0xa129_ca61_49be_45e5
        );
    }

    #[test]
    fn stable_hash_is_deterministic() {
        let a = stable_hash(b"_ZTIFvvE");
        let b = stable_hash(b"_ZTIFvvE");
        assert_eq!(a, b);
    }

    #[test]
    fn stable_hash_separates_inputs() {
        assert_ne!(stable_hash(b"_ZTIFvvE"), stable_hash(b"_ZTIFivE"));
        assert_ne!(stable_hash(b""), stable_hash(b"\0"));
    }

    #[test]
    fn stable_hash_depends_on_length_not_just_content() {
        // Same prefix, trailing zero bytes must still change the hash.
        assert_ne!(stable_hash(b"abc"), stable_hash(b"abc\0"));
    }

    #[test]
    fn string_discriminator_never_zero() {
        let inputs = [
            "",
            "isa",
            "_ZTIFvvE",
            "objc_msgSend",
            "_ZN9completely4longE::mangled::name::with::many::segments",
        ];
        for input in inputs {
            let d = string_discriminator(input);
            assert_ne!(d, 0, "discriminator of {input:?} is zero");
        }
    }

    #[test]
    fn string_discriminator_is_deterministic() {
        assert_eq!(string_discriminator("isa"), string_discriminator("isa"));
    }

    #[test]
    fn string_discriminator_separates_typical_manglings() {
        assert_ne!(
            string_discriminator("_ZTIFvvE"),
            string_discriminator("_ZTIFivE")
        );
    }
}
