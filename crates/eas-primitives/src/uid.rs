//! Content-derived identifiers for schemas and attestations.

use alloy::primitives::{keccak256, Address, B256};
use alloy::sol_types::SolValue;

use crate::abi::eas::Attestation;

/// keccak256(abi.encodePacked(schema, resolver, revocable))
pub fn schema_uid(schema: &str, resolver: Address, revocable: bool) -> B256 {
    keccak256((schema.to_string(), resolver, revocable).abi_encode_packed())
}

/// keccak256(abi.encodePacked(schema, recipient, attester, time, expirationTime,
/// revocable, refUID, data, bump))
///
/// The `uid` and `revocationTime` fields of `attestation` are ignored.
pub fn attestation_uid(attestation: &Attestation, bump: u32) -> B256 {
    let packed = (
        attestation.schema,
        attestation.recipient,
        attestation.attester,
        attestation.time,
        attestation.expirationTime,
        attestation.revocable,
        attestation.refUID,
        attestation.data.clone(),
        bump,
    )
        .abi_encode_packed();
    keccak256(packed)
}

/// Find the first UID for `attestation` not yet taken, trying bump = 0, 1, 2, ...
///
/// `is_taken` is a lookup against the attestation table.
pub fn unique_attestation_uid<E>(
    attestation: &Attestation,
    mut is_taken: impl FnMut(&B256) -> Result<bool, E>,
) -> Result<B256, E> {
    let mut bump: u32 = 0;
    loop {
        let uid = attestation_uid(attestation, bump);
        if !is_taken(&uid)? {
            return Ok(uid);
        }
        bump = bump.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, b256, hex, Bytes};

    #[test]
    fn schema_uid_matches_packed_encoding() {
        let resolver = address!("1111111111111111111111111111111111111111");
        let mut packed = b"bool like".to_vec();
        packed.extend_from_slice(resolver.as_slice());
        packed.push(1);
        assert_eq!(schema_uid("bool like", resolver, true), keccak256(packed));
    }

    #[test]
    fn attestation_uid_matches_packed_layout() {
        let attestation = Attestation {
            schema: B256::repeat_byte(0xaa),
            recipient: address!("0000000000000000000000000000000000000b0b"),
            attester: address!("000000000000000000000000000000000000a11c"),
            time: 0x0102,
            expirationTime: 0x0304,
            revocable: true,
            refUID: B256::repeat_byte(0xcc),
            data: Bytes::from_static(b"\xde\xad"),
            ..Default::default()
        };
        let parts: [&[u8]; 9] = [
            attestation.schema.as_slice(),
            attestation.recipient.as_slice(),
            attestation.attester.as_slice(),
            &hex!("0000000000000102"),
            &hex!("0000000000000304"),
            &[1],
            attestation.refUID.as_slice(),
            &hex!("dead"),
            &hex!("00000007"),
        ];
        assert_eq!(attestation_uid(&attestation, 7), keccak256(parts.concat()));
    }

    #[test]
    fn schema_uid_depends_on_every_field() {
        let base = schema_uid("bool like", Address::ZERO, true);
        assert_ne!(base, schema_uid("bool like", Address::ZERO, false));
        assert_ne!(base, schema_uid("bool liked", Address::ZERO, true));
        assert_ne!(
            base,
            schema_uid(
                "bool like",
                address!("0000000000000000000000000000000000000001"),
                true
            )
        );
    }

    #[test]
    fn bump_changes_attestation_uid() {
        let attestation = Attestation {
            schema: b256!("00000000000000000000000000000000000000000000000000000000000000aa"),
            time: 1_700_000_000,
            data: Bytes::from_static(b"\x01"),
            ..Default::default()
        };
        assert_ne!(attestation_uid(&attestation, 0), attestation_uid(&attestation, 1));
    }

    #[test]
    fn unique_uid_skips_taken_values() {
        let attestation = Attestation::default();
        let taken = [attestation_uid(&attestation, 0), attestation_uid(&attestation, 1)];
        let uid = unique_attestation_uid::<()>(&attestation, |uid| Ok(taken.contains(uid)))
            .unwrap();
        assert_eq!(uid, attestation_uid(&attestation, 2));
    }
}
