//! ABI related helper functions.

use alloy_dyn_abi::{DynSolType, DynSolValue};

/// Errors produced while coercing and encoding constructor argument values.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// The number of supplied values does not match the number of types.
    #[error("expected {expected} constructor argument(s), got {got}")]
    ArityMismatch { expected: usize, got: usize },

    /// A type string could not be parsed as an ABI type.
    #[error("invalid ABI type `{ty}`: {source}")]
    InvalidType {
        ty: String,
        #[source]
        source: alloy_dyn_abi::Error,
    },

    /// A supplied value could not be coerced into its declared type.
    #[error("invalid value for argument {index} of type `{ty}`: {source}")]
    Coercion {
        index: usize,
        ty: String,
        #[source]
        source: alloy_dyn_abi::Error,
    },
}

/// ABI encodes constructor argument values against an ordered type list.
///
/// Values are coerced positionally and encoded with standard head/tail
/// packing, exactly as they would be appended to deployment bytecode. No
/// function selector is prefixed. The type and value lists must have equal
/// length; a mismatch is an error, never a truncation.
pub fn encode_constructor_args<T, V>(types: &[T], values: &[V]) -> Result<Vec<u8>, EncodeError>
where
    T: AsRef<str>,
    V: AsRef<str>,
{
    if types.len() != values.len() {
        return Err(EncodeError::ArityMismatch { expected: types.len(), got: values.len() });
    }

    let mut tokens = Vec::with_capacity(types.len());
    for (index, (ty, value)) in std::iter::zip(types, values).enumerate() {
        let ty = ty.as_ref();
        let parsed = DynSolType::parse(ty)
            .map_err(|source| EncodeError::InvalidType { ty: ty.to_string(), source })?;
        let token = parsed.coerce_str(value.as_ref()).map_err(|source| EncodeError::Coercion {
            index,
            ty: ty.to_string(),
            source,
        })?;
        tokens.push(token);
    }

    Ok(DynSolValue::Tuple(tokens).abi_encode_params())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::hex;

    #[test]
    fn encodes_static_args() {
        let types = ["uint256", "address"];
        let values = ["42", "0x1111111111111111111111111111111111111111"];
        let encoded = encode_constructor_args(&types, &values).unwrap();

        let expected = hex::decode(
            "000000000000000000000000000000000000000000000000000000000000002a\
             0000000000000000000000001111111111111111111111111111111111111111",
        )
        .unwrap();
        assert_eq!(encoded, expected);
    }

    #[test]
    fn encoding_is_deterministic() {
        let types = ["uint256[]", "bool"];
        let values = ["[1,2,3]", "true"];
        let a = encode_constructor_args(&types, &values).unwrap();
        let b = encode_constructor_args(&types, &values).unwrap();
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn encodes_fixed_array() {
        let encoded = encode_constructor_args(&["uint8[2]"], &["[7,9]"]).unwrap();
        // two statically encoded elements
        assert_eq!(encoded.len(), 64);
        assert_eq!(encoded[31], 7);
        assert_eq!(encoded[63], 9);
    }

    #[test]
    fn arity_mismatch_fails() {
        let err = encode_constructor_args(&["uint256", "bool"], &["1"]).unwrap_err();
        assert!(matches!(err, EncodeError::ArityMismatch { expected: 2, got: 1 }));

        let err = encode_constructor_args::<&str, _>(&[], &["1"]).unwrap_err();
        assert!(matches!(err, EncodeError::ArityMismatch { expected: 0, got: 1 }));
    }

    #[test]
    fn coercion_failure_carries_index() {
        let types = ["uint256", "uint256"];
        let values = ["1", "not-a-number"];
        let err = encode_constructor_args(&types, &values).unwrap_err();
        match err {
            EncodeError::Coercion { index, ty, .. } => {
                assert_eq!(index, 1);
                assert_eq!(ty, "uint256");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_type_fails() {
        let err = encode_constructor_args(&["uint257"], &["1"]).unwrap_err();
        assert!(matches!(err, EncodeError::InvalidType { .. }));
    }

    #[test]
    fn encodes_address_argument() {
        let encoded = encode_constructor_args(
            &["address"],
            &["0x2222222222222222222222222222222222222222"],
        )
        .unwrap();
        assert_eq!(encoded.len(), 32);
        assert_eq!(&encoded[12..], [0x22; 20]);
    }
}
