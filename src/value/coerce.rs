//! Text to [`Value`] coercion for SET.
//!
//! The target kind comes from the object's current value, never from the
//! input text: `"1"` becomes `Integer32(1)` for an `Integer32` object and
//! `OctetString("1")` for an `OctetString` object.

use super::{Value, ValueKind};
use crate::error::{CoercionErrorKind, Error, Result};
use bytes::Bytes;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Build a value of `kind` from `input`.
///
/// Numeric kinds trim surrounding whitespace before parsing. `OctetString`
/// takes the input bytes as given. Kinds outside [`ValueKind::COERCIBLE`]
/// fail with [`CoercionErrorKind::UnsupportedType`].
///
/// ```
/// use snmpy::value::coerce;
/// use snmpy::{Value, ValueKind};
///
/// assert_eq!(coerce(ValueKind::Integer32, "1").unwrap(), Value::Integer32(1));
/// assert_eq!(
///     coerce(ValueKind::IpAddress, "10.0.0.1").unwrap(),
///     Value::IpAddress([10, 0, 0, 1])
/// );
/// assert!(coerce(ValueKind::Gauge32, "-1").is_err());
/// ```
pub fn coerce(kind: ValueKind, input: &str) -> Result<Value> {
    let value = match kind {
        ValueKind::Integer => Value::Integer(parse(kind, input)?),
        ValueKind::Integer32 => Value::Integer32(parse(kind, input)?),
        ValueKind::Unsigned32 => Value::Unsigned32(parse(kind, input)?),
        ValueKind::Counter32 => Value::Counter32(parse(kind, input)?),
        ValueKind::Counter64 => Value::Counter64(parse(kind, input)?),
        ValueKind::Gauge32 => Value::Gauge32(parse(kind, input)?),
        ValueKind::TimeTicks => Value::TimeTicks(parse(kind, input)?),
        ValueKind::IpAddress => Value::IpAddress(parse::<Ipv4Addr>(kind, input)?.octets()),
        ValueKind::OctetString => Value::OctetString(Bytes::copy_from_slice(input.as_bytes())),
        other => {
            return Err(Error::coercion(
                CoercionErrorKind::UnsupportedType(other),
                input,
            ));
        }
    };
    Ok(value)
}

fn parse<T: FromStr>(kind: ValueKind, input: &str) -> Result<T> {
    input
        .trim()
        .parse()
        .map_err(|_| Error::coercion(CoercionErrorKind::ParseFailure(kind), input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_existing_kind_is_authoritative() {
        assert_eq!(coerce(ValueKind::Integer32, "1").unwrap(), Value::Integer32(1));
        assert_eq!(coerce(ValueKind::Integer, "1").unwrap(), Value::Integer(1));
        assert_eq!(coerce(ValueKind::Unsigned32, "1").unwrap(), Value::Unsigned32(1));
        assert_eq!(
            coerce(ValueKind::OctetString, "1").unwrap(),
            Value::OctetString(Bytes::from_static(b"1"))
        );
    }

    #[test]
    fn test_every_coercible_kind() {
        let cases = [
            (ValueKind::Integer, "-7", Value::Integer(-7)),
            (ValueKind::Integer32, " 42 ", Value::Integer32(42)),
            (ValueKind::Unsigned32, "4294967295", Value::Unsigned32(u32::MAX)),
            (ValueKind::Counter32, "10", Value::Counter32(10)),
            (ValueKind::Counter64, "18446744073709551615", Value::Counter64(u64::MAX)),
            (ValueKind::Gauge32, "3", Value::Gauge32(3)),
            (ValueKind::TimeTicks, "100", Value::TimeTicks(100)),
            (ValueKind::IpAddress, "192.168.0.1", Value::IpAddress([192, 168, 0, 1])),
            (ValueKind::OctetString, " pad ", Value::from(" pad ")),
        ];
        for (kind, input, expected) in cases {
            assert_eq!(coerce(kind, input).unwrap(), expected, "{kind} from {input:?}");
        }
    }

    #[test]
    fn test_parse_failures() {
        for (kind, input) in [
            (ValueKind::Integer32, "one"),
            (ValueKind::Integer, "2147483648"),
            (ValueKind::Gauge32, "-1"),
            (ValueKind::Counter32, "4294967296"),
            (ValueKind::IpAddress, "10.0.0"),
            (ValueKind::IpAddress, "10.0.0.256"),
        ] {
            let err = coerce(kind, input).unwrap_err();
            assert!(
                matches!(
                    err,
                    Error::Coercion {
                        kind: CoercionErrorKind::ParseFailure(k),
                        ..
                    } if k == kind
                ),
                "{kind} from {input:?}: {err}"
            );
        }
    }

    #[test]
    fn test_unsupported_kinds() {
        for kind in [
            ValueKind::Null,
            ValueKind::ObjectIdentifier,
            ValueKind::Opaque,
            ValueKind::NoSuchInstance,
            ValueKind::Unknown,
        ] {
            assert!(matches!(
                coerce(kind, "1"),
                Err(Error::Coercion {
                    kind: CoercionErrorKind::UnsupportedType(k),
                    ..
                }) if k == kind
            ));
        }
    }

    proptest! {
        #[test]
        fn prop_coerce_keeps_kind(
            idx in 0usize..ValueKind::COERCIBLE.len(),
            n in 0u32..=i32::MAX as u32,
        ) {
            let kind = ValueKind::COERCIBLE[idx];
            let input = match kind {
                ValueKind::IpAddress => std::net::Ipv4Addr::from(n).to_string(),
                _ => n.to_string(),
            };
            prop_assert_eq!(coerce(kind, &input).unwrap().kind(), kind);
        }

        #[test]
        fn prop_uncoercible_always_fails(s in ".*") {
            prop_assert!(coerce(ValueKind::Opaque, &s).is_err());
            prop_assert!(coerce(ValueKind::ObjectIdentifier, &s).is_err());
        }
    }
}
