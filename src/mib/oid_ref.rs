//! Textual object references.

use std::fmt;
use std::str::FromStr;

use super::Registry;
use crate::error::{Error, OidRefErrorKind, Result};
use crate::oid::Oid;

/// A `Module::symbol.suffix` reference, such as `IF-MIB::ifDescr.1`.
///
/// The suffix is the instance part appended to the symbol's OID. It may be
/// empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolicRef {
    pub module: String,
    pub symbol: String,
    pub suffix: Vec<u32>,
}

impl SymbolicRef {
    pub fn new(module: impl Into<String>, symbol: impl Into<String>, suffix: &[u32]) -> Self {
        Self {
            module: module.into(),
            symbol: symbol.into(),
            suffix: suffix.to_vec(),
        }
    }

    /// Parse `Module::symbol[.n[.n...]]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use snmpy::mib::SymbolicRef;
    ///
    /// let r = SymbolicRef::parse("IF-MIB::ifDescr.1").unwrap();
    /// assert_eq!(r.module, "IF-MIB");
    /// assert_eq!(r.symbol, "ifDescr");
    /// assert_eq!(r.suffix, vec![1]);
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let err = |kind| Error::invalid_oid_ref(kind, input);

        let (module, rest) = input
            .split_once("::")
            .ok_or_else(|| err(OidRefErrorKind::NotAnOid))?;
        if module.is_empty() {
            return Err(err(OidRefErrorKind::EmptyModule));
        }

        let mut parts = rest.split('.');
        let symbol = parts.next().unwrap_or_default();
        if symbol.is_empty() {
            return Err(err(OidRefErrorKind::EmptySymbol));
        }

        let suffix = parts
            .map(|part| part.parse::<u32>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| err(OidRefErrorKind::InvalidSuffix))?;

        Ok(Self {
            module: module.to_string(),
            symbol: symbol.to_string(),
            suffix,
        })
    }

    /// The symbol's OID followed by the suffix.
    pub fn resolve(&self, registry: &Registry) -> Result<Oid> {
        let base = registry.resolve(&self.module, &self.symbol)?;
        Ok(base.concat(&self.suffix))
    }
}

impl fmt::Display for SymbolicRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module, self.symbol)?;
        for arc in &self.suffix {
            write!(f, ".{}", arc)?;
        }
        Ok(())
    }
}

impl FromStr for SymbolicRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Anything a client accepts as an object reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OidRef {
    Symbolic(SymbolicRef),
    /// Dotted numeric OID; bypasses the registry.
    Numeric(Oid),
}

impl OidRef {
    /// Parse either form. Input containing `::` is always symbolic.
    pub fn parse(input: &str) -> Result<Self> {
        if input.contains("::") {
            return SymbolicRef::parse(input).map(Self::Symbolic);
        }
        let oid = Oid::parse(input)
            .map_err(|_| Error::invalid_oid_ref(OidRefErrorKind::NotAnOid, input))?;
        check_encodable(&oid, input)?;
        Ok(Self::Numeric(oid))
    }

    /// Resolve to an OID that can be put on the wire.
    pub fn resolve(&self, registry: &Registry) -> Result<Oid> {
        match self {
            Self::Symbolic(symbolic) => {
                let oid = symbolic.resolve(registry)?;
                check_encodable(&oid, &symbolic.to_string())?;
                Ok(oid)
            }
            Self::Numeric(oid) => Ok(oid.clone()),
        }
    }
}

// The first two arcs share one BER subidentifier, so shorter or
// out-of-range OIDs would reach the agent as a different object.
fn check_encodable(oid: &Oid, input: &str) -> Result<()> {
    if oid.len() < 2 || oid.validate().is_err() {
        return Err(Error::invalid_oid_ref(OidRefErrorKind::Unencodable, input));
    }
    Ok(())
}

impl fmt::Display for OidRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbolic(symbolic) => symbolic.fmt(f),
            Self::Numeric(oid) => oid.fmt(f),
        }
    }
}

impl FromStr for OidRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<SymbolicRef> for OidRef {
    fn from(symbolic: SymbolicRef) -> Self {
        Self::Symbolic(symbolic)
    }
}

impl From<Oid> for OidRef {
    fn from(oid: Oid) -> Self {
        Self::Numeric(oid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    fn kind(input: &str) -> OidRefErrorKind {
        match SymbolicRef::parse(input) {
            Err(Error::InvalidOidRef { kind, .. }) => kind,
            other => panic!("expected InvalidOidRef for {:?}, got {:?}", input, other),
        }
    }

    #[test]
    fn test_parse() {
        let r = SymbolicRef::parse("SNMPv2-MIB::sysDescr.0").unwrap();
        assert_eq!(r, SymbolicRef::new("SNMPv2-MIB", "sysDescr", &[0]));

        let r = SymbolicRef::parse("IF-MIB::ifNumber").unwrap();
        assert!(r.suffix.is_empty());

        let r = SymbolicRef::parse("PowerNet-MIB::rPDU2OutletSwitchedControlCommand.5").unwrap();
        assert_eq!(r.suffix, vec![5]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(kind("::sysDescr.0"), OidRefErrorKind::EmptyModule);
        assert_eq!(kind("SNMPv2-MIB::"), OidRefErrorKind::EmptySymbol);
        assert_eq!(kind("SNMPv2-MIB::.0"), OidRefErrorKind::EmptySymbol);
        assert_eq!(kind("SNMPv2-MIB::sysDescr.x"), OidRefErrorKind::InvalidSuffix);
        assert_eq!(kind("SNMPv2-MIB::sysDescr..0"), OidRefErrorKind::InvalidSuffix);
        assert_eq!(kind("SNMPv2-MIB::sysDescr."), OidRefErrorKind::InvalidSuffix);
        assert_eq!(kind("sysDescr.0"), OidRefErrorKind::NotAnOid);
    }

    #[test]
    fn test_display_matches_input() {
        for input in ["IF-MIB::ifDescr.1", "IF-MIB::ifNumber", "X::y.1.2.3"] {
            assert_eq!(SymbolicRef::parse(input).unwrap().to_string(), input);
        }
    }

    #[test]
    fn test_oid_ref_forms() {
        assert_eq!(
            OidRef::parse("1.3.6.1.2.1.1.1.0").unwrap(),
            OidRef::Numeric(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0))
        );
        assert!(matches!(
            OidRef::parse("IF-MIB::ifNumber.0").unwrap(),
            OidRef::Symbolic(_)
        ));
        assert!(matches!(
            OidRef::parse("ifNumber"),
            Err(Error::InvalidOidRef {
                kind: OidRefErrorKind::NotAnOid,
                ..
            })
        ));
    }

    #[test]
    fn test_numeric_must_be_encodable() {
        for input in ["1", "5.1", "0.40.1", ".3.6.1"] {
            assert!(
                matches!(
                    OidRef::parse(input),
                    Err(Error::InvalidOidRef {
                        kind: OidRefErrorKind::Unencodable,
                        ..
                    })
                ),
                "{input} accepted"
            );
        }
        assert!(OidRef::parse("2.999.1").is_ok());
        assert!(OidRef::parse("0.0").is_ok());
    }

    #[test]
    fn test_symbolic_resolving_to_single_arc() {
        let mut registry = Registry::new();
        registry.load(["SNMPv2-SMI"]).unwrap();

        let err = OidRef::parse("SNMPv2-SMI::iso")
            .unwrap()
            .resolve(&registry)
            .unwrap_err();
        match err {
            Error::InvalidOidRef { kind, input } => {
                assert_eq!(kind, OidRefErrorKind::Unencodable);
                assert_eq!(&*input, "SNMPv2-SMI::iso");
            }
            other => panic!("expected InvalidOidRef, got {:?}", other),
        }

        let oid = OidRef::parse("SNMPv2-SMI::iso.3")
            .unwrap()
            .resolve(&registry)
            .unwrap();
        assert_eq!(oid, oid!(1, 3));
    }

    #[test]
    fn test_numeric_bypasses_registry() {
        let registry = Registry::new();
        let oid_ref = OidRef::parse(".1.3.6.1").unwrap();
        assert_eq!(oid_ref.resolve(&registry).unwrap(), oid!(1, 3, 6, 1));
    }
}
