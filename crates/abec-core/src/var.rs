//! Variables, their indices, and quantifications.

use serde::Serialize;
use std::fmt;

use crate::sets::{IMap, QMap, QSet, QType};

/// A runtime-provided special value, written `<name>` in the surface syntax.
///
/// Special values never enter ordinary classification: they are supplied by
/// the execution environment (the global identity randomness, the encryption
/// secret, secret-sharing shares, linear-combination coefficients, attribute
/// scalars).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SpecialVar {
    Rgid,
    Secret,
    Mu,
    Lambda,
    Epsilon,
    XAttr,
    XAttrAlt,
}

impl SpecialVar {
    /// The surface-syntax marker, including the angle brackets.
    pub fn marker(self) -> &'static str {
        match self {
            SpecialVar::Rgid => "<rgid>",
            SpecialVar::Secret => "<secret>",
            SpecialVar::Mu => "<mu>",
            SpecialVar::Lambda => "<lambda>",
            SpecialVar::Epsilon => "<epsilon>",
            SpecialVar::XAttr => "<xattr>",
            SpecialVar::XAttrAlt => "<xattralt>",
        }
    }

    pub fn from_marker(marker: &str) -> Option<Self> {
        Some(match marker {
            "<rgid>" => SpecialVar::Rgid,
            "<secret>" => SpecialVar::Secret,
            "<mu>" => SpecialVar::Mu,
            "<lambda>" => SpecialVar::Lambda,
            "<epsilon>" => SpecialVar::Epsilon,
            "<xattr>" => SpecialVar::XAttr,
            "<xattralt>" => SpecialVar::XAttrAlt,
            _ => return None,
        })
    }
}

impl fmt::Display for SpecialVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// The name of a variable or polynomial: either an ordinary identifier or a
/// special runtime-provided value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum VarName {
    Named(String),
    Special(SpecialVar),
}

impl VarName {
    pub fn named(name: impl Into<String>) -> Self {
        VarName::Named(name.into())
    }

    pub fn is_special(&self) -> bool {
        matches!(self, VarName::Special(_))
    }

    pub fn as_special(&self) -> Option<SpecialVar> {
        match self {
            VarName::Special(s) => Some(*s),
            VarName::Named(_) => None,
        }
    }
}

impl fmt::Display for VarName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarName::Named(name) => f.write_str(name),
            VarName::Special(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for VarName {
    fn from(name: &str) -> Self {
        match SpecialVar::from_marker(name) {
            Some(s) => VarName::Special(s),
            None => VarName::Named(name.to_owned()),
        }
    }
}

/// An index slot of a variable or polynomial.
///
/// An index may optionally be mapped: on quantification resolution its value
/// is replaced by the image of the local mapping function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Idx {
    pub name: String,
    pub local_map: Option<IMap>,
}

impl Idx {
    pub fn new(name: impl Into<String>) -> Self {
        Idx {
            name: name.into(),
            local_map: None,
        }
    }

    pub fn mapped(name: impl Into<String>, local_map: IMap) -> Self {
        Idx {
            name: name.into(),
            local_map: Some(local_map),
        }
    }

    /// Whether this index is bound by one of the given quantifications.
    pub fn is_quantified(&self, quants: &[Quant]) -> bool {
        quants.iter().any(|q| q.name == self.name)
    }

    /// The type of this index after the given quantifications are resolved,
    /// respecting global and local maps.
    ///
    /// Returns `None` if the index is unquantified, or if base set, global
    /// map and local map do not compose.
    pub fn get_type(&self, quants: &[Quant]) -> Option<QType> {
        let quant = quants.iter().find(|q| q.name == self.name)?;

        let mut idx_type = quant.base_set.element_type();
        if let Some(global_map) = quant.global_map {
            if global_map.domain_type() != idx_type {
                return None;
            }
            idx_type = global_map.codomain_type();
        }
        if let Some(local_map) = self.local_map {
            if !local_map.allowed_domain_types().contains(&idx_type) {
                return None;
            }
            idx_type = local_map.codomain_type();
        }
        Some(idx_type)
    }
}

impl fmt::Display for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.local_map {
            Some(map) => write!(f, "{}.{}", self.name, map),
            None => f.write_str(&self.name),
        }
    }
}

/// A "for all" quantification: `name` ranges over `base_set`, optionally
/// through a global mapping function (`for all x in { f(y) | y in Y }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quant {
    pub name: String,
    pub base_set: QSet,
    pub global_map: Option<QMap>,
}

impl Quant {
    pub fn new(name: impl Into<String>, base_set: QSet) -> Self {
        Quant {
            name: name.into(),
            base_set,
            global_map: None,
        }
    }

    pub fn mapped(name: impl Into<String>, base_set: QSet, global_map: QMap) -> Self {
        Quant {
            name: name.into(),
            base_set,
            global_map: Some(global_map),
        }
    }
}

impl fmt::Display for Quant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.global_map {
            Some(map) => write!(f, "{}:{}({})", self.name, map, self.base_set),
            None => write!(f, "{}:{}", self.name, self.base_set),
        }
    }
}

/// A (possibly indexed, possibly quantified) variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Var {
    pub name: VarName,
    pub idcs: Vec<Idx>,
    pub quants: Vec<Quant>,
}

impl Var {
    pub fn new(name: impl Into<VarName>, idcs: Vec<Idx>) -> Self {
        Var {
            name: name.into(),
            idcs,
            quants: Vec::new(),
        }
    }

    pub fn quantified(name: impl Into<VarName>, idcs: Vec<Idx>, quants: Vec<Quant>) -> Self {
        Var {
            name: name.into(),
            idcs,
            quants,
        }
    }

    pub fn is_special(&self) -> bool {
        self.name.is_special()
    }

    pub fn special(&self) -> Option<SpecialVar> {
        self.name.as_special()
    }

    /// A copy of `self` with the given quantifications appended.
    pub fn quantify(&self, quants: &[Quant]) -> Var {
        let mut all = self.quants.clone();
        all.extend_from_slice(quants);
        Var {
            name: self.name.clone(),
            idcs: self.idcs.clone(),
            quants: all,
        }
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.idcs.is_empty() {
            write!(f, "_{{")?;
            for (i, idx) in self.idcs.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{idx}")?;
            }
            write!(f, "}}")?;
        }
        if !self.quants.is_empty() {
            write!(f, "_[")?;
            for (i, quant) in self.quants.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{quant}")?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}
