//! Closed vocabularies for quantifications: the domain sets a specification
//! may quantify over, the element types they carry, and the mapping functions
//! that may be applied globally (to a base set) or locally (to an index).

use serde::Serialize;
use std::fmt;

/// The element type of an index after quantification resolution.
///
/// Different sets carry elements of the same type (both the attribute
/// universe and the user attributes contain attributes), which is what makes
/// variables quantified under different index names comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum QType {
    Attribute,
    Label,
    Authority,
    LsssRow,
    LinearCombination,
    DedupIndex,
    XAttr,
    AltAttr,
}

/// A set over which variables and polynomials may be quantified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum QSet {
    AttributeUniverse,
    UserAttributes,
    Labels,
    Authorities,
    LsssRows,
    PosLsssRows,
    NegLsssRows,
    DedupIndices,
    LinCombIndices,
    PosLinCombIndices,
    NegLinCombIndices,
}

impl QSet {
    /// The element type of this set.
    pub fn element_type(self) -> QType {
        match self {
            QSet::AttributeUniverse | QSet::UserAttributes => QType::Attribute,
            QSet::Labels => QType::Label,
            QSet::Authorities => QType::Authority,
            QSet::LsssRows | QSet::PosLsssRows | QSet::NegLsssRows => QType::LsssRow,
            QSet::DedupIndices => QType::DedupIndex,
            QSet::LinCombIndices | QSet::PosLinCombIndices | QSet::NegLinCombIndices => {
                QType::LsssRow
            }
        }
    }

    /// The surface-syntax token for this set.
    pub fn token(self) -> &'static str {
        match self {
            QSet::AttributeUniverse => "ATTR_UNI",
            QSet::UserAttributes => "USER_ATTRS",
            QSet::Labels => "LABELS",
            QSet::Authorities => "AUTHS",
            QSet::LsssRows => "LSSS_ROWS",
            QSet::PosLsssRows => "POS_LSSS_ROWS",
            QSet::NegLsssRows => "NEG_LSSS_ROWS",
            QSet::DedupIndices => "DEDUP_IDCS",
            QSet::LinCombIndices => "LIN_COMB",
            QSet::PosLinCombIndices => "POS_LIN_COMB",
            QSet::NegLinCombIndices => "NEG_LIN_COMB",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "ATTR_UNI" => QSet::AttributeUniverse,
            "USER_ATTRS" => QSet::UserAttributes,
            "LABELS" => QSet::Labels,
            "AUTHS" => QSet::Authorities,
            "LSSS_ROWS" => QSet::LsssRows,
            "POS_LSSS_ROWS" => QSet::PosLsssRows,
            "NEG_LSSS_ROWS" => QSet::NegLsssRows,
            "DEDUP_IDCS" => QSet::DedupIndices,
            "LIN_COMB" => QSet::LinCombIndices,
            "POS_LIN_COMB" => QSet::PosLinCombIndices,
            "NEG_LIN_COMB" => QSet::NegLinCombIndices,
            _ => return None,
        })
    }
}

impl fmt::Display for QSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A mapping function applied to the base set of a quantification
/// ("for all x in { f(y) | y in Y }").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum QMap {
    AttrToLabel,
    AttrToAuthority,
    AttrToXAttr,
    LsssRowToAuthority,
    LsssRowToLabel,
    LsssRowToAttr,
    LsssRowToAltAttr,
    LsssRowToDedup,
    LsssRowToXAttr,
}

impl QMap {
    /// The element type of this map's domain (before mapping).
    pub fn domain_type(self) -> QType {
        match self {
            QMap::AttrToLabel | QMap::AttrToAuthority | QMap::AttrToXAttr => QType::Attribute,
            QMap::LsssRowToAuthority
            | QMap::LsssRowToLabel
            | QMap::LsssRowToAttr
            | QMap::LsssRowToAltAttr
            | QMap::LsssRowToDedup
            | QMap::LsssRowToXAttr => QType::LsssRow,
        }
    }

    /// The element type of this map's codomain (after mapping).
    pub fn codomain_type(self) -> QType {
        match self {
            QMap::AttrToLabel | QMap::LsssRowToLabel => QType::Label,
            QMap::AttrToAuthority | QMap::LsssRowToAuthority => QType::Authority,
            QMap::AttrToXAttr | QMap::LsssRowToXAttr | QMap::LsssRowToAttr => QType::Attribute,
            QMap::LsssRowToAltAttr => QType::AltAttr,
            QMap::LsssRowToDedup => QType::DedupIndex,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            QMap::AttrToLabel => "attr_to_lbl",
            QMap::AttrToAuthority => "attr_to_auth",
            QMap::AttrToXAttr => "attr_to_xattr",
            QMap::LsssRowToAuthority => "ls_row_to_auth",
            QMap::LsssRowToLabel => "ls_row_to_lbl",
            QMap::LsssRowToAttr => "ls_row_to_attr",
            QMap::LsssRowToAltAttr => "ls_row_to_alt_attr",
            QMap::LsssRowToDedup => "ls_row_to_dedup",
            QMap::LsssRowToXAttr => "ls_row_to_xattr",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "attr_to_lbl" => QMap::AttrToLabel,
            "attr_to_auth" => QMap::AttrToAuthority,
            "attr_to_xattr" => QMap::AttrToXAttr,
            "ls_row_to_auth" => QMap::LsssRowToAuthority,
            "ls_row_to_lbl" => QMap::LsssRowToLabel,
            "ls_row_to_attr" => QMap::LsssRowToAttr,
            "ls_row_to_alt_attr" => QMap::LsssRowToAltAttr,
            "ls_row_to_dedup" => QMap::LsssRowToDedup,
            "ls_row_to_xattr" => QMap::LsssRowToXAttr,
            _ => return None,
        })
    }
}

impl fmt::Display for QMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A mapping function applied to a single index of a variable or polynomial,
/// written `i.f` in the surface syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IMap {
    ToAttr,
    ToLabel,
    ToAuthority,
    ToXAttr,
    ToAltAttr,
    ToDedup,
}

impl IMap {
    /// The element types this map accepts as input.
    pub fn allowed_domain_types(self) -> &'static [QType] {
        match self {
            IMap::ToLabel | IMap::ToAuthority | IMap::ToXAttr => {
                &[QType::Attribute, QType::LsssRow]
            }
            IMap::ToAttr | IMap::ToAltAttr | IMap::ToDedup => &[QType::LsssRow],
        }
    }

    /// The element type of this map's codomain (after mapping).
    pub fn codomain_type(self) -> QType {
        match self {
            IMap::ToLabel => QType::Label,
            IMap::ToAuthority => QType::Authority,
            IMap::ToXAttr | IMap::ToAttr => QType::Attribute,
            IMap::ToAltAttr => QType::AltAttr,
            IMap::ToDedup => QType::DedupIndex,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            IMap::ToAttr => "attr",
            IMap::ToLabel => "lbl",
            IMap::ToAuthority => "auth",
            IMap::ToXAttr => "xattr",
            IMap::ToAltAttr => "alt_attr",
            IMap::ToDedup => "dedup",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "attr" => IMap::ToAttr,
            "lbl" => IMap::ToLabel,
            "auth" => IMap::ToAuthority,
            "xattr" => IMap::ToXAttr,
            "alt_attr" => IMap::ToAltAttr,
            "dedup" => IMap::ToDedup,
            _ => return None,
        })
    }
}

impl fmt::Display for IMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
