//! The IR vocabulary: statements, expressions, runtime variables, value
//! types and runtime conversion functions.
//!
//! Programs are flat statement sequences (a [`Stmt::Loop`] nests a
//! sub-sequence). Indexed storage is conceptually a multi-dimensional,
//! string-keyed store: each concrete variable use first builds a runtime
//! index string via the index-builder statements, then reads or writes a
//! slot under that index.

use serde::Serialize;

use abec_core::{QMap, QSet, QType};

/// The type of a runtime value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IrType {
    Z,
    G,
    H,
    Gt,
    Attribute,
    Label,
    Authority,
    LsssRow,
    DedupIndex,
    AltAttr,
    XAttr,
}

impl IrType {
    pub fn from_qtype(qtype: QType) -> IrType {
        match qtype {
            QType::Attribute => IrType::Attribute,
            QType::Label => IrType::Label,
            QType::Authority => IrType::Authority,
            QType::LsssRow | QType::LinearCombination => IrType::LsssRow,
            QType::DedupIndex => IrType::DedupIndex,
            QType::AltAttr => IrType::AltAttr,
            QType::XAttr => IrType::XAttr,
        }
    }
}

/// A runtime conversion function provided by the execution environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IrFunc {
    AttrToLabel,
    AttrToAuthority,
    AttrToXAttr,
    LsssRowToAuthority,
    LsssRowToLabel,
    LsssRowToAttr,
    LsssRowToAltAttr,
    LsssRowToDedup,
    LsssRowToXAttr,

    AttrToString,
    LabelToString,
    AuthorityToString,
    LsssRowToString,
    DedupIdxToString,
}

impl IrFunc {
    /// The conversion used to append a typed value to an index string.
    pub fn to_string_conversion(ty: IrType) -> IrFunc {
        match ty {
            IrType::Attribute | IrType::AltAttr | IrType::XAttr => IrFunc::AttrToString,
            IrType::Label => IrFunc::LabelToString,
            IrType::Authority => IrFunc::AuthorityToString,
            IrType::LsssRow => IrFunc::LsssRowToString,
            IrType::DedupIndex => IrFunc::DedupIdxToString,
            IrType::Z | IrType::G | IrType::H | IrType::Gt => {
                panic!("group and field values never appear in index strings")
            }
        }
    }

    pub fn from_qmap(qmap: QMap) -> IrFunc {
        match qmap {
            QMap::AttrToLabel => IrFunc::AttrToLabel,
            QMap::AttrToAuthority => IrFunc::AttrToAuthority,
            QMap::AttrToXAttr => IrFunc::AttrToXAttr,
            QMap::LsssRowToAuthority => IrFunc::LsssRowToAuthority,
            QMap::LsssRowToLabel => IrFunc::LsssRowToLabel,
            QMap::LsssRowToAttr => IrFunc::LsssRowToAttr,
            QMap::LsssRowToAltAttr => IrFunc::LsssRowToAltAttr,
            QMap::LsssRowToDedup => IrFunc::LsssRowToDedup,
            QMap::LsssRowToXAttr => IrFunc::LsssRowToXAttr,
        }
    }

    /// The conversion realizing a local index map, keyed by the (already
    /// globally mapped) domain type and the map's codomain type.
    pub fn from_domain_codomain(domain: QType, codomain: QType) -> Option<IrFunc> {
        match (domain, codomain) {
            (QType::Attribute, QType::Label) => Some(IrFunc::AttrToLabel),
            (QType::Attribute, QType::Authority) => Some(IrFunc::AttrToAuthority),
            (QType::Attribute, QType::Attribute) => Some(IrFunc::AttrToXAttr),
            (QType::LsssRow, QType::Authority) => Some(IrFunc::LsssRowToAuthority),
            (QType::LsssRow, QType::Label) => Some(IrFunc::LsssRowToLabel),
            (QType::LsssRow, QType::Attribute) => Some(IrFunc::LsssRowToAttr),
            (QType::LsssRow, QType::AltAttr) => Some(IrFunc::LsssRowToAltAttr),
            (QType::LsssRow, QType::DedupIndex) => Some(IrFunc::LsssRowToDedup),
            _ => None,
        }
    }
}

/// A runtime variable, optionally indexed by an expression (a read of the
/// current index register in practice).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrVar {
    pub name: String,
    pub index: Option<Box<IrExpr>>,
}

impl IrVar {
    pub fn new(name: impl Into<String>) -> IrVar {
        IrVar {
            name: name.into(),
            index: None,
        }
    }

    /// This variable indexed at the value of another runtime variable.
    pub fn indexed_at(&self, idx: &IrVar) -> IrVar {
        IrVar {
            name: self.name.clone(),
            index: Some(Box::new(IrExpr::Read(idx.clone()))),
        }
    }
}

/// A pure runtime expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum IrExpr {
    Call { func: IrFunc, args: Vec<IrExpr> },
    Read(IrVar),
    StringLit(String),
    IntLit(i64),
}

/// One IR statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    Comment(String),

    Loop {
        var: String,
        ty: IrType,
        set: QSet,
        body: Vec<Stmt>,
    },

    Alloc {
        target: IrVar,
        ty: IrType,
        expr: IrExpr,
    },
    Store {
        target: IrVar,
        source: IrVar,
    },
    StoreExpr {
        target: IrVar,
        expr: IrExpr,
    },

    // scalar field
    ResetZ { target: IrVar },
    SampleZ { target: IrVar },
    AddZ { target: IrVar, lhs: IrVar, rhs: IrVar },
    MulZ { target: IrVar, lhs: IrVar, rhs: IrVar },
    SetZ { target: IrVar, value: i64 },
    NegZ { target: IrVar, source: IrVar },
    InvZ { target: IrVar, source: IrVar },

    // source group G
    ResetG { target: IrVar },
    LiftG { target: IrVar, source: IrVar },
    AddG { target: IrVar, lhs: IrVar, rhs: IrVar },
    ScaleG { target: IrVar, coeff: IrVar, source: IrVar },
    FdhG { target: IrVar, idx: u32, arg: IrVar },

    // source group H
    ResetH { target: IrVar },
    LiftH { target: IrVar, source: IrVar },
    AddH { target: IrVar, lhs: IrVar, rhs: IrVar },
    ScaleH { target: IrVar, coeff: IrVar, source: IrVar },
    FdhH { target: IrVar, idx: u32, arg: IrVar },

    // target group Gt
    ResetGt { target: IrVar },
    LiftGt { target: IrVar, source: IrVar },
    AddGt { target: IrVar, lhs: IrVar, rhs: IrVar },
    ScaleGt { target: IrVar, coeff: IrVar, source: IrVar },
    Pair { target: IrVar, source_g: IrVar, source_h: IrVar },

    // special runtime values
    GetRgidG { target: IrVar },
    GetRgidH { target: IrVar },
    GetMu { target: IrVar, idx: IrVar },
    GetLambda { target: IrVar, idx: IrVar },
    GetEpsilon { target: IrVar, idx: IrVar },
    GetXAttr { target: IrVar, idx: IrVar },
    GetXAttrAlt { target: IrVar, idx: IrVar },
    GetSecret { target: IrVar },

    // index building
    SetIndex(String),
    AppendIndexLiteral(String),
    AppendIndex { source: IrVar, conversion: IrFunc },
}

/// Scratch registers threaded through every compiled operation.
pub mod regs {
    use super::IrVar;

    pub fn idx() -> IrVar {
        IrVar::new("idx")
    }
    pub fn tmp_z() -> IrVar {
        IrVar::new("tmp_z")
    }
    pub fn aux_z() -> IrVar {
        IrVar::new("aux_z")
    }
    pub fn acc_z() -> IrVar {
        IrVar::new("acc_z")
    }
    pub fn tmp_g() -> IrVar {
        IrVar::new("tmp_g")
    }
    pub fn acc_g() -> IrVar {
        IrVar::new("acc_g")
    }
    pub fn tmp_h() -> IrVar {
        IrVar::new("tmp_h")
    }
    pub fn acc_h() -> IrVar {
        IrVar::new("acc_h")
    }
    pub fn tmp_gt() -> IrVar {
        IrVar::new("tmp_gt")
    }
    pub fn acc_gt() -> IrVar {
        IrVar::new("acc_gt")
    }
}

/// Named storage slots of the key material and ciphertext structures the
/// execution environment provides.
pub mod slots {
    use super::IrVar;

    pub fn msk_master_keys() -> IrVar {
        IrVar::new("msk.alphas")
    }
    pub fn mpk_master_keys() -> IrVar {
        IrVar::new("mpk.alphas")
    }
    pub fn msk_common_vars() -> IrVar {
        IrVar::new("msk.common_vars")
    }
    pub fn mpk_common_vars_g() -> IrVar {
        IrVar::new("mpk.common_vars_g")
    }
    pub fn mpk_common_vars_h() -> IrVar {
        IrVar::new("mpk.common_vars_h")
    }

    pub fn usk_polys_g() -> IrVar {
        IrVar::new("usk.polys_g")
    }
    pub fn usk_polys_h() -> IrVar {
        IrVar::new("usk.polys_h")
    }
    pub fn usk_randoms_g() -> IrVar {
        IrVar::new("usk.randoms_g")
    }
    pub fn usk_randoms_h() -> IrVar {
        IrVar::new("usk.randoms_h")
    }

    pub fn ct_primaries_g() -> IrVar {
        IrVar::new("ct.primaries_g")
    }
    pub fn ct_primaries_h() -> IrVar {
        IrVar::new("ct.primaries_h")
    }
    pub fn ct_secondaries() -> IrVar {
        IrVar::new("ct.secondaries")
    }
    pub fn ct_randoms_g() -> IrVar {
        IrVar::new("ct.randoms_g")
    }
    pub fn ct_randoms_h() -> IrVar {
        IrVar::new("ct.randoms_h")
    }
    pub fn ct_blinding() -> IrVar {
        IrVar::new("ct.blinding_poly")
    }

    /// Operation-local pools of sampled randomness.
    pub fn lone_randoms() -> IrVar {
        IrVar::new("lone_randoms")
    }
    pub fn non_lone_randoms() -> IrVar {
        IrVar::new("non_lone_randoms")
    }
    pub fn special_lone_randoms() -> IrVar {
        IrVar::new("special_lone_randoms")
    }

    /// The recovered blinding value produced by decryption.
    pub fn blinding() -> IrVar {
        IrVar::new("blinding_poly")
    }
}
