#![allow(clippy::result_large_err)]

use pest::Parser;
use pest_derive::Parser;
use serde::Deserialize;

use abec_core::{
    Expr, FdhEntry, Group, IMap, Idx, Poly, QMap, QSet, Quant, SpecialVar, Var, VarName,
};

use crate::errors::ParseError;
use crate::raw::{RawPair, RawScheme, RawSingle};

#[derive(Parser)]
#[grammar = "grammar.pest"]
struct SchemeParser;

type Pair<'a> = pest::iterators::Pair<'a, Rule>;

/// Parse a string as a possibly indexed and/or quantified variable.
///
/// The general format is `varname_{indices}_[quantifications]`. If indices
/// or quantifications are missing, the leading underscore is omitted as
/// well. Indices are identifiers or numbers, each optionally mapped
/// (`j.auth`); quantifications are `name:SET` pairs whose set may be wrapped
/// in a global map (`l:attr_to_auth(USER_ATTRS)`).
pub fn parse_var(source: &str) -> Result<Var, ParseError> {
    parse_var_ctx(source, "var")
}

/// Parse a string as a possibly quantified polynomial:
/// `polyname : group = expr` or `(polyname : group = expr)_[quants]`,
/// with group one of `G`, `H`, `Gt`.
pub fn parse_poly(source: &str) -> Result<Poly, ParseError> {
    parse_poly_ctx(source, "poly")
}

/// Parse one entry of the decryption vector:
/// `varname = expr` or `(varname = expr)_[quants]`.
pub fn parse_vector_entry(source: &str) -> Result<RawSingle, ParseError> {
    parse_vector_entry_ctx(source, "e_vec entry")
}

/// Parse one entry of the decryption matrix:
/// `lhs ~ rhs = expr` or `(lhs ~ rhs = expr)_[quants]`.
pub fn parse_matrix_entry(source: &str) -> Result<RawPair, ParseError> {
    parse_matrix_entry_ctx(source, "e_mat entry")
}

/// Parse one entry of the FDH map: `var # index`.
pub fn parse_fdh_entry(source: &str) -> Result<FdhEntry, ParseError> {
    parse_fdh_entry_ctx(source, "fdh_map entry")
}

#[derive(Deserialize)]
struct Document {
    spec: SpecSection,
}

#[derive(Deserialize)]
struct SpecSection {
    master_key_vars: Vec<String>,
    common_vars: Vec<String>,
    key_polys: Vec<String>,
    cipher_polys: Vec<String>,
    e_vec: Vec<String>,
    e_mat: Vec<String>,
    #[serde(default)]
    fdh_map: Vec<String>,
}

/// Parse a complete scheme document given in JSON format into its raw
/// (semantically unvalidated) representation.
pub fn parse_json(data: &str) -> Result<RawScheme, ParseError> {
    let doc: Document = serde_json::from_str(data).map_err(|e| ParseError::Document {
        message: e.to_string(),
    })?;
    let spec = doc.spec;

    let master_key_vars = parse_list(&spec.master_key_vars, "master_key_vars", parse_var_ctx)?;
    let common_vars = parse_list(&spec.common_vars, "common_vars", parse_var_ctx)?;
    let key_polys = parse_list(&spec.key_polys, "key_polys", parse_poly_ctx)?;
    let cipher_polys = parse_list(&spec.cipher_polys, "cipher_polys", parse_poly_ctx)?;
    let e_vec = parse_list(&spec.e_vec, "e_vec", parse_vector_entry_ctx)?;
    let e_mat = parse_list(&spec.e_mat, "e_mat", parse_matrix_entry_ctx)?;
    let fdh_map = parse_list(&spec.fdh_map, "fdh_map", parse_fdh_entry_ctx)?;

    Ok(RawScheme {
        master_key_vars,
        common_vars,
        key_polys,
        cipher_polys,
        e_vec,
        e_mat,
        fdh_map,
    })
}

fn parse_list<T>(
    entries: &[String],
    field: &str,
    parse: impl Fn(&str, &str) -> Result<T, ParseError>,
) -> Result<Vec<T>, ParseError> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| parse(entry, &format!("{field}[{i}]")))
        .collect()
}

// ---------------------------------------------------------------
// Entry-point plumbing
// ---------------------------------------------------------------

fn parse_entry<'a>(rule: Rule, source: &'a str, context: &str) -> Result<Pair<'a>, ParseError> {
    let mut pairs = SchemeParser::parse(rule, source).map_err(|e| {
        let (start, end) = match e.location {
            pest::error::InputLocation::Pos(p) => (p, p + 1),
            pest::error::InputLocation::Span((s, e)) => (s, e),
        };
        ParseError::syntax(e.variant.message(), start, end, source, context)
    })?;
    Ok(pairs.next().expect("entry rule produces one pair"))
}

fn parse_var_ctx(source: &str, context: &str) -> Result<Var, ParseError> {
    let entry = parse_entry(Rule::var_entry, source, context)?;
    let var_pair = entry
        .into_inner()
        .find(|p| p.as_rule() == Rule::var)
        .expect("var_entry contains a var");
    build_var(var_pair, source, context)
}

fn parse_poly_ctx(source: &str, context: &str) -> Result<Poly, ParseError> {
    let entry = parse_entry(Rule::poly_entry, source, context)?;
    let poly_pair = entry
        .into_inner()
        .find(|p| p.as_rule() == Rule::poly)
        .expect("poly_entry contains a poly");

    let mut head = None;
    let mut quants = Vec::new();
    for p in poly_pair.into_inner() {
        match p.as_rule() {
            Rule::poly_head => head = Some(p),
            Rule::quants => quants = build_quants(p),
            _ => {}
        }
    }
    let mut inner = head.expect("poly contains a head").into_inner();
    let symbol = inner.next().expect("poly head starts with its name");
    let group_tok = inner.next().expect("poly head carries a group");
    let expr_pair = inner.next().expect("poly head carries an expression");

    let (name, idcs) = build_symbol_parts(symbol, source, context)?;
    let group = Group::from_token(group_tok.as_str()).expect("grammar admits only known groups");
    let expr = build_expr(expr_pair, source, context)?;
    Ok(Poly {
        name,
        idcs,
        quants,
        expr,
        group,
    })
}

fn parse_vector_entry_ctx(source: &str, context: &str) -> Result<RawSingle, ParseError> {
    let entry = parse_entry(Rule::vec_entry, source, context)?;
    let vec_pair = entry
        .into_inner()
        .find(|p| p.as_rule() == Rule::vec)
        .expect("vec_entry contains a vec");

    let mut head = None;
    let mut quants = Vec::new();
    for p in vec_pair.into_inner() {
        match p.as_rule() {
            Rule::vec_head => head = Some(p),
            Rule::quants => quants = build_quants(p),
            _ => {}
        }
    }
    let mut inner = head.expect("vec contains a head").into_inner();
    let symbol = inner.next().expect("vec head starts with its entry");
    let expr_pair = inner.next().expect("vec head carries an expression");

    let (name, idcs) = build_symbol_parts(symbol, source, context)?;
    let expr = build_expr(expr_pair, source, context)?;
    Ok(RawSingle {
        entry: Var {
            name,
            idcs,
            quants: Vec::new(),
        },
        expr,
        quants,
    })
}

fn parse_matrix_entry_ctx(source: &str, context: &str) -> Result<RawPair, ParseError> {
    let entry = parse_entry(Rule::mat_entry, source, context)?;
    let mat_pair = entry
        .into_inner()
        .find(|p| p.as_rule() == Rule::mat)
        .expect("mat_entry contains a mat");

    let mut head = None;
    let mut quants = Vec::new();
    for p in mat_pair.into_inner() {
        match p.as_rule() {
            Rule::mat_head => head = Some(p),
            Rule::quants => quants = build_quants(p),
            _ => {}
        }
    }
    let mut inner = head.expect("mat contains a head").into_inner();
    let lhs_sym = inner.next().expect("mat head has a left operand");
    let rhs_sym = inner.next().expect("mat head has a right operand");
    let expr_pair = inner.next().expect("mat head carries an expression");

    let (lhs_name, lhs_idcs) = build_symbol_parts(lhs_sym, source, context)?;
    let (rhs_name, rhs_idcs) = build_symbol_parts(rhs_sym, source, context)?;
    let expr = build_expr(expr_pair, source, context)?;
    Ok(RawPair {
        lhs: Var {
            name: lhs_name,
            idcs: lhs_idcs,
            quants: Vec::new(),
        },
        rhs: Var {
            name: rhs_name,
            idcs: rhs_idcs,
            quants: Vec::new(),
        },
        expr,
        quants,
    })
}

fn parse_fdh_entry_ctx(source: &str, context: &str) -> Result<FdhEntry, ParseError> {
    let entry = parse_entry(Rule::fdh_entry, source, context)?;
    let fdh_pair = entry
        .into_inner()
        .find(|p| p.as_rule() == Rule::fdh)
        .expect("fdh_entry contains a fdh");

    let mut var = None;
    let mut idx = 0u32;
    for p in fdh_pair.into_inner() {
        match p.as_rule() {
            Rule::var => var = Some(build_var(p, source, context)?),
            Rule::number => {
                idx = p.as_str().parse().map_err(|_| ParseError::IntOutOfRange {
                    literal: p.as_str().to_owned(),
                    span: span_of(&p),
                    src: named_source(source, context),
                })?;
            }
            _ => {}
        }
    }
    Ok(FdhEntry {
        var: var.expect("fdh carries a var"),
        idx,
    })
}

// ---------------------------------------------------------------
// AST builders
// ---------------------------------------------------------------

fn span_of(pair: &Pair<'_>) -> miette::SourceSpan {
    let s = pair.as_span();
    (s.start(), (s.end() - s.start()).max(1)).into()
}

fn named_source(source: &str, context: &str) -> miette::NamedSource<String> {
    miette::NamedSource::new(context, source.to_owned())
}

fn build_var(pair: Pair<'_>, source: &str, context: &str) -> Result<Var, ParseError> {
    let mut name = None;
    let mut idcs = Vec::new();
    let mut quants = Vec::new();
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::ident => name = Some(build_name(p, source, context)?),
            Rule::idcs => idcs = build_idcs(p),
            Rule::quants => quants = build_quants(p),
            _ => {}
        }
    }
    Ok(Var {
        name: name.expect("var starts with its name"),
        idcs,
        quants,
    })
}

fn build_name(pair: Pair<'_>, source: &str, context: &str) -> Result<VarName, ParseError> {
    let text = pair.as_str();
    if text.starts_with('<') {
        match SpecialVar::from_marker(text) {
            Some(special) => Ok(VarName::Special(special)),
            None => Err(ParseError::UnknownSpecialMarker {
                marker: text.to_owned(),
                span: span_of(&pair),
                src: named_source(source, context),
            }),
        }
    } else {
        Ok(VarName::named(text))
    }
}

fn build_idcs(pair: Pair<'_>) -> Vec<Idx> {
    pair.into_inner()
        .map(|idx| {
            let inner = idx.into_inner().next().expect("idx has one alternative");
            match inner.as_rule() {
                Rule::mapped_idx => {
                    let mut parts = inner.into_inner();
                    let name = parts.next().expect("mapped idx has a name").as_str();
                    let map_tok = parts.next().expect("mapped idx has a map").as_str();
                    Idx::mapped(
                        name,
                        IMap::from_token(map_tok).expect("grammar admits only known index maps"),
                    )
                }
                Rule::plain_idx => Idx::new(
                    inner
                        .into_inner()
                        .next()
                        .expect("plain idx has a name")
                        .as_str(),
                ),
                _ => unreachable!("idx admits only mapped or plain alternatives"),
            }
        })
        .collect()
}

fn build_quants(pair: Pair<'_>) -> Vec<Quant> {
    pair.into_inner()
        .map(|quant| {
            let inner = quant.into_inner().next().expect("quant has one alternative");
            match inner.as_rule() {
                Rule::mapped_quant => {
                    let mut parts = inner.into_inner();
                    let name = parts.next().expect("quant has a name").as_str();
                    let map_tok = parts.next().expect("mapped quant has a map").as_str();
                    let set_tok = parts.next().expect("mapped quant has a set").as_str();
                    Quant::mapped(
                        name,
                        QSet::from_token(set_tok).expect("grammar admits only known sets"),
                        QMap::from_token(map_tok).expect("grammar admits only known set maps"),
                    )
                }
                Rule::plain_quant => {
                    let mut parts = inner.into_inner();
                    let name = parts.next().expect("quant has a name").as_str();
                    let set_tok = parts.next().expect("quant has a set").as_str();
                    Quant::new(
                        name,
                        QSet::from_token(set_tok).expect("grammar admits only known sets"),
                    )
                }
                _ => unreachable!("quant admits only mapped or plain alternatives"),
            }
        })
        .collect()
}

fn build_symbol_parts(
    pair: Pair<'_>,
    source: &str,
    context: &str,
) -> Result<(VarName, Vec<Idx>), ParseError> {
    let mut name = None;
    let mut idcs = Vec::new();
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::ident => name = Some(build_name(p, source, context)?),
            Rule::idcs => idcs = build_idcs(p),
            _ => {}
        }
    }
    Ok((name.expect("symbol starts with its name"), idcs))
}

fn build_expr(pair: Pair<'_>, source: &str, context: &str) -> Result<Expr, ParseError> {
    let mut inner = pair.into_inner();
    let mut acc = build_term(inner.next().expect("expr has a first term"), source, context)?;
    while let Some(op) = inner.next() {
        let rhs = build_term(
            inner.next().expect("operator is followed by a term"),
            source,
            context,
        )?;
        acc = match op.as_str() {
            "+" => Expr::add(acc, rhs),
            "-" => Expr::sub(acc, rhs),
            _ => unreachable!("expr admits only additive operators"),
        };
    }
    Ok(acc)
}

fn build_term(pair: Pair<'_>, source: &str, context: &str) -> Result<Expr, ParseError> {
    let mut inner = pair.into_inner();
    let mut acc = build_factor(
        inner.next().expect("term has a first factor"),
        source,
        context,
    )?;
    while let Some(op) = inner.next() {
        let rhs = build_factor(
            inner.next().expect("operator is followed by a factor"),
            source,
            context,
        )?;
        acc = match op.as_str() {
            "*" => Expr::mul(acc, rhs),
            "/" => Expr::div(acc, rhs),
            _ => unreachable!("term admits only multiplicative operators"),
        };
    }
    Ok(acc)
}

fn build_factor(pair: Pair<'_>, source: &str, context: &str) -> Result<Expr, ParseError> {
    let inner = pair.into_inner().next().expect("factor has one alternative");
    match inner.as_rule() {
        Rule::neg => {
            let negated = inner
                .into_inner()
                .next()
                .expect("negation wraps a factor");
            Ok(Expr::neg(build_factor(negated, source, context)?))
        }
        Rule::primary => build_primary(inner, source, context),
        _ => unreachable!("factor admits only negation or primary"),
    }
}

fn build_primary(pair: Pair<'_>, source: &str, context: &str) -> Result<Expr, ParseError> {
    let inner = pair.into_inner().next().expect("primary has one alternative");
    match inner.as_rule() {
        Rule::number => {
            let value: i64 = inner.as_str().parse().map_err(|_| ParseError::IntOutOfRange {
                literal: inner.as_str().to_owned(),
                span: span_of(&inner),
                src: named_source(source, context),
            })?;
            Ok(Expr::Literal(value))
        }
        Rule::symbol => {
            let (name, idcs) = build_symbol_parts(inner, source, context)?;
            Ok(Expr::Symbol(Var {
                name,
                idcs,
                quants: Vec::new(),
            }))
        }
        Rule::expr => build_expr(inner, source, context),
        _ => unreachable!("primary admits only number, symbol or parenthesized expr"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ---------------------------------------------------------------
    // parse_var
    // ---------------------------------------------------------------

    #[test]
    fn parse_plain_var() {
        assert_eq!(parse_var("alpha").unwrap(), Var::new("alpha", vec![]));
    }

    #[test]
    fn parse_primed_indexed_var() {
        assert_eq!(
            parse_var("b'_{1, att}").unwrap(),
            Var::new("b'", vec![Idx::new("1"), Idx::new("att")])
        );
    }

    #[test]
    fn parse_quantified_var() {
        assert_eq!(
            parse_var("alpha_{l}_[l:AUTHS]").unwrap(),
            Var::quantified(
                "alpha",
                vec![Idx::new("l")],
                vec![Quant::new("l", QSet::Authorities)],
            )
        );
    }

    #[test]
    fn parse_var_with_local_and_global_maps() {
        assert_eq!(
            parse_var("r_{att.auth}_[att:attr_to_auth(USER_ATTRS)]").unwrap(),
            Var::quantified(
                "r",
                vec![Idx::mapped("att", IMap::ToAuthority)],
                vec![Quant::mapped(
                    "att",
                    QSet::UserAttributes,
                    QMap::AttrToAuthority
                )],
            )
        );
    }

    #[test]
    fn parse_special_var() {
        assert_eq!(
            parse_var("<rgid>").unwrap(),
            Var::new(VarName::Special(SpecialVar::Rgid), vec![])
        );
    }

    #[test]
    fn parse_unknown_special_marker_is_error() {
        assert!(matches!(
            parse_var("<nonsense>"),
            Err(ParseError::UnknownSpecialMarker { .. })
        ));
    }

    #[test]
    fn parse_var_rejects_garbage() {
        assert!(parse_var("b_{").is_err());
        assert!(parse_var("").is_err());
        assert!(parse_var("b_[x AUTHS]").is_err());
    }

    // ---------------------------------------------------------------
    // parse_poly
    // ---------------------------------------------------------------

    #[test]
    fn parse_unquantified_poly() {
        let poly = parse_poly("cm : Gt = <secret>").unwrap();
        assert_eq!(poly.name, VarName::named("cm"));
        assert!(poly.idcs.is_empty());
        assert!(poly.quants.is_empty());
        assert_eq!(poly.group, Group::Gt);
        assert_eq!(
            poly.expr,
            Expr::Symbol(Var::new(VarName::Special(SpecialVar::Secret), vec![]))
        );
    }

    #[test]
    fn parse_quantified_poly() {
        let poly = parse_poly(
            "(k_{1, l} : G = alpha_{l} + <rgid>*b_{l})_[l:attr_to_auth(USER_ATTRS)]",
        )
        .unwrap();
        assert_eq!(poly.name, VarName::named("k"));
        assert_eq!(poly.idcs, vec![Idx::new("1"), Idx::new("l")]);
        assert_eq!(
            poly.quants,
            vec![Quant::mapped(
                "l",
                QSet::UserAttributes,
                QMap::AttrToAuthority
            )]
        );
        assert_eq!(poly.group, Group::G);
        assert_eq!(
            poly.expr,
            Expr::add(
                Expr::Symbol(Var::new("alpha", vec![Idx::new("l")])),
                Expr::mul(
                    Expr::Symbol(Var::new(VarName::Special(SpecialVar::Rgid), vec![])),
                    Expr::Symbol(Var::new("b", vec![Idx::new("l")])),
                ),
            )
        );
    }

    #[test]
    fn parse_poly_with_mapped_indices_in_expr() {
        let poly = parse_poly("(c_{1, j} : H = s_{1, j}*b_{j.auth})_[j:LSSS_ROWS]").unwrap();
        assert_eq!(
            poly.expr,
            Expr::mul(
                Expr::Symbol(Var::new("s", vec![Idx::new("1"), Idx::new("j")])),
                Expr::Symbol(Var::new("b", vec![Idx::mapped("j", IMap::ToAuthority)])),
            )
        );
    }

    #[test]
    fn parse_poly_division_and_parens() {
        let poly = parse_poly("p : G = (a + b)/2").unwrap();
        assert_eq!(
            poly.expr,
            Expr::div(
                Expr::add(
                    Expr::Symbol(Var::new("a", vec![])),
                    Expr::Symbol(Var::new("b", vec![])),
                ),
                Expr::Literal(2),
            )
        );
    }

    #[test]
    fn parse_poly_rejects_unknown_group() {
        assert!(parse_poly("k : X = a").is_err());
    }

    #[test]
    fn parse_poly_rejects_parens_without_quants() {
        assert!(parse_poly("(k : G = a)").is_err());
    }

    // ---------------------------------------------------------------
    // parse_vector_entry / parse_matrix_entry
    // ---------------------------------------------------------------

    #[test]
    fn parse_vector_entry_quantified() {
        let single = parse_vector_entry("(c'_{j} = <epsilon>_{j})_[j:LIN_COMB]").unwrap();
        assert_eq!(single.entry, Var::new("c'", vec![Idx::new("j")]));
        assert_eq!(single.quants, vec![Quant::new("j", QSet::LinCombIndices)]);
        assert_eq!(
            single.expr,
            Expr::Symbol(Var::new(
                VarName::Special(SpecialVar::Epsilon),
                vec![Idx::new("j")]
            ))
        );
    }

    #[test]
    fn parse_vector_entry_bare() {
        let single = parse_vector_entry("cp = 1").unwrap();
        assert_eq!(single.entry, Var::new("cp", vec![]));
        assert!(single.quants.is_empty());
        assert_eq!(single.expr, Expr::Literal(1));
    }

    #[test]
    fn parse_matrix_entry_with_negated_coefficient() {
        let pair =
            parse_matrix_entry("(s_{1, j} ~ k_{1, j.auth} = -<epsilon>_{j})_[j:LIN_COMB]").unwrap();
        assert_eq!(pair.lhs, Var::new("s", vec![Idx::new("1"), Idx::new("j")]));
        assert_eq!(
            pair.rhs,
            Var::new("k", vec![Idx::new("1"), Idx::mapped("j", IMap::ToAuthority)])
        );
        assert_eq!(pair.quants, vec![Quant::new("j", QSet::LinCombIndices)]);
        assert_eq!(
            pair.expr,
            Expr::neg(Expr::Symbol(Var::new(
                VarName::Special(SpecialVar::Epsilon),
                vec![Idx::new("j")]
            )))
        );
    }

    #[test]
    fn parse_matrix_entry_with_special_operand() {
        let pair = parse_matrix_entry("(c_{1, j} ~ <rgid> = <epsilon>_{j})_[j:LIN_COMB]").unwrap();
        assert_eq!(
            pair.rhs,
            Var::new(VarName::Special(SpecialVar::Rgid), vec![])
        );
    }

    // ---------------------------------------------------------------
    // parse_fdh_entry
    // ---------------------------------------------------------------

    #[test]
    fn parse_fdh_entry_quantified() {
        let entry = parse_fdh_entry("b_{att}_[att:ATTR_UNI] # 1").unwrap();
        assert_eq!(
            entry.var,
            Var::quantified(
                "b",
                vec![Idx::new("att")],
                vec![Quant::new("att", QSet::AttributeUniverse)],
            )
        );
        assert_eq!(entry.idx, 1);
    }

    #[test]
    fn parse_fdh_entry_parenthesized() {
        let entry = parse_fdh_entry("(b_{att}_[att:ATTR_UNI]) # 2").unwrap();
        assert_eq!(entry.idx, 2);
    }

    // ---------------------------------------------------------------
    // parse_json
    // ---------------------------------------------------------------

    #[test]
    fn parse_json_minimal_document() {
        let data = r#"
        {
            "meta": {},
            "spec": {
                "master_key_vars": ["alpha_{l}_[l:AUTHS]"],
                "common_vars": ["b_{l}_[l:AUTHS]"],
                "key_polys": ["(k_{l} : G = alpha_{l} + <rgid>*b_{l})_[l:attr_to_auth(USER_ATTRS)]"],
                "cipher_polys": ["cm : Gt = <secret>"],
                "e_vec": [],
                "e_mat": [],
                "fdh_map": []
            }
        }"#;
        let raw = parse_json(data).unwrap();
        assert_eq!(raw.master_key_vars.len(), 1);
        assert_eq!(raw.common_vars.len(), 1);
        assert_eq!(raw.key_polys.len(), 1);
        assert_eq!(raw.cipher_polys.len(), 1);
        assert!(raw.e_vec.is_empty());
        assert!(raw.e_mat.is_empty());
        assert!(raw.fdh_map.is_empty());
    }

    #[test]
    fn parse_json_missing_spec_is_document_error() {
        assert!(matches!(
            parse_json(r#"{"meta": {}}"#),
            Err(ParseError::Document { .. })
        ));
    }

    #[test]
    fn parse_json_bad_entry_reports_syntax_error() {
        let data = r#"
        {
            "spec": {
                "master_key_vars": ["alpha_{"],
                "common_vars": [],
                "key_polys": [],
                "cipher_polys": [],
                "e_vec": [],
                "e_mat": [],
                "fdh_map": []
            }
        }"#;
        assert!(matches!(
            parse_json(data),
            Err(ParseError::Syntax { .. })
        ));
    }
}
