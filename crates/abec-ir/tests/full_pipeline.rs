//! End-to-end: parse a scheme document, analyze it, compile all four
//! operations, and check the gross shape of the emitted programs.

use abec_ir::{slots, Stmt};

const DECENTRALIZED_CP: &str = r#"
{
    "spec": {
        "master_key_vars": ["alpha_{l}_[l:AUTHS]"],
        "common_vars": ["b_{l}_[l:AUTHS]", "b'_{l}_[l:AUTHS]", "b_{1, att}_[att:ATTR_UNI]"],
        "key_polys": [
            "(k_{1, l} : G = alpha_{l} + <rgid>*b_{l} + r_{l}*b'_{l})_[l:attr_to_auth(USER_ATTRS)]",
            "(k_{2, att} : G = r_{att.auth}*b_{1, att})_[att:USER_ATTRS]"
        ],
        "cipher_polys": [
            "cm : Gt = <secret>",
            "(c_{1, j} : H = <mu>_{j} + s_{1, j}*b_{j.auth})_[j:LSSS_ROWS]",
            "(c_{2, j} : H = s_{1, j}*b'_{j.auth} + s_{2, j.dedup}*b_{1, j.attr})_[j:LSSS_ROWS]",
            "(c'_{j} : Gt = <lambda>_{j} + alpha_{j.auth}*s_{1, j})_[j:LSSS_ROWS]"
        ],
        "e_vec": ["(c'_{j} = <epsilon>_{j})_[j:LIN_COMB]"],
        "e_mat": [
            "(s_{2, j.dedup} ~ k_{2, j.attr} = -<epsilon>_{j})_[j:LIN_COMB]",
            "(s_{1, j} ~ k_{1, j.auth} = -<epsilon>_{j})_[j:LIN_COMB]",
            "(c_{1, j} ~ <rgid> = <epsilon>_{j})_[j:LIN_COMB]",
            "(c_{2, j} ~ r_{j.auth} = <epsilon>_{j})_[j:LIN_COMB]"
        ],
        "fdh_map": []
    }
}"#;

fn count_recursive(stmts: &[Stmt], pred: &dyn Fn(&Stmt) -> bool) -> usize {
    stmts
        .iter()
        .map(|s| {
            let nested = match s {
                Stmt::Loop { body, .. } => count_recursive(body, pred),
                _ => 0,
            };
            nested + usize::from(pred(s))
        })
        .sum()
}

#[test]
fn compiles_all_four_operations() {
    let raw = abec_dsl::parse_json(DECENTRALIZED_CP).unwrap();
    let scheme = abec_analysis::analyze_scheme(&raw).unwrap();
    let programs = abec_ir::compile_scheme(&scheme).unwrap();

    assert_eq!(programs.setup[0], Stmt::Comment("BEGIN SETUP".into()));
    assert_eq!(
        programs.setup.last(),
        Some(&Stmt::Comment("END SETUP".into()))
    );

    // setup: one master-key loop plus three common-var loops
    let loops = count_recursive(&programs.setup, &|s| matches!(s, Stmt::Loop { .. }));
    assert_eq!(loops, 4);
    assert_eq!(
        count_recursive(&programs.setup, &|s| matches!(
            s,
            Stmt::LiftGt { target, .. } if target.name == "mpk.alphas"
        )),
        1
    );

    // keygen: one non-lone random loop and two key-poly loops; the rgid
    // term materializes through the identity getter
    let loops = count_recursive(&programs.keygen, &|s| matches!(s, Stmt::Loop { .. }));
    assert_eq!(loops, 3);
    assert_eq!(
        count_recursive(&programs.keygen, &|s| matches!(s, Stmt::GetRgidG { .. })),
        1
    );
    assert!(
        count_recursive(&programs.keygen, &|s| matches!(
            s,
            Stmt::Store { target, .. } if target.name == "usk.polys_g"
        )) == 2
    );

    // encrypt: the secret is fetched once, inside the blinding block
    assert_eq!(
        count_recursive(&programs.encrypt, &|s| matches!(s, Stmt::GetSecret { .. })),
        1
    );
    assert_eq!(
        count_recursive(&programs.encrypt, &|s| matches!(
            s,
            Stmt::Store { target, .. } if target.name == "ct.blinding_poly"
        )),
        1
    );
    assert_eq!(
        count_recursive(&programs.encrypt, &|s| matches!(
            s,
            Stmt::Store { target, .. } if target.name == "ct.secondaries"
        )),
        1
    );

    // decrypt: one single, four pairs, final store of the blinding value
    assert_eq!(
        count_recursive(&programs.decrypt, &|s| matches!(s, Stmt::Pair { .. })),
        4
    );
    assert_eq!(
        count_recursive(&programs.decrypt, &|s| matches!(
            s,
            Stmt::ScaleGt { source, .. } if source.name == "ct.secondaries"
        )),
        1
    );
    assert_eq!(
        programs.decrypt[programs.decrypt.len() - 2],
        Stmt::Store {
            target: slots::blinding(),
            source: abec_ir::regs::acc_gt(),
        }
    );
}

#[test]
fn programs_serialize_to_json() {
    let raw = abec_dsl::parse_json(DECENTRALIZED_CP).unwrap();
    let scheme = abec_analysis::analyze_scheme(&raw).unwrap();
    let programs = abec_ir::compile_scheme(&scheme).unwrap();

    let json = serde_json::to_value(&programs).unwrap();
    assert!(json.get("setup").is_some());
    assert!(json.get("decrypt").is_some());
}
