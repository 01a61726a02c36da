#![doc = include_str!("../README.md")]

pub mod builder;
pub mod coeff;
pub mod decrypt;
pub mod encrypt;
pub mod errors;
pub mod ir;
pub mod keygen;
pub mod setup;

use serde::Serialize;
use tracing::debug;

use abec_analysis::Scheme;

pub use builder::IrBuilder;
pub use errors::CodegenError;
pub use ir::{regs, slots, IrExpr, IrFunc, IrType, IrVar, Stmt};

pub use decrypt::compile_decrypt;
pub use encrypt::compile_encrypt;
pub use keygen::compile_keygen;
pub use setup::compile_setup;

/// The four IR programs compiled from one scheme.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrPrograms {
    pub setup: Vec<Stmt>,
    pub keygen: Vec<Stmt>,
    pub encrypt: Vec<Stmt>,
    pub decrypt: Vec<Stmt>,
}

/// Compile a validated scheme into its four operation programs.
pub fn compile_scheme(scheme: &Scheme) -> Result<IrPrograms, CodegenError> {
    let setup = compile_setup(
        &scheme.master_key_vars,
        &scheme.common_vars,
        &scheme.group_map,
        &scheme.fdh_map,
    )?;
    let keygen = compile_keygen(
        &scheme.key_lone_randoms,
        &scheme.key_non_lone_randoms,
        &scheme.key_polys,
        &scheme.group_map,
        &scheme.fdh_map,
    )?;
    let encrypt = compile_encrypt(
        &scheme.cipher_lone_randoms,
        &scheme.cipher_special_lone_randoms,
        &scheme.cipher_non_lone_randoms,
        &scheme.cipher_primaries,
        &scheme.cipher_secondaries,
        &scheme.cipher_blinding,
        &scheme.group_map,
        &scheme.fdh_map,
    )?;
    let decrypt = compile_decrypt(
        &scheme.dec_singles,
        &scheme.dec_pairs,
        &scheme.var_type_map,
        &scheme.fdh_map,
    )?;
    debug!(
        setup = setup.len(),
        keygen = keygen.len(),
        encrypt = encrypt.len(),
        decrypt = decrypt.len(),
        "compiled scheme to IR"
    );
    Ok(IrPrograms {
        setup,
        keygen,
        encrypt,
        decrypt,
    })
}
