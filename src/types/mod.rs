//! Type inference and elaboration.

pub mod env;
pub mod error;
pub mod infer;
pub mod subst;
pub mod subsume;
pub mod ty;
pub mod unify;

pub use env::TypeEnv;
pub use error::TypeError;
pub use infer::Infer;
pub use subst::Substitution;
pub use ty::{Name, Type};

use crate::ast::Expression;
use crate::core::{CoreTerm, simplify::simplify};

/// Type check an implicit term.
///
/// Runs one fresh inference, then simplifies the elaboration. On success
/// the result is the explicit core term and its (closed) type.
pub fn type_check(expr: &Expression) -> Result<(CoreTerm, Type), TypeError> {
    let mut infer = Infer::new();
    let (term, ty, _) = infer.infer_expr(expr)?;
    Ok((simplify(&term), ty))
}
