//! Subsumption: using a term of one polymorphic type where another is
//! expected.
//!
//! `subsume(e, found, expected)` decides whether `found` is at least as
//! polymorphic as `expected`, and rebuilds `e` so that it has the expected
//! type: the found type's quantifiers are eliminated with type
//! applications, the expected type's quantifiers are reintroduced with
//! type abstractions.
//!
//! The found side is instantiated with *flexible* fresh unification
//! variables (the term may be used at any instance), the expected side
//! with *rigid* skolem constants (the term must work for every instance).
//! After unifying the two bodies, the instantiation variables are removed
//! from the substitution; if a skolem survives in what remains, the found
//! type was not polymorphic enough.

use lachs::Span;

use crate::core::CoreTerm;

use super::error::TypeError;
use super::infer::Infer;
use super::subst::Substitution;
use super::ty::Type;

impl Infer {
    /// Check that a term of type `found` can be used at type `expected`,
    /// elaborating the term accordingly.
    ///
    /// Returns the elaborated term together with the residual
    /// substitution, restricted to variables that were not introduced
    /// locally by the instantiation.
    pub fn subsume(
        &mut self,
        term: CoreTerm,
        found: &Type,
        expected: &Type,
        span: &Span,
    ) -> Result<(CoreTerm, Substitution), TypeError> {
        let (found_vars, found_body) = found.peel_quantifiers();
        let (expected_vars, expected_body) = expected.peel_quantifiers();

        // Instantiate the found type at flexible fresh variables
        let mut instantiated = found_body.clone();
        let mut flexible = Vec::new();
        for var in &found_vars {
            let fresh = self.fresh_var();
            instantiated = instantiated.subst_var(var, &Type::Var(fresh.clone()));
            flexible.push(fresh);
        }

        // Instantiate the expected type at rigid skolem constants
        let mut skolemized = expected_body.clone();
        let mut skolems = Vec::new();
        for var in &expected_vars {
            let skolem = self.fresh_skolem();
            skolemized = skolemized.subst_var(var, &Type::Con(skolem.clone(), vec![]));
            skolems.push(skolem);
        }

        let subst = self.unify(&instantiated, &skolemized, span)?;

        // The instantiation variables are local to this judgement
        let residual = subst.remove_keys(&flexible);

        if skolems.iter().any(|skolem| residual.contains_con(skolem)) {
            return Err(TypeError::skolem_escape(
                expected.clone(),
                found.clone(),
                span.clone(),
            ));
        }

        // Elaborate: apply the term at its instantiation, push the
        // unifier through it, then abstract over one fresh variable per
        // skolem
        let mut result = term;
        for var in &flexible {
            result = CoreTerm::ty_app(result, Type::Var(var.clone()));
        }
        let mut result = result.apply_subst(&subst);
        for skolem in skolems.iter().rev() {
            let fresh = self.fresh_var();
            result = result.subst_con(skolem, &Type::Var(fresh.clone()));
            result = CoreTerm::ty_abs(fresh, result);
        }

        Ok((result, residual))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ty::Name;

    fn id_ty() -> Type {
        Type::ForAll(
            Name::named("a"),
            Box::new(Type::func(Type::var("a"), Type::var("a"))),
        )
    }

    fn subsume_in(
        infer: &mut Infer,
        found: &Type,
        expected: &Type,
    ) -> Result<(CoreTerm, Substitution), TypeError> {
        infer.subsume(CoreTerm::var("e"), found, expected, &Span::default())
    }

    #[test]
    fn test_subsume_reflexive_monotype() {
        let mut infer = Infer::new();
        let ty = Type::func(Type::int(), Type::int());
        let (term, subst) = subsume_in(&mut infer, &ty, &ty).unwrap();
        assert_eq!(term, CoreTerm::var("e"));
        assert!(subst.is_empty());
    }

    #[test]
    fn test_subsume_instantiates_polytype() {
        // forall a. a -> a  can be used at  Int -> Int
        let mut infer = Infer::new();
        let mono = Type::func(Type::int(), Type::int());
        let (term, subst) = subsume_in(&mut infer, &id_ty(), &mono).unwrap();

        assert_eq!(term, CoreTerm::ty_app(CoreTerm::var("e"), Type::int()));
        assert!(subst.is_empty());
    }

    #[test]
    fn test_subsume_monotype_where_polytype_expected() {
        // Int -> Int  cannot be used at  forall a. a -> a
        let mut infer = Infer::new();
        let mono = Type::func(Type::int(), Type::int());
        let result = subsume_in(&mut infer, &mono, &id_ty());
        assert!(result.is_err());
    }

    #[test]
    fn test_subsume_polytype_at_itself() {
        let mut infer = Infer::new();
        let (term, subst) = subsume_in(&mut infer, &id_ty(), &id_ty()).unwrap();
        assert!(subst.is_empty());

        // e is instantiated and re-abstracted; the simplifier collapses
        // this back to a bare variable
        let simplified = crate::core::simplify::simplify(&term);
        assert_eq!(simplified, CoreTerm::var("e"));
    }

    #[test]
    fn test_subsume_skolem_escape() {
        // forall a. a -> b  against  forall c. c -> c  forces b := skolem
        let mut infer = Infer::new();
        let outer = infer.fresh_var();
        let found = Type::ForAll(
            Name::named("a"),
            Box::new(Type::func(Type::var("a"), Type::Var(outer))),
        );
        let result = subsume_in(&mut infer, &found, &id_ty());
        assert!(matches!(result, Err(TypeError::SkolemEscape { .. })));
    }

    #[test]
    fn test_subsume_flexible_variable_where_polytype_expected() {
        // A bare unification variable cannot absorb a skolemized
        // quantifier: the binding would leak the skolem
        let mut infer = Infer::new();
        let var = Type::Var(infer.fresh_var());
        let result = subsume_in(&mut infer, &var, &id_ty());
        assert!(matches!(result, Err(TypeError::SkolemEscape { .. })));
    }

    #[test]
    fn test_subsume_binds_expected_variable() {
        // found List Int against expected variable a solves a
        let mut infer = Infer::new();
        let a = infer.fresh_var();
        let found = Type::list(Type::int());
        let (_, subst) = subsume_in(&mut infer, &found, &Type::Var(a.clone())).unwrap();
        assert_eq!(subst.apply(&Type::Var(a)), Type::list(Type::int()));
    }

    #[test]
    fn test_subsume_more_general_than_expected_instance() {
        // forall a b. a -> b  can be used at  forall c. c -> c
        let mut infer = Infer::new();
        let found = Type::ForAll(
            Name::named("a"),
            Box::new(Type::ForAll(
                Name::named("b"),
                Box::new(Type::func(Type::var("a"), Type::var("b"))),
            )),
        );
        let (term, subst) = subsume_in(&mut infer, &found, &id_ty()).unwrap();
        assert!(subst.is_empty());

        // Elaboration re-abstracts: the result is a type abstraction
        assert!(matches!(term, CoreTerm::TyAbs(_, _)));
    }

    #[test]
    fn test_subsume_elaboration_has_no_skolems() {
        let mut infer = Infer::new();
        let (term, _) = subsume_in(&mut infer, &id_ty(), &id_ty()).unwrap();

        let mut leaked = false;
        term.for_each_type(&mut |ty: &Type| {
            for skolem in infer.con_arities.keys() {
                if matches!(skolem, Name::Auto(_)) && ty.contains_con(skolem) {
                    leaked = true;
                }
            }
        });
        assert!(!leaked);
    }
}
