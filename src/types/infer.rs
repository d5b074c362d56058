//! Type inference for the implicit language.
//!
//! The entry point is [`Infer::infer_expr`]: given an implicit term it
//! produces the elaborated core term, its type, and the substitution that
//! was applied to the environment along the way. [`Infer::check`] is
//! inference followed by subsumption against an expected type.
//!
//! One [`Infer`] value is one inference run. It owns:
//!
//! - the fresh-name counter,
//! - the term environment (extended on entering a binder, shrunk again on
//!   every exit path),
//! - the set of unification variables allocated so far (it only grows),
//! - the arity map for type constructors, seeded with the primitives and
//!   extended by every skolem.
//!
//! Inference keeps quantified types first-class: a variable lookup returns
//! the stored type unchanged, instantiation happens at use sites via
//! `open` and `subsume`, and every rule that can leave unification
//! variables behind re-generalizes its result.

use std::collections::{HashMap, HashSet};

use lachs::Span;

use crate::ast::expression::{
    Ascription, BinaryOp, Concat, Expression, FunctionCall, IfThenElse, Lambda, Let, ListLiteral,
};
use crate::core::CoreTerm;

use super::env::TypeEnv;
use super::error::TypeError;
use super::subst::Substitution;
use super::ty::{ARROW, BOOL, INT, LIST, Name, Type};

/// The state of one inference run.
pub struct Infer {
    next_name: usize,
    pub(crate) env: TypeEnv,
    pub(crate) uni_vars: HashSet<Name>,
    pub(crate) con_arities: HashMap<Name, usize>,
}

impl Infer {
    pub fn new() -> Self {
        let mut con_arities = HashMap::new();
        con_arities.insert(Name::named(BOOL), 0);
        con_arities.insert(Name::named(INT), 0);
        con_arities.insert(Name::named(LIST), 1);
        con_arities.insert(Name::named(ARROW), 2);
        Infer {
            next_name: 0,
            env: TypeEnv::empty(),
            uni_vars: HashSet::new(),
            con_arities,
        }
    }

    fn fresh_name(&mut self) -> Name {
        let id = self.next_name;
        self.next_name += 1;
        Name::Auto(id)
    }

    /// Allocate a fresh unification variable.
    pub fn fresh_var(&mut self) -> Name {
        let name = self.fresh_name();
        self.uni_vars.insert(name.clone());
        name
    }

    /// Allocate a fresh skolem: a rigid nullary constructor.
    pub fn fresh_skolem(&mut self) -> Name {
        let name = self.fresh_name();
        self.con_arities.insert(name.clone(), 0);
        name
    }

    /// Sanitize a user-written type annotation.
    ///
    /// Free variables of an annotation are implicitly existentially bound:
    /// each distinct free variable becomes a fresh unification variable
    /// (consistently within the one annotation). Bound variables are
    /// renamed to fresh names so no later substitution can capture them.
    /// Constructor arities are validated along the way.
    pub(crate) fn sanitize(&mut self, ty: &Type, span: &Span) -> Result<Type, TypeError> {
        self.check_constructors(ty, span)?;
        let mut free = HashMap::new();
        let mut bound = Vec::new();
        Ok(self.sanitize_inner(ty, &mut free, &mut bound))
    }

    fn sanitize_inner(
        &mut self,
        ty: &Type,
        free: &mut HashMap<Name, Name>,
        bound: &mut Vec<(Name, Name)>,
    ) -> Type {
        match ty {
            Type::Var(var) => {
                if let Some((_, renamed)) = bound.iter().rev().find(|(orig, _)| orig == var) {
                    Type::Var(renamed.clone())
                } else if let Some(fresh) = free.get(var) {
                    Type::Var(fresh.clone())
                } else {
                    let fresh = self.fresh_var();
                    free.insert(var.clone(), fresh.clone());
                    Type::Var(fresh)
                }
            }
            Type::Con(con, args) => Type::Con(
                con.clone(),
                args.iter()
                    .map(|arg| self.sanitize_inner(arg, free, bound))
                    .collect(),
            ),
            Type::ForAll(var, body) => {
                let fresh = self.fresh_name();
                bound.push((var.clone(), fresh.clone()));
                let body = self.sanitize_inner(body, free, bound);
                bound.pop();
                Type::ForAll(fresh, Box::new(body))
            }
        }
    }

    fn check_constructors(&self, ty: &Type, span: &Span) -> Result<(), TypeError> {
        match ty {
            Type::Var(_) => Ok(()),
            Type::Con(con, args) => {
                match self.con_arities.get(con) {
                    None => {
                        return Err(TypeError::unknown_constructor(con.clone(), span.clone()));
                    }
                    Some(&arity) if arity != args.len() => {
                        return Err(TypeError::arity_mismatch(
                            con.clone(),
                            arity,
                            args.len(),
                            span.clone(),
                        ));
                    }
                    Some(_) => {}
                }
                for arg in args {
                    self.check_constructors(arg, span)?;
                }
                Ok(())
            }
            Type::ForAll(_, body) => self.check_constructors(body, span),
        }
    }

    /// Strip the outer quantifiers of a type, instantiating each with a
    /// fresh unification variable and recording the corresponding type
    /// application on the term.
    pub(crate) fn open(&mut self, term: CoreTerm, ty: Type) -> (CoreTerm, Type) {
        let mut term = term;
        let mut ty = ty;
        while let Type::ForAll(var, body) = ty {
            let fresh = Type::Var(self.fresh_var());
            ty = body.subst_var(&var, &fresh);
            term = CoreTerm::ty_app(term, fresh);
        }
        (term, ty)
    }

    /// Close a term and its type over every type variable that is not
    /// free in the environment.
    ///
    /// Variables are quantified in first-occurrence order, the term's
    /// variables before the type's, each wrapped in one type abstraction
    /// and one quantifier.
    pub(crate) fn generalize(&mut self, term: CoreTerm, ty: Type) -> (CoreTerm, Type) {
        let env_free = self.env.free_type_vars();
        let mut vars = Vec::new();
        for var in term
            .free_type_vars()
            .into_iter()
            .chain(ty.free_type_vars())
        {
            if !env_free.contains(&var) && !vars.contains(&var) {
                vars.push(var);
            }
        }

        let mut term = term;
        let mut ty = ty;
        for var in vars.into_iter().rev() {
            term = CoreTerm::ty_abs(var.clone(), term);
            ty = Type::ForAll(var, Box::new(ty));
        }
        (term, ty)
    }

    /// Infer a term against an expected type: inference followed by
    /// subsumption. Returns the elaborated term, the expected type with
    /// all discovered solutions applied, and the combined substitution.
    pub(crate) fn check(
        &mut self,
        expr: &Expression,
        expected: &Type,
    ) -> Result<(CoreTerm, Type, Substitution), TypeError> {
        let span = expr.position();
        let (term, found, s1) = self.infer_expr(expr)?;
        let expected = s1.apply(expected);
        let (term, s2) = self.subsume(term, &found, &expected, &span)?;
        Ok((term, s2.apply(&expected), s1.compose(&s2)))
    }

    /// Infer the type of an implicit term, elaborating it to a core term.
    pub fn infer_expr(
        &mut self,
        expr: &Expression,
    ) -> Result<(CoreTerm, Type, Substitution), TypeError> {
        match expr {
            Expression::Ident(ident) => match self.env.lookup(&ident.value) {
                Some(ty) => Ok((
                    CoreTerm::var(&ident.value),
                    ty.clone(),
                    Substitution::empty(),
                )),
                None => Err(TypeError::unbound_variable(
                    ident.value.clone(),
                    ident.position.clone(),
                )),
            },

            Expression::Integer(int) => Ok((
                CoreTerm::Integer(int.value),
                Type::int(),
                Substitution::empty(),
            )),

            Expression::Boolean(b) => Ok((
                CoreTerm::Boolean(b.value),
                Type::bool(),
                Substitution::empty(),
            )),

            Expression::Lambda(lambda) => self.infer_lambda(lambda),
            Expression::FunctionCall(call) => self.infer_call(call),
            Expression::Let(let_expr) => self.infer_let(let_expr),
            Expression::Ascription(ascription) => self.infer_ascription(ascription),
            Expression::IfThenElse(if_expr) => self.infer_if(if_expr),
            Expression::BinaryOp(binop) => self.infer_binop(binop),
            Expression::ListLiteral(list) => self.infer_list(list),
            Expression::Concat(concat) => self.infer_concat(concat),
        }
    }

    fn infer_lambda(
        &mut self,
        lambda: &Lambda,
    ) -> Result<(CoreTerm, Type, Substitution), TypeError> {
        let name = &lambda.param.value;
        if self.env.is_bound(name) {
            return Err(TypeError::already_defined(
                name.clone(),
                lambda.param.position.clone(),
            ));
        }

        let param_ty = match &lambda.annotation {
            Some(annotation) => self.sanitize(annotation, &lambda.position)?,
            None => Type::Var(self.fresh_var()),
        };

        self.env.bind(name.clone(), param_ty.clone());
        let inferred = self.infer_expr(&lambda.body);
        self.env.remove(name);
        let (body, body_ty, subst) = inferred?;

        let (body, body_ty) = self.open(body, body_ty);
        let param_ty = subst.apply(&param_ty);
        if lambda.annotation.is_none() && matches!(param_ty, Type::ForAll(_, _)) {
            return Err(TypeError::polymorphic_parameter(
                name.clone(),
                param_ty,
                lambda.position.clone(),
            ));
        }

        let term = CoreTerm::lambda(name.clone(), param_ty.clone(), body);
        let ty = Type::func(param_ty, body_ty);
        let (term, ty) = self.generalize(term, ty);
        Ok((term, ty, subst))
    }

    fn infer_call(
        &mut self,
        call: &FunctionCall,
    ) -> Result<(CoreTerm, Type, Substitution), TypeError> {
        let dom = Type::Var(self.fresh_var());
        let cod = Type::Var(self.fresh_var());
        let expected = Type::func(dom, cod);

        let (func, func_ty, s1) = self.check(&call.func, &expected)?;
        // Checked against a fresh arrow, so the result is an arrow by
        // construction.
        let Some((dom, cod)) = func_ty.split_func() else {
            panic!("internal error: checked function type is not an arrow: {func_ty}");
        };
        let (dom, cod) = (dom.clone(), cod.clone());

        let (arg, _, s2) = self.check(&call.arg, &dom)?;
        let func = func.apply_subst(&s2);
        let cod = s2.apply(&cod);

        let (term, ty) = self.generalize(CoreTerm::app(func, arg), cod);
        Ok((term, ty, s1.compose(&s2)))
    }

    fn infer_let(&mut self, let_expr: &Let) -> Result<(CoreTerm, Type, Substitution), TypeError> {
        let name = &let_expr.name.value;
        if self.env.is_bound(name) {
            return Err(TypeError::already_defined(
                name.clone(),
                let_expr.name.position.clone(),
            ));
        }

        let (value, value_ty, s1) = self.infer_expr(&let_expr.value)?;

        self.env.bind(name.clone(), value_ty.clone());
        let inferred = self.infer_expr(&let_expr.body);
        self.env.remove(name);
        let (body, body_ty, s2) = inferred?;

        // A let is an immediate application of a lambda
        let value = value.apply_subst(&s2);
        let value_ty = s2.apply(&value_ty);
        let term = CoreTerm::app(CoreTerm::lambda(name.clone(), value_ty, body), value);
        Ok((term, body_ty, s1.compose(&s2)))
    }

    fn infer_ascription(
        &mut self,
        ascription: &Ascription,
    ) -> Result<(CoreTerm, Type, Substitution), TypeError> {
        let expected = self.sanitize(&ascription.ty, &ascription.position)?;
        let (term, ty, subst) = self.check(&ascription.term, &expected)?;
        let (term, ty) = self.generalize(term, ty);
        Ok((term, ty, subst))
    }

    fn infer_if(
        &mut self,
        if_expr: &IfThenElse,
    ) -> Result<(CoreTerm, Type, Substitution), TypeError> {
        let (condition, _, s1) = self.check(&if_expr.condition, &Type::bool())?;

        let result = Type::Var(self.fresh_var());
        let (then_branch, then_ty, s2) = self.check(&if_expr.then_branch, &result)?;
        let (else_branch, else_ty, s3) = self.check(&if_expr.else_branch, &then_ty)?;

        let condition = condition.apply_subst(&s2).apply_subst(&s3);
        let then_branch = then_branch.apply_subst(&s3);

        let term = CoreTerm::if_then_else(condition, then_branch, else_branch);
        let (term, ty) = self.generalize(term, else_ty);
        Ok((term, ty, s1.compose(&s2).compose(&s3)))
    }

    fn infer_binop(
        &mut self,
        binop: &BinaryOp,
    ) -> Result<(CoreTerm, Type, Substitution), TypeError> {
        // All four operators are Int -> Int -> Int
        let (left, _, s1) = self.check(&binop.left, &Type::int())?;
        let (right, _, s2) = self.check(&binop.right, &Type::int())?;
        let left = left.apply_subst(&s2);

        let term = CoreTerm::binop(binop.op, left, right);
        let (term, ty) = self.generalize(term, Type::int());
        Ok((term, ty, s1.compose(&s2)))
    }

    fn infer_list(
        &mut self,
        list: &ListLiteral,
    ) -> Result<(CoreTerm, Type, Substitution), TypeError> {
        let mut elem_ty = Type::Var(self.fresh_var());
        let mut items: Vec<CoreTerm> = Vec::new();
        let mut subst = Substitution::empty();

        for item in &list.items {
            let (term, updated, s) = self.check(item, &elem_ty)?;
            elem_ty = updated;
            for prev in &mut items {
                *prev = prev.apply_subst(&s);
            }
            items.push(term);
            subst = subst.compose(&s);
        }

        let term = CoreTerm::ListLiteral {
            elem_ty: elem_ty.clone(),
            items,
        };
        let (term, ty) = self.generalize(term, Type::list(elem_ty));
        Ok((term, ty, subst))
    }

    fn infer_concat(
        &mut self,
        concat: &Concat,
    ) -> Result<(CoreTerm, Type, Substitution), TypeError> {
        let list_ty = Type::list(Type::Var(self.fresh_var()));

        let (left, list_ty, s1) = self.check(&concat.left, &list_ty)?;
        let (right, list_ty, s2) = self.check(&concat.right, &list_ty)?;
        let left = left.apply_subst(&s2);

        let term = CoreTerm::concat(left, right);
        let (term, ty) = self.generalize(term, list_ty);
        Ok((term, ty, s1.compose(&s2)))
    }
}

impl Default for Infer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::expression::{BinOpKind, Boolean, Ident, Integer};

    fn ident(name: &str) -> Ident {
        Ident {
            value: name.to_string(),
            position: Span::default(),
        }
    }

    fn var(name: &str) -> Expression {
        Expression::Ident(ident(name))
    }

    fn int(value: i128) -> Expression {
        Expression::Integer(Integer {
            value,
            position: Span::default(),
        })
    }

    fn boolean(value: bool) -> Expression {
        Expression::Boolean(Boolean {
            value,
            position: Span::default(),
        })
    }

    fn lambda(param: &str, body: Expression) -> Expression {
        Expression::Lambda(Lambda {
            param: ident(param),
            annotation: None,
            body: Box::new(body),
            position: Span::default(),
        })
    }

    fn lambda_annotated(param: &str, annotation: Type, body: Expression) -> Expression {
        Expression::Lambda(Lambda {
            param: ident(param),
            annotation: Some(annotation),
            body: Box::new(body),
            position: Span::default(),
        })
    }

    fn call(func: Expression, arg: Expression) -> Expression {
        Expression::FunctionCall(FunctionCall {
            func: Box::new(func),
            arg: Box::new(arg),
            position: Span::default(),
        })
    }

    fn let_in(name: &str, value: Expression, body: Expression) -> Expression {
        Expression::Let(Let {
            name: ident(name),
            value: Box::new(value),
            body: Box::new(body),
            position: Span::default(),
        })
    }

    fn ascribe(term: Expression, ty: Type) -> Expression {
        Expression::Ascription(Ascription {
            term: Box::new(term),
            ty,
            position: Span::default(),
        })
    }

    fn infer(expr: &Expression) -> Result<(CoreTerm, Type, Substitution), TypeError> {
        Infer::new().infer_expr(expr)
    }

    fn id_ty() -> Type {
        Type::ForAll(
            Name::named("a"),
            Box::new(Type::func(Type::var("a"), Type::var("a"))),
        )
    }

    #[test]
    fn test_infer_literals() {
        let (_, ty, _) = infer(&int(42)).unwrap();
        assert_eq!(ty, Type::int());
        let (term, ty, _) = infer(&boolean(true)).unwrap();
        assert_eq!(term, CoreTerm::Boolean(true));
        assert_eq!(ty, Type::bool());
    }

    #[test]
    fn test_infer_unbound_variable() {
        let result = infer(&var("x"));
        assert!(matches!(result, Err(TypeError::UnboundVariable { .. })));
    }

    #[test]
    fn test_infer_identity_lambda_generalizes() {
        let (term, ty, _) = infer(&lambda("x", var("x"))).unwrap();
        assert!(ty.alpha_eq(&id_ty()));
        // /\a => \x: a => x
        match term {
            CoreTerm::TyAbs(var, body) => match *body {
                CoreTerm::Lambda { param_ty, .. } => {
                    assert_eq!(param_ty, Type::Var(var));
                }
                other => panic!("expected a lambda, got {other:?}"),
            },
            other => panic!("expected a type abstraction, got {other:?}"),
        }
    }

    #[test]
    fn test_infer_const_lambda() {
        // \x => \y => x : forall a b. a -> b -> a (modulo simplification)
        let (_, ty, _) = infer(&lambda("x", lambda("y", var("x")))).unwrap();
        let expected = Type::ForAll(
            Name::named("a"),
            Box::new(Type::ForAll(
                Name::named("b"),
                Box::new(Type::func(
                    Type::var("a"),
                    Type::func(Type::var("b"), Type::var("a")),
                )),
            )),
        );
        assert!(ty.alpha_eq(&expected));
    }

    #[test]
    fn test_infer_application() {
        let expr = call(lambda("x", var("x")), int(42));
        let (_, ty, _) = infer(&expr).unwrap();
        assert_eq!(ty, Type::int());
    }

    #[test]
    fn test_infer_let_polymorphism() {
        // let id = \x => x in id(id) : forall a. a -> a
        let expr = let_in("id", lambda("x", var("x")), call(var("id"), var("id")));
        let (_, ty, _) = infer(&expr).unwrap();
        assert!(ty.alpha_eq(&id_ty()));
    }

    #[test]
    fn test_infer_let_desugars_to_application() {
        let expr = let_in("n", int(1), var("n"));
        let (term, _, _) = infer(&expr).unwrap();
        assert_eq!(
            term,
            CoreTerm::app(
                CoreTerm::lambda("n", Type::int(), CoreTerm::var("n")),
                CoreTerm::Integer(1)
            )
        );
    }

    #[test]
    fn test_infer_shadowing_rejected() {
        let expr = lambda("x", lambda("x", var("x")));
        assert!(matches!(
            infer(&expr),
            Err(TypeError::AlreadyDefined { .. })
        ));

        let expr = let_in("x", int(1), let_in("x", int(2), var("x")));
        assert!(matches!(
            infer(&expr),
            Err(TypeError::AlreadyDefined { .. })
        ));
    }

    #[test]
    fn test_infer_self_application_rejected() {
        // \x => x(x) would need an infinite type
        let expr = lambda("x", call(var("x"), var("x")));
        assert!(matches!(infer(&expr), Err(TypeError::Mismatch { .. })));
    }

    #[test]
    fn test_infer_annotated_polymorphic_parameter() {
        // \(f: forall a. a -> a) => f(42) : (forall a. a -> a) -> Int
        let expr = lambda_annotated("f", id_ty(), call(var("f"), int(42)));
        let (term, ty, _) = infer(&expr).unwrap();
        let expected = Type::func(id_ty(), Type::int());
        assert!(ty.alpha_eq(&expected));

        // The call instantiates f at Int
        let CoreTerm::Lambda { body, .. } = term else {
            panic!("expected a lambda");
        };
        let CoreTerm::App(func, _) = *body else {
            panic!("expected an application body");
        };
        assert!(matches!(*func, CoreTerm::TyApp(_, ref ty) if *ty == Type::int()));
    }

    #[test]
    fn test_infer_unannotated_polymorphic_parameter_rejected() {
        // \x => ([x] : [forall a. a -> a]) forces x to a quantified type
        let annotation = Type::list(id_ty());
        let list = Expression::ListLiteral(ListLiteral {
            items: vec![var("x")],
            position: Span::default(),
        });
        let expr = lambda("x", ascribe(list, annotation));
        assert!(matches!(
            infer(&expr),
            Err(TypeError::PolymorphicParameter { .. })
        ));
    }

    #[test]
    fn test_infer_ascription_monomorphic() {
        let expr = ascribe(int(1), Type::int());
        let (_, ty, _) = infer(&expr).unwrap();
        assert_eq!(ty, Type::int());
    }

    #[test]
    fn test_infer_ascription_mismatch() {
        let expr = ascribe(int(1), Type::bool());
        assert!(matches!(infer(&expr), Err(TypeError::Mismatch { .. })));
    }

    #[test]
    fn test_infer_ascription_free_vars_are_flexible() {
        // (\x => x) : a -> a, with free `a`, is accepted and re-generalized
        let expr = ascribe(
            lambda("x", var("x")),
            Type::func(Type::var("a"), Type::var("a")),
        );
        let (_, ty, _) = infer(&expr).unwrap();
        assert!(ty.alpha_eq(&id_ty()));
    }

    #[test]
    fn test_infer_annotation_arity_mismatch() {
        let bad = Type::Con(Name::named(LIST), vec![Type::int(), Type::int()]);
        let expr = ascribe(int(1), bad);
        assert!(matches!(
            infer(&expr),
            Err(TypeError::ArityMismatch { .. })
        ));
    }

    #[test]
    fn test_infer_annotation_unknown_constructor() {
        let bad = Type::Con(Name::named("Maybe"), vec![Type::int()]);
        let expr = ascribe(int(1), bad);
        assert!(matches!(
            infer(&expr),
            Err(TypeError::UnknownConstructor { .. })
        ));
    }

    #[test]
    fn test_infer_if() {
        let expr = Expression::IfThenElse(IfThenElse {
            condition: Box::new(boolean(true)),
            then_branch: Box::new(int(1)),
            else_branch: Box::new(int(2)),
            position: Span::default(),
        });
        let (_, ty, _) = infer(&expr).unwrap();
        assert_eq!(ty, Type::int());
    }

    #[test]
    fn test_infer_if_condition_must_be_bool() {
        let expr = Expression::IfThenElse(IfThenElse {
            condition: Box::new(int(0)),
            then_branch: Box::new(int(1)),
            else_branch: Box::new(int(2)),
            position: Span::default(),
        });
        assert!(matches!(infer(&expr), Err(TypeError::Mismatch { .. })));
    }

    #[test]
    fn test_infer_if_branch_mismatch() {
        let expr = Expression::IfThenElse(IfThenElse {
            condition: Box::new(boolean(true)),
            then_branch: Box::new(int(1)),
            else_branch: Box::new(boolean(false)),
            position: Span::default(),
        });
        assert!(matches!(infer(&expr), Err(TypeError::Mismatch { .. })));
    }

    #[test]
    fn test_infer_arithmetic() {
        let expr = Expression::BinaryOp(BinaryOp {
            op: BinOpKind::Add,
            left: Box::new(int(1)),
            right: Box::new(int(2)),
            position: Span::default(),
        });
        let (_, ty, _) = infer(&expr).unwrap();
        assert_eq!(ty, Type::int());
    }

    #[test]
    fn test_infer_arithmetic_rejects_bool() {
        let expr = Expression::BinaryOp(BinaryOp {
            op: BinOpKind::Mul,
            left: Box::new(int(1)),
            right: Box::new(boolean(true)),
            position: Span::default(),
        });
        assert!(matches!(infer(&expr), Err(TypeError::Mismatch { .. })));
    }

    #[test]
    fn test_infer_list_common_element_type() {
        let expr = Expression::ListLiteral(ListLiteral {
            items: vec![int(1), int(2)],
            position: Span::default(),
        });
        let (_, ty, _) = infer(&expr).unwrap();
        assert_eq!(ty, Type::list(Type::int()));
    }

    #[test]
    fn test_infer_empty_list_generalizes() {
        let expr = Expression::ListLiteral(ListLiteral {
            items: vec![],
            position: Span::default(),
        });
        let (_, ty, _) = infer(&expr).unwrap();
        let expected = Type::ForAll(
            Name::named("a"),
            Box::new(Type::list(Type::var("a"))),
        );
        assert!(ty.alpha_eq(&expected));
    }

    #[test]
    fn test_infer_heterogeneous_list_rejected() {
        let expr = Expression::ListLiteral(ListLiteral {
            items: vec![int(1), boolean(true)],
            position: Span::default(),
        });
        assert!(matches!(infer(&expr), Err(TypeError::Mismatch { .. })));
    }

    #[test]
    fn test_infer_concat() {
        let list = |items| {
            Expression::ListLiteral(ListLiteral {
                items,
                position: Span::default(),
            })
        };
        let expr = Expression::Concat(Concat {
            left: Box::new(list(vec![int(1)])),
            right: Box::new(list(vec![])),
            position: Span::default(),
        });
        let (_, ty, _) = infer(&expr).unwrap();
        assert_eq!(ty, Type::list(Type::int()));
    }

    #[test]
    fn test_binder_removed_after_failure() {
        let mut inference = Infer::new();
        let expr = lambda("x", var("y"));
        assert!(inference.infer_expr(&expr).is_err());
        assert!(!inference.env.is_bound("x"));
    }

    #[test]
    fn test_fresh_var_registered() {
        let mut inference = Infer::new();
        let v1 = inference.fresh_var();
        let v2 = inference.fresh_var();
        assert_ne!(v1, v2);
        assert!(inference.uni_vars.contains(&v1));
        assert!(inference.uni_vars.contains(&v2));
    }

    #[test]
    fn test_fresh_skolem_registered_with_arity_zero() {
        let mut inference = Infer::new();
        let skolem = inference.fresh_skolem();
        assert_eq!(inference.con_arities.get(&skolem), Some(&0));
        assert!(!inference.uni_vars.contains(&skolem));
    }

    #[test]
    fn test_sanitize_renames_bound_and_frees() {
        let mut inference = Infer::new();
        // forall a. a -> b, with b free
        let ty = Type::ForAll(
            Name::named("a"),
            Box::new(Type::func(Type::var("a"), Type::var("b"))),
        );
        let sanitized = inference.sanitize(&ty, &Span::default()).unwrap();

        let Type::ForAll(bound, body) = &sanitized else {
            panic!("expected a quantifier");
        };
        assert!(matches!(bound, Name::Auto(_)));
        let Some((dom, cod)) = body.split_func() else {
            panic!("expected an arrow body");
        };
        assert_eq!(*dom, Type::Var(bound.clone()));
        // The free variable became a fresh unification variable
        let Type::Var(fresh) = cod else {
            panic!("expected a variable");
        };
        assert!(matches!(fresh, Name::Auto(_)));
        assert!(inference.uni_vars.contains(fresh));
    }

    #[test]
    fn test_sanitize_consistent_within_annotation() {
        let mut inference = Infer::new();
        let ty = Type::func(Type::var("a"), Type::var("a"));
        let sanitized = inference.sanitize(&ty, &Span::default()).unwrap();
        let (dom, cod) = sanitized.split_func().unwrap();
        assert_eq!(dom, cod);
    }

    #[test]
    fn test_open_instantiates_quantifiers() {
        let mut inference = Infer::new();
        let (term, ty) = inference.open(CoreTerm::var("id"), id_ty());
        assert!(ty.split_func().is_some());
        assert!(matches!(term, CoreTerm::TyApp(_, _)));
    }

    #[test]
    fn test_generalize_respects_environment() {
        let mut inference = Infer::new();
        let pinned = inference.fresh_var();
        inference
            .env
            .bind("x".to_string(), Type::Var(pinned.clone()));
        let loose = inference.fresh_var();

        let ty = Type::func(Type::Var(pinned.clone()), Type::Var(loose));
        let (_, generalized) = inference.generalize(CoreTerm::var("x"), ty);

        // Only the variable not pinned by the environment is quantified
        let Type::ForAll(var, _) = &generalized else {
            panic!("expected a quantifier");
        };
        assert_ne!(*var, pinned);
    }
}
