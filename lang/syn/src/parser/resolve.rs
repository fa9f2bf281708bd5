use crate::cancel::{Cancellation, Cancelled};
use crate::ir::{Anchor, CapabilityType, ElementType, FixedArrayDeclaration, Location, Origin};
use crate::parser::discover;
use crate::parser::scope::{Scope, CAPABILITY_PATH, SIZE_MARKER_PATH};
use quote::ToTokens;
use syn::punctuated::Punctuated;
use syn::visit::{self, Visit};
use syn::{Attribute, Expr, ExprLit, ItemStruct, Lit, Meta, Token, Type};

/// Names visible at the declaration site.
#[derive(Debug, Clone, Copy)]
pub struct SemanticContext<'s> {
    pub scope: &'s Scope,
    pub crate_name: &'s str,
    /// Modules between the crate root, or the `anchor`, and the declaration.
    pub module_path: &'s [String],
    pub anchor: Option<&'s Anchor>,
}

/// Confirms a structural candidate and extracts its declaration model.
///
/// Returns `Ok(None)` when the capability bound does not resolve to
/// `fixed_array::FixedArray` or the element type is not a concrete sized
/// type. Rejection is silent: the struct is left for the compiler to judge.
pub fn resolve<'a>(
    item: &'a ItemStruct,
    ctx: &SemanticContext<'_>,
    cancel: &Cancellation,
) -> Result<Option<FixedArrayDeclaration<'a>>, Cancelled> {
    cancel.check()?;

    let capability = discover::self_bounds(&item.generics)
        .filter_map(|bound| Some((bound, discover::single_type_argument(bound)?)))
        .find_map(|(bound, element)| {
            let qualified = ctx.scope.resolve(&bound.path)?;
            (qualified == CAPABILITY_PATH).then(|| (bound, qualified, element))
        });
    let Some((bound, qualified, element)) = capability else {
        tracing::debug!(item = %item.ident, "capability bound does not resolve, skipping");
        return Ok(None);
    };

    let Some(element_type) = element_type(element) else {
        tracing::debug!(
            item = %item.ident,
            element = %element.to_token_stream(),
            "element type is not concrete, skipping"
        );
        return Ok(None);
    };

    let (capacity, consumed_attrs) = capacity(item, ctx.scope);
    let location = location(item, ctx);
    tracing::debug!(
        declaration = %location,
        element = %element_type.name,
        capacity,
        "resolved fixed array declaration"
    );

    Ok(Some(FixedArrayDeclaration {
        origin: Origin { item, location },
        capacity,
        element_type,
        capability_type: CapabilityType {
            path: bound.path.clone(),
            qualified,
        },
        consumed_attrs,
    }))
}

fn element_type(ty: &Type) -> Option<ElementType> {
    let ty = unwrap(ty);
    match ty {
        Type::TraitObject(_) | Type::Slice(_) | Type::Never(_) => return None,
        Type::Path(path) if path.qself.is_none() && path.path.is_ident("str") => return None,
        _ => {}
    }
    let mut check = Concrete { concrete: true };
    check.visit_type(ty);
    check.concrete.then(|| ElementType {
        ty: ty.clone(),
        name: ty.to_token_stream().to_string(),
    })
}

fn unwrap(ty: &Type) -> &Type {
    match ty {
        Type::Paren(inner) => unwrap(&inner.elem),
        Type::Group(inner) => unwrap(&inner.elem),
        ty => ty,
    }
}

/// Rejects types that only the compiler could complete: inferred, opaque,
/// macro-generated, `Self`-relative and elided-lifetime types.
struct Concrete {
    concrete: bool,
}

impl<'ast> Visit<'ast> for Concrete {
    fn visit_type(&mut self, ty: &'ast Type) {
        match ty {
            Type::Infer(_) | Type::ImplTrait(_) | Type::Macro(_) | Type::Verbatim(_) => {
                self.concrete = false
            }
            _ => visit::visit_type(self, ty),
        }
    }

    fn visit_type_reference(&mut self, reference: &'ast syn::TypeReference) {
        if reference.lifetime.is_none() {
            self.concrete = false;
        }
        visit::visit_type_reference(self, reference);
    }

    fn visit_lifetime(&mut self, lifetime: &'ast syn::Lifetime) {
        if lifetime.ident == "_" {
            self.concrete = false;
        }
    }

    fn visit_path(&mut self, path: &'ast syn::Path) {
        if path
            .segments
            .first()
            .is_some_and(|segment| segment.ident == "Self")
        {
            self.concrete = false;
        }
        visit::visit_path(self, path);
    }
}

/// Capacity from the first well-formed marker; 0 when there is none.
///
/// Every marker attribute is consumed, well-formed or not, so none of them
/// survive into the generated struct.
fn capacity(item: &ItemStruct, scope: &Scope) -> (usize, Vec<usize>) {
    let mut capacity = None;
    let mut consumed = Vec::new();
    for (index, attr) in item.attrs.iter().enumerate() {
        if !is_size_marker(attr, scope) {
            continue;
        }
        consumed.push(index);
        if capacity.is_none() {
            capacity = literal_capacity(attr);
        }
    }
    (capacity.unwrap_or(0), consumed)
}

pub fn is_size_marker(attr: &Attribute, scope: &Scope) -> bool {
    scope.resolve_attribute(attr.path()).as_deref() == Some(SIZE_MARKER_PATH)
}

/// `#[marker(N)]` with exactly one non-negative integer literal.
pub fn literal_capacity(attr: &Attribute) -> Option<usize> {
    let Meta::List(list) = &attr.meta else {
        return None;
    };
    let args = list
        .parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated)
        .ok()?;
    if args.len() != 1 {
        return None;
    }
    match args.first()? {
        Expr::Lit(ExprLit {
            lit: Lit::Int(int), ..
        }) => int.base10_parse::<usize>().ok(),
        _ => None,
    }
}

fn location(item: &ItemStruct, ctx: &SemanticContext<'_>) -> Location {
    let start = item.ident.span().start();
    Location {
        crate_name: ctx.crate_name.to_string(),
        module_path: ctx.module_path.to_vec(),
        item: item.ident.to_string(),
        line: start.line,
        column: start.column,
        anchor: ctx.anchor.cloned(),
    }
}
