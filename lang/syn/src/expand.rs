//! Walks modules and files, replacing every qualifying declaration in place.

use crate::cancel::{Cancellation, Cancelled};
use crate::codegen::Synthesize;
use crate::emit::{Outcome, Pipeline, Publication};
use crate::error::GenerateError;
use crate::ir::Anchor;
use crate::parser::discover;
use crate::parser::resolve::{resolve, SemanticContext};
use crate::parser::scope::Scope;
use proc_macro2::TokenStream;
use quote::ToTokens;
use syn::{Item, ItemMod, ItemStruct};

enum Expansion {
    Generated(Vec<Item>),
    Failed {
        error: TokenStream,
        consumed_attrs: Vec<usize>,
    },
}

impl<S: Synthesize> Pipeline<S> {
    /// Expands an inline module, as written under `#[fixed_arrays]`.
    ///
    /// The modules enclosing `module` are unknown, so generated units are
    /// keyed below the source position of its name. Modules without a body
    /// are returned untouched.
    pub fn expand_module(
        &self,
        module: ItemMod,
        publication: &Publication,
        cancel: &Cancellation,
    ) -> Result<ItemMod, Cancelled> {
        let anchor = Anchor::of(module.ident.span());
        self.expand_nested(module, None, &[], Some(&anchor), publication, cancel)
    }

    pub fn expand_file(
        &self,
        mut file: syn::File,
        publication: &Publication,
        cancel: &Cancellation,
    ) -> Result<syn::File, Cancelled> {
        let scope = Scope::from_items(&file.items, None);
        file.items = self.expand_items(file.items, &scope, &[], None, publication, cancel)?;
        Ok(file)
    }

    /// Expands a whole source file given as text.
    pub fn generate_source(
        &self,
        source: &str,
        publication: &Publication,
        cancel: &Cancellation,
    ) -> Result<String, GenerateError> {
        let file = syn::parse_file(source)?;
        let file = self.expand_file(file, publication, cancel)?;
        Ok(file.into_token_stream().to_string())
    }

    fn expand_nested(
        &self,
        mut module: ItemMod,
        parent: Option<&Scope>,
        parent_path: &[String],
        anchor: Option<&Anchor>,
        publication: &Publication,
        cancel: &Cancellation,
    ) -> Result<ItemMod, Cancelled> {
        let Some((brace, items)) = module.content.take() else {
            return Ok(module);
        };
        let mut module_path = parent_path.to_vec();
        module_path.push(module.ident.to_string());
        tracing::debug!(module = %module_path.join("::"), "expanding fixed arrays");

        let scope = Scope::from_items(&items, parent);
        let items = self.expand_items(items, &scope, &module_path, anchor, publication, cancel)?;
        module.content = Some((brace, items));
        Ok(module)
    }

    fn expand_items(
        &self,
        items: Vec<Item>,
        scope: &Scope,
        module_path: &[String],
        anchor: Option<&Anchor>,
        publication: &Publication,
        cancel: &Cancellation,
    ) -> Result<Vec<Item>, Cancelled> {
        let ctx = SemanticContext {
            scope,
            crate_name: &self.config().crate_name,
            module_path,
            anchor,
        };
        let mut expanded = Vec::with_capacity(items.len());
        for item in items {
            if let Item::Mod(module) = item {
                let module = self.expand_nested(
                    module,
                    Some(scope),
                    module_path,
                    anchor,
                    publication,
                    cancel,
                )?;
                expanded.push(Item::Mod(module));
                continue;
            }

            let matched = discover::matches(&item, cancel)?;
            let expansion = match &item {
                Item::Struct(item_struct) if matched => {
                    self.expand_struct(item_struct, &ctx, publication, cancel)?
                }
                _ => None,
            };
            match (expansion, item) {
                (Some(Expansion::Generated(items)), _) => expanded.extend(items),
                (
                    Some(Expansion::Failed {
                        error,
                        consumed_attrs,
                    }),
                    Item::Struct(mut item_struct),
                ) => {
                    item_struct.attrs = strip(item_struct.attrs, &consumed_attrs);
                    expanded.push(Item::Struct(item_struct));
                    expanded.push(Item::Verbatim(error));
                }
                (_, item) => expanded.push(item),
            }
        }
        Ok(expanded)
    }

    fn expand_struct(
        &self,
        item: &ItemStruct,
        ctx: &SemanticContext<'_>,
        publication: &Publication,
        cancel: &Cancellation,
    ) -> Result<Option<Expansion>, Cancelled> {
        let Some(decl) = resolve(item, ctx, cancel)? else {
            return Ok(None);
        };
        Ok(Some(match self.emit(&decl, publication, cancel)? {
            Outcome::Generated(items) => Expansion::Generated(items),
            Outcome::Failed(diagnostic) => Expansion::Failed {
                error: syn::Error::new(decl.origin.span(), diagnostic).to_compile_error(),
                consumed_attrs: decl.consumed_attrs,
            },
        }))
    }
}

fn strip(attrs: Vec<syn::Attribute>, consumed: &[usize]) -> Vec<syn::Attribute> {
    attrs
        .into_iter()
        .enumerate()
        .filter(|(index, _)| !consumed.contains(index))
        .map(|(_, attr)| attr)
        .collect()
}
