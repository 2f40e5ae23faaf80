use super::serde_attrs::{derives, struct_field_names};
use super::{ModulePath, SourceIndex};
use syn::visit::{self, Visit};
use syn::{FnArg, ImplItemFn, ItemFn, ItemImpl, ItemMod, ItemStruct, Signature, Type};

/// Visitor that records handlers and structs of one file into a [`SourceIndex`]
pub(super) struct IndexVisitor<'i> {
    index: &'i mut SourceIndex,
    file_stem: String,
    /// module path of the file itself
    file_module: ModulePath,
    modules: Vec<String>,
    impl_types: Vec<Option<String>>,
}

impl<'i> IndexVisitor<'i> {
    pub(super) fn new(
        index: &'i mut SourceIndex,
        file_stem: String,
        file_module: ModulePath,
    ) -> Self {
        Self {
            index,
            file_stem,
            file_module,
            modules: Vec::new(),
            impl_types: Vec::new(),
        }
    }

    /// Owner key of a free function: innermost inline module, else the file stem
    fn module_owner(&self) -> String {
        self.modules
            .last()
            .cloned()
            .unwrap_or_else(|| self.file_stem.clone())
    }

    /// Full module path of the item being visited
    fn current_module(&self) -> ModulePath {
        self.file_module
            .iter()
            .chain(&self.modules)
            .cloned()
            .collect()
    }
}

/// Last path segment of a type, e.g. `UserController` for `crate::http::UserController`
fn type_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string()),
        _ => None,
    }
}

/// Types of the typed (non-receiver) parameters, in order
fn parameter_types(sig: &Signature) -> Vec<Type> {
    sig.inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(pat_type) => Some((*pat_type.ty).clone()),
            FnArg::Receiver(_) => None,
        })
        .collect()
}

impl<'ast> Visit<'ast> for IndexVisitor<'_> {
    fn visit_item_mod(&mut self, node: &'ast ItemMod) {
        self.modules.push(node.ident.to_string());
        visit::visit_item_mod(self, node);
        self.modules.pop();
    }

    fn visit_item_impl(&mut self, node: &'ast ItemImpl) {
        let self_type = type_name(&node.self_ty);

        if let (Some((_, trait_path, _)), Some(name)) = (&node.trait_, &self_type) {
            let is_validate = trait_path
                .segments
                .last()
                .is_some_and(|segment| segment.ident == "Validate");
            if is_validate {
                let module = self.current_module();
                self.index.mark_validated(module, name.clone());
            }
        }

        // trait impls are indexed too: a handler may live in `impl Controller for X`
        self.impl_types.push(self_type);
        visit::visit_item_impl(self, node);
        self.impl_types.pop();
    }

    fn visit_impl_item_fn(&mut self, node: &'ast ImplItemFn) {
        if let Some(Some(owner)) = self.impl_types.last().cloned() {
            let module = self.current_module();
            self.index.record_handler(
                owner,
                node.sig.ident.to_string(),
                module,
                parameter_types(&node.sig),
            );
        }
        visit::visit_impl_item_fn(self, node);
    }

    fn visit_item_fn(&mut self, node: &'ast ItemFn) {
        let owner = self.module_owner();
        let module = self.current_module();
        self.index.record_handler(
            owner,
            node.sig.ident.to_string(),
            module,
            parameter_types(&node.sig),
        );
        visit::visit_item_fn(self, node);
    }

    fn visit_item_struct(&mut self, node: &'ast ItemStruct) {
        let derives_validate = derives(&node.attrs, "Validate");
        let module = self.current_module();
        self.index.record_struct(
            node.ident.to_string(),
            module,
            struct_field_names(node),
            derives_validate,
        );
        visit::visit_item_struct(self, node);
    }
}
