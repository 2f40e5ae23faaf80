//! Validation-rule discovery from Rust source code.
//!
//! [`SourceIndex`] walks a project directory, parses every `.rs` file with `syn` and records
//! two things:
//!
//! - **handlers**: the typed parameters of every method in an `impl` block (keyed by the
//!   implementing type) and of every free function (keyed by its enclosing module, or the
//!   file stem at the top level);
//! - **structs**: the deserialized field names of every struct with named fields, and which
//!   of those structs are validation objects (`#[derive(Validate)]` or `impl Validate for`).
//!
//! Both are tagged with the module they are declared in (file path plus inline `mod`s).
//! Struct names are not unique across a project, so a handler's parameter type resolves to
//! the validation struct of that name declared nearest to the handler.
//!
//! [`SourceRules`] answers [`RuleProvider`] lookups from that index: a handler's parameters
//! are unwrapped through extractor wrappers (`Json<T>`, `web::Form<T>`, `Valid<Json<T>>`, ...)
//! until a validation object is found, and its fields become the request body.
//!
//! # Example
//!
//! ```no_run
//! use postman_from_routes::routes::HandlerId;
//! use postman_from_routes::rules::RuleProvider;
//! use postman_from_routes::source::SourceRules;
//! use std::path::Path;
//!
//! let rules = SourceRules::scan(Path::new("./my-api/src")).unwrap();
//! let fields = rules.validated_fields(&HandlerId::new("UserController", "store"));
//! println!("{:?}", fields);
//! ```

mod serde_attrs;
mod visitor;

use crate::error::{ExportError, Result};
use crate::routes::HandlerId;
use crate::rules::RuleProvider;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};
use syn::visit::Visit;
use syn::{GenericArgument, PathArguments, Type};
use walkdir::WalkDir;

use visitor::IndexVisitor;

/// Module path of an item: file path segments followed by inline `mod` names
type ModulePath = Vec<String>;

/// A handler function's signature
#[derive(Debug)]
struct HandlerSig {
    module: ModulePath,
    /// typed parameter types, in declaration order
    params: Vec<Type>,
}

/// A struct with named fields
#[derive(Debug)]
struct StructDef {
    module: ModulePath,
    /// deserialized field names, in declaration order
    fields: Vec<String>,
    derives_validate: bool,
}

/// Index of handler signatures and validation structs found in a source tree.
#[derive(Debug, Default)]
pub struct SourceIndex {
    /// `(owner, fn name) -> signature`
    handlers: HashMap<(String, String), HandlerSig>,
    /// struct name -> every definition with that name, in scan order
    structs: HashMap<String, Vec<StructDef>>,
    /// `(module, struct name)` of each `impl Validate for` block
    validate_impls: HashSet<(ModulePath, String)>,
    /// files that could not be read or parsed
    warnings: Vec<String>,
}

impl SourceIndex {
    /// Scans `root` recursively, skipping `target` and hidden directories.
    ///
    /// Unreadable or unparsable files are logged and skipped; only a missing root is an error.
    pub fn scan(root: &Path) -> Result<Self> {
        if !root.exists() {
            return Err(ExportError::Io {
                path: root.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "source path does not exist",
                ),
            });
        }

        let mut index = Self::default();
        let files = rust_files(root, &mut index.warnings);
        debug!("Found {} Rust files under {}", files.len(), root.display());

        for path in files {
            let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
            match fs::read_to_string(&path) {
                Ok(content) => index.add_source(&relative, &content),
                Err(e) => {
                    let warning = format!("Failed to read {}: {}", path.display(), e);
                    warn!("{}", warning);
                    index.warnings.push(warning);
                }
            }
        }

        debug!(
            "Indexed {} handlers, {} struct names ({} impl Validate blocks)",
            index.handlers.len(),
            index.structs.len(),
            index.validate_impls.len()
        );
        Ok(index)
    }

    /// Parses one file's source and adds its items to the index.
    pub fn add_source(&mut self, path: &Path, content: &str) {
        let file = match syn::parse_file(content) {
            Ok(file) => file,
            Err(e) => {
                let warning = format!("Failed to parse {}: {}", path.display(), e);
                warn!("{}", warning);
                self.warnings.push(warning);
                return;
            }
        };

        let file_stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut visitor = IndexVisitor::new(self, file_stem, file_module(path));
        visitor.visit_file(&file);
    }

    /// Problems encountered while scanning
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    fn record_handler(
        &mut self,
        owner: String,
        name: String,
        module: ModulePath,
        params: Vec<Type>,
    ) {
        self.handlers
            .insert((owner, name), HandlerSig { module, params });
    }

    fn record_struct(
        &mut self,
        name: String,
        module: ModulePath,
        fields: Vec<String>,
        derives_validate: bool,
    ) {
        self.structs.entry(name).or_default().push(StructDef {
            module,
            fields,
            derives_validate,
        });
    }

    fn mark_validated(&mut self, module: ModulePath, name: String) {
        self.validate_impls.insert((module, name));
    }

    /// Fields of the validation object taken by a handler.
    ///
    /// When several parameters resolve to validation objects, the last one wins.
    pub fn validated_fields(&self, handler: &HandlerId) -> Option<Vec<String>> {
        let key = (handler.controller_name().to_string(), handler.method.clone());
        let Some(sig) = self.handlers.get(&key) else {
            debug!("Handler {} not found in source index", handler);
            return None;
        };

        let found = sig
            .params
            .iter()
            .rev()
            .find_map(|ty| self.validation_struct_in(ty, &sig.module));

        match found {
            Some((name, def)) => {
                debug!(
                    "Handler {} takes validation object {} from {}",
                    handler,
                    name,
                    def.module.join("::")
                );
                Some(def.fields.clone())
            }
            None => {
                debug!("Handler {} takes no validation object", handler);
                None
            }
        }
    }

    /// Finds a validation struct named by `ty` or nested in its generic arguments.
    fn validation_struct_in<'s>(
        &'s self,
        ty: &Type,
        from: &[String],
    ) -> Option<(String, &'s StructDef)> {
        match ty {
            Type::Path(type_path) => {
                let segment = type_path.path.segments.last()?;
                let name = segment.ident.to_string();
                if let Some(def) = self.nearest_validated(&name, from) {
                    return Some((name, def));
                }

                match &segment.arguments {
                    PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| {
                        match arg {
                            GenericArgument::Type(inner) => self.validation_struct_in(inner, from),
                            _ => None,
                        }
                    }),
                    _ => None,
                }
            }
            Type::Reference(reference) => self.validation_struct_in(&reference.elem, from),
            Type::Paren(paren) => self.validation_struct_in(&paren.elem, from),
            Type::Group(group) => self.validation_struct_in(&group.elem, from),
            _ => None,
        }
    }

    /// The validation struct called `name` whose module shares the longest prefix with
    /// `from`. Earlier definitions win ties.
    fn nearest_validated(&self, name: &str, from: &[String]) -> Option<&StructDef> {
        let defs = self.structs.get(name)?;

        defs.iter()
            .filter(|def| self.is_validation_object(name, def, defs))
            .enumerate()
            .max_by_key(|(position, def)| {
                (shared_prefix(&def.module, from), std::cmp::Reverse(*position))
            })
            .map(|(_, def)| def)
    }

    /// A struct is a validation object if it derives `Validate`, or an `impl Validate` for
    /// its name sits in its module or in a module declaring no struct of that name.
    fn is_validation_object(
        &self,
        name: &str,
        def: &StructDef,
        same_name: &[StructDef],
    ) -> bool {
        if def.derives_validate {
            return true;
        }

        self.validate_impls
            .iter()
            .filter(|(_, target)| target.as_str() == name)
            .any(|(module, _)| {
                *module == def.module || !same_name.iter().any(|other| other.module == *module)
            })
    }
}

/// Number of leading segments two module paths have in common
fn shared_prefix(a: &[String], b: &[String]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Module path of a source file: its path components without the `.rs` extension
fn file_module(path: &Path) -> ModulePath {
    path.with_extension("")
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Collects `.rs` files under `root`, recording inaccessible entries as warnings.
fn rust_files(root: &Path, warnings: &mut Vec<String>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        if entry.path() == root {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        !name.starts_with('.') && name != "target"
    });

    for entry in walker {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("rs") {
                    files.push(path.to_path_buf());
                }
            }
            Err(e) => {
                let warning = format!("Failed to access path: {}", e);
                warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }

    files.sort();
    files
}

/// [`RuleProvider`] backed by a [`SourceIndex`].
pub struct SourceRules {
    index: SourceIndex,
}

impl SourceRules {
    pub fn new(index: SourceIndex) -> Self {
        Self { index }
    }

    /// Scans a project directory and builds the provider
    pub fn scan(root: &Path) -> Result<Self> {
        SourceIndex::scan(root).map(Self::new)
    }

    pub fn index(&self) -> &SourceIndex {
        &self.index
    }
}

impl RuleProvider for SourceRules {
    fn validated_fields(&self, handler: &HandlerId) -> Option<Vec<String>> {
        self.index.validated_fields(handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CONTROLLER: &str = r#"
        use axum::Json;
        use serde::Deserialize;
        use validator::Validate;

        #[derive(Debug, Deserialize, Validate)]
        pub struct StoreUserRequest {
            #[validate(length(min = 1))]
            pub name: String,
            #[validate(email)]
            pub email: String,
        }

        #[derive(Debug, Deserialize)]
        pub struct Pagination {
            pub page: u32,
        }

        pub struct UserController;

        impl UserController {
            pub async fn index(&self, query: Query<Pagination>) -> Json<Vec<User>> {
                todo!()
            }

            pub async fn store(&self, Json(payload): Json<StoreUserRequest>) -> Json<User> {
                todo!()
            }

            pub async fn show(&self, id: Path<u64>) -> Json<User> {
                todo!()
            }
        }
    "#;

    fn index_of(sources: &[(&str, &str)]) -> SourceIndex {
        let mut index = SourceIndex::default();
        for (path, content) in sources {
            index.add_source(Path::new(path), content);
        }
        index
    }

    #[test]
    fn test_fields_of_validated_json_parameter() {
        let index = index_of(&[("src/users.rs", CONTROLLER)]);

        assert_eq!(
            index.validated_fields(&HandlerId::new("UserController", "store")),
            Some(vec!["name".to_string(), "email".to_string()])
        );
    }

    #[test]
    fn test_qualified_controller_name_is_reduced() {
        let index = index_of(&[("src/users.rs", CONTROLLER)]);

        assert_eq!(
            index.validated_fields(&HandlerId::new(
                "App\\Http\\Controllers\\UserController",
                "store"
            )),
            Some(vec!["name".to_string(), "email".to_string()])
        );
    }

    #[test]
    fn test_non_validated_parameter_has_no_fields() {
        let index = index_of(&[("src/users.rs", CONTROLLER)]);

        assert_eq!(
            index.validated_fields(&HandlerId::new("UserController", "index")),
            None
        );
        assert_eq!(
            index.validated_fields(&HandlerId::new("UserController", "show")),
            None
        );
    }

    #[test]
    fn test_unknown_handler_has_no_fields() {
        let index = index_of(&[("src/users.rs", CONTROLLER)]);

        assert_eq!(
            index.validated_fields(&HandlerId::new("UserController", "destroy")),
            None
        );
        assert_eq!(
            index.validated_fields(&HandlerId::new("MissingController", "store")),
            None
        );
    }

    #[test]
    fn test_struct_defined_in_another_file() {
        let requests = r#"
            #[derive(serde::Deserialize, validator::Validate)]
            pub struct CreatePost { pub title: String, pub body: String }
        "#;
        let handlers = r#"
            pub async fn create(form: web::Form<CreatePost>) -> HttpResponse { todo!() }
        "#;
        let index = index_of(&[("src/requests.rs", requests), ("src/posts.rs", handlers)]);

        assert_eq!(
            index.validated_fields(&HandlerId::new("posts", "create")),
            Some(vec!["title".to_string(), "body".to_string()])
        );
    }

    #[test]
    fn test_free_function_in_inline_module() {
        let source = r#"
            #[derive(Validate)]
            struct Login { username: String, password: String }

            mod auth {
                pub async fn login(Valid(Json(body)): Valid<Json<Login>>) {}
            }
        "#;
        let index = index_of(&[("src/main.rs", source)]);

        assert_eq!(
            index.validated_fields(&HandlerId::new("crate::auth", "login")),
            Some(vec!["username".to_string(), "password".to_string()])
        );
    }

    #[test]
    fn test_manual_validate_impl_counts() {
        let source = r#"
            pub struct Transfer { pub amount: u64, pub to: String }

            impl Validate for Transfer {
                fn validate(&self) -> Result<(), ValidationErrors> { Ok(()) }
            }

            impl WalletController {
                pub fn transfer(&self, input: Json<Transfer>) {}
            }
        "#;
        let index = index_of(&[("src/wallet.rs", source)]);

        assert_eq!(
            index.validated_fields(&HandlerId::new("WalletController", "transfer")),
            Some(vec!["amount".to_string(), "to".to_string()])
        );
    }

    #[test]
    fn test_last_validated_parameter_wins() {
        let source = r#"
            #[derive(Validate)] struct First { a: String }
            #[derive(Validate)] struct Second { b: String }
            impl MixedController {
                fn update(&self, first: Json<First>, second: Json<Second>) {}
            }
        "#;
        let index = index_of(&[("src/mixed.rs", source)]);

        assert_eq!(
            index.validated_fields(&HandlerId::new("MixedController", "update")),
            Some(vec!["b".to_string()])
        );
    }

    #[test]
    fn test_same_named_plain_struct_does_not_replace_validated_one() {
        let users = r#"
            #[derive(Deserialize, Validate)]
            pub struct CreateRequest { pub name: String, pub email: String }

            impl UserController {
                pub async fn store(&self, Json(body): Json<CreateRequest>) {}
            }
        "#;
        let internal = r#"
            #[derive(Deserialize)]
            pub struct CreateRequest { pub secret_token: String }
        "#;
        let index = index_of(&[("src/a_users.rs", users), ("src/b_internal.rs", internal)]);

        assert_eq!(
            index.validated_fields(&HandlerId::new("UserController", "store")),
            Some(vec!["name".to_string(), "email".to_string()])
        );
    }

    #[test]
    fn test_nearest_validated_struct_wins() {
        let billing = r#"
            #[derive(Validate)]
            pub struct CreateRequest { pub amount: u64 }

            impl InvoiceController {
                pub fn store(&self, input: Json<CreateRequest>) {}
            }
        "#;
        let users = r#"
            #[derive(Validate)]
            pub struct CreateRequest { pub name: String }

            impl UserController {
                pub fn store(&self, input: Json<CreateRequest>) {}
            }
        "#;
        let index = index_of(&[("src/billing.rs", billing), ("src/users.rs", users)]);

        assert_eq!(
            index.validated_fields(&HandlerId::new("InvoiceController", "store")),
            Some(vec!["amount".to_string()])
        );
        assert_eq!(
            index.validated_fields(&HandlerId::new("UserController", "store")),
            Some(vec!["name".to_string()])
        );
    }

    #[test]
    fn test_validate_impl_applies_to_struct_in_its_module() {
        let wallet = r#"
            pub struct Transfer { pub amount: u64 }
            impl Validate for Transfer {
                fn validate(&self) -> Result<(), ValidationErrors> { Ok(()) }
            }
            impl WalletController {
                pub fn transfer(&self, input: Json<Transfer>) {}
            }
        "#;
        let ledger = r#"
            pub struct Transfer { pub ledger_id: u64 }
        "#;
        let index = index_of(&[("src/ledger.rs", ledger), ("src/wallet.rs", wallet)]);

        assert_eq!(
            index.validated_fields(&HandlerId::new("WalletController", "transfer")),
            Some(vec!["amount".to_string()])
        );
    }

    #[test]
    fn test_unparsable_file_is_skipped() {
        let index = index_of(&[("src/broken.rs", "fn broken( {"), ("src/users.rs", CONTROLLER)]);

        assert_eq!(index.warnings().len(), 1);
        assert!(index
            .validated_fields(&HandlerId::new("UserController", "store"))
            .is_some());
    }

    #[test]
    fn test_scan_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src/http")).unwrap();
        fs::create_dir_all(root.join("target/debug")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("src/http/users.rs"), CONTROLLER).unwrap();
        fs::write(root.join("target/debug/users.rs"), "fn broken( {").unwrap();
        fs::write(root.join(".git/hook.rs"), "fn broken( {").unwrap();
        fs::write(root.join("src/readme.md"), "# not rust").unwrap();

        let rules = SourceRules::scan(root).unwrap();

        assert!(rules.index().warnings().is_empty());
        assert_eq!(rules.index().handler_count(), 3);
        assert_eq!(
            rules.validated_fields(&HandlerId::new("UserController", "store")),
            Some(vec!["name".to_string(), "email".to_string()])
        );
    }

    #[test]
    fn test_scan_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = SourceIndex::scan(&temp_dir.path().join("missing"));

        assert!(matches!(result, Err(ExportError::Io { .. })));
    }
}
