//! `syn` front end that turns Rust source text into a [`DeclarationSnapshot`].
//!
//! Structs and enums are the "classes"; methods come from `impl` blocks.
//! Namespaces are module paths joined with `::`, starting from the base
//! namespace the host assigns to each file.

use std::path::{Component, Path};

use quote::ToTokens;
use syn::{GenericArgument, ImplItem, ImplItemFn, Item, ItemImpl, PathArguments, ReturnType, Type};
use tracing::debug;

use super::snapshot::{
    ClassDeclaration, DeclarationSnapshot, MemberDeclaration, MemberKind, SourceDeclarations,
    Visibility,
};
use crate::generation::GenerationError;

/// Traits whose methods are operator overloads rather than service operations
const OPERATOR_TRAITS: &[&str] = &[
    "Add", "Sub", "Mul", "Div", "Rem", "Neg", "Not", "BitAnd", "BitOr", "BitXor", "Shl", "Shr",
    "AddAssign", "SubAssign", "MulAssign", "DivAssign", "RemAssign", "BitAndAssign",
    "BitOrAssign", "BitXorAssign", "ShlAssign", "ShrAssign", "Index", "IndexMut", "Deref",
    "DerefMut", "PartialEq", "PartialOrd",
];

/// Wrappers that still count as "returns Self" for constructor detection
const SELF_WRAPPERS: &[&str] = &["Result", "Option", "Box", "Arc", "Rc"];

/// One Rust source file as handed over by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RustSourceFile {
    pub path: String,
    /// Module path of the file itself, e.g. `acme::services`
    pub namespace: String,
    pub text: String,
}

impl RustSourceFile {
    pub fn new<P, N, T>(path: P, namespace: N, text: T) -> Self
    where
        P: Into<String>,
        N: Into<String>,
        T: Into<String>,
    {
        Self {
            path: path.into(),
            namespace: namespace.into(),
            text: text.into(),
        }
    }
}

/// Builds declaration snapshots from Rust sources
#[derive(Debug, Clone, Copy, Default)]
pub struct RustSourceAnalyzer;

impl RustSourceAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Parse every file and resolve impl blocks against the declared types.
    ///
    /// Files are kept in the order given. An impl block is attached to the
    /// first type with the same name in the same module, wherever it is
    /// declared; impls of types not in the snapshot are dropped.
    pub fn analyze(&self, files: &[RustSourceFile]) -> Result<DeclarationSnapshot, GenerationError> {
        let mut collector = Collector::default();

        for file in files {
            let parsed =
                syn::parse_file(&file.text).map_err(|e| GenerationError::SourceUnparseable {
                    path: file.path.clone(),
                    reason: e.to_string(),
                })?;

            let mut classes = Vec::new();
            collector.visit_items(&parsed.items, &file.namespace, &mut classes);
            debug!(path = %file.path, classes = classes.len(), "Analyzed source file");

            collector.files.push(SourceDeclarations {
                path: file.path.clone(),
                classes,
            });
        }

        Ok(collector.finish())
    }
}

/// Module path for a file below a source root, following Rust's module
/// layout: `lib.rs`, `main.rs` and `mod.rs` name their parent module.
pub fn module_namespace(base: &str, relative_path: &Path) -> String {
    let mut segments: Vec<String> = relative_path
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => part.to_str().map(str::to_string),
            _ => None,
        })
        .collect();

    if let Some(file_name) = segments.pop() {
        let stem = file_name.strip_suffix(".rs").unwrap_or(&file_name);
        if !matches!(stem, "lib" | "main" | "mod") {
            segments.push(stem.to_string());
        }
    }

    segments
        .iter()
        .fold(base.to_string(), |namespace, segment| join_namespace(&namespace, segment))
}

fn join_namespace(namespace: &str, segment: &str) -> String {
    if namespace.is_empty() {
        segment.to_string()
    } else {
        format!("{namespace}::{segment}")
    }
}

struct PendingImpl {
    namespace: String,
    type_name: String,
    members: Vec<MemberDeclaration>,
}

#[derive(Default)]
struct Collector {
    files: Vec<SourceDeclarations>,
    impls: Vec<PendingImpl>,
}

impl Collector {
    fn visit_items(&mut self, items: &[Item], namespace: &str, classes: &mut Vec<ClassDeclaration>) {
        for item in items {
            match item {
                Item::Struct(item) => {
                    classes.push(class_declaration(&item.ident, &item.vis, namespace))
                }
                Item::Enum(item) => {
                    classes.push(class_declaration(&item.ident, &item.vis, namespace))
                }
                Item::Impl(block) => {
                    if let Some(pending) = pending_impl(block, namespace) {
                        self.impls.push(pending);
                    }
                }
                Item::Mod(module) => {
                    if let Some((_, nested)) = &module.content {
                        let nested_namespace = join_namespace(namespace, &module.ident.to_string());
                        self.visit_items(nested, &nested_namespace, classes);
                    }
                }
                _ => {}
            }
        }
    }

    fn finish(self) -> DeclarationSnapshot {
        let Collector { mut files, impls } = self;

        for pending in impls {
            let target = files
                .iter_mut()
                .flat_map(|file| file.classes.iter_mut())
                .find(|class| class.namespace == pending.namespace && class.name == pending.type_name);

            match target {
                Some(class) => class.members.extend(pending.members),
                None => debug!(
                    namespace = %pending.namespace,
                    type_name = %pending.type_name,
                    "Dropping impl block for a type outside the snapshot"
                ),
            }
        }

        DeclarationSnapshot::new(files)
    }
}

fn class_declaration(ident: &syn::Ident, vis: &syn::Visibility, namespace: &str) -> ClassDeclaration {
    ClassDeclaration {
        name: ident.to_string(),
        namespace: namespace.to_string(),
        visibility: visibility(vis),
        members: Vec::new(),
    }
}

fn visibility(vis: &syn::Visibility) -> Visibility {
    match vis {
        syn::Visibility::Public(_) => Visibility::Public,
        syn::Visibility::Restricted(_) => Visibility::Restricted,
        syn::Visibility::Inherited => Visibility::Private,
    }
}

fn pending_impl(block: &ItemImpl, namespace: &str) -> Option<PendingImpl> {
    let type_name = type_name(&block.self_ty)?;

    let trait_kind = block.trait_.as_ref().map(|(_, path, _)| {
        let is_operator = path
            .segments
            .last()
            .is_some_and(|segment| OPERATOR_TRAITS.contains(&segment.ident.to_string().as_str()));
        if is_operator {
            MemberKind::Operator
        } else {
            MemberKind::TraitImpl
        }
    });

    let members = block
        .items
        .iter()
        .filter_map(|item| match item {
            ImplItem::Fn(method) => Some(member_declaration(method, &type_name, trait_kind)),
            _ => None,
        })
        .collect();

    Some(PendingImpl {
        namespace: namespace.to_string(),
        type_name,
        members,
    })
}

fn member_declaration(
    method: &ImplItemFn,
    type_name: &str,
    trait_kind: Option<MemberKind>,
) -> MemberDeclaration {
    // Trait methods are as visible as the trait itself.
    let (kind, visibility) = match trait_kind {
        Some(kind) => (kind, Visibility::Public),
        None => (method_kind(&method.sig, type_name), visibility(&method.vis)),
    };

    MemberDeclaration {
        name: method.sig.ident.to_string(),
        kind,
        visibility,
        return_type: metadata_name(&method.sig.output),
    }
}

fn method_kind(sig: &syn::Signature, type_name: &str) -> MemberKind {
    if sig.receiver().is_some() {
        return MemberKind::Ordinary;
    }
    match &sig.output {
        ReturnType::Type(_, ty) if returns_self(ty, type_name) => MemberKind::Constructor,
        _ => MemberKind::Ordinary,
    }
}

fn returns_self(ty: &Type, type_name: &str) -> bool {
    match ty {
        Type::Path(path) if path.qself.is_none() => {
            let Some(segment) = path.path.segments.last() else {
                return false;
            };
            if segment.ident == "Self" || segment.ident == type_name {
                return true;
            }
            if !SELF_WRAPPERS.contains(&segment.ident.to_string().as_str()) {
                return false;
            }
            match &segment.arguments {
                PathArguments::AngleBracketed(args) => matches!(
                    args.args.first(),
                    Some(GenericArgument::Type(inner)) if returns_self(inner, type_name)
                ),
                _ => false,
            }
        }
        Type::Paren(inner) => returns_self(&inner.elem, type_name),
        Type::Group(inner) => returns_self(&inner.elem, type_name),
        _ => false,
    }
}

fn type_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(path) => path.path.segments.last().map(|s| s.ident.to_string()),
        Type::Paren(inner) => type_name(&inner.elem),
        Type::Group(inner) => type_name(&inner.elem),
        _ => None,
    }
}

/// Opaque return type name: last path segment without generics, `()` for
/// unit, token text for anything else.
pub fn metadata_name(output: &ReturnType) -> String {
    match output {
        ReturnType::Default => "()".to_string(),
        ReturnType::Type(_, ty) => type_metadata_name(ty),
    }
}

fn type_metadata_name(ty: &Type) -> String {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
            .unwrap_or_default(),
        Type::Reference(reference) => type_metadata_name(&reference.elem),
        Type::Paren(inner) => type_metadata_name(&inner.elem),
        Type::Group(inner) => type_metadata_name(&inner.elem),
        Type::Tuple(tuple) if tuple.elems.is_empty() => "()".to_string(),
        other => other.to_token_stream().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const BILLING: &str = r#"
        use std::fmt;

        pub struct Billing {
            rate: u32,
        }

        impl Billing {
            pub fn new(rate: u32) -> Self {
                Self { rate }
            }

            pub fn try_from_env() -> Result<Billing, String> {
                Ok(Self { rate: 1 })
            }

            pub fn charge(&self, amount: u32) -> Receipt {
                Receipt(amount * self.rate)
            }

            pub fn refund(&mut self) {}

            pub fn currencies() -> Vec<&'static str> {
                vec!["EUR"]
            }

            pub(crate) fn audit(&self) -> bool {
                true
            }

            fn recompute(&self) -> u32 {
                self.rate
            }
        }

        impl fmt::Display for Billing {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "billing")
            }
        }

        impl std::ops::Add for Billing {
            type Output = Billing;
            fn add(self, other: Billing) -> Billing {
                Billing { rate: self.rate + other.rate }
            }
        }

        pub struct Receipt(u32);

        struct Hidden;

        pub(crate) enum Internal {
            A,
        }
    "#;

    fn analyze(files: &[RustSourceFile]) -> DeclarationSnapshot {
        RustSourceAnalyzer::new().analyze(files).unwrap()
    }

    fn find<'a>(snapshot: &'a DeclarationSnapshot, name: &str) -> &'a ClassDeclaration {
        snapshot.classes().find(|c| c.name == name).unwrap()
    }

    #[test]
    fn test_classes_and_visibility() {
        let snapshot = analyze(&[RustSourceFile::new("billing.rs", "acme::services", BILLING)]);

        let classes: Vec<_> = snapshot
            .classes()
            .map(|c| (c.name.as_str(), c.visibility))
            .collect();
        assert_eq!(
            classes,
            vec![
                ("Billing", Visibility::Public),
                ("Receipt", Visibility::Public),
                ("Hidden", Visibility::Private),
                ("Internal", Visibility::Restricted),
            ]
        );
        assert!(snapshot.classes().all(|c| c.namespace == "acme::services"));
    }

    #[test]
    fn test_member_kinds() {
        let snapshot = analyze(&[RustSourceFile::new("billing.rs", "acme::services", BILLING)]);
        let billing = find(&snapshot, "Billing");

        let members: Vec<_> = billing
            .members
            .iter()
            .map(|m| (m.name.as_str(), m.kind, m.visibility))
            .collect();
        assert_eq!(
            members,
            vec![
                ("new", MemberKind::Constructor, Visibility::Public),
                ("try_from_env", MemberKind::Constructor, Visibility::Public),
                ("charge", MemberKind::Ordinary, Visibility::Public),
                ("refund", MemberKind::Ordinary, Visibility::Public),
                ("currencies", MemberKind::Ordinary, Visibility::Public),
                ("audit", MemberKind::Ordinary, Visibility::Restricted),
                ("recompute", MemberKind::Ordinary, Visibility::Private),
                ("fmt", MemberKind::TraitImpl, Visibility::Public),
                ("add", MemberKind::Operator, Visibility::Public),
            ]
        );
    }

    #[test]
    fn test_return_type_metadata_names() {
        let snapshot = analyze(&[RustSourceFile::new("billing.rs", "acme::services", BILLING)]);
        let billing = find(&snapshot, "Billing");
        let return_type = |name: &str| {
            billing
                .members
                .iter()
                .find(|m| m.name == name)
                .map(|m| m.return_type.clone())
                .unwrap()
        };

        assert_eq!(return_type("charge"), "Receipt");
        assert_eq!(return_type("refund"), "()");
        assert_eq!(return_type("currencies"), "Vec");
        assert_eq!(return_type("audit"), "bool");
        assert_eq!(return_type("fmt"), "Result");
    }

    #[test]
    fn test_inline_modules_extend_namespace() {
        let source = r#"
            pub mod billing {
                pub struct Invoice;
                impl Invoice {
                    pub fn total(&self) -> u64 { 0 }
                }
            }
        "#;
        let snapshot = analyze(&[RustSourceFile::new("lib.rs", "acme", source)]);
        let invoice = find(&snapshot, "Invoice");

        assert_eq!(invoice.namespace, "acme::billing");
        assert_eq!(invoice.members.len(), 1);
        assert_eq!(invoice.members[0].name, "total");
    }

    #[test]
    fn test_impl_blocks_resolve_across_files() {
        let types = RustSourceFile::new("types.rs", "acme::services", "pub struct Ledger;");
        let methods = RustSourceFile::new(
            "ledger_impl.rs",
            "acme::services",
            "impl Ledger { pub fn balance(&self) -> i64 { 0 } }",
        );
        let orphan = RustSourceFile::new(
            "orphan.rs",
            "acme::services",
            "impl Unknown { pub fn nothing(&self) {} }",
        );

        let snapshot = analyze(&[types, methods, orphan]);
        let ledger = find(&snapshot, "Ledger");
        assert_eq!(ledger.members[0].name, "balance");
        assert_eq!(snapshot.classes().count(), 1);
    }

    #[test]
    fn test_generic_impl_resolves_by_type_name() {
        let source = r#"
            pub struct Cache<T>(Vec<T>);
            impl<T: Clone> Cache<T> {
                pub fn with_capacity(n: usize) -> Self { Cache(Vec::with_capacity(n)) }
                pub fn first(&self) -> Option<&T> { self.0.first() }
            }
        "#;
        let snapshot = analyze(&[RustSourceFile::new("cache.rs", "acme", source)]);
        let cache = find(&snapshot, "Cache");

        assert_eq!(cache.members[0].kind, MemberKind::Constructor);
        assert_eq!(cache.members[1].kind, MemberKind::Ordinary);
        assert_eq!(cache.members[1].return_type, "Option");
    }

    #[test]
    fn test_unparseable_source() {
        let files = [RustSourceFile::new("broken.rs", "acme", "pub struct {")];
        let err = RustSourceAnalyzer::new().analyze(&files).unwrap_err();

        match err {
            GenerationError::SourceUnparseable { path, .. } => assert_eq!(path, "broken.rs"),
            other => panic!("Expected SourceUnparseable, got {other:?}"),
        }
    }

    #[test]
    fn test_module_namespace() {
        assert_eq!(module_namespace("acme", &PathBuf::from("lib.rs")), "acme");
        assert_eq!(
            module_namespace("acme", &PathBuf::from("services/mod.rs")),
            "acme::services"
        );
        assert_eq!(
            module_namespace("acme", &PathBuf::from("services/billing.rs")),
            "acme::services::billing"
        );
        assert_eq!(module_namespace("", &PathBuf::from("billing.rs")), "billing");
    }
}
