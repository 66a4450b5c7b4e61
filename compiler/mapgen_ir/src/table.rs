//! Table declarations and their properties.

use crate::{DeclId, Expr, Span, Type};

/// A compile-time constant argument value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConstValue {
    Int(i128),
    Bool(bool),
    Str(String),
    /// An argument the front end could not fold to a constant.
    Unevaluated(Expr),
}

/// An extern object instantiated by a constructor call, e.g. `hash_table(1024)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExternInstance {
    pub type_name: String,
    pub args: Vec<(String, ConstValue)>,
    pub span: Span,
}

impl ExternInstance {
    pub fn new(type_name: impl Into<String>, span: Span) -> Self {
        ExternInstance {
            type_name: type_name.into(),
            args: Vec::new(),
            span,
        }
    }

    #[must_use]
    pub fn with_arg(mut self, name: impl Into<String>, value: ConstValue) -> Self {
        self.args.push((name.into(), value));
        self
    }

    /// Constructor argument bound to parameter `name`.
    pub fn arg(&self, name: &str) -> Option<&ConstValue> {
        self.args.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/// Value of a table property.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyValue {
    /// An expression that is not a constructor call.
    Expression(Expr),
    /// A constructor call that evaluated to an extern instance.
    Extern(ExternInstance),
    /// A constructor call that did not evaluate to an extern instance.
    UnresolvedConstructor(Expr),
    /// A non-expression value (key list, action list, entries).
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Property {
    pub name: String,
    pub value: PropertyValue,
    pub span: Span,
}

/// One element of a table key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyElement {
    pub expr: Expr,
    pub ty: Type,
    /// Match kind as declared in the source (`exact`, `lpm`, ...).
    pub match_kind: String,
    pub span: Span,
}

impl KeyElement {
    pub fn new(expr: Expr, ty: Type, match_kind: impl Into<String>) -> Self {
        KeyElement {
            expr,
            ty,
            match_kind: match_kind.into(),
            span: Span::DUMMY,
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

/// A reference from a table's action list to an action declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ActionRef {
    pub decl: DeclId,
    pub span: Span,
}

/// A key/action binding known at compile time.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StaticEntry {
    /// One expression per key element, in key order.
    pub keys: Vec<Expr>,
    /// Call of one of the table's actions with its arguments.
    pub action: Expr,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TableDecl {
    /// Source name.
    pub name: String,
    /// Instance name used for generated maps and types.
    pub external_name: String,
    /// `None` when the table declares no `key` property.
    pub key: Option<Vec<KeyElement>>,
    pub actions: Vec<ActionRef>,
    pub default_action: Option<Expr>,
    pub entries: Option<Vec<StaticEntry>>,
    pub properties: Vec<Property>,
    pub span: Span,
}

impl TableDecl {
    pub fn new(name: impl Into<String>, external_name: impl Into<String>) -> Self {
        TableDecl {
            name: name.into(),
            external_name: external_name.into(),
            key: None,
            actions: Vec::new(),
            default_action: None,
            entries: None,
            properties: Vec::new(),
            span: Span::DUMMY,
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: Vec<KeyElement>) -> Self {
        self.key = Some(key);
        self
    }

    #[must_use]
    pub fn with_action(mut self, decl: DeclId) -> Self {
        self.actions.push(ActionRef {
            decl,
            span: Span::DUMMY,
        });
        self
    }

    #[must_use]
    pub fn with_default_action(mut self, call: Expr) -> Self {
        self.default_action = Some(call);
        self
    }

    #[must_use]
    pub fn with_entry(mut self, entry: StaticEntry) -> Self {
        self.entries.get_or_insert_with(Vec::new).push(entry);
        self
    }

    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.push(Property {
            name: name.into(),
            value,
            span: Span::DUMMY,
        });
        self
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}
