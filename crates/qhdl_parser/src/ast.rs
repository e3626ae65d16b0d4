//! Abstract syntax tree for QHDL design files.
//!
//! Every node carries the [`Span`] it was parsed from. Names are stored as
//! [`Name`]s, so lookups downstream compare case-insensitively while the
//! original spelling is kept for output.

use qhdl_common::Name;
use qhdl_source::Span;
use serde::{Deserialize, Serialize};

/// One parsed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignFile {
    /// `library` and `use` clauses, in source order.
    pub context: Vec<ContextItem>,
    /// Entities and architectures, in source order.
    pub units: Vec<DesignUnit>,
    /// Whole file.
    pub span: Span,
}

impl DesignFile {
    /// The entity declarations in this file.
    pub fn entities(&self) -> impl Iterator<Item = &EntityDecl> {
        self.units.iter().filter_map(|u| match u {
            DesignUnit::Entity(e) => Some(e),
            DesignUnit::Architecture(_) => None,
        })
    }

    /// The architecture bodies in this file.
    pub fn architectures(&self) -> impl Iterator<Item = &ArchitectureBody> {
        self.units.iter().filter_map(|u| match u {
            DesignUnit::Architecture(a) => Some(a),
            DesignUnit::Entity(_) => None,
        })
    }
}

/// A context clause. Parsed and kept, but it does not affect elaboration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ContextItem {
    /// `library a, b;`
    Library {
        /// Library names.
        names: Vec<Name>,
        /// Clause span.
        span: Span,
    },
    /// `use a.b.all;`
    Use {
        /// Selected name prefix.
        path: Vec<Name>,
        /// Whether the name ends in `.all`.
        all: bool,
        /// Clause span.
        span: Span,
    },
}

/// A top-level design unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DesignUnit {
    /// `entity ... end;`
    Entity(EntityDecl),
    /// `architecture ... end;`
    Architecture(ArchitectureBody),
}

/// An entity: the external interface of a circuit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDecl {
    /// Entity name.
    pub name: Name,
    /// Generics, one entry per declared name.
    pub generics: Vec<GenericDecl>,
    /// Ports, one entry per declared name.
    pub ports: Vec<PortDecl>,
    /// Whole declaration.
    pub span: Span,
    /// Span of the name after `entity`.
    pub name_span: Span,
}

/// A generic parameter declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericDecl {
    /// Generic name.
    pub name: Name,
    /// Declared type name, e.g. `real`.
    pub ty: Name,
    /// Default value expression.
    pub default: Option<Expr>,
    /// Span of the name.
    pub span: Span,
}

/// Port direction as written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortMode {
    /// `in`
    In,
    /// `out`
    Out,
}

/// A port declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortDecl {
    /// Port name.
    pub name: Name,
    /// Direction.
    pub mode: PortMode,
    /// Type name, e.g. `fieldmode`.
    pub ty: Name,
    /// Span of the name.
    pub span: Span,
}

/// An architecture: one structural body of an entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchitectureBody {
    /// Architecture name.
    pub name: Name,
    /// Name of the entity this body implements.
    pub entity: Name,
    /// Component declarations.
    pub components: Vec<ComponentDecl>,
    /// Signal declarations, one entry per declared name.
    pub signals: Vec<SignalDecl>,
    /// Component instances.
    pub instances: Vec<Instance>,
    /// `target <= source;` aliases.
    pub assignments: Vec<Assignment>,
    /// Whole body.
    pub span: Span,
    /// Span of the architecture name.
    pub name_span: Span,
    /// Span of the entity name after `of`.
    pub entity_span: Span,
}

/// A component declaration inside an architecture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentDecl {
    /// Component name.
    pub name: Name,
    /// Declared generics.
    pub generics: Vec<GenericDecl>,
    /// Declared ports.
    pub ports: Vec<PortDecl>,
    /// Span of the name.
    pub span: Span,
}

/// An internal signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalDecl {
    /// Signal name.
    pub name: Name,
    /// Type name.
    pub ty: Name,
    /// Span of the name.
    pub span: Span,
}

/// A labelled component instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    /// Instance label.
    pub label: Name,
    /// Referenced component.
    pub component: Name,
    /// `generic map (...)` entries.
    pub generic_map: Vec<Association>,
    /// `port map (...)` entries.
    pub port_map: Vec<Association>,
    /// Whole statement.
    pub span: Span,
    /// Span of the label.
    pub label_span: Span,
    /// Span of the component name.
    pub component_span: Span,
}

/// One entry of a generic or port map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Association {
    /// The formal name for `formal => actual`, or `None` when positional.
    pub formal: Option<(Name, Span)>,
    /// The associated value.
    pub actual: Actual,
    /// Whole entry.
    pub span: Span,
}

impl Association {
    /// The actual as a bare name, if it is one.
    pub fn actual_name(&self) -> Option<Name> {
        match &self.actual {
            Actual::Expr(expr) => expr.as_name(),
            Actual::Open => None,
        }
    }
}

/// Right-hand side of an association.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Actual {
    /// An expression; in a port map this must be a plain name.
    Expr(Expr),
    /// `open`
    Open,
}

/// `target <= source;`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    /// Left-hand name.
    pub target: Name,
    /// Span of the target.
    pub target_span: Span,
    /// Right-hand name.
    pub source: Name,
    /// Span of the source.
    pub source_span: Span,
    /// Whole statement.
    pub span: Span,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// `+`
    Plus,
    /// `-`
    Neg,
}

/// A generic value expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expr {
    /// Integer literal.
    Int {
        /// Value.
        value: i64,
        /// Span.
        span: Span,
    },
    /// Real literal.
    Real {
        /// Value.
        value: f64,
        /// Span.
        span: Span,
    },
    /// String literal with `""` escapes resolved.
    Str {
        /// Value.
        value: String,
        /// Span.
        span: Span,
    },
    /// A reference to a name, such as an enclosing generic or a signal.
    Name {
        /// Referenced name.
        name: Name,
        /// Span.
        span: Span,
    },
    /// `op operand`
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
        /// Span.
        span: Span,
    },
    /// `lhs op rhs`
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
        /// Span.
        span: Span,
    },
    /// `( inner )`
    Paren {
        /// Inner expression.
        inner: Box<Expr>,
        /// Span including the parentheses.
        span: Span,
    },
}

impl Expr {
    /// Source span of the expression.
    pub fn span(&self) -> Span {
        match self {
            Expr::Int { span, .. }
            | Expr::Real { span, .. }
            | Expr::Str { span, .. }
            | Expr::Name { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Paren { span, .. } => *span,
        }
    }

    /// The name if this expression is a bare identifier, looking through parentheses.
    pub fn as_name(&self) -> Option<Name> {
        match self {
            Expr::Name { name, .. } => Some(*name),
            Expr::Paren { inner, .. } => inner.as_name(),
            _ => None,
        }
    }
}
