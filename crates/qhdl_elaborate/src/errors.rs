//! Diagnostic codes and helper functions for elaboration errors and warnings.
//!
//! Codes `E200`--`E204` cover names and design structure, `E300`--`E304`
//! generics, `E400`--`E405` connectivity and `E500`--`E503` hierarchy and
//! net validation. `E401` and `E405` become `W401` and `W405` when the
//! configured port severity is `warning`. `E900` marks a bug in the
//! elaborator itself.

use qhdl_common::InternalError;
use qhdl_config::PortSeverity;
use qhdl_diagnostics::{Category, Diagnostic, DiagnosticCode, Label};
use qhdl_source::Span;

/// Duplicate name in a library or declarative region.
pub const E200: DiagnosticCode = DiagnosticCode::new(Category::Error, 200);

/// Reference to an unknown name.
pub const E201: DiagnosticCode = DiagnosticCode::new(Category::Error, 201);

/// Instance of a component that is not declared.
pub const E202: DiagnosticCode = DiagnosticCode::new(Category::Error, 202);

/// Missing or ambiguous architecture.
pub const E203: DiagnosticCode = DiagnosticCode::new(Category::Error, 203);

/// Component declaration does not match the registered entity.
pub const E204: DiagnosticCode = DiagnosticCode::new(Category::Error, 204);

/// Generic value does not fit the declared type.
pub const E300: DiagnosticCode = DiagnosticCode::new(Category::Error, 300);

/// Generic with neither a mapped value nor a default.
pub const E301: DiagnosticCode = DiagnosticCode::new(Category::Error, 301);

/// Generic map entry naming no declared generic.
pub const E302: DiagnosticCode = DiagnosticCode::new(Category::Error, 302);

/// Generic declared with an unsupported type.
pub const E303: DiagnosticCode = DiagnosticCode::new(Category::Error, 303);

/// Generic expression cannot be evaluated.
pub const E304: DiagnosticCode = DiagnosticCode::new(Category::Error, 304);

/// Port map or assignment refers to something that cannot be connected.
pub const E400: DiagnosticCode = DiagnosticCode::new(Category::Error, 400);

/// Port left unconnected.
pub const E401: DiagnosticCode = DiagnosticCode::new(Category::Error, 401);

/// Port connected against its direction.
pub const E402: DiagnosticCode = DiagnosticCode::new(Category::Error, 402);

/// Connection between different port or signal types.
pub const E403: DiagnosticCode = DiagnosticCode::new(Category::Error, 403);

/// Formal associated more than once.
pub const E404: DiagnosticCode = DiagnosticCode::new(Category::Error, 404);

/// Net with receivers but no driver.
pub const E405: DiagnosticCode = DiagnosticCode::new(Category::Error, 405);

/// Entity instantiates itself directly or transitively.
pub const E500: DiagnosticCode = DiagnosticCode::new(Category::Error, 500);

/// Hierarchy deeper than `max_expansion_depth`.
pub const E501: DiagnosticCode = DiagnosticCode::new(Category::Error, 501);

/// More than one driver on a net.
pub const E502: DiagnosticCode = DiagnosticCode::new(Category::Error, 502);

/// Cycle between leaf instances.
pub const E503: DiagnosticCode = DiagnosticCode::new(Category::Error, 503);

/// Invariant violation inside the elaborator.
pub const E900: DiagnosticCode = DiagnosticCode::new(Category::Error, 900);

/// Builds a diagnostic whose severity follows the configured port severity.
fn configurable(
    code: DiagnosticCode,
    severity: PortSeverity,
    message: String,
    span: Span,
) -> Diagnostic {
    match severity {
        PortSeverity::Error => Diagnostic::error(code, message, span),
        PortSeverity::Warning => Diagnostic::warning(code.as_warning(), message, span),
    }
}

/// Creates a diagnostic for a name declared twice.
pub fn error_duplicate(kind: &str, name: &str, span: Span, prev_span: Span) -> Diagnostic {
    Diagnostic::error(E200, format!("duplicate {kind} `{name}`"), span)
        .with_label(Label::secondary(prev_span, "first declared here"))
}

/// Creates a diagnostic for an unknown name.
pub fn error_unknown_name(kind: &str, name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E201, format!("unknown {kind} `{name}`"), span)
}

/// Creates a diagnostic for a top entity that is not in the library.
pub fn error_top_not_found(name: &str) -> Diagnostic {
    error_unknown_name("top entity", name, Span::DUMMY)
        .with_help("set `project.top` in qhdl.toml to the name of a registered entity")
}

/// Creates a diagnostic for an instance of an undeclared component.
pub fn error_unresolved_component(component: &str, label: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        E202,
        format!("instance `{label}` refers to undeclared component `{component}`"),
        span,
    )
    .with_help(format!("declare `component {component}` in the architecture"))
}

/// Creates a diagnostic when an entity has no architecture to elaborate.
pub fn error_no_architecture(entity: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E203, format!("no architecture found for entity `{entity}`"), span)
}

/// Creates a diagnostic when the architecture choice is ambiguous or names no body.
pub fn error_ambiguous_architecture(entity: &str, candidates: &[String], span: Span) -> Diagnostic {
    Diagnostic::error(
        E203,
        format!("cannot choose an architecture for entity `{entity}`"),
        span,
    )
    .with_note(format!("candidates: {}", candidates.join(", ")))
    .with_help("set `elaborate.architecture = \"named:<name>\"` in qhdl.toml")
}

/// Creates a diagnostic for an explicitly selected architecture that does not exist.
pub fn error_unknown_architecture(entity: &str, wanted: &str, candidates: &[String], span: Span) -> Diagnostic {
    Diagnostic::error(
        E203,
        format!("entity `{entity}` has no architecture named `{wanted}`"),
        span,
    )
    .with_note(format!("candidates: {}", candidates.join(", ")))
}

/// Creates a diagnostic for a component whose shape differs from its entity.
pub fn error_component_mismatch(component: &str, detail: &str, span: Span, entity_span: Span) -> Diagnostic {
    Diagnostic::error(
        E204,
        format!("component `{component}` does not match its entity: {detail}"),
        span,
    )
    .with_label(Label::secondary(entity_span, "entity declared here"))
}

/// Creates a diagnostic for a generic value of the wrong type.
pub fn error_generic_type(generic: &str, expected: &str, found: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        E300,
        format!("generic `{generic}` expects {expected}, found {found}"),
        span,
    )
}

/// Creates a diagnostic for a generic without a value.
pub fn error_unresolved_generic(generic: &str, instance: &str, span: Span, decl_span: Span) -> Diagnostic {
    Diagnostic::error(
        E301,
        format!("generic `{generic}` of `{instance}` has no value"),
        span,
    )
    .with_label(Label::secondary(decl_span, "declared without a default"))
    .with_help(format!("map it with `generic map ({generic} => ...)` or give it a default"))
}

/// Creates a diagnostic for a generic map entry naming no declared generic.
pub fn error_unknown_generic(generic: &str, component: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        E302,
        format!("component `{component}` has no generic `{generic}`"),
        span,
    )
}

/// Creates a diagnostic for too many positional generic associations.
pub fn error_too_many_generics(component: &str, declared: usize, span: Span) -> Diagnostic {
    Diagnostic::error(
        E302,
        format!("too many generic associations: component `{component}` declares {declared}"),
        span,
    )
}

/// Creates a diagnostic for a generic type outside the supported set.
pub fn error_unsupported_generic_type(generic: &str, ty: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        E303,
        format!("generic `{generic}` has unsupported type `{ty}`"),
        span,
    )
    .with_note("supported generic types are real, integer, boolean and string")
}

/// Creates a diagnostic for an expression that cannot be evaluated.
pub fn error_eval(msg: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E304, format!("cannot evaluate generic expression: {msg}"), span)
}

/// Creates a diagnostic for a port map formal that is not a component port.
pub fn error_unknown_port(port: &str, component: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E400, format!("component `{component}` has no port `{port}`"), span)
}

/// Creates a diagnostic for an actual or assignment operand that is not connectable.
pub fn error_unknown_connection(msg: impl Into<String>, span: Span) -> Diagnostic {
    Diagnostic::error(E400, msg, span)
}

/// Creates a diagnostic for a port left unassociated on an instance.
pub fn unconnected_port(port: &str, owner: &str, severity: PortSeverity, span: Span) -> Diagnostic {
    configurable(
        E401,
        severity,
        format!("port `{port}` of `{owner}` is not connected"),
        span,
    )
}

/// Creates a diagnostic for a direction violation.
pub fn error_direction(msg: impl Into<String>, span: Span) -> Diagnostic {
    Diagnostic::error(E402, msg, span)
}

/// Creates a diagnostic for connecting different types.
pub fn error_connection_type(what: &str, expected: &str, found: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        E403,
        format!("type mismatch on {what}: expected `{expected}`, found `{found}`"),
        span,
    )
}

/// Creates a diagnostic for a formal associated twice.
pub fn error_duplicate_association(formal: &str, span: Span, prev_span: Span) -> Diagnostic {
    Diagnostic::error(E404, format!("`{formal}` is associated more than once"), span)
        .with_label(Label::secondary(prev_span, "first associated here"))
}

/// Creates a diagnostic for a net with receivers but no driver.
pub fn undriven_net(net: &str, severity: PortSeverity, span: Span) -> Diagnostic {
    configurable(E405, severity, format!("net `{net}` has no driver"), span)
}

/// Creates a diagnostic for recursive instantiation.
pub fn error_recursive(entity: &str, cycle: &[String], span: Span) -> Diagnostic {
    Diagnostic::error(
        E500,
        format!("recursive instantiation of entity `{entity}`"),
        span,
    )
    .with_note(format!("instantiation chain: {}", cycle.join(" -> ")))
}

/// Creates a diagnostic for hierarchy deeper than the configured limit.
pub fn error_depth_exceeded(path: &str, limit: u32, span: Span) -> Diagnostic {
    Diagnostic::error(
        E501,
        format!("expanding `{path}` exceeds the maximum depth of {limit}"),
        span,
    )
    .with_help("raise `elaborate.max_expansion_depth` in qhdl.toml")
}

/// Creates a diagnostic for a net with several drivers.
pub fn error_driver_conflict(net: &str, drivers: &[(String, Span)], span: Span) -> Diagnostic {
    let mut diag = Diagnostic::error(
        E502,
        format!("net `{net}` has {} drivers", drivers.len()),
        span,
    );
    for (name, span) in drivers {
        diag = diag.with_label(Label::secondary(*span, format!("driven by `{name}`")));
    }
    diag.with_help("set `elaborate.allow_multi_driver = true` to permit this")
}

/// Creates a diagnostic for a cycle between leaf instances.
pub fn error_feedback(leaves: &[String], span: Span) -> Diagnostic {
    Diagnostic::error(
        E503,
        format!("feedback loop between {}", leaves.join(", ")),
        span,
    )
    .with_help("set `elaborate.allow_feedback = true` to permit this")
}

/// Reports an [`InternalError`] as a diagnostic.
pub fn error_internal(err: &InternalError) -> Diagnostic {
    Diagnostic::error(E900, err.to_string(), Span::DUMMY)
        .with_note("this is a bug in the elaborator, not in the design")
}
