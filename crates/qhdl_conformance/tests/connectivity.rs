//! Port binding, net validation and feedback detection.

use qhdl_conformance::{full_pipeline, full_pipeline_with};
use qhdl_config::{ElaborationOptions, PortSeverity};
use qhdl_diagnostics::Severity;
use qhdl_elaborate::errors::{E200, E400, E401, E402, E403, E404, E405, E502, E503};
use qhdl_netlist::Endpoint;

fn lenient() -> ElaborationOptions {
    ElaborationOptions {
        unconnected_port_severity: PortSeverity::Warning,
        ..ElaborationOptions::default()
    }
}

const TWO_SOURCES: &str = "
entity T is port (o : out f); end;
architecture s of T is
    component Src is port (y : out f); end component;
begin
    A : Src port map (y => o);
    B : Src port map (y => o);
end;
";

#[test]
fn two_drivers_on_one_output() {
    let result = full_pipeline(TWO_SOURCES, "T");
    assert_eq!(result.codes(), vec![E502]);
    assert_eq!(result.diagnostics[0].labels.len(), 2);
    assert!(result.render().contains("driven by `A.y`"));
}

#[test]
fn multiple_drivers_when_allowed() {
    let options = ElaborationOptions {
        allow_multi_driver: true,
        ..ElaborationOptions::default()
    };
    let result = full_pipeline_with(TWO_SOURCES, "T", &options);
    let graph = result.expect_graph();
    let output = Endpoint::TopPort { port: "o".into() };
    assert_eq!(graph.drivers_of(&output).count(), 2);
}

const RING: &str = "
entity Ring is end;
architecture s of Ring is
    component Delay is port (a : in f; b : out f); end component;
    signal s1, s2 : f;
begin
    L1 : Delay port map (a => s1, b => s2);
    L2 : Delay port map (a => s2, b => s1);
end;
";

#[test]
fn feedback_is_allowed_by_default() {
    let result = full_pipeline(RING, "Ring");
    let graph = result.expect_graph();
    assert_eq!(graph.edges.len(), 2);
}

#[test]
fn feedback_rejected_when_disallowed() {
    let options = ElaborationOptions {
        allow_feedback: false,
        ..ElaborationOptions::default()
    };
    let result = full_pipeline_with(RING, "Ring", &options);
    assert_eq!(result.codes(), vec![E503]);
    assert_eq!(result.diagnostics[0].message, "feedback loop between L1, L2");
}

#[test]
fn acyclic_design_passes_feedback_check() {
    let src = "
entity T is port (i : in f; o : out f); end;
architecture s of T is
    component Delay is port (a : in f; b : out f); end component;
    signal mid : f;
begin
    L1 : Delay port map (i, mid);
    L2 : Delay port map (mid, o);
end;
";
    let options = ElaborationOptions {
        allow_feedback: false,
        ..ElaborationOptions::default()
    };
    assert!(!full_pipeline_with(src, "T", &options).has_errors);
}

const IFACE: &str = "
entity T is port (i : in f; o : out f); end;
architecture s of T is
    component C is port (a : in f; b : out f); end component;
    signal s : f;
    signal g : other;
begin
    BODY
end;
";

fn body(stmt: &str) -> String {
    IFACE.replace("BODY", stmt)
}

#[test]
fn instance_direction_rules() {
    let result = full_pipeline(&body("U : C port map (a => o, b => i);"), "T");
    assert_eq!(result.codes(), vec![E402, E402]);
    assert!(result.diagnostics[0].message.contains("cannot read output port `o`"));
    assert!(result.diagnostics[1].message.contains("cannot drive input port `i`"));
}

#[test]
fn assignment_direction_rules() {
    let result = full_pipeline(&body("i <= o;"), "T");
    assert_eq!(result.codes(), vec![E402, E402]);
}

#[test]
fn connection_types_must_match() {
    let result = full_pipeline(&body("U : C port map (a => g, b => o); s <= i;"), "T");
    assert!(result.has_code(E403), "{}", result.render());
    assert!(result.diagnostics[0].message.contains("expected `f`, found `other`"));

    let result = full_pipeline(&body("g <= i; o <= i;"), "T");
    assert_eq!(result.codes(), vec![E403]);
}

#[test]
fn refused_connection_and_driver_conflict_are_both_reported() {
    let src = "
entity T is end;
architecture s of T is
    component Src is port (y : out f); end component;
    component D is port (a : in f); end component;
    signal s : f;
    signal g : other;
begin
    U1 : Src port map (y => s);
    U2 : Src port map (y => s);
    K : D port map (a => s);
    M : D port map (a => g);
end;
";
    let result = full_pipeline(src, "T");
    assert_eq!(result.codes(), vec![E403, E502], "{}", result.render());
    assert!(result.graph.is_none());
}

#[test]
fn refused_connection_does_not_cascade() {
    let src = "
entity T is port (i : in f; o : out other); end;
architecture s of T is
    component Src is port (y : out f); end component;
    component Sink is port (a : in other); end component;
    signal g : other;
begin
    W : Src port map (y => g);
    R : Sink port map (a => g);
    V : Sink port map (a => i);
end;
";
    // `g` loses its only driver and `i` its only receiver to refused
    // connections; `o` is unconnected regardless.
    let result = full_pipeline(src, "T");
    assert_eq!(result.codes(), vec![E403, E403, E401], "{}", result.render());
    assert!(result.diagnostics[2].message.contains("port `o` of `T`"));
}

#[test]
fn unknown_connections() {
    for stmt in [
        "U : C port map (a => nope, b => o);",
        "U : C port map (a => i, c => o);",
        "U : C port map (i, o, s);",
        "U : C port map (a => 1, b => o);",
        "U : C port map (a => C, b => o);",
        "o <= nope;",
    ] {
        let result = full_pipeline(&body(stmt), "T");
        assert!(result.has_code(E400), "{stmt}: {}", result.render());
    }
}

#[test]
fn duplicate_association() {
    let result = full_pipeline(&body("U : C port map (a => i, a => i, b => o);"), "T");
    assert_eq!(result.codes(), vec![E404]);
}

#[test]
fn duplicate_instance_label() {
    let result = full_pipeline(
        &body("U : C port map (i, s); U : C port map (s, o);"),
        "T",
    );
    assert!(result.has_code(E200));
}

#[test]
fn unassociated_formal() {
    let stmt = "U : C port map (a => i); o <= s; s <= i;";
    let result = full_pipeline(&body(stmt), "T");
    assert_eq!(result.codes(), vec![E401]);
    assert!(result.diagnostics[0].message.contains("port `b` of `U`"));

    let result = full_pipeline_with(&body(stmt), "T", &lenient());
    assert!(!result.has_errors, "{}", result.render());
    assert_eq!(result.codes(), vec![E401.as_warning()]);
    assert!(result.graph.is_some());
}

#[test]
fn open_formal_is_silent() {
    let result = full_pipeline(&body("U : C port map (a => i, b => open); o <= s; s <= i;"), "T");
    assert!(result.diagnostics.is_empty(), "{}", result.render());
}

#[test]
fn unconnected_top_port() {
    let result = full_pipeline(&body("U : C port map (a => i, b => s);"), "T");
    assert_eq!(result.codes(), vec![E401]);
    assert!(result.diagnostics[0].message.contains("port `o` of `T`"));

    let result = full_pipeline_with(&body("U : C port map (a => i, b => s);"), "T", &lenient());
    assert_eq!(result.warning_count, 1);
    let graph = result.expect_graph();
    assert!(graph.receivers_of(&Endpoint::TopPort { port: "i".into() }).len() == 1);
}

#[test]
fn undriven_net() {
    let src = "
entity T is end;
architecture s of T is
    component C is port (a : in f); end component;
    signal s : f;
begin
    U : C port map (a => s);
end;
";
    let result = full_pipeline(src, "T");
    assert_eq!(result.codes(), vec![E405]);
    assert!(result.diagnostics[0].message.contains("net `s`"));

    let result = full_pipeline_with(src, "T", &lenient());
    assert!(result.diagnostics.iter().all(|d| d.severity == Severity::Warning));
    assert_eq!(result.codes(), vec![E405.as_warning()]);
    assert_eq!(result.expect_graph().leaves.len(), 1);
}

#[test]
fn signal_chain_is_one_net() {
    let src = "
entity T is port (i : in f; o : out f); end;
architecture s of T is
    signal a, b, c : f;
begin
    c <= b;
    o <= c;
    a <= i;
    b <= a;
end;
";
    let result = full_pipeline(src, "T");
    let graph = result.expect_graph();
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(
        graph.receivers_of(&Endpoint::TopPort { port: "i".into() }),
        &[Endpoint::TopPort { port: "o".into() }]
    );
}

#[test]
fn two_instances_drive_one_input() {
    let src = "
entity T is end;
architecture s of T is
    component Src is port (y : out f); end component;
    component Sink is port (a : in f); end component;
    signal s : f;
begin
    A : Src port map (y => s);
    B : Src port map (y => s);
    K : Sink port map (a => s);
end;
";
    let result = full_pipeline(src, "T");
    assert_eq!(result.codes(), vec![E502]);
    assert!(result.diagnostics[0].message.contains("net `s` has 2 drivers"));
}
