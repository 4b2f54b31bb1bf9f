use nestml_cocos::cocos::CorrectOrderInEquation;
use nestml_cocos::visitor::{node_count, visit_neuron, walk};
use nestml_cocos::{
    check_file, parse_nestml_string, Ast, AstKind, CheckOptions, CoCo, CoCosManager, CocoError,
    Diagnostic, Logger, Severity,
};

fn lines(lines: &[&str]) -> String {
    lines.join("\n")
}

fn first_neuron<'b, 'a>(unit: &'b Ast<'a>) -> &'b Ast<'a> {
    &unit.as_compilation_unit().unwrap().neurons[0]
}

fn check_order(text: &str) -> Vec<Diagnostic> {
    let _ = env_logger::builder().is_test(true).try_init();
    let unit = parse_nestml_string(text).unwrap();
    let logger = Logger::default();
    CorrectOrderInEquation
        .check_coco(first_neuron(&unit), &logger)
        .unwrap();
    logger.take()
}

#[test]
fn first_order_equation_is_accepted() {
    let text = lines(&[
        "neuron iaf_neuron:",
        "  initial_values:",
        "    V_m mV = -70mV",
        "  end",
        "  equations:",
        "    V_m' = -V_m / tau_m",
        "  end",
        "end",
    ]);
    assert!(check_order(&text).is_empty());
}

#[test]
fn zero_order_equation_is_reported() {
    let text = lines(&[
        "neuron iaf_neuron:",
        "  initial_values:",
        "    V_m mV = -70mV",
        "  end",
        "",
        "  parameters:",
        "    tau_m ms = 10ms",
        "    E_L mV = -70mV",
        "  end",
        "",
        "  equations:",
        "    V_m = -(V_m - E_L) / tau_m",
        "  end",
        "end",
    ]);
    let diagnostics = check_order(&text);
    assert_eq!(
        diagnostics,
        vec![Diagnostic {
            severity: Severity::Error,
            message: "[iaf_neuron.nestml] Order of differential equation for V_m at [12:5;12:31] is not declared!"
                .to_string(),
        }]
    );
}

#[test]
fn only_the_zero_order_equation_is_reported() {
    let text = lines(&[
        "neuron iaf_neuron:",
        "  initial_values:",
        "    V_m mV = -70mV",
        "  end",
        "  equations:",
        "    V_m = -V_m / tau_m",
        "    I_syn' = -I_syn / tau_syn",
        "  end",
        "end",
    ]);
    let diagnostics = check_order(&text);
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.contains("V_m at [6:5;"));
    assert!(!diagnostics[0].message.contains("I_syn"));
}

#[test]
fn neuron_without_equations_is_valid() {
    let text = lines(&[
        "neuron iaf_neuron:",
        "  parameters:",
        "    tau_m ms = 10ms",
        "  end",
        "end",
    ]);
    assert!(check_order(&text).is_empty());
}

#[test]
fn wrong_node_is_invalid_input() {
    let unit = parse_nestml_string("neuron n:\n  equations:\n    V_m = 0\n  end\nend").unwrap();
    let logger = Logger::default();
    let result = CorrectOrderInEquation.check_coco(&unit, &logger);
    assert!(matches!(
        result,
        Err(CocoError::InvalidInput {
            found: "CompilationUnit",
            ..
        })
    ));
    assert!(logger.is_empty());
}

#[test]
fn every_zero_order_equation_is_reported_in_order() {
    let names = ["a", "b", "c", "d", "e", "f"];
    let equations: Vec<String> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let primes = "'".repeat(i % 3);
            format!("    {}{} = -{}", name, primes, name)
        })
        .collect();
    let mut source = vec!["neuron many:", "  equations:"];
    source.extend(equations.iter().map(String::as_str));
    source.extend(["  end", "end"]);
    let diagnostics = check_order(&lines(&source));

    let reported: Vec<&str> = names
        .iter()
        .enumerate()
        .filter(|(i, _)| i % 3 == 0)
        .map(|(_, name)| *name)
        .collect();
    assert_eq!(reported, vec!["a", "d"]);
    assert_eq!(diagnostics.len(), reported.len());
    for (diagnostic, name) in diagnostics.iter().zip(&reported) {
        assert_eq!(diagnostic.severity, Severity::Error);
        assert!(diagnostic
            .message
            .contains(&format!("for {} at", name)));
    }
}

#[test]
fn walk_visits_each_node_once() {
    let text = include_str!("../src/parser/test_iaf_psc_alpha.nestml");
    let unit = parse_nestml_string(text).unwrap();
    let mut addresses = Vec::new();
    walk(&unit, &mut |node| addresses.push(node as *const Ast));
    assert_eq!(addresses.len(), node_count(&unit));
    addresses.sort();
    addresses.dedup();
    assert_eq!(addresses.len(), node_count(&unit));

    let mut equations = 0;
    visit_neuron(first_neuron(&unit), &mut |node| {
        if let AstKind::OdeEquation(_) = node.kind {
            equations += 1;
        }
    })
    .unwrap();
    assert_eq!(equations, 2);
}

#[test]
fn repeated_checks_are_identical() {
    let text = include_str!("../src/parser/test_iaf_broken.nestml");
    let unit = parse_nestml_string(text).unwrap();
    let manager = CoCosManager::default();
    let runs: Vec<Vec<Diagnostic>> = (0..2)
        .map(|_| {
            let logger = Logger::default();
            manager
                .check_compilation_unit(&unit, &logger, false)
                .unwrap();
            logger.take()
        })
        .collect();
    assert_eq!(runs[0].len(), 6);
    assert_eq!(runs[0], runs[1]);
}

#[test]
fn check_sample_files() {
    let _ = env_logger::builder().is_test(true).try_init();
    let options = CheckOptions::default();
    let logger = check_file("src/parser/test_iaf_psc_alpha.nestml", &options).unwrap();
    assert!(!logger.has_errors());

    let logger = check_file("src/parser/test_iaf_broken.nestml", &options).unwrap();
    assert_eq!(logger.error_count(), 6);
    assert!(logger.has_message_contains(
        "[iaf_broken.nestml] Order of differential equation for w at [9:5;9:10] is not declared!"
    ));
}
