use divan::Bencher;
use nestml_cocos::{parser::parse_nestml_string, visitor::node_count, CoCosManager, Logger};

fn main() {
    divan::main();
}

fn neuron_text(n: usize) -> String {
    format!(
        "
        neuron bench:
          initial_values:
            {}
          end
          equations:
            {}
          end
        end
        ",
        (0..n)
            .map(|i| format!("x{} mV = {}mV", i, i))
            .collect::<Vec<_>>()
            .join("\n"),
        // every other equation is missing its order
        (0..n)
            .map(|i| {
                let prime = if i % 2 == 0 { "'" } else { "" };
                format!("x{}{} = -x{} / tau + x{}", i, prime, i, (i + 1) % n)
            })
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

#[divan::bench(consts = [1, 10, 100, 1000])]
fn parse<const N: usize>(bencher: Bencher) {
    let text = neuron_text(N);
    bencher.bench_local(|| parse_nestml_string(&text).unwrap());
}

#[divan::bench(consts = [1, 10, 100, 1000])]
fn walk<const N: usize>(bencher: Bencher) {
    let text = neuron_text(N);
    let unit = parse_nestml_string(&text).unwrap();
    bencher.bench_local(|| node_count(&unit));
}

#[divan::bench(consts = [1, 10, 100, 1000])]
fn check_sequential<const N: usize>(bencher: Bencher) {
    let text = neuron_text(N);
    let unit = parse_nestml_string(&text).unwrap();
    let manager = CoCosManager::default();
    bencher.bench_local(|| {
        let logger = Logger::default();
        manager.check_compilation_unit(&unit, &logger, false).unwrap();
        logger.len()
    });
}

#[divan::bench(consts = [1, 10, 100, 1000])]
fn check_parallel<const N: usize>(bencher: Bencher) {
    let text = neuron_text(N);
    let unit = parse_nestml_string(&text).unwrap();
    let manager = CoCosManager::default();
    bencher.bench_local(|| {
        let logger = Logger::default();
        manager.check_compilation_unit(&unit, &logger, true).unwrap();
        logger.len()
    });
}
