use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;

use dn_network::Species;
use dn_network::parse_blocks;
use dn_structure::Strand;
use dn_structure::assign_colors;

/// A ring of eight identical strands, held together by a hub strand.
const RING: &str = "\
<x!1 y!2 h!11>
<x!2 y!3>
<x!3 y!4 h!12>
<x!4 y!5>
<x!5 y!6 h!13>
<x!6 y!7>
<x!7 y!8 h!14>
<x!8 y!1>
<h!11 h!12 h!13 h!14>
";

pub fn canonical_forms(c: &mut Criterion) {
    let mut group = c.benchmark_group("Canonical");

    let mut strands: Vec<Strand> = parse_blocks(RING).unwrap().remove(0);
    assign_colors(strands.iter_mut());

    group.bench_function("Canonical form of a symmetric ring.", |b| {
        b.iter(|| {
            let _ = Species::from_strands(strands.clone()).unwrap();
        });
    });
}

criterion_group!(benches, canonical_forms);
criterion_main!(benches);
