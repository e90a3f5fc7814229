use criterion::{black_box, criterion_group, criterion_main, Criterion};
use relwire_core::schema::{DataType, Field, Schema};
use relwire_plan::expression::{ExpressionNode, Scalar, TypeNode};
use relwire_plan::rel::{Filter, Read, ReadSource};
use relwire_plan::RelNode;
use relwire_proto::Message;

fn read() -> RelNode {
    let schema = Schema::new(
        (0..16)
            .map(|i| Field::new(format!("c{i}"), DataType::Int64, true))
            .collect(),
    );
    Read::new(schema, ReadSource::NamedTable(vec!["wide".into()]))
        .unwrap()
        .into()
}

/// A chain of `depth` filters over a scan.
fn filter_chain(depth: usize) -> RelNode {
    (0..depth).fold(read(), |input, i| {
        let cond = ExpressionNode::call(
            1,
            vec![
                ExpressionNode::field(i % 16).unwrap(),
                ExpressionNode::literal(Scalar::I64(i as i64)),
            ],
            TypeNode::new(DataType::Boolean, true),
        );
        Filter::new(Some(input), cond).into()
    })
}

fn bench_encode(c: &mut Criterion) {
    let shallow = filter_chain(4);
    let deep = filter_chain(64);

    c.bench_function("encode_filter_chain_4", |b| {
        b.iter(|| black_box(shallow.encode()).encode_to_vec())
    });
    c.bench_function("encode_filter_chain_64", |b| {
        b.iter(|| black_box(deep.encode()).encode_to_vec())
    });
    c.bench_function("to_message_only_64", |b| b.iter(|| black_box(deep.encode())));
}

criterion_group!(benches, bench_encode);
criterion_main!(benches);
