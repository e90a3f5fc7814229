//! YAML pipeline parsing and plan construction tests

use relwire_core::config::{OutputFormat, PlanConfig};
use relwire_plan::rel::{ReadSource, RelNode, SortDirection};
use relwire_plan::{parse_yaml_pipeline, DslError};
use relwire_proto::plan::PlanRelType;
use relwire_proto::rel::RelType;

#[test]
fn test_parse_simple_pipeline() {
    let yaml = r#"
steps:
  - op: scan
    table: "shop.orders"
    schema:
      - name: "id"
        type: "Int64"
        nullable: false
      - name: "customer"
        type: "Utf8"
        nullable: false
  - op: filter
    expr: "id > 10"
"#;

    let parsed = parse_yaml_pipeline(yaml).unwrap();
    let RelNode::Filter(f) = &parsed.root else {
        panic!("expected filter root, got {}", parsed.root.kind());
    };
    let Some(RelNode::Read(r)) = f.input() else {
        panic!("expected read input");
    };
    assert_eq!(
        r.source(),
        &ReadSource::NamedTable(vec!["shop".into(), "orders".into()])
    );
    assert_eq!(parsed.registry.get("gt"), Some(1));
}

#[test]
fn test_parse_pipeline_with_aggregate() {
    let yaml = r#"
steps:
  - op: scan
    table: "sales"
    schema:
      - name: "product"
        type: "Utf8"
        nullable: false
      - name: "quantity"
        type: "Int64"
        nullable: false
  - op: aggregate
    group_by:
      - "product"
    measures:
      - { func: "sum", column: "quantity" }
      - { func: "count", column: "*" }
  - op: sort
    by:
      - { column: "sum_quantity", direction: "desc" }
  - op: fetch
    offset: 5
    count: 10
"#;

    let parsed = parse_yaml_pipeline(yaml).unwrap();
    assert_eq!(parsed.output_names, vec!["product", "sum_quantity", "count"]);
    assert_eq!(parsed.root.node_count(), 4);

    let RelNode::Fetch(fetch) = &parsed.root else {
        panic!("expected fetch root");
    };
    assert_eq!((fetch.offset(), fetch.count()), (5, Some(10)));
    let RelNode::Sort(sort) = fetch.input() else {
        panic!("expected sort under fetch");
    };
    assert_eq!(sort.sorts()[0].direction(), SortDirection::DescNullsFirst);
    assert_eq!(sort.sorts()[0].expr().label(), "$1");
}

#[test]
fn test_parse_invalid_yaml() {
    let yaml = "invalid: yaml: [";
    let result = parse_yaml_pipeline(yaml);
    assert!(matches!(result, Err(DslError::Yaml(_))));
}

#[test]
fn test_parse_missing_op_field() {
    let yaml = r#"
steps:
  - table: "t"
    schema: []
"#;

    let result = parse_yaml_pipeline(yaml);
    assert!(result.is_err());
}

#[test]
fn test_filter_without_expr_is_malformed_operator() {
    let yaml = r#"
steps:
  - op: scan
    table: "t"
    schema: [ { name: "a", type: "Int32" } ]
  - op: filter
"#;

    let err = parse_yaml_pipeline(yaml).unwrap_err();
    assert!(err.is_malformed(), "unexpected error: {err}");
}

#[test]
fn test_local_files_scan_with_projection() {
    let yaml = r#"
steps:
  - op: scan
    files:
      - { path: "file:///data/a.parquet", format: parquet }
      - { path: "file:///data/b.parquet", format: parquet, start: 0, length: 1024 }
    schema:
      - { name: "k", type: "Int64" }
      - { name: "v", type: "decimal(10,2)", nullable: true }
    columns: ["v"]
"#;

    let parsed = parse_yaml_pipeline(yaml).unwrap();
    assert_eq!(parsed.output_names, vec!["v"]);
    let Some(RelType::Read(read)) = parsed.root.encode().rel_type else {
        panic!("expected read");
    };
    assert!(read.projection.is_some());
    assert_eq!(read.base_schema.unwrap().names, vec!["k", "v"]);
}

#[test]
fn test_output_names_must_match_columns() {
    let yaml = r#"
output_names: ["x", "y"]
steps:
  - op: scan
    table: "t"
    schema: [ { name: "a", type: "Int32" } ]
"#;

    assert!(matches!(
        parse_yaml_pipeline(yaml),
        Err(DslError::Invalid(_))
    ));
}

#[test]
fn test_pipeline_into_plan() {
    let yaml = r#"
config:
  producer: "nightly-etl"
  output_format: json
output_names: ["user_id", "user_name", "user_age"]
steps:
  - op: scan
    table: "users"
    schema:
      - { name: "id", type: "Int64" }
      - { name: "name", type: "Utf8", nullable: true }
      - { name: "age", type: "Int32", nullable: true }
  - op: filter
    expr: "age >= 18 AND name IS NOT NULL"
"#;

    let plan = parse_yaml_pipeline(yaml)
        .unwrap()
        .into_plan(PlanConfig::default())
        .unwrap();
    assert_eq!(plan.config().output_format, OutputFormat::Json);

    let encoded = plan.encode();
    assert_eq!(encoded.version.as_ref().unwrap().producer, "nightly-etl");
    assert_eq!(encoded.extensions.len(), 3);
    let Some(PlanRelType::Root(root)) = &encoded.relations[0].rel_type else {
        panic!("expected root relation");
    };
    assert_eq!(root.names, vec!["user_id", "user_name", "user_age"]);
    assert_eq!(root.input, Some(plan.roots()[0].rel.encode()));
}
