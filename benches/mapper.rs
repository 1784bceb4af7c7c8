use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use modelmap::{model, Model};

model! {
    pub struct Employee {
        pub name: String,
        pub age: i64,
    }
}

model! {
    pub struct Company {
        pub name: String,
        pub rating: f64,
        pub tags: Vec<String>,
        pub employees: Vec<Employee>,
    }
}

const COMPANY_JSON: &str = r#"{"name":"Acme","rating":4.5,"tags":["tools","hardware"],"employees":[{"name":"Ada","age":36},{"name":"Grace","age":41}]}"#;

const COMPANY_XML: &str = "<company><name>Acme</name><rating>4.5</rating>\
    <tags>tools</tags><tags>hardware</tags>\
    <employees><name>Ada</name><age>36</age></employees>\
    <employees><name>Grace</name><age>41</age></employees></company>";

fn bench_tree_build(c: &mut Criterion) {
    c.bench_function("xml_build", |b| {
        b.iter(|| modelmap::from_xml_bytes(black_box(COMPANY_XML.as_bytes())))
    });

    c.bench_function("json_decode", |b| {
        b.iter(|| modelmap::from_json_str(black_box(COMPANY_JSON)))
    });
}

fn bench_populate(c: &mut Criterion) {
    let tree = modelmap::from_json_str(COMPANY_JSON).expect("fixture parses");

    c.bench_function("populate", |b| {
        b.iter(|| Company::from_tree(black_box(&tree)))
    });

    c.bench_function("populate_from_xml", |b| {
        b.iter(|| Company::from_xml(black_box(COMPANY_XML.as_bytes())))
    });
}

fn bench_serialize(c: &mut Criterion) {
    let company = Company::from_json_str(COMPANY_JSON).expect("fixture parses");

    c.bench_function("to_tree", |b| b.iter(|| black_box(&company).to_tree()));

    c.bench_function("to_json", |b| b.iter(|| black_box(&company).to_json()));
}

criterion_group!(benches, bench_tree_build, bench_populate, bench_serialize);
criterion_main!(benches);
