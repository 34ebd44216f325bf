use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use ijdoc::{Format, IntellijModule, IntellijSourceFolder};

const MODULE_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?><module type=\"JAVA_MODULE\" version=\"4\"><component name=\"NewModuleRootManager\"><output url=\"file://$MODULE_DIR$/outputs\"/><content url=\"file://$MODULE_DIR$\"><sourceFolder url=\"file://$MODULE_DIR$/sources\" isTestSource=\"false\"/></content><orderEntry type=\"inheritedJdk\"/></component></module>";

fn bench_parse(c: &mut Criterion) {
    c.bench_function("ijdoc_parse_module", |b| {
        b.iter(|| IntellijModule::parse(black_box(MODULE_XML)))
    });
}

fn bench_serialize(c: &mut Criterion) {
    let mut module = IntellijModule::new();
    module
        .set_output_url("file://$MODULE_DIR$/outputs")
        .set_inherited_jdk(true);
    module.add_source_folder(IntellijSourceFolder::new("file://$MODULE_DIR$/sources"));

    c.bench_function("ijdoc_serialize_concise", |b| {
        b.iter(|| black_box(&module).to_xml_string(Format::Concise))
    });
    c.bench_function("ijdoc_serialize_pretty", |b| {
        b.iter(|| black_box(&module).to_xml_string(Format::Pretty))
    });
}

criterion_group!(benches, bench_parse, bench_serialize);
criterion_main!(benches);
