//! End-to-end test: the diamond workflow authored through the API and
//! compiled from its YAML description must serialize identically.

use std::fs;

use daxgen::{Adag, File, FileUse, Job, Link, Workflow};
use tempfile::TempDir;

fn diamond_from_api() -> Adag {
    let mut diamond = Adag::new("diamond");

    let a = File::new("f.a");
    let b1 = File::new("f.b1");
    let b2 = File::new("f.b2");
    let c1 = File::new("f.c1");
    let c2 = File::new("f.c2");
    let d = File::new("f.d");

    let preprocess = diamond
        .add_job(
            Job::new("preprocess")
                .arg("-i")
                .file_arg(&a)
                .arg("-o")
                .file_arg(&b1)
                .arg("-o")
                .file_arg(&b2)
                .uses(&a, Link::Input)
                .uses_with(FileUse::new(&b1, Link::Output).transfer(false).register(false))
                .uses_with(FileUse::new(&b2, Link::Output).transfer(false).register(false)),
        )
        .unwrap();
    let findrange_left = diamond
        .add_job(
            Job::new("findrange")
                .arg("-i")
                .file_arg(&b1)
                .arg("-o")
                .file_arg(&c1)
                .uses(&b1, Link::Input)
                .uses_with(FileUse::new(&c1, Link::Output).transfer(false).register(false)),
        )
        .unwrap();
    let findrange_right = diamond
        .add_job(
            Job::new("findrange")
                .arg("-i")
                .file_arg(&b2)
                .arg("-o")
                .file_arg(&c2)
                .uses(&b2, Link::Input)
                .uses_with(FileUse::new(&c2, Link::Output).transfer(false).register(false)),
        )
        .unwrap();
    let analyze = diamond
        .add_job(
            Job::new("analyze")
                .arg("-i")
                .file_arg(&c1)
                .arg("-i")
                .file_arg(&c2)
                .arg("-o")
                .file_arg(&d)
                .uses(&c1, Link::Input)
                .uses(&c2, Link::Input)
                .uses_with(FileUse::new(&d, Link::Output).transfer(true).register(false)),
        )
        .unwrap();

    diamond.add_dependency(&preprocess, &findrange_left).unwrap();
    diamond.add_dependency(&preprocess, &findrange_right).unwrap();
    diamond.add_dependency(&findrange_left, &analyze).unwrap();
    diamond.add_dependency(&findrange_right, &analyze).unwrap();
    diamond
}

const DIAMOND_YAML: &str = include_str!("../demos/diamond.dax.yaml");

#[test]
fn api_and_yaml_paths_serialize_identically() {
    let from_api = diamond_from_api();
    assert!(from_api.validate().is_ok());

    let workflow: Workflow = serde_yaml::from_str(DIAMOND_YAML).unwrap();
    let from_yaml = Adag::from_workflow(&workflow).unwrap();
    assert!(from_yaml.validate().is_ok());

    assert_eq!(from_api.to_xml_string(), from_yaml.to_xml_string());
}

#[test]
fn write_xml_matches_in_memory_document() {
    let diamond = diamond_from_api();

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("diamond.dax");
    let mut out = fs::File::create(&path).unwrap();
    diamond.write_xml(&mut out).unwrap();
    drop(out);

    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written, diamond.to_xml_string());
}

#[test]
fn diamond_topology() {
    let diamond = diamond_from_api();
    let graph = diamond.graph();

    let roots = graph.roots();
    let leaves = graph.leaves();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].as_ref(), "ID0000001");
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0].as_ref(), "ID0000004");
    assert!(graph.has_path("ID0000001", "ID0000004"));

    let order = graph.topological_order().unwrap();
    assert_eq!(order.first().map(|s| s.as_ref()), Some("ID0000001"));
    assert_eq!(order.last().map(|s| s.as_ref()), Some("ID0000004"));
}
