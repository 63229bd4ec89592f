//! Chain bundle resolution against generated certificate hierarchies.

use ct_publisher::chain::{
    load_chain, resolve, BundleSource, ChainDefinition, ChainSource, IssuerNameId, LoadError,
};

mod common;

use common::Fixtures;

fn issuer_id(fixtures: &Fixtures, name: &str, pem: &str, root_name: &str, root_pem: &str) -> IssuerNameId {
    let paths = vec![fixtures.write(name, &[pem]), fixtures.write(root_name, &[root_pem])];
    load_chain(&paths).unwrap().issuer.id
}

#[test]
fn intermediate_and_root_resolve_to_root_bundle() {
    let fixtures = Fixtures::new();
    let root = common::root("Test Root");
    let int_a = common::intermediate("Test Int A", &root);

    let chain = ChainDefinition::new([
        fixtures.write("int-a.pem", &[&int_a.pem]),
        fixtures.write("root.pem", &[&root.pem]),
    ]);
    let mapping = resolve(&[chain]).unwrap();

    let id = issuer_id(&fixtures, "int-a-copy.pem", &int_a.pem, "root-copy.pem", &root.pem);
    assert_eq!(mapping.len(), 1);
    assert_eq!(mapping.default_bundle(id).unwrap().to_vec(), vec![root.der.clone()]);
    assert_eq!(mapping.issuer_certificate(id, 0), Some(int_a.der.as_slice()));
    assert!(mapping.issuer_subject(id).unwrap().contains("Test Int A"));
}

#[test]
fn one_default_per_distinct_issuer() {
    let fixtures = Fixtures::new();
    let root = common::root("Test Root");
    let int_a = common::intermediate("Test Int A", &root);
    let int_b = common::intermediate("Test Int B", &root);

    let root_path = fixtures.write("root.pem", &[&root.pem]);
    let a = fixtures.write("int-a.pem", &[&int_a.pem]);
    let b = fixtures.write("int-b.pem", &[&int_b.pem]);

    let chains = vec![
        ChainDefinition::new([a.clone(), root_path.clone()]),
        ChainDefinition::new([b, root_path.clone()]),
        ChainDefinition::new([a, root_path]),
    ];
    let mapping = resolve(&chains).unwrap();

    assert_eq!(mapping.len(), 2);
    assert_eq!(mapping.issuers().map(|id| mapping.chain_count(id)).sum::<usize>(), 3);
}

#[test]
fn first_chain_for_an_issuer_stays_default() {
    let fixtures = Fixtures::new();
    let root_1 = common::root("Test Root One");
    let root_2 = common::root("Test Root Two");
    // Same subject, different keys and parents: one issuer, two chains.
    let int_via_1 = common::intermediate("Test Int A", &root_1);
    let int_via_2 = common::intermediate("Test Int A", &root_2);

    let first = ChainDefinition::new([
        fixtures.write("int-1.pem", &[&int_via_1.pem]),
        fixtures.write("root-1.pem", &[&root_1.pem]),
    ]);
    let second = ChainDefinition::new([
        fixtures.write("int-2.pem", &[&int_via_2.pem]),
        fixtures.write("root-2.pem", &[&root_2.pem]),
    ]);

    let mapping = resolve(&[first.clone(), second.clone()]).unwrap();
    let id = mapping.issuers().next().unwrap();
    assert_eq!(mapping.len(), 1);
    assert_eq!(mapping.default_bundle(id).unwrap().to_vec(), vec![root_1.der.clone()]);
    assert_eq!(mapping.bundle(id, 1).unwrap().to_vec(), vec![root_2.der.clone()]);
    assert_eq!(mapping.issuer_certificate(id, 0), Some(int_via_1.der.as_slice()));
    assert_eq!(mapping.issuer_certificate(id, 1), Some(int_via_2.der.as_slice()));

    let reversed = resolve(&[second, first]).unwrap();
    assert_eq!(reversed.default_bundle(id).unwrap().to_vec(), vec![root_2.der.clone()]);
}

#[test]
fn longer_chain_keeps_file_order() {
    let fixtures = Fixtures::new();
    let root = common::root("Test Root");
    let mid = common::intermediate("Test Policy CA", &root);
    let issuing = common::intermediate("Test Issuing CA", &mid);

    let chain = ChainDefinition::new([
        fixtures.write("issuing.pem", &[&issuing.pem]),
        fixtures.write("mid.pem", &[&mid.pem]),
        fixtures.write("root.pem", &[&root.pem]),
    ]);
    let mapping = resolve(&[chain]).unwrap();
    let id = mapping.issuers().next().unwrap();

    assert_eq!(
        mapping.default_bundle(id).unwrap().to_vec(),
        vec![mid.der.clone(), root.der.clone()]
    );
}

#[test]
fn resolution_is_idempotent() {
    let fixtures = Fixtures::new();
    let root = common::root("Test Root");
    let int_a = common::intermediate("Test Int A", &root);
    let int_b = common::intermediate("Test Int B", &root);
    let root_path = fixtures.write("root.pem", &[&root.pem]);

    let chains = vec![
        ChainDefinition::new([fixtures.write("a.pem", &[&int_a.pem]), root_path.clone()]),
        ChainDefinition::new([fixtures.write("b.pem", &[&int_b.pem]), root_path]),
    ];

    assert_eq!(resolve(&chains).unwrap(), resolve(&chains).unwrap());
}

#[test]
fn wrong_parent_is_a_linkage_error() {
    let fixtures = Fixtures::new();
    let root_1 = common::root("Test Root One");
    let root_2 = common::root("Test Root Two");
    let int_a = common::intermediate("Test Int A", &root_1);

    let chain = ChainDefinition::new([
        fixtures.write("int-a.pem", &[&int_a.pem]),
        fixtures.write("root-2.pem", &[&root_2.pem]),
    ]);

    match resolve(&[chain]).unwrap_err() {
        LoadError::Chain { index: 0, source } => {
            assert!(matches!(*source, LoadError::Linkage { .. }), "{source}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn impostor_parent_fails_signature_check() {
    let fixtures = Fixtures::new();
    let real_root = common::root("Test Root");
    let impostor = common::root("Test Root");
    let int_a = common::intermediate("Test Int A", &real_root);

    let chain = ChainDefinition::new([
        fixtures.write("int-a.pem", &[&int_a.pem]),
        fixtures.write("impostor.pem", &[&impostor.pem]),
    ]);

    match resolve(&[chain]).unwrap_err() {
        LoadError::Chain { source, .. } => {
            assert!(matches!(*source, LoadError::Signature { .. }), "{source}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn any_bad_chain_aborts_resolution() {
    let fixtures = Fixtures::new();
    let root = common::root("Test Root");
    let int_a = common::intermediate("Test Int A", &root);

    let chains = vec![
        ChainDefinition::new([
            fixtures.write("int-a.pem", &[&int_a.pem]),
            fixtures.write("root.pem", &[&root.pem]),
        ]),
        ChainDefinition::new([fixtures.path("missing.pem")]),
    ];

    let err = resolve(&chains).unwrap_err();
    assert!(matches!(err, LoadError::Chain { index: 1, .. }));
    assert!(err.to_string().contains("missing.pem"));
}

#[test]
fn chain_file_with_two_certificates_rejected() {
    let fixtures = Fixtures::new();
    let root = common::root("Test Root");
    let int_a = common::intermediate("Test Int A", &root);

    let chain = ChainDefinition::new([fixtures.write("both.pem", &[&int_a.pem, &root.pem])]);
    match resolve(&[chain]).unwrap_err() {
        LoadError::Chain { source, .. } => {
            assert!(matches!(*source, LoadError::CertificateCount { found: 2, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn legacy_bundle_is_flat_parse_of_file() {
    let fixtures = Fixtures::new();
    let root = common::root("Test Root");
    let int_a = common::intermediate("Test Int A", &root);
    let path = fixtures.write("bundle.pem", &[&int_a.pem, &root.pem]);

    match ChainSource::Legacy(path).load().unwrap() {
        BundleSource::Legacy(bundle) => {
            assert_eq!(bundle.to_vec(), vec![int_a.der.clone(), root.der.clone()]);
        }
        other => panic!("expected legacy bundle, got {other:?}"),
    }
}

#[test]
fn chains_source_loads_per_issuer_mapping() {
    let fixtures = Fixtures::new();
    let root = common::root("Test Root");
    let int_a = common::intermediate("Test Int A", &root);

    let source = ChainSource::Chains(vec![ChainDefinition::new([
        fixtures.write("int-a.pem", &[&int_a.pem]),
        fixtures.write("root.pem", &[&root.pem]),
    ])]);

    let loaded = source.load().unwrap();
    assert!(matches!(&loaded, BundleSource::PerIssuer(mapping) if mapping.len() == 1));
    assert_eq!(loaded.issuer_count(), 1);
}
