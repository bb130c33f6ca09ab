//! Generator integration tests against the in-process key primitives.

use attest_keys::{
    flatten_signers, GenerateError, KeyAlgorithm, KeyCodec, KeyNode, Keygen, KeySpec, SpecError,
    TopologyBuilder,
};
use attest_testkit::{fixtures, InstrumentedKeygen, LocalKeygen, WireKeyCodec};
use proptest::prelude::*;

fn builder<'a>(
    keygen: &'a LocalKeygen,
    codec: &'a WireKeyCodec,
) -> TopologyBuilder<'a, LocalKeygen, WireKeyCodec> {
    TopologyBuilder::new(keygen, codec)
}

fn leaf_publics(node: &KeyNode) -> Vec<String> {
    match node {
        KeyNode::Simple {
            public_encoding, ..
        } => vec![public_encoding.clone()],
        KeyNode::List { children } | KeyNode::Threshold { children, .. } => {
            children.iter().flat_map(leaf_publics).collect()
        }
    }
}

#[tokio::test]
async fn mixed_list_generates_one_signer_and_composed_key() {
    let keygen = LocalKeygen::from_seed(1);
    let codec = WireKeyCodec::new();

    let topology = builder(&keygen, &codec)
        .generate(&fixtures::mixed_three_leaf_list())
        .await
        .unwrap();

    // Only the final leaf carries a private key.
    assert_eq!(topology.private_keys.len(), 1);

    // The composite encoding is the list aggregate of the three leaf
    // publics, in declaration order.
    let publics = leaf_publics(&topology.root);
    assert_eq!(publics.len(), 3);
    assert_eq!(topology.key, codec.compose_list(&publics));
}

#[tokio::test]
async fn nested_lists_compose_bottom_up() {
    let keygen = LocalKeygen::from_seed(2);
    let codec = WireKeyCodec::new();

    let topology = builder(&keygen, &codec)
        .generate(&fixtures::nested_key_list())
        .await
        .unwrap();

    let KeyNode::List { children } = &topology.root else {
        panic!("expected a list root");
    };
    assert_eq!(children.len(), 2);

    // Root composite is the list aggregate of each sub-list's aggregate.
    let sub_composites: Vec<String> = children
        .iter()
        .map(|sub| codec.compose_list(&leaf_publics(sub)))
        .collect();
    assert_eq!(topology.key, codec.compose_list(&sub_composites));

    // Flattening is the concatenation of each sub-list's own flattening.
    let expected: Vec<String> = children.iter().flat_map(flatten_signers).collect();
    assert_eq!(topology.private_keys, expected);
    assert_eq!(topology.private_keys.len(), 8);
}

#[tokio::test]
async fn threshold_root_uses_threshold_aggregate() {
    let keygen = LocalKeygen::from_seed(3);
    let codec = WireKeyCodec::new();

    let topology = builder(&keygen, &codec)
        .generate(&fixtures::two_of_three_threshold())
        .await
        .unwrap();

    let publics = leaf_publics(&topology.root);
    assert_eq!(topology.key, codec.compose_threshold(2, &publics));
    assert_eq!(topology.private_keys.len(), 2);
}

#[tokio::test]
async fn invalid_threshold_fails_before_any_keygen_call() {
    let keygen = InstrumentedKeygen::new(LocalKeygen::from_seed(4));
    let codec = WireKeyCodec::new();

    let spec = KeySpec::ThresholdKey {
        threshold: 4,
        keys: vec![KeySpec::Ed25519PrivateKey; 3],
    };
    let err = TopologyBuilder::new(&keygen, &codec)
        .generate(&spec)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        GenerateError::Spec(SpecError::ThresholdOutOfRange {
            threshold: 4,
            children: 3
        })
    );
    assert_eq!(keygen.calls(), 0);
}

#[tokio::test]
async fn empty_list_fails_before_any_keygen_call() {
    let keygen = InstrumentedKeygen::new(LocalKeygen::from_seed(5));
    let codec = WireKeyCodec::new();

    // The empty list is nested under valid siblings; validation still runs
    // to completion before any key is generated.
    let spec = KeySpec::KeyList {
        keys: vec![KeySpec::Ed25519PrivateKey, KeySpec::KeyList { keys: vec![] }],
    };
    let err = TopologyBuilder::new(&keygen, &codec)
        .generate(&spec)
        .await
        .unwrap_err();

    assert_eq!(err, GenerateError::Spec(SpecError::EmptyKeyList));
    assert_eq!(keygen.calls(), 0);
}

#[tokio::test]
async fn private_leaves_round_trip_through_derivation() {
    let keygen = LocalKeygen::from_seed(6);
    let codec = WireKeyCodec::new();

    let topology = builder(&keygen, &codec)
        .generate(&fixtures::two_of_three_threshold())
        .await
        .unwrap();

    let mut checked = 0;
    let mut stack = vec![&topology.root];
    while let Some(node) = stack.pop() {
        match node {
            KeyNode::Simple {
                algorithm,
                public_encoding,
                private_encoding: Some(private),
            } => {
                let derived = keygen.derive_public(private, *algorithm).await.unwrap();
                assert_eq!(&derived, public_encoding);
                checked += 1;
            }
            KeyNode::Simple { .. } => {}
            KeyNode::List { children } | KeyNode::Threshold { children, .. } => {
                stack.extend(children.iter());
            }
        }
    }
    assert_eq!(checked, 2);
}

#[tokio::test]
async fn from_key_derives_instead_of_generating() {
    let keygen = LocalKeygen::from_seed(7);
    let codec = WireKeyCodec::new();

    let material = keygen.generate(KeyAlgorithm::Ed25519).await.unwrap();
    let spec = KeySpec::Ed25519PublicKey {
        from_key: Some(material.private_encoding.clone()),
    };
    let topology = builder(&keygen, &codec).generate(&spec).await.unwrap();

    assert_eq!(topology.key, material.public_encoding);
    // Public-only leaf: the supplied private key is not part of the signer
    // set.
    assert!(topology.private_keys.is_empty());
}

#[tokio::test]
async fn evm_address_leaf_from_existing_key() {
    let keygen = LocalKeygen::from_seed(8);
    let codec = WireKeyCodec::new();

    let material = keygen.generate(KeyAlgorithm::EcdsaSecp256k1).await.unwrap();
    let expected = keygen
        .derive_evm_address(&material.private_encoding)
        .await
        .unwrap();

    let spec = KeySpec::EvmAddress {
        from_key: Some(material.private_encoding),
    };
    let topology = builder(&keygen, &codec).generate(&spec).await.unwrap();

    assert_eq!(topology.key, expected);
    assert!(topology.private_keys.is_empty());
}

#[tokio::test]
async fn depth_three_topology_generates() {
    let keygen = LocalKeygen::from_seed(9);
    let codec = WireKeyCodec::new();

    let spec = fixtures::depth_three_mixed();
    let topology = builder(&keygen, &codec).generate(&spec).await.unwrap();

    assert_eq!(topology.private_keys.len(), spec.private_leaf_count());
    assert_eq!(topology.root.leaf_count(), 4);
}

#[tokio::test]
async fn json_descriptor_drives_generation() {
    let keygen = LocalKeygen::from_seed(10);
    let codec = WireKeyCodec::new();

    let spec = KeySpec::from_json(
        r#"{
            "type": "keyList",
            "keys": [
                {"type": "ed25519PublicKey"},
                {"type": "ecdsaSecp256k1PublicKey"},
                {"type": "ecdsaSecp256k1PrivateKey"}
            ]
        }"#,
    )
    .unwrap();

    let topology = builder(&keygen, &codec).generate(&spec).await.unwrap();
    assert_eq!(topology.private_keys.len(), 1);
}

fn leaf_spec() -> impl Strategy<Value = KeySpec> {
    prop_oneof![
        Just(KeySpec::Ed25519PrivateKey),
        Just(KeySpec::EcdsaSecp256k1PrivateKey),
        Just(KeySpec::Ed25519PublicKey { from_key: None }),
        Just(KeySpec::EcdsaSecp256k1PublicKey { from_key: None }),
        Just(KeySpec::EvmAddress { from_key: None }),
    ]
}

fn valid_spec() -> impl Strategy<Value = KeySpec> {
    leaf_spec().prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 1..4)
                .prop_map(|keys| KeySpec::KeyList { keys }),
            proptest::collection::vec(inner, 1..4).prop_flat_map(|keys| {
                let children = keys.len();
                (1..=children).prop_map(move |threshold| KeySpec::ThresholdKey {
                    threshold,
                    keys: keys.clone(),
                })
            }),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn any_valid_spec_up_to_depth_three_generates(spec in valid_spec()) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let keygen = LocalKeygen::from_seed(42);
        let codec = WireKeyCodec::new();

        let topology = rt
            .block_on(TopologyBuilder::new(&keygen, &codec).generate(&spec))
            .unwrap();
        prop_assert_eq!(topology.private_keys.len(), spec.private_leaf_count());
    }
}
