use kestrel_scene::archive;
use kestrel_scene::schema::{Model3DMetaData, SceneData, Vec3Data};
use kestrel_scene::serialization::{header_digest, BinarySerializer, Endianness, Envelope, SerializeError};
use proptest::prelude::*;
use std::io::Cursor;

archive! {
    pub struct PickupV0: 0 {
        data name: String = String::new(),
        data amount: i32 = 0,
    }
}

archive! {
    pub struct PickupV1: 1 {
        data name: String = String::new(),
        data amount: i32 = 0,
        @since(1) data respawn_seconds: f32 = 30.0,
        @since(1) archive offset: Vec3Data = Vec3Data::new(0.0, 1.0, 0.0),
    }
}

archive! {
    pub struct Sample: 0 {
        data signed: i32 = 0,
        data unsigned: u32 = 0,
        data single: f32 = 0.0,
        data double: f64 = 0.0,
        data flag: bool = false,
        data id: u64 = 0,
        data label: String = String::new(),
        bulk weights: Vec<f32> = Vec::new(),
        bulk ids: Vec<u64> = Vec::new(),
        bulk bytes: Vec<u8> = Vec::new(),
    }
}

const PICKUP: &str = "Pickup";

#[test]
fn old_payload_loads_with_new_fields_at_default() {
    let mut old = PickupV0 { name: "coin".into(), amount: 5, ..Default::default() };
    let bytes = BinarySerializer::new().to_bytes(&mut old, PICKUP).expect("serialize v0");

    let loaded: PickupV1 = BinarySerializer::new().from_bytes(&bytes, PICKUP).expect("deserialize as v1");
    assert_eq!(loaded.version, 0);
    assert_eq!(loaded.name, "coin");
    assert_eq!(loaded.amount, 5);
    assert_eq!(loaded.respawn_seconds, 30.0);
    assert_eq!(loaded.offset, Vec3Data::new(0.0, 1.0, 0.0));
}

#[test]
fn newer_payload_is_rejected() {
    let mut new = PickupV1 { name: "gem".into(), respawn_seconds: 2.0, ..Default::default() };
    let bytes = BinarySerializer::new().to_bytes(&mut new, PICKUP).expect("serialize v1");

    let err = BinarySerializer::new().from_bytes::<PickupV0>(&bytes, PICKUP).expect_err("v0 reader must refuse");
    assert!(matches!(err, SerializeError::NewerVersion { found: 1, supported: 0, .. }), "{err:?}");
    assert!(err.to_string().starts_with("Incompatible file format. This file was created with newer engine version"));
}

#[test]
fn current_version_round_trips() {
    let mut original = PickupV1 {
        name: "key".into(),
        amount: -3,
        respawn_seconds: 0.5,
        offset: Vec3Data::new(1.0, 2.0, 3.0),
        ..Default::default()
    };
    let bytes = BinarySerializer::new().to_bytes(&mut original, PICKUP).expect("serialize");
    let loaded: PickupV1 = BinarySerializer::new().from_bytes(&bytes, PICKUP).expect("deserialize");
    assert_eq!(loaded, original);
}

#[test]
fn envelope_starts_with_header_digest_and_flag() {
    let mut sample = Sample::default();
    let bytes =
        BinarySerializer::with_endianness(Endianness::Big).to_bytes(&mut sample, "Sample").expect("serialize");
    let digest = header_digest();
    assert_eq!(digest.len(), 64);
    assert_eq!(&bytes[..64], digest.as_bytes());
    assert_eq!(bytes[64], 1);

    let envelope = Envelope::read(&mut Cursor::new(&bytes)).expect("envelope");
    assert_eq!(envelope.endianness, Endianness::Big);
    assert!(envelope.matches_format("Sample"));
    assert_eq!(envelope.version, 0);
}

#[test]
fn wrong_format_label_is_rejected() {
    let mut scene = SceneData::default();
    let bytes = BinarySerializer::new().to_bytes(&mut scene, SceneData::FORMAT).expect("serialize");
    let err = BinarySerializer::new()
        .from_bytes::<Model3DMetaData>(&bytes, Model3DMetaData::FORMAT)
        .expect_err("label mismatch");
    assert!(matches!(err, SerializeError::IncompatibleDataType { .. }), "{err:?}");
}

#[test]
fn empty_format_label_accepts_any_payload() {
    let mut scene = SceneData { lightmap_size: 1024, ..Default::default() };
    let bytes = BinarySerializer::new().to_bytes(&mut scene, SceneData::FORMAT).expect("serialize");
    let loaded: SceneData = BinarySerializer::new().from_bytes(&bytes, "").expect("any label");
    assert_eq!(loaded.lightmap_size, 1024);
}

#[test]
fn foreign_header_is_rejected() {
    let mut sample = Sample::default();
    let mut bytes = BinarySerializer::new().to_bytes(&mut sample, "Sample").expect("serialize");
    bytes[0] ^= 0xFF;
    let err = BinarySerializer::new().from_bytes::<Sample>(&bytes, "Sample").expect_err("header mismatch");
    assert!(matches!(err, SerializeError::IncompatibleFormat));
    assert_eq!(err.to_string(), "Incompatible file format");
}

#[test]
fn truncated_payload_fails_with_read_error() {
    let mut sample = Sample { label: "truncated".into(), weights: vec![1.0; 16], ..Default::default() };
    let bytes = BinarySerializer::new().to_bytes(&mut sample, "Sample").expect("serialize");
    let cut = &bytes[..bytes.len() - 10];
    let err = BinarySerializer::new().from_bytes::<Sample>(cut, "Sample").expect_err("short read");
    assert!(matches!(err, SerializeError::Read(_)), "{err:?}");
}

#[test]
fn negative_length_prefix_is_rejected() {
    let mut sample = Sample::default();
    let mut bytes =
        BinarySerializer::with_endianness(Endianness::Little).to_bytes(&mut sample, "Sample").expect("serialize");
    // Root envelope (64 + 1 + 4 + 64 + 4), nested version (4), then six scalars.
    let label_offset = 64 + 1 + 4 + 64 + 4 + 4 + 4 + 4 + 4 + 8 + 1 + 8;
    bytes[label_offset..label_offset + 4].copy_from_slice(&(-5i32).to_le_bytes());
    let err = BinarySerializer::new().from_bytes::<Sample>(&bytes, "Sample").expect_err("negative length");
    assert!(matches!(err, SerializeError::InvalidLength(-5)), "{err:?}");
}

fn sample_strategy() -> impl Strategy<Value = Sample> {
    (
        any::<i32>(),
        any::<u32>(),
        any::<f32>().prop_filter("comparable", |v| !v.is_nan()),
        any::<f64>().prop_filter("comparable", |v| !v.is_nan()),
        any::<bool>(),
        any::<u64>(),
        ".{0,24}",
        prop::collection::vec(-1.0e6f32..1.0e6, 0..32),
        prop::collection::vec(any::<u64>(), 0..16),
        prop::collection::vec(any::<u8>(), 0..64),
    )
        .prop_map(|(signed, unsigned, single, double, flag, id, label, weights, ids, bytes)| Sample {
            signed,
            unsigned,
            single,
            double,
            flag,
            id,
            label,
            weights,
            ids,
            bytes,
            ..Default::default()
        })
}

proptest! {
    #[test]
    fn either_byte_order_reads_back_identically(sample in sample_strategy(), big in any::<bool>()) {
        let order = if big { Endianness::Big } else { Endianness::Little };
        let mut written = sample.clone();
        let bytes = BinarySerializer::with_endianness(order).to_bytes(&mut written, "Sample").unwrap();
        let loaded: Sample = BinarySerializer::new().from_bytes(&bytes, "Sample").unwrap();
        prop_assert_eq!(loaded, sample);
    }
}
