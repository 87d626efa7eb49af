//! Wire Format Test - byte-exact OSC 1.0 framing
//!
//! Usage:
//!   cargo test --test wire_format_test

use oscwire::protocol::{padded_len, Malformation};
use oscwire::{
    Color32, Decoder, Element, MidiMessage, ProtocolError, ReadConfig, TimeTag, TypeTag, Vector2,
    Vector3, Writer,
};

fn encode(address: &str, elements: &[Element<'_>]) -> Vec<u8> {
    let mut writer = Writer::new(1024);
    writer.write_message(address, elements).unwrap().to_vec()
}

#[test]
fn single_float_scenario() {
    let bytes = encode("/synth/freq", &[Element::Float32(440.0)]);

    let mut expected = Vec::new();
    expected.extend_from_slice(&[0x2F, 0x73, 0x79, 0x6E, 0x74, 0x68, 0x2F, 0x66, 0x72, 0x65, 0x71, 0x00]);
    expected.extend_from_slice(&[0x2C, 0x66, 0x00, 0x00]);
    expected.extend_from_slice(&[0x43, 0xDC, 0x00, 0x00]);
    assert_eq!(bytes, expected);

    let mut decoder = Decoder::new();
    let msg = decoder.decode(&bytes).unwrap();
    assert_eq!(msg.address(), "/synth/freq");
    assert_eq!(msg.element_count(), 1);
    assert_eq!(msg.type_tags(), &[TypeTag::Float32]);
    assert_eq!(msg.values().read_float32_element(0), 440.0);
}

#[test]
fn empty_message_scenario() {
    let bytes = encode("/trigger", &[]);
    assert_eq!(bytes, b"/trigger\0\0\0\0,\0\0\0");

    let mut decoder = Decoder::new();
    let msg = decoder.decode(&bytes).unwrap();
    assert_eq!(msg.address(), "/trigger");
    assert_eq!(msg.element_count(), 0);
}

#[test]
fn three_byte_blob_scenario() {
    let bytes = encode("/b", &[Element::Blob(&[0x01, 0x02, 0x03])]);
    assert_eq!(&bytes[8..], &[0x00, 0x00, 0x00, 0x03, 0x01, 0x02, 0x03, 0x00]);

    let mut decoder = Decoder::new();
    let msg = decoder.decode(&bytes).unwrap();
    assert_eq!(msg.values().read_blob_element(0), &[0x01, 0x02, 0x03]);
}

#[test]
fn manual_writes_match_write_message() {
    let mut writer = Writer::new(256);
    writer.write_address("/mix/ch").unwrap();
    writer.write_type_tags(",isTb").unwrap();
    writer.write_int32(4).unwrap();
    writer.write_string("gain").unwrap();
    writer.write_blob(&[7; 5]).unwrap();
    let manual = writer.as_bytes().to_vec();

    let generic = encode(
        "/mix/ch",
        &[Element::Int32(4), Element::String("gain"), Element::Bool(true), Element::Blob(&[7; 5])],
    );
    assert_eq!(manual, generic);
}

#[test]
fn vectors_are_consecutive_floats() {
    let mut writer = Writer::new(128);
    writer.write_address("/pos").unwrap();
    writer.write_type_tags(",fff").unwrap();
    writer.write_vector3(Vector3 { x: 1.0, y: 2.0, z: 3.0 }).unwrap();
    let bytes = writer.as_bytes().to_vec();

    let mut decoder = Decoder::new();
    let msg = decoder.decode(&bytes).unwrap();
    let values = msg.values();
    assert_eq!(values.element_count(), 3);
    assert_eq!(values.read_float32_element(0), 1.0);
    assert_eq!(values.read_float32_element(1), 2.0);
    assert_eq!(values.read_float32_element(2), 3.0);

    writer.reset();
    writer.write_address("/xy").unwrap();
    writer.write_type_tags(",ff").unwrap();
    writer.write_vector2(Vector2 { x: -1.0, y: 0.5 }).unwrap();
    let bytes = writer.as_bytes().to_vec();
    assert_eq!(bytes, encode("/xy", &[Element::Float32(-1.0), Element::Float32(0.5)]));
}

#[test]
fn every_tag_round_trips() {
    let color = Color32::new(10, 20, 30, 255);
    let midi = MidiMessage::new(1, 0x80, 64, 0);
    let time = TimeTag::new(1, 2);
    let cases: Vec<Element<'_>> = vec![
        Element::Int32(i32::MAX),
        Element::Float32(-0.0),
        Element::String(""),
        Element::String("four"),
        Element::Blob(&[]),
        Element::Blob(&[1, 2, 3, 4, 5]),
        Element::Int64(-1),
        Element::Float64(std::f64::consts::PI),
        Element::TimeTag(time),
        Element::Char('A'),
        Element::Color32(color),
        Element::Midi(midi),
        Element::Bool(true),
        Element::Bool(false),
        Element::Nil,
        Element::Infinitum,
    ];

    let mut decoder = Decoder::new();
    for element in cases {
        let bytes = encode("/one", &[element]);
        let msg = decoder.decode(&bytes).unwrap();
        assert_eq!(msg.type_tags(), &[element.tag()]);
        assert_eq!(msg.values().element(0), Some(element));
    }
}

#[test]
fn sections_are_padded_to_four() {
    let addresses = ["/a", "/ab", "/abc", "/abcd", "/abcdefg"];
    let strings = ["", "x", "xy", "xyz", "wxyz"];

    for address in addresses {
        for s in strings {
            let bytes = encode(address, &[Element::String(s), Element::Int32(1)]);
            assert_eq!(bytes.len() % 4, 0);

            let address_section = padded_len(address.len() + 1);
            assert_eq!(address_section % 4, 0);
            assert_eq!(&bytes[address_section..address_section + 3], b",si");

            let mut decoder = Decoder::new();
            let msg = decoder.decode(&bytes).unwrap();
            for i in 0..msg.element_count() {
                assert_eq!(msg.values().offset(i).unwrap() % 4, 0);
            }
            assert_eq!(msg.values().read_string_element(0), s);
            assert_eq!(msg.values().read_int32_element(1), 1);
        }
    }
}

#[test]
fn int_read_of_float_is_zero() {
    let bytes = encode("/f", &[Element::Float32(1.0)]);
    let mut decoder = Decoder::new();
    let msg = decoder.decode(&bytes).unwrap();
    // 1.0f32 has bits 0x3F800000; a reinterpreting read would return those
    assert_eq!(msg.values().read_int32_element(0), 0);
}

#[test]
fn one_past_end_returns_default_in_both_modes() {
    let bytes = encode("/n", &[Element::Int32(3), Element::String("s")]);
    for config in [ReadConfig::default(), ReadConfig::UNCHECKED] {
        let mut decoder = Decoder::with_config(config);
        let msg = decoder.decode(&bytes).unwrap();
        let values = msg.values();
        let end = values.element_count();
        assert_eq!(values.read_int32_element(end), 0);
        assert_eq!(values.read_string_element(end), "");
        assert_eq!(values.read_blob_element(end), &[] as &[u8]);
        assert_eq!(values.read_float64_element(end), 0.0);
        assert_eq!(values.read_timestamp_element(end), TimeTag::default());
        assert_eq!(values.read_char_element(end), '\0');
    }
}

#[test]
fn oversized_blob_length_yields_no_elements() {
    let mut bytes = encode("/b", &[Element::Blob(&[1, 2, 3, 4])]);
    // declared length 4 -> 200
    bytes[8..12].copy_from_slice(&200u32.to_be_bytes());

    let mut decoder = Decoder::new();
    let result = decoder.decode(&bytes).map(|msg| msg.element_count());
    assert!(matches!(
        result,
        Err(ProtocolError::MalformedMessage(Malformation::Truncated { .. }))
    ));
    assert_eq!(decoder.element_count(), 0);
}

#[test]
fn decoder_reuse_replaces_index() {
    let first = encode("/first", &[Element::Int32(1), Element::Int32(2), Element::Int32(3)]);
    let second = encode("/second", &[Element::String("only")]);

    let mut decoder = Decoder::new();
    assert_eq!(decoder.decode(&first).unwrap().element_count(), 3);

    let msg = decoder.decode(&second).unwrap();
    assert_eq!(msg.address(), "/second");
    assert_eq!(msg.element_count(), 1);
    assert_eq!(msg.values().read_string_element(0), "only");
}

#[test]
fn buffer_overflow_is_reported() {
    let mut writer = Writer::new(32);
    let big = [0u8; 64];
    let err = writer.write_message("/big", &[Element::Blob(&big)]).unwrap_err();
    assert!(matches!(err, ProtocolError::BufferOverflow { .. }));
    assert_eq!(writer.len(), 0);
}
