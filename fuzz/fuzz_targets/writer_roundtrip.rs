#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use trellis_decoder::Decoder;
use trellis_encoder::Writer;

// Fuzz target: whatever the writer emits, the decoder reads back intact.

#[derive(Arbitrary, Debug)]
enum Scalar {
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    F64(f64),
    Str(String),
    Bin(Vec<u8>),
}

fuzz_target!(|values: Vec<Scalar>| {
    let mut w = Writer::new();
    for value in &values {
        match value {
            Scalar::Nil => {
                w.write_nil();
            }
            Scalar::Bool(v) => {
                w.write_bool(*v);
            }
            Scalar::Int(v) => {
                w.write_i64(*v);
            }
            Scalar::Uint(v) => {
                w.write_u64(*v);
            }
            Scalar::F64(v) => {
                w.write_f64(*v);
            }
            Scalar::Str(v) => {
                w.write_str(v);
            }
            Scalar::Bin(v) => {
                w.write_bin(v);
            }
        }
    }
    let buf = w.into_bytes();

    let mut dec = Decoder::new(&buf);
    for value in &values {
        match value {
            Scalar::Nil => assert!(dec.try_read_nil().unwrap()),
            Scalar::Bool(v) => assert_eq!(dec.read::<bool>().unwrap(), *v),
            Scalar::Int(v) => assert_eq!(dec.read::<i64>().unwrap(), *v),
            Scalar::Uint(v) => assert_eq!(dec.read::<u64>().unwrap(), *v),
            Scalar::F64(v) => {
                let back = dec.read::<f64>().unwrap();
                assert!(back == *v || (back.is_nan() && v.is_nan()));
            }
            Scalar::Str(v) => assert_eq!(dec.read::<&str>().unwrap(), v),
            Scalar::Bin(v) => assert_eq!(dec.read_binary().unwrap(), v.as_slice()),
        }
    }
    assert_eq!(dec.position(), buf.len());
});
