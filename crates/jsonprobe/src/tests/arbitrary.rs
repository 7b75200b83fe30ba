use alloc::string::String;

use quickcheck::{Arbitrary, Gen};

use crate::{Array, Map, Value};

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct FiniteF64(pub f64);

impl Arbitrary for FiniteF64 {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut value = f64::arbitrary(g);
        while !value.is_finite() {
            value = f64::arbitrary(g);
        }
        FiniteF64(value)
    }
}

impl Arbitrary for Value {
    fn arbitrary(g: &mut Gen) -> Self {
        fn gen_val(g: &mut Gen, depth: usize) -> Value {
            if depth == 0 {
                match usize::arbitrary(g) % 5 {
                    0 => Value::Null,
                    1 => Value::Boolean(bool::arbitrary(g)),
                    2 => Value::Integer(i64::arbitrary(g)),
                    3 => Value::Float(FiniteF64::arbitrary(g).0),
                    _ => Value::String(String::arbitrary(g)),
                }
            } else {
                match usize::arbitrary(g) % 7 {
                    0 => Value::Null,
                    1 => Value::Boolean(bool::arbitrary(g)),
                    2 => Value::Integer(i64::arbitrary(g)),
                    3 => Value::Float(FiniteF64::arbitrary(g).0),
                    4 => Value::String(String::arbitrary(g)),
                    5 => {
                        let len = usize::arbitrary(g) % 4;
                        let mut arr = Array::new();
                        for _ in 0..len {
                            arr.push(gen_val(g, depth - 1));
                        }
                        Value::Array(arr)
                    }
                    _ => {
                        let len = usize::arbitrary(g) % 4;
                        let mut map = Map::new();
                        for _ in 0..len {
                            map.insert(String::arbitrary(g), gen_val(g, depth - 1));
                        }
                        Value::Object(map)
                    }
                }
            }
        }

        let depth = usize::arbitrary(g) % 3;
        gen_val(g, depth)
    }
}
