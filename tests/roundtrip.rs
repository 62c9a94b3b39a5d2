//! Printer tests: parse(print(t)) == t, and the printed form is canonical and stable.

use quantdsl::{
    parse, print, AnyQuantizedType, CalibratedQuantizedType, DescriptorError, FloatKind, QuantileQuantizedPerAxisType,
    QuantileQuantizedType, QuantileType, QuantizedType, ScaleZeroPoint, StorageSpec, StorageType,
    UniformQuantizedType, MAX_INTEGER_WIDTH,
};

fn canonical(src: &str) -> String {
    print(&parse(src).unwrap_or_else(|e| panic!("{}: {}", src, e)))
}

fn assert_round_trip(ty: QuantizedType) {
    let text = print(&ty);
    let back = parse(&text).unwrap_or_else(|e| panic!("{}: {}", text, e));
    assert_eq!(back, ty, "{}", text);
}

#[test]
fn canonical_forms_are_minimal() {
    let cases = [
        ("uniform<i8<-128:127>:f32, 1.0:0>", "uniform<i8:f32, 1.0>"),
        ("uniform<i8:f32, {0.5:0}>", "uniform<i8:f32, 0.5>"),
        ("uniform<u8:f32:2, {1:0, 2.50:3}>", "uniform<u8:f32:2, {1.0,2.5:3}>"),
        ("any<u8<0:255>>", "any<u8>"),
        ("any<ui8:f16>", "any<u8:f16>"),
        ("any<si8>", "any<i8>"),
        ("any<f8E4M3FN<-448:448>:f32>", "any<f8E4M3FN:f32>"),
        ("any<f8E4M3FN<-100:448>:f32>", "any<f8E4M3FN<-100:448>:f32>"),
        ("quantile<i8:f32:f32, {0.1,0.5,0.9}:1.0:0>", "quantile<i8:f32:f32, {0.1,0.5,0.9}:1.0>"),
        ("quantile<u4:si8:f16:0, {1e0, 2E1}:{0.5:-1}>", "quantile<u4:i8:f16:0, {1.0,20.0}:{0.5:-1}>"),
        ("quantile<u4:ui4:f32, {0.25}:3.0:7>", "quantile<u4:u4:f32, {0.25}:3.0:7>"),
        ("calibrated<f32<-1:1>>", "calibrated<f32<-1.0:1.0>>"),
    ];
    for (src, expected) in cases {
        assert_eq!(canonical(src), expected, "{}", src);
    }
}

#[test]
fn canonical_form_is_stable() {
    let sources = [
        "uniform<i4<-7:7>:bf16:3, {0.001:1,1e-9:-2,12345.678}>",
        "quantile<f8E5M2:f8E5M2:f32, {-57344.0,0.0,57344.0}:0.125:-2>",
        "calibrated<f64<0.1:0.3>>",
        "any<u32<0:4294967295>>",
        "uniform<i32<-2147483648:0>:f32, 1e20>",
    ];
    for src in sources {
        let once = canonical(src);
        assert_eq!(canonical(&once), once, "{}", src);
    }
}

#[test]
fn calibrated_round_trip_is_exact() {
    let text = "calibrated<f32<-1.0:1.0>>";
    assert_eq!(canonical(text), text);
    let QuantizedType::Calibrated(t) = parse(text).expect("parse") else {
        panic!("expected calibrated");
    };
    assert!(QuantizedType::from(t.clone()).storage().is_none());
    assert_round_trip(t.into());
}

#[test]
fn constructed_descriptors_round_trip() {
    let i8s = StorageSpec::with_natural_range(StorageType::integer(8, true)).unwrap();
    let narrow = StorageSpec::new(StorageType::integer(5, false), 3, 30).unwrap();
    let e5m2 = StorageSpec::with_natural_range(StorageType::float8(FloatKind::F8E5M2).unwrap()).unwrap();

    assert_round_trip(AnyQuantizedType::new(narrow, None).unwrap().into());
    assert_round_trip(AnyQuantizedType::new(e5m2, Some(FloatKind::F16)).unwrap().into());
    assert_round_trip(
        UniformQuantizedType::new(i8s, FloatKind::F32, ScaleZeroPoint::new(0.1 + 0.2, -17))
            .unwrap()
            .into(),
    );
    assert_round_trip(
        QuantileQuantizedPerAxisType::new(
            narrow,
            QuantileType::Float(FloatKind::BF16),
            FloatKind::F64,
            7,
            vec![1.0 / 3.0, 2.0 / 3.0, -0.0],
            vec![ScaleZeroPoint::new(f64::MIN_POSITIVE, 0), ScaleZeroPoint::new(f64::MAX, i64::MIN)],
        )
        .unwrap()
        .into(),
    );
    assert_round_trip(CalibratedQuantizedType::new(FloatKind::F80, 5.5, -5.5).unwrap().into());
}

#[test]
fn quantile_width_limited_to_printable_types() {
    let i8s = StorageSpec::with_natural_range(StorageType::integer(8, true)).unwrap();
    let widest = QuantileType::Integer { width: MAX_INTEGER_WIDTH, signed: true };
    assert_round_trip(
        QuantileQuantizedType::new(i8s, widest, FloatKind::F32, vec![0.5], ScaleZeroPoint::new(1.0, 0))
            .unwrap()
            .into(),
    );

    let too_wide = MAX_INTEGER_WIDTH + 1;
    for signed in [true, false] {
        let ty = QuantileType::Integer { width: too_wide, signed };
        assert_eq!(
            QuantileQuantizedType::new(i8s, ty, FloatKind::F32, vec![0.5], ScaleZeroPoint::new(1.0, 0)),
            Err(DescriptorError::IllegalQuantileWidth(too_wide))
        );
        assert_eq!(
            QuantileQuantizedPerAxisType::new(i8s, ty, FloatKind::F32, 0, vec![0.5], vec![ScaleZeroPoint::new(1.0, 0)]),
            Err(DescriptorError::IllegalQuantileWidth(too_wide))
        );
    }
}

#[test]
fn display_matches_print() {
    let ty = parse("uniform<i8:f32:0, {1.0,2.0:1}>").expect("parse");
    assert_eq!(ty.to_string(), print(&ty));
}
