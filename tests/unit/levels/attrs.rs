use super::*;

fn full(brightness: i64, kelvin: i64) -> Levels {
    Levels {
        brightness: Some(brightness),
        kelvin: Some(kelvin),
        rgb_color: Some([0, 100, 200]),
        hs_color: Some([120.0, 50.0]),
        ..Levels::default()
    }
}

#[test]
fn endpoints_reproduce_the_anchors() {
    let before = full(100, 2000);
    let after = full(200, 6500);
    assert_eq!(Levels::interpolate(&before, &after, 0.0), before);
    assert_eq!(Levels::interpolate(&before, &after, 1.0), after);
}

#[test]
fn midpoint_rounds_integers_and_keeps_float_precision() {
    let before = Levels {
        brightness: Some(100),
        hs_color: Some([0.0, 0.0]),
        ..Levels::default()
    };
    let after = Levels {
        brightness: Some(101),
        hs_color: Some([1.0, 1.0]),
        ..Levels::default()
    };
    let mid = Levels::interpolate(&before, &after, 0.5);
    // .5 rounds away from zero.
    assert_eq!(mid.brightness, Some(101));
    assert_eq!(mid.hs_color, Some([0.5, 0.5]));
}

#[test]
fn one_sided_attributes_are_omitted() {
    let before = Levels { brightness: Some(10), color_temp: Some(200), ..Levels::default() };
    let after = Levels { brightness: Some(20), xy_color: Some([0.1, 0.2]), ..Levels::default() };
    let mid = Levels::interpolate(&before, &after, 0.5);
    assert_eq!(mid.brightness, Some(15));
    assert_eq!(mid.color_temp, None);
    assert_eq!(mid.xy_color, None);
}

#[test]
fn results_stay_inside_each_domain() {
    let before = full(0, MIN_KELVIN);
    let after = full(MAX_BRIGHTNESS, MAX_KELVIN);
    for step in 0..=20 {
        let t = step as f64 / 20.0;
        let v = Levels::interpolate(&before, &after, t);
        let b = v.brightness.unwrap();
        assert!((0..=MAX_BRIGHTNESS).contains(&b));
        let k = v.kelvin.unwrap();
        assert!((MIN_KELVIN..=MAX_KELVIN).contains(&k));
        for c in v.rgb_color.unwrap() {
            assert!((0..=MAX_RGB).contains(&c));
        }
        let [h, s] = v.hs_color.unwrap();
        assert!((0.0..=MAX_HUE).contains(&h));
        assert!((0.0..=MAX_SAT).contains(&s));
    }
}

#[test]
fn vectors_interpolate_element_wise() {
    let before = Levels { rgbww_color: Some([0, 50, 100, 150, 200]), ..Levels::default() };
    let after = Levels { rgbww_color: Some([100, 150, 200, 250, 0]), ..Levels::default() };
    let mid = Levels::interpolate(&before, &after, 0.5);
    assert_eq!(mid.rgbww_color, Some([50, 100, 150, 200, 100]));
}

#[test]
fn color_temp_clamps_to_mired_floor() {
    // Domain clamping applies even at the endpoints of the lerp.
    let before = Levels { color_temp: Some(MIN_MIREDS), ..Levels::default() };
    let after = Levels { color_temp: Some(MAX_MIREDS), ..Levels::default() };
    let v = Levels::interpolate(&before, &after, 0.0);
    assert_eq!(v.color_temp, Some(MIN_MIREDS));
}

#[test]
fn same_levels_detects_any_single_change() {
    let a = full(100, 3000);

    let mut b = a.clone();
    assert!(a.same_levels(&b));

    b.brightness = Some(101);
    assert!(!a.same_levels(&b));

    let mut c = a.clone();
    c.rgb_color = Some([0, 100, 201]);
    assert!(!a.same_levels(&c));

    let mut d = a.clone();
    d.hs_color = None;
    assert!(!a.same_levels(&d));
}

#[test]
fn empty_levels_report_empty() {
    assert!(Levels::default().is_empty());
    assert!(!full(1, 2000).is_empty());
}

#[test]
fn serialization_skips_unset_attributes() {
    let v = serde_json::to_value(Levels { brightness: Some(7), ..Levels::default() }).unwrap();
    let obj = v.as_object().unwrap();
    assert_eq!(obj.len(), 1);
    assert_eq!(obj["brightness"], 7);
}
