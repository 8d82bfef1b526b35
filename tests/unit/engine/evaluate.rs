use super::*;
use chrono::TimeZone;

use crate::astro::source::FixedInstants;
use crate::timewheel::clock::AnchorTime;

fn at(d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, d, h, mi, 0).unwrap()
}

fn record() -> Value {
    json!({
        "location": {"latitude": 51.5, "longitude": -0.1},
        "fades": [
            {"time": "06:00", "brightness": 100},
            {"time": "18:00", "brightness": 200},
        ],
    })
}

fn anchor(brightness: i64, before: DateTime<Utc>, after: DateTime<Utc>) -> Anchor {
    Anchor {
        time: AnchorTime::Clock { hour: 0, minute: 0 },
        offset_mins: 0,
        levels: Levels { brightness: Some(brightness), ..Levels::default() },
        before,
        after,
    }
}

fn built(now: DateTime<Utc>) -> EvaluationContext {
    let mut diag = Diagnostics::new();
    let ctx = setup(&record(), "hall", &FixedInstants::default(), now, &mut diag).unwrap();
    assert!(diag.is_empty());
    ctx
}

#[test]
fn setup_builds_context_and_brackets() {
    let ctx = built(at(1, 12, 0));
    assert_eq!(ctx.topic, "hall");
    assert!(ctx.enabled);
    assert_eq!(ctx.now_offset, Duration::zero());
    assert_eq!(ctx.anchors.len(), 2);
    assert!(ctx.last_data.is_none());

    // Noon sits between today's 06:00 and today's 18:00.
    assert_eq!(ctx.closest_before, 0);
    assert_eq!(ctx.closest_after, 1);
    assert_eq!(ctx.anchors[0].before, at(1, 6, 0));
    assert_eq!(ctx.anchors[1].after, at(1, 18, 0));

    // The fade list is retained for later window refreshes.
    assert!(ctx.raw_record.get("fades").is_some_and(Value::is_array));
}

#[test]
fn setup_without_location_is_fatal() {
    let mut diag = Diagnostics::new();
    let mut rec = record();
    rec.as_object_mut().unwrap().remove("location");
    let err = setup(&rec, "hall", &FixedInstants::default(), at(1, 12, 0), &mut diag).unwrap_err();
    assert!(matches!(err, LuxError::Location(_)));
    assert_eq!(diag.status(), Some("location error!"));
}

#[test]
fn setup_applies_the_now_override() {
    let mut rec = record();
    rec.as_object_mut()
        .unwrap()
        .insert("now".to_string(), json!("2026-06-01T23:00:00Z"));

    let mut diag = Diagnostics::new();
    let ctx = setup(&rec, "hall", &FixedInstants::default(), at(1, 12, 0), &mut diag).unwrap();
    assert_eq!(ctx.now_offset, Duration::hours(11));

    // At 23:00 the active window runs from today's 18:00 to tomorrow's 06:00.
    assert_eq!(ctx.anchors[ctx.closest_before].before, at(1, 18, 0));
    assert_eq!(ctx.anchors[ctx.closest_after].after, at(2, 6, 0));
}

#[test]
fn bracket_ties_pick_last_before_and_first_after() {
    let anchors = vec![
        anchor(1, at(1, 6, 0), at(1, 18, 0)),
        anchor(2, at(1, 6, 0), at(1, 18, 0)),
    ];
    assert_eq!(select_brackets(&anchors), Some((1, 0)));
    assert_eq!(select_brackets(&[]), None);
}

#[test]
fn interpolation_is_proportional_and_clamped() {
    let before = anchor(100, at(1, 6, 0), at(1, 18, 0));
    let after = anchor(200, at(1, 18, 0), at(2, 6, 0));

    let mid = interpolate(&before, &after, at(1, 18, 0)).unwrap();
    assert_eq!(mid.brightness, Some(150));

    let start = interpolate(&before, &after, at(1, 6, 0)).unwrap();
    assert_eq!(start.brightness, Some(100));

    // Outside the window, progress clamps to the nearest edge.
    let early = interpolate(&before, &after, at(1, 1, 0)).unwrap();
    assert_eq!(early.brightness, Some(100));
    let late = interpolate(&before, &after, at(2, 12, 0)).unwrap();
    assert_eq!(late.brightness, Some(200));
}

#[test]
fn interpolation_is_monotonic_across_the_window() {
    let before = anchor(100, at(1, 6, 0), at(1, 18, 0));
    let after = anchor(200, at(1, 18, 0), at(2, 6, 0));

    let mut last = 0;
    for hour_offset in 0..=24 {
        let now = at(1, 6, 0) + Duration::hours(hour_offset);
        let b = interpolate(&before, &after, now).unwrap().brightness.unwrap();
        assert!((100..=200).contains(&b));
        assert!(b >= last, "brightness fell from {last} to {b} at +{hour_offset}h");
        last = b;
    }
    assert_eq!(last, 200);
}

#[test]
fn zero_width_window_reads_as_progress_zero() {
    let t = at(1, 6, 0);
    let before = anchor(100, t, t);
    let after = anchor(200, t, t);
    let v = interpolate(&before, &after, t).unwrap();
    assert_eq!(v.brightness, Some(100));
}

#[test]
fn inverted_window_is_fatal() {
    let before = anchor(100, at(1, 18, 0), at(2, 6, 0));
    let after = anchor(200, at(1, 6, 0), at(1, 12, 0));
    let err = interpolate(&before, &after, at(1, 12, 0)).unwrap_err();
    assert!(matches!(err, LuxError::Window(_)));
}

#[test]
fn initial_tick_always_emits_without_transition() {
    let ctx = built(at(1, 12, 0));
    let step = Duration::milliseconds(5000);
    let (ctx, output) = evaluate(ctx, &FixedInstants::default(), at(1, 12, 0), TickKind::Initial, step);

    let output = output.unwrap();
    assert_eq!(output.data.brightness, Some(150));
    assert_eq!(output.transition_secs, None);
    assert_eq!(ctx.last_data, Some(output.data));
}

#[test]
fn recurring_tick_emits_only_on_change() {
    let ctx = built(at(1, 12, 0));
    let step = Duration::milliseconds(5000);
    let source = FixedInstants::default();

    let (ctx, first) = evaluate(ctx, &source, at(1, 12, 0), TickKind::Initial, step);
    assert!(first.is_some());

    // Same instant, same interpolated set: suppressed.
    let (ctx, repeat) = evaluate(ctx, &source, at(1, 12, 0), TickKind::Recurring, step);
    assert!(repeat.is_none());

    // An hour later the set has moved, so the tick emits with the step as
    // its transition duration.
    let (_, moved) = evaluate(ctx, &source, at(1, 13, 0), TickKind::Recurring, step);
    let moved = moved.unwrap();
    assert!(moved.data.brightness.unwrap() > 150);
    assert_eq!(moved.transition_secs, Some(5.0));
}

#[test]
fn disabled_channel_emits_nothing() {
    let mut ctx = built(at(1, 12, 0));
    ctx.enabled = false;
    let (ctx, output) =
        evaluate(ctx, &FixedInstants::default(), at(1, 12, 0), TickKind::Initial, Duration::milliseconds(5000));
    assert!(output.is_none());
    assert!(ctx.last_data.is_none());
}

#[test]
fn leaving_the_window_triggers_a_refresh() {
    // Built at noon, ticked at 23:00: "now" has left the 06:00..18:00
    // window and the brackets are rebuilt around the evening pair.
    let ctx = built(at(1, 12, 0));
    let (ctx, output) =
        evaluate(ctx, &FixedInstants::default(), at(1, 23, 0), TickKind::Recurring, Duration::milliseconds(5000));

    assert_eq!(ctx.anchors[ctx.closest_before].before, at(1, 18, 0));
    assert_eq!(ctx.anchors[ctx.closest_after].after, at(2, 6, 0));

    // 5 of 12 hours through the 200 -> 100 descent.
    assert_eq!(output.unwrap().data.brightness, Some(158));
}
