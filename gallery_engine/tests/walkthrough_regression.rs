use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tempfile::tempdir;

#[derive(Debug, Deserialize)]
struct MovementSample {
    tick: u32,
    position: [f32; 3],
    #[allow(dead_code)]
    yaw: f32,
    rotation: f32,
    moving: bool,
    focused: Option<usize>,
}

fn run_demo(demo_args: &[&str], dir: &Path) -> Result<(Vec<MovementSample>, Vec<Value>)> {
    let movement_path = dir.join("movement.json");
    let event_path = dir.join("events.json");

    let status = Command::new(env!("CARGO_BIN_EXE_gallery_engine"))
        .args(demo_args)
        .args([
            "--movement-log-json",
            movement_path.to_str().context("movement path utf-8")?,
            "--event-log-json",
            event_path.to_str().context("event path utf-8")?,
        ])
        .status()
        .context("executing gallery_engine")?;
    assert!(status.success(), "gallery_engine exited with {status:?}");

    let samples: Vec<MovementSample> =
        serde_json::from_str(&fs::read_to_string(&movement_path)?)
            .context("parsing movement log")?;
    let events: Vec<Value> = serde_json::from_str(&fs::read_to_string(&event_path)?)
        .context("parsing event log")?;
    Ok((samples, events))
}

fn kinds(events: &[Value]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|event| event.get("kind").and_then(Value::as_str))
        .collect()
}

#[test]
fn walk_demo_stays_inside_the_hall_and_opens_a_painting() -> Result<()> {
    let dir = tempdir().context("tempdir")?;
    let (samples, events) = run_demo(&["--walk-demo"], dir.path())?;

    assert!(!samples.is_empty(), "demo produced no movement samples");
    // Hall bounds for the seven-painting fallback catalog.
    for sample in &samples {
        let [x, y, z] = sample.position;
        assert!((-2.5..=2.5).contains(&x), "tick {}: x={x}", sample.tick);
        assert!((-0.5..=2.5).contains(&y), "tick {}: y={y}", sample.tick);
        assert!((-5.0..=17.0).contains(&z), "tick {}: z={z}", sample.tick);
        assert_eq!(sample.rotation, 0.0, "hall never rotates");
    }
    assert!(
        samples.iter().any(|sample| sample.moving),
        "the walk phase should register as moving"
    );
    let focused = samples
        .iter()
        .find_map(|sample| sample.focused)
        .context("no painting ever took focus")?;
    assert_eq!(focused, 2, "the script dwells on painting 2");

    let kinds = kinds(&events);
    assert_eq!(kinds.first(), Some(&"capture_changed"));
    for expected in [
        "focus_changed",
        "item_activated",
        "overlay_opened",
        "overlay_closed",
    ] {
        assert!(kinds.contains(&expected), "missing {expected} in {kinds:?}");
    }

    // Exactly one focus edge: the ray settles on one painting and stays.
    let focus_edges = kinds.iter().filter(|kind| **kind == "focus_changed").count();
    assert_eq!(focus_edges, 1);

    // The overlay released capture and restored it afterwards.
    let captures: Vec<bool> = events
        .iter()
        .filter(|event| event["kind"] == "capture_changed")
        .map(|event| event["captured"].as_bool().expect("captured flag"))
        .collect();
    assert_eq!(captures, vec![true, false, true]);

    let activated = events
        .iter()
        .find(|event| event["kind"] == "item_activated")
        .context("no activation event")?;
    assert_eq!(activated["index"], 2);
    Ok(())
}

#[test]
fn turn_demo_supersedes_and_completes_started_turns() -> Result<()> {
    let dir = tempdir().context("tempdir")?;
    let (samples, events) =
        run_demo(&["--turn-demo", "--variant", "rotunda"], dir.path())?;

    let kinds = kinds(&events);
    let started: Vec<&Value> = events
        .iter()
        .filter(|event| event["kind"] == "turn_started")
        .collect();
    let completed: Vec<&Value> = events
        .iter()
        .filter(|event| event["kind"] == "turn_completed")
        .collect();
    assert_eq!(started.len(), 3, "{kinds:?}");
    assert_eq!(completed.len(), 2, "the superseded turn must not complete");

    // Each completion carries the index precomputed by the turn it ends:
    // the second and third starts are the ones that run to completion.
    assert_eq!(completed[0]["next_index"], started[1]["next_index"]);
    assert_eq!(completed[1]["next_index"], started[2]["next_index"]);

    // The supersede happens half a key-turn in, so the net of two lefts and
    // one right leaves the ring half a slot off its resting grid. That
    // offset is the policy's observable signature.
    let last = samples.last().context("no samples")?;
    let slot = std::f32::consts::TAU / 7.0;
    assert!(
        (last.rotation + slot / 2.0).abs() < 0.01,
        "final rotation {} should sit half a slot left of rest",
        last.rotation
    );
    assert!(
        samples.iter().any(|sample| sample.rotation != last.rotation),
        "the rotation must move during the demo"
    );
    Ok(())
}

#[test]
fn custom_catalog_sizes_the_hall() -> Result<()> {
    let dir = tempdir().context("tempdir")?;
    let catalog_path = dir.path().join("two.catalog");
    fs::write(
        &catalog_path,
        "P901|a.jpg|First|Painter A|1900|One.|100|true|false||true|||\n\
         P902|b.jpg|Second|Painter B|1901|Two.|200|true|false||true|||\n",
    )?;

    let (samples, _events) = run_demo(
        &[
            "--walk-demo",
            "--catalog",
            catalog_path.to_str().context("catalog path utf-8")?,
        ],
        dir.path(),
    )?;

    // Two paintings end the corridor at z = 7 instead of 17; the walk still
    // covers real ground without ever crossing the shorter clamp.
    for sample in &samples {
        assert!(sample.position[2] <= 7.0 + 1e-4);
    }
    let deepest = samples
        .iter()
        .map(|sample| sample.position[2])
        .fold(f32::MIN, f32::max);
    assert!(deepest > 2.0, "deepest {deepest}");
    Ok(())
}
