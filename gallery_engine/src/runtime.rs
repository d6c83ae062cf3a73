use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use gallery_catalog::{Catalog, resolve_images};
use gallery_core::{
    ControllerConfig, GalleryController, GalleryEvent, GalleryGeometry, KeySnapshot,
    KeyboardState, TurnDirection, TurnStyle,
};

use crate::cli::{Command, DemoArgs, InspectArgs, Variant};

/// Demos run at a fixed 60 Hz so their logs are reproducible.
const TICK: f32 = 1.0 / 60.0;

/// One captured frame of a demo run.
#[derive(Debug, Clone, Serialize)]
struct MovementSample {
    tick: u32,
    position: [f32; 3],
    yaw: f32,
    rotation: f32,
    moving: bool,
    focused: Option<usize>,
}

#[derive(Debug, Default)]
struct DemoRecorder {
    samples: Vec<MovementSample>,
    events: Vec<GalleryEvent>,
    tick: u32,
}

impl DemoRecorder {
    fn step(&mut self, controller: &mut GalleryController, keys: &KeySnapshot) {
        controller.tick(TICK, keys);
        self.events.extend(controller.drain_events());
        let pose = controller.pose();
        self.samples.push(MovementSample {
            tick: self.tick,
            position: pose.position.to_array(),
            yaw: pose.yaw,
            rotation: controller.rotation(),
            moving: controller.is_moving(),
            focused: controller.focused(),
        });
        self.tick += 1;
    }

    fn run(&mut self, controller: &mut GalleryController, ticks: u32, keys: KeySnapshot) {
        for _ in 0..ticks {
            self.step(controller, &keys);
        }
    }

    fn absorb(&mut self, controller: &mut GalleryController) {
        self.events.extend(controller.drain_events());
    }
}

pub fn execute(command: Command) -> Result<()> {
    match command {
        Command::List(args) => list_paintings(args),
        Command::Walk(args) => run_walk_demo(args),
        Command::Turn(args) => run_turn_demo(args),
    }
}

fn load_catalog(path: Option<&Path>, assets_root: Option<&Path>) -> Catalog {
    let catalog = Catalog::load_or_fallback(path);
    if let Some(root) = assets_root {
        let resolution = resolve_images(root, &catalog);
        eprintln!(
            "[gallery_engine] info: {} of {} images found under {}",
            resolution.resolved.len(),
            catalog.len(),
            root.display()
        );
        for image in &resolution.missing {
            eprintln!("[gallery_engine] warning: image {image} not found");
        }
    }
    catalog
}

fn list_paintings(args: InspectArgs) -> Result<()> {
    let catalog = load_catalog(args.catalog.as_deref(), args.assets_root.as_deref());
    println!("{} paintings", catalog.len());
    for (index, record) in catalog.records().iter().enumerate() {
        let year = record
            .year
            .map(|year| year.to_string())
            .unwrap_or_else(|| "----".to_string());
        println!(
            "{index:>3} {id:<6} {year:>5}  {title} ({artist})",
            id = record.id,
            title = record.title,
            artist = record.artist
        );
    }
    Ok(())
}

fn build_gallery(variant: Variant, count: usize) -> Result<GalleryGeometry> {
    let geometry = match variant {
        Variant::Hall => GalleryGeometry::hall(count),
        Variant::Rotunda => GalleryGeometry::rotunda(count),
    }?;
    info!("built {variant:?} gallery with {count} paintings");
    Ok(geometry)
}

/// Scripted walkthrough: capture, walk down the corridor, look at a side
/// wall until a painting takes focus, activate it, sit in the overlay, and
/// come back out.
fn run_walk_demo(args: DemoArgs) -> Result<()> {
    let catalog = load_catalog(args.catalog.as_deref(), args.assets_root.as_deref());
    let geometry = build_gallery(args.variant, catalog.len())?;
    let mut controller = GalleryController::new(geometry, ControllerConfig::default());
    let mut recorder = DemoRecorder::default();

    controller.set_captured(true);
    recorder.absorb(&mut controller);

    // Four seconds straight down the corridor.
    let mut keyboard = KeyboardState::default();
    keyboard.key_event("KeyW", true);
    recorder.run(&mut controller, 240, keyboard.snapshot());
    keyboard.key_event("KeyW", false);

    // Snap the view a quarter turn onto the left wall (one large pointer
    // delta, as a real flick delivers), then dwell until focus settles.
    let quarter_turn_dx = std::f32::consts::FRAC_PI_2 / 0.002;
    controller.pointer_moved(quarter_turn_dx, 0.0);
    recorder.run(&mut controller, 90, KeySnapshot::default());

    if let Some(index) = controller.activate() {
        controller.open_overlay(index);
        recorder.absorb(&mut controller);
        recorder.run(&mut controller, 30, KeySnapshot::default());
        if controller.close_overlay() {
            controller.set_captured(true);
        }
        recorder.absorb(&mut controller);
    }
    recorder.run(&mut controller, 30, KeySnapshot::default());

    let pose = controller.pose();
    eprintln!(
        "[gallery_engine] info: walk demo finished at ({:.2}, {:.2}, {:.2}) after {} ticks, {} events",
        pose.position.x,
        pose.position.y,
        pose.position.z,
        recorder.tick,
        recorder.events.len()
    );
    write_logs(&recorder, args.movement_log_json.as_ref(), args.event_log_json.as_ref())
}

/// Scripted turns: start a key turn, supersede it mid-flight, let the
/// replacement finish, then take one arrow turn back.
fn run_turn_demo(args: DemoArgs) -> Result<()> {
    let catalog = load_catalog(args.catalog.as_deref(), args.assets_root.as_deref());
    let geometry = build_gallery(args.variant, catalog.len())?;
    let mut controller = GalleryController::new(geometry, ControllerConfig::default());
    let mut recorder = DemoRecorder::default();

    controller.turn(TurnDirection::Left, TurnStyle::KEYS);
    recorder.absorb(&mut controller);
    recorder.run(&mut controller, 30, KeySnapshot::default());

    // Mid-flight command: the running turn is superseded, not queued.
    controller.turn(TurnDirection::Left, TurnStyle::KEYS);
    recorder.absorb(&mut controller);
    recorder.run(&mut controller, 120, KeySnapshot::default());

    controller.turn(TurnDirection::Right, TurnStyle::ARROWS);
    recorder.absorb(&mut controller);
    recorder.run(&mut controller, 120, KeySnapshot::default());

    eprintln!(
        "[gallery_engine] info: turn demo settled on painting {} after {} ticks, {} events",
        controller.current_index(),
        recorder.tick,
        recorder.events.len()
    );
    write_logs(&recorder, args.movement_log_json.as_ref(), args.event_log_json.as_ref())
}

fn write_logs(
    recorder: &DemoRecorder,
    movement_path: Option<&PathBuf>,
    event_path: Option<&PathBuf>,
) -> Result<()> {
    if let Some(path) = movement_path {
        let json = serde_json::to_string_pretty(&recorder.samples)
            .context("serializing movement samples")?;
        fs::write(path, json)
            .with_context(|| format!("writing movement log {}", path.display()))?;
        eprintln!(
            "[gallery_engine] info: wrote {} movement samples to {}",
            recorder.samples.len(),
            path.display()
        );
    }
    if let Some(path) = event_path {
        let json =
            serde_json::to_string_pretty(&recorder.events).context("serializing events")?;
        fs::write(path, json).with_context(|| format!("writing event log {}", path.display()))?;
        eprintln!(
            "[gallery_engine] info: wrote {} events to {}",
            recorder.events.len(),
            path.display()
        );
    }
    Ok(())
}
