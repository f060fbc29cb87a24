//! Headless sandbox for the capsule controller.
//!
//! Loads settings, builds the scene collider on a loader thread, and runs a
//! fixed-rate frame loop driven by a scripted input timeline.

mod scene;
mod script;

use std::{
    fs,
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver},
    thread,
};

use anyhow::{Context, Result, anyhow, ensure};
use clap::Parser;
use kcc::{ColliderError, ControllerSettings, Simulation, StaticCollider, ViewMode};

use scene::SceneFile;
use script::Timeline;

/// Walk a capsule actor through a static triangle scene.
#[derive(Parser, Debug)]
#[command(name = "kcc-sandbox")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Controller settings (JSON); missing fields use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scene description (JSON); defaults to the built-in demo scene
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Input timeline (JSON); defaults to the built-in demo script
    #[arg(long)]
    script: Option<PathBuf>,

    /// Simulated duration in seconds
    #[arg(long, default_value = "12")]
    seconds: f32,

    /// Frames per simulated second
    #[arg(long, default_value = "60")]
    fps: f32,

    /// Frames to wait before the loaded collider is picked up
    #[arg(long, default_value = "0")]
    collider_delay_frames: u64,

    /// Start in first-person view
    #[arg(long)]
    first_person: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    run(&cli)?;
    Ok(())
}

fn run(cli: &Cli) -> Result<RunStats> {
    ensure!(cli.fps.is_finite() && cli.fps > 0.0, "--fps must be positive");
    ensure!(
        cli.seconds.is_finite() && cli.seconds >= 0.0,
        "--seconds must not be negative"
    );

    let settings = match &cli.config {
        Some(path) => load_settings(path)?,
        None => ControllerSettings::default(),
    };
    let scene = match &cli.scene {
        Some(path) => SceneFile::load(path)?,
        None => SceneFile::demo(),
    };
    let mut timeline = match &cli.script {
        Some(path) => Timeline::load(path)?,
        None => Timeline::demo(),
    };
    log::info!(
        "{} scene objects, {} script events, {} physics steps per frame",
        scene.objects.len(),
        timeline.len(),
        settings.physics_steps
    );
    if timeline.is_empty() {
        log::warn!("script has no events; the actor will only fall and stand");
    }

    // The loader owns the scene until it hands back the finished collider.
    let (tx, rx) = mpsc::channel::<Result<StaticCollider, ColliderError>>();
    let loader = thread::Builder::new()
        .name("collider-loader".into())
        .spawn(move || {
            let collider = scene.build();
            // The frame loop may already be gone.
            let _ = tx.send(collider);
        })
        .context("spawning collider loader")?;

    let mut sim = Simulation::new(settings);
    if cli.first_person {
        sim.set_view_mode(ViewMode::FirstPerson);
    }
    sim.attach_actor();
    log::debug!(
        "actor {} in {:?} view",
        if sim.mode().actor_visible() { "shown" } else { "hidden" },
        sim.mode()
    );

    let frame_dt = 1.0 / cli.fps;
    let frames = (cli.seconds * cli.fps).round() as u64;
    let log_every = (cli.fps.round() as u64).max(1);

    let mut pending = Some(rx);
    let mut stats = RunStats::default();

    for frame in 0..frames {
        let now = frame as f32 * frame_dt;

        // Waits for the loader; the delay is counted in frames, not wall time.
        if frame == cli.collider_delay_frames {
            if let Some(rx) = pending.take() {
                receive_collider(&rx, &mut sim);
            }
        }

        for event in timeline.due(now) {
            event.apply(&mut sim);
        }

        let report = sim.tick(frame_dt);
        stats.frames += 1;
        stats.substeps += u64::from(report.substeps);
        stats.contacts += u64::from(report.contacts);
        stats.respawns += u64::from(report.respawned);
        if report.on_ground {
            stats.grounded_frames += 1;
        }

        if frame % log_every == 0 {
            if let Some(actor) = sim.actor() {
                log::info!(
                    "t={now:>5.2}s pos=({:>7.3}, {:>7.3}, {:>7.3}) vel=({:>7.3}, {:>7.3}, {:>7.3}) ground={} contacts={}",
                    actor.position.x,
                    actor.position.y,
                    actor.position.z,
                    actor.velocity.x,
                    actor.velocity.y,
                    actor.velocity.z,
                    actor.on_ground,
                    report.contacts
                );
            }
        }
    }

    loader
        .join()
        .map_err(|_| anyhow!("collider loader panicked"))?;

    if sim.collider().is_none() {
        log::warn!("run ended before a collider was attached");
    }
    if !timeline.is_finished() {
        log::warn!("run ended before the script did");
    }
    stats.log_summary(&sim);
    Ok(stats)
}

fn load_settings(path: &Path) -> Result<ControllerSettings> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading settings {}", path.display()))?;
    let settings: ControllerSettings = serde_json::from_str(&text)
        .with_context(|| format!("parsing settings {}", path.display()))?;
    settings
        .validate()
        .with_context(|| format!("invalid settings in {}", path.display()))?;
    Ok(settings)
}

/// Block until the loader hands over its collider and attach it. A failed
/// load is logged and the world stays empty.
fn receive_collider(
    rx: &Receiver<Result<StaticCollider, ColliderError>>,
    sim: &mut Simulation,
) {
    match rx.recv() {
        Ok(Ok(collider)) => {
            if let Some(bounds) = collider.world_bounds() {
                log::debug!(
                    "collider ready: {} triangles within {:?}..{:?}",
                    collider.triangle_count(),
                    bounds.mins,
                    bounds.maxs
                );
            }
            sim.attach_collider(collider);
        }
        Ok(Err(err)) => log::error!("collider build failed: {err}"),
        Err(_) => log::error!("collider loader exited without a result"),
    }
}

#[derive(Debug, Default)]
struct RunStats {
    frames: u64,
    substeps: u64,
    contacts: u64,
    respawns: u64,
    grounded_frames: u64,
}

impl RunStats {
    fn log_summary(&self, sim: &Simulation) {
        log::info!(
            "done: {} frames, {} substeps, {} contacts, {} respawns, grounded {}/{} frames",
            self.frames,
            self.substeps,
            self.contacts,
            self.respawns,
            self.grounded_frames,
            self.frames
        );
        if let Some(actor) = sim.actor() {
            log::info!(
                "final pos=({:.3}, {:.3}, {:.3}) ground={}",
                actor.position.x,
                actor.position.y,
                actor.position.z,
                actor.on_ground
            );
        }
    }
}
