//! Tilt Run entry point
//!
//! Native: replays a scripted session against a prefs file and prints the
//! results. Web: sets up logging; the page drives the library directly.
//!
//! # Usage
//!
//! ```bash
//! tilt-run
//! tilt-run --prefs progress.json --settings settings.json
//! tilt-run --prefs progress.json --reset
//! ```

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    use tilt_run::persistence::LocalStoragePrefs;
    use tilt_run::{LevelSelect, PrefsProgressStore};

    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

    log::info!("Tilt Run starting...");

    let settings = tilt_run::Settings::load();
    let levels = demo::levels();
    let store = PrefsProgressStore::new(LocalStoragePrefs::load(), levels.names());
    let unlocked = LevelSelect::new(&levels)
        .entries(&store)
        .iter()
        .filter(|e| e.unlocked)
        .count();
    log::info!(
        "{} of {} levels unlocked (parallax sensitivity {})",
        unlocked,
        levels.len(),
        settings.parallax.sensitivity
    );
}

mod demo {
    use tilt_run::LevelDatabase;

    const LEVELS_JSON: &str = r#"{
        "levels": [
            { "name": "Level_1" },
            { "name": "Level_2", "time_grade3": 45.0, "time_grade2": 70.0, "time_grade1": 100.0 },
            { "name": "Level_3", "time_grade3": 90.0, "time_grade2": 130.0, "time_grade1": 180.0 }
        ]
    }"#;

    pub fn levels() -> LevelDatabase {
        match LevelDatabase::from_json(LEVELS_JSON) {
            Ok(levels) => levels,
            Err(e) => {
                log::warn!("Built-in level list rejected: {}", e);
                LevelDatabase::default()
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(clap::Parser, Debug)]
#[command(name = "tilt-run")]
#[command(version, about = "Tilt Run - level progression and gyro parallax demo")]
struct Args {
    /// Progress prefs file (default: tilt_run_prefs.json in the temp dir)
    #[arg(long, short = 'p')]
    prefs: Option<std::path::PathBuf>,

    /// Settings JSON file (defaults when omitted)
    #[arg(long, short = 's')]
    settings: Option<std::path::PathBuf>,

    /// Clear all progress before playing
    #[arg(long)]
    reset: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;
    use glam::{Quat, Vec3};
    use tilt_run::parallax::{InputSample, ScriptedSource};
    use tilt_run::persistence::FilePrefs;
    use tilt_run::progression::{LevelRun, WinScreenAction, reset_progress};
    use tilt_run::{LevelSelect, ParallaxController, PrefsProgressStore, Settings};

    env_logger::init();
    log::info!("Tilt Run (native) starting...");

    let args = Args::parse();
    let prefs_path = args
        .prefs
        .unwrap_or_else(|| std::env::temp_dir().join("tilt_run_prefs.json"));
    let settings = args
        .settings
        .as_deref()
        .map(Settings::load_from)
        .unwrap_or_default();

    let levels = demo::levels();
    let mut store = PrefsProgressStore::new(FilePrefs::open(&prefs_path), levels.names());

    if args.reset {
        if let Err(e) = reset_progress(&mut store) {
            log::error!("Reset failed: {}", e);
        }
    }

    // === Progression ===
    println!("\nPlaying levels ({})...", prefs_path.display());
    for (index, finish) in [(0, 59.9), (1, 72.0), (2, 240.0)] {
        let mut run = match LevelRun::start(&levels, index, &store, 0.0) {
            Ok(run) => run,
            Err(e) => {
                log::warn!("{}", e);
                continue;
            }
        };
        match run.complete(&mut store, &settings.progression, finish) {
            Ok(Some(report)) => {
                let times: Vec<&str> = report.thresholds.iter().map(|t| t.text.as_str()).collect();
                println!(
                    "  {}: {:.2}s -> grade {} (best {}){} [{}]",
                    report.level,
                    report.elapsed,
                    report.grade,
                    report.best_grade,
                    if report.show_lose_indicator { " - no stars" } else { "" },
                    times.join(" / ")
                );
                println!(
                    "    next: {:?}",
                    run.navigate(WinScreenAction::Next, &settings.progression)
                );
            }
            Ok(None) => {}
            Err(e) => log::error!("Completion failed: {}", e),
        }
    }

    println!("\nLevel select:");
    let select = LevelSelect::new(&levels);
    for entry in select.entries(&store) {
        println!(
            "  [{}] {:<8} {} {}",
            entry.index,
            entry.name,
            if entry.unlocked { "open  " } else { "locked" },
            "*".repeat(entry.stars as usize)
        );
    }
    match select.select(&store, 2) {
        Ok(scene) => println!("  select 2 -> {:?}", scene),
        Err(e) => println!("  select 2 -> {}", e),
    }

    // === Parallax ===
    println!("\nParallax sweep:");
    let origins = [Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 0.0, 1.0)];
    let mut parallax = ParallaxController::from_origins(settings.parallax.clone(), &origins);
    let mut samples = vec![InputSample::Attitude(Quat::IDENTITY); 40];
    samples.extend((0..60).map(|i| {
        let yaw = (i as f32 * 0.25).to_radians();
        let pitch = (i as f32 * -0.1).to_radians();
        InputSample::Attitude(Quat::from_rotation_y(yaw) * Quat::from_rotation_x(pitch))
    }));
    let mut source = ScriptedSource::new(true, samples);

    let dt = 1.0 / 60.0;
    for frame in 0..120 {
        parallax.tick(dt, &mut source);
        if frame % 30 == 29 {
            println!("  frame {:>3} {:?}: {:?}", frame + 1, parallax.state(), parallax.positions());
        }
    }
    parallax.disable();
    println!("  disabled: {:?}", parallax.positions());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
