use anyhow::Result;
use framesieve::batch::{directory_stats, load_frame, select_best_frames};
use framesieve::export::DirectorySink;
use framesieve::sharpness::{is_blurry, sharpness_score};
use framesieve::FrameSieveConfig;
use std::env;
use std::path::Path;

const USAGE: &str = "Usage: framesieve-cli <command> [args]

Commands:
  select <input_dir> <output_dir> [--top <n>] [--json]
      Score every frame in <input_dir> and export the sharpest <n>.
  score <image> [--json]
      Print the sharpness score of one image.
  stats <dir> [--json]
      Score a directory and print per-frame and summary statistics.
  burst [output_dir] [--device <idx>] [--count <n>] [--interval <ms>]
        [--warmup <n>] [--json]
      Capture a frame burst from a camera (requires the camera feature).
  live [--device <idx>] [--output <dir>] [--json]
      Run the live scoring loop until Ctrl-C, then save the best frame
      (requires the camera feature).
  devices [--json]
      List capture devices (requires the camera feature).

Configuration is read from framesieve.toml when present; flags override it.
Exit codes: 0 success, 1 run failure, 2 usage error.";

fn main() {
    framesieve::init_logging();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    }

    let result = match args[1].as_str() {
        "select" => cmd_select(&args),
        "score" => cmd_score(&args),
        "stats" => cmd_stats(&args),
        "burst" => cmd_burst(&args),
        "live" => cmd_live(&args),
        "devices" => cmd_devices(&args),
        "help" | "--help" => {
            println!("{}", USAGE);
            return;
        }
        "--version" => {
            println!("{} {}", framesieve::NAME, framesieve::VERSION);
            return;
        }
        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    if let Err(err) = result {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn usage_error(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(2);
}

fn flag_value<'a>(args: &'a [String], index: usize, flag: &str) -> &'a str {
    match args.get(index) {
        Some(value) => value,
        None => usage_error(&format!("{} requires a value", flag)),
    }
}

fn parse_number<T: std::str::FromStr>(value: &str, flag: &str) -> T {
    value
        .parse()
        .unwrap_or_else(|_| usage_error(&format!("Invalid value for {}: {}", flag, value)))
}

fn load_config() -> Result<FrameSieveConfig> {
    let config = FrameSieveConfig::load_or_default();
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
    Ok(config)
}

fn cmd_select(args: &[String]) -> Result<()> {
    let mut input: Option<String> = None;
    let mut output: Option<String> = None;
    let mut top: Option<usize> = None;
    let mut json = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--top" => {
                i += 1;
                top = Some(parse_number(flag_value(args, i, "--top"), "--top"));
            }
            "--json" => json = true,
            other => {
                if input.is_none() {
                    input = Some(other.to_string());
                } else if output.is_none() {
                    output = Some(other.to_string());
                } else {
                    usage_error(&format!("Unexpected argument: {}", other));
                }
            }
        }
        i += 1;
    }

    let (input, output) = match (input, output) {
        (Some(input), Some(output)) => (input, output),
        _ => usage_error("Usage: framesieve-cli select <input_dir> <output_dir> [--top <n>] [--json]"),
    };

    let config = load_config()?;
    let top_n = top.unwrap_or(config.selection.top_n);
    if top_n == 0 {
        usage_error("--top must be at least 1");
    }

    let mut sink = DirectorySink::create(&output, config.output.jpeg_quality)?;
    let report = select_best_frames(Path::new(&input), &mut sink, top_n)?;

    if json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        for entry in &report.selected {
            println!(
                "{:>2}. {} (sharpness {:.2}) -> {}",
                entry.rank, entry.source_id, entry.sharpness, entry.stored_as
            );
        }
        if let Some(stats) = &report.stats {
            println!(
                "{} frames scored ({} skipped): mean {:.2}, max {:.2}, min {:.2}",
                report.considered, report.skipped, stats.mean, stats.max, stats.min
            );
        }
    }
    Ok(())
}

fn cmd_score(args: &[String]) -> Result<()> {
    let mut image: Option<String> = None;
    let mut json = false;

    for arg in &args[2..] {
        match arg.as_str() {
            "--json" => json = true,
            other => {
                if image.is_none() {
                    image = Some(other.to_string());
                } else {
                    usage_error(&format!("Unexpected argument: {}", other));
                }
            }
        }
    }

    let image = image
        .unwrap_or_else(|| usage_error("Usage: framesieve-cli score <image> [--json]"));

    let config = load_config()?;
    let frame = load_frame(Path::new(&image))?;
    let sharpness = sharpness_score(&frame);
    let blurry = is_blurry(sharpness, config.scoring.blur_threshold);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "path": image,
                "width": frame.width,
                "height": frame.height,
                "sharpness": sharpness,
                "blurry": blurry,
            })
        );
    } else {
        let tag = if blurry { " [BLURRY]" } else { "" };
        println!(
            "{}: {}x{} sharpness {:.2}{}",
            image, frame.width, frame.height, sharpness, tag
        );
    }
    Ok(())
}

fn cmd_stats(args: &[String]) -> Result<()> {
    let mut dir: Option<String> = None;
    let mut json = false;

    for arg in &args[2..] {
        match arg.as_str() {
            "--json" => json = true,
            other => {
                if dir.is_none() {
                    dir = Some(other.to_string());
                } else {
                    usage_error(&format!("Unexpected argument: {}", other));
                }
            }
        }
    }

    let dir =
        dir.unwrap_or_else(|| usage_error("Usage: framesieve-cli stats <dir> [--json]"));

    let report = directory_stats(Path::new(&dir))?;

    if json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        for frame in &report.frames {
            println!("{}: {:.2}", frame.source_id, frame.sharpness);
        }
        println!(
            "{} frames scored ({} skipped): mean {:.2}, max {:.2}, min {:.2}",
            report.considered,
            report.skipped,
            report.stats.mean,
            report.stats.max,
            report.stats.min
        );
    }
    Ok(())
}

#[cfg(feature = "camera")]
fn cmd_burst(args: &[String]) -> Result<()> {
    use framesieve::camera::NokhwaCamera;
    use framesieve::session::capture_burst;

    let mut output: Option<String> = None;
    let mut json = false;
    let mut config = load_config()?;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--device" => {
                i += 1;
                config.capture.device_index =
                    parse_number(flag_value(args, i, "--device"), "--device");
            }
            "--count" => {
                i += 1;
                config.capture.burst_count =
                    parse_number(flag_value(args, i, "--count"), "--count");
            }
            "--interval" => {
                i += 1;
                config.capture.burst_interval_ms =
                    parse_number(flag_value(args, i, "--interval"), "--interval");
            }
            "--warmup" => {
                i += 1;
                config.capture.warmup_frames =
                    parse_number(flag_value(args, i, "--warmup"), "--warmup");
            }
            "--json" => json = true,
            other => {
                if output.is_none() {
                    output = Some(other.to_string());
                } else {
                    usage_error(&format!("Unexpected argument: {}", other));
                }
            }
        }
        i += 1;
    }

    let output = output.unwrap_or_else(|| config.output.directory.clone());

    let mut camera = NokhwaCamera::open(&config.capture)?;
    let mut sink = DirectorySink::create(&output, config.output.jpeg_quality)?;
    let report = capture_burst(&mut camera, &mut sink, &config.capture)?;
    camera.stop()?;

    if json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!(
            "Burst {}: {} of {} frames stored in {}",
            report.session,
            report.stored.len(),
            report.requested,
            output
        );
    }
    Ok(())
}

#[cfg(feature = "camera")]
fn cmd_live(args: &[String]) -> Result<()> {
    use framesieve::camera::NokhwaCamera;
    use framesieve::pose::NullDetector;
    use framesieve::session::{ConsoleDisplay, LiveSession};
    use framesieve::ControlSignal;
    use std::sync::mpsc;

    let mut output: Option<String> = None;
    let mut json = false;
    let mut config = load_config()?;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--device" => {
                i += 1;
                config.capture.device_index =
                    parse_number(flag_value(args, i, "--device"), "--device");
            }
            "--output" => {
                i += 1;
                output = Some(flag_value(args, i, "--output").to_string());
            }
            "--json" => json = true,
            other => usage_error(&format!("Unexpected argument: {}", other)),
        }
        i += 1;
    }

    let output = output.unwrap_or_else(|| config.output.directory.clone());

    let (tx, rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = tx.send(ControlSignal::Quit);
    })?;

    log::info!("Press Ctrl-C to stop and save the best frame");
    log::info!("No landmark detector configured; scoring on sharpness alone");

    let mut camera = NokhwaCamera::open(&config.capture)?;
    let mut sink = DirectorySink::create(&output, config.output.jpeg_quality)?;
    let mut session = LiveSession::new(&config, Box::new(NullDetector));
    let summary = session.run(&mut camera, &mut sink, &mut ConsoleDisplay, Some(&rx))?;
    camera.stop()?;

    if json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!(
            "Processed {} frames, best score {:.2}",
            summary.frames_processed, summary.best_score
        );
        match &summary.saved_path {
            Some(path) => println!("Best frame saved as {}", path),
            None => println!("No frame was retained"),
        }
    }
    Ok(())
}

#[cfg(feature = "camera")]
fn cmd_devices(args: &[String]) -> Result<()> {
    use framesieve::camera::list_devices;

    let devices = list_devices()?;
    if args.contains(&"--json".to_string()) {
        println!("{}", serde_json::to_string(&devices)?);
    } else if devices.is_empty() {
        println!("No capture devices found");
    } else {
        for device in devices {
            println!("{}: {} ({})", device.index, device.name, device.description);
        }
    }
    Ok(())
}

#[cfg(not(feature = "camera"))]
fn cmd_burst(_args: &[String]) -> Result<()> {
    Err(anyhow::anyhow!(
        "the 'burst' command requires building with the 'camera' feature"
    ))
}

#[cfg(not(feature = "camera"))]
fn cmd_live(_args: &[String]) -> Result<()> {
    Err(anyhow::anyhow!(
        "the 'live' command requires building with the 'camera' feature"
    ))
}

#[cfg(not(feature = "camera"))]
fn cmd_devices(_args: &[String]) -> Result<()> {
    Err(anyhow::anyhow!(
        "the 'devices' command requires building with the 'camera' feature"
    ))
}
