mod cli;

use crate::cli::{Cli, Command, FollowCmd, ParseCmd, ScanCmd, SimulateCmd};

use lrcsync::config::{self, Config};
use lrcsync::library::{self, LibraryEntry};
use lrcsync::sampler::{self, Sampler};
use lrcsync::source::{load_timeline, FsSource};
use lrcsync::{serialiser, CaptionTimeline, Parser};

use std::io::{self, BufRead, Read};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use tracing::{info, warn};

fn main() {
    match run() {
        Ok(()) => (),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            std::process::exit(1);
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(multi_tag) = cli.multi_tag {
        cfg.parser.multi_tag = multi_tag;
    }
    if cli.apply_offset {
        cfg.parser.apply_offset = true;
    }
    config::init_tracing(&cfg.logging, cli.log_level.as_deref())?;

    info!(version = env!("CARGO_PKG_VERSION"), "lrcsync starting");

    let parser = Parser::with_options(cfg.parser);
    match cli.command {
        Command::Parse(cmd) => run_parse(cmd, &parser),
        Command::Follow(cmd) => run_follow(cmd, &parser),
        Command::Simulate(cmd) => run_simulate(cmd, &parser, &cfg),
        Command::Scan(cmd) => run_scan(cmd, &parser),
        Command::PrintDefaultConfig => {
            print!("{}", cfg.to_toml_pretty()?);
            Ok(())
        }
    }
}

fn run_parse(cmd: ParseCmd, parser: &Parser) -> Result<()> {
    let data = if cmd.input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(&cmd.input)
            .context(format!("Failed to open input file: '{}'", cmd.input))?
    };

    let doc = parser.parse_document(&data);
    if cmd.json {
        let json = serde_json::to_string_pretty(&doc)?;
        println!("{}", json);
    } else {
        serialiser::serialise(&doc, io::stdout()).context("Failed to write to stdout")?;
    }
    Ok(())
}

fn run_follow(cmd: FollowCmd, parser: &Parser) -> Result<()> {
    let mut timeline = open_timeline(&cmd.captions, parser);
    info!(entries = timeline.len(), "following stdin positions");

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let position: f64 = match line.parse() {
            Ok(p) => p,
            Err(_) => {
                warn!(sample = line, "ignoring unparseable position");
                continue;
            }
        };
        let update = timeline.update(position);
        if update.changed {
            print_active(&timeline, position, update.index);
        }
    }
    Ok(())
}

fn run_simulate(cmd: SimulateCmd, parser: &Parser, cfg: &Config) -> Result<()> {
    let mut timeline = open_timeline(&cmd.captions, parser);
    let interval = cmd
        .interval_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| cfg.playback.sample_interval());
    let realtime = cmd.realtime || cfg.playback.realtime;
    let duration = cmd
        .duration
        .or_else(|| {
            timeline
                .entries()
                .iter()
                .rev()
                .map(|e| e.timestamp)
                .find(|t| t.is_finite())
        })
        .unwrap_or(0.0);
    info!(duration, ?interval, realtime, entries = timeline.len(), "simulating playback");

    let positions = Sampler::new(interval)
        .positions(duration)
        .enumerate()
        .map(|(i, position)| {
            if realtime && i > 0 {
                std::thread::sleep(interval);
            }
            position
        });

    let mut changes = Vec::new();
    sampler::drive(&mut timeline, positions, |position, index| {
        changes.push((position, index))
    });
    for (position, index) in changes {
        print_active(&timeline, position, index);
    }
    Ok(())
}

fn run_scan(cmd: ScanCmd, parser: &Parser) -> Result<()> {
    let source = FsSource::new(&cmd.root);
    let dir = cmd.dir.as_deref().unwrap_or("");
    let entries: Vec<LibraryEntry> = match &cmd.listing {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .context(format!("Failed to open listing: '{}'", path.display()))?;
            serde_json::from_str(&raw)
                .context(format!("Failed to parse listing: '{}'", path.display()))?
        }
        None => source
            .list(dir)
            .context(format!("Failed to list '{}'", cmd.root.join(dir).display()))?,
    };

    for track in library::tracks(&entries) {
        let caption = track.caption.as_deref().unwrap_or("-");
        if cmd.load {
            let path = track.caption.as_ref().map(|name| join(dir, name));
            let timeline = load_timeline(&source, path.as_deref(), parser);
            println!("{}\t{}\t{}", track.audio, caption, timeline.len());
        } else {
            println!("{}\t{}", track.audio, caption);
        }
    }
    Ok(())
}

fn open_timeline(path: &str, parser: &Parser) -> CaptionTimeline {
    let path = Path::new(path);
    let root = path.parent().unwrap_or_else(|| Path::new("."));
    let name = path.file_name().and_then(|n| n.to_str());
    load_timeline(&FsSource::new(root), name, parser)
}

fn print_active(timeline: &CaptionTimeline, position: f64, index: Option<usize>) {
    match index.and_then(|i| timeline.entries().get(i).map(|e| (i, e))) {
        Some((i, entry)) => println!("{:>9.2}s  #{:<4} {}", position, i, entry.text),
        None => println!("{:>9.2}s  --", position),
    }
}

fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir.trim_end_matches('/'), name)
    }
}
