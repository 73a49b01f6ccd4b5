/// Command-line front end for pointsketch.
///
/// Usage:
///   pointsketch convert <input> <output.dxf> [--legacy] [--closed] [--inches]
///                       [--smooth <level>] [--version <label>]
///   pointsketch fit <input> <width> <height>
///   pointsketch replay <capture> [--record]

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};
use futures::executor::block_on;
use futures::io::AllowStdIo;
use pointsketch::io::dxf::{Dialect, DxfVersion, UnitCode};
use pointsketch::stream::ReplayPort;
use pointsketch::viewport::SurfaceSize;
use pointsketch::{format_point_line, SketchConfig, Workspace};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        print_usage();
        std::process::exit(2);
    };

    match command.as_str() {
        "convert" => convert(rest),
        "fit" => fit(rest),
        "replay" => replay(rest),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            std::process::exit(2);
        }
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  pointsketch convert <input> <output.dxf> [--legacy] [--closed] [--inches]");
    eprintln!("                      [--smooth <level>] [--version <label>]");
    eprintln!("  pointsketch fit <input> <width> <height>");
    eprintln!("  pointsketch replay <capture> [--record]");
}

/// Split `args` into positionals and `--flag [value]` options.
struct Args<'a> {
    positional: Vec<&'a str>,
    flags: Vec<&'a str>,
    values: Vec<(&'a str, &'a str)>,
}

impl<'a> Args<'a> {
    fn parse(args: &'a [String], valued: &[&str]) -> Result<Self> {
        let mut parsed = Args {
            positional: Vec::new(),
            flags: Vec::new(),
            values: Vec::new(),
        };
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if valued.contains(&arg.as_str()) {
                let value = iter
                    .next()
                    .with_context(|| format!("{arg} needs a value"))?;
                parsed.values.push((arg.as_str(), value.as_str()));
            } else if arg.starts_with("--") {
                parsed.flags.push(arg.as_str());
            } else {
                parsed.positional.push(arg.as_str());
            }
        }
        Ok(parsed)
    }

    fn has(&self, flag: &str) -> bool {
        self.flags.contains(&flag)
    }

    fn value(&self, name: &str) -> Option<&'a str> {
        self.values
            .iter()
            .rev()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }
}

fn load_workspace(input: &str, config: SketchConfig) -> Result<Workspace> {
    let mut workspace = Workspace::new(config);
    let count = workspace
        .import_file(input)
        .with_context(|| format!("failed to import {input}"))?;
    println!("Imported {count} points from {input}");
    Ok(workspace)
}

fn convert(args: &[String]) -> Result<()> {
    let args = Args::parse(args, &["--smooth", "--version"])?;
    let [input, output] = args.positional[..] else {
        bail!("convert needs <input> and <output.dxf>");
    };

    let mut config = SketchConfig::default();
    if args.has("--legacy") {
        config.export.dialect = Dialect::Legacy;
    }
    config.export.closed = args.has("--closed");
    if args.has("--inches") {
        config.export.units = UnitCode::Inches;
    }
    if let Some(label) = args.value("--version") {
        config.export.version_label = label
            .parse::<DxfVersion>()
            .map_err(anyhow::Error::msg)?;
    }
    let level = args
        .value("--smooth")
        .map(|v| v.parse::<u32>().with_context(|| format!("invalid smoothing level '{v}'")))
        .transpose()?;

    let mut workspace = load_workspace(input, config)?;
    workspace
        .export_dxf_to_file(output, level)
        .with_context(|| format!("failed to write {output}"))?;
    println!(
        "Wrote {} ({:?}, {})",
        Path::new(output).display(),
        config.export.dialect,
        config.export.version_label
    );
    Ok(())
}

fn fit(args: &[String]) -> Result<()> {
    let args = Args::parse(args, &[])?;
    let [input, width, height] = args.positional[..] else {
        bail!("fit needs <input> <width> <height>");
    };
    let width: f64 = width.parse().with_context(|| format!("invalid width '{width}'"))?;
    let height: f64 = height.parse().with_context(|| format!("invalid height '{height}'"))?;

    let mut workspace = load_workspace(input, SketchConfig::default())?;
    workspace
        .viewport_mut()
        .resize(SurfaceSize::logical(width, height));
    workspace.apply_view_command(pointsketch::ViewCommand::Fit);

    let camera = workspace.viewport().camera();
    println!("x={} y={} zoom={}", camera.x, camera.y, camera.zoom);
    Ok(())
}

fn replay(args: &[String]) -> Result<()> {
    let args = Args::parse(args, &[])?;
    let [capture] = args.positional[..] else {
        bail!("replay needs <capture>");
    };

    let file = File::open(capture).with_context(|| format!("failed to open {capture}"))?;
    let port = ReplayPort::new(capture, AllowStdIo::new(BufReader::new(file)));

    let mut workspace = Workspace::default();
    let mut ingestor = workspace.begin_stream(port)?;
    let (handle, read_loop) = ingestor.connect(workspace.scene_sink())?;
    if args.has("--record") {
        handle.record()?;
    }

    let notifications = block_on(read_loop.run());
    for notification in &notifications {
        println!("{notification}");
    }
    workspace.absorb_notifications(notifications);

    let status = handle.status();
    println!("Status: {} ({})", status.message, status.state);
    for point in workspace.points().iter() {
        println!("{}", format_point_line(point));
    }
    Ok(())
}
