//! CLI tool for scrollseq - validates a page manifest and prints a draw plan
//!
//! Usage:
//!   scrollseq_cli <manifest.json>                          # Plan at progress 0
//!   scrollseq_cli <manifest.json> --progress 0.5           # Plan mid-scroll
//!   scrollseq_cli <manifest.json> --viewport 390x844 --dpr 3 --image 1920x1080
//!   scrollseq_cli <manifest.json> -o plan.json             # Write to file
//!
//! Every sequence is played against an in-memory surface with all frames
//! loaded, so the output shows which frame each trigger would show and
//! where it would be drawn.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use scrollseq::config::{PageManifest, SequenceEntry};
use scrollseq::render::{BufferContent, MemoryImage, RecordingSurface};
use scrollseq::SequencePlayer;

const USAGE: &str = "Usage: scrollseq_cli <manifest.json> [--viewport WxH] [--dpr D] [--image WxH] [--progress P] [-o output.json]";

struct Args {
    manifest_path: String,
    viewport: (f64, f64),
    dpr: f64,
    image: (f64, f64),
    progress: f64,
    output_path: Option<String>,
}

fn parse_size(value: &str) -> Option<(f64, f64)> {
    let (w, h) = value.split_once(['x', 'X'])?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn parse_args() -> Args {
    let raw: Vec<String> = env::args().collect();
    if raw.len() < 2 {
        fail(USAGE);
    }

    let mut args = Args {
        manifest_path: raw[1].clone(),
        viewport: (1920.0, 1080.0),
        dpr: 1.0,
        image: (1920.0, 1080.0),
        progress: 0.0,
        output_path: None,
    };

    let mut i = 2;
    while i < raw.len() {
        let flag = raw[i].as_str();
        let Some(value) = raw.get(i + 1) else {
            fail(&format!("Missing value for {flag}\n{USAGE}"));
        };
        match flag {
            "--viewport" => {
                args.viewport = parse_size(value).unwrap_or_else(|| fail("Bad --viewport, expected WxH"));
            }
            "--image" => {
                args.image = parse_size(value).unwrap_or_else(|| fail("Bad --image, expected WxH"));
            }
            "--dpr" => {
                args.dpr = value.parse().unwrap_or_else(|_| fail("Bad --dpr"));
            }
            "--progress" => {
                args.progress = value.parse().unwrap_or_else(|_| fail("Bad --progress"));
            }
            "-o" => args.output_path = Some(value.clone()),
            _ => fail(&format!("Unknown argument {flag}\n{USAGE}")),
        }
        i += 2;
    }
    args
}

/// Play one manifest entry on a recording surface and describe the result.
fn plan_entry(entry: &SequenceEntry, args: &Args) -> serde_json::Value {
    let surface = RecordingSurface::new(args.viewport.0, args.viewport.1, args.dpr);
    let mut player = SequencePlayer::new(Some(surface), entry.player_options());
    for (index, source) in entry.sources().into_iter().enumerate() {
        player.attach_image(index, MemoryImage::new(source, args.image.0, args.image.1));
        if let Some(notice) = player.frame_loaded(index) {
            notice.notify();
        }
    }

    let binding = entry.scrub_binding();
    let frame_value = binding.frame_value(args.progress, player.frame_count());
    binding.apply(&mut player, args.progress);

    let surface = player.surface().expect("surface is present until destroy");
    let (backing_w, backing_h) = surface.backing_size();
    let drawn = match surface.content() {
        BufferContent::Blank => serde_json::Value::Null,
        BufferContent::Image { id, rect } => serde_json::json!({ "source": id, "rect": rect }),
    };

    serde_json::json!({
        "section": entry.section,
        "surfaceId": entry.surface_id,
        "frameCount": player.frame_count(),
        "reverse": entry.reverse,
        "scaling": entry.scaling,
        "alignment": entry.alignment,
        "frameValue": frame_value,
        "frame": player.current_frame(),
        "backing": [backing_w, backing_h],
        "drawn": drawn,
    })
}

fn main() {
    let args = parse_args();

    // Read manifest
    let json = match fs::read_to_string(&args.manifest_path) {
        Ok(j) => j,
        Err(e) => fail(&format!("Error reading {}: {}", args.manifest_path, e)),
    };

    // Parse + validate
    let manifest = match PageManifest::from_json(&json) {
        Ok(m) => m,
        Err(e) => fail(&format!("Error in manifest: {e}")),
    };

    let sequences: Vec<serde_json::Value> =
        manifest.sequences.iter().map(|entry| plan_entry(entry, &args)).collect();
    let plan = serde_json::json!({
        "viewport": { "width": args.viewport.0, "height": args.viewport.1, "dpr": args.dpr },
        "image": { "width": args.image.0, "height": args.image.1 },
        "progress": args.progress,
        "totalFrames": manifest.total_frames(),
        "backgrounds": manifest.backgrounds,
        "sequences": sequences,
    });

    let out = match serde_json::to_string_pretty(&plan) {
        Ok(j) => j,
        Err(e) => fail(&format!("Error serializing JSON: {e}")),
    };

    // Output
    match args.output_path {
        Some(path) => {
            if let Err(e) = fs::write(&path, &out) {
                fail(&format!("Error writing {path}: {e}"));
            }
            eprintln!("Written: {path}");
        }
        None => {
            io::stdout().write_all(out.as_bytes()).unwrap();
            println!();
        }
    }
}
