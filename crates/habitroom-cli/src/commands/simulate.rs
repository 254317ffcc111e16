use std::io::Read;
use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDateTime, NaiveTime, TimeZone};
use clap::Args;
use habitroom_core::{parse_script, Config, SeededSampler, Simulator};

use crate::render::Renderer;

#[derive(Args)]
pub struct SimulateArgs {
    /// Simulated start time: "2026-01-05T08:00:00", "2026-01-05 08:00" or
    /// "08:00" (today). Defaults to now.
    #[arg(long)]
    at: Option<String>,
    /// Seed for the walking nudge (defaults to reminders.seed, then 0)
    #[arg(long)]
    seed: Option<u64>,
    /// Script file; reads stdin when omitted
    #[arg(long)]
    script: Option<PathBuf>,
    /// Print events and the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: SimulateArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let start = match &args.at {
        Some(text) => parse_start(text)?,
        None => Local::now(),
    };
    let seed = args.seed.or(config.reminders.seed).unwrap_or(0);

    let text = match &args.script {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let steps = parse_script(&text)?;
    tracing::debug!(steps = steps.len(), %start, seed, "simulation starting");

    let mut sim = Simulator::new(start, SeededSampler::new(seed));
    let events = sim.run_script(steps)?;
    let snapshot = sim.dashboard().snapshot();
    sim.shutdown();

    if args.json {
        let out = serde_json::json!({ "events": events, "final": snapshot });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let renderer = Renderer::new(config.display.clock_format);
        for event in &events {
            if let Some(line) = renderer.event(event) {
                println!("{line}");
            }
        }
        println!("{}", renderer.status(&snapshot));
    }
    Ok(())
}

fn parse_start(text: &str) -> Result<DateTime<Local>, Box<dyn std::error::Error>> {
    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M"))
        .or_else(|_| {
            NaiveTime::parse_from_str(text, "%H:%M")
                .map(|time| Local::now().date_naive().and_time(time))
        })
        .map_err(|_| format!("invalid start time: {text}"))?;
    Local
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| format!("ambiguous or skipped local time: {text}").into())
}
