use std::time::Duration;

use anyhow::{bail, Result};

use narrowcast_display::{evaluate, ScrollPlan};

/// Number of offsets printed across one cycle
const SAMPLES: u32 = 8;

pub fn run(viewport: f64, content: f64, min_secs: Option<f64>) -> Result<()> {
    let min_duration = parse_min_duration(min_secs)?;

    let animation = match evaluate(viewport, content, min_duration) {
        ScrollPlan::Idle => {
            println!("Content fits the viewport, nothing to scroll.");
            return Ok(());
        }
        ScrollPlan::Scroll(animation) => animation,
    };

    println!("Delay:     {:.1}s", animation.initial_delay.as_secs_f64());
    println!("Duration:  {:.1}s", animation.duration.as_secs_f64());
    println!("Distance:  {:.0}px", -animation.translate_y);
    println!("Cycle:     {:.1}s\n", animation.cycle().as_secs_f64());

    let cycle = animation.cycle();
    for step in 0..=SAMPLES {
        let at = cycle.mul_f64(step as f64 / SAMPLES as f64);
        println!(
            "  t={:>6.2}s  y={:>8.1}",
            at.as_secs_f64(),
            animation.offset_at(at)
        );
    }

    Ok(())
}

/// Validate `--min-secs`; rejects negative, non-finite and unrepresentable values
fn parse_min_duration(min_secs: Option<f64>) -> Result<Option<Duration>> {
    match min_secs {
        Some(secs) => match Duration::try_from_secs_f64(secs) {
            Ok(duration) => Ok(Some(duration)),
            Err(_) => bail!("--min-secs must be a non-negative number of seconds, got {}", secs),
        },
        None => Ok(None),
    }
}
