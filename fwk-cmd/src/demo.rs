//! Headless demo cycle runner.

use std::path::Path;
use std::time::Duration;

use anyhow::bail;
use fwk_core::config::SIM_TICK_MS;
use fwk_core::{DemoPhase, Engine};

use crate::trace::TraceWriter;

/// Run one full scripted cycle (ramp-up, peak-hold, ramp-down) and return
/// once the script is back at idle.
pub async fn run_demo(
    seed: u64,
    realtime: bool,
    trace_csv: Option<&str>,
    max_ticks: u64,
) -> anyhow::Result<()> {
    let mut engine = Engine::with_defaults(seed);
    let mut trace = match trace_csv {
        Some(path) => Some(TraceWriter::create(Path::new(path))?),
        None => None,
    };

    engine.start_demo();
    log::info!("demo cycle starting (seed {seed})");

    let mut interval = realtime.then(|| {
        let mut interval = tokio::time::interval(Duration::from_millis(u64::from(SIM_TICK_MS)));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        interval
    });

    loop {
        if let Some(interval) = interval.as_mut() {
            interval.tick().await;
        }
        engine.tick();
        // The countdown ticks at 1 Hz; the simulation at 1000/SIM_TICK_MS.
        if engine.ticks() % u64::from(1000 / SIM_TICK_MS) == 0 && engine.countdown_active() {
            engine.second();
        }
        if let Some(trace) = trace.as_mut() {
            trace.write_tick(&engine)?;
        }
        if engine.phase() == DemoPhase::Idle {
            break;
        }
        if engine.ticks() >= max_ticks {
            bail!("demo cycle did not complete within {max_ticks} ticks");
        }
    }

    if let Some(trace) = trace {
        trace.finish()?;
    }
    log::info!(
        "demo cycle complete after {} ticks (likelihood {:.1}, status {})",
        engine.ticks(),
        engine.likelihood(),
        engine.status()
    );
    println!(
        "cycle complete: {} ticks, final status {}, rain {:.0}",
        engine.ticks(),
        engine.status(),
        engine.rain()
    );
    Ok(())
}
