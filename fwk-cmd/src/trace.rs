//! Per-tick CSV trace export.

use std::fs::File;
use std::path::Path;

use fwk_core::{Engine, Eta};

/// Writes one CSV row per simulation tick.
pub struct TraceWriter {
    writer: csv::Writer<File>,
}

impl TraceWriter {
    pub fn create(path: &Path) -> anyhow::Result<Self> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record([
            "tick",
            "rain",
            "level",
            "flow",
            "turbidity",
            "pressure",
            "discharge",
            "sediment",
            "likelihood",
            "status",
            "phase",
            "eta",
        ])?;
        Ok(Self { writer })
    }

    pub fn write_tick(&mut self, engine: &Engine) -> anyhow::Result<()> {
        let sensors = engine.sensor_snapshot();
        let eta = match engine.eta() {
            Eta::None => String::new(),
            Eta::NotExpected => "no-event".to_string(),
            Eta::Now => "now".to_string(),
            Eta::Seconds(s) => s.to_string(),
        };
        self.writer.write_record([
            engine.ticks().to_string(),
            format!("{:.1}", sensors.rain),
            format!("{:.3}", sensors.level),
            format!("{:.2}", sensors.flow),
            format!("{:.2}", sensors.turbidity),
            format!("{:.3}", sensors.pressure),
            format!("{:.2}", sensors.discharge),
            format!("{:.3}", sensors.sediment),
            format!("{:.2}", engine.likelihood()),
            engine.status().to_string(),
            engine.phase().to_string(),
            eta,
        ])?;
        Ok(())
    }

    pub fn finish(mut self) -> anyhow::Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
