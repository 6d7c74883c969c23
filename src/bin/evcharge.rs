// Copyright (c) 2026 Pegasus Heavy Industries LLC
// Licensed under the MIT License

//! evcharge: one-shot charging estimate printed as a table or JSON.

use anyhow::Context;
use clap::Parser;
use ev_charge_estimator::config::{self, Config};
use ev_charge_estimator::report::{self, EstimateReport};
use ev_charge_estimator::simulator::ChargeSession;
use ev_charge_estimator::store::CurveStore;
use ev_charge_estimator::temperature::Chemistry;
use std::io::{self, Write};
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "evcharge", version, about = "Estimate EV DC fast-charging time")]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Starting state of charge (%).
    #[arg(short, long)]
    start: Option<u8>,

    /// Target state of charge (%).
    #[arg(short, long)]
    end: Option<u8>,

    /// Charger power cap (kW).
    #[arg(short = 'p', long)]
    max_power: Option<f64>,

    /// Ambient temperature (°C).
    #[arg(short, long, allow_hyphen_values = true)]
    temp: Option<f64>,

    /// Battery chemistry: LFP, NMC, NCA or UNKNOWN.
    #[arg(long)]
    chemistry: Option<Chemistry>,

    /// Battery was preconditioned before charging.
    #[arg(long, overrides_with = "no_preheated")]
    preheated: bool,

    /// Battery was not preconditioned, even if the config says so.
    #[arg(long, overrides_with = "preheated")]
    no_preheated: bool,

    /// CSV curve (SOC and power columns) to use instead of the reference.
    #[arg(long)]
    curve: Option<PathBuf>,

    /// Print the full report as JSON.
    #[arg(long)]
    json: bool,

    /// Pretty-print JSON output.
    #[arg(long, requires = "json")]
    pretty: bool,

    /// Print the per-percent charging profile.
    #[arg(long)]
    profile: bool,

    /// Write the effective session settings back to the config file.
    #[arg(long)]
    save_config: bool,
}

impl Cli {
    /// Config session defaults with command-line overrides applied.
    fn session(&self, cfg: &Config) -> ChargeSession {
        let mut session = cfg.session.to_session();
        if let Some(v) = self.start {
            session.start_soc = v;
        }
        if let Some(v) = self.end {
            session.end_soc = v;
        }
        if let Some(v) = self.max_power {
            session.max_power_kw = v;
        }
        if let Some(v) = self.temp {
            session.ambient_temp_c = v;
        }
        if let Some(v) = self.chemistry {
            session.chemistry = v;
        }
        if self.preheated {
            session.preheated = true;
        } else if self.no_preheated {
            session.preheated = false;
        }
        session
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config_path = cli.config.clone();
    let mut cfg = config::load_config(&config_path).unwrap_or_else(|e| {
        log::warn!("Could not load config: {e}, using defaults");
        Config::default()
    });

    let session = cli.session(&cfg);
    let temperature = cfg.temperature_model();

    let mut store = CurveStore::new();
    if let Some(path) = cli.curve.as_ref().or(cfg.curve.user_curve.as_ref()) {
        if let Err(e) = store.import_file(path) {
            log::warn!(
                "Could not import curve {}: {e}, using reference curve",
                path.display()
            );
        }
    }

    if cli.save_config {
        cfg.session = session.into();
        if let Some(path) = &cli.curve {
            cfg.curve.user_curve = Some(path.clone());
        }
        config::save_config(&config_path, &cfg)
            .with_context(|| format!("saving config to {}", config_path.display()))?;
    }

    let report = report::build_report(&store, &temperature, &session);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        out.write_all(report::encode(&report, cli.pretty)?.as_bytes())?;
        return Ok(());
    }

    if let Some(notice) = &report.notice {
        anyhow::bail!("{notice}");
    }
    print_summary(&mut out, &report)?;
    if cli.profile {
        writeln!(out)?;
        print_profile(&mut out, &report)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn print_summary<W: Write>(out: &mut W, report: &EstimateReport) -> io::Result<()> {
    let s = &report.session;
    writeln!(out, "Curve:         {}", report.source)?;
    writeln!(
        out,
        "Session:       {}% -> {}%  (cap {:.0} kW, {:.1}°C, {}, {})",
        s.start_soc,
        s.end_soc,
        s.max_power_kw,
        s.ambient_temp_c,
        s.chemistry,
        if s.preheated { "preheated" } else { "not preheated" }
    )?;
    writeln!(out, "Derating:      x{:.2}", report.temperature_multiplier)?;

    let Some(res) = &report.result else {
        return Ok(());
    };
    writeln!(
        out,
        "Total time:    {}  (uncapped {})",
        res.total_time,
        report::format_duration(res.uncapped_total_minutes)
    )?;
    writeln!(
        out,
        "Energy added:  {:.1} kWh  (+{}%)",
        res.energy_added_kwh, res.charge_added_pct
    )?;
    writeln!(out, "Start power:   {:.0} kW", res.start_power_kw)?;
    Ok(())
}

fn print_profile<W: Write>(out: &mut W, report: &EstimateReport) -> io::Result<()> {
    let Some(res) = &report.result else {
        return Ok(());
    };
    writeln!(
        out,
        "{:>4}  {:>9}  {:>9}  {:>12}  {:>12}",
        "SOC", "Time", "Power", "Time (max)", "Power (max)"
    )?;
    for (c, u) in res.capped.points.iter().zip(&res.uncapped.points) {
        writeln!(
            out,
            "{:>3}%  {:>5.1} min  {:>6.1} kW  {:>8.1} min  {:>9.1} kW",
            c.soc, c.elapsed_minutes, c.power_kw, u.elapsed_minutes, u.power_kw
        )?;
    }
    Ok(())
}
