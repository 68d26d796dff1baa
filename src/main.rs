use anyhow::Result;
use portalscraper::export::{self, ExportConfig};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    // ─── 2) configure pipelines ──────────────────────────────────────
    let cfg = ExportConfig::default();
    info!(out_dir = %cfg.out_dir.display(), "exporting visualization data");

    // ─── 3) run each pipeline; one failing must not stop the rest ────
    let pipelines: [(&str, fn(&ExportConfig) -> Result<()>); 3] = [
        ("cfp monthly transfers", export::export_cfp),
        ("ncaa yearly transfers", export::export_ncaa),
        ("stoplight class-year data", export::export_stoplight),
    ];

    for (name, run) in pipelines {
        match run(&cfg) {
            Ok(()) => info!("{} exported", name),
            Err(e) => error!("{} failed: {:#}", name, e),
        }
    }

    info!("all done");
    Ok(())
}
