use std::io;
use std::time::{Duration, Instant};

use clap::Parser;
use ratatui::layout::Rect;

use panel_manager::{
    DefaultItemFactory, ItemEntry, MonitorGeometry, PanelStore, ScreenPosition,
};

#[derive(Parser, Debug)]
#[command(
    name = "config-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Write/parse round-trip benchmark for panel documents"
)]
struct BenchCli {
    /// Number of panels in the generated document.
    #[arg(short = 'p', long = "panels", value_name = "COUNT", default_value_t = 8)]
    panels: usize,

    /// Items docked on every panel.
    #[arg(short = 'i', long = "items", value_name = "COUNT", default_value_t = 24)]
    items: usize,

    /// How many write/parse cycles to time.
    #[arg(short = 'n', long = "iterations", value_name = "COUNT", default_value_t = 500)]
    iterations: u32,
}

struct BenchConfig {
    panels: usize,
    items: usize,
    iterations: u32,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if !(1..=1_000).contains(&cli.panels) {
            return Err("panels must be between 1 and 1000".to_string());
        }
        if cli.items > 10_000 {
            return Err("items must be at most 10000".to_string());
        }
        if cli.iterations == 0 {
            return Err("iterations must be at least 1".to_string());
        }
        Ok(Self {
            panels: cli.panels,
            items: cli.items,
            iterations: cli.iterations,
        })
    }
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    let display = MonitorGeometry::new(vec![
        Rect::new(0, 0, 1920, 1080),
        Rect::new(1920, 0, 1920, 1080),
    ]);
    let store = build_store(&config, &display);
    let document = store.render();

    let mut stats = BenchStats::new(document.len());
    for _ in 0..config.iterations {
        let started = Instant::now();
        let rendered = store.render();
        let written = started.elapsed();

        let started = Instant::now();
        let mut factory = DefaultItemFactory::new();
        let (parsed, warnings) = PanelStore::from_document(&rendered, &display, &mut factory)
            .map_err(io::Error::other)?;
        let read = started.elapsed();

        if !warnings.is_empty() || !parsed.same_config(&store) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "round trip changed the document",
            ));
        }
        stats.record(written, read);
    }

    println!("{}", stats.final_report(&config));
    Ok(())
}

fn build_store(config: &BenchConfig, display: &MonitorGeometry) -> PanelStore {
    let mut store = PanelStore::new();
    let fixed: Vec<ScreenPosition> = ScreenPosition::ALL
        .into_iter()
        .filter(|position| position.is_fixed())
        .collect();
    for n in 0..config.panels {
        let id = store.add_panel();
        let Some(panel) = store.get_mut(id) else {
            continue;
        };
        panel.edit_position(|position| {
            position.set_screen_position(fixed[n % fixed.len()], display);
            position.set_monitor(n % 2);
            position.set_autohide(n % 3 == 0);
        });
        for i in 0..config.items {
            panel.append_item(ItemEntry::with_id(format!("plugin-{}", i % 7), format!("{n}-{i}")));
        }
    }
    store.take_events();
    store
}

struct BenchStats {
    document_bytes: usize,
    cycles: u32,
    total_write: Duration,
    total_read: Duration,
    slowest_cycle: Duration,
}

impl BenchStats {
    fn new(document_bytes: usize) -> Self {
        Self {
            document_bytes,
            cycles: 0,
            total_write: Duration::ZERO,
            total_read: Duration::ZERO,
            slowest_cycle: Duration::ZERO,
        }
    }

    fn record(&mut self, write: Duration, read: Duration) {
        self.cycles = self.cycles.saturating_add(1);
        self.total_write += write;
        self.total_read += read;
        self.slowest_cycle = self.slowest_cycle.max(write + read);
    }

    fn average_ms(&self, total: Duration) -> f64 {
        if self.cycles == 0 {
            return 0.0;
        }
        total.as_secs_f64() / f64::from(self.cycles) * 1_000.0
    }

    fn final_report(&self, config: &BenchConfig) -> String {
        let read_secs = self.total_read.as_secs_f64();
        let mb_per_second = if read_secs > 0.0 {
            (self.document_bytes as f64 * f64::from(self.cycles)) / read_secs / 1_000_000.0
        } else {
            0.0
        };

        indoc::formatdoc!(
            r#"
            Config bench completed {cycles} cycles.
            Document: {panels} panels x {items} items, {bytes} bytes
            Avg write: {write:.3} ms | Avg parse: {read:.3} ms | Worst cycle: {worst:.3} ms
            Parse throughput: ~{mbps:.1} MB/s
            "#,
            cycles = self.cycles,
            panels = config.panels,
            items = config.items,
            bytes = self.document_bytes,
            write = self.average_ms(self.total_write),
            read = self.average_ms(self.total_read),
            worst = self.slowest_cycle.as_secs_f64() * 1_000.0,
            mbps = mb_per_second,
        )
    }
}
