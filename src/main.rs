use std::io;
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use ratatui::layout::Rect;

use panel_manager::config::{FixedSource, SourcePolicy, XdgSources};
use panel_manager::state::DialogKind;
use panel_manager::tracing_sub::{init_default, level_for_verbosity};
use panel_manager::{
    DisplayInfo, MonitorGeometry, PanelApp, PanelError, PanelId, PanelPosition, PanelRecord,
};

#[derive(Parser, Debug)]
#[command(
    name = "panel-manager",
    version = env!("CARGO_PKG_VERSION"),
    about = "Inspect and edit the panel layout document"
)]
struct Cli {
    /// Use this document instead of the XDG config locations.
    #[arg(short = 'c', long = "config", value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Only read the system-wide document and never save.
    #[arg(long, global = true)]
    kiosk: bool,

    /// Monitor geometry as WIDTHxHEIGHT[+X+Y]. Repeat once per monitor.
    #[arg(
        short = 'm',
        long = "monitor",
        value_name = "GEOMETRY",
        value_parser = parse_monitor_arg,
        global = true
    )]
    monitors: Vec<Rect>,

    /// Log more; repeat for more detail.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every panel with its placement and items.
    Show,
    /// Report entries that would be skipped when loading.
    Check,
    /// Print the document as it would be saved.
    Normalize {
        /// Save it back instead of printing it.
        #[arg(long)]
        write: bool,
    },
    /// Append a panel with default placement.
    AddPanel,
    /// Remove a panel by its number (as shown by `show`).
    RemovePanel { panel: usize },
    /// Create an item on a panel.
    AddItem {
        panel: usize,
        name: String,
        /// Insert right after the item at this index.
        #[arg(long, value_name = "INDEX")]
        after: Option<usize>,
    },
    /// Move the item at INDEX to position TO (clamped to the bar).
    MoveItem {
        panel: usize,
        index: usize,
        #[arg(allow_negative_numbers = true)]
        to: i32,
    },
    /// Remove the item at INDEX.
    RemoveItem { panel: usize, index: usize },
    /// Set one placement property using the document's names and values.
    Set {
        panel: usize,
        property: String,
        #[arg(allow_negative_numbers = true)]
        value: String,
    },
}

fn parse_monitor_arg(geometry: &str) -> Result<Rect, String> {
    MonitorGeometry::parse_monitor(geometry)
        .ok_or_else(|| format!("expected WIDTHxHEIGHT[+X+Y], got `{geometry}`"))
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_default(level_for_verbosity(cli.verbose));

    let policy: Box<dyn SourcePolicy> = match &cli.config {
        Some(path) => Box::new(FixedSource::new(path).read_only(cli.kiosk)),
        None => Box::new(XdgSources::new().kiosk(cli.kiosk)),
    };
    let display = if cli.monitors.is_empty() {
        MonitorGeometry::single()
    } else {
        MonitorGeometry::new(cli.monitors.clone())
    };

    let mut app = PanelApp::new(policy, Box::new(display));
    let report = app.load();
    for warning in &report.warnings {
        tracing::debug!(%warning, "skipped while loading");
    }

    match cli.command {
        Command::Show => show(&app),
        Command::Check => {
            match (&report.source, &report.error) {
                (Some(path), _) => println!("loaded {}", path.display()),
                (None, Some(err)) => println!("unusable document: {err}"),
                (None, None) => println!("no document found; using the default panel"),
            }
            for warning in &report.warnings {
                println!("warning: {warning}");
            }
            if report.error.is_some() {
                return Err(io::Error::new(io::ErrorKind::InvalidData, "malformed document"));
            }
        }
        Command::Normalize { write } => {
            if write {
                save(&mut app)?;
            } else {
                print!("{}", app.store().render());
            }
        }
        Command::AddPanel => {
            let id = app.add_panel();
            println!("added {}", label(&app, id));
            save(&mut app)?;
        }
        Command::RemovePanel { panel } => {
            let id = panel_id(&app, panel)?;
            app.remove_panel(id).map_err(io::Error::other)?;
            save(&mut app)?;
        }
        Command::AddItem { panel, name, after } => {
            let id = panel_id(&app, panel)?;
            app.set_current_panel(id).map_err(io::Error::other)?;
            let active = match after {
                Some(index) => Some(item_at(app.panel(id).map_err(io::Error::other)?, index)?),
                None => None,
            };
            app.open_add_items(active).map_err(io::Error::other)?;
            let (_, index) = app.add_item(&name).map_err(io::Error::other)?;
            println!("added {name} at {index}");
            app.close_dialog(DialogKind::AddItems)
                .map_err(io::Error::other)?;
        }
        Command::MoveItem { panel, index, to } => {
            let id = panel_id(&app, panel)?;
            let record = app.panel_mut(id).map_err(io::Error::other)?;
            let item = item_at(record, index)?;
            let landed = record.reorder_item(&item, to).map_err(io::Error::other)?;
            println!("moved {item} to {landed}");
            save(&mut app)?;
        }
        Command::RemoveItem { panel, index } => {
            let id = panel_id(&app, panel)?;
            let record = app.panel_mut(id).map_err(io::Error::other)?;
            let item = item_at(record, index)?;
            record.remove_item(&item).map_err(io::Error::other)?;
            println!("removed {item}");
            save(&mut app)?;
        }
        Command::Set {
            panel,
            property,
            value,
        } => {
            let id = panel_id(&app, panel)?;
            app.edit_position(id, |position, display| {
                set_property(position, display, &property, &value)
            })
            .map_err(io::Error::other)??;
            save(&mut app)?;
        }
    }

    for event in app.take_events() {
        tracing::info!(?event, "panel changed");
    }
    Ok(())
}

fn show(app: &PanelApp) {
    for panel in app.store().iter() {
        let position = panel.position();
        println!("{}", label(app, panel.id()));
        println!(
            "  position: {} on monitor {}, size {}",
            position.screen_position(),
            position.monitor(),
            position.size()
        );
        println!(
            "  width: {:?}, handles: {}, offset: {},{}",
            position.full_width(),
            position.handle_style().label(position.orientation()),
            position.x_offset(),
            position.y_offset()
        );
        println!(
            "  autohide: {}, transparency: {}%",
            position.autohide(),
            position.transparency()
        );
        for (index, item) in panel.items().iter().enumerate() {
            println!("  [{index}] {item}");
        }
    }
}

fn save(app: &mut PanelApp) -> io::Result<()> {
    match app.save().map_err(io::Error::other)? {
        Some(path) => tracing::info!(path = %path.display(), "saved"),
        None => eprintln!("panel customization is locked; changes were not saved"),
    }
    Ok(())
}

fn label(app: &PanelApp, id: PanelId) -> String {
    app.label(id).unwrap_or_else(|| format!("{id:?}"))
}

/// Panels are numbered from 1 on the command line.
fn panel_id(app: &PanelApp, number: usize) -> io::Result<PanelId> {
    number
        .checked_sub(1)
        .and_then(|index| app.store().nth(index))
        .map(PanelRecord::id)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("no panel {number}; there are {}", app.store().len()),
            )
        })
}

fn item_at(panel: &PanelRecord, index: usize) -> io::Result<panel_manager::ItemEntry> {
    panel
        .items()
        .nth(index)
        .cloned()
        .map_err(io::Error::other)
}

fn set_property(
    position: &mut PanelPosition,
    display: &dyn DisplayInfo,
    property: &str,
    value: &str,
) -> io::Result<()> {
    let invalid = || {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid value `{value}` for `{property}`"),
        )
    };
    let number = value.trim().parse::<i64>().map_err(|_| invalid())?;
    let result: Result<(), PanelError> = match property {
        "size" => {
            position.set_size(u16::try_from(number).map_err(|_| invalid())?);
            Ok(())
        }
        "monitor" => {
            position.set_monitor(usize::try_from(number).map_err(|_| invalid())?);
            Ok(())
        }
        "screen-position" => position.set_screen_position_raw(number, display),
        "fullwidth" => position.set_full_width_raw(number, display),
        "xoffset" => {
            position.set_x_offset(i32::try_from(number).map_err(|_| invalid())?);
            Ok(())
        }
        "yoffset" => {
            position.set_y_offset(i32::try_from(number).map_err(|_| invalid())?);
            Ok(())
        }
        "handlestyle" => position.set_handle_style_raw(number),
        "autohide" => {
            position.set_autohide(number == 1);
            Ok(())
        }
        "transparency" => {
            position.set_transparency(u8::try_from(number).map_err(|_| invalid())?);
            Ok(())
        }
        _ => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unknown property `{property}`"),
            ));
        }
    };
    result.map_err(io::Error::other)
}
