use indoc::indoc;
use ratatui::layout::Rect;

use panel_manager::config::{ConfigWriter, FixedSource};
use panel_manager::{
    DefaultItemFactory, FullWidth, HandleStyle, ItemEntry, MonitorGeometry, PanelStore,
    ScreenPosition,
};

fn two_monitors() -> MonitorGeometry {
    MonitorGeometry::new(vec![
        Rect::new(0, 0, 1920, 1080),
        Rect::new(1920, 0, 1920, 1080),
    ])
}

#[test]
fn written_document_reads_back_identically() {
    let display = two_monitors();
    let mut store = PanelStore::new();

    let top = store.add_panel();
    let panel = store.get_mut(top).unwrap();
    panel.edit_position(|p| {
        p.set_screen_position(ScreenPosition::N, &display);
        p.set_full_width(FullWidth::SpanMonitors, &display);
        p.set_size(42);
        p.set_monitor(1);
        p.set_autohide(true);
        p.set_transparency(0);
    });
    panel.append_item(ItemEntry::with_id("launcher", "1"));
    panel.append_item(ItemEntry::with_id("tasklist", "2"));
    panel.append_item(ItemEntry::named("separator"));
    panel.append_item(ItemEntry::with_id("clock", "<3>"));

    let floating = store.add_panel();
    let panel = store.get_mut(floating).unwrap();
    panel.edit_position(|p| {
        p.set_screen_position(ScreenPosition::FloatingV, &display);
        p.set_handle_style(HandleStyle::Start);
        p.set_offsets(-20, 600);
    });

    let document = store.render();
    let mut factory = DefaultItemFactory::new();
    let (parsed, warnings) = PanelStore::from_document(&document, &display, &mut factory).unwrap();
    assert!(warnings.is_empty(), "{warnings:?}");
    assert!(parsed.same_config(&store));

    let first = parsed.nth(0).unwrap().position();
    assert_eq!(first.full_width(), FullWidth::SpanMonitors);
    assert_eq!(first.transparency(), 0);
    let second = parsed.nth(1).unwrap().position();
    assert_eq!(second.handle_style(), HandleStyle::Start);
    assert_eq!((second.x_offset(), second.y_offset()), (-20, 600));

    // a second pass is byte-for-byte stable
    assert_eq!(ConfigWriter::render(parsed.iter()), document);
}

#[test]
fn saved_file_survives_a_reload() {
    let dir = tempfile::tempdir().unwrap();
    let source = FixedSource::new(dir.path().join("panels.xml"));
    let display = MonitorGeometry::single();

    let mut factory = DefaultItemFactory::new();
    let (mut store, _) = PanelStore::load(&source, &display, &mut factory);
    let id = store.ids()[0];
    let clock = factory_item(&mut factory, "clock");
    store.get_mut(id).unwrap().prepend_item(clock);
    store
        .save(&source, &mut panel_manager::item::NoItemPersistence)
        .unwrap();

    let mut factory = DefaultItemFactory::new();
    let (reloaded, report) = PanelStore::load(&source, &display, &mut factory);
    assert!(!report.used_fallback());
    assert!(reloaded.same_config(&store));
    let names: Vec<_> = reloaded
        .nth(0)
        .unwrap()
        .items()
        .iter()
        .map(|item| item.name.clone())
        .collect();
    assert_eq!(names, vec!["clock", "launcher"]);
}

fn factory_item(factory: &mut DefaultItemFactory, name: &str) -> ItemEntry {
    use panel_manager::ItemFactory;
    factory.new_item(name).unwrap()
}

#[test]
fn hand_written_document_with_two_panels() {
    let display = MonitorGeometry::single();
    let mut factory = DefaultItemFactory::new();
    let (store, warnings) = PanelStore::from_document(
        indoc! {r#"
            <?xml version="1.0" encoding="UTF-8"?>
            <!DOCTYPE config SYSTEM "config.dtd">
            <panels>
            	<panel>
            		<properties>
            			<property name="size" value="24"/>
            			<property name="screen-position" value="2"/>
            			<property name="fullwidth" value="1"/>
            		</properties>
            		<items>
            			<item name="launcher" id="11"/>
            		</items>
            	</panel>
            	<panel>
            		<items>
            			<item name="pager" id="12"/>
            		</items>
            	</panel>
            </panels>
        "#},
        &display,
        &mut factory,
    )
    .unwrap();

    assert!(warnings.is_empty());
    assert_eq!(store.len(), 2);
    let first = store.nth(0).unwrap().position();
    assert_eq!(first.size(), 24);
    assert_eq!(first.screen_position(), ScreenPosition::N);
    assert_eq!(first.full_width(), FullWidth::Full);
    assert_eq!(
        store.nth(1).unwrap().position(),
        &panel_manager::PanelPosition::default()
    );
}

#[test]
fn span_monitors_dropped_when_heights_differ() {
    let display = MonitorGeometry::new(vec![
        Rect::new(0, 0, 1920, 1080),
        Rect::new(1920, 0, 1280, 1024),
    ]);
    let mut factory = DefaultItemFactory::new();
    let (store, _) = PanelStore::from_document(
        r#"<panels><panel><properties>
             <property name="screen-position" value="8"/>
             <property name="fullwidth" value="2"/>
           </properties></panel></panels>"#,
        &display,
        &mut factory,
    )
    .unwrap();
    assert_eq!(
        store.nth(0).unwrap().position().full_width(),
        FullWidth::Full
    );
}
