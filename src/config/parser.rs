//! Event-driven reader for the panel document.
//!
//! The parser is a flat state machine over element start/end events. It
//! never looks more than one element deep: an element is interpreted only
//! by the state it opens in.

use std::str::FromStr;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::{ConfigError, ParseWarning};
use crate::constants::MAX_TRANSPARENCY;
use crate::display::DisplayInfo;
use crate::item::{ItemEntry, ItemFactory};
use crate::itembar::ItemOrder;
use crate::panel::{PanelId, PanelRecord};
use crate::position::{FullWidth, HandleStyle, PanelPosition, ScreenPosition};

/// Panels read from one document, plus everything that was skipped.
#[derive(Debug, Default)]
pub struct ParsedConfig {
    pub panels: Vec<PanelRecord>,
    pub warnings: Vec<ParseWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    Start,
    Panels,
    Panel,
    Properties,
    Items,
}

/// Values collected from a panel's `<properties>` blocks. A later block
/// builds on the earlier ones, and nothing reaches the panel until a block
/// closes.
#[derive(Debug, Clone)]
struct PendingProperties {
    set: bool,
    size: u16,
    monitor: usize,
    screen_position: ScreenPosition,
    full_width: FullWidth,
    x_offset: i32,
    y_offset: i32,
    handle_style: HandleStyle,
    autohide: bool,
    transparency: u8,
}

impl PendingProperties {
    fn new() -> Self {
        let defaults = PanelPosition::default();
        Self {
            set: false,
            size: defaults.size(),
            monitor: defaults.monitor(),
            screen_position: defaults.screen_position(),
            full_width: defaults.full_width(),
            x_offset: defaults.x_offset(),
            y_offset: defaults.y_offset(),
            handle_style: defaults.handle_style(),
            autohide: defaults.autohide(),
            transparency: defaults.transparency(),
        }
    }

    fn apply(&mut self, name: &str, value: &str) -> Result<(), ParseWarning> {
        let applied = match name {
            "size" => number(value)
                .filter(|size: &u16| *size > 0)
                .map(|v| self.size = v),
            "monitor" => number(value).map(|v| self.monitor = v),
            "screen-position" => number(value)
                .and_then(ScreenPosition::from_raw)
                .map(|v| self.screen_position = v),
            "fullwidth" => number(value)
                .and_then(FullWidth::from_raw)
                .map(|v| self.full_width = v),
            "xoffset" => number(value).map(|v| self.x_offset = v),
            "yoffset" => number(value).map(|v| self.y_offset = v),
            "handlestyle" => number(value)
                .and_then(HandleStyle::from_raw)
                .map(|v| self.handle_style = v),
            "autohide" => match value.trim() {
                "1" => Some(true),
                "0" => Some(false),
                _ => None,
            }
            .map(|v| self.autohide = v),
            "transparency" => number(value)
                .filter(|t: &u8| *t <= MAX_TRANSPARENCY)
                .map(|v| self.transparency = v),
            _ => {
                return Err(ParseWarning::UnknownProperty {
                    name: name.to_string(),
                });
            }
        };
        applied.ok_or_else(|| ParseWarning::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        })
    }

    /// Write every collected value into `position`. The screen position
    /// goes first so the handle and span rules judge the final placement.
    fn commit(self, position: &mut PanelPosition, display: &dyn DisplayInfo) {
        let mut screen_position = self.screen_position;
        if screen_position == ScreenPosition::None {
            tracing::debug!("panel has no screen position; making it float");
            screen_position = ScreenPosition::FloatingH;
        }
        position.set_screen_position(screen_position, display);
        position.set_full_width(self.full_width, display);
        position.set_size(self.size);
        position.set_monitor(self.monitor);
        position.set_offsets(self.x_offset, self.y_offset);
        position.set_handle_style(self.handle_style);
        position.set_autohide(self.autohide);
        position.set_transparency(self.transparency);
    }
}

#[derive(Debug)]
struct PendingPanel {
    position: PanelPosition,
    items: ItemOrder<ItemEntry>,
    properties: PendingProperties,
}

impl PendingPanel {
    fn new() -> Self {
        let position = PanelPosition::default();
        Self {
            items: ItemOrder::new(position.orientation()),
            position,
            properties: PendingProperties::new(),
        }
    }
}

pub struct ConfigParser<'a> {
    display: &'a dyn DisplayInfo,
    factory: &'a mut dyn ItemFactory,
    state: ParserState,
    next_id: u32,
    current: Option<PendingPanel>,
    out: ParsedConfig,
}

impl<'a> ConfigParser<'a> {
    pub fn new(display: &'a dyn DisplayInfo, factory: &'a mut dyn ItemFactory) -> Self {
        Self {
            display,
            factory,
            state: ParserState::Start,
            next_id: 1,
            current: None,
            out: ParsedConfig::default(),
        }
    }

    /// Number parsed panels upwards from `first` instead of 1.
    pub fn first_id(mut self, first: u32) -> Self {
        self.next_id = first;
        self
    }

    /// Parse a complete document.
    ///
    /// Unknown or incomplete entries become warnings. A document that is not
    /// well-formed XML, including one that ends with elements still open, is
    /// rejected as a whole.
    pub fn parse(mut self, document: &str) -> Result<ParsedConfig, ConfigError> {
        let mut reader = Reader::from_str(document);
        reader.trim_text(true);
        let mut open = 0usize;

        loop {
            let handled = match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(Event::Start(element)) => {
                    open += 1;
                    self.start_element(&element)
                }
                Ok(Event::Empty(element)) => {
                    let started = self.start_element(&element);
                    self.end_element(element.name().as_ref());
                    started
                }
                Ok(Event::End(element)) => {
                    open = open.saturating_sub(1);
                    self.end_element(element.name().as_ref());
                    Ok(())
                }
                Ok(_) => Ok(()),
                Err(err) => Err(err),
            };
            if let Err(err) = handled {
                return Err(ConfigError::Parse {
                    position: reader.buffer_position(),
                    message: err.to_string(),
                });
            }
        }

        if open > 0 {
            return Err(ConfigError::Parse {
                position: document.len(),
                message: format!("document ended with {open} element(s) still open"),
            });
        }

        tracing::debug!(
            panels = self.out.panels.len(),
            warnings = self.out.warnings.len(),
            "parsed panel document"
        );
        Ok(self.out)
    }

    fn start_element(&mut self, element: &BytesStart<'_>) -> Result<(), quick_xml::Error> {
        let name = element.name();
        match (self.state, name.as_ref()) {
            (ParserState::Start, b"panels") => self.state = ParserState::Panels,
            (ParserState::Panels, b"panel") => {
                self.current = Some(PendingPanel::new());
                self.state = ParserState::Panel;
            }
            (ParserState::Panel, b"properties") => self.state = ParserState::Properties,
            (ParserState::Panel, b"items") => self.state = ParserState::Items,
            (ParserState::Properties, b"property") => self.property(element)?,
            (ParserState::Items, b"item") => self.item(element)?,
            (_, other) => self.warn(ParseWarning::UnknownElement {
                element: String::from_utf8_lossy(other).into_owned(),
            }),
        }
        Ok(())
    }

    fn end_element(&mut self, name: &[u8]) {
        match (self.state, name) {
            (ParserState::Panels, b"panels") => self.state = ParserState::Start,
            (ParserState::Panel, b"panel") => {
                self.finish_panel();
                self.state = ParserState::Panels;
            }
            (ParserState::Properties, b"properties") => {
                self.commit_properties();
                self.state = ParserState::Panel;
            }
            (ParserState::Items, b"items") => self.state = ParserState::Panel,
            (ParserState::Start, other) => self.warn(ParseWarning::UnexpectedEnd {
                element: String::from_utf8_lossy(other).into_owned(),
            }),
            // closing tag of an element that was already reported
            _ => {}
        }
    }

    fn property(&mut self, element: &BytesStart<'_>) -> Result<(), quick_xml::Error> {
        let (name, value) = match (attribute(element, b"name")?, attribute(element, b"value")?) {
            (Some(name), Some(value)) => (name, value),
            (name, _) => {
                let attribute = if name.is_none() { "name" } else { "value" };
                self.warn(ParseWarning::MissingAttribute {
                    element: "property",
                    attribute,
                });
                return Ok(());
            }
        };
        let Some(panel) = self.current.as_mut() else {
            return Ok(());
        };
        panel.properties.set = true;
        let applied = panel.properties.apply(&name, &value);
        if let Err(warning) = applied {
            self.warn(warning);
        }
        Ok(())
    }

    fn item(&mut self, element: &BytesStart<'_>) -> Result<(), quick_xml::Error> {
        let Some(name) = attribute(element, b"name")? else {
            self.warn(ParseWarning::MissingAttribute {
                element: "item",
                attribute: "name",
            });
            return Ok(());
        };
        let id = attribute(element, b"id")?;
        match self.factory.create_item(&name, id.as_deref()) {
            Some(item) => {
                tracing::debug!(item = %item, "restored item");
                if let Some(panel) = self.current.as_mut() {
                    panel.items.append(item);
                }
            }
            None => self.warn(ParseWarning::UnavailableItem { name }),
        }
        Ok(())
    }

    fn commit_properties(&mut self) {
        let display = self.display;
        let Some(panel) = self.current.as_mut() else {
            return;
        };
        if panel.properties.set {
            panel.properties.clone().commit(&mut panel.position, display);
        }
        panel.position.finalize(display);
    }

    fn finish_panel(&mut self) {
        let Some(mut panel) = self.current.take() else {
            return;
        };
        panel.position.finalize(self.display);
        let id = PanelId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.out
            .panels
            .push(PanelRecord::from_parts(id, panel.position, panel.items));
    }

    fn warn(&mut self, warning: ParseWarning) {
        tracing::warn!(%warning, "skipping configuration entry");
        self.out.warnings.push(warning);
    }
}

fn attribute(element: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, quick_xml::Error> {
    for attr in element.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn number<T: FromStr>(value: &str) -> Option<T> {
    value.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::MonitorGeometry;
    use crate::item::DefaultItemFactory;
    use indoc::indoc;
    use ratatui::layout::Rect;

    fn parse(document: &str) -> Result<ParsedConfig, ConfigError> {
        let display = MonitorGeometry::single();
        let mut factory = DefaultItemFactory::new();
        ConfigParser::new(&display, &mut factory).parse(document)
    }

    fn names(panel: &PanelRecord) -> Vec<String> {
        panel.items().iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn panel_without_properties_keeps_defaults() {
        let parsed = parse(indoc! {r#"
            <?xml version="1.0" encoding="UTF-8"?>
            <!DOCTYPE config SYSTEM "config.dtd">
            <panels>
              <panel>
                <properties>
                  <property name="size" value="48"/>
                  <property name="screen-position" value="11"/>
                  <property name="monitor" value="1"/>
                  <property name="autohide" value="1"/>
                  <property name="transparency" value="65"/>
                  <property name="xoffset" value="4"/>
                  <property name="yoffset" value="-7"/>
                </properties>
                <items>
                  <item name="launcher" id="1"/>
                  <item name="clock" id="2"/>
                </items>
              </panel>
              <panel>
                <items>
                  <item name="tasklist"/>
                </items>
              </panel>
            </panels>
        "#})
        .unwrap();

        assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
        assert_eq!(parsed.panels.len(), 2);

        let first = parsed.panels[0].position();
        assert_eq!(first.size(), 48);
        assert_eq!(first.screen_position(), ScreenPosition::W);
        assert_eq!(first.monitor(), 1);
        assert!(first.autohide());
        assert_eq!(first.transparency(), 65);
        assert_eq!((first.x_offset(), first.y_offset()), (4, -7));
        assert_eq!(names(&parsed.panels[0]), vec!["launcher (1)", "clock (2)"]);
        assert_eq!(
            parsed.panels[0].items().orientation(),
            ratatui::layout::Direction::Vertical
        );

        assert_eq!(parsed.panels[1].position(), &PanelPosition::default());
        assert_eq!(names(&parsed.panels[1]), vec!["tasklist"]);
        assert_eq!(parsed.panels[0].id(), PanelId::new(1));
        assert_eq!(parsed.panels[1].id(), PanelId::new(2));
    }

    #[test]
    fn empty_panels_element_yields_nothing() {
        let parsed = parse("<panels></panels>").unwrap();
        assert!(parsed.panels.is_empty());
        assert!(parsed.warnings.is_empty());
        assert!(parse("").unwrap().panels.is_empty());
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert!(matches!(
            parse("<panels><panel></panels>"),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            parse("<panels><panel>"),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            parse(r#"<panels><panel><items><item name="a" name="b"/></items></panel></panels>"#),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn bad_properties_warn_and_keep_defaults() {
        let parsed = parse(indoc! {r#"
            <panels>
              <panel>
                <properties>
                  <property name="size" value="huge"/>
                  <property name="wobble" value="1"/>
                  <property name="transparency" value="140"/>
                  <property name="fullwidth" value="1"/>
                  <property value="3"/>
                </properties>
              </panel>
            </panels>
        "#})
        .unwrap();

        let position = parsed.panels[0].position();
        assert_eq!(position.size(), PanelPosition::default().size());
        assert_eq!(position.transparency(), PanelPosition::default().transparency());
        assert_eq!(position.full_width(), FullWidth::Full);
        assert_eq!(
            parsed.warnings,
            vec![
                ParseWarning::InvalidValue {
                    name: "size".into(),
                    value: "huge".into()
                },
                ParseWarning::UnknownProperty {
                    name: "wobble".into()
                },
                ParseWarning::InvalidValue {
                    name: "transparency".into(),
                    value: "140".into()
                },
                ParseWarning::MissingAttribute {
                    element: "property",
                    attribute: "name"
                },
            ]
        );
    }

    #[test]
    fn property_without_value_is_reported() {
        let parsed = parse(indoc! {r#"
            <panels>
              <panel>
                <properties>
                  <property name="size"/>
                </properties>
              </panel>
            </panels>
        "#})
        .unwrap();
        assert_eq!(parsed.panels[0].position().size(), PanelPosition::default().size());
        assert_eq!(
            parsed.warnings,
            vec![ParseWarning::MissingAttribute {
                element: "property",
                attribute: "value"
            }]
        );
    }

    #[test]
    fn later_properties_blocks_build_on_earlier_ones() {
        let parsed = parse(indoc! {r#"
            <panels>
              <panel>
                <properties>
                  <property name="size" value="48"/>
                  <property name="screen-position" value="11"/>
                </properties>
                <properties>
                  <property name="autohide" value="1"/>
                </properties>
              </panel>
            </panels>
        "#})
        .unwrap();
        let position = parsed.panels[0].position();
        assert_eq!(position.size(), 48);
        assert_eq!(position.screen_position(), ScreenPosition::W);
        assert!(position.autohide());
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn unset_screen_position_becomes_floating() {
        let parsed = parse(indoc! {r#"
            <panels>
              <panel>
                <properties>
                  <property name="handlestyle" value="2"/>
                  <property name="screen-position" value="0"/>
                </properties>
              </panel>
            </panels>
        "#})
        .unwrap();
        let position = parsed.panels[0].position();
        assert_eq!(position.screen_position(), ScreenPosition::FloatingH);
        // handle style declared before the position still applies
        assert_eq!(position.handle_style(), HandleStyle::Start);
    }

    #[test]
    fn fixed_panels_drop_handles() {
        let parsed = parse(indoc! {r#"
            <panels>
              <panel>
                <properties>
                  <property name="screen-position" value="8"/>
                  <property name="handlestyle" value="1"/>
                </properties>
              </panel>
            </panels>
        "#})
        .unwrap();
        assert_eq!(parsed.panels[0].position().handle_style(), HandleStyle::None);
    }

    #[test]
    fn span_is_revalidated_against_monitors() {
        let display = MonitorGeometry::new(vec![
            Rect::new(0, 0, 1920, 1080),
            Rect::new(1920, 0, 1920, 1200),
        ]);
        let mut factory = DefaultItemFactory::new();
        let parsed = ConfigParser::new(&display, &mut factory)
            .parse(indoc! {r#"
                <panels>
                  <panel>
                    <properties>
                      <property name="screen-position" value="8"/>
                      <property name="fullwidth" value="2"/>
                    </properties>
                  </panel>
                </panels>
            "#})
            .unwrap();
        assert_eq!(parsed.panels[0].position().full_width(), FullWidth::Full);
    }

    #[test]
    fn unavailable_and_nameless_items_are_skipped() {
        let display = MonitorGeometry::single();
        let mut factory = DefaultItemFactory::with_allowed(["launcher"]);
        let parsed = ConfigParser::new(&display, &mut factory)
            .first_id(10)
            .parse(indoc! {r#"
                <panels>
                  <panel>
                    <items>
                      <item name="pager" id="4"/>
                      <item id="5"/>
                      <item name="launcher" id="6"/>
                    </items>
                  </panel>
                </panels>
            "#})
            .unwrap();
        assert_eq!(names(&parsed.panels[0]), vec!["launcher (6)"]);
        assert_eq!(parsed.panels[0].id(), PanelId::new(10));
        assert_eq!(
            parsed.warnings,
            vec![
                ParseWarning::UnavailableItem {
                    name: "pager".into()
                },
                ParseWarning::MissingAttribute {
                    element: "item",
                    attribute: "name"
                },
            ]
        );
    }

    #[test]
    fn unknown_root_is_reported() {
        let parsed = parse("<config><panel></panel></config>").unwrap();
        assert!(parsed.panels.is_empty());
        assert_eq!(
            parsed.warnings,
            vec![
                ParseWarning::UnknownElement {
                    element: "config".into()
                },
                ParseWarning::UnknownElement {
                    element: "panel".into()
                },
                ParseWarning::UnexpectedEnd {
                    element: "panel".into()
                },
                ParseWarning::UnexpectedEnd {
                    element: "config".into()
                },
            ]
        );
    }

    #[test]
    fn attribute_values_are_unescaped() {
        let parsed = parse(
            r#"<panels><panel><items><item name="a&amp;b" id="&quot;x&quot;"/></items></panel></panels>"#,
        )
        .unwrap();
        let item = parsed.panels[0].items().nth(0).unwrap();
        assert_eq!(item.name, "a&b");
        assert_eq!(item.id.as_deref(), Some("\"x\""));
    }
}
