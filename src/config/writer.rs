use std::fs;
use std::io::Write;
use std::path::Path;

use quick_xml::escape::escape;
use tempfile::NamedTempFile;

use super::ConfigError;
use crate::item::ItemEntry;
use crate::panel::PanelRecord;

const HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
                      <!DOCTYPE config SYSTEM \"config.dtd\">\n\
                      <panels>\n";

/// Serializes panels back into the document [`super::ConfigParser`] reads.
pub struct ConfigWriter;

impl ConfigWriter {
    /// Render the full document. Every property is written, including the
    /// ones still at their default.
    pub fn render<'p>(panels: impl IntoIterator<Item = &'p PanelRecord>) -> String {
        let mut out = String::from(HEADER);
        for panel in panels {
            push_panel(&mut out, panel);
        }
        out.push_str("</panels>\n");
        out
    }

    /// Replace `dest` with the rendered document.
    ///
    /// The document goes to a temporary file in the destination directory
    /// which is synced and then renamed over `dest`; on any failure the
    /// previous file is left as it was and the temporary file is removed.
    pub fn write<'p>(
        panels: impl IntoIterator<Item = &'p PanelRecord>,
        dest: &Path,
    ) -> Result<(), ConfigError> {
        let document = Self::render(panels);
        let io_err = |source| ConfigError::Io {
            path: dest.to_path_buf(),
            source,
        };

        let dir = dest
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        fs::create_dir_all(dir).map_err(io_err)?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(document.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(dest).map_err(|err| io_err(err.error))?;

        tracing::debug!(
            path = %dest.display(),
            bytes = document.len(),
            "saved panel document"
        );
        Ok(())
    }
}

fn push_panel(out: &mut String, panel: &PanelRecord) {
    let position = panel.position();
    let properties = [
        ("size", i64::from(position.size())),
        ("monitor", position.monitor() as i64),
        ("screen-position", position.screen_position().raw()),
        ("fullwidth", position.full_width().raw()),
        ("xoffset", i64::from(position.x_offset())),
        ("yoffset", i64::from(position.y_offset())),
        ("handlestyle", position.handle_style().raw()),
        ("autohide", i64::from(position.autohide())),
        ("transparency", i64::from(position.transparency())),
    ];

    out.push_str("\t<panel>\n\t\t<properties>\n");
    for (name, value) in properties {
        out.push_str(&format!(
            "\t\t\t<property name=\"{name}\" value=\"{value}\"/>\n"
        ));
    }
    out.push_str("\t\t</properties>\n\t\t<items>\n");
    for item in panel.items().iter() {
        push_item(out, item);
    }
    out.push_str("\t\t</items>\n\t</panel>\n");
}

fn push_item(out: &mut String, item: &ItemEntry) {
    match &item.id {
        Some(id) => out.push_str(&format!(
            "\t\t\t<item name=\"{}\" id=\"{}\"/>\n",
            escape(&item.name),
            escape(id)
        )),
        None => out.push_str(&format!("\t\t\t<item name=\"{}\"/>\n", escape(&item.name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::MonitorGeometry;
    use crate::panel::PanelId;
    use crate::position::{HandleStyle, ScreenPosition};
    use indoc::indoc;

    fn sample() -> PanelRecord {
        let display = MonitorGeometry::single();
        let mut panel = PanelRecord::new(PanelId::new(1));
        panel.edit_position(|p| {
            p.set_screen_position(ScreenPosition::FloatingV, &display);
            p.set_handle_style(HandleStyle::End);
            p.set_offsets(12, 340);
            p.set_autohide(true);
        });
        panel.append_item(ItemEntry::with_id("launcher", "1"));
        panel.append_item(ItemEntry::named("separator"));
        panel
    }

    #[test]
    fn renders_every_property_with_tabs() {
        let panel = sample();
        let expected = indoc! {r#"
            <?xml version="1.0" encoding="UTF-8"?>
            <!DOCTYPE config SYSTEM "config.dtd">
            <panels>
            	<panel>
            		<properties>
            			<property name="size" value="30"/>
            			<property name="monitor" value="0"/>
            			<property name="screen-position" value="14"/>
            			<property name="fullwidth" value="0"/>
            			<property name="xoffset" value="12"/>
            			<property name="yoffset" value="340"/>
            			<property name="handlestyle" value="3"/>
            			<property name="autohide" value="1"/>
            			<property name="transparency" value="20"/>
            		</properties>
            		<items>
            			<item name="launcher" id="1"/>
            			<item name="separator"/>
            		</items>
            	</panel>
            </panels>
        "#};
        assert_eq!(ConfigWriter::render([&panel]), expected);
    }

    #[test]
    fn empty_store_renders_bare_root() {
        let rendered = ConfigWriter::render(std::iter::empty());
        assert!(rendered.ends_with("<panels>\n</panels>\n"));
    }

    #[test]
    fn attribute_values_are_escaped() {
        let mut panel = PanelRecord::new(PanelId::new(1));
        panel.append_item(ItemEntry::with_id("a<b>&\"c\"", "x'y"));
        let rendered = ConfigWriter::render([&panel]);
        assert!(
            rendered.contains(r#"<item name="a&lt;b&gt;&amp;&quot;c&quot;" id="x&apos;y"/>"#),
            "{rendered}"
        );
    }

    #[test]
    fn write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested").join("panels.xml");
        let panel = sample();

        ConfigWriter::write([&panel], &dest).unwrap();
        let first = fs::read_to_string(&dest).unwrap();
        assert!(first.contains("value=\"14\""));

        let empty = PanelRecord::new(PanelId::new(2));
        ConfigWriter::write([&empty], &dest).unwrap();
        let second = fs::read_to_string(&dest).unwrap();
        assert!(second.contains("<property name=\"screen-position\" value=\"8\"/>"));

        let leftovers: Vec<_> = fs::read_dir(dest.parent().unwrap())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("panels.xml")]);
    }

    #[test]
    fn failed_write_leaves_no_temporary() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be replaced by a file
        let dest = dir.path().join("panels.xml");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("keep"), "x").unwrap();

        let err = ConfigWriter::write([&sample()], &dest).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(dest.join("keep").exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
