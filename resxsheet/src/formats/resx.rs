//! Support for the `.resx` XML resource format.
//!
//! Only flat string `<data>` elements are supported; typed or binary resources
//! are read as plain text and `<resheader>` blocks are replaced on write by the
//! fixed header set below.

use std::{
    fs::File,
    io::{BufRead, Read, Write},
    path::Path,
};

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use serde::Serialize;

use crate::{error::Error, traits::Parser};

pub const RESMIMETYPE: &str = "text/microsoft-resx";
pub const VERSION: &str = "2.0";
pub const READER: &str = "System.Resources.ResXResourceReader, System.Windows.Forms, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089";
pub const WRITER: &str = "System.Resources.ResXResourceWriter, System.Windows.Forms, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089";

const HEADERS: [(&str, &str); 4] = [
    ("resmimetype", RESMIMETYPE),
    ("version", VERSION),
    ("reader", READER),
    ("writer", WRITER),
];

const INDENT: &str = "\n    ";
const INDENT2: &str = "\n        ";

/// One `.resx` document: the ordered `<data>` entries of a single locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Format {
    pub data: Vec<DataEntry>,
}

/// A single `<data>` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataEntry {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

impl DataEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        DataEntry {
            name: name.into(),
            value: value.into(),
            comment: String::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

impl Format {
    pub fn new(data: Vec<DataEntry>) -> Self {
        Format { data }
    }

    pub fn find(&self, name: &str) -> Option<&DataEntry> {
        self.data.iter().find(|d| d.name == name)
    }

    /// Reads the document at `path`, reporting any failure as
    /// [`Error::MalformedDocument`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        Self::read_from(path).map_err(|e| Error::malformed(path, e))
    }
}

#[derive(Clone, Copy)]
enum Field {
    Value,
    Comment,
}

impl Parser for Format {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        let mut buf = Vec::new();

        let mut data = Vec::new();
        let mut depth = 0usize;
        let mut seen_root = false;
        let mut current: Option<DataEntry> = None;
        let mut field: Option<Field> = None;
        let mut text = String::new();

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => {
                    depth += 1;
                    match depth {
                        1 => {
                            expect_root(e)?;
                            seen_root = true;
                        }
                        2 if e.name().as_ref() == b"data" => {
                            current = Some(DataEntry::new(data_name(e)?, ""));
                        }
                        3 if current.is_some() => {
                            field = match e.name().as_ref() {
                                b"value" => Some(Field::Value),
                                b"comment" => Some(Field::Comment),
                                _ => None,
                            };
                            text.clear();
                        }
                        _ => {}
                    }
                }
                Event::Empty(ref e) => match depth + 1 {
                    1 => {
                        expect_root(e)?;
                        seen_root = true;
                    }
                    2 if e.name().as_ref() == b"data" => {
                        data.push(DataEntry::new(data_name(e)?, ""));
                    }
                    _ => {}
                },
                Event::Text(e) => {
                    if field.is_some() {
                        text.push_str(&e.unescape()?);
                    }
                }
                Event::CData(e) => {
                    if field.is_some() {
                        text.push_str(&String::from_utf8_lossy(&e));
                    }
                }
                Event::End(ref e) => {
                    match depth {
                        3 => {
                            if let (Some(entry), Some(f)) = (current.as_mut(), field.take()) {
                                let value = std::mem::take(&mut text);
                                match f {
                                    Field::Value => entry.value = value,
                                    Field::Comment => entry.comment = value,
                                }
                            }
                        }
                        2 if e.name().as_ref() == b"data" => {
                            if let Some(entry) = current.take() {
                                data.push(entry);
                            }
                        }
                        _ => {}
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if depth != 0 {
            return Err(Error::InvalidResource("unexpected end of document".to_string()));
        }
        if !seen_root {
            return Err(Error::InvalidResource("missing <root> element".to_string()));
        }

        Ok(Format { data })
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new(&mut writer);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        xml_writer.write_event(Event::Start(BytesStart::new("root")))?;

        for (name, value) in HEADERS {
            let mut elem = BytesStart::new("resheader");
            elem.push_attribute(("name", name));

            xml_writer.write_event(Event::Text(BytesText::new(INDENT)))?;
            xml_writer.write_event(Event::Start(elem))?;
            write_child(&mut xml_writer, "value", value)?;
            xml_writer.write_event(Event::Text(BytesText::new(INDENT)))?;
            xml_writer.write_event(Event::End(BytesEnd::new("resheader")))?;
        }

        // Empty values are not written at all.
        for entry in self.data.iter().filter(|d| !d.value.is_empty()) {
            let mut elem = BytesStart::new("data");
            elem.push_attribute(("name", entry.name.as_str()));
            elem.push_attribute(("xml:space", "preserve"));

            xml_writer.write_event(Event::Text(BytesText::new(INDENT)))?;
            xml_writer.write_event(Event::Start(elem))?;
            write_child(&mut xml_writer, "value", &entry.value)?;
            if !entry.comment.is_empty() {
                write_child(&mut xml_writer, "comment", &entry.comment)?;
            }
            xml_writer.write_event(Event::Text(BytesText::new(INDENT)))?;
            xml_writer.write_event(Event::End(BytesEnd::new("data")))?;
        }

        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        xml_writer.write_event(Event::End(BytesEnd::new("root")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        Ok(())
    }

    /// Override default file reading to strip a BOM and decode UTF-16 documents.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .build(file);

        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).map_err(Error::Io)?;

        Self::from_str(&decoded)
    }
}

fn write_child<W: Write>(xml_writer: &mut Writer<W>, name: &str, text: &str) -> Result<(), Error> {
    xml_writer.write_event(Event::Text(BytesText::new(INDENT2)))?;
    xml_writer.write_event(Event::Start(BytesStart::new(name)))?;
    xml_writer.write_event(Event::Text(BytesText::new(text)))?;
    xml_writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn expect_root(e: &BytesStart) -> Result<(), Error> {
    if e.name().as_ref() == b"root" {
        Ok(())
    } else {
        Err(Error::InvalidResource(format!(
            "expected <root> element, found <{}>",
            String::from_utf8_lossy(e.name().as_ref())
        )))
    }
}

fn data_name(e: &BytesStart) -> Result<String, Error> {
    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::InvalidResource(e.to_string()))?;
        if attr.key.as_ref() == b"name" {
            let name = attr.unescape_value()?.to_string();
            if !name.is_empty() {
                return Ok(name);
            }
        }
    }
    Err(Error::InvalidResource("data element missing 'name'".to_string()))
}
