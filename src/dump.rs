use quarry_common::Result;
use quarry_logger::{log, LogSeverity};
use quarry_nbt::{NBTFile, Tag, TagType};
use quarry_region::{Region, REGION_FILE_EXTENSION};
use serde::Serialize;
use std::fmt::Display;
use std::io::{self, Read, Write};
use std::path::Path;

const BYTE_ARRAY_PREVIEW: usize = 20;
const INT_ARRAY_PREVIEW: usize = 10;
const STRING_PREVIEW: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Indented `TAG_X("name"): value` lines.
    #[default]
    Text,
    /// One JSON object per root tag.
    Json,
}

#[derive(Serialize)]
struct JsonRoot<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    chunk: Option<(i32, i32)>,
    name: &'a str,
    value: &'a Tag,
}

/// Prints tag trees read from files or region chunks.
pub struct Dumper<W> {
    writer: W,
    format: Format,
}

impl<W: Write> Dumper<W> {
    pub fn new(writer: W, format: Format) -> Self {
        Dumper { writer, format }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Dumps a region file chunk by chunk when the extension says so,
    /// otherwise a gzip-compressed tag file.
    pub fn dump_path<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let is_region = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case(REGION_FILE_EXTENSION));

        if is_region {
            self.dump_region(path).map(|_| ())
        } else {
            self.dump_file(path)
        }
    }

    pub fn dump_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let file = NBTFile::open(path)?;
        self.write_root(None, &file.name, &file.root)?;
        Ok(())
    }

    /// Dumps one uncompressed tag stream.
    pub fn dump_stream<R: Read>(&mut self, mut reader: R) -> Result<()> {
        let file = NBTFile::read(&mut reader)?;
        self.write_root(None, &file.name, &file.root)?;
        Ok(())
    }

    /// Dumps every chunk of a region. Chunks that fail to decode are logged
    /// and skipped; the number skipped is returned.
    pub fn dump_region<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let region = Region::load(path)?;
        let mut skipped = 0;

        for descriptor in region.descriptors().iter().filter(|d| !d.is_empty()) {
            let decoded = descriptor
                .reader()
                .and_then(|mut reader| Tag::read(&mut reader));

            match decoded {
                Ok((name, tree)) => {
                    if self.format == Format::Text {
                        writeln!(self.writer, "Chunk {}:", descriptor.sector())?;
                    }
                    self.write_root(Some((descriptor.x, descriptor.z)), &name, &tree)?;
                }
                Err(err) => {
                    let err = err.in_chunk(region.x, region.z, descriptor.x, descriptor.z);
                    log(format!("skipping chunk: {}", err), LogSeverity::Warning);
                    skipped += 1;
                }
            }
        }

        Ok(skipped)
    }

    fn write_root(&mut self, chunk: Option<(i32, i32)>, name: &str, tree: &Tag) -> io::Result<()> {
        match self.format {
            Format::Text => self.write_tag(0, name, tree),
            Format::Json => {
                let root = JsonRoot {
                    chunk,
                    name,
                    value: tree,
                };
                serde_json::to_writer(&mut self.writer, &root).map_err(io::Error::from)?;
                writeln!(self.writer)
            }
        }
    }

    fn write_tag(&mut self, depth: usize, name: &str, tag: &Tag) -> io::Result<()> {
        let indent = "  ".repeat(depth);
        let kind = tag.tag_type();

        match tag {
            Tag::End => Ok(()),
            Tag::Compound(children) => {
                writeln!(self.writer, "{}{}({:?}) {{", indent, kind, name)?;
                for (child_name, child) in children {
                    self.write_tag(depth + 1, child_name, child)?;
                }
                writeln!(self.writer, "{}}}", indent)
            }
            Tag::List(_, elements) => {
                writeln!(self.writer, "{}{}({:?}) [{}] {{", indent, kind, name, elements.len())?;
                for element in elements {
                    self.write_tag(depth + 1, "", element)?;
                }
                writeln!(self.writer, "{}}}", indent)
            }
            Tag::ByteArray(values) => {
                let unsigned: Vec<u8> = values.iter().map(|&v| v as u8).collect();
                self.write_array(&indent, kind, name, &unsigned, BYTE_ARRAY_PREVIEW)
            }
            Tag::IntArray(values) => self.write_array(&indent, kind, name, values, INT_ARRAY_PREVIEW),
            Tag::LongArray(values) => self.write_array(&indent, kind, name, values, INT_ARRAY_PREVIEW),
            Tag::String(value) => {
                if value.len() <= STRING_PREVIEW {
                    writeln!(self.writer, "{}{}({:?}): {:?}", indent, kind, name, value)
                } else {
                    let head: String = value.chars().take(STRING_PREVIEW).collect();
                    writeln!(self.writer, "{}{}({:?}): {:?}...", indent, kind, name, head)
                }
            }
            Tag::Byte(v) => writeln!(self.writer, "{}{}({:?}): {}", indent, kind, name, v),
            Tag::Short(v) => writeln!(self.writer, "{}{}({:?}): {}", indent, kind, name, v),
            Tag::Int(v) => writeln!(self.writer, "{}{}({:?}): {}", indent, kind, name, v),
            Tag::Long(v) => writeln!(self.writer, "{}{}({:?}): {}", indent, kind, name, v),
            Tag::Float(v) => writeln!(self.writer, "{}{}({:?}): {}", indent, kind, name, v),
            Tag::Double(v) => writeln!(self.writer, "{}{}({:?}): {}", indent, kind, name, v),
        }
    }

    fn write_array<T: Display>(
        &mut self,
        indent: &str,
        kind: TagType,
        name: &str,
        values: &[T],
        preview: usize,
    ) -> io::Result<()> {
        writeln!(self.writer, "{}{}({:?}) [{}] {{", indent, kind, name, values.len())?;

        let shown = &values[..values.len().min(preview)];
        let joined = shown.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" ");
        let more = if values.len() > preview { "..." } else { "" };
        writeln!(self.writer, "{}  [{}]{}", indent, joined, more)?;

        writeln!(self.writer, "{}}}", indent)
    }
}

/// Dumps `path` to stdout.
pub fn dump_to_stdout<P: AsRef<Path>>(path: P, format: Format) -> Result<()> {
    let stdout = io::stdout();
    let mut dumper = Dumper::new(io::BufWriter::new(stdout.lock()), format);
    dumper.dump_path(path)?;
    dumper.flush()
}
