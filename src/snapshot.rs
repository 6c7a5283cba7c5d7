//! Snapshot persistence: the whole store serialised as tagged text, one
//! entity per line.
//!
//! - `K <key> <value>`: string entry, single spaces between fields.
//! - `L <key>  <elt1> <elt2> ...`: list entry, two spaces after the key.
//! - `H <key>  <f1>:<v1> <f2>:<v2> ...`: hash entry, field and value
//!   joined by `:`.
//!
//! Fields are whitespace-delimited, so values containing whitespace (or
//! `:` inside hash values) do not round-trip; this matches the file's
//! intent as a best-effort restart point, not an interchange format.
//! Reading and writing are byte-oriented, so any whitespace-free payload
//! survives intact whether or not it is UTF-8.

use bytes::Bytes;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use crate::store::Store;

impl Store {
    /// Serialises every live entry to `path`, replacing the file. Invoked
    /// with the store lock held, so the snapshot is a consistent cut.
    pub fn dump(&mut self, path: impl AsRef<Path>) -> std::io::Result<()> {
        self.purge_expired();

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        for (key, value) in &self.strings {
            writer.write_all(b"K ")?;
            writer.write_all(key.as_bytes())?;
            writer.write_all(b" ")?;
            writer.write_all(value)?;
            writer.write_all(b"\n")?;
        }

        for (key, elements) in &self.lists {
            writer.write_all(b"L ")?;
            writer.write_all(key.as_bytes())?;
            writer.write_all(b" ")?;
            for element in elements {
                writer.write_all(b" ")?;
                writer.write_all(element)?;
            }
            writer.write_all(b"\n")?;
        }

        for (key, entries) in &self.hashes {
            writer.write_all(b"H ")?;
            writer.write_all(key.as_bytes())?;
            writer.write_all(b" ")?;
            for (field, value) in entries {
                writer.write_all(b" ")?;
                writer.write_all(field.as_bytes())?;
                writer.write_all(b":")?;
                writer.write_all(value)?;
            }
            writer.write_all(b"\n")?;
        }

        writer.flush()
    }

    /// Clears the store, then reads `path` back. Blank lines and lines with
    /// an unknown tag are skipped. Invoked with the store lock held.
    pub fn load(&mut self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let mut contents = Vec::new();
        File::open(path)?.read_to_end(&mut contents)?;

        self.flush_all();

        for line in contents.split(|&b| b == b'\n') {
            match line.first() {
                Some(&b'K') => {
                    let mut fields = tokens(&line[1..]);
                    // The value is the next whitespace-delimited run; a
                    // value that contained spaces was truncated at dump
                    // time and loses its tail here too.
                    if let (Some(key), Some(value)) = (fields.next(), fields.next()) {
                        self.strings
                            .insert(lossy(key), Bytes::copy_from_slice(value));
                    }
                }
                Some(&b'L') => {
                    let mut fields = tokens(&line[1..]);
                    let Some(key) = fields.next() else { continue };
                    let elements = fields.map(Bytes::copy_from_slice).collect();
                    self.lists.insert(lossy(key), elements);
                }
                Some(&b'H') => {
                    let mut fields = tokens(&line[1..]);
                    let Some(key) = fields.next() else { continue };
                    let mut entries = HashMap::new();
                    for pair in fields {
                        let mut halves = pair.splitn(2, |&b| b == b':');
                        if let (Some(field), Some(value)) = (halves.next(), halves.next()) {
                            entries.insert(lossy(field), Bytes::copy_from_slice(value));
                        }
                    }
                    self.hashes.insert(lossy(key), entries);
                }
                _ => {}
            }
        }

        Ok(())
    }
}

fn tokens(line: &[u8]) -> impl Iterator<Item = &[u8]> {
    line.split(|b| b.is_ascii_whitespace())
        .filter(|token| !token.is_empty())
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
