//! JSON file loading and saving.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{from_reader, to_writer_pretty};

/// Reads a JSON-encoded type from a given file `path`.
pub fn read_json<D: DeserializeOwned>(path: impl AsRef<Path>) -> Result<D, anyhow::Error> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    from_reader(BufReader::new(file)).with_context(|| format!("cannot parse {}", path.display()))
}

/// Writes `value` to the file at `path` as pretty-printed JSON, replacing any existing file.
pub fn write_json(path: impl AsRef<Path>, value: &impl Serialize) -> Result<(), anyhow::Error> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    to_writer_pretty(&mut writer, value).with_context(|| format!("cannot write {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

pub trait ReadJsonFile<D> {
    fn read_json_file(path: impl AsRef<Path>) -> Result<D, anyhow::Error>;
}

impl<D: DeserializeOwned> ReadJsonFile<D> for D {
    fn read_json_file(path: impl AsRef<Path>) -> Result<D, anyhow::Error> {
        read_json(path)
    }
}
