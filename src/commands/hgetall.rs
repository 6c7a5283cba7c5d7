use bytes::Bytes;
use std::sync::{Arc, Mutex};

use crate::commands::executable::Executable;
use crate::commands::{missing_args, CommandParser};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Returns every field and value of the hash as one flat array
/// `[f1, v1, f2, v2, …]`. Pair order is unspecified.
#[derive(Debug, PartialEq)]
pub struct Hgetall {
    pub key: String,
}

impl Executable for Hgetall {
    fn exec(self, store: Arc<Mutex<Store>>) -> Result<Frame, Error> {
        let mut store = store.lock().unwrap();

        let mut entries = vec![];
        for (field, value) in store.hgetall(&self.key) {
            entries.push(Frame::Bulk(Bytes::from(field)));
            entries.push(Frame::Bulk(value));
        }

        Ok(Frame::Array(entries))
    }
}

impl TryFrom<&mut CommandParser> for Hgetall {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser
            .next_string()
            .map_err(|_| missing_args("HGETALL", "a key"))?;
        Ok(Self { key })
    }
}
