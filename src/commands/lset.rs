use bytes::Bytes;
use std::sync::{Arc, Mutex};

use crate::commands::executable::Executable;
use crate::commands::{missing_args, CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Overwrites one list element by index, with the same negative-from-tail
/// addressing as LINDEX.
#[derive(Debug, PartialEq)]
pub struct Lset {
    pub key: String,
    pub index: i64,
    pub value: Bytes,
}

impl Executable for Lset {
    fn exec(self, store: Arc<Mutex<Store>>) -> Result<Frame, Error> {
        let mut store = store.lock().unwrap();

        if store.lset(&self.key, self.index, self.value) {
            Ok(Frame::Simple("OK".to_string()))
        } else {
            Ok(Frame::Error("Error: Index out of range".to_string()))
        }
    }
}

impl TryFrom<&mut CommandParser> for Lset {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let arity = || missing_args("LSET", "a key, an index and a value");
        let key = parser.next_string().map_err(|_| arity())?;
        let index = match parser.next_integer() {
            Ok(index) => index,
            Err(CommandParserError::EndOfStream) => return Err(arity()),
            Err(_) => return Err("Error: Invalid index".into()),
        };
        let value = parser.next_bytes().map_err(|_| arity())?;

        Ok(Self { key, index, value })
    }
}
