use std::sync::{Arc, Mutex};

use crate::commands::executable::Executable;
use crate::commands::{missing_args, CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Reads one list element by zero-based index; negative indices count from
/// the tail (-1 is the last element). Out of range replies nil.
#[derive(Debug, PartialEq)]
pub struct Lindex {
    pub key: String,
    pub index: i64,
}

impl Executable for Lindex {
    fn exec(self, store: Arc<Mutex<Store>>) -> Result<Frame, Error> {
        let mut store = store.lock().unwrap();

        match store.lindex(&self.key, self.index) {
            Some(value) => Ok(Frame::Bulk(value.clone())),
            None => Ok(Frame::Null),
        }
    }
}

impl TryFrom<&mut CommandParser> for Lindex {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let arity = || missing_args("LINDEX", "a key and an index");
        let key = parser.next_string().map_err(|_| arity())?;
        let index = match parser.next_integer() {
            Ok(index) => index,
            Err(CommandParserError::EndOfStream) => return Err(arity()),
            Err(_) => return Err("Error: Invalid index".into()),
        };

        Ok(Self { key, index })
    }
}
