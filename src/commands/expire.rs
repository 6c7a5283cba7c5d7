use std::sync::{Arc, Mutex};

use crate::commands::executable::Executable;
use crate::commands::{missing_args, CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Sets a time-to-live on an existing key. Deadlines are monotonic;
/// seconds at or below zero make the key expire immediately.
#[derive(Debug, PartialEq)]
pub struct Expire {
    pub key: String,
    pub seconds: i64,
}

impl Executable for Expire {
    fn exec(self, store: Arc<Mutex<Store>>) -> Result<Frame, Error> {
        let mut store = store.lock().unwrap();

        if store.expire(&self.key, self.seconds) {
            Ok(Frame::Simple("OK".to_string()))
        } else {
            Ok(Frame::Error("Error: Key not found".to_string()))
        }
    }
}

impl TryFrom<&mut CommandParser> for Expire {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let arity = || missing_args("EXPIRE", "a key and a time in seconds");
        let key = parser.next_string().map_err(|_| arity())?;
        let seconds = match parser.next_integer() {
            Ok(seconds) => seconds,
            Err(CommandParserError::EndOfStream) => return Err(arity()),
            Err(_) => return Err("Error: Invalid seconds".into()),
        };

        Ok(Self { key, seconds })
    }
}
