use bytes::Bytes;
use std::sync::{Arc, Mutex};

use crate::commands::executable::Executable;
use crate::commands::{missing_args, CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Writes several hash fields at once, each applied as an HSET. Arguments
/// after the key must come in field value pairs.
#[derive(Debug, PartialEq)]
pub struct Hmset {
    pub key: String,
    pub entries: Vec<(String, Bytes)>,
}

impl Executable for Hmset {
    fn exec(self, store: Arc<Mutex<Store>>) -> Result<Frame, Error> {
        let mut store = store.lock().unwrap();

        for (field, value) in self.entries {
            store.hset(&self.key, field, value);
        }

        Ok(Frame::Simple("OK".to_string()))
    }
}

impl TryFrom<&mut CommandParser> for Hmset {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let arity = || missing_args("HMSET", "a key and field value pairs");
        let key = parser.next_string().map_err(|_| arity())?;

        let mut entries = vec![];
        loop {
            match parser.next_string() {
                Ok(field) => {
                    // A field with no trailing value is an arity error, not
                    // a partial write.
                    let value = parser.next_bytes().map_err(|_| arity())?;
                    entries.push((field, value));
                }
                Err(CommandParserError::EndOfStream) if !entries.is_empty() => break,
                Err(_) => return Err(arity()),
            }
        }

        Ok(Self { key, entries })
    }
}
