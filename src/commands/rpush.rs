use bytes::Bytes;
use std::sync::{Arc, Mutex};

use crate::commands::executable::Executable;
use crate::commands::{missing_args, CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Appends values to the tail of the list in argument order, creating it
/// if absent. Replies with the new length.
#[derive(Debug, PartialEq)]
pub struct Rpush {
    pub key: String,
    pub values: Vec<Bytes>,
}

impl Executable for Rpush {
    fn exec(self, store: Arc<Mutex<Store>>) -> Result<Frame, Error> {
        let mut store = store.lock().unwrap();
        let len = store.rpush(&self.key, self.values);
        Ok(Frame::Integer(len as i64))
    }
}

impl TryFrom<&mut CommandParser> for Rpush {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let arity = || missing_args("RPUSH", "a key and a value");
        let key = parser.next_string().map_err(|_| arity())?;

        let mut values = vec![];
        loop {
            match parser.next_bytes() {
                Ok(value) => values.push(value),
                Err(CommandParserError::EndOfStream) if !values.is_empty() => break,
                Err(_) => return Err(arity()),
            }
        }

        Ok(Self { key, values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;

    #[test]
    fn appends_in_argument_order() {
        let store = Arc::new(Mutex::new(Store::new()));

        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("RPUSH")),
            Frame::Bulk(Bytes::from("list")),
            Frame::Bulk(Bytes::from("a")),
            Frame::Bulk(Bytes::from("b")),
            Frame::Bulk(Bytes::from("c")),
        ]);
        let cmd = Command::try_from(frame).unwrap();

        assert_eq!(cmd.exec(store.clone()).unwrap(), Frame::Integer(3));

        let mut store = store.lock().unwrap();
        assert_eq!(store.lindex("list", 0), Some(&Bytes::from("a")));
        assert_eq!(store.lindex("list", -1), Some(&Bytes::from("c")));
    }
}
