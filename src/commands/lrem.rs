use bytes::Bytes;
use std::sync::{Arc, Mutex};

use crate::commands::executable::Executable;
use crate::commands::{missing_args, CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Removes occurrences of `value` from the list: up to `count` from the
/// head when positive, up to `|count|` from the tail when negative, all of
/// them when zero. Replies with the number removed.
#[derive(Debug, PartialEq)]
pub struct Lrem {
    pub key: String,
    pub count: i64,
    pub value: Bytes,
}

impl Executable for Lrem {
    fn exec(self, store: Arc<Mutex<Store>>) -> Result<Frame, Error> {
        let mut store = store.lock().unwrap();
        let removed = store.lrem(&self.key, self.count, &self.value);
        Ok(Frame::Integer(removed as i64))
    }
}

impl TryFrom<&mut CommandParser> for Lrem {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let arity = || missing_args("LREM", "a key, a count and a value");
        let key = parser.next_string().map_err(|_| arity())?;
        let count = match parser.next_integer() {
            Ok(count) => count,
            Err(CommandParserError::EndOfStream) => return Err(arity()),
            Err(_) => return Err("Error: Invalid count".into()),
        };
        let value = parser.next_bytes().map_err(|_| arity())?;

        Ok(Self { key, count, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;

    fn lrem(store: &Arc<Mutex<Store>>, count: &str, value: &str) -> Frame {
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("LREM")),
            Frame::Bulk(Bytes::from("list")),
            Frame::Bulk(Bytes::copy_from_slice(count.as_bytes())),
            Frame::Bulk(Bytes::copy_from_slice(value.as_bytes())),
        ]);
        Command::try_from(frame).unwrap().exec(store.clone()).unwrap()
    }

    #[test]
    fn removes_from_the_head() {
        let store = Arc::new(Mutex::new(Store::new()));
        store.lock().unwrap().rpush(
            "list",
            vec![
                Bytes::from("a"),
                Bytes::from("b"),
                Bytes::from("a"),
                Bytes::from("a"),
            ],
        );

        assert_eq!(lrem(&store, "2", "a"), Frame::Integer(2));

        let mut store = store.lock().unwrap();
        assert_eq!(store.llen("list"), 2);
        assert_eq!(store.lindex("list", 0), Some(&Bytes::from("b")));
    }

    #[test]
    fn missing_key_removes_nothing() {
        let store = Arc::new(Mutex::new(Store::new()));
        assert_eq!(lrem(&store, "0", "a"), Frame::Integer(0));
    }

    #[test]
    fn non_numeric_count() {
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("LREM")),
            Frame::Bulk(Bytes::from("list")),
            Frame::Bulk(Bytes::from("many")),
            Frame::Bulk(Bytes::from("a")),
        ]);
        let err = Command::try_from(frame).err().unwrap();

        assert_eq!(err.to_string(), "Error: Invalid count");
    }
}
