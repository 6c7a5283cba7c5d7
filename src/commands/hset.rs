use bytes::Bytes;
use std::sync::{Arc, Mutex};

use crate::commands::executable::Executable;
use crate::commands::{missing_args, CommandParser};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Writes one hash field. Replies `:1` when the write changed anything (a
/// new field, or a different value for an existing one), else `:0`.
#[derive(Debug, PartialEq)]
pub struct Hset {
    pub key: String,
    pub field: String,
    pub value: Bytes,
}

impl Executable for Hset {
    fn exec(self, store: Arc<Mutex<Store>>) -> Result<Frame, Error> {
        let mut store = store.lock().unwrap();
        let changed = store.hset(&self.key, self.field, self.value);
        Ok(Frame::Integer(i64::from(changed)))
    }
}

impl TryFrom<&mut CommandParser> for Hset {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let arity = || missing_args("HSET", "a key, a field and a value");
        let key = parser.next_string().map_err(|_| arity())?;
        let field = parser.next_string().map_err(|_| arity())?;
        let value = parser.next_bytes().map_err(|_| arity())?;

        Ok(Self { key, field, value })
    }
}
