use std::sync::{Arc, Mutex};

use crate::commands::executable::Executable;
use crate::commands::{missing_args, CommandParser};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Removes one field from the hash. Replies `:1` when the field existed.
#[derive(Debug, PartialEq)]
pub struct Hdel {
    pub key: String,
    pub field: String,
}

impl Executable for Hdel {
    fn exec(self, store: Arc<Mutex<Store>>) -> Result<Frame, Error> {
        let mut store = store.lock().unwrap();
        let removed = store.hdel(&self.key, &self.field);
        Ok(Frame::Integer(i64::from(removed)))
    }
}

impl TryFrom<&mut CommandParser> for Hdel {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let arity = || missing_args("HDEL", "a key and a field");
        let key = parser.next_string().map_err(|_| arity())?;
        let field = parser.next_string().map_err(|_| arity())?;

        Ok(Self { key, field })
    }
}
