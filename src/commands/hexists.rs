use std::sync::{Arc, Mutex};

use crate::commands::executable::Executable;
use crate::commands::{missing_args, CommandParser};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

#[derive(Debug, PartialEq)]
pub struct Hexists {
    pub key: String,
    pub field: String,
}

impl Executable for Hexists {
    fn exec(self, store: Arc<Mutex<Store>>) -> Result<Frame, Error> {
        let mut store = store.lock().unwrap();
        let present = store.hexists(&self.key, &self.field);
        Ok(Frame::Integer(i64::from(present)))
    }
}

impl TryFrom<&mut CommandParser> for Hexists {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let arity = || missing_args("HEXISTS", "a key and a field");
        let key = parser.next_string().map_err(|_| arity())?;
        let field = parser.next_string().map_err(|_| arity())?;

        Ok(Self { key, field })
    }
}
