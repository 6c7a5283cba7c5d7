use bytes::Bytes;
use std::sync::{Arc, Mutex};

use crate::commands::executable::Executable;
use crate::commands::{missing_args, CommandParser};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

#[derive(Debug, PartialEq)]
pub struct Hkeys {
    pub key: String,
}

impl Executable for Hkeys {
    fn exec(self, store: Arc<Mutex<Store>>) -> Result<Frame, Error> {
        let mut store = store.lock().unwrap();

        let fields = store
            .hkeys(&self.key)
            .into_iter()
            .map(|field| Frame::Bulk(Bytes::from(field)))
            .collect();

        Ok(Frame::Array(fields))
    }
}

impl TryFrom<&mut CommandParser> for Hkeys {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser
            .next_string()
            .map_err(|_| missing_args("HKEYS", "a key"))?;
        Ok(Self { key })
    }
}
