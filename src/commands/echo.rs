use std::sync::{Arc, Mutex};

use crate::commands::executable::Executable;
use crate::commands::{missing_args, CommandParser};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Returns the message sent by the client as a simple string.
#[derive(Debug, PartialEq)]
pub struct Echo {
    pub message: String,
}

impl Executable for Echo {
    fn exec(self, _store: Arc<Mutex<Store>>) -> Result<Frame, Error> {
        Ok(Frame::Simple(self.message))
    }
}

impl TryFrom<&mut CommandParser> for Echo {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let message = parser
            .next_string()
            .map_err(|_| missing_args("ECHO", "a message"))?;
        Ok(Self { message })
    }
}
