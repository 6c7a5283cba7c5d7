use std::sync::{Arc, Mutex};

use crate::commands::executable::Executable;
use crate::commands::{missing_args, CommandParser};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Erases a key from every namespace, expiry entry included. Also serves
/// UNLINK, which shares its semantics here.
#[derive(Debug, PartialEq)]
pub struct Del {
    pub key: String,
}

impl Executable for Del {
    fn exec(self, store: Arc<Mutex<Store>>) -> Result<Frame, Error> {
        let mut store = store.lock().unwrap();
        let removed = store.del(&self.key);
        Ok(Frame::Integer(i64::from(removed)))
    }
}

impl TryFrom<&mut CommandParser> for Del {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser
            .next_string()
            .map_err(|_| missing_args("DEL", "a key"))?;
        Ok(Self { key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use bytes::Bytes;

    #[test]
    fn removes_the_key_once() {
        let store = Arc::new(Mutex::new(Store::new()));
        store
            .lock()
            .unwrap()
            .set("foo".to_string(), Bytes::from("bar"));

        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("DEL")),
            Frame::Bulk(Bytes::from("foo")),
        ]);

        let cmd = Command::try_from(frame.clone()).unwrap();
        assert_eq!(cmd.exec(store.clone()).unwrap(), Frame::Integer(1));

        let cmd = Command::try_from(frame).unwrap();
        assert_eq!(cmd.exec(store).unwrap(), Frame::Integer(0));
    }
}
