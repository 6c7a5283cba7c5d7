use std::sync::{Arc, Mutex};

use crate::commands::executable::Executable;
use crate::commands::{missing_args, CommandParser};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Moves a key to a new name in whichever namespace it lives, carrying its
/// expiry along and overwriting the destination unconditionally.
#[derive(Debug, PartialEq)]
pub struct Rename {
    pub old: String,
    pub new: String,
}

impl Executable for Rename {
    fn exec(self, store: Arc<Mutex<Store>>) -> Result<Frame, Error> {
        let mut store = store.lock().unwrap();

        if store.rename(&self.old, &self.new) {
            Ok(Frame::Simple("OK".to_string()))
        } else {
            Ok(Frame::Error("Error: RENAME failed".to_string()))
        }
    }
}

impl TryFrom<&mut CommandParser> for Rename {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let arity = || missing_args("RENAME", "an old key name and a new key name");
        let old = parser.next_string().map_err(|_| arity())?;
        let new = parser.next_string().map_err(|_| arity())?;

        Ok(Self { old, new })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use bytes::Bytes;

    fn rename(store: &Arc<Mutex<Store>>, old: &str, new: &str) -> Frame {
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("RENAME")),
            Frame::Bulk(Bytes::copy_from_slice(old.as_bytes())),
            Frame::Bulk(Bytes::copy_from_slice(new.as_bytes())),
        ]);
        Command::try_from(frame).unwrap().exec(store.clone()).unwrap()
    }

    #[test]
    fn moves_the_value() {
        let store = Arc::new(Mutex::new(Store::new()));
        store
            .lock()
            .unwrap()
            .set("old".to_string(), Bytes::from("value"));

        assert_eq!(rename(&store, "old", "new"), Frame::Simple("OK".to_string()));

        let mut store = store.lock().unwrap();
        assert!(!store.exists("old"));
        assert_eq!(store.get("new"), Some(&Bytes::from("value")));
    }

    #[test]
    fn missing_source_fails() {
        let store = Arc::new(Mutex::new(Store::new()));

        assert_eq!(
            rename(&store, "old", "new"),
            Frame::Error("Error: RENAME failed".to_string())
        );
    }
}
