pub mod del;
pub mod echo;
pub mod executable;
pub mod expire;
pub mod flushall;
pub mod get;
pub mod hdel;
pub mod hexists;
pub mod hget;
pub mod hgetall;
pub mod hkeys;
pub mod hlen;
pub mod hmset;
pub mod hset;
pub mod hvals;
pub mod keys;
pub mod lindex;
pub mod llen;
pub mod lpop;
pub mod lpush;
pub mod lrem;
pub mod lset;
pub mod ping;
pub mod rename;
pub mod rpop;
pub mod rpush;
pub mod set;
pub mod type_;

use bytes::Bytes;
use std::sync::{Arc, Mutex};
use std::{str, vec};
use thiserror::Error as ThisError;

use crate::commands::executable::Executable;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

use del::Del;
use echo::Echo;
use expire::Expire;
use flushall::FlushAll;
use get::Get;
use hdel::Hdel;
use hexists::Hexists;
use hget::Hget;
use hgetall::Hgetall;
use hkeys::Hkeys;
use hlen::Hlen;
use hmset::Hmset;
use hset::Hset;
use hvals::Hvals;
use keys::Keys;
use lindex::Lindex;
use llen::Llen;
use lpop::Lpop;
use lpush::Lpush;
use lrem::Lrem;
use lset::Lset;
use ping::Ping;
use rename::Rename;
use rpop::Rpop;
use rpush::Rpush;
use set::Set;
use type_::Type;

#[derive(Debug, PartialEq)]
pub enum Command {
    Ping(Ping),
    Echo(Echo),
    FlushAll(FlushAll),
    Set(Set),
    Get(Get),
    Keys(Keys),
    Type(Type),
    Del(Del),
    Expire(Expire),
    Rename(Rename),
    Llen(Llen),
    Lpush(Lpush),
    Rpush(Rpush),
    Lpop(Lpop),
    Rpop(Rpop),
    Lrem(Lrem),
    Lindex(Lindex),
    Lset(Lset),
    Hset(Hset),
    Hget(Hget),
    Hexists(Hexists),
    Hdel(Hdel),
    Hgetall(Hgetall),
    Hkeys(Hkeys),
    Hvals(Hvals),
    Hlen(Hlen),
    Hmset(Hmset),
}

impl Executable for Command {
    fn exec(self, store: Arc<Mutex<Store>>) -> Result<Frame, Error> {
        match self {
            Command::Ping(cmd) => cmd.exec(store),
            Command::Echo(cmd) => cmd.exec(store),
            Command::FlushAll(cmd) => cmd.exec(store),
            Command::Set(cmd) => cmd.exec(store),
            Command::Get(cmd) => cmd.exec(store),
            Command::Keys(cmd) => cmd.exec(store),
            Command::Type(cmd) => cmd.exec(store),
            Command::Del(cmd) => cmd.exec(store),
            Command::Expire(cmd) => cmd.exec(store),
            Command::Rename(cmd) => cmd.exec(store),
            Command::Llen(cmd) => cmd.exec(store),
            Command::Lpush(cmd) => cmd.exec(store),
            Command::Rpush(cmd) => cmd.exec(store),
            Command::Lpop(cmd) => cmd.exec(store),
            Command::Rpop(cmd) => cmd.exec(store),
            Command::Lrem(cmd) => cmd.exec(store),
            Command::Lindex(cmd) => cmd.exec(store),
            Command::Lset(cmd) => cmd.exec(store),
            Command::Hset(cmd) => cmd.exec(store),
            Command::Hget(cmd) => cmd.exec(store),
            Command::Hexists(cmd) => cmd.exec(store),
            Command::Hdel(cmd) => cmd.exec(store),
            Command::Hgetall(cmd) => cmd.exec(store),
            Command::Hkeys(cmd) => cmd.exec(store),
            Command::Hvals(cmd) => cmd.exec(store),
            Command::Hlen(cmd) => cmd.exec(store),
            Command::Hmset(cmd) => cmd.exec(store),
        }
    }
}

impl TryFrom<Frame> for Command {
    type Error = Error;

    fn try_from(frame: Frame) -> Result<Self, Self::Error> {
        // Both wire forms surface as arrays: clients send RESP arrays of
        // bulk strings, and inline commands are tokenized into the same
        // shape.
        let frames = match frame {
            Frame::Array(array) => array,
            frame => {
                return Err(Box::new(CommandParserError::InvalidFrame {
                    expected: "array".to_string(),
                    actual: frame,
                }))
            }
        };

        if frames.is_empty() {
            return Err("Error: Empty command".into());
        }

        let parser = &mut CommandParser {
            parts: frames.into_iter(),
        };

        let command_name = parser.parse_command_name()?;

        match &command_name[..] {
            "ping" => Ping::try_from(parser).map(Command::Ping),
            "echo" => Echo::try_from(parser).map(Command::Echo),
            "flushall" => FlushAll::try_from(parser).map(Command::FlushAll),
            "set" => Set::try_from(parser).map(Command::Set),
            "get" => Get::try_from(parser).map(Command::Get),
            "keys" => Keys::try_from(parser).map(Command::Keys),
            "type" => Type::try_from(parser).map(Command::Type),
            "del" | "unlink" => Del::try_from(parser).map(Command::Del),
            "expire" => Expire::try_from(parser).map(Command::Expire),
            "rename" => Rename::try_from(parser).map(Command::Rename),
            "llen" => Llen::try_from(parser).map(Command::Llen),
            "lpush" => Lpush::try_from(parser).map(Command::Lpush),
            "rpush" => Rpush::try_from(parser).map(Command::Rpush),
            "lpop" => Lpop::try_from(parser).map(Command::Lpop),
            "rpop" => Rpop::try_from(parser).map(Command::Rpop),
            "lrem" => Lrem::try_from(parser).map(Command::Lrem),
            "lindex" => Lindex::try_from(parser).map(Command::Lindex),
            "lset" => Lset::try_from(parser).map(Command::Lset),
            "hset" => Hset::try_from(parser).map(Command::Hset),
            "hget" => Hget::try_from(parser).map(Command::Hget),
            "hexists" => Hexists::try_from(parser).map(Command::Hexists),
            "hdel" => Hdel::try_from(parser).map(Command::Hdel),
            "hgetall" => Hgetall::try_from(parser).map(Command::Hgetall),
            "hkeys" => Hkeys::try_from(parser).map(Command::Hkeys),
            "hvals" => Hvals::try_from(parser).map(Command::Hvals),
            "hlen" => Hlen::try_from(parser).map(Command::Hlen),
            "hmset" => Hmset::try_from(parser).map(Command::Hmset),
            _ => Err("Error: Unknown command".into()),
        }
    }
}

/// The stable arity-error string: names the command and what it is missing.
pub(crate) fn missing_args(command: &str, arguments: &str) -> Error {
    format!("Error: {} command requires {}", command, arguments).into()
}

pub struct CommandParser {
    parts: vec::IntoIter<Frame>,
}

impl CommandParser {
    fn parse_command_name(&mut self) -> Result<String, CommandParserError> {
        let command_name = self.parts.next().ok_or(CommandParserError::EndOfStream)?;

        // Command name matching is case-insensitive.
        match command_name {
            Frame::Simple(s) => Ok(s.to_lowercase()),
            Frame::Bulk(bytes) => str::from_utf8(&bytes[..])
                .map(|s| s.to_lowercase())
                .map_err(CommandParserError::InvalidUTF8String),
            frame => Err(CommandParserError::InvalidFrame {
                expected: "simple string".to_string(),
                actual: frame,
            }),
        }
    }

    fn next_string(&mut self) -> Result<String, CommandParserError> {
        let frame = self.parts.next().ok_or(CommandParserError::EndOfStream)?;

        // Both `Simple` and `Bulk` representation may be strings.
        match frame {
            Frame::Simple(s) => Ok(s),
            Frame::Bulk(bytes) => str::from_utf8(&bytes[..])
                .map(|s| s.to_string())
                .map_err(CommandParserError::InvalidUTF8String),
            frame => Err(CommandParserError::InvalidFrame {
                expected: "simple or bulk string".to_string(),
                actual: frame,
            }),
        }
    }

    fn next_bytes(&mut self) -> Result<Bytes, CommandParserError> {
        let frame = self.parts.next().ok_or(CommandParserError::EndOfStream)?;

        match frame {
            Frame::Simple(s) => Ok(Bytes::from(s)),
            Frame::Bulk(bytes) => Ok(bytes),
            frame => Err(CommandParserError::InvalidFrame {
                expected: "simple or bulk string".to_string(),
                actual: frame,
            }),
        }
    }

    fn next_integer(&mut self) -> Result<i64, CommandParserError> {
        let string = self.next_string()?;
        string
            .parse::<i64>()
            .map_err(|_| CommandParserError::InvalidInteger(string))
    }
}

#[derive(Debug, ThisError, PartialEq)]
pub(crate) enum CommandParserError {
    #[error("protocol error; invalid frame, expected {expected}, got {actual:?}")]
    InvalidFrame { expected: String, actual: Frame },
    #[error("protocol error; invalid UTF-8 string")]
    InvalidUTF8String(#[from] str::Utf8Error),
    #[error("protocol error; invalid integer {0:?}")]
    InvalidInteger(String),
    #[error("protocol error; attempting to extract a value failed due to the frame being fully consumed")]
    EndOfStream,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(tokens: &[&str]) -> Result<Command, Error> {
        let frames = tokens
            .iter()
            .map(|t| Frame::Bulk(Bytes::copy_from_slice(t.as_bytes())))
            .collect();
        Command::try_from(Frame::Array(frames))
    }

    #[test]
    fn empty_command() {
        let err = Command::try_from(Frame::Array(vec![])).err().unwrap();
        assert_eq!(err.to_string(), "Error: Empty command");
    }

    #[test]
    fn unknown_command() {
        let err = parse(&["SUBSCRIBE", "channel"]).err().unwrap();
        assert_eq!(err.to_string(), "Error: Unknown command");
    }

    #[test]
    fn command_names_are_case_insensitive() {
        let cmd = parse(&["pInG"]).unwrap();
        assert_eq!(cmd, Command::Ping(Ping));

        let cmd = parse(&["set", "foo", "bar"]).unwrap();
        assert_eq!(
            cmd,
            Command::Set(Set {
                key: "foo".to_string(),
                value: Bytes::from("bar")
            })
        );
    }

    #[test]
    fn unlink_is_an_alias_for_del() {
        let cmd = parse(&["UNLINK", "foo"]).unwrap();
        assert_eq!(
            cmd,
            Command::Del(Del {
                key: "foo".to_string()
            })
        );
    }

    #[test]
    fn parse_command_with_simple_string_name() {
        let frame = Frame::Array(vec![
            Frame::Simple(String::from("GET")),
            Frame::Simple(String::from("foo")),
        ]);

        let cmd = Command::try_from(frame).unwrap();

        assert_eq!(
            cmd,
            Command::Get(Get {
                key: String::from("foo")
            })
        );
    }

    #[test]
    fn non_array_frame_is_rejected() {
        let err = Command::try_from(Frame::Simple("PING".to_string()))
            .err()
            .unwrap();
        let err = err.downcast_ref::<CommandParserError>().unwrap();

        assert!(matches!(err, CommandParserError::InvalidFrame { .. }));
    }
}
