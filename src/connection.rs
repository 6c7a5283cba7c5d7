use bytes::{Buf, BytesMut};
use std::io::Cursor;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::frame::{self, Frame};

pub struct Connection {
    stream: TcpStream,
    // Data is read from the socket into the read buffer. When a frame is
    // parsed, the corresponding data is removed from the buffer.
    buffer: BytesMut,
}

impl Connection {
    pub fn new(stream: TcpStream) -> Connection {
        Connection {
            stream,
            // Allocate the buffer with 4kb of capacity.
            buffer: BytesMut::with_capacity(4096),
        }
    }

    /// Reads one request from the peer. TCP does not preserve message
    /// boundaries, so the buffer may hold half a frame (keep reading) or
    /// several (parse them one call at a time). Returns `None` when the peer
    /// closes the connection cleanly.
    pub async fn read_frame(&mut self) -> crate::Result<Option<Frame>> {
        loop {
            if let Some(frame) = self.parse_frame()? {
                return Ok(Some(frame));
            }

            if 0 == self.stream.read_buf(&mut self.buffer).await? {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                return Err("connection reset by peer".into());
            }
        }
    }

    fn parse_frame(&mut self) -> crate::Result<Option<Frame>> {
        if self.buffer.is_empty() {
            return Ok(None);
        }

        // Requests that do not open with '*' are inline commands, complete
        // once a whole line is buffered.
        if self.buffer[0] != b'*' {
            let Some(end) = self.buffer.iter().position(|&b| b == b'\n') else {
                return Ok(None);
            };
            let line = self.buffer.split_to(end + 1);
            return Ok(Some(Frame::parse_inline(&line)));
        }

        let mut cursor = Cursor::new(&self.buffer[..]);
        match Frame::parse(&mut cursor) {
            Ok(frame) => {
                let consumed = cursor.position() as usize;
                self.buffer.advance(consumed);
                Ok(Some(frame))
            }
            Err(frame::Error::Incomplete) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Drops any buffered input, resynchronising the stream after a protocol
    /// error.
    pub fn discard_input(&mut self) {
        self.buffer.clear();
    }

    pub async fn write_frame(&mut self, frame: &Frame) -> crate::Result<()> {
        let bytes = frame.serialize();
        self.stream.write_all(&bytes).await?;
        self.stream.flush().await?;
        Ok(())
    }
}
