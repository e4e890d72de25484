//! Runtime I/O channels for the SIO opcodes.
//!
//! Both channels are external collaborators: file-backed, interactive, or
//! in-memory buffers in tests. A read blocks until one whitespace-delimited
//! integer is available; end-of-input during a read is an explicit error.

use crate::error::RuntimeError;
use std::io::{BufRead, Write};

/// The machine's input and output channels.
pub struct Channels<'a> {
    input: &'a mut dyn BufRead,
    output: &'a mut dyn Write,
}

impl<'a> Channels<'a> {
    /// Wrap an input and an output channel.
    pub fn new(input: &'a mut dyn BufRead, output: &'a mut dyn Write) -> Self {
        Self { input, output }
    }

    /// Read one whitespace-delimited integer from the input channel.
    pub(crate) fn read_int(&mut self, at: usize) -> Result<i64, RuntimeError> {
        let mut token = String::new();

        loop {
            let byte = {
                let buf = self.input.fill_buf().map_err(|e| RuntimeError::Io {
                    at,
                    message: e.to_string(),
                })?;
                buf.first().copied()
            };

            match byte {
                None => break,
                Some(b) if b.is_ascii_whitespace() => {
                    self.input.consume(1);
                    if !token.is_empty() {
                        break;
                    }
                }
                Some(b) => {
                    token.push(b as char);
                    self.input.consume(1);
                }
            }
        }

        if token.is_empty() {
            return Err(RuntimeError::InputExhausted { at });
        }
        token
            .parse()
            .map_err(|_| RuntimeError::InputMalformed { at, token })
    }

    /// Emit one integer, space-terminated, to the output channel.
    pub(crate) fn write_int(&mut self, value: i64, at: usize) -> Result<(), RuntimeError> {
        write!(self.output, "{value} ").map_err(|e| RuntimeError::Io {
            at,
            message: e.to_string(),
        })
    }
}
