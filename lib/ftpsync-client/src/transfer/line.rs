/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite, BufStream};

use crate::config::FtpTransferConfig;
use crate::error::FtpLineDataReadError;
use crate::io_ext::LimitedBufReadExt;

#[async_trait]
pub trait FtpLineDataReceiver {
    async fn recv_line(&mut self, line: &str);
    fn should_return_early(&self) -> bool;
}

pub(crate) struct FtpLineDataTransfer<T: AsyncRead + AsyncWrite> {
    io: BufStream<T>,
    read_lines: usize,
    max_lines: usize,
    line_buf: Vec<u8>,
}

impl<T> FtpLineDataTransfer<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) fn new(io: T, config: &FtpTransferConfig) -> Self {
        FtpLineDataTransfer {
            io: BufStream::new(io),
            read_lines: 0,
            max_lines: config.list_max_entries,
            line_buf: Vec::with_capacity(config.list_max_line_len),
        }
    }

    async fn send_buf_to_receiver<R>(
        &mut self,
        receiver: &mut R,
    ) -> Result<(), FtpLineDataReadError>
    where
        R: FtpLineDataReceiver,
    {
        let s = std::str::from_utf8(&self.line_buf)
            .map_err(|_| FtpLineDataReadError::UnsupportedEncoding)?;
        receiver.recv_line(s).await;
        if receiver.should_return_early() {
            self.read_lines += 1;
            return Err(FtpLineDataReadError::AbortedByCallback);
        }
        self.line_buf.clear();
        Ok(())
    }

    pub(crate) async fn read_to_end<R>(
        mut self,
        receiver: &mut R,
    ) -> Result<(), FtpLineDataReadError>
    where
        R: FtpLineDataReceiver,
    {
        if !self.line_buf.is_empty() {
            self.send_buf_to_receiver(receiver).await?;
        }

        for i in self.read_lines..self.max_lines {
            let (found, nr) = self
                .io
                .limited_read_until(b'\n', self.line_buf.capacity(), &mut self.line_buf)
                .await?;
            if nr == 0 {
                return Ok(());
            }

            if !found {
                return Err(FtpLineDataReadError::LineTooLong(i + 1));
            }

            self.send_buf_to_receiver(receiver).await?;
        }

        Err(FtpLineDataReadError::TooManyLines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CollectReceiver {
        lines: Vec<String>,
    }

    #[async_trait]
    impl FtpLineDataReceiver for CollectReceiver {
        async fn recv_line(&mut self, line: &str) {
            self.lines.push(line.trim_end().to_string());
        }

        fn should_return_early(&self) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn read_lines() {
        let data = tokio_test::io::Builder::new()
            .read(b"type=file;size=1; /a\r\ntype=file;size=2; /b\r\n")
            .build();
        let transfer = FtpLineDataTransfer::new(data, &FtpTransferConfig::default());
        let mut receiver = CollectReceiver { lines: Vec::new() };
        transfer.read_to_end(&mut receiver).await.unwrap();
        assert_eq!(receiver.lines.len(), 2);
        assert_eq!(receiver.lines[0], "type=file;size=1; /a");
    }

    #[tokio::test]
    async fn too_many_lines() {
        let data = tokio_test::io::Builder::new()
            .read(b"line1\r\nline2\r\nline3\r\n")
            .build();
        let config = FtpTransferConfig {
            list_max_entries: 2,
            ..Default::default()
        };
        let transfer = FtpLineDataTransfer::new(data, &config);
        let mut receiver = CollectReceiver { lines: Vec::new() };
        let r = transfer.read_to_end(&mut receiver).await;
        assert!(matches!(r, Err(FtpLineDataReadError::TooManyLines)));
    }
}
