/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use tokio::io::{AsyncRead, AsyncWrite};

use super::FtpControlChannel;
use crate::error::FtpRawResponseError;
use crate::io_ext::LimitedBufReadExt;

#[derive(Debug)]
pub(super) enum FtpRawResponse {
    SingleLine(u16, String),
    MultiLine(u16, Vec<String>),
}

macro_rules! char_to_u16 {
    ($c:expr) => {
        ($c - b'0') as u16
    };
}

impl FtpRawResponse {
    pub(super) fn parse_single_line(line: &[u8]) -> Result<Self, FtpRawResponseError> {
        let code = char_to_u16!(line[0]) * 100 + char_to_u16!(line[1]) * 10 + char_to_u16!(line[2]);
        if !(100..600).contains(&code) {
            return Err(FtpRawResponseError::InvalidReplyCode(code));
        }
        let msg =
            std::str::from_utf8(&line[4..]).map_err(|_| FtpRawResponseError::LineIsNotUtf8)?;
        Ok(FtpRawResponse::SingleLine(code, msg.trim_end().to_string()))
    }

    pub(super) fn get_multi_line_parser(
        line: &[u8],
        max_lines: usize,
    ) -> Result<FtpMultiLineReplyParser, FtpRawResponseError> {
        let code = char_to_u16!(line[0]) * 100 + char_to_u16!(line[1]) * 10 + char_to_u16!(line[2]);
        if !(100..600).contains(&code) {
            return Err(FtpRawResponseError::InvalidReplyCode(code));
        }
        let end_prefix = [line[0], line[1], line[2], b' '];
        let mut lines = Vec::<String>::with_capacity(max_lines);
        let msg =
            std::str::from_utf8(&line[4..]).map_err(|_| FtpRawResponseError::LineIsNotUtf8)?;
        lines.push(msg.trim_end().to_string());
        Ok(FtpMultiLineReplyParser {
            code,
            end_prefix,
            lines,
        })
    }

    pub(super) fn code(&self) -> u16 {
        match self {
            FtpRawResponse::SingleLine(code, _) => *code,
            FtpRawResponse::MultiLine(code, _) => *code,
        }
    }

    pub(super) fn line_trimmed(&self) -> Option<&str> {
        match self {
            FtpRawResponse::SingleLine(_, line) => Some(line.as_str().trim()),
            FtpRawResponse::MultiLine(_, _) => None,
        }
    }

    pub(super) fn lines(&self) -> Option<&[String]> {
        match self {
            FtpRawResponse::SingleLine(_, _) => None,
            FtpRawResponse::MultiLine(_, lines) => Some(lines),
        }
    }

    pub(super) fn parse_pasv_227_reply(&self) -> Option<SocketAddr> {
        let line = match self {
            FtpRawResponse::SingleLine(_, line) => line,
            FtpRawResponse::MultiLine(_, _) => return None,
        };

        if let Some(p_start) = memchr::memchr(b'(', line.as_bytes()) {
            if let Some(p_end) = memchr::memchr(b')', &line.as_bytes()[p_start..]) {
                let p_end = p_end + p_start;

                let a: Vec<&str> = line[p_start + 1..p_end].split(',').collect();
                if a.len() != 6 {
                    return None;
                }

                let h1 = u8::from_str(a[0]).ok()?;
                let h2 = u8::from_str(a[1]).ok()?;
                let h3 = u8::from_str(a[2]).ok()?;
                let h4 = u8::from_str(a[3]).ok()?;
                let p1 = u8::from_str(a[4]).ok()?;
                let p2 = u8::from_str(a[5]).ok()?;

                let ip = IpAddr::V4(Ipv4Addr::new(h1, h2, h3, h4));
                let port = ((p1 as u16) << 8) + (p2 as u16);
                return Some(SocketAddr::new(ip, port));
            }
        }

        None
    }

    pub(super) fn parse_epsv_229_reply(&self) -> Option<u16> {
        let line = match self {
            FtpRawResponse::SingleLine(_, line) => line,
            FtpRawResponse::MultiLine(_, _) => return None,
        };

        if let Some(p_start) = memchr::memchr(b'(', line.as_bytes()) {
            if let Some(p_end) = memchr::memchr(b')', &line.as_bytes()[p_start..]) {
                let p_end = p_end + p_start;

                if !line[p_start + 1..p_end].starts_with("|||") {
                    return None;
                }
                if p_end - 1 <= p_start + 4 {
                    return None;
                }
                if line.as_bytes()[p_end - 1] != b'|' {
                    return None;
                }
                let port = u16::from_str(&line[p_start + 4..p_end - 1]).ok()?;
                return Some(port);
            }
        }

        None
    }

    /// Parse the quoted pathname in a 257 reply as specified by RFC 959,
    /// a doubled quote inside the pathname stands for a literal quote.
    pub(super) fn parse_257_path(&self) -> Option<String> {
        let line = match self {
            FtpRawResponse::SingleLine(_, line) => line,
            FtpRawResponse::MultiLine(_, _) => return None,
        };

        let quoted = line.strip_prefix('"')?;
        let mut path = String::with_capacity(quoted.len());
        let mut chars = quoted.chars();
        while let Some(c) = chars.next() {
            if c != '"' {
                path.push(c);
                continue;
            }
            match chars.next() {
                Some('"') => path.push('"'),
                _ => return Some(path),
            }
        }

        None
    }
}

pub(super) struct FtpMultiLineReplyParser {
    code: u16,
    end_prefix: [u8; 4],
    lines: Vec<String>,
}

impl FtpMultiLineReplyParser {
    pub(super) fn feed_line(&mut self, line: &[u8]) -> Result<bool, FtpRawResponseError> {
        if line.starts_with(&self.end_prefix) {
            let msg =
                std::str::from_utf8(&line[4..]).map_err(|_| FtpRawResponseError::LineIsNotUtf8)?;
            self.lines.push(msg.trim_end().to_string());
            Ok(true)
        } else {
            let msg = std::str::from_utf8(line).map_err(|_| FtpRawResponseError::LineIsNotUtf8)?;
            // do not trim whitespace at beginning
            self.lines.push(msg.trim_end().to_string());
            Ok(false)
        }
    }

    pub(super) fn finish(self) -> FtpRawResponse {
        FtpRawResponse::MultiLine(self.code, self.lines)
    }
}

impl<T> FtpControlChannel<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    async fn read_line(
        &mut self,
        buf: &mut Vec<u8>,
        min_len: usize,
    ) -> Result<(), FtpRawResponseError> {
        buf.clear();

        let (found, len) = self
            .stream
            .limited_read_until(b'\n', self.config.max_line_len, buf)
            .await
            .map_err(FtpRawResponseError::ReadFailed)?;
        if len == 0 {
            return Err(FtpRawResponseError::ConnectionClosed);
        }

        #[cfg(feature = "log-raw-io")]
        crate::debug::log_rsp(unsafe { std::str::from_utf8_unchecked(buf).trim_end() });

        if len <= min_len {
            Err(FtpRawResponseError::InvalidLineFormat)
        } else if !found {
            Err(FtpRawResponseError::LineTooLong)
        } else {
            Ok(())
        }
    }

    pub(super) async fn read_raw_response(
        &mut self,
    ) -> Result<FtpRawResponse, FtpRawResponseError> {
        let mut buf = Vec::<u8>::with_capacity(self.config.max_line_len);
        // the first line carries at least <code><sep>\n
        self.read_line(&mut buf, 4).await?;

        match buf[3] {
            b' ' => FtpRawResponse::parse_single_line(&buf),
            b'-' => {
                let mut ml_parser =
                    FtpRawResponse::get_multi_line_parser(&buf, self.config.max_multi_lines)?;
                for _i in 0..self.config.max_multi_lines {
                    self.read_line(&mut buf, 1).await?;
                    let end = ml_parser.feed_line(&buf)?;
                    if end {
                        return Ok(ml_parser.finish());
                    }
                }
                Err(FtpRawResponseError::TooManyLines)
            }
            _ => Err(FtpRawResponseError::InvalidLineFormat),
        }
    }

    pub(super) async fn timed_read_raw_response(
        &mut self,
        stage: &'static str,
    ) -> Result<FtpRawResponse, FtpRawResponseError> {
        match tokio::time::timeout(self.config.command_timeout, self.read_raw_response()).await {
            Ok(r) => r,
            Err(_) => Err(FtpRawResponseError::ReadResponseTimedOut(stage)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line() {
        let rsp = FtpRawResponse::parse_single_line(b"250 Okay\r\n").unwrap();
        assert_eq!(rsp.code(), 250);
        assert_eq!(rsp.line_trimmed(), Some("Okay"));
    }

    #[test]
    fn invalid_code() {
        assert!(FtpRawResponse::parse_single_line(b"099 nope\r\n").is_err());
    }

    #[test]
    fn pasv_reply() {
        let rsp = FtpRawResponse::SingleLine(
            227,
            "Entering Passive Mode (192,0,2,7,19,137).".to_string(),
        );
        let addr = rsp.parse_pasv_227_reply().unwrap();
        assert_eq!(addr.to_string(), "192.0.2.7:5001");
    }

    #[test]
    fn epsv_reply() {
        let rsp =
            FtpRawResponse::SingleLine(229, "Entering Extended Passive Mode (|||6446|)".to_string());
        assert_eq!(rsp.parse_epsv_229_reply(), Some(6446));

        let rsp = FtpRawResponse::SingleLine(229, "Entering Extended Passive Mode".to_string());
        assert!(rsp.parse_epsv_229_reply().is_none());
    }

    #[test]
    fn created_path_reply() {
        let rsp = FtpRawResponse::SingleLine(257, "\"/data/sub\" created".to_string());
        assert_eq!(rsp.parse_257_path().as_deref(), Some("/data/sub"));

        let rsp = FtpRawResponse::SingleLine(257, "\"/odd\"\"name\" created".to_string());
        assert_eq!(rsp.parse_257_path().as_deref(), Some("/odd\"name"));

        let rsp = FtpRawResponse::SingleLine(257, "no quotes here".to_string());
        assert!(rsp.parse_257_path().is_none());
    }
}
