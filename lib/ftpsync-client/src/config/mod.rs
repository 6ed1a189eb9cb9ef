/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;
use std::time::Duration;

const DEFAULT_CONTROL_MAX_LINE_LENGTH: usize = 2048;
const DEFAULT_CONTROL_MAX_MULTI_LINES: usize = 128;
const DEFAULT_LIST_MAX_LINE_LENGTH: usize = 2048;
const DEFAULT_LIST_MAX_ENTRIES: usize = 4096;

/// How the data connection gets established.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FtpConnectMode {
    #[default]
    Passive,
    Active,
}

impl FromStr for FtpConnectMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pasv" | "passive" => Ok(FtpConnectMode::Passive),
            "port" | "active" => Ok(FtpConnectMode::Active),
            _ => Err(()),
        }
    }
}

/// Whether remote files are fetched once or followed continuously.
///
/// In continuous mode the walker annotates each file path with its current
/// size, so the caller can resume reading from the recorded offset.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FtpReadMode {
    #[default]
    Once,
    Continuous,
}

impl FromStr for FtpReadMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "once" => Ok(FtpReadMode::Once),
            "continuous" => Ok(FtpReadMode::Continuous),
            _ => Err(()),
        }
    }
}

#[derive(Clone)]
pub struct FtpControlConfig {
    pub max_line_len: usize,
    pub max_multi_lines: usize,
    pub command_timeout: Duration,
}

impl Default for FtpControlConfig {
    fn default() -> Self {
        FtpControlConfig {
            max_line_len: DEFAULT_CONTROL_MAX_LINE_LENGTH,
            max_multi_lines: DEFAULT_CONTROL_MAX_MULTI_LINES,
            command_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Clone)]
pub struct FtpTransferConfig {
    pub list_max_line_len: usize,
    pub list_max_entries: usize,
    pub list_all_timeout: Duration,
    pub end_wait_timeout: Duration,
}

impl Default for FtpTransferConfig {
    fn default() -> Self {
        FtpTransferConfig {
            list_max_line_len: DEFAULT_LIST_MAX_LINE_LENGTH,
            list_max_entries: DEFAULT_LIST_MAX_ENTRIES,
            list_all_timeout: Duration::from_secs(120),
            end_wait_timeout: Duration::from_secs(10),
        }
    }
}

impl FtpTransferConfig {
    pub fn set_list_all_timeout(&mut self, timeout: Duration) {
        self.list_all_timeout = timeout;
    }
}

#[derive(Clone)]
pub struct FtpClientConfig {
    pub control: FtpControlConfig,
    pub transfer: FtpTransferConfig,
    pub connect_mode: FtpConnectMode,
    pub read_mode: FtpReadMode,
    pub connect_timeout: Duration,
    pub greeting_timeout: Duration,
    pub always_try_epsv: bool,
}

impl Default for FtpClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FtpClientConfig {
    pub fn new() -> Self {
        FtpClientConfig {
            control: FtpControlConfig::default(),
            transfer: FtpTransferConfig::default(),
            connect_mode: FtpConnectMode::default(),
            read_mode: FtpReadMode::default(),
            connect_timeout: Duration::from_secs(10),
            greeting_timeout: Duration::from_secs(10),
            always_try_epsv: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_connect_mode() {
        assert_eq!(
            FtpConnectMode::from_str("PASV").unwrap(),
            FtpConnectMode::Passive
        );
        assert_eq!(
            FtpConnectMode::from_str("active").unwrap(),
            FtpConnectMode::Active
        );
        assert!(FtpConnectMode::from_str("both").is_err());
    }

    #[test]
    fn parse_read_mode() {
        assert_eq!(FtpReadMode::from_str("once").unwrap(), FtpReadMode::Once);
        assert_eq!(
            FtpReadMode::from_str("Continuous").unwrap(),
            FtpReadMode::Continuous
        );
        assert!(FtpReadMode::from_str("twice").is_err());
    }
}
