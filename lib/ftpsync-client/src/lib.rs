/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

mod debug;
pub use debug::{FTP_DEBUG_LOG_LEVEL, FTP_DEBUG_LOG_TARGET};

mod addr;
pub use addr::ServerAddr;

mod auth;
pub use auth::{Password, Username};

mod config;
pub use config::{
    FtpClientConfig, FtpConnectMode, FtpControlConfig, FtpReadMode, FtpTransferConfig,
};

mod connection;
pub use connection::FtpConnectionProvider;

pub mod error;

mod io_ext;

mod control;
pub use control::FtpCommand;

mod feature;
pub use feature::FtpServerFeature;

mod facts;
pub use facts::{FtpFileEntryType, FtpFileFacts};

mod transfer;
pub use transfer::FtpLineDataReceiver;

mod client;
pub use client::{FtpClient, FtpPathKind, SIZE_SUFFIX_SEPARATOR};
