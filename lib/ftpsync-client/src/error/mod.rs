/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

mod command;
pub use command::{FtpCommandError, FtpRawResponseError};

mod connect;
pub(crate) use connect::FtpAuthStatus;
pub use connect::{FtpConnectError, FtpSessionOpenError};

mod transfer;
pub use transfer::{FtpLineDataReadError, FtpTransferServerError, FtpTransferSetupError};

mod file;
pub(crate) use file::FtpFilePreTransferStatus;
pub use file::{
    FtpFileFactsParseError, FtpFileListError, FtpFileRetrieveError, FtpFileRetrieveStartError,
    FtpFileStatError, FtpFileStoreError, FtpFileStoreStartError,
};

mod path;
pub use path::{FtpTreeDeleteError, FtpTreeWalkError};
