/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

use super::file::{
    FtpFileListError, FtpFileRetrieveStartError, FtpFileStatError,
};

/// Errors of the recursive directory walker.
///
/// Listing errors carry the directory path that was being listed when the
/// walk stopped.
#[derive(Debug, Error)]
pub enum FtpTreeWalkError {
    #[error("path check failed: {0}")]
    PathCheckFailed(#[from] FtpFileStatError),
    #[error("failed to start listing of {0}: {1}")]
    ListStartFailed(String, FtpFileRetrieveStartError),
    #[error("failed to list {0}: {1}")]
    ListFailed(String, FtpFileListError),
}

#[derive(Debug, Error)]
pub enum FtpTreeDeleteError {
    #[error("path check failed: {0}")]
    PathCheckFailed(#[from] FtpFileStatError),
    #[error("failed to start listing of {0}: {1}")]
    ListStartFailed(String, FtpFileRetrieveStartError),
    #[error("failed to list {0}: {1}")]
    ListFailed(String, FtpFileListError),
    #[error("failed to delete file {0}: {1}")]
    DeleteFileFailed(String, FtpFileStatError),
    #[error("failed to remove directory {0}: {1}")]
    RemoveDirFailed(String, FtpFileStatError),
}

impl From<FtpTreeWalkError> for FtpTreeDeleteError {
    fn from(e: FtpTreeWalkError) -> Self {
        match e {
            FtpTreeWalkError::PathCheckFailed(e) => FtpTreeDeleteError::PathCheckFailed(e),
            FtpTreeWalkError::ListStartFailed(path, e) => {
                FtpTreeDeleteError::ListStartFailed(path, e)
            }
            FtpTreeWalkError::ListFailed(path, e) => FtpTreeDeleteError::ListFailed(path, e),
        }
    }
}
