/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use tokio::io::{AsyncRead, AsyncWrite};

use super::FtpClient;
use crate::connection::FtpConnectionProvider;
use crate::error::FtpFileStatError;
use crate::facts::FtpFileFacts;

/// What a remote path turned out to be.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FtpPathKind {
    Directory,
    File,
    Absent,
}

impl<CP, S, E, UD> FtpClient<CP, S, E, UD>
where
    CP: FtpConnectionProvider<S, E, UD>,
    S: AsyncRead + AsyncWrite + Unpin,
    E: std::error::Error,
{
    /// Classify a remote path as directory, file or absent.
    ///
    /// The check probes with CWD, so the working directory is saved first
    /// and restored afterwards whatever the probe found.
    pub async fn check_path(&mut self, path: &str) -> Result<FtpPathKind, FtpFileStatError> {
        let origin = self.control.print_working_directory().await?;
        let r = self.check_path_probe(path).await;
        self.restore_working_dir(&origin).await;
        r
    }

    /// Whether the path exists at all, as file or directory. A path the
    /// user may not access looks just like an absent one.
    pub async fn path_exists(&mut self, path: &str) -> Result<bool, FtpFileStatError> {
        Ok(self.check_path(path).await? != FtpPathKind::Absent)
    }

    async fn check_path_probe(&mut self, path: &str) -> Result<FtpPathKind, FtpFileStatError> {
        if self.control.change_directory(path).await? {
            return Ok(FtpPathKind::Directory);
        }

        match self.fetch_file_facts(path).await {
            Ok(ff) => {
                if ff.maybe_file() {
                    Ok(FtpPathKind::File)
                } else {
                    Ok(FtpPathKind::Directory)
                }
            }
            Err(FtpFileStatError::FileUnavailable) => Ok(FtpPathKind::Absent),
            Err(e) => Err(e),
        }
    }

    /// Fetch the facts of a single path, through MLST if the server
    /// supports it, falling back to SIZE and MDTM.
    pub async fn fetch_file_facts(&mut self, path: &str) -> Result<FtpFileFacts, FtpFileStatError> {
        if self.feature.supports_mlst() {
            return match self.control.request_mlst(path).await? {
                Some(ff) => Ok(ff),
                None => Err(FtpFileStatError::FileUnavailable),
            };
        }

        if !self.feature.supports_size() && !self.feature.supports_mdtm() {
            return Err(FtpFileStatError::FeatUnavailable);
        }

        let mut ff = FtpFileFacts::new(path);
        let mut found = false;
        if self.feature.supports_size() {
            if let Some(size) = self.control.request_size(path).await? {
                ff.set_size(size);
                found = true;
            }
        }
        if self.feature.supports_mdtm() {
            if let Some(mtime) = self.control.request_mtime(path).await? {
                ff.set_mtime(mtime);
                found = true;
            }
        }
        if found {
            Ok(ff)
        } else {
            Err(FtpFileStatError::FileUnavailable)
        }
    }

    /// Go back to a previously recorded working directory. Failure to do so
    /// leaves the session usable for absolute paths, so it is only logged.
    pub(super) async fn restore_working_dir(&mut self, origin: &str) {
        match self.control.change_directory(origin).await {
            Ok(true) => {}
            Ok(false) => log::warn!("previous working directory {origin} is gone"),
            Err(e) => log::warn!("failed to restore working directory {origin}: {e}"),
        }
    }
}
