/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use tokio::io::{AsyncRead, AsyncWrite};

use super::FtpClient;
use crate::connection::FtpConnectionProvider;
use crate::control::FtpCommand;
use crate::error::{
    FtpCommandError, FtpFileListError, FtpFilePreTransferStatus, FtpFileRetrieveError,
    FtpFileRetrieveStartError, FtpFileStoreError, FtpFileStoreStartError,
};
use crate::transfer::{FtpLineDataReceiver, FtpLineDataTransfer, FtpTransferType};

impl<CP, S, E, UD> FtpClient<CP, S, E, UD>
where
    CP: FtpConnectionProvider<S, E, UD>,
    S: AsyncRead + AsyncWrite + Unpin,
    E: std::error::Error,
{
    /// Start a raw LIST transfer and return the data stream.
    pub async fn list_directory_start(
        &mut self,
        path: &str,
        user_data: &UD,
    ) -> Result<S, FtpFileRetrieveStartError> {
        self.ensure_transfer_type(FtpTransferType::Ascii).await?;
        if self.feature.supports_pret() {
            match self.control.pre_list(path).await? {
                FtpFilePreTransferStatus::Proceed => {}
                FtpFilePreTransferStatus::Invalid => {
                    return Err(FtpFileRetrieveStartError::FileUnavailable);
                }
            }
        }
        let data_stream = self.setup_data_stream(user_data).await?;
        self.control.start_list(path).await?;
        Ok(data_stream)
    }

    /// Start a MLSD transfer and return the data stream.
    pub async fn machine_list_start(
        &mut self,
        path: &str,
        user_data: &UD,
    ) -> Result<S, FtpFileRetrieveStartError> {
        if !self.feature.supports_machine_list() {
            return Err(FtpCommandError::CommandNotImplemented(FtpCommand::MLSD).into());
        }

        self.ensure_transfer_type(FtpTransferType::Ascii).await?;
        if self.feature.supports_pret() {
            match self.control.pre_machine_list(path).await? {
                FtpFilePreTransferStatus::Proceed => {}
                FtpFilePreTransferStatus::Invalid => {
                    return Err(FtpFileRetrieveStartError::FileUnavailable);
                }
            }
        }
        let data_stream = self.setup_data_stream(user_data).await?;
        self.control.start_machine_list(path).await?;
        Ok(data_stream)
    }

    /// Drain the listing data stream into the receiver line by line, then
    /// wait for the end reply on the control channel.
    pub async fn list_directory_receive<R>(
        &mut self,
        data_stream: S,
        receiver: &mut R,
    ) -> Result<(), FtpFileListError>
    where
        R: FtpLineDataReceiver + Send,
    {
        let data_transfer = FtpLineDataTransfer::new(data_stream, &self.config.transfer);
        match tokio::time::timeout(
            self.config.transfer.list_all_timeout,
            data_transfer.read_to_end(receiver),
        )
        .await
        {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => return Err(FtpFileListError::TimeoutToWaitAllData),
        }

        match tokio::time::timeout(
            self.config.transfer.end_wait_timeout,
            self.control.wait_list(),
        )
        .await
        {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(FtpFileListError::TimeoutToWaitEndReply),
        }
    }

    pub async fn retrieve_file_start(
        &mut self,
        path: &str,
        user_data: &UD,
    ) -> Result<S, FtpFileRetrieveStartError> {
        self.ensure_transfer_type(FtpTransferType::Image).await?;
        if self.feature.supports_pret() {
            match self.control.pre_retrieve(path).await? {
                FtpFilePreTransferStatus::Proceed => {}
                FtpFilePreTransferStatus::Invalid => {
                    return Err(FtpFileRetrieveStartError::FileUnavailable);
                }
            }
        }
        let data_stream = self.setup_data_stream(user_data).await?;
        self.control.start_retrieve(path).await?;
        Ok(data_stream)
    }

    pub async fn wait_retrieve_end(&mut self) -> Result<(), FtpFileRetrieveError> {
        match tokio::time::timeout(
            self.config.transfer.end_wait_timeout,
            self.control.wait_retrieve(),
        )
        .await
        {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(FtpFileRetrieveError::TimeoutToWaitEndReply),
        }
    }

    pub async fn store_file_start(
        &mut self,
        path: &str,
        user_data: &UD,
    ) -> Result<S, FtpFileStoreStartError> {
        self.ensure_transfer_type(FtpTransferType::Image).await?;
        if self.feature.supports_pret() {
            match self.control.pre_store(path).await? {
                FtpFilePreTransferStatus::Proceed => {}
                FtpFilePreTransferStatus::Invalid => {
                    return Err(FtpFileStoreStartError::FileUnavailable);
                }
            }
        }
        let data_stream = self.setup_data_stream(user_data).await?;
        self.control.start_store(path).await?;
        Ok(data_stream)
    }

    /// Start an APPE transfer for the given absolute file path.
    ///
    /// The working directory is moved to the parent directory first and the
    /// append is issued with the bare file name, which also works on servers
    /// that reject absolute paths in APPE.
    pub async fn append_file_start(
        &mut self,
        path: &str,
        user_data: &UD,
    ) -> Result<S, FtpFileStoreStartError> {
        self.ensure_transfer_type(FtpTransferType::Image).await?;

        let file_name = match path.rsplit_once('/') {
            Some((parent, name)) => {
                let parent = if parent.is_empty() { "/" } else { parent };
                // a false probe result is left to the APPE reply to report
                self.control.change_directory(parent).await?;
                name
            }
            None => path,
        };

        let data_stream = self.setup_data_stream(user_data).await?;
        self.control.start_append(file_name).await?;
        Ok(data_stream)
    }

    pub async fn wait_store_end(&mut self) -> Result<(), FtpFileStoreError> {
        match tokio::time::timeout(
            self.config.transfer.end_wait_timeout,
            self.control.wait_store(),
        )
        .await
        {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(FtpFileStoreError::TimeoutToWaitEndReply),
        }
    }
}
