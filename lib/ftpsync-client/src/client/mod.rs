/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::marker::PhantomData;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::addr::ServerAddr;
use crate::auth::{Password, Username};
use crate::config::{FtpClientConfig, FtpConnectMode, FtpReadMode};
use crate::connection::FtpConnectionProvider;
use crate::control::FtpControlChannel;
use crate::error::{
    FtpAuthStatus, FtpCommandError, FtpConnectError, FtpFileStatError, FtpSessionOpenError,
    FtpTransferSetupError,
};
use crate::feature::FtpServerFeature;
use crate::transfer::FtpTransferType;

mod stat;
pub use stat::FtpPathKind;

mod walk;
pub use walk::SIZE_SUFFIX_SEPARATOR;

mod tree;

mod transfer;

pub struct FtpClient<CP, S, E, UD>
where
    CP: FtpConnectionProvider<S, E, UD>,
    S: AsyncRead + AsyncWrite + Unpin,
    E: std::error::Error,
{
    connection_provider: CP,
    control: FtpControlChannel<S>,
    server: ServerAddr,
    config: Arc<FtpClientConfig>,
    feature: FtpServerFeature,
    with_size: bool,
    transfer_type: Option<FtpTransferType>,
    _ud: PhantomData<(UD, E)>,
}

impl<CP, S, E, UD> FtpClient<CP, S, E, UD>
where
    CP: FtpConnectionProvider<S, E, UD>,
    S: AsyncRead + AsyncWrite + Unpin,
    E: std::error::Error,
{
    /// Open the control connection and negotiate with the server.
    ///
    /// The connection provider is handed back on failure, so the caller can
    /// retry with another server.
    pub async fn connect_to(
        server: ServerAddr,
        mut connection_provider: CP,
        user_data: &UD,
        config: &Arc<FtpClientConfig>,
    ) -> Result<Self, (FtpConnectError<E>, CP)> {
        let stream = match tokio::time::timeout(
            config.connect_timeout,
            connection_provider.new_control_connection(&server, user_data),
        )
        .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err((FtpConnectError::ConnectIoError(e), connection_provider)),
            Err(_) => return Err((FtpConnectError::ConnectTimedOut, connection_provider)),
        };

        let mut control = FtpControlChannel::new(stream, config.control.clone());
        match tokio::time::timeout(config.greeting_timeout, control.wait_greetings()).await {
            Ok(Ok(_)) => {}
            Ok(Err(FtpCommandError::ServiceNotAvailable)) => {
                return Err((FtpConnectError::ServiceNotAvailable, connection_provider));
            }
            Ok(Err(e)) => return Err((FtpConnectError::GreetingFailed(e), connection_provider)),
            Err(_) => return Err((FtpConnectError::GreetingTimedOut, connection_provider)),
        }

        let feature = match control.check_server_feature().await {
            Ok(feature) => feature,
            Err(e) => return Err((FtpConnectError::NegotiationFailed(e), connection_provider)),
        };
        if feature.supports_utf8() {
            if let Err(e) = control.set_use_utf8().await {
                return Err((FtpConnectError::NegotiationFailed(e), connection_provider));
            }
        }

        Ok(FtpClient {
            connection_provider,
            control,
            server,
            config: Arc::clone(config),
            feature,
            with_size: matches!(config.read_mode, FtpReadMode::Continuous),
            transfer_type: None,
            _ud: PhantomData,
        })
    }

    pub async fn new_user_session(
        &mut self,
        username: Option<&Username>,
        password: Option<&Password>,
    ) -> Result<(), FtpSessionOpenError> {
        match self.control.send_username(username).await? {
            FtpAuthStatus::LoggedIn => Ok(()),
            FtpAuthStatus::NotLoggedIn => Err(FtpSessionOpenError::NotLoggedIn),
            FtpAuthStatus::NeedAccount => Err(FtpSessionOpenError::AccountIsNeeded),
            FtpAuthStatus::NeedPassword => match self.control.send_password(password).await? {
                FtpAuthStatus::LoggedIn => Ok(()),
                FtpAuthStatus::NotLoggedIn => Err(FtpSessionOpenError::NotLoggedIn),
                FtpAuthStatus::NeedAccount => Err(FtpSessionOpenError::AccountIsNeeded),
                FtpAuthStatus::NeedPassword => Err(FtpSessionOpenError::NotLoggedIn),
            },
        }
    }

    pub async fn quit_and_close(mut self) {
        let _ = self.control.send_quit().await;
    }

    #[inline]
    pub fn server_feature(&self) -> &FtpServerFeature {
        &self.feature
    }

    pub async fn rename(&mut self, from: &str, to: &str) -> Result<(), FtpFileStatError> {
        self.control.rename(from, to).await
    }

    async fn ensure_transfer_type(&mut self, t: FtpTransferType) -> Result<(), FtpCommandError> {
        if self.transfer_type != Some(t) {
            self.control.request_transfer_type(t).await?;
            self.transfer_type = Some(t);
        }
        Ok(())
    }

    async fn setup_data_stream(&mut self, user_data: &UD) -> Result<S, FtpTransferSetupError> {
        match self.config.connect_mode {
            FtpConnectMode::Active => Err(FtpTransferSetupError::ActiveTransferNotSupported),
            FtpConnectMode::Passive => {
                let data_addr =
                    if self.feature.supports_epsv() || self.config.always_try_epsv {
                        let port = self.control.request_epsv_port().await?;
                        self.server.with_port(port)
                    } else {
                        let addr = self.control.request_pasv_port().await?;
                        ServerAddr::from(addr)
                    };
                self.connection_provider
                    .new_data_connection(&data_addr, user_data)
                    .await
                    .map_err(|e| FtpTransferSetupError::DataConnectFailed(e.to_string()))
            }
        }
    }
}
