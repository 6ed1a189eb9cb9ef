/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::error::Error;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::ServerAddr;

#[async_trait]
pub trait FtpConnectionProvider<T: AsyncRead + AsyncWrite, E: Error, UD> {
    async fn new_control_connection(&mut self, server: &ServerAddr, user_data: &UD)
    -> Result<T, E>;
    async fn new_data_connection(
        &mut self,
        server_addr: &ServerAddr,
        user_data: &UD,
    ) -> Result<T, E>;
}
