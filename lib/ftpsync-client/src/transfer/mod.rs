/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

mod line;
pub use line::FtpLineDataReceiver;
pub(crate) use line::FtpLineDataTransfer;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum FtpTransferType {
    Ascii,
    Image,
}
