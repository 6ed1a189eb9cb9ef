/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use clap::{Arg, ArgMatches, Command};
use tokio::io::{AsyncRead, AsyncWrite};

use ftpsync_client::{FtpClient, FtpConnectionProvider};

pub(super) const COMMAND: &str = "mkdir";

const COMMAND_ARG_PATH: &str = "path";

pub(super) fn command() -> Command {
    Command::new(COMMAND)
        .about("Create a directory and its missing parents")
        .arg(
            Arg::new(COMMAND_ARG_PATH)
                .value_name("PATH")
                .num_args(1)
                .required(true),
        )
}

pub(super) async fn run<CP, S, E, UD>(
    client: &mut FtpClient<CP, S, E, UD>,
    args: &ArgMatches,
) -> anyhow::Result<()>
where
    CP: FtpConnectionProvider<S, E, UD>,
    S: AsyncRead + AsyncWrite + Unpin,
    E: std::error::Error,
{
    let path = args.get_one::<String>(COMMAND_ARG_PATH).unwrap();

    client.mkdir_recursive(path).await?;
    Ok(())
}
