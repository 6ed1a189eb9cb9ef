/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use clap::{Arg, ArgMatches, Command};
use tokio::io::{AsyncRead, AsyncWrite};

use ftpsync_client::{FtpClient, FtpConnectionProvider};

pub(super) const COMMAND: &str = "move";

const COMMAND_ARG_FROM: &str = "from";
const COMMAND_ARG_TO: &str = "to";

pub(super) fn command() -> Command {
    Command::new(COMMAND)
        .about("Rename a remote path")
        .arg(
            Arg::new(COMMAND_ARG_FROM)
                .value_name("FROM PATH")
                .num_args(1)
                .required(true),
        )
        .arg(
            Arg::new(COMMAND_ARG_TO)
                .value_name("TO PATH")
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
    let from = args.get_one::<String>(COMMAND_ARG_FROM).unwrap();
    let to = args.get_one::<String>(COMMAND_ARG_TO).unwrap();

    client.rename(from, to).await?;
    Ok(())
}
