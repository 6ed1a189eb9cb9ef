/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use clap::{Arg, ArgAction, ArgMatches, Command};
use tokio::io::{AsyncRead, AsyncWrite};

use ftpsync_client::{FtpClient, FtpConnectionProvider};

pub(super) const COMMAND: &str = "del";

const COMMAND_ARG_PATH: &str = "path";
const COMMAND_ARG_KEEP: &str = "keep";

pub(super) fn command() -> Command {
    Command::new(COMMAND)
        .about("Delete a path recursively")
        .arg(
            Arg::new(COMMAND_ARG_KEEP)
                .help("entry name to keep, may be set multiple times")
                .num_args(1)
                .value_name("NAME")
                .action(ArgAction::Append)
                .long("keep")
                .short('k'),
        )
        .arg(
            Arg::new(COMMAND_ARG_PATH)
                .value_name("PATH")
                .num_args(1)
                .required(true),
        )
}

pub(super) async fn run<CP, S, E>(
    client: &mut FtpClient<CP, S, E, ()>,
    args: &ArgMatches,
) -> anyhow::Result<()>
where
    CP: FtpConnectionProvider<S, E, ()>,
    S: AsyncRead + AsyncWrite + Unpin,
    E: std::error::Error,
{
    let path = args.get_one::<String>(COMMAND_ARG_PATH).unwrap();
    let keep: Vec<String> = args
        .get_many::<String>(COMMAND_ARG_KEEP)
        .map(|v| v.cloned().collect())
        .unwrap_or_default();

    client.delete_tree(path, &keep, &()).await?;
    Ok(())
}
