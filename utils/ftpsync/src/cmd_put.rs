/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use ftpsync_client::{FtpClient, FtpConnectionProvider};

pub(super) const COMMAND: &str = "put";

const COMMAND_ARG_PATH: &str = "path";
const COMMAND_ARG_INPUT: &str = "input";
const COMMAND_ARG_APPEND: &str = "append";
const COMMAND_ARG_PARENTS: &str = "parents";

pub(super) fn command() -> Command {
    Command::new(COMMAND)
        .about("Upload a file")
        .arg(
            Arg::new(COMMAND_ARG_INPUT)
                .help("local file to read, stdin if not set")
                .num_args(1)
                .value_name("LOCAL FILE")
                .long("input")
                .short('i'),
        )
        .arg(
            Arg::new(COMMAND_ARG_APPEND)
                .help("append to the remote file instead of replacing it")
                .num_args(0)
                .action(ArgAction::SetTrue)
                .long("append")
                .short('a'),
        )
        .arg(
            Arg::new(COMMAND_ARG_PARENTS)
                .help("create missing parent directories first")
                .num_args(0)
                .action(ArgAction::SetTrue)
                .long("parents"),
        )
        .arg(
            Arg::new(COMMAND_ARG_PATH)
                .value_name("FILE PATH")
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

    if args.get_flag(COMMAND_ARG_PARENTS) {
        if let Some((parent, _)) = path.rsplit_once('/') {
            if !parent.is_empty() {
                client.mkdir_recursive(parent).await?;
            }
        }
    }

    let mut data_stream = if args.get_flag(COMMAND_ARG_APPEND) {
        client.append_file_start(path, &()).await?
    } else {
        client.store_file_start(path, &()).await?
    };

    if let Some(local_file) = args.get_one::<String>(COMMAND_ARG_INPUT) {
        let mut file = tokio::fs::File::open(local_file)
            .await
            .context(format!("failed to open local file {local_file}"))?;
        tokio::io::copy(&mut file, &mut data_stream).await?;
    } else {
        let mut stdin = tokio::io::stdin();
        tokio::io::copy(&mut stdin, &mut data_stream).await?;
    }
    data_stream.shutdown().await?;
    drop(data_stream);

    client.wait_store_end().await?;
    Ok(())
}
