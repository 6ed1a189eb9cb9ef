/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use ftpsync_client::{FtpClient, FtpConnectionProvider};

pub(super) const COMMAND: &str = "get";

const COMMAND_ARG_PATH: &str = "path";
const COMMAND_ARG_OUTPUT: &str = "output";

pub(super) fn command() -> Command {
    Command::new(COMMAND)
        .about("Download a file")
        .arg(
            Arg::new(COMMAND_ARG_OUTPUT)
                .help("local file to write, stdout if not set")
                .num_args(1)
                .value_name("LOCAL FILE")
                .long("output")
                .short('o'),
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

    let mut data_stream = client.retrieve_file_start(path, &()).await?;

    if let Some(local_file) = args.get_one::<String>(COMMAND_ARG_OUTPUT) {
        let mut file = tokio::fs::File::create(local_file)
            .await
            .context(format!("failed to create local file {local_file}"))?;
        tokio::io::copy(&mut data_stream, &mut file).await?;
        file.flush().await?;
    } else {
        let mut stdout = tokio::io::stdout();
        tokio::io::copy(&mut data_stream, &mut stdout).await?;
        stdout.flush().await?;
    }
    drop(data_stream);

    client.wait_retrieve_end().await?;
    Ok(())
}
