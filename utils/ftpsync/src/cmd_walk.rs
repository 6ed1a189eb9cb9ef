/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use clap::{Arg, ArgAction, ArgMatches, Command};
use tokio::io::{AsyncRead, AsyncWrite};

use ftpsync_client::{FtpClient, FtpConnectionProvider};

pub(super) const COMMAND: &str = "walk";

const COMMAND_ARG_PATH: &str = "path";
const COMMAND_ARG_DIRS: &str = "dirs";
const COMMAND_ARG_SIZE: &str = "size";

pub(super) fn with_size(args: &ArgMatches) -> bool {
    args.get_flag(COMMAND_ARG_SIZE)
}

pub(super) fn command() -> Command {
    Command::new(COMMAND)
        .about("Walk the remote tree and print all file paths")
        .arg(
            Arg::new(COMMAND_ARG_DIRS)
                .help("print only the immediate child paths")
                .num_args(0)
                .action(ArgAction::SetTrue)
                .long("dirs"),
        )
        .arg(
            Arg::new(COMMAND_ARG_SIZE)
                .help("append the file size to each path")
                .num_args(0)
                .action(ArgAction::SetTrue)
                .long("size"),
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

    let paths = if args.get_flag(COMMAND_ARG_DIRS) {
        client.list_dir_paths(path, &()).await?
    } else {
        client.list_files(path, &()).await?
    };
    for p in paths {
        println!("{p}");
    }
    Ok(())
}
