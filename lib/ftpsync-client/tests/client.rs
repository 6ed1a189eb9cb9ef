/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::VecDeque;
use std::io;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_test::io::{Builder, Mock};

use ftpsync_client::{
    FtpClient, FtpClientConfig, FtpConnectionProvider, FtpPathKind, FtpReadMode, ServerAddr,
};

struct MockConnectionProvider {
    control: Option<Mock>,
    data: VecDeque<Mock>,
}

impl MockConnectionProvider {
    fn new(control: Mock, data: Vec<Mock>) -> Self {
        MockConnectionProvider {
            control: Some(control),
            data: data.into(),
        }
    }
}

#[async_trait]
impl FtpConnectionProvider<Mock, io::Error, ()> for MockConnectionProvider {
    async fn new_control_connection(
        &mut self,
        _server: &ServerAddr,
        _user_data: &(),
    ) -> Result<Mock, io::Error> {
        self.control
            .take()
            .ok_or_else(|| io::Error::other("control stream already taken"))
    }

    async fn new_data_connection(
        &mut self,
        _server_addr: &ServerAddr,
        _user_data: &(),
    ) -> Result<Mock, io::Error> {
        self.data
            .pop_front()
            .ok_or_else(|| io::Error::other("no more data streams"))
    }
}

fn session_prologue(builder: &mut Builder) {
    builder
        .read(b"220 (vsFTPd 3.0.5)\r\n")
        .write(b"FEAT\r\n")
        .read(
            b"211-Features:\r\n MLST type*;size*;modify*;\r\n UTF8\r\n SIZE\r\n MDTM\r\n EPSV\r\n211 End\r\n",
        )
        .write(b"OPTS UTF8 ON\r\n")
        .read(b"200 Always in UTF8 mode.\r\n")
        .write(b"USER anonymous\r\n")
        .read(b"331 Please specify the password.\r\n")
        .write(b"PASS xxx\r\n")
        .read(b"230 Login successful.\r\n");
}

async fn connect(
    control: Mock,
    data: Vec<Mock>,
    config: FtpClientConfig,
) -> FtpClient<MockConnectionProvider, Mock, io::Error, ()> {
    let server = ServerAddr::from_str("127.0.0.1:21").unwrap();
    let provider = MockConnectionProvider::new(control, data);
    let config = Arc::new(config);
    let mut client = match FtpClient::connect_to(server, provider, &(), &config).await {
        Ok(client) => client,
        Err((e, _)) => panic!("connect failed: {e}"),
    };
    client.new_user_session(None, None).await.unwrap();
    client
}

#[tokio::test]
async fn feat_reply_with_blank_line() {
    let control = Builder::new()
        .read(b"220 (vsFTPd 3.0.5)\r\n")
        .write(b"FEAT\r\n")
        .read(b"211-Features:\r\n UTF8\r\n\r\n MLST type*;size*;modify*;\r\n211 End\r\n")
        .write(b"OPTS UTF8 ON\r\n")
        .read(b"200 Always in UTF8 mode.\r\n")
        .write(b"USER anonymous\r\n")
        .read(b"331 Please specify the password.\r\n")
        .write(b"PASS xxx\r\n")
        .read(b"230 Login successful.\r\n")
        .build();

    let client = connect(control, Vec::new(), FtpClientConfig::new()).await;

    // feature scan stops at the blank continuation line
    assert!(client.server_feature().supports_utf8());
    assert!(!client.server_feature().supports_mlst());
}

#[tokio::test]
async fn walk_tree_with_sizes() {
    let mut builder = Builder::new();
    session_prologue(&mut builder);
    let control = builder
        .write(b"PWD\r\n")
        .read(b"257 \"/\" is the current directory\r\n")
        .write(b"CWD /data\r\n")
        .read(b"250 Directory successfully changed.\r\n")
        .write(b"CWD /\r\n")
        .read(b"250 Directory successfully changed.\r\n")
        .write(b"TYPE A\r\n")
        .read(b"200 Switching to ASCII mode.\r\n")
        .write(b"EPSV\r\n")
        .read(b"229 Entering Extended Passive Mode (|||2121|)\r\n")
        .write(b"MLSD /data/\r\n")
        .read(b"150 Here comes the directory listing.\r\n")
        .read(b"226 Directory send OK.\r\n")
        .write(b"EPSV\r\n")
        .read(b"229 Entering Extended Passive Mode (|||2122|)\r\n")
        .write(b"MLSD /data/sub/\r\n")
        .read(b"150 Here comes the directory listing.\r\n")
        .read(b"226 Directory send OK.\r\n")
        .build();

    // entries are scripted out of mtime order on purpose
    let data1 = Builder::new()
        .read(b"type=file;size=50;modify=20250102120000; f2.txt\r\n")
        .read(b"type=cdir;modify=20250101000000; /data\r\n")
        .read(b"type=pdir;modify=20250101000000; /\r\n")
        .read(b"type=dir;modify=20250103120000; sub\r\n")
        .read(b"type=file;size=100;modify=20250101120000; f1.txt\r\n")
        .build();
    let data2 = Builder::new()
        .read(b"type=file;size=10;modify=20250104120000; f3.txt\r\n")
        .build();

    let mut config = FtpClientConfig::new();
    config.read_mode = FtpReadMode::Continuous;
    let mut client = connect(control, vec![data1, data2], config).await;

    let files = client.list_files("/data", &()).await.unwrap();
    assert_eq!(
        files,
        vec![
            "/data/f1.txt#100".to_string(),
            "/data/f2.txt#50".to_string(),
            "/data/sub/f3.txt#10".to_string(),
        ]
    );
}

#[tokio::test]
async fn walk_tree_without_sizes() {
    let mut builder = Builder::new();
    session_prologue(&mut builder);
    let control = builder
        .write(b"PWD\r\n")
        .read(b"257 \"/\" is the current directory\r\n")
        .write(b"CWD /data\r\n")
        .read(b"250 Directory successfully changed.\r\n")
        .write(b"CWD /\r\n")
        .read(b"250 Directory successfully changed.\r\n")
        .write(b"TYPE A\r\n")
        .read(b"200 Switching to ASCII mode.\r\n")
        .write(b"EPSV\r\n")
        .read(b"229 Entering Extended Passive Mode (|||2121|)\r\n")
        .write(b"MLSD /data/\r\n")
        .read(b"150 Here comes the directory listing.\r\n")
        .read(b"226 Directory send OK.\r\n")
        .write(b"EPSV\r\n")
        .read(b"229 Entering Extended Passive Mode (|||2122|)\r\n")
        .write(b"MLSD /data/sub/\r\n")
        .read(b"150 Here comes the directory listing.\r\n")
        .read(b"226 Directory send OK.\r\n")
        .build();

    let data1 = Builder::new()
        .read(b"type=file;size=50;modify=20250102120000; f2.txt\r\n")
        .read(b"type=dir;modify=20250103120000; sub\r\n")
        .read(b"type=file;size=100;modify=20250101120000; f1.txt\r\n")
        .build();
    let data2 = Builder::new()
        .read(b"type=file;size=10;modify=20250104120000; f3.txt\r\n")
        .build();

    let mut client = connect(control, vec![data1, data2], FtpClientConfig::new()).await;

    let files = client.list_files("/data", &()).await.unwrap();
    assert_eq!(
        files,
        vec![
            "/data/f1.txt".to_string(),
            "/data/f2.txt".to_string(),
            "/data/sub/f3.txt".to_string(),
        ]
    );
}

#[tokio::test]
async fn walk_single_file() {
    let mut builder = Builder::new();
    session_prologue(&mut builder);
    let control = builder
        .write(b"PWD\r\n")
        .read(b"257 \"/\" is the current directory\r\n")
        .write(b"CWD /data/f1.txt\r\n")
        .read(b"550 Failed to change directory.\r\n")
        .write(b"MLST /data/f1.txt\r\n")
        .read(b"250-Listing /data/f1.txt\r\n type=file;size=100;modify=20250101120000; /data/f1.txt\r\n250 End\r\n")
        .write(b"CWD /\r\n")
        .read(b"250 Directory successfully changed.\r\n")
        .write(b"MLST /data/f1.txt\r\n")
        .read(b"250-Listing /data/f1.txt\r\n type=file;size=100;modify=20250101120000; /data/f1.txt\r\n250 End\r\n")
        .build();

    let mut config = FtpClientConfig::new();
    config.read_mode = FtpReadMode::Continuous;
    let mut client = connect(control, Vec::new(), config).await;

    let files = client.list_files("/data/f1.txt", &()).await.unwrap();
    assert_eq!(files, vec!["/data/f1.txt#100".to_string()]);
}

#[tokio::test]
async fn walk_absent_path() {
    let mut builder = Builder::new();
    session_prologue(&mut builder);
    let control = builder
        .write(b"PWD\r\n")
        .read(b"257 \"/\" is the current directory\r\n")
        .write(b"CWD /gone\r\n")
        .read(b"550 Failed to change directory.\r\n")
        .write(b"MLST /gone\r\n")
        .read(b"550 No such file or directory.\r\n")
        .write(b"CWD /\r\n")
        .read(b"250 Directory successfully changed.\r\n")
        .build();

    let mut client = connect(control, Vec::new(), FtpClientConfig::new()).await;

    assert_eq!(
        client.check_path("/gone").await.unwrap(),
        FtpPathKind::Absent
    );
}

#[tokio::test]
async fn list_dir_paths_children() {
    let mut builder = Builder::new();
    session_prologue(&mut builder);
    let control = builder
        .write(b"PWD\r\n")
        .read(b"257 \"/\" is the current directory\r\n")
        .write(b"CWD /data\r\n")
        .read(b"250 Directory successfully changed.\r\n")
        .write(b"CWD /\r\n")
        .read(b"250 Directory successfully changed.\r\n")
        .write(b"TYPE A\r\n")
        .read(b"200 Switching to ASCII mode.\r\n")
        .write(b"EPSV\r\n")
        .read(b"229 Entering Extended Passive Mode (|||2121|)\r\n")
        .write(b"MLSD /data/\r\n")
        .read(b"150 Here comes the directory listing.\r\n")
        .read(b"226 Directory send OK.\r\n")
        .build();

    let data1 = Builder::new()
        .read(b"type=file;size=100;modify=20250101120000; f1.txt\r\n")
        .read(b"type=dir;modify=20250103120000; sub\r\n")
        .build();

    let mut client = connect(control, vec![data1], FtpClientConfig::new()).await;

    // directory children come back as plain paths, usable as command targets
    let paths = client.list_dir_paths("/data", &()).await.unwrap();
    assert_eq!(
        paths,
        vec!["/data/f1.txt".to_string(), "/data/sub".to_string()]
    );
}

#[tokio::test]
async fn list_dir_paths_of_absent_path() {
    let mut builder = Builder::new();
    session_prologue(&mut builder);
    let control = builder
        .write(b"PWD\r\n")
        .read(b"257 \"/\" is the current directory\r\n")
        .write(b"CWD /gone\r\n")
        .read(b"550 Failed to change directory.\r\n")
        .write(b"MLST /gone\r\n")
        .read(b"550 No such file or directory.\r\n")
        .write(b"CWD /\r\n")
        .read(b"250 Directory successfully changed.\r\n")
        .build();

    let mut client = connect(control, Vec::new(), FtpClientConfig::new()).await;

    let paths = client.list_dir_paths("/gone", &()).await.unwrap();
    assert!(paths.is_empty());
}

#[tokio::test]
async fn delete_tree_all() {
    let mut builder = Builder::new();
    session_prologue(&mut builder);
    let control = builder
        .write(b"PWD\r\n")
        .read(b"257 \"/\" is the current directory\r\n")
        .write(b"CWD /data\r\n")
        .read(b"250 Directory successfully changed.\r\n")
        .write(b"CWD /\r\n")
        .read(b"250 Directory successfully changed.\r\n")
        .write(b"TYPE A\r\n")
        .read(b"200 Switching to ASCII mode.\r\n")
        .write(b"EPSV\r\n")
        .read(b"229 Entering Extended Passive Mode (|||2121|)\r\n")
        .write(b"MLSD /data/\r\n")
        .read(b"150 Here comes the directory listing.\r\n")
        .read(b"226 Directory send OK.\r\n")
        .write(b"DELE /data/f1.txt\r\n")
        .read(b"250 Delete operation successful.\r\n")
        .write(b"DELE /data/f2.txt\r\n")
        .read(b"250 Delete operation successful.\r\n")
        .write(b"EPSV\r\n")
        .read(b"229 Entering Extended Passive Mode (|||2122|)\r\n")
        .write(b"MLSD /data/sub/\r\n")
        .read(b"150 Here comes the directory listing.\r\n")
        .read(b"226 Directory send OK.\r\n")
        .write(b"DELE /data/sub/f3.txt\r\n")
        .read(b"250 Delete operation successful.\r\n")
        .write(b"RMD /data/sub/\r\n")
        .read(b"250 Remove directory operation successful.\r\n")
        .write(b"RMD /data/\r\n")
        .read(b"250 Remove directory operation successful.\r\n")
        .build();

    let data1 = Builder::new()
        .read(b"type=file;size=100;modify=20250101120000; f1.txt\r\n")
        .read(b"type=file;size=50;modify=20250102120000; f2.txt\r\n")
        .read(b"type=dir;modify=20250103120000; sub\r\n")
        .build();
    let data2 = Builder::new()
        .read(b"type=file;size=10;modify=20250104120000; f3.txt\r\n")
        .build();

    let mut client = connect(control, vec![data1, data2], FtpClientConfig::new()).await;

    client.delete_tree("/data", &[], &()).await.unwrap();
}

#[tokio::test]
async fn delete_tree_with_exclusion() {
    let mut builder = Builder::new();
    session_prologue(&mut builder);
    let control = builder
        .write(b"PWD\r\n")
        .read(b"257 \"/\" is the current directory\r\n")
        .write(b"CWD /data\r\n")
        .read(b"250 Directory successfully changed.\r\n")
        .write(b"CWD /\r\n")
        .read(b"250 Directory successfully changed.\r\n")
        .write(b"TYPE A\r\n")
        .read(b"200 Switching to ASCII mode.\r\n")
        .write(b"EPSV\r\n")
        .read(b"229 Entering Extended Passive Mode (|||2121|)\r\n")
        .write(b"MLSD /data/\r\n")
        .read(b"150 Here comes the directory listing.\r\n")
        .read(b"226 Directory send OK.\r\n")
        .write(b"DELE /data/f1.txt\r\n")
        .read(b"250 Delete operation successful.\r\n")
        .build();

    // keep.txt is excluded, and no directory gets removed
    let data1 = Builder::new()
        .read(b"type=file;size=100;modify=20250101120000; f1.txt\r\n")
        .read(b"type=file;size=5;modify=20250102120000; keep.txt\r\n")
        .build();

    let mut client = connect(control, vec![data1], FtpClientConfig::new()).await;

    client
        .delete_tree("/data", &["keep.txt".to_string()], &())
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_tree_with_nested_exclusion() {
    let mut builder = Builder::new();
    session_prologue(&mut builder);
    let control = builder
        .write(b"PWD\r\n")
        .read(b"257 \"/\" is the current directory\r\n")
        .write(b"CWD /data\r\n")
        .read(b"250 Directory successfully changed.\r\n")
        .write(b"CWD /\r\n")
        .read(b"250 Directory successfully changed.\r\n")
        .write(b"TYPE A\r\n")
        .read(b"200 Switching to ASCII mode.\r\n")
        .write(b"EPSV\r\n")
        .read(b"229 Entering Extended Passive Mode (|||2121|)\r\n")
        .write(b"MLSD /data/\r\n")
        .read(b"150 Here comes the directory listing.\r\n")
        .read(b"226 Directory send OK.\r\n")
        .write(b"DELE /data/f1.txt\r\n")
        .read(b"250 Delete operation successful.\r\n")
        .write(b"EPSV\r\n")
        .read(b"229 Entering Extended Passive Mode (|||2122|)\r\n")
        .write(b"MLSD /data/sub/\r\n")
        .read(b"150 Here comes the directory listing.\r\n")
        .read(b"226 Directory send OK.\r\n")
        .write(b"DELE /data/sub/f3.txt\r\n")
        .read(b"250 Delete operation successful.\r\n")
        .build();

    // keep.txt lives one level down, so neither sub/ nor /data/ gets removed
    let data1 = Builder::new()
        .read(b"type=file;size=100;modify=20250101120000; f1.txt\r\n")
        .read(b"type=dir;modify=20250103120000; sub\r\n")
        .build();
    let data2 = Builder::new()
        .read(b"type=file;size=5;modify=20250102120000; keep.txt\r\n")
        .read(b"type=file;size=10;modify=20250104120000; f3.txt\r\n")
        .build();

    let mut client = connect(control, vec![data1, data2], FtpClientConfig::new()).await;

    client
        .delete_tree("/data", &["keep.txt".to_string()], &())
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_single_file_ignores_exclusion() {
    let mut builder = Builder::new();
    session_prologue(&mut builder);
    let control = builder
        .write(b"PWD\r\n")
        .read(b"257 \"/\" is the current directory\r\n")
        .write(b"CWD /data/f1.txt\r\n")
        .read(b"550 Failed to change directory.\r\n")
        .write(b"MLST /data/f1.txt\r\n")
        .read(b"250-Listing /data/f1.txt\r\n type=file;size=100;modify=20250101120000; /data/f1.txt\r\n250 End\r\n")
        .write(b"CWD /\r\n")
        .read(b"250 Directory successfully changed.\r\n")
        .write(b"DELE /data/f1.txt\r\n")
        .read(b"250 Delete operation successful.\r\n")
        .build();

    let mut client = connect(control, Vec::new(), FtpClientConfig::new()).await;

    client
        .delete_tree("/data/f1.txt", &["f1.txt".to_string()], &())
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_absent_path() {
    let mut builder = Builder::new();
    session_prologue(&mut builder);
    let control = builder
        .write(b"PWD\r\n")
        .read(b"257 \"/\" is the current directory\r\n")
        .write(b"CWD /gone\r\n")
        .read(b"550 Failed to change directory.\r\n")
        .write(b"MLST /gone\r\n")
        .read(b"550 No such file or directory.\r\n")
        .write(b"CWD /\r\n")
        .read(b"250 Directory successfully changed.\r\n")
        .build();

    let mut client = connect(control, Vec::new(), FtpClientConfig::new()).await;

    client.delete_tree("/gone", &[], &()).await.unwrap();
}

#[tokio::test]
async fn mkdir_recursive_partial() {
    let mut builder = Builder::new();
    session_prologue(&mut builder);
    let control = builder
        .write(b"PWD\r\n")
        .read(b"257 \"/\" is the current directory\r\n")
        .write(b"CWD /data\r\n")
        .read(b"250 Directory successfully changed.\r\n")
        .write(b"CWD /data/sub\r\n")
        .read(b"550 Failed to change directory.\r\n")
        .write(b"MKD /data/sub\r\n")
        .read(b"257 \"/data/sub\" created\r\n")
        .write(b"CWD /data/sub/deep\r\n")
        .read(b"550 Failed to change directory.\r\n")
        .write(b"MKD /data/sub/deep\r\n")
        .read(b"257 \"/data/sub/deep\" created\r\n")
        .write(b"CWD /\r\n")
        .read(b"250 Directory successfully changed.\r\n")
        .build();

    let mut client = connect(control, Vec::new(), FtpClientConfig::new()).await;

    client.mkdir_recursive("/data/sub/deep").await.unwrap();
}

#[tokio::test]
async fn mkdir_recursive_idempotent() {
    let mut builder = Builder::new();
    session_prologue(&mut builder);
    let control = builder
        .write(b"PWD\r\n")
        .read(b"257 \"/\" is the current directory\r\n")
        .write(b"CWD /data\r\n")
        .read(b"250 Directory successfully changed.\r\n")
        .write(b"CWD /data/sub\r\n")
        .read(b"250 Directory successfully changed.\r\n")
        .write(b"CWD /\r\n")
        .read(b"250 Directory successfully changed.\r\n")
        .build();

    let mut client = connect(control, Vec::new(), FtpClientConfig::new()).await;

    client.mkdir_recursive("/data/sub").await.unwrap();
}

#[tokio::test]
async fn rename_file() {
    let mut builder = Builder::new();
    session_prologue(&mut builder);
    let control = builder
        .write(b"RNFR /data/a.txt\r\n")
        .read(b"350 Ready for RNTO.\r\n")
        .write(b"RNTO /data/b.txt\r\n")
        .read(b"250 Rename successful.\r\n")
        .build();

    let mut client = connect(control, Vec::new(), FtpClientConfig::new()).await;

    client.rename("/data/a.txt", "/data/b.txt").await.unwrap();
}

#[tokio::test]
async fn retrieve_file() {
    let mut builder = Builder::new();
    session_prologue(&mut builder);
    let control = builder
        .write(b"TYPE I\r\n")
        .read(b"200 Switching to Binary mode.\r\n")
        .write(b"EPSV\r\n")
        .read(b"229 Entering Extended Passive Mode (|||2121|)\r\n")
        .write(b"RETR /data/f1.txt\r\n")
        .read(b"150 Opening BINARY mode data connection.\r\n")
        .read(b"226 Transfer complete.\r\n")
        .build();

    let data1 = Builder::new().read(b"hello").build();

    let mut client = connect(control, vec![data1], FtpClientConfig::new()).await;

    let mut data_stream = client.retrieve_file_start("/data/f1.txt", &()).await.unwrap();
    let mut body = Vec::new();
    data_stream.read_to_end(&mut body).await.unwrap();
    drop(data_stream);
    client.wait_retrieve_end().await.unwrap();
    assert_eq!(body, b"hello");
}

#[tokio::test]
async fn append_file() {
    let mut builder = Builder::new();
    session_prologue(&mut builder);
    let control = builder
        .write(b"TYPE I\r\n")
        .read(b"200 Switching to Binary mode.\r\n")
        .write(b"CWD /data\r\n")
        .read(b"250 Directory successfully changed.\r\n")
        .write(b"EPSV\r\n")
        .read(b"229 Entering Extended Passive Mode (|||2121|)\r\n")
        .write(b"APPE f1.txt\r\n")
        .read(b"150 Ok to send data.\r\n")
        .read(b"226 Transfer complete.\r\n")
        .build();

    let data1 = Builder::new().write(b"hello").build();

    let mut client = connect(control, vec![data1], FtpClientConfig::new()).await;

    let mut data_stream = client.append_file_start("/data/f1.txt", &()).await.unwrap();
    data_stream.write_all(b"hello").await.unwrap();
    data_stream.shutdown().await.unwrap();
    drop(data_stream);
    client.wait_store_end().await.unwrap();
}
