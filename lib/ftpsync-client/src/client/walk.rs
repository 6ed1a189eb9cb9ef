/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

use super::{FtpClient, FtpPathKind};
use crate::connection::FtpConnectionProvider;
use crate::error::{
    FtpFileFactsParseError, FtpFileListError, FtpTreeWalkError,
};
use crate::facts::{FtpFileEntryType, FtpFileFacts};
use crate::transfer::FtpLineDataReceiver;

/// Separator between a file path and its appended size annotation.
pub const SIZE_SUFFIX_SEPARATOR: char = '#';

#[derive(Default)]
pub(super) struct FactsLineReceiver {
    entries: Vec<FtpFileFacts>,
    parse_error: Option<FtpFileFactsParseError>,
}

impl FactsLineReceiver {
    pub(super) fn into_entries(
        self,
        recv_result: Result<(), FtpFileListError>,
    ) -> Result<Vec<FtpFileFacts>, FtpFileListError> {
        if let Some(e) = self.parse_error {
            return Err(FtpFileListError::InvalidEntryLine(e));
        }
        recv_result?;
        Ok(self.entries)
    }
}

#[async_trait]
impl FtpLineDataReceiver for FactsLineReceiver {
    async fn recv_line(&mut self, line: &str) {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return;
        }
        match FtpFileFacts::parse_line(line) {
            Ok(ff) => self.entries.push(ff),
            Err(e) => self.parse_error = Some(e),
        }
    }

    fn should_return_early(&self) -> bool {
        self.parse_error.is_some()
    }
}

struct WalkFrame {
    dir_path: String,
    entries: std::vec::IntoIter<FtpFileFacts>,
}

fn child_path(dir_path: &str, ff: &FtpFileFacts) -> String {
    format!("{}{}", dir_path, ff.file_name())
}

impl<CP, S, E, UD> FtpClient<CP, S, E, UD>
where
    CP: FtpConnectionProvider<S, E, UD>,
    S: AsyncRead + AsyncWrite + Unpin,
    E: std::error::Error,
{
    /// List one directory level through MLSD, with the self and parent
    /// entries dropped. `dir_path` has to end with a slash.
    pub(super) async fn machine_list(
        &mut self,
        dir_path: &str,
        user_data: &UD,
    ) -> Result<Vec<FtpFileFacts>, FtpTreeWalkError> {
        let data_stream = self
            .machine_list_start(dir_path, user_data)
            .await
            .map_err(|e| FtpTreeWalkError::ListStartFailed(dir_path.to_string(), e))?;

        let mut receiver = FactsLineReceiver::default();
        let recv_result = self.list_directory_receive(data_stream, &mut receiver).await;
        let entries = receiver
            .into_entries(recv_result)
            .map_err(|e| FtpTreeWalkError::ListFailed(dir_path.to_string(), e))?;

        Ok(entries
            .into_iter()
            .filter(|ff| {
                !matches!(
                    ff.entry_type(),
                    FtpFileEntryType::CurrentDir | FtpFileEntryType::ParentDir
                ) && ff.file_name() != "."
                    && ff.file_name() != ".."
            })
            .collect())
    }

    /// Same as [`Self::machine_list`], with the entries ordered by their
    /// modification time, oldest first. Entries without a modify fact go
    /// first.
    pub(super) async fn machine_list_sorted(
        &mut self,
        dir_path: &str,
        user_data: &UD,
    ) -> Result<Vec<FtpFileFacts>, FtpTreeWalkError> {
        let mut entries = self.machine_list(dir_path, user_data).await?;
        entries.sort_by_key(|ff| ff.mtime().copied());
        Ok(entries)
    }

    /// Walk the remote tree below `path` and collect all file paths in
    /// per-directory modification time order, subdirectories descended in
    /// the same order.
    ///
    /// A file path is returned as a single entry, an absent path as an
    /// empty list. In continuous read mode every returned path carries a
    /// `#<size>` suffix.
    pub async fn list_files(
        &mut self,
        path: &str,
        user_data: &UD,
    ) -> Result<Vec<String>, FtpTreeWalkError> {
        let root_dir = match self.check_path(path).await? {
            FtpPathKind::Directory => {
                if path.ends_with('/') {
                    path.to_string()
                } else {
                    format!("{path}/")
                }
            }
            FtpPathKind::File => {
                let size = if self.with_size {
                    let ff = self.fetch_file_facts(path).await?;
                    Some(ff.size().unwrap_or(0))
                } else {
                    None
                };
                return Ok(vec![annotate_size(path.to_string(), size)]);
            }
            FtpPathKind::Absent => return Ok(Vec::new()),
        };

        let mut files = Vec::new();
        let entries = self.machine_list_sorted(&root_dir, user_data).await?;
        let mut stack = vec![WalkFrame {
            dir_path: root_dir,
            entries: entries.into_iter(),
        }];

        loop {
            let next = {
                let Some(frame) = stack.last_mut() else {
                    break;
                };
                frame.entries.next().map(|ff| {
                    (
                        child_path(&frame.dir_path, &ff),
                        ff.entry_type().is_dir(),
                        ff.size(),
                    )
                })
            };
            let Some((child, is_dir, size)) = next else {
                stack.pop();
                continue;
            };

            if is_dir {
                let sub_dir = format!("{child}/");
                let entries = self.machine_list_sorted(&sub_dir, user_data).await?;
                stack.push(WalkFrame {
                    dir_path: sub_dir,
                    entries: entries.into_iter(),
                });
            } else {
                let size = if self.with_size {
                    Some(size.unwrap_or(0))
                } else {
                    None
                };
                files.push(annotate_size(child, size));
            }
        }

        Ok(files)
    }

    /// List the fully qualified paths of the immediate children of a
    /// directory. A non-directory path yields an empty list.
    pub async fn list_dir_paths(
        &mut self,
        path: &str,
        user_data: &UD,
    ) -> Result<Vec<String>, FtpTreeWalkError> {
        if self.check_path(path).await? != FtpPathKind::Directory {
            return Ok(Vec::new());
        }

        let dir_path = if path.ends_with('/') {
            path.to_string()
        } else {
            format!("{path}/")
        };
        let entries = self.machine_list(&dir_path, user_data).await?;
        Ok(entries
            .into_iter()
            .map(|ff| child_path(&dir_path, &ff))
            .collect())
    }
}

fn annotate_size(mut path: String, size: Option<u64>) -> String {
    if let Some(size) = size {
        path.push(SIZE_SUFFIX_SEPARATOR);
        path.push_str(&size.to_string());
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_annotation() {
        assert_eq!(annotate_size("/data/f1.txt".to_string(), Some(100)), "/data/f1.txt#100");
        assert_eq!(annotate_size("/data/f1.txt".to_string(), None), "/data/f1.txt");
    }

    #[test]
    fn child_of_dir() {
        let ff = FtpFileFacts::parse_line("type=file;size=10; f3.txt").unwrap();
        assert_eq!(child_path("/data/sub/", &ff), "/data/sub/f3.txt");

        let ff = FtpFileFacts::parse_line("type=dir; sub").unwrap();
        assert_eq!(child_path("/data/", &ff), "/data/sub");
    }
}
