/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use tokio::io::{AsyncRead, AsyncWrite};

use super::{FtpClient, FtpPathKind};
use crate::connection::FtpConnectionProvider;
use crate::error::{FtpFileStatError, FtpTreeDeleteError};
use crate::facts::FtpFileFacts;

struct DeleteFrame {
    dir_path: String,
    entries: std::vec::IntoIter<FtpFileFacts>,
}

enum DeleteStep {
    File(String),
    Descend(String),
    Ascend(String),
}

impl<CP, S, E, UD> FtpClient<CP, S, E, UD>
where
    CP: FtpConnectionProvider<S, E, UD>,
    S: AsyncRead + AsyncWrite + Unpin,
    E: std::error::Error,
{
    /// Create all missing directories along the given absolute path.
    ///
    /// Each path prefix is probed with CWD first, only missing levels get a
    /// MKD. Already existing levels make this a no-op, so it is safe to call
    /// repeatedly. The working directory is restored afterwards.
    pub async fn mkdir_recursive(&mut self, path: &str) -> Result<(), FtpFileStatError> {
        let origin = self.control.print_working_directory().await?;
        let r = self.mkdir_segments(path).await;
        self.restore_working_dir(&origin).await;
        r
    }

    async fn mkdir_segments(&mut self, path: &str) -> Result<(), FtpFileStatError> {
        let mut prefix = String::with_capacity(path.len());
        for segment in path.split('/') {
            if segment.is_empty() {
                continue;
            }
            prefix.push('/');
            prefix.push_str(segment);
            if !self.control.change_directory(&prefix).await? {
                self.control.make_directory(&prefix).await?;
            }
        }
        Ok(())
    }

    /// Delete a path recursively.
    ///
    /// An absent path is a no-op. A file path is deleted directly, the
    /// exclusion list does not apply to it. For a directory every entry
    /// whose bare name is in `exclude` is kept, and directories are only
    /// removed when the exclusion list is empty, as a kept entry keeps all
    /// its ancestors alive.
    pub async fn delete_tree(
        &mut self,
        path: &str,
        exclude: &[String],
        user_data: &UD,
    ) -> Result<(), FtpTreeDeleteError> {
        match self
            .check_path(path)
            .await
            .map_err(FtpTreeDeleteError::PathCheckFailed)?
        {
            FtpPathKind::Absent => return Ok(()),
            FtpPathKind::File => {
                return self
                    .control
                    .delete_file(path)
                    .await
                    .map_err(|e| FtpTreeDeleteError::DeleteFileFailed(path.to_string(), e));
            }
            FtpPathKind::Directory => {}
        }

        let root_dir = if path.ends_with('/') {
            path.to_string()
        } else {
            format!("{path}/")
        };
        let remove_dirs = exclude.is_empty();

        let entries = self.delete_list_level(&root_dir, exclude, user_data).await?;
        let mut stack = vec![DeleteFrame {
            dir_path: root_dir,
            entries: entries.into_iter(),
        }];

        loop {
            let step = {
                let Some(frame) = stack.last_mut() else {
                    break;
                };
                match frame.entries.next() {
                    Some(ff) => {
                        let child = format!("{}{}", frame.dir_path, ff.file_name());
                        if ff.entry_type().is_dir() {
                            DeleteStep::Descend(format!("{child}/"))
                        } else {
                            DeleteStep::File(child)
                        }
                    }
                    None => DeleteStep::Ascend(frame.dir_path.clone()),
                }
            };

            match step {
                DeleteStep::File(file_path) => {
                    self.control.delete_file(&file_path).await.map_err(|e| {
                        FtpTreeDeleteError::DeleteFileFailed(file_path.clone(), e)
                    })?;
                }
                DeleteStep::Descend(sub_dir) => {
                    let entries = self.delete_list_level(&sub_dir, exclude, user_data).await?;
                    stack.push(DeleteFrame {
                        dir_path: sub_dir,
                        entries: entries.into_iter(),
                    });
                }
                DeleteStep::Ascend(dir_path) => {
                    stack.pop();
                    if remove_dirs {
                        self.control.remove_dir(&dir_path).await.map_err(|e| {
                            FtpTreeDeleteError::RemoveDirFailed(dir_path.clone(), e)
                        })?;
                    }
                }
            }
        }

        Ok(())
    }

    async fn delete_list_level(
        &mut self,
        dir_path: &str,
        exclude: &[String],
        user_data: &UD,
    ) -> Result<Vec<FtpFileFacts>, FtpTreeDeleteError> {
        let entries = self.machine_list(dir_path, user_data).await?;
        Ok(entries
            .into_iter()
            .filter(|ff| !exclude.iter().any(|name| name == ff.file_name()))
            .collect())
    }
}
