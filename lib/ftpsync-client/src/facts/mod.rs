/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::FtpFileFactsParseError;

mod entry_type;
pub(crate) mod time_val;

pub use entry_type::FtpFileEntryType;

pub struct FtpFileFacts {
    entry_path: String,
    entry_type: FtpFileEntryType,
    size: Option<u64>,
    modify_time: Option<DateTime<Utc>>,
}

impl FtpFileFacts {
    pub(crate) fn new(path: &str) -> Self {
        FtpFileFacts {
            entry_path: path.to_string(),
            entry_type: FtpFileEntryType::Unknown,
            size: None,
            modify_time: None,
        }
    }

    #[inline]
    pub fn entry_path(&self) -> &str {
        self.entry_path.as_str()
    }

    /// The last path component, with any trailing slash stripped first.
    pub fn file_name(&self) -> &str {
        let path = self.entry_path.trim_end_matches('/');
        path.rsplit('/').next().unwrap_or(path)
    }

    #[inline]
    pub fn entry_type(&self) -> &FtpFileEntryType {
        &self.entry_type
    }

    #[inline]
    pub fn maybe_file(&self) -> bool {
        self.entry_type.maybe_file()
    }

    #[inline]
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    #[inline]
    pub(crate) fn set_size(&mut self, size: u64) {
        self.size = Some(size);
    }

    #[inline]
    pub fn mtime(&self) -> Option<&DateTime<Utc>> {
        self.modify_time.as_ref()
    }

    #[inline]
    pub(crate) fn set_mtime(&mut self, mtime: DateTime<Utc>) {
        self.modify_time = Some(mtime);
    }

    pub(crate) fn parse_line(line: &str) -> Result<Self, FtpFileFactsParseError> {
        if let Some((facts, path)) = line.trim_start().split_once(' ') {
            let mut ff = FtpFileFacts::new(path);

            for fact in facts.split(';') {
                if fact.is_empty() {
                    continue;
                }

                if let Some((key, value)) = fact.split_once('=') {
                    ff.set_fact(key, value)?;
                } else {
                    return Err(FtpFileFactsParseError::NoDelimiterInFact(fact.to_string()));
                }
            }

            Ok(ff)
        } else {
            Err(FtpFileFactsParseError::NoSpaceDelimiter)
        }
    }

    fn set_fact(&mut self, key: &str, value: &str) -> Result<(), FtpFileFactsParseError> {
        match key.to_lowercase().as_str() {
            "type" => self.entry_type = FtpFileEntryType::parse(value),
            "modify" => {
                let dt = time_val::parse_from_str(value)
                    .map_err(FtpFileFactsParseError::InvalidModifyTime)?;
                self.modify_time = Some(dt);
            }
            "size" => {
                let size = u64::from_str(value).map_err(|_| FtpFileFactsParseError::InvalidSize)?;
                self.size = Some(size);
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pdir_line() {
        let ff = FtpFileFacts::parse_line("type=pdir;sizd=4096;modify=20210525083610;UNIX.mode=0755;UNIX.uid=0;UNIX.gid=0;unique=804g2; /").unwrap();
        assert_eq!(ff.entry_type, FtpFileEntryType::ParentDir);
        assert!(ff.size.is_none());
    }

    #[test]
    fn parse_file_line() {
        let ff =
            FtpFileFacts::parse_line("type=file;size=100;modify=20250101120000; /data/f1.txt")
                .unwrap();
        assert_eq!(ff.entry_type, FtpFileEntryType::File);
        assert_eq!(ff.size, Some(100));
        assert_eq!(ff.entry_path(), "/data/f1.txt");
        assert_eq!(ff.file_name(), "f1.txt");
    }

    #[test]
    fn parse_invalid_line() {
        assert!(FtpFileFacts::parse_line("type=file;size=abc; /f").is_err());
        assert!(FtpFileFacts::parse_line("no-space-at-all").is_err());
    }

    #[test]
    fn file_name_of_dir() {
        let ff = FtpFileFacts::parse_line("type=dir;modify=20250101120000; /data/sub/").unwrap();
        assert_eq!(ff.file_name(), "sub");
    }
}
