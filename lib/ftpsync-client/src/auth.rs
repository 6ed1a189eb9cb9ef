/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use anyhow::anyhow;

const USERNAME_MAX_LENGTH: usize = u8::MAX as usize;
const PASSWORD_MAX_LENGTH: usize = u8::MAX as usize;

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Username {
    inner: String,
}

impl Username {
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn from_original(s: &str) -> anyhow::Result<Self> {
        if s.len() > USERNAME_MAX_LENGTH {
            return Err(anyhow!("too long string for a username"));
        }
        if s.contains(':') {
            return Err(anyhow!("colon character is not allowed"));
        }
        Ok(Username {
            inner: s.to_string(),
        })
    }

    pub fn as_original(&self) -> &str {
        &self.inner
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Password {
    inner: String,
}

impl Password {
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn from_original(s: &str) -> anyhow::Result<Self> {
        if s.len() > PASSWORD_MAX_LENGTH {
            return Err(anyhow!("too long string for a password"));
        }
        Ok(Password {
            inner: s.to_string(),
        })
    }

    pub fn as_original(&self) -> &str {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username() {
        let u = Username::from_original("sync").unwrap();
        assert_eq!(u.as_original(), "sync");
        assert!(!u.is_empty());
        assert!(Username::from_original("").unwrap().is_empty());
        assert!(Username::from_original("a:b").is_err());
        assert!(Username::from_original(&"x".repeat(300)).is_err());
    }

    #[test]
    fn password() {
        let p = Password::from_original("se:cret").unwrap();
        assert_eq!(p.as_original(), "se:cret");
        assert!(Password::from_original(&"x".repeat(300)).is_err());
    }
}
