/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

/// Features advertised by the server in its FEAT reply.
#[derive(Default)]
pub struct FtpServerFeature {
    utf8: bool,
    mlst: bool,
    mlsd: bool,
    size: bool,
    mdtm: bool,
    epsv: bool,
    pret: bool,
}

impl FtpServerFeature {
    /// Each FEAT line holds the feature label, possibly followed by
    /// parameters. MLST advertises its fact list after a space.
    pub(crate) fn parse_and_set(&mut self, line: &str) {
        let label = line.split(' ').next().unwrap_or(line);
        match label.to_uppercase().as_str() {
            "UTF8" => self.utf8 = true,
            "MLST" => {
                self.mlst = true;
                self.mlsd = true;
            }
            "MLSD" => self.mlsd = true,
            "SIZE" => self.size = true,
            "MDTM" => self.mdtm = true,
            "EPSV" => self.epsv = true,
            "PRET" => self.pret = true,
            _ => {}
        }
    }

    #[inline]
    pub fn supports_utf8(&self) -> bool {
        self.utf8
    }

    #[inline]
    pub fn supports_mlst(&self) -> bool {
        self.mlst
    }

    #[inline]
    pub fn supports_machine_list(&self) -> bool {
        self.mlst || self.mlsd
    }

    #[inline]
    pub fn supports_size(&self) -> bool {
        self.size
    }

    #[inline]
    pub fn supports_mdtm(&self) -> bool {
        self.mdtm
    }

    #[inline]
    pub fn supports_epsv(&self) -> bool {
        self.epsv
    }

    #[inline]
    pub fn supports_pret(&self) -> bool {
        self.pret
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_feat_lines() {
        let mut feature = FtpServerFeature::default();
        feature.parse_and_set("UTF8");
        feature.parse_and_set("MLST type*;size*;modify*;");
        feature.parse_and_set("SIZE");
        feature.parse_and_set("REST STREAM");

        assert!(feature.supports_utf8());
        assert!(feature.supports_mlst());
        assert!(feature.supports_machine_list());
        assert!(feature.supports_size());
        assert!(!feature.supports_mdtm());
        assert!(!feature.supports_pret());
    }
}
