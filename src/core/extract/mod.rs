//! Translation key extraction from source files.
//!
//! Two interchangeable strategies sit behind [`KeyExtractor`]: a shallow
//! regex scan over the raw text and a full TSX syntax-tree walk. Both honor
//! the same contract: duplicate hits are kept (the scanner counts them),
//! only literal non-interpolated arguments count, and candidates that are
//! not shaped like translation keys are dropped.

mod regex;
mod syntax;

use anyhow::Result;

use crate::config::ExtractionMode;
use crate::utils::is_key_candidate;

/// Outcome of rewriting one key across a file's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    pub text: String,
    pub replacements: usize,
}

/// Extracts translation keys and import specifiers from one source file.
#[derive(Debug, Clone, Copy)]
pub struct KeyExtractor {
    mode: ExtractionMode,
}

impl KeyExtractor {
    pub fn new(mode: ExtractionMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ExtractionMode {
        self.mode
    }

    /// Extract every translation key hit in the file, duplicates included.
    ///
    /// Syntax mode fails on unparseable files; the caller decides whether
    /// that skips the file or aborts the operation.
    pub fn extract_keys(&self, code: &str, file_path: &str) -> Result<Vec<String>> {
        let mut keys = match self.mode {
            ExtractionMode::Regex => regex::extract_keys(code),
            ExtractionMode::Syntax => syntax::extract_keys(code, file_path)?,
        };
        // Malformed dot shapes stay in: the checker reports them separately.
        keys.retain(|key| is_key_candidate(key));
        Ok(keys)
    }

    /// Extract import specifiers (static, re-export, and dynamic imports).
    pub fn extract_imports(&self, code: &str, file_path: &str) -> Result<Vec<String>> {
        match self.mode {
            ExtractionMode::Regex => Ok(regex::extract_imports(code)),
            ExtractionMode::Syntax => syntax::extract_imports(code, file_path),
        }
    }

    /// Replace every literal occurrence of `old` used as a translation key.
    pub fn rewrite_key(
        &self,
        code: &str,
        file_path: &str,
        old: &str,
        new: &str,
    ) -> Result<RewriteOutcome> {
        match self.mode {
            ExtractionMode::Regex => Ok(regex::rewrite_key(code, old, new)),
            ExtractionMode::Syntax => syntax::rewrite_key(code, file_path, old, new),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
import { t } from "../i18n";

export function LoginPage() {
  const title = t("auth.login.title");
  const other = translate('auth.login.subtitle');
  const ns = i18n.t("common.ok");
  return <Trans i18nKey="auth.login.cta" />;
}
"#;

    #[test]
    fn test_modes_agree_on_plain_calls() {
        let regex_keys = KeyExtractor::new(ExtractionMode::Regex)
            .extract_keys(SAMPLE, "login.tsx")
            .unwrap();
        let syntax_keys = KeyExtractor::new(ExtractionMode::Syntax)
            .extract_keys(SAMPLE, "login.tsx")
            .unwrap();

        let mut regex_keys = regex_keys;
        let mut syntax_keys = syntax_keys;
        regex_keys.sort();
        syntax_keys.sort();
        assert_eq!(regex_keys, syntax_keys);
        assert_eq!(regex_keys.len(), 4);
    }

    #[test]
    fn test_duplicate_hits_are_kept() {
        let code = r#"const a = t("common.ok"); const b = t("common.ok");"#;
        for mode in [ExtractionMode::Regex, ExtractionMode::Syntax] {
            let keys = KeyExtractor::new(mode).extract_keys(code, "x.ts").unwrap();
            assert_eq!(keys, vec!["common.ok", "common.ok"], "mode {:?}", mode);
        }
    }

    #[test]
    fn test_modes_agree_on_imports() {
        let code = r#"
import Header from "./components/Header";
import "./globals.css";
export { Footer } from "./components/Footer";
const Lazy = import("./components/Lazy");
"#;
        for mode in [ExtractionMode::Regex, ExtractionMode::Syntax] {
            let imports = KeyExtractor::new(mode)
                .extract_imports(code, "page.tsx")
                .unwrap();
            assert_eq!(
                imports,
                vec![
                    "./components/Header",
                    "./globals.css",
                    "./components/Footer",
                    "./components/Lazy",
                ],
                "mode {:?}",
                mode
            );
        }
    }

    #[test]
    fn test_rewrite_key_both_modes() {
        let code = r#"const a = t("common.ok"); const b = t('common.ok');"#;
        for mode in [ExtractionMode::Regex, ExtractionMode::Syntax] {
            let outcome = KeyExtractor::new(mode)
                .rewrite_key(code, "x.ts", "common.ok", "common.confirm")
                .unwrap();
            assert_eq!(outcome.replacements, 2, "mode {:?}", mode);
            assert!(outcome.text.contains(r#"t("common.confirm")"#));
            assert!(outcome.text.contains("t('common.confirm')"));
            assert!(!outcome.text.contains("common.ok"));
        }
    }
}
