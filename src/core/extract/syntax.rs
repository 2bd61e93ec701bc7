//! Syntax extraction mode.
//!
//! Parses each file as TSX via swc and walks the AST, so only genuine call
//! expressions and JSX attributes count as hits. Interpolated template
//! arguments are never hits. The price is that a file that fails to parse
//! contributes nothing.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use swc_common::{FileName, GLOBALS, Globals, SourceFile, SourceMap};
use swc_ecma_ast::{
    Callee, CallExpr, ExportAll, Expr, ImportDecl, JSXAttr, JSXAttrName, JSXAttrValue, JSXExpr,
    Lit, MemberProp, Module, NamedExport, Str, Tpl,
};
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};
use swc_ecma_visit::{Visit, VisitWith};

use super::RewriteOutcome;

struct ParsedSource {
    module: Module,
    source_file: Arc<SourceFile>,
}

fn parse_tsx(code: &str, file_path: &str) -> Result<ParsedSource> {
    GLOBALS.set(&Globals::new(), || {
        let source_map: Arc<SourceMap> = Arc::default();
        let source_file =
            source_map.new_source_file(FileName::Real(file_path.into()).into(), code.to_string());

        let syntax = Syntax::Typescript(TsSyntax {
            tsx: true,
            ..Default::default()
        });

        let mut parser = Parser::new(syntax, StringInput::from(&*source_file), None);
        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("Failed to parse {}: {:?}", file_path, e))?;

        Ok(ParsedSource {
            module,
            source_file,
        })
    })
}

/// One literal key hit with the byte range of its quoted content.
struct SpannedKey {
    key: String,
    start: usize,
    end: usize,
}

struct KeyCollector {
    file_start: u32,
    hits: Vec<SpannedKey>,
}

impl KeyCollector {
    fn new(source_file: &SourceFile) -> Self {
        Self {
            file_start: source_file.start_pos.0,
            hits: Vec::new(),
        }
    }

    fn collect_str(&mut self, s: &Str) {
        if let Some(value) = s.value.as_str() {
            // Span covers the quotes; the content range excludes them.
            let lo = (s.span.lo.0 - self.file_start) as usize;
            let hi = (s.span.hi.0 - self.file_start) as usize;
            self.hits.push(SpannedKey {
                key: value.to_string(),
                start: lo + 1,
                end: hi - 1,
            });
        }
    }

    fn collect_tpl(&mut self, tpl: &Tpl) {
        // Only a template with no interpolation is a literal key.
        if !tpl.exprs.is_empty() || tpl.quasis.len() != 1 {
            return;
        }
        let quasi = &tpl.quasis[0];
        if let Some(cooked) = &quasi.cooked
            && let Some(value) = cooked.as_str()
        {
            let lo = (quasi.span.lo.0 - self.file_start) as usize;
            let hi = (quasi.span.hi.0 - self.file_start) as usize;
            self.hits.push(SpannedKey {
                key: value.to_string(),
                start: lo,
                end: hi,
            });
        }
    }

    fn collect_literal(&mut self, expr: &Expr) {
        match expr {
            Expr::Lit(Lit::Str(s)) => self.collect_str(s),
            Expr::Tpl(tpl) => self.collect_tpl(tpl),
            _ => {}
        }
    }

    /// `t` / `translate` identifiers and the `i18n.t` member callee.
    fn is_translation_callee(expr: &Expr) -> bool {
        match expr {
            Expr::Ident(ident) => matches!(ident.sym.as_str(), "t" | "translate"),
            Expr::Member(member) => {
                matches!(&*member.obj, Expr::Ident(obj) if obj.sym.as_str() == "i18n")
                    && matches!(&member.prop, MemberProp::Ident(prop) if prop.sym.as_str() == "t")
            }
            _ => false,
        }
    }
}

impl Visit for KeyCollector {
    fn visit_call_expr(&mut self, node: &CallExpr) {
        if let Callee::Expr(callee) = &node.callee
            && Self::is_translation_callee(callee)
            && let Some(arg) = node.args.first()
        {
            self.collect_literal(&arg.expr);
        }
        node.visit_children_with(self);
    }

    fn visit_jsx_attr(&mut self, node: &JSXAttr) {
        if let JSXAttrName::Ident(ident) = &node.name
            && ident.sym.as_str() == "i18nKey"
        {
            match &node.value {
                Some(JSXAttrValue::Str(s)) => self.collect_str(s),
                Some(JSXAttrValue::JSXExprContainer(container)) => {
                    if let JSXExpr::Expr(expr) = &container.expr {
                        self.collect_literal(expr);
                    }
                }
                _ => {}
            }
        }
        node.visit_children_with(self);
    }
}

struct ImportCollector {
    specifiers: Vec<String>,
}

impl Visit for ImportCollector {
    fn visit_import_decl(&mut self, node: &ImportDecl) {
        if let Some(spec) = node.src.value.as_str() {
            self.specifiers.push(spec.to_string());
        }
    }

    fn visit_named_export(&mut self, node: &NamedExport) {
        if let Some(src) = &node.src
            && let Some(spec) = src.value.as_str()
        {
            self.specifiers.push(spec.to_string());
        }
    }

    fn visit_export_all(&mut self, node: &ExportAll) {
        if let Some(spec) = node.src.value.as_str() {
            self.specifiers.push(spec.to_string());
        }
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        if let Callee::Import(_) = &node.callee
            && let Some(arg) = node.args.first()
            && let Expr::Lit(Lit::Str(s)) = &*arg.expr
            && let Some(spec) = s.value.as_str()
        {
            self.specifiers.push(spec.to_string());
        }
        node.visit_children_with(self);
    }
}

fn collect_hits(code: &str, file_path: &str) -> Result<Vec<SpannedKey>> {
    let parsed = parse_tsx(code, file_path)?;
    let mut collector = KeyCollector::new(&parsed.source_file);
    parsed.module.visit_with(&mut collector);

    let mut hits = collector.hits;
    hits.sort_by_key(|hit| hit.start);
    Ok(hits)
}

pub fn extract_keys(code: &str, file_path: &str) -> Result<Vec<String>> {
    Ok(collect_hits(code, file_path)?
        .into_iter()
        .map(|hit| hit.key)
        .collect())
}

pub fn extract_imports(code: &str, file_path: &str) -> Result<Vec<String>> {
    let parsed = parse_tsx(code, file_path)?;
    let mut collector = ImportCollector {
        specifiers: Vec::new(),
    };
    parsed.module.visit_with(&mut collector);
    Ok(collector.specifiers)
}

/// Splice `new` over every hit of `old`, applied back-to-front so earlier
/// byte ranges stay valid.
pub fn rewrite_key(code: &str, file_path: &str, old: &str, new: &str) -> Result<RewriteOutcome> {
    let mut hits = collect_hits(code, file_path)?;
    hits.retain(|hit| hit.key == old);
    hits.sort_by_key(|hit| hit.start);

    let mut text = code.to_string();
    for hit in hits.iter().rev() {
        text.replace_range(hit.start..hit.end, new);
    }

    Ok(RewriteOutcome {
        text,
        replacements: hits.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_only_literal_arguments() {
        let code = r#"
const a = t("auth.login.title");
const b = t(`common.ok`);
const c = t(`auth.${section}.title`);
const d = t(keyVariable);
"#;
        let keys = extract_keys(code, "sample.ts").unwrap();
        assert_eq!(keys, vec!["auth.login.title", "common.ok"]);
    }

    #[test]
    fn test_extract_member_and_attr_forms() {
        let code = r#"
export function Page() {
  const label = i18n.t("common.save");
  return (
    <div>
      <Trans i18nKey="auth.cta" />
      <Trans i18nKey={"auth.alt"} />
    </div>
  );
}
"#;
        let keys = extract_keys(code, "page.tsx").unwrap();
        assert_eq!(keys, vec!["common.save", "auth.cta", "auth.alt"]);
    }

    #[test]
    fn test_unrelated_member_calls_are_ignored() {
        let code = r#"const x = date.format("YYYY"); const y = api.t("nope");"#;
        let keys = extract_keys(code, "x.ts").unwrap();
        assert_eq!(keys, Vec::<String>::new());
    }

    #[test]
    fn test_parse_failure_is_an_error() {
        let code = "const = = broken {{{";
        assert!(extract_keys(code, "broken.ts").is_err());
    }

    #[test]
    fn test_extract_imports_all_forms() {
        let code = r#"
import Header from "./Header";
export * from "./shared";
export { x } from "./x";
async function load() {
  return import("./lazy");
}
"#;
        let imports = extract_imports(code, "page.tsx").unwrap();
        assert_eq!(imports, vec!["./Header", "./shared", "./x", "./lazy"]);
    }

    #[test]
    fn test_rewrite_leaves_lookalike_strings_alone() {
        let code = r#"const a = t("a.b"); const msg = "a.b"; const c = t("a.b");"#;
        let outcome = rewrite_key(code, "x.ts", "a.b", "z.q").unwrap();
        assert_eq!(outcome.replacements, 2);
        assert_eq!(
            outcome.text,
            r#"const a = t("z.q"); const msg = "a.b"; const c = t("z.q");"#
        );
    }

    #[test]
    fn test_rewrite_template_key() {
        let code = "const a = t(`a.b`);";
        let outcome = rewrite_key(code, "x.ts", "a.b", "longer.key.name").unwrap();
        assert_eq!(outcome.replacements, 1);
        assert_eq!(outcome.text, "const a = t(`longer.key.name`);");
    }
}
