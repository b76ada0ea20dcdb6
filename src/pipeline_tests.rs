#[cfg(test)]
mod tests {
    use crate::compile::{compile, compile_file, CompileResult, MINIFY_UNSUPPORTED, SOURCEMAP_UNSUPPORTED};
    use crate::config::CompileOptions;
    use crate::parse::MAX_NESTING_DEPTH;
    use std::fs;
    use std::thread;

    fn run(source: &str) -> CompileResult {
        compile(source, "test.ema", &CompileOptions::default())
    }

    #[test]
    fn test_component_output_ignores_body() {
        let empty = run("component Foo {}");
        let busy = run("component Foo { anything state s { } event click on x { } }");
        assert_eq!(empty.style, busy.style);
        assert!(empty.style.contains(".ema-foo"));
        assert!(empty.script.contains("customElements.define('ema-foo', EmaFoo);"));
        // Constructs nested in a component are parsed but never emitted.
        assert_eq!(empty.script, busy.script);
    }

    #[test]
    fn test_component_content_independent_byte_identical() {
        let a = run("component Foo { anything }");
        let b = run("component Foo {}");
        assert_eq!((a.markup, a.style, a.script), (b.markup, b.style, b.script));
    }

    #[test]
    fn test_import_lines_exact() {
        assert_eq!(run("import A, B from \"src\"").script, "import { A, B } from 'src';\n");
        assert_eq!(run("import A from \"src\"").script, "import A from 'src';\n");
    }

    #[test]
    fn test_page_title_and_empty_body() {
        let result = run("page Home title=\"Hi\" { }");
        assert!(result.markup.contains("<title>Hi</title>"));
        let body = result
            .markup
            .split("<body>\n")
            .nth(1)
            .and_then(|rest| rest.split("  <script src=\"js/emadocs.js\">").next())
            .unwrap();
        assert_eq!(body, "");
    }

    #[test]
    fn test_bare_identifier_produces_nothing() {
        let result = run("hello");
        assert!(result.success);
        assert!(result.markup.is_empty());
        assert!(result.style.is_empty());
        assert!(result.script.is_empty());
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_noise_never_fails() {
        let result = run("@@@ page { \"unterminated");
        assert!(result.success);
        assert!(result.errors.is_empty());
        assert!(result.markup.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_statement_order_is_preserved() {
        let result = run("state a { } hook b() { } state c { }");
        let a = result.script.find("const a").unwrap();
        let b = result.script.find("function useB").unwrap();
        let c = result.script.find("const c").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_unsupported_options_warn() {
        let options = CompileOptions {
            minify: true,
            sourcemap: true,
            treeshaking: false,
        };
        let plain = run("component Foo { }");
        let result = compile("component Foo { }", "foo.ema", &options);
        assert!(result.success);
        assert_eq!(result.warnings, vec![MINIFY_UNSUPPORTED, SOURCEMAP_UNSUPPORTED]);
        assert_eq!(result.script, plain.script);
    }

    #[test]
    fn test_multiple_pages_warn() {
        let result = run("page A { } page B { page C { } }");
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].starts_with("3 page blocks"));
        assert_eq!(result.markup.matches("<!DOCTYPE html>").count(), 3);
    }

    #[test]
    fn test_deep_nesting_compiles_on_small_stack() {
        // Same stack size as a rayon worker.
        let handle = thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(|| run(&"page{".repeat(100_000)))
            .unwrap();
        let result = handle.join().unwrap();
        assert!(result.success);
        assert_eq!(result.markup.matches("<!DOCTYPE html>").count(), MAX_NESTING_DEPTH);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains(&format!("deeper than {} levels", MAX_NESTING_DEPTH))));
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = run("page P { }");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], true);
        assert!(json["elapsedMs"].is_number());
        assert!(json["markup"].as_str().unwrap().contains("<html"));
        let back: CompileResult = serde_json::from_value(json).unwrap();
        assert_eq!(back.markup, result.markup);
    }

    #[test]
    fn test_compile_file_reads_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("home.ema");
        fs::write(&path, "page Home title=\"Docs\" { }").unwrap();
        let result = compile_file(&path, &CompileOptions::default());
        assert!(result.success);
        assert!(result.markup.contains("<title>Docs</title>"));
    }

    #[test]
    fn test_compile_file_missing_is_single_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = compile_file(&dir.path().join("nope.ema"), &CompileOptions::default());
        assert!(!result.success);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("nope.ema"));
        assert!(result.markup.is_empty());
    }

    #[test]
    fn test_compile_file_invalid_utf8_is_single_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ema");
        fs::write(&path, [0x70, 0x61, 0xff, 0xfe]).unwrap();
        let result = compile_file(&path, &CompileOptions::default());
        assert!(!result.success);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("UTF-8"));
    }
}
